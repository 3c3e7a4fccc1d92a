//! # Innate Primitives
//!
//! Hardcoded constants for the pattern kit.
//!
//! These are compiled in and immutable at runtime. Limits that callers may
//! override live in `limits`; these are the ones they may not.

/// Default ceiling on the nesting depth of a match or pattern validation.
///
/// - Matching recurses once per level of pattern and specimen nesting.
/// - Deeper structures fail to match instead of exhausting the stack.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Hard ceiling on the nesting depth walked by key checks and comparisons.
///
/// Values nested deeper than this are not keys.
pub const MAX_KEY_DEPTH: usize = 512;

/// Nesting depth past which diagnostics elide containers as `[...]`.
///
/// Rendering a specimen must not recurse deeper than matching does.
pub const MAX_DISPLAY_DEPTH: usize = 64;

/// Lower bound of the full encodable range.
pub const FULL_COVER_LOWER: &str = "";

/// Upper bound (exclusive) of the full encodable range.
///
/// Every encoding starts with a prefix character below `{`.
pub const FULL_COVER_UPPER: &str = "{";

/// Suffix appended to an exact encoding to form an exclusive upper bound.
pub const COVER_POINT_SUFFIX: char = '~';

/// Cover used by the scalar matcher: every scalar prefix lies in `a..=z`.
pub const SCALAR_COVER: (&str, &str) = ("a", "z~");

/// Kind name the `remotable` shorthand falls back to when no label is given.
pub const REMOTABLE_KIND: &str = "remotable";

/// `defaultGuards` value under which unguarded methods pass passables.
pub const DEFAULT_GUARDS_PASSABLE: &str = "passable";

/// `defaultGuards` value under which unguarded methods pass raw values.
pub const DEFAULT_GUARDS_RAW: &str = "raw";
