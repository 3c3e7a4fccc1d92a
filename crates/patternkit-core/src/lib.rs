//! # patternkit-core
//!
//! Structural pattern matching over passable values.
//!
//! A pattern is itself a passable value. Keys match by equality, and
//! matchers (tagged `match:*` records) describe sets of values: kinds,
//! comparisons, container shapes, splits, and combinations of these.
//! Interface guards built from patterns describe the methods an object
//! accepts and the values they return.
//!
//! ## Architecture
//!
//! - `passable` and `types` define the value model and its vocabulary
//! - `keys` and `rank` give keys equality and total order
//! - `kit` owns the matching engine; `matchers` holds one helper per tag
//! - `builder` (re-exported as `m`) and `guard` construct well-formed patterns
//!
//! ## Constraints
//!
//! - Pure Rust: no async, no I/O
//! - Deterministic: equal inputs give equal verdicts and equal diagnostics
//! - Bounded: container sizes are capped by `Limits`, recursion by depth

// =============================================================================
// MODULES
// =============================================================================

pub mod builder;
pub mod check;
pub mod encode;
pub mod guard;
pub mod keys;
pub mod kit;
pub mod limits;
pub mod matchers;
pub mod passable;
pub mod primitives;
pub mod rank;
pub mod types;

/// Pattern constructors, usually written `m::string()`, `m::array_of(..)`.
pub use builder as m;

// =============================================================================
// RE-EXPORTS: Values and vocabulary
// =============================================================================

pub use passable::{CopyArray, CopyRecord, CopyTagged, Passable, Pattern};
pub use types::{GuardTag, Kind, MatcherTag, PassStyle, PatternError};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use check::{Check, Checker, Label, Mismatch};
pub use encode::{RankEncoder, SortableEncoder};
pub use kit::{
    KitConfig, PatternKit, assert_pattern, get_rank_cover, is_pattern, kind_of, matches, must_match,
    with_default_kit,
};
pub use limits::{AllLimits, Limits};
pub use rank::{RankCover, compare_rank};

// =============================================================================
// RE-EXPORTS: Keys
// =============================================================================

pub use keys::{assert_key, compare_keys, is_key, key_eq, make_copy_bag, make_copy_map, make_copy_set};

// =============================================================================
// RE-EXPORTS: Guards
// =============================================================================

pub use guard::{
    CallKind, DefaultGuards, InterfaceGuard, InterfaceOptions, MethodGuard, MethodGuardMaker, MethodKey,
    assert_interface_guard, assert_method_guard,
};
