//! # Core Type Definitions
//!
//! This module contains the classification vocabulary shared by every layer:
//! - Pass styles (`PassStyle`): the coarse shape of any passable value
//! - Kinds (`Kind`): pass styles refined by recognized tags
//! - Matcher and guard tags (`MatcherTag`, `GuardTag`)
//! - Error types (`PatternError`)
//!
//! ## Naming
//!
//! The string names returned by `name()` are part of the pattern surface:
//! `m::kind("copySet")` compares against them, and tagged matchers carry
//! `MatcherTag::tag()` verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// PASS STYLE
// =============================================================================

/// The coarse classification of a passable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PassStyle {
    Undefined,
    Null,
    Boolean,
    Number,
    BigInt,
    String,
    Symbol,
    CopyArray,
    CopyRecord,
    Tagged,
    Remotable,
    Promise,
    Error,
}

impl PassStyle {
    /// All pass styles, in declaration order.
    pub const ALL: [PassStyle; 13] = [
        PassStyle::Undefined,
        PassStyle::Null,
        PassStyle::Boolean,
        PassStyle::Number,
        PassStyle::BigInt,
        PassStyle::String,
        PassStyle::Symbol,
        PassStyle::CopyArray,
        PassStyle::CopyRecord,
        PassStyle::Tagged,
        PassStyle::Remotable,
        PassStyle::Promise,
        PassStyle::Error,
    ];

    /// The name used in diagnostics and kind patterns.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PassStyle::Undefined => "undefined",
            PassStyle::Null => "null",
            PassStyle::Boolean => "boolean",
            PassStyle::Number => "number",
            PassStyle::BigInt => "bigint",
            PassStyle::String => "string",
            PassStyle::Symbol => "symbol",
            PassStyle::CopyArray => "copyArray",
            PassStyle::CopyRecord => "copyRecord",
            PassStyle::Tagged => "tagged",
            PassStyle::Remotable => "remotable",
            PassStyle::Promise => "promise",
            PassStyle::Error => "error",
        }
    }

    /// Encoding prefixes for this style, in ascending order.
    ///
    /// The rank order of styles is the order of their first prefix.
    #[must_use]
    pub const fn prefixes(self) -> &'static str {
        match self {
            PassStyle::Error => "!",
            PassStyle::CopyRecord => "(",
            PassStyle::Tagged => ":",
            PassStyle::Promise => "?",
            PassStyle::CopyArray => "[",
            PassStyle::Boolean => "b",
            PassStyle::Number => "f",
            PassStyle::BigInt => "np",
            PassStyle::Remotable => "r",
            PassStyle::String => "s",
            PassStyle::Null => "v",
            PassStyle::Symbol => "y",
            PassStyle::Undefined => "z",
        }
    }

    /// Whether values of this style are primitives (no children, no identity).
    #[must_use]
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            PassStyle::Undefined
                | PassStyle::Null
                | PassStyle::Boolean
                | PassStyle::Number
                | PassStyle::BigInt
                | PassStyle::String
                | PassStyle::Symbol
        )
    }
}

impl fmt::Display for PassStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// MATCHER TAGS
// =============================================================================

/// The closed catalog of matcher kinds. Each has the tag `match:<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatcherTag {
    Any,
    And,
    Or,
    Not,
    Scalar,
    Key,
    Pattern,
    Kind,
    Tagged,
    BigInt,
    Nat,
    String,
    Symbol,
    Remotable,
    Lt,
    Lte,
    Gte,
    Gt,
    ArrayOf,
    RecordOf,
    SetOf,
    BagOf,
    MapOf,
    SplitArray,
    SplitRecord,
}

impl MatcherTag {
    /// Every matcher tag, in registry order.
    pub const ALL: [MatcherTag; 25] = [
        MatcherTag::Any,
        MatcherTag::And,
        MatcherTag::Or,
        MatcherTag::Not,
        MatcherTag::Scalar,
        MatcherTag::Key,
        MatcherTag::Pattern,
        MatcherTag::Kind,
        MatcherTag::Tagged,
        MatcherTag::BigInt,
        MatcherTag::Nat,
        MatcherTag::String,
        MatcherTag::Symbol,
        MatcherTag::Remotable,
        MatcherTag::Lt,
        MatcherTag::Lte,
        MatcherTag::Gte,
        MatcherTag::Gt,
        MatcherTag::ArrayOf,
        MatcherTag::RecordOf,
        MatcherTag::SetOf,
        MatcherTag::BagOf,
        MatcherTag::MapOf,
        MatcherTag::SplitArray,
        MatcherTag::SplitRecord,
    ];

    /// The full tag string, e.g. `match:arrayOf`.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            MatcherTag::Any => "match:any",
            MatcherTag::And => "match:and",
            MatcherTag::Or => "match:or",
            MatcherTag::Not => "match:not",
            MatcherTag::Scalar => "match:scalar",
            MatcherTag::Key => "match:key",
            MatcherTag::Pattern => "match:pattern",
            MatcherTag::Kind => "match:kind",
            MatcherTag::Tagged => "match:tagged",
            MatcherTag::BigInt => "match:bigint",
            MatcherTag::Nat => "match:nat",
            MatcherTag::String => "match:string",
            MatcherTag::Symbol => "match:symbol",
            MatcherTag::Remotable => "match:remotable",
            MatcherTag::Lt => "match:lt",
            MatcherTag::Lte => "match:lte",
            MatcherTag::Gte => "match:gte",
            MatcherTag::Gt => "match:gt",
            MatcherTag::ArrayOf => "match:arrayOf",
            MatcherTag::RecordOf => "match:recordOf",
            MatcherTag::SetOf => "match:setOf",
            MatcherTag::BagOf => "match:bagOf",
            MatcherTag::MapOf => "match:mapOf",
            MatcherTag::SplitArray => "match:splitArray",
            MatcherTag::SplitRecord => "match:splitRecord",
        }
    }

    /// Look up a matcher by its full tag string.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.tag() == tag)
    }
}

impl fmt::Display for MatcherTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Reduce a matcher tag with a sub-tag (`match:<helper>:<sub>`) to its
/// helper tag (`match:<helper>`). Tags without a sub-tag yield `None`.
#[must_use]
pub fn match_sub_tag(tag: &str) -> Option<String> {
    let rest = tag.strip_prefix("match:")?;
    let (helper, sub) = rest.split_once(':')?;
    let is_word = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if is_word(helper) && is_word(sub) {
        Some(format!("match:{helper}"))
    } else {
        None
    }
}

// =============================================================================
// GUARD TAGS
// =============================================================================

/// Tags of the guard records produced by the guard builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GuardTag {
    AwaitArgGuard,
    RawGuard,
    MethodGuard,
    InterfaceGuard,
}

impl GuardTag {
    pub const ALL: [GuardTag; 4] = [
        GuardTag::AwaitArgGuard,
        GuardTag::RawGuard,
        GuardTag::MethodGuard,
        GuardTag::InterfaceGuard,
    ];

    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            GuardTag::AwaitArgGuard => "guard:awaitArgGuard",
            GuardTag::RawGuard => "guard:rawGuard",
            GuardTag::MethodGuard => "guard:methodGuard",
            GuardTag::InterfaceGuard => "guard:interfaceGuard",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.tag() == tag)
    }
}

impl fmt::Display for GuardTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// =============================================================================
// KIND
// =============================================================================

/// A pass style refined by recognized tags.
///
/// Tagged values only classify once their payload passes the invariants of
/// their tag; anything else has no kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// Any non-tagged pass style.
    Style(PassStyle),
    CopySet,
    CopyBag,
    CopyMap,
    Match(MatcherTag),
    Guard(GuardTag),
}

/// Tags of the key collections.
pub const COPY_SET_TAG: &str = "copySet";
pub const COPY_BAG_TAG: &str = "copyBag";
pub const COPY_MAP_TAG: &str = "copyMap";

impl Kind {
    /// The kind name, as used by `m::kind(..)` and in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Style(style) => style.name(),
            Kind::CopySet => COPY_SET_TAG,
            Kind::CopyBag => COPY_BAG_TAG,
            Kind::CopyMap => COPY_MAP_TAG,
            Kind::Match(tag) => tag.tag(),
            Kind::Guard(tag) => tag.tag(),
        }
    }

    /// Parse a kind name. `"tagged"` is not a kind: tagged values always
    /// classify by their tag.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            COPY_SET_TAG => Some(Kind::CopySet),
            COPY_BAG_TAG => Some(Kind::CopyBag),
            COPY_MAP_TAG => Some(Kind::CopyMap),
            _ => {
                if let Some(style) = PassStyle::ALL
                    .into_iter()
                    .find(|s| *s != PassStyle::Tagged && s.name() == name)
                {
                    return Some(Kind::Style(style));
                }
                MatcherTag::from_tag(name)
                    .map(Kind::Match)
                    .or_else(|| GuardTag::from_tag(name).map(Kind::Guard))
            }
        }
    }

    /// The pass style underlying this kind.
    #[must_use]
    pub const fn pass_style(self) -> PassStyle {
        match self {
            Kind::Style(style) => style,
            _ => PassStyle::Tagged,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by pattern construction and throwing checks.
///
/// - No silent failures
/// - Match failures are only errors on the throwing path (`must_match`);
///   the probe path (`matches`) reports them as `false`
#[derive(Debug, Error)]
pub enum PatternError {
    /// A pattern, matcher payload, guard, or key collection violates its
    /// own shape contract. Raised at construction.
    #[error("{0}")]
    WellFormedness(String),

    /// A specimen does not satisfy a pattern. Limit violations are match
    /// failures whose text names the limit.
    #[error("{0}")]
    MatchFailure(String),

    /// The probe and throwing checks disagreed about a specimen.
    #[error("internal: {label}: inconsistent pattern match: {pattern}")]
    InternalInconsistency {
        label: String,
        pattern: String,
        #[source]
        cause: Option<Box<PatternError>>,
    },
}

impl PatternError {
    /// The diagnostic text without the variant wrapper.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================
