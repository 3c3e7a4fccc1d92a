//! # Pattern Builder
//!
//! The schema-declaration surface, usually imported as `m`:
//!
//! ```ignore
//! use patternkit_core::m;
//!
//! let point = Passable::record([("x", m::number()), ("y", m::number())]);
//! let points = m::array_of(point)?;
//! ```
//!
//! Constructors with no sub-patterns cannot be malformed and return a
//! `Pattern` directly. Constructors taking sub-patterns validate the result
//! against this thread's default kit and return `Result`.
//!
//! Call-site limits are stored as a trailing payload record holding only the
//! overridden fields; with nothing overridden the slot is dropped.

use crate::keys::assert_key;
use crate::kit::with_default_kit;
use crate::limits::Limits;
use crate::passable::{Passable, Pattern};
use crate::primitives::REMOTABLE_KIND;
use crate::types::{MatcherTag, PassStyle, PatternError};

pub use crate::guard::{await_arg, call, call_when, interface, raw};

/// A matcher with an unchecked payload.
pub(crate) fn matcher(tag: MatcherTag, payload: Passable) -> Pattern {
    Passable::tagged(tag.tag(), payload)
}

fn checked(pattern: Pattern) -> Result<Pattern, PatternError> {
    with_default_kit(|kit| kit.assert_pattern(&pattern))?;
    Ok(pattern)
}

fn with_limits(mut slots: Vec<Passable>, limits: &Limits) -> Passable {
    if !limits.is_empty() {
        slots.push(limits.to_record());
    }
    Passable::array(slots)
}

/// `[required]`, `[required, optional]` or `[required, optional, rest]`.
/// A rest without optional parts gets an empty optional slot.
pub(crate) fn split_payload(required: Pattern, optional: Option<Pattern>, rest: Option<Pattern>) -> Passable {
    let empty = || match required.pass_style() {
        PassStyle::CopyRecord => Passable::record::<&str>([]),
        _ => Passable::array([]),
    };
    match (optional, rest) {
        (None, None) => Passable::array([required]),
        (Some(optional), None) => Passable::array([required, optional]),
        (optional, Some(rest)) => {
            let optional = optional.unwrap_or_else(empty);
            Passable::array([required, optional, rest])
        }
    }
}

// =============================================================================
// PREDICATES
// =============================================================================

/// Matches everything.
pub fn any() -> Pattern {
    matcher(MatcherTag::Any, Passable::Undefined)
}

/// Matches primitives and remotables.
pub fn scalar() -> Pattern {
    matcher(MatcherTag::Scalar, Passable::Undefined)
}

/// Matches any key.
pub fn key() -> Pattern {
    matcher(MatcherTag::Key, Passable::Undefined)
}

/// Matches any pattern.
pub fn pattern() -> Pattern {
    matcher(MatcherTag::Pattern, Passable::Undefined)
}

/// Matches values of the named kind, e.g. `"copySet"` or `"match:any"`.
pub fn kind(name: &str) -> Pattern {
    matcher(MatcherTag::Kind, Passable::from(name))
}

pub fn boolean() -> Pattern {
    kind(PassStyle::Boolean.name())
}

pub fn number() -> Pattern {
    kind(PassStyle::Number.name())
}

pub fn undefined() -> Pattern {
    kind(PassStyle::Undefined.name())
}

pub fn null() -> Pattern {
    kind(PassStyle::Null.name())
}

pub fn error() -> Pattern {
    kind(PassStyle::Error.name())
}

pub fn promise() -> Pattern {
    kind(PassStyle::Promise.name())
}

/// A remotable. The label only appears in diagnostics.
pub fn remotable(label: Option<&str>) -> Pattern {
    match label {
        Some(label) => matcher(MatcherTag::Remotable, Passable::record([("label", Passable::from(label))])),
        None => kind(REMOTABLE_KIND),
    }
}

// -----------------------------------------------------------------------------
// Sized scalars
// -----------------------------------------------------------------------------

pub fn bigint() -> Pattern {
    bigint_with(&Limits::new())
}

pub fn bigint_with(limits: &Limits) -> Pattern {
    matcher(MatcherTag::BigInt, with_limits(Vec::new(), limits))
}

/// A non-negative bigint.
pub fn nat() -> Pattern {
    nat_with(&Limits::new())
}

pub fn nat_with(limits: &Limits) -> Pattern {
    matcher(MatcherTag::Nat, with_limits(Vec::new(), limits))
}

pub fn string() -> Pattern {
    string_with(&Limits::new())
}

pub fn string_with(limits: &Limits) -> Pattern {
    matcher(MatcherTag::String, with_limits(Vec::new(), limits))
}

pub fn symbol() -> Pattern {
    symbol_with(&Limits::new())
}

pub fn symbol_with(limits: &Limits) -> Pattern {
    matcher(MatcherTag::Symbol, with_limits(Vec::new(), limits))
}

// -----------------------------------------------------------------------------
// Whole containers
// -----------------------------------------------------------------------------

/// Any copyRecord.
pub fn record() -> Pattern {
    record_with(&Limits::new())
}

pub fn record_with(limits: &Limits) -> Pattern {
    matcher(MatcherTag::RecordOf, with_limits(vec![any(), any()], limits))
}

/// Any copyArray.
pub fn array() -> Pattern {
    array_with(&Limits::new())
}

pub fn array_with(limits: &Limits) -> Pattern {
    matcher(MatcherTag::ArrayOf, with_limits(vec![any()], limits))
}

/// Any copySet.
pub fn set() -> Pattern {
    set_with(&Limits::new())
}

pub fn set_with(limits: &Limits) -> Pattern {
    matcher(MatcherTag::SetOf, with_limits(vec![any()], limits))
}

/// Any copyBag.
pub fn bag() -> Pattern {
    bag_with(&Limits::new())
}

pub fn bag_with(limits: &Limits) -> Pattern {
    matcher(MatcherTag::BagOf, with_limits(vec![any(), any()], limits))
}

/// Any copyMap.
pub fn map() -> Pattern {
    map_with(&Limits::new())
}

pub fn map_with(limits: &Limits) -> Pattern {
    matcher(MatcherTag::MapOf, with_limits(vec![any(), any()], limits))
}

// =============================================================================
// COMBINATORS
// =============================================================================

/// Every pattern must match. No patterns is `any()`; one is itself.
pub fn and(patterns: impl IntoIterator<Item = Pattern>) -> Result<Pattern, PatternError> {
    let mut patterns: Vec<Pattern> = patterns.into_iter().collect();
    match patterns.len() {
        0 => Ok(any()),
        1 => checked(patterns.remove(0)),
        _ => checked(matcher(MatcherTag::And, Passable::array(patterns))),
    }
}

/// Some pattern must match. No patterns matches nothing; one is itself.
pub fn or(patterns: impl IntoIterator<Item = Pattern>) -> Result<Pattern, PatternError> {
    let mut patterns: Vec<Pattern> = patterns.into_iter().collect();
    match patterns.len() {
        0 => Ok(matcher(MatcherTag::Not, any())),
        1 => checked(patterns.remove(0)),
        _ => checked(matcher(MatcherTag::Or, Passable::array(patterns))),
    }
}

pub fn not(pattern: Pattern) -> Result<Pattern, PatternError> {
    checked(matcher(MatcherTag::Not, pattern))
}

/// A tagged value whose tag and payload match.
pub fn tagged(tag_pattern: Pattern, payload_pattern: Pattern) -> Result<Pattern, PatternError> {
    checked(matcher(MatcherTag::Tagged, Passable::array([tag_pattern, payload_pattern])))
}

/// `pattern` or a promise.
pub fn eref(pattern: Pattern) -> Result<Pattern, PatternError> {
    or([pattern, promise()])
}

/// `pattern` or `undefined`.
pub fn opt(pattern: Pattern) -> Result<Pattern, PatternError> {
    or([Passable::Undefined, pattern])
}

// -----------------------------------------------------------------------------
// Key comparison
// -----------------------------------------------------------------------------

/// Exactly `key`.
pub fn eq(key: Passable) -> Result<Pattern, PatternError> {
    assert_key(&key)?;
    Ok(if key.is_undefined() { undefined() } else { key })
}

pub fn neq(key: Passable) -> Result<Pattern, PatternError> {
    not(eq(key)?)
}

pub fn lt(operand: Passable) -> Result<Pattern, PatternError> {
    checked(matcher(MatcherTag::Lt, operand))
}

pub fn lte(operand: Passable) -> Result<Pattern, PatternError> {
    checked(matcher(MatcherTag::Lte, operand))
}

pub fn gte(operand: Passable) -> Result<Pattern, PatternError> {
    checked(matcher(MatcherTag::Gte, operand))
}

pub fn gt(operand: Passable) -> Result<Pattern, PatternError> {
    checked(matcher(MatcherTag::Gt, operand))
}

// -----------------------------------------------------------------------------
// Homogeneous containers
// -----------------------------------------------------------------------------

pub fn array_of(element: Pattern) -> Result<Pattern, PatternError> {
    array_of_with(element, &Limits::new())
}

pub fn array_of_with(element: Pattern, limits: &Limits) -> Result<Pattern, PatternError> {
    checked(matcher(MatcherTag::ArrayOf, with_limits(vec![element], limits)))
}

/// A record whose names match `name` and values match `value`.
pub fn record_of(name: Pattern, value: Pattern) -> Result<Pattern, PatternError> {
    record_of_with(name, value, &Limits::new())
}

pub fn record_of_with(name: Pattern, value: Pattern, limits: &Limits) -> Result<Pattern, PatternError> {
    checked(matcher(MatcherTag::RecordOf, with_limits(vec![name, value], limits)))
}

pub fn set_of(element: Pattern) -> Result<Pattern, PatternError> {
    set_of_with(element, &Limits::new())
}

pub fn set_of_with(element: Pattern, limits: &Limits) -> Result<Pattern, PatternError> {
    checked(matcher(MatcherTag::SetOf, with_limits(vec![element], limits)))
}

pub fn bag_of(key: Pattern, count: Pattern) -> Result<Pattern, PatternError> {
    bag_of_with(key, count, &Limits::new())
}

pub fn bag_of_with(key: Pattern, count: Pattern, limits: &Limits) -> Result<Pattern, PatternError> {
    checked(matcher(MatcherTag::BagOf, with_limits(vec![key, count], limits)))
}

pub fn map_of(key: Pattern, value: Pattern) -> Result<Pattern, PatternError> {
    map_of_with(key, value, &Limits::new())
}

pub fn map_of_with(key: Pattern, value: Pattern, limits: &Limits) -> Result<Pattern, PatternError> {
    checked(matcher(MatcherTag::MapOf, with_limits(vec![key, value], limits)))
}

// -----------------------------------------------------------------------------
// Split containers
// -----------------------------------------------------------------------------

/// An array with required, optional and rest parts. Without `rest`, no
/// elements may follow the optional ones.
pub fn split_array(
    required: Pattern,
    optional: Option<Pattern>,
    rest: Option<Pattern>,
) -> Result<Pattern, PatternError> {
    checked(matcher(MatcherTag::SplitArray, split_payload(required, optional, rest)))
}

/// A record with required, optional and rest properties. Without `rest`,
/// no other properties are allowed.
pub fn split_record(
    required: Pattern,
    optional: Option<Pattern>,
    rest: Option<Pattern>,
) -> Result<Pattern, PatternError> {
    checked(matcher(MatcherTag::SplitRecord, split_payload(required, optional, rest)))
}

/// `base` required, then `rest`. Builds `splitArray` for an array base and
/// `splitRecord` otherwise.
pub fn split(base: Pattern, rest: Option<Pattern>) -> Result<Pattern, PatternError> {
    if base.pass_style() == PassStyle::CopyArray {
        split_array(base, None, rest)
    } else {
        split_record(base, None, rest)
    }
}

/// `base` entirely optional, then `rest`.
pub fn partial(base: Pattern, rest: Option<Pattern>) -> Result<Pattern, PatternError> {
    if base.pass_style() == PassStyle::CopyArray {
        split_array(Passable::array([]), Some(base), rest)
    } else {
        split_record(Passable::record::<&str>([]), Some(base), rest)
    }
}
