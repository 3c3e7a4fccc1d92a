//! # Matcher Library
//!
//! Each matcher kind is a `MatchHelper`: three operations over the payload
//! of a `match:<name>` tagged value. The catalog is closed; `helper_for`
//! maps every `MatcherTag` to its helper.
//!
//! | module        | matchers                                          |
//! |---------------|---------------------------------------------------|
//! | `logic`       | any, and, or, not                                 |
//! | `kinds`       | scalar, key, pattern, kind, tagged, remotable     |
//! | `scalars`     | bigint, nat, string, symbol                       |
//! | `compare`     | lt, lte, gte, gt                                  |
//! | `collections` | arrayOf, recordOf, setOf, bagOf, mapOf            |
//! | `split`       | splitArray, splitRecord                           |
//!
//! Payloads are validated once, when the matcher is first classified, so
//! `check_matches` and `rank_cover` may assume a well-formed payload. They
//! still never panic on a malformed one: matching fails and covers widen.

mod collections;
mod compare;
mod kinds;
mod logic;
mod scalars;
mod split;

use crate::check::{Check, Checker, Label, labeled};
use crate::encode::SortableEncoder;
use crate::kit::PatternKit;
use crate::limits::AllLimits;
use crate::passable::{CopyRecord, Passable, Pattern, UNDEFINED};
use crate::rank::RankCover;
use crate::types::MatcherTag;

/// The operations of one matcher kind.
pub trait MatchHelper: Sync {
    /// Check a specimen against a well-formed payload.
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check;

    /// Check that a payload is well-formed for this matcher.
    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check;

    /// A cover for every value the matcher can accept.
    fn rank_cover(&self, kit: &PatternKit, payload: &Passable, encoder: &dyn SortableEncoder) -> RankCover;
}

/// The helper for a matcher tag.
#[must_use]
pub fn helper_for(tag: MatcherTag) -> &'static dyn MatchHelper {
    match tag {
        MatcherTag::Any => &logic::Any,
        MatcherTag::And => &logic::And,
        MatcherTag::Or => &logic::Or,
        MatcherTag::Not => &logic::Not,
        MatcherTag::Scalar => &kinds::Scalar,
        MatcherTag::Key => &kinds::Key,
        MatcherTag::Pattern => &kinds::PatternHelper,
        MatcherTag::Kind => &kinds::KindHelper,
        MatcherTag::Tagged => &kinds::Tagged,
        MatcherTag::BigInt => &scalars::BigIntHelper,
        MatcherTag::Nat => &scalars::Nat,
        MatcherTag::String => &scalars::StringHelper,
        MatcherTag::Symbol => &scalars::Symbol,
        MatcherTag::Remotable => &kinds::Remotable,
        MatcherTag::Lt => &compare::LT,
        MatcherTag::Lte => &compare::LTE,
        MatcherTag::Gte => &compare::GTE,
        MatcherTag::Gt => &compare::GT,
        MatcherTag::ArrayOf => &collections::ArrayOf,
        MatcherTag::RecordOf => &collections::RecordOf,
        MatcherTag::SetOf => &collections::SetOf,
        MatcherTag::BagOf => &collections::BagOf,
        MatcherTag::MapOf => &collections::MapOf,
        MatcherTag::SplitArray => &split::SplitArray,
        MatcherTag::SplitRecord => &split::SplitRecord,
    }
}

// =============================================================================
// SHARED PAYLOAD HELPERS
// =============================================================================

/// Whether a pattern is the `any` matcher.
pub(crate) fn is_any_matcher(pattern: &Pattern) -> bool {
    pattern.as_tagged().is_some_and(|t| t.tag() == MatcherTag::Any.tag())
}

/// Payloads that must be `undefined`.
pub(crate) fn check_undefined_payload(tag: MatcherTag, payload: &Passable, checker: Checker) -> Check {
    checker.require(payload.is_undefined(), || {
        format!("{tag} payload: {payload} - Must be undefined")
    })
}

/// Check a payload of `main_shape.len()` slots plus an optional trailing
/// limits record.
///
/// The limits record must be a record of numbers. Payloads of the wrong
/// size are rejected before any slot is checked.
pub(crate) fn check_is_well_formed_with_limit(
    kit: &PatternKit,
    payload: &Passable,
    main_shape: &[Pattern],
    checker: Checker,
    tag: MatcherTag,
) -> Check {
    let label = format!("{tag} payload");
    let Some(slots) = payload.as_array() else {
        return checker.fail(|| format!("{label:?} payload must be an array: {payload}"));
    };
    let main = main_shape.len();
    if slots.len() != main && slots.len() != main + 1 {
        return checker.fail(|| format!("{label:?} payload unexpected size: {payload}"));
    }
    for (i, (slot, shape)) in slots.iter().zip(main_shape).enumerate() {
        labeled(
            kit.check_matches(slot, shape, checker, Some(&Label::Index(i))),
            Some(&Label::from(label.as_str())),
        )?;
    }
    let Some(limits) = slots.get(main) else {
        return Ok(());
    };
    let Some(record) = limits.as_record() else {
        return checker.fail(|| format!("Limits must be a record: {limits}"));
    };
    record.iter().try_for_each(|(name, value)| {
        checker.require(matches!(value, Passable::Number(_)), || {
            format!("Value of limit {name:?} must be a number: {value}")
        })
    })
}

/// Split a well-formed payload into its main slots and resolved limits.
pub(crate) fn split_limits<'a>(kit: &PatternKit, payload: &'a Passable, main: usize) -> (&'a [Passable], AllLimits) {
    let slots = payload.as_array().map_or(&[][..], |a| a.as_slice());
    let record: Option<&CopyRecord> = slots.get(main).and_then(Passable::as_record);
    (&slots[..main.min(slots.len())], kit.limits().with_payload(record))
}

/// Slot `i` of a payload, or `undefined`.
pub(crate) fn slot(slots: &[Passable], i: usize) -> &Passable {
    slots.get(i).unwrap_or(&UNDEFINED)
}

/// Check every element of a sequence against one pattern, labeling each
/// failure `<prefix>[<i>]`. The `any` matcher skips the walk.
pub(crate) fn check_every(
    kit: &PatternKit,
    items: &[Passable],
    pattern: &Pattern,
    checker: Checker,
    prefix: &str,
) -> Check {
    if is_any_matcher(pattern) {
        return Ok(());
    }
    items.iter().enumerate().try_for_each(|(i, item)| {
        kit.check_matches(item, pattern, checker, Some(&Label::from(format!("{prefix}[{i}]"))))
    })
}

/// Number of UTF-16 code units in a string.
pub(crate) fn utf16_len(s: &str) -> u64 {
    s.encode_utf16().count() as u64
}
