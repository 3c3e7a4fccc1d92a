//! `splitArray` and `splitRecord`: required, optional and rest parts.
//!
//! The payload is `[required]`, `[required, optional]` or
//! `[required, optional, rest]`. An `undefined` slot is absent. A specimen
//! is split by position (arrays) or by name (records):
//!
//! - required parts must all be present and match
//! - optional parts may be missing or `undefined`; present ones must match
//! - whatever is left over must match the rest pattern
//!
//! With no rest pattern, nothing may be left over. Pass `m::any()` as the
//! rest to accept any remainder.

use super::{MatchHelper, slot};
use crate::check::{Check, Checker, Label};
use crate::encode::SortableEncoder;
use crate::kit::PatternKit;
use crate::passable::{CopyArray, CopyRecord, Passable};
use crate::rank::RankCover;
use crate::types::PassStyle;
use std::collections::BTreeMap;

/// Check `[required, optional?, rest?]`, where required and optional are
/// patterns of the given container style.
fn check_split_payload(kit: &PatternKit, payload: &Passable, style: PassStyle, checker: Checker) -> Check {
    let container_pattern = |p: &Passable| p.pass_style() == style && kit.is_pattern(p);
    let well_formed = payload.as_array().is_some_and(|slots| {
        (1..=3).contains(&slots.len())
            && container_pattern(slot(slots, 0))
            && (slot(slots, 1).is_undefined() || container_pattern(slot(slots, 1)))
            && (slot(slots, 2).is_undefined() || kit.is_pattern(slot(slots, 2)))
    });
    let noun = if style == PassStyle::CopyArray { "array" } else { "record" };
    checker.require(well_formed, || {
        format!(
            "Must be an array of a requiredPatt {noun}, an optional optionalPatt {noun}, and an optional restPatt: {payload}"
        )
    })
}

/// The rest pattern, or `empty` when there is none.
fn rest_pattern<'a>(slots: &'a [Passable], empty: &'a Passable) -> &'a Passable {
    match slot(slots, 2) {
        Passable::Undefined => empty,
        rest => rest,
    }
}

/// Positional split: `[arg 0, .., arg n-1, arg n?, .., ...rest]`.
pub(super) struct SplitArray;

impl MatchHelper for SplitArray {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        kit.check_kind(specimen, PassStyle::CopyArray.name(), checker)?;
        let slots = payload.as_array().map_or(&[][..], CopyArray::as_slice);
        let items = specimen.as_array().map_or(&[][..], CopyArray::as_slice);
        let required = slot(slots, 0).as_array().map_or(&[][..], CopyArray::as_slice);
        let optional = slot(slots, 1).as_array().map_or(&[][..], CopyArray::as_slice);
        let n = required.len();
        checker.require(items.len() >= n, || format!("Expected at least {n} arguments: {specimen}"))?;
        let (required_items, rest) = items.split_at(n);
        for (i, (item, p)) in required_items.iter().zip(required).enumerate() {
            kit.check_matches(item, p, checker, Some(&Label::from(format!("arg {i}"))))?;
        }
        let (optional_items, rest) = rest.split_at(optional.len().min(rest.len()));
        for (i, (item, p)) in optional_items.iter().zip(optional).enumerate() {
            if !item.is_undefined() {
                kit.check_matches(item, p, checker, Some(&Label::from(format!("arg {}?", n + i))))?;
            }
        }
        let empty = Passable::array([]);
        kit.check_matches(
            &Passable::array(rest.iter().cloned()),
            rest_pattern(slots, &empty),
            checker,
            Some(&Label::from("...rest")),
        )
    }

    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        check_split_payload(kit, payload, PassStyle::CopyArray, checker)
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::for_style(PassStyle::CopyArray)
    }
}

/// Split by property name: `{required.., optional?.., ...rest}`.
pub(super) struct SplitRecord;

impl MatchHelper for SplitRecord {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        kit.check_kind(specimen, PassStyle::CopyRecord.name(), checker)?;
        let slots = payload.as_array().map_or(&[][..], CopyArray::as_slice);
        let Some(record) = specimen.as_record() else {
            return checker.fail(|| format!("{specimen} - Must be a copyRecord"));
        };
        let required = slot(slots, 0);
        let no_names = CopyRecord::new(BTreeMap::new());
        let required_names = required.as_record().unwrap_or(&no_names);
        let optional = slot(slots, 1).as_record().unwrap_or(&no_names);

        let mut required_part = BTreeMap::new();
        let mut optional_part = Vec::new();
        let mut rest_part = BTreeMap::new();
        for (name, value) in record.iter() {
            if required_names.contains(name) {
                required_part.insert(name.to_owned(), value.clone());
            } else if let Some(p) = optional.get(name) {
                optional_part.push((name, value, p));
            } else {
                rest_part.insert(name.to_owned(), value.clone());
            }
        }

        kit.check_matches(&Passable::CopyRecord(CopyRecord::new(required_part)), required, checker, None)?;
        for (name, value, p) in optional_part {
            if !value.is_undefined() {
                kit.check_matches(value, p, checker, Some(&Label::from(format!("{name}?"))))?;
            }
        }
        let empty = Passable::CopyRecord(no_names);
        kit.check_matches(
            &Passable::CopyRecord(CopyRecord::new(rest_part)),
            rest_pattern(slots, &empty),
            checker,
            Some(&Label::from("...rest")),
        )
    }

    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        check_split_payload(kit, payload, PassStyle::CopyRecord, checker)
    }

    fn rank_cover(&self, _kit: &PatternKit, payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        let required = payload.as_array().map_or(&[][..], CopyArray::as_slice);
        RankCover::for_style(slot(required, 0).pass_style())
    }
}
