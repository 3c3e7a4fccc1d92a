//! Homogeneous collection matchers: `arrayOf`, `recordOf`, `setOf`,
//! `bagOf`, `mapOf`.
//!
//! Every payload ends in an optional limits record. Size limits are
//! checked before any element, so an oversized specimen costs no more
//! than its length.

use super::scalars::check_decimal_digits_limit;
use super::{MatchHelper, check_every, check_is_well_formed_with_limit, slot, split_limits, utf16_len};
use crate::builder as m;
use crate::check::{Check, Checker, Label, labeled};
use crate::encode::SortableEncoder;
use crate::keys::copy_map_parts;
use crate::kit::PatternKit;
use crate::passable::{CopyArray, Passable, Pattern};
use crate::rank::RankCover;
use crate::types::{COPY_BAG_TAG, COPY_MAP_TAG, COPY_SET_TAG, MatcherTag, PassStyle};
use std::sync::LazyLock;

static ONE_PATTERN: LazyLock<[Pattern; 1]> = LazyLock::new(|| [m::pattern()]);
static TWO_PATTERNS: LazyLock<[Pattern; 2]> = LazyLock::new(|| [m::pattern(), m::pattern()]);

/// The array payload of a well-formed `copySet` or `copyBag`.
fn tagged_elements(specimen: &Passable) -> &[Passable] {
    specimen
        .as_tagged()
        .and_then(|t| t.payload().as_array())
        .map_or(&[][..], CopyArray::as_slice)
}

/// A copyArray whose elements all match.
pub(super) struct ArrayOf;

impl MatchHelper for ArrayOf {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        let (slots, limits) = split_limits(kit, payload, 1);
        kit.check_kind(specimen, PassStyle::CopyArray.name(), checker)?;
        let items = specimen.as_array().map_or(&[][..], CopyArray::as_slice);
        let limit = limits.array_length_limit;
        checker.require(items.len() as u64 <= limit, || {
            format!("Array length {} must be <= limit {limit}", items.len())
        })?;
        check_every(kit, items, slot(slots, 0), checker, "")
    }

    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        check_is_well_formed_with_limit(kit, payload, &*ONE_PATTERN, checker, MatcherTag::ArrayOf)
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::for_style(PassStyle::CopyArray)
    }
}

/// A copyRecord whose `[name, value]` entries all match
/// `[namePattern, valuePattern]`.
pub(super) struct RecordOf;

impl MatchHelper for RecordOf {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        let (slots, limits) = split_limits(kit, payload, 2);
        kit.check_kind(specimen, PassStyle::CopyRecord.name(), checker)?;
        let Some(record) = specimen.as_record() else {
            return checker.fail(|| format!("{specimen} - Must be a copyRecord"));
        };
        let limit = limits.num_properties_limit;
        checker.require(record.len() as u64 <= limit, || {
            format!("Must not have more than {limit} properties: {specimen}")
        })?;
        let name_limit = limits.property_name_length_limit;
        let entry_pattern = Passable::array([slot(slots, 0).clone(), slot(slots, 1).clone()]);
        record.iter().try_for_each(|(name, value)| {
            let label = Label::from(name);
            labeled(
                checker.require(utf16_len(name) <= name_limit, || {
                    format!("Property name {name:?} must not be longer than {name_limit}")
                }),
                Some(&label),
            )?;
            let entry = Passable::array([Passable::from(name), value.clone()]);
            kit.check_matches(&entry, &entry_pattern, checker, Some(&label))
        })
    }

    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        check_is_well_formed_with_limit(kit, payload, &*TWO_PATTERNS, checker, MatcherTag::RecordOf)
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::for_style(PassStyle::CopyRecord)
    }
}

/// A copySet whose elements all match.
pub(super) struct SetOf;

impl MatchHelper for SetOf {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        let (slots, limits) = split_limits(kit, payload, 1);
        kit.check_kind(specimen, COPY_SET_TAG, checker)?;
        let elements = tagged_elements(specimen);
        let limit = limits.num_set_elements_limit;
        checker.require(elements.len() as u64 <= limit, || {
            format!("Set must not have more than {limit} elements: {}", elements.len())
        })?;
        check_every(kit, elements, slot(slots, 0), checker, "set elements")
    }

    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        check_is_well_formed_with_limit(kit, payload, &*ONE_PATTERN, checker, MatcherTag::SetOf)
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::for_style(PassStyle::Tagged)
    }
}

/// A copyBag whose keys and counts all match.
pub(super) struct BagOf;

impl MatchHelper for BagOf {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        let (slots, limits) = split_limits(kit, payload, 2);
        kit.check_kind(specimen, COPY_BAG_TAG, checker)?;
        let entries = tagged_elements(specimen);
        let limit = limits.num_unique_bag_elements_limit;
        checker.require(entries.len() as u64 <= limit, || {
            format!("Bag must not have more than {limit} unique elements: {specimen}")
        })?;
        let (key_pattern, count_pattern) = (slot(slots, 0), slot(slots, 1));
        let digits = limits.decimal_digits_limit;
        entries.iter().enumerate().try_for_each(|(i, entry)| {
            let Some([key, count]) = entry.as_array().map(CopyArray::as_slice) else {
                return checker.fail(|| format!("bag entry {i} must be a [key, count] pair: {entry}"));
            };
            kit.check_matches(key, key_pattern, checker, Some(&Label::from(format!("bag keys[{i}]"))))?;
            let counts = Label::from(format!("bag counts[{i}]"));
            labeled(check_decimal_digits_limit(count, digits, checker), Some(&counts))?;
            kit.check_matches(count, count_pattern, checker, Some(&counts))
        })
    }

    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        check_is_well_formed_with_limit(kit, payload, &*TWO_PATTERNS, checker, MatcherTag::BagOf)
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::for_style(PassStyle::Tagged)
    }
}

/// A copyMap whose keys and values all match.
pub(super) struct MapOf;

impl MatchHelper for MapOf {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        let (slots, limits) = split_limits(kit, payload, 2);
        kit.check_kind(specimen, COPY_MAP_TAG, checker)?;
        let Some((keys, values)) = specimen.as_tagged().and_then(copy_map_parts) else {
            return checker.fail(|| format!("{specimen} - Must be a copyMap"));
        };
        let limit = limits.num_map_entries_limit;
        checker.require(keys.len() as u64 <= limit, || {
            format!("CopyMap must have no more than {limit} entries: {specimen}")
        })?;
        check_every(kit, keys, slot(slots, 0), checker, "map keys")?;
        check_every(kit, values, slot(slots, 1), checker, "map values")
    }

    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        check_is_well_formed_with_limit(kit, payload, &*TWO_PATTERNS, checker, MatcherTag::MapOf)
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::for_style(PassStyle::Tagged)
    }
}
