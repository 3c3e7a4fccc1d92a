//! # Keys
//!
//! A key is a passable free of promises and errors at any depth, whose
//! tagged values are all well-formed key collections. Keys have a partial
//! order (`compare_keys`) and an equality (`key_eq`); every key is a pattern
//! that matches only the keys equal to it.
//!
//! Key collections:
//! - `copySet`: payload is an array of keys in descending rank order, no two
//!   key-equal
//! - `copyBag`: payload is an array of `[key, count]` pairs in set order,
//!   counts positive bigints
//! - `copyMap`: payload is `{keys, values}`, keys in set order, values
//!   parallel to keys (values need only be keys for the map to be a key)

use crate::check::{Check, Checker, Label, labeled};
use crate::passable::{CopyArray, CopyTagged, Passable};
use crate::primitives::MAX_KEY_DEPTH;
use crate::rank::{compare_anti_rank, compare_numbers, compare_rank};
use crate::types::{COPY_BAG_TAG, COPY_MAP_TAG, COPY_SET_TAG, PatternError};
use num_bigint::{BigInt, Sign};
use std::cmp::Ordering;

// =============================================================================
// KEY CHECKS
// =============================================================================

/// Whether a value is a key.
#[must_use]
pub fn is_key(value: &Passable) -> bool {
    check_key(value, Checker::Probe).is_ok()
}

/// Check that a value is a key, reporting why not.
pub fn check_key(value: &Passable, checker: Checker) -> Check {
    check_key_at(value, checker, 0)
}

/// Assert that a value is a key.
pub fn assert_key(value: &Passable) -> Result<(), PatternError> {
    check_key(value, Checker::Assert)
        .map_err(|m| PatternError::WellFormedness(m.into_message()))
}

fn check_key_at(value: &Passable, checker: Checker, depth: usize) -> Check {
    if depth > MAX_KEY_DEPTH {
        return checker.fail(|| format!("Key nesting exceeds max depth {MAX_KEY_DEPTH}"));
    }
    match value {
        Passable::Undefined
        | Passable::Null
        | Passable::Boolean(_)
        | Passable::Number(_)
        | Passable::BigInt(_)
        | Passable::String(_)
        | Passable::Symbol(_)
        | Passable::Remotable(_) => Ok(()),
        Passable::Promise(_) | Passable::Error(_) => {
            checker.fail(|| format!("A {:?} cannot be a key", value.pass_style().name()))
        }
        Passable::CopyArray(items) => items.iter().enumerate().try_for_each(|(i, item)| {
            labeled(check_key_at(item, checker, depth + 1), Some(&Label::Index(i)))
        }),
        Passable::CopyRecord(record) => record.iter().try_for_each(|(name, item)| {
            labeled(check_key_at(item, checker, depth + 1), Some(&Label::from(name)))
        }),
        Passable::Tagged(tagged) => match tagged.tag() {
            COPY_SET_TAG => check_set_payload(tagged.payload(), checker, depth + 1),
            COPY_BAG_TAG => check_bag_payload(tagged.payload(), checker, depth + 1),
            COPY_MAP_TAG => check_map_payload(tagged.payload(), checker, depth + 1, true),
            tag => checker.fail(|| format!("A passable tagged {tag:?} is not a key: {value}")),
        },
    }
}

/// Whether a value is a scalar key: a primitive or a remotable.
#[must_use]
pub fn is_scalar_key(value: &Passable) -> bool {
    check_scalar_key(value, Checker::Probe).is_ok()
}

/// Check that a value is a scalar key.
pub fn check_scalar_key(value: &Passable, checker: Checker) -> Check {
    let style = value.pass_style();
    checker.require(
        style.is_primitive() || matches!(value, Passable::Remotable(_)),
        || format!("A {:?} cannot be a scalar key: {value}", style.name()),
    )
}

// =============================================================================
// KEY COLLECTION INVARIANTS
// =============================================================================

/// Check the payload of a `copySet`.
pub fn check_copy_set(tagged: &CopyTagged, checker: Checker) -> Check {
    check_set_payload(tagged.payload(), checker, 0)
}

/// Check the payload of a `copyBag`.
pub fn check_copy_bag(tagged: &CopyTagged, checker: Checker) -> Check {
    check_bag_payload(tagged.payload(), checker, 0)
}

/// Check the payload of a `copyMap`. Values may be any passable.
pub fn check_copy_map(tagged: &CopyTagged, checker: Checker) -> Check {
    check_map_payload(tagged.payload(), checker, 0, false)
}

fn check_set_payload(payload: &Passable, checker: Checker, depth: usize) -> Check {
    let Some(elements) = payload.as_array() else {
        return checker.fail(|| format!("The payload of a copySet must be a copyArray: {payload}"));
    };
    for (i, element) in elements.iter().enumerate() {
        labeled(check_key_at(element, checker, depth), Some(&Label::Index(i)))?;
    }
    check_set_order(elements, checker, "copySet")
}

/// Elements must be in descending rank order with no key-equal pair.
fn check_set_order(elements: &[Passable], checker: Checker, what: &str) -> Check {
    let mut group_start = 0;
    for i in 1..elements.len() {
        match compare_anti_rank(&elements[i - 1], &elements[i]) {
            Ordering::Less => group_start = i,
            Ordering::Equal => {
                if let Some(dup) = elements[group_start..i]
                    .iter()
                    .find(|prior| keys_equal(prior, &elements[i]))
                {
                    return checker.fail(|| format!("{what} has duplicate keys: {dup}"));
                }
            }
            Ordering::Greater => {
                return checker.fail(|| {
                    format!("{what} elements must be sorted in reverse rank order: {}", elements[i])
                });
            }
        }
    }
    Ok(())
}

fn check_bag_payload(payload: &Passable, checker: Checker, depth: usize) -> Check {
    let Some(entries) = payload.as_array() else {
        return checker.fail(|| format!("The payload of a copyBag must be a copyArray: {payload}"));
    };
    let mut keys = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let label = Label::Index(i);
        let Some([key, count]) = entry.as_array().map(CopyArray::as_slice) else {
            return labeled(
                checker.fail(|| format!("Each copyBag entry must be a [key, count] pair: {entry}")),
                Some(&label),
            );
        };
        labeled(check_key_at(key, checker, depth), Some(&label))?;
        let positive = count.as_bigint().is_some_and(|c| c.sign() == Sign::Plus);
        labeled(
            checker.require(positive, || format!("copyBag counts must be positive bigints: {count}")),
            Some(&label),
        )?;
        keys.push(key.clone());
    }
    check_set_order(&keys, checker, "copyBag")
}

fn check_map_payload(payload: &Passable, checker: Checker, depth: usize, values_are_keys: bool) -> Check {
    let parts = payload.as_record().and_then(|record| {
        if record.len() != 2 {
            return None;
        }
        Some((record.get("keys")?.as_array()?, record.get("values")?.as_array()?))
    });
    let Some((keys, values)) = parts else {
        return checker.fail(|| {
            format!("The payload of a copyMap must be a record of keys and values arrays: {payload}")
        });
    };
    checker.require(keys.len() == values.len(), || {
        format!("copyMap keys and values must have the same length: {payload}")
    })?;
    for (i, key) in keys.iter().enumerate() {
        labeled(check_key_at(key, checker, depth), Some(&Label::from(format!("keys[{i}]"))))?;
    }
    check_set_order(keys, checker, "copyMap")?;
    if values_are_keys {
        for (i, value) in values.iter().enumerate() {
            labeled(
                check_key_at(value, checker, depth),
                Some(&Label::from(format!("values[{i}]"))),
            )?;
        }
    }
    Ok(())
}

// =============================================================================
// KEY COLLECTION CONSTRUCTORS
// =============================================================================

fn sort_unique(mut entries: Vec<(Passable, Passable)>, what: &str) -> Result<Vec<(Passable, Passable)>, PatternError> {
    for (key, _) in &entries {
        assert_key(key)?;
    }
    entries.sort_by(|a, b| compare_anti_rank(&a.0, &b.0));
    let keys: Vec<Passable> = entries.iter().map(|(k, _)| k.clone()).collect();
    check_set_order(&keys, Checker::Assert, what)
        .map_err(|m| PatternError::WellFormedness(m.into_message()))?;
    Ok(entries)
}

/// Build a `copySet` from keys. Duplicates are an error.
pub fn make_copy_set(elements: impl IntoIterator<Item = Passable>) -> Result<Passable, PatternError> {
    let entries = sort_unique(elements.into_iter().map(|e| (e, Passable::Undefined)).collect(), "copySet")?;
    Ok(Passable::tagged(COPY_SET_TAG, Passable::array(entries.into_iter().map(|(k, _)| k))))
}

/// Build a `copyBag` from `(key, count)` entries. Duplicate keys and
/// non-positive counts are errors.
pub fn make_copy_bag(entries: impl IntoIterator<Item = (Passable, BigInt)>) -> Result<Passable, PatternError> {
    let mut pairs = Vec::new();
    for (key, count) in entries {
        if count.sign() != Sign::Plus {
            return Err(PatternError::WellFormedness(format!(
                "copyBag counts must be positive bigints: {count}n"
            )));
        }
        pairs.push((key, Passable::BigInt(count)));
    }
    let pairs = sort_unique(pairs, "copyBag")?;
    Ok(Passable::tagged(
        COPY_BAG_TAG,
        Passable::array(pairs.into_iter().map(|(k, c)| Passable::array([k, c]))),
    ))
}

/// Build a `copyMap` from `(key, value)` entries. Duplicate keys are an error.
pub fn make_copy_map(entries: impl IntoIterator<Item = (Passable, Passable)>) -> Result<Passable, PatternError> {
    let pairs = sort_unique(entries.into_iter().collect(), "copyMap")?;
    let (keys, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
    Ok(Passable::tagged(
        COPY_MAP_TAG,
        Passable::record([("keys", Passable::array(keys)), ("values", Passable::array(values))]),
    ))
}

/// The keys and values arrays of a well-formed `copyMap`.
#[must_use]
pub fn copy_map_parts(map: &CopyTagged) -> Option<(&CopyArray, &CopyArray)> {
    let record = map.payload().as_record()?;
    Some((record.get("keys")?.as_array()?, record.get("values")?.as_array()?))
}

/// The keys of a well-formed `copyMap`, as a `copySet`.
#[must_use]
pub fn copy_map_key_set(map: &CopyTagged) -> Option<Passable> {
    let (keys, _) = copy_map_parts(map)?;
    Some(Passable::tagged(COPY_SET_TAG, Passable::CopyArray(keys.clone())))
}

/// Find a key in keys sorted by descending rank.
pub(crate) fn find_sorted_key(sorted: &[Passable], key: &Passable) -> Option<usize> {
    let start = sorted.partition_point(|k| compare_rank(k, key) == Ordering::Greater);
    sorted[start..]
        .iter()
        .take_while(|k| compare_rank(k, key) == Ordering::Equal)
        .position(|k| keys_equal(k, key))
        .map(|offset| start + offset)
}

// =============================================================================
// KEY COMPARISON
// =============================================================================

/// Compare two keys. `None` means incommensurate, or that an operand is not
/// a key.
#[must_use]
pub fn compare_keys(left: &Passable, right: &Passable) -> Option<Ordering> {
    if !is_key(left) || !is_key(right) {
        return None;
    }
    compare_keys_at(left, right, 0)
}

/// Equality of values already known to be keys.
pub(crate) fn keys_equal(left: &Passable, right: &Passable) -> bool {
    compare_keys_at(left, right, 0) == Some(Ordering::Equal)
}

fn compare_keys_at(left: &Passable, right: &Passable, depth: usize) -> Option<Ordering> {
    if depth > MAX_KEY_DEPTH || left.pass_style() != right.pass_style() {
        return None;
    }
    match (left, right) {
        (Passable::Number(a), Passable::Number(b)) => match (a.is_nan(), b.is_nan()) {
            (true, true) => Some(Ordering::Equal),
            (false, false) => Some(compare_numbers(*a, *b)),
            _ => None,
        },
        (Passable::Remotable(a), Passable::Remotable(b)) => a.same(b).then_some(Ordering::Equal),
        (Passable::CopyArray(a), Passable::CopyArray(b)) => {
            for (l, r) in a.iter().zip(b.iter()) {
                match compare_keys_at(l, r, depth + 1) {
                    Some(Ordering::Equal) => {}
                    other => return other,
                }
            }
            Some(a.len().cmp(&b.len()))
        }
        (Passable::CopyRecord(a), Passable::CopyRecord(b)) => {
            if !a.names().eq(b.names()) {
                return None;
            }
            // Pareto order: every property must agree in direction.
            let mut result = Ordering::Equal;
            for (l, r) in a.values().zip(b.values()) {
                let comp = compare_keys_at(l, r, depth + 1)?;
                if comp != Ordering::Equal {
                    if result == Ordering::Equal {
                        result = comp;
                    } else if result != comp {
                        return None;
                    }
                }
            }
            Some(result)
        }
        (Passable::Tagged(a), Passable::Tagged(b)) => {
            if a.tag() != b.tag() {
                return None;
            }
            match a.tag() {
                COPY_SET_TAG => {
                    let (sa, sb) = (a.payload().as_array()?, b.payload().as_array()?);
                    inclusion_order(set_includes(sb, sa), set_includes(sa, sb))
                }
                COPY_BAG_TAG => {
                    let (ba, bb) = (a.payload().as_array()?, b.payload().as_array()?);
                    inclusion_order(bag_includes(bb, ba), bag_includes(ba, bb))
                }
                COPY_MAP_TAG => maps_equal(a, b).then_some(Ordering::Equal),
                _ => None,
            }
        }
        (Passable::Promise(_) | Passable::Error(_), _) => None,
        _ => Some(compare_rank(left, right)),
    }
}

/// Order from two inclusion tests: `a ⊆ b` and `b ⊆ a`.
fn inclusion_order(a_in_b: bool, b_in_a: bool) -> Option<Ordering> {
    match (a_in_b, b_in_a) {
        (true, true) => Some(Ordering::Equal),
        (true, false) => Some(Ordering::Less),
        (false, true) => Some(Ordering::Greater),
        (false, false) => None,
    }
}

/// Whether every element of `subset` is key-equal to an element of `superset`.
fn set_includes(superset: &[Passable], subset: &[Passable]) -> bool {
    subset.len() <= superset.len() && subset.iter().all(|x| find_sorted_key(superset, x).is_some())
}

fn bag_entry(entry: &Passable) -> Option<(&Passable, &BigInt)> {
    match entry.as_array()?.as_slice() {
        [key, count] => Some((key, count.as_bigint()?)),
        _ => None,
    }
}

/// Multiset inclusion over bag payloads.
fn bag_includes(superset: &[Passable], subset: &[Passable]) -> bool {
    let super_keys: Vec<Passable> = superset
        .iter()
        .filter_map(|e| bag_entry(e).map(|(k, _)| k.clone()))
        .collect();
    subset.iter().all(|entry| {
        let Some((key, count)) = bag_entry(entry) else {
            return false;
        };
        find_sorted_key(&super_keys, key)
            .and_then(|i| bag_entry(&superset[i]))
            .is_some_and(|(_, super_count)| super_count >= count)
    })
}

fn maps_equal(a: &CopyTagged, b: &CopyTagged) -> bool {
    let (Some((ka, va)), Some((kb, vb))) = (copy_map_parts(a), copy_map_parts(b)) else {
        return false;
    };
    ka.len() == kb.len()
        && ka.iter().zip(va.iter()).all(|(key, value)| {
            find_sorted_key(kb, key).is_some_and(|j| keys_equal(value, &vb[j]))
        })
}

/// `left == right` as keys.
#[must_use]
pub fn key_eq(left: &Passable, right: &Passable) -> bool {
    compare_keys(left, right) == Some(Ordering::Equal)
}

/// `left < right` as keys.
#[must_use]
pub fn key_lt(left: &Passable, right: &Passable) -> bool {
    compare_keys(left, right) == Some(Ordering::Less)
}

/// `left <= right` as keys.
#[must_use]
pub fn key_lte(left: &Passable, right: &Passable) -> bool {
    matches!(compare_keys(left, right), Some(Ordering::Less | Ordering::Equal))
}

/// `left > right` as keys.
#[must_use]
pub fn key_gt(left: &Passable, right: &Passable) -> bool {
    compare_keys(left, right) == Some(Ordering::Greater)
}

/// `left >= right` as keys.
#[must_use]
pub fn key_gte(left: &Passable, right: &Passable) -> bool {
    matches!(compare_keys(left, right), Some(Ordering::Greater | Ordering::Equal))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: i64) -> Passable {
        Passable::bigint(v)
    }

    #[test]
    fn keys_exclude_promises_and_errors_at_depth() {
        assert!(is_key(&Passable::array([n(1), Passable::from("a")])));
        assert!(is_key(&Passable::remotable("Purse")));
        assert!(!is_key(&Passable::array([Passable::promise()])));
        assert!(!is_key(&Passable::record([("e", Passable::error("boom"))])));
        assert!(!is_key(&Passable::tagged("match:any", Passable::Undefined)));
    }

    #[test]
    fn check_key_labels_the_offending_position() {
        let value = Passable::record([("xs", Passable::array([n(1), Passable::promise()]))]);
        let err = check_key(&value, Checker::Assert).expect_err("not a key");
        assert_eq!(err.message(), Some("xs: 1: A \"promise\" cannot be a key"));
    }

    #[test]
    fn scalar_keys() {
        assert!(is_scalar_key(&n(3)));
        assert!(is_scalar_key(&Passable::remotable("R")));
        assert!(!is_scalar_key(&Passable::array([])));
    }

    #[test]
    fn copy_set_is_sorted_and_deduplicated() {
        let set = make_copy_set([n(1), n(3), n(2)]).expect("set");
        let payload = set.as_tagged().expect("tagged").payload().clone();
        let items: Vec<String> = payload.as_array().expect("array").iter().map(|p| p.to_string()).collect();
        assert_eq!(items, vec!["3n", "2n", "1n"]);
        assert!(is_key(&set));
        assert!(make_copy_set([n(1), n(1)]).is_err());
    }

    #[test]
    fn copy_set_rejects_unsorted_payloads() {
        let bogus = Passable::tagged(COPY_SET_TAG, Passable::array([n(1), n(2)]));
        assert!(!is_key(&bogus));
    }

    #[test]
    fn remotables_in_sets_tie_but_are_distinct() {
        let a = Passable::remotable("A");
        let b = Passable::remotable("B");
        let set = make_copy_set([a.clone(), b]).expect("set");
        assert!(is_key(&set));
        assert!(make_copy_set([a.clone(), a]).is_err());
    }

    #[test]
    fn copy_bag_requires_positive_counts() {
        assert!(make_copy_bag([(Passable::from("a"), BigInt::from(2))]).is_ok());
        assert!(make_copy_bag([(Passable::from("a"), BigInt::from(0))]).is_err());
    }

    #[test]
    fn copy_map_values_must_be_keys_for_key_maps() {
        let key_map = make_copy_map([(Passable::from("a"), n(1))]).expect("map");
        assert!(is_key(&key_map));
        let pattern_map = make_copy_map([(Passable::from("a"), Passable::promise())]).expect("map");
        assert!(!is_key(&pattern_map));
        assert!(check_copy_map(pattern_map.as_tagged().expect("tagged"), Checker::Probe).is_ok());
    }

    #[test]
    fn primitive_key_order() {
        assert!(key_lt(&n(-1), &n(10)));
        assert!(key_gte(&n(10), &n(10)));
        assert!(!key_lte(&Passable::from("5"), &n(10)));
        assert!(key_eq(&Passable::number(-0.0), &Passable::number(0.0)));
        assert!(key_eq(&Passable::number(f64::NAN), &Passable::number(f64::NAN)));
        assert_eq!(compare_keys(&Passable::number(f64::NAN), &Passable::number(1.0)), None);
    }

    #[test]
    fn remotables_equal_only_by_identity() {
        let r = Passable::remotable("R");
        assert!(key_eq(&r, &r.clone()));
        assert!(!key_eq(&r, &Passable::remotable("R")));
        assert_eq!(compare_keys(&r, &Passable::remotable("R")), None);
    }

    #[test]
    fn records_use_pareto_order() {
        let a = Passable::record([("x", n(1)), ("y", n(1))]);
        let b = Passable::record([("x", n(2)), ("y", n(1))]);
        let c = Passable::record([("x", n(0)), ("y", n(2))]);
        assert_eq!(compare_keys(&a, &b), Some(Ordering::Less));
        assert_eq!(compare_keys(&b, &c), None);
        let d = Passable::record([("z", n(1))]);
        assert_eq!(compare_keys(&a, &d), None);
    }

    #[test]
    fn sets_order_by_inclusion() {
        let small = make_copy_set([n(1)]).expect("set");
        let big = make_copy_set([n(1), n(2)]).expect("set");
        let other = make_copy_set([n(3)]).expect("set");
        assert_eq!(compare_keys(&small, &big), Some(Ordering::Less));
        assert_eq!(compare_keys(&big, &small), Some(Ordering::Greater));
        assert_eq!(compare_keys(&small, &other), None);
    }

    #[test]
    fn bags_order_by_multiset_inclusion() {
        let one = make_copy_bag([(Passable::from("a"), BigInt::from(1))]).expect("bag");
        let two = make_copy_bag([(Passable::from("a"), BigInt::from(2))]).expect("bag");
        assert_eq!(compare_keys(&one, &two), Some(Ordering::Less));
        assert!(key_eq(&two, &two.clone()));
    }

    #[test]
    fn maps_compare_only_by_equality() {
        let a = make_copy_map([(Passable::from("k"), n(1))]).expect("map");
        let b = make_copy_map([(Passable::from("k"), n(1))]).expect("map");
        let c = make_copy_map([(Passable::from("k"), n(2))]).expect("map");
        assert!(key_eq(&a, &b));
        assert_eq!(compare_keys(&a, &c), None);
    }

    #[test]
    fn map_key_set_is_a_set() {
        let map = make_copy_map([(Passable::from("b"), n(1)), (Passable::from("a"), n(2))]).expect("map");
        let keys = copy_map_key_set(map.as_tagged().expect("tagged")).expect("keys");
        assert!(key_eq(&keys, &make_copy_set([Passable::from("a"), Passable::from("b")]).expect("set")));
    }
}
