//! # Property-Based Tests
//!
//! Invariants of matching and rank covers, checked with proptest.

use patternkit_core::encode::{RankEncoder, SortableEncoder};
use patternkit_core::{Limits, Passable, Pattern, PatternError, PatternKit, RankCover, compare_rank, m};
use proptest::collection::vec;
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

/// Arbitrary text, weighted towards characters that sort at or above `~`.
fn text() -> impl Strategy<Value = String> {
    prop_oneof!["\\PC{0,6}", "[a-z~\u{7f}\u{e9}\u{1f600}]{0,4}"]
}

/// Scalar keys the rank encoder handles exactly.
fn scalar_key() -> impl Strategy<Value = Passable> {
    prop_oneof![
        Just(Passable::Null),
        Just(Passable::Undefined),
        any::<bool>().prop_map(Passable::Boolean),
        (-1_000_000i64..1_000_000).prop_map(|n| Passable::number(n as f64)),
        any::<i64>().prop_map(|n| Passable::bigint(n)),
        text().prop_map(Passable::String),
        text().prop_map(Passable::Symbol),
    ]
}

/// Keys nested up to a few levels of arrays and records.
fn key() -> impl Strategy<Value = Passable> {
    scalar_key().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..4).prop_map(Passable::array),
            vec(("[a-d]", inner), 0..4).prop_map(|entries| Passable::record(entries)),
        ]
    })
}

/// A fixed menu of patterns covering every matcher family.
fn patterns() -> Vec<Pattern> {
    let limits = Limits::new().array_length(2).string_length(3);
    let built: Vec<Result<Pattern, PatternError>> = vec![
        Ok(m::any()),
        Ok(m::scalar()),
        Ok(m::key()),
        Ok(m::string()),
        Ok(m::string_with(&limits)),
        Ok(m::symbol()),
        Ok(m::nat()),
        Ok(m::boolean()),
        m::opt(m::number()),
        m::or([m::string(), m::bigint()]),
        m::gte(Passable::bigint(0)).and_then(|low| m::and([low, m::lte(Passable::bigint(10))?])),
        m::not(m::null()),
        m::gt(Passable::from("m")),
        m::gte(Passable::from("~")),
        m::lt(Passable::from("\u{e9}")),
        m::neq(Passable::Null),
        m::array_of(m::scalar()),
        m::array_of_with(m::any(), &limits),
        m::record_of(m::string(), m::number()),
        m::array_of(m::string()).and_then(|rest| m::split_array(Passable::array([m::any()]), None, Some(rest))),
        m::split_record(Passable::record::<&str>([]), Some(Passable::record([("a", m::scalar())])), Some(m::any())),
        Ok(Passable::array([m::scalar(), m::any()])),
        Ok(Passable::record([("a", m::any())])),
    ];
    built.into_iter().map(|p| p.expect("pattern builds")).collect()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Every key matches itself.
    #[test]
    fn keys_match_themselves(k in key()) {
        let kit = PatternKit::default();
        prop_assert!(kit.matches(&k, &k));
        prop_assert!(kit.must_match(&k, &k, None).is_ok());
    }

    /// Probe and assert checks never disagree.
    #[test]
    fn probe_and_assert_agree(specimen in key(), i in 0usize..32) {
        let kit = PatternKit::default();
        let menu = patterns();
        let pattern = &menu[i % menu.len()];

        let probe = kit.matches(&specimen, pattern);
        let assert = kit.must_match(&specimen, pattern, Some("p"));
        prop_assert_eq!(probe, assert.is_ok());
        if let Err(err) = assert {
            prop_assert!(matches!(err, PatternError::MatchFailure(_)), "{}", err);
            prop_assert!(err.message().starts_with("p: "));
        }
    }

    /// `or` covers the union of its disjuncts, `and` the intersection.
    #[test]
    fn combinator_covers(a in scalar_key(), b in scalar_key(), i in 0usize..32) {
        let kit = PatternKit::default();
        let menu = patterns();
        let p = menu[i % menu.len()].clone();
        let cover = |x: &Pattern| kit.get_rank_cover(x, &RankEncoder);

        let either = m::or([a.clone(), p.clone()]).expect("or");
        prop_assert_eq!(cover(&either), RankCover::union([cover(&a), cover(&p)]));
        let both = m::and([b.clone(), p.clone()]).expect("and");
        prop_assert_eq!(cover(&both), RankCover::intersect([cover(&b), cover(&p)]));
    }

    /// Accepted specimens encode inside the pattern's cover.
    #[test]
    fn covers_hold_matches(specimen in scalar_key(), i in 0usize..32) {
        let kit = PatternKit::default();
        let menu = patterns();
        let pattern = &menu[i % menu.len()];
        if kit.matches(&specimen, pattern) {
            let encoded = RankEncoder.encode(&specimen).expect("scalar encodes");
            prop_assert!(kit.get_rank_cover(pattern, &RankEncoder).contains(&encoded));
        }
    }

    /// Encoding order is rank order for scalars.
    #[test]
    fn encoder_preserves_rank(a in scalar_key(), b in scalar_key()) {
        let ea = RankEncoder.encode(&a).expect("encodes");
        let eb = RankEncoder.encode(&b).expect("encodes");
        prop_assert_eq!(compare_rank(&a, &b), ea.cmp(&eb));
    }

    /// `arrayOf` accepts exactly the arrays within the length limit whose
    /// elements all match.
    #[test]
    fn array_of_length_limit(items in vec(any::<bool>(), 0..8), limit in 0u64..8, poison in any::<bool>()) {
        let kit = PatternKit::default();
        let pattern = m::array_of_with(m::boolean(), &Limits::new().array_length(limit)).expect("arrayOf");
        let mut elements: Vec<Passable> = items.into_iter().map(Passable::Boolean).collect();
        if poison {
            elements.push(Passable::Null);
        }
        let len = elements.len() as u64;
        let specimen = Passable::array(elements);

        prop_assert_eq!(kit.matches(&specimen, &pattern), len <= limit && !poison);
        if len > limit {
            let err = kit.must_match(&specimen, &pattern, None).expect_err("too long");
            prop_assert!(err.message().starts_with("Array length"));
        }
    }
}
