//! `any`, `and`, `or`, `not`.

use super::{MatchHelper, check_undefined_payload};
use crate::check::{Check, Checker};
use crate::encode::SortableEncoder;
use crate::kit::PatternKit;
use crate::passable::{Passable, Pattern};
use crate::rank::RankCover;
use crate::types::MatcherTag;

/// Accepts everything.
pub(super) struct Any;

impl MatchHelper for Any {
    fn check_matches(&self, _kit: &PatternKit, _specimen: &Passable, _payload: &Passable, _checker: Checker) -> Check {
        Ok(())
    }

    fn check_is_well_formed(&self, _kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        check_undefined_payload(MatcherTag::Any, payload, checker)
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::full()
    }
}

/// Sub-patterns of `and`/`or`: an array of at least two patterns.
fn check_sub_patterns(kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
    let Some(patterns) = payload.as_array() else {
        return checker.fail(|| format!("Needs array of sub-patterns: {payload}"));
    };
    checker.require(patterns.len() >= 2, || "Must have at least two sub-patterns".to_owned())?;
    patterns.iter().try_for_each(|p| kit.check_pattern(p, checker))
}

fn sub_covers<'a>(
    kit: &'a PatternKit,
    payload: &'a Passable,
    encoder: &'a dyn SortableEncoder,
) -> impl Iterator<Item = RankCover> + 'a {
    payload
        .as_array()
        .into_iter()
        .flat_map(|a| a.iter())
        .map(move |p| kit.get_rank_cover(p, encoder))
}

/// `undefined` itself, or `m::undefined()`.
fn matches_only_undefined(pattern: &Pattern) -> bool {
    match pattern {
        Passable::Undefined => true,
        Passable::Tagged(t) => t.tag() == MatcherTag::Kind.tag() && t.payload().as_str() == Some("undefined"),
        _ => false,
    }
}

/// Every conjunct must match.
///
/// Probes stop at the first failure. Diagnostic checks run every conjunct
/// and report all failures together.
pub(super) struct And;

impl MatchHelper for And {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        let patterns = payload.as_array().map_or(&[][..], |a| a.as_slice());
        if checker.is_probe() {
            return patterns.iter().try_for_each(|p| kit.check_matches(specimen, p, checker, None));
        }
        let failures: Vec<String> = patterns
            .iter()
            .filter_map(|p| kit.check_matches(specimen, p, checker, None).err())
            .map(|m| m.into_message())
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            checker.fail(|| failures.join("; "))
        }
    }

    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        check_sub_patterns(kit, payload, checker)
    }

    fn rank_cover(&self, kit: &PatternKit, payload: &Passable, encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::intersect(sub_covers(kit, payload, encoder))
    }
}

/// Some disjunct must match.
pub(super) struct Or;

impl MatchHelper for Or {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        let patterns = payload.as_array().map_or(&[][..], |a| a.as_slice());
        if patterns.is_empty() {
            return checker.fail(|| format!("{specimen} - no pattern disjuncts to match: {payload}"));
        }
        // An optional pattern reports what the present value failed.
        if let [a, b] = patterns {
            let present = if matches_only_undefined(a) {
                Some(b)
            } else if matches_only_undefined(b) {
                Some(a)
            } else {
                None
            };
            if let Some(present) = present {
                if specimen.is_undefined() {
                    return Ok(());
                }
                return kit.check_matches(specimen, present, checker, None);
            }
        }
        if patterns.iter().any(|p| kit.matches(specimen, p)) {
            return Ok(());
        }
        checker.fail(|| format!("{specimen} - Must match one of {payload}"))
    }

    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        check_sub_patterns(kit, payload, checker)
    }

    fn rank_cover(&self, kit: &PatternKit, payload: &Passable, encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::union(sub_covers(kit, payload, encoder))
    }
}

/// The sub-pattern must not match.
pub(super) struct Not;

impl MatchHelper for Not {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        checker.require(!kit.matches(specimen, payload), || {
            format!("{specimen} - Must fail negated pattern: {payload}")
        })
    }

    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        kit.check_pattern(payload, checker)
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::full()
    }
}

#[cfg(test)]
mod tests {
    use crate::builder as m;
    use crate::encode::RankEncoder;
    use crate::kit::PatternKit;
    use crate::passable::Passable;
    use crate::rank::RankCover;

    #[test]
    fn and_reports_every_failure_when_asserting() {
        let kit = PatternKit::default();
        let both = m::and([m::string(), m::gte(Passable::bigint(0)).expect("gte")]).expect("and");
        assert!(!kit.matches(&Passable::bigint(-1), &both));
        let err = kit.must_match(&Passable::bigint(-1), &both, None).expect_err("fails");
        assert_eq!(err.message(), "bigint -1n - Must be a string; -1n - Must be >= 0n");
    }

    #[test]
    fn or_needs_one_match() {
        let kit = PatternKit::default();
        let either = m::or([m::string(), m::number()]).expect("or");
        assert!(kit.matches(&Passable::from("a"), &either));
        assert!(kit.matches(&Passable::number(1.0), &either));
        let err = kit.must_match(&Passable::Null, &either, None).expect_err("neither");
        assert!(err.message().starts_with("null - Must match one of"));
    }

    #[test]
    fn optional_reports_the_present_value() {
        let kit = PatternKit::default();
        let optional = m::opt(m::string()).expect("opt");
        assert!(kit.matches(&Passable::Undefined, &optional));
        let err = kit.must_match(&Passable::number(1.0), &optional, None).expect_err("not a string");
        assert_eq!(err.message(), "number 1 - Must be a string");
    }

    #[test]
    fn not_inverts() {
        let kit = PatternKit::default();
        let not_string = m::not(m::string()).expect("not");
        assert!(kit.matches(&Passable::Null, &not_string));
        assert!(!kit.matches(&Passable::from("s"), &not_string));
    }

    #[test]
    fn covers_combine() {
        let kit = PatternKit::default();
        let a = Passable::from("a");
        let b = Passable::bigint(3);
        let either = m::or([a.clone(), b.clone()]).expect("or");
        let expected = RankCover::union([kit.get_rank_cover(&a, &RankEncoder), kit.get_rank_cover(&b, &RankEncoder)]);
        assert_eq!(kit.get_rank_cover(&either, &RankEncoder), expected);
        let both = m::and([m::string(), m::any()]).expect("and");
        assert_eq!(kit.get_rank_cover(&both, &RankEncoder), RankCover::new("s", "t"));
        assert_eq!(kit.get_rank_cover(&m::any(), &RankEncoder), RankCover::full());
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        let kit = PatternKit::default();
        let single = Passable::tagged("match:or", Passable::array([m::any()]));
        assert!(!kit.is_pattern(&single));
        let any_with_payload = Passable::tagged("match:any", Passable::Null);
        assert!(!kit.is_pattern(&any_with_payload));
    }
}
