//! Sized scalar matchers: `bigint`, `nat`, `string`, `symbol`.
//!
//! Each payload is `[]` or `[limits]`.

use super::{MatchHelper, check_is_well_formed_with_limit, split_limits, utf16_len};
use crate::check::{Check, Checker};
use crate::encode::SortableEncoder;
use crate::kit::PatternKit;
use crate::passable::Passable;
use crate::rank::RankCover;
use crate::types::{MatcherTag, PassStyle};
use num_bigint::{BigInt, Sign};

/// Decimal digits in the magnitude of `n`; zero has none.
fn decimal_digits(n: &BigInt, limit: u64) -> u64 {
    if n.sign() == Sign::NoSign {
        return 0;
    }
    // 2^(4d) > 10^d, so more bits than this cannot fit in `limit` digits.
    if n.bits() > limit.saturating_mul(4) {
        return limit.saturating_add(1);
    }
    n.magnitude().to_string().len() as u64
}

pub(super) fn check_decimal_digits_limit(specimen: &Passable, limit: u64, checker: Checker) -> Check {
    let within = specimen.as_bigint().is_some_and(|n| decimal_digits(n, limit) <= limit);
    checker.require(within, || format!("bigint {specimen} must not have more than {limit} digits"))
}

fn well_formed(kit: &PatternKit, tag: MatcherTag, payload: &Passable, checker: Checker) -> Check {
    check_is_well_formed_with_limit(kit, payload, &[], checker, tag)
}

/// Any bigint within the digit limit.
pub(super) struct BigIntHelper;

impl MatchHelper for BigIntHelper {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        let (_, limits) = split_limits(kit, payload, 0);
        kit.check_kind(specimen, PassStyle::BigInt.name(), checker)?;
        check_decimal_digits_limit(specimen, limits.decimal_digits_limit, checker)
    }

    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        well_formed(kit, MatcherTag::BigInt, payload, checker)
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::for_style(PassStyle::BigInt)
    }
}

/// A non-negative bigint within the digit limit.
pub(super) struct Nat;

impl MatchHelper for Nat {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        let (_, limits) = split_limits(kit, payload, 0);
        kit.check_kind(specimen, PassStyle::BigInt.name(), checker)?;
        let non_negative = specimen.as_bigint().is_some_and(|n| n.sign() != Sign::Minus);
        checker.require(non_negative, || format!("{specimen} - Must be non-negative"))?;
        check_decimal_digits_limit(specimen, limits.decimal_digits_limit, checker)
    }

    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        well_formed(kit, MatcherTag::Nat, payload, checker)
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::for_style(PassStyle::BigInt)
    }
}

/// A string within the length limit, counted in UTF-16 units.
pub(super) struct StringHelper;

impl MatchHelper for StringHelper {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        let (_, limits) = split_limits(kit, payload, 0);
        kit.check_kind(specimen, PassStyle::String.name(), checker)?;
        let limit = limits.string_length_limit;
        checker.require(specimen.as_str().is_some_and(|s| utf16_len(s) <= limit), || {
            format!("string {specimen} must not be bigger than {limit}")
        })
    }

    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        well_formed(kit, MatcherTag::String, payload, checker)
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::for_style(PassStyle::String)
    }
}

/// A symbol whose name is within the length limit.
pub(super) struct Symbol;

impl MatchHelper for Symbol {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        let (_, limits) = split_limits(kit, payload, 0);
        kit.check_kind(specimen, PassStyle::Symbol.name(), checker)?;
        let Passable::Symbol(name) = specimen else {
            return checker.fail(|| format!("{specimen} - Must be a symbol"));
        };
        let limit = limits.symbol_name_length_limit;
        checker.require(utf16_len(name) <= limit, || {
            format!("Symbol name {name:?} must not be bigger than {limit}")
        })
    }

    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        well_formed(kit, MatcherTag::Symbol, payload, checker)
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::for_style(PassStyle::Symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder as m;
    use crate::limits::Limits;

    #[test]
    fn digit_counts() {
        assert_eq!(decimal_digits(&BigInt::from(0), 100), 0);
        assert_eq!(decimal_digits(&BigInt::from(-999), 100), 3);
        assert_eq!(decimal_digits(&BigInt::from(1000), 100), 4);
        let huge = BigInt::from(10).pow(500);
        assert_eq!(decimal_digits(&huge, 100), 101);
    }

    #[test]
    fn bigint_digit_limit() {
        let kit = PatternKit::default();
        let small = m::bigint_with(&Limits::new().decimal_digits(2));
        assert!(kit.matches(&Passable::bigint(99), &small));
        let err = kit.must_match(&Passable::bigint(-100), &small, None).expect_err("too long");
        assert_eq!(err.message(), "bigint -100n must not have more than 2 digits");
        assert!(kit.matches(&Passable::bigint(BigInt::from(10).pow(99)), &m::bigint()));
        assert!(!kit.matches(&Passable::bigint(BigInt::from(10).pow(100)), &m::bigint()));
    }

    #[test]
    fn nat_rejects_negatives() {
        let kit = PatternKit::default();
        assert!(kit.matches(&Passable::bigint(0), &m::nat()));
        let err = kit.must_match(&Passable::bigint(-1), &m::nat(), None).expect_err("negative");
        assert_eq!(err.message(), "-1n - Must be non-negative");
        assert!(!kit.matches(&Passable::number(1.0), &m::nat()));
    }

    #[test]
    fn string_length_limit() {
        let kit = PatternKit::default();
        let short = m::string_with(&Limits::new().string_length(3));
        assert!(kit.matches(&Passable::from("abc"), &short));
        let err = kit.must_match(&Passable::from("abcd"), &short, None).expect_err("too long");
        assert_eq!(err.message(), "string \"abcd\" must not be bigger than 3");
    }

    #[test]
    fn symbol_name_limit() {
        let kit = PatternKit::default();
        let short = m::symbol_with(&Limits::new().symbol_name_length(2));
        assert!(kit.matches(&Passable::symbol("ab"), &short));
        assert!(!kit.matches(&Passable::symbol("abc"), &short));
        assert!(!kit.matches(&Passable::from("ab"), &short));
    }

    #[test]
    fn kit_limits_are_the_base() {
        let kit = PatternKit::new(crate::kit::KitConfig {
            limits: crate::limits::AllLimits {
                string_length_limit: 1,
                ..Default::default()
            },
            ..Default::default()
        });
        assert!(!kit.matches(&Passable::from("ab"), &m::string()));
        let wider = m::string_with(&Limits::new().string_length(5));
        assert!(kit.matches(&Passable::from("ab"), &wider));
    }
}
