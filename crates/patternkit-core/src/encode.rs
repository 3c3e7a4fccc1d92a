//! # Sortable Encoding
//!
//! Maps values to strings whose byte order agrees with rank order, so an
//! ordered index can be range-scanned with a `RankCover`.
//!
//! An encoder may decline a value by returning `None`; covers then fall back
//! to the whole range of the value's pass style.

use crate::passable::Passable;
use crate::rank::canonical_number;
use num_bigint::{BigInt, Sign};

/// Largest digit count a bigint encoding can carry.
const MAX_BIGINT_DIGITS: usize = 9999;

/// Bit length above which a bigint certainly has more than
/// `MAX_BIGINT_DIGITS` decimal digits.
const MAX_BIGINT_BITS: u64 = 33_220;

/// Maps a value to a sortable string, or declines.
pub trait SortableEncoder {
    fn encode(&self, value: &Passable) -> Option<String>;
}

impl<F> SortableEncoder for F
where
    F: Fn(&Passable) -> Option<String>,
{
    fn encode(&self, value: &Passable) -> Option<String> {
        self(value)
    }
}

/// Encodes scalars exactly; declines containers and references.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankEncoder;

impl SortableEncoder for RankEncoder {
    fn encode(&self, value: &Passable) -> Option<String> {
        match value {
            Passable::Null => Some("v".to_owned()),
            Passable::Undefined => Some("z".to_owned()),
            Passable::Boolean(b) => Some(format!("b{b}")),
            Passable::Number(n) => Some(format!("f{:016x}", sortable_bits(*n))),
            Passable::BigInt(n) => encode_bigint(n),
            Passable::String(s) => Some(format!("s{s}")),
            Passable::Symbol(name) => Some(format!("y{name}")),
            _ => None,
        }
    }
}

/// Double bits rearranged so unsigned order is numeric order.
fn sortable_bits(n: f64) -> u64 {
    let bits = canonical_number(n).to_bits();
    if bits >> 63 == 1 { !bits } else { bits | (1 << 63) }
}

/// `p` + digit count + digits for non-negatives; `n` + complemented count +
/// complemented digits for negatives.
fn encode_bigint(n: &BigInt) -> Option<String> {
    if n.bits() > MAX_BIGINT_BITS {
        return None;
    }
    let digits = n.magnitude().to_string();
    if digits.len() > MAX_BIGINT_DIGITS {
        return None;
    }
    if n.sign() == Sign::Minus {
        let complement: String = digits
            .bytes()
            .map(|d| char::from(b'9' - (d - b'0')))
            .collect();
        Some(format!("n{:04}{complement}", MAX_BIGINT_DIGITS - digits.len()))
    } else {
        Some(format!("p{:04}{digits}", digits.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::compare_rank;
    use std::cmp::Ordering;

    fn enc(v: &Passable) -> String {
        RankEncoder.encode(v).expect("scalar encodes")
    }

    #[test]
    fn numbers_encode_in_rank_order() {
        let ordered = [f64::NEG_INFINITY, -2.5, -0.0, 1e-300, 3.0, f64::INFINITY, f64::NAN];
        for pair in ordered.windows(2) {
            let (a, b) = (Passable::number(pair[0]), Passable::number(pair[1]));
            assert!(enc(&a) < enc(&b), "{a} < {b}");
        }
        assert_eq!(enc(&Passable::number(-0.0)), enc(&Passable::number(0.0)));
    }

    #[test]
    fn bigints_encode_in_rank_order() {
        let ordered = [-1000, -999, -10, -1, 0, 1, 9, 10, 12345];
        for pair in ordered.windows(2) {
            let (a, b) = (Passable::bigint(pair[0]), Passable::bigint(pair[1]));
            assert!(enc(&a) < enc(&b), "{a} < {b}");
        }
    }

    #[test]
    fn encodings_agree_with_rank_across_styles() {
        let values = [
            Passable::from(false),
            Passable::number(7.0),
            Passable::bigint(-3),
            Passable::from("abc"),
            Passable::Null,
            Passable::symbol("sym"),
            Passable::Undefined,
        ];
        for a in &values {
            for b in &values {
                assert_eq!(compare_rank(a, b), enc(a).cmp(&enc(b)), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn containers_and_references_decline() {
        assert_eq!(RankEncoder.encode(&Passable::array([])), None);
        assert_eq!(RankEncoder.encode(&Passable::remotable("R")), None);
        assert_eq!(RankEncoder.encode(&Passable::promise()), None);
    }

    #[test]
    fn closures_are_encoders() {
        let only_strings = |v: &Passable| v.as_str().map(|s| format!("s{s}"));
        assert_eq!(only_strings.encode(&Passable::from("x")).as_deref(), Some("sx"));
        assert_eq!(only_strings.encode(&Passable::Null), None);
        assert_eq!(enc(&Passable::from("x")).cmp(&"sx".to_owned()), Ordering::Equal);
    }
}
