//! # Rank Order and Rank Covers
//!
//! `compare_rank` is a total preorder over all passables, consistent with the
//! sortable encoding: if `a` ranks before `b`, the encoding of `a` (when it
//! exists) sorts before the encoding of `b`.
//!
//! A `RankCover` is a `[lower, upper)` range of encoded strings. Every cover
//! the kit computes is a superset of the encodings a pattern can accept:
//! widening a cover is always safe, narrowing it is not.

use crate::passable::Passable;
use crate::primitives::{COVER_POINT_SUFFIX, FULL_COVER_LOWER, FULL_COVER_UPPER};
use crate::types::PassStyle;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// =============================================================================
// RANK ORDER
// =============================================================================

/// Rank of a pass style: the first character of its encoding prefix.
fn style_rank(style: PassStyle) -> char {
    style.prefixes().chars().next().unwrap_or('{')
}

/// Canonicalize a number for ordering: all NaNs are one NaN, `-0` is `0`.
pub(crate) fn canonical_number(n: f64) -> f64 {
    if n.is_nan() {
        f64::NAN
    } else if n == 0.0 {
        0.0
    } else {
        n
    }
}

/// Compare two numbers by rank. NaN ranks after every other number.
pub(crate) fn compare_numbers(a: f64, b: f64) -> Ordering {
    canonical_number(a).total_cmp(&canonical_number(b))
}

/// Total preorder over passables.
///
/// Ties: remotables, promises, and errors each rank equal among themselves;
/// `-0` and `0` rank equal; all NaNs rank equal.
#[must_use]
pub fn compare_rank(a: &Passable, b: &Passable) -> Ordering {
    let (sa, sb) = (a.pass_style(), b.pass_style());
    if sa != sb {
        return style_rank(sa).cmp(&style_rank(sb));
    }
    match (a, b) {
        (Passable::Boolean(x), Passable::Boolean(y)) => x.cmp(y),
        (Passable::Number(x), Passable::Number(y)) => compare_numbers(*x, *y),
        (Passable::BigInt(x), Passable::BigInt(y)) => x.cmp(y),
        (Passable::String(x), Passable::String(y)) => x.cmp(y),
        (Passable::Symbol(x), Passable::Symbol(y)) => x.cmp(y),
        (Passable::CopyArray(x), Passable::CopyArray(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                let ord = compare_rank(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Passable::CopyRecord(x), Passable::CopyRecord(y)) => {
            let names = x.names().cmp(y.names());
            if names != Ordering::Equal {
                return names;
            }
            for (l, r) in x.values().zip(y.values()) {
                let ord = compare_rank(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        }
        (Passable::Tagged(x), Passable::Tagged(y)) => x
            .tag()
            .cmp(y.tag())
            .then_with(|| compare_rank(x.payload(), y.payload())),
        _ => Ordering::Equal,
    }
}

/// Reverse rank order, used for the canonical order of key collections.
#[must_use]
pub fn compare_anti_rank(a: &Passable, b: &Passable) -> Ordering {
    compare_rank(b, a)
}

// =============================================================================
// RANK COVER
// =============================================================================

/// A `[lower, upper)` range of sortable encodings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RankCover {
    /// Inclusive lower bound.
    pub lower: String,
    /// Exclusive upper bound.
    pub upper: String,
}

impl RankCover {
    #[must_use]
    pub fn new(lower: impl Into<String>, upper: impl Into<String>) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    /// The full encodable range.
    #[must_use]
    pub fn full() -> Self {
        Self::new(FULL_COVER_LOWER, FULL_COVER_UPPER)
    }

    /// The range holding exactly one encoded value (and its extensions).
    #[must_use]
    pub fn point(encoded: &str) -> Self {
        Self::new(encoded, format!("{encoded}{COVER_POINT_SUFFIX}"))
    }

    /// The range holding every encoding of a pass style: from its first
    /// prefix up to the character after its last prefix. The body after a
    /// prefix is unrestricted, so no suffix of the last prefix bounds it.
    #[must_use]
    pub fn for_style(style: PassStyle) -> Self {
        let prefixes = style.prefixes();
        let first = prefixes.chars().next().unwrap_or('{');
        let next = prefixes
            .chars()
            .last()
            .and_then(|last| char::from_u32(u32::from(last) + 1))
            .unwrap_or('{');
        Self::new(first.to_string(), next.to_string())
    }

    /// `[max(lowers), min(uppers))`. The intersection of nothing is full.
    #[must_use]
    pub fn intersect(covers: impl IntoIterator<Item = RankCover>) -> Self {
        covers
            .into_iter()
            .reduce(|acc, c| Self {
                lower: acc.lower.max(c.lower),
                upper: acc.upper.min(c.upper),
            })
            .unwrap_or_else(Self::full)
    }

    /// `[min(lowers), max(uppers))`. The union of nothing is full, which is
    /// wider than needed but never wrong.
    #[must_use]
    pub fn union(covers: impl IntoIterator<Item = RankCover>) -> Self {
        covers
            .into_iter()
            .reduce(|acc, c| Self {
                lower: acc.lower.min(c.lower),
                upper: acc.upper.max(c.upper),
            })
            .unwrap_or_else(Self::full)
    }

    /// Whether an encoded value falls inside the cover.
    #[must_use]
    pub fn contains(&self, encoded: &str) -> bool {
        self.lower.as_str() <= encoded && encoded < self.upper.as_str()
    }

    /// Whether no encoding can fall inside the cover.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower >= self.upper
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styles_rank_by_prefix() {
        let ordered = [
            Passable::error("e"),
            Passable::record([("a", Passable::Null)]),
            Passable::tagged("x", Passable::Null),
            Passable::promise(),
            Passable::array([]),
            Passable::from(true),
            Passable::number(1.0),
            Passable::bigint(1),
            Passable::remotable("R"),
            Passable::from("s"),
            Passable::Null,
            Passable::symbol("y"),
            Passable::Undefined,
        ];
        for pair in ordered.windows(2) {
            assert_eq!(compare_rank(&pair[0], &pair[1]), Ordering::Less, "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn numbers_rank_with_nan_last_and_signed_zero_equal() {
        assert_eq!(compare_numbers(-0.0, 0.0), Ordering::Equal);
        assert_eq!(compare_numbers(f64::INFINITY, f64::NAN), Ordering::Less);
        assert_eq!(compare_numbers(-f64::NAN, f64::NAN), Ordering::Equal);
        assert_eq!(compare_numbers(-1.5, 2.0), Ordering::Less);
    }

    #[test]
    fn arrays_rank_lexicographically_then_by_length() {
        let short = Passable::array([Passable::bigint(1)]);
        let long = Passable::array([Passable::bigint(1), Passable::bigint(0)]);
        let bigger = Passable::array([Passable::bigint(2)]);
        assert_eq!(compare_rank(&short, &long), Ordering::Less);
        assert_eq!(compare_rank(&long, &bigger), Ordering::Less);
    }

    #[test]
    fn references_tie() {
        assert_eq!(
            compare_rank(&Passable::remotable("A"), &Passable::remotable("B")),
            Ordering::Equal
        );
    }

    #[test]
    fn cover_algebra() {
        let a = RankCover::new("b", "m");
        let b = RankCover::new("f", "z");
        assert_eq!(RankCover::intersect([a.clone(), b.clone()]), RankCover::new("f", "m"));
        assert_eq!(RankCover::union([a, b]), RankCover::new("b", "z"));
        assert!(RankCover::intersect([RankCover::new("s", "s~"), RankCover::new("f", "f~")]).is_empty());
    }

    #[test]
    fn style_covers() {
        assert_eq!(RankCover::for_style(PassStyle::BigInt), RankCover::new("n", "q"));
        assert_eq!(RankCover::for_style(PassStyle::String), RankCover::new("s", "t"));
        assert_eq!(RankCover::for_style(PassStyle::Undefined), RankCover::new("z", "{"));
        assert!(RankCover::full().contains("sabc"));
        assert!(RankCover::point("sab").contains("sab"));
        assert!(!RankCover::point("sab").contains("sb"));
    }
}
