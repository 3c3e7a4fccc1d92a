//! `lt`, `lte`, `gte`, `gt`: key comparison against an operand.
//!
//! The payload is the operand, a key. Incommensurate keys fail all four.

use super::MatchHelper;
use crate::check::{Check, Checker};
use crate::encode::SortableEncoder;
use crate::keys::{check_key, key_gt, key_gte, key_lt, key_lte};
use crate::kit::PatternKit;
use crate::passable::Passable;
use crate::primitives::COVER_POINT_SUFFIX;
use crate::rank::RankCover;

/// One comparison matcher.
pub(super) struct Compare {
    op: &'static str,
    test: fn(&Passable, &Passable) -> bool,
    /// Whether the operand bounds accepted values from above.
    upper_bound: bool,
}

pub(super) static LT: Compare = Compare {
    op: "<",
    test: key_lt,
    upper_bound: true,
};

pub(super) static LTE: Compare = Compare {
    op: "<=",
    test: key_lte,
    upper_bound: true,
};

pub(super) static GTE: Compare = Compare {
    op: ">=",
    test: key_gte,
    upper_bound: false,
};

pub(super) static GT: Compare = Compare {
    op: ">",
    test: key_gt,
    upper_bound: false,
};

impl MatchHelper for Compare {
    fn check_matches(&self, _kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        let op = self.op;
        checker.require((self.test)(specimen, payload), || format!("{specimen} - Must be {op} {payload}"))
    }

    fn check_is_well_formed(&self, _kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        check_key(payload, checker)
    }

    /// The operand's style cover, narrowed on one side by its encoding.
    /// An upper bound is made inclusive of the operand's extensions.
    fn rank_cover(&self, _kit: &PatternKit, payload: &Passable, encoder: &dyn SortableEncoder) -> RankCover {
        let mut cover = RankCover::for_style(payload.pass_style());
        if let Some(encoded) = encoder.encode(payload) {
            if self.upper_bound {
                cover.upper = format!("{encoded}{COVER_POINT_SUFFIX}");
            } else {
                cover.lower = encoded;
            }
        }
        cover
    }
}
