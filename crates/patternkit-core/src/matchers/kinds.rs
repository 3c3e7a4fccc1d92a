//! Classification matchers: `scalar`, `key`, `pattern`, `kind`, `tagged`,
//! `remotable`.

use super::{MatchHelper, check_undefined_payload};
use crate::builder as m;
use crate::check::{Check, Checker, Label};
use crate::encode::SortableEncoder;
use crate::keys::{check_key, check_scalar_key};
use crate::kit::PatternKit;
use crate::passable::Passable;
use crate::primitives::SCALAR_COVER;
use crate::rank::RankCover;
use crate::types::{Kind, MatcherTag, PassStyle};
use std::sync::LazyLock;

/// Primitives and remotables.
pub(super) struct Scalar;

impl MatchHelper for Scalar {
    fn check_matches(&self, _kit: &PatternKit, specimen: &Passable, _payload: &Passable, checker: Checker) -> Check {
        check_scalar_key(specimen, checker)
    }

    fn check_is_well_formed(&self, _kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        check_undefined_payload(MatcherTag::Scalar, payload, checker)
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::new(SCALAR_COVER.0, SCALAR_COVER.1)
    }
}

/// Any key. Keys may be containers, so the cover is full.
pub(super) struct Key;

impl MatchHelper for Key {
    fn check_matches(&self, _kit: &PatternKit, specimen: &Passable, _payload: &Passable, checker: Checker) -> Check {
        check_key(specimen, checker)
    }

    fn check_is_well_formed(&self, _kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        check_undefined_payload(MatcherTag::Key, payload, checker)
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::full()
    }
}

/// Any pattern.
pub(super) struct PatternHelper;

impl MatchHelper for PatternHelper {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, _payload: &Passable, checker: Checker) -> Check {
        kit.check_pattern(specimen, checker)
    }

    fn check_is_well_formed(&self, _kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        check_undefined_payload(MatcherTag::Pattern, payload, checker)
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::full()
    }
}

/// A value of the named kind. The payload is the kind name.
pub(super) struct KindHelper;

impl MatchHelper for KindHelper {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        let Some(kind) = payload.as_str() else {
            return checker.fail(|| format!("match:kind: payload: {payload} - A kind name must be a string"));
        };
        kit.check_kind(specimen, kind, checker)
    }

    fn check_is_well_formed(&self, _kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        checker.require(payload.as_str().is_some(), || {
            format!("match:kind: payload: {payload} - A kind name must be a string")
        })
    }

    fn rank_cover(&self, _kit: &PatternKit, payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        payload
            .as_str()
            .and_then(Kind::parse)
            .map_or_else(RankCover::full, |kind| RankCover::for_style(kind.pass_style()))
    }
}

static TAGGED_PAYLOAD_SHAPE: LazyLock<Passable> =
    LazyLock::new(|| Passable::array([m::pattern(), m::pattern()]));

/// A tagged value whose tag and payload each match. The payload is
/// `[tagPattern, payloadPattern]`.
pub(super) struct Tagged;

impl MatchHelper for Tagged {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        let Passable::Tagged(tagged) = specimen else {
            let style = specimen.pass_style().name();
            return checker.fail(|| format!("Expected tagged object, not {style:?}: {specimen}"));
        };
        let slots = payload.as_array().map_or(&[][..], |a| a.as_slice());
        let [tag_pattern, payload_pattern] = slots else {
            return checker.fail(|| format!("match:tagged payload malformed: {payload}"));
        };
        kit.check_matches(&Passable::from(tagged.tag()), tag_pattern, checker, Some(&Label::from("tag")))?;
        kit.check_matches(tagged.payload(), payload_pattern, checker, Some(&Label::from("payload")))
    }

    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        kit.check_matches(payload, &TAGGED_PAYLOAD_SHAPE, checker, Some(&Label::from("match:tagged payload")))
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::for_style(PassStyle::Tagged)
    }
}

static REMOTABLE_PAYLOAD_SHAPE: LazyLock<Passable> =
    LazyLock::new(|| Passable::record([("label", m::string())]));

/// A remotable. The payload `{label}` names it in diagnostics.
pub(super) struct Remotable;

impl MatchHelper for Remotable {
    fn check_matches(&self, kit: &PatternKit, specimen: &Passable, payload: &Passable, checker: Checker) -> Check {
        if kit.is_kind(specimen, PassStyle::Remotable.name()) {
            return Ok(());
        }
        checker.fail(|| {
            let label = payload.as_record().and_then(|r| r.get("label")).and_then(Passable::as_str).unwrap_or("");
            // Tags are quoted: unlike styles they come from the specimen.
            let details = match specimen {
                Passable::Tagged(t) => format!("{:?}", t.tag()),
                _ => specimen.pass_style().name().to_owned(),
            };
            format!("{specimen} - Must be a remotable {label}, not {details}")
        })
    }

    fn check_is_well_formed(&self, kit: &PatternKit, payload: &Passable, checker: Checker) -> Check {
        kit.check_matches(payload, &REMOTABLE_PAYLOAD_SHAPE, checker, Some(&Label::from("match:remotable payload")))
    }

    fn rank_cover(&self, _kit: &PatternKit, _payload: &Passable, _encoder: &dyn SortableEncoder) -> RankCover {
        RankCover::for_style(PassStyle::Remotable)
    }
}

#[cfg(test)]
mod tests {
    use crate::builder as m;
    use crate::encode::RankEncoder;
    use crate::keys::make_copy_set;
    use crate::kit::PatternKit;
    use crate::passable::Passable;
    use crate::rank::RankCover;

    #[test]
    fn scalar_key_and_pattern_predicates() {
        let kit = PatternKit::default();
        assert!(kit.matches(&Passable::remotable("R"), &m::scalar()));
        assert!(!kit.matches(&Passable::array([]), &m::scalar()));
        assert!(kit.matches(&Passable::array([Passable::Null]), &m::key()));
        assert!(!kit.matches(&Passable::array([Passable::promise()]), &m::key()));
        assert!(kit.matches(&m::string(), &m::pattern()));
        assert!(!kit.matches(&Passable::promise(), &m::pattern()));
    }

    #[test]
    fn kind_matches_refined_kinds() {
        let kit = PatternKit::default();
        let set = make_copy_set([Passable::bigint(1)]).expect("set");
        assert!(kit.matches(&set, &m::kind("copySet")));
        assert!(!kit.matches(&set, &m::kind("copyArray")));
        let err = kit.must_match(&Passable::from("x"), &m::kind("copySet"), None).expect_err("not a set");
        assert_eq!(err.message(), "string \"x\" - Must be a copySet");
        assert!(kit.matches(&Passable::Undefined, &m::undefined()));
        assert!(!kit.matches(&Passable::Null, &m::undefined()));
    }

    #[test]
    fn kind_covers() {
        let kit = PatternKit::default();
        assert_eq!(kit.get_rank_cover(&m::kind("copySet"), &RankEncoder), RankCover::new(":", ";"));
        assert_eq!(kit.get_rank_cover(&m::number(), &RankEncoder), RankCover::new("f", "g"));
        assert_eq!(kit.get_rank_cover(&m::kind("nonsense"), &RankEncoder), RankCover::full());
        assert_eq!(kit.get_rank_cover(&m::scalar(), &RankEncoder), RankCover::new("a", "z~"));
    }

    #[test]
    fn tagged_checks_tag_and_payload() {
        let kit = PatternKit::default();
        let pattern = m::tagged(Passable::from("point"), m::array_of(m::number()).expect("arrayOf")).expect("tagged");
        let good = Passable::tagged("point", Passable::array([Passable::number(1.0)]));
        assert!(kit.matches(&good, &pattern));
        let bad_tag = Passable::tagged("line", Passable::array([]));
        let err = kit.must_match(&bad_tag, &pattern, None).expect_err("wrong tag");
        assert_eq!(err.message(), "tag: \"line\" - Must be: \"point\"");
        let err = kit.must_match(&Passable::Null, &pattern, None).expect_err("untagged");
        assert_eq!(err.message(), "Expected tagged object, not \"null\": null");
    }

    #[test]
    fn remotable_diagnostic_names_label_and_actual_kind() {
        let kit = PatternKit::default();
        let purse = m::remotable(Some("Purse"));
        assert!(kit.matches(&Passable::remotable("Purse"), &purse));
        let err = kit.must_match(&Passable::from("x"), &purse, None).expect_err("not remotable");
        assert_eq!(err.message(), "\"x\" - Must be a remotable Purse, not string");
        let err = kit
            .must_match(&Passable::tagged("evil", Passable::Null), &purse, None)
            .expect_err("tagged");
        assert!(err.message().ends_with("not \"evil\""));
    }
}
