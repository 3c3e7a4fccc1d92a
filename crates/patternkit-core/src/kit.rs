//! # Pattern Kit
//!
//! The matching engine: classification, pattern validation, matching and
//! rank covers.
//!
//! A `PatternKit` owns two memo tables keyed by container identity:
//! - the pattern memo, holding containers already proven to be patterns
//! - the tag memo, holding the kind of each tagged value whose payload
//!   invariants have been checked
//!
//! Entries hold only a weak anchor, so memoizing never keeps a value alive.
//! A kit is not `Sync`; each thread uses its own (see `with_default_kit`).
//!
//! ## Depth
//!
//! Matching and validation recurse once per nesting level of pattern and
//! specimen. Past `KitConfig::max_depth` the check fails instead of
//! recursing further.

use crate::check::{Check, Checker, Label, Mismatch, labeled};
use crate::encode::SortableEncoder;
use crate::guard;
use crate::keys::{self, find_sorted_key, is_key, keys_equal};
use crate::limits::AllLimits;
use crate::matchers::helper_for;
use crate::passable::{CopyArray, CopyTagged, Identity, Passable, Pattern, UNDEFINED};
use crate::primitives::DEFAULT_MAX_DEPTH;
use crate::rank::RankCover;
use crate::types::{COPY_BAG_TAG, COPY_MAP_TAG, COPY_SET_TAG, GuardTag, Kind, MatcherTag, PassStyle, PatternError, match_sub_tag};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use tracing::{debug, error, trace};

/// Memo tables are swept of dead entries once they reach this size, and
/// again each time they double.
const MEMO_SWEEP_THRESHOLD: usize = 1024;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Settings for a `PatternKit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct KitConfig {
    /// Nesting ceiling for matching and pattern validation.
    pub max_depth: usize,
    /// Base limits that call-site limits override.
    pub limits: AllLimits,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            limits: AllLimits::default(),
        }
    }
}

// =============================================================================
// MEMO
// =============================================================================

/// A table keyed by allocation identity.
#[derive(Debug)]
struct IdentityMemo<V> {
    entries: BTreeMap<usize, (Identity, V)>,
    sweep_at: usize,
}

impl<V: Copy> IdentityMemo<V> {
    fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            sweep_at: MEMO_SWEEP_THRESHOLD,
        }
    }

    fn get(&self, id: &Identity) -> Option<V> {
        self.entries.get(&id.addr()).map(|(_, v)| *v)
    }

    fn insert(&mut self, id: Identity, value: V) {
        if self.entries.len() >= self.sweep_at {
            self.entries.retain(|_, (held, _)| held.is_live());
            self.sweep_at = (self.entries.len() * 2).max(MEMO_SWEEP_THRESHOLD);
        }
        self.entries.insert(id.addr(), (id, value));
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// PATTERN KIT
// =============================================================================

/// A matching engine with its own memo tables.
#[derive(Debug)]
pub struct PatternKit {
    config: KitConfig,
    pattern_memo: RefCell<IdentityMemo<()>>,
    tag_memo: RefCell<IdentityMemo<Kind>>,
    depth: Cell<usize>,
}

impl Default for PatternKit {
    fn default() -> Self {
        Self::new(KitConfig::default())
    }
}

impl PatternKit {
    #[must_use]
    pub fn new(config: KitConfig) -> Self {
        Self {
            config,
            pattern_memo: RefCell::new(IdentityMemo::new()),
            tag_memo: RefCell::new(IdentityMemo::new()),
            depth: Cell::new(0),
        }
    }

    #[must_use]
    pub fn config(&self) -> &KitConfig {
        &self.config
    }

    /// The kit's base limits.
    #[must_use]
    pub fn limits(&self) -> &AllLimits {
        &self.config.limits
    }

    /// Number of live and dead entries in the (pattern, tag) memos.
    #[must_use]
    pub fn memo_sizes(&self) -> (usize, usize) {
        (self.pattern_memo.borrow().len(), self.tag_memo.borrow().len())
    }

    /// Run `f` one nesting level deeper, failing past the ceiling.
    fn nested<T>(&self, checker: Checker, f: impl FnOnce() -> Result<T, Mismatch>) -> Result<T, Mismatch> {
        let depth = self.depth.get();
        if depth >= self.config.max_depth {
            let max = self.config.max_depth;
            return Err(checker.mismatch(|| format!("Nesting exceeds max depth {max}")));
        }
        self.depth.set(depth + 1);
        let result = f();
        self.depth.set(depth);
        result
    }

    // -------------------------------------------------------------------------
    // Classification
    // -------------------------------------------------------------------------

    /// Classify a value, validating tagged payloads against their tag.
    ///
    /// Tagged values with an unrecognized tag, or whose payload violates
    /// the invariants of their tag, have no kind.
    pub fn kind_of(&self, value: &Passable, checker: Checker) -> Result<Kind, Mismatch> {
        let Passable::Tagged(tagged) = value else {
            return Ok(Kind::Style(value.pass_style()));
        };
        let id = value.identity();
        if let Some(kind) = id.as_ref().and_then(|id| self.tag_memo.borrow().get(id)) {
            return Ok(kind);
        }
        let kind = self.nested(checker, || self.check_tagged(tagged, checker))?;
        if let Some(id) = id {
            trace!(tag = tagged.tag(), "tag memo insert");
            self.tag_memo.borrow_mut().insert(id, kind);
        }
        Ok(kind)
    }

    /// Check the payload invariants of a tag, yielding the kind it names.
    fn check_tagged(&self, tagged: &CopyTagged, checker: Checker) -> Result<Kind, Mismatch> {
        let (tag, payload) = (tagged.tag(), tagged.payload());
        if let Some(matcher) = MatcherTag::from_tag(tag) {
            helper_for(matcher).check_is_well_formed(self, payload, checker)?;
            return Ok(Kind::Match(matcher));
        }
        if let Some(guard) = GuardTag::from_tag(tag) {
            self.check_matches(payload, guard::payload_shape(guard), checker, Some(&Label::from(tag)))?;
            return Ok(Kind::Guard(guard));
        }
        match tag {
            COPY_SET_TAG => keys::check_copy_set(tagged, checker).map(|()| Kind::CopySet),
            COPY_BAG_TAG => keys::check_copy_bag(tagged, checker).map(|()| Kind::CopyBag),
            COPY_MAP_TAG => keys::check_copy_map(tagged, checker).map(|()| Kind::CopyMap),
            _ => Err(checker.mismatch(|| format!("cannot check unrecognized tag {tag:?}"))),
        }
    }

    /// Check that a value has the named kind.
    ///
    /// `"null"` and `"undefined"` are checked as keys. A kind name also
    /// matches values whose matcher tag reduces to it by dropping a sub-tag.
    pub fn check_kind(&self, specimen: &Passable, kind: &str, checker: Checker) -> Check {
        match kind {
            "null" => return self.check_as_key_pattern(specimen, &Passable::Null, checker),
            "undefined" => return self.check_as_key_pattern(specimen, &Passable::Undefined, checker),
            _ => {}
        }
        let real = self.kind_of(specimen, Checker::Probe).ok();
        if let Some(real) = real {
            if real.name() == kind || match_sub_tag(real.name()).is_some_and(|sub| sub == kind) {
                return Ok(());
            }
        }
        checker.fail(|| {
            let real = real.map_or("undefined", Kind::name);
            format!("{real} {specimen} - Must be a {kind}")
        })
    }

    /// Whether a value has the named kind.
    #[must_use]
    pub fn is_kind(&self, specimen: &Passable, kind: &str) -> bool {
        self.check_kind(specimen, kind, Checker::Probe).is_ok()
    }

    fn check_as_key_pattern(&self, specimen: &Passable, key: &Passable, checker: Checker) -> Check {
        checker.require(is_key(specimen) && keys_equal(specimen, key), || {
            format!("{specimen} - Must be: {key}")
        })
    }

    // -------------------------------------------------------------------------
    // Pattern validation
    // -------------------------------------------------------------------------

    /// Check that a value is a pattern.
    pub fn check_pattern(&self, pattern: &Passable, checker: Checker) -> Check {
        if is_key(pattern) {
            return Ok(());
        }
        let id = pattern.identity();
        if id.as_ref().is_some_and(|id| self.pattern_memo.borrow().get(id).is_some()) {
            return Ok(());
        }
        self.nested(checker, || self.check_pattern_internal(pattern, checker))?;
        if let Some(id) = id {
            trace!(style = %pattern.pass_style(), "pattern memo insert");
            self.pattern_memo.borrow_mut().insert(id, ());
        }
        Ok(())
    }

    /// `pattern` is known not to be a key.
    fn check_pattern_internal(&self, pattern: &Passable, checker: Checker) -> Check {
        match self.kind_of(pattern, checker)? {
            Kind::Style(PassStyle::CopyRecord) => pattern
                .as_record()
                .map_or(Ok(()), |r| r.values().try_for_each(|v| self.check_pattern(v, checker))),
            Kind::Style(PassStyle::CopyArray) => pattern
                .as_array()
                .map_or(Ok(()), |a| a.iter().try_for_each(|v| self.check_pattern(v, checker))),
            Kind::CopyMap => {
                let values = pattern.as_tagged().and_then(keys::copy_map_parts).map(|(_, v)| v.clone());
                values.map_or(Ok(()), |v| self.check_pattern(&Passable::CopyArray(v), checker))
            }
            Kind::Style(style @ (PassStyle::Error | PassStyle::Promise)) => {
                checker.fail(|| format!("A {:?} cannot be a pattern", style.name()))
            }
            Kind::Match(_) => Ok(()),
            kind => checker.fail(|| format!("A passable of kind {:?} is not a pattern: {pattern}", kind.name())),
        }
    }

    /// Whether a value is a pattern.
    #[must_use]
    pub fn is_pattern(&self, pattern: &Passable) -> bool {
        self.check_pattern(pattern, Checker::Probe).is_ok()
    }

    /// Assert that a value is a pattern.
    pub fn assert_pattern(&self, pattern: &Passable) -> Result<(), PatternError> {
        if self.is_pattern(pattern) {
            return Ok(());
        }
        let message = self
            .check_pattern(pattern, Checker::Assert)
            .err()
            .map_or_else(|| format!("not a pattern: {pattern}"), Mismatch::into_message);
        debug!(diagnostic = %message, "assert_pattern failed");
        Err(PatternError::WellFormedness(message))
    }

    // -------------------------------------------------------------------------
    // Matching
    // -------------------------------------------------------------------------

    /// Check a specimen against a pattern, under the given mode.
    pub fn check_matches(
        &self,
        specimen: &Passable,
        pattern: &Pattern,
        checker: Checker,
        label: Option<&Label<'_>>,
    ) -> Check {
        let result = self.nested(checker, || self.check_matches_internal(specimen, pattern, checker));
        labeled(result, label)
    }

    fn check_matches_internal(&self, specimen: &Passable, pattern: &Pattern, checker: Checker) -> Check {
        let Ok(pattern_kind) = self.kind_of(pattern, Checker::Probe) else {
            return checker.fail(|| format!("pattern expected: {pattern}"));
        };
        let specimen_kind = || self.kind_of(specimen, Checker::Probe).ok();
        match pattern_kind {
            Kind::Style(PassStyle::Promise) => checker.fail(|| format!("promises cannot be patterns: {pattern}")),
            Kind::Style(PassStyle::Error) => checker.fail(|| format!("errors cannot be patterns: {pattern}")),
            Kind::Style(PassStyle::CopyArray | PassStyle::CopyRecord) | Kind::CopyMap if is_key(pattern) => {
                self.check_as_key_pattern(specimen, pattern, checker)
            }
            Kind::Style(PassStyle::CopyArray) => {
                let (Some(patterns), Some(Kind::Style(PassStyle::CopyArray))) = (pattern.as_array(), specimen_kind())
                else {
                    return checker.fail(|| {
                        format!("{specimen} - Must be a copyArray to match a copyArray pattern: {pattern}")
                    });
                };
                let items = specimen.as_array().map_or(&[][..], |a| a.as_slice());
                checker.require(items.len() == patterns.len(), || {
                    format!("Array {specimen} - Must be as long as copyArray pattern: {pattern}")
                })?;
                items
                    .iter()
                    .zip(patterns.iter())
                    .enumerate()
                    .try_for_each(|(i, (item, p))| self.check_matches(item, p, checker, Some(&Label::Index(i))))
            }
            Kind::Style(PassStyle::CopyRecord) => self.check_record_pattern(specimen, pattern, specimen_kind(), checker),
            Kind::CopyMap => self.check_map_pattern(specimen, pattern, specimen_kind(), checker),
            Kind::Match(tag) => {
                let payload = pattern.as_tagged().map_or(&UNDEFINED, |t| t.payload());
                helper_for(tag).check_matches(self, specimen, payload, checker)
            }
            Kind::Guard(_) => checker.fail(|| format!("pattern expected: {pattern}")),
            kind => {
                if !is_key(specimen) {
                    let kind = kind.name();
                    return checker.fail(|| {
                        format!("{specimen} - Must be a {kind} to match a {kind} pattern: {pattern}")
                    });
                }
                self.check_as_key_pattern(specimen, pattern, checker)
            }
        }
    }

    fn check_record_pattern(
        &self,
        specimen: &Passable,
        pattern: &Pattern,
        specimen_kind: Option<Kind>,
        checker: Checker,
    ) -> Check {
        let (Some(patterns), Some(Kind::Style(PassStyle::CopyRecord)), Some(record)) =
            (pattern.as_record(), specimen_kind, specimen.as_record())
        else {
            return checker.fail(|| format!("{specimen} - Must be a copyRecord to match a copyRecord pattern: {pattern}"));
        };
        let missing: Vec<&str> = patterns.names().filter(|n| !record.contains(n)).collect();
        if !missing.is_empty() {
            return checker.fail(|| format!("{specimen} - Must have missing properties {}", quote_names(&missing)));
        }
        let unexpected: Vec<&str> = record.names().filter(|n| !patterns.contains(n)).collect();
        if !unexpected.is_empty() {
            return checker.fail(|| {
                format!("{specimen} - Must not have unexpected properties: {}", quote_names(&unexpected))
            });
        }
        patterns.iter().zip(record.values()).try_for_each(|((name, p), value)| {
            self.check_matches(value, p, checker, Some(&Label::from(name)))
        })
    }

    fn check_map_pattern(
        &self,
        specimen: &Passable,
        pattern: &Pattern,
        specimen_kind: Option<Kind>,
        checker: Checker,
    ) -> Check {
        let parts = match (pattern.as_tagged(), specimen_kind, specimen.as_tagged()) {
            (Some(p), Some(Kind::CopyMap), Some(s)) => keys::copy_map_parts(p).zip(keys::copy_map_parts(s)),
            _ => None,
        };
        let Some(((pattern_keys, pattern_values), (specimen_keys, specimen_values))) = parts else {
            return checker.fail(|| format!("{specimen} - Must be a copyMap to match a copyMap pattern: {pattern}"));
        };
        let as_set = |k: &CopyArray| Passable::tagged(COPY_SET_TAG, Passable::CopyArray(k.clone()));
        self.check_matches(&as_set(specimen_keys), &as_set(pattern_keys), checker, None)?;
        // Pair values under the pattern's key order; equal-rank keys may
        // sit in different positions on the two sides.
        let mut paired = Vec::with_capacity(pattern_keys.len());
        for key in pattern_keys.iter() {
            let Some(j) = find_sorted_key(specimen_keys, key) else {
                return checker.fail(|| format!("{specimen} - Must have key {key}"));
            };
            paired.push(specimen_values[j].clone());
        }
        self.check_matches(
            &Passable::array(paired),
            &Passable::CopyArray(pattern_values.clone()),
            checker,
            None,
        )
    }

    /// Non-throwing probe.
    #[must_use]
    pub fn matches(&self, specimen: &Passable, pattern: &Pattern) -> bool {
        self.check_matches(specimen, pattern, Checker::Probe, None).is_ok()
    }

    /// Succeed or return a labeled diagnostic.
    ///
    /// The probe runs first; only a failed probe pays for diagnostics. If
    /// the diagnostic pass then succeeds, the two modes have diverged and
    /// an internal inconsistency is reported instead.
    pub fn must_match(&self, specimen: &Passable, pattern: &Pattern, label: Option<&str>) -> Result<(), PatternError> {
        let Err(probe) = self.check_matches(specimen, pattern, Checker::Probe, None) else {
            return Ok(());
        };
        let label_ref = label.map(Label::from);
        match self.check_matches(specimen, pattern, Checker::Assert, label_ref.as_ref()) {
            Err(mismatch) => {
                let message = mismatch.into_message();
                debug!(label = label.unwrap_or_default(), diagnostic = %message, "must_match failed");
                Err(PatternError::MatchFailure(message))
            }
            Ok(()) => {
                let label = label.unwrap_or("undefined").to_owned();
                error!(%label, %pattern, "probe and assert checks disagree");
                Err(PatternError::InternalInconsistency {
                    label,
                    pattern: pattern.to_string(),
                    cause: Some(Box::new(PatternError::MatchFailure(probe.into_message()))),
                })
            }
        }
    }

    // -------------------------------------------------------------------------
    // Rank covers
    // -------------------------------------------------------------------------

    /// A cover holding the encoding of every value the pattern accepts.
    ///
    /// Keys with an exact encoding get a point cover. Matchers compute their
    /// own. Everything else gets the cover of its pass style.
    pub fn get_rank_cover(&self, pattern: &Pattern, encoder: &dyn SortableEncoder) -> RankCover {
        if is_key(pattern) {
            if let Some(encoded) = encoder.encode(pattern) {
                return RankCover::point(&encoded);
            }
        }
        if let Passable::Tagged(tagged) = pattern {
            if let Some(tag) = MatcherTag::from_tag(tagged.tag()) {
                return helper_for(tag).rank_cover(self, tagged.payload(), encoder);
            }
        }
        RankCover::for_style(pattern.pass_style())
    }
}

/// Render names as a quoted list, e.g. `["a","b"]`.
fn quote_names(names: &[&str]) -> String {
    Passable::array(names.iter().map(|n| Passable::from(*n))).to_string()
}

// =============================================================================
// DEFAULT KIT
// =============================================================================

thread_local! {
    static DEFAULT_KIT: PatternKit = PatternKit::default();
}

/// Run `f` with this thread's default kit.
pub fn with_default_kit<R>(f: impl FnOnce(&PatternKit) -> R) -> R {
    DEFAULT_KIT.with(f)
}

/// `PatternKit::matches` on the default kit.
#[must_use]
pub fn matches(specimen: &Passable, pattern: &Pattern) -> bool {
    with_default_kit(|kit| kit.matches(specimen, pattern))
}

/// `PatternKit::must_match` on the default kit.
pub fn must_match(specimen: &Passable, pattern: &Pattern, label: Option<&str>) -> Result<(), PatternError> {
    with_default_kit(|kit| kit.must_match(specimen, pattern, label))
}

/// `PatternKit::is_pattern` on the default kit.
#[must_use]
pub fn is_pattern(pattern: &Passable) -> bool {
    with_default_kit(|kit| kit.is_pattern(pattern))
}

/// `PatternKit::assert_pattern` on the default kit.
pub fn assert_pattern(pattern: &Passable) -> Result<(), PatternError> {
    with_default_kit(|kit| kit.assert_pattern(pattern))
}

/// `PatternKit::get_rank_cover` on the default kit.
pub fn get_rank_cover(pattern: &Pattern, encoder: &dyn SortableEncoder) -> RankCover {
    with_default_kit(|kit| kit.get_rank_cover(pattern, encoder))
}

/// `PatternKit::kind_of` on the default kit, as an option.
#[must_use]
pub fn kind_of(value: &Passable) -> Option<Kind> {
    with_default_kit(|kit| kit.kind_of(value, Checker::Probe).ok())
}

// =============================================================================
// TESTS
// =============================================================================
