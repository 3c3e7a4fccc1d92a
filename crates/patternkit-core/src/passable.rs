//! # Passable Values
//!
//! The value universe every pattern and specimen is drawn from.
//!
//! - Primitives are held inline
//! - Containers (`CopyArray`, `CopyRecord`, `CopyTagged`) are shared and
//!   immutable; cloning a container clones a reference
//! - References (`Remotable`, `Promise`, errors) compare by identity
//!
//! Containers carry an allocation identity so the pattern kit can memoize
//! per value without keeping the value alive.

use crate::primitives::MAX_DISPLAY_DEPTH;
use crate::types::PassStyle;
use num_bigint::BigInt;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// A pattern is any passable; validity is checked by the pattern kit.
pub type Pattern = Passable;

/// Shared `undefined`, for lookups that fall back to it.
pub(crate) static UNDEFINED: Passable = Passable::Undefined;

// =============================================================================
// PASSABLE
// =============================================================================

/// An immutable, acyclic value that can cross a capability boundary.
#[derive(Clone, Debug)]
pub enum Passable {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    BigInt(BigInt),
    String(String),
    /// A passable symbol, identified by its name.
    Symbol(String),
    CopyArray(CopyArray),
    CopyRecord(CopyRecord),
    Tagged(CopyTagged),
    Remotable(Remotable),
    Promise(Promise),
    Error(PassableError),
}

impl Passable {
    /// The coarse classification of this value.
    #[must_use]
    pub fn pass_style(&self) -> PassStyle {
        match self {
            Passable::Undefined => PassStyle::Undefined,
            Passable::Null => PassStyle::Null,
            Passable::Boolean(_) => PassStyle::Boolean,
            Passable::Number(_) => PassStyle::Number,
            Passable::BigInt(_) => PassStyle::BigInt,
            Passable::String(_) => PassStyle::String,
            Passable::Symbol(_) => PassStyle::Symbol,
            Passable::CopyArray(_) => PassStyle::CopyArray,
            Passable::CopyRecord(_) => PassStyle::CopyRecord,
            Passable::Tagged(_) => PassStyle::Tagged,
            Passable::Remotable(_) => PassStyle::Remotable,
            Passable::Promise(_) => PassStyle::Promise,
            Passable::Error(_) => PassStyle::Error,
        }
    }

    /// A number value.
    #[must_use]
    pub fn number(n: f64) -> Self {
        Passable::Number(n)
    }

    /// A bigint value.
    #[must_use]
    pub fn bigint(n: impl Into<BigInt>) -> Self {
        Passable::BigInt(n.into())
    }

    /// A string value.
    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Passable::String(s.into())
    }

    /// A passable symbol with the given name.
    #[must_use]
    pub fn symbol(name: impl Into<String>) -> Self {
        Passable::Symbol(name.into())
    }

    /// A sequence container.
    #[must_use]
    pub fn array(items: impl IntoIterator<Item = Passable>) -> Self {
        Passable::CopyArray(CopyArray::new(items.into_iter().collect()))
    }

    /// A keyed record. Later entries replace earlier ones with the same name.
    #[must_use]
    pub fn record<K: Into<String>>(entries: impl IntoIterator<Item = (K, Passable)>) -> Self {
        Passable::CopyRecord(CopyRecord::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// A tagged value. The tag is not interpreted until classified.
    #[must_use]
    pub fn tagged(tag: impl Into<String>, payload: Passable) -> Self {
        Passable::Tagged(CopyTagged::new(tag, payload))
    }

    /// A fresh remote reference with the given interface name.
    #[must_use]
    pub fn remotable(iface: impl Into<String>) -> Self {
        Passable::Remotable(Remotable::new(iface))
    }

    /// A fresh pending reference.
    #[must_use]
    pub fn promise() -> Self {
        Passable::Promise(Promise::new())
    }

    /// A fresh error value.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Passable::Error(PassableError::new("Error", message))
    }

    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Passable::Undefined)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Passable::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Passable::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Passable::BigInt(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&CopyArray> {
        match self {
            Passable::CopyArray(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&CopyRecord> {
        match self {
            Passable::CopyRecord(r) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_tagged(&self) -> Option<&CopyTagged> {
        match self {
            Passable::Tagged(t) => Some(t),
            _ => None,
        }
    }

    /// The allocation identity of a container, if this is one.
    pub(crate) fn identity(&self) -> Option<Identity> {
        match self {
            Passable::CopyArray(a) => Some(Identity::of(&a.0)),
            Passable::CopyRecord(r) => Some(Identity::of(&r.0)),
            Passable::Tagged(t) => Some(Identity::of(&t.0)),
            _ => None,
        }
    }
}

impl From<bool> for Passable {
    fn from(b: bool) -> Self {
        Passable::Boolean(b)
    }
}

impl From<f64> for Passable {
    fn from(n: f64) -> Self {
        Passable::Number(n)
    }
}

impl From<BigInt> for Passable {
    fn from(n: BigInt) -> Self {
        Passable::BigInt(n)
    }
}

impl From<&str> for Passable {
    fn from(s: &str) -> Self {
        Passable::String(s.to_owned())
    }
}

impl From<String> for Passable {
    fn from(s: String) -> Self {
        Passable::String(s)
    }
}

impl From<CopyArray> for Passable {
    fn from(a: CopyArray) -> Self {
        Passable::CopyArray(a)
    }
}

impl From<CopyRecord> for Passable {
    fn from(r: CopyRecord) -> Self {
        Passable::CopyRecord(r)
    }
}

// =============================================================================
// CONTAINERS
// =============================================================================

/// A shared sequence of passables.
#[derive(Clone, Debug)]
pub struct CopyArray(Arc<Vec<Passable>>);

impl CopyArray {
    #[must_use]
    pub fn new(items: Vec<Passable>) -> Self {
        Self(Arc::new(items))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Passable] {
        &self.0
    }
}

impl std::ops::Deref for CopyArray {
    type Target = [Passable];

    fn deref(&self) -> &[Passable] {
        &self.0
    }
}

/// A shared record with string property names, kept in sorted name order.
#[derive(Clone, Debug)]
pub struct CopyRecord(Arc<BTreeMap<String, Passable>>);

impl CopyRecord {
    #[must_use]
    pub fn new(entries: BTreeMap<String, Passable>) -> Self {
        Self(Arc::new(entries))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Passable> {
        self.0.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Property names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Entries in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Passable)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Property values in sorted name order.
    pub fn values(&self) -> impl Iterator<Item = &Passable> {
        self.0.values()
    }
}

#[derive(Debug)]
struct TaggedInner {
    tag: String,
    payload: Passable,
}

/// A shared tagged value: a tag string and a payload.
#[derive(Clone, Debug)]
pub struct CopyTagged(Arc<TaggedInner>);

impl CopyTagged {
    #[must_use]
    pub fn new(tag: impl Into<String>, payload: Passable) -> Self {
        Self(Arc::new(TaggedInner {
            tag: tag.into(),
            payload,
        }))
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.0.tag
    }

    #[must_use]
    pub fn payload(&self) -> &Passable {
        &self.0.payload
    }
}

// =============================================================================
// REFERENCES
// =============================================================================

#[derive(Debug)]
struct RemotableInner {
    iface: String,
}

/// A remote reference. Two remotables are the same only if they share an
/// allocation.
#[derive(Clone, Debug)]
pub struct Remotable(Arc<RemotableInner>);

impl Remotable {
    #[must_use]
    pub fn new(iface: impl Into<String>) -> Self {
        Self(Arc::new(RemotableInner {
            iface: iface.into(),
        }))
    }

    /// The declared interface name, used only for diagnostics.
    #[must_use]
    pub fn iface(&self) -> &str {
        &self.0.iface
    }

    #[must_use]
    pub fn same(&self, other: &Remotable) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Default)]
struct PromiseInner;

/// A pending reference. Never a key, never a pattern.
#[derive(Clone, Debug)]
pub struct Promise(Arc<PromiseInner>);

impl Promise {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(PromiseInner))
    }

    #[must_use]
    pub fn same(&self, other: &Promise) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Promise {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct ErrorInner {
    name: String,
    message: String,
}

/// A passable error. Never a key, never a pattern.
#[derive(Clone, Debug)]
pub struct PassableError(Arc<ErrorInner>);

impl PassableError {
    #[must_use]
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self(Arc::new(ErrorInner {
            name: name.into(),
            message: message.into(),
        }))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.0.message
    }
}

// =============================================================================
// IDENTITY
// =============================================================================

/// The allocation identity of a shared container.
///
/// The weak anchor keeps the allocation reserved, so the address cannot be
/// reused by another value while the identity is held.
#[derive(Clone, Debug)]
pub(crate) struct Identity {
    addr: usize,
    anchor: Weak<dyn Any + Send + Sync>,
}

impl Identity {
    fn of<T: Any + Send + Sync>(arc: &Arc<T>) -> Self {
        let weak: Weak<T> = Arc::downgrade(arc);
        let anchor: Weak<dyn Any + Send + Sync> = weak;
        Self {
            addr: Arc::as_ptr(arc) as *const () as usize,
            anchor,
        }
    }

    pub(crate) fn addr(&self) -> usize {
        self.addr
    }

    /// Whether the identified value is still alive.
    pub(crate) fn is_live(&self) -> bool {
        self.anchor.strong_count() > 0
    }
}

// =============================================================================
// DISPLAY
// =============================================================================

impl fmt::Display for Passable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_bounded(f, MAX_DISPLAY_DEPTH)
    }
}

impl Passable {
    /// Write this value, eliding containers nested deeper than `depth`.
    fn write_bounded(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            Passable::Undefined => f.write_str("undefined"),
            Passable::Null => f.write_str("null"),
            Passable::Boolean(b) => write!(f, "{b}"),
            Passable::Number(n) => {
                if n.is_nan() {
                    f.write_str("NaN")
                } else if n.is_infinite() {
                    f.write_str(if n.is_sign_negative() { "-Infinity" } else { "Infinity" })
                } else {
                    write!(f, "{n}")
                }
            }
            Passable::BigInt(n) => write!(f, "{n}n"),
            Passable::String(s) => write!(f, "{s:?}"),
            Passable::Symbol(name) => write!(f, "\"[Symbol({name})]\""),
            Passable::CopyArray(_) if depth == 0 => f.write_str("[...]"),
            Passable::CopyRecord(_) if depth == 0 => f.write_str("{...}"),
            Passable::Tagged(_) if depth == 0 => f.write_str("{\"#tag\":...}"),
            Passable::CopyArray(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    item.write_bounded(f, depth - 1)?;
                }
                f.write_str("]")
            }
            Passable::CopyRecord(record) => {
                f.write_str("{")?;
                for (i, (name, value)) in record.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{name:?}:")?;
                    value.write_bounded(f, depth - 1)?;
                }
                f.write_str("}")
            }
            Passable::Tagged(tagged) => {
                write!(f, "{{\"#tag\":{:?},\"payload\":", tagged.tag())?;
                tagged.payload().write_bounded(f, depth - 1)?;
                f.write_str("}")
            }
            Passable::Remotable(r) => write!(f, "\"[Alleged: {}]\"", r.iface()),
            Passable::Promise(_) => f.write_str("\"[Promise]\""),
            Passable::Error(e) => write!(f, "\"[{}: {}]\"", e.name(), e.message()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_styles_classify() {
        assert_eq!(Passable::Undefined.pass_style(), PassStyle::Undefined);
        assert_eq!(Passable::bigint(3).pass_style(), PassStyle::BigInt);
        assert_eq!(Passable::array([]).pass_style(), PassStyle::CopyArray);
        assert_eq!(
            Passable::record([("a", Passable::Null)]).pass_style(),
            PassStyle::CopyRecord
        );
        assert_eq!(Passable::promise().pass_style(), PassStyle::Promise);
    }

    #[test]
    fn record_names_are_sorted() {
        let record = Passable::record([
            ("zeta", Passable::Null),
            ("alpha", Passable::Null),
            ("mid", Passable::Null),
        ]);
        let names: Vec<_> = record.as_record().expect("record").names().collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn clones_share_identity() {
        let a = Passable::array([Passable::Null]);
        let b = a.clone();
        let c = Passable::array([Passable::Null]);
        let ia = a.identity().expect("identity");
        assert_eq!(ia.addr(), b.identity().expect("identity").addr());
        assert_ne!(ia.addr(), c.identity().expect("identity").addr());
        assert!(ia.is_live());
    }

    #[test]
    fn identity_outlives_value_without_reuse() {
        let id = Passable::array([Passable::Null]).identity().expect("identity");
        assert!(!id.is_live());
    }

    #[test]
    fn remotables_compare_by_identity() {
        let r = Remotable::new("Purse");
        let same = r.clone();
        let other = Remotable::new("Purse");
        assert!(r.same(&same));
        assert!(!r.same(&other));
    }

    #[test]
    fn display_quotes_values() {
        let v = Passable::record([
            ("n", Passable::bigint(-7)),
            ("s", Passable::from("hi")),
            ("xs", Passable::array([Passable::Null, Passable::from(true)])),
        ]);
        assert_eq!(v.to_string(), r#"{"n":-7n,"s":"hi","xs":[null,true]}"#);
        assert_eq!(Passable::number(f64::NAN).to_string(), "NaN");
        assert_eq!(Passable::number(1.0).to_string(), "1");
        assert_eq!(Passable::remotable("Purse").to_string(), "\"[Alleged: Purse]\"");
    }

    #[test]
    fn display_elides_deep_nesting() {
        let mut deep = Passable::Null;
        for _ in 0..2000 {
            deep = Passable::array([deep]);
        }
        let text = deep.to_string();
        assert!(text.ends_with("[...]]]"));
        assert_eq!(text.matches('[').count(), MAX_DISPLAY_DEPTH + 1);

        let tagged = Passable::tagged("t", Passable::record([("a", Passable::Null)]));
        assert_eq!(tagged.to_string(), r##"{"#tag":"t","payload":{"a":null}}"##);
    }
}
