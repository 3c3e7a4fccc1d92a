//! # Guards
//!
//! Guards describe the call shapes a capability object accepts.
//!
//! - `MethodGuard`: call kind, argument guards (required, optional, rest)
//!   and a return guard
//! - `InterfaceGuard`: an interface name plus a method guard per method
//! - `await_arg(p)`: an async argument that is awaited before checking
//! - `raw()`: a position that is passed through unchecked
//!
//! Guards are tagged values (`guard:<name>`) whose payloads are validated
//! against a fixed shape, so a guard can be stored and passed around like
//! any other passable. Guards are not patterns.
//!
//! ## Building
//!
//! ```ignore
//! let get = m::call([m::string()]).optional([m::number()])?.returns(m::any())?;
//! ```
//!
//! `optional` may be used once and only before `rest`; `rest` may be used
//! once. Misuse fails at the offending step.

use crate::builder::{self as m, matcher};
use crate::check::Checker;
use crate::keys::{copy_map_parts, find_sorted_key, make_copy_map};
use crate::kit::{PatternKit, with_default_kit};
use crate::passable::{CopyArray, CopyRecord, Passable, Pattern, UNDEFINED};
use crate::primitives::{DEFAULT_GUARDS_PASSABLE, DEFAULT_GUARDS_RAW};
use crate::types::{GuardTag, MatcherTag, PatternError};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

// =============================================================================
// PAYLOAD SHAPES
// =============================================================================

fn or_of(patterns: impl IntoIterator<Item = Pattern>) -> Pattern {
    matcher(MatcherTag::Or, Passable::array(patterns))
}

fn opt_of(pattern: Pattern) -> Pattern {
    or_of([Passable::Undefined, pattern])
}

fn array_of(pattern: Pattern) -> Pattern {
    matcher(MatcherTag::ArrayOf, Passable::array([pattern]))
}

fn guard_kind(tag: GuardTag) -> Pattern {
    m::kind(tag.tag())
}

/// A raw guard or a pattern.
fn sync_value_guard() -> Pattern {
    or_of([guard_kind(GuardTag::RawGuard), m::pattern()])
}

/// A raw guard, an await guard or a pattern.
fn async_arg_guard() -> Pattern {
    or_of([guard_kind(GuardTag::RawGuard), guard_kind(GuardTag::AwaitArgGuard), m::pattern()])
}

fn method_guard_shape(call_kind: CallKind, arg_guard: Pattern) -> Pattern {
    Passable::record([
        ("callKind", Passable::from(call_kind.name())),
        ("argGuards", array_of(arg_guard.clone())),
        ("optionalArgGuards", opt_of(array_of(arg_guard))),
        ("restArgGuard", opt_of(sync_value_guard())),
        ("returnGuard", sync_value_guard()),
    ])
}

static AWAIT_ARG_GUARD_SHAPE: LazyLock<Passable> =
    LazyLock::new(|| Passable::record([("argGuard", m::pattern())]));

static RAW_GUARD_SHAPE: LazyLock<Passable> = LazyLock::new(m::record);

static METHOD_GUARD_SHAPE: LazyLock<Passable> = LazyLock::new(|| {
    or_of([
        method_guard_shape(CallKind::Sync, sync_value_guard()),
        method_guard_shape(CallKind::Async, async_arg_guard()),
    ])
});

static INTERFACE_GUARD_SHAPE: LazyLock<Passable> = LazyLock::new(|| {
    let method_guard = guard_kind(GuardTag::MethodGuard);
    let required = Passable::record([
        ("interfaceName", m::string()),
        (
            "methodGuards",
            matcher(MatcherTag::RecordOf, Passable::array([m::string(), method_guard.clone()])),
        ),
    ]);
    let optional = Passable::record([
        (
            "defaultGuards",
            or_of([
                Passable::Undefined,
                Passable::from(DEFAULT_GUARDS_PASSABLE),
                Passable::from(DEFAULT_GUARDS_RAW),
            ]),
        ),
        ("sloppy", m::boolean()),
        (
            "symbolMethodGuards",
            matcher(MatcherTag::MapOf, Passable::array([m::symbol(), method_guard])),
        ),
    ]);
    matcher(MatcherTag::SplitRecord, Passable::array([required, optional]))
});

/// The shape a guard's payload must match.
#[must_use]
pub fn payload_shape(tag: GuardTag) -> &'static Passable {
    match tag {
        GuardTag::AwaitArgGuard => &*AWAIT_ARG_GUARD_SHAPE,
        GuardTag::RawGuard => &*RAW_GUARD_SHAPE,
        GuardTag::MethodGuard => &*METHOD_GUARD_SHAPE,
        GuardTag::InterfaceGuard => &*INTERFACE_GUARD_SHAPE,
    }
}

/// Tag a payload and validate it against its shape.
fn make_guard(tag: GuardTag, payload: Passable) -> Result<Passable, PatternError> {
    let guard = Passable::tagged(tag.tag(), payload);
    with_default_kit(|kit| kit.kind_of(&guard, Checker::Assert)).map_err(|mismatch| {
        let message = mismatch.into_message();
        debug!(guard = %tag, diagnostic = %message, "guard rejected");
        PatternError::WellFormedness(message)
    })?;
    Ok(guard)
}

fn assert_guard_kind(value: &Passable, tag: GuardTag) -> Result<(), PatternError> {
    with_default_kit(|kit| kit.check_kind(value, tag.tag(), Checker::Assert))
        .map_err(|mismatch| PatternError::WellFormedness(mismatch.into_message()))
}

fn field<'a>(guard: &'a Passable, name: &str) -> &'a Passable {
    guard
        .as_tagged()
        .and_then(|t| t.payload().as_record())
        .and_then(|r| r.get(name))
        .unwrap_or(&UNDEFINED)
}

// =============================================================================
// ARGUMENT GUARDS
// =============================================================================

/// A position passed through without checking.
pub fn raw() -> Pattern {
    Passable::tagged(GuardTag::RawGuard.tag(), Passable::record::<&str>([]))
}

/// An async argument: awaited, then checked against `pattern`.
pub fn await_arg(pattern: Pattern) -> Result<Pattern, PatternError> {
    make_guard(GuardTag::AwaitArgGuard, Passable::record([("argGuard", pattern)]))
}

/// Whether a value is an await guard.
#[must_use]
pub fn is_await_arg_guard(value: &Passable) -> bool {
    with_default_kit(|kit| kit.is_kind(value, GuardTag::AwaitArgGuard.tag()))
}

/// Whether a value is a raw guard.
#[must_use]
pub fn is_raw_guard(value: &Passable) -> bool {
    with_default_kit(|kit| kit.is_kind(value, GuardTag::RawGuard.tag()))
}

// =============================================================================
// METHOD GUARDS
// =============================================================================

/// Whether a method is called synchronously or awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Sync,
    Async,
}

impl CallKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CallKind::Sync => "sync",
            CallKind::Async => "async",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A method guard under construction.
#[derive(Debug, Clone)]
pub struct MethodGuardMaker {
    call_kind: CallKind,
    arg_guards: Vec<Pattern>,
    optional_arg_guards: Option<Vec<Pattern>>,
    rest_arg_guard: Option<Pattern>,
}

/// Start a sync method guard with the given required argument guards.
pub fn call(arg_guards: impl IntoIterator<Item = Pattern>) -> MethodGuardMaker {
    MethodGuardMaker::new(CallKind::Sync, arg_guards)
}

/// Start an async method guard. Argument guards may be `await_arg(..)`.
pub fn call_when(arg_guards: impl IntoIterator<Item = Pattern>) -> MethodGuardMaker {
    MethodGuardMaker::new(CallKind::Async, arg_guards)
}

fn misuse(message: &str) -> PatternError {
    debug!(reason = message, "guard builder misuse");
    PatternError::WellFormedness(message.to_owned())
}

impl MethodGuardMaker {
    fn new(call_kind: CallKind, arg_guards: impl IntoIterator<Item = Pattern>) -> Self {
        Self {
            call_kind,
            arg_guards: arg_guards.into_iter().collect(),
            optional_arg_guards: None,
            rest_arg_guard: None,
        }
    }

    /// Guards for optional arguments following the required ones.
    pub fn optional(mut self, guards: impl IntoIterator<Item = Pattern>) -> Result<Self, PatternError> {
        if self.optional_arg_guards.is_some() {
            return Err(misuse("Can only have one set of optional guards"));
        }
        if self.rest_arg_guard.is_some() {
            return Err(misuse("optional arg guards must come before rest arg"));
        }
        self.optional_arg_guards = Some(guards.into_iter().collect());
        Ok(self)
    }

    /// A guard for every argument past the optional ones.
    pub fn rest(mut self, guard: Pattern) -> Result<Self, PatternError> {
        if self.rest_arg_guard.is_some() {
            return Err(misuse("Can only have one rest arg"));
        }
        self.rest_arg_guard = Some(guard);
        Ok(self)
    }

    /// Finish with a return guard, validating the whole method guard.
    pub fn returns(self, guard: Pattern) -> Result<MethodGuard, PatternError> {
        let payload = Passable::record([
            ("callKind", Passable::from(self.call_kind.name())),
            ("argGuards", Passable::array(self.arg_guards)),
            ("optionalArgGuards", self.optional_arg_guards.map_or(Passable::Undefined, Passable::array)),
            ("restArgGuard", self.rest_arg_guard.unwrap_or(Passable::Undefined)),
            ("returnGuard", guard),
        ]);
        make_guard(GuardTag::MethodGuard, payload).map(MethodGuard)
    }

    /// Finish with a method that returns nothing.
    pub fn returns_undefined(self) -> Result<MethodGuard, PatternError> {
        self.returns(m::undefined())
    }
}

/// A validated method guard.
#[derive(Debug, Clone)]
pub struct MethodGuard(Passable);

/// Assert that a value is a method guard.
pub fn assert_method_guard(value: &Passable) -> Result<MethodGuard, PatternError> {
    assert_guard_kind(value, GuardTag::MethodGuard)?;
    Ok(MethodGuard(value.clone()))
}

impl TryFrom<Passable> for MethodGuard {
    type Error = PatternError;

    fn try_from(value: Passable) -> Result<Self, PatternError> {
        assert_method_guard(&value)
    }
}

impl MethodGuard {
    #[must_use]
    pub fn as_passable(&self) -> &Passable {
        &self.0
    }

    #[must_use]
    pub fn into_passable(self) -> Passable {
        self.0
    }

    #[must_use]
    pub fn call_kind(&self) -> CallKind {
        match field(&self.0, "callKind").as_str() {
            Some("async") => CallKind::Async,
            _ => CallKind::Sync,
        }
    }

    #[must_use]
    pub fn arg_guards(&self) -> &[Pattern] {
        field(&self.0, "argGuards").as_array().map_or(&[][..], CopyArray::as_slice)
    }

    #[must_use]
    pub fn optional_arg_guards(&self) -> Option<&[Pattern]> {
        field(&self.0, "optionalArgGuards").as_array().map(CopyArray::as_slice)
    }

    #[must_use]
    pub fn rest_arg_guard(&self) -> Option<&Pattern> {
        Some(field(&self.0, "restArgGuard")).filter(|g| !g.is_undefined())
    }

    #[must_use]
    pub fn return_guard(&self) -> &Pattern {
        field(&self.0, "returnGuard")
    }

    /// Check an argument list at a call boundary.
    ///
    /// Raw positions accept anything. Await positions check the already
    /// resolved value against the awaited pattern. Without a rest guard,
    /// arguments past the optional ones are rejected.
    pub fn check_args(&self, kit: &PatternKit, args: &[Passable]) -> Result<(), PatternError> {
        let param = |guard: &Pattern| -> Pattern {
            if kit.is_kind(guard, GuardTag::RawGuard.tag()) {
                m::any()
            } else if kit.is_kind(guard, GuardTag::AwaitArgGuard.tag()) {
                field(guard, "argGuard").clone()
            } else {
                guard.clone()
            }
        };
        let required = Passable::array(self.arg_guards().iter().map(param));
        let optional = self.optional_arg_guards().map(|g| Passable::array(g.iter().map(param)));
        let rest = self.rest_arg_guard().map(param);
        let pattern = matcher(MatcherTag::SplitArray, m::split_payload(required, optional, rest));
        kit.must_match(&Passable::array(args.iter().cloned()), &pattern, Some("args"))
    }

    /// Check a return value. A raw return guard accepts anything.
    pub fn check_return(&self, kit: &PatternKit, value: &Passable) -> Result<(), PatternError> {
        let guard = self.return_guard();
        if kit.is_kind(guard, GuardTag::RawGuard.tag()) {
            return Ok(());
        }
        kit.must_match(value, guard, Some("return"))
    }
}

// =============================================================================
// INTERFACE GUARDS
// =============================================================================

/// What an interface does with methods it has no guard for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultGuards {
    /// Arguments and results must be passable.
    Passable,
    /// Arguments and results pass through unchecked.
    Raw,
}

impl DefaultGuards {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            DefaultGuards::Passable => DEFAULT_GUARDS_PASSABLE,
            DefaultGuards::Raw => DEFAULT_GUARDS_RAW,
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            DEFAULT_GUARDS_PASSABLE => Some(DefaultGuards::Passable),
            DEFAULT_GUARDS_RAW => Some(DefaultGuards::Raw),
            _ => None,
        }
    }
}

/// Interface options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterfaceOptions {
    /// Allow methods without guards. Implies `DefaultGuards::Passable`
    /// unless `default_guards` says otherwise.
    pub sloppy: bool,
    pub default_guards: Option<DefaultGuards>,
}

/// A method name: a string or a passable symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MethodKey {
    String(String),
    Symbol(String),
}

impl From<&str> for MethodKey {
    fn from(name: &str) -> Self {
        MethodKey::String(name.to_owned())
    }
}

/// Build an interface guard.
///
/// String-named methods go in `methodGuards`; symbol-named ones in a
/// `symbolMethodGuards` copyMap, present only when non-empty.
pub fn interface(
    name: &str,
    methods: impl IntoIterator<Item = (MethodKey, MethodGuard)>,
    options: InterfaceOptions,
) -> Result<InterfaceGuard, PatternError> {
    let mut string_methods = BTreeMap::new();
    let mut symbol_methods = Vec::new();
    for (key, guard) in methods {
        match key {
            MethodKey::String(method) => {
                if string_methods.insert(method.clone(), guard.into_passable()).is_some() {
                    return Err(misuse(&format!("Duplicate method guard for {method:?}")));
                }
            }
            MethodKey::Symbol(symbol) => symbol_methods.push((Passable::symbol(symbol), guard.into_passable())),
        }
    }
    let default_guards = options
        .default_guards
        .or(options.sloppy.then_some(DefaultGuards::Passable));

    let mut payload = BTreeMap::new();
    payload.insert("interfaceName".to_owned(), Passable::from(name));
    payload.insert(
        "methodGuards".to_owned(),
        Passable::CopyRecord(CopyRecord::new(string_methods)),
    );
    payload.insert(
        "defaultGuards".to_owned(),
        default_guards.map_or(Passable::Undefined, |d| Passable::from(d.name())),
    );
    if !symbol_methods.is_empty() {
        payload.insert("symbolMethodGuards".to_owned(), make_copy_map(symbol_methods)?);
    }
    if options.sloppy {
        payload.insert("sloppy".to_owned(), Passable::from(true));
    }
    make_guard(GuardTag::InterfaceGuard, Passable::CopyRecord(CopyRecord::new(payload))).map(InterfaceGuard)
}

/// A validated interface guard.
#[derive(Debug, Clone)]
pub struct InterfaceGuard(Passable);

/// Assert that a value is an interface guard.
pub fn assert_interface_guard(value: &Passable) -> Result<InterfaceGuard, PatternError> {
    assert_guard_kind(value, GuardTag::InterfaceGuard)?;
    Ok(InterfaceGuard(value.clone()))
}

impl TryFrom<Passable> for InterfaceGuard {
    type Error = PatternError;

    fn try_from(value: Passable) -> Result<Self, PatternError> {
        assert_interface_guard(&value)
    }
}

impl InterfaceGuard {
    #[must_use]
    pub fn as_passable(&self) -> &Passable {
        &self.0
    }

    #[must_use]
    pub fn interface_name(&self) -> &str {
        field(&self.0, "interfaceName").as_str().unwrap_or_default()
    }

    /// The guard of a string-named method.
    #[must_use]
    pub fn method_guard(&self, name: &str) -> Option<MethodGuard> {
        field(&self.0, "methodGuards")
            .as_record()
            .and_then(|r| r.get(name))
            .map(|g| MethodGuard(g.clone()))
    }

    /// The guard of a symbol-named method.
    #[must_use]
    pub fn symbol_method_guard(&self, name: &str) -> Option<MethodGuard> {
        let (keys, values) = field(&self.0, "symbolMethodGuards").as_tagged().and_then(copy_map_parts)?;
        let i = find_sorted_key(keys, &Passable::symbol(name))?;
        values.get(i).map(|g| MethodGuard(g.clone()))
    }

    /// Every guarded method: string names first, then symbols.
    #[must_use]
    pub fn method_names(&self) -> Vec<MethodKey> {
        let strings = field(&self.0, "methodGuards")
            .as_record()
            .into_iter()
            .flat_map(|r| r.names())
            .map(MethodKey::from);
        let symbols = field(&self.0, "symbolMethodGuards")
            .as_tagged()
            .and_then(copy_map_parts)
            .into_iter()
            .flat_map(|(keys, _)| keys.iter())
            .filter_map(|k| match k {
                Passable::Symbol(name) => Some(MethodKey::Symbol(name.clone())),
                _ => None,
            });
        strings.chain(symbols).collect()
    }

    #[must_use]
    pub fn default_guards(&self) -> Option<DefaultGuards> {
        field(&self.0, "defaultGuards").as_str().and_then(DefaultGuards::parse)
    }

    #[must_use]
    pub fn sloppy(&self) -> bool {
        field(&self.0, "sloppy").as_bool().unwrap_or(false)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kit::PatternKit;
    use crate::types::Kind;

    fn num(v: f64) -> Passable {
        Passable::number(v)
    }

    #[test]
    fn raw_and_await_guards_classify() {
        assert!(is_raw_guard(&raw()));
        let awaited = await_arg(m::string()).expect("await");
        assert!(is_await_arg_guard(&awaited));
        assert!(!is_raw_guard(&awaited));
        assert!(await_arg(Passable::promise()).is_err());
        assert!(!with_default_kit(|kit| kit.is_pattern(&raw())));
    }

    #[test]
    fn method_guard_views() {
        let guard = call([m::string()])
            .optional([m::number()])
            .and_then(|g| g.rest(m::any()))
            .and_then(|g| g.returns(m::boolean()))
            .expect("method guard");
        assert_eq!(guard.call_kind(), CallKind::Sync);
        assert_eq!(guard.arg_guards().len(), 1);
        assert_eq!(guard.optional_arg_guards().map(<[Pattern]>::len), Some(1));
        assert!(guard.rest_arg_guard().is_some());
        assert_eq!(guard.return_guard().to_string(), m::boolean().to_string());
        assert_eq!(
            crate::kit::kind_of(guard.as_passable()),
            Some(Kind::Guard(GuardTag::MethodGuard))
        );
    }

    #[test]
    fn builder_misuse_fails_at_the_step() {
        let twice = call([]).optional([]).and_then(|g| g.optional([]));
        assert_eq!(twice.expect_err("twice").message(), "Can only have one set of optional guards");
        let late = call([]).rest(m::any()).and_then(|g| g.optional([]));
        assert_eq!(late.expect_err("late").message(), "optional arg guards must come before rest arg");
        let two_rests = call([]).rest(m::any()).and_then(|g| g.rest(m::any()));
        assert_eq!(two_rests.expect_err("two rests").message(), "Can only have one rest arg");
    }

    #[test]
    fn sync_methods_reject_await_guards() {
        let awaited = await_arg(m::number()).expect("await");
        assert!(call([awaited.clone()]).returns_undefined().is_err());
        let guard = call_when([awaited]).returns_undefined().expect("async guard");
        assert_eq!(guard.call_kind(), CallKind::Async);
    }

    #[test]
    fn invalid_return_guard_is_rejected() {
        let err = call([]).returns(Passable::promise()).expect_err("promise return");
        assert!(matches!(err, PatternError::WellFormedness(_)));
    }

    #[test]
    fn check_args_enforces_arity_and_shapes() {
        let kit = PatternKit::default();
        let guard = call([m::number(), raw()])
            .optional([m::string()])
            .and_then(|g| g.returns_undefined())
            .expect("guard");
        assert!(guard.check_args(&kit, &[num(1.0), Passable::promise()]).is_ok());
        assert!(guard.check_args(&kit, &[num(1.0), Passable::Null, Passable::from("s")]).is_ok());
        let err = guard.check_args(&kit, &[num(1.0)]).expect_err("arity");
        assert_eq!(err.message(), "args: Expected at least 2 arguments: [1]");
        let err = guard
            .check_args(&kit, &[Passable::from("x"), Passable::Null])
            .expect_err("first arg");
        assert_eq!(err.message(), "args: arg 0: string \"x\" - Must be a number");
        let err = guard
            .check_args(&kit, &[num(1.0), Passable::Null, Passable::from("s"), Passable::Null])
            .expect_err("extra");
        assert!(err.message().starts_with("args: ...rest:"));
    }

    #[test]
    fn await_positions_check_resolved_values() {
        let kit = PatternKit::default();
        let guard = call_when([await_arg(m::number()).expect("await")])
            .rest(m::array_of(m::string()).expect("arrayOf"))
            .and_then(|g| g.returns_undefined())
            .expect("guard");
        assert!(guard.check_args(&kit, &[num(1.0), Passable::from("a")]).is_ok());
        assert!(guard.check_args(&kit, &[Passable::from("a")]).is_err());
    }

    #[test]
    fn check_return_honors_raw() {
        let kit = PatternKit::default();
        let guard = call([]).returns(m::number()).expect("guard");
        let err = guard.check_return(&kit, &Passable::from("s")).expect_err("string");
        assert_eq!(err.message(), "return: string \"s\" - Must be a number");
        let raw_guard = call([]).returns(raw()).expect("raw return");
        assert!(raw_guard.check_return(&kit, &Passable::promise()).is_ok());
    }

    #[test]
    fn interface_guard_views() {
        let get = call([m::string()]).returns(m::any()).expect("get");
        let iterate = call([]).returns(m::any()).expect("iterate");
        let iface = interface(
            "Store",
            [
                (MethodKey::from("get"), get),
                (MethodKey::Symbol("asyncIterator".to_owned()), iterate),
            ],
            InterfaceOptions::default(),
        )
        .expect("interface");
        assert_eq!(iface.interface_name(), "Store");
        assert!(iface.method_guard("get").is_some());
        assert!(iface.method_guard("set").is_none());
        assert!(iface.symbol_method_guard("asyncIterator").is_some());
        assert_eq!(
            iface.method_names(),
            vec![MethodKey::from("get"), MethodKey::Symbol("asyncIterator".to_owned())]
        );
        assert_eq!(iface.default_guards(), None);
        assert!(!iface.sloppy());
        assert!(assert_interface_guard(iface.as_passable()).is_ok());
        assert!(assert_method_guard(iface.as_passable()).is_err());
    }

    #[test]
    fn sloppy_defaults_to_passable() {
        let options = InterfaceOptions {
            sloppy: true,
            default_guards: None,
        };
        let iface = interface("Loose", [], options).expect("interface");
        assert!(iface.sloppy());
        assert_eq!(iface.default_guards(), Some(DefaultGuards::Passable));
        let raw_iface = interface(
            "Raw",
            [],
            InterfaceOptions {
                sloppy: false,
                default_guards: Some(DefaultGuards::Raw),
            },
        )
        .expect("interface");
        assert_eq!(raw_iface.default_guards(), Some(DefaultGuards::Raw));
    }

    #[test]
    fn duplicate_method_names_are_rejected() {
        let a = call([]).returns_undefined().expect("a");
        let result = interface(
            "Dup",
            [(MethodKey::from("m"), a.clone()), (MethodKey::from("m"), a)],
            InterfaceOptions::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn hand_built_guards_are_validated_on_classification() {
        let bogus = Passable::tagged(
            GuardTag::MethodGuard.tag(),
            Passable::record([("callKind", Passable::from("sometimes"))]),
        );
        assert!(crate::kit::kind_of(&bogus).is_none());
        assert!(assert_method_guard(&bogus).is_err());
    }
}
