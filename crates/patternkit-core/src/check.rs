//! # Check Outcomes
//!
//! Every leaf check in the engine reports through one channel: a `Check`,
//! produced under a `Checker` mode.
//!
//! - `Checker::Probe` never formats diagnostics; a failure is just `Err`
//! - `Checker::Assert` carries the labeled diagnostic text
//!
//! Both modes run the same code, so `matches` and `must_match` cannot drift
//! apart except through a matcher that inspects the mode itself.

use std::borrow::Cow;
use std::fmt;

/// The outcome of a check: `Ok` on success.
pub type Check = Result<(), Mismatch>;

/// Selects whether failures carry diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checker {
    /// Non-throwing probe: failures carry no text.
    Probe,
    /// Throwing assertion: failures carry a labeled diagnostic.
    Assert,
}

impl Checker {
    /// Report a failure. The message is only built in `Assert` mode.
    pub fn fail(self, message: impl FnOnce() -> String) -> Check {
        Err(self.mismatch(message))
    }

    /// The mismatch `fail` would report, for results that carry a value.
    pub fn mismatch(self, message: impl FnOnce() -> String) -> Mismatch {
        match self {
            Checker::Probe => Mismatch { message: None },
            Checker::Assert => Mismatch {
                message: Some(message()),
            },
        }
    }

    /// Succeed if `cond` holds, otherwise report a failure.
    pub fn require(self, cond: bool, message: impl FnOnce() -> String) -> Check {
        if cond { Ok(()) } else { self.fail(message) }
    }

    #[must_use]
    pub fn is_probe(self) -> bool {
        self == Checker::Probe
    }
}

/// A reported failure. Only `Assert` mode carries text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    message: Option<String>,
}

impl Mismatch {
    /// The diagnostic, if one was recorded.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Prefix the diagnostic with a location label.
    #[must_use]
    pub fn labeled(self, label: &Label<'_>) -> Self {
        Self {
            message: self.message.map(|m| format!("{label}: {m}")),
        }
    }

    /// Consume into the diagnostic text, with a placeholder for probes.
    #[must_use]
    pub fn into_message(self) -> String {
        self.message
            .unwrap_or_else(|| "match failed (no diagnostic recorded)".to_owned())
    }
}

/// Attach a label to a check outcome.
pub fn labeled(check: Check, label: Option<&Label<'_>>) -> Check {
    match (check, label) {
        (Err(mismatch), Some(label)) => Err(mismatch.labeled(label)),
        (check, _) => check,
    }
}

// =============================================================================
// LABELS
// =============================================================================

/// Locates a failure within a nested structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label<'a> {
    /// A position in a sequence.
    Index(usize),
    /// A property name or a fixed location name.
    Name(Cow<'a, str>),
}

impl From<usize> for Label<'_> {
    fn from(i: usize) -> Self {
        Label::Index(i)
    }
}

impl<'a> From<&'a str> for Label<'a> {
    fn from(s: &'a str) -> Self {
        Label::Name(Cow::Borrowed(s))
    }
}

impl From<String> for Label<'_> {
    fn from(s: String) -> Self {
        Label::Name(Cow::Owned(s))
    }
}

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Index(i) => write!(f, "{i}"),
            Label::Name(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_never_builds_messages() {
        let mismatch = Checker::Probe
            .fail(|| unreachable!("probe must not format"))
            .expect_err("fails");
        assert_eq!(mismatch.message(), None);
    }

    #[test]
    fn assert_carries_labeled_message() {
        let check = Checker::Assert.require(false, || "bad".to_owned());
        let check = labeled(check, Some(&Label::from("x")));
        let check = labeled(check, Some(&Label::from(0)));
        assert_eq!(check.expect_err("fails").message(), Some("0: x: bad"));
    }

    #[test]
    fn require_passes_when_true() {
        assert!(Checker::Assert.require(true, || "unused".to_owned()).is_ok());
    }
}
