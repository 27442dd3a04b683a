//! Result verification.
//!
//! The verifier compares decoded fields against expectations and keeps every mismatch.
//! It never stops a run: an exhaustive sweep should surface every failing address in
//! one pass. The run passes iff no failure was recorded.

use std::fmt;

use tracing::warn;

use crate::common::BusValue;

/// What a decoded field should look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// Exactly this value, line by line (so all-`Z` only matches all-`Z`).
    Equals(BusValue),
    /// Anything except this value.
    Differs(BusValue),
}

impl Expectation {
    /// Expects a fully driven value.
    pub const fn value(value: u64, width: u32) -> Self {
        Self::Equals(BusValue::driven(value, width))
    }

    /// Expects every line of a `width`-line field to float.
    pub const fn floating(width: u32) -> Self {
        Self::Equals(BusValue::floating(width))
    }

    /// Returns `true` if `actual` satisfies the expectation.
    pub fn matches(&self, actual: &BusValue) -> bool {
        match self {
            Self::Equals(expected) => expected == actual,
            Self::Differs(previous) => previous != actual,
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(expected) => write!(f, "{expected}"),
            Self::Differs(previous) => write!(f, "not {previous}"),
        }
    }
}

/// One recorded mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    /// Address under test, for address-oriented sequences.
    pub address: Option<u64>,
    /// Name of the decoded field that mismatched.
    pub field: &'static str,
    /// What was expected.
    pub expected: Expectation,
    /// What the fixture reported.
    pub actual: BusValue,
    /// Description of the step.
    pub label: String,
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): expected {}, got {}",
            self.label, self.field, self.expected, self.actual
        )?;
        if let Some(address) = self.address {
            write!(f, " at address {address:04x}")?;
        }
        Ok(())
    }
}

/// Accumulates failures for one run.
#[derive(Debug, Default)]
pub struct Verifier {
    failures: Vec<FailureRecord>,
    checks: u64,
}

impl Verifier {
    /// A verifier with no failures.
    pub const fn new() -> Self {
        Self {
            failures: Vec::new(),
            checks: 0,
        }
    }

    /// Checks `actual` against `expected`, recording a failure on mismatch.
    ///
    /// Returns `true` when the check passed.
    pub fn check(
        &mut self,
        label: &str,
        field: &'static str,
        address: Option<u64>,
        actual: BusValue,
        expected: Expectation,
    ) -> bool {
        self.checks += 1;
        if expected.matches(&actual) {
            return true;
        }
        let record = FailureRecord {
            address,
            field,
            expected,
            actual,
            label: label.to_owned(),
        };
        warn!("test failed: {record}");
        self.failures.push(record);
        false
    }

    /// Number of comparisons made so far.
    #[inline]
    pub const fn checks(&self) -> u64 {
        self.checks
    }

    /// Failures recorded so far.
    #[inline]
    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    /// Returns `true` while no failure has been recorded.
    #[inline]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Ends the run.
    pub fn finish(self) -> Verdict {
        Verdict {
            failures: self.failures,
            checks: self.checks,
        }
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    failures: Vec<FailureRecord>,
    checks: u64,
}

impl Verdict {
    /// Returns `true` iff no failure was recorded.
    #[inline]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of recorded failures.
    #[inline]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of comparisons made during the run.
    #[inline]
    pub const fn checks(&self) -> u64 {
        self.checks
    }

    /// Every recorded failure, in discovery order.
    #[inline]
    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }
}
