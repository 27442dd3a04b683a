//! Stimulus sequencers.
//!
//! Each chip family has a fixed script of bus operations. This module provides:
//! 1. **Session:** Owns the profile and the verifier, borrows the transport, and turns
//!    named control sets into checked bus transactions.
//! 2. **Memory Sweep:** Floating checks, sizing probe, pattern sweep and retention
//!    check for SRAM.
//! 3. **Register Handshake:** Write/read handshakes and the interrupt check for the
//!    ICM7170.
//! 4. **Mode Select:** Reset, M1 cycles and port configuration for the Z80 PIO.
//!
//! Every output vector is followed by a read of the input bus. Mismatches are
//! recorded and the script carries on; contract violations and fixture errors end the
//! run immediately.

/// SRAM sweep.
pub mod memory;
/// Z80 PIO reset and mode select.
pub mod mode_select;
/// ICM7170 register handshake.
pub mod register;

use std::time::Duration;

use tracing::{info, warn};

use crate::common::{BusValue, ExerciseError};
use crate::fixture::Transport;
use crate::profile::{ChipProfile, Signal};
use crate::protocol::{self, ControlSet, Response};
use crate::verifier::{Expectation, Verdict, Verifier};

pub use memory::exercise_sram;
pub use mode_select::exercise_pio;
pub use register::exercise_rtc;

/// One run against one chip.
#[derive(Debug)]
pub struct Session<'t, T: ?Sized, C, S> {
    transport: &'t mut T,
    profile: ChipProfile<C, S>,
    verifier: Verifier,
}

impl<'t, T, C, S> Session<'t, T, C, S>
where
    T: Transport + ?Sized,
    C: Signal,
    S: Signal,
{
    /// Starts a session with an empty failure list.
    pub const fn new(transport: &'t mut T, profile: ChipProfile<C, S>) -> Self {
        Self {
            transport,
            profile,
            verifier: Verifier::new(),
        }
    }

    /// The chip profile in use.
    pub const fn profile(&self) -> &ChipProfile<C, S> {
        &self.profile
    }

    /// Failures recorded so far.
    pub const fn verifier(&self) -> &Verifier {
        &self.verifier
    }

    /// Applies one vector and decodes the inputs sampled right after it.
    pub fn transact(
        &mut self,
        controls: &ControlSet<C>,
        address: u64,
        data: u64,
    ) -> Result<Response<S>, ExerciseError> {
        let vector = protocol::build(&self.profile, controls, address, data)?;
        let frame = self.transport.transact(&vector)?;
        Ok(protocol::decode(&self.profile, &frame)?)
    }

    /// Checks one field of `response`, recording a failure on mismatch.
    ///
    /// Returns `Ok(true)` when the field matched.
    pub fn check(
        &mut self,
        response: &Response<S>,
        signal: S,
        expected: Expectation,
        label: &str,
        address: Option<u64>,
    ) -> Result<bool, ExerciseError> {
        let actual = response.field(signal)?;
        Ok(self.verify(signal, actual, expected, label, address))
    }

    /// Checks a value already derived from `signal` (e.g. a slice of it).
    pub fn verify(
        &mut self,
        signal: S,
        actual: BusValue,
        expected: Expectation,
        label: &str,
        address: Option<u64>,
    ) -> bool {
        self.verifier
            .check(label, signal.name(), address, actual, expected)
    }

    /// Shows a progress byte on the indicator bar.
    pub fn indicate(&mut self, value: u8) -> Result<(), ExerciseError> {
        Ok(self.transport.set_indicator(value)?)
    }

    /// Lets `duration` of wall-clock time pass.
    pub fn settle(&mut self, duration: Duration) -> Result<(), ExerciseError> {
        Ok(self.transport.settle(duration)?)
    }

    /// Ends the session.
    pub fn finish(self) -> Verdict {
        self.verifier.finish()
    }
}

/// Runs `script` against a freshly reset fixture and reports the verdict.
///
/// The pass or fail lamp is lit exactly once. A fatal error lights the fail lamp (best
/// effort) and is returned instead of a verdict.
pub(crate) fn run<T, C, S, F>(
    transport: &mut T,
    profile: ChipProfile<C, S>,
    script: F,
) -> Result<Verdict, ExerciseError>
where
    T: Transport + ?Sized,
    C: Signal,
    S: Signal,
    F: FnOnce(&mut Session<'_, T, C, S>) -> Result<(), ExerciseError>,
{
    let profile = profile.with_frame_order(transport.frame_order());
    let chip = profile.name();
    info!(chip, order = ?profile.frame_order(), "exercise started");
    transport.reset()?;

    let mut session = Session::new(&mut *transport, profile);
    let outcome = script(&mut session);
    let verdict = session.finish();

    if let Err(err) = outcome {
        warn!(chip, "exercise aborted: {err}");
        let _ = transport.report_fail();
        return Err(err);
    }

    if verdict.passed() {
        info!(chip, checks = verdict.checks(), "exercise passed");
        transport.report_pass()?;
    } else {
        warn!(
            chip,
            failures = verdict.failure_count(),
            checks = verdict.checks(),
            "exercise failed"
        );
        transport.report_fail()?;
    }
    Ok(verdict)
}
