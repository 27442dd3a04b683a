//! ICM7170 register handshake.
//!
//! Registers are accessed with fixed three-vector handshakes. A write holds `/CS` and
//! `/WR` low for one vector between two idle vectors; a read does the same with `/RD`
//! and takes the middle vector's response as the register value.
//!
//! The script checks the idle bus, loads a time of day and reads it back, starts the
//! counter and checks that it moves, then enables the one-second periodic interrupt
//! and checks that `/INT` goes low after a second.

use std::time::Duration;

use tracing::{debug, info};

use crate::common::ExerciseError;
use crate::config::ExerciseConfig;
use crate::fixture::Transport;
use crate::profile::rtc::{self, REG_COMMAND, REG_HUNDREDTHS, REG_INTERRUPT};
use crate::profile::{RtcControl, RtcStatus};
use crate::protocol::{ControlSet, Response};
use crate::verifier::{Expectation, Verdict};

use super::{Session, run};

/// Command: counter stopped, 24-hour mode, 32.768 kHz crystal.
const CMD_STOPPED: u8 = 0x04;
/// Command: counter running.
const CMD_RUNNING: u8 = 0x0C;
/// Command: counter running with the interrupt output enabled.
const CMD_RUNNING_INT: u8 = 0x1C;
/// Interrupt mask: one-second periodic.
const MASK_SECOND: u8 = 0x08;

/// Time of day loaded into registers `0x00`-`0x07`: 12:30:23.00 on weekday 5, 23 May (year 25).
const TIME_OF_DAY: [u8; 8] = [0, 12, 30, 23, 5, 23, 25, 5];

/// How long the counter runs before it must have moved.
const RUN_SETTLE: Duration = Duration::from_millis(100);
/// How long to wait for the one-second interrupt.
const INTERRUPT_SETTLE: Duration = Duration::from_millis(1100);

/// Status bits 7..3 with nothing pending.
const STATUS_IDLE: u64 = 0b00000;
/// Status bits 7..3 with the global flag and the one-second source set.
const STATUS_SECOND: u64 = 0b10001;
/// Number of status bits compared.
const STATUS_BITS: u32 = 5;

/// Exercises an ICM7170 real-time clock.
pub fn exercise_rtc<T: Transport + ?Sized>(
    transport: &mut T,
    _config: &ExerciseConfig,
) -> Result<Verdict, ExerciseError> {
    run(transport, rtc::profile()?, |session| RegisterBus::new(session).run())
}

/// Register-level access to an ICM7170.
#[derive(Debug)]
pub struct RegisterBus<'a, 't, T: ?Sized> {
    session: &'a mut Session<'t, T, RtcControl, RtcStatus>,
}

impl<'a, 't, T: Transport + ?Sized> RegisterBus<'a, 't, T> {
    /// Wraps a session on the ICM7170 profile.
    pub const fn new(session: &'a mut Session<'t, T, RtcControl, RtcStatus>) -> Self {
        Self { session }
    }

    fn idle() -> ControlSet<RtcControl> {
        ControlSet::new()
            .release(RtcControl::Cs)
            .release(RtcControl::Wr)
            .release(RtcControl::Rd)
    }

    /// Writes `value` to `register`.
    pub fn write(&mut self, register: u8, value: u8) -> Result<(), ExerciseError> {
        let (address, data) = (u64::from(register), u64::from(value));
        let strobe = Self::idle().assert(RtcControl::Cs).assert(RtcControl::Wr);
        let _ = self.session.transact(&Self::idle(), address, data)?;
        let _ = self.session.transact(&strobe, address, data)?;
        let _ = self.session.transact(&Self::idle(), address, data)?;
        Ok(())
    }

    /// Reads `register`, returning the response captured with `/RD` asserted.
    pub fn read(&mut self, register: u8) -> Result<Response<RtcStatus>, ExerciseError> {
        let address = u64::from(register);
        let strobe = Self::idle().assert(RtcControl::Cs).assert(RtcControl::Rd);
        let _ = self.session.transact(&Self::idle(), address, 0)?;
        let response = self.session.transact(&strobe, address, 0)?;
        let _ = self.session.transact(&Self::idle(), address, 0)?;
        Ok(response)
    }

    fn expect(
        &mut self,
        response: &Response<RtcStatus>,
        signal: RtcStatus,
        expected: Expectation,
        label: &str,
        register: u8,
    ) -> Result<(), ExerciseError> {
        let _ = self
            .session
            .check(response, signal, expected, label, Some(u64::from(register)))?;
        Ok(())
    }

    /// Reads the interrupt status and checks `/INT` and status bits 7..3.
    fn expect_status(
        &mut self,
        interrupt: u64,
        status: u64,
        label: &str,
    ) -> Result<(), ExerciseError> {
        let response = self.read(REG_INTERRUPT)?;
        self.expect(
            &response,
            RtcStatus::Interrupt,
            Expectation::value(interrupt, 1),
            label,
            REG_INTERRUPT,
        )?;
        let actual = response.field(RtcStatus::Data)?.high_bits(STATUS_BITS);
        let _ = self.session.verify(
            RtcStatus::Data,
            actual,
            Expectation::value(status, STATUS_BITS),
            label,
            Some(u64::from(REG_INTERRUPT)),
        );
        Ok(())
    }

    /// Runs the full register script.
    pub fn run(mut self) -> Result<(), ExerciseError> {
        info!("quiescing interrupts");
        self.write(REG_COMMAND, 0x00)?;
        let _ = self.read(REG_INTERRUPT)?;

        let response = self.session.transact(&Self::idle(), 0, 0)?;
        self.expect(
            &response,
            RtcStatus::Data,
            Expectation::floating(8),
            "Outputs floating when idle",
            0,
        )?;
        self.expect(
            &response,
            RtcStatus::Interrupt,
            Expectation::value(1, 1),
            "Interrupt idle",
            0,
        )?;

        self.write(REG_COMMAND, CMD_STOPPED)?;
        self.write(REG_INTERRUPT, 0x00)?;
        self.expect_status(1, STATUS_IDLE, "No interrupt pending")?;

        info!("loading time of day");
        for (register, &value) in (0u8..).zip(TIME_OF_DAY.iter()) {
            self.write(register, value)?;
        }
        for (register, &value) in (0u8..).zip(TIME_OF_DAY.iter()) {
            debug!(register, value, "read back");
            let response = self.read(register)?;
            self.expect(
                &response,
                RtcStatus::Data,
                Expectation::value(u64::from(value), 8),
                "Value set",
                register,
            )?;
            self.expect(
                &response,
                RtcStatus::Interrupt,
                Expectation::value(1, 1),
                "Value set",
                register,
            )?;
        }

        info!("starting counter");
        let before = self.read(REG_HUNDREDTHS)?.field(RtcStatus::Data)?;
        self.write(REG_COMMAND, CMD_RUNNING)?;
        self.session.settle(RUN_SETTLE)?;
        let response = self.read(REG_HUNDREDTHS)?;
        self.expect(
            &response,
            RtcStatus::Data,
            Expectation::Differs(before),
            "Counter running",
            REG_HUNDREDTHS,
        )?;

        info!("checking periodic interrupt");
        self.write(REG_COMMAND, CMD_RUNNING_INT)?;
        self.write(REG_INTERRUPT, MASK_SECOND)?;
        self.expect_status(1, STATUS_IDLE, "Interrupt not yet pending")?;
        self.session.settle(INTERRUPT_SETTLE)?;
        self.expect_status(0, STATUS_SECOND, "Interrupt pending")?;
        Ok(())
    }
}
