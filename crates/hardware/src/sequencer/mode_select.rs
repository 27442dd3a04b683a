//! Z80 PIO reset and mode select.
//!
//! The PIO is clocked by the fixture, so every bus cycle is spelled out as pairs of
//! vectors (clock high, clock low). Three building blocks are used:
//!
//! 1. **Reset:** 30 cycles with `/M1` released, then 30 with `/M1` asserted and `/RD`
//!    and `/IORQ` released, which the PIO decodes as a reset. An idle vector follows.
//! 2. **M1 cycle:** `/M1` asserted on the first falling edge, `/M1` and `/RD` asserted
//!    for two full cycles, then both released. The PIO ignores writes until it has
//!    seen one.
//! 3. **Word write:** With `/CE` asserted and `C/D`, `B/A` and data held, `/IORQ` is
//!    released, asserted, and released again on the final falling edge.
//!
//! The script puts both ports into output mode, checks that nothing is driven until
//! data is written, then writes a distinct byte to each port and reads it back.

use tracing::{debug, info};

use crate::common::ExerciseError;
use crate::common::constants::PIO_RESET_CYCLES;
use crate::config::ExerciseConfig;
use crate::fixture::Transport;
use crate::profile::{PioControl, PioStatus, pio};
use crate::protocol::ControlSet;
use crate::verifier::{Expectation, Verdict};

use super::{Session, run};

/// Mode-select word: mode 0 (output).
const MODE_OUTPUT: u8 = 0x0F;
/// Byte written to port A.
const PORT_A_DATA: u8 = 0x55;
/// Byte written to port B.
const PORT_B_DATA: u8 = 0x33;
/// Width of a port.
const PORT_WIDTH: u32 = 8;

/// Exercises a Z80 PIO.
pub fn exercise_pio<T: Transport + ?Sized>(
    transport: &mut T,
    _config: &ExerciseConfig,
) -> Result<Verdict, ExerciseError> {
    run(transport, pio::profile()?, |session| {
        ModeSelect::new(session).run()
    })
}

/// One of the two PIO ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    /// Port A (`B/A` low).
    A,
    /// Port B (`B/A` high).
    B,
}

impl Port {
    const fn status(self) -> PioStatus {
        match self {
            Self::A => PioStatus::PortA,
            Self::B => PioStatus::PortB,
        }
    }
}

/// Whether a written word goes to the control or the data register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// Control word (`C/D` high).
    Control,
    /// Port data (`C/D` low).
    Data,
}

/// Clock-level access to a Z80 PIO.
#[derive(Debug)]
pub struct ModeSelect<'a, 't, T: ?Sized> {
    session: &'a mut Session<'t, T, PioControl, PioStatus>,
}

impl<'a, 't, T: Transport + ?Sized> ModeSelect<'a, 't, T> {
    /// Wraps a session on the Z80 PIO profile.
    pub const fn new(session: &'a mut Session<'t, T, PioControl, PioStatus>) -> Self {
        Self { session }
    }

    /// Everything released, clock low, daisy chain enabled.
    fn idle() -> ControlSet<PioControl> {
        ControlSet::new()
            .release(PioControl::Ba)
            .release(PioControl::Cd)
            .release(PioControl::Ce)
            .release(PioControl::Rd)
            .release(PioControl::Iorq)
            .release(PioControl::M1)
            .release(PioControl::Clk)
            .assert(PioControl::Ein)
    }

    /// Applies one vector; the response is read and discarded.
    fn step(&mut self, controls: &ControlSet<PioControl>, data: u8) -> Result<(), ExerciseError> {
        let _ = self.session.transact(controls, 0, u64::from(data))?;
        Ok(())
    }

    /// One clock cycle: `high` with the clock high, then `low` with it low.
    fn cycle(
        &mut self,
        high: ControlSet<PioControl>,
        low: ControlSet<PioControl>,
        data: u8,
    ) -> Result<(), ExerciseError> {
        self.step(&high.assert(PioControl::Clk), data)?;
        self.step(&low.release(PioControl::Clk), data)
    }

    /// Resets the PIO.
    pub fn reset(&mut self) -> Result<(), ExerciseError> {
        let released = Self::idle();
        let m1 = Self::idle().assert(PioControl::M1);
        for _ in 0..PIO_RESET_CYCLES {
            self.cycle(released.clone(), released.clone(), 0)?;
        }
        for _ in 0..PIO_RESET_CYCLES {
            self.cycle(m1.clone(), m1.clone(), 0)?;
        }
        self.step(&released, 0)
    }

    /// Runs one instruction fetch cycle so the PIO accepts writes.
    pub fn m1_cycle(&mut self) -> Result<(), ExerciseError> {
        let released = Self::idle();
        let m1 = Self::idle().assert(PioControl::M1);
        let fetch = m1.clone().assert(PioControl::Rd);
        self.cycle(released.clone(), m1, 0)?;
        self.cycle(fetch.clone(), fetch.clone(), 0)?;
        self.cycle(fetch.clone(), fetch, 0)?;
        self.cycle(released.clone(), released, 0)
    }

    /// Writes `value` to the control or data register of `port`.
    pub fn write(&mut self, port: Port, register: Register, value: u8) -> Result<(), ExerciseError> {
        let selected = Self::idle()
            .assert(PioControl::Ce)
            .with(PioControl::Cd, register == Register::Control)
            .with(PioControl::Ba, port == Port::B);
        let request = selected.clone().assert(PioControl::Iorq);
        self.cycle(selected.clone(), selected.clone(), value)?;
        self.cycle(request.clone(), request.clone(), value)?;
        self.cycle(request, selected, value)
    }

    /// Checks the lines of `port` against `expected`.
    fn expect_port(
        &mut self,
        port: Port,
        expected: Expectation,
        label: &str,
    ) -> Result<(), ExerciseError> {
        let response = self.session.transact(&Self::idle(), 0, 0)?;
        let _ = self
            .session
            .check(&response, port.status(), expected, label, None)?;
        Ok(())
    }

    /// Runs the full mode-select script.
    pub fn run(mut self) -> Result<(), ExerciseError> {
        info!("resetting");
        self.reset()?;
        let floating = Expectation::floating(PORT_WIDTH);
        self.expect_port(Port::A, floating, "Port A floating after reset")?;
        self.expect_port(Port::B, floating, "Port B floating after reset")?;

        info!("selecting output mode");
        for (port, label) in [
            (Port::A, "Port A floating after mode select"),
            (Port::B, "Port B floating after mode select"),
        ] {
            debug!(?port, "mode select");
            self.m1_cycle()?;
            self.write(port, Register::Control, MODE_OUTPUT)?;
            self.expect_port(port, floating, label)?;
        }

        info!("writing port data");
        for (port, value, label) in [
            (Port::A, PORT_A_DATA, "Port A outputs data"),
            (Port::B, PORT_B_DATA, "Port B outputs data"),
        ] {
            debug!(?port, value, "data write");
            self.m1_cycle()?;
            self.write(port, Register::Data, value)?;
            self.expect_port(
                port,
                Expectation::value(u64::from(value), PORT_WIDTH),
                label,
            )?;
        }
        Ok(())
    }
}
