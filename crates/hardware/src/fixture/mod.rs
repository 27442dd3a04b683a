//! Fixture transports.
//!
//! The exerciser never touches hardware directly: every bus operation goes through a
//! [`Transport`]. This module provides:
//! 1. **Transport:** The request/response interface the sequencers drive.
//! 2. **Serial:** The byte protocol spoken by the fixture firmware over a serial link.
//! 3. **Simulation:** A transport backed by a behavioural chip model, with virtual time.
//!
//! Exactly one transaction is in flight at any time. Implementations may block.

/// Serial-link transport.
pub mod serial;
/// Simulated transport.
pub mod sim;

use std::thread;
use std::time::Duration;

use crate::common::FixtureError;
use crate::vector::{FrameOrder, InputFrame, OutputVector};

pub use serial::SerialFixture;
pub use sim::{Lamp, SimFixture};

/// Collaborator that applies output vectors and samples the input bus.
pub trait Transport {
    /// Returns the fixture to its idle state. Calling it twice equals calling it once.
    fn reset(&mut self) -> Result<(), FixtureError>;

    /// Applies one output vector.
    fn set_outputs(&mut self, vector: &OutputVector) -> Result<(), FixtureError>;

    /// Shows a progress byte on the fixture's indicator bar. Purely diagnostic.
    fn set_indicator(&mut self, value: u8) -> Result<(), FixtureError>;

    /// Samples the input bus. Blocks until the fixture answers.
    fn read_inputs(&mut self) -> Result<InputFrame, FixtureError>;

    /// Lights the pass lamp.
    fn report_pass(&mut self) -> Result<(), FixtureError>;

    /// Lights the fail lamp.
    fn report_fail(&mut self) -> Result<(), FixtureError>;

    /// Lets `duration` of wall-clock time pass.
    ///
    /// The default blocks the thread; simulated fixtures advance virtual time instead.
    fn settle(&mut self, duration: Duration) -> Result<(), FixtureError> {
        thread::sleep(duration);
        Ok(())
    }

    /// Symbol order of the input frames this fixture sends.
    ///
    /// Sequencers decode every frame with this order, whatever the profile defaults to.
    fn frame_order(&self) -> FrameOrder {
        FrameOrder::MsbFirst
    }

    /// One bus transaction: apply `vector`, then sample the inputs.
    fn transact(&mut self, vector: &OutputVector) -> Result<InputFrame, FixtureError> {
        self.set_outputs(vector)?;
        self.read_inputs()
    }
}
