//! Behavioural chip models.
//!
//! Models stand in for a chip seated in the fixture socket so the sequencers can run
//! without hardware. This module provides:
//! 1. **`ChipModel`:** The interface a [`SimFixture`](crate::fixture::SimFixture) drives.
//! 2. **SRAM:** Byte-wide static RAM with injectable defects.
//! 3. **ICM7170:** Register file, counter chain and periodic interrupts of the RTC.
//! 4. **Z80 PIO:** Reset detection, control-word decoding and port drivers.
//!
//! Models decode the output vector through the same [`ChipProfile`](crate::profile::ChipProfile)
//! the sequencers encode with, so a wiring mistake shows up on both sides.

/// ICM7170 real-time clock model.
pub mod icm7170;
/// SRAM model.
pub mod sram;
/// Z80 PIO model.
pub mod z80_pio;

use std::time::Duration;

use crate::vector::{InputVector, OutputVector};

pub use icm7170::Icm7170;
pub use sram::SramModel;
pub use z80_pio::Z80Pio;

/// A chip as seen from the fixture's pins.
pub trait ChipModel {
    /// Returns a short name for this model (e.g., `"SRAM 8k"`).
    fn name(&self) -> &'static str;

    /// Applies a new output vector to the chip's pins.
    fn apply(&mut self, outputs: &OutputVector);

    /// The fixture stopped driving its outputs (fixture reset).
    fn release(&mut self);

    /// Samples the fixture's input bus.
    fn sample(&self) -> InputVector;

    /// Lets `elapsed` of time pass (default: the chip has no notion of time).
    fn advance(&mut self, elapsed: Duration) {
        let _ = elapsed;
    }
}
