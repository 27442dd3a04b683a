//! ICM7170 real-time clock pin map.
//!
//! The data bus `D0`-`D7` is wired to `O0`-`O7` through a buffer and read back on
//! `I0`-`I7`. The register address `A0`-`A4` sits on `O8`-`O12`, the strobes follow it,
//! and the open-drain `/INT` output is sampled on `I8`. `INTS` is grounded and `ALE`
//! tied high, so the chip runs in non-multiplexed mode off a 32.768 kHz crystal.

use super::{ChipProfile, Polarity, Signal};
use crate::common::ContractViolation;

/// Number of register address lines.
pub const RTC_ADDRESS_LINES: u32 = 5;

/// Hundredths-of-a-second counter; the first of eight time-of-day counters.
pub const REG_HUNDREDTHS: u8 = 0x00;
/// Interrupt mask (write) / interrupt status (read).
pub const REG_INTERRUPT: u8 = 0x10;
/// Command register.
pub const REG_COMMAND: u8 = 0x11;

/// ICM7170 control lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RtcControl {
    /// `/CS`, chip select (`O13`).
    Cs,
    /// `/WR`, write strobe (`O14`).
    Wr,
    /// `/RD`, read strobe (`O15`).
    Rd,
}

impl Signal for RtcControl {
    fn name(self) -> &'static str {
        match self {
            Self::Cs => "/CS",
            Self::Wr => "/WR",
            Self::Rd => "/RD",
        }
    }
}

/// ICM7170 status fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RtcStatus {
    /// Data bus (`I0`-`I7`).
    Data,
    /// `/INT` line (`I8`); high while no interrupt is pending.
    Interrupt,
}

impl Signal for RtcStatus {
    fn name(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Interrupt => "interrupt",
        }
    }
}

/// Builds the ICM7170 pin map.
pub fn profile() -> Result<ChipProfile<RtcControl, RtcStatus>, ContractViolation> {
    ChipProfile::builder("ICM7170")
        .input_width(9)
        .data(0, 8)
        .address(8, RTC_ADDRESS_LINES)
        .control(RtcControl::Cs, 13, Polarity::ActiveLow)
        .control(RtcControl::Wr, 14, Polarity::ActiveLow)
        .control(RtcControl::Rd, 15, Polarity::ActiveLow)
        .status(RtcStatus::Data, 0, 8)
        .status(RtcStatus::Interrupt, 8, 1)
        .build()
}
