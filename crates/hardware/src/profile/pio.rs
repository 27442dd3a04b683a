//! Z80 PIO pin map.
//!
//! Data and both ports are buffered in both directions: data on `O0`-`O7`/`I0`-`I7`,
//! port A on `O8`-`O15`/`I8`-`I15`, port B on `O16`-`O23`/`I16`-`I23`. The fixture never
//! drives the ports, so only the data bus is declared as an output field.

use super::{ChipProfile, Polarity, Signal};
use crate::common::ContractViolation;

/// Z80 PIO control lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PioControl {
    /// `B/A`, port select (`O24`); asserted selects port B.
    Ba,
    /// `C/D`, control/data select (`O25`); asserted selects a control word.
    Cd,
    /// `/CE`, chip enable (`O26`).
    Ce,
    /// `/RD`, read strobe (`O27`).
    Rd,
    /// `/IORQ`, I/O request (`O28`).
    Iorq,
    /// `/M1`, machine cycle one (`O29`).
    M1,
    /// `CLK`, system clock (`O30`).
    Clk,
    /// `IEI`, interrupt daisy-chain enable in (`O31`).
    Ein,
}

impl Signal for PioControl {
    fn name(self) -> &'static str {
        match self {
            Self::Ba => "B/A",
            Self::Cd => "C/D",
            Self::Ce => "/CE",
            Self::Rd => "/RD",
            Self::Iorq => "/IORQ",
            Self::M1 => "/M1",
            Self::Clk => "CLK",
            Self::Ein => "IEI",
        }
    }
}

/// Z80 PIO status fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PioStatus {
    /// Data bus (`I0`-`I7`).
    Data,
    /// Port A (`I8`-`I15`).
    PortA,
    /// Port B (`I16`-`I23`).
    PortB,
    /// `/INT` (`I24`).
    Interrupt,
    /// `IEO`, daisy-chain enable out (`I25`).
    Eout,
}

impl Signal for PioStatus {
    fn name(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::PortA => "port A",
            Self::PortB => "port B",
            Self::Interrupt => "interrupt",
            Self::Eout => "IEO",
        }
    }
}

/// Builds the Z80 PIO pin map.
pub fn profile() -> Result<ChipProfile<PioControl, PioStatus>, ContractViolation> {
    ChipProfile::builder("Z80 PIO")
        .input_width(26)
        .data(0, 8)
        .control(PioControl::Ba, 24, Polarity::ActiveHigh)
        .control(PioControl::Cd, 25, Polarity::ActiveHigh)
        .control(PioControl::Ce, 26, Polarity::ActiveLow)
        .control(PioControl::Rd, 27, Polarity::ActiveLow)
        .control(PioControl::Iorq, 28, Polarity::ActiveLow)
        .control(PioControl::M1, 29, Polarity::ActiveLow)
        .control(PioControl::Clk, 30, Polarity::ActiveHigh)
        .control(PioControl::Ein, 31, Polarity::ActiveHigh)
        .status(PioStatus::Data, 0, 8)
        .status(PioStatus::PortA, 8, 8)
        .status(PioStatus::PortB, 16, 8)
        .status(PioStatus::Interrupt, 24, 1)
        .status(PioStatus::Eout, 25, 1)
        .build()
}
