//! SRAM pin maps.
//!
//! All variants share the same layout: data on `O0`-`O7` (read back on `I0`-`I7`
//! through the fixture's latch), address from `O8` upward, `/CS1` on `O29`, `/OE` on
//! `O30` and `/WE` on `O31`. Variants differ in address width and in whether they
//! have an active-high `CS2` line.
//!
//! | Variant | Package   | Address     | CS2   |
//! |---------|-----------|-------------|-------|
//! | 8k      | 28-pin    | `O8`-`O20`  | `O21` |
//! | 32k     | 28-pin    | `O8`-`O22`  | none  |
//! | 128k    | 32-pin    | `O8`-`O24`  | `O26` |
//! | 256k    | 32-pin    | `O8`-`O25`  | `O26` |
//! | 512k    | 32-pin    | `O8`-`O26`  | none  |

use std::fmt;
use std::str::FromStr;

use super::{ChipProfile, Polarity, Signal};
use crate::common::ContractViolation;

/// Output line of `/CS1`.
const PIN_CS1: u32 = 29;
/// Output line of `/OE`.
const PIN_OE: u32 = 30;
/// Output line of `/WE`.
const PIN_WE: u32 = 31;
/// First address line.
const ADDRESS_LSB: u32 = 8;

/// SRAM control lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SramControl {
    /// `/WE`, write enable.
    We,
    /// `/OE`, output enable.
    Oe,
    /// `/CS1`, primary chip select.
    Cs1,
    /// `CS2`, secondary chip select (some variants only).
    Cs2,
}

impl Signal for SramControl {
    fn name(self) -> &'static str {
        match self {
            Self::We => "/WE",
            Self::Oe => "/OE",
            Self::Cs1 => "/CS1",
            Self::Cs2 => "CS2",
        }
    }
}

/// SRAM status fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SramStatus {
    /// Data bus `I0`-`I7`.
    Data,
}

impl Signal for SramStatus {
    fn name(self) -> &'static str {
        match self {
            Self::Data => "data",
        }
    }
}

/// Supported SRAM sizes, in kilobytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SramSize {
    /// 8k x 8 (e.g. 6264).
    K8,
    /// 32k x 8 (e.g. 62256).
    K32,
    /// 128k x 8 (e.g. 628128).
    K128,
    /// 256k x 8.
    K256,
    /// 512k x 8 (e.g. 628512).
    K512,
}

impl SramSize {
    /// Every supported size, smallest first.
    pub const ALL: [Self; 5] = [Self::K8, Self::K32, Self::K128, Self::K256, Self::K512];

    /// Number of address lines.
    pub const fn address_lines(self) -> u32 {
        match self {
            Self::K8 => 13,
            Self::K32 => 15,
            Self::K128 => 17,
            Self::K256 => 18,
            Self::K512 => 19,
        }
    }

    /// Output line of `CS2`, if the variant has one.
    pub const fn cs2_pin(self) -> Option<u32> {
        match self {
            Self::K8 => Some(21),
            Self::K128 | Self::K256 => Some(26),
            Self::K32 | Self::K512 => None,
        }
    }

    /// Capacity in kilobytes.
    pub const fn kilobytes(self) -> u32 {
        (1 << self.address_lines()) / 1024
    }

    /// Builds the pin map of this variant.
    pub fn profile(self) -> Result<ChipProfile<SramControl, SramStatus>, ContractViolation> {
        let mut builder = ChipProfile::builder(self.name())
            .input_width(8)
            .data(0, 8)
            .address(ADDRESS_LSB, self.address_lines())
            .control(SramControl::Cs1, PIN_CS1, Polarity::ActiveLow)
            .control(SramControl::Oe, PIN_OE, Polarity::ActiveLow)
            .control(SramControl::We, PIN_WE, Polarity::ActiveLow)
            .status(SramStatus::Data, 0, 8);
        if let Some(pin) = self.cs2_pin() {
            builder = builder.control(SramControl::Cs2, pin, Polarity::ActiveHigh);
        }
        builder.build()
    }

    const fn name(self) -> &'static str {
        match self {
            Self::K8 => "SRAM 8k",
            Self::K32 => "SRAM 32k",
            Self::K128 => "SRAM 128k",
            Self::K256 => "SRAM 256k",
            Self::K512 => "SRAM 512k",
        }
    }
}

impl fmt::Display for SramSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}k", self.kilobytes())
    }
}

impl FromStr for SramSize {
    type Err = String;

    /// Parses a size in kilobytes (`"8"`, `"32k"`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kilobytes = s.trim().trim_end_matches(['k', 'K']);
        Self::ALL
            .into_iter()
            .find(|size| size.kilobytes().to_string() == kilobytes)
            .ok_or_else(|| format!("unsupported SRAM size `{s}` (expected 8, 32, 128, 256 or 512)"))
    }
}
