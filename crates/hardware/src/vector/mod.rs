//! Pin vectors.
//!
//! A pin vector is one snapshot of a fixture bus. This module provides:
//! 1. **`OutputVector`:** A two-valued snapshot of the output bus, validated against its width.
//! 2. **`InputFrame`:** The input line as the fixture sent it, symbol order untouched.
//! 3. **`InputVector`:** The input bus indexed by line number, after applying a frame order.
//! 4. **Codec:** Conversion between vectors and wire frames.

/// Wire-frame encoding and decoding.
pub mod codec;

use std::fmt;

use serde::Deserialize;

use crate::common::constants::MAX_BUS_WIDTH;
use crate::common::logic::width_mask;
use crate::common::{BusValue, ContractViolation, Level};

/// Checks that `width` is a usable vector width.
pub(crate) const fn check_width(what: &'static str, width: u32) -> Result<(), ContractViolation> {
    if width == 0 || width > MAX_BUS_WIDTH {
        Err(ContractViolation::InvalidWidth {
            what,
            width,
            max: MAX_BUS_WIDTH,
        })
    } else {
        Ok(())
    }
}

/// A snapshot of the output bus.
///
/// Bits at or above `width` are always zero; construction rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputVector {
    value: u64,
    width: u32,
}

impl OutputVector {
    /// Creates an output vector, failing if `value` has bits outside `width`.
    pub fn new(value: u64, width: u32) -> Result<Self, ContractViolation> {
        check_width("output vector", width)?;
        if value & !width_mask(width) != 0 {
            return Err(ContractViolation::VectorOverflow { value, width });
        }
        Ok(Self { value, width })
    }

    /// Raw vector value, bit 0 being line `O0`.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Bus width in bits.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Level of output line `bit`.
    #[inline]
    pub const fn bit(&self, bit: u32) -> bool {
        bit < self.width && (self.value >> bit) & 1 == 1
    }

    /// Extracts a field of `width` bits starting at `lsb`.
    #[inline]
    pub const fn field(&self, lsb: u32, width: u32) -> u64 {
        (self.value >> lsb) & width_mask(width)
    }
}

impl fmt::Display for OutputVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "o{:0width$b}", self.value, width = self.width as usize)
    }
}

/// How the symbols of an input frame map onto input line numbers.
///
/// Fixture firmware revisions disagree on this, so it is a profile parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum FrameOrder {
    /// The last symbol of the frame is line `I0` (current firmware).
    #[default]
    MsbFirst,
    /// The first symbol of the frame is line `I0`.
    LsbFirst,
}

/// An input frame exactly as received: one symbol per line, in wire order.
///
/// Internally the last symbol is stored at bit 0, so `MsbFirst` frames need no
/// rearranging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputFrame {
    symbols: BusValue,
}

impl InputFrame {
    /// Wraps symbols where bit 0 holds the frame's final symbol.
    pub const fn from_symbols(symbols: BusValue) -> Self {
        Self { symbols }
    }

    /// Builds the frame a fixture using `order` would send for `vector`.
    pub const fn from_vector(vector: &InputVector, order: FrameOrder) -> Self {
        match order {
            FrameOrder::MsbFirst => Self {
                symbols: vector.lines,
            },
            FrameOrder::LsbFirst => Self {
                symbols: vector.lines.reversed(),
            },
        }
    }

    /// Number of symbols in the frame.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.symbols.width()
    }

    /// Returns `true` when the frame carries no symbols.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.symbols.width() == 0
    }

    /// Reinterprets the frame as an input vector.
    pub const fn to_vector(&self, order: FrameOrder) -> InputVector {
        match order {
            FrameOrder::MsbFirst => InputVector {
                lines: self.symbols,
            },
            FrameOrder::LsbFirst => InputVector {
                lines: self.symbols.reversed(),
            },
        }
    }
}

impl fmt::Display for InputFrame {
    /// Formats the frame in wire order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.symbols)
    }
}

/// A snapshot of the input bus, bit 0 being line `I0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputVector {
    lines: BusValue,
}

impl InputVector {
    /// Wraps a bus value as an input vector.
    pub const fn new(lines: BusValue) -> Self {
        Self { lines }
    }

    /// An input bus of `width` lines with nothing driven.
    pub const fn floating(width: u32) -> Self {
        Self {
            lines: BusValue::floating(width),
        }
    }

    /// Bus width in lines.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.lines.width()
    }

    /// All lines as one bus value.
    #[inline]
    pub const fn lines(&self) -> BusValue {
        self.lines
    }

    /// Level of input line `bit`.
    #[inline]
    pub const fn level(&self, bit: u32) -> Level {
        self.lines.level(bit)
    }

    /// Sets input line `bit`.
    #[inline]
    pub const fn set(&mut self, bit: u32, level: Level) {
        self.lines.set(bit, level);
    }

    /// Drives `width` lines starting at `lsb` with `value`.
    pub const fn drive_field(&mut self, lsb: u32, width: u32, value: u64) {
        let mut i = 0;
        while i < width {
            self.lines
                .set(lsb + i, Level::from_bool((value >> i) & 1 == 1));
            i += 1;
        }
    }

    /// Extracts `width` lines starting at `lsb`.
    #[inline]
    pub const fn field(&self, lsb: u32, width: u32) -> BusValue {
        self.lines.slice(lsb, width)
    }
}
