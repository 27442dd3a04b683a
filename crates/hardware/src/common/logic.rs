//! Three-valued line levels and bus values.
//!
//! The fixture reports every input line as driven low, driven high, or not driven at
//! all. This module provides:
//! 1. **Level:** The state of a single line (`Low`, `High`, `Floating`).
//! 2. **`BusValue`:** A fixed-width group of lines stored as a driven-high mask plus a
//!    floating mask, compared with true three-valued equality.
//!
//! A floating line is never equal to a low line. Treating high impedance as zero
//! would hide chips whose outputs fail to tri-state.

use std::fmt;

use super::constants::{MAX_BUS_WIDTH, SYMBOL_FLOATING, SYMBOL_HIGH, SYMBOL_LOW};

/// Electrical state of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Driven to logic 0.
    Low,
    /// Driven to logic 1.
    High,
    /// No active driver (high impedance).
    Floating,
}

impl Level {
    /// Returns the level for a driven boolean value.
    #[inline]
    pub const fn from_bool(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }

    /// Parses one fixture frame symbol (`0`, `1` or `Z`).
    pub const fn from_symbol(symbol: u8) -> Option<Self> {
        match symbol {
            SYMBOL_LOW => Some(Self::Low),
            SYMBOL_HIGH => Some(Self::High),
            SYMBOL_FLOATING => Some(Self::Floating),
            _ => None,
        }
    }

    /// Returns the fixture frame symbol for this level.
    pub const fn symbol(self) -> u8 {
        match self {
            Self::Low => SYMBOL_LOW,
            Self::High => SYMBOL_HIGH,
            Self::Floating => SYMBOL_FLOATING,
        }
    }
}

/// Returns a mask with the low `width` bits set.
#[inline]
pub(crate) const fn width_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// A group of `width` lines, each `Low`, `High` or `Floating`.
///
/// Bit 0 is the least significant line. `high` and `floating` never share a set bit
/// and never have bits at or above `width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BusValue {
    width: u32,
    high: u64,
    floating: u64,
}

impl BusValue {
    /// A fully driven value. Bits of `value` above `width` are discarded.
    pub const fn driven(value: u64, width: u32) -> Self {
        let width = if width > MAX_BUS_WIDTH { MAX_BUS_WIDTH } else { width };
        Self {
            width,
            high: value & width_mask(width),
            floating: 0,
        }
    }

    /// A value where every line is floating (the all-`Z` sentinel).
    pub const fn floating(width: u32) -> Self {
        let width = if width > MAX_BUS_WIDTH { MAX_BUS_WIDTH } else { width };
        Self {
            width,
            high: 0,
            floating: width_mask(width),
        }
    }

    /// Builds a value from per-line levels, index 0 being bit 0.
    pub fn from_levels(levels: &[Level]) -> Self {
        let mut value = Self {
            width: levels.len().min(MAX_BUS_WIDTH as usize) as u32,
            high: 0,
            floating: 0,
        };
        for (bit, level) in levels.iter().take(MAX_BUS_WIDTH as usize).enumerate() {
            value.set(bit as u32, *level);
        }
        value
    }

    /// Number of lines in this value.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Level of line `bit`. Lines outside the width read as `Floating`.
    pub const fn level(&self, bit: u32) -> Level {
        if bit >= self.width || (self.floating >> bit) & 1 == 1 {
            Level::Floating
        } else if (self.high >> bit) & 1 == 1 {
            Level::High
        } else {
            Level::Low
        }
    }

    /// Sets line `bit` to `level`. Bits outside the width are ignored.
    pub const fn set(&mut self, bit: u32, level: Level) {
        if bit >= self.width {
            return;
        }
        let mask = 1u64 << bit;
        self.high &= !mask;
        self.floating &= !mask;
        match level {
            Level::Low => {}
            Level::High => self.high |= mask,
            Level::Floating => self.floating |= mask,
        }
    }

    /// Returns `true` when every line is floating.
    pub const fn is_floating(&self) -> bool {
        self.width > 0 && self.floating == width_mask(self.width)
    }

    /// Returns the numeric value when no line is floating.
    pub const fn as_driven(&self) -> Option<u64> {
        if self.floating == 0 { Some(self.high) } else { None }
    }

    /// Extracts `width` lines starting at `lsb` as a new value.
    pub const fn slice(&self, lsb: u32, width: u32) -> Self {
        let mask = width_mask(width);
        let (high, floating) = if lsb >= 64 {
            (0, 0)
        } else {
            ((self.high >> lsb) & mask, (self.floating >> lsb) & mask)
        };
        // Lines past our own width are undriven.
        let beyond = if lsb >= self.width {
            mask
        } else {
            mask & !width_mask(self.width - lsb)
        };
        Self {
            width,
            high: high & !beyond,
            floating: floating | beyond,
        }
    }

    /// The `count` most significant lines, in the same order they are displayed.
    pub const fn high_bits(&self, count: u32) -> Self {
        let count = if count > self.width { self.width } else { count };
        self.slice(self.width - count, count)
    }

    /// Reverses line order (bit 0 becomes bit `width - 1`).
    pub const fn reversed(&self) -> Self {
        let mut out = Self {
            width: self.width,
            high: 0,
            floating: 0,
        };
        let mut bit = 0;
        while bit < self.width {
            out.set(self.width - 1 - bit, self.level(bit));
            bit += 1;
        }
        out
    }
}

impl fmt::Display for BusValue {
    /// Formats most significant line first using the fixture symbols (`0`, `1`, `Z`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in (0..self.width).rev() {
            write!(f, "{}", self.level(bit).symbol() as char)?;
        }
        Ok(())
    }
}
