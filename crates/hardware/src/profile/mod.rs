//! Chip profiles.
//!
//! A profile is the declarative pin map of one chip variant on the fixture. It provides:
//! 1. **Signals:** Per-family enums naming control lines (outputs) and status fields
//!    (inputs), so an unknown signal is a type error rather than a typo.
//! 2. **Layout:** Address and data fields, control line bits and polarities, status
//!    field ranges, and the input frame order.
//! 3. **Validation:** Construction rejects overlapping lines and lines outside the bus.
//!
//! Profiles are built once per run from a variant selector and never mutated.

/// Z80 PIO profile.
pub mod pio;
/// ICM7170 real-time clock profile.
pub mod rtc;
/// SRAM profiles.
pub mod sram;

use std::fmt;

use crate::common::ContractViolation;
use crate::common::constants::{MAX_BUS_WIDTH, OUTPUT_WIDTH};
use crate::vector::{FrameOrder, OutputVector, check_width};

pub use pio::{PioControl, PioStatus};
pub use rtc::{RtcControl, RtcStatus};
pub use sram::{SramControl, SramSize, SramStatus};

/// A named line or field of one chip family.
pub trait Signal: Copy + Eq + fmt::Debug {
    /// Name used in diagnostics and failure records.
    fn name(self) -> &'static str;
}

/// Which line level means "asserted".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Asserted when low (`/CS`, `/WE`, ...).
    ActiveLow,
    /// Asserted when high (`CS2`, `CLK`, ...).
    ActiveHigh,
}

impl Polarity {
    /// Line level for the given assertion state.
    #[inline]
    pub const fn level(self, asserted: bool) -> bool {
        match self {
            Self::ActiveLow => !asserted,
            Self::ActiveHigh => asserted,
        }
    }
}

/// A contiguous range of bus lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    /// Lowest line of the field.
    pub lsb: u32,
    /// Number of lines.
    pub width: u32,
}

impl BitField {
    /// Creates a field of `width` lines starting at `lsb`.
    pub const fn new(lsb: u32, width: u32) -> Self {
        Self { lsb, width }
    }

    /// A single line.
    pub const fn line(bit: u32) -> Self {
        Self { lsb: bit, width: 1 }
    }

    /// Highest line of the field, or `None` for an empty field or one running past
    /// line `u32::MAX`.
    #[inline]
    pub const fn msb(&self) -> Option<u32> {
        match self.lsb.checked_add(self.width) {
            Some(end) => end.checked_sub(1),
            None => None,
        }
    }

    /// Largest value the field can hold, plus one.
    #[inline]
    pub const fn capacity(&self) -> u64 {
        if self.width >= 64 { u64::MAX } else { 1u64 << self.width }
    }

    /// Returns `true` if `value` fits.
    #[inline]
    pub const fn fits(&self, value: u64) -> bool {
        self.width >= 64 || value < (1u64 << self.width)
    }
}

/// A control line on the output bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlLine<C> {
    /// Which signal this line carries.
    pub signal: C,
    /// Output bit index.
    pub bit: u32,
    /// Level that asserts the signal.
    pub polarity: Polarity,
}

/// A status field on the input bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusField<S> {
    /// Which signal this field carries.
    pub signal: S,
    /// Input lines of the field.
    pub field: BitField,
}

/// Pin map of one chip variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipProfile<C, S> {
    name: &'static str,
    output_width: u32,
    input_width: u32,
    frame_order: FrameOrder,
    address: Option<BitField>,
    data: BitField,
    controls: Vec<ControlLine<C>>,
    status: Vec<StatusField<S>>,
}

impl<C: Signal, S: Signal> ChipProfile<C, S> {
    /// Starts a profile with the standard 32-line output bus.
    pub const fn builder(name: &'static str) -> ProfileBuilder<C, S> {
        ProfileBuilder {
            name,
            output_width: OUTPUT_WIDTH,
            input_width: 8,
            frame_order: FrameOrder::MsbFirst,
            address: None,
            data: BitField::new(0, 8),
            controls: Vec::new(),
            status: Vec::new(),
        }
    }

    /// Profile name (e.g. `"SRAM 8k"`).
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Output bus width in bits.
    #[inline]
    pub const fn output_width(&self) -> u32 {
        self.output_width
    }

    /// Input bus width in lines.
    #[inline]
    pub const fn input_width(&self) -> u32 {
        self.input_width
    }

    /// Symbol order of the fixture's input frames.
    #[inline]
    pub const fn frame_order(&self) -> FrameOrder {
        self.frame_order
    }

    /// The same pin map, decoding input frames in `order`.
    #[must_use]
    pub const fn with_frame_order(mut self, order: FrameOrder) -> Self {
        self.frame_order = order;
        self
    }

    /// Address field, if the chip has one.
    #[inline]
    pub const fn address(&self) -> Option<BitField> {
        self.address
    }

    /// Number of address lines (0 without an address field).
    #[inline]
    pub fn address_lines(&self) -> u32 {
        self.address.map_or(0, |field| field.width)
    }

    /// Data field on the output bus.
    #[inline]
    pub const fn data(&self) -> BitField {
        self.data
    }

    /// Declared control lines.
    #[inline]
    pub fn controls(&self) -> &[ControlLine<C>] {
        &self.controls
    }

    /// Declared status fields.
    #[inline]
    pub fn status_fields(&self) -> &[StatusField<S>] {
        &self.status
    }

    /// Looks up the line carrying `signal`.
    pub fn control(&self, signal: C) -> Option<&ControlLine<C>> {
        self.controls.iter().find(|line| line.signal == signal)
    }

    /// Returns `true` if the variant has the line `signal`.
    pub fn has_control(&self, signal: C) -> bool {
        self.control(signal).is_some()
    }

    /// Looks up the input field carrying `signal`.
    pub fn status(&self, signal: S) -> Result<BitField, ContractViolation> {
        self.status
            .iter()
            .find(|status| status.signal == signal)
            .map(|status| status.field)
            .ok_or(ContractViolation::UndeclaredSignal {
                signal: signal.name(),
                profile: self.name,
            })
    }

    /// Reads back whether `signal` is asserted in `vector`.
    ///
    /// Returns `None` when the variant has no such line.
    pub fn asserted(&self, vector: &OutputVector, signal: C) -> Option<bool> {
        self.control(signal)
            .map(|line| vector.bit(line.bit) == line.polarity.level(true))
    }

    /// Reads back the address carried by `vector` (0 without an address field).
    pub fn address_of(&self, vector: &OutputVector) -> u64 {
        self.address
            .map_or(0, |field| vector.field(field.lsb, field.width))
    }

    /// Reads back the data carried by `vector`.
    pub fn data_of(&self, vector: &OutputVector) -> u64 {
        vector.field(self.data.lsb, self.data.width)
    }
}

/// Named-field construction of a [`ChipProfile`].
#[derive(Debug, Clone)]
pub struct ProfileBuilder<C, S> {
    name: &'static str,
    output_width: u32,
    input_width: u32,
    frame_order: FrameOrder,
    address: Option<BitField>,
    data: BitField,
    controls: Vec<ControlLine<C>>,
    status: Vec<StatusField<S>>,
}

impl<C: Signal, S: Signal> ProfileBuilder<C, S> {
    /// Overrides the output bus width.
    pub fn output_width(mut self, width: u32) -> Self {
        self.output_width = width;
        self
    }

    /// Sets the input bus width.
    pub fn input_width(mut self, width: u32) -> Self {
        self.input_width = width;
        self
    }

    /// Sets the input frame order.
    pub fn frame_order(mut self, order: FrameOrder) -> Self {
        self.frame_order = order;
        self
    }

    /// Declares `width` address lines starting at output `lsb`.
    pub fn address(mut self, lsb: u32, width: u32) -> Self {
        self.address = Some(BitField::new(lsb, width));
        self
    }

    /// Declares `width` data lines starting at output `lsb`.
    pub fn data(mut self, lsb: u32, width: u32) -> Self {
        self.data = BitField::new(lsb, width);
        self
    }

    /// Declares a control line.
    pub fn control(mut self, signal: C, bit: u32, polarity: Polarity) -> Self {
        self.controls.push(ControlLine {
            signal,
            bit,
            polarity,
        });
        self
    }

    /// Declares a status field of `width` input lines starting at `lsb`.
    pub fn status(mut self, signal: S, lsb: u32, width: u32) -> Self {
        self.status.push(StatusField {
            signal,
            field: BitField::new(lsb, width),
        });
        self
    }

    /// Validates the layout and freezes the profile.
    pub fn build(self) -> Result<ChipProfile<C, S>, ContractViolation> {
        check_width("output bus", self.output_width)?;
        check_width("input bus", self.input_width)?;

        let mut outputs = Claims::new(self.name, self.output_width);
        if let Some(address) = self.address {
            outputs.claim("address", address)?;
        }
        outputs.claim("data", self.data)?;
        for line in &self.controls {
            outputs.claim(line.signal.name(), BitField::line(line.bit))?;
        }

        let mut inputs = Claims::new(self.name, self.input_width);
        for status in &self.status {
            inputs.claim(status.signal.name(), status.field)?;
        }

        Ok(ChipProfile {
            name: self.name,
            output_width: self.output_width,
            input_width: self.input_width,
            frame_order: self.frame_order,
            address: self.address,
            data: self.data,
            controls: self.controls,
            status: self.status,
        })
    }
}

/// Tracks which signal owns each line of one bus.
struct Claims {
    profile: &'static str,
    width: u32,
    owners: [Option<&'static str>; MAX_BUS_WIDTH as usize],
}

impl Claims {
    const fn new(profile: &'static str, width: u32) -> Self {
        Self {
            profile,
            width,
            owners: [None; MAX_BUS_WIDTH as usize],
        }
    }

    fn claim(&mut self, signal: &'static str, field: BitField) -> Result<(), ContractViolation> {
        check_width(signal, field.width)?;
        let msb = field.msb().unwrap_or(u32::MAX);
        if msb >= self.width {
            return Err(ContractViolation::OutOfBus {
                signal,
                bit: msb,
                width: self.width,
                profile: self.profile,
            });
        }
        for bit in field.lsb..=msb {
            let owner = &mut self.owners[bit as usize];
            if let Some(first) = *owner {
                return Err(ContractViolation::OverlappingSignals {
                    first,
                    second: signal,
                    bit,
                    profile: self.profile,
                });
            }
            *owner = Some(signal);
        }
        Ok(())
    }
}
