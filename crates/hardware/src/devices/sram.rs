//! Static RAM model.
//!
//! A byte-wide asynchronous SRAM behind the fixture's data latch:
//!
//! * Outputs are driven iff the chip is selected, `/OE` is asserted and `/WE` released.
//! * A write happens on every vector where the chip is selected with `/WE` asserted.
//! * While `/WE` is asserted the fixture's own data latch drives `I0`-`I7`, so the bus
//!   shows the data being written rather than the chip.
//!
//! Three defects can be injected to check that the exerciser catches them: fewer
//! physical address lines than the package declares (upper addresses alias), a data
//! bit stuck at one level, and outputs that pull low instead of floating when the chip
//! is deselected.

use crate::common::{ContractViolation, Level};
use crate::profile::{ChipProfile, SramControl, SramSize, SramStatus};
use crate::vector::{InputVector, OutputVector};

use super::ChipModel;

/// Width of the data bus.
const DATA_WIDTH: u32 = 8;

/// SRAM seated in the fixture.
#[derive(Debug, Clone)]
pub struct SramModel {
    profile: ChipProfile<SramControl, SramStatus>,
    cells: Vec<u8>,
    stuck: Option<(u32, bool)>,
    leaky: bool,
    pins: Option<OutputVector>,
}

impl SramModel {
    /// A healthy chip of the given size. Contents start zeroed.
    pub fn new(size: SramSize) -> Result<Self, ContractViolation> {
        Ok(Self {
            profile: size.profile()?,
            cells: vec![0; 1 << size.address_lines()],
            stuck: None,
            leaky: false,
            pins: None,
        })
    }

    /// Decodes only the low `lines` address lines, so higher addresses alias.
    #[must_use]
    pub fn with_address_lines(mut self, lines: u32) -> Self {
        let lines = lines.min(self.profile.address_lines());
        self.cells = vec![0; 1 << lines];
        self
    }

    /// Forces data bit `bit` to `high` on every read.
    ///
    /// Fails with [`ContractViolation::OutOfBus`] if `bit` is not a data line.
    pub fn with_stuck_bit(mut self, bit: u32, high: bool) -> Result<Self, ContractViolation> {
        if bit >= DATA_WIDTH {
            return Err(ContractViolation::OutOfBus {
                signal: "data",
                bit,
                width: DATA_WIDTH,
                profile: self.profile.name(),
            });
        }
        self.stuck = Some((bit, high));
        Ok(self)
    }

    /// Makes the outputs drive low while the chip is deselected.
    #[must_use]
    pub const fn with_leaky_outputs(mut self) -> Self {
        self.leaky = true;
        self
    }

    /// Reads a cell directly, bypassing the pins. Aliases like the pins do.
    pub fn peek(&self, address: u64) -> u8 {
        self.cells[self.index(address)]
    }

    fn index(&self, address: u64) -> usize {
        address as usize & (self.cells.len() - 1)
    }

    fn asserted(&self, pins: &OutputVector, signal: SramControl) -> bool {
        self.profile.asserted(pins, signal).unwrap_or(false)
    }

    fn selected(&self, pins: &OutputVector) -> bool {
        // Variants without CS2 behave as if it were permanently asserted.
        self.asserted(pins, SramControl::Cs1)
            && self.profile.asserted(pins, SramControl::Cs2).unwrap_or(true)
    }

    fn read_cell(&self, address: u64) -> u8 {
        let value = self.peek(address);
        match self.stuck {
            Some((bit, true)) => value | (1 << bit),
            Some((bit, false)) => value & !(1 << bit),
            None => value,
        }
    }
}

impl ChipModel for SramModel {
    fn name(&self) -> &'static str {
        self.profile.name()
    }

    fn apply(&mut self, outputs: &OutputVector) {
        if self.selected(outputs) && self.asserted(outputs, SramControl::We) {
            let index = self.index(self.profile.address_of(outputs));
            self.cells[index] = self.profile.data_of(outputs) as u8;
        }
        self.pins = Some(*outputs);
    }

    fn release(&mut self) {
        self.pins = None;
    }

    fn sample(&self) -> InputVector {
        let mut bus = InputVector::floating(DATA_WIDTH);
        let Some(pins) = self.pins else {
            return bus;
        };

        if self.asserted(&pins, SramControl::We) {
            bus.drive_field(0, DATA_WIDTH, self.profile.data_of(&pins));
        } else if self.selected(&pins) {
            if self.asserted(&pins, SramControl::Oe) {
                let value = self.read_cell(self.profile.address_of(&pins));
                bus.drive_field(0, DATA_WIDTH, u64::from(value));
            }
        } else if self.leaky {
            for bit in 0..DATA_WIDTH {
                bus.set(bit, Level::Low);
            }
        }
        bus
    }
}
