//! Zilog Z80 PIO model.
//!
//! The PIO has no reset pin. It resets itself when it sees `/M1` asserted on a rising
//! clock edge without `/RD` or `/IORQ`, which a CPU never produces. After reset both
//! ports are in input mode with their drivers off and interrupts disabled.
//!
//! Writes are latched on the rising edge of `/IORQ` while `/CE` is asserted and `/RD`
//! and `/M1` are released. The chip ignores them until it has observed one M1 cycle
//! (`/M1` and `/RD` asserted on a rising clock edge) since reset.
//!
//! # Control Words
//!
//! * `mm001111`: Mode select (`mm` = 0 output, 1 input, 2 bidirectional, 3 control).
//!   In mode 3 the next word is the I/O direction register (1 = input).
//! * `eah10111` / `eah00111`: Interrupt control; bit 4 set means a mask word follows.
//! * `e0000011`: Interrupt enable flip-flop.
//! * `vvvvvvv0`: Interrupt vector.

use crate::common::{ContractViolation, Level};
use crate::profile::{ChipProfile, PioControl, PioStatus, pio};
use crate::vector::{InputVector, OutputVector};

use super::ChipModel;

/// Output mode.
const MODE_OUTPUT: u8 = 0;
/// Input mode; the reset state.
const MODE_INPUT: u8 = 1;
/// Control (bit) mode.
const MODE_CONTROL: u8 = 3;

/// Low nibble of a mode-select word.
const WORD_MODE: u8 = 0x0F;
/// Low nibble of an interrupt control word.
const WORD_INT_CONTROL: u8 = 0x07;
/// Low nibble of an interrupt enable word.
const WORD_INT_ENABLE: u8 = 0x03;
/// Interrupt control: mask word follows.
const INT_MASK_FOLLOWS: u8 = 0x10;
/// Interrupt control/enable: enable flag.
const INT_ENABLED: u8 = 0x80;

/// First input line of port A.
const PORT_A_LSB: u32 = 8;
/// First input line of port B.
const PORT_B_LSB: u32 = 16;
/// `/INT` input line.
const PIN_INT: u32 = 24;
/// `IEO` input line.
const PIN_IEO: u32 = 25;

/// What the next control word to a port means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Command,
    Direction,
    Mask,
}

/// State of one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Port {
    /// Operating mode (0-3).
    pub mode: u8,
    /// Output register.
    pub output: u8,
    /// Direction register used in mode 3 (1 = input).
    pub direction: u8,
    /// Output drivers enabled.
    pub driving: bool,
    /// Interrupt enable flip-flop.
    pub interrupts: bool,
    /// Interrupt mask register.
    pub mask: u8,
    /// Interrupt vector.
    pub vector: u8,
    expect: Expect,
}

impl Port {
    const fn reset() -> Self {
        Self {
            mode: MODE_INPUT,
            output: 0,
            direction: 0xFF,
            driving: false,
            interrupts: false,
            mask: 0,
            vector: 0,
            expect: Expect::Command,
        }
    }

    fn control(&mut self, word: u8) {
        match self.expect {
            Expect::Direction => {
                self.direction = word;
                self.expect = Expect::Command;
                return;
            }
            Expect::Mask => {
                self.mask = word;
                self.expect = Expect::Command;
                return;
            }
            Expect::Command => {}
        }

        if word & 0x01 == 0 {
            self.vector = word;
        } else if word & 0x0F == WORD_MODE {
            self.mode = word >> 6;
            self.driving = false;
            if self.mode == MODE_CONTROL {
                self.expect = Expect::Direction;
            }
        } else if word & 0x0F == WORD_INT_CONTROL {
            self.interrupts = word & INT_ENABLED != 0;
            if word & INT_MASK_FOLLOWS != 0 {
                self.expect = Expect::Mask;
            }
        } else if word & 0x0F == WORD_INT_ENABLE {
            self.interrupts = word & INT_ENABLED != 0;
        }
    }

    fn data(&mut self, word: u8) {
        self.output = word;
        if self.mode == MODE_OUTPUT || self.mode == MODE_CONTROL {
            self.driving = true;
        }
    }

    /// Levels of the eight port lines.
    fn lines(&self, bus: &mut InputVector, lsb: u32) {
        if !self.driving {
            return;
        }
        for bit in 0..8 {
            let drives = self.mode == MODE_OUTPUT
                || (self.mode == MODE_CONTROL && self.direction & (1 << bit) == 0);
            if drives {
                bus.set(lsb + bit, Level::from_bool(self.output & (1 << bit) != 0));
            }
        }
    }
}

/// Z80 PIO seated in the fixture.
#[derive(Debug, Clone)]
pub struct Z80Pio {
    profile: ChipProfile<PioControl, PioStatus>,
    ports: [Port; 2],
    armed: bool,
    resetting: bool,
    resets: u32,
    pins: Option<OutputVector>,
}

impl Z80Pio {
    /// A chip in its power-on state.
    pub fn new() -> Result<Self, ContractViolation> {
        Ok(Self {
            profile: pio::profile()?,
            ports: [Port::reset(); 2],
            armed: false,
            resetting: false,
            resets: 0,
            pins: None,
        })
    }

    /// Port A state.
    pub const fn port_a(&self) -> &Port {
        &self.ports[0]
    }

    /// Port B state.
    pub const fn port_b(&self) -> &Port {
        &self.ports[1]
    }

    /// Number of reset sequences observed (consecutive reset edges count once).
    pub const fn resets(&self) -> u32 {
        self.resets
    }

    /// Returns `true` once an M1 cycle has been seen since the last reset.
    pub const fn armed(&self) -> bool {
        self.armed
    }

    fn asserted(&self, pins: &OutputVector, signal: PioControl) -> bool {
        self.profile.asserted(pins, signal).unwrap_or(false)
    }

    fn write(&mut self, pins: &OutputVector) {
        let port = usize::from(self.asserted(pins, PioControl::Ba));
        let word = self.profile.data_of(pins) as u8;
        if self.asserted(pins, PioControl::Cd) {
            self.ports[port].control(word);
        } else {
            self.ports[port].data(word);
        }
    }
}

impl ChipModel for Z80Pio {
    fn name(&self) -> &'static str {
        self.profile.name()
    }

    fn apply(&mut self, outputs: &OutputVector) {
        let (clock_was, iorq_was) = self.pins.map_or((false, false), |previous| {
            (
                self.asserted(&previous, PioControl::Clk),
                self.asserted(&previous, PioControl::Iorq),
            )
        });
        let m1 = self.asserted(outputs, PioControl::M1);
        let rd = self.asserted(outputs, PioControl::Rd);
        let iorq = self.asserted(outputs, PioControl::Iorq);

        if self.asserted(outputs, PioControl::Clk) && !clock_was {
            let reset = m1 && !rd && !iorq;
            if reset {
                if !self.resetting {
                    self.resets += 1;
                }
                self.ports = [Port::reset(); 2];
                self.armed = false;
            } else if m1 && rd {
                self.armed = true;
            }
            self.resetting = reset;
        }

        if iorq_was && !iorq && self.armed && self.asserted(outputs, PioControl::Ce) && !rd && !m1 {
            self.write(outputs);
        }
        self.pins = Some(*outputs);
    }

    fn release(&mut self) {
        self.pins = None;
    }

    fn sample(&self) -> InputVector {
        let mut bus = InputVector::floating(self.profile.input_width());
        self.ports[0].lines(&mut bus, PORT_A_LSB);
        self.ports[1].lines(&mut bus, PORT_B_LSB);
        bus.set(PIN_INT, Level::High);
        let ein = self
            .pins
            .is_some_and(|pins| self.asserted(&pins, PioControl::Ein));
        bus.set(PIN_IEO, Level::from_bool(ein));
        bus
    }
}
