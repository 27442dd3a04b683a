//! Intersil ICM7170 real-time clock model.
//!
//! Models the parts of the chip the register exerciser touches, in non-multiplexed
//! bus mode.
//!
//! # Register Map
//!
//! * `0x00`: Hundredths of a second
//! * `0x01`: Hours
//! * `0x02`: Minutes
//! * `0x03`: Seconds
//! * `0x04`: Month
//! * `0x05`: Date
//! * `0x06`: Year
//! * `0x07`: Day of week
//! * `0x08`-`0x0F`: Compare RAM
//! * `0x10`: Interrupt mask (write) / interrupt status (read, cleared by the read)
//! * `0x11`: Command
//!
//! A write is latched while `/CS` and `/WR` are both asserted. The data bus is driven
//! while `/CS` and `/RD` are both asserted; reading the status register clears it when
//! the read strobe ends.

use std::time::Duration;

use crate::common::{ContractViolation, Level};
use crate::profile::rtc::{self, REG_COMMAND, REG_HUNDREDTHS, REG_INTERRUPT};
use crate::profile::{ChipProfile, RtcControl, RtcStatus};
use crate::vector::{InputVector, OutputVector};

use super::ChipModel;

/// Day-of-week counter; the last counter register.
const REG_WEEKDAY: u8 = 0x07;
/// First compare RAM register.
const REG_RAM_START: u8 = 0x08;
/// Last compare RAM register.
const REG_RAM_END: u8 = 0x0F;

/// Command: counter running.
const CMD_RUN: u8 = 0x08;
/// Command: interrupt output enabled.
const CMD_INT_ENABLE: u8 = 0x10;

/// Status: 1/100 second periodic.
const INT_HUNDREDTH: u8 = 0x02;
/// Status: 1/10 second periodic.
const INT_TENTH: u8 = 0x04;
/// Status: 1 second periodic.
const INT_SECOND: u8 = 0x08;
/// Status: 1 minute periodic.
const INT_MINUTE: u8 = 0x10;
/// Status: 1 hour periodic.
const INT_HOUR: u8 = 0x20;
/// Status: 1 day periodic.
const INT_DAY: u8 = 0x40;
/// Status: global interrupt flag.
const INT_GLOBAL: u8 = 0x80;

/// Counter resolution.
const TICK: Duration = Duration::from_millis(10);

/// Index of each counter in the register file.
mod counter {
    pub const HUNDREDTHS: usize = 0;
    pub const HOURS: usize = 1;
    pub const MINUTES: usize = 2;
    pub const SECONDS: usize = 3;
    pub const MONTH: usize = 4;
    pub const DATE: usize = 5;
    pub const YEAR: usize = 6;
    pub const WEEKDAY: usize = 7;
}

/// ICM7170 seated in the fixture.
#[derive(Debug, Clone)]
pub struct Icm7170 {
    profile: ChipProfile<RtcControl, RtcStatus>,
    counters: [u8; 8],
    ram: [u8; 8],
    mask: u8,
    status: u8,
    command: u8,
    pending: Duration,
    pins: Option<OutputVector>,
}

impl Icm7170 {
    /// A chip with all registers cleared and the counter stopped.
    pub fn new() -> Result<Self, ContractViolation> {
        Ok(Self {
            profile: rtc::profile()?,
            counters: [0; 8],
            ram: [0; 8],
            mask: 0,
            status: 0,
            command: 0,
            pending: Duration::ZERO,
            pins: None,
        })
    }

    /// Value a read of `register` returns.
    pub fn register(&self, register: u8) -> u8 {
        match register {
            REG_HUNDREDTHS..=REG_WEEKDAY => self.counters[register as usize],
            REG_RAM_START..=REG_RAM_END => self.ram[(register - REG_RAM_START) as usize],
            REG_INTERRUPT => self.status,
            REG_COMMAND => self.command,
            _ => 0,
        }
    }

    /// Returns `true` while the chip pulls `/INT` low.
    pub const fn interrupt_asserted(&self) -> bool {
        self.command & CMD_INT_ENABLE != 0 && self.status != 0
    }

    fn write(&mut self, register: u8, value: u8) {
        match register {
            REG_HUNDREDTHS..=REG_WEEKDAY => self.counters[register as usize] = value,
            REG_RAM_START..=REG_RAM_END => self.ram[(register - REG_RAM_START) as usize] = value,
            REG_INTERRUPT => self.mask = value,
            REG_COMMAND => self.command = value,
            _ => {}
        }
    }

    fn asserted(&self, pins: &OutputVector, signal: RtcControl) -> bool {
        self.profile.asserted(pins, signal).unwrap_or(false)
    }

    fn reading(&self, pins: &OutputVector) -> bool {
        self.asserted(pins, RtcControl::Cs) && self.asserted(pins, RtcControl::Rd)
    }

    fn raise(&mut self, source: u8) {
        if self.mask & source != 0 {
            self.status |= source | INT_GLOBAL;
        }
    }

    /// Advances the counter chain by one hundredth of a second.
    fn tick(&mut self) {
        self.raise(INT_HUNDREDTH);
        let wrapped = self.bump(counter::HUNDREDTHS, 100, 0);
        if self.counters[counter::HUNDREDTHS] % 10 == 0 {
            self.raise(INT_TENTH);
        }
        if !wrapped {
            return;
        }
        self.raise(INT_SECOND);
        if !self.bump(counter::SECONDS, 60, 0) {
            return;
        }
        self.raise(INT_MINUTE);
        if !self.bump(counter::MINUTES, 60, 0) {
            return;
        }
        self.raise(INT_HOUR);
        if !self.bump(counter::HOURS, 24, 0) {
            return;
        }
        self.raise(INT_DAY);
        let _ = self.bump(counter::WEEKDAY, 7, 0);
        let days = days_in_month(self.counters[counter::MONTH], self.counters[counter::YEAR]);
        if !self.bump(counter::DATE, days + 1, 1) {
            return;
        }
        if self.bump(counter::MONTH, 13, 1) {
            let _ = self.bump(counter::YEAR, 100, 0);
        }
    }

    /// Increments a counter, restarting at `first` when it reaches `limit`.
    ///
    /// Returns `true` when the counter wrapped.
    fn bump(&mut self, index: usize, limit: u8, first: u8) -> bool {
        let value = &mut self.counters[index];
        if value.saturating_add(1) >= limit {
            *value = first;
            true
        } else {
            *value += 1;
            false
        }
    }
}

const fn days_in_month(month: u8, year: u8) -> u8 {
    match month {
        2 if year % 4 == 0 => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl ChipModel for Icm7170 {
    fn name(&self) -> &'static str {
        self.profile.name()
    }

    fn apply(&mut self, outputs: &OutputVector) {
        if let Some(previous) = self.pins {
            let register = self.profile.address_of(&previous) as u8;
            if self.reading(&previous) && !self.reading(outputs) && register == REG_INTERRUPT {
                self.status = 0;
            }
        }
        if self.asserted(outputs, RtcControl::Cs) && self.asserted(outputs, RtcControl::Wr) {
            let register = self.profile.address_of(outputs) as u8;
            self.write(register, self.profile.data_of(outputs) as u8);
        }
        self.pins = Some(*outputs);
    }

    fn release(&mut self) {
        self.pins = None;
    }

    fn sample(&self) -> InputVector {
        let mut bus = InputVector::floating(self.profile.input_width());
        if let Some(pins) = self.pins {
            if self.reading(&pins) {
                let value = self.register(self.profile.address_of(&pins) as u8);
                bus.drive_field(0, 8, u64::from(value));
            } else if self.asserted(&pins, RtcControl::Wr) {
                bus.drive_field(0, 8, self.profile.data_of(&pins));
            }
        }
        // Open-drain output with a pull-up on the fixture.
        bus.set(8, Level::from_bool(!self.interrupt_asserted()));
        bus
    }

    fn advance(&mut self, elapsed: Duration) {
        if self.command & CMD_RUN == 0 {
            return;
        }
        self.pending += elapsed;
        while self.pending >= TICK {
            self.pending -= TICK;
            self.tick();
        }
    }
}
