//! # ICM7170 Model Tests
//!
//! Drives the model pin by pin, the way the fixture would.

use std::time::Duration;

use chipex_core::common::Level;
use chipex_core::devices::{ChipModel, Icm7170};
use chipex_core::profile::{ChipProfile, RtcControl, RtcStatus, rtc};
use chipex_core::protocol::{ControlSet, build};

struct Pins {
    profile: ChipProfile<RtcControl, RtcStatus>,
    chip: Icm7170,
}

impl Pins {
    fn new() -> Self {
        Self {
            profile: rtc::profile().unwrap(),
            chip: Icm7170::new().unwrap(),
        }
    }

    fn apply(&mut self, cs: bool, wr: bool, rd: bool, register: u8, data: u8) {
        let controls = ControlSet::new()
            .with(RtcControl::Cs, cs)
            .with(RtcControl::Wr, wr)
            .with(RtcControl::Rd, rd);
        let vector = build(&self.profile, &controls, u64::from(register), u64::from(data)).unwrap();
        self.chip.apply(&vector);
    }

    fn write(&mut self, register: u8, value: u8) {
        self.apply(false, false, false, register, value);
        self.apply(true, true, false, register, value);
        self.apply(false, false, false, register, value);
    }

    /// Reads `register` over the bus, returning the driven data lines.
    fn read(&mut self, register: u8) -> Option<u64> {
        self.apply(false, false, false, register, 0);
        self.apply(true, false, true, register, 0);
        let value = self.chip.sample().field(0, 8).as_driven();
        self.apply(false, false, false, register, 0);
        value
    }

    fn int_line(&self) -> Level {
        self.chip.sample().level(8)
    }
}

#[test]
fn test_register_write_and_read() {
    let mut pins = Pins::new();
    pins.write(0x01, 12);
    pins.write(0x0A, 0x5A);
    assert_eq!(pins.read(0x01), Some(12));
    assert_eq!(pins.read(0x0A), Some(0x5A));
    assert_eq!(pins.chip.register(0x01), 12);
}

#[test]
fn test_data_bus_floats_when_idle() {
    let mut pins = Pins::new();
    pins.apply(false, false, false, 0x01, 0);
    let bus = pins.chip.sample();
    assert_eq!(bus.width(), 9);
    assert!(bus.field(0, 8).is_floating());
    assert_eq!(bus.level(8), Level::High);
}

#[test]
fn test_read_without_chip_select_floats() {
    let mut pins = Pins::new();
    pins.write(0x02, 30);
    pins.apply(false, false, true, 0x02, 0);
    assert!(pins.chip.sample().field(0, 8).is_floating());
}

#[test]
fn test_write_strobe_shows_fixture_data() {
    let mut pins = Pins::new();
    pins.apply(true, true, false, 0x03, 0x42);
    assert_eq!(pins.chip.sample().field(0, 8).as_driven(), Some(0x42));
}

#[test]
fn test_counter_stopped_without_run_bit() {
    let mut pins = Pins::new();
    pins.write(0x11, 0x04);
    pins.chip.advance(Duration::from_secs(2));
    assert_eq!(pins.read(0x00), Some(0));
    assert_eq!(pins.read(0x03), Some(0));
}

#[test]
fn test_counter_runs() {
    let mut pins = Pins::new();
    pins.write(0x11, 0x0C);
    pins.chip.advance(Duration::from_millis(1_250));
    assert_eq!(pins.read(0x00), Some(25));
    assert_eq!(pins.read(0x03), Some(1));
}

#[test]
fn test_sub_tick_time_accumulates() {
    let mut pins = Pins::new();
    pins.write(0x11, 0x08);
    for _ in 0..4 {
        pins.chip.advance(Duration::from_millis(5));
    }
    assert_eq!(pins.chip.register(0x00), 2);
}

#[test]
fn test_rollover_into_next_month() {
    let mut pins = Pins::new();
    // 23:59:59.99 on 28 Feb of a non-leap year.
    for (register, value) in [(0x00, 99), (0x03, 59), (0x02, 59), (0x01, 23), (0x04, 2), (0x05, 28), (0x06, 25)] {
        pins.write(register, value);
    }
    pins.write(0x11, 0x08);
    pins.chip.advance(Duration::from_millis(10));
    assert_eq!(pins.chip.register(0x01), 0);
    assert_eq!(pins.chip.register(0x05), 1);
    assert_eq!(pins.chip.register(0x04), 3);
}

#[test]
fn test_leap_year_february_has_29_days() {
    let mut pins = Pins::new();
    for (register, value) in [(0x00, 99), (0x03, 59), (0x02, 59), (0x01, 23), (0x04, 2), (0x05, 28), (0x06, 24)] {
        pins.write(register, value);
    }
    pins.write(0x11, 0x08);
    pins.chip.advance(Duration::from_millis(10));
    assert_eq!(pins.chip.register(0x05), 29);
    assert_eq!(pins.chip.register(0x04), 2);
}

#[test]
fn test_masked_interrupt_sets_status_and_int() {
    let mut pins = Pins::new();
    pins.write(0x10, 0x08);
    pins.write(0x11, 0x1C);
    assert_eq!(pins.int_line(), Level::High);

    pins.chip.advance(Duration::from_millis(1_000));
    assert!(pins.chip.interrupt_asserted());
    assert_eq!(pins.int_line(), Level::Low);
    assert_eq!(pins.chip.register(0x10), 0x88);
}

#[test]
fn test_unmasked_sources_stay_quiet() {
    let mut pins = Pins::new();
    pins.write(0x10, 0x00);
    pins.write(0x11, 0x1C);
    pins.chip.advance(Duration::from_secs(3));
    assert_eq!(pins.chip.register(0x10), 0);
    assert_eq!(pins.int_line(), Level::High);
}

#[test]
fn test_interrupt_disabled_keeps_line_high() {
    let mut pins = Pins::new();
    pins.write(0x10, 0x02);
    pins.write(0x11, 0x0C);
    pins.chip.advance(Duration::from_millis(20));
    assert_ne!(pins.chip.register(0x10), 0);
    assert_eq!(pins.int_line(), Level::High);
}

#[test]
fn test_status_read_clears_it() {
    let mut pins = Pins::new();
    pins.write(0x10, 0x02);
    pins.write(0x11, 0x1C);
    pins.chip.advance(Duration::from_millis(10));
    assert_eq!(pins.read(0x10), Some(0x82));
    assert_eq!(pins.chip.register(0x10), 0);
    assert_eq!(pins.int_line(), Level::High);
}

#[test]
fn test_release_floats_bus() {
    let mut pins = Pins::new();
    pins.write(0x01, 5);
    pins.apply(true, false, true, 0x01, 0);
    pins.chip.release();
    assert!(pins.chip.sample().field(0, 8).is_floating());
}
