//! # Z80 PIO Model Tests
//!
//! Bus cycles are spelled out vector by vector, clock high then clock low.

use chipex_core::common::{BusValue, Level};
use chipex_core::devices::{ChipModel, Z80Pio};
use chipex_core::profile::{ChipProfile, PioControl, PioStatus, pio};
use chipex_core::protocol::{ControlSet, build};

struct Pins {
    profile: ChipProfile<PioControl, PioStatus>,
    chip: Z80Pio,
}

fn idle() -> ControlSet<PioControl> {
    ControlSet::new()
        .release(PioControl::Ba)
        .release(PioControl::Cd)
        .release(PioControl::Ce)
        .release(PioControl::Rd)
        .release(PioControl::Iorq)
        .release(PioControl::M1)
        .release(PioControl::Clk)
        .assert(PioControl::Ein)
}

impl Pins {
    fn new() -> Self {
        Self {
            profile: pio::profile().unwrap(),
            chip: Z80Pio::new().unwrap(),
        }
    }

    fn step(&mut self, controls: &ControlSet<PioControl>, data: u8) {
        let vector = build(&self.profile, controls, 0, u64::from(data)).unwrap();
        self.chip.apply(&vector);
    }

    fn cycle(&mut self, high: &ControlSet<PioControl>, low: &ControlSet<PioControl>, data: u8) {
        self.step(&high.clone().assert(PioControl::Clk), data);
        self.step(&low.clone().release(PioControl::Clk), data);
    }

    fn reset(&mut self, cycles: usize) {
        let m1 = idle().assert(PioControl::M1);
        for _ in 0..cycles {
            self.cycle(&m1, &m1, 0);
        }
        self.step(&idle(), 0);
    }

    fn m1_cycle(&mut self) {
        let fetch = idle().assert(PioControl::M1).assert(PioControl::Rd);
        self.cycle(&fetch, &fetch, 0);
        self.cycle(&idle(), &idle(), 0);
    }

    fn write(&mut self, port_b: bool, control: bool, value: u8) {
        let selected = idle()
            .assert(PioControl::Ce)
            .with(PioControl::Cd, control)
            .with(PioControl::Ba, port_b);
        let request = selected.clone().assert(PioControl::Iorq);
        self.cycle(&selected, &selected, value);
        self.cycle(&request, &request, value);
        self.cycle(&request, &selected, value);
    }

    fn port(&self, lsb: u32) -> BusValue {
        self.chip.sample().field(lsb, 8)
    }
}

#[test]
fn test_power_on_state() {
    let pins = Pins::new();
    assert_eq!(pins.chip.port_a().mode, 1);
    assert!(!pins.chip.port_a().driving);
    assert!(!pins.chip.armed());
    assert_eq!(pins.chip.resets(), 0);
    assert!(pins.port(8).is_floating());
    assert!(pins.port(16).is_floating());
}

#[test]
fn test_consecutive_reset_edges_count_once() {
    let mut pins = Pins::new();
    pins.reset(30);
    assert_eq!(pins.chip.resets(), 1);
    pins.cycle(&idle(), &idle(), 0);
    pins.reset(3);
    assert_eq!(pins.chip.resets(), 2);
}

#[test]
fn test_writes_ignored_before_m1_cycle() {
    let mut pins = Pins::new();
    pins.reset(30);
    pins.write(false, true, 0x0F);
    pins.write(false, false, 0x55);
    assert_eq!(pins.chip.port_a().mode, 1);
    assert!(pins.port(8).is_floating());
}

#[test]
fn test_output_mode_drives_after_data_write() {
    let mut pins = Pins::new();
    pins.reset(30);
    pins.m1_cycle();
    assert!(pins.chip.armed());

    pins.write(false, true, 0x0F);
    assert_eq!(pins.chip.port_a().mode, 0);
    assert!(pins.port(8).is_floating());

    pins.write(false, false, 0x55);
    assert_eq!(pins.port(8), BusValue::driven(0x55, 8));
    assert!(pins.port(16).is_floating());
}

#[test]
fn test_port_b_is_selected_by_ba() {
    let mut pins = Pins::new();
    pins.reset(30);
    pins.m1_cycle();
    pins.write(true, true, 0x0F);
    pins.write(true, false, 0x33);
    assert_eq!(pins.port(16), BusValue::driven(0x33, 8));
    assert!(pins.port(8).is_floating());
    assert_eq!(pins.chip.port_b().output, 0x33);
}

#[test]
fn test_input_mode_never_drives() {
    let mut pins = Pins::new();
    pins.reset(30);
    pins.m1_cycle();
    pins.write(false, true, 0x4F);
    pins.write(false, false, 0xAA);
    assert_eq!(pins.chip.port_a().output, 0xAA);
    assert!(pins.port(8).is_floating());
}

#[test]
fn test_control_mode_uses_direction_word() {
    let mut pins = Pins::new();
    pins.reset(30);
    pins.m1_cycle();
    pins.write(false, true, 0xCF);
    pins.write(false, true, 0xF0);
    pins.write(false, false, 0x05);
    assert_eq!(pins.chip.port_a().direction, 0xF0);
    assert_eq!(pins.port(8).to_string(), "ZZZZ0101");
}

#[test]
fn test_interrupt_words() {
    let mut pins = Pins::new();
    pins.reset(30);
    pins.m1_cycle();
    pins.write(false, true, 0xA4);
    pins.write(false, true, 0x97);
    pins.write(false, true, 0x3C);
    let port = pins.chip.port_a();
    assert_eq!(port.vector, 0xA4);
    assert!(port.interrupts);
    assert_eq!(port.mask, 0x3C);

    pins.write(false, true, 0x03);
    assert!(!pins.chip.port_a().interrupts);
}

#[test]
fn test_reset_turns_drivers_off() {
    let mut pins = Pins::new();
    pins.reset(30);
    pins.m1_cycle();
    pins.write(false, true, 0x0F);
    pins.write(false, false, 0x55);
    pins.reset(30);
    assert!(pins.port(8).is_floating());
    assert!(!pins.chip.armed());
}

#[test]
fn test_status_lines() {
    let mut pins = Pins::new();
    pins.step(&idle(), 0);
    let bus = pins.chip.sample();
    assert_eq!(bus.width(), 26);
    assert_eq!(bus.level(24), Level::High);
    assert_eq!(bus.level(25), Level::High);

    pins.step(&idle().release(PioControl::Ein), 0);
    assert_eq!(pins.chip.sample().level(25), Level::Low);
}
