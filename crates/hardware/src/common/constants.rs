//! Fixture-wide constants.
//!
//! This module defines constants shared by the codec, the profiles and the sequencers:
//! 1. **Bus Geometry:** Output bus width and the largest representable vector.
//! 2. **Frame Symbols:** The characters the fixture uses to report line levels.
//! 3. **Wire Commands:** Single-byte command letters of the serial protocol.
//! 4. **Stimulus Constants:** Pattern sets and indicator cadence.

/// Width of the fixture's output bus in bits (`O0`-`O31`).
pub const OUTPUT_WIDTH: u32 = 32;

/// Largest vector width any frame or field may declare.
pub const MAX_BUS_WIDTH: u32 = 64;

/// Frame symbol for a line driven low.
pub const SYMBOL_LOW: u8 = b'0';

/// Frame symbol for a line driven high.
pub const SYMBOL_HIGH: u8 = b'1';

/// Frame symbol for an undriven (high-impedance) line.
pub const SYMBOL_FLOATING: u8 = b'Z';

/// Resets the fixture to its idle state.
pub const CMD_RESET: u8 = b'r';

/// Sets the output bus; followed by the little-endian output frame.
pub const CMD_OUTPUTS: u8 = b'o';

/// Requests one input frame; the fixture answers with a newline-terminated line.
pub const CMD_INPUTS: u8 = b'i';

/// Sets the indicator bar; followed by one byte.
pub const CMD_INDICATOR: u8 = b'b';

/// Drives the pass lamp; followed by `b'0'` or `b'1'`.
pub const CMD_PASS_LAMP: u8 = b'p';

/// Drives the fail lamp; followed by `b'0'` or `b'1'`.
pub const CMD_FAIL_LAMP: u8 = b'f';

/// Byte patterns written by the memory sweep, in order.
pub const SRAM_PATTERNS: [u8; 8] = [
    0b1010_1010,
    0b0101_0101,
    0b1111_0000,
    0b0000_1111,
    0b1100_1100,
    0b0011_0011,
    0b1111_1111,
    0b0000_0000,
];

/// Value stored at address 0 by the sizing probe.
pub const SIZING_NEEDLE: u8 = 0b1010_0101;

/// Clock cycles spent in each phase of the Z80 PIO reset sequence.
pub const PIO_RESET_CYCLES: usize = 30;
