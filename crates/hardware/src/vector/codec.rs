//! Wire-frame codec.
//!
//! Output frames are the vector packed little-endian into `ceil(width / 8)` bytes.
//! Input frames are a text line of `0`, `1` and `Z` symbols. The codec never truncates
//! and never turns `Z` into a number.

use crate::common::constants::MAX_BUS_WIDTH;
use crate::common::{BusValue, ContractViolation, FixtureError, Level};

use super::{InputFrame, OutputVector};

/// Number of bytes in the output frame of a `width`-bit bus.
#[inline]
pub const fn frame_len(width: u32) -> usize {
    width.div_ceil(8) as usize
}

/// Encodes `value` as a `width`-bit output frame.
///
/// Fails if `value` has any bit at or above `width`; callers mask, the codec does not.
pub fn encode(value: u64, width: u32) -> Result<Vec<u8>, ContractViolation> {
    Ok(encode_vector(&OutputVector::new(value, width)?))
}

/// Encodes an already validated output vector.
pub fn encode_vector(vector: &OutputVector) -> Vec<u8> {
    vector.value().to_le_bytes()[..frame_len(vector.width())].to_vec()
}

/// Decodes a little-endian output frame back into a vector of `width` bits.
pub fn decode_outputs(frame: &[u8], width: u32) -> Result<OutputVector, ContractViolation> {
    let mut bytes = [0u8; 8];
    let len = frame.len().min(8);
    bytes[..len].copy_from_slice(&frame[..len]);
    OutputVector::new(u64::from_le_bytes(bytes), width)
}

/// Decodes one input line from the fixture.
///
/// Surrounding whitespace (the line terminator) is ignored. Every remaining byte must
/// be `0`, `1` or `Z`.
pub fn decode(line: &[u8]) -> Result<InputFrame, FixtureError> {
    let symbols = line.trim_ascii();
    let malformed = |reason| FixtureError::MalformedFrame {
        frame: String::from_utf8_lossy(line).into_owned(),
        reason,
    };

    if symbols.is_empty() {
        return Err(malformed("empty frame"));
    }
    if symbols.len() > MAX_BUS_WIDTH as usize {
        return Err(malformed("frame wider than 64 lines"));
    }

    let mut levels = Vec::with_capacity(symbols.len());
    // Wire order is most significant symbol first; store the last symbol at bit 0.
    for &symbol in symbols.iter().rev() {
        levels.push(Level::from_symbol(symbol).ok_or_else(|| malformed("unknown symbol"))?);
    }
    Ok(InputFrame::from_symbols(BusValue::from_levels(&levels)))
}

/// Encodes an input frame as the line a fixture would send, without terminator.
pub fn encode_frame(frame: &InputFrame) -> Vec<u8> {
    frame.symbols.to_string().into_bytes()
}
