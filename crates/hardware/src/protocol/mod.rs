//! Protocol layer.
//!
//! This module sits between chip profiles and the sequencers. It provides:
//! 1. **Encoder:** Named control sets and the output vector builder.
//! 2. **Decoder:** Slicing of input frames into named status fields.

/// Response decoder.
pub mod decoder;
/// Protocol encoder.
pub mod encoder;

pub use decoder::{Response, decode, decode_vector};
pub use encoder::{ControlSet, build};
