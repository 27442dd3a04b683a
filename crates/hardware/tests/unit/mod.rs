//! # Unit Components
//!
//! This module serves as the central hub for the exerciser's component tests, from
//! three-valued logic and the wire codec up to complete runs of each chip family.


/// Unit tests for pin vectors and the wire codec.
///
/// This module verifies output frame packing, input line parsing (including `Z`),
/// and frame order handling.
pub mod vector;







/// Unit tests for the stimulus sequencers.
///
/// This module runs each chip family's script against healthy and defective models
/// and against mocked transports.
pub mod sequencer;
