//! Logic-chip exerciser library.
//!
//! This crate drives a serial test fixture that applies pin vectors to a chip in a
//! socket and samples its outputs, including high impedance. It provides:
//! 1. **Vectors:** Output vectors, three-valued input frames and the wire codec.
//! 2. **Profiles:** Declarative pin maps for SRAM, ICM7170 and Z80 PIO variants.
//! 3. **Protocol:** Encoding of named control sets into vectors and decoding of frames
//!    into named status fields.
//! 4. **Sequencers:** The stimulus script of each chip family, checked by a verifier
//!    that records every mismatch.
//! 5. **Fixtures:** The transport interface, the serial implementation, and a
//!    simulated fixture backed by behavioural chip models.

/// Common types and constants (logic levels, errors, wire commands).
pub mod common;
/// Exerciser configuration (defaults, fixture link, exercise switches).
pub mod config;
/// Behavioural chip models for simulated runs.
pub mod devices;
/// Transport trait and fixture implementations.
pub mod fixture;
/// Chip profiles (pin maps) and signal enums.
pub mod profile;
/// Protocol encoder and response decoder.
pub mod protocol;
/// Stimulus sequencers and entry points.
pub mod sequencer;
/// Pin vectors and the wire codec.
pub mod vector;
/// Failure recording and the final verdict.
pub mod verifier;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Collaborator that moves vectors to and from the fixture.
pub use crate::fixture::Transport;
/// Entry points, one per chip family.
pub use crate::sequencer::{exercise_pio, exercise_rtc, exercise_sram};
/// Outcome of a run.
pub use crate::verifier::Verdict;
