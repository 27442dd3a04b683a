//! Error definitions.
//!
//! This module defines the fatal error kinds of the exerciser. It provides:
//! 1. **Contract Violations:** A sequencer or profile asked for something the bus
//!    layout cannot express (value too wide, undeclared signal, overlapping lines).
//! 2. **Fixture Errors:** The transport failed or returned a frame it should not have.
//! 3. **Exercise Errors:** The union returned by sequencers and entry points.
//! 4. **Config Errors:** A configuration file that cannot be read or parsed.
//!
//! A chip that answers with the wrong value is *not* an error: mismatches are
//! recorded by the [`Verifier`](crate::verifier::Verifier) and the run continues.

use std::io;

use thiserror::Error;

/// A misconfigured sequencer or profile. Never recorded as a chip failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// A value does not fit the field it is being encoded into.
    #[error("value {value:#x} does not fit in {width}-bit field `{field}`")]
    FieldOverflow {
        /// Name of the field being encoded.
        field: &'static str,
        /// The offending value.
        value: u64,
        /// Declared field width in bits.
        width: u32,
    },

    /// An output vector has bits set outside the bus width.
    #[error("vector {value:#x} has bits outside the {width}-bit bus")]
    VectorOverflow {
        /// The offending vector value.
        value: u64,
        /// Declared bus width in bits.
        width: u32,
    },

    /// A bus or field width outside what a vector can carry.
    #[error("width {width} of `{what}` is outside 1..={max}")]
    InvalidWidth {
        /// What was being declared.
        what: &'static str,
        /// Requested width.
        width: u32,
        /// Largest supported width.
        max: u32,
    },

    /// A signal was used that the profile does not declare.
    #[error("signal `{signal}` is not declared by profile `{profile}`")]
    UndeclaredSignal {
        /// Signal name.
        signal: &'static str,
        /// Profile name.
        profile: &'static str,
    },

    /// A declared control line was left out of a control set.
    #[error("control set for profile `{profile}` does not drive `{signal}`")]
    MissingSignal {
        /// Signal name.
        signal: &'static str,
        /// Profile name.
        profile: &'static str,
    },

    /// Two signals of one profile claim the same line.
    #[error("`{first}` and `{second}` overlap on bit {bit} of profile `{profile}`")]
    OverlappingSignals {
        /// First claimant.
        first: &'static str,
        /// Second claimant.
        second: &'static str,
        /// Contested bit.
        bit: u32,
        /// Profile name.
        profile: &'static str,
    },

    /// A signal lies (partly) outside the declared bus.
    #[error("`{signal}` reaches bit {bit}, outside the {width}-bit bus of profile `{profile}`")]
    OutOfBus {
        /// Signal name.
        signal: &'static str,
        /// Highest bit claimed.
        bit: u32,
        /// Bus width.
        width: u32,
        /// Profile name.
        profile: &'static str,
    },
}

/// Failure talking to the fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The underlying byte stream failed.
    #[error("fixture I/O failed: {0}")]
    Io(#[from] io::Error),

    /// An input frame contained something other than `0`, `1` and `Z`, or had an
    /// unusable length.
    #[error("malformed input frame {frame:?}: {reason}")]
    MalformedFrame {
        /// The frame as received (lossy UTF-8).
        frame: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// An input frame is narrower than the profile's input bus.
    #[error("input frame has {actual} lines but profile `{profile}` needs {expected}")]
    FrameTooNarrow {
        /// Profile name.
        profile: &'static str,
        /// Lines the profile declares.
        expected: u32,
        /// Lines received.
        actual: u32,
    },
}

/// Fatal error raised while exercising a chip.
#[derive(Debug, Error)]
pub enum ExerciseError {
    /// The sequencer or profile is misconfigured.
    #[error(transparent)]
    Contract(#[from] ContractViolation),

    /// The fixture could not be driven or read.
    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

/// Failure loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] io::Error),

    /// The JSON did not match the configuration schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
