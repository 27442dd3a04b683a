//! Configuration system for the chip exerciser.
//!
//! This module defines the configuration structures used to parameterize a run. It
//! provides:
//! 1. **Defaults:** Serial link parameters and exercise switches.
//! 2. **Structures:** Fixture (how to reach the hardware) and exercise (what to run).
//! 3. **Loading:** JSON parsing from a string or a file.
//!
//! Every field is optional in JSON; missing fields take the values in `defaults`.
//! Command-line flags override whatever was loaded.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::ConfigError;
use crate::vector::FrameOrder;

/// Default configuration constants.
///
/// These values describe the stock fixture when not overridden by a configuration
/// file or the command line.
mod defaults {
    /// Serial device the fixture enumerates as on Linux.
    pub const PORT: &str = "/dev/ttyACM0";

    /// Link speed of the fixture firmware.
    pub const BAUD_RATE: u32 = 576_000;

    /// Time to wait for an input frame before the link is considered dead.
    pub const READ_TIMEOUT_MS: u64 = 2_000;

    /// Addresses between indicator bar toggles during memory sweeps.
    pub const INDICATOR_STRIDE: u64 = 128;

    /// The main write/disable/read sweep runs unless disabled.
    pub const READ_WRITE: bool = true;
}

/// Top-level configuration.
///
/// # Examples
///
/// ```
/// use chipex_core::config::Config;
///
/// let json = r#"{
///     "fixture": { "port": "/dev/ttyUSB1", "trace_vectors": true },
///     "exercise": { "retention": true, "sizing": true }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.fixture.port, "/dev/ttyUSB1");
/// assert_eq!(config.fixture.baud_rate, 576_000);
/// assert!(config.exercise.retention);
/// assert!(config.exercise.read_write);
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// How to reach the fixture.
    #[serde(default)]
    pub fixture: FixtureConfig,
    /// What to run against the chip.
    #[serde(default)]
    pub exercise: ExerciseConfig,
}

impl Config {
    /// Parses a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

/// Serial link to the fixture.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FixtureConfig {
    /// Serial device path
    #[serde(default = "FixtureConfig::default_port")]
    pub port: String,

    /// Link speed in baud
    #[serde(default = "FixtureConfig::default_baud_rate")]
    pub baud_rate: u32,

    /// Read timeout in milliseconds
    #[serde(default = "FixtureConfig::default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Log every output vector and input frame at trace level
    #[serde(default)]
    pub trace_vectors: bool,

    /// Symbol order of the firmware's input frames (`MsbFirst` or `LsbFirst`)
    #[serde(default)]
    pub frame_order: FrameOrder,
}

impl FixtureConfig {
    /// Returns the default serial device.
    fn default_port() -> String {
        defaults::PORT.to_owned()
    }

    /// Returns the default link speed.
    const fn default_baud_rate() -> u32 {
        defaults::BAUD_RATE
    }

    /// Returns the default read timeout.
    const fn default_read_timeout_ms() -> u64 {
        defaults::READ_TIMEOUT_MS
    }
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            port: Self::default_port(),
            baud_rate: defaults::BAUD_RATE,
            read_timeout_ms: defaults::READ_TIMEOUT_MS,
            trace_vectors: false,
            frame_order: FrameOrder::MsbFirst,
        }
    }
}

/// Switches for the stimulus sequences.
///
/// Only the memory exerciser consults the phase switches; the register and
/// mode-select sequences always run in full.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ExerciseConfig {
    /// Re-read every address after each pattern sweep without rewriting
    #[serde(default)]
    pub retention: bool,

    /// Probe for address aliasing before the sweep
    #[serde(default)]
    pub sizing: bool,

    /// Run the write/disable/read sweep
    #[serde(default = "ExerciseConfig::default_read_write")]
    pub read_write: bool,

    /// Addresses between indicator toggles (0 is treated as 1)
    #[serde(default = "ExerciseConfig::default_indicator_stride")]
    pub indicator_stride: u64,
}

impl ExerciseConfig {
    /// Returns the default for the main sweep switch.
    const fn default_read_write() -> bool {
        defaults::READ_WRITE
    }

    /// Returns the default indicator stride.
    const fn default_indicator_stride() -> u64 {
        defaults::INDICATOR_STRIDE
    }
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            retention: false,
            sizing: false,
            read_write: defaults::READ_WRITE,
            indicator_stride: defaults::INDICATOR_STRIDE,
        }
    }
}
