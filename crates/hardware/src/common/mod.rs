//! Common types used throughout the exerciser.
//!
//! This module provides the building blocks shared by every layer:
//! 1. **Constants:** Bus geometry, frame symbols, wire commands and stimulus tables.
//! 2. **Error Handling:** Contract violations, fixture errors and their union.
//! 3. **Logic:** Three-valued line levels and fixed-width bus values.

/// Fixture-wide constants.
pub mod constants;

/// Error types.
pub mod error;

/// Three-valued line levels and bus values.
pub mod logic;

pub use error::{ConfigError, ContractViolation, ExerciseError, FixtureError};
pub use logic::{BusValue, Level};
