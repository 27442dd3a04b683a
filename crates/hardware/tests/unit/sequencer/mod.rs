//! Stimulus sequencer tests.

/// SRAM sweep against healthy and defective models.
pub mod memory;
