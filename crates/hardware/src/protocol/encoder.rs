//! Protocol encoder.
//!
//! Turns a semantic bus operation (which control lines are asserted, which address,
//! which data) into the output vector of a given profile. Nothing is ever truncated:
//! a value wider than its field, a missing control line, or a line the profile does not
//! have is a [`ContractViolation`].

use crate::common::ContractViolation;
use crate::profile::{BitField, ChipProfile, Signal};
use crate::vector::OutputVector;

/// The assertion state of every control line for one vector.
///
/// Built with named calls so similarly shaped operations cannot swap arguments:
///
/// ```
/// use chipex_core::profile::SramControl;
/// use chipex_core::protocol::ControlSet;
///
/// let read = ControlSet::new()
///     .assert(SramControl::Oe)
///     .assert(SramControl::Cs1)
///     .release(SramControl::We);
/// assert_eq!(read.get(SramControl::Oe), Some(true));
/// assert_eq!(read.get(SramControl::We), Some(false));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControlSet<C> {
    lines: Vec<(C, bool)>,
}

impl<C: Signal> ControlSet<C> {
    /// An empty control set.
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Asserts `signal`.
    #[must_use]
    pub fn assert(self, signal: C) -> Self {
        self.with(signal, true)
    }

    /// Releases `signal`.
    #[must_use]
    pub fn release(self, signal: C) -> Self {
        self.with(signal, false)
    }

    /// Sets `signal` to the given assertion state, replacing any earlier setting.
    #[must_use]
    pub fn with(mut self, signal: C, asserted: bool) -> Self {
        if let Some(entry) = self.lines.iter_mut().find(|(s, _)| *s == signal) {
            entry.1 = asserted;
        } else {
            self.lines.push((signal, asserted));
        }
        self
    }

    /// Assertion state of `signal`, if it was set.
    pub fn get(&self, signal: C) -> Option<bool> {
        self.lines
            .iter()
            .find(|(s, _)| *s == signal)
            .map(|&(_, asserted)| asserted)
    }

    /// Iterates over the set signals.
    pub fn iter(&self) -> impl Iterator<Item = (C, bool)> + '_ {
        self.lines.iter().copied()
    }
}

/// Builds the output vector for one bus operation.
///
/// Every control line of `profile` must appear in `controls`, and `controls` must not
/// mention lines the profile lacks. `address` must be 0 for profiles without an
/// address field.
pub fn build<C: Signal, S: Signal>(
    profile: &ChipProfile<C, S>,
    controls: &ControlSet<C>,
    address: u64,
    data: u64,
) -> Result<OutputVector, ContractViolation> {
    if let Some((signal, _)) = controls.iter().find(|&(s, _)| !profile.has_control(s)) {
        return Err(ContractViolation::UndeclaredSignal {
            signal: signal.name(),
            profile: profile.name(),
        });
    }

    let mut value = 0u64;
    for line in profile.controls() {
        let asserted = controls
            .get(line.signal)
            .ok_or(ContractViolation::MissingSignal {
                signal: line.signal.name(),
                profile: profile.name(),
            })?;
        if line.polarity.level(asserted) {
            value |= 1 << line.bit;
        }
    }

    match profile.address() {
        Some(field) => value |= place("address", field, address)?,
        None if address != 0 => {
            return Err(ContractViolation::FieldOverflow {
                field: "address",
                value: address,
                width: 0,
            });
        }
        None => {}
    }
    value |= place("data", profile.data(), data)?;

    OutputVector::new(value, profile.output_width())
}

/// Shifts `value` into `field`, rejecting values that do not fit.
fn place(name: &'static str, field: BitField, value: u64) -> Result<u64, ContractViolation> {
    if field.fits(value) {
        Ok(value << field.lsb)
    } else {
        Err(ContractViolation::FieldOverflow {
            field: name,
            value,
            width: field.width,
        })
    }
}
