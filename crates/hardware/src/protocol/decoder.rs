//! Response decoder.
//!
//! Slices an input frame into the status fields a profile declares. Decoding is purely
//! mechanical: whether a field *should* be floating is decided by the sequencer, the
//! decoder only reports what each line carried.

use crate::common::{BusValue, ContractViolation, FixtureError};
use crate::profile::{ChipProfile, Signal};
use crate::vector::{InputFrame, InputVector};

/// Status fields of one input frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<S> {
    profile: &'static str,
    fields: Vec<(S, BusValue)>,
}

impl<S: Signal> Response<S> {
    /// Value of `signal`.
    pub fn field(&self, signal: S) -> Result<BusValue, ContractViolation> {
        self.fields
            .iter()
            .find(|(s, _)| *s == signal)
            .map(|&(_, value)| value)
            .ok_or(ContractViolation::UndeclaredSignal {
                signal: signal.name(),
                profile: self.profile,
            })
    }

    /// Iterates over every decoded field in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (S, BusValue)> + '_ {
        self.fields.iter().copied()
    }
}

/// Decodes a frame received from the fixture, applying the profile's frame order.
pub fn decode<C: Signal, S: Signal>(
    profile: &ChipProfile<C, S>,
    frame: &InputFrame,
) -> Result<Response<S>, FixtureError> {
    let vector = frame.to_vector(profile.frame_order());
    if vector.width() < profile.input_width() {
        return Err(FixtureError::FrameTooNarrow {
            profile: profile.name(),
            expected: profile.input_width(),
            actual: vector.width(),
        });
    }
    Ok(decode_vector(profile, &vector))
}

/// Slices an input vector into the profile's status fields.
pub fn decode_vector<C: Signal, S: Signal>(
    profile: &ChipProfile<C, S>,
    vector: &InputVector,
) -> Response<S> {
    let fields = profile
        .status_fields()
        .iter()
        .map(|status| {
            (
                status.signal,
                vector.field(status.field.lsb, status.field.width),
            )
        })
        .collect();
    Response {
        profile: profile.name(),
        fields,
    }
}
