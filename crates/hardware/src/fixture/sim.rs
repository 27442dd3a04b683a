//! Simulated fixture.
//!
//! Drives a [`ChipModel`] instead of real hardware. Output vectors are applied to the
//! model, input frames are sampled from it in the configured frame order, and
//! [`settle`](Transport::settle) advances the model's virtual clock without sleeping.
//! Indicator bytes and lamp reports are recorded for inspection.

use std::time::Duration;

use tracing::trace;

use crate::common::FixtureError;
use crate::devices::ChipModel;
use crate::vector::{FrameOrder, InputFrame, OutputVector};

use super::Transport;

/// Lamp state reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lamp {
    /// Pass lamp lit.
    Pass,
    /// Fail lamp lit.
    Fail,
}

/// Transport backed by a behavioural chip model.
#[derive(Debug)]
pub struct SimFixture<D> {
    device: D,
    frame_order: FrameOrder,
    indicator: Vec<u8>,
    reports: Vec<Lamp>,
    vectors: u64,
    reads: u64,
    elapsed: Duration,
}

impl<D: ChipModel> SimFixture<D> {
    /// Seats `device` in a simulated fixture using the current firmware's frame order.
    pub const fn new(device: D) -> Self {
        Self {
            device,
            frame_order: FrameOrder::MsbFirst,
            indicator: Vec::new(),
            reports: Vec::new(),
            vectors: 0,
            reads: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Emits input frames in `order` instead.
    #[must_use]
    pub const fn with_frame_order(mut self, order: FrameOrder) -> Self {
        self.frame_order = order;
        self
    }

    /// The seated model.
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Mutable access to the seated model.
    pub const fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Every indicator byte shown so far.
    pub fn indicator_history(&self) -> &[u8] {
        &self.indicator
    }

    /// Every lamp report so far, in order.
    pub fn reports(&self) -> &[Lamp] {
        &self.reports
    }

    /// Number of output vectors applied.
    pub const fn vectors_applied(&self) -> u64 {
        self.vectors
    }

    /// Number of input frames sampled.
    pub const fn inputs_read(&self) -> u64 {
        self.reads
    }

    /// Virtual time elapsed through [`settle`](Transport::settle).
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl<D: ChipModel> Transport for SimFixture<D> {
    fn reset(&mut self) -> Result<(), FixtureError> {
        self.device.release();
        Ok(())
    }

    fn set_outputs(&mut self, vector: &OutputVector) -> Result<(), FixtureError> {
        trace!(device = self.device.name(), "{vector}");
        self.vectors += 1;
        self.device.apply(vector);
        Ok(())
    }

    fn set_indicator(&mut self, value: u8) -> Result<(), FixtureError> {
        self.indicator.push(value);
        Ok(())
    }

    fn read_inputs(&mut self) -> Result<InputFrame, FixtureError> {
        self.reads += 1;
        Ok(InputFrame::from_vector(&self.device.sample(), self.frame_order))
    }

    fn report_pass(&mut self) -> Result<(), FixtureError> {
        self.reports.push(Lamp::Pass);
        Ok(())
    }

    fn report_fail(&mut self) -> Result<(), FixtureError> {
        self.reports.push(Lamp::Fail);
        Ok(())
    }

    fn settle(&mut self, duration: Duration) -> Result<(), FixtureError> {
        self.elapsed += duration;
        self.device.advance(duration);
        Ok(())
    }

    fn frame_order(&self) -> FrameOrder {
        self.frame_order
    }
}
