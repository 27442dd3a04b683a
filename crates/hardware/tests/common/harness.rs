use std::io::{self, Cursor, Read, Write};
use std::time::Duration;

use chipex_core::common::FixtureError;
use chipex_core::fixture::Transport;
use chipex_core::profile::{ChipProfile, SramControl, SramSize, SramStatus};
use chipex_core::vector::{FrameOrder, InputFrame, OutputVector};

/// Routes `tracing` output through the test harness so it only shows on failure.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
        .try_init();
}

/// An in-memory serial link: records what is written, replays canned replies.
#[derive(Debug, Default)]
pub struct Wire {
    pub written: Vec<u8>,
    replies: Cursor<Vec<u8>>,
}

impl Wire {
    pub fn new() -> Self {
        Self::default()
    }

    /// A link whose firmware will answer with `replies`, in order.
    pub fn replying(replies: &[u8]) -> Self {
        Self {
            written: Vec::new(),
            replies: Cursor::new(replies.to_vec()),
        }
    }
}

impl Read for Wire {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.replies.read(buf)
    }
}

impl Write for Wire {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// What an SRAM vector does to the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Write,
    Read,
    Disable,
    Other,
}

/// Wraps a transport and counts, per address, how often each SRAM access kind is
/// applied.
#[derive(Debug)]
pub struct AccessCounter<T> {
    pub inner: T,
    profile: ChipProfile<SramControl, SramStatus>,
    pub writes: Vec<u8>,
    pub reads: Vec<u8>,
    pub disables: Vec<u8>,
    pub resets: usize,
}

impl<T: Transport> AccessCounter<T> {
    pub fn new(inner: T, size: SramSize) -> Self {
        let addresses = 1 << size.address_lines();
        Self {
            inner,
            profile: size.profile().unwrap(),
            writes: vec![0; addresses],
            reads: vec![0; addresses],
            disables: vec![0; addresses],
            resets: 0,
        }
    }

    fn classify(&self, vector: &OutputVector) -> Access {
        let asserted = |signal| self.profile.asserted(vector, signal);
        let cs1 = asserted(SramControl::Cs1) == Some(true);
        let cs2 = asserted(SramControl::Cs2).unwrap_or(true);
        let oe = asserted(SramControl::Oe) == Some(true);
        let we = asserted(SramControl::We) == Some(true);
        let cs2_released = asserted(SramControl::Cs2).is_none_or(|cs2| !cs2);
        match (cs1 && cs2, oe, we) {
            (true, false, true) => Access::Write,
            (true, true, false) => Access::Read,
            (false, false, false) if !cs1 && cs2_released => Access::Disable,
            _ => Access::Other,
        }
    }
}

impl<T: Transport> Transport for AccessCounter<T> {
    fn reset(&mut self) -> Result<(), FixtureError> {
        self.resets += 1;
        self.inner.reset()
    }

    fn set_outputs(&mut self, vector: &OutputVector) -> Result<(), FixtureError> {
        let address = self.profile.address_of(vector) as usize;
        match self.classify(vector) {
            Access::Write => self.writes[address] += 1,
            Access::Read => self.reads[address] += 1,
            Access::Disable => self.disables[address] += 1,
            Access::Other => {}
        }
        self.inner.set_outputs(vector)
    }

    fn set_indicator(&mut self, value: u8) -> Result<(), FixtureError> {
        self.inner.set_indicator(value)
    }

    fn read_inputs(&mut self) -> Result<InputFrame, FixtureError> {
        self.inner.read_inputs()
    }

    fn report_pass(&mut self) -> Result<(), FixtureError> {
        self.inner.report_pass()
    }

    fn report_fail(&mut self) -> Result<(), FixtureError> {
        self.inner.report_fail()
    }

    fn settle(&mut self, duration: Duration) -> Result<(), FixtureError> {
        self.inner.settle(duration)
    }

    fn frame_order(&self) -> FrameOrder {
        self.inner.frame_order()
    }
}
