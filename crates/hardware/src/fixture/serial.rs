//! Serial fixture.
//!
//! Speaks the fixture firmware's byte protocol over any bidirectional stream:
//!
//! | Operation      | Bytes sent                        | Reply                 |
//! |----------------|-----------------------------------|-----------------------|
//! | reset          | `r`                               | none                  |
//! | set outputs    | `o` + frame, little-endian        | none                  |
//! | set indicator  | `b` + one byte                    | none                  |
//! | read inputs    | `i`                               | `0`/`1`/`Z` line, `\n` |
//! | report pass    | `p1f0`                            | none                  |
//! | report fail    | `p0f1`                            | none                  |
//!
//! The stream is flushed after every command so the firmware sees it immediately.

use std::io::{Read, Write};

use tracing::trace;

use crate::common::FixtureError;
use crate::common::constants::{
    CMD_FAIL_LAMP, CMD_INDICATOR, CMD_INPUTS, CMD_OUTPUTS, CMD_PASS_LAMP, CMD_RESET,
};
use crate::vector::codec;
use crate::vector::{FrameOrder, InputFrame, OutputVector};

use super::Transport;

/// Longest input line accepted before the reply is treated as garbage.
const MAX_LINE_LEN: usize = 256;

/// Transport over a byte stream connected to the fixture firmware.
#[derive(Debug)]
pub struct SerialFixture<P> {
    port: P,
    trace_vectors: bool,
    frame_order: FrameOrder,
    line: Vec<u8>,
}

impl<P: Read + Write> SerialFixture<P> {
    /// Wraps an open stream.
    pub const fn new(port: P) -> Self {
        Self {
            port,
            trace_vectors: false,
            frame_order: FrameOrder::MsbFirst,
            line: Vec::new(),
        }
    }

    /// Enables trace-level logging of every vector exchanged.
    #[must_use]
    pub const fn with_vector_trace(mut self, enabled: bool) -> Self {
        self.trace_vectors = enabled;
        self
    }

    /// Declares the symbol order of the firmware's input frames.
    #[must_use]
    pub const fn with_frame_order(mut self, order: FrameOrder) -> Self {
        self.frame_order = order;
        self
    }

    /// Borrows the underlying stream.
    pub const fn get_ref(&self) -> &P {
        &self.port
    }

    /// Releases the underlying stream.
    pub fn into_inner(self) -> P {
        self.port
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), FixtureError> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<(), FixtureError> {
        self.line.clear();
        let mut byte = [0u8; 1];
        loop {
            self.port.read_exact(&mut byte)?;
            if byte[0] == b'\n' {
                return Ok(());
            }
            if self.line.len() >= MAX_LINE_LEN {
                return Err(FixtureError::MalformedFrame {
                    frame: String::from_utf8_lossy(&self.line).into_owned(),
                    reason: "line too long",
                });
            }
            self.line.push(byte[0]);
        }
    }
}

impl<P: Read + Write> Transport for SerialFixture<P> {
    fn reset(&mut self) -> Result<(), FixtureError> {
        self.send(&[CMD_RESET])
    }

    fn set_outputs(&mut self, vector: &OutputVector) -> Result<(), FixtureError> {
        if self.trace_vectors {
            trace!("{vector}");
        }
        let mut frame = Vec::with_capacity(1 + codec::frame_len(vector.width()));
        frame.push(CMD_OUTPUTS);
        frame.extend_from_slice(&codec::encode_vector(vector));
        self.send(&frame)
    }

    fn set_indicator(&mut self, value: u8) -> Result<(), FixtureError> {
        self.send(&[CMD_INDICATOR, value])
    }

    fn read_inputs(&mut self) -> Result<InputFrame, FixtureError> {
        self.send(&[CMD_INPUTS])?;
        self.read_line()?;
        let frame = codec::decode(&self.line)?;
        if self.trace_vectors {
            trace!("{frame}");
        }
        Ok(frame)
    }

    fn report_pass(&mut self) -> Result<(), FixtureError> {
        self.send(&[CMD_PASS_LAMP, b'1', CMD_FAIL_LAMP, b'0'])
    }

    fn report_fail(&mut self) -> Result<(), FixtureError> {
        self.send(&[CMD_PASS_LAMP, b'0', CMD_FAIL_LAMP, b'1'])
    }

    fn frame_order(&self) -> FrameOrder {
        self.frame_order
    }
}
