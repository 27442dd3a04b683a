//! SRAM sweep.
//!
//! Runs, in order:
//! 1. **Floating checks:** With `/OE` asserted and `/WE` released, each way of
//!    deselecting the chip must leave the data bus floating.
//! 2. **Sizing probe (optional):** Zero every address, store a needle at address 0,
//!    and expect it nowhere else. A chip with fewer address lines than its package
//!    aliases the needle.
//! 3. **Pattern sweep:** For each pattern and every address, write, disable (data
//!    must float) and read back.
//! 4. **Retention (optional):** After each pattern's sweep, read every address again
//!    without rewriting.

use tracing::{debug, info};

use crate::common::ExerciseError;
use crate::common::constants::{SIZING_NEEDLE, SRAM_PATTERNS};
use crate::config::ExerciseConfig;
use crate::fixture::Transport;
use crate::profile::{SramControl, SramSize, SramStatus};
use crate::protocol::ControlSet;
use crate::verifier::{Expectation, Verdict};

use super::{Session, run};

/// Width of the SRAM data bus.
const DATA_WIDTH: u32 = 8;

/// Exercises an SRAM of the given size.
///
/// Resets the fixture, runs the enabled phases and lights the pass or fail lamp.
pub fn exercise_sram<T: Transport + ?Sized>(
    transport: &mut T,
    size: SramSize,
    config: &ExerciseConfig,
) -> Result<Verdict, ExerciseError> {
    run(transport, size.profile()?, |session| {
        MemorySweep::new(session, config).run()
    })
}

/// Chip-select state of one vector.
#[derive(Debug, Clone, Copy)]
struct Select {
    cs1: bool,
    cs2: bool,
}

impl Select {
    const SELECTED: Self = Self { cs1: true, cs2: true };
    const NONE: Self = Self {
        cs1: false,
        cs2: false,
    };
}

struct MemorySweep<'a, 't, T: ?Sized> {
    session: &'a mut Session<'t, T, SramControl, SramStatus>,
    config: &'a ExerciseConfig,
    has_cs2: bool,
    addresses: u64,
    stride: u64,
    toggle: bool,
}

impl<'a, 't, T: Transport + ?Sized> MemorySweep<'a, 't, T> {
    fn new(
        session: &'a mut Session<'t, T, SramControl, SramStatus>,
        config: &'a ExerciseConfig,
    ) -> Self {
        let profile = session.profile();
        let has_cs2 = profile.has_control(SramControl::Cs2);
        let addresses = 1u64 << profile.address_lines();
        Self {
            session,
            config,
            has_cs2,
            addresses,
            stride: config.indicator_stride.max(1),
            toggle: true,
        }
    }

    fn run(mut self) -> Result<(), ExerciseError> {
        info!(addresses = self.addresses, "floating checks");
        self.floating_checks()?;

        if self.config.sizing {
            info!("sizing probe");
            self.sizing()?;
        }

        if self.config.read_write {
            for (index, &pattern) in SRAM_PATTERNS.iter().enumerate() {
                debug!("pattern {pattern:08b}");
                self.sweep(index as u32, pattern)?;
                if self.config.retention {
                    debug!("retention {pattern:08b}");
                    self.retention(index as u32, pattern)?;
                }
            }
        }
        Ok(())
    }

    fn controls(&self, select: Select, oe: bool, we: bool) -> ControlSet<SramControl> {
        let controls = ControlSet::new()
            .with(SramControl::Cs1, select.cs1)
            .with(SramControl::Oe, oe)
            .with(SramControl::We, we);
        if self.has_cs2 {
            controls.with(SramControl::Cs2, select.cs2)
        } else {
            controls
        }
    }

    fn expect_floating(&mut self, select: Select, label: &str) -> Result<(), ExerciseError> {
        let controls = self.controls(select, true, false);
        let response = self.session.transact(&controls, 0, 0)?;
        let _ = self.session.check(
            &response,
            SramStatus::Data,
            Expectation::floating(DATA_WIDTH),
            label,
            None,
        )?;
        Ok(())
    }

    fn floating_checks(&mut self) -> Result<(), ExerciseError> {
        self.expect_floating(
            Select {
                cs1: false,
                cs2: true,
            },
            "Outputs floating when no CS1",
        )?;
        if self.has_cs2 {
            self.expect_floating(Select::NONE, "Outputs floating when no CS")?;
            self.expect_floating(
                Select {
                    cs1: true,
                    cs2: false,
                },
                "Outputs floating when no CS2",
            )?;
        }
        Ok(())
    }

    /// Flips the indicator every `stride` addresses between `on` and `off`.
    fn progress(&mut self, address: u64, on: u8, off: u8) -> Result<(), ExerciseError> {
        if address % self.stride == 0 {
            self.toggle = !self.toggle;
            self.session.indicate(if self.toggle { on } else { off })?;
        }
        Ok(())
    }

    fn write(&mut self, address: u64, value: u8) -> Result<(), ExerciseError> {
        let controls = self.controls(Select::SELECTED, false, true);
        let _ = self.session.transact(&controls, address, u64::from(value))?;
        Ok(())
    }

    fn disable(&mut self, address: u64, label: &str) -> Result<(), ExerciseError> {
        let controls = self.controls(Select::NONE, false, false);
        let response = self.session.transact(&controls, address, 0)?;
        let _ = self.session.check(
            &response,
            SramStatus::Data,
            Expectation::floating(DATA_WIDTH),
            label,
            Some(address),
        )?;
        Ok(())
    }

    fn read(&mut self, address: u64, expected: u8, label: &str) -> Result<(), ExerciseError> {
        let controls = self.controls(Select::SELECTED, true, false);
        let response = self.session.transact(&controls, address, 0)?;
        let _ = self.session.check(
            &response,
            SramStatus::Data,
            Expectation::value(u64::from(expected), DATA_WIDTH),
            label,
            Some(address),
        )?;
        Ok(())
    }

    fn sizing(&mut self) -> Result<(), ExerciseError> {
        for address in 0..self.addresses {
            self.progress(address, 1, 0)?;
            self.write(address, 0)?;
        }
        self.write(0, SIZING_NEEDLE)?;
        for address in 1..self.addresses {
            self.progress(address, 1, 0)?;
            self.read(address, 0, "Needle not in haystack")?;
        }
        Ok(())
    }

    /// Indicator bar of pattern `index`: one lit segment per pattern reached.
    const fn bar(index: u32) -> u8 {
        ((1u16 << (index + 1)) - 1) as u8
    }

    fn sweep(&mut self, index: u32, pattern: u8) -> Result<(), ExerciseError> {
        let bar = Self::bar(index);
        self.session.indicate(bar)?;
        for address in 0..self.addresses {
            self.progress(address, bar | (1 << index), bar & !(1 << index))?;
            self.write(address, pattern)?;
            self.disable(address, "Floating after write")?;
            self.read(address, pattern, "Reading data works")?;
        }
        Ok(())
    }

    fn retention(&mut self, index: u32, pattern: u8) -> Result<(), ExerciseError> {
        let bar = Self::bar(index);
        for address in 0..self.addresses {
            self.progress(address, bar | (1 << index), bar & !(1 << index))?;
            self.read(address, pattern, "Data retained")?;
            self.disable(address, "Floating after read")?;
        }
        Ok(())
    }
}
