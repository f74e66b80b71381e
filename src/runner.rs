//! The main interface out of the crate.
//!
//! Drives the chipset at a fixed frame cadence and hands every finished
//! frame to the display adapter.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use crate::{chip8::ChipSet, devices::DisplayCommands, error::ProcessError};

/// A collection of all the important interfaces.
/// Is primarily used to simplify the crate api.
pub struct Runner<D>
where
    D: DisplayCommands,
{
    /// The all important chipset implementation.
    chip: ChipSet,
    /// The display adapter, so that it can be redrawn during execution.
    screen: D,
    /// The shared shutdown flag, cleared by the input worker on escape.
    run_flag: Arc<AtomicBool>,
}

impl<D> Runner<D>
where
    D: DisplayCommands,
{
    /// Creates a new runner around a loaded chipset.
    pub fn new(chip: ChipSet, screen: D, run_flag: Arc<AtomicBool>) -> Self {
        Self {
            chip,
            screen,
            run_flag,
        }
    }

    /// Runs a single frame: the configured amount of cpu cycles, one
    /// redraw and one timer tick.
    pub fn frame(&mut self, instructions_per_frame: u32) -> Result<(), ProcessError> {
        for _ in 0..instructions_per_frame {
            self.chip.step()?;
        }

        self.screen.display(self.chip.get_display());
        self.chip.tick_timers();
        Ok(())
    }

    /// The outer interpreter loop.
    ///
    /// Spins frames at the given period until the run flag clears or the
    /// chipset reports a fatal state. Between two frames the thread
    /// sleeps, there are no per instruction pauses.
    pub fn run(
        &mut self,
        cycle_period: Duration,
        instructions_per_frame: u32,
    ) -> Result<(), ProcessError> {
        let mut last_frame = Instant::now();

        while self.run_flag.load(Ordering::Relaxed) {
            let elapsed = last_frame.elapsed();
            if elapsed < cycle_period {
                thread::sleep(cycle_period - elapsed);
                continue;
            }

            last_frame = Instant::now();
            self.frame(instructions_per_frame)?;
        }

        Ok(())
    }
}
