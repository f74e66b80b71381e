//! The background worker that couples the host keyboard to the keypad
//! latch.
//!
//! The terminal delivers characters without key-up events, so the worker
//! only ever latches presses; [`Keypad::release_expired`] ages them out
//! again. The worker is the sole writer of the latch and, next to the
//! escape handling, never touches any other interpreter state.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crossterm::event::{self, Event, KeyCode};
use parking_lot::RwLock;

use crate::{
    definitions::keyboard,
    devices::{map_key, Keypad},
};

/// Owns the input thread and joins it on drop.
pub struct InputWorker {
    thread: Option<JoinHandle<()>>,
}

impl InputWorker {
    /// Spawns the worker.
    ///
    /// The worker runs until the run flag clears, either by the cpu side
    /// shutting down or by an observed escape press.
    pub fn spawn(keypad: Arc<RwLock<Keypad>>, run_flag: Arc<AtomicBool>) -> Self {
        let thread = thread::spawn(move || input_loop(keypad, run_flag));
        Self {
            thread: Some(thread),
        }
    }

    /// Will wait for the worker thread to finish.
    pub fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("the input worker paniced");
            }
        }
    }
}

impl Drop for InputWorker {
    fn drop(&mut self) {
        self.join();
    }
}

fn input_loop(keypad: Arc<RwLock<Keypad>>, run_flag: Arc<AtomicBool>) {
    while run_flag.load(Ordering::Relaxed) {
        keypad.write().release_expired(keyboard::RELEASE_WINDOW);

        // the poll timeout doubles as the pause between two scans
        match event::poll(keyboard::POLL_INTERVAL) {
            Ok(true) => drain_pending(&keypad, &run_flag),
            Ok(false) => {}
            Err(err) => {
                log::warn!("polling the host input failed: {}", err);
                thread::sleep(keyboard::POLL_INTERVAL);
            }
        }
    }
}

/// Reads every already pending host event before the worker sleeps again.
fn drain_pending(keypad: &Arc<RwLock<Keypad>>, run_flag: &Arc<AtomicBool>) {
    loop {
        match event::read() {
            Ok(Event::Key(key)) => match key.code {
                KeyCode::Esc => {
                    log::info!("escape pressed, shutting down");
                    run_flag.store(false, Ordering::Relaxed);
                    return;
                }
                KeyCode::Char(c) => {
                    if let Some(key) = map_key(c) {
                        keypad.write().press(key);
                    }
                }
                _ => {}
            },
            Ok(_) => {}
            Err(err) => {
                log::warn!("reading the host input failed: {}", err);
                return;
            }
        }

        match event::poll(Duration::from_millis(0)) {
            Ok(true) => {}
            _ => return,
        }
    }
}
