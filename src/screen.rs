//! The terminal facing side of the interpreter: rendering the display
//! buffer as unicode block art and the raw mode guard for the
//! controlling terminal.

use std::io::{self, Write};

use crossterm::terminal;

use crate::devices::DisplayCommands;

/// Moves the cursor home and clears everything behind it.
const CLEAR_SCREEN: &str = "\x1b[H\x1b[J";

/// White Large Square
const PIXEL_ON: char = '\u{2B1C}';
/// Black Large Square
const PIXEL_OFF: char = '\u{2B1B}';

/// The help block appended below the rendered frame.
///
/// Raw mode turns off output post processing, so every line break has to
/// carry its own carriage return.
const KEYMAP_HELP: &str = concat!(
    "\r\n",
    "\tKEYMAP\r\n",
    "\t1 2 3 4      1 2 3 C\r\n",
    "\tQ W E R  =>  4 5 6 D\r\n",
    "\tA S D F      7 8 9 E\r\n",
    "\tY X C V      A 0 B F\r\n",
    "\r\n",
    "\tPress ESC to exit.\r\n",
);

/// Renders the pixel grid into a single frame string, one unicode square
/// per pixel, with the keymap help below it.
pub fn render<M: AsRef<[V]>, V: AsRef<[bool]>>(pixels: M) -> String {
    let rows = pixels.as_ref();

    // every pixel is a 4 byte code point, plus a generous rest for the
    // escape sequence and the help block
    let mut frame = String::with_capacity(rows.len() * 300 + KEYMAP_HELP.len());
    frame.push_str(CLEAR_SCREEN);

    for row in rows {
        frame.push('\t');
        for &pixel in row.as_ref() {
            frame.push(if pixel { PIXEL_ON } else { PIXEL_OFF });
        }
        frame.push_str("\r\n");
    }

    frame.push_str(KEYMAP_HELP);
    frame
}

/// Writes every frame to the terminal on stdout.
pub struct TerminalScreen {
    out: io::Stdout,
}

impl TerminalScreen {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for TerminalScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayCommands for TerminalScreen {
    fn display<M: AsRef<[V]>, V: AsRef<[bool]>>(&mut self, pixels: M) {
        let frame = render(pixels);
        // a failed frame is dropped, the next one repaints everything
        if let Err(err) = self
            .out
            .write_all(frame.as_bytes())
            .and_then(|_| self.out.flush())
        {
            log::warn!("dropped a frame: {}", err);
        }
    }
}

/// Puts the controlling terminal into raw mode for the lifetime of the
/// guard.
///
/// Restoration runs on drop and is best effort, a terminal that cannot
/// be restored only gets a log line.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn enable() -> crossterm::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            log::warn!("could not restore the terminal: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::display;

    #[test]
    fn test_render_pixel_art() {
        let pixels = vec![vec![true, false], vec![false, true]];
        let frame = render(&pixels);

        assert!(frame.starts_with(CLEAR_SCREEN));
        assert!(frame.contains("\t\u{2B1C}\u{2B1B}\r\n"));
        assert!(frame.contains("\t\u{2B1B}\u{2B1C}\r\n"));
        assert!(frame.ends_with(KEYMAP_HELP));
    }

    #[test]
    fn test_render_full_grid_shape() {
        let pixels = vec![vec![false; display::WIDTH]; display::HEIGHT];
        let frame = render(&pixels);

        let on = frame.matches(PIXEL_ON).count();
        let off = frame.matches(PIXEL_OFF).count();
        assert_eq!(on, 0);
        assert_eq!(off, display::WIDTH * display::HEIGHT);

        // one line per row plus the help block
        let pixel_rows = frame
            .lines()
            .filter(|line| line.contains(PIXEL_OFF))
            .count();
        assert_eq!(pixel_rows, display::HEIGHT);
    }
}
