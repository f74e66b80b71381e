//! The full implementation of the chip8 interpreter core, from the
//! register file to the sprite blitter.
mod chipset;
mod execute;

/// reexport chipset structs and data for simpler usage
pub use chipset::*;
