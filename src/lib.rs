pub mod chip8;
pub mod definitions;
pub mod devices;
mod error;
pub mod input;
pub mod opcode;
pub mod resources;
pub mod screen;

// reexporting for convinience
mod runner;
pub use error::*;
pub use runner::*;
