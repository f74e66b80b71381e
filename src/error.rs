use thiserror::Error;

use crate::opcode::Opcode;

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum ProcessError {
    #[error("An unsupported opcode {opcode:#06X} was reached at {pc:#05X}.")]
    UnknownOpcode { opcode: Opcode, pc: u16 },
    #[error("Memory access out of bounds at {address:#05X} (pc {pc:#05X}).")]
    OutOfBounds { pc: u16, address: usize },
    #[error("Invalid stack state '{0}'.")]
    Stack(#[from] StackError),
}

#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum StackError {
    #[error("Stack is full!")]
    Full,
    #[error("Stack is empty!")]
    Empty,
}

#[derive(Error, Debug)]
pub enum RomError {
    #[error("Failed to open ROM: {0}")]
    Io(#[from] std::io::Error),
    #[error("ROM size of {size} bytes does not fit into the {max} bytes of program memory.")]
    TooLarge { size: usize, max: usize },
}
