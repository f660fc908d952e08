use std::io;

use thiserror::Error;

/// Failures that stop a cycle from completing.
///
/// An instruction that fails with one of these leaves the machine as it was before it executed.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("memory access out of bounds at address {address:#06X}")]
    AddressOutOfRange { address: usize },

    #[error("call stack overflow at {address:#06X}")]
    StackOverflow { address: u16 },

    #[error("return with an empty call stack at {address:#06X}")]
    StackUnderflow { address: u16 },

    #[error("program of {words} words doesn't fit in the {capacity} words of program memory")]
    ProgramTooLarge { words: usize, capacity: usize },

    #[error("unable to read ROM")]
    Io(#[from] io::Error),
}
