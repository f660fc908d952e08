pub use config::{JumpQuirk, Quirks, TransferQuirk};
pub use constants::{CLOCK_SPEED, TIMER_HZ};
pub use error::MachineError;
pub use instruction::Instruction;
pub use machine::{Machine, Outcome};
pub use opcode::Opcode;
pub use state::{FrameBuffer, State};

pub mod config;
pub mod constants;
mod error;
mod instruction;
mod machine;
mod opcode;
mod operations;
pub mod state;
