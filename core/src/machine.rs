use std::fmt;
use std::io::Read;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Quirks;
use crate::constants::{MEMORY_SIZE, PROGRAM_START};
use crate::error::MachineError;
use crate::instruction::Instruction;
use crate::operations::Context;
use crate::state::{FrameBuffer, State};

/// What a single cycle did
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The opcode was executed
    Executed,
    /// Nothing was fetched because FX0A is still waiting for a key press
    AwaitingKey,
    /// The opcode decoded to an instruction this machine doesn't model (0NNN); the pc moved past it
    Unimplemented(u16),
    /// The opcode isn't part of the instruction set; the pc was left pointing at it
    Unknown(u16),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Executed => write!(f, "ok"),
            Outcome::AwaitingKey => write!(f, "waiting for a key press"),
            Outcome::Unimplemented(op) => write!(f, "opcode {:#06X} not implemented", op),
            Outcome::Unknown(op) => write!(f, "Unknown opcode {:#06X}", op),
        }
    }
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - a random source for CXNN, seeded once at construction
///  - the interpreter `quirks` in effect
///
/// Supplies interfaces for:
/// - loading programs
/// - pressing and releasing keys
/// - fetching, decoding and cycling the CPU
/// - counting down its timers when the driver says so
/// - inspecting its state and frame buffer for rendering by some display
pub struct Machine {
    state: State,
    rng: StdRng,
    quirks: Quirks,
}

impl Machine {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Creates a machine whose random source always produces the same sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Machine {
            state: State::new(),
            rng,
            quirks: Quirks::default(),
        }
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Mutable access for drivers that need to poke at registers, timers or keys directly
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Load a program made of instruction words
    ///
    /// The words are written big-endian from 0x200 and pc, I and opcode are reset; registers,
    /// timers, stack and display are left untouched.
    ///
    /// # Arguments
    /// * `words` the program's instructions in order
    pub fn load_program(&mut self, words: &[u16]) -> Result<(), MachineError> {
        let capacity = (MEMORY_SIZE - usize::from(PROGRAM_START)) / 2;
        if words.len() > capacity {
            return Err(MachineError::ProgramTooLarge {
                words: words.len(),
                capacity,
            });
        }

        let bytes: Vec<u8> = words.iter().flat_map(|word| word.to_be_bytes()).collect();
        self.state.write_slice(usize::from(PROGRAM_START), &bytes)?;
        self.state.pc = PROGRAM_START;
        self.state.i = 0;
        self.state.opcode = 0;
        debug!("loaded {} words at {:#06X}", words.len(), PROGRAM_START);
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// An odd trailing byte is padded with 0x00 to complete its word.
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<(), MachineError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let words: Vec<u16> = bytes
            .chunks(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]))
            .collect();
        self.load_program(&words)
    }

    /// Set the pressed status of key; resumes execution if FX0A was waiting for it
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        let key = key & 0x0F;
        self.state.keys[usize::from(key)] = true;
        if let Some(register) = self.state.awaiting_key.take() {
            self.state.v[usize::from(register)] = key;
        }
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.state.keys[usize::from(key & 0x0F)] = false;
    }

    /// Returns the FrameBuffer if it changed since it was last taken
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Counts both timers down by one, stopping at zero.
    /// Drivers call this at `TIMER_HZ`; cycling never does.
    pub fn tick_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// Whether a driver should currently be making a sound
    pub fn is_beeping(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// Reads the big-endian opcode at pc into the opcode register
    pub fn fetch(&mut self) -> Result<u16, MachineError> {
        let pc = usize::from(self.state.pc);
        let word = self.state.read_slice(pc, 2)?;
        self.state.opcode = u16::from(word[0]) << 8 | u16::from(word[1]);
        Ok(self.state.opcode)
    }

    /// Executes the opcode register
    pub fn decode(&mut self) -> Result<Outcome, MachineError> {
        let op = self.state.opcode;
        let instruction = Instruction::decode(&op);

        let operation = match instruction.operation() {
            Some(operation) => operation,
            None if instruction == Instruction::Sys => {
                debug!("{:#06X} at {:#06X} not implemented", op, self.state.pc);
                self.state.pc = self.state.pc.wrapping_add(2);
                return Ok(Outcome::Unimplemented(op));
            }
            None => {
                debug!("unknown opcode {:#06X} at {:#06X}", op, self.state.pc);
                return Ok(Outcome::Unknown(op));
            }
        };

        trace!(
            "{:04X} {:?} v{:02X?} i{:04X} pc{:04X}",
            op,
            instruction,
            self.state.v,
            self.state.i,
            self.state.pc
        );
        let mut ctx = Context {
            rng: &mut self.rng,
            quirks: self.quirks,
        };
        self.state = operation(&op, &self.state, &mut ctx)?;
        Ok(Outcome::Executed)
    }

    /// Advances the CPU by a single cycle
    /// - does nothing while awaiting a keypress
    /// - fetches and executes the next opcode
    pub fn cycle(&mut self) -> Result<Outcome, MachineError> {
        if self.state.awaiting_key.is_some() {
            return Ok(Outcome::AwaitingKey);
        }
        self.fetch()?;
        self.decode()
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
