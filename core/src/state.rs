use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT, FONT_START, KEY_COUNT, MEMORY_SIZE, PROGRAM_START,
    REGISTER_COUNT, STACK_DEPTH,
};
use crate::error::MachineError;

/// A snapshot of the Chip-8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - VF doubles as the flag output of 8XY4, 8XY5, 8XY6, 8XY7, 8XYE and DXYN,
///       which overwrite whatever a program stored there
///     - all arithmetic on them wraps modulo 256
/// - (i) a 16-bit memory address register
/// - (opcode) the most recently fetched instruction
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Stack
/// - (stack) up to 24 return addresses
/// - (sp) the number of addresses currently on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound)
/// - they are only ever set and read by instructions; counting them down is up to the driver
///
/// ## Memory
/// - 4096 bytes of addressable memory
///     - 0x000..0x050 the font sprites
///     - 0x200.. the loaded program
/// - 32x64 byte frame buffer holding 0/1 pixels
///
/// ## Input
/// - the pressed status of keys 0..F, written by the driver
/// - execution halts while `awaiting_key` names a register waiting for the next key press
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub opcode: u16,
    pub sp: usize,
    pub stack: [u16; STACK_DEPTH],
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub keys: [bool; KEY_COUNT],
    pub awaiting_key: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[FONT_START..FONT_START + FONT.len()].copy_from_slice(&FONT);

        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            opcode: 0,
            sp: 0,
            stack: [0; STACK_DEPTH],
            delay_timer: 0,
            sound_timer: 0,
            memory,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            keys: [false; KEY_COUNT],
            awaiting_key: None,
        }
    }

    /// Reads the byte at `address`
    pub fn read(&self, address: usize) -> Result<u8, MachineError> {
        self.memory
            .get(address)
            .copied()
            .ok_or(MachineError::AddressOutOfRange { address })
    }

    /// Borrows `len` bytes of memory starting at `address`.
    /// An empty read touches no memory and never fails.
    pub fn read_slice(&self, address: usize, len: usize) -> Result<&[u8], MachineError> {
        if len == 0 {
            return Ok(&[]);
        }
        self.memory
            .get(address..address + len)
            .ok_or(MachineError::AddressOutOfRange {
                address: address + len - 1,
            })
    }

    /// Copies `bytes` into memory starting at `address`.
    /// Nothing is written unless all of `bytes` fits.
    pub fn write_slice(&mut self, address: usize, bytes: &[u8]) -> Result<(), MachineError> {
        if bytes.is_empty() {
            return Ok(());
        }
        let end = address + bytes.len();
        match self.memory.get_mut(address..end) {
            Some(dest) => {
                dest.copy_from_slice(bytes);
                Ok(())
            }
            None => Err(MachineError::AddressOutOfRange { address: end - 1 }),
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// The FrameBuffer is indexed as [y][x]
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_font() {
        let state = State::new();
        assert_eq!(state.memory[0x00..0x05], [0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(state.memory[0x4B..0x50], [0xF0, 0x80, 0xF0, 0x80, 0x80]);
        assert!(state.memory[0x50..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_new_state_starts_at_program() {
        let state = State::new();
        assert_eq!(state.pc, 0x200);
        assert_eq!(state.sp, 0);
        assert_eq!(state.awaiting_key, None);
    }

    #[test]
    fn test_read_out_of_range() {
        let state = State::new();
        assert_eq!(state.read(0xFFF).unwrap(), 0);
        assert!(matches!(
            state.read(0x1000),
            Err(MachineError::AddressOutOfRange { address: 0x1000 })
        ));
    }

    #[test]
    fn test_read_slice_reports_last_address() {
        let state = State::new();
        assert_eq!(state.read_slice(0xFFD, 3).unwrap(), &[0, 0, 0]);
        assert!(matches!(
            state.read_slice(0xFFE, 3),
            Err(MachineError::AddressOutOfRange { address: 0x1000 })
        ));
    }

    #[test]
    fn test_write_slice_is_all_or_nothing() {
        let mut state = State::new();
        assert!(state.write_slice(0xFFE, &[1, 2, 3]).is_err());
        assert_eq!(state.memory[0xFFE..], [0, 0]);

        state.write_slice(0x300, &[1, 2, 3]).unwrap();
        assert_eq!(state.memory[0x300..0x303], [1, 2, 3]);
    }

    #[test]
    fn test_empty_access_past_memory() {
        let mut state = State::new();
        assert_eq!(state.read_slice(0x1001, 0).unwrap(), &[] as &[u8]);
        assert!(state.write_slice(0x1001, &[]).is_ok());
    }
}
