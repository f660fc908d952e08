use crate::opcode::Opcode;
use crate::operations::{self, Operation};

/// # Instructions
/// Every 16-bit word decodes to exactly one of these.
///
/// `Sys` (0NNN, a call into native machine code) is recognised but has no operation, and `Unknown`
/// covers every word that isn't part of the instruction set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 0NNN
    Sys,
    /// 00E0
    Clear,
    /// 00EE
    Return,
    /// 1NNN
    Jump,
    /// 2NNN
    Call,
    /// 3XNN
    SkipEq,
    /// 4XNN
    SkipNe,
    /// 5XY0
    SkipEqReg,
    /// 6XNN
    Load,
    /// 7XNN
    Add,
    /// 8XY0
    Move,
    /// 8XY1
    Or,
    /// 8XY2
    And,
    /// 8XY3
    Xor,
    /// 8XY4
    AddReg,
    /// 8XY5
    Sub,
    /// 8XY6
    ShiftRight,
    /// 8XY7
    SubN,
    /// 8XYE
    ShiftLeft,
    /// 9XY0
    SkipNeReg,
    /// ANNN
    LoadI,
    /// BNNN
    JumpV0,
    /// CXNN
    Random,
    /// DXYN
    Draw,
    /// EX9E
    SkipPressed,
    /// EXA1
    SkipReleased,
    /// FX07
    GetDelay,
    /// FX0A
    AwaitKey,
    /// FX15
    SetDelay,
    /// FX18
    SetSound,
    /// FX1E
    AddI,
    /// FX29
    Font,
    /// FX33
    Bcd,
    /// FX55
    Store,
    /// FX65
    Restore,
    Unknown,
}

impl Instruction {
    /// Selects the Instruction for a given Opcode
    pub fn decode(op: &dyn Opcode) -> Self {
        use Instruction::*;

        match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Clear,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x0, ..) => Sys,
            (0x1, ..) => Jump,
            (0x2, ..) => Call,
            (0x3, ..) => SkipEq,
            (0x4, ..) => SkipNe,
            (0x5, .., 0x0) => SkipEqReg,
            (0x6, ..) => Load,
            (0x7, ..) => Add,
            (0x8, .., 0x0) => Move,
            (0x8, .., 0x1) => Or,
            (0x8, .., 0x2) => And,
            (0x8, .., 0x3) => Xor,
            (0x8, .., 0x4) => AddReg,
            (0x8, .., 0x5) => Sub,
            (0x8, .., 0x6) => ShiftRight,
            (0x8, .., 0x7) => SubN,
            (0x8, .., 0xE) => ShiftLeft,
            (0x9, .., 0x0) => SkipNeReg,
            (0xA, ..) => LoadI,
            (0xB, ..) => JumpV0,
            (0xC, ..) => Random,
            (0xD, ..) => Draw,
            (0xE, _, 0x9, 0xE) => SkipPressed,
            (0xE, _, 0xA, 0x1) => SkipReleased,
            (0xF, _, 0x0, 0x7) => GetDelay,
            (0xF, _, 0x0, 0xA) => AwaitKey,
            (0xF, _, 0x1, 0x5) => SetDelay,
            (0xF, _, 0x1, 0x8) => SetSound,
            (0xF, _, 0x1, 0xE) => AddI,
            (0xF, _, 0x2, 0x9) => Font,
            (0xF, _, 0x3, 0x3) => Bcd,
            (0xF, _, 0x5, 0x5) => Store,
            (0xF, _, 0x6, 0x5) => Restore,
            _ => Unknown,
        }
    }

    /// The state transition implementing this instruction, if there is one
    pub fn operation(self) -> Option<Operation> {
        use Instruction::*;

        let operation: Operation = match self {
            Sys | Unknown => return None,
            Clear => operations::clr,
            Return => operations::ret,
            Jump => operations::jump,
            Call => operations::call,
            SkipEq => operations::skip_eq,
            SkipNe => operations::skip_ne,
            SkipEqReg => operations::skip_eq_reg,
            Load => operations::load,
            Add => operations::add,
            Move => operations::mv,
            Or => operations::or,
            And => operations::and,
            Xor => operations::xor,
            AddReg => operations::add_reg,
            Sub => operations::sub,
            ShiftRight => operations::shr,
            SubN => operations::subn,
            ShiftLeft => operations::shl,
            SkipNeReg => operations::skip_ne_reg,
            LoadI => operations::load_i,
            JumpV0 => operations::jump_v0,
            Random => operations::rand,
            Draw => operations::draw,
            SkipPressed => operations::skip_pressed,
            SkipReleased => operations::skip_released,
            GetDelay => operations::get_delay,
            AwaitKey => operations::await_key,
            SetDelay => operations::set_delay,
            SetSound => operations::set_sound,
            AddI => operations::add_i,
            Font => operations::font,
            Bcd => operations::bcd,
            Store => operations::store,
            Restore => operations::restore,
        };
        Some(operation)
    }
}
