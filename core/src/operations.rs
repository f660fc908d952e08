use rand::{Rng, RngCore};

use crate::config::{JumpQuirk, Quirks};
use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_GLYPH_SIZE, STACK_DEPTH};
use crate::error::MachineError;
use crate::opcode::Opcode;
use crate::state::State;

/// Everything an operation needs besides the opcode and the state it transforms
pub struct Context<'a> {
    pub rng: &'a mut dyn RngCore,
    pub quirks: Quirks,
}

/// Produces the state following the execution of a single instruction.
/// On error no new state is produced, so the caller's state is left as it was.
pub type Operation = fn(op: &dyn Opcode, state: &State, ctx: &mut Context) -> Result<State, MachineError>;

/// The pc of the instruction after `state.pc`, or the one after that when `skip` holds
fn next_pc(state: &State, skip: bool) -> u16 {
    if skip {
        state.pc.wrapping_add(0x4)
    } else {
        state.pc.wrapping_add(0x2)
    }
}

/// Index into the keypad for the key named by Vx; only the low nibble is significant
fn key_index(state: &State, x: usize) -> usize {
    usize::from(state.v[x] & 0x0F)
}

/// clear
pub fn clr(_op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    Ok(State {
        pc: next_pc(state, false),
        frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        draw_flag: true,
        ..*state
    })
}

/// PC = STACK.pop()
pub fn ret(_op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    if state.sp == 0 {
        return Err(MachineError::StackUnderflow { address: state.pc });
    }
    let sp = state.sp - 1;
    Ok(State {
        pc: state.stack[sp],
        sp,
        ..*state
    })
}

/// PC = NNN
pub fn jump(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    Ok(State {
        pc: op.nnn(),
        ..*state
    })
}

/// STACK.push(PC + 2); PC = NNN
pub fn call(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    if state.sp == STACK_DEPTH {
        return Err(MachineError::StackOverflow { address: state.pc });
    }
    let mut stack = state.stack;
    stack[state.sp] = next_pc(state, false);
    Ok(State {
        pc: op.nnn(),
        sp: state.sp + 1,
        stack,
        ..*state
    })
}

/// if Vx == NN then skip
pub fn skip_eq(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    let pc = next_pc(state, state.v[op.x()] == op.nn());
    Ok(State { pc, ..*state })
}

/// if Vx != NN then skip
pub fn skip_ne(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    let pc = next_pc(state, state.v[op.x()] != op.nn());
    Ok(State { pc, ..*state })
}

/// if Vx == Vy then skip
pub fn skip_eq_reg(
    op: &dyn Opcode,
    state: &State,
    _ctx: &mut Context,
) -> Result<State, MachineError> {
    let pc = next_pc(state, state.v[op.x()] == state.v[op.y()]);
    Ok(State { pc, ..*state })
}

/// Vx = NN
pub fn load(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    let mut v = state.v;
    v[op.x()] = op.nn();
    Ok(State {
        pc: next_pc(state, false),
        v,
        ..*state
    })
}

/// Vx += NN
/// Overflow is dropped and VF is left alone
pub fn add(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    let mut v = state.v;
    v[op.x()] = v[op.x()].wrapping_add(op.nn());
    Ok(State {
        pc: next_pc(state, false),
        v,
        ..*state
    })
}

/// Vx = Vy
pub fn mv(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    let mut v = state.v;
    v[op.x()] = v[op.y()];
    Ok(State {
        pc: next_pc(state, false),
        v,
        ..*state
    })
}

/// Vx |= Vy
pub fn or(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    let mut v = state.v;
    v[op.x()] |= v[op.y()];
    Ok(State {
        pc: next_pc(state, false),
        v,
        ..*state
    })
}

/// Vx &= Vy
pub fn and(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    let mut v = state.v;
    v[op.x()] &= v[op.y()];
    Ok(State {
        pc: next_pc(state, false),
        v,
        ..*state
    })
}

/// Vx ^= Vy
pub fn xor(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    let mut v = state.v;
    v[op.x()] ^= v[op.y()];
    Ok(State {
        pc: next_pc(state, false),
        v,
        ..*state
    })
}

/// Vx += Vy; VF = carry
/// The carry is taken from the untruncated sum. Vx is written after VF, so V8F4 keeps the sum.
pub fn add_reg(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    let sum = u16::from(state.v[op.x()]) + u16::from(state.v[op.y()]);
    let mut v = state.v;
    v[0xF] = if sum > 0xFF { 0x1 } else { 0x0 };
    v[op.x()] = sum as u8;
    Ok(State {
        pc: next_pc(state, false),
        v,
        ..*state
    })
}

/// Vx -= Vy; VF = !borrow
pub fn sub(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    let (vx, vy) = (state.v[op.x()], state.v[op.y()]);
    let mut v = state.v;
    v[0xF] = if vy > vx { 0x0 } else { 0x1 };
    v[op.x()] = vx.wrapping_sub(vy);
    Ok(State {
        pc: next_pc(state, false),
        v,
        ..*state
    })
}

/// Vx >>= 1; VF = the bit shifted out
pub fn shr(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    let mut v = state.v;
    v[0xF] = v[op.x()] & 0x1;
    v[op.x()] >>= 1;
    Ok(State {
        pc: next_pc(state, false),
        v,
        ..*state
    })
}

/// Vx = Vy - Vx; VF = !borrow
pub fn subn(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    let (vx, vy) = (state.v[op.x()], state.v[op.y()]);
    let mut v = state.v;
    v[0xF] = if vx > vy { 0x0 } else { 0x1 };
    v[op.x()] = vy.wrapping_sub(vx);
    Ok(State {
        pc: next_pc(state, false),
        v,
        ..*state
    })
}

/// Vx <<= 1; VF = the bit shifted out
pub fn shl(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    let mut v = state.v;
    v[0xF] = (v[op.x()] & 0x80) >> 7;
    v[op.x()] <<= 1;
    Ok(State {
        pc: next_pc(state, false),
        v,
        ..*state
    })
}

/// if Vx != Vy then skip
pub fn skip_ne_reg(
    op: &dyn Opcode,
    state: &State,
    _ctx: &mut Context,
) -> Result<State, MachineError> {
    let pc = next_pc(state, state.v[op.x()] != state.v[op.y()]);
    Ok(State { pc, ..*state })
}

/// I = NNN
pub fn load_i(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    Ok(State {
        pc: next_pc(state, false),
        i: op.nnn(),
        ..*state
    })
}

/// PC = V0 + NNN
/// See `JumpQuirk` for the wrapping variant
pub fn jump_v0(op: &dyn Opcode, state: &State, ctx: &mut Context) -> Result<State, MachineError> {
    let target = u16::from(state.v[0x0]) + op.nnn();
    let pc = match ctx.quirks.jump {
        JumpQuirk::AddressPlusV0 => target,
        // The opcode's own top nibble is a multiple of 0x1000, so masking the sum of V0 and the
        // whole opcode is the same as masking V0 + NNN.
        JumpQuirk::MaskedSum => target & 0x0FFF,
    };
    Ok(State { pc, ..*state })
}

/// Vx = random_byte & NN
pub fn rand(op: &dyn Opcode, state: &State, ctx: &mut Context) -> Result<State, MachineError> {
    let rand_byte: u8 = ctx.rng.gen();
    let mut v = state.v;
    v[op.x()] = rand_byte & op.nn();
    Ok(State {
        pc: next_pc(state, false),
        v,
        ..*state
    })
}

/// draw_sprite(x=Vx y=Vy size=N)
/// XORs a sprite from memory I..I+N at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels were erased
pub fn draw(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    let sprite = state.read_slice(usize::from(state.i), usize::from(op.n()))?;
    let origin_x = usize::from(state.v[op.x()]);
    let origin_y = usize::from(state.v[op.y()]);

    let mut v = state.v;
    let mut frame_buffer = state.frame_buffer;

    // Reset the flag used for collision detection
    v[0xF] = 0x0;

    for (row, byte) in sprite.iter().enumerate() {
        let y = (origin_y + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            let x = (origin_x + bit) % DISPLAY_WIDTH;
            let pixel = (byte >> (7 - bit)) & 0x1;
            v[0xF] |= pixel & frame_buffer[y][x];
            frame_buffer[y][x] ^= pixel;
        }
    }

    Ok(State {
        pc: next_pc(state, false),
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    })
}

/// if key Vx is pressed then skip
pub fn skip_pressed(
    op: &dyn Opcode,
    state: &State,
    _ctx: &mut Context,
) -> Result<State, MachineError> {
    let pc = next_pc(state, state.keys[key_index(state, op.x())]);
    Ok(State { pc, ..*state })
}

/// if key Vx isn't pressed then skip
pub fn skip_released(
    op: &dyn Opcode,
    state: &State,
    _ctx: &mut Context,
) -> Result<State, MachineError> {
    let pc = next_pc(state, !state.keys[key_index(state, op.x())]);
    Ok(State { pc, ..*state })
}

/// Vx = DT
pub fn get_delay(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    let mut v = state.v;
    v[op.x()] = state.delay_timer;
    Ok(State {
        pc: next_pc(state, false),
        v,
        ..*state
    })
}

/// await keypress for Vx
pub fn await_key(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    Ok(State {
        pc: next_pc(state, false),
        awaiting_key: Some(op.x() as u8),
        ..*state
    })
}

/// DT = Vx
pub fn set_delay(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    Ok(State {
        pc: next_pc(state, false),
        delay_timer: state.v[op.x()],
        ..*state
    })
}

/// ST = Vx
pub fn set_sound(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    Ok(State {
        pc: next_pc(state, false),
        sound_timer: state.v[op.x()],
        ..*state
    })
}

/// I += Vx
pub fn add_i(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    Ok(State {
        pc: next_pc(state, false),
        i: state.i.wrapping_add(u16::from(state.v[op.x()])),
        ..*state
    })
}

/// I = Vx * 5
/// Set I to the memory address of the font sprite for Vx
pub fn font(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    Ok(State {
        pc: next_pc(state, false),
        i: u16::from(state.v[op.x()]) * FONT_GLYPH_SIZE,
        ..*state
    })
}

/// mem[I..I+3] = bcd(Vx)
pub fn bcd(op: &dyn Opcode, state: &State, _ctx: &mut Context) -> Result<State, MachineError> {
    let vx = state.v[op.x()];
    let mut next = State {
        pc: next_pc(state, false),
        ..*state
    };
    next.write_slice(usize::from(state.i), &[vx / 100, vx / 10 % 10, vx % 10])?;
    Ok(next)
}

/// mem[I..] = V0..Vx
pub fn store(op: &dyn Opcode, state: &State, ctx: &mut Context) -> Result<State, MachineError> {
    let count = ctx.quirks.register_transfer.count(op.x());
    let mut next = State {
        pc: next_pc(state, false),
        ..*state
    };
    next.write_slice(usize::from(state.i), &state.v[..count])?;
    Ok(next)
}

/// V0..Vx = mem[I..]
pub fn restore(op: &dyn Opcode, state: &State, ctx: &mut Context) -> Result<State, MachineError> {
    let count = ctx.quirks.register_transfer.count(op.x());
    let mut v = state.v;
    v[..count].copy_from_slice(state.read_slice(usize::from(state.i), count)?);
    Ok(State {
        pc: next_pc(state, false),
        v,
        ..*state
    })
}
