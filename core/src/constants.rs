/// Total addressable memory in bytes
pub const MEMORY_SIZE: usize = 0x1000;

/// Where programs are loaded and where execution starts
pub const PROGRAM_START: u16 = 0x200;

/// Where the font sprites live; FX29 relies on this being 0x000
pub const FONT_START: usize = 0x000;

/// Height of a single font glyph in bytes
pub const FONT_GLYPH_SIZE: u16 = 5;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

pub const REGISTER_COUNT: usize = 16;
pub const KEY_COUNT: usize = 16;

/// Maximum subroutine nesting depth
pub const STACK_DEPTH: usize = 24;

/// Default CPU clock speed in Hz
pub const CLOCK_SPEED: u32 = 500;

/// Rate at which drivers should decrement the delay and sound timers
pub const TIMER_HZ: u32 = 60;

/// # Sprite Sheet
/// Each hexadecimal digit 0..F has a 4x5 pixel sprite; one byte per row with the
/// pixels in the upper nibble.
/// ```text
/// 0xF0 ****
/// 0x90 *  *
/// 0x90 *  *
/// 0x90 *  *
/// 0xF0 ****
/// ```
#[rustfmt::skip]
pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
