/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 0x1000;

/// Where programs are loaded and where execution begins
pub const PROGRAM_START: u16 = 0x200;

/// The largest program that fits between `PROGRAM_START` and the end of memory
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Highest address an instruction may be fetched from (it spans two bytes)
pub const LAST_FETCH_ADDRESS: u16 = (MEMORY_SIZE - 2) as u16;

/// Return addresses held by the call stack
pub const STACK_SIZE: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Number of bytes (rows) in each glyph of the sprite sheet
pub const SPRITE_BYTES: u16 = 5;

/// Reference cadence: 10 instructions per 60Hz frame
pub const DEFAULT_INSTRUCTIONS_PER_FRAME: usize = 10;
pub const DEFAULT_FRAMES_PER_SECOND: u32 = 60;

/// Ten seconds of frames at the default frame rate
pub const DEFAULT_REWIND_DEPTH: usize = 600;

/// # Sprite Sheet
/// Built-in hexadecimal glyphs 0..F, each 5 rows of 4 pixels (stored in the high nibble).
/// Loaded at address 0x000 on reset.
///
/// ```text
/// 0xF0  ####
/// 0x90  #  #
/// 0x90  #  #
/// 0x90  #  #
/// 0xF0  ####
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
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
