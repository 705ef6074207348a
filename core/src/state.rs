use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, LAST_FETCH_ADDRESS, MAX_PROGRAM_SIZE, MEMORY_SIZE,
    PROGRAM_START, SPRITE_SHEET, STACK_SIZE,
};
use crate::error::Chip8Error;

/// The FrameBuffer is indexed as [y][x]
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry, borrow and collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter, always pointing at the next instruction
///
/// Pointer
/// - (sp) number of occupied stack slots, 0..=16
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented once per frame down to 0
///
/// ## Memory
/// - 16 slot stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x000..0x050 holds the sprite sheet
///     - 0x200.. holds the program
/// - 64x32 frame buffer of on/off pixels
///
/// ## Input
/// - Emulation halts while `register_needing_key` is Some, until a key is written to it
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub register_needing_key: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            register_needing_key: None,
        }
    }

    /// Zeroes everything, reloads the sprite sheet and points the pc at `PROGRAM_START`
    pub fn reset(&mut self) {
        *self = State::new();
    }

    /// Copies a program into memory at `PROGRAM_START`, leaving all other state alone
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::ProgramTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.memory[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    /// Reads the big-endian instruction word at `pc`.
    pub fn fetch(&self, pc: u16) -> Result<u16, Chip8Error> {
        if pc > LAST_FETCH_ADDRESS {
            return Err(Chip8Error::OutOfBoundsFetch { pc });
        }
        let left = u16::from(self.memory[pc as usize]);
        let right = u16::from(self.memory[pc as usize + 1]);
        Ok(left << 8 | right)
    }

    /// Reads memory at `addr` truncated to 12 bits
    pub fn read(&self, addr: u16) -> u8 {
        self.memory[usize::from(addr) % MEMORY_SIZE]
    }

    /// Writes memory at `addr` truncated to 12 bits
    pub fn write(&mut self, addr: u16, value: u8) {
        self.memory[usize::from(addr) % MEMORY_SIZE] = value;
    }

    /// Pushes a return address; `pc` is the address of the calling instruction
    pub fn push(&mut self, pc: u16, return_address: u16) -> Result<(), Chip8Error> {
        let sp = self.sp as usize;
        if sp >= STACK_SIZE {
            return Err(Chip8Error::StackOverflow { pc });
        }
        self.stack[sp] = return_address;
        self.sp += 1;
        Ok(())
    }

    /// Pops the most recent return address; `pc` is the address of the returning instruction
    pub fn pop(&mut self, pc: u16) -> Result<u16, Chip8Error> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow { pc });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_holds_sprite_sheet() {
        let state = State::new();
        for digit in 0..16 {
            let start = digit * 5;
            assert_eq!(
                state.memory[start..start + 5],
                SPRITE_SHEET[start..start + 5]
            );
        }
        assert!(state.memory[SPRITE_SHEET.len()..].iter().all(|&b| b == 0));
        assert_eq!(state.pc, 0x200);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = State::new();
        state.v[0x3] = 0x42;
        state.memory[0x300] = 0xFF;
        state.frame_buffer[4][4] = true;
        state.delay_timer = 9;
        state.reset();
        let once = state;
        state.reset();
        assert_eq!(state, once);
        assert_eq!(once, State::new());
    }

    #[test]
    fn test_load_program_copies_at_0x200() {
        let mut state = State::new();
        state.v[0x1] = 0x7;
        state.load_program(&[0x12, 0x34, 0x56]).unwrap();
        assert_eq!(state.memory[0x200..0x203], [0x12, 0x34, 0x56]);
        assert_eq!(state.v[0x1], 0x7);
    }

    #[test]
    fn test_load_program_accepts_maximum_size() {
        let mut state = State::new();
        let program = vec![0xAB; MAX_PROGRAM_SIZE];
        state.load_program(&program).unwrap();
        assert_eq!(state.memory[0xFFF], 0xAB);
    }

    #[test]
    fn test_load_program_rejects_oversized() {
        let mut state = State::new();
        let program = vec![0xAB; MAX_PROGRAM_SIZE + 1];
        assert_eq!(
            state.load_program(&program),
            Err(Chip8Error::ProgramTooLarge {
                size: 3585,
                max: 3584
            })
        );
        assert_eq!(state, State::new());
    }

    #[test]
    fn test_fetch_combines_bytes_big_endian() {
        let mut state = State::new();
        state.memory[0x200..0x202].copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(state.fetch(0x200), Ok(0xAABB));
    }

    #[test]
    fn test_fetch_last_word() {
        let mut state = State::new();
        state.memory[0xFFE..].copy_from_slice(&[0x00, 0xE0]);
        assert_eq!(state.fetch(0xFFE), Ok(0x00E0));
    }

    #[test]
    fn test_fetch_out_of_bounds() {
        let state = State::new();
        assert_eq!(
            state.fetch(0xFFF),
            Err(Chip8Error::OutOfBoundsFetch { pc: 0xFFF })
        );
    }

    #[test]
    fn test_read_write_truncate_address() {
        let mut state = State::new();
        state.write(0x1300, 0x5A);
        assert_eq!(state.memory[0x300], 0x5A);
        assert_eq!(state.read(0x1300), 0x5A);
    }

    #[test]
    fn test_stack_push_pop() {
        let mut state = State::new();
        state.push(0x200, 0x202).unwrap();
        state.push(0x300, 0x302).unwrap();
        assert_eq!(state.sp, 2);
        assert_eq!(state.pop(0x400), Ok(0x302));
        assert_eq!(state.pop(0x304), Ok(0x202));
        assert_eq!(state.sp, 0);
    }

    #[test]
    fn test_stack_overflow() {
        let mut state = State::new();
        for _ in 0..STACK_SIZE {
            state.push(0x200, 0x202).unwrap();
        }
        assert_eq!(
            state.push(0x200, 0x202),
            Err(Chip8Error::StackOverflow { pc: 0x200 })
        );
        assert_eq!(state.sp, 16);
    }

    #[test]
    fn test_stack_underflow() {
        let mut state = State::new();
        assert_eq!(
            state.pop(0x200),
            Err(Chip8Error::StackUnderflow { pc: 0x200 })
        );
    }
}
