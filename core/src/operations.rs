use rand::rngs::StdRng;
use rand::Rng;

use crate::config::ShiftQuirk;
use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, SPRITE_BYTES};
use crate::error::Chip8Error;
use crate::opcode::Opcode;
use crate::state::{FrameBuffer, State};

/// Where the program counter goes once an operation completes
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProgramCounter {
    /// pc += 2
    Next,
    /// pc += 4
    Skip,
    /// pc = addr
    Jump(u16),
}

impl ProgramCounter {
    fn skip_if(condition: bool) -> Self {
        if condition {
            ProgramCounter::Skip
        } else {
            ProgramCounter::Next
        }
    }
}

/// Everything an operation may consult besides the machine state
pub struct Context<'a> {
    pub pressed_keys: &'a [bool; 16],
    pub shift_quirk: ShiftQuirk,
    pub rng: &'a mut StdRng,
}

pub type Outcome = Result<ProgramCounter, Chip8Error>;

/// no-op for words without a defined operation
pub fn nop(op: Opcode, _state: &mut State, _ctx: &mut Context) -> Outcome {
    log::debug!("ignoring unknown opcode {:04X}", op.word);
    Ok(ProgramCounter::Next)
}

/// clear
pub fn clr(_op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    state.frame_buffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    state.draw_flag = true;
    Ok(ProgramCounter::Next)
}

/// PC = STACK.pop()
pub fn rts(_op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    let pc = state.pop(state.pc)?;
    Ok(ProgramCounter::Jump(pc))
}

/// PC = addr
pub fn jump(op: Opcode, _state: &mut State, _ctx: &mut Context) -> Outcome {
    Ok(ProgramCounter::Jump(op.nnn))
}

/// STACK.push(PC + 2); PC = addr
pub fn call(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    state.push(state.pc, state.pc.wrapping_add(2))?;
    Ok(ProgramCounter::Jump(op.nnn))
}

/// if Vx == kk then pc += 2
pub fn ske(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    Ok(ProgramCounter::skip_if(state.v[op.vx()] == op.kk))
}

/// if Vx != kk then pc += 2
pub fn skne(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    Ok(ProgramCounter::skip_if(state.v[op.vx()] != op.kk))
}

/// if Vx == Vy then pc += 2
pub fn skre(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    Ok(ProgramCounter::skip_if(state.v[op.vx()] == state.v[op.vy()]))
}

/// Vx = kk
pub fn load(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    state.v[op.vx()] = op.kk;
    Ok(ProgramCounter::Next)
}

/// Vx += kk
/// Wraps without touching VF
pub fn add(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    state.v[op.vx()] = state.v[op.vx()].wrapping_add(op.kk);
    Ok(ProgramCounter::Next)
}

/// Vx = Vy
pub fn mv(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    state.v[op.vx()] = state.v[op.vy()];
    Ok(ProgramCounter::Next)
}

/// Vx |= Vy
pub fn or(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    state.v[op.vx()] |= state.v[op.vy()];
    Ok(ProgramCounter::Next)
}

/// Vx &= Vy
pub fn and(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    state.v[op.vx()] &= state.v[op.vy()];
    Ok(ProgramCounter::Next)
}

/// Vx ^= Vy
pub fn xor(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    state.v[op.vx()] ^= state.v[op.vy()];
    Ok(ProgramCounter::Next)
}

/// Vx += Vy; VF = overflow
pub fn addr(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    let (res, over) = state.v[op.vx()].overflowing_add(state.v[op.vy()]);
    state.v[op.vx()] = res;
    state.v[0xF] = u8::from(over);
    Ok(ProgramCounter::Next)
}

/// Vx -= Vy; VF = !underflow
pub fn sub(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    let (res, under) = state.v[op.vx()].overflowing_sub(state.v[op.vy()]);
    state.v[op.vx()] = res;
    state.v[0xF] = u8::from(!under);
    Ok(ProgramCounter::Next)
}

/// The operand of a shift, after applying the configured quirk
fn shift_operand(op: Opcode, state: &mut State, quirk: ShiftQuirk) -> u8 {
    if quirk == ShiftQuirk::CopyVy {
        state.v[op.vx()] = state.v[op.vy()];
    }
    state.v[op.vx()]
}

/// Vx >>= 1; VF = shifted out bit
pub fn shr(op: Opcode, state: &mut State, ctx: &mut Context) -> Outcome {
    let operand = shift_operand(op, state, ctx.shift_quirk);
    state.v[op.vx()] = operand >> 1;
    state.v[0xF] = operand & 0x1;
    Ok(ProgramCounter::Next)
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    let (res, under) = state.v[op.vy()].overflowing_sub(state.v[op.vx()]);
    state.v[op.vx()] = res;
    state.v[0xF] = u8::from(!under);
    Ok(ProgramCounter::Next)
}

/// Vx <<= 1; VF = shifted out bit
pub fn shl(op: Opcode, state: &mut State, ctx: &mut Context) -> Outcome {
    let operand = shift_operand(op, state, ctx.shift_quirk);
    state.v[op.vx()] = operand << 1;
    state.v[0xF] = operand >> 7;
    Ok(ProgramCounter::Next)
}

/// if Vx != Vy then pc +=2
pub fn skrne(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    Ok(ProgramCounter::skip_if(state.v[op.vx()] != state.v[op.vy()]))
}

/// I = addr
pub fn loadi(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    state.i = op.nnn;
    Ok(ProgramCounter::Next)
}

/// PC = V0 + addr
pub fn jumpi(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    Ok(ProgramCounter::Jump(u16::from(state.v[0x0]) + op.nnn))
}

/// Vx = rand_byte & kk
pub fn rnd(op: Opcode, state: &mut State, ctx: &mut Context) -> Outcome {
    let rand_byte: u8 = ctx.rng.gen();
    state.v[op.vx()] = rand_byte & op.kk;
    Ok(ProgramCounter::Next)
}

/// XORs one sprite row into the frame buffer, returning whether any pixel was erased
fn draw_row(frame_buffer: &mut FrameBuffer, x: usize, y: usize, row: u8) -> bool {
    let y = y % DISPLAY_HEIGHT;
    let mut collision = false;
    for bit in 0..8 {
        if row & (0x80 >> bit) == 0 {
            continue;
        }
        let pixel = &mut frame_buffer[y][(x + bit) % DISPLAY_WIDTH];
        collision |= *pixel;
        *pixel = !*pixel;
    }
    collision
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer.
/// Each pixel wraps around the screen edges independently.
/// Sets VF if any pixels are erased
pub fn draw(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    let x = usize::from(state.v[op.vx()]);
    let y = usize::from(state.v[op.vy()]);

    // Reset the carry flag (used for collision detection)
    state.v[0xF] = 0x0;

    let mut collision = false;
    for row in 0..u16::from(op.n) {
        let sprite_row = state.read(state.i.wrapping_add(row));
        collision |= draw_row(
            &mut state.frame_buffer,
            x,
            y + usize::from(row),
            sprite_row,
        );
    }

    state.v[0xF] = u8::from(collision);
    state.draw_flag = true;
    Ok(ProgramCounter::Next)
}

fn key_in_vx(op: Opcode, state: &State) -> usize {
    usize::from(state.v[op.vx()] & 0xF)
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: Opcode, state: &mut State, ctx: &mut Context) -> Outcome {
    Ok(ProgramCounter::skip_if(ctx.pressed_keys[key_in_vx(op, state)]))
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: Opcode, state: &mut State, ctx: &mut Context) -> Outcome {
    Ok(ProgramCounter::skip_if(!ctx.pressed_keys[key_in_vx(op, state)]))
}

/// Vx = DT
pub fn moved(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    state.v[op.vx()] = state.delay_timer;
    Ok(ProgramCounter::Next)
}

/// await keypress for Vx
/// The pc moves past this instruction now; execution stays parked until a key arrives
pub fn keyd(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    log::debug!("V{:X} awaiting a keypress", op.x);
    state.register_needing_key = Some(op.x);
    Ok(ProgramCounter::Next)
}

/// DT = Vx
pub fn loads(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    state.delay_timer = state.v[op.vx()];
    Ok(ProgramCounter::Next)
}

/// ST = Vx
pub fn ld(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    state.sound_timer = state.v[op.vx()];
    Ok(ProgramCounter::Next)
}

/// I += Vx
pub fn addi(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    state.i = state.i.wrapping_add(u16::from(state.v[op.vx()]));
    Ok(ProgramCounter::Next)
}

/// I = Vx * 5
/// Set I to the memory address of the glyph for the digit in Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    state.i = u16::from(state.v[op.vx()] & 0xF) * SPRITE_BYTES;
    Ok(ProgramCounter::Next)
}

/// mem[I..I+3] = bcd(Vx)
/// Store the hundreds, tens and ones digits of Vx starting at address i
pub fn bcd(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    let value = state.v[op.vx()];
    let digits = [value / 100, value / 10 % 10, value % 10];
    for (offset, digit) in (0..).zip(digits.iter()) {
        state.write(state.i.wrapping_add(offset), *digit);
    }
    Ok(ProgramCounter::Next)
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    for offset in 0..=u16::from(op.x) {
        state.write(state.i.wrapping_add(offset), state.v[usize::from(offset)]);
    }
    Ok(ProgramCounter::Next)
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(op: Opcode, state: &mut State, _ctx: &mut Context) -> Outcome {
    for offset in 0..=u16::from(op.x) {
        state.v[usize::from(offset)] = state.read(state.i.wrapping_add(offset));
    }
    Ok(ProgramCounter::Next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_row_wraps_each_pixel() {
        let mut frame: FrameBuffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        let collision = draw_row(&mut frame, 62, 33, 0b1110_0000);
        assert!(!collision);
        assert!(frame[1][62]);
        assert!(frame[1][63]);
        assert!(frame[1][0]);
        assert!(!frame[1][1]);
    }

    #[test]
    fn test_draw_row_reports_erased_pixels() {
        let mut frame: FrameBuffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        frame[0][1] = true;
        assert!(draw_row(&mut frame, 0, 0, 0b0100_0000));
        assert!(!frame[0][1]);
    }

    #[test]
    fn test_draw_row_ignores_unset_bits() {
        let mut frame: FrameBuffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        frame[0][0] = true;
        assert!(!draw_row(&mut frame, 0, 0, 0b0111_1111));
        assert!(frame[0][0]);
    }
}
