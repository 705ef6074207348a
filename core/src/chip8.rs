use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::error::Chip8Error;
use crate::instruction;
use crate::opcode::Opcode;
use crate::operations::{Context, ProgramCounter};
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding, one per frame
///  - `pressed_keys` with public interfaces for manipulating them
///  - `halted`, the error that stopped the running program, if any
///
/// Supplies interfaces for:
/// - loading programs
/// - pressing and releasing keys
/// - advancing the CPU one instruction or one frame at a time
/// - reversing a frame
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    previous_states: VecDeque<State>,
    pressed_keys: [bool; 16],
    config: Config,
    rng: StdRng,
    halted: Option<Chip8Error>,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Chip8 {
            state: State::new(),
            previous_states: VecDeque::new(),
            pressed_keys: [false; 16],
            config,
            rng,
            halted: None,
        }
    }

    /// Read-only view of the machine state
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Returns the machine to its power-on state, forgetting any rewind history
    pub fn reset(&mut self) {
        self.state.reset();
        self.previous_states.clear();
        self.pressed_keys = [false; 16];
        self.halted = None;
    }

    /// Resets the machine and loads a program at 0x200.
    ///
    /// A program that doesn't fit is rejected before anything is modified.
    ///
    /// # Arguments
    /// * `program` the raw bytes of a ROM
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        let mut fresh = State::new();
        fresh.load_program(program)?;
        self.reset();
        self.state = fresh;
        log::info!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Returns the FrameBuffer if it changed since it was last taken
    pub fn get_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    /// The current FrameBuffer, changed or not
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Whether a tone should be playing
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn is_awaiting_key(&self) -> bool {
        self.state.register_needing_key.is_some()
    }

    /// The error that stopped the program, if it has stopped
    pub fn halted(&self) -> Option<Chip8Error> {
        self.halted
    }

    /// Set the pressed status of key, resuming execution if it was awaiting one
    ///
    /// # Arguments
    /// * `key` the logical key 0x0..=0xF that was pressed
    pub fn set_key_down(&mut self, key: u8) {
        let key = key & 0xF;
        let was_pressed = self.pressed_keys[key as usize];
        self.pressed_keys[key as usize] = true;
        if was_pressed {
            return;
        }
        if let Some(register) = self.state.register_needing_key.take() {
            log::debug!("key {:X} resumes execution into V{:X}", key, register);
            self.state.v[register as usize] = key;
        }
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the logical key 0x0..=0xF that was released
    pub fn set_key_up(&mut self, key: u8) {
        self.pressed_keys[(key & 0xF) as usize] = false;
    }

    /// Advances the CPU by a single cycle
    /// - fails if the program has halted
    /// - does nothing while awaiting a keypress
    /// - otherwise fetches, decodes and executes the next opcode
    pub fn advance_cpu(&mut self) -> Result<(), Chip8Error> {
        if let Some(err) = self.halted {
            return Err(err);
        }
        if self.is_awaiting_key() {
            return Ok(());
        }
        self.execute().map_err(|err| {
            log::error!("halting: {}", err);
            self.halted = Some(err);
            err
        })
    }

    fn execute(&mut self) -> Result<(), Chip8Error> {
        let pc = self.state.pc;
        let op = Opcode::from(self.state.fetch(pc)?);
        log::trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            op.word,
            self.state.v,
            self.state.i,
            pc
        );

        let mut ctx = Context {
            pressed_keys: &self.pressed_keys,
            shift_quirk: self.config.shift_quirk,
            rng: &mut self.rng,
        };
        let next = instruction::from_op(&op)(op, &mut self.state, &mut ctx)?;

        self.state.pc = match next {
            ProgramCounter::Next => pc.wrapping_add(2),
            ProgramCounter::Skip => pc.wrapping_add(4),
            ProgramCounter::Jump(addr) => addr,
        };
        Ok(())
    }

    /// Runs one frame's worth of instructions followed by a single timer tick
    /// - the state before the frame is kept for rewinding
    /// - stops early while awaiting a keypress, still ticking the timers
    /// - stops on the first error without ticking the timers
    ///
    /// # Arguments
    /// * `instructions` the most instructions to execute this frame
    pub fn run_frame(&mut self, instructions: usize) -> Result<(), Chip8Error> {
        if let Some(err) = self.halted {
            return Err(err);
        }
        self.save_state();
        for _ in 0..instructions {
            if self.is_awaiting_key() {
                break;
            }
            self.advance_cpu()?;
        }
        self.advance_timers();
        Ok(())
    }

    /// Reverses by a single frame if possible
    /// - if there are previous_states, pops the last one and restores it
    /// - restoring a state from before a halt lets the program run again
    pub fn reverse_frame(&mut self) {
        if let Some(state) = self.previous_states.pop_front() {
            self.state = state;
            self.state.draw_flag = true;
            self.halted = None;
        }
    }

    /// Puts the current state in previous_states
    /// - if there are already `rewind_depth` saved then the oldest is dropped
    fn save_state(&mut self) {
        if self.config.rewind_depth == 0 {
            return;
        }
        if self.previous_states.len() == self.config.rewind_depth {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(self.state);
    }

    /// Decrements each timer that is above zero; called once per frame
    pub fn advance_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
