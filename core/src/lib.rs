pub use crate::chip8::Chip8;
pub use config::{Config, ShiftQuirk};
pub use error::Chip8Error;
pub use state::{FrameBuffer, State};

mod chip8;
mod config;
pub mod constants;
mod error;
mod instruction;
mod opcode;
mod operations;
pub mod state;
