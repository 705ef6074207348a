use crate::constants::DEFAULT_REWIND_DEPTH;

/// Source operand of the `8xy6` and `8xyE` shift instructions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShiftQuirk {
    /// Original interpreters copy Vy into Vx and then shift Vx
    CopyVy,
    /// Later interpreters shift Vx in place and ignore Vy
    InPlace,
}

impl Default for ShiftQuirk {
    fn default() -> Self {
        ShiftQuirk::CopyVy
    }
}

/// Engine configuration, fixed for the lifetime of a `Chip8`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    pub shift_quirk: ShiftQuirk,
    /// Seed for the `Cxkk` random source; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Frames kept for rewinding; 0 disables rewind
    pub rewind_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            shift_quirk: ShiftQuirk::default(),
            seed: None,
            rewind_depth: DEFAULT_REWIND_DEPTH,
        }
    }
}
