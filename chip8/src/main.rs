use std::path::PathBuf;

use clap::Parser;

use chip8_core::constants::{
    DEFAULT_FRAMES_PER_SECOND, DEFAULT_INSTRUCTIONS_PER_FRAME, DEFAULT_REWIND_DEPTH,
};
use chip8_core::{Config, ShiftQuirk};

/// Keeps the window within what SDL2 can create
const MAX_SCALE: u32 = 64;

mod keymap;
mod run;

/// Run a Chip-8 ROM.
///
/// Keys 1-4, Q-R, A-F and Z-V form the keypad. Hold space to fast forward,
/// hold backspace to rewind, press escape to quit.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Instructions executed per frame
    #[arg(short, long, default_value_t = DEFAULT_INSTRUCTIONS_PER_FRAME)]
    instructions_per_frame: usize,

    /// Frames (and timer ticks) per second
    #[arg(short, long, default_value_t = DEFAULT_FRAMES_PER_SECOND,
          value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,

    /// Size of each Chip-8 pixel on screen
    #[arg(short, long, default_value_t = 10,
          value_parser = clap::value_parser!(u32).range(1..=MAX_SCALE as i64))]
    scale: u32,

    /// Shift Vx in place rather than copying Vy into it first (8xy6, 8xyE)
    #[arg(long)]
    modern_shift: bool,

    /// Seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// Frames of history kept for rewinding
    #[arg(long, default_value_t = DEFAULT_REWIND_DEPTH)]
    rewind_depth: usize,
}

impl From<Args> for run::Settings {
    fn from(args: Args) -> Self {
        let shift_quirk = if args.modern_shift {
            ShiftQuirk::InPlace
        } else {
            ShiftQuirk::CopyVy
        };
        run::Settings {
            rom: args.rom,
            instructions_per_frame: args.instructions_per_frame,
            frames_per_second: args.fps,
            scale: args.scale,
            config: Config {
                shift_quirk,
                seed: args.seed,
                rewind_depth: args.rewind_depth,
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    run::run(args.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings: run::Settings = Args::parse_from(["chip8", "pong.ch8"]).into();
        assert_eq!(settings.rom, PathBuf::from("pong.ch8"));
        assert_eq!(settings.instructions_per_frame, 10);
        assert_eq!(settings.frames_per_second, 60);
        assert_eq!(settings.scale, 10);
        assert_eq!(settings.config, Config::default());
    }

    #[test]
    fn test_overrides() {
        let settings: run::Settings = Args::parse_from([
            "chip8",
            "pong.ch8",
            "-i",
            "20",
            "--fps",
            "30",
            "--modern-shift",
            "--seed",
            "7",
            "--rewind-depth",
            "0",
        ])
        .into();
        assert_eq!(settings.instructions_per_frame, 20);
        assert_eq!(settings.frames_per_second, 30);
        assert_eq!(settings.config.shift_quirk, ShiftQuirk::InPlace);
        assert_eq!(settings.config.seed, Some(7));
        assert_eq!(settings.config.rewind_depth, 0);
    }

    #[test]
    fn test_scale_bounds() {
        assert!(Args::try_parse_from(["chip8", "pong.ch8", "--scale", "0"]).is_err());
        assert!(Args::try_parse_from(["chip8", "pong.ch8", "--scale", "65"]).is_err());
        assert!(Args::try_parse_from(["chip8", "pong.ch8", "--scale", "64"]).is_ok());
    }

    #[test]
    fn test_zero_fps_rejected() {
        assert!(Args::try_parse_from(["chip8", "pong.ch8", "--fps", "0"]).is_err());
    }
}
