use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use sdl2::event::Event;
use sdl2::keyboard::Scancode;

use crate::keymap::keymap;
use chip8_core::{Chip8, Config};
use chip8_display::Display;

/// Everything the frame driver needs to start a session
#[derive(Debug)]
pub struct Settings {
    pub rom: PathBuf,
    pub instructions_per_frame: usize,
    pub frames_per_second: u32,
    pub scale: u32,
    pub config: Config,
}

pub fn run(settings: Settings) -> Result<()> {
    let mut chip8: Chip8 = Chip8::with_config(settings.config);

    // Load ROM
    let program = std::fs::read(&settings.rom)
        .with_context(|| format!("unable to read ROM {}", settings.rom.display()))?;
    chip8
        .load_program(&program)
        .with_context(|| format!("unable to load ROM {}", settings.rom.display()))?;
    log::info!(
        "running {} at {} instructions per frame, {} frames per second",
        settings.rom.display(),
        settings.instructions_per_frame,
        settings.frames_per_second
    );

    // Get SDL2 context
    let sdl: sdl2::Sdl = sdl2::init().map_err(anyhow::Error::msg)?;
    let mut display: Display = Display::new(&sdl, settings.scale)?;
    let mut events = sdl.event_pump().map_err(anyhow::Error::msg)?;

    // Set initial timing
    let frame_time: Duration = Duration::from_secs(1) / settings.frames_per_second;
    let mut last_frame: Instant = Instant::now();

    // Whether or not the frame rate should be respected
    let mut fast_forward: bool = false;
    // Whether the game's state should be cycled forwards or backwards
    let mut rewind: bool = false;
    // Whether the current halt has been reported
    let mut halt_reported: bool = false;

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => break 'event,
                Event::KeyDown {
                    scancode: Some(key),
                    repeat: false,
                    ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.set_key_down(kc),
                    (Scancode::Space, _) => fast_forward = true,
                    (Scancode::Backspace, _) => rewind = true,
                    _ => continue,
                },
                Event::KeyUp {
                    scancode: Some(key),
                    ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.set_key_up(kc),
                    (Scancode::Space, _) => fast_forward = false,
                    (Scancode::Backspace, _) => rewind = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state
        if rewind {
            chip8.reverse_frame();
        } else {
            match chip8.run_frame(settings.instructions_per_frame) {
                Ok(()) => halt_reported = false,
                Err(err) if !halt_reported => {
                    log::warn!("program stopped ({}); hold backspace to rewind", err);
                    halt_reported = true;
                }
                Err(_) => {}
            }
        }

        // If the frame changed, render it
        if let Some(frame) = chip8.get_frame() {
            display.render(&frame)?;
        }

        // Handle timing
        let current_time = Instant::now();
        let elapsed_frame_time = current_time - last_frame;
        if !fast_forward && frame_time > elapsed_frame_time {
            std::thread::sleep(frame_time - elapsed_frame_time);
        }
        last_frame = Instant::now();
    }

    Ok(())
}
