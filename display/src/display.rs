use sdl2::pixels::PixelFormatEnum;
use thiserror::Error;

use chip8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8_core::FrameBuffer;

/// SDL2 reports most failures as plain strings
#[derive(Debug, Error)]
#[error("display error: {0}")]
pub struct DisplayError(String);

impl DisplayError {
    fn from_sdl(err: impl std::fmt::Display) -> Self {
        DisplayError(err.to_string())
    }
}

/// # Display
/// The Chip-8 display is composed of 64x32 pixels black/white pixels.
/// The on/off state of these pixels is encoded as true/false in a 2d array of 64x32.
/// The display only gets a call to `render` when the Chip-8 FrameBuffer is updated.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
}

impl Display {
    /// Creates a new display object bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `scale` the size multiplier for each pixel
    pub fn new(sdl: &sdl2::Sdl, scale: u32) -> Result<Self, DisplayError> {
        let (width, height) = Display::window_size(scale)?;
        let video_subsystem = sdl.video().map_err(DisplayError::from_sdl)?;
        let window = video_subsystem
            .window("Emu-8", width, height)
            .position_centered()
            .opengl()
            .build()
            .map_err(DisplayError::from_sdl)?;
        let canvas = window
            .into_canvas()
            .build()
            .map_err(DisplayError::from_sdl)?;

        let mut display = Display { canvas };
        display.render(&[[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT])?;
        Ok(display)
    }

    /// The window's size in screen pixels, failing if `scale` overflows it
    fn window_size(scale: u32) -> Result<(u32, u32), DisplayError> {
        let scaled = |pixels: usize| {
            (pixels as u32)
                .checked_mul(scale)
                .ok_or_else(|| DisplayError(format!("scale {} is too large", scale)))
        };
        Ok((scaled(DISPLAY_WIDTH)?, scaled(DISPLAY_HEIGHT)?))
    }

    /// Formats a Chip-8 FrameBuffer for rendering as an SDL2 texture.
    ///
    /// An SDL2 texture is a 1D array of ints that represent concatenated rows of RGB pixels.
    ///
    /// This creates a black and white rendering by:
    /// - Flattening the 2D frame buffer into a 1D array by concatenating its rows
    /// - Converting each pixel to 0 or 255 intensity
    /// - Triplicating each intensity to represent the RGB values of each pixel
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    fn frame_to_sdl_texture(frame: &FrameBuffer) -> Vec<u8> {
        frame
            .iter()
            .flat_map(|row| row.iter())
            .map(|&on| if on { 0xFF_u8 } else { 0x00 })
            .flat_map(|intensity| std::iter::repeat(intensity).take(3))
            .collect()
    }

    /// Formats the Chip-8 FrameBuffer as an SDL2 RGB24 texture and renders it.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(DisplayError::from_sdl)?;

        let pixels = Display::frame_to_sdl_texture(frame);
        texture
            .with_lock(None, |buffer: &mut [u8], pitch: usize| {
                // rows may be padded beyond 3 bytes per pixel
                for (y, row) in pixels.chunks(DISPLAY_WIDTH * 3).enumerate() {
                    buffer[y * pitch..y * pitch + row.len()].copy_from_slice(row);
                }
            })
            .map_err(DisplayError::from_sdl)?;

        self.canvas
            .copy(&texture, None, None)
            .map_err(DisplayError::from_sdl)?;
        self.canvas.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_size() {
        assert_eq!(Display::window_size(10).unwrap(), (640, 320));
    }

    #[test]
    fn test_window_size_overflow() {
        assert!(Display::window_size(u32::MAX).is_err());
    }

    #[test]
    fn test_frame_to_sdl_texture() {
        let mut frame: FrameBuffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        frame[0][0..2].copy_from_slice(&[false, true]);
        frame[1][0..2].copy_from_slice(&[true, false]);
        let frame = Display::frame_to_sdl_texture(&frame);

        let mut expected: Vec<u8> = vec![0; 6144];
        expected[0..6].copy_from_slice(&[0, 0, 0, 255, 255, 255]);
        expected[192..198].copy_from_slice(&[255, 255, 255, 0, 0, 0]);

        assert_eq!(frame, expected);
    }
}
