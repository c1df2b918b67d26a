//! On-screen review window.
//!
//! Controls:
//!   a / Left:      previous sample
//!   d / Right:     next sample
//!   x / Delete:    reject (quarantine image and label)
//!   q / Escape:    quit
//!
//! Closing the window counts as quit.

use image::RgbImage;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::error::CullError;
use crate::render::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::session::{Frontend, KeyCommand};

/// A fixed-size `minifb` window. Dropping it closes the window.
pub struct WindowFrontend {
    window: Window,
    framebuf: Vec<u32>,
}

impl WindowFrontend {
    pub fn open(title: &str) -> Result<Self, CullError> {
        let mut window = Window::new(
            title,
            DISPLAY_WIDTH as usize,
            DISPLAY_HEIGHT as usize,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|err| CullError::Display(err.to_string()))?;

        window.set_target_fps(60);

        Ok(Self {
            window,
            framebuf: Vec::new(),
        })
    }
}

impl Frontend for WindowFrontend {
    fn present(&mut self, frame: &RgbImage, caption: &str) -> Result<(), CullError> {
        self.framebuf.clear();
        self.framebuf
            .extend(frame.pixels().map(|p| rgb_pixel(p[0], p[1], p[2])));

        self.window.set_title(caption);
        self.window
            .update_with_buffer(
                &self.framebuf,
                frame.width() as usize,
                frame.height() as usize,
            )
            .map_err(|err| CullError::Display(err.to_string()))
    }

    fn next_key(&mut self) -> Result<KeyCommand, CullError> {
        while self.window.is_open() {
            if let Some(key) = self.window.get_keys_pressed(KeyRepeat::No).first() {
                return Ok(map_key(*key));
            }
            self.window.update();
        }
        Ok(KeyCommand::Quit)
    }
}

/// Key bindings.
pub fn map_key(key: Key) -> KeyCommand {
    match key {
        Key::Q | Key::Escape => KeyCommand::Quit,
        Key::A | Key::Left => KeyCommand::Previous,
        Key::D | Key::Right => KeyCommand::Next,
        Key::X | Key::Delete => KeyCommand::Reject,
        _ => KeyCommand::Other,
    }
}

fn rgb_pixel(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}
