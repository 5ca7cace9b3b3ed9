//! The 64x32 monochrome display.

use std::fmt;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

type Pixels = [[bool; SCREEN_WIDTH]; SCREEN_HEIGHT];
const EMPTY_SCREEN: Pixels = [[false; SCREEN_WIDTH]; SCREEN_HEIGHT];

/// The display buffer. Programs change it through clear and draw
/// instructions only, hosts get read access through the machine.
#[derive(Clone, PartialEq, Eq)]
pub struct Screen {
    pixels: Pixels,
}

impl Screen {
    pub fn new() -> Screen {
        Screen {
            pixels: EMPTY_SCREEN,
        }
    }

    pub fn clear(&mut self) {
        self.pixels = EMPTY_SCREEN;
    }

    /// Read a pixel. Coordinates wrap around the edges.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[y % SCREEN_HEIGHT][x % SCREEN_WIDTH]
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, x: usize, y: usize, state: bool) {
        self.pixels[y % SCREEN_HEIGHT][x % SCREEN_WIDTH] = state;
    }

    /// XOR a sprite onto the screen with its top-left corner at `(x, y)`.
    ///
    /// Each byte is one row, most significant bit leftmost. Pixels that fall
    /// off an edge wrap around to the other side. Returns whether any pixel
    /// went from set to unset.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut any_collisions = false;
        for (dy, row) in sprite.iter().enumerate() {
            for dx in 0..8 {
                let new_pixel = (row >> (7 - dx)) & 1 == 1;
                if !new_pixel {
                    continue;
                }
                let px = (x + dx) % SCREEN_WIDTH;
                let py = (y + dy) % SCREEN_HEIGHT;
                let old_pixel = self.pixels[py][px];
                if old_pixel {
                    any_collisions = true;
                }
                self.pixels[py][px] = !old_pixel;
            }
        }
        any_collisions
    }

    pub fn is_blank(&self) -> bool {
        self.rows().all(|row| row.iter().all(|&pixel| !pixel))
    }

    /// The rows of the screen, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool; SCREEN_WIDTH]> {
        self.pixels.iter()
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &pixel in row.iter() {
                write!(f, "{}", if pixel { "#" } else { " " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Screen {{")?;
        write!(f, "{}", self)?;
        write!(f, "}}")
    }
}
