//! The 4 KiB address space.
//!
//! The first 512 bytes are reserved for the interpreter and hold the font,
//! programs are loaded at [`PROGRAM_START`].

use crate::emulator::error::{FatalError, LoadError};

pub const MEM_SIZE: usize = 4096;
pub const PROGRAM_START: usize = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEM_SIZE - PROGRAM_START;
pub const FONT_START: usize = 0x000;
/// Each font glyph is 5 rows of 8 pixels.
pub const GLYPH_SIZE: usize = 5;

const FONT: [u8; 16 * GLYPH_SIZE] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

pub struct Memory {
    bytes: [u8; MEM_SIZE],
}

impl Memory {
    /// Create zeroed memory with the font in place.
    pub fn new() -> Memory {
        let mut memory = Memory { bytes: [0; MEM_SIZE] };
        memory.seed_font();
        memory
    }

    /// Zero everything, then put the font back.
    pub fn reset(&mut self) {
        self.bytes = [0; MEM_SIZE];
        self.seed_font();
    }

    /// Put the font back without touching the rest of memory.
    pub fn seed_font(&mut self) {
        self.bytes[FONT_START..FONT_START + FONT.len()].copy_from_slice(&FONT);
    }

    /// Copy a program into memory at `offset`.
    ///
    /// Everything from `offset` up is replaced, so bytes left over from an
    /// earlier, longer program are zeroed. Memory below `offset` is untouched.
    pub fn load(&mut self, program: &[u8], offset: usize) -> Result<(), LoadError> {
        if offset < PROGRAM_START || offset > MEM_SIZE {
            return Err(LoadError::InvalidOffset { offset });
        }
        if program.len() > MEM_SIZE - offset {
            return Err(LoadError::RomTooLarge {
                size: program.len(),
                max_size: MEM_SIZE - offset,
            });
        }

        let region = &mut self.bytes[offset..];
        region.iter_mut().for_each(|byte| *byte = 0);
        region[..program.len()].copy_from_slice(program);
        Ok(())
    }

    pub fn read(&self, addr: usize) -> Result<u8, FatalError> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(FatalError::OutOfBounds { address: addr })
    }

    /// Write a byte on behalf of the running program.
    ///
    /// The reserved region below [`PROGRAM_START`] is read-only to programs.
    pub fn write(&mut self, addr: usize, value: u8) -> Result<(), FatalError> {
        if addr < PROGRAM_START {
            return Err(FatalError::ProtectedWrite { address: addr });
        }
        let byte = self
            .bytes
            .get_mut(addr)
            .ok_or(FatalError::OutOfBounds { address: addr })?;
        *byte = value;
        Ok(())
    }

    /// Write several bytes starting at `addr`, or none at all if any of them
    /// would land outside program memory.
    pub fn write_slice(&mut self, addr: usize, values: &[u8]) -> Result<(), FatalError> {
        if addr < PROGRAM_START {
            return Err(FatalError::ProtectedWrite { address: addr });
        }
        let end = addr + values.len();
        if end > MEM_SIZE {
            return Err(FatalError::OutOfBounds {
                address: addr.max(MEM_SIZE),
            });
        }
        self.bytes[addr..end].copy_from_slice(values);
        Ok(())
    }

    /// Borrow `len` bytes starting at `addr`.
    pub fn read_slice(&self, addr: usize, len: usize) -> Result<&[u8], FatalError> {
        let end = addr + len;
        if end > MEM_SIZE {
            // Report the first address that doesn't exist.
            return Err(FatalError::OutOfBounds {
                address: addr.max(MEM_SIZE),
            });
        }
        Ok(&self.bytes[addr..end])
    }

    /// Address of the glyph for the low nibble of `digit`.
    pub fn font_address(digit: u8) -> u16 {
        (FONT_START + GLYPH_SIZE * (digit & 0x0F) as usize) as u16
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
