use crate::emulator::error::InvalidKeyIndex;

pub const NUM_KEYS: usize = 16;

/// The state of the 16-key hexadecimal keypad.
///
/// The host writes key states between steps, the interpreter only reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; NUM_KEYS],
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad::default()
    }

    pub fn set_key(&mut self, index: u8, pressed: bool) -> Result<(), InvalidKeyIndex> {
        let key = self
            .keys
            .get_mut(index as usize)
            .ok_or(InvalidKeyIndex(index))?;
        *key = pressed;
        Ok(())
    }

    /// Whether the key is held. Only the low nibble of `index` is used.
    pub fn is_pressed(&self, index: u8) -> bool {
        self.keys[(index & 0x0F) as usize]
    }

    pub fn any_pressed(&self) -> bool {
        self.keys.iter().any(|&pressed| pressed)
    }

    /// The smallest held key, if any.
    pub fn lowest_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&pressed| pressed).map(|key| key as u8)
    }

    pub fn clear(&mut self) {
        self.keys = [false; NUM_KEYS];
    }
}
