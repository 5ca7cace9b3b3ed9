/// A 16-bit opcode word that can be viewed as nibbles,
/// a trailing byte or a trailing 12-bit address.
///
/// CHIP-8 stores instructions big-endian, so the first byte in memory
/// is the high byte of the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSplitter(u8, u8);

impl BitSplitter {
    pub fn from_u16(value: u16) -> BitSplitter {
        let [high, low] = value.to_be_bytes();
        BitSplitter(high, low)
    }

    /// Combine two bytes in the order they appear in memory.
    pub fn new(high: u8, low: u8) -> BitSplitter {
        BitSplitter(high, low)
    }

    pub fn as_u16(&self) -> u16 {
        u16::from_be_bytes([self.0, self.1])
    }

    /// The four nibbles of the word, most significant first.
    pub fn as_four_u8(&self) -> (u8, u8, u8, u8) {
        (self.0 >> 4, self.0 & 0x0F, self.1 >> 4, self.1 & 0x0F)
    }

    /// The `NN` part of an opcode.
    pub fn last_8_bits(&self) -> u8 {
        self.1
    }

    /// The `NNN` part of an opcode.
    pub fn last_12_bits(&self) -> u16 {
        self.as_u16() & 0x0FFF
    }
}

impl From<u16> for BitSplitter {
    fn from(value: u16) -> Self {
        BitSplitter::from_u16(value)
    }
}
