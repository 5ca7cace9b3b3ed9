use thiserror::Error;

/// Why a program image could not be loaded.
///
/// Loading happens after a reset, so a failed load leaves the machine
/// reset and without a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("program is too large ({size} bytes), at most {max_size} bytes fit")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("cannot load a program at {offset:#05x}")]
    InvalidOffset { offset: usize },
}

/// A fault raised by the running program.
///
/// Apart from [`FatalError::NoProgramLoaded`], every variant halts the machine,
/// and later steps report the same error until the machine is reset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalError {
    #[error("memory access out of bounds at {address:#06x}")]
    OutOfBounds { address: usize },

    #[error("instruction fetch out of bounds at {address:#06x}")]
    FetchOutOfBounds { address: u16 },

    #[error("write to reserved memory at {address:#05x}")]
    ProtectedWrite { address: usize },

    #[error("illegal opcode {0:#06x}")]
    IllegalOpcode(u16),

    #[error("stack overflow calling {target:#05x}")]
    StackOverflow { target: u16 },

    #[error("return with an empty call stack")]
    StackUnderflow,

    #[error("no program has been loaded")]
    NoProgramLoaded,
}

/// A key index outside of the 16-key pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid key index {0:#x}, keys are 0x0..=0xf")]
pub struct InvalidKeyIndex(pub u8);
