//! The emulator core: memory, registers, timers, screen, keypad and the
//! interpreter that ties them together, all behind [`Machine`].

pub mod config;
pub mod cpu;
pub mod error;
pub mod instruction;
pub mod keypad;
pub mod machine;
pub mod memory;
pub mod quirks;
pub mod registers;
pub mod screen;
pub mod timers;

pub use config::Config;
pub use cpu::StepOutcome;
pub use error::{FatalError, InvalidKeyIndex, LoadError};
pub use machine::{Machine, MachineStatus};
pub use quirks::Quirks;
pub use screen::{Screen, SCREEN_HEIGHT, SCREEN_WIDTH};
