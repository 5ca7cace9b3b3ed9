//! Small helpers that don't belong to any single emulator component.

pub mod bit_splitter;
