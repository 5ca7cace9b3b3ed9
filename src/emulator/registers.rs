use crate::emulator::error::FatalError;
use crate::emulator::memory::PROGRAM_START;

pub const NUM_REGISTERS: usize = 16;
pub const STACK_SIZE: usize = 16;

/// Return addresses of the active subroutine calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    frames: [u16; STACK_SIZE],
    stack_pointer: usize,
}

impl Stack {
    pub fn new() -> Stack {
        Stack {
            frames: [0; STACK_SIZE],
            stack_pointer: 0,
        }
    }

    /// Save a return address before jumping to `target`.
    pub fn push(&mut self, return_addr: u16, target: u16) -> Result<(), FatalError> {
        let frame = self
            .frames
            .get_mut(self.stack_pointer)
            .ok_or(FatalError::StackOverflow { target })?;
        *frame = return_addr;
        self.stack_pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, FatalError> {
        if self.stack_pointer == 0 {
            return Err(FatalError::StackUnderflow);
        }
        self.stack_pointer -= 1;
        Ok(self.frames[self.stack_pointer])
    }

    pub fn depth(&self) -> usize {
        self.stack_pointer
    }

    /// The saved return addresses, innermost call last.
    pub fn frames(&self) -> &[u16] {
        &self.frames[..self.stack_pointer]
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

/// V0..VF, the index register, the program counter and the call stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    pub v: [u8; NUM_REGISTERS],
    pub i: u16,
    pub program_counter: u16,
    pub stack: Stack,
}

impl Registers {
    pub fn new() -> Registers {
        Registers {
            v: [0; NUM_REGISTERS],
            i: 0,
            program_counter: PROGRAM_START as u16,
            stack: Stack::new(),
        }
    }

    /// The index register as a 12-bit address.
    pub fn index_addr(&self) -> usize {
        (self.i & 0x0FFF) as usize
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
