//! The CHIP-8 virtual machine as described at https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

use crate::emulator::config::Config;
use crate::emulator::cpu::{Bus, Cpu, CpuState, StepOutcome};
use crate::emulator::error::{FatalError, InvalidKeyIndex, LoadError};
use crate::emulator::keypad::Keypad;
use crate::emulator::memory::{Memory, PROGRAM_START};
use crate::emulator::registers::Registers;
use crate::emulator::screen::Screen;
use crate::emulator::timers::Timers;

/// Coarse run state, for hosts deciding what to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineStatus {
    Running,
    AwaitingKey,
    Halted,
}

/// A complete CHIP-8 machine.
///
/// The host owns it and drives it: push key states with [`Machine::set_key`],
/// run some instructions with [`Machine::step`], call [`Machine::tick_timers`]
/// at 60 Hz and read the result through [`Machine::display`] and
/// [`Machine::is_sound_active`].
pub struct Machine {
    memory: Memory,
    screen: Screen,
    timers: Timers,
    keypad: Keypad,
    cpu: Cpu,
    config: Config,
    /// The last successfully loaded program, copied back in on reset.
    rom: Vec<u8>,
    loaded: bool,
}

impl Machine {
    /// Create a machine with the default quirks and an unseeded random source.
    pub fn new() -> Machine {
        Machine::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Machine {
        Machine {
            memory: Memory::new(),
            screen: Screen::new(),
            timers: Timers::new(),
            keypad: Keypad::new(),
            cpu: Cpu::new(config.quirks, config.rng_seed),
            config,
            rom: Vec::new(),
            loaded: false,
        }
    }

    /// Put the machine back in its power-on state.
    ///
    /// Memory is wiped and the loaded program is copied back in, so anything
    /// the program wrote over itself is undone and it starts over from the
    /// beginning.
    pub fn reset(&mut self) {
        self.memory.reset();
        if self.loaded {
            if let Err(error) = self.memory.load(&self.rom, PROGRAM_START) {
                log::error!("Could not reload program: {}", error);
                self.loaded = false;
            }
        }
        self.screen.clear();
        self.timers.reset();
        self.keypad.clear();
        self.cpu.reset(self.config.rng_seed);
        log::info!("Machine reset");
    }

    /// Reset, then copy a program into memory at 0x200.
    ///
    /// If the program doesn't fit, the machine is left reset and without a
    /// program.
    pub fn load_rom(&mut self, program: &[u8]) -> Result<(), LoadError> {
        self.loaded = false;
        self.rom.clear();
        self.reset();
        self.memory.load(program, PROGRAM_START)?;
        self.rom = program.to_vec();
        self.loaded = true;
        log::info!("Loaded {} byte program", program.len());
        Ok(())
    }

    /// Run one instruction cycle.
    pub fn step(&mut self) -> Result<StepOutcome, FatalError> {
        if !self.loaded {
            return Err(FatalError::NoProgramLoaded);
        }
        let mut bus = Bus {
            memory: &mut self.memory,
            screen: &mut self.screen,
            timers: &mut self.timers,
            keypad: &self.keypad,
        };
        self.cpu.step(&mut bus)
    }

    /// Count both timers down once. Call this at 60 Hz.
    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    pub fn set_key(&mut self, index: u8, pressed: bool) -> Result<(), InvalidKeyIndex> {
        self.keypad.set_key(index, pressed)
    }

    pub fn display(&self) -> &Screen {
        &self.screen
    }

    pub fn is_sound_active(&self) -> bool {
        self.timers.is_sound_active()
    }

    pub fn status(&self) -> MachineStatus {
        match self.cpu.state() {
            CpuState::Running => MachineStatus::Running,
            CpuState::AwaitingKey(_) => MachineStatus::AwaitingKey,
            CpuState::Halted(_) => MachineStatus::Halted,
        }
    }

    /// The error that halted the machine, if it is halted.
    pub fn halt_reason(&self) -> Option<&FatalError> {
        match self.cpu.state() {
            CpuState::Halted(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn registers(&self) -> &Registers {
        &self.cpu.registers
    }

    pub fn program_counter(&self) -> u16 {
        self.cpu.registers.program_counter
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
