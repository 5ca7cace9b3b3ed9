//! The fetch-decode-execute engine.

use crate::emulator::error::FatalError;
use crate::emulator::instruction::*;
use crate::emulator::keypad::Keypad;
use crate::emulator::memory::{Memory, MEM_SIZE};
use crate::emulator::quirks::Quirks;
use crate::emulator::registers::Registers;
use crate::emulator::screen::Screen;
use crate::emulator::timers::Timers;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// What a successful step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// An instruction ran, or a pending key wait was satisfied.
    Advanced,
    /// The program is waiting for a key press and nothing changed.
    AwaitingKey,
}

/// Where the interpreter is in its run cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpuState {
    Running,
    /// `FX0A` ran, the pressed key goes into the register.
    AwaitingKey(Reg),
    /// A fatal error occurred, and it is reported on every following step.
    Halted(FatalError),
}

/// The parts of the machine an instruction can touch besides the registers.
pub struct Bus<'a> {
    pub memory: &'a mut Memory,
    pub screen: &'a mut Screen,
    pub timers: &'a mut Timers,
    pub keypad: &'a Keypad,
}

pub struct Cpu {
    pub registers: Registers,
    state: CpuState,
    quirks: Quirks,
    rng: StdRng,
}

impl Cpu {
    pub fn new(quirks: Quirks, rng_seed: Option<u64>) -> Cpu {
        Cpu {
            registers: Registers::new(),
            state: CpuState::Running,
            quirks,
            rng: new_rng(rng_seed),
        }
    }

    /// Back to power-on state. Quirks are kept.
    pub fn reset(&mut self, rng_seed: Option<u64>) {
        self.registers = Registers::new();
        self.state = CpuState::Running;
        self.rng = new_rng(rng_seed);
    }

    pub fn state(&self) -> &CpuState {
        &self.state
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    /// Run a single cycle.
    ///
    /// While a key wait is pending this only checks the keypad. Errors halt
    /// the CPU, and a halted CPU keeps returning the error that halted it.
    pub fn step(&mut self, bus: &mut Bus<'_>) -> Result<StepOutcome, FatalError> {
        match self.state {
            CpuState::Halted(ref error) => return Err(error.clone()),
            CpuState::AwaitingKey(Reg(x)) => {
                return match bus.keypad.lowest_pressed() {
                    Some(key) => {
                        log::debug!("Key {:X} pressed, stored in V{:X}", key, x);
                        self.registers.v[x as usize] = key;
                        self.state = CpuState::Running;
                        Ok(StepOutcome::Advanced)
                    }
                    None => Ok(StepOutcome::AwaitingKey),
                };
            }
            CpuState::Running => {}
        }

        let result = self.cycle(bus);
        if let Err(ref error) = result {
            log::error!(
                "Halted at {:#05x}: {}",
                self.registers.program_counter,
                error
            );
            self.state = CpuState::Halted(error.clone());
        }
        result
    }

    fn cycle(&mut self, bus: &mut Bus<'_>) -> Result<StepOutcome, FatalError> {
        let opcode = self.fetch(bus.memory)?;
        let instruction = Instruction::from_u16(opcode).ok_or(FatalError::IllegalOpcode(opcode))?;

        log::trace!("{:#05x}: {}", self.registers.program_counter, instruction);

        // Each opcode is two bytes, and jumps overwrite this.
        self.registers.program_counter += 2;

        self.execute_single(instruction, bus)
    }

    fn fetch(&self, memory: &Memory) -> Result<u16, FatalError> {
        let pc = self.registers.program_counter;
        if pc as usize + 1 >= MEM_SIZE {
            return Err(FatalError::FetchOutOfBounds { address: pc });
        }
        let word = memory
            .read_slice(pc as usize, 2)
            .map_err(|_| FatalError::FetchOutOfBounds { address: pc })?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.registers.program_counter += 2;
        }
    }

    fn jump(&mut self, target: usize) -> Result<(), FatalError> {
        if target >= MEM_SIZE {
            return Err(FatalError::OutOfBounds { address: target });
        }
        self.registers.program_counter = target as u16;
        Ok(())
    }

    /// Execute a single decoded instruction.
    ///
    /// The program counter must already point past the instruction.
    pub fn execute_single(
        &mut self,
        instruction: Instruction,
        bus: &mut Bus<'_>,
    ) -> Result<StepOutcome, FatalError> {
        let quirks = self.quirks;
        let index = self.registers.index_addr();
        let v = &mut self.registers.v;

        match instruction {
            // Machine code routines don't exist here.
            Instruction::Sys(Addr(addr)) => {
                log::debug!("Ignoring SYS {:#05x}", addr);
            }

            Instruction::ClearScreen => bus.screen.clear(),

            // Return to the previous call site via the stack.
            Instruction::Return => {
                self.registers.program_counter = self.registers.stack.pop()?;
            }

            Instruction::Goto(Addr(addr)) => {
                self.registers.program_counter = addr;
            }

            // Store the current address on the stack, then jump to the specified address
            Instruction::Call(Addr(addr)) => {
                self.registers
                    .stack
                    .push(self.registers.program_counter, addr)?;
                self.registers.program_counter = addr;
            }

            Instruction::IfRegEqConst(Reg(x), Const(n)) => {
                let condition = v[x as usize] == n;
                self.skip_if(condition);
            }

            Instruction::IfRegNeqConst(Reg(x), Const(n)) => {
                let condition = v[x as usize] != n;
                self.skip_if(condition);
            }

            Instruction::IfRegEqReg(Reg(x), Reg(y)) => {
                let condition = v[x as usize] == v[y as usize];
                self.skip_if(condition);
            }

            Instruction::SetRegToConst(Reg(x), Const(n)) => {
                v[x as usize] = n;
            }

            // No carry flag for this one.
            Instruction::IncRegByConst(Reg(x), Const(n)) => {
                v[x as usize] = v[x as usize].wrapping_add(n);
            }

            Instruction::SetRegToReg(Reg(x), Reg(y)) => {
                v[x as usize] = v[y as usize];
            }

            Instruction::BitwiseOr(Reg(x), Reg(y)) => {
                v[x as usize] |= v[y as usize];
                if quirks.logic_resets_vf {
                    v[0xF] = 0;
                }
            }

            Instruction::BitwiseAnd(Reg(x), Reg(y)) => {
                v[x as usize] &= v[y as usize];
                if quirks.logic_resets_vf {
                    v[0xF] = 0;
                }
            }

            Instruction::BitwiseXor(Reg(x), Reg(y)) => {
                v[x as usize] ^= v[y as usize];
                if quirks.logic_resets_vf {
                    v[0xF] = 0;
                }
            }

            // VF is always written last, so it wins when it is also VX.
            Instruction::IncRegByReg(Reg(x), Reg(y)) => {
                let (sum, carry) = v[x as usize].overflowing_add(v[y as usize]);
                v[x as usize] = sum;
                v[0xF] = carry as u8;
            }

            Instruction::DecRegByReg(Reg(x), Reg(y)) => {
                let (difference, borrow) = v[x as usize].overflowing_sub(v[y as usize]);
                v[x as usize] = difference;
                v[0xF] = !borrow as u8;
            }

            Instruction::BitshiftRight(Reg(x), Reg(y)) => {
                let source = if quirks.shift_uses_vy { v[y as usize] } else { v[x as usize] };
                v[x as usize] = source >> 1;
                v[0xF] = source & 1;
            }

            Instruction::SetVxVyMinusVx(Reg(x), Reg(y)) => {
                let (difference, borrow) = v[y as usize].overflowing_sub(v[x as usize]);
                v[x as usize] = difference;
                v[0xF] = !borrow as u8;
            }

            Instruction::BitshiftLeft(Reg(x), Reg(y)) => {
                let source = if quirks.shift_uses_vy { v[y as usize] } else { v[x as usize] };
                v[x as usize] = source << 1;
                v[0xF] = source >> 7;
            }

            Instruction::IfRegNeqReg(Reg(x), Reg(y)) => {
                let condition = v[x as usize] != v[y as usize];
                self.skip_if(condition);
            }

            Instruction::SetI(Addr(addr)) => {
                self.registers.i = addr;
            }

            Instruction::JumpWithOffset(Addr(addr)) => {
                let offset_reg = if quirks.jump_uses_vx { (addr >> 8) as usize } else { 0 };
                let target = addr as usize + v[offset_reg] as usize;
                self.jump(target)?;
            }

            Instruction::SetVxRand(Reg(x), Const(n)) => {
                v[x as usize] = self.rng.gen::<u8>() & n;
            }

            Instruction::Draw(Reg(x), Reg(y), Const(sprite_height)) => {
                let x_coord = v[x as usize] as usize;
                let y_coord = v[y as usize] as usize;

                // Each sprite row is one byte, starting at I.
                let sprite = bus.memory.read_slice(index, sprite_height as usize)?;
                let any_collisions = bus.screen.draw_sprite(x_coord, y_coord, sprite);

                self.registers.v[0xF] = any_collisions as u8;
            }

            Instruction::IfKeyEqVx(Reg(x)) => {
                let condition = bus.keypad.is_pressed(v[x as usize]);
                self.skip_if(condition);
            }

            Instruction::IfKeyNeqVx(Reg(x)) => {
                let condition = !bus.keypad.is_pressed(v[x as usize]);
                self.skip_if(condition);
            }

            Instruction::SetRegToDelayTimer(Reg(x)) => {
                v[x as usize] = bus.timers.delay;
            }

            // Resolved by a later step, once a key is down.
            Instruction::SetRegToGetKey(reg) => {
                log::debug!("Waiting for a key for {}", reg);
                self.state = CpuState::AwaitingKey(reg);
                return Ok(StepOutcome::AwaitingKey);
            }

            Instruction::SetDelayTimerToReg(Reg(x)) => {
                bus.timers.delay = v[x as usize];
            }

            Instruction::SetSoundTimerToReg(Reg(x)) => {
                bus.timers.sound = v[x as usize];
            }

            Instruction::AddRegToI(Reg(x)) => {
                let sum = self.registers.i.wrapping_add(v[x as usize] as u16);
                self.registers.i = sum;
                if quirks.index_overflow_sets_vf {
                    v[0xF] = (sum > 0x0FFF) as u8;
                }
            }

            // Each font element is 5 bytes long.
            Instruction::SetIToSpriteAddrVx(Reg(x)) => {
                self.registers.i = Memory::font_address(v[x as usize]);
            }

            Instruction::SetIToBcdOfReg(Reg(x)) => {
                let value = v[x as usize];
                bus.memory
                    .write_slice(index, &[value / 100, value / 10 % 10, value % 10])?;
            }

            // Dump register values up to Vx
            Instruction::RegDump(Reg(x)) => {
                bus.memory.write_slice(index, &v[..=x as usize])?;
                if quirks.memory_increments_index {
                    self.registers.i = self.registers.i.wrapping_add(x as u16 + 1);
                }
            }

            // Load register values up to Vx
            Instruction::RegLoad(Reg(x)) => {
                let values = bus.memory.read_slice(index, x as usize + 1)?;
                v[..=x as usize].copy_from_slice(values);
                if quirks.memory_increments_index {
                    self.registers.i = self.registers.i.wrapping_add(x as u16 + 1);
                }
            }
        };

        Ok(StepOutcome::Advanced)
    }
}

fn new_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::memory::PROGRAM_START;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    /// A CPU together with everything it can touch, for running instructions
    /// without a full machine.
    struct Rig {
        cpu: Cpu,
        memory: Memory,
        screen: Screen,
        timers: Timers,
        keypad: Keypad,
    }

    impl Rig {
        fn new() -> Rig {
            Rig::with_quirks(Quirks::cosmac_vip())
        }

        fn with_quirks(quirks: Quirks) -> Rig {
            Rig {
                cpu: Cpu::new(quirks, Some(0)),
                memory: Memory::new(),
                screen: Screen::new(),
                timers: Timers::new(),
                keypad: Keypad::new(),
            }
        }

        fn load(&mut self, program: &[u8]) {
            self.memory.load(program, PROGRAM_START).unwrap();
        }

        fn step(&mut self) -> Result<StepOutcome, FatalError> {
            let mut bus = Bus {
                memory: &mut self.memory,
                screen: &mut self.screen,
                timers: &mut self.timers,
                keypad: &self.keypad,
            };
            self.cpu.step(&mut bus)
        }

        fn execute(&mut self, instruction: Instruction) -> Result<StepOutcome, FatalError> {
            let mut bus = Bus {
                memory: &mut self.memory,
                screen: &mut self.screen,
                timers: &mut self.timers,
                keypad: &self.keypad,
            };
            self.cpu.execute_single(instruction, &mut bus)
        }

        fn v(&self, x: usize) -> u8 {
            self.cpu.registers.v[x]
        }

        fn set_v(&mut self, x: usize, value: u8) {
            self.cpu.registers.v[x] = value;
        }

        fn pc(&self) -> u16 {
            self.cpu.registers.program_counter
        }
    }

    #[test]
    fn goto_goes_to() {
        let mut rig = Rig::new();
        rig.execute(Instruction::Goto(Addr(0x250))).unwrap();
        assert_eq!(rig.pc(), 0x250);
    }

    #[test]
    fn return_after_call_is_neutral() {
        let mut rig = Rig::new();
        assert_eq!(rig.pc(), 0x200);

        rig.load(&[
            0x22, 0x06, // 0x200, call 0x206
            0x00, 0x00, // 0x202
            0x00, 0x00, // 0x204
            0x00, 0xEE, // 0x206, return
        ]);

        rig.step().unwrap(); // Call 0x206
        assert_eq!(rig.pc(), 0x206);
        rig.step().unwrap(); // Return to 0x202
        assert_eq!(rig.pc(), 0x202);
        assert_eq!(rig.cpu.registers.stack.depth(), 0);
    }

    #[test]
    fn sys_is_ignored() {
        let mut rig = Rig::new();
        rig.load(&[0x03, 0x00]);
        assert_eq!(rig.step(), Ok(StepOutcome::Advanced));
        assert_eq!(rig.pc(), 0x202);
    }

    #[test]
    fn seventeenth_nested_call_overflows() {
        let mut rig = Rig::new();
        // Calls itself forever.
        rig.load(&[0x22, 0x00]);
        for _ in 0..16 {
            assert_eq!(rig.step(), Ok(StepOutcome::Advanced));
        }
        assert_eq!(rig.step(), Err(FatalError::StackOverflow { target: 0x200 }));
        assert_eq!(rig.cpu.state(), &CpuState::Halted(FatalError::StackOverflow { target: 0x200 }));
    }

    #[test]
    fn return_with_empty_stack_underflows() {
        let mut rig = Rig::new();
        rig.load(&[0x00, 0xEE]);
        assert_eq!(rig.step(), Err(FatalError::StackUnderflow));
        assert_eq!(rig.step(), Err(FatalError::StackUnderflow));
    }

    #[test]
    fn illegal_opcode_halts_without_advancing() {
        let mut rig = Rig::new();
        rig.load(&[0xFF, 0xFF]);
        for _ in 0..3 {
            assert_eq!(rig.step(), Err(FatalError::IllegalOpcode(0xFFFF)));
            assert_eq!(rig.pc(), 0x200);
        }
    }

    #[test]
    fn fetch_past_end_of_memory_fails() {
        let mut rig = Rig::new();
        rig.execute(Instruction::Goto(Addr(0xFFF))).unwrap();
        assert_eq!(rig.step(), Err(FatalError::FetchOutOfBounds { address: 0xFFF }));
    }

    #[test_case(0x3A02, 0x204 ; "skip eq const taken")]
    #[test_case(0x3A03, 0x202 ; "skip eq const not taken")]
    #[test_case(0x4A03, 0x204 ; "skip neq const taken")]
    #[test_case(0x4A02, 0x202 ; "skip neq const not taken")]
    #[test_case(0x5AB0, 0x204 ; "skip eq reg taken")]
    #[test_case(0x5AC0, 0x202 ; "skip eq reg not taken")]
    #[test_case(0x9AC0, 0x204 ; "skip neq reg taken")]
    #[test_case(0x9AB0, 0x202 ; "skip neq reg not taken")]
    fn conditional_skips(opcode: u16, expected_pc: u16) {
        let mut rig = Rig::new();
        rig.set_v(0xA, 2);
        rig.set_v(0xB, 2);
        rig.set_v(0xC, 7);
        rig.load(&opcode.to_be_bytes());
        rig.step().unwrap();
        assert_eq!(rig.pc(), expected_pc);
    }

    #[test]
    fn add_const_wraps_without_touching_vf() {
        let mut rig = Rig::new();
        rig.set_v(0x1, 0xFF);
        rig.set_v(0xF, 0x7);
        rig.execute(Instruction::IncRegByConst(Reg(1), Const(2))).unwrap();
        assert_eq!(rig.v(1), 1);
        assert_eq!(rig.v(0xF), 7);
    }

    // (vx, vy, result, flag)
    #[test_case(Instruction::IncRegByReg(Reg(0), Reg(1)), 0xFF, 0x02, 0x01, 1 ; "add with carry")]
    #[test_case(Instruction::IncRegByReg(Reg(0), Reg(1)), 0x10, 0x02, 0x12, 0 ; "add without carry")]
    #[test_case(Instruction::DecRegByReg(Reg(0), Reg(1)), 0x05, 0x03, 0x02, 1 ; "sub without borrow")]
    #[test_case(Instruction::DecRegByReg(Reg(0), Reg(1)), 0x03, 0x03, 0x00, 1 ; "sub equal operands")]
    #[test_case(Instruction::DecRegByReg(Reg(0), Reg(1)), 0x03, 0x05, 0xFE, 0 ; "sub with borrow")]
    #[test_case(Instruction::SetVxVyMinusVx(Reg(0), Reg(1)), 0x03, 0x05, 0x02, 1 ; "subn without borrow")]
    #[test_case(Instruction::SetVxVyMinusVx(Reg(0), Reg(1)), 0x05, 0x03, 0xFE, 0 ; "subn with borrow")]
    fn arithmetic_sets_flag(instruction: Instruction, vx: u8, vy: u8, result: u8, flag: u8) {
        let mut rig = Rig::new();
        rig.set_v(0, vx);
        rig.set_v(1, vy);
        rig.execute(instruction).unwrap();
        assert_eq!((rig.v(0), rig.v(0xF)), (result, flag));
    }

    #[test]
    fn flag_wins_when_vf_is_the_destination() {
        let mut rig = Rig::new();
        rig.set_v(0xF, 0xFF);
        rig.set_v(0x1, 0x02);
        rig.execute(Instruction::IncRegByReg(Reg(0xF), Reg(1))).unwrap();
        assert_eq!(rig.v(0xF), 1);

        rig.set_v(0xF, 0x01);
        rig.set_v(0x1, 0x05);
        rig.execute(Instruction::DecRegByReg(Reg(0xF), Reg(1))).unwrap();
        assert_eq!(rig.v(0xF), 0);
    }

    #[test]
    fn logic_ops_follow_vf_quirk() {
        let mut rig = Rig::with_quirks(Quirks::cosmac_vip());
        rig.set_v(0, 0b1100);
        rig.set_v(1, 0b1010);
        rig.set_v(0xF, 9);
        rig.execute(Instruction::BitwiseOr(Reg(0), Reg(1))).unwrap();
        assert_eq!((rig.v(0), rig.v(0xF)), (0b1110, 0));

        let mut rig = Rig::with_quirks(Quirks::chip48());
        rig.set_v(0, 0b1100);
        rig.set_v(1, 0b1010);
        rig.set_v(0xF, 9);
        rig.execute(Instruction::BitwiseAnd(Reg(0), Reg(1))).unwrap();
        assert_eq!((rig.v(0), rig.v(0xF)), (0b1000, 9));
        rig.execute(Instruction::BitwiseXor(Reg(0), Reg(1))).unwrap();
        assert_eq!(rig.v(0), 0b0010);
    }

    #[test]
    fn shifts_use_vy_on_cosmac_vip() {
        let mut rig = Rig::with_quirks(Quirks::cosmac_vip());
        rig.set_v(0, 0x00);
        rig.set_v(1, 0b1000_0011);
        rig.execute(Instruction::BitshiftRight(Reg(0), Reg(1))).unwrap();
        assert_eq!((rig.v(0), rig.v(0xF)), (0b0100_0001, 1));
        rig.execute(Instruction::BitshiftLeft(Reg(0), Reg(1))).unwrap();
        assert_eq!((rig.v(0), rig.v(0xF)), (0b0000_0110, 1));
    }

    #[test]
    fn shifts_use_vx_on_chip48() {
        let mut rig = Rig::with_quirks(Quirks::chip48());
        rig.set_v(0, 0b0100_0010);
        rig.set_v(1, 0xFF);
        rig.execute(Instruction::BitshiftRight(Reg(0), Reg(1))).unwrap();
        assert_eq!((rig.v(0), rig.v(0xF)), (0b0010_0001, 0));
        rig.execute(Instruction::BitshiftLeft(Reg(0), Reg(1))).unwrap();
        assert_eq!((rig.v(0), rig.v(0xF)), (0b0100_0010, 0));
    }

    #[test]
    fn jump_with_offset() {
        let mut rig = Rig::with_quirks(Quirks::cosmac_vip());
        rig.set_v(0, 0x10);
        rig.set_v(3, 0x20);
        rig.execute(Instruction::JumpWithOffset(Addr(0x300))).unwrap();
        assert_eq!(rig.pc(), 0x310);

        let mut rig = Rig::with_quirks(Quirks::chip48());
        rig.set_v(0, 0x10);
        rig.set_v(3, 0x20);
        rig.execute(Instruction::JumpWithOffset(Addr(0x300))).unwrap();
        assert_eq!(rig.pc(), 0x320);
    }

    #[test]
    fn jump_with_offset_past_memory_fails() {
        let mut rig = Rig::new();
        rig.set_v(0, 0xFF);
        assert_eq!(
            rig.execute(Instruction::JumpWithOffset(Addr(0xFFF))),
            Err(FatalError::OutOfBounds { address: 0x10FE })
        );
    }

    #[test]
    fn random_is_masked() {
        let mut rig = Rig::new();
        for _ in 0..32 {
            rig.execute(Instruction::SetVxRand(Reg(2), Const(0x0F))).unwrap();
            assert_eq!(rig.v(2) & 0xF0, 0);
        }
    }

    #[test]
    fn random_is_reproducible_with_a_seed() {
        let mut first = Rig::new();
        let mut second = Rig::new();
        for _ in 0..8 {
            first.execute(Instruction::SetVxRand(Reg(0), Const(0xFF))).unwrap();
            second.execute(Instruction::SetVxRand(Reg(0), Const(0xFF))).unwrap();
            assert_eq!(first.v(0), second.v(0));
        }
    }

    #[test]
    fn draw_sets_collision_flag() {
        let mut rig = Rig::new();
        rig.cpu.registers.i = Memory::font_address(0) as u16;
        rig.set_v(0, 10);
        rig.set_v(1, 5);
        rig.execute(Instruction::Draw(Reg(0), Reg(1), Const(5))).unwrap();
        assert_eq!(rig.v(0xF), 0);
        assert!(rig.screen.get(10, 5));
        rig.execute(Instruction::Draw(Reg(0), Reg(1), Const(5))).unwrap();
        assert_eq!(rig.v(0xF), 1);
        assert!(rig.screen.is_blank());
    }

    #[test]
    fn draw_reading_past_memory_fails() {
        let mut rig = Rig::new();
        rig.cpu.registers.i = 0xFFE;
        assert_eq!(
            rig.execute(Instruction::Draw(Reg(0), Reg(0), Const(4))),
            Err(FatalError::OutOfBounds { address: 0x1000 })
        );
    }

    #[test]
    fn key_skips_use_keypad() {
        let mut rig = Rig::new();
        rig.set_v(0, 0x5);
        rig.keypad.set_key(0x5, true).unwrap();
        rig.execute(Instruction::IfKeyEqVx(Reg(0))).unwrap();
        assert_eq!(rig.pc(), 0x202);
        rig.execute(Instruction::IfKeyNeqVx(Reg(0))).unwrap();
        assert_eq!(rig.pc(), 0x202);
        rig.keypad.set_key(0x5, false).unwrap();
        rig.execute(Instruction::IfKeyNeqVx(Reg(0))).unwrap();
        assert_eq!(rig.pc(), 0x204);
    }

    #[test]
    fn key_wait_parks_until_a_key_is_pressed() {
        let mut rig = Rig::new();
        rig.load(&[0xF3, 0x0A, 0x60, 0x01]);
        assert_eq!(rig.step(), Ok(StepOutcome::AwaitingKey));
        assert_eq!(rig.pc(), 0x202);

        for _ in 0..5 {
            assert_eq!(rig.step(), Ok(StepOutcome::AwaitingKey));
            assert_eq!(rig.pc(), 0x202);
            assert_eq!(rig.cpu.state(), &CpuState::AwaitingKey(Reg(3)));
        }

        rig.keypad.set_key(0xB, true).unwrap();
        rig.keypad.set_key(0x7, true).unwrap();
        assert_eq!(rig.step(), Ok(StepOutcome::Advanced));
        assert_eq!(rig.v(3), 0x7);
        assert_eq!(rig.pc(), 0x202);
        assert_eq!(rig.cpu.state(), &CpuState::Running);

        rig.step().unwrap();
        assert_eq!(rig.v(0), 1);
    }

    #[test]
    fn timers_are_read_and_written() {
        let mut rig = Rig::new();
        rig.set_v(4, 42);
        rig.execute(Instruction::SetDelayTimerToReg(Reg(4))).unwrap();
        rig.execute(Instruction::SetSoundTimerToReg(Reg(4))).unwrap();
        assert_eq!(rig.timers, Timers { delay: 42, sound: 42 });
        rig.timers.tick();
        rig.execute(Instruction::SetRegToDelayTimer(Reg(5))).unwrap();
        assert_eq!(rig.v(5), 41);
    }

    #[test]
    fn add_to_index_overflow_flag_follows_quirk() {
        let mut rig = Rig::with_quirks(Quirks::chip48());
        rig.cpu.registers.i = 0x0FFF;
        rig.set_v(0, 1);
        rig.execute(Instruction::AddRegToI(Reg(0))).unwrap();
        assert_eq!((rig.cpu.registers.i, rig.v(0xF)), (0x1000, 1));

        let mut rig = Rig::with_quirks(Quirks::cosmac_vip());
        rig.cpu.registers.i = 0x0FFF;
        rig.set_v(0, 1);
        rig.set_v(0xF, 5);
        rig.execute(Instruction::AddRegToI(Reg(0))).unwrap();
        assert_eq!((rig.cpu.registers.i, rig.v(0xF)), (0x1000, 5));
    }

    #[test]
    fn font_address_uses_low_nibble() {
        let mut rig = Rig::new();
        rig.set_v(0, 0x1A);
        rig.execute(Instruction::SetIToSpriteAddrVx(Reg(0))).unwrap();
        assert_eq!(rig.cpu.registers.i, 50);
    }

    #[test]
    fn bcd_writes_three_digits() {
        let mut rig = Rig::new();
        rig.cpu.registers.i = 0x300;
        rig.set_v(0, 254);
        rig.execute(Instruction::SetIToBcdOfReg(Reg(0))).unwrap();
        assert_eq!(rig.memory.read_slice(0x300, 3).unwrap(), &[2, 5, 4]);
    }

    #[test]
    fn bcd_into_reserved_memory_fails() {
        let mut rig = Rig::new();
        rig.cpu.registers.i = 0x010;
        assert_eq!(
            rig.execute(Instruction::SetIToBcdOfReg(Reg(0))),
            Err(FatalError::ProtectedWrite { address: 0x010 })
        );
    }

    #[test]
    fn dump_into_reserved_memory_fails() {
        let mut rig = Rig::new();
        rig.cpu.registers.i = 0x1F0;
        rig.set_v(0, 0xAA);
        assert_eq!(
            rig.execute(Instruction::RegDump(Reg(0xF))),
            Err(FatalError::ProtectedWrite { address: 0x1F0 })
        );
        assert_eq!(rig.memory.read(0x200), Ok(0));
        assert_eq!(rig.cpu.registers.i, 0x1F0);
    }

    #[test]
    fn dump_past_end_of_memory_writes_nothing() {
        let mut rig = Rig::new();
        rig.cpu.registers.i = 0xFFE;
        for reg in 0..4 {
            rig.set_v(reg, 0xAA);
        }
        assert_eq!(
            rig.execute(Instruction::RegDump(Reg(3))),
            Err(FatalError::OutOfBounds { address: 0x1000 })
        );
        assert_eq!(rig.memory.read_slice(0xFFE, 2).unwrap(), &[0, 0]);
        assert_eq!(rig.cpu.registers.i, 0xFFE);
    }

    #[test]
    fn load_past_end_of_memory_reads_nothing() {
        let mut rig = Rig::new();
        rig.memory.write(0xFFE, 7).unwrap();
        rig.memory.write(0xFFF, 8).unwrap();
        rig.cpu.registers.i = 0xFFE;
        assert_eq!(
            rig.execute(Instruction::RegLoad(Reg(3))),
            Err(FatalError::OutOfBounds { address: 0x1000 })
        );
        assert_eq!((rig.v(0), rig.v(1)), (0, 0));
        assert_eq!(rig.cpu.registers.i, 0xFFE);
    }

    #[test]
    fn dump_and_load_registers() {
        let mut rig = Rig::with_quirks(Quirks::cosmac_vip());
        rig.cpu.registers.i = 0x400;
        for reg in 0..4 {
            rig.set_v(reg, reg as u8 + 1);
        }
        rig.execute(Instruction::RegDump(Reg(2))).unwrap();
        assert_eq!(rig.memory.read_slice(0x400, 4).unwrap(), &[1, 2, 3, 0]);
        assert_eq!(rig.cpu.registers.i, 0x403);

        let mut rig = Rig::with_quirks(Quirks::chip48());
        rig.memory.write(0x400, 7).unwrap();
        rig.memory.write(0x401, 8).unwrap();
        rig.cpu.registers.i = 0x400;
        rig.execute(Instruction::RegLoad(Reg(1))).unwrap();
        assert_eq!((rig.v(0), rig.v(1), rig.v(2)), (7, 8, 0));
        assert_eq!(rig.cpu.registers.i, 0x400);
    }

    #[test]
    fn clear_screen_clears_screen() {
        let mut rig = Rig::new();
        rig.screen.set(0, 0, true);
        rig.execute(Instruction::ClearScreen).unwrap();
        assert!(rig.screen.is_blank());
    }
}
