use crate::util::bit_splitter::BitSplitter;
use std::fmt;

/// A wrapper for addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr(pub u16);

/// A wrapper for registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

/// A wrapper for constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Const(pub u8);

/// A single instruction from the CHIP-8 instruction set.
/// Two bytes written in hexadecimal, with the following special characters:
/// - NNN: address
/// - NN: 8-bit constant
/// - N: 4-bit constant
/// - X and Y: 4-bit register identifier
/// - PC: Program counter
/// - I: 16 bit register for memory address
/// - VN: One of the 16 available variables (register identifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Sys(Addr), // 0NNN
    ClearScreen, // 00E0
    Return, // 00EE
    Goto(Addr), // 1NNN
    Call(Addr), // 2NNN
    IfRegEqConst(Reg, Const), // 3XNN
    IfRegNeqConst(Reg, Const), // 4XNN
    IfRegEqReg(Reg, Reg), // 5XY0
    SetRegToConst(Reg, Const), // 6XNN
    IncRegByConst(Reg, Const), // 7XNN
    SetRegToReg(Reg, Reg), // 8XY0
    BitwiseOr(Reg, Reg), // 8XY1
    BitwiseAnd(Reg, Reg), // 8XY2
    BitwiseXor(Reg, Reg), // 8XY3
    IncRegByReg(Reg, Reg), // 8XY4
    DecRegByReg(Reg, Reg), // 8XY5
    BitshiftRight(Reg, Reg), // 8XY6
    SetVxVyMinusVx(Reg, Reg), // 8XY7
    BitshiftLeft(Reg, Reg), // 8XYE
    IfRegNeqReg(Reg, Reg), // 9XY0
    SetI(Addr), // ANNN
    JumpWithOffset(Addr), // BNNN
    SetVxRand(Reg, Const), // CXNN
    Draw(Reg, Reg, Const), // DXYN
    IfKeyEqVx(Reg), // EX9E
    IfKeyNeqVx(Reg), // EXA1
    SetRegToDelayTimer(Reg), // FX07
    SetRegToGetKey(Reg), // FX0A
    SetDelayTimerToReg(Reg), // FX15
    SetSoundTimerToReg(Reg), // FX18
    AddRegToI(Reg), // FX1E
    SetIToSpriteAddrVx(Reg), // FX29
    SetIToBcdOfReg(Reg), // FX33
    RegDump(Reg), // FX55
    RegLoad(Reg), // FX65
}

impl Instruction {
    /// Decode an opcode, or `None` if it isn't part of the instruction set.
    pub fn from_u16(value: u16) -> Option<Instruction> {
        Instruction::decode(BitSplitter::from_u16(value))
    }

    /// Decode the two bytes of an opcode in memory order.
    pub fn from_two_u8(left: u8, right: u8) -> Option<Instruction> {
        Instruction::decode(BitSplitter::new(left, right))
    }

    fn decode(opcode: BitSplitter) -> Option<Instruction> {
        let addr = Addr(opcode.last_12_bits());
        let nn = Const(opcode.last_8_bits());
        let instruction = match opcode.as_four_u8() {
            (0, 0, 0xE, 0) => Instruction::ClearScreen,
            (0, 0, 0xE, 0xE) => Instruction::Return,
            (0, _, _, _) => Instruction::Sys(addr),
            (1, _, _, _) => Instruction::Goto(addr),
            (2, _, _, _) => Instruction::Call(addr),
            (3, x, _, _) => Instruction::IfRegEqConst(Reg(x), nn),
            (4, x, _, _) => Instruction::IfRegNeqConst(Reg(x), nn),
            (5, x, y, 0) => Instruction::IfRegEqReg(Reg(x), Reg(y)),
            (6, x, _, _) => Instruction::SetRegToConst(Reg(x), nn),
            (7, x, _, _) => Instruction::IncRegByConst(Reg(x), nn),
            (8, x, y, 0) => Instruction::SetRegToReg(Reg(x), Reg(y)),
            (8, x, y, 1) => Instruction::BitwiseOr(Reg(x), Reg(y)),
            (8, x, y, 2) => Instruction::BitwiseAnd(Reg(x), Reg(y)),
            (8, x, y, 3) => Instruction::BitwiseXor(Reg(x), Reg(y)),
            (8, x, y, 4) => Instruction::IncRegByReg(Reg(x), Reg(y)),
            (8, x, y, 5) => Instruction::DecRegByReg(Reg(x), Reg(y)),
            (8, x, y, 6) => Instruction::BitshiftRight(Reg(x), Reg(y)),
            (8, x, y, 7) => Instruction::SetVxVyMinusVx(Reg(x), Reg(y)),
            (8, x, y, 0xE) => Instruction::BitshiftLeft(Reg(x), Reg(y)),
            (9, x, y, 0) => Instruction::IfRegNeqReg(Reg(x), Reg(y)),
            (0xA, _, _, _) => Instruction::SetI(addr),
            (0xB, _, _, _) => Instruction::JumpWithOffset(addr),
            (0xC, x, _, _) => Instruction::SetVxRand(Reg(x), nn),
            // Zero-height sprites belong to the extended instruction sets.
            (0xD, _, _, 0) => return None,
            (0xD, x, y, n) => Instruction::Draw(Reg(x), Reg(y), Const(n)),
            (0xE, x, 9, 0xE) => Instruction::IfKeyEqVx(Reg(x)),
            (0xE, x, 0xA, 1) => Instruction::IfKeyNeqVx(Reg(x)),
            (0xF, x, 0, 7) => Instruction::SetRegToDelayTimer(Reg(x)),
            (0xF, x, 0, 0xA) => Instruction::SetRegToGetKey(Reg(x)),
            (0xF, x, 1, 5) => Instruction::SetDelayTimerToReg(Reg(x)),
            (0xF, x, 1, 8) => Instruction::SetSoundTimerToReg(Reg(x)),
            (0xF, x, 1, 0xE) => Instruction::AddRegToI(Reg(x)),
            (0xF, x, 2, 9) => Instruction::SetIToSpriteAddrVx(Reg(x)),
            (0xF, x, 3, 3) => Instruction::SetIToBcdOfReg(Reg(x)),
            (0xF, x, 5, 5) => Instruction::RegDump(Reg(x)),
            (0xF, x, 6, 5) => Instruction::RegLoad(Reg(x)),
            _ => return None,
        };
        Some(instruction)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05x}", self.0)
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X}", self.0)
    }
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// Conventional assembler mnemonics, as written for the COSMAC VIP.
///
/// Listings don't know which quirks the program will run under, so BNNN is
/// always shown as `JP V0, NNN`. With `jump_uses_vx` set the machine instead
/// adds VX, where X is the top nibble of NNN.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            Sys(addr) => write!(f, "SYS {}", addr),
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Goto(addr) => write!(f, "JP {}", addr),
            Call(addr) => write!(f, "CALL {}", addr),
            IfRegEqConst(x, nn) => write!(f, "SE {}, {}", x, nn),
            IfRegNeqConst(x, nn) => write!(f, "SNE {}, {}", x, nn),
            IfRegEqReg(x, y) => write!(f, "SE {}, {}", x, y),
            SetRegToConst(x, nn) => write!(f, "LD {}, {}", x, nn),
            IncRegByConst(x, nn) => write!(f, "ADD {}, {}", x, nn),
            SetRegToReg(x, y) => write!(f, "LD {}, {}", x, y),
            BitwiseOr(x, y) => write!(f, "OR {}, {}", x, y),
            BitwiseAnd(x, y) => write!(f, "AND {}, {}", x, y),
            BitwiseXor(x, y) => write!(f, "XOR {}, {}", x, y),
            IncRegByReg(x, y) => write!(f, "ADD {}, {}", x, y),
            DecRegByReg(x, y) => write!(f, "SUB {}, {}", x, y),
            BitshiftRight(x, y) => write!(f, "SHR {}, {}", x, y),
            SetVxVyMinusVx(x, y) => write!(f, "SUBN {}, {}", x, y),
            BitshiftLeft(x, y) => write!(f, "SHL {}, {}", x, y),
            IfRegNeqReg(x, y) => write!(f, "SNE {}, {}", x, y),
            SetI(addr) => write!(f, "LD I, {}", addr),
            JumpWithOffset(addr) => write!(f, "JP V0, {}", addr),
            SetVxRand(x, nn) => write!(f, "RND {}, {}", x, nn),
            Draw(x, y, Const(n)) => write!(f, "DRW {}, {}, {}", x, y, n),
            IfKeyEqVx(x) => write!(f, "SKP {}", x),
            IfKeyNeqVx(x) => write!(f, "SKNP {}", x),
            SetRegToDelayTimer(x) => write!(f, "LD {}, DT", x),
            SetRegToGetKey(x) => write!(f, "LD {}, K", x),
            SetDelayTimerToReg(x) => write!(f, "LD DT, {}", x),
            SetSoundTimerToReg(x) => write!(f, "LD ST, {}", x),
            AddRegToI(x) => write!(f, "ADD I, {}", x),
            SetIToSpriteAddrVx(x) => write!(f, "LD F, {}", x),
            SetIToBcdOfReg(x) => write!(f, "LD B, {}", x),
            RegDump(x) => write!(f, "LD [I], {}", x),
            RegLoad(x) => write!(f, "LD {}, [I]", x),
        }
    }
}

/// One line of a program listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disassembled {
    pub address: u16,
    pub opcode: u16,
    pub instruction: Option<Instruction>,
}

impl fmt::Display for Disassembled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05x}: {:04X}  ", self.address, self.opcode)?;
        match self.instruction {
            Some(instruction) => write!(f, "{}", instruction),
            None => write!(f, "DB {:#06x}", self.opcode),
        }
    }
}

/// List a program image word by word, as if loaded at `origin`.
///
/// Programs mix code and data, so words that don't decode are listed as data
/// rather than treated as errors. A trailing odd byte is padded with zero.
pub fn disassemble(program: &[u8], origin: u16) -> Vec<Disassembled> {
    program
        .chunks(2)
        .enumerate()
        .map(|(n, word)| {
            let opcode = BitSplitter::new(word[0], word.get(1).copied().unwrap_or(0));
            Disassembled {
                address: origin.wrapping_add((2 * n) as u16),
                opcode: opcode.as_u16(),
                instruction: Instruction::decode(opcode),
            }
        })
        .collect()
}
