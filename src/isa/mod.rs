//!
//! Binary contract of the ISA: instruction formats, opcode values and register codes.
//!
//! ```text
//! +----+------------+---------+---------+
//! | 00 | OPCODE [6] | SRC [4] | DST [4] |
//! +----+------------+---------+---------+
//!
//! +----+------------+-------+-------+---------+----------+
//! | 01 | OPCODE [6] | A [4] | B [4] | DST [4] | IMM [12] |
//! +----+------------+-------+-------+---------+----------+
//!
//! +----+------------+-----+---------+------------+
//! | 11 | OPCODE [6] | [4] | REG [4] | IMM16 [16] |
//! +----+------------+-----+---------+------------+
//! ```
//!
//! The flag bits are the top two bits of the opcode byte, so every opcode constant below already
//! carries its format. Multi-byte immediates are little-endian.
//!

pub mod names;

pub use names::*;

pub const FLAG_REGS: u8 = 0b00;
pub const FLAG_IMM12: u8 = 0b01;
pub const FLAG_IMM16: u8 = 0b11;

pub const MASK_L16: u32 = 0x0000_FFFF;
pub const MASK_H16: u32 = 0xFFFF_0000;

pub const IMM12_MASK: u16 = 0x0FFF;
pub const IMM12_SIGN: u16 = 0x0800;

/// Number of general purpose registers
pub const REGISTER_COUNT: usize = 16;

/// Opcode values. The high two bits select the [Format].
pub mod opcode {
    // 00
    pub const HLT: u8 = 0x00; // HaLT
    pub const NOP: u8 = 0x01; // No OPeration
    pub const XOR: u8 = 0x02;
    pub const ADD: u8 = 0x03;

    // 01
    pub const BEQ: u8 = 0x40; // Branch if EQual

    // 11
    pub const LDL: u8 = 0xC0; // LoaD Low half-word
    pub const LDH: u8 = 0xC1; // LoaD High half-word
    pub const WML: u8 = 0xC2; // Write Memory Low (reserved)
    pub const WMH: u8 = 0xC3; // Write Memory High (reserved)
    pub const WMB: u8 = 0xC4; // Write Memory Byte (reserved)
    pub const LDC: u8 = 0xC5; // LoaD Constant, PC relative (reserved)

    /// Opcodes that have a slot in the ISA but no execution semantics yet
    pub const RESERVED: [u8; 4] = [WML, WMH, WMB, LDC];
}

/// Register codes, `ra` through `rp`
pub mod reg {
    pub const RA: u8 = 0x0;
    pub const RB: u8 = 0x1;
    pub const RC: u8 = 0x2;
    pub const RD: u8 = 0x3;
    pub const RE: u8 = 0x4;
    pub const RF: u8 = 0x5;
    pub const RG: u8 = 0x6;
    pub const RH: u8 = 0x7;
    pub const RI: u8 = 0x8;
    pub const RJ: u8 = 0x9;
    pub const RK: u8 = 0xA;
    pub const RL: u8 = 0xB;
    pub const RM: u8 = 0xC;
    pub const RN: u8 = 0xD;
    pub const RO: u8 = 0xE;
    pub const RP: u8 = 0xF;
}

/// The three binary layouts an instruction can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `[opcode:6][src:4][dst:4]`, 2 bytes
    Regs,
    /// `[opcode:6][a:4][b:4][dst:4][imm:12]`, 4 bytes
    Imm12,
    /// `[opcode:6][unused:4][reg:4][imm:16]`, 4 bytes
    Imm16,
}

impl Format {
    /// Derives the format from the flag bits of an opcode byte. The flag `0b10` has no layout
    /// assigned to it.
    pub const fn of(opcode: u8) -> Option<Self> {
        match flag(opcode) {
            FLAG_REGS => Some(Format::Regs),
            FLAG_IMM12 => Some(Format::Imm12),
            FLAG_IMM16 => Some(Format::Imm16),
            _ => None,
        }
    }

    pub const fn flag(self) -> u8 {
        match self {
            Format::Regs => FLAG_REGS,
            Format::Imm12 => FLAG_IMM12,
            Format::Imm16 => FLAG_IMM16,
        }
    }

    /// Encoded length in bytes
    pub const fn encoded_len(self) -> usize {
        match self {
            Format::Regs => 2,
            Format::Imm12 | Format::Imm16 => 4,
        }
    }
}

/// Format flag of an opcode byte (its top two bits)
#[inline]
pub const fn flag(opcode: u8) -> u8 {
    (opcode >> 6) & 0x03
}

/// Whether the opcode is one of [opcode::RESERVED]
#[inline]
pub fn is_reserved(opcode: u8) -> bool {
    opcode::RESERVED.contains(&opcode)
}

/// Decodes a 12-bit immediate. Bit 11 is a sign flag and the remaining 11 bits are a magnitude,
/// so `0x802` is -2, `0x800` is 0 and `0xFFF` is -2047 (not -1, as it would be in two's
/// complement).
pub const fn sign_extend_12(imm: u16) -> i16 {
    let magnitude = (imm & 0x07FF) as i16;
    if imm & IMM12_SIGN != 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Inverse of [sign_extend_12] for offsets in `-2047..=2047`. Larger magnitudes are truncated to
/// 11 bits.
pub const fn sign_compress_12(offset: i16) -> u16 {
    if offset < 0 {
        IMM12_SIGN | ((offset.unsigned_abs()) & 0x07FF)
    } else {
        (offset as u16) & 0x07FF
    }
}
