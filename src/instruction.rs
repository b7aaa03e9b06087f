//! A single decoded instruction. It only lives for the duration of one fetch-decode-execute
//! step (or one line of a disassembly listing), nothing caches it.

use crate::isa::{self, opcode, register_name, sign_compress_12, sign_extend_12, Format};
use byteorder::{ByteOrder, LittleEndian};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Instruction needs {needed} bytes, but only {available} are left")]
    Truncated { needed: usize, available: usize },

    #[error("Invalid opcode {0:#04x}")]
    InvalidOpcode(u8),

    #[error("Opcode {0:#04x} is reserved and not implemented")]
    ReservedOpcode(u8),
}

/// Every instruction that can be executed, with its operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Hlt,
    Nop,

    /// src, dst
    Xor(u8, u8),
    Add(u8, u8),

    /// a, b, base, offset
    Beq(u8, u8, u8, i16),

    /// dst, imm
    Ldl(u8, u16),
    Ldh(u8, u16),
}

impl Instruction {
    /// Decodes the instruction at the start of `bytes`. Only the bytes the instruction's format
    /// needs are read, the rest of the slice is ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        use Instruction::*;

        let truncated = |needed| DecodeError::Truncated {
            needed,
            available: bytes.len(),
        };

        if bytes.len() < 2 {
            return Err(truncated(2));
        }

        let opc = bytes[0];
        let format = Format::of(opc).ok_or(DecodeError::InvalidOpcode(opc))?;

        if bytes.len() < format.encoded_len() {
            return Err(truncated(format.encoded_len()));
        }

        let hi = (bytes[1] >> 4) & 0x0F;
        let lo = bytes[1] & 0x0F;

        let instruction = match format {
            Format::Regs => match opc {
                opcode::HLT => Hlt,
                opcode::NOP => Nop,
                opcode::XOR => Xor(hi, lo),
                opcode::ADD => Add(hi, lo),
                _ => return Err(DecodeError::InvalidOpcode(opc)),
            },
            Format::Imm12 => {
                let base = (bytes[2] >> 4) & 0x0F;
                let imm = (((bytes[2] & 0x0F) as u16) << 8) | bytes[3] as u16;
                match opc {
                    opcode::BEQ => Beq(hi, lo, base, sign_extend_12(imm)),
                    _ => return Err(DecodeError::InvalidOpcode(opc)),
                }
            }
            Format::Imm16 => {
                let imm = LittleEndian::read_u16(&bytes[2..4]);
                match opc {
                    opcode::LDL => Ldl(lo, imm),
                    opcode::LDH => Ldh(lo, imm),
                    _ if isa::is_reserved(opc) => return Err(DecodeError::ReservedOpcode(opc)),
                    _ => return Err(DecodeError::InvalidOpcode(opc)),
                }
            }
        };

        Ok(instruction)
    }

    pub fn opcode(&self) -> u8 {
        use Instruction::*;
        match self {
            Hlt => opcode::HLT,
            Nop => opcode::NOP,
            Xor(..) => opcode::XOR,
            Add(..) => opcode::ADD,
            Beq(..) => opcode::BEQ,
            Ldl(..) => opcode::LDL,
            Ldh(..) => opcode::LDH,
        }
    }

    pub fn format(&self) -> Format {
        use Instruction::*;
        match self {
            Hlt | Nop | Xor(..) | Add(..) => Format::Regs,
            Beq(..) => Format::Imm12,
            Ldl(..) | Ldh(..) => Format::Imm16,
        }
    }

    /// Encoded length in bytes
    pub fn encoded_len(&self) -> usize {
        self.format().encoded_len()
    }

    pub fn mnemonic(&self) -> &'static str {
        isa::opcode_name(self.opcode()).unwrap_or("???")
    }
}

/// Prints the instruction in the same syntax the assembler reads, so the output of the
/// disassembler can be fed back into it.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        let r = register_name;
        match *self {
            Hlt | Nop => write!(f, "{}", self.mnemonic()),
            Xor(src, dst) | Add(src, dst) => {
                write!(f, "{} {} {}", self.mnemonic(), r(src), r(dst))
            }
            Beq(a, b, base, offset) => write!(
                f,
                "{} {} {} {} {:x}",
                self.mnemonic(),
                r(a),
                r(b),
                r(base),
                sign_compress_12(offset)
            ),
            Ldl(dst, imm) | Ldh(dst, imm) => write!(f, "{} {} {:x}", self.mnemonic(), r(dst), imm),
        }
    }
}
