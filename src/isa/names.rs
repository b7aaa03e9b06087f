//! Printable names of opcodes and registers, shared by the assembler, the disassembler and state
//! dumps. The tables are built once and never mutated.

use super::opcode::*;
use hashbrown::HashMap;
use lazy_static::lazy_static;

pub type NameMap = HashMap<&'static str, u8>;

pub const REGVEC: [&str; 16] = [
    "ra", "rb", "rc", "rd", "re", "rf", "rg", "rh", "ri", "rj", "rk", "rl", "rm", "rn", "ro", "rp",
];

/// Opcodes that can be written as text, with their mnemonics
pub const MNEMONICS: [(u8, &str); 7] = [
    (HLT, "hlt"),
    (NOP, "nop"),
    (XOR, "xor"),
    (ADD, "add"),
    (BEQ, "beq"),
    (LDL, "ldl"),
    (LDH, "ldh"),
];

lazy_static! {
    pub static ref OPCODES: NameMap = MNEMONICS.iter().map(|&(op, name)| (name, op)).collect();
    pub static ref REGISTERS: NameMap = REGVEC
        .iter()
        .enumerate()
        .map(|(i, &name)| (name, i as u8))
        .collect();
}

pub fn opcode_by_name(name: &str) -> Option<u8> {
    OPCODES.get(name).copied()
}

pub fn opcode_name(opcode: u8) -> Option<&'static str> {
    MNEMONICS
        .iter()
        .find(|&&(op, _)| op == opcode)
        .map(|&(_, name)| name)
}

pub fn register_by_name(name: &str) -> Option<u8> {
    REGISTERS.get(name).copied()
}

/// Name of a register code. Only the low 4 bits are looked at.
pub fn register_name(reg: u8) -> &'static str {
    REGVEC[(reg & 0x0F) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::reg;

    #[test]
    fn test_tables_are_inverse() {
        for &(op, name) in MNEMONICS.iter() {
            assert_eq!(opcode_by_name(name), Some(op));
            assert_eq!(opcode_name(op), Some(name));
        }
        for (i, name) in REGVEC.iter().enumerate() {
            assert_eq!(register_by_name(name), Some(i as u8));
            assert_eq!(register_name(i as u8), *name);
        }
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(opcode_by_name("wml"), None);
        assert_eq!(opcode_by_name("HLT"), None);
        assert_eq!(opcode_name(LDC), None);
        assert_eq!(register_by_name("rq"), None);
        assert_eq!(register_by_name("x0"), None);
    }

    #[test]
    fn test_register_constants() {
        assert_eq!(register_by_name("rd"), Some(reg::RD));
        assert_eq!(register_by_name("rp"), Some(reg::RP));
        assert_eq!(register_name(0x1E), "ro");
    }
}
