use crate::instruction::DecodeError;
use std::fmt;
use thiserror::Error;

/// Why a run stopped abnormally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The instruction at pc doesn't fit in what's left of the memory
    FetchOutOfBounds,
    /// The opcode byte doesn't name any instruction
    InvalidOpcode,
    /// The opcode has a slot in the ISA, but no semantics yet
    ReservedOpcode,
    /// pc isn't 2-byte aligned
    MisalignedFetch,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FaultKind::FetchOutOfBounds => "fetch out of bounds",
            FaultKind::InvalidOpcode => "invalid opcode",
            FaultKind::ReservedOpcode => "reserved opcode",
            FaultKind::MisalignedFetch => "misaligned fetch",
        };
        f.write_str(s)
    }
}

fn opcode_suffix(opcode: &Option<u8>) -> String {
    match opcode {
        Some(op) => format!(" (opcode {op:#04x})"),
        None => String::new(),
    }
}

/// The failing pc and, when it could be read, the raw opcode byte at that address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at pc {pc:#06x}{}", opcode_suffix(.opcode))]
pub struct Fault {
    pub kind: FaultKind,
    pub pc: u32,
    pub opcode: Option<u8>,
}

impl Fault {
    pub fn new(kind: FaultKind, pc: u32, opcode: Option<u8>) -> Self {
        Self { kind, pc, opcode }
    }

    pub(crate) fn from_decode(err: DecodeError, pc: u32, opcode: Option<u8>) -> Self {
        let kind = match err {
            DecodeError::Truncated { .. } => FaultKind::FetchOutOfBounds,
            DecodeError::InvalidOpcode(_) => FaultKind::InvalidOpcode,
            DecodeError::ReservedOpcode(_) => FaultKind::ReservedOpcode,
        };
        Self::new(kind, pc, opcode)
    }
}
