//!
//! A small ISA with a simulator, an assembler and a disassembler.
//!
//! Instructions are 2 or 4 bytes long and come in three formats, selected by the top two bits of
//! the opcode byte (see [isa]). The [encoder] turns text like `ldl rd feed` into bytes, and
//! [interpreter::Context] executes those bytes against 16 32-bit registers and a flat byte
//! memory until a `hlt` or a fault.
//!
//! The instruction set is intentionally tiny: `hlt`, `nop`, `xor`, `add`, `beq`, `ldl` and `ldh`.
//! A few more opcodes (`wml`, `wmh`, `wmb`, `ldc`) are reserved but not executed yet.
//!

pub mod config;
pub mod disasm;
pub mod encoder;
pub mod instruction;
pub mod interpreter;
pub mod isa;
