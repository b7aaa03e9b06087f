//!
//! Turns instructions into their binary encoding, appended to any `io::Write` (usually a
//! `Vec<u8>` that becomes the memory image of a program).
//!
//! There are two ways in: the `put_*` functions pack already numeric fields, and [put_line] /
//! [put_lines] / [assemble] read the textual syntax
//! (`<mnemonic> [reg] [reg] [reg] [hex]`).
//!

pub mod error;
mod text;

pub use error::*;
pub use text::*;

use byteorder::{ByteOrder, LittleEndian};
use std::io::{self, Write};

/// Writes a 2-byte register-only instruction.
/// Fields wider than 4 bits are truncated to their low 4 bits.
pub fn put_regs<W: Write + ?Sized>(out: &mut W, opc: u8, src: u8, dst: u8) -> io::Result<usize> {
    let buf = [opc, ((src & 0x0F) << 4) | (dst & 0x0F)];
    out.write_all(&buf)?;
    Ok(buf.len())
}

/// Writes a 4-byte instruction with a 12-bit immediate. `offs` is the raw 12-bit field, see
/// [crate::isa::sign_compress_12] to get it from a signed offset.
pub fn put_imm12<W: Write + ?Sized>(
    out: &mut W,
    opc: u8,
    a: u8,
    b: u8,
    dst: u8,
    offs: u16,
) -> io::Result<usize> {
    let buf = [
        opc,
        ((a & 0x0F) << 4) | (b & 0x0F),
        ((dst & 0x0F) << 4) | ((offs >> 8) & 0x0F) as u8,
        offs as u8,
    ];
    out.write_all(&buf)?;
    Ok(buf.len())
}

/// Writes a 4-byte instruction with a little-endian 16-bit immediate
pub fn put_imm16<W: Write + ?Sized>(out: &mut W, opc: u8, dst: u8, v: u16) -> io::Result<usize> {
    let mut buf = [opc, dst & 0x0F, 0, 0];
    LittleEndian::write_u16(&mut buf[2..], v);
    out.write_all(&buf)?;
    Ok(buf.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::{opcode::*, reg::*};

    #[test]
    fn test_put_regs() {
        let mut mem = Vec::new();
        assert_eq!(put_regs(&mut mem, XOR, RC, RD).unwrap(), 2);
        assert_eq!(put_regs(&mut mem, HLT, 0, 0).unwrap(), 2);
        assert_eq!(mem, vec![0x02, 0x23, 0x00, 0x00]);
    }

    #[test]
    fn test_put_imm16() {
        let mut mem = Vec::new();
        assert_eq!(put_imm16(&mut mem, LDL, RD, 0xFEED).unwrap(), 4);
        assert_eq!(mem, vec![0xC0, 0x03, 0xED, 0xFE]);
    }

    #[test]
    fn test_put_imm12() {
        let mut mem = Vec::new();
        assert_eq!(put_imm12(&mut mem, BEQ, RA, RB, RC, 0x802).unwrap(), 4);
        assert_eq!(mem, vec![0x40, 0x01, 0x28, 0x02]);
    }

    #[test]
    fn test_out_of_range_fields_truncate() {
        let mut mem = Vec::new();
        put_regs(&mut mem, ADD, 0x1F, 0x2E).unwrap();
        put_imm16(&mut mem, LDH, 0x13, 0x0001).unwrap();
        put_imm12(&mut mem, BEQ, 0x10, 0x11, 0x12, 0xF123).unwrap();
        assert_eq!(
            mem,
            vec![0x03, 0xFE, 0xC1, 0x03, 0x01, 0x00, 0x40, 0x01, 0x21, 0x23]
        );
    }
}
