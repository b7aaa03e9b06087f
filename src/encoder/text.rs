//! The textual assembly syntax. One instruction per line, tokens separated by spaces, tabs or
//! commas. Immediates are bare hexadecimal (`802`, `feed`), without a `0x` prefix.

use super::{put_imm12, put_imm16, put_regs, EncodeError, LineError, SyntaxError};
use crate::isa::{self, Format};
use nom::{
    bytes::complete::{take_till, take_till1},
    character::complete::hex_digit1,
    combinator::{all_consuming, map},
    multi::many0,
    sequence::{preceded, terminated},
    IResult,
};
use std::io::Write;

pub fn is_separator(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

fn separator0(s: &str) -> IResult<&str, ()> {
    map(take_till(|c| !is_separator(c)), |_| ())(s)
}

fn token(s: &str) -> IResult<&str, &str> {
    terminated(take_till1(is_separator), separator0)(s)
}

/// Splits a line into its mnemonic and operands
pub fn tokenize(line: &str) -> Vec<&str> {
    preceded(separator0, many0(token))(line)
        .map(|(_, tokens)| tokens)
        .unwrap_or_default()
}

/// Parses a bare hexadecimal literal that must fit in `bits` bits
fn hex_literal(literal: &str, bits: u32) -> Result<u32, SyntaxError> {
    let invalid = || SyntaxError::InvalidLiteral {
        literal: literal.to_owned(),
        bits,
    };

    let (_, digits) = all_consuming(hex_digit1::<&str, nom::error::Error<&str>>)(literal)
        .map_err(|_| invalid())?;

    u32::from_str_radix(digits, 16)
        .ok()
        .filter(|&x| x < (1 << bits))
        .ok_or_else(invalid)
}

fn register(name: &str) -> Result<u8, EncodeError> {
    isa::register_by_name(name).ok_or_else(|| EncodeError::UnknownRegister(name.to_owned()))
}

/// Encodes one line of assembly and returns how many bytes were written.
/// ```
/// let mut mem = Vec::new();
/// tisa::encoder::put_line(&mut mem, "beq ra rb rc 802").unwrap();
/// tisa::encoder::put_line(&mut mem, "ldl rd feed").unwrap();
/// tisa::encoder::put_line(&mut mem, "hlt").unwrap();
/// assert_eq!(mem.len(), 10);
/// ```
pub fn put_line<W: Write + ?Sized>(out: &mut W, line: &str) -> Result<usize, EncodeError> {
    let parts = tokenize(line);
    let (&mnemonic, args) = parts.split_first().ok_or(SyntaxError::EmptyLine)?;

    let unknown = || EncodeError::UnknownInstruction(mnemonic.to_owned());
    let opc = isa::opcode_by_name(mnemonic).ok_or_else(unknown)?;

    let arg_count = |expected| SyntaxError::ArgumentCount {
        mnemonic: mnemonic.to_owned(),
        expected,
        found: args.len(),
    };

    let written = match Format::of(opc).ok_or_else(unknown)? {
        Format::Regs => match *args {
            // nop, hlt
            [] => put_regs(out, opc, 0, 0)?,
            [src, dst] => put_regs(out, opc, register(src)?, register(dst)?)?,
            _ => return Err(arg_count("0 or 2").into()),
        },
        Format::Imm12 => match *args {
            [a, b, dst, imm] => {
                let (a, b, dst) = (register(a)?, register(b)?, register(dst)?);
                let imm = hex_literal(imm, 12)? as u16;
                put_imm12(out, opc, a, b, dst, imm)?
            }
            _ => return Err(arg_count("4").into()),
        },
        Format::Imm16 => match *args {
            [dst, imm] => {
                let dst = register(dst)?;
                let imm = hex_literal(imm, 16)? as u16;
                put_imm16(out, opc, dst, imm)?
            }
            _ => return Err(arg_count("2").into()),
        },
    };

    Ok(written)
}

/// Encodes lines in order, stopping at the first one that fails. Returns how many lines were
/// encoded.
pub fn put_lines<W, I, S>(out: &mut W, lines: I) -> Result<usize, LineError>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut count = 0;
    for (index, line) in lines.into_iter().enumerate() {
        put_line(out, line.as_ref()).map_err(|source| LineError { index, source })?;
        count += 1;
    }
    Ok(count)
}

/// Strips a `;` or `#` comment from a source line
fn strip_comment(line: &str) -> &str {
    line.split(|c: char| c == ';' || c == '#').next().unwrap_or_default()
}

/// Assembles a whole source text. Unlike [put_lines], blank lines and comments are allowed.
/// The [LineError] index refers to the line in `source`. Returns how many bytes were written.
pub fn assemble<W: Write + ?Sized>(out: &mut W, source: &str) -> Result<usize, LineError> {
    let mut written = 0;
    for (index, line) in source.lines().enumerate() {
        let line = strip_comment(line);
        if tokenize(line).is_empty() {
            continue;
        }
        written += put_line(out, line).map_err(|source| LineError { index, source })?;
    }
    Ok(written)
}
