//! Linear sweep disassembler

use crate::instruction::{DecodeError, Instruction};
use owo_colors::OwoColorize;

/// Iterator over the instructions of a buffer, see [disassemble]
pub struct Disassembly<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Disassembly<'a> {
    type Item = (u32, Result<Instruction, DecodeError>);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.bytes.get(self.pos..).filter(|rest| !rest.is_empty())?;
        let addr = self.pos as u32;

        let decoded = Instruction::decode(rest);
        self.pos += match &decoded {
            Ok(instruction) => instruction.encoded_len(),
            // Skip a word and try to resync on the next one
            Err(_) => 2,
        };

        Some((addr, decoded))
    }
}

/// Decodes every instruction in `bytes`, starting at address 0. Undecodable words are yielded as
/// errors and skipped 2 bytes at a time.
pub fn disassemble(bytes: &[u8]) -> Disassembly<'_> {
    Disassembly { bytes, pos: 0 }
}

/// Prints a listing of `bytes` to stderr
pub fn print_listing(bytes: &[u8]) {
    eprintln!("{}", "Instructions: ---------------".bright_blue());
    for (addr, decoded) in disassemble(bytes) {
        match decoded {
            Ok(instruction) => eprintln!("{:#06x}  {}", addr.bright_blue(), instruction),
            Err(e) => eprintln!("{:#06x}  {}", addr.bright_blue(), e.bright_red()),
        }
    }
    eprintln!("{}", "-----------------------------".bright_blue());
}
