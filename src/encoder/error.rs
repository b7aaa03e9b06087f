use owo_colors::OwoColorize;
use std::io;
use thiserror::Error;

fn line_number(index: &usize) -> usize {
    index + 1
}

/// A textual line that doesn't have the shape its mnemonic requires
#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("Empty line")]
    EmptyLine,

    #[error(
        "'{}' takes {expected} arguments, but {found} were given",
        .mnemonic.bright_yellow()
    )]
    ArgumentCount {
        mnemonic: String,
        expected: &'static str,
        found: usize,
    },

    #[error(
        "Invalid literal '{}', expected up to {bits} bits of bare hexadecimal",
        .literal.bright_yellow()
    )]
    InvalidLiteral { literal: String, bits: u32 },
}

/// Represents any kind of error the encoder may find
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Not the encoder's fault, writing to the output went wrong
    #[error("I/O Error: {0}")]
    IO(#[from] io::Error),

    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Unknown instruction '{}'", .0.bright_yellow())]
    UnknownInstruction(String),

    #[error("Unknown register '{}'", .0.bright_yellow())]
    UnknownRegister(String),
}

/// An [EncodeError] and the 0-based index of the line that caused it. Every line before `index`
/// has already been written to the output.
#[derive(Debug, Error)]
#[error("{} {}: {source}", "line".bright_blue(), line_number(.index).bright_blue())]
pub struct LineError {
    pub index: usize,
    pub source: EncodeError,
}
