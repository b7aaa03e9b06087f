use clap::Parser;
use serde::Deserialize;
use std::num::ParseIntError;

const CONFIG_FILE: &str = "tisa.toml";

fn parse_hex(s: &str) -> Result<u32, ParseIntError> {
    u32::from_str_radix(s.trim_start_matches("0x"), 16)
}

#[derive(Parser, Deserialize, Debug, Default)]
#[command(author, version, about)]
#[serde(default)]
pub struct OptionalConfig {
    /// Size of the memory image in bytes. Defaults to 4096
    #[arg(short, long)]
    pub memory_size: Option<usize>,

    /// Address of the first instruction, in hex. Defaults to 0
    #[arg(long, value_parser = parse_hex)]
    pub pc_init: Option<u32>,

    /// Prints a disassembly of the program before running it
    #[arg(long)]
    pub print_instructions: bool,

    /// Prints the final state of the program after execution
    #[arg(long)]
    pub print_state: bool,

    /// Prints every executed instruction and the registers it changed
    #[arg(short, long)]
    pub trace: bool,

    /// Treats the input file as an already assembled binary
    #[arg(short, long)]
    pub binary: bool,

    /// Writes the assembled binary to this path instead of running it
    #[arg(short, long)]
    pub emit: Option<String>,

    /// The program to execute
    pub file: Option<String>,
}

impl OptionalConfig {
    pub fn get_args() -> Self {
        Self::parse()
    }

    /// Reads `tisa.toml` from the working directory, if there's one
    pub fn get_toml() -> Result<Self, toml::de::Error> {
        match std::fs::read_to_string(CONFIG_FILE) {
            Ok(config) => toml::from_str(&config),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn merge(self, rhs: Self) -> Self {
        Self {
            memory_size: self.memory_size.or(rhs.memory_size),
            pc_init: self.pc_init.or(rhs.pc_init),
            print_instructions: self.print_instructions || rhs.print_instructions,
            print_state: self.print_state || rhs.print_state,
            trace: self.trace || rhs.trace,
            binary: self.binary || rhs.binary,
            emit: self.emit.or(rhs.emit),
            file: self.file.or(rhs.file),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Config {
    pub memory_size: usize,
    pub pc_init: u32,
    pub print_instructions: bool,
    pub print_state: bool,
    pub trace: bool,
    pub binary: bool,
    pub emit: Option<String>,
    pub file: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse tisa.toml: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("No file specified")]
    NoFile,
}

impl TryFrom<OptionalConfig> for Config {
    type Error = ConfigError;

    fn try_from(config: OptionalConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            memory_size: config.memory_size.unwrap_or(4096),
            pc_init: config.pc_init.unwrap_or(0),
            print_instructions: config.print_instructions,
            print_state: config.print_state,
            trace: config.trace,
            binary: config.binary,
            emit: config.emit,
            file: config.file.ok_or(ConfigError::NoFile)?,
        })
    }
}

impl Config {
    /// Command line arguments take precedence over the config file
    pub fn get() -> Result<Self, ConfigError> {
        OptionalConfig::get_args()
            .merge(OptionalConfig::get_toml()?)
            .try_into()
    }
}
