//!
//! Runs a binary program instruction by instruction.
//!
//! A [Context] owns the registers and the memory of one run. [Context::step] executes a single
//! instruction and reports the address it executed, so a caller can drive the run one step at a
//! time. [Context::run] just steps until the program halts or faults. For a lock-step observer on
//! another thread, see [debugger].
//!

pub mod debugger;
mod fault;

pub use fault::*;

use crate::instruction::Instruction;
use crate::isa::{self, MASK_H16, MASK_L16, REGISTER_COUNT};
use owo_colors::OwoColorize;
use std::fmt;
use tracing::{debug, trace, warn};

pub type Registers = [u32; REGISTER_COUNT];

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A `hlt` was executed. `pc` points just past it.
    Halted { pc: u32 },
    Fault(Fault),
}

impl Outcome {
    /// The pc recorded when the run stopped
    pub fn pc(&self) -> u32 {
        match self {
            Outcome::Halted { pc } => *pc,
            Outcome::Fault(fault) => fault.pc,
        }
    }

    pub fn is_halted(&self) -> bool {
        matches!(self, Outcome::Halted { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Halted { pc } => write!(f, "halted at pc {pc:#06x}"),
            Outcome::Fault(fault) => write!(f, "{fault}"),
        }
    }
}

/// Result of a single [Context::step]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The instruction at this address was executed and the run goes on
    Executed(u32),
    /// The run is over. Stepping again returns the same outcome.
    Stopped(Outcome),
}

enum Flow {
    Next(u32),
    Halt(u32),
}

/// The pc, registers and memory of one run
#[derive(Debug, Clone)]
pub struct Context {
    pc_init: u32,
    pub registers: Registers,
    pub memory: Vec<u8>,

    pc: u32,
    outcome: Option<Outcome>,
}

impl Context {
    /// A context that starts executing at address 0, with every register zeroed
    pub fn new(memory: Vec<u8>) -> Self {
        Self {
            pc_init: 0,
            registers: [0; REGISTER_COUNT],
            memory,
            pc: 0,
            outcome: None,
        }
    }

    pub fn with_pc(mut self, pc: u32) -> Self {
        self.pc_init = pc;
        self.pc = pc;
        self
    }

    pub fn with_registers(mut self, registers: Registers) -> Self {
        self.registers = registers;
        self
    }

    /// Address the run starts at, set with [Context::with_pc]
    pub fn pc_init(&self) -> u32 {
        self.pc_init
    }

    /// Address of the next instruction to execute
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// The pc recorded when the run stopped, if it did
    pub fn pc_end(&self) -> Option<u32> {
        self.outcome.map(|o| o.pc())
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Reads a register by its name (`ra`..`rp`)
    pub fn register(&self, name: &str) -> Option<u32> {
        isa::register_by_name(name).map(|r| self.registers[r as usize])
    }

    /// Steps until the program halts or faults
    pub fn run(&mut self) -> Outcome {
        loop {
            if let Step::Stopped(outcome) = self.step() {
                return outcome;
            }
        }
    }

    /// Executes one instruction
    pub fn step(&mut self) -> Step {
        if let Some(outcome) = self.outcome {
            return Step::Stopped(outcome);
        }

        let loc = self.pc;
        match self.execute(loc) {
            Ok(Flow::Next(pc)) => {
                self.pc = pc;
                Step::Executed(loc)
            }
            Ok(Flow::Halt(pc)) => self.stop(Outcome::Halted { pc }),
            Err(fault) => self.stop(Outcome::Fault(fault)),
        }
    }

    fn stop(&mut self, outcome: Outcome) -> Step {
        match outcome {
            Outcome::Halted { pc } => debug!("halted, pc = {:#06x}", pc),
            Outcome::Fault(fault) => warn!("{}", fault),
        }

        self.pc = outcome.pc();
        self.outcome = Some(outcome);
        Step::Stopped(outcome)
    }

    fn fetch(&self, pc: u32) -> Result<Instruction, Fault> {
        let opcode = self.memory.get(pc as usize).copied();

        if pc & 1 != 0 {
            return Err(Fault::new(FaultKind::MisalignedFetch, pc, opcode));
        }

        let bytes = self.memory.get(pc as usize..).unwrap_or_default();
        Instruction::decode(bytes).map_err(|e| Fault::from_decode(e, pc, opcode))
    }

    fn execute(&mut self, pc: u32) -> Result<Flow, Fault> {
        use Instruction::*;

        let instruction = self.fetch(pc)?;
        trace!("{:#06x}: {}", pc, instruction);

        let next = pc.wrapping_add(instruction.encoded_len() as u32);
        let regs = &mut self.registers;

        match instruction {
            Hlt => return Ok(Flow::Halt(next)),
            Nop => {}
            Ldl(dst, imm) => {
                let r = &mut regs[dst as usize];
                *r = (*r & MASK_H16) | imm as u32;
            }
            Ldh(dst, imm) => {
                let r = &mut regs[dst as usize];
                *r = ((imm as u32) << 16) | (*r & MASK_L16);
            }
            Xor(src, dst) => regs[dst as usize] ^= regs[src as usize],
            Add(src, dst) => {
                regs[dst as usize] = regs[dst as usize].wrapping_add(regs[src as usize]);
            }
            Beq(a, b, base, offset) => {
                if regs[a as usize] == regs[b as usize] {
                    let target = regs[base as usize] as i64 + offset as i64;
                    return Ok(Flow::Next(target as u32));
                }
            }
        }

        Ok(Flow::Next(next))
    }

    pub fn print_state(&self) {
        eprintln!("{}", "Registers:".bright_blue());
        for (i, value) in self.registers.iter().enumerate() {
            eprint!(
                "{}: {:08x} ",
                isa::register_name(i as u8).bright_blue(),
                value
            );
            if i % 4 == 3 {
                eprintln!();
            }
        }
        eprintln!("{} {:#06x}", "pc:".bright_blue(), self.pc);
    }
}
