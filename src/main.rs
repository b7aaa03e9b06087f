//!
//! Command line front-end: assembles a program (or loads a raw binary), runs it and reports how
//! it ended.
//!

mod log;

use owo_colors::OwoColorize;
use std::error::Error;
use tisa::config::Config;
use tisa::instruction::Instruction;
use tisa::interpreter::debugger::{DebugExit, Debugger};
use tisa::interpreter::{Context, Outcome, Registers};
use tisa::{disasm, encoder, isa};

fn load(config: &Config) -> Result<Vec<u8>, Box<dyn Error>> {
    if config.binary {
        return Ok(std::fs::read(&config.file)?);
    }

    let source = std::fs::read_to_string(&config.file)?;
    let mut image = Vec::new();
    encoder::assemble(&mut image, &source)?;
    Ok(image)
}

fn print_changes(before: &Registers, after: &Registers) {
    for (i, (old, new)) in before.iter().zip(after.iter()).enumerate() {
        if old != new {
            eprint!(
                "  {} {:08x} -> {:08x}",
                isa::register_name(i as u8).bright_blue(),
                old,
                new
            );
        }
    }
    eprintln!();
}

/// Runs the program on a worker thread, printing every instruction it executes
fn trace(context: Context) -> Result<(Outcome, Context), Box<dyn Error>> {
    let mut registers = context.registers;
    let mut debugger = Debugger::attach(context)?;

    while let Some(addr) = debugger.next() {
        let ctx = debugger.lock();
        let bytes = ctx.memory.get(addr as usize..).unwrap_or_default();
        match Instruction::decode(bytes) {
            Ok(i) => eprint!("{:#06x}  {:<20}", addr.bright_blue(), i.to_string()),
            Err(e) => eprint!("{:#06x}  {:<20}", addr.bright_blue(), e.to_string()),
        }
        print_changes(&registers, &ctx.registers);
        registers = ctx.registers;
    }

    match debugger.finish()? {
        (DebugExit::Finished(outcome), context) => Ok((outcome, context)),
        (DebugExit::Detached { pc }, _) => Err(format!("run detached at pc {pc:#06x}").into()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    log::init();

    let config = Config::get()?;

    let mut image = match load(&config) {
        Ok(x) => x,
        Err(e) => {
            eprintln!("An error occurred while loading your program:\n{}", e);
            std::process::exit(1);
        }
    };

    if let Some(path) = &config.emit {
        std::fs::write(path, &image)?;
        return Ok(());
    }

    if config.print_instructions {
        disasm::print_listing(&image);
    }

    if image.len() > config.memory_size {
        eprintln!(
            "The program is {} bytes long, but the memory only has {} bytes",
            image.len(),
            config.memory_size
        );
        std::process::exit(1);
    }
    image.resize(config.memory_size, 0);

    let context = Context::new(image).with_pc(config.pc_init);
    let (outcome, context) = if config.trace {
        trace(context)?
    } else {
        let mut context = context;
        let outcome = context.run();
        (outcome, context)
    };

    if config.print_state {
        context.print_state();
    }

    match outcome {
        Outcome::Halted { .. } => {
            eprintln!("{}", outcome.bright_green());
            Ok(())
        }
        Outcome::Fault(_) => {
            eprintln!("{}", outcome.bright_red());
            std::process::exit(1);
        }
    }
}
