//!
//! Lock-step observation of a run from another thread.
//!
//! The interpreter runs on a worker thread. After every executed instruction it sends the
//! instruction's address and waits until the observer acknowledges it. While the worker waits,
//! the observer can lock the [Context] and look at (or change) registers and memory.
//!
//! ```
//! use tisa::{encoder, interpreter::{debugger::Debugger, Context}};
//!
//! let mut mem = Vec::new();
//! encoder::put_lines(&mut mem, ["ldl ra 2a", "nop", "hlt"]).unwrap();
//! mem.resize(16, 0);
//!
//! let mut debugger = Debugger::attach(Context::new(mem)).unwrap();
//! let mut trace = Vec::new();
//! while let Some(addr) = debugger.next() {
//!     trace.push((addr, debugger.lock().registers[0]));
//! }
//!
//! assert_eq!(trace, vec![(0, 0x2a), (4, 0x2a)]);
//! ```
//!

use super::{Context, Outcome, Step};
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::{Mutex, MutexGuard};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::debug;

/// How the worker thread finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugExit {
    /// The program halted or faulted
    Finished(Outcome),
    /// The observer went away before the program stopped. `pc` is the next instruction that
    /// would have run.
    Detached { pc: u32 },
}

#[derive(Debug, Error)]
pub enum DebugError {
    #[error("The interpreter thread panicked")]
    WorkerPanicked,

    #[error("The execution context is still shared with the interpreter thread")]
    ContextShared,
}

/// Observer side of a lock-step run. Iterating yields the address of each executed instruction;
/// asking for the next one acknowledges the previous one.
pub struct Debugger {
    context: Arc<Mutex<Context>>,
    steps: Receiver<u32>,
    ack: Sender<()>,
    pending: bool,
    worker: JoinHandle<DebugExit>,
}

impl Debugger {
    /// Spawns the worker thread. It executes the first instruction right away and then waits for
    /// the observer.
    pub fn attach(context: Context) -> io::Result<Self> {
        let context = Arc::new(Mutex::new(context));
        let (step_tx, steps) = bounded(0);
        let (ack, ack_rx) = bounded(0);

        let worker = {
            let context = Arc::clone(&context);
            thread::Builder::new()
                .name("tisa interpreter".into())
                .spawn(move || worker(context, step_tx, ack_rx))?
        };

        Ok(Self {
            context,
            steps,
            ack,
            pending: false,
            worker,
        })
    }

    /// Locks the shared context. The worker can't execute anything while the guard is alive.
    pub fn lock(&self) -> MutexGuard<'_, Context> {
        self.context.lock()
    }

    /// Acknowledges every remaining step and waits for the program to stop
    pub fn finish(mut self) -> Result<(DebugExit, Context), DebugError> {
        while self.next().is_some() {}
        self.join()
    }

    /// Stops observing. The worker ends the run at its next handshake.
    pub fn detach(self) -> Result<(DebugExit, Context), DebugError> {
        self.join()
    }

    fn join(self) -> Result<(DebugExit, Context), DebugError> {
        let Debugger {
            context,
            steps,
            ack,
            worker,
            ..
        } = self;

        // Unblocks the worker if it's still waiting on either channel
        drop(steps);
        drop(ack);

        let exit = worker.join().map_err(|_| DebugError::WorkerPanicked)?;
        let context = Arc::try_unwrap(context)
            .map_err(|_| DebugError::ContextShared)?
            .into_inner();

        Ok((exit, context))
    }
}

impl Iterator for Debugger {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.pending {
            self.pending = false;
            self.ack.send(()).ok()?;
        }

        let addr = self.steps.recv().ok()?;
        self.pending = true;
        Some(addr)
    }
}

fn worker(context: Arc<Mutex<Context>>, steps: Sender<u32>, ack: Receiver<()>) -> DebugExit {
    loop {
        // The lock is released before the handshake
        let step = context.lock().step();

        match step {
            Step::Stopped(outcome) => return DebugExit::Finished(outcome),
            Step::Executed(addr) => {
                if steps.send(addr).is_err() || ack.recv().is_err() {
                    let pc = context.lock().pc();
                    debug!("observer detached, pc = {:#06x}", pc);
                    return DebugExit::Detached { pc };
                }
            }
        }
    }
}
