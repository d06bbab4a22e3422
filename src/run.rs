use tracing::{debug, warn};

use crate::error::{Fault, FaultKind};
use crate::interpreter::{Interpreter, StepOutcome};

/// Configuration for a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Maximum number of instructions to execute. `None` runs until the
    /// program halts or faults, which may be never.
    pub step_limit: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            step_limit: Some(1 << 16), // 65536
        }
    }
}

/// State of the program after [`Interpreter::run_steps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Every requested step ran.
    Running,
    /// The program halted before or at the last requested step.
    Halted,
}

impl Interpreter {
    /// Run from the current state until the program halts.
    ///
    /// Returns the number of instructions executed. A fault stops the run
    /// and leaves the interpreter inspectable. Hitting `step_limit` with the
    /// program still live yields a [`FaultKind::StepBudgetExceeded`] fault.
    pub fn run(&mut self, config: &RunConfig) -> Result<usize, Fault> {
        let mut steps = 0usize;
        loop {
            if config.step_limit.is_some_and(|limit| steps >= limit) && !self.is_halted() {
                let fault = self.fault(FaultKind::StepBudgetExceeded, self.current_char());
                warn!(%fault, steps, "run stopped");
                return Err(fault);
            }
            match self.step_at_current_position() {
                StepOutcome::Continue => steps += 1,
                StepOutcome::Halt => {
                    debug!(steps, output_len = self.output().len(), "program halted");
                    return Ok(steps);
                }
                StepOutcome::Fault(fault) => {
                    warn!(%fault, steps, "program faulted");
                    return Err(fault);
                }
            }
        }
    }

    /// Execute at most `steps` instructions, stopping early on halt.
    pub fn run_steps(&mut self, steps: usize) -> Result<Progress, Fault> {
        for _ in 0..steps {
            match self.step_at_current_position() {
                StepOutcome::Continue => {}
                StepOutcome::Halt => return Ok(Progress::Halted),
                StepOutcome::Fault(fault) => return Err(fault),
            }
        }
        Ok(Progress::Running)
    }
}
