pub mod error;
pub mod grid;
pub mod direction;
pub mod opcode;
pub mod input;
pub mod interpreter;
pub mod run;

pub use error::{Fault, FaultKind, LoadError, OutOfBounds};
pub use grid::{Cell, Grid};
pub use direction::Direction;
pub use input::{Input, Prompt};
pub use interpreter::{Interpreter, Snapshot, StepOutcome};
pub use run::{Progress, RunConfig};
