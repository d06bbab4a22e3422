use std::fmt;

use tracing::{debug, trace};

use crate::direction::Direction;
use crate::error::{Fault, FaultKind, LoadError};
use crate::grid::{Cell, Grid};
use crate::input::{Input, Prompt};
use crate::opcode::Opcode;

/// Result of executing a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The instruction ran and the pointer moved on.
    Continue,
    /// The pointer is on a blank cell or has left the grid.
    Halt,
    /// The instruction could not run. Nothing was changed and the pointer
    /// did not move.
    Fault(Fault),
}

/// Execution state for one Deolang program.
///
/// The interpreter owns its grid read-only. Everything else (pointer,
/// direction, both stacks, output, bridge flag, input cursor) is mutated in
/// place by [`step`](Interpreter::step), so one instance must only be driven
/// from one thread of control at a time.
///
/// A blank cell halts the program. Some earlier engines skipped blank cells
/// without moving instead, which spins forever; halting is the contract here.
#[derive(Debug)]
pub struct Interpreter {
    grid: Grid,
    input: Input,
    stack: Vec<i64>,
    side_stack: Vec<i64>,
    output: String,
    position: (i64, i64),
    direction: Direction,
    bridge_mode: bool,
}

/// A read-only copy of the interpreter state after the most recent step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub output: String,
    /// Bottom of the stack first.
    pub stack: Vec<i64>,
    /// Bottom of the side stack first.
    pub side_stack: Vec<i64>,
    pub position: (i64, i64),
    pub direction: Direction,
    pub bridge_mode: bool,
    /// The cell under the pointer, blank when outside the grid.
    pub current_char: Cell,
}

impl Interpreter {
    pub fn new(grid: Grid, input: Input) -> Self {
        Self {
            grid,
            input,
            stack: Vec::new(),
            side_stack: Vec::new(),
            output: String::new(),
            position: (0, 0),
            direction: Direction::None,
            bridge_mode: false,
        }
    }

    /// Parse `source` and build an interpreter with no input attached.
    pub fn from_source(source: &str) -> Result<Self, LoadError> {
        Ok(Self::new(Grid::load(source)?, Input::default()))
    }

    /// Execute `current`, the cell under the pointer, and advance.
    ///
    /// While bridging, cells are skipped without being interpreted until a
    /// `|` or `_` closes the bridge. Outside a bridge a blank cell halts.
    pub fn step(&mut self, current: Cell) -> StepOutcome {
        if self.bridge_mode {
            if current.map(Opcode::decode).is_some_and(Opcode::ends_bridge) {
                self.bridge_mode = false;
                debug!(x = self.position.0, y = self.position.1, "bridge closed");
            }
            self.advance();
            return StepOutcome::Continue;
        }

        let Some(c) = current else {
            return StepOutcome::Halt;
        };
        trace!(x = self.position.0, y = self.position.1, opcode = %c, depth = self.stack.len(), "step");

        match self.execute(Opcode::decode(c)) {
            Ok(()) => {
                self.advance();
                StepOutcome::Continue
            }
            Err(kind) => StepOutcome::Fault(self.fault(kind, Some(c))),
        }
    }

    /// Fetch the cell under the pointer from the grid and execute it.
    ///
    /// Leaving the grid halts, the same as landing on a blank cell.
    pub fn step_at_current_position(&mut self) -> StepOutcome {
        let (x, y) = self.position;
        match self.grid.get(x, y) {
            Ok(cell) => self.step(cell),
            Err(err) => {
                debug!(%err, "pointer left the grid");
                StepOutcome::Halt
            }
        }
    }

    /// Whether the next [`step_at_current_position`](Self::step_at_current_position)
    /// would return [`StepOutcome::Halt`].
    pub fn is_halted(&self) -> bool {
        let (x, y) = self.position;
        match self.grid.get(x, y) {
            Err(_) => true,
            Ok(None) => !self.bridge_mode,
            Ok(Some(_)) => false,
        }
    }

    fn execute(&mut self, op: Opcode) -> Result<(), FaultKind> {
        if self.stack.len() < op.stack_operands() {
            return Err(FaultKind::StackUnderflow);
        }

        match op {
            Opcode::Go(direction) => self.direction = direction,
            Opcode::Push(value) => self.stack.push(value),
            Opcode::Add => self.binary(|a, b| a.checked_add(b).ok_or(FaultKind::ArithmeticOverflow))?,
            Opcode::Sub => self.binary(|a, b| a.checked_sub(b).ok_or(FaultKind::ArithmeticOverflow))?,
            Opcode::Mul => self.binary(|a, b| a.checked_mul(b).ok_or(FaultKind::ArithmeticOverflow))?,
            Opcode::Div => self.binary(floor_div)?,
            Opcode::Pop => {
                self.pop()?;
            }
            Opcode::PrintNumber => {
                let value = self.pop()?;
                self.output.push_str(&value.to_string());
            }
            Opcode::PrintChar => {
                let c = u32::try_from(self.peek(0)?)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(FaultKind::InvalidCodePoint)?;
                self.pop()?;
                self.output.push(c);
            }
            Opcode::Down => {
                let value = self.pop()?;
                self.side_stack.push(value);
            }
            Opcode::Up => {
                let value = self.side_stack.pop().ok_or(FaultKind::StackUnderflow)?;
                self.stack.push(value);
            }
            Opcode::Copy => {
                let value = self.peek(0)?;
                self.stack.push(value);
            }
            Opcode::Input => {
                let values = self.input.next_values().ok_or(FaultKind::InputExhausted)?;
                self.stack.extend(values);
            }
            Opcode::BridgeHorizontal if self.direction.is_horizontal() => self.open_bridge(),
            Opcode::BridgeVertical if self.direction.is_vertical() => self.open_bridge(),
            Opcode::BridgeHorizontal | Opcode::BridgeVertical => {}
            Opcode::TurnLeftIfZero => {
                self.direction = if self.pop()? == 0 {
                    self.direction.turn_left()
                } else {
                    self.direction.turn_right()
                };
            }
            Opcode::TurnRightIfZero => {
                self.direction = if self.pop()? == 0 {
                    self.direction.turn_right()
                } else {
                    self.direction.turn_left()
                };
            }
            Opcode::Nop => {}
        }
        Ok(())
    }

    /// Replace `a` (below) and `b` (top) with `f(a, b)`. On error the stack
    /// is left as it was.
    fn binary(&mut self, f: impl FnOnce(i64, i64) -> Result<i64, FaultKind>) -> Result<(), FaultKind> {
        let b = self.peek(0)?;
        let a = self.peek(1)?;
        let value = f(a, b)?;
        self.stack.truncate(self.stack.len() - 2);
        self.stack.push(value);
        Ok(())
    }

    fn open_bridge(&mut self) {
        self.bridge_mode = true;
        debug!(x = self.position.0, y = self.position.1, direction = %self.direction, "bridge opened");
    }

    fn advance(&mut self) {
        let (dx, dy) = self.direction.vector();
        self.position = (
            self.position.0.saturating_add(dx),
            self.position.1.saturating_add(dy),
        );
    }

    fn peek(&self, depth: usize) -> Result<i64, FaultKind> {
        self.stack
            .len()
            .checked_sub(depth + 1)
            .map(|i| self.stack[i])
            .ok_or(FaultKind::StackUnderflow)
    }

    fn pop(&mut self) -> Result<i64, FaultKind> {
        self.stack.pop().ok_or(FaultKind::StackUnderflow)
    }

    pub(crate) fn fault(&self, kind: FaultKind, opcode: Option<char>) -> Fault {
        Fault {
            kind,
            opcode,
            position: self.position,
            stack_depth: self.stack.len(),
        }
    }

    /// Return to the initial state, keeping the grid and the input source.
    /// Fixed input is rewound to its first character.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.side_stack.clear();
        self.output.clear();
        self.position = (0, 0);
        self.direction = Direction::None;
        self.bridge_mode = false;
        self.input.rewind();
    }

    /// Switch to fixed input, starting at the first character of `text`.
    pub fn set_input(&mut self, text: &str) {
        self.input = Input::fixed(text);
    }

    /// Switch to interactive input served by `prompt`.
    pub fn set_prompt(&mut self, prompt: impl Prompt + Send + 'static) {
        self.input = Input::interactive(prompt);
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// The main stack, bottom first.
    pub fn stack(&self) -> &[i64] {
        &self.stack
    }

    /// The side stack, bottom first.
    pub fn side_stack(&self) -> &[i64] {
        &self.side_stack
    }

    pub fn position(&self) -> (i64, i64) {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn bridge_mode(&self) -> bool {
        self.bridge_mode
    }

    /// The cell under the pointer; blank when outside the grid.
    pub fn current_char(&self) -> Cell {
        let (x, y) = self.position;
        self.grid.get(x, y).ok().flatten()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            output: self.output.clone(),
            stack: self.stack.clone(),
            side_stack: self.side_stack.clone(),
            position: self.position,
            direction: self.direction,
            bridge_mode: self.bridge_mode,
            current_char: self.current_char(),
        }
    }
}

/// Integer division rounding towards negative infinity.
fn floor_div(a: i64, b: i64) -> Result<i64, FaultKind> {
    if b == 0 {
        return Err(FaultKind::DivisionByZero);
    }
    let q = a.checked_div(b).ok_or(FaultKind::ArithmeticOverflow)?;
    let r = a.checked_rem(b).ok_or(FaultKind::ArithmeticOverflow)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

fn write_listing(f: &mut fmt::Formatter<'_>, title: &str, values: &[i64]) -> fmt::Result {
    writeln!(f, "{title}:")?;
    writeln!(f)?;
    for value in values.iter().rev() {
        writeln!(f, "[{value}]")?;
    }
    Ok(())
}

impl Snapshot {
    /// The main stack listing, top first.
    pub fn stack_dump(&self) -> String {
        struct Listing<'a>(&'a [i64]);
        impl fmt::Display for Listing<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_listing(f, "Stack", self.0)
            }
        }
        Listing(&self.stack).to_string()
    }
}

impl fmt::Display for Snapshot {
    /// Stack and side stack listings, top first, then pointer state.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_listing(f, "Stack", &self.stack)?;
        write_listing(f, "Addition Stack", &self.side_stack)?;
        let (x, y) = self.position;
        writeln!(
            f,
            "Position: ({x}, {y})  Direction: {}  Bridge: {}",
            self.direction,
            if self.bridge_mode { "on" } else { "off" }
        )
    }
}
