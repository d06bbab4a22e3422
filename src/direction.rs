/// Travel direction of the instruction pointer.
///
/// `None` is the initial state: its vector is zero, so the pointer stays
/// put until a direction opcode runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    None,
    North,
    East,
    South,
    West,
}

/// The four cardinal directions in clockwise order.
pub const CARDINALS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

impl Direction {
    /// `(dx, dy)` with x growing rightwards and y growing downwards.
    pub const fn vector(self) -> (i64, i64) {
        match self {
            Direction::None => (0, 0),
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Quarter turn counter-clockwise. `None` stays `None`.
    pub const fn turn_left(self) -> Direction {
        match self {
            Direction::None => Direction::None,
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// Quarter turn clockwise. `None` stays `None`.
    pub const fn turn_right(self) -> Direction {
        match self {
            Direction::None => Direction::None,
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }

    /// Short name used in state listings.
    pub const fn name(self) -> &'static str {
        match self {
            Direction::None => "none",
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
