use crate::direction::Direction;

/// A decoded instruction character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// `^ > < V`: set the travel direction.
    Go(Direction),
    /// `0`-`9`: push the digit.
    Push(i64),
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `%`: floor division.
    Div,
    /// `P`: discard top.
    Pop,
    /// `N`: output top as a decimal number.
    PrintNumber,
    /// `A`: output top as a character.
    PrintChar,
    /// `D`: move top of the stack onto the side stack.
    Down,
    /// `U`: move top of the side stack onto the stack.
    Up,
    /// `C`: duplicate top.
    Copy,
    /// `I`: read input.
    Input,
    /// `|`: start a bridge when travelling east or west.
    BridgeHorizontal,
    /// `_`: start a bridge when travelling north or south.
    BridgeVertical,
    /// `/`: pop; left on zero, right otherwise.
    TurnLeftIfZero,
    /// `\`: pop; right on zero, left otherwise.
    TurnRightIfZero,
    /// Any other character.
    Nop,
}

impl Opcode {
    pub fn decode(c: char) -> Opcode {
        match c {
            '^' => Opcode::Go(Direction::North),
            '>' => Opcode::Go(Direction::East),
            '<' => Opcode::Go(Direction::West),
            'V' => Opcode::Go(Direction::South),
            '0'..='9' => Opcode::Push(i64::from(c as u8 - b'0')),
            '+' => Opcode::Add,
            '-' => Opcode::Sub,
            '*' => Opcode::Mul,
            '%' => Opcode::Div,
            'P' => Opcode::Pop,
            'N' => Opcode::PrintNumber,
            'A' => Opcode::PrintChar,
            'D' => Opcode::Down,
            'U' => Opcode::Up,
            'C' => Opcode::Copy,
            'I' => Opcode::Input,
            '|' => Opcode::BridgeHorizontal,
            '_' => Opcode::BridgeVertical,
            '/' => Opcode::TurnLeftIfZero,
            '\\' => Opcode::TurnRightIfZero,
            _ => Opcode::Nop,
        }
    }

    /// Whether this character ends a bridge, whatever the axis.
    pub fn ends_bridge(self) -> bool {
        matches!(self, Opcode::BridgeHorizontal | Opcode::BridgeVertical)
    }

    /// Number of `stack` values the instruction consumes or reads.
    pub fn stack_operands(self) -> usize {
        match self {
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => 2,
            Opcode::Pop
            | Opcode::PrintNumber
            | Opcode::PrintChar
            | Opcode::Down
            | Opcode::Copy
            | Opcode::TurnLeftIfZero
            | Opcode::TurnRightIfZero => 1,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_directions() {
        assert_eq!(Opcode::decode('^'), Opcode::Go(Direction::North));
        assert_eq!(Opcode::decode('>'), Opcode::Go(Direction::East));
        assert_eq!(Opcode::decode('<'), Opcode::Go(Direction::West));
        assert_eq!(Opcode::decode('V'), Opcode::Go(Direction::South));
        // lowercase v is not a direction
        assert_eq!(Opcode::decode('v'), Opcode::Nop);
    }

    #[test]
    fn test_decode_digits() {
        for (i, c) in ('0'..='9').enumerate() {
            assert_eq!(Opcode::decode(c), Opcode::Push(i as i64));
        }
        // non-ASCII digits are not pushes
        assert_eq!(Opcode::decode('٣'), Opcode::Nop);
    }

    #[test]
    fn test_unknown_is_nop() {
        for c in ['x', '#', '@', 'é', '\r'] {
            assert_eq!(Opcode::decode(c), Opcode::Nop);
        }
    }

    #[test]
    fn test_bridge_terminators() {
        assert!(Opcode::decode('|').ends_bridge());
        assert!(Opcode::decode('_').ends_bridge());
        assert!(!Opcode::decode('/').ends_bridge());
    }
}
