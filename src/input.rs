/// Supplies a line of text when `I` runs in interactive mode.
///
/// The engine never reads a terminal itself; the host injects one of these.
/// Returning `None` means no input is available.
pub trait Prompt {
    fn read_line(&mut self) -> Option<String>;
}

impl<F> Prompt for F
where
    F: FnMut() -> Option<String>,
{
    fn read_line(&mut self) -> Option<String> {
        self()
    }
}

/// Where the `I` opcode gets its data from.
pub enum Input {
    /// Ask the prompt for a whole line each time `I` runs.
    Interactive(Box<dyn Prompt + Send>),
    /// A fixed string consumed one character per `I`.
    Fixed { text: Vec<char>, cursor: usize },
}

impl Input {
    pub fn interactive(prompt: impl Prompt + Send + 'static) -> Self {
        Input::Interactive(Box::new(prompt))
    }

    pub fn fixed(text: &str) -> Self {
        Input::Fixed {
            text: text.chars().collect(),
            cursor: 0,
        }
    }

    /// Values `I` should push, bottom first, or `None` when exhausted.
    ///
    /// Interactive mode pushes every character of the line followed by a 0
    /// terminator; an empty line counts as no input. Fixed mode yields the
    /// character under the cursor and only advances the cursor on success.
    pub(crate) fn next_values(&mut self) -> Option<Vec<i64>> {
        match self {
            Input::Interactive(prompt) => {
                let line = prompt.read_line().filter(|l| !l.is_empty())?;
                let mut values: Vec<i64> = line.chars().map(|c| i64::from(u32::from(c))).collect();
                values.push(0);
                Some(values)
            }
            Input::Fixed { text, cursor } => {
                let c = *text.get(*cursor)?;
                *cursor += 1;
                Some(vec![i64::from(u32::from(c))])
            }
        }
    }

    /// Rewind fixed input to its first character.
    pub(crate) fn rewind(&mut self) {
        if let Input::Fixed { cursor, .. } = self {
            *cursor = 0;
        }
    }
}

impl Default for Input {
    /// An interactive source with nothing behind it.
    fn default() -> Self {
        Input::interactive(|| None::<String>)
    }
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Interactive(_) => f.write_str("Interactive"),
            Input::Fixed { text, cursor } => f
                .debug_struct("Fixed")
                .field("text", &text.iter().collect::<String>())
                .field("cursor", cursor)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_consumes_one_char() {
        let mut input = Input::fixed("hé");
        assert_eq!(input.next_values(), Some(vec![104]));
        assert_eq!(input.next_values(), Some(vec![233]));
        assert_eq!(input.next_values(), None);
        // stays exhausted
        assert_eq!(input.next_values(), None);
    }

    #[test]
    fn test_fixed_rewind() {
        let mut input = Input::fixed("a");
        input.next_values();
        input.rewind();
        assert_eq!(input.next_values(), Some(vec![97]));
    }

    #[test]
    fn test_interactive_line_is_zero_terminated() {
        let mut lines = vec!["hi".to_string()];
        let mut input = Input::interactive(move || lines.pop());
        assert_eq!(input.next_values(), Some(vec![104, 105, 0]));
        assert_eq!(input.next_values(), None);
    }

    #[test]
    fn test_interactive_empty_line_is_exhausted() {
        let mut input = Input::interactive(|| Some(String::new()));
        assert_eq!(input.next_values(), None);
    }
}
