/// A recognized instruction character
///
/// Every other character in a script is a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// `>`
    Right,
    /// `<`
    Left,
    /// `+`
    Increment,
    /// `-`
    Decrement,
    /// `.`
    Output,
    /// `,`
    Input,
    /// `[`
    LoopStart,
    /// `]`
    LoopEnd,
    /// `#`, calls the debug hook
    Debug,
}

impl Opcode {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '>' => Some(Opcode::Right),
            '<' => Some(Opcode::Left),
            '+' => Some(Opcode::Increment),
            '-' => Some(Opcode::Decrement),
            '.' => Some(Opcode::Output),
            ',' => Some(Opcode::Input),
            '[' => Some(Opcode::LoopStart),
            ']' => Some(Opcode::LoopEnd),
            '#' => Some(Opcode::Debug),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Opcode::Right => '>',
            Opcode::Left => '<',
            Opcode::Increment => '+',
            Opcode::Decrement => '-',
            Opcode::Output => '.',
            Opcode::Input => ',',
            Opcode::LoopStart => '[',
            Opcode::LoopEnd => ']',
            Opcode::Debug => '#',
        }
    }

    /// Whether executing this opcode can change the current cell
    pub fn writes_cell(self) -> bool {
        matches!(
            self,
            Opcode::Increment | Opcode::Decrement | Opcode::Input
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_mapping() {
        for c in "><+-.,[]#".chars() {
            let opcode = Opcode::from_char(c).unwrap();
            assert_eq!(opcode.as_char(), c);
        }
        assert_eq!(Opcode::from_char('a'), None);
        assert_eq!(Opcode::from_char(' '), None);
    }
}
