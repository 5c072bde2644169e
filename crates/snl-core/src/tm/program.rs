//! A compiled TM program and its listing.

use std::fmt;

use super::Instruction;

/// The compiled program: instructions at dense addresses starting at 0.
///
/// Trace comments ride along with the instructions and never affect
/// execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TmProgram {
    /// Instruction at each address.
    code: Vec<Instruction>,
    /// Trailing comment per address.
    comments: Vec<Option<String>>,
    /// Standalone comment lines, anchored before an address.
    notes: Vec<(usize, String)>,
}

impl TmProgram {
    /// Create a program from its parts.
    ///
    /// `comments` must be as long as `code`.
    pub fn new(
        code: Vec<Instruction>,
        comments: Vec<Option<String>>,
        notes: Vec<(usize, String)>,
    ) -> Self {
        debug_assert_eq!(code.len(), comments.len());
        Self {
            code,
            comments,
            notes,
        }
    }

    /// Create a program without comments.
    pub fn from_instructions(code: Vec<Instruction>) -> Self {
        let comments = vec![None; code.len()];
        Self {
            code,
            comments,
            notes: Vec::new(),
        }
    }

    /// The instructions.
    pub fn instructions(&self) -> &[Instruction] {
        &self.code
    }

    /// The instruction at `address`.
    pub fn get(&self, address: usize) -> Option<&Instruction> {
        self.code.get(address)
    }

    /// The trailing comment of the instruction at `address`.
    pub fn comment(&self, address: usize) -> Option<&str> {
        self.comments.get(address).and_then(|c| c.as_deref())
    }

    /// Standalone comment lines and the address they precede.
    pub fn notes(&self) -> &[(usize, String)] {
        &self.notes
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Whether the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Render the classic TM listing, one instruction per line.
    pub fn listing(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TmProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut notes = self.notes.iter().peekable();
        for (address, inst) in self.code.iter().enumerate() {
            while let Some((_, text)) = notes.next_if(|(at, _)| *at <= address) {
                writeln!(f, "* {text}")?;
            }
            match self.comment(address) {
                Some(comment) => writeln!(f, "{address:>3}:  {inst}\t* {comment}")?,
                None => writeln!(f, "{address:>3}:  {inst}")?,
            }
        }
        for (_, text) in notes {
            writeln!(f, "* {text}")?;
        }
        Ok(())
    }
}
