//! Line input handling: meta-commands and multi-line statement buffering.

/// Prompt for the first line of a statement.
pub const PRIMARY_PROMPT: &str = "SQL> ";

/// Prompt while a statement is still open.
pub const CONTINUATION_PROMPT: &str = "...> ";

/// Commands the learner can type instead of SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCommand {
    Help,
    Hint,
    Schema,
    Solve,
    History,
    Quit,
}

impl MetaCommand {
    /// Parses a whole input line. Only exact command names match, so
    /// `!hint please` is treated as SQL text.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "!help" => Some(Self::Help),
            "!hint" => Some(Self::Hint),
            "!schema" => Some(Self::Schema),
            "!solve" => Some(Self::Solve),
            "!history" => Some(Self::History),
            "!quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Accumulates input lines until a statement ends with `;`.
#[derive(Debug, Default)]
pub struct StatementBuffer {
    lines: Vec<String>,
}

impl StatementBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line. Returns the complete statement, lines joined with a
    /// single space, once the line ends with a semicolon.
    pub fn push(&mut self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() && self.lines.is_empty() {
            return None;
        }
        if !line.is_empty() {
            self.lines.push(line.to_string());
        }

        if line.ends_with(';') {
            let statement = self.lines.join(" ");
            self.lines.clear();
            Some(statement)
        } else {
            None
        }
    }

    /// Returns true while a statement is partially entered.
    pub fn is_pending(&self) -> bool {
        !self.lines.is_empty()
    }

    /// Drops a partially entered statement.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The prompt to show for the next line.
    pub fn prompt(&self) -> &'static str {
        if self.is_pending() {
            CONTINUATION_PROMPT
        } else {
            PRIMARY_PROMPT
        }
    }
}
