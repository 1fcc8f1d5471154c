//! Help text for the tutor.

/// Shown for `!help`.
pub const HELP_TEXT: &str = r#"Type a SQL statement ending with `;` to submit it.
Statements may span several lines.

Commands:
  !hint    - Show a hint for the current exercise
  !schema  - Show the database schema for this lesson
  !solve   - Show the solution for the current exercise
  !history - Show your recent statements
  !help    - Show this help message
  !quit    - Exit the tutor (progress is saved)

Keys:
  Ctrl+C   - Cancel a statement in progress, or exit
  Ctrl+D   - Exit"#;

/// Statements listed by `!history`.
pub const HISTORY_SHOWN: usize = 10;

/// Shown under every lesson.
pub const INPUT_HINT: &str = "Type your SQL query below. Type `!help` for commands.";
