//! Statement boundaries in submitted SQL.
//!
//! Uses the sqlparser-rs tokenizer with the SQLite dialect, so semicolons
//! inside string literals, quoted identifiers and comments are not counted.

use sqlparser::dialect::SQLiteDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer};

/// Message shown when a submission holds more than one statement.
pub const MULTIPLE_STATEMENTS: &str = "You can only execute one statement at a time.";

/// Counts the non-empty statements in `sql`.
///
/// Returns `None` when the text cannot be tokenized; SQLite then reports the
/// problem itself. A `CREATE TRIGGER` body keeps its inner semicolons.
pub fn statement_count(sql: &str) -> Option<usize> {
    let dialect = SQLiteDialect {};
    let tokens = Tokenizer::new(&dialect, sql).tokenize().ok()?;

    let mut count = 0;
    let mut segment = Segment::default();

    for token in &tokens {
        match token {
            Token::Whitespace(_) => {}
            Token::SemiColon if segment.depth == 0 => {
                if segment.started {
                    count += 1;
                }
                segment = Segment::default();
            }
            Token::SemiColon => {}
            Token::Word(word) => {
                segment.push_word(word.quote_style.is_none().then_some(word.keyword))
            }
            _ => segment.push_word(None),
        }
    }

    if segment.started {
        count += 1;
    }
    Some(count)
}

/// Scan state for the statement being read.
#[derive(Debug, Default)]
struct Segment {
    started: bool,
    create: bool,
    trigger: bool,

    /// Open `BEGIN`/`CASE` blocks inside a trigger definition.
    depth: usize,
}

impl Segment {
    fn push_word(&mut self, keyword: Option<Keyword>) {
        let first = !self.started;
        self.started = true;

        match keyword {
            Some(Keyword::CREATE) if first => self.create = true,
            Some(Keyword::TRIGGER) if self.create => self.trigger = true,
            Some(Keyword::BEGIN | Keyword::CASE) if self.trigger => self.depth += 1,
            Some(Keyword::END) if self.trigger => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
    }
}
