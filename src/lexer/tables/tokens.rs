// src/lexer/tables/tokens.rs

use std::borrow::Cow;

use super::Lexicon;
use crate::source::Source;

/// Token ids: defined tokens are `1..=n` in definition order.
pub type TokenId = i32;
pub type ContextId = u32;
pub type StateId = u32;

pub const TOKEN_EOF: TokenId = 0;
pub const TOKEN_ERROR: TokenId = -1;

pub const DEFAULT_CONTEXT: ContextId = 0;
pub const DEFAULT_CONTEXT_NAME: &str = "default";

/// The dispatch state; as a transition target it means "no move".
pub const DISPATCH_STATE: StateId = 0;

/// One scanned token. Lines and columns are 1-based; `end_*` is the cursor
/// position just past the last byte (equal to `start_*` for empty tokens).
#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
    pub id: TokenId,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub offset: usize,
    pub length: usize,
    pub source: &'a Source,
    pub lexicon: &'a Lexicon,
}

impl<'a> Token<'a> {
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.id == TOKEN_EOF
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.id < 0
    }

    pub fn bytes(&self) -> &'a [u8] {
        &self.source.content()[self.offset..self.offset + self.length]
    }

    pub fn text(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes())
    }

    pub fn name(&self) -> &'a str {
        self.lexicon.display_name(self.id)
    }

    /// `path:line:col`, or `line:col` for sources without a path.
    pub fn location(&self) -> String {
        match self.source.path() {
            Some(p) => format!("{}:{}:{}", p.display(), self.start_line, self.start_column),
            None => format!("{}:{}", self.start_line, self.start_column),
        }
    }
}

impl PartialEq for Token<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.offset == other.offset
            && self.length == other.length
            && self.start_line == other.start_line
            && self.start_column == other.start_column
            && self.end_line == other.end_line
            && self.end_column == other.end_column
    }
}
