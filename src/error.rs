// src/error.rs
//! Error taxonomy for pattern compilation, lexicon construction, table
//! lookups and scanning.
//!
//! Lexical errors in scanned text are *not* errors here: the scanner reports
//! them as tokens with a negative id and keeps going.

use thiserror::Error;

use crate::lexer::tables::tokens::{ContextId, StateId, TokenId};

/// Malformed regular expression. `at` is a byte offset into the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unmatched ')' at byte {at}")]
    UnmatchedParen { at: usize },

    #[error("missing ')' for group opened at byte {at}")]
    MissingParen { at: usize },

    #[error("missing operand for operator at byte {at}")]
    MissingOperand { at: usize },

    #[error("empty character class at byte {at}")]
    EmptyClass { at: usize },

    #[error("unterminated character class starting at byte {at}")]
    UnterminatedClass { at: usize },

    #[error("negated class shorthand inside character class at byte {at}")]
    NegatedClassInBracket { at: usize },

    #[error("invalid escape sequence at byte {at}")]
    InvalidEscape { at: usize },

    #[error("invalid expression")]
    InvalidExpression,
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("token {0} already exists")]
    DuplicateToken(String),

    #[error("pattern of token {name} is malformed")]
    Pattern {
        name: String,
        #[source]
        source: ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("token id {0} not found")]
    Token(TokenId),

    #[error("token {0:?} not found")]
    TokenName(String),

    #[error("context id {0} not found")]
    Context(ContextId),

    #[error("context {0:?} not found")]
    ContextName(String),

    #[error("state {0} not found")]
    State(StateId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("lexicon not set")]
    LexiconNotSet,

    #[error("source not set")]
    SourceNotSet,

    #[error(transparent)]
    Lookup(#[from] LookupError),
}
