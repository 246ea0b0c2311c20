// src/lexer/mod.rs
pub mod scanner;
pub mod tables;

pub use scanner::{Scanner, Tokens};
pub use tables::{Builder, Lexicon, Token};
