// src/lib.rs
//! Lexical-analyzer generator.
//!
//! Named token patterns (optionally scoped to lexical contexts) are compiled
//! into position trees, merged, and turned into one DFA by subset
//! construction over followpos sets. A [`Scanner`] walks the resulting
//! [`Lexicon`] and extracts the longest match at each position, earlier
//! definitions winning ties.
//!
//! ```no_run
//! use lexgen::{Builder, Scanner, Source, regex::compile};
//!
//! # fn main() -> anyhow::Result<()> {
//! let lexicon = Builder::new()
//!     .define_token("ID", &compile(r"\w+")?)?
//!     .define_token("SPACE", &compile(r"\s+")?)?
//!     .build();
//! let source = Source::from("abc df2a 3f");
//! let mut scanner = Scanner::with(&lexicon, &source);
//! for token in scanner.tokens() {
//!     let token = token?;
//!     println!("{} {:?}", token.name(), token.text());
//! }
//! # Ok(())
//! # }
//! ```

pub mod dev;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod regex;
pub mod source;
pub mod trace;

pub use error::{BuildError, LookupError, ParseError, ScanError};
pub use lexer::{Builder, Lexicon, Scanner, Token};
pub use regex::{Regex, compile};
pub use source::Source;
