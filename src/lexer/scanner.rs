// src/lexer/scanner.rs
// Greedy longest-match scanner over a built lexicon.

use crate::{
    error::ScanError,
    lexer::tables::{
        Lexicon,
        tokens::{ContextId, DEFAULT_CONTEXT, DISPATCH_STATE, TOKEN_EOF, TOKEN_ERROR, Token},
    },
    source::Source,
    trace::{NoTrace, Trace},
};

/// Cursor over one source with one lexicon. Mutated by every
/// [`Scanner::next_token`] call; not meant to be shared between threads.
pub struct Scanner<'a> {
    context: ContextId,
    line: usize,
    column: usize,
    offset: usize,
    lexicon: Option<&'a Lexicon>,
    source: Option<&'a Source>,
    trace: Box<dyn Trace + 'a>,
}

impl Default for Scanner<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Scanner<'a> {
    pub fn new() -> Self {
        Self {
            context: DEFAULT_CONTEXT,
            line: 1,
            column: 1,
            offset: 0,
            lexicon: None,
            source: None,
            trace: Box::new(NoTrace),
        }
    }

    /// Scanner with both lexicon and source already set.
    pub fn with(lexicon: &'a Lexicon, source: &'a Source) -> Self {
        let mut scanner = Self::new();
        scanner.set_lexicon(lexicon);
        scanner.set_source(source);
        scanner
    }

    pub fn set_trace(&mut self, trace: impl Trace + 'a) {
        self.trace = Box::new(trace);
    }

    /// Swaps the lexicon and resets the context to the default one.
    pub fn set_lexicon(&mut self, lexicon: &'a Lexicon) {
        self.lexicon = Some(lexicon);
        self.context = DEFAULT_CONTEXT;
    }

    /// Swaps the source and rewinds the cursor to its start.
    pub fn set_source(&mut self, source: &'a Source) {
        self.source = Some(source);
        self.line = 1;
        self.column = 1;
        self.offset = 0;
        self.trace.scanner_set_source(source);
    }

    /// Takes effect on the next token. An id the lexicon does not know makes
    /// the next [`Scanner::next_token`] fail.
    pub fn set_context(&mut self, context: ContextId) {
        self.context = context;
    }

    pub fn set_context_by_name(&mut self, name: &str) -> Result<(), ScanError> {
        let lexicon = self.lexicon.ok_or(ScanError::LexiconNotSet)?;
        self.context = lexicon.id_of_context(name)?;
        Ok(())
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Current `(line, column)`, both 1-based.
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// Extracts the next token. At end of input this is an empty EOF token,
    /// returned again on every further call.
    ///
    /// Transitions are taken greedily without backtracking. When no move is
    /// possible the token ends: accepted if the current state accepts,
    /// otherwise an error token that swallows the offending byte (unless the
    /// input is exhausted), so repeated calls always make progress.
    pub fn next_token(&mut self) -> Result<Token<'a>, ScanError> {
        let lexicon = self.lexicon.ok_or(ScanError::LexiconNotSet)?;
        let source = self.source.ok_or(ScanError::SourceNotSet)?;
        let content = source.content();

        let mut token = Token {
            id: TOKEN_EOF,
            start_line: self.line,
            start_column: self.column,
            end_line: self.line,
            end_column: self.column,
            offset: self.offset,
            length: 0,
            source,
            lexicon,
        };

        if self.offset >= content.len() {
            return Ok(token);
        }

        let mut state = lexicon.start_state(self.context)?;
        self.trace.scanner_set_state(state);
        while state != DISPATCH_STATE {
            // running off the end reads as a terminator that never matches
            let byte = content.get(self.offset).copied();
            match byte.and_then(|b| lexicon.step(state, b)) {
                Some(next) => {
                    state = next;
                    self.trace.scanner_set_state(state);
                }
                None => {
                    if let Some(accept) = lexicon.states[state as usize].accept {
                        token.id = accept;
                        break;
                    }
                    token.id = TOKEN_ERROR;
                    if byte.is_none() {
                        break;
                    }
                    state = DISPATCH_STATE;
                }
            }

            // the byte at `offset` was consumed
            self.advance(content[self.offset]);
            token.length += 1;
            token.end_line = self.line;
            token.end_column = self.column;
        }

        self.trace.scanner_accept_token(&token);
        Ok(token)
    }

    fn advance(&mut self, byte: u8) {
        self.offset += 1;
        self.column += 1;
        self.trace.scanner_next_input();
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
            self.trace.scanner_next_line();
        }
    }

    /// Iterates tokens until end of input (the EOF token is not yielded).
    /// Stops early, after yielding it, on a scanner error.
    pub fn tokens(&mut self) -> Tokens<'_, 'a> {
        Tokens {
            scanner: self,
            done: false,
        }
    }
}

pub struct Tokens<'s, 'a> {
    scanner: &'s mut Scanner<'a>,
    done: bool,
}

impl<'a> Iterator for Tokens<'_, 'a> {
    type Item = Result<Token<'a>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.scanner.next_token() {
            Ok(t) if t.is_eof() => {
                self.done = true;
                None
            }
            Ok(t) => Some(Ok(t)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
