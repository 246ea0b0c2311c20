// src/lexer/tables/mod.rs
pub mod build;
pub mod io;
pub mod tokens;

pub use build::Builder;
pub use io::{load_lexicon_bin_bytes, load_lexicon_json_bytes, save_lexicon_bin, save_lexicon_json};
pub use tokens::{
    ContextId, DEFAULT_CONTEXT, DEFAULT_CONTEXT_NAME, DISPATCH_STATE, StateId, TOKEN_EOF,
    TOKEN_ERROR, Token, TokenId,
};

use crate::error::LookupError;

/// One DFA state: optional accepted token and a dense byte -> state row
/// (`DISPATCH_STATE` = no move; byte 0 never moves).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub accept: Option<TokenId>,
    pub next: [StateId; 256],
}

impl State {
    pub(crate) fn new() -> Self {
        Self {
            accept: None,
            next: [DISPATCH_STATE; 256],
        }
    }
}

/// Immutable lexicon tables. Shared read-only by any number of scanners.
///
/// State 0 is the dispatch state: its "inputs" are context ids and it leads
/// to each context's start state. Every other state is a regular DFA state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    pub(crate) tokens: Vec<String>,
    pub(crate) contexts: Vec<String>,
    pub(crate) dispatch: Vec<StateId>,
    pub(crate) states: Vec<State>,
}

impl Lexicon {
    pub fn name_of_token(&self, token: TokenId) -> Result<&str, LookupError> {
        match token {
            TOKEN_EOF => Ok("<EOF>"),
            t if t < 0 => Ok("<ERR>"),
            t => self
                .tokens
                .get(t as usize - 1)
                .map(String::as_str)
                .ok_or(LookupError::Token(t)),
        }
    }

    pub(crate) fn display_name(&self, token: TokenId) -> &str {
        self.name_of_token(token).unwrap_or("<ERR>")
    }

    pub fn id_of_token(&self, name: &str) -> Result<TokenId, LookupError> {
        self.tokens
            .iter()
            .position(|t| t == name)
            .map(|i| i as TokenId + 1)
            .ok_or_else(|| LookupError::TokenName(name.to_string()))
    }

    pub fn list_tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn count_tokens(&self) -> usize {
        self.tokens.len()
    }

    pub fn name_of_context(&self, id: ContextId) -> Result<&str, LookupError> {
        self.contexts
            .get(id as usize)
            .map(String::as_str)
            .ok_or(LookupError::Context(id))
    }

    pub fn id_of_context(&self, name: &str) -> Result<ContextId, LookupError> {
        self.contexts
            .iter()
            .position(|c| c == name)
            .map(|i| i as ContextId)
            .ok_or_else(|| LookupError::ContextName(name.to_string()))
    }

    pub fn list_contexts(&self) -> &[String] {
        &self.contexts
    }

    /// Number of states, dispatch state included.
    pub fn count_states(&self) -> usize {
        self.states.len()
    }

    pub fn start_state(&self, context: ContextId) -> Result<StateId, LookupError> {
        self.dispatch
            .get(context as usize)
            .copied()
            .ok_or(LookupError::Context(context))
    }

    pub fn accept_of_state(&self, state: StateId) -> Result<Option<TokenId>, LookupError> {
        self.states
            .get(state as usize)
            .map(|s| s.accept)
            .ok_or(LookupError::State(state))
    }

    /// For state 0 `input` is a context id; for any other state it is a byte.
    pub fn transfer_of_state(&self, state: StateId, input: u32) -> Result<Option<StateId>, LookupError> {
        if state == DISPATCH_STATE {
            return Ok(self.dispatch.get(input as usize).copied());
        }
        let s = self.states.get(state as usize).ok_or(LookupError::State(state))?;
        Ok(s.next
            .get(input as usize)
            .copied()
            .filter(|&to| to != DISPATCH_STATE))
    }

    /// Hot-path byte transition; `state` must be a valid non-dispatch state.
    #[inline]
    pub(crate) fn step(&self, state: StateId, byte: u8) -> Option<StateId> {
        match self.states[state as usize].next[byte as usize] {
            DISPATCH_STATE => None,
            to => Some(to),
        }
    }
}
