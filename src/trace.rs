// src/trace.rs
//! Observers for construction and scanning steps.
//!
//! A [`Trace`] only watches: every method defaults to a no-op and nothing it
//! does is read back by the builder or scanner.

use std::io::Write;

use serde_json::{Value, json};

use crate::{
    lexer::tables::tokens::{ContextId, StateId, Token, TokenId},
    regex::{NodeId, PosSet, Regex},
    source::Source,
};

pub trait Trace {
    /// A pattern was grafted into the combined tree; its local node `n` is
    /// combined-tree node `base + n`.
    fn regex_compile(&mut self, _regex: &Regex, _base: NodeId) {}
    fn regex_accept(&mut self, _accept: NodeId, _token: TokenId, _afters: &PosSet) {}
    fn regex_union(&mut self, _union: NodeId, _left: NodeId, _right: NodeId) {}
    fn lexicon_add_token(&mut self, _id: TokenId, _name: &str) {}
    fn lexicon_add_context(&mut self, _id: ContextId, _name: &str) {}
    fn lexicon_add_state(&mut self, _id: StateId, _poses: &PosSet) {}
    fn lexicon_add_transfer(&mut self, _from: StateId, _to: StateId, _input: u32) {}
    fn lexicon_set_accept(&mut self, _state: StateId, _token: TokenId) {}
    fn scanner_set_source(&mut self, _source: &Source) {}
    fn scanner_set_state(&mut self, _state: StateId) {}
    fn scanner_next_input(&mut self) {}
    fn scanner_next_line(&mut self) {}
    fn scanner_accept_token(&mut self, _token: &Token<'_>) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl Trace for NoTrace {}

macro_rules! forward_trace {
    ($($ty:ty),*) => {$(
        impl<T: Trace + ?Sized> Trace for $ty {
            fn regex_compile(&mut self, regex: &Regex, base: NodeId) {
                (**self).regex_compile(regex, base)
            }
            fn regex_accept(&mut self, accept: NodeId, token: TokenId, afters: &PosSet) {
                (**self).regex_accept(accept, token, afters)
            }
            fn regex_union(&mut self, union: NodeId, left: NodeId, right: NodeId) {
                (**self).regex_union(union, left, right)
            }
            fn lexicon_add_token(&mut self, id: TokenId, name: &str) {
                (**self).lexicon_add_token(id, name)
            }
            fn lexicon_add_context(&mut self, id: ContextId, name: &str) {
                (**self).lexicon_add_context(id, name)
            }
            fn lexicon_add_state(&mut self, id: StateId, poses: &PosSet) {
                (**self).lexicon_add_state(id, poses)
            }
            fn lexicon_add_transfer(&mut self, from: StateId, to: StateId, input: u32) {
                (**self).lexicon_add_transfer(from, to, input)
            }
            fn lexicon_set_accept(&mut self, state: StateId, token: TokenId) {
                (**self).lexicon_set_accept(state, token)
            }
            fn scanner_set_source(&mut self, source: &Source) {
                (**self).scanner_set_source(source)
            }
            fn scanner_set_state(&mut self, state: StateId) {
                (**self).scanner_set_state(state)
            }
            fn scanner_next_input(&mut self) {
                (**self).scanner_next_input()
            }
            fn scanner_next_line(&mut self) {
                (**self).scanner_next_line()
            }
            fn scanner_accept_token(&mut self, token: &Token<'_>) {
                (**self).scanner_accept_token(token)
            }
        }
    )*};
}

forward_trace!(&mut T, Box<T>);

/// Forwards every event to `log::trace!` under the `lexgen::trace` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTrace;

const TARGET: &str = "lexgen::trace";

impl Trace for LogTrace {
    fn regex_compile(&mut self, regex: &Regex, base: NodeId) {
        log::trace!(target: TARGET, "compile {:?} root={} base={base}", regex.pattern(), regex.root());
    }
    fn regex_accept(&mut self, accept: NodeId, token: TokenId, afters: &PosSet) {
        log::trace!(target: TARGET, "accept #{accept} token={token} after {afters:?}");
    }
    fn regex_union(&mut self, union: NodeId, left: NodeId, right: NodeId) {
        log::trace!(target: TARGET, "union #{union} = #{left} | #{right}");
    }
    fn lexicon_add_token(&mut self, id: TokenId, name: &str) {
        log::trace!(target: TARGET, "token {id} {name}");
    }
    fn lexicon_add_context(&mut self, id: ContextId, name: &str) {
        log::trace!(target: TARGET, "context {id} {name}");
    }
    fn lexicon_add_state(&mut self, id: StateId, poses: &PosSet) {
        log::trace!(target: TARGET, "state {id} {poses:?}");
    }
    fn lexicon_add_transfer(&mut self, from: StateId, to: StateId, input: u32) {
        log::trace!(target: TARGET, "transfer {from} -[{input}]-> {to}");
    }
    fn lexicon_set_accept(&mut self, state: StateId, token: TokenId) {
        log::trace!(target: TARGET, "state {state} accepts {token}");
    }
    fn scanner_set_source(&mut self, source: &Source) {
        log::trace!(target: TARGET, "source {} bytes", source.len());
    }
    fn scanner_set_state(&mut self, state: StateId) {
        log::trace!(target: TARGET, "enter state {state}");
    }
    fn scanner_next_input(&mut self) {
        log::trace!(target: TARGET, "next input");
    }
    fn scanner_next_line(&mut self) {
        log::trace!(target: TARGET, "next line");
    }
    fn scanner_accept_token(&mut self, token: &Token<'_>) {
        log::trace!(
            target: TARGET,
            "token {} {:?} at {}",
            token.name(),
            token.text(),
            token.location()
        );
    }
}

/// Writes one `TRACE: {json}` line per event. Each object carries its event
/// name under `"$"`. Write errors are dropped.
#[derive(Debug)]
pub struct JsonTrace<W: Write> {
    out: W,
}

impl<W: Write> JsonTrace<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: Value) {
        let _ = writeln!(self.out, "TRACE: {event}");
    }
}

pub fn token_json(token: &Token<'_>) -> Value {
    json!({
        "id": token.id,
        "name": token.name(),
        "offset": token.offset,
        "length": token.length,
        "start_line": token.start_line,
        "start_column": token.start_column,
        "end_line": token.end_line,
        "end_column": token.end_column,
        "text": token.text(),
    })
}

impl<W: Write> Trace for JsonTrace<W> {
    fn regex_compile(&mut self, regex: &Regex, base: NodeId) {
        self.emit(json!({"$": "RegexCompile", "base": base, "regex": regex.tree()}));
    }
    fn regex_accept(&mut self, accept: NodeId, token: TokenId, afters: &PosSet) {
        self.emit(json!({"$": "RegexAccept", "id": accept, "tokenId": token, "afters": afters}));
    }
    fn regex_union(&mut self, union: NodeId, left: NodeId, right: NodeId) {
        self.emit(json!({"$": "RegexUnion", "union": union, "lhs": left, "rhs": right}));
    }
    fn lexicon_add_token(&mut self, id: TokenId, name: &str) {
        self.emit(json!({"$": "LexiconAddToken", "id": id, "name": name}));
    }
    fn lexicon_add_context(&mut self, id: ContextId, name: &str) {
        self.emit(json!({"$": "LexiconAddContext", "id": id, "name": name}));
    }
    fn lexicon_add_state(&mut self, id: StateId, poses: &PosSet) {
        self.emit(json!({"$": "LexiconAddState", "id": id, "poses": poses}));
    }
    fn lexicon_add_transfer(&mut self, from: StateId, to: StateId, input: u32) {
        self.emit(json!({"$": "LexiconAddTransfer", "from": from, "to": to, "input": input}));
    }
    fn lexicon_set_accept(&mut self, state: StateId, token: TokenId) {
        self.emit(json!({"$": "LexiconSetAccept", "id": state, "token": token}));
    }
    fn scanner_set_source(&mut self, source: &Source) {
        self.emit(json!({
            "$": "ScannerSetSource",
            "source": String::from_utf8_lossy(source.content()),
        }));
    }
    fn scanner_set_state(&mut self, state: StateId) {
        self.emit(json!({"$": "ScannerSetState", "state": state}));
    }
    fn scanner_next_input(&mut self) {
        self.emit(json!({"$": "ScannerNextInput"}));
    }
    fn scanner_next_line(&mut self) {
        self.emit(json!({"$": "ScannerNextLine"}));
    }
    fn scanner_accept_token(&mut self, token: &Token<'_>) {
        self.emit(json!({"$": "ScannerAcceptToken", "token": token_json(token)}));
    }
}
