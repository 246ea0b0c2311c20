// src/lexer/tables/build.rs
use hashbrown::HashMap;
use std::{collections::BTreeSet, time::Instant};

use super::{
    Lexicon, State,
    tokens::{ContextId, DEFAULT_CONTEXT_NAME, DISPATCH_STATE, StateId, TokenId},
};
use crate::{
    error::BuildError,
    regex::{Arena, Node, NodeId, PosSet, Regex},
    trace::{NoTrace, Trace},
};

/// Collects token definitions and turns them into a [`Lexicon`].
///
/// Tokens are unioned into one combined tree as they are defined. Each token
/// gets its own `Accept` leaf, wired into the followpos of the token's
/// lastpos instead of being concatenated onto the tree. Definition order is
/// priority order.
pub struct Builder<'t> {
    tokens: Vec<String>,
    contexts: Vec<String>,
    arena: Arena,
    root: Option<NodeId>,
    // patterns without a context restriction, back-filled at build time
    global: Vec<NodeId>,
    firstpos_ctx: HashMap<NodeId, BTreeSet<ContextId>>,
    trace: Box<dyn Trace + 't>,
}

impl Default for Builder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t> Builder<'t> {
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            contexts: vec![DEFAULT_CONTEXT_NAME.to_string()],
            arena: Arena::default(),
            root: None,
            global: Vec::new(),
            firstpos_ctx: HashMap::new(),
            trace: Box::new(NoTrace),
        }
    }

    pub fn with_trace(mut self, trace: impl Trace + 't) -> Self {
        self.trace = Box::new(trace);
        self
    }

    /// Defines a token reachable in every context.
    pub fn define_token(self, name: &str, pattern: &Regex) -> Result<Self, BuildError> {
        self.define_token_in::<&str>(name, pattern, &[])
    }

    /// Defines a token reachable only in `contexts` (all contexts if empty).
    /// Unknown context names are created on first mention.
    pub fn define_token_in<S: AsRef<str>>(
        mut self,
        name: &str,
        pattern: &Regex,
        contexts: &[S],
    ) -> Result<Self, BuildError> {
        self.add_token(name, pattern, contexts)?;
        Ok(self)
    }

    /// Non-consuming form of [`Builder::define_token_in`]; returns the new id.
    pub fn add_token<S: AsRef<str>>(
        &mut self,
        name: &str,
        pattern: &Regex,
        contexts: &[S],
    ) -> Result<TokenId, BuildError> {
        if self.tokens.iter().any(|t| t == name) {
            return Err(BuildError::DuplicateToken(name.to_string()));
        }
        self.tokens.push(name.to_string());
        let token = self.tokens.len() as TokenId;
        self.trace.lexicon_add_token(token, name);

        let base = self.arena.len() as NodeId;
        let root = self.arena.graft(pattern);
        self.trace.regex_compile(pattern, base);
        if pattern.nullable() {
            log::warn!("token {name} matches the empty string; empty matches are never produced");
        }

        let accept = self.arena.push(Node::Accept { token });
        let last: Vec<NodeId> = self.arena.lastpos(root).iter().copied().collect();
        for p in last {
            self.arena.add_follow(p, accept);
        }
        self.trace.regex_accept(accept, token, self.arena.lastpos(root));

        if contexts.is_empty() {
            self.global.push(root);
        } else {
            let ids: BTreeSet<ContextId> = contexts
                .iter()
                .map(|c| self.touch_context(c.as_ref()))
                .collect();
            for &p in self.arena.firstpos(root) {
                self.firstpos_ctx.insert(p, ids.clone());
            }
        }

        self.root = Some(match self.root {
            None => root,
            Some(prev) => {
                let union = self.arena.push(Node::Union {
                    left: prev,
                    right: root,
                });
                self.trace.regex_union(union, prev, root);
                union
            }
        });
        Ok(token)
    }

    fn touch_context(&mut self, name: &str) -> ContextId {
        if let Some(id) = self.contexts.iter().position(|c| c == name) {
            return id as ContextId;
        }
        self.contexts.push(name.to_string());
        let id = (self.contexts.len() - 1) as ContextId;
        self.trace.lexicon_add_context(id, name);
        id
    }

    /// Runs followpos and subset construction.
    pub fn build(mut self) -> Lexicon {
        let t0 = Instant::now();
        let n_contexts = self.contexts.len() as ContextId;

        // Global patterns belong to every context, including later ones.
        for &g in &self.global {
            for &p in self.arena.firstpos(g) {
                self.firstpos_ctx.insert(p, (0..n_contexts).collect());
            }
        }

        let start_poses = match self.root {
            Some(root) => {
                self.arena.calc_followpos(root);
                self.arena.firstpos(root).clone()
            }
            None => PosSet::new(),
        };

        let mut states = vec![State::new()];
        let mut dispatch = Vec::with_capacity(n_contexts as usize);
        let mut interner: HashMap<PosSet, StateId> = HashMap::new();
        let mut pending: Vec<(StateId, PosSet)> = Vec::new();

        // One start state per context, reached from the dispatch state with
        // the context id as input.
        for ctx in 0..n_contexts {
            let id = states.len() as StateId;
            let poses: PosSet = start_poses
                .iter()
                .copied()
                .filter(|p| self.firstpos_ctx.get(p).is_none_or(|c| c.contains(&ctx)))
                .collect();
            states.push(State::new());
            dispatch.push(id);
            self.trace.lexicon_add_state(id, &poses);
            self.trace.lexicon_add_transfer(DISPATCH_STATE, id, ctx);
            interner.entry(poses.clone()).or_insert(id);
            pending.push((id, poses));
        }

        while let Some((id, poses)) = pending.pop() {
            // lowest token id wins
            let accept = poses
                .iter()
                .filter_map(|&p| match self.arena.node(p) {
                    Node::Accept { token } => Some(*token),
                    _ => None,
                })
                .min();
            if let Some(token) = accept {
                states[id as usize].accept = Some(token);
                self.trace.lexicon_set_accept(id, token);
            }

            for byte in 1u8..=255 {
                let mut follow = PosSet::new();
                for &p in &poses {
                    if self.arena.matches(p, byte) {
                        follow.extend(self.arena.followpos(p).iter().copied());
                    }
                }
                if follow.is_empty() {
                    continue;
                }

                let trace = &mut self.trace;
                let to = *interner.entry(follow).or_insert_with_key(|set| {
                    let to = states.len() as StateId;
                    states.push(State::new());
                    trace.lexicon_add_state(to, set);
                    pending.push((to, set.clone()));
                    to
                });
                states[id as usize].next[byte as usize] = to;
                self.trace.lexicon_add_transfer(id, to, byte as u32);
            }
        }

        log::debug!(
            "[lexicon] tokens={} contexts={} states={} positions={} took {:?}",
            self.tokens.len(),
            self.contexts.len(),
            states.len(),
            self.arena.len(),
            t0.elapsed()
        );

        Lexicon {
            tokens: self.tokens,
            contexts: self.contexts,
            dispatch,
            states,
        }
    }
}
