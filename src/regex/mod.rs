// src/regex/mod.rs
//! Pattern trees for the lexicon builder.
//!
//! A compiled [`Regex`] owns an [`Arena`] of [`Node`]s. Nodes are only ever
//! appended, and children are always pushed before their parent, so a node's
//! id is larger than the ids of everything below it. Leaves (`Char`, `Range`,
//! `Accept`) double as automaton *positions*: a position is identified by its
//! arena index, never by its value, so two `Char(b'a')` leaves are distinct.

pub mod charset;
pub mod parse;
pub mod pos;

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::Serialize;

use crate::{error::ParseError, lexer::tables::tokens::TokenId};
pub use charset::{ByteSet, Direction};
pub use parse::compile;
use pos::Annot;

pub type NodeId = u32;

/// Ordered set of positions; ordering makes state identity deterministic.
pub type PosSet = BTreeSet<NodeId>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Char { ch: u8 },
    Range { dir: Direction, set: ByteSet },
    Concat { left: NodeId, right: NodeId },
    Union { left: NodeId, right: NodeId },
    Kleene { child: NodeId },
    Positive { child: NodeId },
    Optional { child: NodeId },
    /// Zero-width end marker of a token; never matches input.
    Accept { token: TokenId },
}

impl Node {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Char { .. } | Node::Range { .. } | Node::Accept { .. })
    }

    fn shifted(&self, base: NodeId) -> Node {
        use Node::*;
        match *self {
            Concat { left, right } => Concat {
                left: left + base,
                right: right + base,
            },
            Union { left, right } => Union {
                left: left + base,
                right: right + base,
            },
            Kleene { child } => Kleene {
                child: child + base,
            },
            Positive { child } => Positive {
                child: child + base,
            },
            Optional { child } => Optional {
                child: child + base,
            },
            ref leaf => leaf.clone(),
        }
    }
}

/// Node storage plus the per-node position annotations and the followpos
/// overlay (indexed by node id, only ever non-empty for leaves).
#[derive(Debug, Clone, Default)]
pub struct Arena {
    nodes: Vec<Node>,
    annot: Vec<Annot>,
    follow: Vec<PosSet>,
}

impl Arena {
    /// Appends `node`; its children must already be in the arena.
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        let annot = self.annotate(id, &node);
        self.nodes.push(node);
        self.annot.push(annot);
        self.follow.push(PosSet::new());
        id
    }

    /// Copies every node of `regex` into this arena and returns the new id of
    /// its root. The copies are fresh positions.
    pub fn graft(&mut self, regex: &Regex) -> NodeId {
        let base = self.nodes.len() as NodeId;
        for node in &regex.arena.nodes {
            self.push(node.shifted(base));
        }
        regex.root + base
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A compiled pattern.
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    arena: Arena,
    root: NodeId,
}

impl Regex {
    pub(crate) fn from_parts(pattern: &str, arena: Arena, root: NodeId) -> Self {
        Self {
            pattern: pattern.to_string(),
            arena,
            root,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.node(id)
    }

    pub fn nullable(&self) -> bool {
        self.arena.nullable(self.root)
    }

    pub fn firstpos(&self) -> &PosSet {
        self.arena.firstpos(self.root)
    }

    pub fn lastpos(&self) -> &PosSet {
        self.arena.lastpos(self.root)
    }

    /// Serializable view of the tree, used by trace sinks.
    pub fn tree(&self) -> RegexTree<'_> {
        RegexTree {
            pattern: &self.pattern,
            root: self.root,
            nodes: &self.arena.nodes,
        }
    }
}

impl FromStr for Regex {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compile(s)
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[derive(Debug, Serialize)]
pub struct RegexTree<'a> {
    pub pattern: &'a str,
    pub root: NodeId,
    pub nodes: &'a [Node],
}
