// src/regex/pos.rs
//! Position algebra: `nullable`, `firstpos`, `lastpos` per node and the
//! tree-wide `followpos` relation. Together they describe a position
//! automaton over the leaves without ever building NFA states.

use super::{Arena, Direction, Node, NodeId, PosSet};

/// Cached `nullable`/`firstpos`/`lastpos` of one node, filled in on push.
#[derive(Debug, Clone, Default)]
pub(crate) struct Annot {
    nullable: bool,
    first: PosSet,
    last: PosSet,
}

impl Arena {
    pub(super) fn annotate(&self, id: NodeId, node: &Node) -> Annot {
        use Node::*;
        match *node {
            Char { .. } | Range { .. } | Accept { .. } => Annot {
                nullable: false,
                first: PosSet::from([id]),
                last: PosSet::from([id]),
            },
            Concat { left, right } => {
                let (l, r) = (&self.annot[left as usize], &self.annot[right as usize]);
                let mut first = l.first.clone();
                if l.nullable {
                    first.extend(r.first.iter().copied());
                }
                let mut last = r.last.clone();
                if r.nullable {
                    last.extend(l.last.iter().copied());
                }
                Annot {
                    nullable: l.nullable && r.nullable,
                    first,
                    last,
                }
            }
            Union { left, right } => {
                let (l, r) = (&self.annot[left as usize], &self.annot[right as usize]);
                Annot {
                    nullable: l.nullable || r.nullable,
                    first: l.first.union(&r.first).copied().collect(),
                    last: l.last.union(&r.last).copied().collect(),
                }
            }
            Kleene { child } | Optional { child } => Annot {
                nullable: true,
                ..self.annot[child as usize].clone()
            },
            Positive { child } => self.annot[child as usize].clone(),
        }
    }

    #[inline]
    pub fn nullable(&self, id: NodeId) -> bool {
        self.annot[id as usize].nullable
    }

    #[inline]
    pub fn firstpos(&self, id: NodeId) -> &PosSet {
        &self.annot[id as usize].first
    }

    #[inline]
    pub fn lastpos(&self, id: NodeId) -> &PosSet {
        &self.annot[id as usize].last
    }

    #[inline]
    pub fn followpos(&self, pos: NodeId) -> &PosSet {
        &self.follow[pos as usize]
    }

    /// Adds `to` to the followpos of `pos`.
    pub fn add_follow(&mut self, pos: NodeId, to: NodeId) {
        self.follow[pos as usize].insert(to);
    }

    /// Whether leaf `pos` consumes `byte`.
    #[inline]
    pub fn matches(&self, pos: NodeId, byte: u8) -> bool {
        match self.node(pos) {
            Node::Char { ch } => *ch == byte,
            Node::Range {
                dir: Direction::Positive,
                set,
            } => set.contains(byte),
            Node::Range {
                dir: Direction::Negative,
                set,
            } => !set.contains(byte),
            _ => false,
        }
    }

    /// Accumulates followpos over the subtree rooted at `root`. Run it once,
    /// after every accept leaf has been wired in; followpos is only ever
    /// written by interior ancestors, never by a leaf itself.
    pub fn calc_followpos(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let (from, to) = match *self.node(id) {
                Node::Concat { left, right } => {
                    stack.push(left);
                    stack.push(right);
                    (left, right)
                }
                Node::Kleene { child } | Node::Positive { child } => {
                    stack.push(child);
                    (child, child)
                }
                Node::Union { left, right } => {
                    stack.push(left);
                    stack.push(right);
                    continue;
                }
                Node::Optional { child } => {
                    stack.push(child);
                    continue;
                }
                _ => continue,
            };
            let first = self.annot[to as usize].first.clone();
            for &p in &self.annot[from as usize].last {
                self.follow[p as usize].extend(first.iter().copied());
            }
        }
    }
}
