// src/regex/parse.rs
// Pattern string -> node tree.
//
// Two stages over a flat unit list. `scan` resolves escapes, bracket classes
// and literals into leaf nodes and leaves the operators `* + ? | ( )` in
// place. `reduce_group` then folds each parenthesized group (innermost first)
// in four ordered passes: groups, postfix operators, implicit concatenation,
// alternation.

use super::{
    Arena, Node, NodeId, Regex,
    charset::{ByteSet, Direction, class_shorthand, escape_byte, is_operator},
};
use crate::error::ParseError;

#[derive(Debug, Clone, Copy)]
enum Unit {
    Op { ch: u8, at: usize },
    Node { id: NodeId },
}

/// Compiles `pattern` into a tree. Patterns are byte-oriented: a multi-byte
/// UTF-8 character is a concatenation of its bytes.
pub fn compile(pattern: &str) -> Result<Regex, ParseError> {
    let mut arena = Arena::default();
    let units = scan(pattern.as_bytes(), &mut arena)?;
    let root = reduce_group(&mut units.into_iter(), &mut arena, None)?;
    Ok(Regex::from_parts(pattern, arena, root))
}

fn scan(bytes: &[u8], arena: &mut Arena) -> Result<Vec<Unit>, ParseError> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        let at = i;
        let node = match c {
            b'[' => {
                let (node, next) = scan_class(bytes, i)?;
                i = next;
                node
            }
            b'\\' => {
                let Some(&e) = bytes.get(i + 1) else {
                    return Err(ParseError::InvalidEscape { at });
                };
                i += 2;
                if let Some(b) = escape_byte(e) {
                    Node::Char { ch: b }
                } else if let Some((dir, set)) = class_shorthand(e) {
                    Node::Range { dir, set }
                } else {
                    Node::Char { ch: e }
                }
            }
            b'.' => {
                i += 1;
                Node::Range {
                    dir: Direction::Negative,
                    set: ByteSet::EMPTY,
                }
            }
            c if is_operator(c) => {
                i += 1;
                out.push(Unit::Op { ch: c, at });
                continue;
            }
            c => {
                i += 1;
                Node::Char { ch: c }
            }
        };
        out.push(Unit::Node {
            id: arena.push(node),
        });
    }
    Ok(out)
}

#[derive(Clone, Copy)]
enum ClassState {
    Collect,
    Escape,
    /// Saw `lo-`, waiting for the upper bound.
    Range(u8),
    /// Saw `lo-\`, the upper bound is escaped.
    RangeEscape(u8),
}

/// Scans `[...]` starting at `bytes[start] == b'['`. Returns the class node
/// and the index just past the closing `]`.
fn scan_class(bytes: &[u8], start: usize) -> Result<(Node, usize), ParseError> {
    let mut i = start + 1;
    let dir = if bytes.get(i) == Some(&b'^') {
        i += 1;
        Direction::Negative
    } else {
        Direction::Positive
    };

    let mut set = ByteSet::EMPTY;
    let mut left: Option<u8> = None;
    let mut state = ClassState::Collect;
    loop {
        let Some(&c) = bytes.get(i) else {
            return Err(ParseError::UnterminatedClass { at: start });
        };
        i += 1;

        state = match state {
            ClassState::Collect => match (c, left) {
                (b']', _) => break,
                (b'\\', _) => ClassState::Escape,
                (b'-', Some(lo)) => ClassState::Range(lo),
                _ => {
                    set.insert(c);
                    left = Some(c);
                    ClassState::Collect
                }
            },
            ClassState::Escape => {
                if let Some(b) = escape_byte(c) {
                    set.insert(b);
                    left = Some(b);
                } else if let Some((class_dir, class)) = class_shorthand(c) {
                    if class_dir == Direction::Negative {
                        return Err(ParseError::NegatedClassInBracket { at: i - 2 });
                    }
                    set.union_with(&class);
                } else {
                    set.insert(c);
                    left = Some(c);
                }
                ClassState::Collect
            }
            ClassState::Range(lo) => match c {
                b']' => {
                    // trailing `-` is literal
                    set.insert(b'-');
                    break;
                }
                b'\\' => ClassState::RangeEscape(lo),
                hi => {
                    set.insert_range(lo, hi);
                    left = None;
                    ClassState::Collect
                }
            },
            ClassState::RangeEscape(lo) => {
                set.insert_range(lo, escape_byte(c).unwrap_or(c));
                left = None;
                ClassState::Collect
            }
        };
    }

    if set.is_empty() {
        return Err(ParseError::EmptyClass { at: start });
    }
    Ok((Node::Range { dir, set }, i))
}

/// Reduces units up to the `)` closing the group opened at `open` (or to the
/// end of input at top level) into a single node.
fn reduce_group<I>(units: &mut I, arena: &mut Arena, open: Option<usize>) -> Result<NodeId, ParseError>
where
    I: Iterator<Item = Unit>,
{
    let mut items = Vec::new();
    loop {
        match units.next() {
            None => match open {
                Some(at) => return Err(ParseError::MissingParen { at }),
                None => break,
            },
            Some(Unit::Op { ch: b')', at }) => match open {
                Some(_) => break,
                None => return Err(ParseError::UnmatchedParen { at }),
            },
            Some(Unit::Op { ch: b'(', at }) => {
                let id = reduce_group(units, arena, Some(at))?;
                items.push(Unit::Node { id });
            }
            Some(unit) => items.push(unit),
        }
    }

    let items = reduce_postfix(items, arena)?;
    let items = reduce_concat(items, arena);
    let items = reduce_union(items, arena)?;

    match items.as_slice() {
        [Unit::Node { id }] => Ok(*id),
        _ => match open {
            Some(at) => Err(ParseError::MissingParen { at }),
            None => Err(ParseError::InvalidExpression),
        },
    }
}

fn reduce_postfix(items: Vec<Unit>, arena: &mut Arena) -> Result<Vec<Unit>, ParseError> {
    let mut out: Vec<Unit> = Vec::with_capacity(items.len());
    for unit in items {
        let (op, at) = match unit {
            Unit::Op {
                ch: ch @ (b'*' | b'+' | b'?'),
                at,
            } => (ch, at),
            unit => {
                out.push(unit);
                continue;
            }
        };
        let Some(Unit::Node { id }) = out.last_mut() else {
            return Err(ParseError::MissingOperand { at });
        };
        let child = *id;
        *id = arena.push(match op {
            b'*' => Node::Kleene { child },
            b'+' => Node::Positive { child },
            _ => Node::Optional { child },
        });
    }
    Ok(out)
}

fn reduce_concat(items: Vec<Unit>, arena: &mut Arena) -> Vec<Unit> {
    let mut out: Vec<Unit> = Vec::with_capacity(items.len());
    for unit in items {
        if let (Unit::Node { id: right }, Some(Unit::Node { id: left })) =
            (unit, out.last_mut())
        {
            *left = arena.push(Node::Concat { left: *left, right });
            continue;
        }
        out.push(unit);
    }
    out
}

fn reduce_union(items: Vec<Unit>, arena: &mut Arena) -> Result<Vec<Unit>, ParseError> {
    let mut out: Vec<Unit> = Vec::with_capacity(items.len());
    let mut iter = items.into_iter();
    while let Some(unit) = iter.next() {
        let at = match unit {
            Unit::Op { ch: b'|', at } => at,
            unit => {
                out.push(unit);
                continue;
            }
        };
        let Some(Unit::Node { id: right }) = iter.next() else {
            return Err(ParseError::MissingOperand { at });
        };
        let Some(Unit::Node { id: left }) = out.last_mut() else {
            return Err(ParseError::MissingOperand { at });
        };
        *left = arena.push(Node::Union { left: *left, right });
    }
    Ok(out)
}
