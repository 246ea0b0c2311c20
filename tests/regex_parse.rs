//! Tree shapes produced by the pattern compiler.

use lexgen::regex::{ByteSet, Direction, Node, NodeId, Regex, compile};

fn root(r: &Regex) -> &Node {
    r.node(r.root())
}

fn ch(r: &Regex, id: NodeId) -> u8 {
    match r.node(id) {
        Node::Char { ch } => *ch,
        other => panic!("expected Char, got {other:?}"),
    }
}

fn class(r: &Regex, id: NodeId) -> (Direction, ByteSet) {
    match r.node(id) {
        Node::Range { dir, set } => (*dir, *set),
        other => panic!("expected Range, got {other:?}"),
    }
}

#[test]
fn postfix_binds_tighter_than_concat() {
    let r = compile("ab*").unwrap();
    let Node::Concat { left, right } = *root(&r) else {
        panic!("expected Concat, got {:?}", root(&r));
    };
    assert_eq!(ch(&r, left), b'a');
    let Node::Kleene { child } = *r.node(right) else {
        panic!("expected Kleene");
    };
    assert_eq!(ch(&r, child), b'b');
}

#[test]
fn concat_binds_tighter_than_union() {
    let r = compile("ab|c").unwrap();
    let Node::Union { left, right } = *root(&r) else {
        panic!("expected Union");
    };
    assert!(matches!(r.node(left), Node::Concat { .. }));
    assert_eq!(ch(&r, right), b'c');
}

#[test]
fn union_and_concat_are_left_associative() {
    let r = compile("a|b|c").unwrap();
    let Node::Union { left, right } = *root(&r) else {
        panic!("expected Union");
    };
    assert!(matches!(r.node(left), Node::Union { .. }));
    assert_eq!(ch(&r, right), b'c');

    let r = compile("abc").unwrap();
    let Node::Concat { left, right } = *root(&r) else {
        panic!("expected Concat");
    };
    assert!(matches!(r.node(left), Node::Concat { .. }));
    assert_eq!(ch(&r, right), b'c');
}

#[test]
fn groups_override_precedence() {
    let r = compile("(a|b)c").unwrap();
    let Node::Concat { left, .. } = *root(&r) else {
        panic!("expected Concat");
    };
    assert!(matches!(r.node(left), Node::Union { .. }));

    let r = compile("(ab)+").unwrap();
    let Node::Positive { child } = *root(&r) else {
        panic!("expected Positive");
    };
    assert!(matches!(r.node(child), Node::Concat { .. }));

    let r = compile("((a))?").unwrap();
    let Node::Optional { child } = *root(&r) else {
        panic!("expected Optional");
    };
    assert_eq!(ch(&r, child), b'a');
}

#[test]
fn children_precede_parents() {
    for p in ["(a|b)*abb", r"[+-]?\d+(\.\d+)?", "a(bc+|de?)f*g"] {
        let r = compile(p).unwrap();
        for (id, node) in r.arena().nodes().iter().enumerate() {
            let kids: Vec<NodeId> = match *node {
                Node::Concat { left, right } | Node::Union { left, right } => vec![left, right],
                Node::Kleene { child } | Node::Positive { child } | Node::Optional { child } => {
                    vec![child]
                }
                _ => vec![],
            };
            assert!(kids.iter().all(|&k| (k as usize) < id), "{p}: node {id}");
        }
        assert_eq!(r.root() as usize, r.arena().len() - 1);
    }
}

#[test]
fn escapes() {
    let cases: [(&str, u8); 9] = [
        (r"\n", b'\n'),
        (r"\t", b'\t'),
        (r"\r", b'\r'),
        (r"\a", 0x07),
        (r"\b", 0x08),
        (r"\f", 0x0c),
        (r"\v", b'v'),
        (r"\*", b'*'),
        (r"\q", b'q'),
    ];
    for (p, want) in cases {
        let r = compile(p).unwrap();
        assert_eq!(ch(&r, r.root()), want, "{p}");
    }
}

#[test]
fn class_shorthand_escapes() {
    let r = compile(r"\d").unwrap();
    let (dir, set) = class(&r, r.root());
    assert_eq!(dir, Direction::Positive);
    assert_eq!(set.iter().collect::<Vec<_>>(), b"0123456789");

    let r = compile(r"\S").unwrap();
    let (dir, set) = class(&r, r.root());
    assert_eq!(dir, Direction::Negative);
    assert!(set.contains(b' ') && set.contains(b'\n') && !set.contains(b'x'));

    let r = compile(r"\w").unwrap();
    let (_, set) = class(&r, r.root());
    assert_eq!(set.len(), 63);
    assert!(set.contains(b'_'));
}

#[test]
fn dot_is_negated_empty_class() {
    let r = compile(".").unwrap();
    assert_eq!(class(&r, r.root()), (Direction::Negative, ByteSet::EMPTY));
}

#[test]
fn bracket_classes() {
    let r = compile("[a-c]").unwrap();
    let (dir, set) = class(&r, r.root());
    assert_eq!(dir, Direction::Positive);
    assert_eq!(set.iter().collect::<Vec<_>>(), b"abc");

    // reversed bounds are swapped
    let r = compile("[c-a]").unwrap();
    assert_eq!(class(&r, r.root()).1.iter().collect::<Vec<_>>(), b"abc");

    let r = compile("[^a-z]").unwrap();
    let (dir, set) = class(&r, r.root());
    assert_eq!(dir, Direction::Negative);
    assert_eq!(set.len(), 26);

    // leading and trailing '-' are literal
    let r = compile("[-a-]").unwrap();
    assert_eq!(class(&r, r.root()).1.iter().collect::<Vec<_>>(), b"-a");

    let r = compile(r"[\d_x]").unwrap();
    let (_, set) = class(&r, r.root());
    assert_eq!(set.len(), 12);

    // a shorthand does not become a range bound
    let r = compile(r"[\d-z]").unwrap();
    assert_eq!(class(&r, r.root()).1.len(), 12);

    // nor does it clear the bound before it
    let r = compile(r"[a\d-z]").unwrap();
    let (_, set) = class(&r, r.root());
    assert!(set.contains(b'm'));
    assert!(set.contains(b'5'));
    assert!(!set.contains(b'-'));
    assert_eq!(set.len(), 36);

    let r = compile(r"[\v]").unwrap();
    assert_eq!(class(&r, r.root()).1.iter().collect::<Vec<_>>(), b"v");

    let r = compile(r"[\n-\r]").unwrap();
    assert_eq!(
        class(&r, r.root()).1.iter().collect::<Vec<_>>(),
        [b'\n', 0x0b, 0x0c, b'\r']
    );

    // operators are plain bytes inside brackets
    let r = compile("[*+?|()]").unwrap();
    assert_eq!(class(&r, r.root()).1.len(), 6);
}

#[test]
fn multibyte_literal_is_a_byte_concat() {
    let r = compile("中").unwrap();
    let leaves: Vec<u8> = r
        .arena()
        .nodes()
        .iter()
        .filter_map(|n| match n {
            Node::Char { ch } => Some(*ch),
            _ => None,
        })
        .collect();
    assert_eq!(leaves, "中".as_bytes());
    assert!(matches!(root(&r), Node::Concat { .. }));
}

#[test]
fn from_str_and_display() {
    let r: Regex = r"\w+".parse().unwrap();
    assert_eq!(r.to_string(), r"\w+");
    assert_eq!(r.pattern(), r"\w+");
}

#[test]
fn tree_serializes_with_node_tags() {
    let r = compile("a|[bc]").unwrap();
    let v = serde_json::to_value(r.tree()).unwrap();
    assert_eq!(v["pattern"], "a|[bc]");
    assert_eq!(v["root"], 2);
    assert_eq!(v["nodes"][0], serde_json::json!({"type": "char", "ch": 97}));
    assert_eq!(
        v["nodes"][1],
        serde_json::json!({"type": "range", "dir": "positive", "set": [98, 99]})
    );
    assert_eq!(
        v["nodes"][2],
        serde_json::json!({"type": "union", "left": 0, "right": 1})
    );
}
