// src/dev/mod.rs
//! Development helpers shared by `fuzz_lex`, the size-sweep test and the
//! demo grammar of the host binary.

pub mod generator;

use crate::grammar::{Grammar, TokenDef};

/// Token set of the small C-like language [`generator::gen_valid_source`]
/// writes.
pub const SAMPLE_TOKENS: &[(&str, &str)] = &[
    ("BLOCK_COMMENT", r"/\*([^*]|\*+[^*/])*\*+/"),
    ("LINE_COMMENT", r"//[^\n]*"),
    ("IDENT", r"[a-zA-Z_]\w*"),
    ("INT", r"\d+"),
    ("WHITE", r"\s+"),
    ("LE", "<="),
    ("GE", ">="),
    ("EQEQ", "=="),
    ("ANDAND", "&&"),
    ("OROR", r"\|\|"),
    ("LT", "<"),
    ("GT", ">"),
    ("ASSIGN", "="),
    ("NOT", "!"),
    ("AMP", "&"),
    ("PIPE", r"\|"),
    ("LPAREN", r"\("),
    ("RPAREN", r"\)"),
    ("LBRACKET", r"\["),
    ("RBRACKET", "]"),
    ("LBRACE", "{"),
    ("RBRACE", "}"),
    ("PLUS", r"\+"),
    ("STAR", r"\*"),
    ("SLASH", "/"),
    ("MINUS", "-"),
];

pub fn sample_grammar() -> Grammar {
    Grammar {
        tokens: SAMPLE_TOKENS
            .iter()
            .map(|&(name, pattern)| TokenDef {
                name: name.to_string(),
                pattern: pattern.to_string(),
                contexts: Vec::new(),
            })
            .collect(),
        source: Some("foo = 12 + bar/* cmt */(7) // hello\nbaz=3\n".to_string()),
    }
}
