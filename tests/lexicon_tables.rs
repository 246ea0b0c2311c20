//! Lexicon read queries and table persistence.

use std::{
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

use lexgen::{
    Builder, Lexicon, LookupError, Scanner, Source,
    dev::sample_grammar,
    lexer::tables::{
        DISPATCH_STATE, TOKEN_EOF, TOKEN_ERROR,
        io::encode_bin,
        load_lexicon_bin_bytes, load_lexicon_json_bytes, save_lexicon_bin, save_lexicon_json,
    },
    regex::compile,
};

fn temp_path(ext: &str) -> PathBuf {
    static N: AtomicUsize = AtomicUsize::new(0);
    std::env::temp_dir().join(format!(
        "lexgen_tables_{}_{}.{ext}",
        std::process::id(),
        N.fetch_add(1, Ordering::Relaxed)
    ))
}

fn small() -> Lexicon {
    Builder::new()
        .define_token("ID", &compile(r"\w+").unwrap())
        .and_then(|b| b.define_token("SPACE", &compile(r"\s+").unwrap()))
        .unwrap()
        .build()
}

fn scan_names(l: &Lexicon, text: &str) -> Vec<String> {
    let source = Source::from(text);
    let mut scanner = Scanner::with(l, &source);
    scanner
        .tokens()
        .map(|t| t.unwrap().name().to_string())
        .collect()
}

#[test]
fn token_names_and_ids() {
    let l = small();
    assert_eq!(l.list_tokens(), ["ID", "SPACE"]);
    assert_eq!(l.count_tokens(), 2);
    assert_eq!(l.id_of_token("ID"), Ok(1));
    assert_eq!(l.id_of_token("SPACE"), Ok(2));
    assert_eq!(l.name_of_token(2), Ok("SPACE"));
    assert_eq!(l.name_of_token(TOKEN_EOF), Ok("<EOF>"));
    assert_eq!(l.name_of_token(TOKEN_ERROR), Ok("<ERR>"));
    assert_eq!(l.name_of_token(3), Err(LookupError::Token(3)));
    assert_eq!(
        l.id_of_token("NUM"),
        Err(LookupError::TokenName("NUM".to_string()))
    );
}

#[test]
fn walking_transfers_by_hand() {
    let l = small();
    let id = l.id_of_token("ID").unwrap();
    let mut state = l.transfer_of_state(DISPATCH_STATE, 0).unwrap().unwrap();
    assert_eq!(l.accept_of_state(state), Ok(None));
    for &b in b"ab1" {
        state = l
            .transfer_of_state(state, b as u32)
            .unwrap()
            .expect("word byte moves");
        assert_eq!(l.accept_of_state(state), Ok(Some(id)));
    }
    assert_eq!(l.transfer_of_state(state, b' ' as u32), Ok(None));
    assert_eq!(l.transfer_of_state(state, 0), Ok(None));

    let bogus = l.count_states() as u32;
    assert_eq!(l.accept_of_state(bogus), Err(LookupError::State(bogus)));
    assert_eq!(
        l.transfer_of_state(bogus, b'a' as u32),
        Err(LookupError::State(bogus))
    );
    assert_eq!(l.transfer_of_state(DISPATCH_STATE, 5), Ok(None));
}

#[test]
fn dispatch_state_never_accepts() {
    let l = small();
    assert_eq!(l.accept_of_state(DISPATCH_STATE), Ok(None));
}

#[test]
fn json_round_trip() {
    let l = sample_grammar().build().unwrap();
    let path = temp_path("json");
    save_lexicon_json(&path, &l).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    let back = load_lexicon_json_bytes(&bytes).unwrap();
    assert_eq!(back, l);
}

#[test]
fn bin_round_trip_scans_identically() {
    let l = sample_grammar().build().unwrap();
    let path = temp_path("bin");
    save_lexicon_bin(&path, &l).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(&bytes[..8], b"LXLEXI01");
    let back = load_lexicon_bin_bytes(&bytes).unwrap();
    assert_eq!(back, l);

    let text = "foo = 12 + bar/* cmt */(7) // hello\nbaz=3/*multi\nline*/+qux\n";
    assert_eq!(scan_names(&back, text), scan_names(&l, text));
}

#[test]
fn bin_rejects_bad_magic_and_truncation() {
    let bytes = encode_bin(&small()).unwrap();

    let mut bad = bytes.clone();
    bad[0] = b'X';
    assert!(load_lexicon_bin_bytes(&bad).is_err());

    assert!(load_lexicon_bin_bytes(&bytes[..bytes.len() - 1]).is_err());

    let mut long = bytes.clone();
    long.push(0);
    assert!(load_lexicon_bin_bytes(&long).is_err());

    assert!(load_lexicon_bin_bytes(&bytes).is_ok());
}

#[test]
fn loaders_validate_ids() {
    let l = small();
    let path = temp_path("json");
    save_lexicon_json(&path, &l).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    let good: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    let load = |v: &serde_json::Value| load_lexicon_json_bytes(v.to_string().as_bytes());
    assert!(load(&good).is_ok());

    let mut v = good.clone();
    v["dispatch"][0] = 9999.into();
    assert!(load(&v).is_err(), "dangling start state");

    let mut v = good.clone();
    v["states"][1]["accept"] = 42.into();
    assert!(load(&v).is_err(), "unknown token");

    let mut v = good.clone();
    v["states"][1]["next"][b'a' as usize] = 9999.into();
    assert!(load(&v).is_err(), "dangling transition");

    let mut v = good.clone();
    v["states"][1]["next"][0] = 1.into();
    assert!(load(&v).is_err(), "move on byte 0");

    let mut v = good;
    v["contexts"] = serde_json::json!(["default", "extra"]);
    assert!(load(&v).is_err(), "context without start state");

    assert!(load_lexicon_json_bytes(b"{not json").is_err());
}
