// src/bin/gen_tables.rs
// Build lexicon tables from a grammar once and write them to disk.
// Usage:
//   cargo run --bin gen_tables -- grammar.json                 # writes tables/lexicon.json
//   cargo run --bin gen_tables -- grammar.json /path/out.bin   # compact u16 tables
//   cargo run --bin gen_tables -- - out.json                   # built-in sample grammar

use std::{env, fs, path::Path, process, time::Instant};

use lexgen::{
    dev::sample_grammar,
    grammar::Grammar,
    lexer::tables::{save_lexicon_bin, save_lexicon_json},
};

fn main() {
    let mut args = env::args().skip(1);
    let grammar = match args.next().as_deref() {
        None | Some("-") => sample_grammar(),
        Some(path) => match Grammar::load(path) {
            Ok(g) => g,
            Err(e) => {
                eprintln!("error: {e:#}");
                process::exit(1);
            }
        },
    };
    let out = args
        .next()
        .unwrap_or_else(|| "tables/lexicon.json".to_string());
    let out_path = Path::new(&out);

    if let Some(parent) = out_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("error: failed to create {}: {e}", parent.display());
            process::exit(1);
        }
    }

    println!("[gen_tables] building {} tokens…", grammar.tokens.len());
    let t0 = Instant::now();
    let lexicon = match grammar.build() {
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: {e}");
            if let Some(cause) = std::error::Error::source(&e) {
                eprintln!("  caused by: {cause}");
            }
            process::exit(1);
        }
    };
    let accepting = (0..lexicon.count_states() as u32)
        .filter(|&s| matches!(lexicon.accept_of_state(s), Ok(Some(_))))
        .count();
    println!(
        "[gen_tables] tokens = {}, contexts = {}, states = {} ({} accepting), built in {} ms",
        lexicon.count_tokens(),
        lexicon.list_contexts().len(),
        lexicon.count_states(),
        accepting,
        t0.elapsed().as_millis()
    );

    let written = match out_path.extension().and_then(|e| e.to_str()) {
        Some("bin") => save_lexicon_bin(out_path, &lexicon),
        _ => save_lexicon_json(out_path, &lexicon),
    };
    if let Err(e) = written {
        eprintln!("error: failed to write {}: {e}", out_path.display());
        process::exit(1);
    }
    println!("[gen_tables] wrote {}", out_path.display());
}
