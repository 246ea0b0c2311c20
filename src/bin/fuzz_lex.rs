// src/bin/fuzz_lex.rs
// Generate random inputs for the sample grammar and scan each one with the
// freshly built lexicon and with the same lexicon reloaded from its compact
// binary form. Both streams must agree and token texts must tile the input.
//
// Knobs:
//   FUZZ_LEN=<bytes>      target length per input (default 100000)
//   FUZZ_ITERS=<n>        inputs per run (default 8)
//   FUZZ_SEED=<u64>       generator seed (default 42)
//   FUZZ_INPUT=<path>     replay a saved case instead of generating
//   FUZZ_SAVE=1           save every generated case to FUZZ_DIR (default fuzz-cases)

use std::{
    env, fs,
    io::Write,
    path::{Path, PathBuf},
    process,
    time::Instant,
};

use lexgen::{
    Lexicon, Scanner, Source, Token,
    dev::{generator::gen_valid_source, sample_grammar},
    lexer::tables::{io::encode_bin, load_lexicon_bin_bytes},
};
use rand::{SeedableRng, rngs::StdRng};
use rayon::prelude::*;

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(default)
}

fn main() {
    let built = match sample_grammar().build() {
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: sample grammar failed to build: {e}");
            process::exit(1);
        }
    };
    let reloaded = match encode_bin(&built)
        .map_err(anyhow::Error::from)
        .and_then(|bytes| load_lexicon_bin_bytes(&bytes))
    {
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: binary tables did not reload: {e:#}");
            process::exit(1);
        }
    };
    if built != reloaded {
        eprintln!("[fuzz] reloaded tables differ from the built ones");
        process::exit(1);
    }
    eprintln!(
        "[fuzz] lexicon: {} tokens, {} states",
        built.count_tokens(),
        built.count_states()
    );

    // --- REPLAY A SINGLE CASE ---
    if let Ok(path) = env::var("FUZZ_INPUT") {
        eprintln!("[replay] reading {path}");
        let source = match Source::load(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: failed to read {path}: {e}");
                process::exit(1);
            }
        };
        let ok = run_once(&built, &reloaded, &source, "replay");
        process::exit(if ok { 0 } else { 1 });
    }

    // --- FUZZ MODE ---
    let save_cases = env::var("FUZZ_SAVE").ok().as_deref() == Some("1");
    let out_dir = env::var("FUZZ_DIR").unwrap_or_else(|_| "fuzz-cases".to_string());
    let len = env_usize("FUZZ_LEN", 100_000);
    let iters = env_usize("FUZZ_ITERS", 8);
    let seed = env_u64("FUZZ_SEED", 42);

    eprintln!("[fuzz] len={len} iters={iters} seed={seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    // Generation stays sequential so a seed always yields the same cases.
    let t0 = Instant::now();
    let cases: Vec<String> = (0..iters).map(|_| gen_valid_source(&mut rng, len)).collect();
    eprintln!(
        "[fuzz] generated {} bytes in {} ms",
        cases.iter().map(String::len).sum::<usize>(),
        t0.elapsed().as_millis()
    );

    if save_cases {
        if let Err(e) = fs::create_dir_all(&out_dir) {
            eprintln!("error: failed to create {out_dir}: {e}");
            process::exit(1);
        }
        for (i, s) in cases.iter().enumerate() {
            let path = save_case(&out_dir, seed, i, s);
            eprintln!("[save] wrote {}", path.display());
        }
    }

    let failed: Vec<usize> = cases
        .par_iter()
        .enumerate()
        .filter_map(|(i, text)| {
            let source = Source::from(text.as_str());
            let label = format!("iter {i}");
            (!run_once(&built, &reloaded, &source, &label)).then_some(i)
        })
        .collect();

    if !failed.is_empty() {
        eprintln!("[fuzz] mismatching iterations: {failed:?}");
        process::exit(1);
    }
    eprintln!("[fuzz] all iterations matched");
}

fn save_case(dir: &str, seed: u64, iter: usize, src: &str) -> PathBuf {
    let path = Path::new(dir).join(format!("case_seed{seed}_iter{iter}_n{}.txt", src.len()));
    fs::write(&path, src.as_bytes()).ok();
    let meta = serde_json::json!({
        "seed": seed,
        "iter": iter,
        "bytes": src.len(),
        "replay": format!("FUZZ_INPUT={} cargo run --bin fuzz_lex", path.display()),
    });
    if let Ok(mut f) = fs::File::create(path.with_extension("json")) {
        let _ = writeln!(f, "{meta:#}");
    }
    path
}

fn scan<'a>(lexicon: &'a Lexicon, source: &'a Source) -> Option<Vec<Token<'a>>> {
    match Scanner::with(lexicon, source)
        .tokens()
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(tokens) => Some(tokens),
        Err(e) => {
            eprintln!("[scan] {e}");
            None
        }
    }
}

fn run_once(built: &Lexicon, reloaded: &Lexicon, source: &Source, label: &str) -> bool {
    let t0 = Instant::now();
    let (Some(a), Some(b)) = (scan(built, source), scan(reloaded, source)) else {
        return false;
    };
    let ms = t0.elapsed().as_millis();
    let errors = a.iter().filter(|t| t.is_error()).count();

    let mut ok = true;
    if let Some(i) = first_divergence(&a, &b) {
        eprintln!("[{label}] built vs reloaded diverge at token {i}");
        dump_near(&a, &b, i.saturating_sub(2));
        ok = false;
    }
    if let Err(at) = check_tiling(&a, source) {
        eprintln!("[{label}] tokens do not tile the input (gap or overlap at byte {at})");
        ok = false;
    }
    eprintln!(
        "[{label}] {} bytes  |  {} tokens ({} error)  |  2 scans {} ms  -> {}",
        source.len(),
        a.len(),
        errors,
        ms,
        if ok { "OK" } else { "MISMATCH!" }
    );
    ok
}

fn first_divergence(a: &[Token<'_>], b: &[Token<'_>]) -> Option<usize> {
    let n = a.len().min(b.len());
    (0..n)
        .find(|&i| a[i] != b[i])
        .or((a.len() != b.len()).then_some(n))
}

/// Tokens must cover the input back to back; returns the first offending byte.
fn check_tiling(tokens: &[Token<'_>], source: &Source) -> Result<(), usize> {
    let mut at = 0;
    for t in tokens {
        if t.offset != at || t.length == 0 {
            return Err(at);
        }
        at += t.length;
    }
    if at != source.len() {
        return Err(at);
    }
    Ok(())
}

fn dump_near(a: &[Token<'_>], b: &[Token<'_>], from: usize) {
    let hi = (from + 6).min(a.len().max(b.len()));
    eprintln!("--- context tokens [{from}..{hi}) ---");
    for i in from..hi {
        eprintln!("#{i:06} built={} reloaded={}", show(a.get(i)), show(b.get(i)));
    }
}

fn show(t: Option<&Token<'_>>) -> String {
    match t {
        Some(t) => format!("({} @{}+{} {:?})", t.name(), t.offset, t.length, t.text()),
        None => "-".to_string(),
    }
}
