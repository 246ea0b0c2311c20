//! Size sweep tests for the scanner:
//!  - all target lengths < 32 (0..=31): runs by default
//!  - powers of two from 32 up to ~10,000,000: opt-in (ignored by default)
//!
//! Inputs come from the shared generator (same as fuzz_lex). Each input is
//! scanned with the built lexicon and with the same lexicon reloaded from
//! its binary tables; the streams must match and tile the input.

use std::{fs, io::Write, path::Path};

use lexgen::{
    Lexicon, Scanner, Source, Token,
    dev::{generator::gen_valid_source, sample_grammar},
    lexer::tables::{io::encode_bin, load_lexicon_bin_bytes},
};
use rand::{SeedableRng, rngs::StdRng};
use rayon::prelude::*;

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(default)
}

fn lexicons() -> (Lexicon, Lexicon) {
    let built = sample_grammar().build().expect("sample grammar builds");
    let bytes = encode_bin(&built).expect("tables pack to u16");
    let reloaded = load_lexicon_bin_bytes(&bytes).expect("tables reload");
    (built, reloaded)
}

fn first_divergence_idx(a: &[Token<'_>], b: &[Token<'_>]) -> usize {
    let n = a.len().min(b.len());
    (0..n).find(|&i| a[i] != b[i]).unwrap_or(n)
}

fn slice_preview(src: &str, start: usize, len: usize) -> String {
    let bytes = src.as_bytes();
    let end = start.saturating_add(len).min(bytes.len());
    let s = &bytes[start.min(end)..end];
    let head = 10usize.min(s.len());
    let tail = 10usize.min(s.len().saturating_sub(head));
    if s.len() <= head + tail {
        String::from_utf8_lossy(s).into_owned()
    } else {
        format!(
            "{}…(+{})…{}",
            String::from_utf8_lossy(&s[..head]),
            s.len() - head - tail,
            String::from_utf8_lossy(&s[s.len() - tail..])
        )
    }
}

fn dump_near(src: &str, a: &[Token<'_>], b: &[Token<'_>], from: usize) {
    let lo = from.saturating_sub(1);
    let hi = (from + 3).min(a.len().max(b.len()));
    eprintln!("--- context tokens [{lo}..{hi}) ---");
    for i in lo..hi {
        let x = a
            .get(i)
            .map(|t| (t.id, t.offset, t.length, slice_preview(src, t.offset, t.length)));
        let y = b
            .get(i)
            .map(|t| (t.id, t.offset, t.length, slice_preview(src, t.offset, t.length)));
        let mark = if x == y { "ok" } else { "XX" };
        eprintln!("{mark} #{i:06} built={x:?}  reloaded={y:?}");
    }
}

fn save_case(dir: &str, tag: &str, target_len: usize, seed: u64, src: &str) -> String {
    let _ = fs::create_dir_all(dir);
    let base = format!("{tag}_len{target_len}_seed{seed}_n{}.txt", src.len());
    let path = Path::new(dir).join(base);
    fs::write(&path, src.as_bytes()).ok();

    let meta = serde_json::json!({
        "target_len": target_len,
        "actual_bytes": src.len(),
        "seed": seed,
        "replay": format!("FUZZ_INPUT={} cargo run --bin fuzz_lex", path.display()),
    });
    if let Ok(mut f) = fs::File::create(path.with_extension("json")) {
        let _ = writeln!(f, "{meta:#}");
    }
    path.display().to_string()
}

fn assert_tokens_equal_or_dump(
    src: &str,
    a: &[Token<'_>],
    b: &[Token<'_>],
    target: usize,
    seed: u64,
) {
    let i = first_divergence_idx(a, b);
    if i < a.len().max(b.len()) {
        let case_path = save_case("fuzz-cases", "size_sweep_fail", target, seed, src);
        eprintln!(
            "[size_sweep] target_len={target} actual_len={} token {i} mismatch (built={} reloaded={})\n  saved: {case_path}",
            src.len(),
            a.len(),
            b.len(),
        );
        dump_near(src, a, b, i);
        panic!("token mismatch");
    }

    let mut at = 0;
    for (i, t) in a.iter().enumerate() {
        if t.offset != at || t.length == 0 {
            let case_path = save_case("fuzz-cases", "size_sweep_gap", target, seed, src);
            eprintln!("[size_sweep] token {i} does not continue at byte {at}\n  saved: {case_path}");
            dump_near(src, a, b, i);
            panic!("tokens do not tile the input");
        }
        at += t.length;
    }
    assert_eq!(at, src.len(), "tokens stop short of the end");
}

fn scan<'a>(lexicon: &'a Lexicon, source: &'a Source) -> Vec<Token<'a>> {
    Scanner::with(lexicon, source)
        .tokens()
        .collect::<Result<_, _>>()
        .expect("scanner configured")
}

fn run_one(lexicons: &(Lexicon, Lexicon), target_len: usize, seed: u64) {
    // Derive a per-length seed for reproducibility across iterations.
    let mut rng =
        StdRng::seed_from_u64(seed ^ (target_len as u64).wrapping_mul(0x9E3779B97F4A7C15));
    let src = gen_valid_source(&mut rng, target_len);
    assert!(src.len() >= target_len);

    let source = Source::from(src.as_str());
    let a = scan(&lexicons.0, &source);
    let b = scan(&lexicons.1, &source);
    assert_tokens_equal_or_dump(&src, &a, &b, target_len, seed);
}

/// Sweep 0..=31 target lengths. (Fast; runs by default.)
#[test]
fn size_sweep_small_targets() {
    let lexicons = lexicons();
    let seed = env_u64("SIZE_SWEEP_SEED", 42);
    for len in 0..=31 {
        run_one(&lexicons, len, seed);
    }
}

/// Powers of two from 32 up to ~10,000,000 (capped by SIZE_SWEEP_MAX),
/// scanned in parallel against the shared tables.
#[test]
#[ignore]
fn size_sweep_powers_of_two() {
    let lexicons = lexicons();
    let seed = env_u64("SIZE_SWEEP_SEED", 42);
    let max_len = env_usize("SIZE_SWEEP_MAX", 10_000_000);

    let sizes: Vec<usize> = std::iter::successors(Some(32usize), |n| n.checked_mul(2))
        .take_while(|&n| n <= max_len)
        .collect();
    sizes.par_iter().for_each(|&n| {
        run_one(&lexicons, n, seed);
        eprintln!("[size_sweep] ok: target_len={n} (actual_len will be >= target)");
    });
}
