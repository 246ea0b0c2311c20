// src/dev/generator.rs
// Random sources in the language of `dev::sample_grammar`.

use rand::Rng;

/// Produces at least `target_len` bytes. A fixed trailer closes a block
/// comment that adjacent `/` and `*` operators may have opened.
pub fn gen_valid_source<R: Rng>(rng: &mut R, target_len: usize) -> String {
    let mut out = String::with_capacity(target_len + target_len / 8);

    while out.len() < target_len {
        match rng.random_range(0u32..100) {
            0..=24 => push_ident(rng, &mut out),
            25..=39 => push_int(rng, &mut out),
            40..=54 => push_ws(rng, &mut out),
            55..=61 => push_line_comment(rng, &mut out),
            62..=70 => push_block_comment(rng, &mut out),
            _ => push_operator(rng, &mut out),
        }
    }

    out.push_str("*/ 0\n");
    out
}

fn push_ident<R: Rng>(rng: &mut R, out: &mut String) {
    let len = rng.random_range(1..=12);
    out.push(random_alpha(rng));
    for _ in 1..len {
        if rng.random_bool(0.6) {
            out.push(random_alpha(rng));
        } else {
            out.push(random_digit(rng));
        }
    }
}

fn push_int<R: Rng>(rng: &mut R, out: &mut String) {
    for _ in 0..rng.random_range(1..=8) {
        out.push(random_digit(rng));
    }
}

fn push_ws<R: Rng>(rng: &mut R, out: &mut String) {
    const WS: [char; 4] = [' ', '\t', '\r', '\n'];
    for _ in 0..rng.random_range(1..=8) {
        out.push(WS[rng.random_range(0..WS.len())]);
    }
}

fn push_line_comment<R: Rng>(rng: &mut R, out: &mut String) {
    const BODY: &[u8] =
        b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 +-*/&|![]{}()<>=";
    out.push_str("//");
    for _ in 0..rng.random_range(0..=40) {
        out.push(BODY[rng.random_range(0..BODY.len())] as char);
    }
    out.push('\n');
}

fn push_block_comment<R: Rng>(rng: &mut R, out: &mut String) {
    const BODY: &[u8] =
        b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 +-![]{}()<>=&|";
    out.push_str("/*");
    for _ in 0..rng.random_range(0..=15) {
        for _ in 0..rng.random_range(1..=8) {
            out.push(BODY[rng.random_range(0..BODY.len())] as char);
        }
        if rng.random_bool(0.2) {
            out.push('*');
        }
        if rng.random_bool(0.2) {
            out.push('\n');
        }
    }
    out.push_str("*/");
}

fn push_operator<R: Rng>(rng: &mut R, out: &mut String) {
    const OPS: [&str; 20] = [
        "(", ")", "+", "*", "=", "/", "!", "[", "]", "{", "}", "<", "<=", ">", ">=", "==", "&",
        "&&", "|", "||",
    ];
    out.push_str(OPS[rng.random_range(0..OPS.len())]);
    if rng.random_bool(0.25) {
        out.push(' ');
    }
}

fn random_alpha<R: Rng>(rng: &mut R) -> char {
    const SET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";
    SET[rng.random_range(0..SET.len())] as char
}

fn random_digit<R: Rng>(rng: &mut R) -> char {
    (b'0' + rng.random_range(0..10u8)) as char
}
