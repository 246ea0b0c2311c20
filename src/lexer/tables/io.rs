// src/lexer/tables/io.rs
use std::{
    io::{BufWriter, Write},
    time::Instant,
};

use anyhow::{Context, Result, anyhow, bail, ensure};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use super::{
    Lexicon, State,
    tokens::{DISPATCH_STATE, StateId, TokenId},
};

// -------------------- JSON (de)serialization --------------------

#[serde_as]
#[derive(Serialize, Deserialize)]
struct StateDisk {
    accept: Option<TokenId>,
    #[serde_as(as = "[_; 256]")]
    next: [StateId; 256],
}

#[derive(Serialize, Deserialize)]
struct LexiconDisk {
    tokens: Vec<String>,
    contexts: Vec<String>,
    dispatch: Vec<StateId>,
    states: Vec<StateDisk>,
}

impl From<&Lexicon> for LexiconDisk {
    fn from(l: &Lexicon) -> Self {
        Self {
            tokens: l.tokens.clone(),
            contexts: l.contexts.clone(),
            dispatch: l.dispatch.clone(),
            states: l
                .states
                .iter()
                .map(|s| StateDisk {
                    accept: s.accept,
                    next: s.next,
                })
                .collect(),
        }
    }
}

impl LexiconDisk {
    fn into_lexicon(self) -> Result<Lexicon> {
        let lexicon = Lexicon {
            tokens: self.tokens,
            contexts: self.contexts,
            dispatch: self.dispatch,
            states: self
                .states
                .into_iter()
                .map(|s| State {
                    accept: s.accept,
                    next: s.next,
                })
                .collect(),
        };
        validate(&lexicon)?;
        Ok(lexicon)
    }
}

/// Rejects tables a scanner could trip over: dangling state ids, unknown
/// tokens, a dispatch state with byte moves, a context without start state.
fn validate(l: &Lexicon) -> Result<()> {
    let n_states = l.states.len();
    ensure!(n_states > 0, "missing dispatch state");
    ensure!(!l.contexts.is_empty(), "missing default context");
    ensure!(
        l.dispatch.len() == l.contexts.len(),
        "{} contexts but {} start states",
        l.contexts.len(),
        l.dispatch.len()
    );
    for &s in &l.dispatch {
        ensure!(
            s != DISPATCH_STATE && (s as usize) < n_states,
            "start state {s} out of range"
        );
    }
    ensure!(
        l.states[0].accept.is_none() && l.states[0].next.iter().all(|&t| t == DISPATCH_STATE),
        "dispatch state must not accept or move on bytes"
    );
    for (i, s) in l.states.iter().enumerate() {
        if let Some(a) = s.accept {
            ensure!(
                a >= 1 && (a as usize) <= l.tokens.len(),
                "state {i} accepts unknown token {a}"
            );
        }
        ensure!(s.next[0] == DISPATCH_STATE, "state {i} moves on byte 0");
        if let Some(t) = s.next.iter().find(|&&t| t as usize >= n_states) {
            bail!("state {i} moves to unknown state {t}");
        }
    }
    Ok(())
}

pub fn save_lexicon_json(path: &std::path::Path, l: &Lexicon) -> std::io::Result<()> {
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer(&mut w, &LexiconDisk::from(l))?;
    w.flush()
}

pub fn load_lexicon_json_bytes(data: &[u8]) -> Result<Lexicon> {
    serde_json::from_slice::<LexiconDisk>(data)
        .context("failed to parse lexicon JSON")?
        .into_lexicon()
}

// -------------------- Compact binary (u16 packing) --------------------

const BIN_MAGIC: &[u8; 8] = b"LXLEXI01";

pub fn save_lexicon_bin(path: &std::path::Path, l: &Lexicon) -> std::io::Result<()> {
    let instant = Instant::now();
    let bytes = encode_bin(l)?;
    std::fs::write(path, &bytes)?;
    log::debug!(
        "saved {} bytes of tables to {} in {} ms",
        bytes.len(),
        path.display(),
        instant.elapsed().as_millis()
    );
    Ok(())
}

/// Binary image of `l`; fails when state ids do not fit in `u16`.
pub fn encode_bin(l: &Lexicon) -> std::io::Result<Vec<u8>> {
    if l.states.len() > u16::MAX as usize {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{} states exceed u16::MAX; cannot pack to u16", l.states.len()),
        ));
    }

    let mut w = Vec::with_capacity(8 + 12 + l.states.len() * (4 + 256 * 2));

    // Header
    w.write_all(BIN_MAGIC)?;
    w.write_all(&(l.tokens.len() as u32).to_le_bytes())?;
    w.write_all(&(l.contexts.len() as u32).to_le_bytes())?;
    w.write_all(&(l.states.len() as u32).to_le_bytes())?;

    for name in l.tokens.iter().chain(l.contexts.iter()) {
        w.write_all(&(name.len() as u32).to_le_bytes())?;
        w.write_all(name.as_bytes())?;
    }
    for &s in &l.dispatch {
        w.write_all(&s.to_le_bytes())?;
    }

    // states: accept (0 = none) + 256 x u16
    for s in &l.states {
        w.write_all(&s.accept.unwrap_or(0).to_le_bytes())?;
        let mut row = [0u8; 256 * 2];
        for (i, &to) in s.next.iter().enumerate() {
            let p = i * 2;
            row[p..p + 2].copy_from_slice(&(to as u16).to_le_bytes());
        }
        w.write_all(&row)?;
    }
    Ok(w)
}

fn take<'d>(buf: &mut &'d [u8], n: usize, what: &str) -> Result<&'d [u8]> {
    if buf.len() < n {
        return Err(anyhow!("truncated {what}"));
    }
    let (head, rest) = buf.split_at(n);
    *buf = rest;
    Ok(head)
}

fn take_u32(buf: &mut &[u8], what: &str) -> Result<u32> {
    let mut le = [0u8; 4];
    le.copy_from_slice(take(buf, 4, what)?);
    Ok(u32::from_le_bytes(le))
}

fn take_name(buf: &mut &[u8]) -> Result<String> {
    let len = take_u32(buf, "name length")? as usize;
    let raw = take(buf, len, "name")?;
    String::from_utf8(raw.to_vec()).context("name is not UTF-8")
}

pub fn load_lexicon_bin_bytes(mut data: &[u8]) -> Result<Lexicon> {
    let magic = take(&mut data, 8, "magic")?;
    ensure!(magic == BIN_MAGIC, "bad magic in lexicon .bin");

    let n_tokens = take_u32(&mut data, "token count")? as usize;
    let n_contexts = take_u32(&mut data, "context count")? as usize;
    let n_states = take_u32(&mut data, "state count")? as usize;

    let tokens = (0..n_tokens)
        .map(|_| take_name(&mut data))
        .collect::<Result<Vec<_>>>()?;
    let contexts = (0..n_contexts)
        .map(|_| take_name(&mut data))
        .collect::<Result<Vec<_>>>()?;
    let dispatch = (0..n_contexts)
        .map(|_| take_u32(&mut data, "dispatch"))
        .collect::<Result<Vec<_>>>()?;

    let mut states = Vec::with_capacity(n_states.min(data.len() / (4 + 512) + 1));
    for _ in 0..n_states {
        let accept = take_u32(&mut data, "accept")? as TokenId;
        let row = take(&mut data, 256 * 2, "transition row")?;
        let mut next = [DISPATCH_STATE; 256];
        for (i, to) in next.iter_mut().enumerate() {
            *to = u16::from_le_bytes([row[i * 2], row[i * 2 + 1]]) as StateId;
        }
        states.push(State {
            accept: (accept != 0).then_some(accept),
            next,
        });
    }
    ensure!(data.is_empty(), "{} trailing bytes after tables", data.len());

    let lexicon = Lexicon {
        tokens,
        contexts,
        dispatch,
        states,
    };
    validate(&lexicon)?;
    Ok(lexicon)
}
