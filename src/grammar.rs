// src/grammar.rs
// JSON grammar files: an ordered token list plus optional inline source.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    error::BuildError,
    lexer::tables::{Builder, Lexicon},
    regex::compile,
    trace::Trace,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDef {
    pub name: String,
    pub pattern: String,
    /// Empty means the token is reachable in every context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<String>,
}

/// Token order in `tokens` is priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    pub tokens: Vec<TokenDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Grammar {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read grammar {}", path.display()))?;
        Self::from_json_bytes(&data)
            .with_context(|| format!("failed to parse grammar {}", path.display()))
    }

    pub fn from_json_bytes(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn build(&self) -> Result<Lexicon, BuildError> {
        self.build_with(crate::trace::NoTrace)
    }

    /// Compiles every pattern and builds the lexicon, reporting to `trace`.
    pub fn build_with<'t>(&self, trace: impl Trace + 't) -> Result<Lexicon, BuildError> {
        let mut builder = Builder::new().with_trace(trace);
        for def in &self.tokens {
            let regex = compile(&def.pattern).map_err(|source| BuildError::Pattern {
                name: def.name.clone(),
                source,
            })?;
            builder.add_token(&def.name, &regex, &def.contexts)?;
        }
        Ok(builder.build())
    }
}
