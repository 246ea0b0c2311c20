// src/source.rs
// Immutable source text handed to the scanner.

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Source {
    content: Vec<u8>,
    path: Option<PathBuf>,
}

impl Source {
    pub fn from_bytes(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Reads a file, or stdin when `path` is `-`.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if path == Path::new("-") {
            let mut content = Vec::new();
            io::stdin().lock().read_to_end(&mut content)?;
            return Ok(Self::from_bytes(content));
        }
        let content = fs::read(path)?;
        log::debug!("loaded {} bytes from {}", content.len(), path.display());
        Ok(Self::from_bytes(content).with_path(path))
    }

    #[inline]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Self::from_bytes(s.into_bytes())
    }
}
