// src/regex/charset.rs
// Fixed byte classes and escape tables consulted by the pattern parser.

use serde::{Serialize, Serializer, ser::SerializeSeq};

/// 256-bit set of byte values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ByteSet([u64; 4]);

impl ByteSet {
    pub const EMPTY: ByteSet = ByteSet([0; 4]);

    #[inline]
    pub fn contains(&self, b: u8) -> bool {
        self.0[(b >> 6) as usize] >> (b & 63) & 1 == 1
    }

    #[inline]
    pub fn insert(&mut self, b: u8) {
        self.0[(b >> 6) as usize] |= 1 << (b & 63);
    }

    /// Inserts `lo..=hi`, swapping the bounds when they are reversed.
    pub fn insert_range(&mut self, lo: u8, hi: u8) {
        let (lo, hi) = if hi < lo { (hi, lo) } else { (lo, hi) };
        for b in lo..=hi {
            self.insert(b);
        }
    }

    pub fn union_with(&mut self, other: &ByteSet) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a |= *b;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|w| *w == 0)
    }

    pub fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0u8..=255).filter(move |b| self.contains(*b))
    }

    const fn from_bytes(bytes: &[u8]) -> ByteSet {
        let mut words = [0u64; 4];
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            words[(b >> 6) as usize] |= 1 << (b & 63);
            i += 1;
        }
        ByteSet(words)
    }
}

impl std::fmt::Debug for ByteSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for b in self.iter() {
            write!(f, "{}", std::ascii::escape_default(b))?;
        }
        f.write_str("]")
    }
}

impl Serialize for ByteSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for b in self.iter() {
            seq.serialize_element(&b)?;
        }
        seq.end()
    }
}

pub const DIGIT: ByteSet = ByteSet::from_bytes(b"0123456789");
pub const LOWER: ByteSet = ByteSet::from_bytes(b"abcdefghijklmnopqrstuvwxyz");
pub const UPPER: ByteSet = ByteSet::from_bytes(b"ABCDEFGHIJKLMNOPQRSTUVWXYZ");
pub const PUNCT: ByteSet = ByteSet::from_bytes(b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~");
pub const SPACE: ByteSet = ByteSet::from_bytes(b"\t\n\x0b\x0c\r ");
pub const WORD: ByteSet = ByteSet::from_bytes(
    b"_abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
);

/// Whether a class matches its set or everything outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
}

/// `\n`, `\t`, ... -> the control byte they stand for.
pub fn escape_byte(c: u8) -> Option<u8> {
    Some(match c {
        b'a' => 0x07,
        b'b' => 0x08,
        b'f' => 0x0c,
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        _ => return None,
    })
}

/// Class shorthands (`\d`, `\W`, ...). The upper-case letter negates the
/// class, so `\u` is upper-case letters and `\U` everything else.
pub fn class_shorthand(c: u8) -> Option<(Direction, ByteSet)> {
    use Direction::*;
    Some(match c {
        b'd' => (Positive, DIGIT),
        b'D' => (Negative, DIGIT),
        b'l' => (Positive, LOWER),
        b'L' => (Negative, LOWER),
        b'p' => (Positive, PUNCT),
        b'P' => (Negative, PUNCT),
        b's' => (Positive, SPACE),
        b'S' => (Negative, SPACE),
        b'u' => (Positive, UPPER),
        b'U' => (Negative, UPPER),
        b'w' => (Positive, WORD),
        b'W' => (Negative, WORD),
        _ => return None,
    })
}

#[inline]
pub fn is_operator(c: u8) -> bool {
    matches!(c, b'*' | b'+' | b'?' | b'|' | b'(' | b')')
}
