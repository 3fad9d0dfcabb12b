// Symbol tables for the hexagram codec.
//
// An alphabet is two disjoint ordered tables: 64 data symbols (one per
// sextet value) and 8 padding symbols (index 0 fills an empty slot in the
// final group). Every symbol in both tables has the same UTF-8 byte width,
// which is what lets the decoder split a string into symbols by length.

use std::collections::HashMap;
use std::sync::LazyLock;

use thiserror::Error;

/// Number of data symbols (one per 6-bit value).
pub const DATA_SYMBOLS: usize = 64;

/// Number of padding symbols.
pub const PADDING_SYMBOLS: usize = 8;

/// The 64 I Ching hexagrams, U+4DC0..=U+4DFF in code-point order.
pub const HEXAGRAMS: [&str; DATA_SYMBOLS] = [
    "䷀", "䷁", "䷂", "䷃", "䷄", "䷅", "䷆", "䷇",
    "䷈", "䷉", "䷊", "䷋", "䷌", "䷍", "䷎", "䷏",
    "䷐", "䷑", "䷒", "䷓", "䷔", "䷕", "䷖", "䷗",
    "䷘", "䷙", "䷚", "䷛", "䷜", "䷝", "䷞", "䷟",
    "䷠", "䷡", "䷢", "䷣", "䷤", "䷥", "䷦", "䷧",
    "䷨", "䷩", "䷪", "䷫", "䷬", "䷭", "䷮", "䷯",
    "䷰", "䷱", "䷲", "䷳", "䷴", "䷵", "䷶", "䷷",
    "䷸", "䷹", "䷺", "䷻", "䷼", "䷽", "䷾", "䷿",
];

/// The 8 trigrams, U+2630..=U+2637. `☰` is the padding marker.
pub const TRIGRAMS: [&str; PADDING_SYMBOLS] = [
    "☰", "☱", "☲", "☳", "☴", "☵", "☶", "☷",
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A symbol was looked up in a table it does not belong to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("symbol {symbol:?} is not in the data alphabet")]
pub struct SymbolNotFound {
    /// The offending symbol (lossy if it was not valid UTF-8).
    pub symbol: String,
}

/// Rejected alphabet definition.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlphabetError {
    #[error("symbol at {table} index {index} is empty")]
    EmptySymbol { table: &'static str, index: usize },
    #[error("symbol {symbol:?} is {actual} bytes wide, expected {expected}")]
    MixedWidth {
        symbol: String,
        expected: usize,
        actual: usize,
    },
    #[error("symbol {0:?} appears more than once in the same table")]
    Duplicate(String),
    #[error("symbol {0:?} appears in both the data and padding tables")]
    Collision(String),
}

// ---------------------------------------------------------------------------
// Alphabet
// ---------------------------------------------------------------------------

/// A validated pair of data and padding tables.
#[derive(Debug, Clone)]
pub struct Alphabet {
    data: [&'static str; DATA_SYMBOLS],
    padding: [&'static str; PADDING_SYMBOLS],
    width: usize,
    data_index: HashMap<&'static [u8], u8>,
    padding_index: HashMap<&'static [u8], u8>,
}

static ICHING: LazyLock<Alphabet> = LazyLock::new(|| {
    Alphabet::new(HEXAGRAMS, TRIGRAMS).expect("hexagram and trigram tables are disjoint")
});

impl Alphabet {
    /// Build an alphabet, checking width, uniqueness and disjointness.
    pub fn new(
        data: [&'static str; DATA_SYMBOLS],
        padding: [&'static str; PADDING_SYMBOLS],
    ) -> Result<Self, AlphabetError> {
        let width = data[0].len();
        if width == 0 {
            return Err(AlphabetError::EmptySymbol {
                table: "data",
                index: 0,
            });
        }

        let data_index = build_index("data", &data, width)?;
        let padding_index = build_index("padding", &padding, width)?;

        if let Some(shared) = padding.iter().find(|s| data_index.contains_key(s.as_bytes())) {
            return Err(AlphabetError::Collision((*shared).to_string()));
        }

        Ok(Self {
            data,
            padding,
            width,
            data_index,
            padding_index,
        })
    }

    /// The reference hexagram/trigram alphabet, built once per process.
    pub fn iching() -> &'static Alphabet {
        &ICHING
    }

    /// Byte width of every symbol.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Data symbol for a sextet. Panics if `index >= 64`.
    #[inline]
    pub fn symbol_at(&self, index: u8) -> &'static str {
        self.data[usize::from(index)]
    }

    /// Padding symbol at `index`. Panics if `index >= 8`.
    #[inline]
    pub fn padding_at(&self, index: u8) -> &'static str {
        self.padding[usize::from(index)]
    }

    /// The canonical empty-slot marker (padding index 0).
    #[inline]
    pub fn pad(&self) -> &'static str {
        self.padding[0]
    }

    /// Sextet value of a data symbol.
    pub fn index_of(&self, symbol: impl AsRef<[u8]>) -> Result<u8, SymbolNotFound> {
        let symbol = symbol.as_ref();
        self.data_index
            .get(symbol)
            .copied()
            .ok_or_else(|| SymbolNotFound {
                symbol: String::from_utf8_lossy(symbol).into_owned(),
            })
    }

    pub fn padding_index_of(&self, symbol: impl AsRef<[u8]>) -> Option<u8> {
        self.padding_index.get(symbol.as_ref()).copied()
    }

    #[inline]
    pub fn is_padding(&self, symbol: impl AsRef<[u8]>) -> bool {
        self.padding_index.contains_key(symbol.as_ref())
    }
}

fn build_index<const N: usize>(
    name: &'static str,
    table: &[&'static str; N],
    width: usize,
) -> Result<HashMap<&'static [u8], u8>, AlphabetError> {
    let mut index = HashMap::with_capacity(N);
    for (i, symbol) in table.iter().enumerate() {
        if symbol.is_empty() {
            return Err(AlphabetError::EmptySymbol {
                table: name,
                index: i,
            });
        }
        if symbol.len() != width {
            return Err(AlphabetError::MixedWidth {
                symbol: (*symbol).to_string(),
                expected: width,
                actual: symbol.len(),
            });
        }
        // N <= 64, so the position always fits in a u8.
        if index.insert(symbol.as_bytes(), i as u8).is_some() {
            return Err(AlphabetError::Duplicate((*symbol).to_string()));
        }
    }
    Ok(index)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
