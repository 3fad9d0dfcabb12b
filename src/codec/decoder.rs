// Hexagram decoder: symbol string -> bytes.
//
// The input is first checked structurally (`inspect`): it must be a whole
// number of fixed-width symbols, the symbol count must be a multiple of 4,
// and at most 2 padding symbols may close it. Only then is the output
// buffer allocated and the groups unpacked. No partial output is returned
// on failure.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use thiserror::Error;

use super::alphabet::{Alphabet, SymbolNotFound};
use super::packer::{
    BYTES_PER_GROUP, SYMBOLS_PER_GROUP, remainder_sextets, unpack_one, unpack_quadruplet,
    unpack_two,
};

/// Most padding symbols a valid string can end with.
pub const MAX_PADDING: usize = 2;

/// Groups handed to one rayon task.
#[cfg(feature = "parallel")]
const PARALLEL_GROUPS: usize = 16 * 1024;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a string cannot be decoded.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("input string cannot be empty")]
    EmptyInput,
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),
    #[error("{count} trailing padding symbols, at most 2 allowed")]
    ExcessPadding { count: usize },
    #[error("symbol #{position}: {source}")]
    SymbolNotFound {
        position: usize,
        source: SymbolNotFound,
    },
    /// A write fell outside the precomputed output buffer. Unreachable for
    /// inputs that passed `inspect`.
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(&'static str),
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Shape of an encoded string, derived without decoding any symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Total symbols, data and padding.
    pub symbols: usize,
    /// Trailing padding symbols (0..=2).
    pub padding: usize,
    /// Groups of 4 data symbols, each decoding to 3 bytes.
    pub full_groups: usize,
    /// Bytes carried by the final partial group (0..=2).
    pub remainder_bytes: usize,
}

impl Layout {
    /// Exact length of the decoded output.
    #[inline]
    pub fn decoded_len(&self) -> usize {
        self.full_groups * BYTES_PER_GROUP + self.remainder_bytes
    }

    /// Data symbols in the final partial group (0, 2 or 3).
    #[inline]
    pub fn remainder_symbols(&self) -> usize {
        remainder_sextets(self.remainder_bytes)
    }
}

/// Validate the framing of `raw` and report its layout.
pub fn inspect(alphabet: &Alphabet, raw: &[u8]) -> Result<Layout, DecodeError> {
    if raw.is_empty() {
        return Err(DecodeError::EmptyInput);
    }

    let width = alphabet.width();
    if raw.len() % width != 0 {
        return Err(DecodeError::UnsupportedEncoding(format!(
            "{} bytes is not a whole number of {width}-byte symbols",
            raw.len()
        )));
    }

    let symbols = raw.len() / width;
    if symbols % SYMBOLS_PER_GROUP != 0 {
        return Err(DecodeError::UnsupportedEncoding(format!(
            "{symbols} symbols is not a multiple of {SYMBOLS_PER_GROUP}"
        )));
    }

    let padding = raw
        .rchunks_exact(width)
        .take_while(|sym| alphabet.is_padding(sym))
        .count();
    if padding > MAX_PADDING {
        return Err(DecodeError::ExcessPadding { count: padding });
    }

    // 2 pads leave 2 data symbols (1 byte); 1 pad leaves 3 (2 bytes).
    let remainder_bytes = match padding {
        0 => 0,
        1 => 2,
        _ => 1,
    };
    let layout = Layout {
        symbols,
        padding,
        full_groups: (symbols - padding) / SYMBOLS_PER_GROUP,
        remainder_bytes,
    };
    log::trace!("inspect: {layout:?}");
    Ok(layout)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a hexagram string.
///
/// ```
/// assert_eq!(ichingcode::decode("䷿䷰☰☰").unwrap(), [0xFF]);
/// assert!(ichingcode::decode("").is_err());
/// ```
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    decode_bytes(Alphabet::iching(), text.as_bytes())
}

/// Decode a string encoded with `alphabet`.
pub fn decode_with(alphabet: &Alphabet, text: &str) -> Result<Vec<u8>, DecodeError> {
    decode_bytes(alphabet, text.as_bytes())
}

/// Decode raw UTF-8 bytes without validating them as a `str` first. A chunk
/// that is not a whole symbol fails with [`DecodeError::SymbolNotFound`].
pub fn decode_bytes(alphabet: &Alphabet, raw: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let layout = inspect(alphabet, raw)?;
    let body_len = layout.full_groups * SYMBOLS_PER_GROUP * alphabet.width();

    let mut out = vec![0u8; layout.decoded_len()];
    decode_groups(alphabet, &raw[..body_len], 0, &mut out)?;
    decode_tail(alphabet, &raw[body_len..], &layout, &mut out)?;

    log::debug!(
        "decode: {} symbols ({} padding) -> {} bytes",
        layout.symbols,
        layout.padding,
        out.len()
    );
    Ok(out)
}

/// Like [`decode_bytes`], unpacking full groups across the rayon pool.
///
/// Output is identical to the sequential decoder. When several groups hold
/// unknown symbols, which one is reported is unspecified.
#[cfg(feature = "parallel")]
pub fn decode_parallel(alphabet: &Alphabet, raw: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let layout = inspect(alphabet, raw)?;
    if layout.full_groups <= PARALLEL_GROUPS {
        return decode_bytes(alphabet, raw);
    }

    let group_width = SYMBOLS_PER_GROUP * alphabet.width();
    let body_len = layout.full_groups * group_width;
    let mut out = vec![0u8; layout.decoded_len()];
    let (body_out, _) = out.split_at_mut(layout.full_groups * BYTES_PER_GROUP);

    body_out
        .par_chunks_mut(PARALLEL_GROUPS * BYTES_PER_GROUP)
        .zip(raw[..body_len].par_chunks(PARALLEL_GROUPS * group_width))
        .enumerate()
        .try_for_each(|(i, (dst, src))| {
            decode_groups(alphabet, src, i * PARALLEL_GROUPS * SYMBOLS_PER_GROUP, dst)
        })?;
    decode_tail(alphabet, &raw[body_len..], &layout, &mut out)?;

    log::debug!(
        "decode_parallel: {} symbols -> {} bytes",
        layout.symbols,
        out.len()
    );
    Ok(out)
}

/// Unpack whole groups from `body` into `out`. `first` is the symbol
/// position of `body[0]`, used for error reporting.
fn decode_groups(
    alphabet: &Alphabet,
    body: &[u8],
    first: usize,
    out: &mut [u8],
) -> Result<(), DecodeError> {
    let width = alphabet.width();
    for (g, group) in body.chunks_exact(SYMBOLS_PER_GROUP * width).enumerate() {
        let mut s = [0u8; SYMBOLS_PER_GROUP];
        for (i, sym) in group.chunks_exact(width).enumerate() {
            s[i] = lookup(alphabet, sym, first + g * SYMBOLS_PER_GROUP + i)?;
        }
        write_at(out, g * BYTES_PER_GROUP, &unpack_quadruplet(s[0], s[1], s[2], s[3]))?;
    }
    Ok(())
}

/// Unpack the partial final group, if any. `tail` starts right after the
/// last full group and still includes the padding.
fn decode_tail(
    alphabet: &Alphabet,
    tail: &[u8],
    layout: &Layout,
    out: &mut [u8],
) -> Result<(), DecodeError> {
    if layout.remainder_bytes == 0 {
        return Ok(());
    }

    let width = alphabet.width();
    let first = layout.full_groups * SYMBOLS_PER_GROUP;
    let at = layout.full_groups * BYTES_PER_GROUP;
    let data = tail
        .get(..layout.remainder_symbols() * width)
        .ok_or(DecodeError::InternalInconsistency("partial group shorter than layout"))?;

    let mut s = [0u8; 3];
    for (i, sym) in data.chunks_exact(width).enumerate() {
        s[i] = lookup(alphabet, sym, first + i)?;
    }
    match layout.remainder_bytes {
        1 => write_at(out, at, &[unpack_one(s[0], s[1])]),
        _ => write_at(out, at, &unpack_two(s[0], s[1], s[2])),
    }
}

#[inline]
fn lookup(alphabet: &Alphabet, sym: &[u8], position: usize) -> Result<u8, DecodeError> {
    alphabet
        .index_of(sym)
        .map_err(|source| DecodeError::SymbolNotFound { position, source })
}

#[inline]
fn write_at(out: &mut [u8], at: usize, bytes: &[u8]) -> Result<(), DecodeError> {
    out.get_mut(at..at + bytes.len())
        .ok_or(DecodeError::InternalInconsistency("write past end of output buffer"))?
        .copy_from_slice(bytes);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::alphabet::{HEXAGRAMS, TRIGRAMS};
    use crate::codec::encoder::encode;

    fn hex(indices: &[u8]) -> String {
        indices.iter().map(|&i| HEXAGRAMS[usize::from(i)]).collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(decode(""), Err(DecodeError::EmptyInput));
    }

    #[test]
    fn zero_group() {
        assert_eq!(decode(&hex(&[0, 0, 0, 0])).unwrap(), [0, 0, 0]);
    }

    #[test]
    fn one_and_two_byte_tails() {
        let s = format!("{}{}{}", hex(&[63, 48]), TRIGRAMS[0], TRIGRAMS[0]);
        assert_eq!(decode(&s).unwrap(), [0xFF]);

        let s = format!("{}{}", hex(&[0, 16, 8]), TRIGRAMS[0]);
        assert_eq!(decode(&s).unwrap(), [0x01, 0x02]);
    }

    #[test]
    fn byte_length_not_symbol_aligned() {
        let mut s = hex(&[1, 2, 3, 4]);
        s.push('a');
        assert!(matches!(decode(&s), Err(DecodeError::UnsupportedEncoding(_))));
    }

    #[test]
    fn symbol_count_not_multiple_of_four() {
        assert!(matches!(
            decode(&hex(&[1, 2, 3])),
            Err(DecodeError::UnsupportedEncoding(_))
        ));
        assert!(matches!(
            decode(&hex(&[1, 2, 3, 4, 5])),
            Err(DecodeError::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn three_pads_is_excess() {
        let s = format!("{}{}", hex(&[9]), TRIGRAMS[0].repeat(3));
        assert_eq!(decode(&s), Err(DecodeError::ExcessPadding { count: 3 }));

        let s = TRIGRAMS[0].repeat(4);
        assert_eq!(decode(&s), Err(DecodeError::ExcessPadding { count: 4 }));
    }

    #[test]
    fn any_trigram_counts_as_padding() {
        let s = format!("{}{}{}", hex(&[63, 48]), TRIGRAMS[5], TRIGRAMS[7]);
        assert_eq!(decode(&s).unwrap(), [0xFF]);
    }

    #[test]
    fn stray_padding_before_final_group() {
        let s = format!("{}{}{}", TRIGRAMS[0], hex(&[1, 2, 3]), hex(&[4, 5, 6, 7]));
        assert_eq!(
            decode(&s),
            Err(DecodeError::SymbolNotFound {
                position: 0,
                source: SymbolNotFound {
                    symbol: TRIGRAMS[0].to_string()
                },
            })
        );
    }

    #[test]
    fn foreign_symbol_reports_position() {
        let s = format!("{}{}", hex(&[1, 2, 3, 4, 5, 6]), "☀☀");
        match decode(&s) {
            Err(DecodeError::SymbolNotFound { position, source }) => {
                assert_eq!(position, 6);
                assert_eq!(source.symbol, "☀");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn misaligned_multibyte_chunk_is_not_found() {
        // 12 bytes: "ab" + 3 hexagrams + "c" -> width-aligned but not symbols.
        let s = format!("ab{}c", hex(&[1, 2, 3]));
        assert_eq!(s.len(), 12);
        assert!(matches!(
            decode(&s),
            Err(DecodeError::SymbolNotFound { position: 0, .. })
        ));
    }

    #[test]
    fn layout_reports_shape() {
        let a = Alphabet::iching();
        let l = inspect(a, encode(&[1, 2, 3, 4]).as_bytes()).unwrap();
        assert_eq!(
            l,
            Layout {
                symbols: 8,
                padding: 2,
                full_groups: 1,
                remainder_bytes: 1,
            }
        );
        assert_eq!(l.decoded_len(), 4);
        assert_eq!(l.remainder_symbols(), 2);

        let l = inspect(a, encode(&[1, 2, 3, 4, 5, 6]).as_bytes()).unwrap();
        assert_eq!(l.padding, 0);
        assert_eq!(l.full_groups, 2);
        assert_eq!(l.decoded_len(), 6);
    }

    #[test]
    fn roundtrip_small_lengths() {
        for n in 1..64usize {
            let data: Vec<u8> = (0..n).map(|i| (i * 37 + 11) as u8).collect();
            assert_eq!(decode(&encode(&data)).unwrap(), data, "n={n}");
        }
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            DecodeError::ExcessPadding { count: 3 }.to_string(),
            "3 trailing padding symbols, at most 2 allowed"
        );
        assert_eq!(
            DecodeError::EmptyInput.to_string(),
            "input string cannot be empty"
        );
    }

    #[test]
    fn write_past_buffer_end_is_internal_inconsistency() {
        let mut out = [0u8; 4];
        write_at(&mut out, 1, &[7, 8, 9]).unwrap();
        assert_eq!(out, [0, 7, 8, 9]);

        assert!(matches!(
            write_at(&mut out, 2, &[1, 2, 3]),
            Err(DecodeError::InternalInconsistency(_))
        ));
        assert_eq!(out, [0, 7, 8, 9]);

        // A group decoded into a buffer sized for less than 3 bytes.
        let group = hex(&[1, 2, 3, 4]);
        let mut short = [0u8; 2];
        let err = decode_groups(Alphabet::iching(), group.as_bytes(), 0, &mut short).unwrap_err();
        assert!(matches!(err, DecodeError::InternalInconsistency(_)));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_sequential() {
        let a = Alphabet::iching();
        let n = PARALLEL_GROUPS * BYTES_PER_GROUP * 3 + 1;
        let data: Vec<u8> = (0..n).map(|i| (i % 253) as u8).collect();
        let text = encode(&data);
        assert_eq!(decode_parallel(a, text.as_bytes()).unwrap(), data);

        let mut corrupt = text.into_bytes();
        corrupt[0] = b'x';
        assert!(matches!(
            decode_parallel(a, &corrupt),
            Err(DecodeError::SymbolNotFound { .. })
        ));
    }
}
