// Hexagram encoder: bytes -> symbol string.
//
// Input is consumed three bytes at a time. Each full triplet becomes four
// data symbols; a trailing remainder of one or two bytes becomes two or
// three data symbols followed by padding up to a whole group.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::alphabet::Alphabet;
use super::packer::{BYTES_PER_GROUP, SYMBOLS_PER_GROUP, pack_one, pack_triplet, pack_two};

/// Triplets handed to one rayon task.
#[cfg(feature = "parallel")]
const PARALLEL_CHUNK: usize = BYTES_PER_GROUP * 16 * 1024;

/// Number of symbols produced for `len` input bytes.
#[inline]
pub const fn encoded_len(len: usize) -> usize {
    len.div_ceil(BYTES_PER_GROUP) * SYMBOLS_PER_GROUP
}

/// Encode `data` with the hexagram alphabet.
///
/// ```
/// assert_eq!(ichingcode::encode(&[0, 0, 0]), "䷀䷀䷀䷀");
/// assert_eq!(ichingcode::encode(b""), "");
/// ```
pub fn encode(data: &[u8]) -> String {
    encode_with(Alphabet::iching(), data)
}

/// Encode `data` with a caller-supplied alphabet.
pub fn encode_with(alphabet: &Alphabet, data: &[u8]) -> String {
    if data.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(encoded_len(data.len()) * alphabet.width());
    let triplets = data.chunks_exact(BYTES_PER_GROUP);
    let tail = triplets.remainder();
    for t in triplets {
        push_triplet(alphabet, &mut out, t);
    }
    push_tail(alphabet, &mut out, tail);

    debug_assert_eq!(out.len(), encoded_len(data.len()) * alphabet.width());
    log::debug!(
        "encode: {} bytes -> {} symbols ({} trailing)",
        data.len(),
        encoded_len(data.len()),
        tail.len()
    );
    out
}

/// Like [`encode_with`], splitting whole groups across the rayon pool.
/// Output is identical to the sequential encoder.
#[cfg(feature = "parallel")]
pub fn encode_parallel(alphabet: &Alphabet, data: &[u8]) -> String {
    if data.len() <= PARALLEL_CHUNK {
        return encode_with(alphabet, data);
    }

    let whole = data.len() - data.len() % BYTES_PER_GROUP;
    let (body, tail) = data.split_at(whole);
    let parts: Vec<String> = body
        .par_chunks(PARALLEL_CHUNK)
        .map(|chunk| {
            let mut s = String::with_capacity(encoded_len(chunk.len()) * alphabet.width());
            for t in chunk.chunks_exact(BYTES_PER_GROUP) {
                push_triplet(alphabet, &mut s, t);
            }
            s
        })
        .collect();

    let mut out = String::with_capacity(encoded_len(data.len()) * alphabet.width());
    for part in &parts {
        out.push_str(part);
    }
    push_tail(alphabet, &mut out, tail);
    log::debug!(
        "encode_parallel: {} bytes in {} chunks",
        data.len(),
        parts.len()
    );
    out
}

#[inline]
fn push_triplet(alphabet: &Alphabet, out: &mut String, t: &[u8]) {
    for s in pack_triplet(t[0], t[1], t[2]) {
        out.push_str(alphabet.symbol_at(s));
    }
}

fn push_tail(alphabet: &Alphabet, out: &mut String, tail: &[u8]) {
    match *tail {
        [] => {}
        [b0] => {
            for s in pack_one(b0) {
                out.push_str(alphabet.symbol_at(s));
            }
            out.push_str(alphabet.pad());
            out.push_str(alphabet.pad());
        }
        [b0, b1] => {
            for s in pack_two(b0, b1) {
                out.push_str(alphabet.symbol_at(s));
            }
            out.push_str(alphabet.pad());
        }
        _ => unreachable!("remainder of chunks_exact(3) is at most 2 bytes"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::alphabet::{HEXAGRAMS, TRIGRAMS};

    fn symbols(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn empty_input_is_empty_string() {
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn zero_triplet_is_four_first_hexagrams() {
        let s = encode(&[0, 0, 0]);
        assert_eq!(s, HEXAGRAMS[0].repeat(4));
    }

    #[test]
    fn single_ff_byte() {
        let s = encode(&[0xFF]);
        let expected = [HEXAGRAMS[63], HEXAGRAMS[48], TRIGRAMS[0], TRIGRAMS[0]].concat();
        assert_eq!(s, expected);
    }

    #[test]
    fn two_byte_tail_gets_one_pad() {
        let s = encode(&[0x01, 0x02]);
        let expected = [HEXAGRAMS[0], HEXAGRAMS[16], HEXAGRAMS[8], TRIGRAMS[0]].concat();
        assert_eq!(s, expected);
    }

    #[test]
    fn symbol_count_matches_encoded_len() {
        for n in 0..32 {
            let data: Vec<u8> = (0..n as u8).collect();
            assert_eq!(symbols(&encode(&data)).len(), encoded_len(n));
        }
    }

    #[test]
    fn padding_count_follows_remainder() {
        let pad = TRIGRAMS[0].chars().next().unwrap();
        for n in 1..20usize {
            let s = encode(&vec![0xA5; n]);
            let pads = symbols(&s).iter().rev().take_while(|&&c| c == pad).count();
            let expected = match n % 3 {
                0 => 0,
                1 => 2,
                _ => 1,
            };
            assert_eq!(pads, expected, "n={n}");
        }
    }

    #[test]
    fn groups_concatenate_in_input_order() {
        let a = encode(&[1, 2, 3]);
        let b = encode(&[4, 5, 6]);
        assert_eq!(encode(&[1, 2, 3, 4, 5, 6]), format!("{a}{b}"));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_sequential() {
        let alphabet = Alphabet::iching();
        for n in [0, 1, PARALLEL_CHUNK, PARALLEL_CHUNK + 1, 3 * PARALLEL_CHUNK + 2] {
            let data: Vec<u8> = (0..n).map(|i| (i * 31 % 251) as u8).collect();
            assert_eq!(
                encode_parallel(alphabet, &data),
                encode_with(alphabet, &data),
                "n={n}"
            );
        }
    }
}
