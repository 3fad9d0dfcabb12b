// Bit packing between bytes and sextets.
//
// Three bytes form a 24-bit big-endian word that is sliced into four 6-bit
// sextets, most-significant first. A trailing group of one or two bytes is
// zero-extended to 24 bits and only the sextets that carry real bits are
// kept: 2 for one byte, 3 for two bytes.

/// Mask for a single sextet.
pub const SEXTET_MASK: u32 = 0x3F;

/// Bytes carried by one full group.
pub const BYTES_PER_GROUP: usize = 3;

/// Symbols in one group (full or padded).
pub const SYMBOLS_PER_GROUP: usize = 4;

#[inline]
const fn word_from_bytes(b0: u8, b1: u8, b2: u8) -> u32 {
    ((b0 as u32) << 16) | ((b1 as u32) << 8) | b2 as u32
}

#[inline]
const fn word_from_sextets(s0: u8, s1: u8, s2: u8, s3: u8) -> u32 {
    ((s0 as u32 & SEXTET_MASK) << 18)
        | ((s1 as u32 & SEXTET_MASK) << 12)
        | ((s2 as u32 & SEXTET_MASK) << 6)
        | (s3 as u32 & SEXTET_MASK)
}

#[inline]
const fn sextet(word: u32, pos: u32) -> u8 {
    ((word >> (18 - 6 * pos)) & SEXTET_MASK) as u8
}

#[inline]
const fn byte(word: u32, pos: u32) -> u8 {
    (word >> (16 - 8 * pos)) as u8
}

/// Split three bytes into four sextets (`s0` = bits 23..18).
#[inline]
pub const fn pack_triplet(b0: u8, b1: u8, b2: u8) -> [u8; 4] {
    let word = word_from_bytes(b0, b1, b2);
    [
        sextet(word, 0),
        sextet(word, 1),
        sextet(word, 2),
        sextet(word, 3),
    ]
}

/// Reassemble four sextets into three bytes. Bits above the low six of each
/// input are ignored.
#[inline]
pub const fn unpack_quadruplet(s0: u8, s1: u8, s2: u8, s3: u8) -> [u8; 3] {
    let word = word_from_sextets(s0, s1, s2, s3);
    [byte(word, 0), byte(word, 1), byte(word, 2)]
}

/// Sextets for a single trailing byte.
#[inline]
pub const fn pack_one(b0: u8) -> [u8; 2] {
    let word = word_from_bytes(b0, 0, 0);
    [sextet(word, 0), sextet(word, 1)]
}

/// Inverse of [`pack_one`]; the low four bits of `s1` are zero-extension
/// and are dropped.
#[inline]
pub const fn unpack_one(s0: u8, s1: u8) -> u8 {
    byte(word_from_sextets(s0, s1, 0, 0), 0)
}

/// Sextets for two trailing bytes.
#[inline]
pub const fn pack_two(b0: u8, b1: u8) -> [u8; 3] {
    let word = word_from_bytes(b0, b1, 0);
    [sextet(word, 0), sextet(word, 1), sextet(word, 2)]
}

/// Inverse of [`pack_two`]; the low two bits of `s2` are dropped.
#[inline]
pub const fn unpack_two(s0: u8, s1: u8, s2: u8) -> [u8; 2] {
    let word = word_from_sextets(s0, s1, s2, 0);
    [byte(word, 0), byte(word, 1)]
}

/// Number of data sextets needed for a trailing remainder of `bytes` (0..=2).
#[inline]
pub const fn remainder_sextets(bytes: usize) -> usize {
    match bytes {
        0 => 0,
        1 => 2,
        _ => 3,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
