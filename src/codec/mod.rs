// Hexagram binary-to-text codec.
//
// Like base64, but each sextet is written as one of the 64 I Ching
// hexagrams and an incomplete final group is padded with trigrams.
//
// # Modules
//
// - `alphabet` — Data (hexagram) and padding (trigram) tables with lookup
// - `packer`   — Bit packing between byte triplets and sextet quadruplets
// - `encoder`  — Bytes to symbol string
// - `decoder`  — Symbol string to bytes, with structural validation

pub mod alphabet;
pub mod decoder;
pub mod encoder;
pub mod packer;

// Re-export key types for convenience.
pub use alphabet::{Alphabet, AlphabetError, HEXAGRAMS, SymbolNotFound, TRIGRAMS};
pub use decoder::{DecodeError, Layout, decode, decode_bytes, decode_with, inspect};
pub use encoder::{encode, encode_with, encoded_len};

#[cfg(feature = "parallel")]
pub use decoder::decode_parallel;
#[cfg(feature = "parallel")]
pub use encoder::encode_parallel;
