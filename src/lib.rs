//! ichingcode: binary-to-text encoding with I Ching hexagrams.
//!
//! Works like base64, except that each 6-bit value is written as one of the
//! 64 hexagrams (U+4DC0..=U+4DFF) and an incomplete final group is padded
//! with the trigram `☰`.
//!
//! The crate provides:
//! - The hexagram codec (`codec`)
//! - Selection between hexagrams and plain base64 (`scheme`)
//! - Reader/writer and file helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! let text = ichingcode::encode(b"hello");
//! assert_eq!(text.chars().count(), 8);
//! assert_eq!(ichingcode::decode(&text).unwrap(), b"hello");
//! ```

pub mod codec;
pub mod io;
pub mod scheme;

#[cfg(feature = "cli")]
pub mod cli;

pub use codec::{Alphabet, DecodeError, decode, encode};
pub use scheme::Scheme;
