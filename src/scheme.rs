// Text scheme selection: hexagrams or plain base64.
//
// The base64 scheme is a passthrough to the `base64` crate's standard
// padded alphabet, kept so callers can switch representations without
// changing the surrounding I/O code.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::codec::{self, Alphabet, DecodeError};

/// Text representation used for encoded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    /// 64 hexagrams with trigram padding.
    #[default]
    Iching,
    /// RFC 4648 standard base64 with `=` padding.
    Base64,
}

/// Error from [`Scheme::decode`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemeError {
    #[error(transparent)]
    Iching(#[from] DecodeError),
    #[error("base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl Scheme {
    pub fn name(self) -> &'static str {
        match self {
            Self::Iching => "iching",
            Self::Base64 => "base64",
        }
    }

    pub fn encode(self, data: &[u8]) -> String {
        match self {
            Self::Iching => codec::encode(data),
            Self::Base64 => STANDARD.encode(data),
        }
    }

    /// Decode `text`, given as raw bytes so file contents need no UTF-8
    /// validation pass.
    pub fn decode(self, text: &[u8]) -> Result<Vec<u8>, SchemeError> {
        match self {
            Self::Iching => Ok(codec::decode_bytes(Alphabet::iching(), text)?),
            Self::Base64 => Ok(STANDARD.decode(text)?),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
