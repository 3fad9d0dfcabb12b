// Reader/writer and file helpers around the text schemes.
//
// The codec works on fully materialized buffers, so these helpers read the
// whole input, convert it in one call, and write the result. Optionally
// computes SHA-256 of the binary side (feature-gated behind `file-io`).

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::codec::encoded_len;
use crate::scheme::{Scheme, SchemeError};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by the encode helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeStats {
    /// Binary input size in bytes.
    pub input_size: u64,
    /// Text output size in bytes, including the trailing newline.
    pub output_size: u64,
    /// Symbols written (data and padding).
    pub symbols: u64,
    /// Padding symbols closing the output (0..=2).
    pub padding: u64,
    /// SHA-256 of the binary input (if `file-io` feature is enabled).
    pub input_sha256: Option<[u8; 32]>,
}

/// Statistics returned by the decode helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeStats {
    /// Text input size in bytes, before whitespace trimming.
    pub input_size: u64,
    /// Decoded output size in bytes.
    pub output_size: u64,
    /// Symbols consumed (data and padding).
    pub symbols: u64,
    /// Padding symbols that closed the input.
    pub padding: u64,
    /// SHA-256 of the decoded output (if `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for the I/O helpers.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum IoError {
    /// File open, read or write failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The input text was rejected by the scheme.
    #[error("decode error: {0}")]
    Decode(#[from] SchemeError),
}

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

/// Padding closing a padded base64-style encoding of `len` bytes.
fn padding_for(len: usize) -> u64 {
    match len % 3 {
        0 => 0,
        1 => 2,
        _ => 1,
    }
}

#[cfg(feature = "file-io")]
fn sha256(data: &[u8]) -> Option<[u8; 32]> {
    use sha2::Digest;
    Some(sha2::Sha256::digest(data).into())
}

#[cfg(not(feature = "file-io"))]
fn sha256(_data: &[u8]) -> Option<[u8; 32]> {
    None
}

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

/// Read all of `reader`, encode it and write the text plus a newline.
pub fn encode_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    scheme: Scheme,
) -> Result<EncodeStats, IoError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let text = scheme.encode(&data);
    writer.write_all(text.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    log::info!(
        "encoded {} bytes to {} {scheme} symbols",
        data.len(),
        encoded_len(data.len())
    );
    Ok(EncodeStats {
        input_size: data.len() as u64,
        output_size: text.len() as u64 + 1,
        symbols: encoded_len(data.len()) as u64,
        padding: padding_for(data.len()),
        input_sha256: sha256(&data),
    })
}

/// Read all of `reader`, trim surrounding ASCII whitespace, decode the text
/// and write the bytes.
pub fn decode_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    scheme: Scheme,
) -> Result<DecodeStats, IoError> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    let data = decode_text(&raw, &mut writer, scheme)?;
    writer.flush()?;

    Ok(DecodeStats {
        input_size: raw.len() as u64,
        output_size: data.len() as u64,
        symbols: encoded_len(data.len()) as u64,
        padding: padding_for(data.len()),
        output_sha256: sha256(&data),
    })
}

/// Decode an in-memory string (e.g. given on the command line) into `writer`.
pub fn decode_str<W: Write>(
    text: &str,
    mut writer: W,
    scheme: Scheme,
) -> Result<DecodeStats, IoError> {
    let data = decode_text(text.as_bytes(), &mut writer, scheme)?;
    writer.flush()?;

    Ok(DecodeStats {
        input_size: text.len() as u64,
        output_size: data.len() as u64,
        symbols: encoded_len(data.len()) as u64,
        padding: padding_for(data.len()),
        output_sha256: sha256(&data),
    })
}

fn decode_text<W: Write>(raw: &[u8], writer: &mut W, scheme: Scheme) -> Result<Vec<u8>, IoError> {
    let data = scheme.decode(raw.trim_ascii())?;
    writer.write_all(&data)?;
    log::info!(
        "decoded {} bytes of {scheme} text to {} bytes",
        raw.len(),
        data.len()
    );
    Ok(data)
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Encode the file at `input_path`, writing text to `output_path`.
///
/// The input is read in full before the output file is created, so a failed
/// read leaves no empty file behind.
pub fn encode_file(
    input_path: &Path,
    output_path: &Path,
    scheme: Scheme,
) -> Result<EncodeStats, IoError> {
    let data = std::fs::read(input_path)?;
    let writer = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);
    encode_stream(&data[..], writer, scheme)
}

/// Decode the text file at `input_path`, writing bytes to `output_path`.
///
/// The output file is only created once the input has decoded cleanly, so a
/// rejected input leaves no partial file behind.
pub fn decode_file(
    input_path: &Path,
    output_path: &Path,
    scheme: Scheme,
) -> Result<DecodeStats, IoError> {
    let raw = std::fs::read(input_path)?;
    let data = scheme.decode(raw.trim_ascii())?;

    let mut writer = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);
    writer.write_all(&data)?;
    writer.flush()?;

    log::info!(
        "decoded {} to {} ({} bytes)",
        input_path.display(),
        output_path.display(),
        data.len()
    );
    Ok(DecodeStats {
        input_size: raw.len() as u64,
        output_size: data.len() as u64,
        symbols: encoded_len(data.len()) as u64,
        padding: padding_for(data.len()),
        output_sha256: sha256(&data),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
