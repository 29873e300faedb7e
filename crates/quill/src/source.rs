//! Loading source files from disk.

use std::{fs, path::Path};

use log::{debug, warn};

use crate::error::QuillError;

/// Read a source file as text.
///
/// Bytes that are not valid UTF-8 are decoded as Latin-1, where every byte
/// maps to the code point of the same value. Decoding therefore never fails.
///
/// # Errors
///
/// Returns [`QuillError::Io`] if the file cannot be read.
pub fn read_source(path: impl AsRef<Path>) -> Result<String, QuillError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    debug!(path:? = path, bytes = bytes.len(); "Read source file");

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            warn!(path:? = path; "Source is not valid UTF-8, decoding as Latin-1");
            Ok(decode_latin1(err.as_bytes()))
        }
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}
