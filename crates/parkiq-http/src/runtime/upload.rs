//! Upload decoding and temp-file spooling.
//!
//! Audio and scan payloads arrive base64-encoded and are spooled to a
//! request-owned temporary file before extraction. The [`SpooledUpload`]
//! guard owns that file: dropping it (on success, error, or panic unwind)
//! deletes it, so no exit path of a request leaks spooled data.

use std::io::Write;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors decoding or spooling an uploaded payload.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The payload was not valid base64.
    #[error("payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The payload decoded to zero bytes.
    #[error("payload is empty")]
    Empty,

    /// Writing the spool file failed.
    #[error("failed to spool upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Strip a `data:<media-type>;base64,` prefix and decode the payload.
pub fn decode_base64_payload(payload: &str) -> Result<Vec<u8>, UploadError> {
    let encoded = match payload.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or(rest),
        None => payload,
    };
    let bytes = STANDARD.decode(encoded.trim())?;
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    Ok(bytes)
}

/// A decoded upload spooled to a request-owned temporary file.
pub struct SpooledUpload {
    file: NamedTempFile,
}

impl SpooledUpload {
    /// Decode a base64 payload and spool it to disk.
    pub fn from_base64(payload: &str) -> Result<Self, UploadError> {
        let bytes = decode_base64_payload(payload)?;
        let mut file = NamedTempFile::new()?;
        file.write_all(&bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    /// Path of the spooled file, valid while this guard is alive.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_base64() {
        let bytes = decode_base64_payload("aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn strips_data_url_prefix() {
        let bytes = decode_base64_payload("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn rejects_invalid_base64_and_empty_payloads() {
        assert!(matches!(
            decode_base64_payload("!!!not-base64!!!"),
            Err(UploadError::Decode(_))
        ));
        assert!(matches!(decode_base64_payload(""), Err(UploadError::Empty)));
    }

    #[test]
    fn spooled_file_is_deleted_on_drop() {
        let upload = SpooledUpload::from_base64("aGVsbG8=").unwrap();
        let path = upload.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");

        drop(upload);
        assert!(!path.exists());
    }
}
