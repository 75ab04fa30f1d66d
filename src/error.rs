//! Error types for RAF parsing.
//!
//! Every failure is fatal for the parse attempt that produced it. The RAF layout
//! has no sync markers, so once a field is misread every later field is garbage;
//! the reader never tries to salvage a partial [`Replay`](crate::Replay).
//!
//! ## Error Categories
//!
//! - **Format Errors**: the stream is not a RAF file ([`RafError::InvalidSignature`])
//!   or uses a newer layout ([`RafError::UnsupportedVersion`])
//! - **Truncation Errors**: the stream ended in the middle of a field
//!   ([`RafError::StreamExhausted`])
//! - **I/O Errors**: the path could not be opened or the byte source failed
//!
//! ```rust
//! use lfs_raf::RafError;
//!
//! let error = RafError::StreamExhausted { offset: 512, needed: 128, context: "static wheel info" };
//! assert!(error.is_truncation());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for RAF operations.
pub type Result<T, E = RafError> = std::result::Result<T, E>;

/// Main error type for RAF parsing.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RafError {
    #[error("Stream exhausted at offset {offset}: needed {needed} bytes for {context}")]
    StreamExhausted { offset: u64, needed: usize, context: &'static str },

    #[error("Live for Speed RAF signature not found (found {found:02x?})")]
    InvalidSignature { found: [u8; 6] },

    #[error("Unknown RAF version: {found} (highest supported is {max_supported})")]
    UnsupportedVersion { found: u8, max_supported: u8 },

    #[error("RAF file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at offset {offset}")]
    Io {
        offset: u64,
        #[source]
        source: std::io::Error,
    },
}

impl RafError {
    /// Returns whether the stream ended before the layout was complete.
    pub fn is_truncation(&self) -> bool {
        matches!(self, RafError::StreamExhausted { .. })
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            RafError::StreamExhausted { .. } => vec![
                "Check the file was fully written before reading",
                "Re-export the replay from the Replay Analyzer",
                "Verify the transfer did not truncate the file",
            ],
            RafError::InvalidSignature { .. } => vec![
                "Check the file is a Replay Analyzer (.raf) export",
                "Verify the stream starts at offset 0",
            ],
            RafError::UnsupportedVersion { .. } => vec![
                "Update the library to a version that knows this RAF layout",
                "Export the replay with an older Live for Speed version",
            ],
            RafError::File { .. } => {
                vec!["Check file exists and is readable", "Check file permissions"]
            }
            RafError::Io { .. } => vec!["Check the underlying byte source", "Retry the read"],
        }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        RafError::File { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn exhausted_messages_carry_cursor_context(
                offset in 0u64..1_000_000u64,
                needed in 1usize..512usize,
            ) {
                let error = RafError::StreamExhausted { offset, needed, context: "data block" };
                let msg = error.to_string();
                prop_assert!(msg.contains(&offset.to_string()));
                prop_assert!(msg.contains(&needed.to_string()));
                prop_assert!(msg.contains("data block"));
            }

            #[test]
            fn version_messages_name_both_versions(found in 3u8..=255u8) {
                let error = RafError::UnsupportedVersion { found, max_supported: 2 };
                let msg = error.to_string();
                prop_assert!(msg.contains(&found.to_string()));
                prop_assert!(msg.contains('2'));
                prop_assert!(!error.is_truncation());
            }
        }
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<RafError>();

        let error = RafError::InvalidSignature { found: *b"NOTRAF" };
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn signature_message_shows_found_bytes() {
        let error = RafError::InvalidSignature { found: [0x4c, 0x46, 0x53, 0x00, 0x00, 0x00] };
        assert!(error.to_string().contains("4c"));
    }

    #[test]
    fn recovery_suggestions_are_descriptive() {
        let errors = [
            RafError::StreamExhausted { offset: 0, needed: 6, context: "signature" },
            RafError::InvalidSignature { found: [0; 6] },
            RafError::UnsupportedVersion { found: 3, max_supported: 2 },
            RafError::file_error(
                PathBuf::from("/missing.raf"),
                std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            ),
        ];

        for error in &errors {
            let suggestions = error.recovery_suggestions();
            assert!(!suggestions.is_empty());
            assert!(suggestions.iter().all(|s| s.len() > 5));
        }
    }
}
