use thiserror::Error;

/// Errors raised while reading the replay container or its chunks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplayError {
    /// A read asked for more bytes than the buffer still holds.
    #[error("unexpected end of replay data: needed {needed} bytes at offset {offset}, {remaining} remaining")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    /// Magic number or version check failed.
    #[error("unsupported replay format: {0}")]
    UnsupportedFormat(String),
    /// A compressed block did not inflate to its declared size.
    #[error("failed to decompress chunk: {0}")]
    Decompression(String),
    /// Structurally invalid data (negative sizes, overlong integers, bad tags).
    #[error("malformed replay data: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, ReplayError>;
