//! Error types for link conversion.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Link decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Input matched none of the decodable link grammars
    #[error("{message}")]
    UnrecognizedFormat {
        /// User-facing description, listing the accepted formats
        message: String,
    },
}

/// Pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Link could not be decoded
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Unknown format identifier
    #[error("unknown link format {name:?}, expected one of: {expected}")]
    UnknownFormat {
        /// Identifier as given
        name: String,
        /// Comma-separated list of accepted identifiers
        expected: String,
    },

    /// Input path does not exist
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// No target formats requested
    #[error("no target link formats requested")]
    NoTargets,

    /// Reading a file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Walking a directory failed
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}
