//! Error types for hometwin-rs.
//!
//! Malformed scene input (degenerate polygons, empty surfaces, missing sensor
//! locations) is never an error: those pieces are omitted and the scene keeps
//! rendering. Errors are reserved for payload decoding and I/O.

use thiserror::Error;

/// The main error type for hometwin-rs operations.
#[derive(Error, Debug)]
pub enum TwinError {
    /// A backend payload could not be decoded.
    #[error("payload decode error: {0}")]
    PayloadDecode(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for hometwin-rs operations.
pub type Result<T> = std::result::Result<T, TwinError>;
