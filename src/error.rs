//! # Error Types
//!
//! Error handling for the codec.
//!
//! This module defines every error variant that can occur while encoding or
//! decoding, from values that have no canonical encoding to buffers that end
//! before the value they describe.
//!
//! ## Error Categories
//! - **Encode Errors**: values with no canonical byte form (NaN, oversized lengths)
//! - **Decode Errors**: truncated buffers, hostile length prefixes, non-canonical bytes
//! - **Contract Errors**: decoding into a read-only binding
//! - **Configuration Errors**: invalid or unreadable codec configuration
//!
//! All errors implement `std::error::Error` for interoperability. Every error
//! aborts the call that raised it; there is never a partial result.
//!
//! ## Example Usage
//! ```rust
//! use borsh_codec::error::{BorshError, Result};
//! use tracing::{error, info};
//!
//! fn name_from_wire(bytes: &[u8]) -> Result<String> {
//!     borsh_codec::decode::<String>(bytes)
//! }
//!
//! fn main() {
//!     match name_from_wire(&[0x05, 0x00, 0x00, 0x00, b'h', b'i']) {
//!         Ok(name) => info!(name, "Decoded name"),
//!         Err(BorshError::TruncatedBuffer { needed, remaining }) => {
//!             error!(needed, remaining, "Record was cut short")
//!         }
//!         Err(e) => error!(error = %e, "Rejected record"),
//!     }
//! }
//! ```

use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Encode-side messages
    pub const ERR_NAN: &str = "NaN has no canonical encoding";
    pub const ERR_LENGTH_OVERFLOW: &str = "Length does not fit in a 4-byte prefix";

    /// Decode-side messages
    pub const ERR_ARRAY_LENGTH: &str = "Fixed array decoded to the wrong element count";

    /// Configuration messages
    pub const ERR_CONFIG_READ: &str = "Failed to read config file";
    pub const ERR_CONFIG_PARSE: &str = "Failed to parse TOML";
    pub const ERR_CONFIG_WRITE: &str = "Failed to write config file";
}

// BorshError is the single error type for all codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BorshError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Cannot decode into read-only field `{field}`")]
    ConstTarget { field: &'static str },

    #[error("Truncated buffer: needed {needed} bytes, {remaining} remaining")]
    TruncatedBuffer { needed: usize, remaining: usize },

    #[error("Malformed length prefix: {declared} exceeds limit {limit}")]
    MalformedLength { declared: u64, limit: u64 },

    #[error("Invalid boolean byte: {0:#04x}")]
    InvalidBool(u8),

    #[error("String bytes are not valid UTF-8")]
    InvalidUtf8,

    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl BorshError {
    /// Whether the error was caused by the bytes being decoded rather than
    /// by the caller or the value being encoded.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            BorshError::TruncatedBuffer { .. }
                | BorshError::MalformedLength { .. }
                | BorshError::InvalidBool(_)
                | BorshError::InvalidUtf8
                | BorshError::TrailingBytes(_)
        )
    }
}

/// Type alias for Results using BorshError
pub type Result<T> = std::result::Result<T, BorshError>;
