//! # borsh-codec
//!
//! Canonical, deterministic binary encoding for hash preimages, signatures,
//! and wire payloads. Every value has exactly one encoding, so equal values
//! always hash to the same digest.
//!
//! ## Quick Start
//! ```
//! use borsh_codec::{composite, decode, encode};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Transfer {
//!     from: String,
//!     to: String,
//!     amount: u64,
//! }
//!
//! composite!(Transfer { from, to, amount });
//!
//! let transfer = Transfer {
//!     from: "alice".into(),
//!     to: "bob".into(),
//!     amount: 250,
//! };
//! let bytes = encode(&transfer).unwrap();
//! assert_eq!(bytes.len(), (4 + 5) + (4 + 3) + 8);
//! assert_eq!(decode::<Transfer>(&bytes).unwrap(), transfer);
//! ```
//!
//! ## Modules
//! - [`core`]: shapes, buffers, transcoders, and the codec entry points
//! - [`config`]: decode limits and policies, loadable from TOML or env
//! - [`error`]: the [`BorshError`] type
//! - [`utils`]: process-wide codec metrics

pub mod config;
pub mod core;
pub mod error;
pub mod utils;

pub use crate::config::{BoolPolicy, CodecConfig};
pub use crate::core::buffer::{Reader, Writer};
pub use crate::core::codec::{
    decode, decode_exact, decode_into, decode_with_config, encode, encode_into, encoded_len,
    to_bytes, Decode, DecodeTarget, Encode,
};
pub use crate::core::composite::{Composite, FieldVisitor};
pub use crate::core::primitive::F128;
pub use crate::core::shape::{Classify, FieldShape, Shape, ShapeKind};
pub use crate::error::{BorshError, Result};
