//! # Core Codec Components
//!
//! Type classification, byte buffers, and the per-shape transcoders.
//!
//! This module provides the foundation of the codec: every supported type
//! classifies into a [`shape::Shape`], and each shape has one transcoder that
//! knows both directions.
//!
//! ## Components
//! - **Shape**: static classification of a type (`Classify`)
//! - **Buffer**: append-only `Writer` and forward-only `Reader`
//! - **Primitive**: booleans, integers, floats, strings
//! - **Sequence**: fixed arrays and length-prefixed sequences
//! - **Composite**: ordered field lists described once per type
//! - **Codec**: the `Encode`/`Decode` traits and top-level entry points
//!
//! ## Wire Format
//! ```text
//! bool        [0x00 | 0x01]
//! integer     [N/8 bytes LE]
//! float       [N/8 bytes LE, IEEE-754]
//! string      [len: u32 LE] [UTF-8 bytes]
//! [T; N]      [T] x N
//! Vec<T>      [count: u32 LE] [T] x count
//! composite   [field 0] .. [field N-1]
//! ```
//!
//! ## Security
//! - Length prefixes are capped by `CodecConfig::max_length` (16MB default)
//! - Declared counts are checked against the remaining bytes before allocation
//! - Every read is bounds-checked; short input is an error, never a panic

pub mod buffer;
pub mod codec;
pub mod composite;
pub mod primitive;
pub mod sequence;
pub mod shape;
