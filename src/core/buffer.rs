//! # Byte Buffers
//!
//! [`Writer`] is the append-only sink used while encoding; [`Reader`] is the
//! forward-only cursor over an immutable slice used while decoding. Each
//! top-level call creates its own buffer and drops it on return.
//!
//! All multi-byte integers go through the little-endian accessors of the
//! `bytes` crate, so the wire layout does not depend on host byte order.
//!
//! ## Security
//! - Every read checks the remaining length first; a short buffer yields
//!   `TruncatedBuffer`, never a panic or an out-of-bounds read
//! - Length prefixes are checked against `CodecConfig::max_length` before
//!   they are used to size anything

use bytes::{Buf, BufMut, Bytes};

use crate::config::{BoolPolicy, CodecConfig};
use crate::error::{constants, BorshError, Result};

/// Direction of a codec walk, recorded on log events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Encode,
    Decode,
}

/// Append-only output buffer for encoding
#[derive(Debug, Default, Clone)]
pub struct Writer {
    buf: Vec<u8>,
}

macro_rules! writer_put {
    ($($name:ident($ty:ty) => $put:ident;)*) => {$(
        #[inline]
        pub fn $name(&mut self, v: $ty) {
            self.buf.$put(v);
        }
    )*};
}

impl Writer {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes written so far
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer, returning the encoded bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    /// Consume the writer, returning the encoded bytes as a shared buffer
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.buf)
    }

    writer_put! {
        put_u8(u8) => put_u8;
        put_i8(i8) => put_i8;
        put_u16(u16) => put_u16_le;
        put_i16(i16) => put_i16_le;
        put_u32(u32) => put_u32_le;
        put_i32(i32) => put_i32_le;
        put_u64(u64) => put_u64_le;
        put_i64(i64) => put_i64_le;
        put_u128(u128) => put_u128_le;
        put_i128(i128) => put_i128_le;
    }

    /// Append raw bytes with no prefix
    #[inline]
    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Append a 4-byte length prefix.
    ///
    /// Fails without writing anything if `len` does not fit in 32 bits.
    pub fn put_length(&mut self, len: usize) -> Result<()> {
        let prefix = checked_length(len)?;
        self.buf.put_u32_le(prefix);
        Ok(())
    }
}

/// Convert an in-memory length to its 4-byte wire form
pub(crate) fn checked_length(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        BorshError::InvalidValue(format!("{} ({len})", constants::ERR_LENGTH_OVERFLOW))
    })
}

/// Forward-only input cursor for decoding
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    config: CodecConfig,
}

macro_rules! reader_get {
    ($($name:ident -> $ty:ty => $get:ident;)*) => {$(
        #[inline]
        pub fn $name(&mut self) -> Result<$ty> {
            let mut chunk = self.take(std::mem::size_of::<$ty>())?;
            Ok(chunk.$get())
        }
    )*};
}

impl<'a> Reader<'a> {
    /// Create a reader over `data` with the default configuration
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, &CodecConfig::default())
    }

    /// Create a reader over `data` with the given configuration
    pub fn with_config(data: &'a [u8], config: &CodecConfig) -> Self {
        Self {
            data,
            pos: 0,
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail with `TruncatedBuffer` unless `needed` bytes remain
    pub fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(BorshError::TruncatedBuffer { needed, remaining });
        }
        Ok(())
    }

    /// Consume exactly `len` bytes
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let chunk = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(chunk)
    }

    reader_get! {
        get_u8 -> u8 => get_u8;
        get_i8 -> i8 => get_i8;
        get_u16 -> u16 => get_u16_le;
        get_i16 -> i16 => get_i16_le;
        get_u32 -> u32 => get_u32_le;
        get_i32 -> i32 => get_i32_le;
        get_u64 -> u64 => get_u64_le;
        get_i64 -> i64 => get_i64_le;
        get_u128 -> u128 => get_u128_le;
        get_i128 -> i128 => get_i128_le;
    }

    /// Read one boolean byte under the configured policy
    pub fn get_bool(&mut self) -> Result<bool> {
        match (self.get_u8()?, self.config.bool_policy) {
            (0x00, _) => Ok(false),
            (0x01, _) => Ok(true),
            (_, BoolPolicy::Lenient) => Ok(true),
            (byte, BoolPolicy::Strict) => Err(BorshError::InvalidBool(byte)),
        }
    }

    /// Read a 4-byte length prefix and check it against `max_length`
    pub fn get_length(&mut self) -> Result<usize> {
        let declared = self.get_u32()?;
        if declared > self.config.max_length {
            return Err(BorshError::MalformedLength {
                declared: u64::from(declared),
                limit: u64::from(self.config.max_length),
            });
        }
        usize::try_from(declared).map_err(|_| BorshError::MalformedLength {
            declared: u64::from(declared),
            limit: usize::MAX as u64,
        })
    }

    /// Check that `count` elements of at least `elem_min` bytes each can
    /// still be present, returning a safe preallocation capacity.
    pub fn check_span(&self, count: usize, elem_min: usize) -> Result<usize> {
        let needed = count
            .checked_mul(elem_min)
            .ok_or_else(|| BorshError::MalformedLength {
                declared: count as u64,
                limit: (usize::MAX / elem_min.max(1)) as u64,
            })?;
        self.ensure(needed)?;
        // Zero-width elements cannot bound the count by bytes; grow on demand.
        Ok(if elem_min == 0 { 0 } else { count })
    }
}
