//! # Codec Core
//!
//! The [`Encode`] and [`Decode`] traits every shape implements, and the
//! top-level entry points that own the buffer for one call.
//!
//! Dispatch is static: the type's [`Classify`] / [`Encode`] / [`Decode`]
//! implementations pick the transcoder, so the direction of a call can never
//! change partway through the walk.
//!
//! ## Guarantees
//! - Encode never mutates the source value and validates a value before any
//!   of its bytes are appended
//! - Decode builds a fresh value and hands it to the caller only once every
//!   field has been read
//! - Every error aborts the whole call; there is no partial result

use std::any::type_name;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::config::CodecConfig;
use crate::core::buffer::{Direction, Reader, Writer};
use crate::core::shape::Classify;
use crate::error::{BorshError, Result};
use crate::utils::metrics::{global_metrics, Timer};

/// Field name reported when a top-level binding is read-only
pub const ROOT_FIELD: &str = "<root>";

/// Types that can be written in canonical form
pub trait Encode: Classify {
    /// Append the encoding of `self` to `writer`
    fn encode(&self, writer: &mut Writer) -> Result<()>;

    /// Check that `self` has a canonical encoding without writing anything.
    ///
    /// Callers that must not leave a partial value in the buffer run this
    /// before [`Encode::encode`].
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Exact number of bytes [`Encode::encode`] appends for `self`
    fn encoded_len(&self) -> usize;
}

/// Types that can be read back from their canonical form
pub trait Decode: Classify + Sized {
    /// Read a value from `reader`
    fn decode(reader: &mut Reader<'_>) -> Result<Self>;

    /// Overwrite `self` with a value read from `reader`
    fn decode_in_place(&mut self, reader: &mut Reader<'_>) -> Result<()> {
        *self = Self::decode(reader)?;
        Ok(())
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, writer: &mut Writer) -> Result<()> {
        (**self).encode(writer)
    }

    fn validate(&self) -> Result<()> {
        (**self).validate()
    }

    fn encoded_len(&self) -> usize {
        (**self).encoded_len()
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, writer: &mut Writer) -> Result<()> {
        (**self).encode(writer)
    }

    fn validate(&self) -> Result<()> {
        (**self).validate()
    }

    fn encoded_len(&self) -> usize {
        (**self).encoded_len()
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        T::decode(reader).map(Box::new)
    }

    fn decode_in_place(&mut self, reader: &mut Reader<'_>) -> Result<()> {
        (**self).decode_in_place(reader)
    }
}

/// A caller binding to decode into
#[derive(Debug)]
pub enum DecodeTarget<'a, T> {
    /// A binding the decoder may overwrite
    Mutable(&'a mut T),
    /// A binding the caller declared immutable; decoding into it is rejected
    ReadOnly(&'a T),
}

/// Encode `value` into a freshly allocated buffer
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let _timer = Timer::start("encode");
    let result = encode_fresh(value).map(Writer::into_inner);
    record_encode::<T>(&result.as_ref().map(Vec::len));
    result
}

/// Encode `value` into a shared, cheaply clonable buffer
pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> Result<Bytes> {
    let _timer = Timer::start("to_bytes");
    let result = encode_fresh(value).map(Writer::into_bytes);
    record_encode::<T>(&result.as_ref().map(Bytes::len));
    result
}

/// Append the encoding of `value` to an existing writer.
///
/// On failure nothing is appended.
pub fn encode_into<T: Encode + ?Sized>(value: &T, writer: &mut Writer) -> Result<()> {
    let _timer = Timer::start("encode_into");
    let before = writer.len();
    let result = value.validate().and_then(|()| value.encode(writer));
    record_encode::<T>(&result.as_ref().map(|_| writer.len() - before));
    result
}

/// Number of bytes `encode(value)` would produce
pub fn encoded_len<T: Encode + ?Sized>(value: &T) -> Result<usize> {
    value.validate()?;
    Ok(value.encoded_len())
}

fn encode_fresh<T: Encode + ?Sized>(value: &T) -> Result<Writer> {
    value.validate()?;
    let mut writer = Writer::with_capacity(value.encoded_len());
    value.encode(&mut writer)?;
    Ok(writer)
}

fn record_encode<T: Encode + ?Sized>(outcome: &std::result::Result<usize, &BorshError>) {
    match outcome {
        Ok(len) => {
            global_metrics().encode_success(*len as u64);
            trace!(direction = ?Direction::Encode, ty = type_name::<T>(), len, "Encoded value");
        }
        Err(e) => {
            global_metrics().encode_failure();
            debug!(direction = ?Direction::Encode, ty = type_name::<T>(), error = %e, "Encode failed");
        }
    }
}

/// Decode a `T` from the start of `bytes` with the default configuration.
///
/// Bytes after the value are ignored; use [`decode_exact`] to reject them.
pub fn decode<T: Decode>(bytes: &[u8]) -> Result<T> {
    decode_with_config(bytes, &CodecConfig::default())
}

/// Decode a `T` that must span all of `bytes`
pub fn decode_exact<T: Decode>(bytes: &[u8]) -> Result<T> {
    let config = CodecConfig::default_with_overrides(|c| c.reject_trailing_bytes = true);
    decode_with_config(bytes, &config)
}

/// Decode a `T` from the start of `bytes` under `config`
pub fn decode_with_config<T: Decode>(bytes: &[u8], config: &CodecConfig) -> Result<T> {
    let _timer = Timer::start("decode");
    let mut reader = Reader::with_config(bytes, config);
    let result = T::decode(&mut reader).and_then(|value| finish(&reader, value));
    record_decode::<T>(&result.as_ref().map(|_| reader.position()));
    result
}

/// Decode into a caller binding, returning the number of bytes consumed.
///
/// The binding is only overwritten once the whole value has been read. A
/// read-only binding is a caller contract violation and fails with
/// `ConstTarget` before any byte is read.
pub fn decode_into<T: Decode>(target: DecodeTarget<'_, T>, bytes: &[u8]) -> Result<usize> {
    let slot = match target {
        DecodeTarget::Mutable(slot) => slot,
        DecodeTarget::ReadOnly(_) => {
            let err = BorshError::ConstTarget { field: ROOT_FIELD };
            record_decode::<T>(&Err(&err));
            return Err(err);
        }
    };

    let _timer = Timer::start("decode_into");
    let mut reader = Reader::new(bytes);
    let result = T::decode(&mut reader).and_then(|value| finish(&reader, value));
    let consumed = reader.position();
    record_decode::<T>(&result.as_ref().map(|_| consumed));

    *slot = result?;
    Ok(consumed)
}

fn finish<T>(reader: &Reader<'_>, value: T) -> Result<T> {
    if reader.config().reject_trailing_bytes && !reader.is_exhausted() {
        return Err(BorshError::TrailingBytes(reader.remaining()));
    }
    Ok(value)
}

fn record_decode<T: Decode>(outcome: &std::result::Result<usize, &BorshError>) {
    match outcome {
        Ok(len) => {
            global_metrics().decode_success(*len as u64);
            trace!(direction = ?Direction::Decode, ty = type_name::<T>(), len, "Decoded value");
        }
        Err(e) => {
            global_metrics().decode_failure();
            debug!(direction = ?Direction::Decode, ty = type_name::<T>(), error = %e, "Decode failed");
        }
    }
}
