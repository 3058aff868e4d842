//! # Sequence Transcoder
//!
//! Fixed arrays and dynamic sequences.
//!
//! ## Wire Format
//! ```text
//! [T; N]   [elem 0] .. [elem N-1]              (no prefix)
//! Vec<T>   [count: u32 LE] [elem 0] .. [elem count-1]
//! ```
//!
//! Elements recurse through their own [`Encode`] / [`Decode`] impls, so a
//! sequence of sequences is one more level of the same rule. The element
//! count of a fixed array is part of its type and is never written.
//!
//! On decode the count is checked against `max_length` and against the bytes
//! left in the buffer before anything is allocated.

use std::collections::VecDeque;

use crate::config::LENGTH_PREFIX_SIZE;
use crate::core::buffer::{checked_length, Reader, Writer};
use crate::core::codec::{Decode, Encode};
use crate::core::shape::{Classify, Shape};
use crate::error::{constants, BorshError, Result};

fn validate_elements<'a, T, I>(len: usize, items: I) -> Result<()>
where
    T: Encode + 'a,
    I: IntoIterator<Item = &'a T>,
{
    checked_length(len)?;
    items.into_iter().try_for_each(Encode::validate)
}

fn encode_elements<'a, T, I>(items: I, writer: &mut Writer) -> Result<()>
where
    T: Encode + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().try_for_each(|item| item.encode(writer))
}

fn elements_len<'a, T, I>(items: I) -> usize
where
    T: Encode + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().map(Encode::encoded_len).sum()
}

/// Read a count prefix and that many elements, in order
fn decode_elements<T: Decode>(reader: &mut Reader<'_>) -> Result<Vec<T>> {
    let count = reader.get_length()?;
    let capacity = reader.check_span(count, T::min_encoded_size())?;

    let mut items = Vec::with_capacity(capacity);
    for _ in 0..count {
        items.push(T::decode(reader)?);
    }
    Ok(items)
}

impl<T: Classify, const N: usize> Classify for [T; N] {
    fn shape() -> Shape {
        Shape::FixedArray {
            elem: Box::new(T::shape()),
            len: N,
        }
    }

    fn min_encoded_size() -> usize {
        T::min_encoded_size().saturating_mul(N)
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode(&self, writer: &mut Writer) -> Result<()> {
        encode_elements(self, writer)
    }

    fn validate(&self) -> Result<()> {
        self.iter().try_for_each(Encode::validate)
    }

    fn encoded_len(&self) -> usize {
        elements_len(self)
    }
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let capacity = reader.check_span(N, T::min_encoded_size())?;
        let mut items = Vec::with_capacity(capacity);
        for _ in 0..N {
            items.push(T::decode(reader)?);
        }
        items.try_into().map_err(|items: Vec<T>| {
            BorshError::InvalidValue(format!(
                "{} (expected {N}, got {})",
                constants::ERR_ARRAY_LENGTH,
                items.len()
            ))
        })
    }

    fn decode_in_place(&mut self, reader: &mut Reader<'_>) -> Result<()> {
        self.iter_mut()
            .try_for_each(|slot| slot.decode_in_place(reader))
    }
}

impl<T: Classify> Classify for [T] {
    fn shape() -> Shape {
        Shape::DynamicSequence {
            elem: Box::new(T::shape()),
        }
    }

    fn min_encoded_size() -> usize {
        LENGTH_PREFIX_SIZE
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, writer: &mut Writer) -> Result<()> {
        writer.put_length(self.len())?;
        encode_elements(self, writer)
    }

    fn validate(&self) -> Result<()> {
        validate_elements(self.len(), self)
    }

    fn encoded_len(&self) -> usize {
        LENGTH_PREFIX_SIZE + elements_len(self)
    }
}

impl<T: Classify> Classify for Vec<T> {
    fn shape() -> Shape {
        <[T]>::shape()
    }

    fn min_encoded_size() -> usize {
        LENGTH_PREFIX_SIZE
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, writer: &mut Writer) -> Result<()> {
        self.as_slice().encode(writer)
    }

    fn validate(&self) -> Result<()> {
        self.as_slice().validate()
    }

    fn encoded_len(&self) -> usize {
        self.as_slice().encoded_len()
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        decode_elements(reader)
    }
}

impl<T: Classify> Classify for VecDeque<T> {
    fn shape() -> Shape {
        <[T]>::shape()
    }

    fn min_encoded_size() -> usize {
        LENGTH_PREFIX_SIZE
    }
}

impl<T: Encode> Encode for VecDeque<T> {
    fn encode(&self, writer: &mut Writer) -> Result<()> {
        writer.put_length(self.len())?;
        encode_elements(self, writer)
    }

    fn validate(&self) -> Result<()> {
        validate_elements(self.len(), self)
    }

    fn encoded_len(&self) -> usize {
        LENGTH_PREFIX_SIZE + elements_len(self)
    }
}

impl<T: Decode> Decode for VecDeque<T> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        decode_elements::<T>(reader).map(VecDeque::from)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;
    use crate::{decode, decode_with_config, encode};

    #[test]
    fn test_fixed_array_has_no_prefix() {
        let bytes = encode(&[1u16, 2, 3]).unwrap();
        assert_eq!(bytes, vec![1, 0, 2, 0, 3, 0]);
        assert_eq!(decode::<[u16; 3]>(&bytes).unwrap(), [1, 2, 3]);
    }

    #[test]
    fn test_arrays_wider_than_default_impls() {
        let wide = [[7u8; 33], [9u8; 33]];
        let bytes = encode(&wide).unwrap();
        assert_eq!(bytes.len(), 66);
        assert_eq!(decode::<[[u8; 33]; 2]>(&bytes).unwrap(), wide);

        let names: [String; 40] = std::array::from_fn(|i| format!("n{i}"));
        assert_eq!(decode::<[String; 40]>(&encode(&names).unwrap()).unwrap(), names);
    }

    #[test]
    fn test_truncated_fixed_array() {
        assert_eq!(
            decode::<[u32; 3]>(&[1, 0, 0, 0, 2, 0]).unwrap_err(),
            BorshError::TruncatedBuffer {
                needed: 12,
                remaining: 6
            }
        );
    }

    #[test]
    fn test_byte_array_is_not_a_string() {
        assert_eq!(encode(b"abc").unwrap(), b"abc".to_vec());
        assert!(matches!(<[u8; 3]>::shape(), Shape::FixedArray { len: 3, .. }));
    }

    #[test]
    fn test_dynamic_sequence_layout() {
        let values = vec![10u32, 20, 30];
        let bytes = encode(&values).unwrap();
        assert_eq!(bytes.len(), 4 + 3 * 4);
        assert_eq!(&bytes[..4], &[3, 0, 0, 0]);
        assert_eq!(decode::<Vec<u32>>(&bytes).unwrap(), values);
    }

    #[test]
    fn test_slice_and_vec_agree() {
        let values = vec![true, false, true];
        assert_eq!(encode(values.as_slice()).unwrap(), encode(&values).unwrap());

        let deque: VecDeque<bool> = values.iter().copied().collect();
        assert_eq!(encode(&deque).unwrap(), encode(&values).unwrap());
        assert_eq!(decode::<VecDeque<bool>>(&encode(&values).unwrap()).unwrap(), deque);
    }

    #[test]
    fn test_nested_sequences() {
        let nested = vec![vec![1i8, -1], vec![], vec![7]];
        let bytes = encode(&nested).unwrap();
        assert_eq!(
            bytes,
            vec![3, 0, 0, 0, 2, 0, 0, 0, 1, 0xFF, 0, 0, 0, 0, 1, 0, 0, 0, 7]
        );
        assert_eq!(decode::<Vec<Vec<i8>>>(&bytes).unwrap(), nested);

        let grid = vec![[1u8, 2], [3, 4]];
        assert_eq!(decode::<Vec<[u8; 2]>>(&encode(&grid).unwrap()).unwrap(), grid);
    }

    #[test]
    fn test_count_beyond_buffer_is_truncated() {
        // Claims 4 u32 elements but only carries one.
        let bytes = [4, 0, 0, 0, 1, 0, 0, 0];
        assert_eq!(
            decode::<Vec<u32>>(&bytes).unwrap_err(),
            BorshError::TruncatedBuffer {
                needed: 16,
                remaining: 4
            }
        );
    }

    #[test]
    fn test_count_beyond_limit_is_malformed() {
        let config = CodecConfig::default_with_overrides(|c| c.max_length = 2);
        let bytes = [3, 0, 0, 0, 1, 2, 3];
        assert_eq!(
            decode_with_config::<Vec<u8>>(&bytes, &config).unwrap_err(),
            BorshError::MalformedLength {
                declared: 3,
                limit: 2
            }
        );
    }

    #[test]
    fn test_nan_inside_sequence_fails_validation() {
        let values = vec![1.0f32, f32::NAN];
        assert!(matches!(values.validate(), Err(BorshError::InvalidValue(_))));
        assert!(encode(&values).is_err());
    }
}
