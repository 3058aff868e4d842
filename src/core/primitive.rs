//! # Primitive Transcoders
//!
//! Booleans, integers, floats, and strings.
//!
//! ## Wire Format
//! ```text
//! bool      1 byte, 0x00 or 0x01
//! iN / uN   N/8 bytes, two's-complement, little-endian
//! fN        N/8 bytes, IEEE-754 bit pattern, little-endian
//! string    [len: u32 LE] [len raw bytes]
//! ```
//!
//! Floats are routed through the unsigned integer of the same width. NaN is
//! rejected on encode because its many bit patterns would give one value
//! several encodings.

use crate::config::LENGTH_PREFIX_SIZE;
use crate::core::buffer::{checked_length, Reader, Writer};
use crate::core::codec::{Decode, Encode};
use crate::core::shape::{Classify, Shape};
use crate::error::{constants, BorshError, Result};

impl Classify for bool {
    fn shape() -> Shape {
        Shape::Boolean
    }

    fn min_encoded_size() -> usize {
        1
    }
}

impl Encode for bool {
    fn encode(&self, writer: &mut Writer) -> Result<()> {
        writer.put_u8(u8::from(*self));
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

impl Decode for bool {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        reader.get_bool()
    }
}

macro_rules! impl_integer {
    ($($ty:ty => $put:ident, $get:ident, $signed:expr;)*) => {$(
        impl Classify for $ty {
            fn shape() -> Shape {
                Shape::Integer { bits: <$ty>::BITS as u16, signed: $signed }
            }

            fn min_encoded_size() -> usize {
                std::mem::size_of::<$ty>()
            }
        }

        impl Encode for $ty {
            #[inline]
            fn encode(&self, writer: &mut Writer) -> Result<()> {
                writer.$put(*self);
                Ok(())
            }

            fn encoded_len(&self) -> usize {
                std::mem::size_of::<$ty>()
            }
        }

        impl Decode for $ty {
            #[inline]
            fn decode(reader: &mut Reader<'_>) -> Result<Self> {
                reader.$get()
            }
        }
    )*};
}

impl_integer! {
    u8 => put_u8, get_u8, false;
    u16 => put_u16, get_u16, false;
    u32 => put_u32, get_u32, false;
    u64 => put_u64, get_u64, false;
    u128 => put_u128, get_u128, false;
    i8 => put_i8, get_i8, true;
    i16 => put_i16, get_i16, true;
    i32 => put_i32, get_i32, true;
    i64 => put_i64, get_i64, true;
    i128 => put_i128, get_i128, true;
}

/// A 128-bit IEEE-754 binary128 float, carried as its bit pattern.
///
/// Stands in for extended-precision floats (80 bits and wider) so they have a
/// fixed, platform-independent 16-byte encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct F128(u128);

impl F128 {
    const EXPONENT_MASK: u128 = 0x7FFF << 112;
    const SIGNIFICAND_MASK: u128 = (1 << 112) - 1;

    pub const fn from_bits(bits: u128) -> Self {
        Self(bits)
    }

    pub const fn to_bits(self) -> u128 {
        self.0
    }

    /// True for every NaN bit pattern (all-ones exponent, non-zero significand)
    pub const fn is_nan(self) -> bool {
        self.0 & Self::EXPONENT_MASK == Self::EXPONENT_MASK && self.0 & Self::SIGNIFICAND_MASK != 0
    }

    /// Widen an `f64` to binary128. The conversion is exact.
    pub fn from_f64(value: f64) -> Self {
        let bits = value.to_bits();
        let sign = u128::from(bits >> 63) << 127;
        let exponent = ((bits >> 52) & 0x7FF) as u32;
        let fraction = bits & ((1 << 52) - 1);

        let magnitude = match (exponent, fraction) {
            (0, 0) => 0,
            (0x7FF, _) => Self::EXPONENT_MASK | (u128::from(fraction) << 60),
            (0, _) => {
                // Subnormal f64: renormalize around the highest set bit.
                let top = 63 - fraction.leading_zeros();
                let exponent = u128::from(16383 - 1074 + top);
                let fraction = u128::from(fraction ^ (1 << top)) << (112 - top);
                (exponent << 112) | fraction
            }
            _ => {
                let exponent = u128::from(exponent + 16383 - 1023);
                (exponent << 112) | (u128::from(fraction) << 60)
            }
        };

        Self(sign | magnitude)
    }
}

impl From<f64> for F128 {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<f32> for F128 {
    fn from(value: f32) -> Self {
        Self::from_f64(f64::from(value))
    }
}

macro_rules! impl_float {
    ($($ty:ty => $bits:ty, $width:expr;)*) => {$(
        impl Classify for $ty {
            fn shape() -> Shape {
                Shape::Float { bits: $width }
            }

            fn min_encoded_size() -> usize {
                $width / 8
            }
        }

        impl Encode for $ty {
            fn encode(&self, writer: &mut Writer) -> Result<()> {
                self.validate()?;
                self.to_bits().encode(writer)
            }

            fn validate(&self) -> Result<()> {
                if self.is_nan() {
                    return Err(BorshError::InvalidValue(constants::ERR_NAN.to_string()));
                }
                Ok(())
            }

            fn encoded_len(&self) -> usize {
                $width / 8
            }
        }

        impl Decode for $ty {
            fn decode(reader: &mut Reader<'_>) -> Result<Self> {
                <$bits>::decode(reader).map(<$ty>::from_bits)
            }
        }
    )*};
}

impl_float! {
    f32 => u32, 32;
    f64 => u64, 64;
    F128 => u128, 128;
}

impl Classify for str {
    fn shape() -> Shape {
        Shape::String
    }

    fn min_encoded_size() -> usize {
        LENGTH_PREFIX_SIZE
    }
}

impl Encode for str {
    fn encode(&self, writer: &mut Writer) -> Result<()> {
        writer.put_length(self.len())?;
        writer.put_slice(self.as_bytes());
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        checked_length(self.len()).map(|_| ())
    }

    fn encoded_len(&self) -> usize {
        LENGTH_PREFIX_SIZE + self.len()
    }
}

impl Classify for String {
    fn shape() -> Shape {
        Shape::String
    }

    fn min_encoded_size() -> usize {
        LENGTH_PREFIX_SIZE
    }
}

impl Encode for String {
    fn encode(&self, writer: &mut Writer) -> Result<()> {
        self.as_str().encode(writer)
    }

    fn validate(&self) -> Result<()> {
        self.as_str().validate()
    }

    fn encoded_len(&self) -> usize {
        self.as_str().encoded_len()
    }
}

impl Decode for String {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let len = reader.get_length()?;
        let raw = reader.take(len)?;
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|_| BorshError::InvalidUtf8)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{BoolPolicy, CodecConfig};
    use crate::{decode, decode_with_config, encode};

    #[test]
    fn test_integer_vectors() {
        assert_eq!(encode(&127i8).unwrap(), vec![0x7F]);
        assert_eq!(encode(&-128i8).unwrap(), vec![0x80]);
        assert_eq!(encode(&0x0102_0304u32).unwrap(), vec![4, 3, 2, 1]);
        assert_eq!(encode(&-1i64).unwrap(), vec![0xFF; 8]);
        assert_eq!(encode(&u128::MAX).unwrap().len(), 16);
    }

    #[test]
    fn test_integer_extremes_round_trip() {
        assert_eq!(decode::<i16>(&encode(&i16::MIN).unwrap()).unwrap(), i16::MIN);
        assert_eq!(decode::<i128>(&encode(&i128::MAX).unwrap()).unwrap(), i128::MAX);
        assert_eq!(decode::<u64>(&encode(&u64::MAX).unwrap()).unwrap(), u64::MAX);
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_float_vector() {
        assert_eq!(
            encode(&3.1415927f32).unwrap(),
            vec![0xDB, 0x0F, 0x49, 0x40]
        );
        assert_eq!(encode(&1.0f64).unwrap(), 1.0f64.to_bits().to_le_bytes().to_vec());
    }

    #[test]
    fn test_nan_rejected() {
        assert!(matches!(encode(&f32::NAN), Err(BorshError::InvalidValue(_))));
        assert!(matches!(encode(&f64::NAN), Err(BorshError::InvalidValue(_))));
        assert!(matches!(
            encode(&F128::from(f64::NAN)),
            Err(BorshError::InvalidValue(_))
        ));
        assert!(encode(&f64::INFINITY).is_ok());
    }

    #[test]
    fn test_f128_widening() {
        assert_eq!(F128::from_f64(1.0).to_bits(), 0x3FFF << 112);
        assert_eq!(F128::from_f64(-2.0).to_bits(), (1 << 127) | (0x4000 << 112));
        assert_eq!(F128::from_f64(0.0).to_bits(), 0);
        assert_eq!(F128::from_f64(f64::INFINITY).to_bits(), 0x7FFF << 112);
        assert!(!F128::from_f64(f64::INFINITY).is_nan());

        // Smallest positive subnormal f64 is 2^-1074.
        let tiny = F128::from_f64(f64::from_bits(1)).to_bits();
        assert_eq!(tiny >> 112, 16383 - 1074);
        assert_eq!(tiny & F128::SIGNIFICAND_MASK, 0);

        let value = F128::from_f64(3.5);
        assert_eq!(decode::<F128>(&encode(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn test_bool_policies() {
        assert_eq!(encode(&true).unwrap(), vec![0x01]);
        assert_eq!(encode(&false).unwrap(), vec![0x00]);
        assert_eq!(decode::<bool>(&[0x02]).unwrap_err(), BorshError::InvalidBool(0x02));

        let lenient = CodecConfig::default_with_overrides(|c| c.bool_policy = BoolPolicy::Lenient);
        assert!(decode_with_config::<bool>(&[0x02], &lenient).unwrap());
        assert!(!decode_with_config::<bool>(&[0x00], &lenient).unwrap());
    }

    #[test]
    fn test_string_vector() {
        let text = "hello 🚀";
        let bytes = encode(text).unwrap();
        assert_eq!(&bytes[..4], &[0x0A, 0x00, 0x00, 0x00]);
        assert_eq!(&bytes[4..], text.as_bytes());
        assert_eq!(decode::<String>(&bytes).unwrap(), text);
    }

    #[test]
    fn test_string_truncated_and_invalid() {
        let err = decode::<String>(&[0x05, 0, 0, 0, b'h', b'i']).unwrap_err();
        assert_eq!(
            err,
            BorshError::TruncatedBuffer {
                needed: 5,
                remaining: 2
            }
        );
        assert_eq!(
            decode::<String>(&[0x01, 0, 0, 0, 0xFF]).unwrap_err(),
            BorshError::InvalidUtf8
        );
    }
}
