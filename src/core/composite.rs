//! # Composite Transcoder
//!
//! Ordered, named, heterogeneous field lists. A composite type describes its
//! fields once through [`Composite::describe`], and every codec operation is
//! a different [`FieldVisitor`] walking that same description.
//!
//! ## Wire Format
//! ```text
//! [field 0] [field 1] .. [field N-1]    (declaration order, no tags or padding)
//! ```
//!
//! ## Defining a composite
//! ```
//! use borsh_codec::{composite, decode, encode};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! composite!(Point { x, y });
//!
//! let bytes = encode(&Point { x: 10, y: 20 }).unwrap();
//! assert_eq!(bytes, [10, 0, 0, 0, 20, 0, 0, 0]);
//! assert_eq!(decode::<Point>(&bytes).unwrap(), Point { x: 10, y: 20 });
//! ```
//!
//! A field marked `#[read_only]` is encoded normally, but decoding the
//! composite fails with `ConstTarget` when that field is reached.

use std::any::type_name;
use std::cell::RefCell;

use tracing::debug;

use crate::core::buffer::{Reader, Writer};
use crate::core::codec::{Decode, Encode};
use crate::core::shape::{Classify, FieldShape, Shape};
use crate::error::{BorshError, Result};

/// Receives the fields of a composite `S`, one call per field, in order
pub trait FieldVisitor<S> {
    /// A field the codec may both read and write
    fn field<T: Encode + Decode>(
        &mut self,
        name: &'static str,
        get: fn(&S) -> &T,
        get_mut: fn(&mut S) -> &mut T,
    ) -> Result<()>;

    /// A field that is encoded but may never be decoded into
    fn read_only<T: Encode>(&mut self, name: &'static str, get: fn(&S) -> &T) -> Result<()>;
}

/// The field-enumeration contract of a composite type.
///
/// `describe` must announce every field exactly once, in the same order on
/// every call; that order is the wire layout. Decoding starts from
/// `Default::default()` and overwrites each field in turn.
///
/// `describe` should only fail by propagating a visitor's error with `?`.
/// If it returns an error of its own, every encode and decode of the type
/// fails with that error, and the reported shape and sizes stop at the
/// field where it failed.
///
/// Usually generated with [`composite!`](crate::composite). A manual impl
/// pairs with [`impl_composite_codec!`](crate::impl_composite_codec) to get
/// the codec traits.
pub trait Composite: Default {
    /// Name reported in the composite's [`Shape`]
    const NAME: &'static str;

    fn describe<V: FieldVisitor<Self>>(visitor: &mut V) -> Result<()>;
}

struct ShapeVisitor {
    fields: Vec<FieldShape>,
}

impl<S> FieldVisitor<S> for ShapeVisitor {
    fn field<T: Encode + Decode>(
        &mut self,
        name: &'static str,
        _get: fn(&S) -> &T,
        _get_mut: fn(&mut S) -> &mut T,
    ) -> Result<()> {
        self.fields.push(FieldShape {
            name,
            shape: T::shape(),
        });
        Ok(())
    }

    fn read_only<T: Encode>(&mut self, name: &'static str, _get: fn(&S) -> &T) -> Result<()> {
        self.fields.push(FieldShape {
            name,
            shape: T::shape(),
        });
        Ok(())
    }
}

struct MinSizeVisitor {
    total: usize,
}

impl<S> FieldVisitor<S> for MinSizeVisitor {
    fn field<T: Encode + Decode>(
        &mut self,
        _name: &'static str,
        _get: fn(&S) -> &T,
        _get_mut: fn(&mut S) -> &mut T,
    ) -> Result<()> {
        self.total = self.total.saturating_add(T::min_encoded_size());
        Ok(())
    }

    fn read_only<T: Encode>(&mut self, _name: &'static str, _get: fn(&S) -> &T) -> Result<()> {
        self.total = self.total.saturating_add(T::min_encoded_size());
        Ok(())
    }
}

struct EncodeVisitor<'a, S> {
    value: &'a S,
    writer: &'a mut Writer,
}

impl<S> FieldVisitor<S> for EncodeVisitor<'_, S> {
    fn field<T: Encode + Decode>(
        &mut self,
        _name: &'static str,
        get: fn(&S) -> &T,
        _get_mut: fn(&mut S) -> &mut T,
    ) -> Result<()> {
        get(self.value).encode(self.writer)
    }

    fn read_only<T: Encode>(&mut self, _name: &'static str, get: fn(&S) -> &T) -> Result<()> {
        get(self.value).encode(self.writer)
    }
}

struct ValidateVisitor<'a, S> {
    value: &'a S,
}

impl<S> FieldVisitor<S> for ValidateVisitor<'_, S> {
    fn field<T: Encode + Decode>(
        &mut self,
        _name: &'static str,
        get: fn(&S) -> &T,
        _get_mut: fn(&mut S) -> &mut T,
    ) -> Result<()> {
        get(self.value).validate()
    }

    fn read_only<T: Encode>(&mut self, _name: &'static str, get: fn(&S) -> &T) -> Result<()> {
        get(self.value).validate()
    }
}

struct LenVisitor<'a, S> {
    value: &'a S,
    total: usize,
}

impl<S> FieldVisitor<S> for LenVisitor<'_, S> {
    fn field<T: Encode + Decode>(
        &mut self,
        _name: &'static str,
        get: fn(&S) -> &T,
        _get_mut: fn(&mut S) -> &mut T,
    ) -> Result<()> {
        self.total += get(self.value).encoded_len();
        Ok(())
    }

    fn read_only<T: Encode>(&mut self, _name: &'static str, get: fn(&S) -> &T) -> Result<()> {
        self.total += get(self.value).encoded_len();
        Ok(())
    }
}

struct DecodeVisitor<'a, 'r, S> {
    value: &'a mut S,
    reader: &'a mut Reader<'r>,
}

impl<S> FieldVisitor<S> for DecodeVisitor<'_, '_, S> {
    fn field<T: Encode + Decode>(
        &mut self,
        _name: &'static str,
        _get: fn(&S) -> &T,
        get_mut: fn(&mut S) -> &mut T,
    ) -> Result<()> {
        get_mut(self.value).decode_in_place(self.reader)
    }

    fn read_only<T: Encode>(&mut self, name: &'static str, _get: fn(&S) -> &T) -> Result<()> {
        Err(BorshError::ConstTarget { field: name })
    }
}

thread_local! {
    // Composites whose shape is being built on this thread, outermost first
    static DESCRIBING: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

struct DescribeGuard;

impl Drop for DescribeGuard {
    fn drop(&mut self) {
        DESCRIBING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Run a visitor that never fails on its own; an error can only come from a
/// hand-written `describe`.
fn walk<S: Composite, V: FieldVisitor<S>>(visitor: &mut V) {
    if let Err(e) = S::describe(visitor) {
        debug!(composite = S::NAME, error = %e, "Field description stopped early");
    }
}

/// The [`Shape::Composite`] of `S`, fields in declaration order.
///
/// A field that leads back to `S` itself is reported as
/// [`Shape::Recursive`] instead of being expanded again.
pub fn composite_shape<S: Composite>() -> Shape {
    let key = type_name::<S>();
    let reentered = DESCRIBING.with(|stack| {
        let mut stack = stack.borrow_mut();
        if stack.contains(&key) {
            return true;
        }
        stack.push(key);
        false
    });
    if reentered {
        return Shape::Recursive { name: S::NAME };
    }

    let _guard = DescribeGuard;
    let mut visitor = ShapeVisitor { fields: Vec::new() };
    walk::<S, _>(&mut visitor);
    Shape::Composite {
        name: S::NAME,
        fields: visitor.fields,
    }
}

/// Sum of the minimum encoded sizes of the fields of `S`
pub fn fields_min_size<S: Composite>() -> usize {
    let mut visitor = MinSizeVisitor { total: 0 };
    walk::<S, _>(&mut visitor);
    visitor.total
}

pub fn encode_fields<S: Composite>(value: &S, writer: &mut Writer) -> Result<()> {
    S::describe(&mut EncodeVisitor { value, writer })
}

pub fn validate_fields<S: Composite>(value: &S) -> Result<()> {
    S::describe(&mut ValidateVisitor { value })
}

pub fn fields_len<S: Composite>(value: &S) -> usize {
    let mut visitor = LenVisitor { value, total: 0 };
    walk::<S, _>(&mut visitor);
    visitor.total
}

/// Read every field of a fresh `S`. The partial value is dropped on error.
pub fn decode_fields<S: Composite>(reader: &mut Reader<'_>) -> Result<S> {
    let mut value = S::default();
    S::describe(&mut DecodeVisitor {
        value: &mut value,
        reader,
    })?;
    Ok(value)
}

/// Implement [`Classify`], [`Encode`] and [`Decode`] for a type that already
/// implements [`Composite`].
#[macro_export]
macro_rules! impl_composite_codec {
    ($ty:ty) => {
        impl $crate::Classify for $ty {
            fn shape() -> $crate::Shape {
                $crate::core::composite::composite_shape::<Self>()
            }

            fn min_encoded_size() -> usize {
                $crate::core::composite::fields_min_size::<Self>()
            }
        }

        impl $crate::Encode for $ty {
            fn encode(&self, writer: &mut $crate::Writer) -> $crate::Result<()> {
                $crate::core::composite::encode_fields(self, writer)
            }

            fn validate(&self) -> $crate::Result<()> {
                $crate::core::composite::validate_fields(self)
            }

            fn encoded_len(&self) -> usize {
                $crate::core::composite::fields_len(self)
            }
        }

        impl $crate::Decode for $ty {
            fn decode(reader: &mut $crate::Reader<'_>) -> $crate::Result<Self> {
                $crate::core::composite::decode_fields(reader)
            }
        }
    };
}

/// Declare the fields of a struct, in wire order, and derive its codec.
///
/// ```
/// use borsh_codec::composite;
///
/// #[derive(Default)]
/// struct Account {
///     id: u64,
///     owner: String,
///     balances: Vec<u128>,
///     checksum: [u8; 4],
/// }
///
/// composite!(Account {
///     id,
///     owner,
///     balances,
///     #[read_only]
///     checksum,
/// });
/// ```
#[macro_export]
macro_rules! composite {
    ($ty:ident { $( $(#[$attr:ident])? $field:ident ),* $(,)? }) => {
        impl $crate::Composite for $ty {
            const NAME: &'static str = stringify!($ty);

            #[allow(unused_variables)]
            fn describe<V: $crate::FieldVisitor<Self>>(visitor: &mut V) -> $crate::Result<()> {
                $( $crate::composite!(@field visitor, $($attr)? ; $field); )*
                Ok(())
            }
        }

        $crate::impl_composite_codec!($ty);
    };

    (@field $visitor:ident, read_only ; $field:ident) => {
        $visitor.read_only(stringify!($field), |s| &s.$field)?
    };

    (@field $visitor:ident, ; $field:ident) => {
        $visitor.field(stringify!($field), |s| &s.$field, |s| &mut s.$field)?
    };
}

impl Composite for () {
    const NAME: &'static str = "unit";

    fn describe<V: FieldVisitor<Self>>(_visitor: &mut V) -> Result<()> {
        Ok(())
    }
}

impl_composite_codec!(());

macro_rules! impl_tuple {
    ($($name:ident . $idx:tt),+) => {
        impl<$($name: Encode + Decode + Default),+> Composite for ($($name,)+) {
            const NAME: &'static str = "tuple";

            fn describe<V: FieldVisitor<Self>>(visitor: &mut V) -> Result<()> {
                $( visitor.field(stringify!($idx), |s| &s.$idx, |s| &mut s.$idx)?; )+
                Ok(())
            }
        }

        impl<$($name: Encode + Decode + Default),+> Classify for ($($name,)+) {
            fn shape() -> Shape {
                composite_shape::<Self>()
            }

            fn min_encoded_size() -> usize {
                fields_min_size::<Self>()
            }
        }

        impl<$($name: Encode + Decode + Default),+> Encode for ($($name,)+) {
            fn encode(&self, writer: &mut Writer) -> Result<()> {
                encode_fields(self, writer)
            }

            fn validate(&self) -> Result<()> {
                validate_fields(self)
            }

            fn encoded_len(&self) -> usize {
                fields_len(self)
            }
        }

        impl<$($name: Encode + Decode + Default),+> Decode for ($($name,)+) {
            fn decode(reader: &mut Reader<'_>) -> Result<Self> {
                decode_fields(reader)
            }
        }
    };
}

impl_tuple!(A.0);
impl_tuple!(A.0, B.1);
impl_tuple!(A.0, B.1, C.2);
impl_tuple!(A.0, B.1, C.2, D.3);
impl_tuple!(A.0, B.1, C.2, D.3, E.4);
impl_tuple!(A.0, B.1, C.2, D.3, E.4, F.5);
