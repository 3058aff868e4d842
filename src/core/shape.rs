//! # Type Classifier
//!
//! Every type the codec understands classifies into exactly one [`Shape`].
//! The shape is a property of the static type, never of a runtime value, and
//! nothing about it is written to the wire: two types with the same shape
//! produce the same bytes for the same data.
//!
//! ```text
//! bool            -> Boolean
//! i8 .. u128      -> Integer { bits, signed }
//! f32, f64, F128  -> Float { bits }
//! String, str     -> String
//! [T; N]          -> FixedArray { elem: T, len: N }
//! Vec<T>, [T]     -> DynamicSequence { elem: T }
//! structs, tuples -> Composite { name, fields }
//! ```
//!
//! A composite that contains itself (through a sequence) is described once;
//! the inner occurrence is a [`Shape::Recursive`] reference by name.

use std::fmt;

use crate::config::LENGTH_PREFIX_SIZE;

/// The parameter-free tag of a [`Shape`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Boolean,
    Integer,
    Float,
    String,
    FixedArray,
    DynamicSequence,
    Composite,
}

/// A named field of a composite shape, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldShape {
    pub name: &'static str,
    pub shape: Shape,
}

/// Classification of a type for the codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Boolean,
    Integer { bits: u16, signed: bool },
    Float { bits: u16 },
    String,
    FixedArray { elem: Box<Shape>, len: usize },
    DynamicSequence { elem: Box<Shape> },
    Composite {
        name: &'static str,
        fields: Vec<FieldShape>,
    },
    /// Back-reference to an enclosing composite that is still being described
    Recursive { name: &'static str },
}

impl Shape {
    /// The bare tag of this shape
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Boolean => ShapeKind::Boolean,
            Shape::Integer { .. } => ShapeKind::Integer,
            Shape::Float { .. } => ShapeKind::Float,
            Shape::String => ShapeKind::String,
            Shape::FixedArray { .. } => ShapeKind::FixedArray,
            Shape::DynamicSequence { .. } => ShapeKind::DynamicSequence,
            Shape::Composite { .. } | Shape::Recursive { .. } => ShapeKind::Composite,
        }
    }

    /// Whether this is one of the indivisible scalar shapes
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Shape::Boolean | Shape::Integer { .. } | Shape::Float { .. } | Shape::String
        )
    }

    /// Exact encoded size shared by every value of this shape.
    ///
    /// `None` when the size depends on the value, i.e. the shape is or
    /// contains a String or DynamicSequence.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Shape::Boolean => Some(1),
            Shape::Integer { bits, .. } | Shape::Float { bits } => Some(usize::from(*bits) / 8),
            Shape::String | Shape::DynamicSequence { .. } | Shape::Recursive { .. } => None,
            Shape::FixedArray { elem, len } => elem.fixed_size()?.checked_mul(*len),
            Shape::Composite { fields, .. } => fields
                .iter()
                .try_fold(0usize, |acc, f| acc.checked_add(f.shape.fixed_size()?)),
        }
    }

    /// Fewest bytes any value of this shape can occupy on the wire.
    ///
    /// Saturates instead of overflowing; a saturated bound can never be
    /// satisfied by a real buffer, which is what the decode guard wants.
    /// A `Recursive` reference counts as 0.
    pub fn min_encoded_size(&self) -> usize {
        match self {
            Shape::Boolean => 1,
            Shape::Integer { bits, .. } | Shape::Float { bits } => usize::from(*bits) / 8,
            Shape::String | Shape::DynamicSequence { .. } => LENGTH_PREFIX_SIZE,
            Shape::Recursive { .. } => 0,
            Shape::FixedArray { elem, len } => elem.min_encoded_size().saturating_mul(*len),
            Shape::Composite { fields, .. } => fields
                .iter()
                .fold(0usize, |acc, f| acc.saturating_add(f.shape.min_encoded_size())),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Boolean => f.write_str("bool"),
            Shape::Integer { bits, signed } => {
                write!(f, "{}{bits}", if *signed { 'i' } else { 'u' })
            }
            Shape::Float { bits } => write!(f, "f{bits}"),
            Shape::String => f.write_str("string"),
            Shape::FixedArray { elem, len } => write!(f, "[{elem}; {len}]"),
            Shape::DynamicSequence { elem } => write!(f, "seq<{elem}>"),
            Shape::Composite { name, .. } | Shape::Recursive { name } => f.write_str(name),
        }
    }
}

/// Static classification of a type into its [`Shape`].
///
/// Implemented by every type that implements [`Encode`](crate::Encode) or
/// [`Decode`](crate::Decode); the codec never inspects a value to decide
/// how to transcode it.
pub trait Classify {
    /// The shape of this type
    fn shape() -> Shape;

    /// Fewest bytes any value of this type occupies on the wire
    fn min_encoded_size() -> usize {
        Self::shape().min_encoded_size()
    }
}

impl<T: Classify + ?Sized> Classify for &T {
    fn shape() -> Shape {
        T::shape()
    }

    fn min_encoded_size() -> usize {
        T::min_encoded_size()
    }
}

impl<T: Classify + ?Sized> Classify for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }

    fn min_encoded_size() -> usize {
        T::min_encoded_size()
    }
}
