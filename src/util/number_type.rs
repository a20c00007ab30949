//! Numeric element types of binary payloads.

use bytemuck::Pod;
use std::fmt;

/// Element type of a decoded payload array.
///
/// XDMF describes elements with a type tag (`DataType` / `NumberType`) and
/// a byte width (`Precision`). Only four concrete types come out of that
/// pair, see [`NumberType::resolve`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NumberType {
    /// 32-bit IEEE 754 float
    #[default]
    Float32 = 0,
    /// 64-bit IEEE 754 float
    Float64 = 1,
    /// 32-bit signed integer
    Int32 = 2,
    /// 64-bit signed integer
    Int64 = 3,
}

/// Type resolution table, in match order.
///
/// `(type tag, precision, result)`; a `None` tag or precision matches
/// anything. Producers in the wild write arbitrary tags and precisions, so
/// every unmatched combination lands on `Float32` instead of failing.
pub const TYPE_RESOLUTION: &[(Option<&str>, Option<i64>, NumberType)] = &[
    (Some("Float"), Some(4), NumberType::Float32),
    (Some("Float"), Some(8), NumberType::Float64),
    (Some("Float"), None, NumberType::Float32),
    (Some("Int"), Some(8), NumberType::Int64),
    (Some("Int"), None, NumberType::Int32),
    (None, None, NumberType::Float32),
];

impl NumberType {
    /// Resolve a `(DataType, Precision)` pair through [`TYPE_RESOLUTION`].
    ///
    /// `precision` is `None` when the attribute is absent.
    pub fn resolve(type_tag: &str, precision: Option<i64>) -> Self {
        TYPE_RESOLUTION
            .iter()
            .find(|(tag, prec, _)| {
                tag.map_or(true, |t| t == type_tag) && prec.map_or(true, |p| Some(p) == precision)
            })
            .map(|(_, _, ty)| *ty)
            .unwrap_or_default()
    }

    /// Size in bytes of one element.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Float32 | Self::Int32 => 4,
            Self::Float64 | Self::Int64 => 8,
        }
    }

    /// Short name of this type.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
        }
    }
}

impl fmt::Display for NumberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// === Element trait for typed views ===

/// Rust primitive backing a [`NumberType`].
pub trait Element: Pod + Copy + Default + Send + Sync {
    /// The corresponding NumberType value.
    const NUMBER_TYPE: NumberType;

    /// Size of this type in bytes.
    const SIZE: usize = std::mem::size_of::<Self>();

    /// Lossy conversion to f32, the precision of every output field.
    fn to_f32(self) -> f32;

    /// Conversion to a vertex index; `None` for negative, non-integral or
    /// out of range values.
    fn to_index(self) -> Option<u32>;
}

impl Element for f32 {
    const NUMBER_TYPE: NumberType = NumberType::Float32;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn to_index(self) -> Option<u32> {
        (self as f64).to_index()
    }
}

impl Element for f64 {
    const NUMBER_TYPE: NumberType = NumberType::Float64;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn to_index(self) -> Option<u32> {
        if self.is_finite() && self >= 0.0 && self.fract() == 0.0 && self <= u32::MAX as f64 {
            Some(self as u32)
        } else {
            None
        }
    }
}

impl Element for i32 {
    const NUMBER_TYPE: NumberType = NumberType::Int32;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn to_index(self) -> Option<u32> {
        u32::try_from(self).ok()
    }
}

impl Element for i64 {
    const NUMBER_TYPE: NumberType = NumberType::Int64;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn to_index(self) -> Option<u32> {
        u32::try_from(self).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_table() {
        let cases = [
            ("Float", Some(4), NumberType::Float32),
            ("Float", Some(8), NumberType::Float64),
            ("Float", Some(2), NumberType::Float32),
            ("Float", Some(-1), NumberType::Float32),
            ("Float", None, NumberType::Float32),
            ("Int", Some(8), NumberType::Int64),
            ("Int", Some(4), NumberType::Int32),
            ("Int", Some(1), NumberType::Int32),
            ("Int", None, NumberType::Int32),
            ("UInt", Some(8), NumberType::Float32),
            ("Char", Some(1), NumberType::Float32),
            ("", None, NumberType::Float32),
        ];
        for (tag, precision, expected) in cases {
            assert_eq!(NumberType::resolve(tag, precision), expected, "{tag} {precision:?}");
        }
    }

    #[test]
    fn test_sizes() {
        assert_eq!(NumberType::Float32.num_bytes(), f32::SIZE);
        assert_eq!(NumberType::Float64.num_bytes(), f64::SIZE);
        assert_eq!(NumberType::Int32.num_bytes(), i32::SIZE);
        assert_eq!(NumberType::Int64.num_bytes(), i64::SIZE);
        assert_eq!(NumberType::Int64.to_string(), "int64");
    }

    #[test]
    fn test_to_index() {
        assert_eq!(7i32.to_index(), Some(7));
        assert_eq!((-1i64).to_index(), None);
        assert_eq!(3.0f32.to_index(), Some(3));
        assert_eq!(2.5f64.to_index(), None);
        assert_eq!(f32::NAN.to_index(), None);
    }
}
