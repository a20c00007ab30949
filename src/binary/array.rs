//! Typed views over payload bytes.

use std::borrow::Cow;

use bytemuck::Pod;

use crate::util::{Element, Error, NumberType, Result};

/// Read-only array of one of the supported element types.
///
/// Borrows the payload mapping whenever the bytes are suitably aligned;
/// otherwise holds an aligned copy of exactly the declared range.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedArray<'a> {
    Float32(Cow<'a, [f32]>),
    Float64(Cow<'a, [f64]>),
    Int32(Cow<'a, [i32]>),
    Int64(Cow<'a, [i64]>),
}

/// Apply `$body` to the slice inside any variant.
macro_rules! with_slice {
    ($array:expr, $slice:ident => $body:expr) => {
        match $array {
            TypedArray::Float32(v) => {
                let $slice: &[f32] = v;
                $body
            }
            TypedArray::Float64(v) => {
                let $slice: &[f64] = v;
                $body
            }
            TypedArray::Int32(v) => {
                let $slice: &[i32] = v;
                $body
            }
            TypedArray::Int64(v) => {
                let $slice: &[i64] = v;
                $body
            }
        }
    };
}

impl<'a> TypedArray<'a> {
    /// Interpret native-endian bytes as elements of `ty`.
    ///
    /// `bytes.len()` is expected to be a multiple of the element size.
    pub fn from_bytes(ty: NumberType, bytes: Cow<'a, [u8]>) -> Self {
        match ty {
            NumberType::Float32 => Self::Float32(cast(bytes)),
            NumberType::Float64 => Self::Float64(cast(bytes)),
            NumberType::Int32 => Self::Int32(cast(bytes)),
            NumberType::Int64 => Self::Int64(cast(bytes)),
        }
    }

    #[inline]
    pub fn number_type(&self) -> NumberType {
        match self {
            Self::Float32(_) => NumberType::Float32,
            Self::Float64(_) => NumberType::Float64,
            Self::Int32(_) => NumberType::Int32,
            Self::Int64(_) => NumberType::Int64,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        with_slice!(self, s => s.len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if the elements point straight into the payload mapping.
    pub fn is_borrowed(&self) -> bool {
        match self {
            Self::Float32(v) => matches!(v, Cow::Borrowed(_)),
            Self::Float64(v) => matches!(v, Cow::Borrowed(_)),
            Self::Int32(v) => matches!(v, Cow::Borrowed(_)),
            Self::Int64(v) => matches!(v, Cow::Borrowed(_)),
        }
    }

    /// The elements as `T`, if `T` is this array's element type.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        if T::NUMBER_TYPE != self.number_type() {
            return None;
        }
        with_slice!(self, s => bytemuck::try_cast_slice(s).ok())
    }

    /// All elements coerced to f32.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        with_slice!(self, s => s.iter().map(|v| v.to_f32()).collect())
    }

    /// Reshape to rows of `N` and coerce to f32.
    ///
    /// `rows` of `None` infers the row count from the length.
    pub fn rows_f32<const N: usize>(&self, rows: Option<usize>) -> Result<Vec<[f32; N]>> {
        with_slice!(self, s => Ok(reshape::<_, N>(s, rows)?
            .iter()
            .map(|&row| row.map(Element::to_f32))
            .collect()))
    }

    /// Reshape to rows of `N` vertex indices.
    ///
    /// Negative, fractional or oversized entries are rejected.
    pub fn rows_index<const N: usize>(&self, rows: Option<usize>) -> Result<Vec<[u32; N]>> {
        with_slice!(self, s => {
            let shaped = reshape::<_, N>(s, rows)?;
            let mut out = Vec::with_capacity(shaped.len());
            for (i, row) in shaped.iter().enumerate() {
                let mut idx = [0u32; N];
                for (k, v) in row.iter().enumerate() {
                    idx[k] = v.to_index().ok_or_else(|| {
                        Error::malformed(format!("entry {} is not a valid vertex index", i * N + k))
                    })?;
                }
                out.push(idx);
            }
            Ok(out)
        })
    }
}

fn cast<T: Element>(bytes: Cow<'_, [u8]>) -> Cow<'_, [T]> {
    match bytes {
        Cow::Borrowed(b) => match bytemuck::try_cast_slice(b) {
            Ok(s) => Cow::Borrowed(s),
            // Seek offsets need not respect element alignment.
            Err(_) => Cow::Owned(bytemuck::pod_collect_to_vec(b)),
        },
        Cow::Owned(v) => Cow::Owned(bytemuck::pod_collect_to_vec(&v[..])),
    }
}

/// Row-major reshape of a flat slice into rows of `N`, without copying.
///
/// `rows` of `Some(r)` requires exactly `r * N` elements; `None` infers the
/// row count (the `-1` of a numpy reshape).
pub fn reshape<T: Pod, const N: usize>(flat: &[T], rows: Option<usize>) -> Result<&[[T; N]]> {
    if N == 0 || flat.len() % N != 0 {
        return Err(Error::shape(flat.len(), rows, N));
    }
    if let Some(r) = rows {
        if r.checked_mul(N) != Some(flat.len()) {
            return Err(Error::shape(flat.len(), rows, N));
        }
    }
    Ok(bytemuck::cast_slice(flat))
}
