//! Array shape support.
//!
//! XDMF `Dimensions` attributes list one or more extents separated by
//! whitespace (`"12"`, `"4 3"`). The element count of a DataItem is the
//! product of those extents.

use smallvec::SmallVec;

use super::{Error, Result};

/// Dimensions of a DataItem array.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dimensions {
    /// Size of each dimension. Empty means no extent was declared.
    dims: SmallVec<[usize; 4]>,
}

impl Dimensions {
    /// Create 1D dimensions.
    pub fn d1(size: usize) -> Self {
        Self { dims: smallvec::smallvec![size] }
    }

    /// Parse a whitespace separated list of extents.
    pub fn parse(text: &str) -> Result<Self> {
        let dims = text
            .split_whitespace()
            .map(|tok| {
                tok.parse::<usize>()
                    .map_err(|_| Error::malformed(format!("invalid Dimensions value '{}'", text)))
            })
            .collect::<Result<SmallVec<[usize; 4]>>>()?;
        Ok(Self { dims })
    }

    /// Total number of elements; zero when no extent was declared.
    pub fn num_points(&self) -> usize {
        if self.dims.is_empty() {
            0
        } else {
            self.dims.iter().product()
        }
    }
}

impl From<usize> for Dimensions {
    fn from(size: usize) -> Self {
        Self::d1(size)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, s) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, " x ")?;
            }
            write!(f, "{}", s)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single() {
        let d = Dimensions::parse("12").unwrap();
        assert_eq!(d.num_points(), 12);
        assert_eq!(d.to_string(), "[12]");
    }

    #[test]
    fn test_parse_multi() {
        let d = Dimensions::parse(" 4  3 ").unwrap();
        assert_eq!(d.num_points(), 12);
        assert_eq!(format!("{}", d), "[4 x 3]");
    }

    #[test]
    fn test_empty_is_zero() {
        let d = Dimensions::parse("").unwrap();
        assert_eq!(d.to_string(), "[]");
        assert_eq!(d.num_points(), 0);
        assert_eq!(Dimensions::default().num_points(), 0);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(Dimensions::parse("4 x"), Err(Error::MalformedDocument(_))));
        assert!(Dimensions::parse("-3").is_err());
    }

    #[test]
    fn test_from_conversions() {
        let d: Dimensions = 100.into();
        assert_eq!(d, Dimensions::parse("100").unwrap());
    }
}
