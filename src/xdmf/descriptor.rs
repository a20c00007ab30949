//! DataItem metadata.

use roxmltree::Node;

use super::{optional_attr, parse_attr, required_attr, DATA_ITEM};
use crate::util::{Dimensions, NumberType, Result};

/// Storage format of binary payloads, the only one decoded.
pub const BINARY_FORMAT: &str = "Binary";

/// How to locate and interpret one numeric array.
///
/// Parsed fresh from each `DataItem` and dropped once the array has been
/// decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct DataDescriptor {
    /// `Name`, used to pick out connectivity and coordinate items.
    pub name: Option<String>,
    /// `Format`, e.g. `Binary` or `XML`.
    pub format: String,
    /// `DataType` (or its alias `NumberType`), e.g. `Float` or `Int`.
    pub data_type: String,
    /// `Precision` in bytes, if given.
    pub precision: Option<i64>,
    /// `Seek`: byte offset into the payload file.
    pub seek: u64,
    /// `Dimensions`: declared extents.
    pub dimensions: Dimensions,
    /// Element text; a file reference for binary items.
    pub text: String,
}

impl DataDescriptor {
    /// Descriptor for a binary payload of `count` elements.
    pub fn binary(
        reference: impl Into<String>,
        data_type: impl Into<String>,
        precision: Option<i64>,
        seek: u64,
        count: usize,
    ) -> Self {
        Self {
            name: None,
            format: BINARY_FORMAT.to_string(),
            data_type: data_type.into(),
            precision,
            seek,
            dimensions: Dimensions::d1(count),
            text: reference.into(),
        }
    }

    /// Read the attributes and text of a `DataItem` element.
    pub fn from_node(node: Node<'_, '_>) -> Result<Self> {
        let format = required_attr(node, "Format", DATA_ITEM)?.to_string();
        let data_type = match optional_attr(node, "DataType").or_else(|| optional_attr(node, "NumberType")) {
            Some(t) => t.to_string(),
            None => required_attr(node, "DataType", DATA_ITEM)?.to_string(),
        };
        let dimensions = match node.attribute("Dimensions") {
            Some(text) => Dimensions::parse(text)?,
            None => Dimensions::default(),
        };

        Ok(Self {
            name: node.attribute("Name").map(str::to_string),
            format,
            data_type,
            precision: parse_attr(node, "Precision", DATA_ITEM)?,
            seek: parse_attr(node, "Seek", DATA_ITEM)?.unwrap_or(0),
            dimensions,
            text: node.text().unwrap_or_default().to_string(),
        })
    }

    /// Declared element count.
    #[inline]
    pub fn count(&self) -> usize {
        self.dimensions.num_points()
    }

    /// Element type after applying the resolution table.
    #[inline]
    pub fn number_type(&self) -> NumberType {
        NumberType::resolve(&self.data_type, self.precision)
    }

    #[inline]
    pub fn is_binary(&self) -> bool {
        self.format == BINARY_FORMAT
    }
}
