//! XDMF document model.
//!
//! The subset of XDMF 3 understood here:
//!
//! ```text
//! Xdmf (Version >= 3.0)
//! └── Domain
//!     └── Grid (Name?)
//!         ├── Time (Value)
//!         ├── Topology (TopologyType="Triangle", NumberOfElements)
//!         │   └── DataItem (Name="Conn")
//!         ├── Geometry (GeometryType="XYZ")
//!         │   └── ... DataItem (Name="Coord")
//!         └── Attribute* (Name, AttributeType="Scalar", Center="Node")
//!             └── DataItem
//! ```
//!
//! Every `DataItem` must use `Format="Binary"`; see [`crate::binary`].

use std::str::FromStr;

use roxmltree::Node;

use crate::util::{Error, Result};

mod descriptor;
mod topology;
mod geometry;
mod attribute;
mod grid;
mod document;

pub use descriptor::*;
pub use topology::*;
pub use geometry::*;
pub use attribute::*;
pub use grid::*;
pub use document::*;

// Element names
pub const XDMF: &str = "Xdmf";
pub const DOMAIN: &str = "Domain";
pub const GRID: &str = "Grid";
pub const TIME: &str = "Time";
pub const TOPOLOGY: &str = "Topology";
pub const GEOMETRY: &str = "Geometry";
pub const ATTRIBUTE: &str = "Attribute";
pub const DATA_ITEM: &str = "DataItem";

/// First element child of `node` called `tag`.
pub(crate) fn child<'a, 'i>(node: Node<'a, 'i>, tag: &str) -> Option<Node<'a, 'i>> {
    node.children().find(|n| n.is_element() && n.has_tag_name(tag))
}

/// Element children of `node` called `tag`, in document order.
pub(crate) fn children<'a, 'i: 'a>(
    node: Node<'a, 'i>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'i>> + 'a {
    node.children().filter(move |n| n.is_element() && n.has_tag_name(tag))
}

/// Elements called `tag` under `node` (including `node`), in document order.
pub(crate) fn descendants<'a, 'i: 'a>(
    node: Node<'a, 'i>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'i>> + 'a {
    node.descendants().filter(move |n| n.is_element() && n.has_tag_name(tag))
}

pub(crate) fn optional_attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
}

pub(crate) fn required_attr<'a>(node: Node<'a, '_>, name: &str, element: &str) -> Result<&'a str> {
    node.attribute(name)
        .ok_or_else(|| Error::malformed(format!("{} is missing required attribute {}", element, name)))
}

/// Parse an optional attribute; present but unparsable is an error.
pub(crate) fn parse_attr<T: FromStr>(node: Node<'_, '_>, name: &str, element: &str) -> Result<Option<T>> {
    match node.attribute(name) {
        None => Ok(None),
        Some(text) => text.trim().parse().map(Some).map_err(|_| {
            Error::malformed(format!("{} has invalid {} '{}'", element, name, text))
        }),
    }
}
