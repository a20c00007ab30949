//! Geometry (vertex position) extraction.

use roxmltree::Node;

use super::{descendants, DataDescriptor, DATA_ITEM};
use crate::binary::ArrayDecoder;
use crate::util::{Error, Result, Vec3};

/// The only supported geometry type.
pub const XYZ: &str = "XYZ";

/// Required name of the coordinate DataItem.
pub const COORDINATE_NAME: &str = "Coord";

/// Extract vertex positions from a `Geometry` element.
///
/// The coordinate item is the first `DataItem` named `Coord` anywhere
/// below the element, in document order. Its flat array is read as rows
/// of `x y z`, coerced to f32.
pub fn extract_geometry(node: Node<'_, '_>, decoder: &ArrayDecoder<'_>) -> Result<Vec<Vec3>> {
    let geometry_type = node.attribute("GeometryType");
    if geometry_type != Some(XYZ) {
        return Err(Error::UnsupportedGeometry(geometry_type.unwrap_or("<none>").to_string()));
    }

    let data = descendants(node, DATA_ITEM)
        .find(|n| n.attribute("Name") == Some(COORDINATE_NAME))
        .ok_or_else(|| Error::malformed("missing coordinate information"))?;
    let desc = DataDescriptor::from_node(data)?;

    let array = decoder.decode(&desc)?;
    let positions: Vec<Vec3> = array
        .view()?
        .rows_f32::<3>(None)?
        .into_iter()
        .map(Vec3::from_array)
        .collect();
    tracing::debug!(count = positions.len(), path = %array.path().display(), "extracted coordinates");
    Ok(positions)
}
