//! Topology (connectivity) extraction.

use roxmltree::Node;

use super::{child, parse_attr, required_attr, DataDescriptor, DATA_ITEM, TOPOLOGY};
use crate::binary::ArrayDecoder;
use crate::util::{Error, Result};

/// The only supported topology type.
pub const TRIANGLE: &str = "Triangle";

/// Required name of the connectivity DataItem.
pub const CONNECTIVITY_NAME: &str = "Conn";

/// Extract triangle connectivity from a `Topology` element.
///
/// The connectivity array must hold exactly `NumberOfElements` rows of
/// three vertex indices.
pub fn extract_topology(node: Node<'_, '_>, decoder: &ArrayDecoder<'_>) -> Result<Vec<[u32; 3]>> {
    let topology_type = required_attr(node, "TopologyType", TOPOLOGY)?;
    if topology_type != TRIANGLE {
        return Err(Error::UnsupportedTopology(topology_type.to_string()));
    }

    let count: usize = parse_attr(node, "NumberOfElements", TOPOLOGY)?
        .ok_or_else(|| Error::malformed("Topology is missing NumberOfElements"))?;

    let data = child(node, DATA_ITEM)
        .ok_or_else(|| Error::malformed("Topology has no DataItem"))?;
    let desc = DataDescriptor::from_node(data)?;
    if desc.name.as_deref() != Some(CONNECTIVITY_NAME) {
        return Err(Error::malformed(format!(
            "Topology DataItem must be named '{}', found {:?}",
            CONNECTIVITY_NAME, desc.name
        )));
    }

    let array = decoder.decode(&desc)?;
    let triangles = array.view()?.rows_index::<3>(Some(count))?;
    tracing::debug!(count, path = %array.path().display(), "extracted connectivity");
    Ok(triangles)
}
