//! Attribute (per-vertex field) extraction.

use std::collections::BTreeMap;

use roxmltree::Node;

use super::{child, children, required_attr, DataDescriptor, ATTRIBUTE, DATA_ITEM};
use crate::binary::ArrayDecoder;
use crate::util::{Error, Result};

/// Supported `AttributeType`.
pub const SCALAR: &str = "Scalar";

/// Supported `Center`.
pub const NODE_CENTER: &str = "Node";

/// An attribute left out because its type or centering is unsupported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedAttribute {
    pub name: String,
    pub attribute_type: Option<String>,
    pub center: Option<String>,
}

/// Fields extracted from one grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeSet {
    /// Per-vertex scalar fields by name.
    pub fields: BTreeMap<String, Vec<f32>>,
    /// Attributes that were skipped, in document order.
    pub skipped: Vec<SkippedAttribute>,
}

/// Extract every `Attribute` child of a `Grid`.
///
/// Only node-centered scalars are kept. Anything else is logged as a
/// warning and recorded in [`AttributeSet::skipped`]; it is not an error.
/// The payload of every attribute is decoded before that check, so a
/// broken payload fails the import even for an attribute that would be
/// skipped. A repeated name replaces the earlier field.
pub fn extract_attributes(grid: Node<'_, '_>, decoder: &ArrayDecoder<'_>) -> Result<AttributeSet> {
    let mut set = AttributeSet::default();

    for node in children(grid, ATTRIBUTE) {
        let name = required_attr(node, "Name", ATTRIBUTE)?;
        let attribute_type = node.attribute("AttributeType");
        let center = node.attribute("Center");

        let data = child(node, DATA_ITEM)
            .ok_or_else(|| Error::malformed(format!("missing attribute data for '{}'", name)))?;
        let desc = DataDescriptor::from_node(data)?;
        let values = decoder.decode(&desc)?.view()?.to_f32_vec();

        if attribute_type != Some(SCALAR) || center != Some(NODE_CENTER) {
            tracing::warn!(
                name,
                attribute_type = attribute_type.unwrap_or("<none>"),
                center = center.unwrap_or("<none>"),
                "unsupported attribute format, skipping"
            );
            set.skipped.push(SkippedAttribute {
                name: name.to_string(),
                attribute_type: attribute_type.map(str::to_string),
                center: center.map(str::to_string),
            });
            continue;
        }

        tracing::debug!(name, len = values.len(), "adding attribute");
        if set.fields.insert(name.to_string(), values).is_some() {
            tracing::debug!(name, "attribute replaces an earlier one with the same name");
        }
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{PathResolver, SourceContext};
    use crate::xdmf::test_util::write_payload;
    use roxmltree::Document;
    use tempfile::TempDir;

    fn extract(dir: &TempDir, xml: &str) -> Result<AttributeSet> {
        let ctx = SourceContext::new("doc.xmf", dir.path());
        let decoder = ArrayDecoder::new(PathResolver::new(&ctx));
        let doc = Document::parse(xml)?;
        extract_attributes(doc.root_element(), &decoder)
    }

    #[test]
    fn test_scalar_kept_vector_skipped() -> Result<()> {
        let dir = TempDir::new()?;
        write_payload(dir.path(), "temp.bin", &[1.0f64, 2.0, 3.0, 4.0]);
        write_payload(dir.path(), "vel.bin", &[0.0f32; 6]);

        let set = extract(
            &dir,
            r#"<Grid>
                 <Attribute Name="temperature" AttributeType="Scalar" Center="Node">
                   <DataItem Format="Binary" DataType="Float" Precision="8" Dimensions="4">temp.bin</DataItem>
                 </Attribute>
                 <Attribute Name="velocity" AttributeType="Vector" Center="Cell">
                   <DataItem Format="Binary" DataType="Float" Dimensions="2 3">vel.bin</DataItem>
                 </Attribute>
               </Grid>"#,
        )?;

        assert_eq!(set.fields.len(), 1);
        assert_eq!(set.fields["temperature"], vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(set.skipped.len(), 1);
        assert_eq!(set.skipped[0].name, "velocity");
        assert_eq!(set.skipped[0].attribute_type.as_deref(), Some("Vector"));
        assert_eq!(set.skipped[0].center.as_deref(), Some("Cell"));
        Ok(())
    }

    #[test]
    fn test_int_payload_coerced() -> Result<()> {
        let dir = TempDir::new()?;
        write_payload(dir.path(), "ids.bin", &[7i32, 8, 9]);

        let set = extract(
            &dir,
            r#"<Grid>
                 <Attribute Name="id" AttributeType="Scalar" Center="Node">
                   <DataItem Format="Binary" DataType="Int" Dimensions="3">ids.bin</DataItem>
                 </Attribute>
               </Grid>"#,
        )?;
        assert_eq!(set.fields["id"], vec![7.0, 8.0, 9.0]);
        Ok(())
    }

    #[test]
    fn test_duplicate_name_last_wins() -> Result<()> {
        let dir = TempDir::new()?;
        write_payload(dir.path(), "a.bin", &[1.0f32, 1.0]);
        write_payload(dir.path(), "b.bin", &[2.0f32, 2.0]);

        let set = extract(
            &dir,
            r#"<Grid>
                 <Attribute Name="p" AttributeType="Scalar" Center="Node">
                   <DataItem Format="Binary" DataType="Float" Dimensions="2">a.bin</DataItem>
                 </Attribute>
                 <Attribute Name="p" AttributeType="Scalar" Center="Node">
                   <DataItem Format="Binary" DataType="Float" Dimensions="2">b.bin</DataItem>
                 </Attribute>
               </Grid>"#,
        )?;
        assert_eq!(set.fields.len(), 1);
        assert_eq!(set.fields["p"], vec![2.0, 2.0]);
        Ok(())
    }

    #[test]
    fn test_missing_centering_skipped() -> Result<()> {
        let dir = TempDir::new()?;
        write_payload(dir.path(), "a.bin", &[1.0f32]);

        let set = extract(
            &dir,
            r#"<Grid>
                 <Attribute Name="p" AttributeType="Scalar">
                   <DataItem Format="Binary" DataType="Float" Dimensions="1">a.bin</DataItem>
                 </Attribute>
               </Grid>"#,
        )?;
        assert!(set.fields.is_empty());
        assert_eq!(set.skipped.len(), 1);
        assert_eq!(set.skipped[0].center, None);
        Ok(())
    }

    #[test]
    fn test_missing_data_item() -> Result<()> {
        let dir = TempDir::new()?;
        let err = extract(
            &dir,
            r#"<Grid><Attribute Name="p" AttributeType="Scalar" Center="Node"/></Grid>"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(m) if m.contains("missing attribute data")));
        Ok(())
    }

    #[test]
    fn test_skipped_attribute_payload_still_decoded() -> Result<()> {
        let dir = TempDir::new()?;
        let err = extract(
            &dir,
            r#"<Grid>
                 <Attribute Name="v" AttributeType="Vector" Center="Node">
                   <DataItem Format="XML" DataType="Float" Dimensions="3">1 2 3</DataItem>
                 </Attribute>
               </Grid>"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
        Ok(())
    }

    #[test]
    fn test_no_attributes() -> Result<()> {
        let dir = TempDir::new()?;
        let set = extract(&dir, "<Grid/>")?;
        assert_eq!(set, AttributeSet::default());
        Ok(())
    }
}
