//! Mesh descriptions produced by the importer.

use std::collections::BTreeMap;

use crate::util::{BBox3f, Error, Result, Vec3};

/// One grid, ready to hand to a host.
///
/// Built once per `Grid` element and consumed once by
/// [`Materialize::materialize`](crate::host::Materialize::materialize).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshDescription {
    /// Grid name, or the document stem when the grid has none.
    pub name: String,
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Triangles as indices into `positions`.
    pub triangles: Vec<[u32; 3]>,
    /// Per-vertex scalar fields by name.
    pub fields: BTreeMap<String, Vec<f32>>,
    /// Time step value.
    pub time: f64,
}

impl MeshDescription {
    /// Create an empty description.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Get number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Get number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&[f32]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Minimum and maximum of a field, ignoring NaNs.
    pub fn field_range(&self, name: &str) -> Option<(f32, f32)> {
        let values = self.fields.get(name)?;
        values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Bounding box of the vertex positions.
    pub fn bounds(&self) -> BBox3f {
        BBox3f::from_points(&self.positions)
    }

    /// Check that every field has one value per vertex.
    ///
    /// Triangle indices are not checked against the vertex count.
    pub fn validate(&self) -> Result<()> {
        let num_vertices = self.num_vertices();
        for (name, values) in &self.fields {
            if values.len() != num_vertices {
                tracing::debug!(name = %name, len = values.len(), num_vertices, "field length mismatch");
                return Err(Error::shape(values.len(), Some(num_vertices), 1));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshDescription {
        let mut mesh = MeshDescription::new("quad");
        mesh.positions = vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y];
        mesh.triangles = vec![[0, 1, 2], [0, 2, 3]];
        mesh.fields.insert("p".into(), vec![3.0, f32::NAN, -1.0, 2.0]);
        mesh
    }

    #[test]
    fn test_counts_and_bounds() {
        let mesh = quad();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_triangles(), 2);
        let b = mesh.bounds();
        assert_eq!(b.min, Vec3::ZERO);
        assert_eq!(b.max, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.field_names().collect::<Vec<_>>(), vec!["p"]);
    }

    #[test]
    fn test_field_range() {
        let mesh = quad();
        assert_eq!(mesh.field_range("p"), Some((-1.0, 3.0)));
        assert_eq!(mesh.field_range("q"), None);
    }

    #[test]
    fn test_validate() {
        let mut mesh = quad();
        assert!(mesh.validate().is_ok());
        mesh.fields.insert("short".into(), vec![1.0]);
        assert!(matches!(mesh.validate(), Err(Error::ShapeMismatch { len: 1, cols: 1, .. })));
    }
}
