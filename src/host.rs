//! Host materialization interface.
//!
//! The importer never builds scene objects itself. Each assembled grid is
//! passed, once and in document order, to a [`Materialize`] implementation
//! supplied by the caller.

use crate::mesh::MeshDescription;
use crate::util::Result;

/// Turns mesh descriptions into host objects.
pub trait Materialize {
    /// Opaque handle the host returns for a created object.
    type Handle;

    /// Create a host object for `mesh`. An error aborts the import.
    fn materialize(&mut self, mesh: MeshDescription) -> Result<Self::Handle>;
}

impl<F, H> Materialize for F
where
    F: FnMut(MeshDescription) -> Result<H>,
{
    type Handle = H;

    fn materialize(&mut self, mesh: MeshDescription) -> Result<H> {
        self(mesh)
    }
}

/// Host that keeps every description it receives.
///
/// Handles are indices into [`MeshCollector::meshes`].
#[derive(Clone, Debug, Default)]
pub struct MeshCollector {
    meshes: Vec<MeshDescription>,
}

impl MeshCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptions received so far, in materialization order.
    pub fn meshes(&self) -> &[MeshDescription] {
        &self.meshes
    }

    pub fn into_meshes(self) -> Vec<MeshDescription> {
        self.meshes
    }
}

impl Materialize for MeshCollector {
    type Handle = usize;

    fn materialize(&mut self, mesh: MeshDescription) -> Result<usize> {
        self.meshes.push(mesh);
        Ok(self.meshes.len() - 1)
    }
}
