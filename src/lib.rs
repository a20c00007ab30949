//! # XDMF
//!
//! Reader for XDMF (.xmf) triangle meshes whose numeric payloads live in
//! raw binary files next to the document.
//!
//! An XDMF document is XML metadata: it names the payload file of every
//! array and says how to read it (element type, precision, byte offset,
//! element count). This crate resolves those files, maps them, and
//! assembles each `Grid` into a [`MeshDescription`] of vertex positions,
//! triangles and per-vertex scalar fields, which it hands to a host
//! through the [`Materialize`] trait.
//!
//! ## Modules
//!
//! - [`util`] - Basic types (NumberType, Dimensions, errors, math)
//! - [`resolve`] - Payload file lookup relative to the document
//! - [`binary`] - Bounded, zero-copy typed payload views
//! - [`xdmf`] - Document model: extractors, grid assembly, document walk
//! - [`mesh`] - Mesh descriptions
//! - [`host`] - Host materialization interface
//!
//! ## Example
//!
//! ```ignore
//! use xdmf::prelude::*;
//!
//! let meshes = read_document("run/step_0010.xmf")?;
//! for mesh in &meshes {
//!     println!("{}: {} vertices, {} triangles", mesh.name, mesh.num_vertices(), mesh.num_triangles());
//! }
//! ```

pub mod util;
pub mod resolve;
pub mod binary;
pub mod xdmf;
pub mod mesh;
pub mod host;
pub mod options;

// Re-export commonly used types
pub use util::{Error, NumberType, Result};
pub use host::{Materialize, MeshCollector};
pub use mesh::MeshDescription;
pub use options::ImportOptions;
pub use xdmf::{import_document, read_document, Importer};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, NumberType, Result, Vec3};
    pub use crate::host::{Materialize, MeshCollector};
    pub use crate::mesh::MeshDescription;
    pub use crate::options::ImportOptions;
    pub use crate::xdmf::{import_document, read_document, Importer};
}
