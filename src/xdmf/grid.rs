//! Grid assembly.
//!
//! A grid moves through these stages; any error moves it to `Failed`:
//!
//! ```text
//! Start -> ValidatedNodes -> TopologyExtracted -> GeometryExtracted
//!       -> AttributesExtracted -> Assembled
//! ```

use std::fmt;

use roxmltree::Node;

use super::{child, extract_attributes, extract_geometry, extract_topology, parse_attr};
use super::{GEOMETRY, TIME, TOPOLOGY};
use crate::binary::ArrayDecoder;
use crate::mesh::MeshDescription;
use crate::util::{Error, Result};

/// Progress of one grid through assembly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GridStage {
    #[default]
    Start,
    ValidatedNodes,
    TopologyExtracted,
    GeometryExtracted,
    AttributesExtracted,
    Assembled,
    Failed,
}

impl GridStage {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::ValidatedNodes => "validated-nodes",
            Self::TopologyExtracted => "topology-extracted",
            Self::GeometryExtracted => "geometry-extracted",
            Self::AttributesExtracted => "attributes-extracted",
            Self::Assembled => "assembled",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for GridStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds a [`MeshDescription`] from one `Grid` element.
#[derive(Debug)]
pub struct GridAssembler<'a> {
    decoder: ArrayDecoder<'a>,
    stage: GridStage,
    failed_after: Option<GridStage>,
}

impl<'a> GridAssembler<'a> {
    pub fn new(decoder: ArrayDecoder<'a>) -> Self {
        Self { decoder, stage: GridStage::Start, failed_after: None }
    }

    /// Current stage.
    #[inline]
    pub fn stage(&self) -> GridStage {
        self.stage
    }

    /// Last stage reached before failing, if assembly failed.
    #[inline]
    pub fn failed_after(&self) -> Option<GridStage> {
        self.failed_after
    }

    /// Assemble `grid`. Required children are checked before anything is
    /// decoded.
    #[tracing::instrument(skip_all, fields(grid = grid.attribute("Name").unwrap_or("")))]
    pub fn assemble(&mut self, grid: Node<'_, '_>) -> Result<MeshDescription> {
        self.stage = GridStage::Start;
        self.failed_after = None;

        match self.run(grid) {
            Ok(mesh) => Ok(mesh),
            Err(e) => {
                tracing::error!(after = %self.stage, error = %e, "grid import failed");
                self.failed_after = Some(self.stage);
                self.stage = GridStage::Failed;
                Err(e)
            }
        }
    }

    fn run(&mut self, grid: Node<'_, '_>) -> Result<MeshDescription> {
        let (time_node, topology, geometry) = match (
            child(grid, TIME),
            child(grid, TOPOLOGY),
            child(grid, GEOMETRY),
        ) {
            (Some(t), Some(topo), Some(geom)) => (t, topo, geom),
            (t, topo, geom) => {
                let missing: Vec<&str> = [(TIME, t.is_none()), (TOPOLOGY, topo.is_none()), (GEOMETRY, geom.is_none())]
                    .into_iter()
                    .filter_map(|(tag, absent)| absent.then_some(tag))
                    .collect();
                return Err(Error::malformed(format!("Grid is missing {}", missing.join(", "))));
            }
        };
        let time: f64 = parse_attr(time_node, "Value", TIME)?
            .ok_or_else(|| Error::malformed("Time is missing required attribute Value"))?;
        self.advance(GridStage::ValidatedNodes);
        tracing::info!(time, "importing time step");

        let triangles = extract_topology(topology, &self.decoder)?;
        self.advance(GridStage::TopologyExtracted);

        let positions = extract_geometry(geometry, &self.decoder)?;
        self.advance(GridStage::GeometryExtracted);

        let attributes = extract_attributes(grid, &self.decoder)?;
        self.advance(GridStage::AttributesExtracted);

        let name = grid
            .attribute("Name")
            .unwrap_or_else(|| self.decoder.resolver().context().stem());
        let mesh = MeshDescription {
            name: name.to_string(),
            positions,
            triangles,
            fields: attributes.fields,
            time,
        };
        mesh.validate()?;
        self.advance(GridStage::Assembled);

        tracing::info!(
            name = %mesh.name,
            vertices = mesh.num_vertices(),
            triangles = mesh.num_triangles(),
            fields = mesh.fields.len(),
            skipped = attributes.skipped.len(),
            "assembled grid"
        );
        Ok(mesh)
    }

    fn advance(&mut self, stage: GridStage) {
        tracing::trace!(from = %self.stage, to = %stage, "grid stage");
        self.stage = stage;
    }
}

/// Assemble one grid with a fresh [`GridAssembler`].
pub fn assemble_grid(grid: Node<'_, '_>, decoder: &ArrayDecoder<'_>) -> Result<MeshDescription> {
    GridAssembler::new(*decoder).assemble(grid)
}
