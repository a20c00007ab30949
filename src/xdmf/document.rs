//! Document walking: root validation and the Domain / Grid traversal.

use std::path::Path;

use roxmltree::{Document, Node};

use super::{assemble_grid, descendants, parse_attr, DOMAIN, GRID, XDMF};
use crate::binary::ArrayDecoder;
use crate::host::{Materialize, MeshCollector};
use crate::mesh::MeshDescription;
use crate::options::ImportOptions;
use crate::resolve::{PathResolver, SourceContext};
use crate::util::{Error, Result};

/// Lowest XDMF version accepted.
pub const MIN_XDMF_VERSION: f64 = 3.0;

/// Parse an XDMF document. Producers routinely emit a
/// `<!DOCTYPE Xdmf SYSTEM "Xdmf.dtd" []>` header, so DTDs are allowed.
pub fn parse_document(text: &str) -> Result<Document<'_>> {
    let opts = roxmltree::ParsingOptions { allow_dtd: true, ..roxmltree::ParsingOptions::default() };
    Ok(Document::parse_with_options(text, opts)?)
}

/// Check the root element and return the document version.
pub fn validate_root(root: Node<'_, '_>) -> Result<f64> {
    let tag = root.tag_name().name();
    if tag != XDMF {
        return Err(Error::malformed(format!("expected root element '{}', found '{}'", XDMF, tag)));
    }

    let version: f64 = parse_attr(root, "Version", XDMF)?
        .ok_or_else(|| Error::malformed("Xdmf is missing required attribute Version"))?;
    if !version.is_finite() || version < MIN_XDMF_VERSION {
        return Err(Error::UnsupportedVersion(root.attribute("Version").unwrap_or_default().to_string()));
    }
    Ok(version)
}

/// Every `Grid` under every `Domain` of the document, in document order.
pub fn grid_nodes<'a, 'i>(root: Node<'a, 'i>) -> Vec<Node<'a, 'i>> {
    descendants(root, DOMAIN)
        .flat_map(|domain| descendants(domain, GRID))
        .collect()
}

/// Imports XDMF documents into a host.
#[derive(Clone, Copy, Debug, Default)]
pub struct Importer {
    options: ImportOptions,
}

impl Importer {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Import the document at `path`, materializing each grid into `host`.
    ///
    /// Returns the host handles in document order. The first failing grid
    /// aborts the import; grids before it have already been materialized.
    pub fn import<H: Materialize>(&self, path: impl AsRef<Path>, host: &mut H) -> Result<Vec<H::Handle>> {
        self.import_path(path.as_ref(), host)
    }

    /// Import the document at `path` and return the mesh descriptions.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<Vec<MeshDescription>> {
        let mut collector = MeshCollector::new();
        self.import_path(path.as_ref(), &mut collector)?;
        Ok(collector.into_meshes())
    }

    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    fn import_path<H: Materialize>(&self, path: &Path, host: &mut H) -> Result<Vec<H::Handle>> {
        tracing::info!("trying to load document");
        let text = std::fs::read_to_string(path)?;
        let context = SourceContext::from_document(path)?;
        tracing::debug!(dir = %context.directory().display(), "containing directory");
        self.import_str(&text, &context, host)
    }

    /// Import a document already in memory. Payload references resolve
    /// against `context`.
    pub fn import_str<H: Materialize>(
        &self,
        text: &str,
        context: &SourceContext,
        host: &mut H,
    ) -> Result<Vec<H::Handle>> {
        let doc = parse_document(text)?;
        let root = doc.root_element();
        let version = validate_root(root)?;

        let resolver = PathResolver::new(context).with_max_depth(self.options.max_search_depth);
        let decoder = ArrayDecoder::new(resolver).with_mmap(self.options.use_mmap);
        let grids = grid_nodes(root);
        tracing::debug!(version, grids = grids.len(), "walking document");

        let handles = if self.options.parallel {
            self.import_parallel(&grids, &decoder, host)?
        } else {
            let mut handles = Vec::with_capacity(grids.len());
            for grid in &grids {
                let mesh = assemble_grid(*grid, &decoder)?;
                handles.push(host.materialize(mesh)?);
            }
            handles
        };

        tracing::info!(grids = handles.len(), "done importing");
        Ok(handles)
    }

    /// Assemble all grids on the rayon pool, then materialize in document
    /// order up to the first failure.
    #[cfg(feature = "parallel")]
    fn import_parallel<H: Materialize>(
        &self,
        grids: &[Node<'_, '_>],
        decoder: &ArrayDecoder<'_>,
        host: &mut H,
    ) -> Result<Vec<H::Handle>> {
        use rayon::prelude::*;

        let meshes: Vec<Result<MeshDescription>> = grids
            .par_iter()
            .map(|grid| assemble_grid(*grid, decoder))
            .collect();

        let mut handles = Vec::with_capacity(meshes.len());
        for mesh in meshes {
            handles.push(host.materialize(mesh?)?);
        }
        Ok(handles)
    }

    #[cfg(not(feature = "parallel"))]
    fn import_parallel<H: Materialize>(
        &self,
        grids: &[Node<'_, '_>],
        decoder: &ArrayDecoder<'_>,
        host: &mut H,
    ) -> Result<Vec<H::Handle>> {
        tracing::debug!("built without the parallel feature, importing sequentially");
        let mut handles = Vec::with_capacity(grids.len());
        for grid in grids {
            handles.push(host.materialize(assemble_grid(*grid, decoder)?)?);
        }
        Ok(handles)
    }
}

/// Import `path` into `host` with default options.
pub fn import_document<H: Materialize>(path: impl AsRef<Path>, host: &mut H) -> Result<Vec<H::Handle>> {
    Importer::default().import(path, host)
}

/// Read every grid of `path` with default options.
pub fn read_document(path: impl AsRef<Path>) -> Result<Vec<MeshDescription>> {
    Importer::default().read(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_check(xml: &str) -> Result<f64> {
        let doc = parse_document(xml)?;
        validate_root(doc.root_element())
    }

    #[test]
    fn test_version_accepted() {
        assert_eq!(root_check(r#"<Xdmf Version="3.0"/>"#).unwrap(), 3.0);
        assert_eq!(root_check(r#"<Xdmf Version="3.3"/>"#).unwrap(), 3.3);
    }

    #[test]
    fn test_old_version_rejected() {
        let err = root_check(r#"<Xdmf Version="2.0"/>"#).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(v) if v == "2.0"));

        for version in ["NaN", "inf", "-inf"] {
            let xml = format!(r#"<Xdmf Version="{version}"/>"#);
            let err = root_check(&xml).unwrap_err();
            assert!(matches!(err, Error::UnsupportedVersion(ref v) if v == version), "{version}: {err}");
        }
    }

    #[test]
    fn test_doctype_header_accepted() {
        let xml = "<?xml version=\"1.0\" ?>\n<!DOCTYPE Xdmf SYSTEM \"Xdmf.dtd\" []>\n<Xdmf Version=\"3.0\"/>";
        assert_eq!(root_check(xml).unwrap(), 3.0);
    }

    #[test]
    fn test_bad_root() {
        assert!(matches!(root_check(r#"<Mesh Version="3.0"/>"#), Err(Error::MalformedDocument(_))));
        assert!(matches!(root_check(r#"<Xdmf/>"#), Err(Error::MalformedDocument(_))));
        assert!(matches!(root_check(r#"<Xdmf Version="three"/>"#), Err(Error::MalformedDocument(_))));
        assert!(matches!(root_check("<Xdmf"), Err(Error::Xml(_))));
    }

    #[test]
    fn test_grid_nodes_document_order() {
        let doc = Document::parse(
            r#"<Xdmf Version="3.0">
                 <Domain>
                   <Grid Name="a"/>
                   <Grid Name="b"/>
                 </Domain>
                 <Grid Name="outside"/>
                 <Domain>
                   <Grid Name="c"/>
                 </Domain>
               </Xdmf>"#,
        )
        .unwrap();
        let names: Vec<_> = grid_nodes(doc.root_element())
            .iter()
            .map(|g| g.attribute("Name").unwrap())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
