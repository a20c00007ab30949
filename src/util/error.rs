//! Error types for the XDMF importer.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for XDMF import operations.
///
/// Every variant is fatal to the import that raised it. The only
/// recoverable condition (an unsupported attribute) never becomes an
/// `Error`; it is logged and skipped by the attribute extractor.
#[derive(Error, Debug)]
pub enum Error {
    /// Referenced binary payload could not be located
    #[error("Unable to find data file '{reference}' (searched under {})", searched.display())]
    Resolution { reference: String, searched: PathBuf },

    /// DataItem uses a storage format other than raw binary
    #[error("Non-binary formats unsupported: {0}")]
    UnsupportedFormat(String),

    /// Declared array extends past the end of its payload file
    #[error("Truncated data in {}: need {required} bytes, file has {available}", path.display())]
    TruncatedData { path: PathBuf, required: u64, available: u64 },

    /// Topology type other than Triangle
    #[error("Unsupported topology type: {0}")]
    UnsupportedTopology(String),

    /// Geometry type other than XYZ
    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    /// Document version below 3.0
    #[error("Unsupported XDMF version: {0}")]
    UnsupportedVersion(String),

    /// Required node or attribute missing, or structurally inconsistent
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Flat array length incompatible with the requested shape
    #[error("Shape mismatch: {len} elements cannot form {rows} rows of {cols}")]
    ShapeMismatch { len: usize, rows: String, cols: usize },

    /// XML could not be parsed
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// Host rejected a mesh description
    #[error("Materialization failed: {0}")]
    Materialize(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a malformed document error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }

    /// Create a shape mismatch error for `len` elements reshaped to
    /// `rows` x `cols`, where `None` rows means "inferred".
    pub fn shape(len: usize, rows: Option<usize>, cols: usize) -> Self {
        let rows = rows.map_or_else(|| "-1".to_string(), |r| r.to_string());
        Self::ShapeMismatch { len, rows, cols }
    }
}

/// Result type alias for XDMF operations.
pub type Result<T> = std::result::Result<T, Error>;
