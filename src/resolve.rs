//! Payload file resolution.
//!
//! DataItems reference their payload by an absolute path, a path relative
//! to wherever the producer ran, or a bare file name. Simulation outputs
//! are routinely moved after being written, so a reference that does not
//! exist verbatim is looked up by base name under the document directory.
//!
//! ## Search order
//!
//! 1. the reference verbatim
//! 2. the reference joined to the document directory (relative only)
//! 3. a depth-first search for the base name under the document
//!    directory: in each directory, files are checked before any
//!    subdirectory is entered, and subdirectories are visited in ascending
//!    name order. Symlinked directories are not followed.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::util::{Error, Result};

/// Default limit on directory nesting explored by the fallback search.
pub const DEFAULT_MAX_SEARCH_DEPTH: usize = 32;

/// Where the document being imported lives.
///
/// Created once per import and only ever borrowed afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceContext {
    file_name: String,
    directory: PathBuf,
}

impl SourceContext {
    /// Create a context from explicit parts.
    pub fn new(file_name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self { file_name: file_name.into(), directory: directory.into() }
    }

    /// Build the context for a document path, made absolute against the
    /// current directory.
    pub fn from_document(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::malformed(format!("not a document path: {}", path.display())))?;
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();

        Ok(Self { file_name, directory })
    }

    /// Document file name, e.g. `run.xmf`.
    #[inline]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Directory containing the document.
    #[inline]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Document file name without its extension, e.g. `run`.
    pub fn stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or(&self.file_name)
    }
}

/// Locates payload files referenced by a document.
#[derive(Clone, Copy, Debug)]
pub struct PathResolver<'a> {
    context: &'a SourceContext,
    max_depth: usize,
}

impl<'a> PathResolver<'a> {
    pub fn new(context: &'a SourceContext) -> Self {
        Self { context, max_depth: DEFAULT_MAX_SEARCH_DEPTH }
    }

    /// Limit how many directory levels below the document directory the
    /// fallback search descends.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub fn context(&self) -> &'a SourceContext {
        self.context
    }

    /// Resolve a payload reference to an existing file.
    pub fn resolve(&self, reference: &str) -> Result<PathBuf> {
        let reference = reference.trim();
        let not_found = || Error::Resolution {
            reference: reference.to_string(),
            searched: self.context.directory.clone(),
        };

        if reference.is_empty() {
            return Err(not_found());
        }

        let direct = Path::new(reference);
        if direct.exists() {
            return Ok(direct.to_path_buf());
        }

        if direct.is_relative() {
            let joined = self.context.directory.join(direct);
            if joined.exists() {
                tracing::debug!(reference, path = %joined.display(), "resolved relative to document");
                return Ok(joined);
            }
        }

        let name = direct.file_name().ok_or_else(not_found)?;
        tracing::info!(
            reference,
            dir = %self.context.directory.display(),
            "unable to find payload as given, searching document tree"
        );

        search(&self.context.directory, name, self.max_depth).ok_or_else(not_found)
    }
}

/// Depth-first search for a file called `name` under `dir`.
fn search(dir: &Path, name: &OsStr, depth_left: usize) -> Option<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return None;
        }
    };

    let mut entries: Vec<_> = entries.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.file_name());

    if let Some(hit) = entries
        .iter()
        .find(|e| e.file_name().as_os_str() == name && e.path().is_file())
    {
        return Some(hit.path());
    }

    if depth_left == 0 {
        return None;
    }

    entries
        .iter()
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .find_map(|e| search(&e.path(), name, depth_left - 1))
}
