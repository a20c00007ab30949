//! Import configuration.

use crate::resolve::DEFAULT_MAX_SEARCH_DEPTH;

/// Knobs for one import.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportOptions {
    /// Memory map payload files instead of reading them. Ignored without
    /// the `mmap` feature.
    pub use_mmap: bool,
    /// Assemble grids on the rayon pool. Hosts still receive meshes one at
    /// a time, in document order. Ignored without the `parallel` feature.
    pub parallel: bool,
    /// Directory levels searched below the document for moved payloads.
    pub max_search_depth: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            use_mmap: cfg!(feature = "mmap"),
            parallel: false,
            max_search_depth: DEFAULT_MAX_SEARCH_DEPTH,
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_search_depth(mut self, depth: usize) -> Self {
        self.max_search_depth = depth;
        self
    }
}
