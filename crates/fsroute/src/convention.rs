//! File naming convention shared by the scanner and the translator

use std::path::Path;

use crate::path;

/// Marker prefix for parameter segments
pub const PARAM_MARKER: char = '_';

/// Extension used when none is configured
pub const DEFAULT_EXTENSION: &str = "rs";

/// Naming convention for route files
///
/// The convention is fixed apart from the source-file extension:
///
/// - `index.<ext>` is a directory's own route
/// - a leading `_` marks a parameter segment (`_id.<ext>`, `_user/`)
///
/// # Examples
///
/// ```
/// use fsroute::Convention;
///
/// let convention = Convention::new("py");
/// assert_eq!(convention.index_name(), "index.py");
/// assert_eq!(convention.route_url("/api/_id.py"), "/api/<id>/");
/// assert_eq!(convention.handler_name("/api/index.py"), "api_index");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convention {
    extension: String,
    index_name: String,
}

impl Convention {
    /// Creates a convention for files ending in `.<extension>`
    ///
    /// A leading dot is ignored, so `"py"` and `".py"` are equivalent.
    pub fn new(extension: impl AsRef<str>) -> Self {
        let extension = extension.as_ref().trim_start_matches('.').to_string();
        let index_name = format!("index.{}", extension);
        Self {
            extension,
            index_name,
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The index file name, `index.<ext>`
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Whether `path` names a route file under this convention
    pub fn matches(&self, path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some(self.extension.as_str())
    }

    /// Converts a clipped path into its URL pattern
    pub fn route_url(&self, clipped: &str) -> String {
        path::to_route_url(clipped, &self.index_name)
    }

    /// Derives the registered handler name of a clipped path
    pub fn handler_name(&self, clipped: &str) -> String {
        path::handler_name(clipped, &self.extension)
    }
}

impl Default for Convention {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}
