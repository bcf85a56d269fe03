//! One route file and everything derived from it

use std::path::{Path, PathBuf};

use crate::convention::Convention;
use crate::error::RouteError;
use crate::handler::{extract_methods, MethodMap};
use crate::loader::{ModuleLoader, SourceFile};
use crate::path::clip_path;

/// A route derived from a single file
///
/// The URL and handler name are computed once at construction and cached
/// alongside the file they come from.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    file_path: PathBuf,
    root: PathBuf,
    clipped_path: String,
    route_url: String,
    handler_name: String,
    methods: MethodMap,
}

impl RouteEntry {
    /// Builds an entry from already extracted methods
    ///
    /// `root` must be the normalized root the file was discovered under.
    ///
    /// # Examples
    ///
    /// ```
    /// use fsroute::{Convention, MethodMap, RouteEntry};
    ///
    /// let entry = RouteEntry::new(
    ///     "routes/api/_id.py",
    ///     "routes",
    ///     &Convention::new("py"),
    ///     MethodMap::new(),
    /// );
    /// assert_eq!(entry.clipped_path(), "/api/_id.py");
    /// assert_eq!(entry.route_url(), "/api/<id>/");
    /// assert_eq!(entry.handler_name(), "api__id");
    /// ```
    pub fn new(
        file_path: impl Into<PathBuf>,
        root: impl Into<PathBuf>,
        convention: &Convention,
        methods: MethodMap,
    ) -> Self {
        let file_path = file_path.into();
        let root = root.into();
        let clipped_path = clip_path(&root, &file_path);
        let route_url = convention.route_url(&clipped_path);
        let handler_name = convention.handler_name(&clipped_path);

        Self {
            file_path,
            root,
            clipped_path,
            route_url,
            handler_name,
            methods,
        }
    }

    /// Loads `file_path` through `loader` and builds its entry
    pub fn load<L>(
        file_path: PathBuf,
        root: &Path,
        convention: &Convention,
        loader: &L,
    ) -> Result<Self, RouteError>
    where
        L: ModuleLoader + ?Sized,
    {
        let source = SourceFile {
            relative: file_path
                .strip_prefix(root)
                .unwrap_or(&file_path)
                .to_path_buf(),
            path: file_path,
        };
        let methods = extract_methods(&source, loader)?;

        Ok(Self::new(source.path, root, convention, methods))
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path with the root removed, native separators kept
    pub fn clipped_path(&self) -> &str {
        &self.clipped_path
    }

    /// URL pattern, e.g. `/api/<id>/`
    pub fn route_url(&self) -> &str {
        &self.route_url
    }

    /// Name the dispatch function is registered under
    pub fn handler_name(&self) -> &str {
        &self.handler_name
    }

    pub fn methods(&self) -> &MethodMap {
        &self.methods
    }

    /// Parameter names in URL order
    pub fn params(&self) -> Vec<&str> {
        self.route_url
            .split('/')
            .filter_map(|segment| segment.strip_prefix('<')?.strip_suffix('>'))
            .collect()
    }
}
