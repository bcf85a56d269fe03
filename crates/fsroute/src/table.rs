//! The route table of a routes directory

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::convention::Convention;
use crate::error::RouteError;
use crate::loader::ModuleLoader;
use crate::path::normalize_root;
use crate::route::RouteEntry;
use crate::scanner::scan;

/// Every route under one root directory, in scan order
///
/// Computed once by [`RouteTable::build`]; a failure to load any file fails
/// the whole build, so a table is never partial.
#[derive(Debug, Clone)]
pub struct RouteTable {
    root: PathBuf,
    absolute: bool,
    convention: Convention,
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Builds the table for `path` using the default [`Convention`]
    ///
    /// `absolute` is recorded but does not change the result.
    pub fn build<L>(path: impl AsRef<Path>, absolute: bool, loader: &L) -> Result<Self, RouteError>
    where
        L: ModuleLoader + ?Sized,
    {
        Self::build_with(path, absolute, Convention::default(), loader)
    }

    /// Builds the table for `path` under an explicit convention
    pub fn build_with<L>(
        path: impl AsRef<Path>,
        absolute: bool,
        convention: Convention,
        loader: &L,
    ) -> Result<Self, RouteError>
    where
        L: ModuleLoader + ?Sized,
    {
        let root = normalize_root(path.as_ref());

        let entries = scan(&root, &convention)?
            .into_iter()
            .map(|file| RouteEntry::load(file, &root, &convention, loader))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(root = %root.display(), routes = entries.len(), "built route table");

        Ok(Self {
            root,
            absolute,
            convention,
            entries,
        })
    }

    /// The normalized scan root
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn absolute(&self) -> bool {
        self.absolute
    }

    pub fn convention(&self) -> &Convention {
        &self.convention
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RouteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry whose URL pattern is exactly `url`
    pub fn find_by_url(&self, url: &str) -> Option<&RouteEntry> {
        self.entries.iter().find(|entry| entry.route_url() == url)
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a RouteEntry;
    type IntoIter = std::slice::Iter<'a, RouteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
