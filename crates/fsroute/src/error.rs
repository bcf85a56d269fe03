//! Error types for route table construction and registration

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or registering a route table
#[derive(Debug, Error)]
pub enum RouteError {
    /// The scan root does not exist or is not a directory
    #[error("routes directory not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Walking the routes directory failed part way
    #[error("failed to scan routes directory: {0}")]
    Scan(#[from] walkdir::Error),

    /// A discovered file could not be loaded as a handler module
    #[error("failed to load handlers from {}: {source}", path.display())]
    HandlerLoad {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    /// Two entries would register under the same name or URL
    #[error(
        "route collision on {kind} `{key}` between {} and {}",
        first.display(),
        second.display()
    )]
    RouteCollision {
        kind: CollisionKind,
        key: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A static segment would be read by axum as a capture or wildcard
    #[error("invalid segment `{segment}` in route {url} from {}", path.display())]
    InvalidSegment {
        segment: String,
        url: String,
        path: PathBuf,
    },
}

/// What two colliding route entries have in common
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// Same generated handler name
    HandlerName,
    /// Same URL once parameter names are ignored
    Url,
    /// Differently named parameters at the same URL position
    Parameter,
}

impl fmt::Display for CollisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionKind::HandlerName => f.write_str("handler name"),
            CollisionKind::Url => f.write_str("url"),
            CollisionKind::Parameter => f.write_str("parameter names at"),
        }
    }
}

/// Errors reported by a [`ModuleLoader`](crate::ModuleLoader)
#[derive(Debug, Error)]
pub enum LoadError {
    /// No module is known for this file
    #[error("no module registered for {}", .0.display())]
    Unregistered(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The file exists but is not a valid module
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Loader-specific failure
    #[error("{0}")]
    Custom(String),
}
