//! # fsroute
//!
//! File-system routing for axum. A directory tree of handler files becomes a
//! route table:
//!
//! - Index files (`api/index.rs`) route to their directory (`/api/`)
//! - Leaf files (`api/about.rs`) route to their stem (`/api/about/`)
//! - Parameter directories (`api/_user/`) become `<user>` segments
//! - Parameter files (`api/_id.rs`) become a trailing `<id>/` segment
//!
//! Each file is loaded through a [`ModuleLoader`] and its top-level exports
//! named after HTTP verbs (`get`, `post`, ...) become the route's handlers.
//!
//! ## Pipeline
//!
//! ```text
//! root dir → scanner → file paths → (path, handler) per file → RouteEntry
//!          → RouteTable → registrar → axum::Router
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use fsroute::{register, static_loader, Params, RouteTable};
//!
//! let loader = static_loader! {
//!     "api/index.rs" => { get: |_: &Params| "Hello World" },
//!     "api/_name.rs" => { get: |params: &Params| format!("Hello {}", params["name"]) },
//! };
//!
//! let table = RouteTable::build("routes", false, &loader)?;
//! let app: axum::Router = register(&table, axum::Router::new())?;
//! # Ok::<(), fsroute::RouteError>(())
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod convention;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod loader;
pub mod path;
pub mod registrar;
pub mod route;
pub mod scanner;
pub mod table;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{Config, ConfigError};
pub use convention::Convention;
pub use dispatch::Dispatcher;
pub use error::{CollisionKind, LoadError, RouteError};
pub use handler::{extract_methods, Handler, MethodMap, Params, Verb};
pub use loader::{Module, ModuleLoader, SourceFile, StaticLoader, TomlLoader};
pub use path::{clip_path, handler_name, normalize_root, to_axum_path, to_route_url};
pub use registrar::register;
pub use route::RouteEntry;
pub use scanner::scan;
pub use table::RouteTable;

/// Builds a [`StaticLoader`] from a table of root-relative paths and verb
/// handlers.
///
/// ```
/// use fsroute::{static_loader, Params};
///
/// fn list_users(_: &Params) -> Vec<&'static str> {
///     vec!["alice", "bob"]
/// }
///
/// let loader = static_loader! {
///     "users/index.rs" => { get: list_users },
///     "users/_id.rs" => {
///         get: |params: &Params| params["id"].clone(),
///         delete: |_: &Params| "deleted",
///     },
/// };
/// assert_eq!(loader.len(), 2);
/// ```
#[macro_export]
macro_rules! static_loader {
    ($($path:literal => { $($verb:ident : $handler:expr),* $(,)? }),* $(,)?) => {
        $crate::StaticLoader::new()
            $(
                .module(
                    $path,
                    $crate::Module::new()
                        $(.export(stringify!($verb), $crate::Handler::new($handler)))*,
                )
            )*
    };
}
