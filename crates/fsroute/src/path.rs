//! Path translation from route files to URL patterns
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use crate::convention::PARAM_MARKER;

/// Normalizes a scan root lexically
///
/// Drops `.` components, folds `name/..` pairs and trailing separators.
/// The filesystem is never consulted, so symlinks are not resolved.
///
/// # Examples
///
/// ```
/// use fsroute::normalize_root;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(normalize_root(Path::new("routes/")), PathBuf::from("routes"));
/// assert_eq!(normalize_root(Path::new("./app/../routes")), PathBuf::from("routes"));
/// assert_eq!(normalize_root(Path::new("")), PathBuf::from("."));
/// ```
pub fn normalize_root(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Removes the root prefix from a discovered file path
///
/// Only the first occurrence of the root is removed, and native separators
/// are kept.
///
/// # Examples
///
/// ```
/// use fsroute::clip_path;
/// use std::path::Path;
///
/// let clipped = clip_path(Path::new("/srv/routes"), Path::new("/srv/routes/api/index.py"));
/// assert_eq!(clipped, "/api/index.py");
/// ```
pub fn clip_path(root: &Path, file: &Path) -> String {
    let root = root.to_string_lossy();
    file.to_string_lossy().replacen(root.as_ref(), "", 1)
}

/// Converts a clipped file path into a URL pattern
///
/// **Pure function**, applied in order:
///
/// 1. Native separators become `/`
/// 2. A terminal `index_name` segment is dropped (`/api/index.py` → `/api/`)
/// 3. Directory segments `_name` become `<name>`
/// 4. A terminal `_name.<ext>` becomes `<name>/`
/// 5. Any other terminal file loses its extension (`/about.py` → `/about/`)
///
/// The result always starts and ends with `/` and never contains `//`.
///
/// # Examples
///
/// ```
/// use fsroute::to_route_url;
///
/// assert_eq!(to_route_url("/api/index.py", "index.py"), "/api/");
/// assert_eq!(to_route_url("/api/_id.py", "index.py"), "/api/<id>/");
/// assert_eq!(to_route_url("/api/_user/_post.py", "index.py"), "/api/<user>/<post>/");
/// assert_eq!(to_route_url("\\api\\about.py", "index.py"), "/api/about/");
/// assert_eq!(to_route_url("/index.py", "index.py"), "/");
/// ```
pub fn to_route_url(clipped: &str, index_name: &str) -> String {
    let swapped = swap_separators(clipped);
    let extension = index_name.rsplit_once('.').map(|(_, ext)| ext);

    let mut segments: Vec<&str> = swapped.split('/').filter(|s| !s.is_empty()).collect();

    // An index file routes to its directory
    let leaf = match segments.pop() {
        Some(leaf) if leaf == index_name => None,
        leaf => leaf,
    };

    let state = segments
        .into_iter()
        .fold(UrlState::default(), process_segment);

    match leaf {
        Some(leaf) => process_segment(state, strip_extension(leaf, extension)),
        None => state,
    }
    .finalize()
}

/// Derives the handler name registered for a clipped path
///
/// The extension and leading separators are dropped, and anything that is not
/// an ASCII letter, digit or `_` becomes `_`.
///
/// # Examples
///
/// ```
/// use fsroute::handler_name;
///
/// assert_eq!(handler_name("/api/index.py", "py"), "api_index");
/// assert_eq!(handler_name("/api/_id.py", "py"), "api__id");
/// assert_eq!(handler_name("/api/user-list.py", "py"), "api_user_list");
/// ```
pub fn handler_name(clipped: &str, extension: &str) -> String {
    let swapped = swap_separators(clipped);
    let relative = swapped.trim_start_matches('/');
    let stem = relative
        .strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(relative);

    stem.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Rewrites `<name>` placeholders into axum's `:name` captures
///
/// Returns `Cow::Borrowed` when the URL has no parameters.
///
/// # Examples
///
/// ```
/// use fsroute::to_axum_path;
///
/// assert_eq!(to_axum_path("/api/<user>/posts/<id>/"), "/api/:user/posts/:id/");
/// assert_eq!(to_axum_path("/api/"), "/api/");
/// ```
pub fn to_axum_path(url: &str) -> Cow<'_, str> {
    map_params(url, |name| format!(":{}", name))
}

/// URL with parameter names erased, so `/<a>/` and `/<b>/` compare equal
pub(crate) fn url_shape(url: &str) -> Cow<'_, str> {
    map_params(url, |_| "<>".to_string())
}

/// Validates a URL pattern produced by [`to_route_url`]
///
/// # Rules
///
/// - Must start and end with `/`
/// - Must not contain `//` or `\`
///
/// # Examples
///
/// ```
/// use fsroute::path::is_valid_route_url;
///
/// assert!(is_valid_route_url("/"));
/// assert!(is_valid_route_url("/api/<id>/"));
///
/// assert!(!is_valid_route_url(""));
/// assert!(!is_valid_route_url("/api"));
/// assert!(!is_valid_route_url("api/"));
/// assert!(!is_valid_route_url("/api//id/"));
/// ```
pub fn is_valid_route_url(url: &str) -> bool {
    url.starts_with('/') && url.ends_with('/') && !url.contains("//") && !url.contains('\\')
}

/// Parameter name of a `_name` segment, if it is one
///
/// A bare marker (`_`) is a static segment.
pub fn parameter_name(segment: &str) -> Option<&str> {
    segment
        .strip_prefix(PARAM_MARKER)
        .filter(|name| !name.is_empty())
}

// ============================================================================
// Internal helpers
// ============================================================================

/// Accumulator for the segment fold in [`to_route_url`]
#[derive(Default)]
struct UrlState {
    url: String,
}

impl UrlState {
    fn with_static_segment(mut self, segment: &str) -> Self {
        self.url.push('/');
        self.url.push_str(segment);
        self
    }

    fn with_param(mut self, name: &str) -> Self {
        self.url.push_str("/<");
        self.url.push_str(name);
        self.url.push('>');
        self
    }

    fn finalize(mut self) -> String {
        self.url.push('/');
        self.url
    }
}

fn process_segment(state: UrlState, segment: &str) -> UrlState {
    match parameter_name(segment) {
        Some(name) => state.with_param(name),
        None => state.with_static_segment(segment),
    }
}

fn strip_extension<'a>(leaf: &'a str, extension: Option<&str>) -> &'a str {
    extension
        .and_then(|ext| leaf.strip_suffix(ext))
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
        .unwrap_or(leaf)
}

fn swap_separators(path: &str) -> Cow<'_, str> {
    if path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    }
}

fn map_params<F>(url: &str, rewrite: F) -> Cow<'_, str>
where
    F: Fn(&str) -> String,
{
    if !url.contains('<') {
        return Cow::Borrowed(url);
    }

    let mapped = url
        .split('/')
        .map(|segment| {
            match segment
                .strip_prefix('<')
                .and_then(|rest| rest.strip_suffix('>'))
            {
                Some(name) => rewrite(name),
                None => segment.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("/");

    Cow::Owned(mapped)
}
