//! Module loaders: turn a route file into a namespace of named handlers

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use crate::error::LoadError;
use crate::handler::{Handler, Params};

/// A discovered route file as seen by a loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path of the file as discovered by the scanner
    pub path: PathBuf,
    /// Path relative to the scan root
    pub relative: PathBuf,
}

/// Top-level names exported by a loaded route file
///
/// # Examples
///
/// ```
/// use fsroute::{Handler, Module, Params};
///
/// let module = Module::new()
///     .export("get", Handler::new(|_: &Params| "Hello World"))
///     .export("helper", Handler::new(|_: &Params| ()));
///
/// assert_eq!(module.names().collect::<Vec<_>>(), vec!["get", "helper"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Module {
    exports: BTreeMap<String, Handler>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an export (builder style)
    pub fn export(mut self, name: impl Into<String>, handler: Handler) -> Self {
        self.exports.insert(name.into(), handler);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, handler: Handler) {
        self.exports.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.exports.get(name)
    }

    /// Export names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.exports.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Handler)> {
        self.exports
            .iter()
            .map(|(name, handler)| (name.as_str(), handler))
    }

    pub fn len(&self) -> usize {
        self.exports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }
}

/// Loads a route file as a [`Module`]
///
/// Loading may run arbitrary code; sandboxing is up to the implementation.
pub trait ModuleLoader {
    fn load(&self, source: &SourceFile) -> Result<Module, LoadError>;
}

// ============================================================================
// StaticLoader
// ============================================================================

/// Loader backed by a table compiled into the binary
///
/// Modules are keyed by their path relative to the scan root, so the same
/// table works wherever the routes directory is deployed. Files without an
/// entry fail with [`LoadError::Unregistered`].
///
/// See [`static_loader!`](crate::static_loader) for a declarative form.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    modules: HashMap<PathBuf, Module>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `module` for the root-relative path `relative`
    pub fn module(mut self, relative: impl Into<PathBuf>, module: Module) -> Self {
        self.modules.insert(relative.into(), module);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleLoader for StaticLoader {
    fn load(&self, source: &SourceFile) -> Result<Module, LoadError> {
        self.modules
            .get(&source.relative)
            .cloned()
            .ok_or_else(|| LoadError::Unregistered(source.path.clone()))
    }
}

// ============================================================================
// TomlLoader
// ============================================================================

/// Loader for declarative route files written in TOML
///
/// Every top-level key is an export. Its handler responds with the key's
/// value as JSON, with `{name}` in strings replaced by the path parameter
/// `name`.
///
/// ```toml
/// get = "The variable is {variable}"
///
/// [post]
/// status = "created"
/// id = "{variable}"
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlLoader;

impl ModuleLoader for TomlLoader {
    fn load(&self, source: &SourceFile) -> Result<Module, LoadError> {
        let content = fs::read_to_string(&source.path)?;
        let table: toml::Table = content
            .parse()
            .map_err(|err: toml::de::Error| LoadError::Syntax(err.to_string()))?;

        table.into_iter().try_fold(Module::new(), |module, (name, value)| {
            let body = serde_json::to_value(value)
                .map_err(|err| LoadError::Custom(format!("`{}`: {}", name, err)))?;
            Ok(module.export(name, Handler::new(move |params: &Params| fill_placeholders(&body, params))))
        })
    }
}

/// Replaces `{name}` in every string of `value` with `params[name]`
///
/// Unknown placeholders are left as they are.
fn fill_placeholders(value: &Value, params: &Params) -> Value {
    match value {
        Value::String(text) => Value::String(fill_text(text, params)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| fill_placeholders(item, params))
                .collect(),
        ),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, item)| (key.clone(), fill_placeholders(item, params)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Single left-to-right pass, so substituted values are never rescanned
fn fill_text(text: &str, params: &Params) -> String {
    let mut filled = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        filled.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find('}') else {
            rest = &rest[open..];
            break;
        };
        let name = &after[..close];
        if name.contains('{') {
            filled.push('{');
            rest = after;
            continue;
        }

        match params.get(name) {
            Some(param) => filled.push_str(param),
            None => filled.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }

    filled.push_str(rest);
    filled
}
