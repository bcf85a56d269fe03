//! Verb handlers and method extraction from loaded modules

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::RouteError;
use crate::loader::{ModuleLoader, SourceFile};

/// Path parameters captured from the request URL
pub type Params = HashMap<String, String>;

type HandlerFn = dyn Fn(&Params) -> serde_json::Result<Value> + Send + Sync;

// ============================================================================
// Verb
// ============================================================================

/// HTTP verbs recognized as handler names
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
    Connect,
}

impl Verb {
    pub const ALL: [Verb; 9] = [
        Verb::Get,
        Verb::Post,
        Verb::Put,
        Verb::Delete,
        Verb::Patch,
        Verb::Head,
        Verb::Options,
        Verb::Trace,
        Verb::Connect,
    ];

    /// Lowercase name, as used for module exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Delete => "delete",
            Verb::Patch => "patch",
            Verb::Head => "head",
            Verb::Options => "options",
            Verb::Trace => "trace",
            Verb::Connect => "connect",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The name is not a recognized verb
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVerb(pub String);

impl fmt::Display for UnknownVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown HTTP verb `{}`", self.0)
    }
}

impl std::error::Error for UnknownVerb {}

impl FromStr for Verb {
    type Err = UnknownVerb;

    /// Case-insensitive: `GET`, `Get` and `get` all parse to [`Verb::Get`]
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Verb::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownVerb(name.to_string()))
    }
}

// ============================================================================
// Handler
// ============================================================================

/// A verb handler: path parameters in, JSON-serializable body out
///
/// Cheap to clone; clones share the same function.
///
/// # Examples
///
/// ```
/// use fsroute::{Handler, Params};
///
/// let handler = Handler::new(|params: &Params| format!("The variable is {}", params["variable"]));
///
/// let mut params = Params::new();
/// params.insert("variable".to_string(), "42".to_string());
/// assert_eq!(handler.call(&params).unwrap(), "The variable is 42");
/// ```
#[derive(Clone)]
pub struct Handler {
    func: Arc<HandlerFn>,
}

impl Handler {
    pub fn new<F, T>(func: F) -> Self
    where
        F: Fn(&Params) -> T + Send + Sync + 'static,
        T: Serialize,
    {
        Self {
            func: Arc::new(move |params: &Params| serde_json::to_value(func(params))),
        }
    }

    /// Runs the handler and serializes its result
    pub fn call(&self, params: &Params) -> serde_json::Result<Value> {
        (self.func)(params)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

// ============================================================================
// MethodMap
// ============================================================================

/// Handlers of one route file keyed by verb
#[derive(Debug, Clone, Default)]
pub struct MethodMap {
    handlers: BTreeMap<Verb, Handler>,
}

impl MethodMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler, replacing any previous one for the verb
    pub fn insert(&mut self, verb: Verb, handler: Handler) -> Option<Handler> {
        self.handlers.insert(verb, handler)
    }

    pub fn get(&self, verb: Verb) -> Option<&Handler> {
        self.handlers.get(&verb)
    }

    pub fn contains(&self, verb: Verb) -> bool {
        self.handlers.contains_key(&verb)
    }

    /// Verbs with a handler, in declaration order of [`Verb`]
    pub fn verbs(&self) -> impl Iterator<Item = Verb> + '_ {
        self.handlers.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Verb, &Handler)> {
        self.handlers.iter().map(|(verb, handler)| (*verb, handler))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Loads `source` and collects its verb-named exports
///
/// Export names are compared case-insensitively and stored under the
/// lowercase verb. If a module exports both `GET` and `get`, the lowercase
/// export wins. Names that are not verbs are ignored.
pub fn extract_methods<L>(source: &SourceFile, loader: &L) -> Result<MethodMap, RouteError>
where
    L: ModuleLoader + ?Sized,
{
    let module = loader
        .load(source)
        .map_err(|source_err| RouteError::HandlerLoad {
            path: source.path.clone(),
            source: source_err,
        })?;

    let mut methods = MethodMap::new();
    for (name, handler) in module.iter() {
        let Ok(verb) = name.parse::<Verb>() else {
            continue;
        };
        if methods.contains(verb) && name != verb.as_str() {
            continue;
        }
        methods.insert(verb, handler.clone());
    }

    debug!(
        path = %source.path.display(),
        verbs = ?methods.verbs().map(|v| v.as_str()).collect::<Vec<_>>(),
        "extracted handlers"
    );

    Ok(methods)
}
