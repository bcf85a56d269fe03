//! Per-route dispatch by request method

use std::sync::Arc;

use serde_json::Value;

use crate::handler::{MethodMap, Params, Verb};
use crate::route::RouteEntry;

/// Dispatch wrapper registered for one [`RouteEntry`]
///
/// Selects the handler for the request method. The method map is shared and
/// immutable, so clones can be called from any number of tasks at once.
///
/// # Examples
///
/// ```
/// use fsroute::{Convention, Dispatcher, Handler, MethodMap, Params, RouteEntry, Verb};
///
/// let mut methods = MethodMap::new();
/// methods.insert(Verb::Get, Handler::new(|_: &Params| "Hello World"));
/// let entry = RouteEntry::new("routes/api/index.py", "routes", &Convention::new("py"), methods);
///
/// let dispatcher = Dispatcher::new(&entry);
/// assert_eq!(dispatcher.name(), "api_index");
/// assert_eq!(dispatcher.call("GET", &Params::new()).unwrap().unwrap(), "Hello World");
/// assert!(dispatcher.call("POST", &Params::new()).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    name: Arc<str>,
    methods: Arc<MethodMap>,
}

impl Dispatcher {
    pub fn new(entry: &RouteEntry) -> Self {
        Self {
            name: Arc::from(entry.handler_name()),
            methods: Arc::new(entry.methods().clone()),
        }
    }

    /// The entry's handler name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calls the handler for `method` (case-insensitive)
    ///
    /// `None` when the route has no handler for the method; what that means
    /// for the response is up to the caller.
    pub fn call(&self, method: &str, params: &Params) -> Option<serde_json::Result<Value>> {
        let verb = method.parse::<Verb>().ok()?;
        let handler = self.methods.get(verb)?;
        Some(handler.call(params))
    }

    /// Verbs this route answers to
    pub fn allowed(&self) -> Vec<Verb> {
        self.methods.verbs().collect()
    }
}
