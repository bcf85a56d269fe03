//! Registration of a route table on an axum router

use std::collections::HashMap;

use axum::extract::rejection::PathRejection;
use axum::extract::Path;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use tracing::{error, info, info_span};

use crate::dispatch::Dispatcher;
use crate::error::{CollisionKind, RouteError};
use crate::handler::Params;
use crate::path::{to_axum_path, url_shape};
use crate::route::RouteEntry;
use crate::table::RouteTable;

/// Registers every entry of `table` on `router`
///
/// Each entry is mounted at its URL (parameters in axum's `:name` form) and,
/// unless it is the root, also without the trailing slash. Requests are
/// answered by the entry's [`Dispatcher`]:
///
/// - handler found → `200` with the JSON body
/// - handler failed to serialize its result → `500`
/// - no handler for the method → `405` with an `Allow` header
/// - path parameters that cannot be decoded → axum's rejection (`400`)
///
/// # Errors
///
/// [`RouteError::RouteCollision`] when two entries share a handler name or a
/// URL (parameter names ignored), [`RouteError::InvalidSegment`] when a static
/// segment starts with `:` or `*`. Nothing is registered in either case.
pub fn register<S>(table: &RouteTable, router: Router<S>) -> Result<Router<S>, RouteError>
where
    S: Clone + Send + Sync + 'static,
{
    check_collisions(table)?;

    let span = info_span!("fsroute", root = %table.root().display());
    let _guard = span.enter();

    let router = table.iter().fold(router, |router, entry| {
        let dispatcher = Dispatcher::new(entry);
        let path = to_axum_path(entry.route_url());

        let handler = move |method: Method, params: Result<Path<Params>, PathRejection>| {
            let dispatcher = dispatcher.clone();
            async move {
                let params = match params {
                    Ok(Path(params)) => params,
                    Err(PathRejection::MissingPathParams(_)) => Params::new(),
                    Err(rejection) => return rejection.into_response(),
                };
                respond(&dispatcher, &method, &params)
            }
        };

        let router = router.route(&path, any(handler.clone()));
        let router = match path.strip_suffix('/') {
            Some(bare) if !bare.is_empty() => router.route(bare, any(handler)),
            _ => router,
        };

        info!(
            handler = entry.handler_name(),
            verbs = ?entry.methods().verbs().map(|v| v.as_str()).collect::<Vec<_>>(),
            "registered route {}",
            entry.route_url()
        );

        router
    });

    Ok(router)
}

/// Fails on the first entry that cannot be registered
///
/// Besides equal names and URLs, axum rejects two captures with different
/// names at the same position (`/<user>/posts/` next to `/<id>/`), and reads
/// static segments starting with `:` or `*` as captures.
fn check_collisions(table: &RouteTable) -> Result<(), RouteError> {
    let mut names = HashMap::new();
    let mut shapes = HashMap::new();
    let mut captures: HashMap<String, (&str, &RouteEntry)> = HashMap::new();

    for entry in table {
        if let Some(first) = names.insert(entry.handler_name(), entry) {
            return Err(collision(CollisionKind::HandlerName, entry.handler_name(), first, entry));
        }
        if let Some(first) = shapes.insert(url_shape(entry.route_url()), entry) {
            return Err(collision(CollisionKind::Url, entry.route_url(), first, entry));
        }

        let mut prefix = String::new();
        for segment in entry.route_url().split('/').filter(|s| !s.is_empty()) {
            prefix.push('/');
            if segment.strip_prefix('<').unwrap_or(segment).starts_with([':', '*']) {
                return Err(RouteError::InvalidSegment {
                    segment: segment.to_string(),
                    url: entry.route_url().to_string(),
                    path: entry.file_path().to_path_buf(),
                });
            }
            let Some(name) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) else {
                prefix.push_str(segment);
                continue;
            };
            prefix.push_str("<>");
            match captures.get(&prefix) {
                Some((other, first)) if *other != name => {
                    return Err(collision(CollisionKind::Parameter, entry.route_url(), first, entry));
                }
                Some(_) => {}
                None => {
                    captures.insert(prefix.clone(), (name, entry));
                }
            }
        }
    }

    Ok(())
}

fn collision(kind: CollisionKind, key: &str, first: &RouteEntry, second: &RouteEntry) -> RouteError {
    RouteError::RouteCollision {
        kind,
        key: key.to_string(),
        first: first.file_path().to_path_buf(),
        second: second.file_path().to_path_buf(),
    }
}

fn respond(dispatcher: &Dispatcher, method: &Method, params: &Params) -> Response {
    match dispatcher.call(method.as_str(), params) {
        Some(Ok(body)) => Json(body).into_response(),
        Some(Err(err)) => {
            error!(handler = dispatcher.name(), error = %err, "failed to serialize response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        None => {
            let allow = dispatcher
                .allowed()
                .iter()
                .map(|verb| verb.as_str().to_ascii_uppercase())
                .collect::<Vec<_>>()
                .join(", ");
            (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, allow)]).into_response()
        }
    }
}
