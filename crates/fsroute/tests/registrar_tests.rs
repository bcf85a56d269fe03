//! Integration tests for registering route tables on axum

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use fsroute::*;
use rstest::rstest;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// The basic demo tree: `/api/` and `/api/<variable>/`
fn basic_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "api/index.toml",
        "get = \"Welcome to the Base API path\"\n",
    );
    write(
        dir.path(),
        "api/_variable.toml",
        "get = \"The variable is {variable}\"\n\n[put]\nupdated = \"{variable}\"\n",
    );
    dir
}

fn build(dir: &Path) -> RouteTable {
    RouteTable::build_with(dir, false, Convention::new("toml"), &TomlLoader).unwrap()
}

async fn request(app: &Router, method: &str, uri: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Option<Value>) {
    let response = request(app, method, uri).await;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).ok();
    (status, body)
}

#[tokio::test]
async fn test_get_index_route() {
    let dir = basic_tree();
    let app = register(&build(dir.path()), Router::new()).unwrap();

    let (status, body) = send(&app, "GET", "/api/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Some(json!("Welcome to the Base API path")));
}

#[tokio::test]
async fn test_trailing_slash_is_optional() {
    let dir = basic_tree();
    let app = register(&build(dir.path()), Router::new()).unwrap();

    let (status, body) = send(&app, "GET", "/api").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Some(json!("Welcome to the Base API path")));
}

#[tokio::test]
async fn test_path_parameters_reach_handler() {
    let dir = basic_tree();
    let app = register(&build(dir.path()), Router::new()).unwrap();

    let (status, body) = send(&app, "GET", "/api/42/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Some(json!("The variable is 42")));

    let (status, body) = send(&app, "PUT", "/api/hello").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Some(json!({ "updated": "hello" })));
}

#[tokio::test]
async fn test_missing_method_is_not_allowed() {
    let dir = basic_tree();
    let app = register(&build(dir.path()), Router::new()).unwrap();

    let response = request(&app, "POST", "/api/").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET");

    let response = request(&app, "DELETE", "/api/42/").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET, PUT");
}

#[tokio::test]
async fn test_undecodable_parameter_is_rejected() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "users/_id.rs", "");

    let loader = static_loader! {
        "users/_id.rs" => { get: |params: &Params| params.get("id").cloned() },
    };
    let table = RouteTable::build(dir.path(), false, &loader).unwrap();
    let app = register(&table, Router::new()).unwrap();

    let (status, _) = send(&app, "GET", "/users/%FF/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/users/%C3%A9/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Some(json!("é")));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let dir = basic_tree();
    let app = register(&build(dir.path()), Router::new()).unwrap();

    let (status, _) = send(&app, "GET", "/nothing/here/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_root_index_route() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "index.toml", "get = { status = \"ok\" }\n");
    let app = register(&build(dir.path()), Router::new()).unwrap();

    let (status, body) = send(&app, "GET", "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Some(json!({ "status": "ok" })));
}

#[tokio::test]
async fn test_static_loader_routes() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "users/_id.rs", "");

    let loader = static_loader! {
        "users/_id.rs" => {
            get: |params: &Params| json!({ "user": params["id"] }),
            delete: |_: &Params| Value::Null,
        },
    };
    let table = RouteTable::build(dir.path(), false, &loader).unwrap();
    let app = register(&table, Router::new()).unwrap();

    let (status, body) = send(&app, "GET", "/users/alice/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Some(json!({ "user": "alice" })));

    let (status, body) = send(&app, "DELETE", "/users/alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Some(Value::Null));
}

#[test]
fn test_handler_name_collision_at_registration() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/b_c.toml", "get = 1\n");
    write(dir.path(), "a_b/c.toml", "get = 2\n");

    // Building succeeds; the collision only matters to the router
    let table = build(dir.path());
    assert_eq!(table.len(), 2);

    let err = register(&table, Router::<()>::new()).unwrap_err();
    match err {
        RouteError::RouteCollision { kind, key, .. } => {
            assert_eq!(kind, CollisionKind::HandlerName);
            assert_eq!(key, "a_b_c");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_url_collision_at_registration() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "api.toml", "get = 1\n");
    write(dir.path(), "api/index.toml", "get = 2\n");

    let table = build(dir.path());
    let err = register(&table, Router::<()>::new()).unwrap_err();
    assert!(matches!(
        err,
        RouteError::RouteCollision { kind: CollisionKind::Url, ref key, .. } if key == "/api/"
    ));
}

#[test]
fn test_parameter_name_collision_at_registration() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "api/_x.toml", "get = 1\n");
    write(dir.path(), "api/_y.toml", "get = 2\n");

    let table = build(dir.path());
    let err = register(&table, Router::<()>::new()).unwrap_err();
    assert!(matches!(
        err,
        RouteError::RouteCollision { kind: CollisionKind::Url, .. }
    ));
}

#[test]
fn test_capture_name_conflict_at_registration() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "_user/posts.toml", "get = 1\n");
    write(dir.path(), "_id.toml", "get = 2\n");

    let table = build(dir.path());
    let err = register(&table, Router::<()>::new()).unwrap_err();
    assert!(matches!(
        err,
        RouteError::RouteCollision { kind: CollisionKind::Parameter, .. }
    ));
}

#[rstest]
#[case("api/*all.toml")]
#[case("api/:lit.toml")]
#[case(":lit/index.toml")]
fn test_capture_syntax_in_static_segment_is_rejected(#[case] relative: &str) {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "api/index.toml", "get = 1\n");
    write(dir.path(), relative, "get = 2\n");

    let table = build(dir.path());
    let err = register(&table, Router::<()>::new()).unwrap_err();
    match err {
        RouteError::InvalidSegment { segment, path, .. } => {
            assert!(segment.starts_with([':', '*']), "{segment}");
            assert_eq!(path, dir.path().join(relative));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_table_registers_nothing() {
    let dir = TempDir::new().unwrap();
    let table = build(dir.path());

    assert!(table.is_empty());
    assert!(register(&table, Router::<()>::new()).is_ok());
}
