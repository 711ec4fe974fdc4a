//! Request handlers for the dev store's REST contract.

use super::*;

use vfbrowse::model::{VersionOptions, VersionToken};
use vfbrowse::remote::{PROTOCOL_VERSION, PROTOCOL_VERSION_HEADER};

pub(super) async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

pub(super) async fn require_bearer(
    State(state): State<Arc<AppState>>,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return unauthorized();
    };
    let Ok(value) = value.to_str() else {
        return unauthorized();
    };
    let Some(token) = value.strip_prefix("Bearer ") else {
        return unauthorized();
    };
    if token != state.dev_token {
        tracing::debug!("rejected bearer token");
        return unauthorized();
    }
    next.run(req).await
}

fn require_protocol(headers: &HeaderMap) -> Result<(), Response> {
    match headers
        .get(PROTOCOL_VERSION_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        Some(v) if v.trim() == PROTOCOL_VERSION => Ok(()),
        Some(v) => Err(bad_request(&format!("unsupported protocol version {:?}", v))),
        None => Err(bad_request(&format!(
            "missing {} header",
            PROTOCOL_VERSION_HEADER
        ))),
    }
}

pub(super) async fn list_root(State(state): State<Arc<AppState>>) -> Response {
    list_key(&state, "").await
}

pub(super) async fn list(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Response {
    list_key(&state, &path).await
}

async fn list_key(state: &AppState, raw: &str) -> Response {
    let key = match normalize(raw) {
        Ok(k) => k,
        Err(err) => return tree_error(err),
    };
    let tree = state.tree.read().await;
    match tree.describe(&key) {
        Ok(descriptor) => Json(descriptor).into_response(),
        Err(err) => tree_error(err),
    }
}

pub(super) async fn download(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Response {
    let key = match normalize(&path) {
        Ok(k) => k,
        Err(err) => return tree_error(err),
    };
    let tree = state.tree.read().await;
    match tree.content(&key) {
        Ok(bytes) => content_bytes(mime_for(&key), bytes),
        Err(err) => tree_error(err),
    }
}

pub(super) async fn version_info(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = require_protocol(&headers) {
        return resp;
    }
    let key = match normalize(&path) {
        Ok(k) => k,
        Err(err) => return tree_error(err),
    };
    let tree = state.tree.read().await;
    match tree.version_set(&key) {
        Ok(set) => Json(set).into_response(),
        Err(err) => tree_error(err),
    }
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct VersionQuery {
    version: Option<String>,
}

pub(super) async fn version_download(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    Query(q): Query<VersionQuery>,
) -> Response {
    let token = match q.version.as_deref() {
        None => VersionToken::Default,
        Some(raw) => match raw.parse::<VersionToken>() {
            Ok(t) => t,
            Err(err) => return bad_request(&err.to_string()),
        },
    };
    let key = match normalize(&path) {
        Ok(k) => k,
        Err(err) => return tree_error(err),
    };
    let tree = state.tree.read().await;
    match tree.version_content(&key, token) {
        Ok(bytes) => content_bytes(mime_for(&key), bytes),
        Err(err) => tree_error(err),
    }
}

pub(super) async fn version_upload(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    body: Bytes,
) -> Response {
    let key = match normalize(&path) {
        Ok(k) => k,
        Err(err) => return tree_error(err),
    };
    let mut tree = state.tree.write().await;
    match tree.upload(&key, body.to_vec()) {
        Ok(set) => Json(set).into_response(),
        Err(err) => tree_error(err),
    }
}

pub(super) async fn set_options(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
    Json(options): Json<VersionOptions>,
) -> Response {
    if let Err(resp) = require_protocol(&headers) {
        return resp;
    }
    let key = match normalize(&path) {
        Ok(k) => k,
        Err(err) => return tree_error(err),
    };
    let mut tree = state.tree.write().await;
    match tree.set_options(&key, &options) {
        Ok(set) => Json(set).into_response(),
        Err(err) => tree_error(err),
    }
}
