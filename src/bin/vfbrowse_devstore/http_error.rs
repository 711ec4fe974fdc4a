use super::*;

fn error_json(status: StatusCode, msg: &str) -> Response {
    (status, Json(serde_json::json!({"error": msg}))).into_response()
}

pub(super) fn unauthorized() -> Response {
    error_json(StatusCode::UNAUTHORIZED, "unauthorized")
}

pub(super) fn bad_request(msg: &str) -> Response {
    error_json(StatusCode::BAD_REQUEST, msg)
}

pub(super) fn not_found(msg: &str) -> Response {
    error_json(StatusCode::NOT_FOUND, msg)
}

pub(super) fn conflict(msg: &str) -> Response {
    error_json(StatusCode::CONFLICT, msg)
}

pub(super) fn tree_error(err: TreeError) -> Response {
    let msg = err.to_string();
    match err {
        TreeError::NotFound(_) | TreeError::UnknownVersion(_) => not_found(&msg),
        TreeError::InvalidPath(_) | TreeError::NotVersioned(_) => bad_request(&msg),
        TreeError::Conflict(_) => conflict(&msg),
    }
}

pub(super) fn content_bytes(mime: &str, bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, mime.to_string())], Bytes::from(bytes)).into_response()
}
