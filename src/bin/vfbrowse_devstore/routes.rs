use super::*;

/// The contract is also mounted here so the client's default base URL works unchanged.
pub(super) const API_PREFIX: &str = "/rest-file-server/rest";

pub(super) fn router(state: Arc<AppState>) -> Router {
    let authed = Router::new()
        .route("/version/upload/*path", post(version_upload))
        .route("/version/setOptions/*path", put(set_options))
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let api = Router::new()
        .route("/list", get(list_root))
        .route("/list/*path", get(list))
        .route("/download/*path", get(download))
        .route("/version/info/*path", get(version_info))
        .route("/version/download/*path", get(version_download))
        .merge(authed);

    Router::new()
        .route("/healthz", get(healthz))
        .nest(API_PREFIX, api.clone())
        .merge(api)
        .with_state(state)
}
