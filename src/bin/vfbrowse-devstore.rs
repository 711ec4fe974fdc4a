use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tokio::sync::RwLock;

#[path = "vfbrowse_devstore/tree.rs"]
mod tree;
use self::tree::*;
#[path = "vfbrowse_devstore/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "vfbrowse_devstore/handlers.rs"]
mod handlers;
use self::handlers::*;
#[path = "vfbrowse_devstore/routes.rs"]
mod routes;
#[path = "vfbrowse_devstore/runtime.rs"]
mod runtime;

struct AppState {
    dev_token: String,
    tree: RwLock<Tree>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
