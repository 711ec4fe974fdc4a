use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use globset::{Glob, GlobSet, GlobSetBuilder};

use super::routes::{API_PREFIX, router};
use super::*;

#[derive(Parser, Debug)]
#[command(name = "vfbrowse-devstore")]
#[command(about = "In-memory versioned file store (development)", long_about = None)]
pub(super) struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Directory copied into the store at startup
    #[arg(long)]
    root: Option<PathBuf>,

    /// Files matching this glob start out versioned (repeatable)
    #[arg(long = "versioned", value_name = "GLOB")]
    versioned: Vec<String>,

    /// Bearer token accepted for uploads and option changes
    #[arg(long, default_value = "dev")]
    dev_token: String,
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    vfbrowse::logging::init_stderr();

    let state = Arc::new(build_state(&args)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    eprintln!(
        "vfbrowse-devstore listening on {} (also under {})",
        local_addr, API_PREFIX
    );

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

pub(super) fn build_state(args: &Args) -> Result<AppState> {
    let versioned = versioned_globs(&args.versioned)?;
    let tree = match &args.root {
        Some(root) => Tree::seed(root, &versioned)?,
        None => Tree::new(),
    };
    Ok(AppState {
        dev_token: args.dev_token.clone(),
        tree: RwLock::new(tree),
    })
}

fn versioned_globs(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).with_context(|| format!("invalid glob {:?}", pattern))?;
        builder.add(glob);
    }
    builder.build().context("build versioned glob set")
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
#[path = "../../tests/bin/vfbrowse_devstore/runtime_tests.rs"]
mod tests;
