//! Executes queued browser requests against the store.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::browser::{Completion, Dispatch, Failure, FailureKind, Request, Response};
use crate::model::ContentLocation;
use crate::remote::{RemoteClient, StoreError};

/// Runs one request to completion on the calling thread.
pub fn execute(client: &RemoteClient, request: &Request) -> Result<Response, Failure> {
    let result = match request {
        Request::List { path } => client.list(path).map(Response::Descriptor),
        Request::Content { location } => {
            let bytes = match location {
                ContentLocation::File(path) => client.download(path),
                ContentLocation::Version { path, token } => client.version_download(path, *token),
            };
            bytes.map(|b| Response::Content(String::from_utf8_lossy(&b).into_owned()))
        }
        Request::VersionInfo { path } => client.version_info(path).map(Response::Versions),
        Request::UploadVersion { path, body } => client
            .upload_version(path, body.clone().into_bytes())
            .map(Response::Versions),
        Request::SetOptions { path, options } => {
            client.set_options(path, options).map(Response::Versions)
        }
    };
    result.map_err(classify)
}

pub fn run(client: &RemoteClient, dispatch: &Dispatch) -> Completion {
    Completion {
        id: dispatch.id,
        outcome: execute(client, &dispatch.request),
    }
}

fn classify(err: anyhow::Error) -> Failure {
    let kind = match err.downcast_ref::<StoreError>() {
        Some(StoreError::Unauthorized | StoreError::Forbidden) => FailureKind::Unauthorized,
        Some(_) => FailureKind::Rejected,
        None => FailureKind::Network,
    };
    Failure::new(kind, format!("{:#}", err))
}

/// Runs requests on a tokio blocking pool and hands completions back over a channel.
pub struct Dispatcher {
    client: Arc<RemoteClient>,
    runtime: Option<Runtime>,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
}

impl Dispatcher {
    pub fn new(client: Arc<RemoteClient>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("vfbrowse-dispatch")
            .enable_all()
            .build()
            .context("start dispatcher runtime")?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            client,
            runtime: Some(runtime),
            tx,
            rx,
        })
    }

    pub fn spawn(&self, dispatches: Vec<Dispatch>) {
        let Some(runtime) = &self.runtime else {
            return;
        };
        for dispatch in dispatches {
            let client = Arc::clone(&self.client);
            let tx = self.tx.clone();
            runtime.spawn_blocking(move || {
                if dispatch.cancel.is_cancelled() {
                    return;
                }
                let label = dispatch.request.label();
                tracing::debug!(task = dispatch.id.0, request = label, "executing");
                let completion = run(&client, &dispatch);
                if let Err(failure) = &completion.outcome {
                    tracing::warn!(task = dispatch.id.0, request = label, error = %failure.message, "request failed");
                }
                if dispatch.cancel.is_cancelled() {
                    tracing::debug!(task = dispatch.id.0, "result dropped; task cancelled");
                    return;
                }
                // Receiver gone means the loop has exited.
                let _ = tx.send(completion);
            });
        }
    }

    pub fn try_next(&mut self) -> Option<Completion> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // In-flight requests finish on their own; quitting does not wait for them.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
