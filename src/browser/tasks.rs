//! Outstanding store requests as cancellable tasks.
//!
//! Components never talk to the store directly. They queue a [`Request`] in the [`Outbox`] and
//! keep the returned [`TaskHandle`]. Whoever executes the request reports back with a
//! [`Completion`] carrying the same [`TaskId`]. Dropping a handle cancels the task, so a
//! component that is torn down or superseded stops caring about its results.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::model::{ContentLocation, Descriptor, LogicalPath, VersionOptions, VersionSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    List { path: LogicalPath },
    Content { location: ContentLocation },
    VersionInfo { path: LogicalPath },
    UploadVersion { path: LogicalPath, body: String },
    SetOptions { path: LogicalPath, options: VersionOptions },
}

impl Request {
    pub fn label(&self) -> &'static str {
        match self {
            Request::List { .. } => "list",
            Request::Content { .. } => "content",
            Request::VersionInfo { .. } => "version info",
            Request::UploadVersion { .. } => "upload",
            Request::SetOptions { .. } => "set options",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Descriptor(Descriptor),
    Content(String),
    Versions(VersionSet),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport error or unreadable response.
    Network,
    /// The store answered 401/403.
    Unauthorized,
    /// The store answered with any other non-success status.
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub id: TaskId,
    pub outcome: Result<Response, Failure>,
}

/// Shared flag telling the executor to ignore a task.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Owner side of a queued request. Cancels the task when dropped.
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    flag: CancelFlag,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn is(&self, id: TaskId) -> bool {
        self.id == id
    }

    pub fn cancel(&self) {
        self.flag.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.is_cancelled()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.flag.cancel();
    }
}

#[derive(Clone, Debug)]
pub struct Dispatch {
    pub id: TaskId,
    pub request: Request,
    pub cancel: CancelFlag,
}

#[derive(Debug, Default)]
pub struct Outbox {
    next_id: u64,
    queued: Vec<Dispatch>,
}

impl Outbox {
    pub fn submit(&mut self, request: Request) -> TaskHandle {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        let flag = CancelFlag::default();
        tracing::trace!(task = id.0, request = request.label(), "queued");
        self.queued.push(Dispatch {
            id,
            request,
            cancel: flag.clone(),
        });
        TaskHandle { id, flag }
    }

    /// Takes every queued request that has not been cancelled yet.
    pub fn drain(&mut self) -> Vec<Dispatch> {
        self.queued
            .drain(..)
            .filter(|d| !d.cancel.is_cancelled())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.iter().all(|d| d.cancel.is_cancelled())
    }
}
