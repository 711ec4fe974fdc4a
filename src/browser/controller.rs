//! Current path, its descriptor, and which view renders it.

use std::sync::Arc;

use crate::model::{
    BrowserConfig, ChildEntry, ContentLocation, Descriptor, FileInfo, LogicalPath,
};
use crate::remote::{AuthIdentity, CredentialProvider, SharedCredentials};

use super::edit_surface::EditSurface;
use super::history::{History, MemoryHistory};
use super::navigator::{self, Crumb};
use super::notice::Notices;
use super::tasks::{
    Completion, Dispatch, Failure, FailureKind, Outbox, Request, Response, TaskHandle,
};
use super::version_panel::{PanelError, PanelUpdate, VersionPanel};

/// User intent, carrying the row or crumb it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrowserEvent {
    OpenChild { name: String },
    OpenCrumb { index: usize },
    /// A back/forward move landed on an entry with this state.
    PopState(Option<String>),
}

#[derive(Debug)]
pub enum FileBody {
    /// `text/*`: read-only viewer over `download/{path}`.
    Text(EditSurface),
    Image { location: String },
    Unsupported,
}

#[derive(Debug)]
pub struct FileView {
    pub info: FileInfo,
    pub body: FileBody,
}

#[derive(Debug)]
pub enum View {
    Loading,
    Failed(String),
    Folder,
    File(FileView),
    Versioned(VersionPanel),
}

#[derive(Debug)]
struct PendingListing {
    handle: TaskHandle,
    path: LogicalPath,
}

pub struct BrowserController<H: History> {
    base_url: String,
    prefix: String,
    show_hidden: bool,
    credentials: SharedCredentials,
    history: H,
    path: LogicalPath,
    descriptor: Option<Descriptor>,
    listing: Option<PendingListing>,
    view: View,
    outbox: Outbox,
    notices: Notices,
}

impl<H: History> BrowserController<H> {
    pub fn new(config: &BrowserConfig, credentials: SharedCredentials, history: H) -> Self {
        Self {
            base_url: config.base_url.clone(),
            prefix: config.url_prefix.clone(),
            show_hidden: config.show_hidden,
            credentials,
            history,
            path: LogicalPath::root(),
            descriptor: None,
            listing: None,
            view: View::Loading,
            outbox: Outbox::default(),
            notices: Notices::default(),
        }
    }

    /// Starts browsing at the path named by an address-bar `location`.
    pub fn initialize(&mut self, location: &str) {
        let path = LogicalPath::from_location(location, &self.prefix);
        tracing::info!(location, path = %path, "browser initialized");
        // The starting entry carries its path so returning to it restores the same folder.
        let url = path.display_url(&self.prefix);
        self.history.replace_state(path.as_str(), &url);
        self.navigate(path, false);
    }

    pub fn navigate(&mut self, path: LogicalPath, record_history: bool) {
        if let View::Versioned(panel) = &self.view
            && panel.is_dirty()
        {
            tracing::warn!(path = %panel.path(), "navigating away discards unsaved changes");
        }
        tracing::debug!(from = %self.path, to = %path, record_history, "navigate");

        if record_history {
            self.history
                .push_state(path.as_str(), &path.display_url(&self.prefix));
        }
        // Replacing the view and listing handles cancels whatever they had in flight.
        self.descriptor = None;
        self.view = View::Loading;
        let handle = self.outbox.submit(Request::List { path: path.clone() });
        self.listing = Some(PendingListing {
            handle,
            path: path.clone(),
        });
        self.path = path;
    }

    pub fn handle(&mut self, event: BrowserEvent) {
        match event {
            BrowserEvent::OpenChild { name } => match self.path.child(&name) {
                Ok(target) => self.navigate(target, true),
                Err(err) => self.notices.error(format!("cannot open {:?}: {}", name, err)),
            },
            BrowserEvent::OpenCrumb { index } => {
                if let Some(target) = navigator::crumb_target(&self.path, index) {
                    self.navigate(target, true);
                }
            }
            BrowserEvent::PopState(state) => {
                let path = match state.as_deref().map(LogicalPath::parse) {
                    Some(Ok(p)) => p,
                    Some(Err(err)) => {
                        tracing::warn!(error = %err, "unreadable history state; using root");
                        LogicalPath::root()
                    }
                    None => LogicalPath::root(),
                };
                self.navigate(path, false);
            }
        }
    }

    /// Reloads what is on screen: the version list for a versioned file, else the listing.
    pub fn refresh(&mut self) {
        if let View::Versioned(panel) = &mut self.view {
            panel.refresh(&mut self.outbox);
            return;
        }
        self.navigate(self.path.clone(), false);
    }

    /// Requests queued since the last call, for the dispatcher.
    pub fn take_requests(&mut self) -> Vec<Dispatch> {
        self.outbox.drain()
    }

    pub fn has_requests(&self) -> bool {
        !self.outbox.is_empty()
    }

    pub fn complete(&mut self, completion: Completion) {
        if self
            .listing
            .as_ref()
            .is_some_and(|l| l.handle.is(completion.id))
        {
            let Some(listing) = self.listing.take() else {
                return;
            };
            self.finish_listing(listing.path, completion);
            return;
        }

        match &mut self.view {
            View::Versioned(panel) => match panel.complete(completion, &mut self.outbox) {
                PanelUpdate::Ignored => {}
                PanelUpdate::Applied(None) => {}
                PanelUpdate::Applied(Some(message)) => self.notices.info(message),
                PanelUpdate::Failed { action, failure } => {
                    self.notices
                        .error(format!("{} failed: {}", action, failure.message));
                }
            },
            View::File(FileView {
                body: FileBody::Text(surface),
                ..
            }) => {
                let outcome = completion.outcome.and_then(|r| match r {
                    Response::Content(text) => Ok(text),
                    _ => Err(Failure::new(FailureKind::Network, "unexpected response")),
                });
                if let Some(Err(failure)) = surface.finish_load(completion.id, outcome) {
                    self.notices
                        .error(format!("download failed: {}", failure.message));
                }
            }
            _ => {
                tracing::debug!(task = completion.id.0, "dropping completion for superseded task");
            }
        }
    }

    fn finish_listing(&mut self, requested: LogicalPath, completion: Completion) {
        if requested != self.path {
            tracing::debug!(requested = %requested, current = %self.path, "stale listing dropped");
            return;
        }
        match completion.outcome {
            Ok(Response::Descriptor(descriptor)) => self.install(descriptor),
            Ok(_) => {
                self.view = View::Failed("unexpected response".to_string());
                self.notices
                    .error(format!("list {}: unexpected response", self.path));
            }
            Err(failure) => {
                tracing::warn!(path = %self.path, error = %failure.message, "listing failed");
                self.notices
                    .error(format!("list {}: {}", self.path, failure.message));
                self.view = View::Failed(failure.message);
            }
        }
    }

    fn install(&mut self, descriptor: Descriptor) {
        self.view = match &descriptor {
            Descriptor::Directory { .. } => View::Folder,
            Descriptor::File(info) if info.versioned_file => View::Versioned(VersionPanel::mount(
                self.path.clone(),
                self.provider(),
                self.show_hidden,
                &mut self.outbox,
            )),
            Descriptor::File(info) => {
                let body = if info.is_text() {
                    let mut surface = EditSurface::new();
                    surface.load(ContentLocation::File(self.path.clone()), &mut self.outbox);
                    FileBody::Text(surface)
                } else if info.is_image() {
                    FileBody::Image {
                        location: download_location(&self.base_url, &self.path),
                    }
                } else {
                    FileBody::Unsupported
                };
                View::File(FileView {
                    info: info.clone(),
                    body,
                })
            }
        };
        self.descriptor = Some(descriptor);
    }

    /// Runs a panel operation; guard violations become notices. Returns whether it ran.
    pub fn with_panel<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut VersionPanel, &mut Outbox) -> Result<(), PanelError>,
    {
        let View::Versioned(panel) = &mut self.view else {
            self.notices.error("not viewing a versioned file");
            return false;
        };
        match f(panel, &mut self.outbox) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(error = %err, "panel operation refused");
                self.notices.error(err.to_string());
                false
            }
        }
    }

    pub fn sign_in(&mut self, attempt: anyhow::Result<AuthIdentity>) {
        match attempt {
            Ok(identity) => {
                self.notices.info(format!("signed in as {}", identity.user));
                self.credentials.sign_in(identity);
            }
            Err(err) => {
                tracing::warn!(error = %format!("{:#}", err), "login failed");
                self.notices.error(format!("login failed: {:#}", err));
            }
        }
    }

    pub fn sign_out(&mut self) {
        self.credentials.sign_out();
        self.notices.info("signed out");
    }

    pub fn refresh_token(&mut self, token: String) {
        if self.credentials.refresh_token(token) {
            self.notices.info("token refreshed");
        } else {
            self.notices.error("not signed in");
        }
    }

    pub fn identity(&self) -> Option<AuthIdentity> {
        self.credentials.identity()
    }

    pub fn path(&self) -> &LogicalPath {
        &self.path
    }

    pub fn descriptor(&self) -> Option<&Descriptor> {
        self.descriptor.as_ref()
    }

    pub fn children(&self) -> &[ChildEntry] {
        self.descriptor
            .as_ref()
            .map(Descriptor::children)
            .unwrap_or(&[])
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn crumbs(&self) -> Vec<Crumb> {
        navigator::crumbs(&self.path)
    }

    pub fn display_url(&self) -> String {
        self.path.display_url(&self.prefix)
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    fn provider(&self) -> Arc<dyn CredentialProvider> {
        Arc::new(self.credentials.clone())
    }
}

impl BrowserController<MemoryHistory> {
    pub fn go_back(&mut self) -> bool {
        match self.history.back() {
            Some(pop) => {
                self.handle(BrowserEvent::PopState(pop.0));
                true
            }
            None => false,
        }
    }

    pub fn go_forward(&mut self) -> bool {
        match self.history.forward() {
            Some(pop) => {
                self.handle(BrowserEvent::PopState(pop.0));
                true
            }
            None => false,
        }
    }
}

/// Absolute `download/{path}` URL under `base`, or the relative endpoint if `base` is unusable.
fn download_location(base: &str, path: &LogicalPath) -> String {
    if let Ok(mut url) = url::Url::parse(base)
        && !url.cannot_be_a_base()
    {
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("download")
                .extend(path.store_segments());
        }
        return url.to_string();
    }
    let mut relative = String::from("download");
    for seg in path.store_segments() {
        relative.push('/');
        relative.push_str(seg);
    }
    relative
}

#[cfg(test)]
#[path = "../tests/browser/controller_tests.rs"]
mod tests;
