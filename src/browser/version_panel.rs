//! Version list, selection and the edit/save lifecycle of one versioned file.

use std::sync::Arc;

use crate::model::{
    ContentLocation, LogicalPath, VersionEntry, VersionOptions, VersionSet, VersionToken,
};
use crate::remote::CredentialProvider;

use super::edit_surface::{CursorMove, DirtyChanged, Edit, EditSurface, SurfaceError};
use super::tasks::{Completion, Failure, FailureKind, Outbox, Request, Response, TaskHandle};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PanelError {
    #[error("sign in to change versions")]
    ChangesNotAllowed,
    #[error("already editing")]
    AlreadyEditing,
    #[error("not editing")]
    NotEditing,
    #[error("no unsaved changes")]
    NotDirty,
    #[error("there are unsaved changes; save or cancel them first")]
    UnsavedChanges,
    #[error("mutation already in progress")]
    MutationInFlight,
    #[error("version list not loaded yet")]
    VersionsNotLoaded,
    #[error("unknown version {0}")]
    UnknownVersion(u64),
    #[error("version {0} is already the default")]
    AlreadyDefault(u64),
    #[error("hidden version {0} cannot become the default")]
    HiddenVersion(u64),
    #[error("version {0} is the default or latest and cannot be hidden")]
    PinnedVersion(u64),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum MutationKind {
    Upload,
    MakeDefault(u64),
    SetHidden(u64, bool),
    Comment(u64),
}

impl MutationKind {
    fn action(&self) -> &'static str {
        match self {
            MutationKind::Upload => "save",
            MutationKind::MakeDefault(_) => "make default",
            MutationKind::SetHidden(..) => "change visibility",
            MutationKind::Comment(_) => "update comment",
        }
    }
}

#[derive(Debug)]
struct PendingMutation {
    handle: TaskHandle,
    kind: MutationKind,
}

/// Result of offering a completion to the panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelUpdate {
    /// The completion belongs to some other component, or was superseded.
    Ignored,
    Applied(Option<String>),
    Failed {
        action: &'static str,
        failure: Failure,
    },
}

/// One displayed row of the version list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionRow<'a> {
    pub entry: &'a VersionEntry,
    pub is_default: bool,
    pub is_latest: bool,
    pub is_selected: bool,
    pub can_make_default: bool,
    pub can_toggle_hidden: bool,
}

pub struct VersionPanel {
    path: LogicalPath,
    credentials: Arc<dyn CredentialProvider>,
    versions: Option<VersionSet>,
    selected: VersionToken,
    show_hidden: bool,
    read_only: bool,
    dirty: bool,
    focus_requested: bool,
    surface: EditSurface,
    refresh: Option<TaskHandle>,
    mutation: Option<PendingMutation>,
}

impl std::fmt::Debug for VersionPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionPanel")
            .field("path", &self.path)
            .field("selected", &self.selected)
            .field("read_only", &self.read_only)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl VersionPanel {
    /// Creates the panel and requests the version list. Content is loaded once the list
    /// arrives, so a known default resolves to its ordinal on the first fetch.
    pub fn mount(
        path: LogicalPath,
        credentials: Arc<dyn CredentialProvider>,
        show_hidden: bool,
        outbox: &mut Outbox,
    ) -> Self {
        let refresh = outbox.submit(Request::VersionInfo { path: path.clone() });
        Self {
            path,
            credentials,
            versions: None,
            selected: VersionToken::Default,
            show_hidden,
            read_only: true,
            dirty: false,
            focus_requested: false,
            surface: EditSurface::new(),
            refresh: Some(refresh),
            mutation: None,
        }
    }

    pub fn path(&self) -> &LogicalPath {
        &self.path
    }

    pub fn versions(&self) -> Option<&VersionSet> {
        self.versions.as_ref()
    }

    pub fn selected(&self) -> VersionToken {
        self.selected
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub fn set_show_hidden(&mut self, show: bool) {
        self.show_hidden = show;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_busy(&self) -> bool {
        self.mutation.is_some()
    }

    pub fn allow_changes(&self) -> bool {
        self.credentials.allows_changes()
    }

    pub fn surface(&self) -> &EditSurface {
        &self.surface
    }

    /// True once after `edit()`; the view moves keyboard focus into the editor.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// `default` resolves to the known default ordinal; everything else passes through.
    pub fn resolved_token(&self) -> VersionToken {
        match (self.selected, self.versions.as_ref().and_then(|v| v.default)) {
            (VersionToken::Default, Some(d)) => VersionToken::Ordinal(d),
            (token, _) => token,
        }
    }

    pub fn content_location(&self) -> ContentLocation {
        ContentLocation::Version {
            path: self.path.clone(),
            token: self.resolved_token(),
        }
    }

    pub fn rows(&self) -> Vec<VersionRow<'_>> {
        let Some(set) = &self.versions else {
            return Vec::new();
        };
        let allow = self.allow_changes();
        let resolved = self.resolved_token();
        set.visible(self.show_hidden)
            .map(|entry| {
                let is_default = set.is_default(entry.version);
                let is_latest = set.is_latest(entry.version);
                VersionRow {
                    entry,
                    is_default,
                    is_latest,
                    is_selected: resolved == VersionToken::Ordinal(entry.version)
                        || (resolved == VersionToken::Latest && is_latest),
                    can_make_default: allow && !entry.hidden && !is_default,
                    can_toggle_hidden: allow && !is_default && !is_latest,
                }
            })
            .collect()
    }

    /// Tokens offered by the version selector.
    pub fn selector_options(&self) -> Vec<VersionToken> {
        let mut out = vec![VersionToken::Default, VersionToken::Latest];
        if let Some(set) = &self.versions {
            out.extend(
                set.visible(self.show_hidden)
                    .map(|v| VersionToken::Ordinal(v.version)),
            );
        }
        out
    }

    /// Views `token`. Unsaved edits are discarded and the session returns to read-only.
    pub fn select(&mut self, token: VersionToken, outbox: &mut Outbox) -> Result<(), PanelError> {
        if let (VersionToken::Ordinal(v), Some(set)) = (token, &self.versions)
            && set.get(v).is_none()
        {
            return Err(PanelError::UnknownVersion(v));
        }
        let discard = self.dirty;
        if discard {
            tracing::warn!(path = %self.path, %token, "switching version discards unsaved changes");
        }
        self.selected = token;
        self.end_session();
        // Before the first list arrives nothing has loaded yet; the list triggers the load.
        if self.versions.is_some() || self.surface.source().is_some() {
            let location = self.content_location();
            let stale = self.surface.source() != Some(&location) || !self.surface.is_ready();
            if stale || discard {
                self.surface.load(location, outbox);
            }
        }
        Ok(())
    }

    /// Re-reads the version list. Skipped while a mutation is in flight; its response
    /// replaces the list anyway.
    pub fn refresh(&mut self, outbox: &mut Outbox) {
        if self.mutation.is_some() {
            tracing::debug!(path = %self.path, "refresh skipped; mutation in flight");
            return;
        }
        self.refresh = Some(outbox.submit(Request::VersionInfo {
            path: self.path.clone(),
        }));
    }

    pub fn edit(&mut self) -> Result<(), PanelError> {
        self.ensure_allowed()?;
        if !self.read_only {
            return Err(PanelError::AlreadyEditing);
        }
        if self.surface.is_loading() {
            return Err(SurfaceError::Loading.into());
        }
        if !self.surface.is_ready() {
            return Err(SurfaceError::NotLoaded.into());
        }
        self.read_only = false;
        self.surface.set_read_only(false);
        self.focus_requested = true;
        Ok(())
    }

    pub fn cancel(&mut self, outbox: &mut Outbox) -> Result<(), PanelError> {
        if !self.dirty {
            return Err(PanelError::NotDirty);
        }
        if matches!(
            self.mutation,
            Some(PendingMutation {
                kind: MutationKind::Upload,
                ..
            })
        ) {
            return Err(PanelError::MutationInFlight);
        }
        if let Some(DirtyChanged(dirty)) = self.surface.reset(outbox) {
            self.dirty = dirty;
        }
        self.end_session();
        Ok(())
    }

    /// Leaves edit mode when nothing was changed.
    pub fn stop_editing(&mut self) -> Result<(), PanelError> {
        if self.read_only {
            return Err(PanelError::NotEditing);
        }
        if self.dirty {
            return Err(PanelError::UnsavedChanges);
        }
        self.end_session();
        Ok(())
    }

    pub fn save(&mut self, outbox: &mut Outbox) -> Result<(), PanelError> {
        self.ensure_allowed()?;
        if !self.dirty {
            return Err(PanelError::NotDirty);
        }
        self.ensure_idle()?;
        let body = self.surface.current_content().to_string();
        // Frozen until the upload resolves.
        self.surface.set_read_only(true);
        self.submit_mutation(
            Request::UploadVersion {
                path: self.path.clone(),
                body,
            },
            MutationKind::Upload,
            outbox,
        );
        Ok(())
    }

    pub fn make_default(&mut self, version: u64, outbox: &mut Outbox) -> Result<(), PanelError> {
        self.ensure_allowed()?;
        let entry = self.entry(version)?;
        if entry.hidden {
            return Err(PanelError::HiddenVersion(version));
        }
        if self.versions.as_ref().is_some_and(|s| s.is_default(version)) {
            return Err(PanelError::AlreadyDefault(version));
        }
        self.ensure_idle()?;
        self.submit_options(
            VersionOptions::make_default(version),
            MutationKind::MakeDefault(version),
            outbox,
        );
        Ok(())
    }

    pub fn toggle_hidden(&mut self, version: u64, outbox: &mut Outbox) -> Result<(), PanelError> {
        self.ensure_allowed()?;
        let hidden = self.entry(version)?.hidden;
        if self
            .versions
            .as_ref()
            .is_some_and(|s| s.is_default(version) || s.is_latest(version))
        {
            return Err(PanelError::PinnedVersion(version));
        }
        self.ensure_idle()?;
        self.submit_options(
            VersionOptions::hidden(version, !hidden),
            MutationKind::SetHidden(version, !hidden),
            outbox,
        );
        Ok(())
    }

    pub fn update_comment(
        &mut self,
        version: u64,
        comment: String,
        outbox: &mut Outbox,
    ) -> Result<(), PanelError> {
        self.ensure_allowed()?;
        self.entry(version)?;
        self.ensure_idle()?;
        self.submit_options(
            VersionOptions::comment(version, comment),
            MutationKind::Comment(version),
            outbox,
        );
        Ok(())
    }

    pub fn apply_edit(&mut self, edit: Edit) -> Result<(), PanelError> {
        let changed = self.surface.apply(edit)?;
        self.track(changed);
        Ok(())
    }

    pub fn undo(&mut self) -> Result<(), PanelError> {
        let changed = self.surface.undo()?;
        self.track(changed);
        Ok(())
    }

    pub fn move_cursor(&mut self, movement: CursorMove) {
        self.surface.move_cursor(movement);
    }

    pub fn complete(&mut self, completion: Completion, outbox: &mut Outbox) -> PanelUpdate {
        let Completion { id, outcome } = completion;

        if self.surface.has_pending(id) {
            let outcome = outcome.and_then(|r| match r {
                Response::Content(text) => Ok(text),
                other => Err(unexpected(&other)),
            });
            return match self.surface.finish_load(id, outcome) {
                Some(Ok(changed)) => {
                    self.track(Some(changed));
                    PanelUpdate::Applied(None)
                }
                Some(Err(failure)) => PanelUpdate::Failed {
                    action: "load version",
                    failure,
                },
                None => PanelUpdate::Ignored,
            };
        }

        if self.refresh.as_ref().is_some_and(|h| h.is(id)) {
            self.refresh = None;
            return match versions_of(outcome) {
                Ok(set) => {
                    self.install(set);
                    self.sync_content(outbox);
                    PanelUpdate::Applied(None)
                }
                Err(failure) => {
                    if self.versions.is_none() && self.surface.source().is_none() {
                        // Without a list the symbolic token still names the content.
                        self.surface.load(self.content_location(), outbox);
                    }
                    PanelUpdate::Failed {
                        action: "load versions",
                        failure,
                    }
                }
            };
        }

        if self.mutation.as_ref().is_some_and(|m| m.handle.is(id)) {
            let Some(PendingMutation { kind, .. }) = self.mutation.take() else {
                return PanelUpdate::Ignored;
            };
            return match versions_of(outcome) {
                Ok(set) => self.mutation_succeeded(kind, set, outbox),
                Err(failure) => {
                    tracing::warn!(path = %self.path, action = kind.action(), error = %failure.message, "mutation rejected");
                    if kind == MutationKind::Upload && !self.read_only {
                        self.surface.set_read_only(false);
                    }
                    PanelUpdate::Failed {
                        action: kind.action(),
                        failure,
                    }
                }
            };
        }

        PanelUpdate::Ignored
    }

    fn mutation_succeeded(
        &mut self,
        kind: MutationKind,
        set: VersionSet,
        outbox: &mut Outbox,
    ) -> PanelUpdate {
        let message = match &kind {
            MutationKind::Upload => match set.latest {
                Some(v) => format!("saved version {}", v),
                None => "saved".to_string(),
            },
            MutationKind::MakeDefault(v) => format!("version {} is now the default", v),
            MutationKind::SetHidden(v, true) => format!("version {} hidden", v),
            MutationKind::SetHidden(v, false) => format!("version {} visible", v),
            MutationKind::Comment(v) => format!("comment updated on version {}", v),
        };
        tracing::info!(path = %self.path, action = kind.action(), "{}", message);
        self.install(set);
        if kind == MutationKind::Upload {
            self.selected = VersionToken::Latest;
            self.dirty = false;
            self.end_session();
            self.surface.load(self.content_location(), outbox);
        } else {
            self.sync_content(outbox);
        }
        PanelUpdate::Applied(Some(message))
    }

    fn install(&mut self, set: VersionSet) {
        tracing::debug!(
            path = %self.path,
            versions = set.versions.len(),
            default = ?set.default,
            latest = ?set.latest,
            "version list replaced"
        );
        self.versions = Some(set);
    }

    /// Reloads the document when the resolved location moved, unless edits would be lost.
    fn sync_content(&mut self, outbox: &mut Outbox) {
        let location = self.content_location();
        if self.surface.source() == Some(&location) || self.dirty {
            return;
        }
        self.surface.load(location, outbox);
    }

    fn submit_options(&mut self, options: VersionOptions, kind: MutationKind, outbox: &mut Outbox) {
        let request = Request::SetOptions {
            path: self.path.clone(),
            options,
        };
        self.submit_mutation(request, kind, outbox);
    }

    fn submit_mutation(&mut self, request: Request, kind: MutationKind, outbox: &mut Outbox) {
        // The mutation response carries the full list, so an outstanding refresh is moot.
        self.refresh = None;
        tracing::debug!(path = %self.path, action = kind.action(), "mutation issued");
        let handle = outbox.submit(request);
        self.mutation = Some(PendingMutation { handle, kind });
    }

    fn end_session(&mut self) {
        self.read_only = true;
        self.dirty = false;
        self.surface.set_read_only(true);
    }

    fn track(&mut self, changed: Option<DirtyChanged>) {
        if let Some(DirtyChanged(dirty)) = changed {
            self.dirty = dirty;
        }
    }

    fn ensure_allowed(&self) -> Result<(), PanelError> {
        if !self.allow_changes() {
            return Err(PanelError::ChangesNotAllowed);
        }
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), PanelError> {
        if self.mutation.is_some() {
            return Err(PanelError::MutationInFlight);
        }
        Ok(())
    }

    fn entry(&self, version: u64) -> Result<&VersionEntry, PanelError> {
        let set = self
            .versions
            .as_ref()
            .ok_or(PanelError::VersionsNotLoaded)?;
        set.get(version).ok_or(PanelError::UnknownVersion(version))
    }
}

fn versions_of(outcome: Result<Response, Failure>) -> Result<VersionSet, Failure> {
    match outcome? {
        Response::Versions(set) => Ok(set),
        other => Err(unexpected(&other)),
    }
}

fn unexpected(response: &Response) -> Failure {
    let kind = match response {
        Response::Descriptor(_) => "listing",
        Response::Content(_) => "content",
        Response::Versions(_) => "version list",
    };
    Failure::new(
        FailureKind::Network,
        format!("unexpected {} response", kind),
    )
}

#[cfg(test)]
#[path = "../tests/browser/version_panel_tests.rs"]
mod tests;
