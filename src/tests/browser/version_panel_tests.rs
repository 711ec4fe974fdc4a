use super::*;

use crate::browser::tasks::{Dispatch, TaskId};
use crate::remote::{Anonymous, AuthIdentity, SharedCredentials};

fn signed_in() -> Arc<dyn CredentialProvider> {
    let identity = AuthIdentity::new("alice", "t0k3n").unwrap();
    Arc::new(SharedCredentials::new(Some(identity)))
}

fn entry(version: u64, hidden: bool) -> VersionEntry {
    VersionEntry {
        version,
        size: 10,
        last_modified: 1_700_000_000_000,
        hidden,
        comment: String::new(),
    }
}

fn three_versions() -> VersionSet {
    VersionSet {
        versions: vec![entry(1, false), entry(2, true), entry(3, false)],
        default: Some(1),
        latest: Some(3),
    }
}

fn path() -> LogicalPath {
    LogicalPath::parse("./docs/a.txt").unwrap()
}

fn only(outbox: &mut Outbox) -> Dispatch {
    let mut queued = outbox.drain();
    assert_eq!(queued.len(), 1, "expected one request, got {:?}", queued);
    queued.remove(0)
}

fn ok(id: TaskId, response: Response) -> Completion {
    Completion {
        id,
        outcome: Ok(response),
    }
}

/// Mounts the panel and answers the version list and first content load.
fn mounted(credentials: Arc<dyn CredentialProvider>, outbox: &mut Outbox) -> VersionPanel {
    let mut panel = VersionPanel::mount(path(), credentials, false, outbox);
    let info = only(outbox);
    assert_eq!(info.request, Request::VersionInfo { path: path() });
    assert_eq!(
        panel.complete(ok(info.id, Response::Versions(three_versions())), outbox),
        PanelUpdate::Applied(None)
    );
    let load = only(outbox);
    panel.complete(ok(load.id, Response::Content("v1 text".into())), outbox);
    panel
}

#[test]
fn content_waits_for_the_list_and_resolves_the_default() {
    let mut outbox = Outbox::default();
    let mut panel = VersionPanel::mount(path(), signed_in(), false, &mut outbox);
    let info = only(&mut outbox);
    assert_eq!(panel.resolved_token(), VersionToken::Default);

    panel.complete(ok(info.id, Response::Versions(three_versions())), &mut outbox);
    let load = only(&mut outbox);
    assert_eq!(
        load.request,
        Request::Content {
            location: ContentLocation::Version {
                path: path(),
                token: VersionToken::Ordinal(1),
            }
        }
    );
    assert!(panel.surface().is_loading());
}

#[test]
fn list_failure_falls_back_to_the_symbolic_token() {
    let mut outbox = Outbox::default();
    let mut panel = VersionPanel::mount(path(), signed_in(), false, &mut outbox);
    let info = only(&mut outbox);
    let update = panel.complete(
        Completion {
            id: info.id,
            outcome: Err(Failure::new(FailureKind::Network, "connection refused")),
        },
        &mut outbox,
    );
    assert!(matches!(update, PanelUpdate::Failed { action: "load versions", .. }));
    let load = only(&mut outbox);
    assert_eq!(
        load.request,
        Request::Content {
            location: ContentLocation::Version {
                path: path(),
                token: VersionToken::Default,
            }
        }
    );
}

#[test]
fn selecting_after_a_list_failure_reloads_the_surface() {
    let mut outbox = Outbox::default();
    let mut panel = VersionPanel::mount(path(), signed_in(), false, &mut outbox);
    let info = only(&mut outbox);
    panel.complete(
        Completion {
            id: info.id,
            outcome: Err(Failure::new(FailureKind::Network, "connection refused")),
        },
        &mut outbox,
    );
    let load = only(&mut outbox);
    panel.complete(ok(load.id, Response::Content("d".into())), &mut outbox);
    assert!(panel.surface().is_ready());

    panel.select(VersionToken::Latest, &mut outbox).unwrap();
    let reload = only(&mut outbox);
    let latest = ContentLocation::Version {
        path: path(),
        token: VersionToken::Latest,
    };
    assert_eq!(
        reload.request,
        Request::Content {
            location: latest.clone()
        }
    );
    assert_eq!(panel.surface().source(), Some(&latest));

    panel.select(VersionToken::Ordinal(7), &mut outbox).unwrap();
    assert!(matches!(
        only(&mut outbox).request,
        Request::Content {
            location: ContentLocation::Version {
                token: VersionToken::Ordinal(7),
                ..
            }
        }
    ));
}

#[test]
fn hidden_rows_follow_the_toggle() {
    let mut outbox = Outbox::default();
    let mut panel = mounted(signed_in(), &mut outbox);
    let shown: Vec<u64> = panel.rows().iter().map(|r| r.entry.version).collect();
    assert_eq!(shown, vec![1, 3]);

    panel.set_show_hidden(true);
    let rows = panel.rows();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].is_default && rows[0].is_selected);
    assert!(!rows[0].can_make_default && !rows[0].can_toggle_hidden);
    assert!(!rows[1].can_make_default && rows[1].can_toggle_hidden);
    assert!(rows[2].is_latest && rows[2].can_make_default);
}

#[test]
fn reselecting_the_same_location_is_a_no_op() {
    let mut outbox = Outbox::default();
    let mut panel = mounted(signed_in(), &mut outbox);

    panel.select(VersionToken::Ordinal(1), &mut outbox).unwrap();
    panel.select(VersionToken::Default, &mut outbox).unwrap();
    assert!(outbox.drain().is_empty());

    panel.select(VersionToken::Latest, &mut outbox).unwrap();
    assert!(matches!(only(&mut outbox).request, Request::Content { .. }));
    assert_eq!(
        panel.select(VersionToken::Ordinal(9), &mut outbox),
        Err(PanelError::UnknownVersion(9))
    );
}

#[test]
fn switching_versions_discards_unsaved_edits() {
    let mut outbox = Outbox::default();
    let mut panel = mounted(signed_in(), &mut outbox);
    panel.edit().unwrap();
    assert!(panel.take_focus_request());
    panel.apply_edit(Edit::Insert("x".into())).unwrap();
    assert!(panel.is_dirty());

    panel.select(VersionToken::Ordinal(3), &mut outbox).unwrap();
    assert!(!panel.is_dirty());
    assert!(panel.is_read_only());
    assert!(matches!(only(&mut outbox).request, Request::Content { .. }));
}

#[test]
fn anonymous_sessions_cannot_edit_or_mutate() {
    let mut outbox = Outbox::default();
    let mut panel = mounted(Arc::new(Anonymous), &mut outbox);
    assert_eq!(panel.edit(), Err(PanelError::ChangesNotAllowed));
    assert_eq!(
        panel.make_default(3, &mut outbox),
        Err(PanelError::ChangesNotAllowed)
    );
    assert!(panel.rows().iter().all(|r| !r.can_make_default));
    assert!(outbox.drain().is_empty());
}

#[test]
fn save_uploads_the_buffer_and_shows_latest() {
    let mut outbox = Outbox::default();
    let mut panel = mounted(signed_in(), &mut outbox);
    panel.edit().unwrap();
    panel.apply_edit(Edit::Insert("new ".into())).unwrap();
    panel.save(&mut outbox).unwrap();

    let upload = only(&mut outbox);
    assert_eq!(
        upload.request,
        Request::UploadVersion {
            path: path(),
            body: "new v1 text".into(),
        }
    );
    assert!(panel.is_busy());
    assert_eq!(
        panel.apply_edit(Edit::Insert("y".into())),
        Err(PanelError::Surface(SurfaceError::ReadOnly))
    );

    let mut after = three_versions();
    after.versions.push(entry(4, false));
    after.latest = Some(4);
    let update = panel.complete(ok(upload.id, Response::Versions(after)), &mut outbox);
    assert_eq!(update, PanelUpdate::Applied(Some("saved version 4".into())));
    assert_eq!(panel.selected(), VersionToken::Latest);
    assert!(panel.is_read_only());
    assert!(!panel.is_dirty());
    assert_eq!(panel.versions().and_then(|v| v.latest), Some(4));
    assert_eq!(
        only(&mut outbox).request,
        Request::Content {
            location: ContentLocation::Version {
                path: path(),
                token: VersionToken::Latest,
            }
        }
    );
}

#[test]
fn failed_upload_keeps_the_session_editable() {
    let mut outbox = Outbox::default();
    let mut panel = mounted(signed_in(), &mut outbox);
    panel.edit().unwrap();
    panel.apply_edit(Edit::Insert("x".into())).unwrap();
    panel.save(&mut outbox).unwrap();
    let upload = only(&mut outbox);

    let update = panel.complete(
        Completion {
            id: upload.id,
            outcome: Err(Failure::new(FailureKind::Unauthorized, "401 Unauthorized")),
        },
        &mut outbox,
    );
    assert!(matches!(update, PanelUpdate::Failed { action: "save", .. }));
    assert!(panel.is_dirty());
    assert!(!panel.is_read_only());
    panel.apply_edit(Edit::Insert("y".into())).unwrap();
    assert_eq!(panel.surface().current_content(), "xyv1 text");
}

#[test]
fn default_and_visibility_guards() {
    let mut outbox = Outbox::default();
    let mut panel = mounted(signed_in(), &mut outbox);
    assert_eq!(
        panel.make_default(1, &mut outbox),
        Err(PanelError::AlreadyDefault(1))
    );
    assert_eq!(
        panel.make_default(2, &mut outbox),
        Err(PanelError::HiddenVersion(2))
    );
    assert_eq!(
        panel.toggle_hidden(3, &mut outbox),
        Err(PanelError::PinnedVersion(3))
    );
    assert_eq!(
        panel.toggle_hidden(1, &mut outbox),
        Err(PanelError::PinnedVersion(1))
    );
    assert!(outbox.drain().is_empty());

    panel.toggle_hidden(2, &mut outbox).unwrap();
    assert_eq!(
        only(&mut outbox).request,
        Request::SetOptions {
            path: path(),
            options: VersionOptions::hidden(2, false),
        }
    );
}

#[test]
fn one_mutation_at_a_time() {
    let mut outbox = Outbox::default();
    let mut panel = mounted(signed_in(), &mut outbox);
    panel.make_default(3, &mut outbox).unwrap();
    let first = only(&mut outbox);
    assert_eq!(
        panel.update_comment(3, "release".into(), &mut outbox),
        Err(PanelError::MutationInFlight)
    );
    panel.refresh(&mut outbox);
    assert!(outbox.drain().is_empty());

    let mut after = three_versions();
    after.default = Some(3);
    let update = panel.complete(ok(first.id, Response::Versions(after)), &mut outbox);
    assert_eq!(
        update,
        PanelUpdate::Applied(Some("version 3 is now the default".into()))
    );
    // Viewing `default` follows the new default ordinal.
    assert_eq!(
        only(&mut outbox).request,
        Request::Content {
            location: ContentLocation::Version {
                path: path(),
                token: VersionToken::Ordinal(3),
            }
        }
    );
    panel.update_comment(3, "release".into(), &mut outbox).unwrap();
    assert!(matches!(only(&mut outbox).request, Request::SetOptions { .. }));
}

#[test]
fn superseded_refresh_is_ignored() {
    let mut outbox = Outbox::default();
    let mut panel = mounted(signed_in(), &mut outbox);
    panel.refresh(&mut outbox);
    let old = only(&mut outbox);
    panel.refresh(&mut outbox);
    let new = only(&mut outbox);
    assert!(old.cancel.is_cancelled());

    let mut stale = three_versions();
    stale.versions.clear();
    assert_eq!(
        panel.complete(ok(old.id, Response::Versions(stale)), &mut outbox),
        PanelUpdate::Ignored
    );
    assert_eq!(panel.rows().len(), 2);

    panel.complete(ok(new.id, Response::Versions(three_versions())), &mut outbox);
    assert!(outbox.drain().is_empty());
}

#[test]
fn cancel_reloads_and_stop_editing_needs_a_clean_buffer() {
    let mut outbox = Outbox::default();
    let mut panel = mounted(signed_in(), &mut outbox);
    assert_eq!(panel.cancel(&mut outbox), Err(PanelError::NotDirty));
    panel.edit().unwrap();
    panel.apply_edit(Edit::Insert("x".into())).unwrap();
    assert_eq!(panel.stop_editing(), Err(PanelError::UnsavedChanges));

    panel.cancel(&mut outbox).unwrap();
    assert!(!panel.is_dirty());
    assert!(panel.is_read_only());
    assert!(matches!(only(&mut outbox).request, Request::Content { .. }));

    let mut outbox = Outbox::default();
    let mut panel = mounted(signed_in(), &mut outbox);
    panel.edit().unwrap();
    panel.stop_editing().unwrap();
    assert!(panel.is_read_only());
}
