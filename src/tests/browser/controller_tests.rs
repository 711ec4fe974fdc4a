use super::*;

use crate::browser::edit_surface::Edit;
use crate::model::{VersionEntry, VersionSet, VersionToken};

fn controller() -> BrowserController<MemoryHistory> {
    let config = BrowserConfig::default();
    let creds = SharedCredentials::new(Some(AuthIdentity::new("alice", "tok").unwrap()));
    BrowserController::new(&config, creds, MemoryHistory::new("/dev"))
}

fn readme_folder() -> Descriptor {
    serde_json::from_str(
        r#"{"children":[{"name":"readme.txt","size":120,"lastModified":1700000000000}]}"#,
    )
    .unwrap()
}

fn file(mime: &str, versioned: bool) -> Descriptor {
    Descriptor::File(FileInfo {
        name: "x".into(),
        size: 3,
        last_modified: 0,
        mime_type: Some(mime.into()),
        versioned_file: versioned,
    })
}

/// Takes the single queued request and answers it.
fn answer(c: &mut BrowserController<MemoryHistory>, response: Response) -> Request {
    let mut queued = c.take_requests();
    assert_eq!(queued.len(), 1, "queued: {:?}", queued);
    let dispatch = queued.remove(0);
    c.complete(Completion {
        id: dispatch.id,
        outcome: Ok(response),
    });
    dispatch.request
}

#[test]
fn opening_a_child_pushes_history() {
    let mut c = controller();
    c.initialize("/dev");
    assert!(c.path().is_root());
    assert_eq!(c.history().len(), 1);
    let req = answer(&mut c, Response::Descriptor(readme_folder()));
    assert_eq!(req, Request::List { path: LogicalPath::root() });
    assert!(matches!(c.view(), View::Folder));
    assert_eq!(c.children()[0].name, "readme.txt");

    c.handle(BrowserEvent::OpenChild {
        name: "readme.txt".into(),
    });
    assert_eq!(c.path().as_str(), "./readme.txt");
    assert_eq!(c.history().current_state(), Some("./readme.txt"));
    assert_eq!(c.history().location(), "/dev/readme.txt");
    assert_eq!(c.display_url(), "/dev/readme.txt");
    assert!(c.descriptor().is_none());
}

#[test]
fn back_restores_the_prior_path_and_descriptor() {
    let mut c = controller();
    c.initialize("/dev/");
    answer(&mut c, Response::Descriptor(readme_folder()));

    c.navigate(LogicalPath::parse("./docs").unwrap(), true);
    answer(
        &mut c,
        Response::Descriptor(Descriptor::Directory { children: vec![] }),
    );

    assert!(c.go_back());
    assert!(c.path().is_root());
    assert_eq!(c.history().len(), 2);
    let req = answer(&mut c, Response::Descriptor(readme_folder()));
    assert_eq!(req, Request::List { path: LogicalPath::root() });
    assert_eq!(c.descriptor(), Some(&readme_folder()));

    assert!(c.go_forward());
    assert_eq!(c.path().as_str(), "./docs");
}

#[test]
fn back_to_a_nested_start_restores_that_folder() {
    let mut c = controller();
    c.initialize("/dev/docs");
    assert_eq!(c.history().len(), 1);
    assert_eq!(c.history().current_state(), Some("./docs"));
    assert_eq!(c.history().location(), "/dev/docs");
    let docs = readme_folder();
    answer(&mut c, Response::Descriptor(docs.clone()));

    c.handle(BrowserEvent::OpenChild {
        name: "readme.txt".into(),
    });
    answer(&mut c, Response::Descriptor(file("text/plain", false)));
    c.take_requests();

    assert!(c.go_back());
    assert_eq!(c.path().as_str(), "./docs");
    assert_eq!(c.history().current_state(), Some("./docs"));
    let req = answer(&mut c, Response::Descriptor(docs.clone()));
    assert_eq!(
        req,
        Request::List {
            path: LogicalPath::parse("./docs").unwrap()
        }
    );
    assert!(matches!(c.view(), View::Folder));
    assert_eq!(c.descriptor(), Some(&docs));
}

#[test]
fn last_navigation_wins_in_either_completion_order() {
    for b_first in [false, true] {
        let mut c = controller();
        c.navigate(LogicalPath::parse("./a").unwrap(), false);
        let a = c.take_requests().remove(0);
        c.navigate(LogicalPath::parse("./b").unwrap(), false);
        let b = c.take_requests().remove(0);
        assert!(a.cancel.is_cancelled());

        let b_desc = Descriptor::Directory { children: vec![] };
        let a_done = Completion {
            id: a.id,
            outcome: Ok(Response::Descriptor(readme_folder())),
        };
        let b_done = Completion {
            id: b.id,
            outcome: Ok(Response::Descriptor(b_desc.clone())),
        };
        if b_first {
            c.complete(b_done);
            c.complete(a_done);
        } else {
            c.complete(a_done);
            c.complete(b_done);
        }
        assert_eq!(c.path().as_str(), "./b");
        assert_eq!(c.descriptor(), Some(&b_desc));
    }
}

#[test]
fn crumbs_navigate_except_the_last() {
    let mut c = controller();
    c.initialize("/dev/docs/notes");
    c.take_requests();
    c.handle(BrowserEvent::OpenCrumb { index: 2 });
    assert!(c.take_requests().is_empty());
    assert_eq!(c.history().len(), 1);

    c.handle(BrowserEvent::OpenCrumb { index: 1 });
    assert_eq!(c.path().as_str(), "./docs");
    assert_eq!(c.history().location(), "/dev/docs");
}

#[test]
fn pop_state_without_state_goes_to_root() {
    let mut c = controller();
    c.initialize("/dev/docs");
    c.handle(BrowserEvent::PopState(None));
    assert!(c.path().is_root());
    c.handle(BrowserEvent::PopState(Some("garbage".into())));
    assert!(c.path().is_root());
    assert_eq!(c.history().len(), 1);
}

#[test]
fn text_files_load_into_a_read_only_viewer() {
    let mut c = controller();
    c.initialize("/dev/a.txt");
    answer(&mut c, Response::Descriptor(file("text/plain", false)));
    let req = answer(&mut c, Response::Content("hello".into()));
    assert_eq!(
        req,
        Request::Content {
            location: ContentLocation::File(LogicalPath::parse("./a.txt").unwrap()),
        }
    );
    let View::File(FileView {
        body: FileBody::Text(surface),
        ..
    }) = c.view()
    else {
        panic!("expected text view, got {:?}", c.view());
    };
    assert_eq!(surface.display_text(), "hello");
    assert!(surface.is_read_only());
}

#[test]
fn images_show_their_download_location() {
    let mut c = controller();
    c.initialize("/dev/pics/cat.png");
    answer(&mut c, Response::Descriptor(file("image/png", false)));
    assert!(c.take_requests().is_empty());
    let View::File(FileView {
        body: FileBody::Image { location },
        ..
    }) = c.view()
    else {
        panic!("expected image view");
    };
    assert_eq!(
        location,
        "http://localhost:8080/rest-file-server/rest/download/pics/cat.png"
    );
}

#[test]
fn listing_failure_leaves_a_notice() {
    let mut c = controller();
    c.initialize("/dev/missing");
    let d = c.take_requests().remove(0);
    c.complete(Completion {
        id: d.id,
        outcome: Err(Failure::new(FailureKind::Rejected, "not found: missing")),
    });
    assert!(matches!(c.view(), View::Failed(_)));
    let notice = c.notices().latest().unwrap();
    assert!(notice.message.contains("not found"), "{}", notice.message);
}

#[test]
fn versioned_file_saves_through_the_panel() {
    let mut c = controller();
    c.initialize("/dev/notes.md");
    answer(&mut c, Response::Descriptor(file("text/markdown", true)));
    let set = VersionSet {
        versions: vec![
            VersionEntry {
                version: 1,
                size: 2,
                last_modified: 0,
                hidden: false,
                comment: String::new(),
            },
            VersionEntry {
                version: 2,
                size: 2,
                last_modified: 0,
                hidden: true,
                comment: String::new(),
            },
        ],
        default: Some(1),
        latest: Some(2),
    };
    let req = answer(&mut c, Response::Versions(set.clone()));
    assert!(matches!(req, Request::VersionInfo { .. }));
    answer(&mut c, Response::Content("v1".into()));

    let View::Versioned(panel) = c.view() else {
        panic!("expected version panel");
    };
    assert_eq!(panel.rows().len(), 1);

    assert!(c.with_panel(|p, _| p.edit()));
    assert!(c.with_panel(|p, _| p.apply_edit(Edit::Insert("!".into()))));
    assert!(c.with_panel(|p, o| p.save(o)));

    let mut after = set;
    after.versions.push(VersionEntry {
        version: 3,
        size: 3,
        last_modified: 0,
        hidden: false,
        comment: String::new(),
    });
    after.latest = Some(3);
    let req = answer(&mut c, Response::Versions(after));
    assert!(matches!(req, Request::UploadVersion { ref body, .. } if body == "!v1"));

    let View::Versioned(panel) = c.view() else {
        panic!("expected version panel");
    };
    assert_eq!(panel.selected(), VersionToken::Latest);
    assert!(!panel.is_dirty());
    assert!(panel.is_read_only());
    assert_eq!(
        c.notices().latest().map(|n| n.message.as_str()),
        Some("saved version 3")
    );
}

#[test]
fn refused_panel_operations_become_notices() {
    let mut c = controller();
    assert!(!c.with_panel(|p, _| p.edit()));
    assert_eq!(
        c.notices().latest().map(|n| n.message.as_str()),
        Some("not viewing a versioned file")
    );

    c.sign_out();
    c.sign_in(Err(anyhow::anyhow!("bad password")));
    assert!(c.identity().is_none());
    assert_eq!(
        c.notices().latest().map(|n| n.message.as_str()),
        Some("login failed: bad password")
    );
    c.refresh_token("t2".into());
    assert_eq!(
        c.notices().latest().map(|n| n.message.as_str()),
        Some("not signed in")
    );
}
