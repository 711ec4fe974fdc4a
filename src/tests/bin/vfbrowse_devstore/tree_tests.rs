use super::*;

fn sample() -> Tree {
    let mut tree = Tree::new();
    tree.insert_file("pics/cat.png", vec![1, 2, 3], 10);
    tree.insert_versioned("docs/notes.txt", b"first".to_vec(), 20);
    tree
}

fn set_of(tree: &Tree) -> VersionSet {
    tree.version_set("docs/notes.txt").expect("version set")
}

#[test]
fn normalize_strips_slashes_and_rejects_dot_segments() {
    assert_eq!(normalize("/docs/a.txt").unwrap(), "docs/a.txt");
    assert_eq!(normalize("").unwrap(), "");
    assert_eq!(normalize("/").unwrap(), "");
    assert!(matches!(normalize("docs/../etc"), Err(TreeError::InvalidPath(_))));
    assert!(matches!(normalize("a//b"), Err(TreeError::InvalidPath(_))));
}

#[test]
fn parents_are_created_and_listed() {
    let tree = sample();
    let root = tree.describe("").unwrap();
    let names: Vec<&str> = root.children().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["docs", "pics"]);

    let Descriptor::File(info) = tree.describe("pics/cat.png").unwrap() else {
        panic!("expected file");
    };
    assert_eq!(info.size, 3);
    assert_eq!(info.mime_type.as_deref(), Some("image/png"));
    assert!(!info.versioned_file);
    assert_eq!(
        tree.describe("missing"),
        Err(TreeError::NotFound("./missing".to_string()))
    );
}

#[test]
fn plain_files_have_no_versions() {
    let tree = sample();
    assert!(matches!(
        tree.version_set("pics/cat.png"),
        Err(TreeError::NotVersioned(_))
    ));
}

#[test]
fn upload_appends_and_latest_moves_but_default_stays() {
    let mut tree = sample();
    let set = tree.upload("docs/notes.txt", b"second".to_vec()).unwrap();
    assert_eq!(set.latest, Some(2));
    assert_eq!(set.default, Some(1));
    assert_eq!(tree.content("docs/notes.txt").unwrap(), b"first");
    assert_eq!(
        tree.version_content("docs/notes.txt", VersionToken::Latest)
            .unwrap(),
        b"second"
    );
    assert_eq!(
        tree.version_content("docs/notes.txt", VersionToken::Ordinal(9)),
        Err(TreeError::UnknownVersion(9))
    );
}

#[test]
fn option_rules_protect_default_and_latest() {
    let mut tree = sample();
    tree.upload("docs/notes.txt", b"second".to_vec()).unwrap();
    tree.upload("docs/notes.txt", b"third".to_vec()).unwrap();

    // v1 is the default, v3 the latest.
    assert!(matches!(
        tree.set_options("docs/notes.txt", &VersionOptions::hidden(1, true)),
        Err(TreeError::Conflict(_))
    ));
    assert!(matches!(
        tree.set_options("docs/notes.txt", &VersionOptions::hidden(3, true)),
        Err(TreeError::Conflict(_))
    ));

    let set = tree
        .set_options("docs/notes.txt", &VersionOptions::hidden(2, true))
        .unwrap();
    assert!(set.get(2).unwrap().hidden);
    assert!(matches!(
        tree.set_options("docs/notes.txt", &VersionOptions::make_default(2)),
        Err(TreeError::Conflict(_))
    ));

    tree.set_options("docs/notes.txt", &VersionOptions::hidden(2, false))
        .unwrap();
    let set = tree
        .set_options("docs/notes.txt", &VersionOptions::make_default(2))
        .unwrap();
    assert_eq!(set.default, Some(2));
    assert_eq!(tree.content("docs/notes.txt").unwrap(), b"second");
    assert_eq!(set_of(&tree).latest, Some(3));
}

#[test]
fn comments_merge_without_touching_other_fields() {
    let mut tree = sample();
    let set = tree
        .set_options(
            "docs/notes.txt",
            &VersionOptions::comment(1, "initial draft".to_string()),
        )
        .unwrap();
    let v1 = set.get(1).unwrap();
    assert_eq!(v1.comment, "initial draft");
    assert!(!v1.hidden);
    assert_eq!(set.default, Some(1));
    assert!(matches!(
        tree.set_options("docs/notes.txt", &VersionOptions::comment(5, String::new())),
        Err(TreeError::UnknownVersion(5))
    ));
}
