use tempfile::tempdir;
use vfbrowse::model::Descriptor;

use super::*;

fn args_with_root(root: PathBuf, versioned: &[&str]) -> Args {
    Args {
        addr: "127.0.0.1:0".parse().expect("parse socket addr"),
        addr_file: None,
        root: Some(root),
        versioned: versioned.iter().map(|s| s.to_string()).collect(),
        dev_token: "dev-token".to_string(),
    }
}

#[test]
fn build_state_seeds_tree_and_marks_versioned_globs() {
    let temp = tempdir().expect("create temp dir");
    std::fs::create_dir_all(temp.path().join("docs")).expect("create docs");
    std::fs::write(temp.path().join("docs/notes.txt"), "v1").expect("write notes");
    std::fs::write(temp.path().join("readme.txt"), "hello").expect("write readme");

    let state = build_state(&args_with_root(temp.path().to_path_buf(), &["docs/*.txt"]))
        .expect("build state");
    assert_eq!(state.dev_token, "dev-token");

    let tree = state.tree.blocking_read();
    let root = tree.describe("").expect("describe root");
    let names: Vec<&str> = root.children().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["docs", "readme.txt"]);

    let Descriptor::File(notes) = tree.describe("docs/notes.txt").expect("describe notes") else {
        panic!("expected file");
    };
    assert!(notes.versioned_file);
    let Descriptor::File(readme) = tree.describe("readme.txt").expect("describe readme") else {
        panic!("expected file");
    };
    assert!(!readme.versioned_file);
}

#[test]
fn invalid_glob_is_reported() {
    let temp = tempdir().expect("create temp dir");
    let err = match build_state(&args_with_root(temp.path().to_path_buf(), &["docs/[.txt"])) {
        Ok(_) => panic!("expected glob error"),
        Err(err) => err,
    };
    assert!(format!("{:#}", err).contains("invalid glob"));
}

#[test]
fn missing_root_dir_fails() {
    let temp = tempdir().expect("create temp dir");
    let missing = temp.path().join("nope");
    assert!(build_state(&args_with_root(missing, &[])).is_err());
}
