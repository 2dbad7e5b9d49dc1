//! Integration tests for filesystem card discovery.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};

use card_grader_adapters::FsCardSource;
use card_grader_core::CardSource;
use tempfile::TempDir;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"card").unwrap();
}

fn names(source: &FsCardSource) -> Vec<String> {
    source
        .cards()
        .filter_map(Result::ok)
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

fn layout() -> TempDir {
    let temp = TempDir::new().unwrap();
    touch(&temp.path().join("b_card.png"));
    touch(&temp.path().join("a_card.jpg"));
    touch(&temp.path().join("notes.txt"));
    touch(&temp.path().join("binder/c_card.jpeg"));
    temp
}

#[test]
fn test_directory_is_sorted_and_filtered() {
    let temp = layout();
    let source = FsCardSource::new(vec![temp.path().to_path_buf()], false);

    assert_eq!(names(&source), vec!["a_card.jpg", "b_card.png"]);
    assert_eq!(source.count_hint(), Some(2));
}

#[test]
fn test_recursive_includes_subdirectories() {
    let temp = layout();
    let source = FsCardSource::new(vec![temp.path().to_path_buf()], true);

    assert_eq!(names(&source), vec!["a_card.jpg", "b_card.png", "c_card.jpeg"]);
}

#[test]
fn test_explicit_file_and_missing_path() {
    let temp = layout();
    let source = FsCardSource::new(
        vec![
            temp.path().join("b_card.png"),
            PathBuf::from("/definitely/not/here.png"),
        ],
        false,
    );

    let entries: Vec<_> = source.cards().collect();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].is_ok());
    let err = entries[1].as_ref().unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_explicit_unsupported_file_is_dropped() {
    let temp = layout();
    let source = FsCardSource::new(vec![temp.path().join("notes.txt")], false);
    assert_eq!(source.cards().count(), 0);
}
