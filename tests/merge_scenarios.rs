use std::fs;
use std::path::Path;
use tempfile::tempdir;

use treemerge::errors::MergeError;
use treemerge::graph::{FileKey, OccurrenceCounts};
use treemerge::resolver::IncludeResolver;
use treemerge::tree::{
    aligned_rows, AlignedFolderTreeBuilder, ReferenceTreeBuilder, RowKind,
};

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

// Scenario 1: root includes a and b, neither includes anything further.
#[test]
fn two_plain_includes_expand_in_order() {
    let td = tempdir().unwrap();
    let root = td.path().join("root.txt");
    write(&td.path().join("a.txt"), "a1\na2\n");
    write(&td.path().join("b.txt"), "b1\n");
    write(&root, "start\n#include a.txt\n#include b.txt\nend\n");

    let merged = IncludeResolver::new().merge(&root).unwrap();
    assert_eq!(merged.lines, vec!["start", "a1", "a2", "b1", "end"]);

    let ids = OccurrenceCounts::count(&merged.graph, &merged.root).duplicate_ids();
    assert!(ids.is_empty(), "no file is referenced twice");
}

// Scenario 2: root includes a.txt via two different lines.
#[test]
fn duplicate_include_appears_twice_with_one_stable_id() {
    let td = tempdir().unwrap();
    let root = td.path().join("root.txt");
    write(&td.path().join("a.txt"), "content of a\n");
    write(&root, "#include a.txt\nmiddle\n#include a.txt\n");

    let merged = IncludeResolver::new().merge(&root).unwrap();
    // Content is never deduplicated
    assert_eq!(merged.lines, vec!["content of a", "middle", "content of a"]);

    let ids = OccurrenceCounts::count(&merged.graph, &merged.root).duplicate_ids();
    let rows = ReferenceTreeBuilder::build(&merged.graph, &merged.root, &ids);
    let a_rows: Vec<_> = rows.iter().filter(|r| r.label.starts_with("a.txt")).collect();
    assert_eq!(a_rows.len(), 2);
    assert_eq!(a_rows[0].label, "a.txt [1]");
    assert_eq!(a_rows[0].kind, RowKind::First);
    assert_eq!(a_rows[1].label, "a.txt [1]");
    assert_eq!(a_rows[1].kind, RowKind::Repeat);
}

// Scenario 3: a includes b, b includes a.
#[test]
fn transitive_cycle_fails_and_writes_nothing() {
    let td = tempdir().unwrap();
    let root = td.path().join("root.txt");
    write(&root, "#include a.txt\n");
    write(&td.path().join("a.txt"), "#include b.txt\n");
    write(&td.path().join("b.txt"), "#include a.txt\n");

    let err = IncludeResolver::new().merge(&root).unwrap_err();
    match err {
        MergeError::CyclicInclude { file } => {
            let name = file.file_name().unwrap().to_string_lossy().into_owned();
            assert!(name == "a.txt" || name == "b.txt", "names a participant, got {name}");
        }
        other => panic!("expected CyclicInclude, got {other:?}"),
    }
}

// Scenario 4: root (dir X) includes Y/file1, X/file2, Y/file3.
#[test]
fn folder_headers_are_relisted_not_merged() {
    let td = tempdir().unwrap();
    let x = td.path().join("x");
    let y = td.path().join("y");
    fs::create_dir_all(&x).unwrap();
    fs::create_dir_all(&y).unwrap();
    let root = x.join("root.txt");
    write(&y.join("file1.txt"), "f1\n");
    write(&x.join("file2.txt"), "f2\n");
    write(&y.join("file3.txt"), "f3\n");
    write(
        &root,
        "#include ../y/file1.txt\n#include file2.txt\n#include ../y/file3.txt\n",
    );

    let merged = IncludeResolver::new().merge(&root).unwrap();
    let rows = AlignedFolderTreeBuilder::build(&merged.graph, &merged.root);

    let headers: Vec<_> = rows.iter().map(|r| r.header.clone()).collect();
    let x_key = FileKey::canonicalize(&x);
    let y_key = FileKey::canonicalize(&y);
    assert_eq!(headers.len(), 4);
    assert_eq!(headers[0].as_deref(), Some(x_key.as_path()));
    assert_eq!(headers[1].as_deref(), Some(y_key.as_path()));
    assert_eq!(headers[2].as_deref(), Some(x_key.as_path()));
    // Y appears again as a fresh header, not merged with headers[1]
    assert_eq!(headers[3].as_deref(), Some(y_key.as_path()));
}

// Alignment property over a diamond fixture resolved from disk.
#[test]
fn reference_and_folder_views_align_row_for_row() {
    let td = tempdir().unwrap();
    let root = td.path().join("root.txt");
    let shared = td.path().join("shared.txt");
    write(&shared, "s\n");
    write(&td.path().join("a.txt"), "#include shared.txt\n");
    write(&td.path().join("b.txt"), "#include shared.txt\n");
    write(&root, "#include a.txt\n#include b.txt\n");

    let merged = IncludeResolver::new().merge(&root).unwrap();
    let ids = OccurrenceCounts::count(&merged.graph, &merged.root).duplicate_ids();

    let refs = ReferenceTreeBuilder::build(&merged.graph, &merged.root, &ids);
    let folders = AlignedFolderTreeBuilder::build(&merged.graph, &merged.root);
    assert_eq!(refs.len(), folders.len());
    for (r, f) in refs.iter().zip(&folders) {
        assert_eq!(r.key, f.key, "row pairs must describe the same file");
    }

    let aligned = aligned_rows(&merged.graph, &merged.root, &ids);
    assert_eq!(aligned.len(), refs.len());
    for (pair, r) in aligned.iter().zip(&refs) {
        assert_eq!(pair.reference.key, r.key);
        assert_eq!(pair.reference.key, pair.folder.key);
    }
}

// Same physical file spelled differently in two directives is one FileKey.
#[test]
fn spelling_variants_resolve_to_one_duplicate() {
    let td = tempdir().unwrap();
    let sub = td.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    let root = td.path().join("root.txt");
    write(&sub.join("part.txt"), "p\n");
    write(&root, "#include sub/part.txt\n#include ./sub/../sub/part.txt\n");

    let merged = IncludeResolver::new().merge(&root).unwrap();
    let counts = OccurrenceCounts::count(&merged.graph, &merged.root);
    let part = FileKey::canonicalize(&sub.join("part.txt"));
    assert_eq!(counts.get(&part), 2);
    assert_eq!(counts.duplicate_ids().get(&part), Some(&1));
}
