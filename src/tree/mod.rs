//! The two aligned views of the inclusion hierarchy.
//!
//! Both builders consume the single canonical [`preorder`] traversal, which
//! is the correctness precondition for the alignment invariant: the
//! reference view and the folder view always have the same number of rows,
//! and row `i` of each describes the same file.
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::graph::{DependencyGraph, FileKey};

/// One node visit in the canonical pre-order walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub key: FileKey,
    pub depth: usize,
    /// Terminal cycle visit: the key was already on the active branch, so
    /// the walk did not descend into it.
    pub cycle: bool,
}

/// Canonical pre-order DFS over the graph, root row first.
///
/// A child already on the current branch's ancestor set yields a terminal
/// cycle visit; sibling branches use push-before-recurse / pop-after-recurse
/// on a single mutable set, so a diamond dependency is legally revisited
/// (and re-expanded in full) at every occurrence.
#[must_use]
pub fn preorder(graph: &DependencyGraph, root: &FileKey) -> Vec<Visit> {
    let mut out = vec![Visit { key: root.clone(), depth: 0, cycle: false }];
    let mut branch = HashSet::new();
    walk(graph, root, 0, &mut branch, &mut out);
    out
}

fn walk(
    graph: &DependencyGraph,
    node: &FileKey,
    depth: usize,
    branch: &mut HashSet<FileKey>,
    out: &mut Vec<Visit>,
) {
    branch.insert(node.clone());
    for child in graph.children(node) {
        if branch.contains(child) {
            out.push(Visit { key: child.clone(), depth: depth + 1, cycle: true });
            continue;
        }
        out.push(Visit { key: child.clone(), depth: depth + 1, cycle: false });
        walk(graph, child, depth + 1, branch, out);
    }
    branch.remove(node);
}

/// Styling hint attached to a reference row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Referenced once, nothing special.
    Plain,
    /// First rendered occurrence of a duplicated file.
    First,
    /// Subsequent occurrence of a duplicated file; its subtree still
    /// renders in full.
    Repeat,
    /// Terminal cycle marker, not recursed.
    Cycle,
}

/// One row of the logical reference tree.
#[derive(Debug, Clone, Serialize)]
pub struct RefRow {
    pub key: FileKey,
    pub depth: usize,
    /// File name, plus ` [id]` when the file has a duplicate id.
    pub label: String,
    pub kind: RowKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_id: Option<u32>,
}

/// One row of the physical, directory-grouped folder tree.
#[derive(Debug, Clone, Serialize)]
pub struct FolderRow {
    pub key: FileKey,
    /// `Some(dir)` when this row (re-)emits a folder header — including the
    /// root row, which always shows its directory as the tree's root
    /// header. `None` marks a continuation of the previous row's folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<PathBuf>,
}

/// An aligned pair of rows describing the same file.
#[derive(Debug, Clone, Serialize)]
pub struct TreeRow {
    pub reference: RefRow,
    pub folder: FolderRow,
}

/// Builds the logical reference tree view.
pub struct ReferenceTreeBuilder;

impl ReferenceTreeBuilder {
    #[must_use]
    pub fn build(
        graph: &DependencyGraph,
        root: &FileKey,
        duplicate_ids: &HashMap<FileKey, u32>,
    ) -> Vec<RefRow> {
        Self::from_visits(&preorder(graph, root), duplicate_ids)
    }

    fn from_visits(visits: &[Visit], duplicate_ids: &HashMap<FileKey, u32>) -> Vec<RefRow> {
        let mut rendered_ids: HashSet<u32> = HashSet::new();
        visits
            .iter()
            .map(|v| {
                let id = duplicate_ids.get(&v.key).copied();
                let kind = if v.cycle {
                    RowKind::Cycle
                } else {
                    match id {
                        // Same id at every occurrence; only the styling flips
                        // from first to repeat.
                        Some(id) if rendered_ids.insert(id) => RowKind::First,
                        Some(_) => RowKind::Repeat,
                        None => RowKind::Plain,
                    }
                };
                let label = match (kind, id) {
                    (RowKind::Cycle, _) | (_, None) => v.key.file_name(),
                    (_, Some(id)) => format!("{} [{id}]", v.key.file_name()),
                };
                RefRow { key: v.key.clone(), depth: v.depth, label, kind, duplicate_id: id }
            })
            .collect()
    }
}

/// Builds the folder view in lockstep with the reference view.
pub struct AlignedFolderTreeBuilder;

impl AlignedFolderTreeBuilder {
    #[must_use]
    pub fn build(graph: &DependencyGraph, root: &FileKey) -> Vec<FolderRow> {
        Self::from_visits(&preorder(graph, root))
    }

    fn from_visits(visits: &[Visit]) -> Vec<FolderRow> {
        let mut prev_dir: Option<PathBuf> = None;
        visits
            .iter()
            .map(|v| {
                let dir = v.key.directory();
                // Headers are never deduplicated; only consecutive repeats
                // collapse into continuation rows (folder relisting).
                let header = if prev_dir.as_ref() == Some(&dir) {
                    None
                } else {
                    Some(dir.clone())
                };
                prev_dir = Some(dir);
                FolderRow { key: v.key.clone(), header }
            })
            .collect()
    }
}

/// Build both views from the identical traversal and zip them.
///
/// `aligned_rows(g, r, ids).len()` equals both builders' row counts, and
/// each pair describes the same file — the invariant the renderer relies
/// on.
#[must_use]
pub fn aligned_rows(
    graph: &DependencyGraph,
    root: &FileKey,
    duplicate_ids: &HashMap<FileKey, u32>,
) -> Vec<TreeRow> {
    let visits = preorder(graph, root);
    let refs = ReferenceTreeBuilder::from_visits(&visits, duplicate_ids);
    let folders = AlignedFolderTreeBuilder::from_visits(&visits);
    refs.into_iter()
        .zip(folders)
        .map(|(reference, folder)| TreeRow { reference, folder })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::OccurrenceCounts;
    use std::path::Path;

    fn key(p: &str) -> FileKey {
        FileKey::canonicalize(Path::new(p))
    }

    fn graph(edges: &[(&str, &str)]) -> DependencyGraph {
        let mut g = DependencyGraph::new();
        for (p, c) in edges {
            g.record_edge(key(p), key(c));
        }
        g
    }

    #[test]
    fn preorder_root_first_then_directive_order() {
        let g = graph(&[("/x/root.txt", "/x/a.txt"), ("/x/root.txt", "/x/b.txt")]);
        let visits = preorder(&g, &key("/x/root.txt"));
        let names: Vec<String> = visits.iter().map(|v| v.key.file_name()).collect();
        assert_eq!(names, vec!["root.txt", "a.txt", "b.txt"]);
        assert_eq!(visits[0].depth, 0);
        assert_eq!(visits[1].depth, 1);
    }

    #[test]
    fn repeats_are_not_collapsed() {
        // shared has a child; both occurrences must expand it
        let g = graph(&[
            ("/x/root.txt", "/x/a.txt"),
            ("/x/root.txt", "/x/b.txt"),
            ("/x/a.txt", "/x/shared.txt"),
            ("/x/b.txt", "/x/shared.txt"),
            ("/x/shared.txt", "/x/leaf.txt"),
        ]);
        let visits = preorder(&g, &key("/x/root.txt"));
        let names: Vec<String> = visits.iter().map(|v| v.key.file_name()).collect();
        assert_eq!(
            names,
            vec!["root.txt", "a.txt", "shared.txt", "leaf.txt", "b.txt", "shared.txt", "leaf.txt"]
        );
        assert!(visits.iter().all(|v| !v.cycle));
    }

    #[test]
    fn cycle_visits_are_terminal() {
        let g = graph(&[("/x/a.txt", "/x/b.txt"), ("/x/b.txt", "/x/a.txt")]);
        let visits = preorder(&g, &key("/x/a.txt"));
        let names: Vec<(String, bool)> =
            visits.iter().map(|v| (v.key.file_name(), v.cycle)).collect();
        assert_eq!(
            names,
            vec![
                ("a.txt".to_string(), false),
                ("b.txt".to_string(), false),
                ("a.txt".to_string(), true),
            ]
        );
    }

    #[test]
    fn first_and_repeat_styling_share_one_id() {
        let g = graph(&[("/x/root.txt", "/x/a.txt"), ("/x/root.txt", "/x/a.txt")]);
        let root = key("/x/root.txt");
        let ids = OccurrenceCounts::count(&g, &root).duplicate_ids();
        let rows = ReferenceTreeBuilder::build(&g, &root, &ids);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].kind, RowKind::Plain);
        assert_eq!(rows[1].kind, RowKind::First);
        assert_eq!(rows[1].label, "a.txt [1]");
        assert_eq!(rows[2].kind, RowKind::Repeat);
        assert_eq!(rows[2].label, "a.txt [1]");
        assert_eq!(rows[1].duplicate_id, rows[2].duplicate_id);
    }

    #[test]
    fn folder_headers_relist_on_every_change() {
        // root in X includes Y/file1, X/file2, Y/file3 -> headers Y, X, Y
        let g = graph(&[
            ("/x/root.txt", "/y/file1.txt"),
            ("/x/root.txt", "/x/file2.txt"),
            ("/x/root.txt", "/y/file3.txt"),
        ]);
        let rows = AlignedFolderTreeBuilder::build(&g, &key("/x/root.txt"));

        // Root row always carries its directory as the tree's root header.
        assert_eq!(rows[0].header.as_deref(), Some(Path::new("/x")));
        assert_eq!(rows[1].header.as_deref(), Some(Path::new("/y")));
        assert_eq!(rows[2].header.as_deref(), Some(Path::new("/x")));
        assert_eq!(rows[3].header.as_deref(), Some(Path::new("/y")));
    }

    #[test]
    fn consecutive_same_folder_rows_are_continuations() {
        let g = graph(&[
            ("/x/root.txt", "/y/file1.txt"),
            ("/x/root.txt", "/y/file2.txt"),
        ]);
        let rows = AlignedFolderTreeBuilder::build(&g, &key("/x/root.txt"));
        assert!(rows[1].header.is_some());
        assert!(rows[2].header.is_none());
    }

    #[test]
    fn alignment_holds_with_diamonds_and_cycles() {
        // Mixed fixture: a diamond plus a structural cycle
        let g = graph(&[
            ("/x/root.txt", "/x/a.txt"),
            ("/x/root.txt", "/y/b.txt"),
            ("/x/a.txt", "/z/shared.txt"),
            ("/y/b.txt", "/z/shared.txt"),
            ("/z/shared.txt", "/x/a.txt"), // cycle back edge
        ]);
        let root = key("/x/root.txt");
        let ids = OccurrenceCounts::count(&g, &root).duplicate_ids();

        let refs = ReferenceTreeBuilder::build(&g, &root, &ids);
        let folders = AlignedFolderTreeBuilder::build(&g, &root);
        assert_eq!(refs.len(), folders.len());
        for (r, f) in refs.iter().zip(&folders) {
            assert_eq!(r.key, f.key);
        }

        let aligned = aligned_rows(&g, &root, &ids);
        assert_eq!(aligned.len(), refs.len());
    }
}
