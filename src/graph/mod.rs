//! Graph model for the inclusion hierarchy.
//!
//! This module defines the canonical file key ([`FileKey`]), the ordered
//! parent -> children map built from resolver discovery events
//! ([`DependencyGraph`]), and the post-processing passes over it:
//! occurrence counting and duplicate-id assignment.
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

/// A canonicalized absolute path used as the identity of a file.
///
/// Normalization happens once at construction: the path is made absolute,
/// `.`/`..` components are resolved lexically, and the spelling is
/// case-folded on Windows. All graph operations key on `FileKey`, never on
/// raw strings, so the same physical file is recognized as identical
/// regardless of how a directive spelled it.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FileKey(PathBuf);

impl FileKey {
    #[must_use]
    pub fn canonicalize(path: &Path) -> Self {
        let abs = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(path)
        };
        let mut out = PathBuf::new();
        for comp in abs.components() {
            match comp {
                Component::CurDir => {}
                Component::ParentDir => {
                    out.pop();
                }
                other => out.push(other),
            }
        }
        #[cfg(windows)]
        let out = PathBuf::from(out.to_string_lossy().to_lowercase());
        Self(out)
    }

    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// File name for display; degrades to the full lossy path when the key
    /// has no final component.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.0
            .file_name()
            .map_or_else(|| self.0.to_string_lossy().into_owned(), |n| n.to_string_lossy().into_owned())
    }

    /// Containing directory, used by the folder view for header grouping.
    #[must_use]
    pub fn directory(&self) -> PathBuf {
        self.0.parent().map_or_else(PathBuf::new, Path::to_path_buf)
    }
}

impl std::fmt::Display for FileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Ordered parent -> children map for one merge invocation.
///
/// Insertion order equals the order directives appear in the parent file;
/// duplicates are allowed (the same child recorded twice under one parent
/// if referenced twice). The structure itself is not required to be
/// acyclic: cycle rejection happens at resolution time, and an error path
/// may leave a partially recorded graph behind.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DependencyGraph {
    edges: HashMap<FileKey, Vec<FileKey>>,
}

impl DependencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `child` to `parent`'s ordered child list.
    pub fn record_edge(&mut self, parent: FileKey, child: FileKey) {
        self.edges.entry(parent).or_default().push(child);
    }

    /// Recorded children of `file`, in directive order, or empty.
    #[must_use]
    pub fn children(&self, file: &FileKey) -> &[FileKey] {
        match self.edges.get(file) {
            Some(v) => v.as_slice(),
            None => &[],
        }
    }

    /// Number of parents with at least one recorded edge.
    #[must_use]
    pub fn parent_count(&self) -> usize {
        self.edges.len()
    }

    /// Total number of recorded edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

/// How many times each file is referenced anywhere in the tree, plus the
/// order in which files were first discovered.
///
/// Counting is per edge traversal: a diamond dependency reachable through
/// two parents is counted once per path, so a file's count always equals
/// the number of rows it occupies in the reference tree. Recursion into a
/// child is skipped only when the child is already on the current DFS
/// branch, which keeps the walk finite even on a structurally cyclic graph
/// left behind by an aborted resolution.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceCounts {
    counts: HashMap<FileKey, usize>,
    discovery: Vec<FileKey>,
}

impl OccurrenceCounts {
    #[must_use]
    pub fn count(graph: &DependencyGraph, root: &FileKey) -> Self {
        let mut out = Self::default();
        let mut branch = HashSet::new();
        out.walk(graph, root, &mut branch);
        out
    }

    fn walk(&mut self, graph: &DependencyGraph, node: &FileKey, branch: &mut HashSet<FileKey>) {
        branch.insert(node.clone());
        for child in graph.children(node) {
            let n = self.counts.entry(child.clone()).or_insert(0);
            if *n == 0 {
                self.discovery.push(child.clone());
            }
            *n += 1;
            // Count the edge even on a cycle; only further recursion is cut.
            if !branch.contains(child) {
                self.walk(graph, child, branch);
            }
        }
        branch.remove(node);
    }

    /// Reference count for `file` (0 when never referenced, e.g. the root).
    #[must_use]
    pub fn get(&self, file: &FileKey) -> usize {
        self.counts.get(file).copied().unwrap_or(0)
    }

    /// Files in the order their count first went from zero to one.
    #[must_use]
    pub fn discovery_order(&self) -> &[FileKey] {
        &self.discovery
    }

    /// Assign stable sequential identifiers to every file referenced more
    /// than once, in first-discovery order, starting at 1.
    #[must_use]
    pub fn duplicate_ids(&self) -> HashMap<FileKey, u32> {
        let mut ids = HashMap::new();
        let mut next = 1u32;
        for key in &self.discovery {
            if self.get(key) > 1 {
                ids.insert(key.clone(), next);
                next += 1;
            }
        }
        ids
    }
}
