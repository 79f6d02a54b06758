//! Plain-text rendering of the tree views.
//!
//! Presentation only: rendering never fails and never aborts a successful
//! resolution. Paths that do not round-trip as UTF-8 degrade to their
//! lossy display form.
use crate::tree::{FolderRow, RefRow, RowKind, TreeRow};
use crate::utils::table;

/// Suffix markers for the styling hints in text output.
fn kind_marker(kind: RowKind) -> &'static str {
    match kind {
        RowKind::Plain | RowKind::First => "",
        RowKind::Repeat => " (repeat)",
        RowKind::Cycle => " (cycle!)",
    }
}

fn reference_cell(row: &RefRow) -> String {
    format!("{}{}{}", "  ".repeat(row.depth), row.label, kind_marker(row.kind))
}

fn folder_cell(row: &FolderRow) -> String {
    match &row.header {
        Some(dir) => format!("[{}] {}", dir.display(), row.key.file_name()),
        None => format!("  | {}", row.key.file_name()),
    }
}

/// Render the logical reference tree, one line per row.
#[must_use]
pub fn reference_tree(rows: &[RefRow]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&reference_cell(row));
        out.push('\n');
    }
    out
}

/// Render the directory-grouped folder tree, one line per row.
#[must_use]
pub fn folder_tree(rows: &[FolderRow]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&folder_cell(row));
        out.push('\n');
    }
    out
}

/// Render both views side by side as a two-column table, one table row per
/// aligned pair.
#[must_use]
pub fn aligned(rows: &[TreeRow]) -> String {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| vec![reference_cell(&r.reference), folder_cell(&r.folder)])
        .collect();
    table::render(&["Reference", "Folder"], &body)
}
