//! treemerge — Include-Tree Merge and Exploration
//!
//! Resolve a recursive, directive-based text-inclusion graph (`#include
//! <path>` style lines) into a single flattened output, and explore the
//! resulting dependency graph as two row-for-row aligned tree views.
//!
//! # Features
//! - Lazy, short-circuiting include expansion with cycle detection
//! - Dependency graph with occurrence counts and stable duplicate ids
//! - Logical reference tree and physical folder tree, aligned row for row
//! - Text and JSON output; atomic buffer-then-commit file writing
//!
//! # Quickstart (Library)
//! ```no_run
//! use treemerge::graph::OccurrenceCounts;
//! use treemerge::resolver::IncludeResolver;
//! use treemerge::tree::aligned_rows;
//!
//! let merged = IncludeResolver::new()
//!     .merge(std::path::Path::new("root.txt"))
//!     .expect("merge");
//! let ids = OccurrenceCounts::count(&merged.graph, &merged.root).duplicate_ids();
//! for row in aligned_rows(&merged.graph, &merged.root, &ids) {
//!     println!("{} | {:?}", row.reference.label, row.folder.header);
//! }
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! treemerge merge root.txt --out merged.txt
//! treemerge tree root.txt --view aligned
//! treemerge graph root.txt --json graph.json
//! ```
//!
//! # Directive Syntax
//! A line matches when, after optional whitespace and an optional
//! line-comment marker, it begins with the include keyword followed by a
//! path. Paths resolve relative to the *including* file's directory.
//! Keyword and markers are configurable via `treemerge.toml`.
pub mod app;
pub mod cli;
pub mod errors;
pub mod graph;
pub mod parser;
pub mod render;
pub mod resolver;
pub mod tree;
pub mod utils;
