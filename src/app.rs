use crate::cli::{Cli, Commands, OutputFormat, TreeView};
use crate::graph::{DependencyGraph, FileKey, OccurrenceCounts};
use crate::parser::{DirectiveParser, DEFAULT_COMMENT_MARKERS, DEFAULT_KEYWORD};
use crate::resolver::IncludeResolver;
use crate::utils::config::{self, Config};
use clap::CommandFactory;
use clap_complete::generate;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Run the CLI logic in-process. Returns an exit code (0 = success).
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let bin_name = env!("CARGO_PKG_NAME");
            let mut out = io::stdout();
            generate(shell, &mut cmd, bin_name, &mut out);
            0
        }
        Commands::Merge { file, out, config: config_path } => {
            let cfg = load_config(&file, config_path.as_deref());
            let merged = match resolver_for(cfg.as_ref()).merge(&file) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Merge failed: {e}");
                    return 1;
                }
            };
            let dest = out.or_else(|| {
                cfg.as_ref().and_then(|c| c.output.as_ref()).and_then(|o| o.path.clone())
            });
            let content = join_lines(&merged.lines);
            match dest {
                Some(path) => {
                    if let Err(e) = commit_output(&path, &content) {
                        eprintln!("Failed to write merged output {}: {e}", path.display());
                        return 1;
                    }
                    if !cli.quiet {
                        println!(
                            "Merge completed: {} ({} includes expanded)",
                            path.display(),
                            merged.graph.edge_count()
                        );
                    }
                }
                None => print!("{content}"),
            }
            0
        }
        Commands::Tree { file, view, format, config: config_path } => {
            let cfg = load_config(&file, config_path.as_deref());
            let merged = match resolver_for(cfg.as_ref()).merge(&file) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Merge failed: {e}");
                    return 1;
                }
            };
            let view = effective_view(view, cfg.as_ref());
            let ids = OccurrenceCounts::count(&merged.graph, &merged.root).duplicate_ids();
            let rendered = match (view, format) {
                (TreeView::Reference, OutputFormat::Text) => crate::render::reference_tree(
                    &crate::tree::ReferenceTreeBuilder::build(&merged.graph, &merged.root, &ids),
                ),
                (TreeView::Folders, OutputFormat::Text) => crate::render::folder_tree(
                    &crate::tree::AlignedFolderTreeBuilder::build(&merged.graph, &merged.root),
                ),
                (TreeView::Aligned, OutputFormat::Text) => {
                    let rows = crate::tree::aligned_rows(&merged.graph, &merged.root, &ids);
                    let mut s = crate::render::aligned(&rows);
                    s.push('\n');
                    s
                }
                (TreeView::Reference, OutputFormat::Json) => {
                    let rows =
                        crate::tree::ReferenceTreeBuilder::build(&merged.graph, &merged.root, &ids);
                    match serde_json::to_string_pretty(&rows) {
                        Ok(s) => s + "\n",
                        Err(e) => {
                            eprintln!("JSON encode error: {e}");
                            return 1;
                        }
                    }
                }
                (TreeView::Folders, OutputFormat::Json) => {
                    let rows =
                        crate::tree::AlignedFolderTreeBuilder::build(&merged.graph, &merged.root);
                    match serde_json::to_string_pretty(&rows) {
                        Ok(s) => s + "\n",
                        Err(e) => {
                            eprintln!("JSON encode error: {e}");
                            return 1;
                        }
                    }
                }
                (TreeView::Aligned, OutputFormat::Json) => {
                    let rows = crate::tree::aligned_rows(&merged.graph, &merged.root, &ids);
                    match serde_json::to_string_pretty(&rows) {
                        Ok(s) => s + "\n",
                        Err(e) => {
                            eprintln!("JSON encode error: {e}");
                            return 1;
                        }
                    }
                }
            };
            print!("{rendered}");
            0
        }
        Commands::Graph { file, json, config: config_path } => {
            let cfg = load_config(&file, config_path.as_deref());
            let merged = match resolver_for(cfg.as_ref()).merge(&file) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Merge failed: {e}");
                    return 1;
                }
            };
            let counts = OccurrenceCounts::count(&merged.graph, &merged.root);
            let dump = GraphDump::new(&merged.root, &merged.graph, &counts);
            let serialized = match serde_json::to_string_pretty(&dump) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("JSON encode error: {e}");
                    return 1;
                }
            };
            match json {
                Some(path) => {
                    if let Err(e) = fs::write(&path, serialized) {
                        eprintln!("Failed to write graph JSON {}: {e}", path.display());
                        return 1;
                    }
                    if !cli.quiet {
                        println!("Graph written to {}", path.display());
                    }
                }
                None => println!("{serialized}"),
            }
            0
        }
    }
}

#[derive(serde::Serialize)]
struct GraphDump<'a> {
    root: &'a FileKey,
    graph: &'a DependencyGraph,
    occurrences: BTreeMap<&'a FileKey, usize>,
    duplicate_ids: BTreeMap<FileKey, u32>,
}

impl<'a> GraphDump<'a> {
    fn new(root: &'a FileKey, graph: &'a DependencyGraph, counts: &'a OccurrenceCounts) -> Self {
        let occurrences =
            counts.discovery_order().iter().map(|k| (k, counts.get(k))).collect();
        let duplicate_ids = counts.duplicate_ids().into_iter().collect();
        Self { root, graph, occurrences, duplicate_ids }
    }
}

fn load_config(root_file: &Path, explicit: Option<&Path>) -> Option<Config> {
    match explicit {
        Some(path) => config::load_config_at(path),
        None => config::load_config_near(root_file.parent().unwrap_or_else(|| Path::new("."))),
    }
}

fn resolver_for(cfg: Option<&Config>) -> IncludeResolver {
    let directive = cfg.and_then(|c| c.directive.as_ref());
    let keyword = directive
        .and_then(|d| d.keyword.as_deref())
        .unwrap_or(DEFAULT_KEYWORD);
    let parser = match directive.and_then(|d| d.comment_markers.as_ref()) {
        Some(markers) => DirectiveParser::with_syntax(keyword, markers),
        None => DirectiveParser::with_syntax(keyword, DEFAULT_COMMENT_MARKERS),
    };
    IncludeResolver::with_parser(parser)
}

// An explicit --view always wins; the config's default_view only fills in
// when the flag was omitted.
fn effective_view(flag: Option<TreeView>, cfg: Option<&Config>) -> TreeView {
    if let Some(view) = flag {
        return view;
    }
    let configured = cfg
        .and_then(|c| c.tree.as_ref())
        .and_then(|t| t.default_view.as_deref());
    match configured {
        Some("reference") => TreeView::Reference,
        Some("folders") => TreeView::Folders,
        _ => TreeView::Aligned,
    }
}

fn join_lines(lines: &[String]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

// Buffer-then-commit: the merged result lands in a sibling temporary file
// first and only replaces the destination by rename, so a failed merge never
// corrupts a previously good output.
fn commit_output(path: &Path, content: &str) -> io::Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)
}
