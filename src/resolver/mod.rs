//! Recursive include resolution.
//!
//! [`IncludeResolver`] expands a root file into the lazy line sequence
//! [`MergeStream`]. Each include directive is replaced in place by the
//! referenced file's fully expanded content; non-matching lines pass
//! through unchanged. While streaming, every newly opened file is recorded
//! as a `(parent, child)` edge on the stream's [`DependencyGraph`] — the
//! only mechanism by which graph edges are created, in depth-first order.
//!
//! Cycle detection uses the active chain: a file is a member from the
//! moment it is opened until its lines are exhausted, so two sibling
//! branches may legally include the same file (a diamond), while any
//! re-entry along the active path fails with
//! [`MergeError::CyclicInclude`].
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::errors::MergeError;
use crate::graph::{DependencyGraph, FileKey};
use crate::parser::DirectiveParser;

/// Fully buffered result of a successful merge.
#[derive(Debug)]
pub struct Merged {
    pub root: FileKey,
    pub lines: Vec<String>,
    pub graph: DependencyGraph,
}

/// Entry point for include resolution.
#[derive(Debug, Default)]
pub struct IncludeResolver {
    parser: DirectiveParser,
}

impl IncludeResolver {
    #[must_use]
    pub fn new() -> Self {
        Self { parser: DirectiveParser::new() }
    }

    /// Use a custom directive syntax (keyword / comment markers).
    #[must_use]
    pub fn with_parser(parser: DirectiveParser) -> Self {
        Self { parser }
    }

    /// Open `root` and return the lazy expanded-line stream.
    ///
    /// The stream performs file I/O as it is consumed; dropping it early
    /// opens no further files. It is not restartable.
    ///
    /// # Errors
    /// Returns `MergeError::Io` when the root file cannot be opened.
    pub fn stream(&self, root: &Path) -> Result<MergeStream<'_>, MergeError> {
        let key = FileKey::canonicalize(root);
        let frame = Frame::open(&key)?;
        let mut active = HashSet::new();
        active.insert(key.clone());
        Ok(MergeStream {
            parser: &self.parser,
            root: key,
            stack: vec![frame],
            active,
            graph: DependencyGraph::new(),
            failed: false,
        })
    }

    /// Resolve `root` in full, buffering every expanded line.
    ///
    /// This is the buffer-then-commit half of the error policy: callers get
    /// either the complete merged content plus the dependency graph, or an
    /// error and nothing to write.
    ///
    /// # Errors
    /// Propagates the first `MergeError` hit during expansion
    /// (missing include, cyclic include, or I/O failure).
    pub fn merge(&self, root: &Path) -> Result<Merged, MergeError> {
        let mut stream = self.stream(root)?;
        let mut lines = Vec::new();
        for line in &mut stream {
            lines.push(line?);
        }
        Ok(Merged { root: stream.root.clone(), lines, graph: stream.into_graph() })
    }
}

/// One open file on the expansion stack.
struct Frame {
    key: FileKey,
    dir: PathBuf,
    line_no: usize,
    lines: io::Lines<BufReader<File>>,
}

impl Frame {
    fn open(key: &FileKey) -> Result<Self, io::Error> {
        let file = File::open(key.as_path())?;
        Ok(Self {
            key: key.clone(),
            dir: key.directory(),
            line_no: 0,
            lines: BufReader::new(file).lines(),
        })
    }
}

/// Lazy sequence of fully expanded lines.
///
/// Yields `Err` exactly once on a fatal resolution error and then fuses.
/// The dependency graph accumulated so far stays accessible either way;
/// after an error it may be partial and even cyclic.
pub struct MergeStream<'r> {
    parser: &'r DirectiveParser,
    root: FileKey,
    stack: Vec<Frame>,
    active: HashSet<FileKey>,
    graph: DependencyGraph,
    failed: bool,
}

impl MergeStream<'_> {
    /// Canonical key of the root file.
    #[must_use]
    pub fn root(&self) -> &FileKey {
        &self.root
    }

    /// Edges discovered so far.
    #[must_use]
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Consume the stream, keeping the discovered graph.
    #[must_use]
    pub fn into_graph(self) -> DependencyGraph {
        self.graph
    }

    fn fail(&mut self, err: MergeError) -> Option<Result<String, MergeError>> {
        self.failed = true;
        Some(Err(err))
    }
}

impl Iterator for MergeStream<'_> {
    type Item = Result<String, MergeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let next = match self.stack.last_mut() {
                Some(frame) => {
                    let n = frame.lines.next();
                    if matches!(n, Some(Ok(_))) {
                        frame.line_no += 1;
                    }
                    n
                }
                None => return None,
            };
            let line = match next {
                // Frame exhausted: only now does its file leave the active chain,
                // so a later sibling branch may include it again.
                None => {
                    if let Some(done) = self.stack.pop() {
                        self.active.remove(&done.key);
                    }
                    continue;
                }
                Some(Err(e)) => return self.fail(MergeError::Io(e)),
                Some(Ok(line)) => line,
            };

            let Some(target) = self.parser.directive_path(&line) else {
                return Some(Ok(line));
            };

            // Resolve relative to the *including* file's directory.
            let (parent, line_no, resolved) = match self.stack.last() {
                Some(frame) => (frame.key.clone(), frame.line_no, frame.dir.join(target)),
                None => return None,
            };
            let child = FileKey::canonicalize(&resolved);

            if self.active.contains(&child) {
                return self.fail(MergeError::CyclicInclude { file: child.as_path().to_path_buf() });
            }
            let frame = match Frame::open(&child) {
                Ok(f) => f,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return self.fail(MergeError::MissingInclude {
                        file: parent.as_path().to_path_buf(),
                        line: line_no,
                        path: resolved,
                    });
                }
                Err(e) => return self.fail(MergeError::Io(e)),
            };
            self.graph.record_edge(parent, child.clone());
            self.active.insert(child);
            self.stack.push(frame);
        }
    }
}
