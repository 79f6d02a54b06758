use regex::Regex;

/// Default include keyword recognized at the start of a directive line.
pub const DEFAULT_KEYWORD: &str = "#include";

/// Default line-comment markers a directive may hide behind.
pub const DEFAULT_COMMENT_MARKERS: &[&str] = &["//", "#", ";", "<!--"];

/// Recognizes include-directive lines and extracts their path argument.
///
/// A line matches when, after optional leading whitespace and an optional
/// line-comment marker, it begins with the include keyword followed by
/// whitespace and a path occupying the remainder of the line. A trailing
/// HTML comment close and wrapping `<...>` or `"..."` around the path are
/// stripped.
#[derive(Debug)]
pub struct DirectiveParser {
    pattern: Regex,
}

impl DirectiveParser {
    #[must_use]
    pub fn new() -> Self {
        Self::with_syntax(DEFAULT_KEYWORD, DEFAULT_COMMENT_MARKERS)
    }

    /// Build a parser for a custom keyword and comment-marker set.
    ///
    /// Keyword and markers are regex-escaped, so any literal syntax is safe.
    #[must_use]
    pub fn with_syntax<S: AsRef<str>>(keyword: &str, comment_markers: &[S]) -> Self {
        let markers = comment_markers
            .iter()
            .map(|m| regex::escape(m.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let kw = regex::escape(keyword);
        // Conservative single-line pattern; the path group is trimmed further below.
        let raw = if markers.is_empty() {
            format!(r"^\s*{kw}\s+(?P<path>\S.*?)\s*$")
        } else {
            format!(r"^\s*(?:(?:{markers})\s*)?{kw}\s+(?P<path>\S.*?)\s*$")
        };
        let pattern = Regex::new(&raw).unwrap();
        Self { pattern }
    }

    /// Return the path argument if `line` is an include directive.
    #[must_use]
    pub fn directive_path<'l>(&self, line: &'l str) -> Option<&'l str> {
        let m = self.pattern.captures(line)?.name("path")?;
        let mut path = m.as_str();
        // Directives inside HTML comments carry the close marker on the same line.
        path = path.strip_suffix("-->").map_or(path, str::trim_end);
        if let Some(inner) = path.strip_prefix('<').and_then(|p| p.strip_suffix('>')) {
            path = inner;
        } else if let Some(inner) = path.strip_prefix('"').and_then(|p| p.strip_suffix('"')) {
            path = inner;
        }
        let path = path.trim();
        if path.is_empty() {
            None
        } else {
            Some(path)
        }
    }
}

impl Default for DirectiveParser {
    fn default() -> Self {
        Self::new()
    }
}
