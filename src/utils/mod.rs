pub mod config {
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct DirectiveConfig {
        /// Include keyword, e.g. "#include".
        pub keyword: Option<String>,
        /// Line-comment markers a directive may be wrapped in.
        pub comment_markers: Option<Vec<String>>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct TreeConfig {
        /// "reference" | "folders" | "aligned"
        pub default_view: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct OutputConfig {
        /// Default destination for `merge` when `--out` is not given.
        pub path: Option<PathBuf>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct Config {
        pub directive: Option<DirectiveConfig>,
        pub tree: Option<TreeConfig>,
        pub output: Option<OutputConfig>,
    }

    fn default_config_path(dir: &Path) -> PathBuf {
        dir.join("treemerge.toml")
    }

    #[must_use]
    pub fn load_config_at(path: &Path) -> Option<Config> {
        let data = fs::read_to_string(path).ok()?;
        toml::from_str::<Config>(&data).ok()
    }

    /// Load `treemerge.toml` from the directory containing the root file.
    #[must_use]
    pub fn load_config_near(dir: &Path) -> Option<Config> {
        let p = default_config_path(dir);
        if p.exists() {
            load_config_at(&p)
        } else {
            None
        }
    }
}

pub mod table {
    // Helper to render a separator line
    fn sep(widths: &[usize]) -> String {
        let mut s = String::from("+");
        for w in widths {
            s.push_str(&"-".repeat(w + 2));
            s.push('+');
        }
        s
    }

    // Helper to render a row line
    fn line(cells: &[String], widths: &[usize]) -> String {
        let mut s = String::from("|");
        for (cell, w) in cells.iter().zip(widths) {
            s.push(' ');
            s.push_str(cell);
            let len = cell.chars().count();
            if len < *w {
                s.push_str(&" ".repeat(w - len));
            }
            s.push(' ');
            s.push('|');
        }
        s
    }

    /// Render a simple ASCII table given headers and rows.
    #[must_use]
    pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
        let cols = headers.len();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (c, w) in widths.iter_mut().enumerate().take(cols) {
                *w = (*w).max(row.get(c).map_or(0, |cell| cell.chars().count()));
            }
        }

        let mut out = String::new();
        out.push_str(&sep(&widths));
        out.push('\n');
        let header_cells: Vec<String> = headers.iter().map(|s| (*s).to_string()).collect();
        out.push_str(&line(&header_cells, &widths));
        out.push('\n');
        out.push_str(&sep(&widths));
        out.push('\n');
        for row in rows {
            let mut cells = Vec::with_capacity(cols);
            for i in 0..cols {
                cells.push(row.get(i).cloned().unwrap_or_default());
            }
            out.push_str(&line(&cells, &widths));
            out.push('\n');
        }
        out.push_str(&sep(&widths));
        out
    }
}
