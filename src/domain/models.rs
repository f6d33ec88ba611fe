use std::collections::BTreeSet;
use std::path::PathBuf;

pub const DEFAULT_MAX_FILE_SIZE_KB: u64 = 100;

/// Directory names that are never entered during expansion.
pub const EXCLUDED_DIRS: [&str; 7] = [
    ".git",
    "node_modules",
    "dist",
    "out",
    "build",
    ".idea",
    ".vscode",
];

/// Directory names hidden from the tree summary. `build` is still listed.
pub const TREE_IGNORED_DIRS: [&str; 6] = [
    ".git",
    "node_modules",
    "dist",
    "out",
    ".vscode",
    ".idea",
];

pub const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Clone)]
pub struct ExclusionConfig {
    pub max_file_size_kb: u64,
    /// Lowercase, with leading dot.
    pub excluded_extensions: BTreeSet<String>,
}

impl ExclusionConfig {
    pub fn new<I, S>(max_file_size_kb: u64, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let excluded_extensions = extensions
            .into_iter()
            .filter_map(|ext| normalize_extension(ext.as_ref()))
            .collect();

        Self {
            max_file_size_kb,
            excluded_extensions,
        }
    }

    pub fn is_excluded_extension(&self, ext: &str) -> bool {
        !ext.is_empty() && self.excluded_extensions.contains(ext)
    }

    pub fn is_excluded_dir(name: &str) -> bool {
        EXCLUDED_DIRS.contains(&name)
    }

    pub fn is_tree_ignored(name: &str) -> bool {
        TREE_IGNORED_DIRS.contains(&name)
    }
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            max_file_size_kb: DEFAULT_MAX_FILE_SIZE_KB,
            excluded_extensions: BTreeSet::new(),
        }
    }
}

fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().to_lowercase();
    let bare = trimmed.trim_start_matches('.');
    if bare.is_empty() {
        None
    } else {
        Some(format!(".{}", bare))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    Directory,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub kind: EntryKind,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub header_line: String,
    pub body: String,
}

impl RenderedBlock {
    pub fn render(&self) -> String {
        format!("{}\n{}", self.header_line, self.body)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BuildResult {
    pub content: String,
    pub processed_count: usize,
    pub skipped_count: usize,
    pub cancelled: bool,
}

#[derive(Debug)]
pub struct ContextOutput {
    pub content: String,
    pub processed_count: usize,
    pub skipped_count: usize,
    pub token_count: usize,
    pub cancelled: bool,
}

#[derive(Debug)]
pub enum ContextOutcome {
    Ready(ContextOutput),
    /// Nothing was processed or skipped.
    NothingToDo,
    /// Cancelled before any file was accumulated.
    Cancelled,
}

/// Zero-based line/character position inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: Position,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    pub path: PathBuf,
    pub text: String,
    pub caret: Position,
}

impl TextDocument {
    pub fn new(path: PathBuf, text: String) -> Self {
        Self {
            path,
            text,
            caret: Position::default(),
        }
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.text
            .split('\n')
            .nth(index)
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
    }

    /// Replaces the content of one line, keeping its line ending.
    pub fn replace_line(&mut self, index: usize, content: &str) -> bool {
        let mut lines: Vec<String> = self.text.split('\n').map(str::to_string).collect();
        let Some(line) = lines.get_mut(index) else {
            return false;
        };

        *line = if line.ends_with('\r') {
            format!("{}\r", content)
        } else {
            content.to_string()
        };
        self.text = lines.join("\n");
        true
    }

    pub fn line_ending(&self) -> &'static str {
        if self.text.contains("\r\n") { "\r\n" } else { "\n" }
    }

    /// Extension without the dot, lowercased.
    pub fn language_id(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
    }
}
