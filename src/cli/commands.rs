use crate::core::content::decode_text;
use crate::core::context_generator::{build_context_output, build_selection_output, format_summary};
use crate::core::header::{HeaderOutcome, insert_path_header};
use crate::core::paths::normalize_path;
use crate::core::selection::select_lines;
use crate::domain::models::{
    ContextOutcome, DEFAULT_MAX_FILE_SIZE_KB, EntryKind, ExclusionConfig, Position, TextDocument,
};
use crate::infra::comment::LineCommentSynthesizer;
use crate::infra::file_system::{FileSystemProvider, LocalFileSystem};
use crate::infra::logger::setup_logger;
use crate::infra::output::{create_writer, write_output};
use crate::infra::progress::{CancellationToken, TerminalProgress};
use clap::{Parser, Subcommand};
use crossterm::{
    ExecutableCommand,
    style::{Color, ResetColor, SetForegroundColor},
};
use log::{debug, info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "prompt-context")]
#[command(about = "Bundle files, folders or a line selection into one LLM context block", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Workspace root that display paths are relative to
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy files, folders or selected lines as a context bundle
    Copy {
        #[arg(required = true)]
        targets: Vec<PathBuf>,

        /// Line range of a single target file, `N` or `N-M` (repeatable)
        #[arg(long = "range", value_parser = parse_line_range)]
        ranges: Vec<LineRange>,

        /// Files larger than this many KB are skipped
        #[arg(long, env = "PROMPT_CONTEXT_MAX_FILE_SIZE", default_value_t = DEFAULT_MAX_FILE_SIZE_KB)]
        max_file_size: u64,

        /// Comma separated extensions to skip, e.g. `.png,.jpg`
        #[arg(long, env = "PROMPT_CONTEXT_EXCLUDED_EXTENSIONS", default_value = "")]
        exclude_ext: String,

        #[arg(long)]
        output: Option<String>,

        #[arg(long)]
        stdout: bool,
    },
    /// Stamp the file's relative path as a comment on its first line
    Header {
        file: PathBuf,

        /// Zero-based caret line
        #[arg(long, default_value_t = 0)]
        line: usize,

        /// Zero-based caret column
        #[arg(long, default_value_t = 0)]
        column: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub first: usize,
    pub last: usize,
}

fn parse_line_range(raw: &str) -> Result<LineRange, String> {
    let parse = |s: &str| {
        s.trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid line number '{}'", s.trim()))
    };

    let (first, last) = match raw.split_once('-') {
        Some((first, last)) => (parse(first)?, parse(last)?),
        None => {
            let line = parse(raw)?;
            (line, line)
        }
    };

    if first == 0 {
        return Err("line numbers start at 1".to_string());
    }
    if last < first {
        return Err(format!("range end {} is before start {}", last, first));
    }
    Ok(LineRange { first, last })
}

/// Lexically absolute: joined onto `base` with `.` components dropped.
fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    base.join(path).components().collect()
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logger(cli.verbose)?;
    execute(cli)
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let root = resolve_path(&cwd, cli.root.as_deref().unwrap_or(Path::new(".")));
    debug!("Workspace root: {}", root.display());

    match cli.command {
        Commands::Copy {
            targets,
            ranges,
            max_file_size,
            exclude_ext,
            output,
            stdout,
        } => {
            info!("Starting copy command");
            debug!(
                "Command parameters: targets={:?}, ranges={:?}, max_file_size={}, exclude_ext={}, output={:?}, stdout={}",
                targets, ranges, max_file_size, exclude_ext, output, stdout
            );

            let config = ExclusionConfig::new(max_file_size, exclude_ext.split(','));
            let targets: Vec<PathBuf> = targets.iter().map(|t| resolve_path(&cwd, t)).collect();
            copy_context(&targets, &ranges, &root, &config, output, stdout)
        }
        Commands::Header { file, line, column } => {
            info!("Starting header command");
            add_header(&resolve_path(&cwd, &file), &root, Position::new(line, column))
        }
    }
}

/// The single target, when the invocation asks for selected lines of one file.
fn selection_target<'a>(
    targets: &'a [PathBuf],
    ranges: &[LineRange],
    fs: &dyn FileSystemProvider,
) -> Option<&'a PathBuf> {
    if ranges.is_empty() {
        return None;
    }
    if targets.len() != 1 {
        warn!("--range is ignored when more than one target is given");
        return None;
    }

    let target = &targets[0];
    match fs.stat(target) {
        Ok(stat) if stat.kind == EntryKind::File => Some(target),
        Ok(_) => {
            warn!("--range is ignored for directory {}", target.display());
            None
        }
        Err(e) => {
            warn!("Failed to access {}: {}", target.display(), e);
            None
        }
    }
}

fn copy_context(
    targets: &[PathBuf],
    ranges: &[LineRange],
    root: &Path,
    config: &ExclusionConfig,
    output: Option<String>,
    to_stdout: bool,
) -> anyhow::Result<()> {
    let fs = LocalFileSystem;
    let writer = create_writer(&output, to_stdout);

    if let Some(target) = selection_target(targets, ranges, &fs) {
        let text = decode_text(&fs.read_file(target)?);
        let document = TextDocument::new(target.clone(), text);
        let selections: Vec<_> = ranges
            .iter()
            .filter_map(|range| select_lines(&document, range.first, range.last))
            .collect();

        match build_selection_output(&document, root, &selections) {
            Some(selection) => {
                let summary = format!("Copied selection! (~{} tokens)", selection.token_count);
                return write_output(writer.as_ref(), &selection.content, &summary);
            }
            None => info!("Selection is empty, copying the whole file"),
        }
    }

    let token = CancellationToken::new();
    let mut progress = TerminalProgress::new(token);
    let outcome = build_context_output(targets, root, config, &fs, &mut progress);
    progress.finish()?;

    match outcome {
        ContextOutcome::Ready(context) => {
            if context.cancelled {
                warn!("Build was cancelled, the bundle is partial");
            }
            write_output(writer.as_ref(), &context.content, &format_summary(&context))
        }
        ContextOutcome::NothingToDo => {
            warn!("No valid text files found to copy");
            let mut stdout = io::stdout();
            stdout.execute(SetForegroundColor(Color::Yellow))?;
            writeln!(stdout, "No valid text files found to copy.")?;
            stdout.execute(ResetColor)?;
            Ok(())
        }
        ContextOutcome::Cancelled => {
            info!("Build cancelled, nothing copied");
            Ok(())
        }
    }
}

fn add_header(file: &Path, root: &Path, caret: Position) -> anyhow::Result<()> {
    let text = fs::read_to_string(file)?;
    let mut document = TextDocument::new(file.to_path_buf(), text);
    document.caret = caret;

    let normalized = normalize_path(file, root);
    match insert_path_header(&mut document, &normalized, &LineCommentSynthesizer) {
        HeaderOutcome::Inserted => {
            fs::write(file, &document.text)?;
            debug!(
                "Caret moved to {}:{}",
                document.caret.line, document.caret.character
            );
            println!("Path header added.");
        }
        HeaderOutcome::AlreadyPresent => println!("Path header already present."),
        HeaderOutcome::Failed => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "prompt-context",
            "-vv",
            "copy",
            "./src",
            "README.md",
            "--range",
            "3-4",
            "--range",
            "10",
            "--max-file-size",
            "50",
            "--exclude-ext",
            ".png,.jpg",
            "--stdout",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Copy {
                targets,
                ranges,
                max_file_size,
                exclude_ext,
                output,
                stdout,
            } => {
                assert_eq!(targets, vec![PathBuf::from("./src"), PathBuf::from("README.md")]);
                assert_eq!(
                    ranges,
                    vec![
                        LineRange { first: 3, last: 4 },
                        LineRange { first: 10, last: 10 }
                    ]
                );
                assert_eq!(max_file_size, 50);
                assert_eq!(exclude_ext, ".png,.jpg");
                assert_eq!(output, None);
                assert!(stdout);
            }
            Commands::Header { .. } => panic!("expected copy"),
        }
    }

    #[test]
    fn test_header_parsing() {
        let cli = Cli::try_parse_from([
            "prompt-context",
            "header",
            "src/main.rs",
            "--root",
            "/w",
            "--line",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.root, Some(PathBuf::from("/w")));
        match cli.command {
            Commands::Header { file, line, column } => {
                assert_eq!(file, PathBuf::from("src/main.rs"));
                assert_eq!(line, 5);
                assert_eq!(column, 0);
            }
            Commands::Copy { .. } => panic!("expected header"),
        }
    }

    #[test]
    fn test_copy_requires_targets() {
        assert!(Cli::try_parse_from(["prompt-context", "copy"]).is_err());
    }

    #[test]
    fn test_parse_line_range() {
        assert_eq!(parse_line_range("7"), Ok(LineRange { first: 7, last: 7 }));
        assert_eq!(parse_line_range("2 - 9"), Ok(LineRange { first: 2, last: 9 }));
        assert!(parse_line_range("0").is_err());
        assert!(parse_line_range("5-3").is_err());
        assert!(parse_line_range("a-b").is_err());
    }

    #[test]
    fn test_resolve_path_drops_current_dir_components() {
        assert_eq!(
            resolve_path(Path::new("/w"), Path::new("./src/./lib.rs")),
            PathBuf::from("/w/src/lib.rs")
        );
        assert_eq!(
            resolve_path(Path::new("/w"), Path::new("/abs/file")),
            PathBuf::from("/abs/file")
        );
    }

    #[test]
    fn test_selection_target_rules() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.rs");
        fs::write(&file, "fn a() {}").unwrap();
        let dir = temp_dir.path().to_path_buf();
        let range = [LineRange { first: 1, last: 1 }];

        let single = [file.clone()];
        assert_eq!(selection_target(&single, &range, &LocalFileSystem), Some(&file));
        assert_eq!(selection_target(&single, &[], &LocalFileSystem), None);

        let multiple = [file.clone(), file.clone()];
        assert_eq!(selection_target(&multiple, &range, &LocalFileSystem), None);

        let folder = [dir];
        assert_eq!(selection_target(&folder, &range, &LocalFileSystem), None);
    }

    #[test]
    fn test_copy_writes_bundle_to_output_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/lib.rs"), "pub fn lib() {}").unwrap();
        let out = root.join("bundle.txt");

        let cli = Cli::try_parse_from([
            "prompt-context".into(),
            "copy".into(),
            root.join("src").into_os_string(),
            "--root".into(),
            root.as_os_str().to_owned(),
            "--output".into(),
            out.as_os_str().to_owned(),
        ])
        .unwrap();
        execute(cli).unwrap();

        let bundle = fs::read_to_string(&out).unwrap();
        assert!(bundle.starts_with("Project Tree Context:"));
        assert!(bundle.contains("File: src/lib.rs\n```rs\npub fn lib() {}\n```"));
    }

    #[test]
    fn test_copy_selection_writes_numbered_lines() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("notes.txt"), "one\ntwo\nthree\nfour").unwrap();
        let out = root.join("selection.txt");

        let cli = Cli::try_parse_from([
            "prompt-context".into(),
            "copy".into(),
            root.join("notes.txt").into_os_string(),
            "--range".into(),
            "4".into(),
            "--range".into(),
            "1-2".into(),
            "--root".into(),
            root.as_os_str().to_owned(),
            "--output".into(),
            out.as_os_str().to_owned(),
        ])
        .unwrap();
        execute(cli).unwrap();

        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "File: notes.txt (Selection)\n```txt\n   1 | one\n   2 | two\n\n... (Gap) ...\n\n   4 | four\n```"
        );
    }

    #[test]
    fn test_header_command_is_idempotent_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        let file = root.join("src/main.rs");
        fs::write(&file, "fn main() {}\n").unwrap();

        add_header(&file, root, Position::default()).unwrap();
        add_header(&file, root, Position::default()).unwrap();

        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "// src/main.rs\nfn main() {}\n"
        );
    }

    #[test]
    fn test_header_for_unknown_language_leaves_file_alone() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("data.weird");
        fs::write(&file, "payload\n").unwrap();

        add_header(&file, temp_dir.path(), Position::default()).unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "payload\n");
    }
}
