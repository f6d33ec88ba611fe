use crate::domain::models::TextDocument;
use log::debug;

/// Turns a line of a document into a comment in the document's language.
/// Either the line is rewritten or the document is left untouched.
pub trait CommentSynthesizer {
    fn comment_line(&self, document: &mut TextDocument, line: usize) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentStyle {
    Line(&'static str),
    Block(&'static str, &'static str),
}

fn style_for(language: &str) -> Option<CommentStyle> {
    let style = match language {
        "rs" | "c" | "h" | "cc" | "cpp" | "hpp" | "cs" | "go" | "java" | "kt" | "kts"
        | "scala" | "swift" | "dart" | "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" | "php"
        | "proto" | "zig" | "groovy" | "gradle" | "jsonc" => CommentStyle::Line("//"),
        "py" | "sh" | "bash" | "zsh" | "fish" | "rb" | "pl" | "r" | "toml" | "yml" | "yaml"
        | "ini" | "cfg" | "conf" | "ps1" | "nix" | "ex" | "exs" | "dockerfile" | "mk"
        | "cmake" => CommentStyle::Line("#"),
        "sql" | "lua" | "hs" | "elm" | "ada" => CommentStyle::Line("--"),
        "lisp" | "clj" | "cljs" | "el" | "scm" => CommentStyle::Line(";;"),
        "vim" => CommentStyle::Line("\""),
        "tex" | "erl" => CommentStyle::Line("%"),
        "html" | "htm" | "xml" | "svg" | "md" | "markdown" | "vue" | "svelte" => {
            CommentStyle::Block("<!--", "-->")
        }
        "css" | "scss" | "less" => CommentStyle::Block("/*", "*/"),
        _ => return None,
    };
    Some(style)
}

/// Comment forms keyed by file extension.
pub struct LineCommentSynthesizer;

impl CommentSynthesizer for LineCommentSynthesizer {
    fn comment_line(&self, document: &mut TextDocument, line: usize) -> anyhow::Result<()> {
        let language = document.language_id().unwrap_or_default();
        let style = style_for(&language)
            .ok_or_else(|| anyhow::anyhow!("No comment syntax known for '{}'", language))?;

        let text = document
            .line(line)
            .ok_or_else(|| anyhow::anyhow!("Line {} is out of range", line))?
            .to_string();

        let commented = match style {
            CommentStyle::Line(prefix) => format!("{} {}", prefix, text),
            CommentStyle::Block(open, close) => format!("{} {} {}", open, text, close),
        };
        debug!("Commenting line {} as: {}", line, commented);

        document.replace_line(line, &commented);
        Ok(())
    }
}
