#[cfg(feature = "clipboard-support")]
use clipboard::{ClipboardContext, ClipboardProvider};
use crossterm::{
    ExecutableCommand,
    style::{Color, ResetColor, SetForegroundColor},
};
use log::{debug, info};
#[cfg(feature = "clipboard-support")]
use log::warn;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

const PREVIEW_LENGTH: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    File,
    Console,
    Clipboard,
}

/// Destination for the finished bundle. Written once per invocation.
pub trait OutputWriter {
    fn kind(&self) -> SinkKind;

    fn write(&self, content: &str) -> anyhow::Result<()>;
}

pub struct FileWriter {
    path: String,
}

impl FileWriter {
    pub fn new(path: String) -> Self {
        Self { path }
    }
}

impl OutputWriter for FileWriter {
    fn kind(&self) -> SinkKind {
        SinkKind::File
    }

    fn write(&self, content: &str) -> anyhow::Result<()> {
        debug!("Writing output to file: {}", self.path);
        fs::write(Path::new(&self.path), content)?;
        info!("Output written to file: {}", self.path);
        Ok(())
    }
}

pub struct ConsoleWriter;

impl OutputWriter for ConsoleWriter {
    fn kind(&self) -> SinkKind {
        SinkKind::Console
    }

    fn write(&self, content: &str) -> anyhow::Result<()> {
        debug!("Writing output to console");
        let mut stdout = io::stdout();
        stdout.write_all(content.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(feature = "clipboard-support")]
pub struct ClipboardWriter;

#[cfg(feature = "clipboard-support")]
impl OutputWriter for ClipboardWriter {
    fn kind(&self) -> SinkKind {
        SinkKind::Clipboard
    }

    fn write(&self, content: &str) -> anyhow::Result<()> {
        debug!("Writing output to clipboard");

        let mut ctx: ClipboardContext = match ClipboardProvider::new() {
            Ok(ctx) => ctx,
            Err(e) => {
                warn!("Failed to access clipboard: {}", e);
                return Err(anyhow::anyhow!("Failed to access clipboard: {}", e));
            }
        };

        match ctx.set_contents(content.to_owned()) {
            Ok(_) => {
                info!("Output copied to clipboard (size: {} bytes)", content.len());
                Ok(())
            }
            Err(e) => {
                warn!("Failed to copy to clipboard: {}", e);
                Err(anyhow::anyhow!("Failed to copy to clipboard: {}", e))
            }
        }
    }
}

#[cfg(feature = "clipboard-support")]
fn default_writer() -> Box<dyn OutputWriter> {
    Box::new(ClipboardWriter)
}

#[cfg(not(feature = "clipboard-support"))]
fn default_writer() -> Box<dyn OutputWriter> {
    debug!("Built without clipboard support, writing to console");
    Box::new(ConsoleWriter)
}

/// File when a path is given, stdout when asked, otherwise the clipboard.
pub fn create_writer(output_path: &Option<String>, to_stdout: bool) -> Box<dyn OutputWriter> {
    if let Some(path) = output_path {
        return Box::new(FileWriter::new(path.clone()));
    }
    if to_stdout {
        return Box::new(ConsoleWriter);
    }
    default_writer()
}

pub fn preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_LENGTH {
        let safe_substring: String = content.chars().take(PREVIEW_LENGTH).collect();
        format!("{}...", safe_substring)
    } else {
        content.to_string()
    }
}

/// Writes the bundle, then tells the user what happened. A failed write is
/// returned as is and nothing is reported as copied.
pub fn write_output(writer: &dyn OutputWriter, content: &str, summary: &str) -> anyhow::Result<()> {
    writer.write(content)?;

    match writer.kind() {
        SinkKind::Console => {
            info!("{}", summary);
        }
        SinkKind::File => {
            let mut stdout = io::stdout();
            stdout.execute(SetForegroundColor(Color::Green))?;
            writeln!(stdout, "{}", summary)?;
            stdout.execute(ResetColor)?;
        }
        SinkKind::Clipboard => {
            let mut stdout = io::stdout();
            stdout.execute(SetForegroundColor(Color::Green))?;
            writeln!(stdout, "\n📋 {}", summary)?;
            stdout.execute(ResetColor)?;

            writeln!(stdout, "\nPreview of copied content:\n")?;
            writeln!(stdout, "{}", preview(content))?;
        }
    }

    Ok(())
}
