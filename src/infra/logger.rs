use env_logger::{Builder, Target};
use log::Level;
use std::io::Write;

/// Overrides the level picked from `-v`, using `env_logger` filter syntax
/// (e.g. `prompt_context=debug`).
pub const LOG_LEVEL_ENV: &str = "PROMPT_CONTEXT_LOG_LEVEL";

/// Quiet by default. Each `-v` raises the level one step, capped at debug.
fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    }
}

/// ANSI foreground code for a level tag.
fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => "31",
        Level::Warn => "33",
        Level::Info => "32",
        Level::Debug => "36",
        Level::Trace => "35",
    }
}

/// Installs the stderr logger with colored level tags and second-precision
/// timestamps.
///
/// Fails only when a logger is already installed.
pub fn setup_logger(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let env = env_logger::Env::default().filter_or(LOG_LEVEL_ENV, level_for(verbosity));

    Builder::from_env(env)
        // stdout carries the bundle under --stdout.
        .target(Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "\x1B[{}m[{}]\x1B[0m [{}] {}",
                level_color(record.level()),
                record.level(),
                buf.timestamp(),
                record.args()
            )
        })
        .format_timestamp_secs()
        .try_init()
}
