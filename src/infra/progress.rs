use crossterm::{
    ExecutableCommand,
    terminal::{Clear, ClearType},
};
use log::debug;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Progress and cooperative cancellation channel polled by the builder loops.
pub trait ProgressSink {
    fn report(&mut self, message: &str);

    fn is_cancelled(&self) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Spinner line on stderr, redrawn at most every 250ms.
pub struct TerminalProgress {
    token: CancellationToken,
    start_time: Instant,
    update_interval: Duration,
    last_update: Instant,
    reported: usize,
}

impl TerminalProgress {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            start_time: Instant::now(),
            update_interval: Duration::from_millis(250),
            last_update: Instant::now(),
            reported: 0,
        }
    }

    fn draw(&self, message: &str) -> io::Result<()> {
        let spinner_chars = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
        let spinner_idx =
            ((self.start_time.elapsed().as_millis() / 100) % spinner_chars.len() as u128) as usize;

        let mut stderr = io::stderr();
        stderr.execute(Clear(ClearType::CurrentLine))?;
        write!(
            stderr,
            "\r{} Building prompt context: {}",
            spinner_chars[spinner_idx], message
        )?;
        stderr.flush()
    }

    pub fn finish(&self) -> io::Result<()> {
        let mut stderr = io::stderr();
        stderr.execute(Clear(ClearType::CurrentLine))?;
        write!(stderr, "\r")?;
        stderr.flush()?;
        debug!(
            "Progress finished after {} updates in {:.1}s",
            self.reported,
            self.start_time.elapsed().as_secs_f32()
        );
        Ok(())
    }
}

impl ProgressSink for TerminalProgress {
    fn report(&mut self, message: &str) {
        self.reported += 1;
        debug!("{}", message);

        let now = Instant::now();
        if now.duration_since(self.last_update) >= self.update_interval {
            self.last_update = now;
            // Draw errors are ignored.
            let _ = self.draw(message);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    /// Records messages and cancels itself after a fixed number of polls.
    pub struct RecordingProgress {
        pub messages: Vec<String>,
        cancel_after: Option<usize>,
        polls: std::cell::Cell<usize>,
    }

    impl RecordingProgress {
        pub fn new() -> Self {
            Self {
                messages: Vec::new(),
                cancel_after: None,
                polls: std::cell::Cell::new(0),
            }
        }

        pub fn cancelling_after(polls: usize) -> Self {
            Self {
                cancel_after: Some(polls),
                ..Self::new()
            }
        }
    }

    impl ProgressSink for RecordingProgress {
        fn report(&mut self, message: &str) {
            self.messages.push(message.to_string());
        }

        fn is_cancelled(&self) -> bool {
            let polls = self.polls.get();
            self.polls.set(polls + 1);
            matches!(self.cancel_after, Some(limit) if polls >= limit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_token_is_shared() {
        let token = CancellationToken::new();
        let progress = TerminalProgress::new(token.clone());

        assert!(!progress.is_cancelled());
        token.cancel();
        assert!(progress.is_cancelled());
    }

    #[test]
    fn test_recording_progress_cancels_after_limit() {
        let progress = recording::RecordingProgress::cancelling_after(2);
        assert!(!progress.is_cancelled());
        assert!(!progress.is_cancelled());
        assert!(progress.is_cancelled());
    }
}
