use indicatif::{ProgressBar, ProgressStyle};

/// Observer for a single transfer.
pub trait Progress {
    /// Called once before the first chunk. `None` when the size is unknown.
    fn start(&mut self, total: Option<u64>);
    fn advance(&mut self, bytes: u64);
    fn finish(&mut self);
}

/// Discards all updates.
#[derive(Debug, Default)]
pub struct Silent;

impl Progress for Silent {
    fn start(&mut self, _total: Option<u64>) {}
    fn advance(&mut self, _bytes: u64) {}
    fn finish(&mut self) {}
}

const BAR_TEMPLATE: &str =
    "{spinner:.blue} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const SPINNER_TEMPLATE: &str = "{spinner:.blue} [{elapsed_precise}] {bytes} ({bytes_per_sec})";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const BAR_CHARS: &str = "█▓▒░  ";

/// Terminal progress bar. Scaled when the total is known, a byte counter otherwise.
#[derive(Default)]
pub struct TerminalProgress {
    bar: Option<ProgressBar>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn style(total: Option<u64>) -> ProgressStyle {
        let template = if total.is_some() {
            BAR_TEMPLATE
        } else {
            SPINNER_TEMPLATE
        };

        match ProgressStyle::with_template(template) {
            Ok(style) => style.tick_chars(TICK).progress_chars(BAR_CHARS),
            Err(e) => {
                log::warn!("Invalid progress template, using default: {}", e);
                ProgressStyle::default_bar()
            }
        }
    }
}

impl Progress for TerminalProgress {
    fn start(&mut self, total: Option<u64>) {
        let bar = match total {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::no_length(),
        };
        bar.set_style(Self::style(total));
        self.bar = Some(bar);
    }

    fn advance(&mut self, bytes: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(bytes);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_progress_tracks_position() {
        let mut progress = TerminalProgress::new();
        progress.start(Some(10));
        progress.advance(4);
        progress.advance(3);

        let position = progress.bar.as_ref().map(|bar| bar.position());
        assert_eq!(position, Some(7));

        progress.finish();
        assert!(progress.bar.is_none());
    }

    #[test]
    fn unknown_total_has_no_length() {
        let mut progress = TerminalProgress::new();
        progress.start(None);
        assert_eq!(progress.bar.as_ref().and_then(|bar| bar.length()), None);
        progress.finish();
    }

    #[test]
    fn advance_before_start_is_ignored() {
        let mut progress = TerminalProgress::new();
        progress.advance(5);
        progress.finish();
        assert!(progress.bar.is_none());
    }
}
