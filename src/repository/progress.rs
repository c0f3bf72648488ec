//! Progress reporting for the per-reference crawl loop
//!
//! Keeps indicatif out of the crawler itself.

use indicatif::{ProgressBar, ProgressStyle};

/// A handle to an active progress bar
pub trait ProgressHandle: Send + Sync {
    fn inc(&self, n: u64);
    /// Name of the item currently being processed
    fn set_message(&self, msg: &str);
    fn finish(&self);
}

/// Factory for creating progress handles
pub trait ProgressReporter: Send + Sync {
    fn start(&self, label: &str, total: u64) -> Box<dyn ProgressHandle>;
}

impl ProgressHandle for ProgressBar {
    fn inc(&self, n: u64) {
        ProgressBar::inc(self, n);
    }

    fn set_message(&self, msg: &str) {
        ProgressBar::set_message(self, msg.to_string());
    }

    fn finish(&self) {
        self.finish_and_clear();
    }
}

/// Terminal progress bars for the CLI
pub struct BarProgress;

impl ProgressReporter for BarProgress {
    fn start(&self, label: &str, total: u64) -> Box<dyn ProgressHandle> {
        let style = ProgressStyle::default_bar()
            .template(&format!("{{spinner:.green}} {label} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {{msg}}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        Box::new(ProgressBar::new(total).with_style(style))
    }
}

/// Reports nothing; used by tests and `--quiet`
pub struct NoopProgress;

impl ProgressHandle for NoopProgress {
    fn inc(&self, _n: u64) {}
    fn set_message(&self, _msg: &str) {}
    fn finish(&self) {}
}

impl ProgressReporter for NoopProgress {
    fn start(&self, _label: &str, _total: u64) -> Box<dyn ProgressHandle> {
        Box::new(NoopProgress)
    }
}
