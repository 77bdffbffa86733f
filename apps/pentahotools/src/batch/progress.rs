//! Progress reporting for batch operations using indicatif

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar over the rows of a batch
pub struct BatchProgress {
    bar: ProgressBar,
    /// Shown in front of every message during the validation pass
    validating: bool,
}

impl BatchProgress {
    pub fn new(total: u64, validating: bool, hidden: bool) -> Self {
        if hidden {
            return Self {
                bar: ProgressBar::hidden(),
                validating,
            };
        }

        let bar = ProgressBar::new(total);
        let template = if validating {
            "{spinner:.yellow} {msg} [{bar:40.yellow/blue}] {pos}/{len}"
        } else {
            "{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}"
        };
        let style = ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar, validating }
    }

    /// Show the item being processed, e.g. `User: bob`
    pub fn set_message(&self, msg: &str) {
        let text = if self.validating {
            format!("(validate) {}", msg)
        } else {
            msg.to_string()
        };
        self.bar.set_message(text);
    }

    pub fn inc(&self) {
        self.bar.inc(1);
    }

    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}
