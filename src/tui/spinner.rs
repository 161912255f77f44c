//! Loading spinner for the terminal preview

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while the widget mounts
pub struct LoadingSpinner {
    bar: ProgressBar,
    active: bool,
}

impl LoadingSpinner {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("  {spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["◐", "◓", "◑", "◒", "●"]);
        bar.set_style(style);
        Self { bar, active: false }
    }

    /// Spinner that never draws
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            active: false,
        }
    }

    pub fn start(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
        self.bar.enable_steady_tick(Duration::from_millis(100));
        self.active = true;
    }

    pub fn stop(&mut self) {
        if self.active {
            self.bar.finish_and_clear();
            self.active = false;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for LoadingSpinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LoadingSpinner {
    fn drop(&mut self) {
        self.stop();
    }
}
