//! Terminal feedback while the manifest is read and the registry is queried
//!
//! Everything is drawn on stderr, so stdout only ever carries the report.
//! Quiet and JSON runs use a hidden reporter that draws nothing.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;
use std::time::Duration;

const READING_TEMPLATE: &str = "{spinner:.cyan} Reading {msg}";
const LOOKUP_TEMPLATE: &str = "{spinner:.cyan} Looking up @types packages {pos}/{len} {wide_msg:.dim}";

/// Progress of the read-then-look-up phase of a run
pub struct LookupProgress {
    visible: bool,
    bar: Option<ProgressBar>,
}

impl LookupProgress {
    pub fn new(visible: bool) -> Self {
        Self { visible, bar: None }
    }

    /// Reporter that never draws
    pub fn hidden() -> Self {
        Self::new(false)
    }

    /// Spinner shown while the project's package.json and node_modules are read
    pub fn reading_manifest(&mut self, root: &Path) {
        self.finish();
        if !self.visible {
            return;
        }

        let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template(READING_TEMPLATE)
                .expect("Invalid template"),
        );
        spinner.set_message(root.join("package.json").display().to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(spinner);
    }

    /// Counter over `total` registry lookups; nothing is drawn when there are none
    pub fn lookups(&mut self, total: usize) {
        self.finish();
        if !self.visible || total == 0 {
            return;
        }

        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::default_spinner()
                .template(LOOKUP_TEMPLATE)
                .expect("Invalid template"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
    }

    /// Records one completed lookup and shows its package name
    pub fn looked_up(&self, package: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(package.to_string());
            bar.inc(1);
        }
    }

    /// Clears whatever is on screen
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
