//! Padding progress bar driven by the engine's progress events.

use indicatif::{ProgressBar, ProgressStyle};
use padzip_core::{GrowProgress, GrowProgressSink};

pub struct PaddingProgress {
    bar: ProgressBar,
}

impl PaddingProgress {
    pub fn new(total_bytes: u64, label: &str) -> Self {
        let bar = ProgressBar::new(total_bytes);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{msg}\n[{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})",
        ) {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(format!("Padding: {label}"));
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

impl GrowProgressSink for PaddingProgress {
    fn on_progress(&mut self, progress: GrowProgress) {
        self.bar.set_position(progress.bytes_written);
    }
}
