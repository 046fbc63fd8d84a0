//! Progress bar display for registry fetches

use indicatif::{ProgressBar, ProgressStyle};

/// Progress over a known number of files
pub struct FetchProgress {
    pb: ProgressBar,
}

impl FetchProgress {
    /// Create a bar for `total` files; draws nothing when stderr isn't a terminal
    pub fn new(total: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("  [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let pb = ProgressBar::new(total);
        pb.set_style(style);
        Self { pb }
    }

    /// A bar that never draws, for non-interactive runs
    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }

    /// Mark one file as fetched
    pub fn file_done(&self, path: &str) {
        // Truncate long paths for display
        let display_path = if path.chars().count() > 50 {
            let tail: String = path
                .chars()
                .rev()
                .take(47)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("...{tail}")
        } else {
            path.to_string()
        };
        self.pb.set_message(display_path);
        self.pb.inc(1);
    }

    #[allow(dead_code)] // used in tests
    pub fn position(&self) -> u64 {
        self.pb.position()
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }

    /// Leave the bar where it stopped on error
    pub fn abandon(&self) {
        self.pb.abandon();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_files() {
        let progress = FetchProgress::hidden();
        progress.file_done("components/ui/button.tsx");
        progress.file_done(&"x/".repeat(40));
        assert_eq!(progress.position(), 2);
        progress.finish();
    }
}
