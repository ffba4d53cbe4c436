use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    /// Archive-level bar shared by generation and extraction: one tick per
    /// archive completed.
    pub fn create_archive_progress(&self, total_archives: u64, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_archives));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>4}/{len:4} archives {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if self.enabled {
            self.multi_progress.suspend(f)
        } else {
            f()
        }
    }

    pub fn clear(&self) {
        if self.enabled {
            let _ = self.multi_progress.clear();
        }
    }
}

pub fn finish_progress(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(message.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_manager_returns_hidden_bars() {
        let manager = ProgressManager::new(false);
        let pb = manager.create_archive_progress(10, "working");
        assert!(pb.is_hidden());
    }

    #[test]
    fn test_suspend_runs_closure() {
        let manager = ProgressManager::new(false);
        let value = manager.suspend(|| 41 + 1);
        assert_eq!(value, 42);
    }
}
