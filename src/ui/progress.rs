use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

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

    /// Bar over the text blocks sent to one model call.
    pub fn create_block_progress(&self, total_blocks: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_blocks));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>5}/{len:5} blocks {msg}"
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new_spinner());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        pb.set_message(message.to_string());
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
            self.multi_progress.clear().ok();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// A spinner or bar for one pipeline step, finished with its elapsed time.
pub struct OperationProgress {
    progress_bar: ProgressBar,
    operation_name: String,
    start_time: Instant,
}

impl OperationProgress {
    pub fn new(progress_manager: &ProgressManager, operation_name: &str, total_blocks: u64) -> Self {
        let progress_bar = if total_blocks == 0 {
            progress_manager.create_spinner(operation_name)
        } else {
            let pb = progress_manager.create_block_progress(total_blocks);
            pb.set_message(operation_name.to_string());
            pb
        };

        Self {
            progress_bar,
            operation_name: operation_name.to_string(),
            start_time: Instant::now(),
        }
    }

    pub fn set_position(&self, position: u64) {
        self.progress_bar.set_position(position);
    }

    pub fn set_message(&self, message: &str) {
        self.progress_bar.set_message(message.to_string());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn finish_with_message(&self, message: &str) {
        if let Some(total) = self.progress_bar.length() {
            self.progress_bar.set_position(total);
        }
        let final_message = format!(
            "{}: {} ({})",
            self.operation_name,
            message,
            format_duration(self.elapsed())
        );
        self.progress_bar.finish_with_message(final_message);
    }

    pub fn finish_success(&self) {
        self.finish_with_message("done");
    }

    pub fn abandon_with_message(&self, message: &str) {
        self.progress_bar
            .abandon_with_message(format!("{}: {}", self.operation_name, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_manager_creation() {
        let manager = ProgressManager::new(true);
        assert!(manager.is_enabled());

        let disabled_manager = ProgressManager::new(false);
        assert!(!disabled_manager.is_enabled());
    }

    #[test]
    fn test_progress_bar_creation() {
        let manager = ProgressManager::new(true);

        let block_pb = manager.create_block_progress(12);
        let spinner = manager.create_spinner("Summarizing");

        assert_eq!(block_pb.length(), Some(12));
        assert_eq!(spinner.message(), "Summarizing");
    }

    #[test]
    fn test_disabled_progress_bars() {
        let manager = ProgressManager::new(false);

        assert!(manager.create_block_progress(100).is_hidden());
        assert!(manager.create_spinner("test").is_hidden());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }

    #[test]
    fn test_operation_progress() {
        let manager = ProgressManager::new(false);
        let op_progress = OperationProgress::new(&manager, "Classifying sentiment", 4);

        op_progress.set_position(2);
        op_progress.set_message("halfway");
        op_progress.finish_success();

        let spinner_op = OperationProgress::new(&manager, "Extracting text", 0);
        spinner_op.abandon_with_message("failed");
    }
}
