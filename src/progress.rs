//! Terminal progress for apply and refresh runs

use declarative::{Action, ApplyResult, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

/// Progress bar driven by the executor
pub struct BarProgress {
    label: &'static str,
    quiet: bool,
    bar: Option<ProgressBar>,
}

impl BarProgress {
    pub fn new(label: &'static str, quiet: bool) -> Self {
        Self {
            label,
            quiet,
            bar: None,
        }
    }
}

/// Status symbol shown next to each finished instance
pub fn result_symbol(result: &ApplyResult) -> &'static str {
    match result {
        ApplyResult::NoChange => "○",
        ApplyResult::Created | ApplyResult::Modified | ApplyResult::Removed => "✓",
        ApplyResult::Failed { .. } => "✗",
        ApplyResult::Skipped { .. } => "⊘",
    }
}

impl ProgressCallback for BarProgress {
    fn on_batch_start(&mut self, count: usize) {
        let bar = if self.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(count as u64)
        };
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        bar.set_message(self.label);
        self.bar = Some(bar);
    }

    fn on_resource_start(&mut self, address: &str, action: Action) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{} {}", action, address));
        }
    }

    fn on_resource_complete(&mut self, address: &str, result: &ApplyResult) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{} {}", result_symbol(result), address));
            bar.inc(1);
        }
    }

    fn on_batch_complete(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_symbols() {
        assert_eq!(result_symbol(&ApplyResult::Created), "✓");
        assert_eq!(result_symbol(&ApplyResult::NoChange), "○");
        assert_eq!(
            result_symbol(&ApplyResult::Failed {
                error: "boom".to_string()
            }),
            "✗"
        );
    }

    #[test]
    fn test_quiet_progress_counts() {
        let mut progress = BarProgress::new("Applying", true);
        progress.on_batch_start(2);
        progress.on_resource_complete("hashicups_order.a", &ApplyResult::Created);
        assert_eq!(progress.bar.as_ref().map(ProgressBar::position), Some(1));
        progress.on_batch_complete();
        assert!(progress.bar.is_none());
    }
}
