//! Progress reporting for deliberations

use colored::Colorize;
use council_application::ports::progress::ProgressNotifier;
use council_domain::{DeliberationStage, Opinion, TaskId};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports dispatch progress with an indicatif progress bar
pub struct ProgressReporter {
    dispatch_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            dispatch_bar: Mutex::new(None),
        }
    }

    fn dispatch_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn opinion_status(opinion: &Opinion) -> String {
        match opinion.vote() {
            Some(decision) => format!("{} {} {}", "v".green(), opinion.specialist_id, decision),
            None => format!(
                "{} {} {}",
                "x".red(),
                opinion.specialist_id,
                opinion.status.as_str().to_lowercase()
            ),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_dispatch_start(&self, total_specialists: usize) {
        let pb = ProgressBar::new(total_specialists as u64);
        pb.set_style(Self::dispatch_style());
        pb.set_prefix("Deliberating");
        pb.set_message("Consulting specialists...");

        if let Ok(mut guard) = self.dispatch_bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_specialist_complete(&self, opinion: &Opinion) {
        if let Ok(guard) = self.dispatch_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            pb.set_message(Self::opinion_status(opinion));
            pb.inc(1);
        }
    }

    fn on_dispatch_complete(&self) {
        if let Ok(mut guard) = self.dispatch_bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_with_message(format!("{}", "All specialists resolved".green()));
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_stage(&self, task_id: &TaskId, stage: DeliberationStage) {
        eprintln!("{} {} {}", "->".cyan(), stage.display_name().bold(), task_id);
    }

    fn on_dispatch_start(&self, total_specialists: usize) {
        eprintln!("   consulting {} specialists", total_specialists);
    }

    fn on_specialist_complete(&self, opinion: &Opinion) {
        eprintln!("  {}", ProgressReporter::opinion_status(opinion));
    }

    fn on_dispatch_complete(&self) {
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::Decision;

    #[test]
    fn test_opinion_status_labels() {
        colored::control::set_override(false);

        let vote = Opinion::succeeded("cultural", Decision::Remove, 0.8, "r");
        assert_eq!(ProgressReporter::opinion_status(&vote), "v cultural REMOVE");

        let missing = Opinion::timed_out("utilitarian", "slow");
        assert_eq!(
            ProgressReporter::opinion_status(&missing),
            "x utilitarian timed_out"
        );
    }

    #[test]
    fn test_reporter_tracks_dispatch_bar() {
        let reporter = ProgressReporter::new();
        reporter.on_dispatch_start(2);
        reporter.on_specialist_complete(&Opinion::failed("a", "down"));
        assert_eq!(
            reporter
                .dispatch_bar
                .lock()
                .unwrap()
                .as_ref()
                .map(|pb| pb.position()),
            Some(1)
        );
        reporter.on_dispatch_complete();
        assert!(reporter.dispatch_bar.lock().unwrap().is_none());
    }
}
