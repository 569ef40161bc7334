// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for pipeline execution
// reference: uses indicatif for progress bars and tracks step metrics

use crate::models::Step;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub steps_completed: usize,
    pub steps_failed: usize,
    pub bytes_produced: u64,
    pub records_extracted: u64,
    pub artifacts_removed: usize,
    pub duration_secs: f64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records_per_second(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        self.records_extracted as f64 / self.duration_secs
    }

    pub fn bytes_per_second(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_produced as f64 / self.duration_secs
    }
}

/// Step-level progress. The bar is only redrawn on step boundaries so the
/// selector's interactive prompt is never overdrawn while it runs.
pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    steps_completed: Arc<AtomicUsize>,
    steps_failed: Arc<AtomicUsize>,
    bytes_produced: Arc<AtomicU64>,
    records_extracted: Arc<AtomicU64>,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn hidden(total_steps: usize) -> Self {
        Self::with_options(total_steps, false, false)
    }

    pub fn with_options(total_steps: usize, visible: bool, colored: bool) -> Self {
        let multi_progress = if visible {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };

        let main_bar = create_progress_bar(&multi_progress, total_steps as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            steps_completed: Arc::new(AtomicUsize::new(0)),
            steps_failed: Arc::new(AtomicUsize::new(0)),
            bytes_produced: Arc::new(AtomicU64::new(0)),
            records_extracted: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn start_step(&self, step: Step) {
        self.main_bar
            .set_message(format!("[{}] {}", step, step.description()));
    }

    pub fn complete_step(&self, step: Step) {
        self.steps_completed.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.detail_bar.set_message(format!("{} done", step));
    }

    pub fn fail_step(&self, step: Step) {
        self.steps_failed.fetch_add(1, Ordering::SeqCst);
        self.detail_bar
            .set_message(format!("{} {}", step, "failed".red()));
    }

    pub fn add_bytes_produced(&self, bytes: u64) {
        self.bytes_produced.fetch_add(bytes, Ordering::SeqCst);
    }

    pub fn add_records(&self, records: u64) {
        self.records_extracted.fetch_add(records, Ordering::SeqCst);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Pipeline complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn abandon(&self) {
        self.main_bar.abandon();
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            steps_completed: self.steps_completed.load(Ordering::SeqCst),
            steps_failed: self.steps_failed.load(Ordering::SeqCst),
            bytes_produced: self.bytes_produced.load(Ordering::SeqCst),
            records_extracted: self.records_extracted.load(Ordering::SeqCst),
            artifacts_removed: 0,
            duration_secs: self.start_time.elapsed().as_secs_f64(),
        }
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        if !self.main_bar.is_finished() {
            self.abandon();
        }
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let (template, chars) = if colored {
        (
            "{spinner:.green} [{elapsed_precise}] [{bar:20.cyan/blue}] {pos}/{len} {msg}",
            "█▓▒░",
        )
    } else {
        ("{spinner} [{elapsed_precise}] [{bar:20}] {pos}/{len} {msg}", "=>-")
    };

    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        bar.set_style(style.progress_chars(chars));
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}
