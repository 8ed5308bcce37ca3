use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner:.green} {prefix} [{wide_bar:.cyan/blue}] {pos}/{len} {msg}";

/// Shows the user how far through a phase of the workload the run is.
///
/// The bar is drawn to stderr and never to the log. Log lines written through
/// [PhaseProgress::log] are printed above the bar without breaking it up.
#[derive(Debug, Clone)]
pub struct PhaseProgress {
    bar: ProgressBar,
}

impl PhaseProgress {
    pub fn new(len: u64, phase: &str) -> Self {
        let bar = ProgressBar::new(len);
        let style = ProgressStyle::with_template(TEMPLATE)
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|e| {
                log::debug!("Falling back to default progress style: {e}");
                ProgressStyle::default_bar()
            });
        bar.set_style(style);
        bar.set_prefix(phase.to_string());

        Self { bar }
    }

    /// A progress tracker that draws nothing, for `--no-progress` and tests.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn inc(&self) {
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    /// Run `f` with the bar cleared, so anything it logs is not drawn over.
    pub fn log<R>(&self, f: impl FnOnce() -> R) -> R {
        self.bar.suspend(f)
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
