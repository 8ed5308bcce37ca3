mod cpu;
mod monitor;
mod recorder;
mod summary;

#[cfg(feature = "test_utils")]
pub mod fake;

pub use cpu::CpuTimes;
pub use monitor::{ProcessMonitor, ResourceProbe};
pub use recorder::{Baseline, MetricRecorder};
pub use summary::{print_summary, summary_rows, summary_table, SampleRow};
