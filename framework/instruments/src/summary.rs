use std::fmt::{Display, Formatter};

use load_gauge_core::prelude::{Metric, ScenarioSeries};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// The three readings taken at one sample point.
#[derive(Tabled, Debug, Clone, PartialEq)]
pub struct SampleRow {
    #[tabled(rename = "todos")]
    pub count: u64,
    #[tabled(rename = "memory (MB)", display = "float2")]
    pub memory_mb: f64,
    #[tabled(rename = "cpu time (s)", display = "float3")]
    pub cpu_secs: f64,
    #[tabled(rename = "elapsed (s)", display = "float3")]
    pub elapsed_secs: f64,
}

impl Display for SampleRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "memory {:.2} MB, CPU time {:.3} s, elapsed {:.3} s",
            self.memory_mb, self.cpu_secs, self.elapsed_secs
        )
    }
}

fn float2(n: &f64) -> String {
    format!("{:.2}", n)
}

fn float3(n: &f64) -> String {
    format!("{:.3}", n)
}

/// One row per sample point of the scenario.
pub fn summary_rows(series: &ScenarioSeries) -> Vec<SampleRow> {
    let memory = series.series(Metric::Memory).samples();
    let cpu = series.series(Metric::CpuTime).samples();
    let elapsed = series.series(Metric::Elapsed).samples();

    memory
        .iter()
        .zip(cpu)
        .zip(elapsed)
        .map(|((memory, cpu), elapsed)| SampleRow {
            count: memory.count,
            memory_mb: memory.value,
            cpu_secs: cpu.value,
            elapsed_secs: elapsed.value,
        })
        .collect()
}

pub fn summary_table(series: &ScenarioSeries) -> String {
    let mut table = Table::new(summary_rows(series));
    table.with(Style::modern());
    table.to_string()
}

/// Print every sample of the scenario as a table.
pub fn print_summary(series: &ScenarioSeries) {
    println!(
        "\nSummary of todos {} ({} samples)",
        series.action().to_lowercase(),
        series.len()
    );
    println!("{}", summary_table(series));
}
