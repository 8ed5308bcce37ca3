use std::time::Instant;

use load_gauge_core::prelude::ScenarioSeries;

use crate::cpu::CpuTimes;
use crate::monitor::ResourceProbe;
use crate::summary::SampleRow;

/// The start of a timed unit of work: a wall-clock instant and a CPU time reading.
#[derive(Debug, Clone, Copy)]
pub struct Baseline {
    started: Instant,
    cpu: CpuTimes,
}

impl Baseline {
    pub fn capture<P: ResourceProbe + ?Sized>(probe: &mut P) -> anyhow::Result<Self> {
        let started = Instant::now();
        let cpu = probe.cpu_times()?;
        Ok(Self { started, cpu })
    }

    /// Wall-clock seconds since the baseline was captured.
    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn cpu(&self) -> &CpuTimes {
        &self.cpu
    }
}

/// Collects the memory, CPU time and elapsed time series for one scenario.
#[derive(Debug)]
pub struct MetricRecorder {
    series: ScenarioSeries,
}

impl MetricRecorder {
    pub fn new(name: &str, action: &str) -> Self {
        Self {
            series: ScenarioSeries::new(name, action),
        }
    }

    /// Sample the probe and append the readings at `count`.
    ///
    /// Memory is read first, then the elapsed time and CPU time relative to `baseline`.
    pub fn record<P: ResourceProbe + ?Sized>(
        &mut self,
        count: u64,
        probe: &mut P,
        baseline: &Baseline,
    ) -> anyhow::Result<SampleRow> {
        let memory_mb = probe.memory_mb()?;
        let elapsed_secs = baseline.elapsed_secs();
        let cpu_secs = probe.cpu_since(baseline.cpu())?;

        self.series
            .record(count, memory_mb, cpu_secs, elapsed_secs)?;

        Ok(SampleRow {
            count,
            memory_mb,
            cpu_secs,
            elapsed_secs,
        })
    }

    pub fn series(&self) -> &ScenarioSeries {
        &self.series
    }

    pub fn finish(self) -> ScenarioSeries {
        self.series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use load_gauge_core::prelude::Metric;

    /// Memory grows by 1MB and each CPU reading by 0.1s user and 0.05s system.
    #[derive(Default)]
    struct SteppingProbe {
        memory: f64,
        cpu: CpuTimes,
    }

    impl ResourceProbe for SteppingProbe {
        fn memory_mb(&mut self) -> anyhow::Result<f64> {
            self.memory += 1.0;
            Ok(self.memory)
        }

        fn cpu_times(&mut self) -> anyhow::Result<CpuTimes> {
            self.cpu.user += 0.1;
            self.cpu.system += 0.05;
            Ok(self.cpu)
        }
    }

    #[test]
    fn record_measures_cpu_relative_to_baseline() {
        let mut probe = SteppingProbe::default();
        let mut recorder = MetricRecorder::new("change", "Changed");

        let baseline = Baseline::capture(&mut probe).unwrap();
        let first = recorder.record(1_000, &mut probe, &baseline).unwrap();
        let second = recorder.record(2_000, &mut probe, &baseline).unwrap();

        assert_eq!(first.memory_mb, 1.0);
        assert!((first.cpu_secs - 0.15).abs() < 1e-9);
        assert!((second.cpu_secs - 0.30).abs() < 1e-9);
        assert!(second.elapsed_secs >= first.elapsed_secs);

        let series = recorder.finish();
        assert_eq!(series.name(), "change");
        assert_eq!(
            series.series(Metric::Memory).counts().collect::<Vec<_>>(),
            vec![1_000, 2_000]
        );
    }

    #[test]
    fn record_rejects_repeated_count() {
        let mut probe = SteppingProbe::default();
        let mut recorder = MetricRecorder::new("create", "Created");
        let baseline = Baseline::capture(&mut probe).unwrap();

        recorder.record(100, &mut probe, &baseline).unwrap();
        assert!(recorder.record(100, &mut probe, &baseline).is_err());
        assert_eq!(recorder.series().len(), 1);
    }
}
