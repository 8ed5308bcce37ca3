/// The three process metrics sampled during a scenario.
#[derive(derive_more::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    #[display("memory")]
    Memory,
    #[display("cpu time")]
    CpuTime,
    #[display("elapsed time")]
    Elapsed,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Memory, Metric::CpuTime, Metric::Elapsed];
}

/// One measurement, taken after `count` iterations of a workload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub count: u64,
    pub value: f64,
}

#[derive(derive_more::Error, derive_more::Display, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[display("{metric} sample count must be at least 1")]
    ZeroCount { metric: Metric },
    #[display("{metric} sample count {count} does not follow {last}")]
    NotIncreasing { metric: Metric, count: u64, last: u64 },
}

/// Append-only samples for one metric. Counts are strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    metric: Metric,
    samples: Vec<Sample>,
}

impl TimeSeries {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            samples: Vec::new(),
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn push(&mut self, count: u64, value: f64) -> Result<(), SeriesError> {
        if count == 0 {
            return Err(SeriesError::ZeroCount {
                metric: self.metric,
            });
        }
        if let Some(last) = self.samples.last() {
            if count <= last.count {
                return Err(SeriesError::NotIncreasing {
                    metric: self.metric,
                    count,
                    last: last.count,
                });
            }
        }

        self.samples.push(Sample { count, value });
        Ok(())
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn counts(&self) -> impl Iterator<Item = u64> + '_ {
        self.samples.iter().map(|s| s.count)
    }

    /// The smallest and largest value, or [None] for an empty series.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.samples.iter().fold(None, |acc, s| match acc {
            None => Some((s.value, s.value)),
            Some((lo, hi)) => Some((lo.min(s.value), hi.max(s.value))),
        })
    }
}

/// The memory, CPU time and elapsed time series collected by one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSeries {
    /// Short name of the scenario, such as `change` or `delete`.
    name: String,
    /// What happens to the todos in this scenario, used on charts as in "Todos Deleted".
    action: String,
    memory: TimeSeries,
    cpu_time: TimeSeries,
    elapsed: TimeSeries,
}

impl ScenarioSeries {
    pub fn new(name: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: action.into(),
            memory: TimeSeries::new(Metric::Memory),
            cpu_time: TimeSeries::new(Metric::CpuTime),
            elapsed: TimeSeries::new(Metric::Elapsed),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// Append one value per metric at the same count.
    ///
    /// The count is checked before anything is appended so the three series never go out of step.
    pub fn record(
        &mut self,
        count: u64,
        memory_mb: f64,
        cpu_secs: f64,
        elapsed_secs: f64,
    ) -> Result<(), SeriesError> {
        if count == 0 {
            return Err(SeriesError::ZeroCount {
                metric: Metric::Memory,
            });
        }
        if let Some(last) = self.memory.samples().last() {
            if count <= last.count {
                return Err(SeriesError::NotIncreasing {
                    metric: Metric::Memory,
                    count,
                    last: last.count,
                });
            }
        }

        self.memory.push(count, memory_mb)?;
        self.cpu_time.push(count, cpu_secs)?;
        self.elapsed.push(count, elapsed_secs)?;
        Ok(())
    }

    pub fn series(&self, metric: Metric) -> &TimeSeries {
        match metric {
            Metric::Memory => &self.memory,
            Metric::CpuTime => &self.cpu_time,
            Metric::Elapsed => &self.elapsed,
        }
    }

    /// Number of recorded samples, which is the same for every metric.
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }
}
