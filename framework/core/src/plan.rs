/// How many iterations a workload runs and how often it samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    total: u64,
    batch_size: u64,
}

#[derive(derive_more::Error, derive_more::Display, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[display("batch size must be at least 1")]
    ZeroBatchSize,
    #[display("total must be at least 1")]
    ZeroTotal,
}

impl BatchPlan {
    pub fn new(total: u64, batch_size: u64) -> Result<Self, PlanError> {
        if batch_size == 0 {
            return Err(PlanError::ZeroBatchSize);
        }
        if total == 0 {
            return Err(PlanError::ZeroTotal);
        }

        Ok(Self { total, batch_size })
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// Whether iteration `i` (1-based) ends a batch and should be sampled.
    pub fn is_sample_point(&self, i: u64) -> bool {
        i % self.batch_size == 0
    }

    /// Every count that will be sampled if the workload runs to completion.
    pub fn sample_points(&self) -> impl Iterator<Item = u64> {
        let batch_size = self.batch_size;
        (1..=self.expected_samples()).map(move |n| n * batch_size)
    }

    pub fn expected_samples(&self) -> u64 {
        self.total / self.batch_size
    }
}
