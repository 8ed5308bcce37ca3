mod bail;
mod plan;
mod series;

pub mod prelude {
    pub use crate::bail::{check_status, Operation, UnexpectedStatus};
    pub use crate::plan::{BatchPlan, PlanError};
    pub use crate::series::{Metric, Sample, ScenarioSeries, SeriesError, TimeSeries};
}
