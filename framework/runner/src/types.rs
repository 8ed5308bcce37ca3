/// Recommended error type for your scenario `main` function and any shared workload code. This
/// type is compatible with the [crate::definition::WorkloadResult] type so you can use `?` to
/// propagate errors.
pub type GaugeResult<T> = anyhow::Result<T>;
