use anyhow::Context;
use load_gauge_runner::prelude::*;

const TOTAL: u64 = 10_000;
const BATCH_SIZE: u64 = 100;

fn workload(ctx: &mut RunContext) -> WorkloadResult {
    let plan = ctx.plan(TOTAL, BATCH_SIZE)?;

    let progress = ctx.progress(plan.total(), "create");
    let (client, monitor) = ctx.split();
    let created = create_todos(client, monitor, &plan, &progress)?;
    progress.finish();

    let progress = ctx.progress(plan.total(), "delete");
    let (client, monitor) = ctx.split();
    let deleted = delete_todos(client, monitor, &plan, &progress)?;
    progress.finish();

    Ok(vec![
        ChartRequest::new(created, "create_performance.png")
            .cumulative()
            .with_cpu_colour(RED),
        ChartRequest::new(deleted, "delete_performance.png")
            .cumulative()
            .with_cpu_colour(RED),
    ])
}

/// Create todos one at a time, recording the totals since the first create at each sample point.
fn create_todos<A: TodoApi, P: ResourceProbe>(
    api: &mut A,
    probe: &mut P,
    plan: &BatchPlan,
    progress: &PhaseProgress,
) -> GaugeResult<ScenarioSeries> {
    let todo = Todo::filler_with(FILLER_FIELD_LEN, 'a', 'b');
    let mut recorder = MetricRecorder::new("create", "Created");

    let baseline = Baseline::capture(probe)?;
    for i in 1..=plan.total() {
        let status = api
            .create(&todo)
            .with_context(|| format!("Failed to create todo {i}"))?;
        progress.inc();
        if let Err(e) = check_status(Operation::Create, i, status) {
            progress.log(|| log::error!("{e}"));
            break;
        }

        if plan.is_sample_point(i) {
            let row = recorder.record(i, probe, &baseline)?;
            progress.log(|| log::info!("Created {i} todos: {row}"));
        }
    }

    Ok(recorder.finish())
}

/// Delete todos `1..=total` one at a time, recording the totals since the first delete at each
/// sample point.
///
/// Runs over the whole plan even if fewer todos were created, so it stops at the first id that
/// does not exist.
fn delete_todos<A: TodoApi, P: ResourceProbe>(
    api: &mut A,
    probe: &mut P,
    plan: &BatchPlan,
    progress: &PhaseProgress,
) -> GaugeResult<ScenarioSeries> {
    let mut recorder = MetricRecorder::new("delete", "Deleted");

    let baseline = Baseline::capture(probe)?;
    for id in 1..=plan.total() {
        let status = api
            .delete(id)
            .with_context(|| format!("Failed to delete todo {id}"))?;
        progress.inc();
        if let Err(e) = check_status(Operation::Delete, id, status) {
            progress.log(|| log::error!("{e}"));
            break;
        }

        if plan.is_sample_point(id) {
            let row = recorder.record(id, probe, &baseline)?;
            progress.log(|| log::info!("Deleted {id} todos: {row}"));
        }
    }

    Ok(recorder.finish())
}

fn main() -> GaugeResult<()> {
    let builder =
        ScenarioDefinitionBuilder::new_with_init(env!("CARGO_PKG_NAME")).use_workload(workload);

    run(builder)?;

    Ok(())
}
