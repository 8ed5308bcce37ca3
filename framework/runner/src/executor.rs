use std::future::Future;

use anyhow::Context;

/// Owns the Tokio runtime that manages the service process.
///
/// The workload itself is synchronous. The runtime is only used to spawn the service, forward its
/// output to the log in the background and wait for it to exit.
#[derive(Debug)]
pub struct Executor {
    runtime: tokio::runtime::Runtime,
}

impl Executor {
    pub fn new() -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
        Ok(Self { runtime })
    }

    /// Run async code in place, blocking until it completes.
    ///
    /// Tasks spawned by the future keep running on the runtime after this returns.
    pub fn execute_in_place<T>(
        &self,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> anyhow::Result<T> {
        self.runtime.block_on(fut)
    }
}
