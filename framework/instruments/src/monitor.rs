use anyhow::anyhow;
use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessesToUpdate, System};

use crate::cpu::CpuTimes;

/// A source of resource usage readings for one process.
pub trait ResourceProbe {
    /// Resident set size in megabytes at the instant of the call.
    fn memory_mb(&mut self) -> anyhow::Result<f64>;

    /// CPU time accumulated by the process since it started.
    fn cpu_times(&mut self) -> anyhow::Result<CpuTimes>;

    /// CPU seconds accumulated since `baseline` was read.
    fn cpu_since(&mut self, baseline: &CpuTimes) -> anyhow::Result<f64> {
        Ok(self.cpu_times()?.since(baseline))
    }
}

/// Reads the resource usage of a running process from the operating system.
///
/// Memory comes from [sysinfo]. On Linux the CPU times are read from `/proc/<pid>/stat` so that
/// user and system time are reported separately, other platforms only get the combined CPU time
/// from [sysinfo] and report it as user time.
pub struct ProcessMonitor {
    pid: Pid,
    system: System,
    #[cfg(target_os = "linux")]
    ticks_per_sec: f64,
}

impl ProcessMonitor {
    pub fn new(pid: u32) -> Self {
        Self {
            pid: Pid::from_u32(pid),
            system: System::new(),
            #[cfg(target_os = "linux")]
            ticks_per_sec: crate::cpu::clock_ticks_per_sec(),
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid.as_u32()
    }

    fn refresh(&mut self, refresh_kind: ProcessRefreshKind) -> anyhow::Result<&Process> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            refresh_kind,
        );

        self.system
            .process(self.pid)
            .ok_or_else(|| anyhow!("Process {} is not running", self.pid))
    }
}

impl ResourceProbe for ProcessMonitor {
    fn memory_mb(&mut self) -> anyhow::Result<f64> {
        let process = self.refresh(ProcessRefreshKind::nothing().with_memory())?;
        Ok(process.memory() as f64 / (1024.0 * 1024.0))
    }

    #[cfg(target_os = "linux")]
    fn cpu_times(&mut self) -> anyhow::Result<CpuTimes> {
        crate::cpu::read_proc_stat(self.pid.as_u32(), self.ticks_per_sec)
    }

    #[cfg(not(target_os = "linux"))]
    fn cpu_times(&mut self) -> anyhow::Result<CpuTimes> {
        let process = self.refresh(ProcessRefreshKind::nothing().with_cpu())?;
        Ok(CpuTimes {
            user: process.accumulated_cpu_time() as f64 / 1000.0,
            system: 0.0,
        })
    }
}
