//! Deterministic stand-ins for a real process, for testing workloads.

use crate::cpu::CpuTimes;
use crate::monitor::ResourceProbe;

/// A probe whose readings grow by a fixed step every time they are read.
#[derive(Debug, Clone)]
pub struct ScriptedProbe {
    memory_mb: f64,
    memory_step: f64,
    cpu: CpuTimes,
    cpu_step: CpuTimes,
    pub memory_reads: usize,
    pub cpu_reads: usize,
}

impl Default for ScriptedProbe {
    fn default() -> Self {
        Self::new(50.0, 0.5)
    }
}

impl ScriptedProbe {
    pub fn new(memory_mb: f64, memory_step: f64) -> Self {
        Self {
            memory_mb,
            memory_step,
            cpu: CpuTimes::default(),
            cpu_step: CpuTimes {
                user: 0.01,
                system: 0.005,
            },
            memory_reads: 0,
            cpu_reads: 0,
        }
    }
}

impl ResourceProbe for ScriptedProbe {
    fn memory_mb(&mut self) -> anyhow::Result<f64> {
        let reading = self.memory_mb;
        self.memory_mb += self.memory_step;
        self.memory_reads += 1;
        Ok(reading)
    }

    fn cpu_times(&mut self) -> anyhow::Result<CpuTimes> {
        let reading = self.cpu;
        self.cpu.user += self.cpu_step.user;
        self.cpu.system += self.cpu_step.system;
        self.cpu_reads += 1;
        Ok(reading)
    }
}
