/// CPU time consumed by a process since it started, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuTimes {
    pub user: f64,
    pub system: f64,
}

impl CpuTimes {
    /// CPU seconds consumed between `baseline` and this reading.
    ///
    /// The user and system components are differenced separately and then summed.
    pub fn since(&self, baseline: &CpuTimes) -> f64 {
        (self.user - baseline.user) + (self.system - baseline.system)
    }
}

/// Read the user and system CPU time of `pid` from `/proc/<pid>/stat`.
#[cfg(target_os = "linux")]
pub(crate) fn read_proc_stat(pid: u32, ticks_per_sec: f64) -> anyhow::Result<CpuTimes> {
    use anyhow::Context;

    let path = format!("/proc/{pid}/stat");
    let stat =
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read '{path}'"))?;
    parse_proc_stat(&stat, ticks_per_sec)
}

#[cfg(target_os = "linux")]
pub(crate) fn parse_proc_stat(stat: &str, ticks_per_sec: f64) -> anyhow::Result<CpuTimes> {
    use anyhow::{anyhow, Context};

    // The command name is in parentheses and may itself contain spaces and parentheses.
    let fields = stat
        .rfind(')')
        .map(|end| stat[end + 1..].split_whitespace().collect::<Vec<_>>())
        .ok_or_else(|| anyhow!("Malformed process stat line: {stat:?}"))?;

    // Fields after the command name start at `state` (3), so `utime` (14) and `stime` (15) are
    // at offsets 11 and 12.
    let ticks = |offset: usize, name: &str| -> anyhow::Result<f64> {
        fields
            .get(offset)
            .ok_or_else(|| anyhow!("Process stat line has no {name} field"))?
            .parse::<u64>()
            .with_context(|| format!("Failed to parse {name} from process stat line"))
            .map(|t| t as f64 / ticks_per_sec)
    };

    Ok(CpuTimes {
        user: ticks(11, "utime")?,
        system: ticks(12, "stime")?,
    })
}

/// Clock ticks per second used by the kernel for process CPU accounting.
#[cfg(target_os = "linux")]
pub(crate) fn clock_ticks_per_sec() -> f64 {
    match nix::unistd::sysconf(nix::unistd::SysconfVar::CLK_TCK) {
        Ok(Some(ticks)) if ticks > 0 => ticks as f64,
        other => {
            log::warn!("Could not read CLK_TCK ({other:?}), assuming 100 ticks per second");
            100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_sums_user_and_system_deltas() {
        let baseline = CpuTimes {
            user: 1.5,
            system: 0.25,
        };
        let reading = CpuTimes {
            user: 2.0,
            system: 1.0,
        };

        assert_eq!(reading.since(&baseline), 0.5 + 0.75);
    }

    #[test]
    fn since_is_non_negative_for_ordered_readings() {
        let readings = [
            CpuTimes::default(),
            CpuTimes {
                user: 0.01,
                system: 0.0,
            },
            CpuTimes {
                user: 0.01,
                system: 0.02,
            },
            CpuTimes {
                user: 3.0,
                system: 0.02,
            },
        ];

        for (i, baseline) in readings.iter().enumerate() {
            for reading in &readings[i..] {
                assert!(reading.since(baseline) >= 0.0);
            }
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn parse_stat_with_awkward_command_name() {
        let stat = "4242 (java (main) x) S 1 4242 4242 0 -1 4194304 1200 0 0 0 250 75 0 0 20 0 30 0 12345 1000000 5000";

        let times = parse_proc_stat(stat, 100.0).unwrap();

        assert_eq!(times.user, 2.5);
        assert_eq!(times.system, 0.75);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn parse_stat_rejects_truncated_line() {
        assert!(parse_proc_stat("4242 (java) S 1 4242", 100.0).is_err());
        assert!(parse_proc_stat("garbage", 100.0).is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn read_own_cpu_times() {
        let times = read_proc_stat(std::process::id(), clock_ticks_per_sec()).unwrap();
        assert!(times.user >= 0.0);
        assert!(times.system >= 0.0);
    }
}
