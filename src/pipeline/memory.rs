use std::fmt;

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Source of the process's resident memory figure, in megabytes.
pub trait MemoryProbe: Send + Sync {
    fn resident_mb(&self) -> f64;
}

/// Reads the resident set size of the current process through `sysinfo`.
///
/// Returns `0.0` when the platform cannot report it.
pub struct SysinfoProbe {
    pid: Option<Pid>,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::debug!("memory probe disabled: {e}");
                None
            }
        };
        Self { pid }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SysinfoProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SysinfoProbe").field("pid", &self.pid).finish()
    }
}

impl MemoryProbe for SysinfoProbe {
    fn resident_mb(&self) -> f64 {
        let Some(pid) = self.pid else {
            return 0.0;
        };
        let mut sys = System::new();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        sys.process(pid)
            .map(|p| p.memory() as f64 / BYTES_PER_MB)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_process_reports_non_negative_memory() {
        assert!(SysinfoProbe::new().resident_mb() >= 0.0);
    }
}
