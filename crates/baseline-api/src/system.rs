// Host metrics probe
//
// Thin wrapper over `sysinfo` that produces one flat `SystemSample` per
// call. CPU usage is a delta between refreshes, so the probe keeps its
// `System` alive between samples. All calls are blocking; async callers
// should go through `spawn_blocking`.

use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use sysinfo::{Disks, Networks, ProcessesToUpdate, System};
use tracing::trace;

use crate::error::Error;

/// How many processes a sample reports.
pub const TOP_PROCESS_COUNT: usize = 3;

/// Processes at or below this raw CPU percentage are not reported.
const PROCESS_CPU_FLOOR: f32 = 0.1;

/// 1/5/15 minute load average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// One process in the top-N list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessUsage {
    pub name: String,
    /// CPU usage normalized by logical core count (0-100).
    pub cpu_pct: f64,
}

/// A single reading of host vitals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSample {
    pub host_name: Option<String>,
    pub os: Option<String>,
    pub uptime_secs: u64,
    pub boot_time_secs: u64,
    pub cpu_pct: f64,
    pub memory_pct: f64,
    pub disk_pct: f64,
    pub load: LoadAverage,
    /// Cumulative bytes received across all interfaces.
    pub net_rx_bytes: u64,
    /// Cumulative bytes transmitted across all interfaces.
    pub net_tx_bytes: u64,
    pub top_processes: Vec<ProcessUsage>,
    pub logical_cores: usize,
}

struct ProbeState {
    system: System,
    disks: Disks,
    networks: Networks,
}

/// Host metrics provider backed by `sysinfo`.
pub struct SystemProbe {
    state: Mutex<ProbeState>,
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbe {
    /// Create a probe and take the baseline reading CPU deltas are measured against.
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        system.refresh_memory();
        system.refresh_processes(ProcessesToUpdate::All, true);

        Self {
            state: Mutex::new(ProbeState {
                system,
                disks: Disks::new_with_refreshed_list(),
                networks: Networks::new_with_refreshed_list(),
            }),
        }
    }

    /// Number of logical cores, never less than one.
    pub fn logical_cores(&self) -> usize {
        let guard = self.state.lock().expect("probe lock poisoned");
        guard.system.cpus().len().max(1)
    }

    /// Refresh every source and return a new sample.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn sample(&self) -> Result<SystemSample, Error> {
        let mut guard = self.state.lock().expect("probe lock poisoned");
        let ProbeState {
            system,
            disks,
            networks,
        } = &mut *guard;

        system.refresh_cpu_usage();
        system.refresh_memory();
        system.refresh_processes(ProcessesToUpdate::All, true);
        disks.refresh(true);
        networks.refresh(true);

        if system.cpus().is_empty() {
            return Err(Error::Probe("no CPU information available".into()));
        }
        let cores = system.cpus().len();

        let memory_pct = percent(system.used_memory(), system.total_memory());
        let disk_pct = root_disk_usage(disks);

        let (net_rx_bytes, net_tx_bytes) = networks
            .iter()
            .fold((0u64, 0u64), |(rx, tx), (_name, data)| {
                (
                    rx.saturating_add(data.total_received()),
                    tx.saturating_add(data.total_transmitted()),
                )
            });

        let top_processes = top_processes(system, cores);
        let load = System::load_average();

        trace!(cores, processes = system.processes().len(), "system sample taken");

        Ok(SystemSample {
            host_name: System::host_name(),
            os: System::long_os_version(),
            uptime_secs: System::uptime(),
            boot_time_secs: System::boot_time(),
            cpu_pct: f64::from(system.global_cpu_usage()),
            memory_pct,
            disk_pct,
            load: LoadAverage {
                one: load.one,
                five: load.five,
                fifteen: load.fifteen,
            },
            net_rx_bytes,
            net_tx_bytes,
            top_processes,
            logical_cores: cores,
        })
    }
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    }
}

/// Usage of the disk mounted at `/`, falling back to the first disk listed.
fn root_disk_usage(disks: &Disks) -> f64 {
    let list = disks.list();
    let disk = list
        .iter()
        .find(|d| d.mount_point() == Path::new("/"))
        .or_else(|| list.first());
    disk.map_or(0.0, |d| {
        percent(
            d.total_space().saturating_sub(d.available_space()),
            d.total_space(),
        )
    })
}

/// Busiest processes by CPU, normalized by core count, highest first.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn top_processes(system: &System, cores: usize) -> Vec<ProcessUsage> {
    let mut procs: Vec<ProcessUsage> = system
        .processes()
        .values()
        .filter(|p| p.cpu_usage() > PROCESS_CPU_FLOOR)
        .map(|p| ProcessUsage {
            name: p.name().to_string_lossy().into_owned(),
            cpu_pct: f64::from(p.cpu_usage()) / cores.max(1) as f64,
        })
        .collect();
    procs.sort_by(|a, b| b.cpu_pct.total_cmp(&a.cpu_pct));
    procs.truncate(TOP_PROCESS_COUNT);
    procs
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn percent_handles_zero_total() {
        assert!(percent(10, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn percent_of_half() {
        assert!((percent(50, 100) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sample_reports_at_least_one_core() {
        let probe = SystemProbe::new();
        assert!(probe.logical_cores() >= 1);
    }

    #[test]
    fn sample_respects_top_process_limit() {
        let probe = SystemProbe::new();
        let sample = probe.sample().unwrap();
        assert!(sample.top_processes.len() <= TOP_PROCESS_COUNT);
        assert!((0.0..=100.0).contains(&sample.memory_pct));
        assert!(
            sample
                .top_processes
                .windows(2)
                .all(|w| w[0].cpu_pct >= w[1].cpu_pct)
        );
    }
}
