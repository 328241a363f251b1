// ── System snapshot ──

use baseline_api::{LoadAverage, ProcessUsage, SystemSample};
use chrono::{DateTime, Local};

/// Latest host reading plus derived network throughput.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemSnapshot {
    pub host_name: Option<String>,
    pub os: Option<String>,
    pub uptime_secs: u64,
    pub boot_time_secs: u64,
    pub cpu_pct: f64,
    pub memory_pct: f64,
    pub disk_pct: f64,
    pub load: LoadAverage,
    /// Bytes per second received since the previous sample.
    pub rx_rate: f64,
    /// Bytes per second sent since the previous sample.
    pub tx_rate: f64,
    pub top_processes: Vec<ProcessUsage>,
    /// Set while the probe is failing; the other fields keep the last
    /// good reading.
    pub error: Option<String>,
    pub taken_at: Option<DateTime<Local>>,
}

impl SystemSnapshot {
    pub fn from_sample(sample: SystemSample, rx_rate: f64, tx_rate: f64, now: DateTime<Local>) -> Self {
        Self {
            host_name: sample.host_name,
            os: sample.os,
            uptime_secs: sample.uptime_secs,
            boot_time_secs: sample.boot_time_secs,
            cpu_pct: sample.cpu_pct,
            memory_pct: sample.memory_pct,
            disk_pct: sample.disk_pct,
            load: sample.load,
            rx_rate,
            tx_rate,
            top_processes: sample.top_processes,
            error: None,
            taken_at: Some(now),
        }
    }
}

/// Bytes per second between two cumulative counter readings.
///
/// Zero when there is no usable interval, and zero when the counter went
/// backwards (interface reset).
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn throughput(previous: u64, current: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    current.saturating_sub(previous) as f64 / elapsed_secs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throughput_over_interval() {
        assert!((throughput(1_000, 3_000, 2.0) - 1_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn throughput_without_interval_is_zero() {
        assert!(throughput(1_000, 3_000, 0.0).abs() < f64::EPSILON);
        assert!(throughput(1_000, 3_000, -1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn counter_reset_reads_as_zero() {
        assert!(throughput(5_000, 10, 2.0).abs() < f64::EPSILON);
    }
}
