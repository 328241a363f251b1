// ── Metric history ──
//
// Rolling window of system samples. The five series are parallel arrays
// and always have the same length; each push appends to all of them and
// trims from the front.

use serde::{Deserialize, Serialize};

/// Samples retained in memory and on disk.
pub const HISTORY_LIMIT: usize = 60;

/// One appended row.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub cpu: f64,
    pub memory: f64,
    /// Wall-clock `HH:MM:SS` at sampling time.
    pub timestamp: String,
    /// Cumulative bytes received.
    pub network_in: u64,
    /// Cumulative bytes sent.
    pub network_out: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricHistory {
    #[serde(default)]
    cpu: Vec<f64>,
    #[serde(default)]
    memory: Vec<f64>,
    #[serde(default)]
    timestamps: Vec<String>,
    #[serde(default)]
    network_in: Vec<u64>,
    #[serde(default)]
    network_out: Vec<u64>,
}

impl MetricHistory {
    pub fn push(&mut self, sample: MetricSample) {
        self.cpu.push(sample.cpu);
        self.memory.push(sample.memory);
        self.timestamps.push(sample.timestamp);
        self.network_in.push(sample.network_in);
        self.network_out.push(sample.network_out);
        self.trim(HISTORY_LIMIT);
    }

    /// Keep only the newest `limit` entries of every series.
    pub fn trim(&mut self, limit: usize) {
        fn keep_tail<T>(series: &mut Vec<T>, limit: usize) {
            let excess = series.len().saturating_sub(limit);
            series.drain(..excess);
        }
        keep_tail(&mut self.cpu, limit);
        keep_tail(&mut self.memory, limit);
        keep_tail(&mut self.timestamps, limit);
        keep_tail(&mut self.network_in, limit);
        keep_tail(&mut self.network_out, limit);
    }

    /// Repair a history read from disk: series of unequal length are cut
    /// to the shortest one (newest entries kept), then to the limit.
    pub fn normalize(&mut self) {
        let shortest = [
            self.cpu.len(),
            self.memory.len(),
            self.timestamps.len(),
            self.network_in.len(),
            self.network_out.len(),
        ]
        .into_iter()
        .min()
        .unwrap_or(0);
        self.trim(shortest.min(HISTORY_LIMIT));
    }

    pub fn len(&self) -> usize {
        self.cpu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpu.is_empty()
    }

    pub fn is_consistent(&self) -> bool {
        let n = self.cpu.len();
        self.memory.len() == n
            && self.timestamps.len() == n
            && self.network_in.len() == n
            && self.network_out.len() == n
    }

    pub fn cpu(&self) -> &[f64] {
        &self.cpu
    }

    pub fn memory(&self) -> &[f64] {
        &self.memory
    }

    pub fn timestamps(&self) -> &[String] {
        &self.timestamps
    }

    pub fn network_in(&self) -> &[u64] {
        &self.network_in
    }

    pub fn network_out(&self) -> &[u64] {
        &self.network_out
    }
}
