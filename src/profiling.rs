//! Batch statistics for address parsing runs

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::parser::ParsedAddress;
use crate::types::AddressInput;

/// Thread-safe counters for one batch run.
///
/// Shared by reference between worker threads when parsing in parallel.
#[derive(Debug)]
pub struct BatchProfiler {
    start_time: Instant,
    records: AtomicUsize,
    parsed: AtomicUsize,
    degraded: AtomicUsize,
    failed: AtomicUsize,
    zips_filled: AtomicUsize,
    cities_filled: AtomicUsize,
    states_filled: AtomicUsize,
    parse_time_us: AtomicU64,
}

impl BatchProfiler {
    /// Create a new profiler; the runtime clock starts now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            records: AtomicUsize::new(0),
            parsed: AtomicUsize::new(0),
            degraded: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            zips_filled: AtomicUsize::new(0),
            cities_filled: AtomicUsize::new(0),
            states_filled: AtomicUsize::new(0),
            parse_time_us: AtomicU64::new(0),
        }
    }

    /// Record a successfully parsed record.
    pub fn record_parsed(&self, input: &AddressInput, parsed: &ParsedAddress, duration: Duration) {
        self.records.fetch_add(1, Ordering::Relaxed);
        self.parsed.fetch_add(1, Ordering::Relaxed);
        self.parse_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);

        if filled(input.existing_zip.as_deref(), parsed.zip.as_deref()) {
            self.zips_filled.fetch_add(1, Ordering::Relaxed);
        }
        if filled(input.existing_city.as_deref(), parsed.city.as_deref()) {
            self.cities_filled.fetch_add(1, Ordering::Relaxed);
        }
        if filled(input.existing_state.as_deref(), parsed.state.as_deref()) {
            self.states_filled.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a record that failed and was handled by the failure policy.
    pub fn record_degraded(&self) {
        self.records.fetch_add(1, Ordering::Relaxed);
        self.degraded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a record whose failure aborted the batch.
    pub fn record_failed(&self) {
        self.records.fetch_add(1, Ordering::Relaxed);
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the counters.
    pub fn summary(&self) -> BatchSummary {
        let parsed = self.parsed.load(Ordering::Relaxed);
        let total_parse_time_us = self.parse_time_us.load(Ordering::Relaxed);

        BatchSummary {
            total_records: self.records.load(Ordering::Relaxed),
            parsed,
            degraded: self.degraded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            zips_filled: self.zips_filled.load(Ordering::Relaxed),
            cities_filled: self.cities_filled.load(Ordering::Relaxed),
            states_filled: self.states_filled.load(Ordering::Relaxed),
            total_runtime: self.start_time.elapsed(),
            average_parse_time: if parsed > 0 {
                Duration::from_micros(total_parse_time_us / parsed as u64)
            } else {
                Duration::ZERO
            },
        }
    }
}

impl Default for BatchProfiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of one batch run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BatchSummary {
    /// Records seen
    pub total_records: usize,
    /// Records parsed without error
    pub parsed: usize,
    /// Records that failed and fell back to the failure policy
    pub degraded: usize,
    /// Records whose failure aborted the batch
    pub failed: usize,
    /// Records whose missing ZIP was filled in
    pub zips_filled: usize,
    /// Records whose missing city was filled in
    pub cities_filled: usize,
    /// Records whose missing state was filled in
    pub states_filled: usize,
    /// Wall-clock time since the profiler was created
    pub total_runtime: Duration,
    /// Average time spent parsing one record
    pub average_parse_time: Duration,
}

impl BatchSummary {
    /// Records processed per second.
    pub fn records_per_second(&self) -> f64 {
        if self.total_runtime.as_secs_f64() > 0.0 {
            self.total_records as f64 / self.total_runtime.as_secs_f64()
        } else {
            0.0
        }
    }
}

fn filled(existing: Option<&str>, parsed: Option<&str>) -> bool {
    crate::types::is_blank(existing) && !crate::types::is_blank(parsed)
}
