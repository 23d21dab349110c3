//! Provider failure statistics.
//!
//! Counts swallowed provider failures per category so a scan can report how
//! often it had to fall back.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::info;
use strum::IntoEnumIterator;

use super::categorization::categorize_provider_error;
use super::types::{ProviderError, ProviderErrorKind};

/// Thread-safe provider failure tracker.
///
/// All categories are initialized to zero on creation, so lookups never miss.
pub struct ScanStats {
    failures: HashMap<ProviderErrorKind, AtomicUsize>,
    geo_exhausted: AtomicUsize,
}

impl ScanStats {
    pub fn new() -> Self {
        let mut failures = HashMap::new();
        for kind in ProviderErrorKind::iter() {
            failures.insert(kind, AtomicUsize::new(0));
        }

        ScanStats {
            failures,
            geo_exhausted: AtomicUsize::new(0),
        }
    }

    /// Records a swallowed provider failure.
    pub fn record_failure(&self, error: &ProviderError) {
        self.increment(categorize_provider_error(error));
    }

    /// Increments the counter for `kind`.
    pub fn increment(&self, kind: ProviderErrorKind) {
        if let Some(counter) = self.failures.get(&kind) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Records an IP for which every geolocation provider failed.
    pub fn record_geo_exhausted(&self) {
        self.geo_exhausted.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get_failure_count(&self, kind: ProviderErrorKind) -> usize {
        self.failures
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn geo_exhausted(&self) -> usize {
        self.geo_exhausted.load(Ordering::SeqCst)
    }

    pub fn total_failures(&self) -> usize {
        self.failures
            .values()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }

    /// Snapshot of the non-zero counters, in category order.
    pub fn summary(&self) -> StatsSummary {
        let failures = ProviderErrorKind::iter()
            .map(|kind| (kind, self.get_failure_count(kind)))
            .filter(|(_, count)| *count > 0)
            .collect();
        StatsSummary {
            failures,
            geo_exhausted: self.geo_exhausted(),
        }
    }
}

impl Default for ScanStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain-data copy of [`ScanStats`] handed back with a scan report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSummary {
    /// Non-zero failure counters
    pub failures: Vec<(ProviderErrorKind, usize)>,
    /// IPs where the whole geolocation chain failed
    pub geo_exhausted: usize,
}

impl StatsSummary {
    pub fn total_failures(&self) -> usize {
        self.failures.iter().map(|(_, count)| count).sum()
    }

    /// Logs the counters at info level.
    pub fn log(&self) {
        if self.failures.is_empty() {
            info!("No provider failures");
            return;
        }
        info!("Provider failures: {}", self.total_failures());
        for (kind, count) in &self.failures {
            info!("   {}: {}", kind, count);
        }
        if self.geo_exhausted > 0 {
            info!(
                "   IPs without geolocation (all providers failed): {}",
                self.geo_exhausted
            );
        }
    }
}
