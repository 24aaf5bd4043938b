// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::num::NonZeroUsize;
use std::thread::available_parallelism;

/// Default capacity of the bounded block queue handed from the reader task
/// to the worker pool. Larger values trade memory for throughput.
pub const DEFAULT_QUEUE_SIZE: usize = 200;

/// Knobs for [crate::parse]. Mirrors the plain, public-field `Options`
/// struct the teacher crate uses for its own reader configuration
/// (`routex::osm::Options`) rather than a builder.
#[derive(Debug, Clone)]
pub struct Options {
    /// Bounded capacity of the block queue between the reader task and the
    /// worker pool.
    pub queue_size: usize,

    /// Number of parallel decoder workers. Defaults to the host's available
    /// parallelism.
    pub workers: usize,

    /// When `false` (the default), [crate::Info] is never materialized:
    /// no allocations, no user-string lookups, and the dense-info arrays
    /// are never even touched.
    pub with_metadata: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            queue_size: DEFAULT_QUEUE_SIZE,
            workers: default_worker_count(),
            with_metadata: false,
        }
    }
}

fn default_worker_count() -> usize {
    available_parallelism().map(NonZeroUsize::get).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let o = Options::default();
        assert_eq!(o.queue_size, 200);
        assert!(!o.with_metadata);
        assert!(o.workers >= 1);
    }
}
