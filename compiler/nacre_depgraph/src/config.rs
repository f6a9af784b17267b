//! Dependency-analysis configuration.

/// Configuration for one dependency analysis.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Number of marking threads (0 = auto-detect). Ignored when
    /// `parallel` is false.
    pub num_threads: usize,
    /// Expand the graph frontier-at-a-time on a worker pool.
    pub parallel: bool,
    /// Record every traversed edge in a [`DependencyReport`](crate::DependencyReport).
    pub record_edges: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            num_threads: 0, // auto-detect
            parallel: true,
            record_edges: false,
        }
    }
}

impl AnalysisConfig {
    /// Mark on the calling thread with a plain worklist.
    pub fn single_threaded() -> Self {
        AnalysisConfig {
            num_threads: 1,
            parallel: false,
            ..Default::default()
        }
    }

    /// Parallel marking on `num_threads` workers.
    pub fn with_threads(num_threads: usize) -> Self {
        AnalysisConfig {
            num_threads,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_edge_recording(mut self) -> Self {
        self.record_edges = true;
        self
    }

    /// Get the effective number of threads.
    pub fn effective_threads(&self) -> usize {
        if !self.parallel {
            1
        } else if self.num_threads == 0 {
            rayon::current_num_threads()
        } else {
            self.num_threads
        }
    }
}
