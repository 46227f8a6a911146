//! Per-method statistics and run reporting types.

use crate::solution::Solution;
use std::time::Duration;

/// Aggregate record for one method name.
///
/// Mutated by the scheduler after every application of the method and
/// never reset during a run.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodStats {
    /// Number of applications.
    pub calls: usize,
    /// Applications that changed the solution and strictly improved its
    /// objective.
    pub successes: usize,
    /// Sum of objective improvements over all successes, positive in
    /// the solution's optimization sense.
    pub total_improvement: f64,
    /// Wall-clock time spent inside the method.
    pub total_time: Duration,
}

/// Overall results snapshot, queryable at any time.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// Objective of the incumbent, `None` before any incumbent exists.
    pub best_objective: Option<f64>,
    /// Method applications performed so far.
    pub iterations: usize,
    /// Elapsed wall-clock time.
    pub elapsed: Duration,
}

/// Final outcome returned by the GVNS/LNS/ALNS drivers.
#[derive(Debug, Clone)]
pub struct RunResult<S: Solution> {
    /// Best solution found.
    pub best: S,
    /// Objective of `best`.
    pub best_objective: f64,
    /// Total method applications.
    pub iterations: usize,
    /// Total wall-clock time.
    pub elapsed: Duration,
    /// Whether the run was cancelled externally.
    pub cancelled: bool,
    /// Statistics per method name, in first-application order.
    pub method_stats: Vec<(String, MethodStats)>,
}

impl<S: Solution> RunResult<S> {
    /// Statistics record for a method name, if the method ever ran.
    pub fn stats_for(&self, name: &str) -> Option<&MethodStats> {
        self.method_stats
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }
}
