//! Scheduler configuration.

use std::time::Duration;

/// Run-level configuration shared by all drivers.
///
/// There is no process-wide mutable settings object; every driver
/// receives its configuration explicitly at construction.
///
/// # Examples
///
/// ```
/// use mh_engine::scheduler::SchedulerConfig;
/// use std::time::Duration;
///
/// let config = SchedulerConfig::default()
///     .with_iteration_budget(1000)
///     .with_time_limit(Duration::from_secs(5))
///     .with_seed(42);
/// assert_eq!(config.iteration_budget, Some(1000));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchedulerConfig {
    /// Maximum number of method applications, `None` for unlimited.
    ///
    /// Every method application counts, construction included. A budget
    /// of zero stops the run right after the construction phase, before
    /// any improvement/shaking/destroy/repair method runs.
    pub iteration_budget: Option<usize>,

    /// Wall-clock budget, `None` for unlimited. Checked between method
    /// applications only.
    pub time_limit: Option<Duration>,

    /// Random seed; `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Treat the caller-provided solution as an already valid incumbent
    /// and skip construction when its objective cache is valid.
    pub consider_initial: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            iteration_budget: Some(10_000),
            time_limit: None,
            seed: None,
            consider_initial: false,
        }
    }
}

impl SchedulerConfig {
    /// Sets the iteration budget.
    pub fn with_iteration_budget(mut self, n: usize) -> Self {
        self.iteration_budget = Some(n);
        self
    }

    /// Removes the iteration budget.
    pub fn without_iteration_budget(mut self) -> Self {
        self.iteration_budget = None;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Marks the caller-provided solution as a usable incumbent.
    pub fn with_consider_initial(mut self) -> Self {
        self.consider_initial = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.iteration_budget, Some(10_000));
        assert!(config.time_limit.is_none());
        assert!(config.seed.is_none());
        assert!(!config.consider_initial);
    }

    #[test]
    fn test_builder_chain() {
        let config = SchedulerConfig::default()
            .with_iteration_budget(0)
            .with_time_limit(Duration::from_millis(250))
            .with_seed(7)
            .with_consider_initial();

        assert_eq!(config.iteration_budget, Some(0));
        assert_eq!(config.time_limit, Some(Duration::from_millis(250)));
        assert_eq!(config.seed, Some(7));
        assert!(config.consider_initial);
    }

    #[test]
    fn test_budget_can_be_lifted() {
        let config = SchedulerConfig::default().without_iteration_budget();
        assert!(config.iteration_budget.is_none());
    }
}
