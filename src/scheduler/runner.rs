//! The iteration engine all drivers are built on.

use super::config::SchedulerConfig;
use super::stats::{MethodStats, RunSummary};
use crate::method::{Method, MethodResult};
use crate::solution::Solution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

/// Generic method-scheduling engine.
///
/// Owns the incumbent solution, the run's seeded random source, the
/// iteration/time budgets, and one [`MethodStats`] record per method
/// name. Exactly one driver instance owns a scheduler per run; nothing
/// here is shared or locked.
pub struct Scheduler<S: Solution> {
    config: SchedulerConfig,
    rng: StdRng,
    incumbent: S,
    incumbent_valid: bool,
    iteration: usize,
    started: Instant,
    terminate: bool,
    cancelled: bool,
    cancel: Option<Arc<AtomicBool>>,
    stats: Vec<(String, MethodStats)>,
}

impl<S: Solution> Scheduler<S> {
    /// Creates a scheduler around an initial solution.
    ///
    /// The initial solution does not count as an incumbent unless
    /// `config.consider_initial` is set and its objective cache is
    /// valid; until then the first [`update_incumbent`] call adopts the
    /// candidate unconditionally.
    ///
    /// [`update_incumbent`]: Scheduler::update_incumbent
    pub fn new(initial: S, config: SchedulerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        let incumbent_valid = config.consider_initial && initial.objective_cache().is_valid();
        Self {
            config,
            rng,
            incumbent: initial,
            incumbent_valid,
            iteration: 0,
            started: Instant::now(),
            terminate: false,
            cancelled: false,
            cancel: None,
            stats: Vec::new(),
        }
    }

    /// Installs a cooperative cancellation token, checked between
    /// method applications.
    pub fn set_cancel_token(&mut self, token: Arc<AtomicBool>) {
        self.cancel = Some(token);
    }

    /// Applies one method to `sol`, measures its wall-clock cost and
    /// updates its statistics record.
    ///
    /// A changing application that strictly improves the objective (in
    /// the solution's sense) counts as a success and accumulates the
    /// improvement. Panics raised by the operation propagate; there is
    /// no method-level retry.
    pub fn perform_method(&mut self, sol: &mut S, method: &Method<S>) -> MethodResult {
        let obj_before = sol.objective();
        let mut res = MethodResult::new();
        let t0 = Instant::now();
        method.apply(sol, &mut self.rng, &mut res);
        let spent = t0.elapsed();
        self.iteration += 1;
        if res.terminate {
            self.terminate = true;
        }

        #[cfg(debug_assertions)]
        if res.changed {
            if let Err(err) = sol.check() {
                panic!("inconsistent solution after method '{}': {err}", method.name());
            }
        }

        let mut improvement = 0.0;
        if res.changed {
            let obj_after = sol.objective();
            improvement = if S::TO_MAXIMIZE {
                obj_after - obj_before
            } else {
                obj_before - obj_after
            };
        }

        let entry = self.stats_entry(method.name());
        entry.calls += 1;
        entry.total_time += spent;
        if res.changed && improvement > 0.0 {
            entry.successes += 1;
            entry.total_improvement += improvement;
        }

        trace!(
            method = method.name(),
            iteration = self.iteration,
            changed = res.changed,
            improvement,
            "method applied"
        );
        res
    }

    /// Applies methods in order, adopting improving candidates as the
    /// incumbent and checking termination after every application.
    ///
    /// Returns `true` when the run must stop. Used for the construction
    /// phase; a zero iteration budget therefore stops right here,
    /// before any search method runs.
    pub fn perform_sequentially(&mut self, sol: &mut S, methods: &[Method<S>]) -> bool {
        for method in methods {
            self.perform_method(sol, method);
            self.update_incumbent(sol);
            if self.should_stop() {
                return true;
            }
        }
        false
    }

    /// Whether any termination condition fired: a method requested
    /// termination, the cancel token was set, or a budget is exhausted.
    pub fn should_stop(&mut self) -> bool {
        if self.terminate {
            return true;
        }
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                self.cancelled = true;
                return true;
            }
        }
        if let Some(budget) = self.config.iteration_budget {
            if self.iteration >= budget {
                return true;
            }
        }
        if let Some(limit) = self.config.time_limit {
            if self.started.elapsed() >= limit {
                return true;
            }
        }
        false
    }

    /// Adopts `sol` as the incumbent when it is strictly better, or
    /// when no incumbent exists yet. Returns whether it was adopted.
    pub fn update_incumbent(&mut self, sol: &mut S) -> bool {
        if !self.incumbent_valid || sol.is_better(&mut self.incumbent) {
            self.incumbent = sol.clone();
            self.incumbent_valid = true;
            let objective = self.incumbent.objective();
            debug!(objective, iteration = self.iteration, "new incumbent");
            true
        } else {
            false
        }
    }

    /// Unconditionally replaces the incumbent (LNS plateau drift).
    pub fn set_incumbent(&mut self, sol: &S) {
        self.incumbent = sol.clone();
        self.incumbent_valid = true;
    }

    /// The current incumbent. Meaningful once construction ran or an
    /// initial solution was adopted.
    pub fn incumbent(&self) -> &S {
        &self.incumbent
    }

    /// Mutable access to the incumbent, for objective queries.
    pub fn incumbent_mut(&mut self) -> &mut S {
        &mut self.incumbent
    }

    /// Whether an incumbent has been adopted.
    pub fn has_incumbent(&self) -> bool {
        self.incumbent_valid
    }

    /// Method applications performed so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Whether the external cancel token fired.
    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    /// The run's random source. Drivers and selectors draw from this
    /// single generator so a fixed seed reproduces the whole run.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Statistics snapshot keyed by method name, in first-application
    /// order. Pure read.
    pub fn method_statistics(&self) -> &[(String, MethodStats)] {
        &self.stats
    }

    /// Overall results snapshot. Pure read apart from the lazy
    /// objective recomputation.
    pub fn main_results(&mut self) -> RunSummary {
        let best_objective = if self.incumbent_valid {
            Some(self.incumbent.objective())
        } else {
            None
        };
        RunSummary {
            best_objective,
            iterations: self.iteration,
            elapsed: self.started.elapsed(),
        }
    }

    fn stats_entry(&mut self, name: &str) -> &mut MethodStats {
        let pos = match self.stats.iter().position(|(n, _)| n == name) {
            Some(pos) => pos,
            None => {
                self.stats.push((name.to_string(), MethodStats::default()));
                self.stats.len() - 1
            }
        };
        &mut self.stats[pos].1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::ObjectiveCache;

    // Minimal maximizing solution: a single counter.
    #[derive(Clone, Debug)]
    struct Counter {
        value: i64,
        cache: ObjectiveCache,
    }

    impl Counter {
        fn new(value: i64) -> Self {
            Self {
                value,
                cache: ObjectiveCache::new(),
            }
        }
    }

    impl Solution for Counter {
        const TO_MAXIMIZE: bool = true;

        fn objective_cache(&self) -> &ObjectiveCache {
            &self.cache
        }

        fn objective_cache_mut(&mut self) -> &mut ObjectiveCache {
            &mut self.cache
        }

        fn compute_objective(&self) -> f64 {
            self.value as f64
        }
    }

    fn increment_until(cap: i64) -> Method<Counter> {
        Method::new("inc", 0.0, move |sol: &mut Counter, _par, _rng, res| {
            if sol.value < cap {
                sol.value += 1;
                sol.invalidate();
            } else {
                res.changed = false;
            }
        })
    }

    #[test]
    fn test_statistics_accounting() {
        let config = SchedulerConfig::default().with_seed(1);
        let mut scheduler = Scheduler::new(Counter::new(0), config);
        let inc = increment_until(3);
        let mut sol = Counter::new(0);

        // 5 applications, only the first 3 improve.
        for _ in 0..5 {
            scheduler.perform_method(&mut sol, &inc);
        }

        let (name, stats) = &scheduler.method_statistics()[0];
        assert_eq!(name, "inc");
        assert_eq!(stats.calls, 5);
        assert_eq!(stats.successes, 3);
        assert_eq!(stats.total_improvement, 3.0);
        assert_eq!(scheduler.iteration(), 5);
    }

    #[test]
    fn test_terminate_flag_latches() {
        let config = SchedulerConfig::default().with_seed(1);
        let mut scheduler = Scheduler::new(Counter::new(0), config);
        let stop = Method::new("stop", 0.0, |_sol: &mut Counter, _par, _rng, res| {
            res.changed = false;
            res.terminate = true;
        });
        let mut sol = Counter::new(0);

        assert!(!scheduler.should_stop());
        scheduler.perform_method(&mut sol, &stop);
        assert!(scheduler.should_stop());
    }

    #[test]
    fn test_iteration_budget_stops_sequential_phase() {
        let config = SchedulerConfig::default().with_iteration_budget(2).with_seed(1);
        let mut scheduler = Scheduler::new(Counter::new(0), config);
        let methods: Vec<Method<Counter>> =
            (0..5).map(|_| increment_until(i64::MAX)).collect();
        let mut sol = Counter::new(0);

        let stopped = scheduler.perform_sequentially(&mut sol, &methods);
        assert!(stopped);
        assert_eq!(scheduler.iteration(), 2);
    }

    #[test]
    fn test_zero_budget_stops_immediately() {
        let config = SchedulerConfig::default().with_iteration_budget(0).with_seed(1);
        let mut scheduler: Scheduler<Counter> = Scheduler::new(Counter::new(0), config);
        assert!(scheduler.should_stop());
    }

    #[test]
    fn test_incumbent_adopted_then_only_on_improvement() {
        let config = SchedulerConfig::default().with_seed(1);
        let mut scheduler = Scheduler::new(Counter::new(0), config);
        assert!(!scheduler.has_incumbent());

        // First candidate is adopted regardless of its objective.
        let mut low = Counter::new(-5);
        assert!(scheduler.update_incumbent(&mut low));

        let mut worse = Counter::new(-10);
        assert!(!scheduler.update_incumbent(&mut worse));

        let mut better = Counter::new(4);
        assert!(scheduler.update_incumbent(&mut better));
        assert_eq!(scheduler.incumbent_mut().objective(), 4.0);
    }

    #[test]
    fn test_consider_initial_requires_valid_cache() {
        let config = SchedulerConfig::default().with_consider_initial().with_seed(1);
        let stale = Counter::new(9);
        let scheduler = Scheduler::new(stale, config.clone());
        assert!(!scheduler.has_incumbent());

        let mut fresh = Counter::new(9);
        fresh.objective();
        let scheduler = Scheduler::new(fresh, config);
        assert!(scheduler.has_incumbent());
    }

    #[test]
    fn test_cancel_token_marks_cancelled() {
        let config = SchedulerConfig::default().with_seed(1);
        let mut scheduler: Scheduler<Counter> = Scheduler::new(Counter::new(0), config);
        let token = Arc::new(AtomicBool::new(false));
        scheduler.set_cancel_token(token.clone());

        assert!(!scheduler.should_stop());
        token.store(true, Ordering::Relaxed);
        assert!(scheduler.should_stop());
        assert!(scheduler.cancelled());
    }

    #[test]
    fn test_main_results_snapshot() {
        let config = SchedulerConfig::default().with_seed(1);
        let mut scheduler = Scheduler::new(Counter::new(0), config);
        let inc = increment_until(i64::MAX);
        let mut sol = Counter::new(0);
        scheduler.perform_method(&mut sol, &inc);
        scheduler.update_incumbent(&mut sol);

        let summary = scheduler.main_results();
        assert_eq!(summary.best_objective, Some(1.0));
        assert_eq!(summary.iterations, 1);
    }
}
