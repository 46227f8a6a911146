//! LNS driver, shared by plain LNS and ALNS.

use super::selector::{MethodSelector, TrialOutcome};
use crate::method::Method;
use crate::scheduler::{MethodStats, RunResult, RunSummary, Scheduler, SchedulerConfig};
use crate::solution::Solution;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, trace};

/// Large Neighborhood Search driver, generic over the selection policy.
///
/// Plain LNS uses a [`UniformSelector`](super::UniformSelector) or
/// [`WeightedSelector`](super::WeightedSelector); ALNS plugs in the
/// adaptive selector from [`crate::alns`]. The loop itself is identical
/// either way.
pub struct Lns<S: Solution, M: MethodSelector> {
    scheduler: Scheduler<S>,
    construction: Vec<Method<S>>,
    destroy: Vec<Method<S>>,
    repair: Vec<Method<S>>,
    selector: M,
}

impl<S: Solution, M: MethodSelector> Lns<S, M> {
    /// Creates an LNS driver.
    ///
    /// Fails fast on an empty destroy or repair list, on an empty
    /// construction list without `config.consider_initial`, or when the
    /// selector was built for different list sizes.
    pub fn new(
        initial: S,
        construction: Vec<Method<S>>,
        destroy: Vec<Method<S>>,
        repair: Vec<Method<S>>,
        selector: M,
        config: SchedulerConfig,
    ) -> Result<Self, String> {
        if construction.is_empty() && !config.consider_initial {
            return Err(
                "LNS needs at least one construction method unless consider_initial is set"
                    .into(),
            );
        }
        if destroy.is_empty() || repair.is_empty() {
            return Err("LNS needs at least one destroy and one repair method".into());
        }
        if selector.num_destroy() != destroy.len() || selector.num_repair() != repair.len() {
            return Err(format!(
                "selector was built for ({}, {}) methods, lists have ({}, {})",
                selector.num_destroy(),
                selector.num_repair(),
                destroy.len(),
                repair.len()
            ));
        }
        Ok(Self {
            scheduler: Scheduler::new(initial, config),
            construction,
            destroy,
            repair,
            selector,
        })
    }

    /// Runs the search until a termination condition fires.
    pub fn run(&mut self) -> RunResult<S> {
        let mut current = self.scheduler.incumbent().clone();

        if !self.scheduler.has_incumbent() {
            let stopped = self
                .scheduler
                .perform_sequentially(&mut current, &self.construction);
            debug!(stopped, "construction phase done");
            if stopped {
                return self.finish();
            }
        }
        // Budget re-check right after construction: a zero budget never
        // reaches a destroy/repair pair.
        if self.scheduler.should_stop() {
            return self.finish();
        }

        // The working solution tracks the incumbent; equal-objective
        // trials replace it so the search can drift across plateaus.
        current = self.scheduler.incumbent().clone();
        let mut current_obj = current.objective();

        while !self.scheduler.should_stop() {
            let (d, r) = self.selector.select(self.scheduler.rng_mut());
            let mut trial = current.clone();

            self.scheduler.perform_method(&mut trial, &self.destroy[d]);
            if self.scheduler.should_stop() {
                // Incomplete trial: the selector is not notified.
                break;
            }
            self.scheduler.perform_method(&mut trial, &self.repair[r]);

            let trial_obj = trial.objective();
            let better = if S::TO_MAXIMIZE {
                trial_obj > current_obj
            } else {
                trial_obj < current_obj
            };

            let outcome = if better {
                let improvement = (trial_obj - current_obj).abs();
                current = trial;
                current_obj = trial_obj;
                self.scheduler.set_incumbent(&current);
                debug!(objective = current_obj, destroy = d, repair = r, "new best");
                TrialOutcome::NewBest { improvement }
            } else if trial_obj == current_obj {
                current = trial;
                self.scheduler.set_incumbent(&current);
                TrialOutcome::Accepted
            } else {
                // Worse: drop the copy, the incumbent stands.
                TrialOutcome::Rejected
            };

            trace!(destroy = d, repair = r, ?outcome, "trial done");
            self.selector.update(d, r, outcome);
        }
        self.finish()
    }

    /// Runs with a cooperative cancellation token, checked between
    /// method applications.
    pub fn run_with_cancel(&mut self, token: Arc<AtomicBool>) -> RunResult<S> {
        self.scheduler.set_cancel_token(token);
        self.run()
    }

    /// Best solution found so far, if any. Live inspection.
    pub fn best_solution(&self) -> Option<&S> {
        self.scheduler.has_incumbent().then(|| self.scheduler.incumbent())
    }

    /// Live per-method statistics snapshot.
    pub fn method_statistics(&self) -> &[(String, MethodStats)] {
        self.scheduler.method_statistics()
    }

    /// Live overall results snapshot.
    pub fn main_results(&mut self) -> RunSummary {
        self.scheduler.main_results()
    }

    /// The selection policy, for weight inspection after a run.
    pub fn selector(&self) -> &M {
        &self.selector
    }

    fn finish(&mut self) -> RunResult<S> {
        let summary = self.scheduler.main_results();
        let mut best = self.scheduler.incumbent().clone();
        let best_objective = best.objective();
        debug!(best_objective, iterations = summary.iterations, "LNS finished");
        RunResult {
            best,
            best_objective,
            iterations: summary.iterations,
            elapsed: summary.elapsed,
            cancelled: self.scheduler.cancelled(),
            method_stats: self.scheduler.method_statistics().to_vec(),
        }
    }
}
