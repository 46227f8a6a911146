//! GVNS driver.

use crate::method::Method;
use crate::scheduler::{MethodStats, RunResult, RunSummary, Scheduler, SchedulerConfig};
use crate::solution::Solution;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::debug;

/// General Variable Neighborhood Search driver.
///
/// Owns the scheduler and three ordered method lists: construction,
/// local improvement (the VND neighborhoods) and shaking (ordered by
/// increasing perturbation strength). Empty local-improvement or
/// shaking lists short-circuit their phase; they never loop.
pub struct Gvns<S: Solution> {
    scheduler: Scheduler<S>,
    construction: Vec<Method<S>>,
    local_improvement: Vec<Method<S>>,
    shaking: Vec<Method<S>>,
}

impl<S: Solution> Gvns<S> {
    /// Creates a GVNS driver.
    ///
    /// Fails when no construction method is given and
    /// `config.consider_initial` is unset: the state machine could
    /// never reach a valid solution.
    pub fn new(
        initial: S,
        construction: Vec<Method<S>>,
        local_improvement: Vec<Method<S>>,
        shaking: Vec<Method<S>>,
        config: SchedulerConfig,
    ) -> Result<Self, String> {
        if construction.is_empty() && !config.consider_initial {
            return Err(
                "GVNS needs at least one construction method unless consider_initial is set"
                    .into(),
            );
        }
        Ok(Self {
            scheduler: Scheduler::new(initial, config),
            construction,
            local_improvement,
            shaking,
        })
    }

    /// Runs the search until a termination condition fires.
    pub fn run(&mut self) -> RunResult<S> {
        let mut sol = self.scheduler.incumbent().clone();

        // Construction phase, skipped when an initial incumbent was
        // adopted. The budget is re-checked immediately afterwards so a
        // zero budget never reaches a search method.
        if !self.scheduler.has_incumbent() {
            let stopped = self.scheduler.perform_sequentially(&mut sol, &self.construction);
            debug!(stopped, "construction phase done");
            if stopped {
                return self.finish();
            }
        }
        if self.scheduler.should_stop() {
            return self.finish();
        }

        if self.vnd(&mut sol) {
            self.scheduler.update_incumbent(&mut sol);
            return self.finish();
        }
        self.scheduler.update_incumbent(&mut sol);

        if self.shaking.is_empty() {
            debug!("no shaking methods; stopping after initial descent");
            return self.finish();
        }

        'search: loop {
            let mut k = 0;
            while k < self.shaking.len() {
                if self.scheduler.should_stop() {
                    break 'search;
                }
                let mut trial = self.scheduler.incumbent().clone();
                self.scheduler.perform_method(&mut trial, &self.shaking[k]);
                if self.scheduler.should_stop() {
                    break 'search;
                }
                if self.vnd(&mut trial) {
                    self.scheduler.update_incumbent(&mut trial);
                    break 'search;
                }
                if self.scheduler.update_incumbent(&mut trial) {
                    // Improvement: restart at the weakest perturbation.
                    k = 0;
                } else {
                    // Revert to the incumbent (trial is dropped) and
                    // escalate the perturbation strength.
                    debug!(shaking = k, "trial rejected, escalating");
                    k += 1;
                }
            }
            // All strengths exhausted without improvement: wrap around.
        }
        self.finish()
    }

    /// Runs with a cooperative cancellation token, checked between
    /// method applications.
    pub fn run_with_cancel(&mut self, token: Arc<AtomicBool>) -> RunResult<S> {
        self.scheduler.set_cancel_token(token);
        self.run()
    }

    /// Variable Neighborhood Descent: apply neighborhoods in order,
    /// restarting from the first on every improving change
    /// (first-improvement restart). Returns whether the run must stop.
    fn vnd(&mut self, sol: &mut S) -> bool {
        let mut i = 0;
        while i < self.local_improvement.len() {
            let res = self.scheduler.perform_method(sol, &self.local_improvement[i]);
            if self.scheduler.should_stop() {
                return true;
            }
            if res.changed && !res.is_local_optimum {
                i = 0;
            } else {
                i += 1;
            }
        }
        false
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

    fn finish(&mut self) -> RunResult<S> {
        let summary = self.scheduler.main_results();
        let mut best = self.scheduler.incumbent().clone();
        let best_objective = best.objective();
        debug!(best_objective, iterations = summary.iterations, "GVNS finished");
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
