//! Adaptive destroy/repair selection.

use crate::lns::{roulette, CompatibilityMatrix, MethodSelector, TrialOutcome};
use rand::RngCore;
use tracing::debug;

/// Tunables of the adaptive selector.
///
/// The literature does not fix a canonical reward/decay formula, so all
/// of it is explicit configuration rather than baked-in constants. The
/// per-trial update is `weight = decay * weight + reward(outcome)`,
/// with the new-best reward optionally scaled by the observed
/// improvement; every `segment_length` trials the weight vectors are
/// renormalized to mean 1.
///
/// # Examples
///
/// ```
/// use mh_engine::alns::AdaptiveConfig;
///
/// let config = AdaptiveConfig::default()
///     .with_decay(0.8)
///     .with_rewards(20.0, 5.0, 0.5)
///     .with_segment_length(50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdaptiveConfig {
    /// Retention factor per trial, in (0, 1].
    pub decay: f64,
    /// Reward for a trial that strictly improved on the incumbent.
    pub reward_new_best: f64,
    /// Reward for an accepted equal-objective trial.
    pub reward_accepted: f64,
    /// Reward for a rejected trial; near-zero keeps unproductive
    /// methods selectable without reinforcing them.
    pub reward_rejected: f64,
    /// Extra new-best reward per unit of objective improvement.
    pub improvement_scale: f64,
    /// Trials between weight renormalizations.
    pub segment_length: usize,
    /// Floor below which no weight may fall.
    pub min_weight: f64,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            decay: 0.9,
            reward_new_best: 33.0,
            reward_accepted: 9.0,
            reward_rejected: 1.0,
            improvement_scale: 0.0,
            segment_length: 100,
            min_weight: 0.01,
        }
    }
}

impl AdaptiveConfig {
    /// Sets the per-trial retention factor.
    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// Sets the rewards for new-best, accepted and rejected trials.
    pub fn with_rewards(mut self, new_best: f64, accepted: f64, rejected: f64) -> Self {
        self.reward_new_best = new_best;
        self.reward_accepted = accepted;
        self.reward_rejected = rejected;
        self
    }

    /// Sets the improvement-proportional bonus for new-best trials.
    pub fn with_improvement_scale(mut self, scale: f64) -> Self {
        self.improvement_scale = scale;
        self
    }

    /// Sets the renormalization cadence.
    pub fn with_segment_length(mut self, n: usize) -> Self {
        self.segment_length = n.max(1);
        self
    }

    /// Sets the weight floor.
    pub fn with_min_weight(mut self, w: f64) -> Self {
        self.min_weight = w;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.decay <= 0.0 || self.decay > 1.0 {
            return Err(format!("decay must be in (0, 1], got {}", self.decay));
        }
        for (name, v) in [
            ("reward_new_best", self.reward_new_best),
            ("reward_accepted", self.reward_accepted),
            ("reward_rejected", self.reward_rejected),
            ("improvement_scale", self.improvement_scale),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(format!("{name} must be finite and non-negative, got {v}"));
            }
        }
        if self.segment_length == 0 {
            return Err("segment_length must be positive".into());
        }
        if self.min_weight <= 0.0 {
            return Err(format!("min_weight must be positive, got {}", self.min_weight));
        }
        Ok(())
    }
}

/// Roulette-wheel selector with performance-reinforced weights.
///
/// All weights start at 1.0 and are mutated only by
/// [`update`](MethodSelector::update).
#[derive(Debug)]
pub struct AdaptiveSelector {
    config: AdaptiveConfig,
    destroy_weights: Vec<f64>,
    repair_weights: Vec<f64>,
    compat: Option<CompatibilityMatrix>,
    trials: usize,
}

impl AdaptiveSelector {
    /// Creates a selector for the given method list sizes.
    pub fn new(
        num_destroy: usize,
        num_repair: usize,
        config: AdaptiveConfig,
    ) -> Result<Self, String> {
        if num_destroy == 0 || num_repair == 0 {
            return Err("selector needs at least one destroy and one repair method".into());
        }
        config.validate()?;
        Ok(Self {
            config,
            destroy_weights: vec![1.0; num_destroy],
            repair_weights: vec![1.0; num_repair],
            compat: None,
            trials: 0,
        })
    }

    /// Restricts selection to the pairs the matrix allows.
    pub fn with_compatibility(mut self, matrix: CompatibilityMatrix) -> Result<Self, String> {
        if matrix.dims() != (self.destroy_weights.len(), self.repair_weights.len()) {
            return Err(format!(
                "compatibility matrix is {:?}, expected ({}, {})",
                matrix.dims(),
                self.destroy_weights.len(),
                self.repair_weights.len()
            ));
        }
        matrix.validate()?;
        self.compat = Some(matrix);
        Ok(self)
    }

    /// Current destroy weights.
    pub fn destroy_weights(&self) -> &[f64] {
        &self.destroy_weights
    }

    /// Current repair weights.
    pub fn repair_weights(&self) -> &[f64] {
        &self.repair_weights
    }

    fn reward(&self, outcome: TrialOutcome) -> f64 {
        match outcome {
            TrialOutcome::NewBest { improvement } => {
                self.config.reward_new_best + self.config.improvement_scale * improvement
            }
            TrialOutcome::Accepted => self.config.reward_accepted,
            TrialOutcome::Rejected => self.config.reward_rejected,
        }
    }
}

/// Rescales weights to mean 1, keeping the floor.
fn renormalize(weights: &mut [f64], min_weight: f64) {
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        let scale = weights.len() as f64 / total;
        for w in weights.iter_mut() {
            *w = (*w * scale).max(min_weight);
        }
    }
}

impl MethodSelector for AdaptiveSelector {
    fn num_destroy(&self) -> usize {
        self.destroy_weights.len()
    }

    fn num_repair(&self) -> usize {
        self.repair_weights.len()
    }

    fn select(&mut self, rng: &mut dyn RngCore) -> (usize, usize) {
        let destroy_candidates: Vec<(usize, f64)> =
            self.destroy_weights.iter().copied().enumerate().collect();
        let destroy = roulette(&destroy_candidates, rng);

        let repair_candidates: Vec<(usize, f64)> = match &self.compat {
            Some(matrix) => matrix
                .compatible_repairs(destroy)
                .map(|r| (r, self.repair_weights[r]))
                .collect(),
            None => self.repair_weights.iter().copied().enumerate().collect(),
        };
        let repair = roulette(&repair_candidates, rng);
        (destroy, repair)
    }

    fn update(&mut self, destroy: usize, repair: usize, outcome: TrialOutcome) {
        let reward = self.reward(outcome);
        let decay = self.config.decay;
        let floor = self.config.min_weight;

        let w = &mut self.destroy_weights[destroy];
        *w = (decay * *w + reward).max(floor);
        let w = &mut self.repair_weights[repair];
        *w = (decay * *w + reward).max(floor);

        self.trials += 1;
        if self.trials % self.config.segment_length == 0 {
            renormalize(&mut self.destroy_weights, floor);
            renormalize(&mut self.repair_weights, floor);
            debug!(
                trials = self.trials,
                destroy_weights = ?self.destroy_weights,
                repair_weights = ?self.repair_weights,
                "segment weights renormalized"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn selector(num_destroy: usize, num_repair: usize) -> AdaptiveSelector {
        AdaptiveSelector::new(num_destroy, num_repair, AdaptiveConfig::default())
            .expect("valid selector")
    }

    #[test]
    fn test_new_best_outweighs_rejection() {
        let mut sel = selector(2, 2);
        for _ in 0..20 {
            sel.update(0, 0, TrialOutcome::NewBest { improvement: 1.0 });
            sel.update(1, 1, TrialOutcome::Rejected);
        }
        assert!(sel.destroy_weights()[0] > sel.destroy_weights()[1]);
        assert!(sel.repair_weights()[0] > sel.repair_weights()[1]);
    }

    #[test]
    fn test_accepted_between_best_and_rejected() {
        let mut sel = selector(3, 1);
        for _ in 0..20 {
            sel.update(0, 0, TrialOutcome::NewBest { improvement: 0.0 });
            sel.update(1, 0, TrialOutcome::Accepted);
            sel.update(2, 0, TrialOutcome::Rejected);
        }
        let w = sel.destroy_weights();
        assert!(w[0] > w[1]);
        assert!(w[1] > w[2]);
    }

    #[test]
    fn test_improvement_scale_reinforces_bigger_gains() {
        let config = AdaptiveConfig::default().with_improvement_scale(2.0);
        let mut sel = AdaptiveSelector::new(2, 1, config).expect("valid selector");
        sel.update(0, 0, TrialOutcome::NewBest { improvement: 10.0 });
        sel.update(1, 0, TrialOutcome::NewBest { improvement: 1.0 });
        assert!(sel.destroy_weights()[0] > sel.destroy_weights()[1]);
    }

    #[test]
    fn test_weights_never_fall_below_floor() {
        let config = AdaptiveConfig::default().with_rewards(33.0, 9.0, 0.0);
        let mut sel = AdaptiveSelector::new(2, 2, config.clone()).expect("valid selector");
        for _ in 0..1000 {
            sel.update(0, 0, TrialOutcome::Rejected);
        }
        for &w in sel.destroy_weights() {
            assert!(w >= config.min_weight);
        }
    }

    #[test]
    fn test_segment_renormalization_keeps_mean_one() {
        let config = AdaptiveConfig::default().with_segment_length(10);
        let mut sel = AdaptiveSelector::new(4, 4, config).expect("valid selector");
        for i in 0..10 {
            sel.update(i % 4, (i + 1) % 4, TrialOutcome::NewBest { improvement: 1.0 });
        }
        let mean: f64 =
            sel.destroy_weights().iter().sum::<f64>() / sel.destroy_weights().len() as f64;
        assert!((mean - 1.0).abs() < 1e-9, "mean weight {mean} after renormalization");
    }

    #[test]
    fn test_selection_respects_compatibility() {
        let mut matrix = CompatibilityMatrix::new(2, 2);
        matrix.set(0, 1, false);
        matrix.set(1, 0, false);
        let mut sel = selector(2, 2)
            .with_compatibility(matrix.clone())
            .expect("valid matrix");

        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..300 {
            let (d, r) = sel.select(&mut rng);
            assert!(matrix.is_compatible(d, r));
            // Keep the weights moving while we check.
            sel.update(d, r, TrialOutcome::Rejected);
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(AdaptiveConfig::default().with_decay(0.0).validate().is_err());
        assert!(AdaptiveConfig::default().with_decay(1.5).validate().is_err());
        assert!(AdaptiveConfig::default()
            .with_rewards(-1.0, 0.0, 0.0)
            .validate()
            .is_err());
        assert!(AdaptiveConfig::default().with_min_weight(0.0).validate().is_err());
        assert!(AdaptiveConfig::default().validate().is_ok());
    }
}
