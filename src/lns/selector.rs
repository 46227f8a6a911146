//! Destroy/repair method selection policies.

use rand::RngCore;

/// Outcome of one destroy+repair trial, as seen by the selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrialOutcome {
    /// The trial strictly improved on the incumbent.
    NewBest {
        /// Positive objective gain, in the solution's sense.
        improvement: f64,
    },
    /// The trial tied the incumbent and was accepted (plateau drift).
    Accepted,
    /// The trial was worse and discarded.
    Rejected,
}

/// Restricts which repair method may follow which destroy method.
///
/// All pairs are allowed by default; forbid entries to constrain the
/// selection. Every destroy method must keep at least one compatible
/// repair, enforced by [`validate`](CompatibilityMatrix::validate) at
/// selector construction.
#[derive(Debug, Clone)]
pub struct CompatibilityMatrix {
    num_destroy: usize,
    num_repair: usize,
    allowed: Vec<bool>,
}

impl CompatibilityMatrix {
    /// An all-allowed matrix of the given dimensions.
    pub fn new(num_destroy: usize, num_repair: usize) -> Self {
        Self {
            num_destroy,
            num_repair,
            allowed: vec![true; num_destroy * num_repair],
        }
    }

    /// Builds a matrix from explicit rows (one per destroy method).
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, String> {
        let num_destroy = rows.len();
        let num_repair = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != num_repair) {
            return Err("compatibility rows must all have the same length".into());
        }
        let matrix = Self {
            num_destroy,
            num_repair,
            allowed: rows.into_iter().flatten().collect(),
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Allows or forbids one destroy×repair pair.
    pub fn set(&mut self, destroy: usize, repair: usize, allowed: bool) {
        self.allowed[destroy * self.num_repair + repair] = allowed;
    }

    /// Whether `repair` may follow `destroy`.
    pub fn is_compatible(&self, destroy: usize, repair: usize) -> bool {
        self.allowed[destroy * self.num_repair + repair]
    }

    /// Indices of the repairs compatible with `destroy`.
    pub fn compatible_repairs(&self, destroy: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_repair).filter(move |&r| self.is_compatible(destroy, r))
    }

    /// Checks that the matrix leaves every destroy method usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_destroy == 0 || self.num_repair == 0 {
            return Err("compatibility matrix must not be empty".into());
        }
        for d in 0..self.num_destroy {
            if self.compatible_repairs(d).next().is_none() {
                return Err(format!("destroy method {d} has no compatible repair"));
            }
        }
        Ok(())
    }

    pub(crate) fn dims(&self) -> (usize, usize) {
        (self.num_destroy, self.num_repair)
    }
}

/// Policy object choosing the next (destroy, repair) pair.
///
/// Implementations own whatever weights or history they need; the
/// driver calls [`update`](MethodSelector::update) after every trial
/// regardless of acceptance, so adaptive variants can learn from
/// rejections too. `select` must never return an incompatible pair.
pub trait MethodSelector: Send {
    /// Number of destroy methods selectable.
    fn num_destroy(&self) -> usize;

    /// Number of repair methods selectable.
    fn num_repair(&self) -> usize;

    /// Chooses the next (destroy, repair) index pair.
    fn select(&mut self, rng: &mut dyn RngCore) -> (usize, usize);

    /// Observes the outcome of the trial that used `destroy`/`repair`.
    fn update(&mut self, _destroy: usize, _repair: usize, _outcome: TrialOutcome) {}
}

/// Roulette wheel over `(index, weight)` candidates.
///
/// All-zero weights degrade to a uniform pick so no candidate starves.
pub(crate) fn roulette(candidates: &[(usize, f64)], rng: &mut dyn RngCore) -> usize {
    use rand::Rng as _;
    let total: f64 = candidates.iter().map(|&(_, w)| w).sum();
    if total <= 0.0 {
        return candidates[rng.random_range(0..candidates.len())].0;
    }
    let mut roll = rng.random_range(0.0..total);
    for &(i, w) in candidates {
        roll -= w;
        if roll <= 0.0 {
            return i;
        }
    }
    candidates[candidates.len() - 1].0
}

fn check_dims(
    num_destroy: usize,
    num_repair: usize,
    compat: Option<&CompatibilityMatrix>,
) -> Result<(), String> {
    if num_destroy == 0 || num_repair == 0 {
        return Err("selector needs at least one destroy and one repair method".into());
    }
    if let Some(matrix) = compat {
        if matrix.dims() != (num_destroy, num_repair) {
            return Err(format!(
                "compatibility matrix is {:?}, expected ({num_destroy}, {num_repair})",
                matrix.dims()
            ));
        }
        matrix.validate()?;
    }
    Ok(())
}

/// Uniform-random pair selection.
#[derive(Debug)]
pub struct UniformSelector {
    num_destroy: usize,
    num_repair: usize,
    compat: Option<CompatibilityMatrix>,
}

impl UniformSelector {
    /// Creates a uniform selector over the given list sizes.
    pub fn new(num_destroy: usize, num_repair: usize) -> Result<Self, String> {
        check_dims(num_destroy, num_repair, None)?;
        Ok(Self {
            num_destroy,
            num_repair,
            compat: None,
        })
    }

    /// Restricts selection to the pairs the matrix allows.
    pub fn with_compatibility(mut self, matrix: CompatibilityMatrix) -> Result<Self, String> {
        check_dims(self.num_destroy, self.num_repair, Some(&matrix))?;
        self.compat = Some(matrix);
        Ok(self)
    }
}

impl MethodSelector for UniformSelector {
    fn num_destroy(&self) -> usize {
        self.num_destroy
    }

    fn num_repair(&self) -> usize {
        self.num_repair
    }

    fn select(&mut self, rng: &mut dyn RngCore) -> (usize, usize) {
        use rand::Rng as _;
        let destroy = rng.random_range(0..self.num_destroy);
        let repair = match &self.compat {
            Some(matrix) => {
                let repairs: Vec<usize> = matrix.compatible_repairs(destroy).collect();
                repairs[rng.random_range(0..repairs.len())]
            }
            None => rng.random_range(0..self.num_repair),
        };
        (destroy, repair)
    }
}

/// Weighted-random selection with fixed weights supplied once at
/// construction (e.g. proportional to inverse destroy strength).
#[derive(Debug)]
pub struct WeightedSelector {
    destroy_weights: Vec<f64>,
    repair_weights: Vec<f64>,
    compat: Option<CompatibilityMatrix>,
}

impl WeightedSelector {
    /// Creates a fixed-weight selector. Weights must be finite,
    /// non-negative and not all zero per list.
    pub fn new(destroy_weights: Vec<f64>, repair_weights: Vec<f64>) -> Result<Self, String> {
        check_dims(destroy_weights.len(), repair_weights.len(), None)?;
        for (kind, weights) in [("destroy", &destroy_weights), ("repair", &repair_weights)] {
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(format!("{kind} weights must be finite and non-negative"));
            }
            if weights.iter().sum::<f64>() <= 0.0 {
                return Err(format!("{kind} weights must not all be zero"));
            }
        }
        Ok(Self {
            destroy_weights,
            repair_weights,
            compat: None,
        })
    }

    /// Restricts selection to the pairs the matrix allows.
    pub fn with_compatibility(mut self, matrix: CompatibilityMatrix) -> Result<Self, String> {
        check_dims(
            self.destroy_weights.len(),
            self.repair_weights.len(),
            Some(&matrix),
        )?;
        self.compat = Some(matrix);
        Ok(self)
    }
}

impl MethodSelector for WeightedSelector {
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_uniform_rejects_empty_lists() {
        assert!(UniformSelector::new(0, 2).is_err());
        assert!(UniformSelector::new(2, 0).is_err());
    }

    #[test]
    fn test_compatibility_never_violated() {
        let mut matrix = CompatibilityMatrix::new(3, 3);
        matrix.set(0, 0, false);
        matrix.set(0, 2, false);
        matrix.set(2, 1, false);
        let mut selector = UniformSelector::new(3, 3)
            .expect("valid dims")
            .with_compatibility(matrix.clone())
            .expect("valid matrix");

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let (d, r) = selector.select(&mut rng);
            assert!(matrix.is_compatible(d, r), "({d}, {r}) is incompatible");
        }
    }

    #[test]
    fn test_matrix_with_dead_destroy_row_fails() {
        let rows = vec![vec![true, true], vec![false, false]];
        assert!(CompatibilityMatrix::from_rows(rows).is_err());
    }

    #[test]
    fn test_matrix_dimension_mismatch_fails() {
        let matrix = CompatibilityMatrix::new(2, 2);
        let selector = UniformSelector::new(3, 2).expect("valid dims");
        assert!(selector.with_compatibility(matrix).is_err());
    }

    #[test]
    fn test_weighted_zero_weight_never_selected() {
        let mut selector = WeightedSelector::new(vec![1.0, 0.0, 2.0], vec![0.0, 1.0])
            .expect("valid weights");
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let (d, r) = selector.select(&mut rng);
            assert_ne!(d, 1);
            assert_eq!(r, 1);
        }
    }

    #[test]
    fn test_weighted_rejects_bad_weights() {
        assert!(WeightedSelector::new(vec![0.0, 0.0], vec![1.0]).is_err());
        assert!(WeightedSelector::new(vec![1.0, -1.0], vec![1.0]).is_err());
        assert!(WeightedSelector::new(vec![f64::NAN], vec![1.0]).is_err());
    }

    #[test]
    fn test_roulette_all_zero_falls_back_to_uniform() {
        let candidates = [(4usize, 0.0), (9usize, 0.0)];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let pick = roulette(&candidates, &mut rng);
            assert!(pick == 4 || pick == 9);
        }
    }
}
