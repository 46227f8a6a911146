//! Solution contract consumed by the scheduler and all drivers.
//!
//! A candidate solution exposes a lazily cached objective value, a deep
//! copy (`Clone`), objective-based comparison in a fixed optimization
//! sense, and an optional consistency check. Concrete representations
//! (boolean vectors, permutations, subsets, ...) are defined by
//! consumers; the engine only ever talks to this trait.

/// Cached objective value with a validity flag.
///
/// Embedded by value in every [`Solution`] implementor. Whenever the
/// underlying representation changes, the cache must be invalidated
/// before control returns to the scheduler; [`Solution::objective`]
/// recomputes lazily and revalidates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveCache {
    value: f64,
    valid: bool,
}

impl ObjectiveCache {
    /// Creates an invalid (empty) cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value, or `None` when invalid.
    pub fn get(&self) -> Option<f64> {
        self.valid.then_some(self.value)
    }

    /// Stores a freshly computed value and marks the cache valid.
    pub fn set(&mut self, value: f64) {
        self.value = value;
        self.valid = true;
    }

    /// Marks the cache invalid.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Whether the cache currently holds a valid value.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Capability set a candidate solution must expose to the engine.
///
/// `Clone` is the deep-copy operation: copies must be fully independent,
/// with no aliasing of internal mutable buffers.
///
/// # Objective caching
///
/// Implementors embed an [`ObjectiveCache`] and expose it through the
/// two accessor methods; `objective`/`invalidate` are provided on top.
/// Any mutation of the representation must be followed by
/// [`invalidate`](Solution::invalidate) before the method returns
/// control to the scheduler.
///
/// # Examples
///
/// ```
/// use mh_engine::solution::{ObjectiveCache, Solution};
///
/// #[derive(Clone)]
/// struct OneMax {
///     bits: Vec<bool>,
///     cache: ObjectiveCache,
/// }
///
/// impl Solution for OneMax {
///     const TO_MAXIMIZE: bool = true;
///     fn objective_cache(&self) -> &ObjectiveCache { &self.cache }
///     fn objective_cache_mut(&mut self) -> &mut ObjectiveCache { &mut self.cache }
///     fn compute_objective(&self) -> f64 {
///         self.bits.iter().filter(|&&b| b).count() as f64
///     }
/// }
///
/// let mut sol = OneMax { bits: vec![true, false, true], cache: ObjectiveCache::new() };
/// assert_eq!(sol.objective(), 2.0);
/// sol.bits[1] = true;
/// sol.invalidate();
/// assert_eq!(sol.objective(), 3.0);
/// ```
pub trait Solution: Clone {
    /// Optimization sense, fixed per solution class.
    const TO_MAXIMIZE: bool;

    /// Read access to the embedded objective cache.
    fn objective_cache(&self) -> &ObjectiveCache;

    /// Mutable access to the embedded objective cache.
    fn objective_cache_mut(&mut self) -> &mut ObjectiveCache;

    /// Full from-scratch objective computation.
    fn compute_objective(&self) -> f64;

    /// Returns the objective value, recomputing lazily when the cache
    /// is invalid and revalidating it afterwards.
    fn objective(&mut self) -> f64 {
        match self.objective_cache().get() {
            Some(v) => v,
            None => {
                let v = self.compute_objective();
                self.objective_cache_mut().set(v);
                v
            }
        }
    }

    /// Marks the cached objective stale. Must be called after every
    /// representation change.
    fn invalidate(&mut self) {
        self.objective_cache_mut().invalidate();
    }

    /// Whether `self` is strictly better than `other` in this class's
    /// optimization sense.
    fn is_better(&mut self, other: &mut Self) -> bool {
        let (a, b) = (self.objective(), other.objective());
        if Self::TO_MAXIMIZE {
            a > b
        } else {
            a < b
        }
    }

    /// Whether `self` and `other` are equally good.
    ///
    /// Objective-based by default; implementors may override with
    /// representation equality when objective ties must be
    /// distinguished.
    fn is_equal(&mut self, other: &mut Self) -> bool {
        self.objective() == other.objective()
    }

    /// Consistency check on the representation and objective cache.
    ///
    /// Returns a description of the first violation found. The
    /// scheduler runs this after every changing method application in
    /// debug builds and treats a failure as a programmer error.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Bounds on how many elements a destroy/perturbation method may touch.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DestroyLimits {
    /// Absolute lower bound on the count.
    pub min_abs: usize,
    /// Absolute upper bound on the count.
    pub max_abs: usize,
    /// Lower bound as a fraction of the representation size.
    pub min_ratio: f64,
    /// Upper bound as a fraction of the representation size.
    pub max_ratio: f64,
}

impl Default for DestroyLimits {
    fn default() -> Self {
        Self {
            min_abs: 1,
            max_abs: usize::MAX,
            min_ratio: 0.0,
            max_ratio: 1.0,
        }
    }
}

/// Number of elements a destroy/flip method should touch.
///
/// `requested < 1.0` is interpreted as a fraction of `size`, anything
/// else as an absolute count. The result is clamped by the effective
/// lower bound `max(min_abs, min_ratio * size)`, the effective upper
/// bound `min(max_abs, max_ratio * size)`, and by `size` itself. When
/// the bounds cross, the lower bound wins. Pure; reusable across
/// problem types.
///
/// # Examples
///
/// ```
/// use mh_engine::solution::{destroy_count, DestroyLimits};
///
/// let limits = DestroyLimits { min_abs: 2, max_abs: 10, ..Default::default() };
/// assert_eq!(destroy_count(100, 0.05, limits), 5);
/// assert_eq!(destroy_count(100, 0.001, limits), 2); // floored by min_abs
/// assert_eq!(destroy_count(100, 40.0, limits), 10); // capped by max_abs
/// ```
pub fn destroy_count(size: usize, requested: f64, limits: DestroyLimits) -> usize {
    if size == 0 {
        return 0;
    }
    let n = size as f64;
    let base = if requested < 1.0 { requested * n } else { requested };
    let lower = (limits.min_abs as f64).max(limits.min_ratio * n).min(n);
    let mut upper = (limits.max_abs as f64).min(limits.max_ratio * n).min(n);
    if upper < lower {
        upper = lower;
    }
    base.round().clamp(lower, upper) as usize
}
