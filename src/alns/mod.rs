//! Adaptive Large Neighborhood Search (ALNS).
//!
//! Structurally identical to [`crate::lns`] — the two share one driver —
//! but parameterized with an [`AdaptiveSelector`] whose destroy/repair
//! weights are reinforced by observed trial performance: a decaying
//! running score per method, rewarded most for new-best solutions,
//! less for accepted ties, and near-zero for rejections, with periodic
//! segment renormalization.
//!
//! # References
//!
//! Ropke, S. & Pisinger, D. (2006). "An adaptive large neighborhood
//! search heuristic for the pickup and delivery problem with time
//! windows", *Transportation Science* 40(4), 455-472.

mod selector;

pub use selector::{AdaptiveConfig, AdaptiveSelector};

use crate::lns::{CompatibilityMatrix, Lns};
use crate::method::Method;
use crate::scheduler::SchedulerConfig;
use crate::solution::Solution;

/// LNS specialized with the adaptive selector.
pub type Alns<S> = Lns<S, AdaptiveSelector>;

impl<S: Solution> Alns<S> {
    /// Creates an ALNS driver: an [`Lns`] wired to a fresh
    /// [`AdaptiveSelector`] sized for the given method lists.
    pub fn adaptive(
        initial: S,
        construction: Vec<Method<S>>,
        destroy: Vec<Method<S>>,
        repair: Vec<Method<S>>,
        adaptive: AdaptiveConfig,
        compatibility: Option<CompatibilityMatrix>,
        config: SchedulerConfig,
    ) -> Result<Self, String> {
        let mut selector = AdaptiveSelector::new(destroy.len(), repair.len(), adaptive)?;
        if let Some(matrix) = compatibility {
            selector = selector.with_compatibility(matrix)?;
        }
        Lns::new(initial, construction, destroy, repair, selector, config)
    }
}
