//! Large Neighborhood Search (LNS).
//!
//! After construction, the driver repeatedly asks a [`MethodSelector`]
//! for a compatible (destroy, repair) pair, applies both to a working
//! copy of the incumbent, and accepts the copy when it is better than
//! **or equally good as** the incumbent — plateau drift is what
//! separates LNS from plain hill-climbing. Rejected trials are simply
//! dropped; the incumbent is never half-mutated. The selector is
//! notified of every trial outcome, accepted or not.
//!
//! # References
//!
//! - Shaw, P. (1998). "Using constraint programming and local search
//!   methods to solve vehicle routing problems", *CP 1998*, 417-431.
//! - Pisinger, D. & Ropke, S. (2010). "Large neighborhood search",
//!   *Handbook of Metaheuristics*, 399-419.

mod runner;
mod selector;

pub use runner::Lns;
pub use selector::{
    CompatibilityMatrix, MethodSelector, TrialOutcome, UniformSelector, WeightedSelector,
};

pub(crate) use selector::roulette;
