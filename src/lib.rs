//! Trajectory-based metaheuristic engine.
//!
//! Provides a generic method-scheduling core for single-trajectory
//! metaheuristics, plus three algorithm drivers built on top of it:
//!
//! - **Scheduler**: the generic iteration engine — applies named,
//!   parameterized methods to a mutable candidate solution, measures
//!   wall-clock cost per method, tracks per-method statistics, and
//!   enforces iteration/time budgets and cooperative cancellation.
//! - **GVNS**: General Variable Neighborhood Search — construction once,
//!   then Variable Neighborhood Descent alternating with shaking of
//!   increasing strength.
//! - **LNS**: Large Neighborhood Search — destroy/repair method pairs
//!   chosen by a pluggable method selector, with better-or-equal
//!   acceptance against the incumbent.
//! - **ALNS**: Adaptive LNS — the same driver parameterized with an
//!   adaptive selector whose weights are reinforced by observed
//!   performance.
//!
//! # Architecture
//!
//! The crate is problem-agnostic: satisfiability formulas, tours,
//! packings and the like live entirely in consumer code. A problem type
//! implements the [`solution::Solution`] contract (cached objective,
//! deep copy, comparison, consistency check) and supplies its move
//! operators as [`method::Method`] values; the drivers never see
//! anything else. The engine is single-trajectory and single-threaded
//! by design; all randomized choices draw from one seeded generator
//! owned by the run, so a fixed seed reproduces a run end-to-end.

pub mod alns;
pub mod gvns;
pub mod lns;
pub mod method;
pub mod scheduler;
pub mod solution;
