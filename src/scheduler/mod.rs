//! Generic method-scheduling engine.
//!
//! The [`Scheduler`] owns the incumbent solution, the iteration and
//! wall-clock budgets, the run's seeded random source, and one
//! statistics record per method name. Algorithm drivers (GVNS, LNS,
//! ALNS) are built entirely on its two primitives,
//! [`Scheduler::perform_method`] and [`Scheduler::perform_sequentially`].
//!
//! Termination is evaluated between method applications only: a single
//! long-running method can overrun the wall-clock budget. Methods run
//! to completion; there is no preemption channel.

mod config;
mod runner;
mod stats;

pub use config::SchedulerConfig;
pub use runner::Scheduler;
pub use stats::{MethodStats, RunResult, RunSummary};
