//! General Variable Neighborhood Search (GVNS).
//!
//! Construction once, then Variable Neighborhood Descent (VND) over an
//! ordered list of local-improvement neighborhoods, alternating with
//! shaking methods of increasing perturbation strength. An improving
//! shake+descent resets to the weakest shaking method; a failed one
//! reverts to the incumbent and escalates, wrapping around in the
//! classic VNS cycle.
//!
//! # References
//!
//! - Mladenović, N. & Hansen, P. (1997). "Variable neighborhood search",
//!   *Computers & Operations Research* 24(11), 1097-1100.
//! - Hansen, P., Mladenović, N. et al. (2017). "Variable neighborhood
//!   search: basics and variants", *EURO Journal on Computational
//!   Optimization* 5(3), 423-454.

mod runner;

pub use runner::Gvns;
