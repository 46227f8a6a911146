//! Method descriptors and their per-application result record.
//!
//! A [`Method`] is an immutable named binding of a mutation operation to
//! a numeric parameter. The same descriptor shape is used for all five
//! method kinds — construction, local improvement, shaking, destroy and
//! repair — which differ only by contract:
//!
//! - **Construction** fully initializes the representation and leaves
//!   the objective cache valid or explicitly invalidated.
//! - **Local improvement** mutates toward a better objective within one
//!   neighborhood; when no improving move remains it sets
//!   [`MethodResult::is_local_optimum`].
//! - **Shaking** applies a randomized perturbation whose strength is
//!   governed by the parameter and always leaves `changed` set.
//! - **Destroy** removes part of the solution and records what was
//!   removed; **repair** fills it back in, and must fail loudly (panic)
//!   rather than silently no-op when nothing was destroyed.

use rand::RngCore;
use std::fmt;

/// Outcome channel written by a method application.
///
/// Created fresh by the scheduler for every application and read back
/// immediately afterwards; never retained across invocations.
///
/// `changed` starts out **true**: a method that leaves the solution
/// untouched must clear it, so that a forgotten write errs on the side
/// of re-evaluation rather than a missed improvement.
#[derive(Debug, Clone, Copy)]
pub struct MethodResult {
    /// Whether the method modified the solution.
    pub changed: bool,
    /// Whether the whole run must terminate now.
    pub terminate: bool,
    /// Whether the reached state is a local optimum with respect to the
    /// method just applied.
    pub is_local_optimum: bool,
}

impl MethodResult {
    /// A fresh record: changed, not terminating, not a local optimum.
    pub fn new() -> Self {
        Self {
            changed: true,
            terminate: false,
            is_local_optimum: false,
        }
    }
}

impl Default for MethodResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Operation signature shared by all method kinds.
///
/// Arguments: the solution to mutate, the method's parameter, the run's
/// seeded random source, and the result record to fill in.
pub type MethodOp<S> = dyn Fn(&mut S, f64, &mut dyn RngCore, &mut MethodResult) + Send + Sync;

/// An immutable named binding of an operation to a numeric parameter.
///
/// Ordered lists of these are owned by the algorithm drivers and applied
/// through the scheduler, which keys per-method statistics by `name`.
///
/// # Examples
///
/// ```
/// use mh_engine::method::Method;
/// use rand::Rng;
///
/// // Shake k positions of a boolean vector (contract: always changed).
/// let shake = Method::<Vec<bool>>::new("sh1", 1.0, |sol, par, rng, _res| {
///     for _ in 0..par as usize {
///         let i = rng.random_range(0..sol.len());
///         sol[i] = !sol[i];
///     }
/// });
/// assert_eq!(shake.name(), "sh1");
/// ```
pub struct Method<S> {
    name: String,
    parameter: f64,
    op: Box<MethodOp<S>>,
}

impl<S> Method<S> {
    /// Creates a method descriptor. Methods without a meaningful
    /// parameter conventionally receive `0.0`.
    pub fn new<F>(name: impl Into<String>, parameter: f64, op: F) -> Self
    where
        F: Fn(&mut S, f64, &mut dyn RngCore, &mut MethodResult) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            parameter,
            op: Box::new(op),
        }
    }

    /// The name this method's statistics are keyed by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound numeric parameter.
    pub fn parameter(&self) -> f64 {
        self.parameter
    }

    /// Applies the bound operation.
    pub(crate) fn apply(&self, sol: &mut S, rng: &mut dyn RngCore, res: &mut MethodResult) {
        (self.op)(sol, self.parameter, rng, res);
    }
}

impl<S> fmt::Debug for Method<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("parameter", &self.parameter)
            .finish_non_exhaustive()
    }
}
