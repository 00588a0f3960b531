#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]

//! Sequential model-based (Bayesian) optimization with an externally
//! drivable, resumable outer loop.
//!
//! The engine suggests where to sample an unknown, expensive-to-evaluate
//! function; the caller evaluates the suggestions wherever it likes —
//! in-process, on a cluster, by running a physical experiment — and feeds
//! the results back. Each round the loop refits a probabilistic surrogate on
//! the full history and maximizes an acquisition function over the parameter
//! space to propose the next point(s).
//!
//! # Getting started
//!
//! ```
//! use smbo::model::GaussianProcess;
//! use smbo::optimizer::MultiStartOptimizer;
//! use smbo::space::{Parameter, ParameterSpace};
//! use smbo::stopping::FixedIterations;
//! use smbo::OptimizationLoop;
//!
//! let space = ParameterSpace::new(vec![Parameter::continuous("x", 0.0, 1.0)]).unwrap();
//!
//! let mut opt = OptimizationLoop::builder(space, GaussianProcess::new())
//!     .optimizer(MultiStartOptimizer::with_seed(42))
//!     .seed_history(vec![vec![0.1], vec![0.6], vec![0.9]], vec![0.0625, 0.0625, 0.3025])
//!     .build()
//!     .unwrap();
//!
//! opt.run_to_completion(|x: &[f64]| (x[0] - 0.35).powi(2), FixedIterations(5))
//!     .unwrap();
//!
//! assert_eq!(opt.state().len(), 8);
//! let best = opt.best().unwrap();
//! assert!(best.output <= 0.0625);
//! ```
//!
//! # Driving the loop externally
//!
//! [`OptimizationLoop::get_next_points`] proposes a batch and pauses the
//! loop; evaluation happens entirely outside, and the results come back with
//! the next call. The full history is exportable at any time and a new loop
//! seeded from it continues seamlessly — the loop is a value, not a
//! process-wide singleton.
//!
//! # Core concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`OptimizationLoop`] | Orchestrates update → refit → acquisition maximization → proposal. |
//! | [`space::ParameterSpace`] | The search domain: continuous, discrete, and categorical dimensions. |
//! | [`LoopState`] | Append-only `(input, output)` history; exportable, rebuildable. |
//! | [`model::SurrogateModel`] | Fit/predict contract the loop needs from a probabilistic model. |
//! | [`acquisition::AcquisitionFunction`] | Scores candidate points; higher is better; composable. |
//! | [`optimizer::AcquisitionOptimizer`] | Solves the acquisition-maximization sub-problem. |
//! | [`batch::BatchStrategy`] | Fantasize or penalize for jointly useful k-point proposals. |
//!
//! # Feature flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `gp` | [`model::GaussianProcess`] — Matérn 5/2 surrogate via `nalgebra` | **on** |
//! | `serde` | `Serialize`/`Deserialize` on history and space types | off |
//! | `tracing` | Structured log events at key loop points | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

pub mod acquisition;
pub mod batch;
mod error;
pub mod model;
pub mod optimizer;
mod outer_loop;
mod rng_util;
pub mod space;
mod state;
pub mod stopping;
mod user_function;

pub use error::{Error, Result};
pub use outer_loop::{LoopBuilder, LoopPhase, OptimizationLoop};
pub use state::{LoopState, Observation};
pub use user_function::{UserFunction, UserFunctionWrapper};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use smbo::prelude::*;
/// ```
pub mod prelude {
    pub use crate::acquisition::{
        AcquisitionFunction, ExpectedImprovement, NegativeLowerConfidenceBound,
        ProbabilityOfImprovement,
    };
    pub use crate::batch::{BatchStrategy, Lie};
    pub use crate::error::{Error, Result};
    #[cfg(feature = "gp")]
    pub use crate::model::GaussianProcess;
    pub use crate::model::{Prediction, SurrogateModel};
    pub use crate::optimizer::{AcquisitionOptimizer, MultiStartOptimizer};
    pub use crate::outer_loop::{LoopBuilder, LoopPhase, OptimizationLoop};
    pub use crate::space::{Parameter, ParameterKind, ParameterSpace};
    pub use crate::state::{LoopState, Observation};
    pub use crate::stopping::{ConvergenceThreshold, FixedIterations, StoppingCondition};
    pub use crate::user_function::{UserFunction, UserFunctionWrapper};
}
