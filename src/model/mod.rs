//! The surrogate model contract.
//!
//! The optimization loop treats the probabilistic model as an external
//! collaborator: all it needs is "fit to observed data" and "predict mean and
//! variance at query points". Any model satisfying [`SurrogateModel`] plugs
//! in — the crate ships a Gaussian process implementation behind the `gp`
//! feature (on by default), and callers with their own model (random forest,
//! Student-t process, …) implement the trait themselves.

#[cfg(feature = "gp")]
pub mod gp;

#[cfg(feature = "gp")]
pub use gp::{GaussianProcess, GaussianProcessBuilder};

use crate::error::Result;

/// A predictive mean and variance at a single query point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prediction {
    /// Predictive mean, in original output units.
    pub mean: f64,
    /// Predictive variance, in original output units squared. Never negative.
    pub variance: f64,
}

impl Prediction {
    /// Returns the predictive standard deviation.
    #[must_use]
    pub fn std(&self) -> f64 {
        self.variance.max(0.0).sqrt()
    }
}

/// Contract between the optimization loop and a probabilistic surrogate.
///
/// # Fitting
///
/// [`fit`](Self::fit) (re)trains on the full current history. The loop calls
/// it once per round with everything observed so far; retraining from scratch
/// each time is the tolerated default, and an implementation may keep
/// previous hyperparameters as a warm start but is not required to.
///
/// # Prediction
///
/// [`predict`](Self::predict) must be defined over the entire parameter
/// space, including unobserved regions — that is what lets acquisition
/// functions quantify uncertainty. Models that have not been fit yet report
/// their prior.
pub trait SurrogateModel: Send + Sync {
    /// (Re)trains the model on the full history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelFit`](crate::Error::ModelFit) when the model
    /// cannot be fit — too few observations, or degenerate/duplicate inputs
    /// that break the numerics. A failed fit must leave any previously
    /// fitted state usable.
    fn fit(&mut self, inputs: &[Vec<f64>], outputs: &[f64]) -> Result<()>;

    /// Predicts mean and variance at each query point.
    fn predict(&self, points: &[Vec<f64>]) -> Vec<Prediction>;
}
