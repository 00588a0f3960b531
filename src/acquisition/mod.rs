//! Acquisition functions: where is it worth evaluating next?
//!
//! An acquisition function scores candidate points from the surrogate's
//! predictions — **higher is better** — balancing exploitation (low predicted
//! mean) against exploration (high predictive uncertainty). Scores must be
//! finite for every valid in-space point; degenerate variance at
//! already-observed points is special-cased inside each function, never by
//! the loop.
//!
//! Acquisitions compose: [`plus`](AcquisitionFunction::plus) and
//! [`times`](AcquisitionFunction::times) build [`Sum`] and [`Product`]
//! combinations that still satisfy the higher-is-better contract.
//!
//! # Example
//!
//! ```
//! use smbo::acquisition::{AcquisitionFunction, ExpectedImprovement, NegativeLowerConfidenceBound};
//! use smbo::model::{GaussianProcess, SurrogateModel};
//!
//! let mut gp = GaussianProcess::new();
//! gp.fit(&[vec![0.1], vec![0.9]], &[1.0, 0.5]).unwrap();
//!
//! let acq = ExpectedImprovement::new().plus(NegativeLowerConfidenceBound::new());
//! let scores = acq.evaluate(&gp, 0.5, &[vec![0.2], vec![0.5]]);
//! assert!(scores.iter().all(|s| s.is_finite()));
//! ```

mod confidence_bound;
mod expected_improvement;
mod normal;
mod probability_of_improvement;

pub use confidence_bound::NegativeLowerConfidenceBound;
pub use expected_improvement::ExpectedImprovement;
pub use probability_of_improvement::ProbabilityOfImprovement;

use crate::model::SurrogateModel;

/// Scores candidate points under the current surrogate model.
///
/// Implementations are pure functions of the model, the incumbent, and the
/// points: no hidden state, no NaN for valid in-space inputs. `incumbent` is
/// the lowest output observed so far (`f64::INFINITY` when nothing has been
/// observed), which exploration-only acquisitions are free to ignore.
pub trait AcquisitionFunction: Send + Sync {
    /// Returns one score per point; higher is better.
    fn evaluate(
        &self,
        model: &dyn SurrogateModel,
        incumbent: f64,
        points: &[Vec<f64>],
    ) -> Vec<f64>;

    /// Combines two acquisitions by summing their scores.
    fn plus<B: AcquisitionFunction>(self, other: B) -> Sum<Self, B>
    where
        Self: Sized,
    {
        Sum(self, other)
    }

    /// Combines two acquisitions by multiplying their scores.
    fn times<B: AcquisitionFunction>(self, other: B) -> Product<Self, B>
    where
        Self: Sized,
    {
        Product(self, other)
    }
}

/// Point-wise sum of two acquisition functions.
pub struct Sum<A, B>(pub A, pub B);

impl<A: AcquisitionFunction, B: AcquisitionFunction> AcquisitionFunction for Sum<A, B> {
    fn evaluate(
        &self,
        model: &dyn SurrogateModel,
        incumbent: f64,
        points: &[Vec<f64>],
    ) -> Vec<f64> {
        let a = self.0.evaluate(model, incumbent, points);
        let b = self.1.evaluate(model, incumbent, points);
        a.into_iter().zip(b).map(|(x, y)| x + y).collect()
    }
}

/// Point-wise product of two acquisition functions.
pub struct Product<A, B>(pub A, pub B);

impl<A: AcquisitionFunction, B: AcquisitionFunction> AcquisitionFunction for Product<A, B> {
    fn evaluate(
        &self,
        model: &dyn SurrogateModel,
        incumbent: f64,
        points: &[Vec<f64>],
    ) -> Vec<f64> {
        let a = self.0.evaluate(model, incumbent, points);
        let b = self.1.evaluate(model, incumbent, points);
        a.into_iter().zip(b).map(|(x, y)| x * y).collect()
    }
}
