//! Expected Improvement acquisition.

use crate::acquisition::AcquisitionFunction;
use crate::acquisition::normal::{norm_cdf, norm_pdf};
use crate::model::SurrogateModel;

/// Variance below this is treated as an already-observed, noiseless point.
const MIN_STD: f64 = 1e-12;

/// Expected Improvement over the incumbent.
///
/// `EI(x) = (f_best - μ - ξ) Φ(z) + σ φ(z)` with `z = (f_best - μ - ξ) / σ`,
/// where `ξ` is an optional jitter encouraging exploration. At points with
/// near-zero predictive variance the expression degenerates; the score is
/// clipped to `max(f_best - μ - ξ, 0)` there, keeping it finite and
/// comparable.
///
/// With no incumbent yet (`f_best = ∞`), the score falls back to the
/// predictive standard deviation — pure exploration.
#[derive(Clone, Copy, Debug)]
pub struct ExpectedImprovement {
    jitter: f64,
}

impl ExpectedImprovement {
    /// Creates an EI acquisition with no jitter.
    #[must_use]
    pub fn new() -> Self {
        Self { jitter: 0.0 }
    }

    /// Creates an EI acquisition with the given exploration jitter.
    #[must_use]
    pub fn with_jitter(jitter: f64) -> Self {
        Self { jitter }
    }
}

impl Default for ExpectedImprovement {
    fn default() -> Self {
        Self::new()
    }
}

impl AcquisitionFunction for ExpectedImprovement {
    fn evaluate(
        &self,
        model: &dyn SurrogateModel,
        incumbent: f64,
        points: &[Vec<f64>],
    ) -> Vec<f64> {
        model
            .predict(points)
            .iter()
            .map(|pred| {
                let std = pred.std();
                if !incumbent.is_finite() {
                    return std;
                }
                let improvement = incumbent - pred.mean - self.jitter;
                if std < MIN_STD {
                    return improvement.max(0.0);
                }
                let z = improvement / std;
                (improvement * norm_cdf(z) + std * norm_pdf(z)).max(0.0)
            })
            .collect()
    }
}
