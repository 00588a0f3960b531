//! Probability of Improvement acquisition.

use crate::acquisition::AcquisitionFunction;
use crate::acquisition::normal::norm_cdf;
use crate::model::SurrogateModel;

const MIN_STD: f64 = 1e-12;

/// Probability of improving over the incumbent.
///
/// `PI(x) = Φ((f_best - μ - ξ) / σ)`. Greedier than
/// [`ExpectedImprovement`](crate::acquisition::ExpectedImprovement) — it
/// counts any improvement equally, however small — so a positive jitter `ξ`
/// is usually wanted.
#[derive(Clone, Copy, Debug)]
pub struct ProbabilityOfImprovement {
    jitter: f64,
}

impl ProbabilityOfImprovement {
    /// Creates a PI acquisition with no jitter.
    #[must_use]
    pub fn new() -> Self {
        Self { jitter: 0.0 }
    }

    /// Creates a PI acquisition with the given exploration jitter.
    #[must_use]
    pub fn with_jitter(jitter: f64) -> Self {
        Self { jitter }
    }
}

impl Default for ProbabilityOfImprovement {
    fn default() -> Self {
        Self::new()
    }
}

impl AcquisitionFunction for ProbabilityOfImprovement {
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
                    return if improvement > 0.0 { 1.0 } else { 0.0 };
                }
                norm_cdf(improvement / std)
            })
            .collect()
    }
}
