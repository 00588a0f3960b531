//! Negative lower confidence bound acquisition.

use crate::acquisition::AcquisitionFunction;
use crate::model::SurrogateModel;

/// Default exploration weight.
const DEFAULT_BETA: f64 = 2.0;

/// Negated lower confidence bound: `-(μ - β σ)`.
///
/// Maximizing this score drives the loop toward points that are either
/// predicted to be low or highly uncertain. `beta` trades the two off:
/// larger values explore more. Ignores the incumbent entirely.
#[derive(Clone, Copy, Debug)]
pub struct NegativeLowerConfidenceBound {
    beta: f64,
}

impl NegativeLowerConfidenceBound {
    /// Creates an LCB acquisition with the default exploration weight.
    #[must_use]
    pub fn new() -> Self {
        Self { beta: DEFAULT_BETA }
    }

    /// Creates an LCB acquisition with the given exploration weight.
    #[must_use]
    pub fn with_beta(beta: f64) -> Self {
        Self { beta }
    }
}

impl Default for NegativeLowerConfidenceBound {
    fn default() -> Self {
        Self::new()
    }
}

impl AcquisitionFunction for NegativeLowerConfidenceBound {
    fn evaluate(
        &self,
        model: &dyn SurrogateModel,
        _incumbent: f64,
        points: &[Vec<f64>],
    ) -> Vec<f64> {
        model
            .predict(points)
            .iter()
            .map(|pred| -(pred.mean - self.beta * pred.std()))
            .collect()
    }
}
