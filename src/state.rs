//! Loop state: the append-only record of evaluated observations.

use crate::error::{Error, Result};

/// One evaluated sample of the objective: an input point and its output value.
///
/// Observations are immutable once appended to a [`LoopState`]; the engine
/// never edits or removes them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    /// The input point, one value per parameter in space order.
    pub input: Vec<f64>,
    /// The objective value observed at `input`.
    pub output: f64,
}

impl Observation {
    /// Creates an observation from an input point and its output value.
    #[must_use]
    pub fn new(input: Vec<f64>, output: f64) -> Self {
        Self { input, output }
    }
}

/// The accumulating history of an optimization loop.
///
/// Owns every [`Observation`] made so far, in evaluation order. The history
/// is append-only: `update` either appends a whole batch or (on a validation
/// error) changes nothing. A state exported via [`snapshot`](Self::snapshot)
/// is sufficient to reconstruct an equivalent loop — rebuilding from history
/// is the supported way to resume optimization across processes or sessions.
///
/// # Example
///
/// ```
/// use smbo::{LoopState, Observation};
///
/// let mut state = LoopState::new(1);
/// state
///     .update(&[Observation::new(vec![0.1], 1.4), Observation::new(vec![0.6], -0.2)])
///     .unwrap();
///
/// let (inputs, outputs) = state.snapshot();
/// assert_eq!(inputs, vec![vec![0.1], vec![0.6]]);
/// assert_eq!(outputs, vec![1.4, -0.2]);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoopState {
    dimension: usize,
    observations: Vec<Observation>,
    rounds: usize,
}

impl LoopState {
    /// Creates an empty state for points of the given dimensionality.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            observations: Vec::new(),
            rounds: 0,
        }
    }

    /// Creates a state pre-seeded with an initial design.
    ///
    /// Seed observations do not count as update rounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CountMismatch`] when `inputs` and `outputs` have
    /// different lengths and [`Error::ShapeMismatch`] when any input's
    /// dimensionality disagrees with `dimension`.
    pub fn with_history(dimension: usize, inputs: &[Vec<f64>], outputs: &[f64]) -> Result<Self> {
        if inputs.len() != outputs.len() {
            return Err(Error::CountMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
        let mut state = Self::new(dimension);
        let observations: Vec<Observation> = inputs
            .iter()
            .zip(outputs)
            .map(|(x, &y)| Observation::new(x.clone(), y))
            .collect();
        state.append_validated(&observations)?;
        Ok(state)
    }

    /// Appends a batch of observations to the history.
    ///
    /// The whole batch is validated before anything is appended, so a failed
    /// update leaves the state exactly as it was. An empty batch is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] when any observation's input
    /// dimensionality disagrees with the state's dimension.
    pub fn update(&mut self, observations: &[Observation]) -> Result<()> {
        if observations.is_empty() {
            return Ok(());
        }
        self.append_validated(observations)?;
        self.rounds += 1;
        Ok(())
    }

    fn append_validated(&mut self, observations: &[Observation]) -> Result<()> {
        for obs in observations {
            if obs.input.len() != self.dimension {
                return Err(Error::ShapeMismatch {
                    expected: self.dimension,
                    got: obs.input.len(),
                });
            }
        }
        self.observations.extend_from_slice(observations);
        Ok(())
    }

    /// Returns the full history in evaluation order.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Returns the full `(inputs, outputs)` history in evaluation order.
    ///
    /// The returned arrays are owned copies, safe to hand to a surrogate
    /// model for refitting or to a caller for reconstructing an equivalent
    /// loop.
    #[must_use]
    pub fn snapshot(&self) -> (Vec<Vec<f64>>, Vec<f64>) {
        let inputs = self.observations.iter().map(|o| o.input.clone()).collect();
        let outputs = self.observations.iter().map(|o| o.output).collect();
        (inputs, outputs)
    }

    /// Returns the number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns `true` if no observations have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Returns the dimensionality of the state's input points.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the number of update rounds applied since construction.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Returns the observation with the lowest output value, if any.
    #[must_use]
    pub fn best(&self) -> Option<&Observation> {
        self.observations
            .iter()
            .min_by(|a, b| a.output.partial_cmp(&b.output).unwrap_or(core::cmp::Ordering::Equal))
    }
}
