//! The boundary between the loop and the objective it optimizes.
//!
//! The engine never requires control of the objective: callers evaluate
//! proposed points however they like — remotely, in parallel, by hand — and
//! submit [`Observation`](crate::Observation)s back. [`UserFunction`] exists
//! for the other mode, [`run_to_completion`](crate::OptimizationLoop::run_to_completion),
//! where the loop invokes the objective itself.
//!
//! Point-wise closures work directly:
//!
//! ```
//! use smbo::UserFunction;
//!
//! let mut f = |x: &[f64]| (x[0] - 0.3).powi(2);
//! let outputs = f.evaluate(&[vec![0.1], vec![0.3]]).unwrap();
//! assert!(outputs[1] < outputs[0]);
//! ```

use crate::error::{Error, Result};

/// An objective function the loop can invoke on a proposed batch.
pub trait UserFunction {
    /// Evaluates the objective at each input point, returning one output per
    /// point in the same order.
    ///
    /// # Errors
    ///
    /// Evaluation failures surface to the caller of
    /// [`run_to_completion`](crate::OptimizationLoop::run_to_completion);
    /// the loop performs no retries.
    fn evaluate(&mut self, inputs: &[Vec<f64>]) -> Result<Vec<f64>>;
}

impl<F> UserFunction for F
where
    F: FnMut(&[f64]) -> f64,
{
    fn evaluate(&mut self, inputs: &[Vec<f64>]) -> Result<Vec<f64>> {
        Ok(inputs.iter().map(|x| self(x)).collect())
    }
}

/// Adapts a batch-at-a-time closure into a [`UserFunction`].
///
/// Use this when the objective evaluates whole batches itself (e.g. it
/// dispatches points to workers and gathers the results). The closure must
/// return exactly one output per input; a mismatch is reported as
/// [`Error::CountMismatch`].
///
/// # Examples
///
/// ```
/// use smbo::{UserFunction, UserFunctionWrapper};
///
/// let mut f = UserFunctionWrapper::new(|batch: &[Vec<f64>]| {
///     batch.iter().map(|x| x[0] * 2.0).collect()
/// });
/// assert_eq!(f.evaluate(&[vec![1.0], vec![2.0]]).unwrap(), vec![2.0, 4.0]);
/// ```
pub struct UserFunctionWrapper<F> {
    f: F,
}

impl<F> UserFunctionWrapper<F>
where
    F: FnMut(&[Vec<f64>]) -> Vec<f64>,
{
    /// Wraps a batch closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> UserFunction for UserFunctionWrapper<F>
where
    F: FnMut(&[Vec<f64>]) -> Vec<f64>,
{
    fn evaluate(&mut self, inputs: &[Vec<f64>]) -> Result<Vec<f64>> {
        let outputs = (self.f)(inputs);
        if outputs.len() != inputs.len() {
            return Err(Error::CountMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
        Ok(outputs)
    }
}
