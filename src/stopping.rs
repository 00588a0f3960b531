//! Stopping conditions for [`run_to_completion`](crate::OptimizationLoop::run_to_completion).
//!
//! A condition is consulted before each round against the current
//! [`LoopState`]. Any `Fn(&LoopState) -> bool` closure works directly;
//! [`FixedIterations`] and [`ConvergenceThreshold`] cover the common cases.

use crate::state::LoopState;

/// Decides when an automatic run is finished.
pub trait StoppingCondition {
    /// Returns `true` when the loop should stop proposing new points.
    fn should_stop(&self, state: &LoopState) -> bool;
}

impl<F> StoppingCondition for F
where
    F: Fn(&LoopState) -> bool,
{
    fn should_stop(&self, state: &LoopState) -> bool {
        self(state)
    }
}

/// Stops after a fixed number of optimization rounds.
///
/// Counts update rounds applied to the state, so a loop resumed from a seed
/// history still performs the full budget.
#[derive(Clone, Copy, Debug)]
pub struct FixedIterations(pub usize);

impl StoppingCondition for FixedIterations {
    fn should_stop(&self, state: &LoopState) -> bool {
        state.rounds() >= self.0
    }
}

/// Stops when consecutive evaluated inputs are closer than a threshold.
///
/// Compares the last two observations' input points by Euclidean distance;
/// never stops before two observations exist.
#[derive(Clone, Copy, Debug)]
pub struct ConvergenceThreshold(pub f64);

impl StoppingCondition for ConvergenceThreshold {
    fn should_stop(&self, state: &LoopState) -> bool {
        let obs = state.observations();
        let [.., prev, last] = obs else {
            return false;
        };
        let dist_sq: f64 = prev
            .input
            .iter()
            .zip(&last.input)
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        dist_sq.sqrt() < self.0
    }
}
