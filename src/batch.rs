//! Batch proposal under a sequential-feedback assumption.
//!
//! When the loop is asked for `k > 1` points per round, only a single round's
//! worth of true feedback exists until the next update — so the k points must
//! be *jointly* useful. Scoring the acquisition once and taking the top k is
//! tempting but wrong: the top scores cluster around one optimum and the
//! batch collapses to near-duplicates. Both strategies here instead condition
//! each pick on the picks before it:
//!
//! - [`BatchStrategy::Fantasize`]: after choosing a point, pretend it was
//!   observed (a [`Lie`]), cold-refit the model on the augmented history, and
//!   maximize again. With [`Lie::PredictedMean`] this is the kriging-believer
//!   policy; with [`Lie::Pessimistic`] the constant-liar policy.
//! - [`BatchStrategy::LocalPenalization`]: multiply the acquisition by a
//!   distance penalty `1 - exp(-d²/2ℓ²)` around every already-chosen point
//!   (`d` in unit-cube coordinates), pushing subsequent maximizations away
//!   without touching the model.

use crate::acquisition::AcquisitionFunction;
use crate::model::SurrogateModel;
use crate::optimizer::AcquisitionOptimizer;
use crate::space::ParameterSpace;
use crate::state::LoopState;

/// How to propose a batch of `k > 1` points per round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BatchStrategy {
    /// Fantasize-and-repeat: pretend-observe each chosen point, refit,
    /// maximize again.
    Fantasize(Lie),
    /// Multiply the acquisition by distance penalties around chosen points.
    ///
    /// `length_scale` is the penalty radius in unit-cube coordinates;
    /// smaller values allow tighter batches.
    LocalPenalization {
        /// Penalty radius in unit-cube coordinates.
        length_scale: f64,
    },
}

impl Default for BatchStrategy {
    fn default() -> Self {
        Self::Fantasize(Lie::PredictedMean)
    }
}

/// The output value a fantasized observation pretends to have.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lie {
    /// The model's predicted mean at the chosen point (kriging believer).
    PredictedMean,
    /// The worst output observed so far (constant liar); discourages
    /// revisiting the region until real feedback arrives.
    Pessimistic,
}

/// Wraps an acquisition with multiplicative distance penalties around a set
/// of already-chosen centers.
///
/// The penalty for a point `x` is `Π_j (1 - exp(-d(x, c_j)² / 2ℓ²))` over all
/// centers `c_j`, with distances measured in unit-cube coordinates. Scores
/// stay finite and non-negative wherever the base acquisition's are.
pub struct LocalPenalizer<'a> {
    base: &'a dyn AcquisitionFunction,
    space: &'a ParameterSpace,
    centers: Vec<Vec<f64>>,
    length_scale: f64,
}

impl<'a> LocalPenalizer<'a> {
    /// Creates a penalizer around the given in-space centers.
    #[must_use]
    pub fn new(
        base: &'a dyn AcquisitionFunction,
        space: &'a ParameterSpace,
        centers: &[Vec<f64>],
        length_scale: f64,
    ) -> Self {
        Self {
            base,
            space,
            centers: centers.iter().map(|c| space.point_to_unit(c)).collect(),
            length_scale: length_scale.max(1e-6),
        }
    }
}

impl AcquisitionFunction for LocalPenalizer<'_> {
    fn evaluate(
        &self,
        model: &dyn SurrogateModel,
        incumbent: f64,
        points: &[Vec<f64>],
    ) -> Vec<f64> {
        let scores = self.base.evaluate(model, incumbent, points);
        scores
            .into_iter()
            .zip(points)
            .map(|(score, point)| {
                let unit = self.space.point_to_unit(point);
                let penalty: f64 = self
                    .centers
                    .iter()
                    .map(|center| {
                        let d_sq: f64 = unit
                            .iter()
                            .zip(center)
                            .map(|(a, b)| (a - b) * (a - b))
                            .sum();
                        1.0 - (-d_sq / (2.0 * self.length_scale * self.length_scale)).exp()
                    })
                    .product();
                score * penalty
            })
            .collect()
    }
}

/// Proposes a batch of `k` points, ranked in selection order.
///
/// Never fails: fantasize refits that cannot be performed fall back to
/// distance penalization for the remaining picks, and the model is restored
/// to a fit over the observed history before returning.
pub(crate) fn propose_batch(
    space: &ParameterSpace,
    model: &mut dyn SurrogateModel,
    acquisition: &dyn AcquisitionFunction,
    optimizer: &dyn AcquisitionOptimizer,
    state: &LoopState,
    k: usize,
    strategy: BatchStrategy,
) -> Vec<Vec<f64>> {
    let incumbent = state.best().map_or(f64::INFINITY, |o| o.output);
    let first = optimizer.maximize(space, model, acquisition, incumbent);
    if k == 1 {
        return vec![first];
    }

    match strategy {
        BatchStrategy::Fantasize(lie) => {
            fantasize_batch(space, model, acquisition, optimizer, state, k, lie, first)
        }
        BatchStrategy::LocalPenalization { length_scale } => {
            let mut batch = vec![first];
            while batch.len() < k {
                let penalized = LocalPenalizer::new(acquisition, space, &batch, length_scale);
                batch.push(optimizer.maximize(space, model, &penalized, incumbent));
            }
            batch
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn fantasize_batch(
    space: &ParameterSpace,
    model: &mut dyn SurrogateModel,
    acquisition: &dyn AcquisitionFunction,
    optimizer: &dyn AcquisitionOptimizer,
    state: &LoopState,
    k: usize,
    lie: Lie,
    first: Vec<f64>,
) -> Vec<Vec<f64>> {
    let (mut xs, mut ys) = state.snapshot();
    let worst = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut batch = vec![first];
    while batch.len() < k {
        let last = batch.last().expect("batch starts non-empty").clone();
        let fantasy = match lie {
            Lie::PredictedMean => model.predict(core::slice::from_ref(&last))[0].mean,
            Lie::Pessimistic => {
                if worst.is_finite() {
                    worst
                } else {
                    model.predict(core::slice::from_ref(&last))[0].mean
                }
            }
        };
        xs.push(last);
        ys.push(fantasy);

        if model.fit(&xs, &ys).is_ok() {
            let incumbent = ys.iter().copied().fold(f64::INFINITY, f64::min);
            batch.push(optimizer.maximize(space, model, acquisition, incumbent));
        } else {
            // The fantasized history broke the fit (e.g. a duplicate input
            // made the kernel singular). Keep the stale model and push the
            // remaining picks apart with a distance penalty instead.
            let incumbent = state.best().map_or(f64::INFINITY, |o| o.output);
            let penalized = LocalPenalizer::new(acquisition, space, &batch, 0.1);
            batch.push(optimizer.maximize(space, model, &penalized, incumbent));
        }
    }

    // Restore a fit over the observed history so the model does not keep
    // fantasized data; the next round refits regardless.
    let (xs_true, ys_true) = state.snapshot();
    let _ = model.fit(&xs_true, &ys_true);

    batch
}
