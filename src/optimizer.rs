//! Acquisition maximization.
//!
//! Given a fitted model and an acquisition function, an
//! [`AcquisitionOptimizer`] returns the in-space point with the (best-effort)
//! highest score. Non-convergence is not an error: a flat or uninformative
//! acquisition landscape is an expected regime early in optimization, and the
//! optimizer degrades to the best valid point it saw rather than failing the
//! round.

use parking_lot::Mutex;

use crate::acquisition::AcquisitionFunction;
use crate::model::SurrogateModel;
use crate::rng_util;
use crate::space::ParameterSpace;

/// Solves `argmax acquisition(x)` over a parameter space.
///
/// Implementations must always return a valid in-space point — never an
/// error, even when every candidate scores identically.
pub trait AcquisitionOptimizer: Send + Sync {
    /// Returns the best-effort maximizer of the acquisition.
    fn maximize(
        &self,
        space: &ParameterSpace,
        model: &dyn SurrogateModel,
        acquisition: &dyn AcquisitionFunction,
        incumbent: f64,
    ) -> Vec<f64>;
}

/// Default number of random candidate points.
const DEFAULT_N_CANDIDATES: usize = 1000;
/// Default number of local refinement steps around the best candidate.
const DEFAULT_N_REFINEMENTS: usize = 64;
/// Initial perturbation scale for local refinement, in unit-cube coordinates.
const INITIAL_STEP: f64 = 0.1;
/// Per-step shrink factor for the refinement perturbation.
const STEP_DECAY: f64 = 0.95;

/// Multi-start random search with local refinement.
///
/// Scores `n_candidates` uniform random points in the unit cube, then runs
/// `n_refinements` shrinking Gaussian perturbation steps around the best one.
/// Every probed point is mapped onto the space's valid values first, so the
/// returned point always satisfies the space constraints — including discrete
/// and categorical dimensions.
///
/// Seeded construction makes the search fully deterministic: each call draws
/// a fixed number of random values, so two identically-seeded optimizers
/// given the same model and history propose identical sequences of points.
///
/// # Examples
///
/// ```
/// use smbo::optimizer::MultiStartOptimizer;
///
/// let opt = MultiStartOptimizer::builder()
///     .n_candidates(500)
///     .n_refinements(32)
///     .seed(42)
///     .build();
/// ```
pub struct MultiStartOptimizer {
    n_candidates: usize,
    n_refinements: usize,
    rng: Mutex<fastrand::Rng>,
}

impl MultiStartOptimizer {
    /// Creates an optimizer with default settings and a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates an optimizer with default settings and a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::builder().seed(seed).build()
    }

    /// Creates a builder for configuring a `MultiStartOptimizer`.
    #[must_use]
    pub fn builder() -> MultiStartOptimizerBuilder {
        MultiStartOptimizerBuilder::default()
    }
}

impl Default for MultiStartOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`MultiStartOptimizer`].
#[derive(Clone, Debug, Default)]
pub struct MultiStartOptimizerBuilder {
    n_candidates: Option<usize>,
    n_refinements: Option<usize>,
    seed: Option<u64>,
}

impl MultiStartOptimizerBuilder {
    /// Sets the number of random candidate points.
    ///
    /// More candidates improve the quality of the maximum at the cost of
    /// more model predictions per round. Default: 1000.
    #[must_use]
    pub fn n_candidates(mut self, n: usize) -> Self {
        self.n_candidates = Some(n.max(1));
        self
    }

    /// Sets the number of local refinement steps. Default: 64.
    #[must_use]
    pub fn n_refinements(mut self, n: usize) -> Self {
        self.n_refinements = Some(n);
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the configured [`MultiStartOptimizer`].
    #[must_use]
    pub fn build(self) -> MultiStartOptimizer {
        let rng = self
            .seed
            .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
        MultiStartOptimizer {
            n_candidates: self.n_candidates.unwrap_or(DEFAULT_N_CANDIDATES),
            n_refinements: self.n_refinements.unwrap_or(DEFAULT_N_REFINEMENTS),
            rng: Mutex::new(rng),
        }
    }
}

impl AcquisitionOptimizer for MultiStartOptimizer {
    fn maximize(
        &self,
        space: &ParameterSpace,
        model: &dyn SurrogateModel,
        acquisition: &dyn AcquisitionFunction,
        incumbent: f64,
    ) -> Vec<f64> {
        let mut rng = self.rng.lock();
        let d = space.dimension();

        // Stage 1: uniform candidates over the unit cube.
        let units: Vec<Vec<f64>> = (0..self.n_candidates)
            .map(|_| (0..d).map(|_| rng.f64()).collect())
            .collect();
        let points: Vec<Vec<f64>> = units.iter().map(|u| space.point_from_unit(u)).collect();
        let scores = acquisition.evaluate(model, incumbent, &points);

        let mut best_idx = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (i, &s) in scores.iter().enumerate() {
            if s.is_finite() && s > best_score {
                best_score = s;
                best_idx = i;
            }
        }
        let mut best_unit = units[best_idx].clone();
        let mut best_point = points[best_idx].clone();

        // Stage 2: shrinking Gaussian perturbations around the best candidate.
        // Every step draws the same number of random values, keeping seeded
        // runs reproducible independent of which steps are accepted.
        let mut step = INITIAL_STEP;
        for _ in 0..self.n_refinements {
            let cand_unit: Vec<f64> = best_unit
                .iter()
                .map(|&u| (u + step * rng_util::normal(&mut rng)).clamp(0.0, 1.0))
                .collect();
            let cand_point = space.point_from_unit(&cand_unit);
            let score = acquisition.evaluate(model, incumbent, core::slice::from_ref(&cand_point));
            if score[0].is_finite() && score[0] > best_score {
                best_score = score[0];
                best_unit = cand_unit;
                best_point = cand_point;
            }
            step *= STEP_DECAY;
        }

        best_point
    }
}
