//! The outer optimization loop.
//!
//! [`OptimizationLoop`] orchestrates one round of sequential model-based
//! optimization: record results → refit the surrogate on the full history →
//! maximize the acquisition → emit the next candidate batch. It runs in two
//! modes:
//!
//! - **Externally driven**: [`get_next_points`](OptimizationLoop::get_next_points)
//!   proposes a batch and pauses; the caller evaluates it wherever and
//!   however it likes (possibly in parallel, with its own stopping logic)
//!   and supplies the results with the next call.
//! - **Automatic**: [`run_to_completion`](OptimizationLoop::run_to_completion)
//!   evaluates a [`UserFunction`] internally until a
//!   [`StoppingCondition`] holds.
//!
//! Driving N rounds one step at a time produces exactly the same history as
//! one `run_to_completion` call with an N-round condition, given the same
//! seed data, a deterministic model, and a seeded optimizer.
//!
//! The loop is a strict state machine — `Ready → AwaitingResult → Ready → …
//! → Finished` — and calling [`get_next_points`](OptimizationLoop::get_next_points)
//! twice without supplying results in between is a
//! [`ProtocolViolation`](crate::Error::ProtocolViolation): the surrogate used
//! for the next round is only correct when refit on fully evaluated history,
//! and out-of-order submissions would corrupt the bookkeeping silently
//! rather than crash.

use crate::acquisition::{AcquisitionFunction, ExpectedImprovement};
use crate::batch::{self, BatchStrategy};
use crate::error::{Error, Result};
use crate::model::SurrogateModel;
use crate::optimizer::{AcquisitionOptimizer, MultiStartOptimizer};
use crate::space::ParameterSpace;
use crate::state::{LoopState, Observation};
use crate::stopping::StoppingCondition;
use crate::user_function::UserFunction;

/// Where the loop stands in its state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopPhase {
    /// Configured, no proposal outstanding; ready to propose.
    Ready,
    /// A candidate batch has been proposed; results are pending.
    AwaitingResult,
    /// A stopping condition was met; the loop is terminal.
    Finished,
}

/// A resumable sequential model-based optimization loop.
///
/// Construct with [`new`](Self::new) for defaults or
/// [`builder`](Self::builder) to configure the acquisition, the optimizer,
/// batching, and seed history. The parameter space is fixed for the life of
/// the loop; history only grows. To resume optimization later — or in
/// another process — export the history with
/// [`state()`](Self::state)`.snapshot()` and seed a new loop with it.
///
/// # Examples
///
/// ```
/// use smbo::model::GaussianProcess;
/// use smbo::optimizer::MultiStartOptimizer;
/// use smbo::space::{Parameter, ParameterSpace};
/// use smbo::{Observation, OptimizationLoop};
///
/// let space = ParameterSpace::new(vec![Parameter::continuous("x1", 0.0, 1.0)]).unwrap();
/// let mut opt = OptimizationLoop::builder(space, GaussianProcess::new())
///     .optimizer(MultiStartOptimizer::with_seed(42))
///     .seed_history(vec![vec![0.1], vec![0.6], vec![0.9]], vec![0.9, -0.1, 0.8])
///     .build()
///     .unwrap();
///
/// // Ask for a point, evaluate it externally, submit with the next ask.
/// let batch = opt.get_next_points(&[]).unwrap();
/// let y = (batch[0][0] - 0.3).powi(2);
/// let next = opt
///     .get_next_points(&[Observation::new(batch[0].clone(), y)])
///     .unwrap();
/// assert_eq!(next.len(), 1);
/// assert_eq!(opt.state().len(), 4);
/// ```
pub struct OptimizationLoop {
    space: ParameterSpace,
    model: Box<dyn SurrogateModel>,
    acquisition: Box<dyn AcquisitionFunction>,
    optimizer: Box<dyn AcquisitionOptimizer>,
    batch_size: usize,
    batch_strategy: BatchStrategy,
    state: LoopState,
    phase: LoopPhase,
    last_batch: Option<Vec<Vec<f64>>>,
}

impl OptimizationLoop {
    /// Creates a loop with default configuration: Expected Improvement,
    /// a randomly seeded [`MultiStartOptimizer`], single-point proposals,
    /// and an empty history.
    #[must_use]
    pub fn new(space: ParameterSpace, model: impl SurrogateModel + 'static) -> Self {
        let dimension = space.dimension();
        Self {
            space,
            model: Box::new(model),
            acquisition: Box::new(ExpectedImprovement::new()),
            optimizer: Box::new(MultiStartOptimizer::new()),
            batch_size: 1,
            batch_strategy: BatchStrategy::default(),
            state: LoopState::new(dimension),
            phase: LoopPhase::Ready,
            last_batch: None,
        }
    }

    /// Returns a [`LoopBuilder`] for configuring a loop with a fluent API.
    #[must_use]
    pub fn builder(space: ParameterSpace, model: impl SurrogateModel + 'static) -> LoopBuilder {
        LoopBuilder::new(space, Box::new(model))
    }

    /// Records results for the previous proposal (if any) and proposes the
    /// next candidate batch.
    ///
    /// Pass an empty slice on the first call (or whenever no proposal is
    /// outstanding) to propose directly from the seed history. Points are
    /// returned in the optimizer's ranking order and always satisfy the
    /// space constraints.
    ///
    /// # Errors
    ///
    /// - [`Error::ProtocolViolation`] when called without results while a
    ///   proposal is outstanding, or on a finished loop. The state is
    ///   unchanged.
    /// - [`Error::ShapeMismatch`] / [`Error::OutOfSpace`] when a submitted
    ///   observation is malformed; nothing is appended.
    /// - [`Error::ModelFit`] when the surrogate cannot fit the history; any
    ///   submitted results are retained, so more data can be added and the
    ///   call retried.
    pub fn get_next_points(&mut self, results: &[Observation]) -> Result<Vec<Vec<f64>>> {
        match self.phase {
            LoopPhase::Finished => {
                return Err(Error::ProtocolViolation(
                    "loop is finished; rebuild it from a snapshot to continue",
                ));
            }
            LoopPhase::AwaitingResult if results.is_empty() => {
                return Err(Error::ProtocolViolation(
                    "results for the previous proposal must be supplied before new points are proposed",
                ));
            }
            _ => {}
        }

        self.apply_results(results)?;
        self.refit()?;

        let batch = batch::propose_batch(
            &self.space,
            self.model.as_mut(),
            self.acquisition.as_ref(),
            self.optimizer.as_ref(),
            &self.state,
            self.batch_size,
            self.batch_strategy,
        );
        trace_info!(n_points = batch.len(), "proposed candidate batch");

        self.last_batch = Some(batch.clone());
        self.phase = LoopPhase::AwaitingResult;
        Ok(batch)
    }

    /// Records results without proposing new points.
    ///
    /// Use this to close out the final round of externally driven stepping,
    /// or to add more observations while `Ready` (e.g. extra seed data after
    /// a [`Error::ModelFit`]). An empty slice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProtocolViolation`] on a finished loop, and
    /// [`Error::ShapeMismatch`] / [`Error::OutOfSpace`] for malformed
    /// observations (nothing is appended).
    pub fn submit(&mut self, results: &[Observation]) -> Result<()> {
        if self.phase == LoopPhase::Finished {
            return Err(Error::ProtocolViolation(
                "loop is finished; rebuild it from a snapshot to continue",
            ));
        }
        self.apply_results(results)
    }

    /// Runs the loop automatically until `stopping` holds.
    ///
    /// Each round proposes a batch, evaluates `objective` on it internally,
    /// and records the results. The condition is consulted before every
    /// round. On success the loop transitions to [`LoopPhase::Finished`] and
    /// only snapshot-reconstruction can continue the optimization.
    ///
    /// # Errors
    ///
    /// - [`Error::ProtocolViolation`] when a proposal is already outstanding
    ///   or the loop is finished.
    /// - [`Error::ModelFit`] when the surrogate cannot fit the history.
    /// - Any error from `objective`, plus [`Error::CountMismatch`] when it
    ///   returns the wrong number of outputs. The proposal stays
    ///   outstanding, so the caller may evaluate it externally and resume
    ///   via [`get_next_points`](Self::get_next_points).
    pub fn run_to_completion(
        &mut self,
        mut objective: impl UserFunction,
        stopping: impl StoppingCondition,
    ) -> Result<()> {
        if self.phase != LoopPhase::Ready {
            return Err(Error::ProtocolViolation(
                "automatic runs require a loop with no pending proposal",
            ));
        }

        while !stopping.should_stop(&self.state) {
            let batch = self.get_next_points(&[])?;
            let outputs = objective.evaluate(&batch)?;
            if outputs.len() != batch.len() {
                return Err(Error::CountMismatch {
                    inputs: batch.len(),
                    outputs: outputs.len(),
                });
            }
            let results: Vec<Observation> = batch
                .into_iter()
                .zip(outputs)
                .map(|(input, output)| Observation::new(input, output))
                .collect();
            self.apply_results(&results)?;
        }

        self.phase = LoopPhase::Finished;
        trace_info!(n_observations = self.state.len(), "loop finished");
        Ok(())
    }

    /// Returns the accumulated optimization state.
    #[must_use]
    pub fn state(&self) -> &LoopState {
        &self.state
    }

    /// Returns the parameter space the loop searches.
    #[must_use]
    pub fn space(&self) -> &ParameterSpace {
        &self.space
    }

    /// Returns the loop's current phase.
    #[must_use]
    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Returns the most recently proposed batch, if results are pending.
    #[must_use]
    pub fn last_proposed(&self) -> Option<&[Vec<f64>]> {
        self.last_batch.as_deref()
    }

    /// Returns the surrogate model as last fit by the loop.
    #[must_use]
    pub fn model(&self) -> &dyn SurrogateModel {
        self.model.as_ref()
    }

    /// Returns the best observation so far (lowest output), if any.
    #[must_use]
    pub fn best(&self) -> Option<&Observation> {
        self.state.best()
    }

    /// Validates and appends results; no-op on an empty slice.
    fn apply_results(&mut self, results: &[Observation]) -> Result<()> {
        if results.is_empty() {
            return Ok(());
        }
        for obs in results {
            self.space.validate_point(&obs.input)?;
        }
        self.state.update(results)?;
        self.last_batch = None;
        self.phase = LoopPhase::Ready;
        trace_debug!(n_results = results.len(), "observations recorded");
        Ok(())
    }

    /// Refits the surrogate on the full history.
    fn refit(&mut self) -> Result<()> {
        let (inputs, outputs) = self.state.snapshot();
        self.model.fit(&inputs, &outputs)?;
        trace_debug!(n_observations = inputs.len(), "surrogate refit");
        Ok(())
    }
}

/// A builder for configuring [`OptimizationLoop`] instances.
///
/// Created via [`OptimizationLoop::builder`].
///
/// # Defaults
///
/// - Acquisition: [`ExpectedImprovement`]
/// - Optimizer: [`MultiStartOptimizer`] with a random seed
/// - Batch size: 1, strategy [`BatchStrategy::Fantasize`] (kriging believer)
/// - History: empty
pub struct LoopBuilder {
    space: ParameterSpace,
    model: Box<dyn SurrogateModel>,
    acquisition: Option<Box<dyn AcquisitionFunction>>,
    optimizer: Option<Box<dyn AcquisitionOptimizer>>,
    batch_size: usize,
    batch_strategy: BatchStrategy,
    seed_inputs: Vec<Vec<f64>>,
    seed_outputs: Vec<f64>,
}

impl LoopBuilder {
    fn new(space: ParameterSpace, model: Box<dyn SurrogateModel>) -> Self {
        Self {
            space,
            model,
            acquisition: None,
            optimizer: None,
            batch_size: 1,
            batch_strategy: BatchStrategy::default(),
            seed_inputs: Vec::new(),
            seed_outputs: Vec::new(),
        }
    }

    /// Sets the acquisition function. Defaults to [`ExpectedImprovement`].
    #[must_use]
    pub fn acquisition(mut self, acquisition: impl AcquisitionFunction + 'static) -> Self {
        self.acquisition = Some(Box::new(acquisition));
        self
    }

    /// Sets the acquisition optimizer. Defaults to a randomly seeded
    /// [`MultiStartOptimizer`]; pass a seeded one for reproducible runs.
    #[must_use]
    pub fn optimizer(mut self, optimizer: impl AcquisitionOptimizer + 'static) -> Self {
        self.optimizer = Some(Box::new(optimizer));
        self
    }

    /// Sets the number of points proposed per round. Must be at least 1.
    #[must_use]
    pub fn batch_size(mut self, k: usize) -> Self {
        self.batch_size = k;
        self
    }

    /// Sets the strategy used for proposing batches of more than one point.
    #[must_use]
    pub fn batch_strategy(mut self, strategy: BatchStrategy) -> Self {
        self.batch_strategy = strategy;
        self
    }

    /// Seeds the loop with an initial `(inputs, outputs)` design.
    #[must_use]
    pub fn seed_history(mut self, inputs: Vec<Vec<f64>>, outputs: Vec<f64>) -> Self {
        self.seed_inputs = inputs;
        self.seed_outputs = outputs;
        self
    }

    /// Seeds the loop from previously exported observations.
    ///
    /// Together with [`LoopState::snapshot`] this is the resume path: a new
    /// loop built from an old loop's history continues the optimization with
    /// nothing lost.
    #[must_use]
    pub fn resume(mut self, observations: &[Observation]) -> Self {
        self.seed_inputs = observations.iter().map(|o| o.input.clone()).collect();
        self.seed_outputs = observations.iter().map(|o| o.output).collect();
        self
    }

    /// Builds the configured [`OptimizationLoop`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBatchSize`] for a zero batch size,
    /// [`Error::CountMismatch`] when the seed arrays disagree in length, and
    /// [`Error::ShapeMismatch`] / [`Error::OutOfSpace`] when a seed point
    /// does not lie in the space.
    pub fn build(self) -> Result<OptimizationLoop> {
        if self.batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }
        for input in &self.seed_inputs {
            self.space.validate_point(input)?;
        }
        let state =
            LoopState::with_history(self.space.dimension(), &self.seed_inputs, &self.seed_outputs)?;

        Ok(OptimizationLoop {
            space: self.space,
            model: self.model,
            acquisition: self
                .acquisition
                .unwrap_or_else(|| Box::new(ExpectedImprovement::new())),
            optimizer: self
                .optimizer
                .unwrap_or_else(|| Box::new(MultiStartOptimizer::new())),
            batch_size: self.batch_size,
            batch_strategy: self.batch_strategy,
            state,
            phase: LoopPhase::Ready,
            last_batch: None,
        })
    }
}
