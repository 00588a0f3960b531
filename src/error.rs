#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the lower bound is greater than the upper bound.
    #[error("invalid bounds: low ({low}) must be less than or equal to high ({high})")]
    InvalidBounds {
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when a discrete or categorical parameter has no values.
    #[error("parameter '{0}' has an empty domain")]
    EmptyDomain(String),

    /// Returned when two parameters in a space share a name.
    #[error("duplicate parameter name '{0}'")]
    DuplicateParameter(String),

    /// Returned when a point's dimensionality disagrees with the parameter space.
    #[error("shape mismatch: expected {expected} dimensions but got {got}")]
    ShapeMismatch {
        /// The dimensionality of the parameter space.
        expected: usize,
        /// The dimensionality of the offending point.
        got: usize,
    },

    /// Returned when an observation batch's input and output counts disagree.
    #[error("count mismatch: {inputs} inputs but {outputs} outputs")]
    CountMismatch {
        /// The number of input points.
        inputs: usize,
        /// The number of output values.
        outputs: usize,
    },

    /// Returned when a submitted value violates a parameter's validity predicate.
    ///
    /// Values are never coerced between parameter kinds: a discrete parameter
    /// only accepts members of its value set and a categorical parameter only
    /// accepts exact label indices.
    #[error("value {value} is outside the domain of parameter '{parameter}'")]
    OutOfSpace {
        /// The name of the violated parameter.
        parameter: String,
        /// The offending value.
        value: f64,
    },

    /// Returned when the surrogate model cannot be fit to the current history.
    ///
    /// The loop surfaces this without retrying; its state is unchanged, so the
    /// caller may add more observations and ask again.
    #[error("surrogate model fit failed: {0}")]
    ModelFit(String),

    /// Returned when loop operations are called out of state-machine order.
    ///
    /// No partial mutation occurs: the loop and its history are exactly as
    /// they were before the offending call.
    #[error("protocol violation: {0}")]
    ProtocolViolation(&'static str),

    /// Returned when a batch size of zero is configured.
    #[error("batch size must be at least 1")]
    InvalidBatchSize,
}

pub type Result<T> = core::result::Result<T, Error>;
