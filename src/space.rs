//! Parameter space definitions.
//!
//! A [`ParameterSpace`] is an ordered list of named [`Parameter`]s — the
//! domain every query point must lie in. Points are plain `Vec<f64>` with one
//! value per parameter, in declared order:
//!
//! - **Continuous** parameters accept any finite value in `[low, high]`.
//! - **Discrete** parameters accept exact members of their value set.
//! - **Categorical** parameters accept exact label indices (`0.0`, `1.0`, …).
//!
//! No coercion happens between kinds: submitting `0.5` for a discrete
//! parameter whose values are `[0.0, 1.0]` is an [`Error::OutOfSpace`], not a
//! rounding opportunity.
//!
//! # Example
//!
//! ```
//! use smbo::space::{Parameter, ParameterSpace};
//!
//! let space = ParameterSpace::new(vec![
//!     Parameter::continuous("x1", 0.0, 1.0),
//!     Parameter::discrete("layers", vec![1.0, 2.0, 4.0]),
//!     Parameter::categorical("kernel", vec!["rbf", "matern"]),
//! ])
//! .unwrap();
//!
//! assert_eq!(space.dimension(), 3);
//! assert!(space.contains(&[0.3, 4.0, 1.0]));
//! assert!(!space.contains(&[0.3, 3.0, 1.0])); // 3.0 is not a member
//! ```

use crate::error::{Error, Result};
use crate::rng_util;

/// A single dimension of the search domain.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    name: String,
    kind: ParameterKind,
}

/// Describes the domain of one parameter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterKind {
    /// Continuous uniform range `[low, high]`.
    Continuous {
        /// Lower bound (inclusive).
        low: f64,
        /// Upper bound (inclusive).
        high: f64,
    },
    /// An explicit, finite set of admissible values.
    Discrete {
        /// The admissible values, in declaration order.
        values: Vec<f64>,
    },
    /// An enumerated label set; point values are exact label indices.
    Categorical {
        /// The labels, in declaration order.
        categories: Vec<String>,
    },
}

impl Parameter {
    /// Creates a continuous parameter over `[low, high]`.
    #[must_use]
    pub fn continuous(name: impl Into<String>, low: f64, high: f64) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::Continuous { low, high },
        }
    }

    /// Creates a discrete parameter with an explicit value set.
    #[must_use]
    pub fn discrete(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::Discrete { values },
        }
    }

    /// Creates a categorical parameter with an enumerated label set.
    #[must_use]
    pub fn categorical<S: Into<String>>(name: impl Into<String>, categories: Vec<S>) -> Self {
        Self {
            name: name.into(),
            kind: ParameterKind::Categorical {
                categories: categories.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Returns the parameter's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter's domain description.
    #[must_use]
    pub fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    /// Returns `true` if `value` satisfies this parameter's validity predicate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn is_valid(&self, value: f64) -> bool {
        match &self.kind {
            ParameterKind::Continuous { low, high } => {
                value.is_finite() && value >= *low && value <= *high
            }
            ParameterKind::Discrete { values } => values.iter().any(|&v| v == value),
            ParameterKind::Categorical { categories } => {
                value.fract() == 0.0 && value >= 0.0 && value < categories.len() as f64
            }
        }
    }

    /// Validates the parameter definition itself.
    fn validate(&self) -> Result<()> {
        match &self.kind {
            ParameterKind::Continuous { low, high } => {
                if !(low.is_finite() && high.is_finite()) || low > high {
                    return Err(Error::InvalidBounds {
                        low: *low,
                        high: *high,
                    });
                }
            }
            ParameterKind::Discrete { values } => {
                if values.is_empty() {
                    return Err(Error::EmptyDomain(self.name.clone()));
                }
            }
            ParameterKind::Categorical { categories } => {
                if categories.is_empty() {
                    return Err(Error::EmptyDomain(self.name.clone()));
                }
            }
        }
        Ok(())
    }

    /// Maps a unit-interval coordinate onto a valid value of this parameter.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn unit_to_value(&self, u: f64) -> f64 {
        let u = u.clamp(0.0, 1.0);
        match &self.kind {
            ParameterKind::Continuous { low, high } => low + u * (high - low),
            ParameterKind::Discrete { values } => {
                let idx = (u * (values.len() - 1) as f64).round() as usize;
                values[idx.min(values.len() - 1)]
            }
            ParameterKind::Categorical { categories } => {
                let idx = (u * categories.len() as f64).floor() as usize;
                idx.min(categories.len() - 1) as f64
            }
        }
    }

    /// Maps a valid value of this parameter into the unit interval.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn value_to_unit(&self, value: f64) -> f64 {
        match &self.kind {
            ParameterKind::Continuous { low, high } => {
                if (high - low).abs() < 1e-15 {
                    0.5
                } else {
                    (value - low) / (high - low)
                }
            }
            ParameterKind::Discrete { values } => {
                let idx = values.iter().position(|&v| v == value).unwrap_or(0);
                if values.len() == 1 {
                    0.5
                } else {
                    idx as f64 / (values.len() - 1) as f64
                }
            }
            ParameterKind::Categorical { categories } => {
                if categories.len() == 1 {
                    0.5
                } else {
                    value / (categories.len() - 1) as f64
                }
            }
        }
    }

    /// Samples a uniformly random valid value.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn sample(&self, rng: &mut fastrand::Rng) -> f64 {
        match &self.kind {
            ParameterKind::Continuous { low, high } => rng_util::f64_range(rng, *low, *high),
            ParameterKind::Discrete { values } => values[rng.usize(0..values.len())],
            ParameterKind::Categorical { categories } => rng.usize(0..categories.len()) as f64,
        }
    }
}

/// The ordered search domain: one [`Parameter`] per dimension.
///
/// Every point handed to a surrogate model or returned to the caller has
/// exactly one value per parameter, in declaration order, and satisfies every
/// parameter's validity predicate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterSpace {
    parameters: Vec<Parameter>,
}

impl ParameterSpace {
    /// Creates a parameter space from an ordered list of parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] or [`Error::EmptyDomain`] when a
    /// parameter definition is malformed, and [`Error::DuplicateParameter`]
    /// when two parameters share a name.
    pub fn new(parameters: Vec<Parameter>) -> Result<Self> {
        for (i, param) in parameters.iter().enumerate() {
            param.validate()?;
            if parameters[..i].iter().any(|p| p.name == param.name) {
                return Err(Error::DuplicateParameter(param.name.clone()));
            }
        }
        Ok(Self { parameters })
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.parameters.len()
    }

    /// Returns the parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Returns `true` if `point` has the right dimensionality and every value
    /// satisfies its parameter's validity predicate.
    #[must_use]
    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.parameters.len()
            && point
                .iter()
                .zip(&self.parameters)
                .all(|(&v, p)| p.is_valid(v))
    }

    /// Validates a point against the space.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] on the wrong dimensionality and
    /// [`Error::OutOfSpace`] (naming the violated parameter) on an invalid
    /// value.
    pub fn validate_point(&self, point: &[f64]) -> Result<()> {
        if point.len() != self.parameters.len() {
            return Err(Error::ShapeMismatch {
                expected: self.parameters.len(),
                got: point.len(),
            });
        }
        for (&value, param) in point.iter().zip(&self.parameters) {
            if !param.is_valid(value) {
                return Err(Error::OutOfSpace {
                    parameter: param.name.clone(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Draws `n` uniformly random in-space points.
    ///
    /// Useful as an initial design when no seed history exists yet.
    #[must_use]
    pub fn sample(&self, rng: &mut fastrand::Rng, n: usize) -> Vec<Vec<f64>> {
        (0..n)
            .map(|_| self.parameters.iter().map(|p| p.sample(rng)).collect())
            .collect()
    }

    /// Maps a unit-cube coordinate vector onto a valid in-space point.
    pub(crate) fn point_from_unit(&self, unit: &[f64]) -> Vec<f64> {
        unit.iter()
            .zip(&self.parameters)
            .map(|(&u, p)| p.unit_to_value(u))
            .collect()
    }

    /// Maps a valid in-space point into the unit cube.
    pub(crate) fn point_to_unit(&self, point: &[f64]) -> Vec<f64> {
        point
            .iter()
            .zip(&self.parameters)
            .map(|(&v, p)| p.value_to_unit(v))
            .collect()
    }
}
