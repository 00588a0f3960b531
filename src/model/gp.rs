//! Gaussian process surrogate with a **Matérn 5/2 kernel**.
//!
//! A classical Bayesian-optimization surrogate: training targets are
//! standardized (zero mean, unit variance), ARD lengthscales are set from the
//! per-dimension spread of the training inputs, and the kernel matrix is
//! factored via Cholesky decomposition. Predictions are reported in original
//! output units.
//!
//! The model refits from scratch on every call to
//! [`fit`](crate::model::SurrogateModel::fit); no state is carried between
//! rounds beyond the configuration. At most `max_train_points` of the most
//! recent observations participate in a fit, capping the O(n³) factorization
//! cost.
//!
//! # When to use
//!
//! - **Expensive objective functions** where every evaluation is costly —
//!   the surrogate amortizes the cost by making fewer evaluations.
//! - **Low-dimensional continuous spaces**, typically d ≤ 20. Beyond that a
//!   GP becomes unreliable.
//! - **Smooth, low-noise objectives** — the Matérn 5/2 kernel assumes
//!   smoothness. Raise `noise_variance` for noisy objectives.
//!
//! Discrete values and categorical label indices enter the kernel as plain
//! coordinates; for heavily categorical spaces a custom
//! [`SurrogateModel`] is the better collaborator.
//!
//! # Configuration
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `noise_variance` | 1e-6 | Observation noise added to the kernel diagonal |
//! | `max_train_points` | 100 | Most recent observations used per fit |
//!
//! # Examples
//!
//! ```
//! use smbo::model::{GaussianProcess, SurrogateModel};
//!
//! let mut gp = GaussianProcess::builder().noise_variance(1e-4).build();
//! gp.fit(&[vec![0.1], vec![0.6], vec![0.9]], &[1.0, -0.2, 0.8]).unwrap();
//!
//! let pred = &gp.predict(&[vec![0.6]])[0];
//! assert!((pred.mean - -0.2).abs() < 0.1);
//! ```

use nalgebra::DMatrix;

use crate::error::{Error, Result};
use crate::model::{Prediction, SurrogateModel};

/// Default observation noise variance.
const DEFAULT_NOISE_VAR: f64 = 1e-6;
/// Default cap on the number of training points per fit.
const DEFAULT_MAX_TRAIN_POINTS: usize = 100;

/// √5, precomputed for the Matérn 5/2 kernel.
const SQRT_5: f64 = 2.236_067_977_499_79;

/// Gaussian process surrogate model.
///
/// Construct via [`GaussianProcess::new`] for defaults or
/// [`GaussianProcess::builder`] for custom configuration.
pub struct GaussianProcess {
    noise_variance: f64,
    max_train_points: usize,
    fitted: Option<FittedGp>,
}

impl GaussianProcess {
    /// Creates a GP with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            noise_variance: DEFAULT_NOISE_VAR,
            max_train_points: DEFAULT_MAX_TRAIN_POINTS,
            fitted: None,
        }
    }

    /// Creates a builder for configuring a `GaussianProcess`.
    #[must_use]
    pub fn builder() -> GaussianProcessBuilder {
        GaussianProcessBuilder::default()
    }

    /// Returns `true` once the model has been fit at least once.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }
}

impl Default for GaussianProcess {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`GaussianProcess`].
#[derive(Clone, Debug, Default)]
pub struct GaussianProcessBuilder {
    noise_variance: Option<f64>,
    max_train_points: Option<usize>,
}

impl GaussianProcessBuilder {
    /// Sets the observation noise variance added to the kernel diagonal.
    ///
    /// Larger values make the posterior smoother. Default: 1e-6
    /// (near-noiseless).
    #[must_use]
    pub fn noise_variance(mut self, v: f64) -> Self {
        self.noise_variance = Some(v);
        self
    }

    /// Sets the cap on training points used per fit (most recent first).
    ///
    /// Default: 100.
    #[must_use]
    pub fn max_train_points(mut self, n: usize) -> Self {
        self.max_train_points = Some(n);
        self
    }

    /// Builds the configured [`GaussianProcess`].
    #[must_use]
    pub fn build(self) -> GaussianProcess {
        GaussianProcess {
            noise_variance: self.noise_variance.unwrap_or(DEFAULT_NOISE_VAR),
            max_train_points: self.max_train_points.unwrap_or(DEFAULT_MAX_TRAIN_POINTS),
            fitted: None,
        }
    }
}

/// A fitted GP ready for predictions.
struct FittedGp {
    /// Cholesky factor of K + σ²I.
    cholesky: nalgebra::linalg::Cholesky<f64, nalgebra::Dyn>,
    /// α = (K + σ²I)⁻¹ y, for standardized y.
    alpha: nalgebra::DVector<f64>,
    /// Training inputs, one row per point.
    x_train: Vec<Vec<f64>>,
    /// ARD lengthscales per dimension.
    lengthscales: Vec<f64>,
    /// Signal variance (1.0, targets are standardized).
    signal_var: f64,
    /// Mean of the original targets, for un-standardizing predictions.
    y_mean: f64,
    /// Std dev of the original targets, for un-standardizing predictions.
    y_std: f64,
}

impl SurrogateModel for GaussianProcess {
    #[allow(clippy::cast_precision_loss)]
    fn fit(&mut self, inputs: &[Vec<f64>], outputs: &[f64]) -> Result<()> {
        if inputs.len() != outputs.len() {
            return Err(Error::CountMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
        if inputs.is_empty() {
            return Err(Error::ModelFit(
                "at least one observation is required".to_string(),
            ));
        }

        // Use only the most recent points to cap the factorization cost.
        let start = inputs.len().saturating_sub(self.max_train_points);
        let x_train = inputs[start..].to_vec();
        let y_train = &outputs[start..];
        let n = y_train.len();

        // Standardize y.
        let y_mean = y_train.iter().sum::<f64>() / n as f64;
        let y_var = if n > 1 {
            y_train.iter().map(|&y| (y - y_mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            1.0
        };
        let y_std = y_var.sqrt().max(1e-10);
        let y_standardized: Vec<f64> = y_train.iter().map(|&y| (y - y_mean) / y_std).collect();

        // ARD lengthscales: per-dimension spread of the training inputs.
        let d = x_train[0].len();
        let lengthscales: Vec<f64> = (0..d)
            .map(|j| {
                let mean_j = x_train.iter().map(|x| x[j]).sum::<f64>() / n as f64;
                let var_j =
                    x_train.iter().map(|x| (x[j] - mean_j).powi(2)).sum::<f64>() / n as f64;
                var_j.sqrt().max(1e-3)
            })
            .collect();

        // Signal variance = 1.0 since the targets are standardized.
        let signal_var = 1.0;

        let k = kernel_matrix(&x_train, &lengthscales, signal_var, self.noise_variance);
        let Some(cholesky) = nalgebra::linalg::Cholesky::new(k) else {
            return Err(Error::ModelFit(
                "kernel matrix is not positive definite".to_string(),
            ));
        };

        let y_vec = nalgebra::DVector::from_column_slice(&y_standardized);
        let alpha = cholesky.solve(&y_vec);

        self.fitted = Some(FittedGp {
            cholesky,
            alpha,
            x_train,
            lengthscales,
            signal_var,
            y_mean,
            y_std,
        });
        Ok(())
    }

    fn predict(&self, points: &[Vec<f64>]) -> Vec<Prediction> {
        let Some(model) = &self.fitted else {
            // Unfitted: report the prior.
            return points
                .iter()
                .map(|_| Prediction {
                    mean: 0.0,
                    variance: 1.0,
                })
                .collect();
        };

        points
            .iter()
            .map(|x| {
                let k_star = kernel_vector(x, &model.x_train, &model.lengthscales, model.signal_var);

                // Mean: k*ᵀ α, un-standardized.
                let mean_s = k_star.dot(&model.alpha);

                // Variance: k(x*, x*) - k*ᵀ (K + σ²I)⁻¹ k*.
                let v = model.cholesky.solve(&k_star);
                let var_s = (model.signal_var - k_star.dot(&v)).max(0.0);

                Prediction {
                    mean: mean_s * model.y_std + model.y_mean,
                    variance: var_s * model.y_std * model.y_std,
                }
            })
            .collect()
    }
}

/// Matérn 5/2 kernel with ARD lengthscales.
///
/// `k(x1, x2) = σ² (1 + √5 r + 5/3 r²) exp(-√5 r)`
/// where `r = sqrt(Σ ((x1_i - x2_i) / l_i)²)`
fn matern52(x1: &[f64], x2: &[f64], lengthscales: &[f64], signal_var: f64) -> f64 {
    let mut r_sq = 0.0;
    for i in 0..x1.len() {
        let diff = (x1[i] - x2[i]) / lengthscales[i];
        r_sq += diff * diff;
    }
    let r = r_sq.sqrt();
    let sqrt5_r = SQRT_5 * r;
    signal_var * (1.0 + sqrt5_r + 5.0 / 3.0 * r_sq) * (-sqrt5_r).exp()
}

/// Build the kernel matrix `K + σ²I`.
fn kernel_matrix(
    x: &[Vec<f64>],
    lengthscales: &[f64],
    signal_var: f64,
    noise_var: f64,
) -> DMatrix<f64> {
    let n = x.len();
    DMatrix::from_fn(n, n, |i, j| {
        let k = matern52(&x[i], &x[j], lengthscales, signal_var);
        if i == j { k + noise_var } else { k }
    })
}

/// Compute the kernel vector k(x*, X) for a test point.
fn kernel_vector(
    x_star: &[f64],
    x_train: &[Vec<f64>],
    lengthscales: &[f64],
    signal_var: f64,
) -> nalgebra::DVector<f64> {
    nalgebra::DVector::from_fn(x_train.len(), |i, _| {
        matern52(x_star, &x_train[i], lengthscales, signal_var)
    })
}
