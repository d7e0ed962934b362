//! Model collaborator: the approximator the server runs.
//!
//! The exchange only needs `compute(input) -> output`. Models are produced by
//! a [`ModelLoader`] from the artifact file in the exchange directory, so a
//! retrained model is picked up on the next served request.

mod linear;

pub use linear::{JsonModelLoader, LinearModel};

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::exchange::ExchangeError;

/// Errors raised while computing an approximation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// Input vector length does not match the model
    #[error("expected input of length {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Model artifact decoded but describes an unusable model
    #[error("invalid model: {0}")]
    Invalid(String),
}

/// A trained approximator.
pub trait ApproximationModel: Send + Sync {
    /// Map one input vector to one output vector.
    fn compute(&self, input: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// Produces models from an artifact path.
pub trait ModelLoader: Send + Sync {
    /// Load the model stored at `path`.
    ///
    /// # Errors
    ///
    /// `NotFound` when the artifact is missing, `Corrupt` when it cannot be
    /// decoded.
    fn load(&self, path: &Path) -> Result<Arc<dyn ApproximationModel>, ExchangeError>;
}

/// Model that returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityModel;

impl ApproximationModel for IdentityModel {
    fn compute(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        Ok(input.to_vec())
    }
}

/// Loader that hands out one pre-built model and ignores the artifact path.
///
/// Used when the host embeds the model itself rather than reading it from
/// the exchange directory.
#[derive(Clone)]
pub struct SharedModelLoader {
    model: Arc<dyn ApproximationModel>,
}

impl SharedModelLoader {
    pub fn new(model: Arc<dyn ApproximationModel>) -> Self {
        Self { model }
    }
}

impl ModelLoader for SharedModelLoader {
    fn load(&self, _path: &Path) -> Result<Arc<dyn ApproximationModel>, ExchangeError> {
        Ok(Arc::clone(&self.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_model() {
        assert_eq!(IdentityModel.compute(&[1.0, 2.0]).unwrap(), vec![1.0, 2.0]);
        assert!(IdentityModel.compute(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_shared_loader_ignores_path() {
        let loader = SharedModelLoader::new(Arc::new(IdentityModel));
        let model = loader.load(Path::new("/does/not/exist")).unwrap();
        assert_eq!(model.compute(&[4.0]).unwrap(), vec![4.0]);
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = ModelError::DimensionMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "expected input of length 3, got 2");
    }
}
