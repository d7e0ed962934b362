//! Affine model `y = W·x + b` stored as JSON.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{ApproximationModel, ModelError, ModelLoader};
use crate::exchange::{replace_file, ExchangeError};

/// Dense affine model.
///
/// `weights` has one row per output, each row as long as the input.
///
/// ```
/// use approxlink::model::{ApproximationModel, LinearModel};
///
/// let model = LinearModel::new(vec![vec![1.0, 1.0], vec![2.0, 0.0]], vec![0.5, 0.0]).unwrap();
/// assert_eq!(model.compute(&[1.0, 2.0]).unwrap(), vec![3.5, 2.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

impl LinearModel {
    /// Build a model, checking that the shapes agree.
    pub fn new(weights: Vec<Vec<f64>>, bias: Vec<f64>) -> Result<Self, ModelError> {
        let model = Self { weights, bias };
        model.check_shape()?;
        Ok(model)
    }

    /// Square identity model of the given size.
    pub fn identity(size: usize) -> Self {
        let weights = (0..size)
            .map(|row| (0..size).map(|col| if row == col { 1.0 } else { 0.0 }).collect())
            .collect();
        Self {
            weights,
            bias: vec![0.0; size],
        }
    }

    pub fn input_len(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    pub fn output_len(&self) -> usize {
        self.weights.len()
    }

    /// Write the model as JSON, replacing the file whole.
    pub fn save(&self, path: &Path) -> Result<(), ExchangeError> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| ExchangeError::corrupt(path, e.to_string()))?;
        replace_file(path, &json).map_err(|e| ExchangeError::io(path, e))
    }

    fn check_shape(&self) -> Result<(), ModelError> {
        if self.bias.len() != self.weights.len() {
            return Err(ModelError::Invalid(format!(
                "{} weight rows but {} bias terms",
                self.weights.len(),
                self.bias.len()
            )));
        }
        let width = self.input_len();
        if let Some(row) = self.weights.iter().position(|r| r.len() != width) {
            return Err(ModelError::Invalid(format!(
                "weight row {} has length {}, expected {}",
                row,
                self.weights[row].len(),
                width
            )));
        }
        Ok(())
    }
}

impl ApproximationModel for LinearModel {
    fn compute(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        if input.len() != self.input_len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.input_len(),
                actual: input.len(),
            });
        }
        Ok(self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + bias)
            .collect())
    }
}

/// Loads [`LinearModel`] artifacts from JSON files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonModelLoader;

impl ModelLoader for JsonModelLoader {
    fn load(&self, path: &Path) -> Result<Arc<dyn ApproximationModel>, ExchangeError> {
        let bytes = fs::read(path).map_err(|e| ExchangeError::io(path, e))?;
        let model: LinearModel = serde_json::from_slice(&bytes)
            .map_err(|e| ExchangeError::corrupt(path, e.to_string()))?;
        model
            .check_shape()
            .map_err(|e| ExchangeError::corrupt(path, e.to_string()))?;
        Ok(Arc::new(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_identity_shape() {
        let model = LinearModel::identity(3);
        assert_eq!(model.input_len(), 3);
        assert_eq!(model.output_len(), 3);
        assert_eq!(model.compute(&[1.0, -2.0, 3.0]).unwrap(), vec![1.0, -2.0, 3.0]);
    }

    #[test]
    fn test_rejects_ragged_weights() {
        let err = LinearModel::new(vec![vec![1.0, 2.0], vec![1.0]], vec![0.0, 0.0]).unwrap_err();
        assert!(matches!(err, ModelError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bias_mismatch() {
        let err = LinearModel::new(vec![vec![1.0]], vec![0.0, 1.0]).unwrap_err();
        assert!(matches!(err, ModelError::Invalid(_)));
    }

    #[test]
    fn test_compute_dimension_mismatch() {
        let model = LinearModel::identity(2);
        let err = model.compute(&[1.0]).unwrap_err();
        assert_eq!(
            err,
            ModelError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("neural_network");
        let model = LinearModel::new(vec![vec![2.0, 0.0, 1.0]], vec![-1.0]).unwrap();
        model.save(&path).unwrap();

        let loaded = JsonModelLoader.load(&path).unwrap();

        assert_eq!(loaded.compute(&[1.0, 5.0, 3.0]).unwrap(), vec![4.0]);
    }

    #[test]
    fn test_load_missing_artifact() {
        let temp = TempDir::new().unwrap();
        let result = JsonModelLoader.load(&temp.path().join("neural_network"));
        assert!(matches!(result, Err(ExchangeError::NotFound { .. })));
    }

    #[test]
    fn test_load_invalid_json_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("neural_network");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            JsonModelLoader.load(&path),
            Err(ExchangeError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_load_bad_shape_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("neural_network");
        fs::write(&path, r#"{"weights": [[1.0, 2.0]], "bias": []}"#).unwrap();
        assert!(matches!(
            JsonModelLoader.load(&path),
            Err(ExchangeError::Corrupt { .. })
        ));
    }
}
