//! Reading and writing exchange vectors and the model artifact.

use std::sync::Arc;

use super::codec::VectorCodec;
use super::directory::{DataFile, ExchangeDirectory};
use super::error::ExchangeError;
use crate::log::Logger;
use crate::log_debug;
use crate::model::{ApproximationModel, ModelLoader};

/// Whole-vector I/O against the canonical exchange files.
///
/// Encoding is delegated to the configured [`VectorCodec`], model decoding
/// to the [`ModelLoader`]. Vectors are never retained after a call returns.
#[derive(Clone)]
pub struct VectorExchange {
    directory: Arc<ExchangeDirectory>,
    codec: Arc<dyn VectorCodec>,
    models: Arc<dyn ModelLoader>,
    logger: Arc<dyn Logger>,
}

impl VectorExchange {
    pub fn new(
        directory: Arc<ExchangeDirectory>,
        codec: Arc<dyn VectorCodec>,
        models: Arc<dyn ModelLoader>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            directory,
            codec,
            models,
            logger,
        }
    }

    pub fn write_input(&self, vector: &[f64]) -> Result<(), ExchangeError> {
        self.write(DataFile::Input, vector)
    }

    pub fn read_input(&self) -> Result<Vec<f64>, ExchangeError> {
        self.read(DataFile::Input)
    }

    pub fn write_output(&self, vector: &[f64]) -> Result<(), ExchangeError> {
        self.write(DataFile::Output, vector)
    }

    pub fn read_output(&self) -> Result<Vec<f64>, ExchangeError> {
        self.read(DataFile::Output)
    }

    /// Reduced-space input written by an external optimizer.
    pub fn read_function_input(&self) -> Result<Vec<f64>, ExchangeError> {
        self.read(DataFile::FunctionInput)
    }

    pub fn write_function_input(&self, vector: &[f64]) -> Result<(), ExchangeError> {
        self.write(DataFile::FunctionInput, vector)
    }

    pub fn read_function_output(&self) -> Result<Vec<f64>, ExchangeError> {
        self.read(DataFile::FunctionOutput)
    }

    /// Reduced-space output handed back to the optimizer.
    pub fn write_function_output(&self, vector: &[f64]) -> Result<(), ExchangeError> {
        self.write(DataFile::FunctionOutput, vector)
    }

    /// Load the trained model from its artifact file.
    pub fn load_model(&self) -> Result<Arc<dyn ApproximationModel>, ExchangeError> {
        let path = self.directory.path(DataFile::Model);
        log_debug!(self.logger, "loading model from {}", path.display());
        self.models.load(&path)
    }

    fn write(&self, file: DataFile, vector: &[f64]) -> Result<(), ExchangeError> {
        let path = self.directory.path(file);
        self.codec.save(vector, &path)?;
        log_debug!(
            self.logger,
            "wrote {} values to {}",
            vector.len(),
            path.display()
        );
        Ok(())
    }

    fn read(&self, file: DataFile) -> Result<Vec<f64>, ExchangeError> {
        let path = self.directory.path(file);
        let vector = self.codec.load(&path)?;
        log_debug!(
            self.logger,
            "read {} values from {}",
            vector.len(),
            path.display()
        );
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::{ExchangeFiles, TextVectorCodec};
    use crate::log::NoOpLogger;
    use crate::model::{IdentityModel, JsonModelLoader, LinearModel, SharedModelLoader};
    use std::fs;
    use tempfile::TempDir;

    fn create_exchange(models: Arc<dyn ModelLoader>) -> (TempDir, VectorExchange) {
        let temp = TempDir::new().unwrap();
        let dir = ExchangeDirectory::open(temp.path(), ExchangeFiles::default()).unwrap();
        let vectors = VectorExchange::new(
            Arc::new(dir),
            Arc::new(TextVectorCodec),
            models,
            Arc::new(NoOpLogger),
        );
        (temp, vectors)
    }

    #[test]
    fn test_input_and_output_are_separate_files() {
        let (temp, vectors) = create_exchange(Arc::new(JsonModelLoader));
        vectors.write_input(&[1.0, 2.0]).unwrap();
        vectors.write_output(&[9.0]).unwrap();

        assert_eq!(vectors.read_input().unwrap(), vec![1.0, 2.0]);
        assert_eq!(vectors.read_output().unwrap(), vec![9.0]);
        assert!(temp.path().join("neural_input").exists());
        assert!(temp.path().join("neural_output").exists());
    }

    #[test]
    fn test_read_output_before_write_is_not_found() {
        let (_temp, vectors) = create_exchange(Arc::new(JsonModelLoader));
        assert!(matches!(
            vectors.read_output(),
            Err(ExchangeError::NotFound { .. })
        ));
    }

    #[test]
    fn test_corrupt_input_is_reported() {
        let (temp, vectors) = create_exchange(Arc::new(JsonModelLoader));
        fs::write(temp.path().join("neural_input"), "1.0\nNaN-ish\n").unwrap();
        assert!(matches!(
            vectors.read_input(),
            Err(ExchangeError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_write_replaces_previous_vector() {
        let (_temp, vectors) = create_exchange(Arc::new(JsonModelLoader));
        vectors.write_input(&[1.0, 2.0, 3.0]).unwrap();
        vectors.write_input(&[4.0]).unwrap();
        assert_eq!(vectors.read_input().unwrap(), vec![4.0]);
    }

    #[test]
    fn test_function_files() {
        let (temp, vectors) = create_exchange(Arc::new(JsonModelLoader));
        vectors.write_function_input(&[0.5]).unwrap();
        vectors.write_function_output(&[0.25]).unwrap();

        assert_eq!(vectors.read_function_input().unwrap(), vec![0.5]);
        assert_eq!(vectors.read_function_output().unwrap(), vec![0.25]);
        assert!(temp.path().join("function_input").exists());
    }

    #[test]
    fn test_load_model_from_artifact() {
        let (temp, vectors) = create_exchange(Arc::new(JsonModelLoader));
        LinearModel::new(vec![vec![0.0, 1.0]], vec![1.0])
            .unwrap()
            .save(&temp.path().join("neural_network"))
            .unwrap();

        let model = vectors.load_model().unwrap();

        assert_eq!(model.compute(&[5.0, 2.0]).unwrap(), vec![3.0]);
    }

    #[test]
    fn test_load_model_missing_artifact() {
        let (_temp, vectors) = create_exchange(Arc::new(JsonModelLoader));
        assert!(matches!(
            vectors.load_model(),
            Err(ExchangeError::NotFound { .. })
        ));
    }

    #[test]
    fn test_shared_model_needs_no_artifact() {
        let (_temp, vectors) =
            create_exchange(Arc::new(SharedModelLoader::new(Arc::new(IdentityModel))));
        assert!(vectors.load_model().is_ok());
    }
}
