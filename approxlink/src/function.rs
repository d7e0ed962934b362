//! Reduced-space evaluation: the mapping variant of a request.
//!
//! An optimizer works on a few parameters of a model that has many. A
//! [`MappedFunction`] expands its reduced input, runs the request through
//! the exchange and reduces the output again.

use std::sync::Arc;

use crate::client::ApproximationClient;
use crate::exchange::{ExchangeError, VectorExchange};
use crate::log::Logger;
use crate::log_debug;
use crate::mapping::DataMapper;

/// A reduced-space function evaluated through the exchange.
pub struct MappedFunction {
    mapper: DataMapper,
    client: ApproximationClient,
    vectors: VectorExchange,
    logger: Arc<dyn Logger>,
}

impl MappedFunction {
    pub fn new(
        mapper: DataMapper,
        client: ApproximationClient,
        vectors: VectorExchange,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            mapper,
            client,
            vectors,
            logger,
        }
    }

    pub fn mapper(&self) -> &DataMapper {
        &self.mapper
    }

    /// Evaluate at `reduced` and return the reduced output.
    ///
    /// The busy flag is released once the output has been read. A failed
    /// request keeps it set, like any client request.
    pub fn evaluate(&self, reduced: &[f64]) -> Result<Vec<f64>, ExchangeError> {
        let original = self.mapper.map_input(reduced)?;
        let output = self.client.request(&original)?;
        self.client.release()?;
        let result = self.mapper.map_output(&output)?;
        log_debug!(
            self.logger,
            "evaluated {} -> {} values ({} original inputs)",
            reduced.len(),
            result.len(),
            original.len()
        );
        Ok(result)
    }

    /// Evaluate the vector in `function_input` and store the result in
    /// `function_output`.
    pub fn evaluate_files(&self) -> Result<Vec<f64>, ExchangeError> {
        let reduced = self.vectors.read_function_input()?;
        let result = self.evaluate(&reduced)?;
        self.vectors.write_function_output(&result)?;
        Ok(result)
    }
}
