//! Shared wiring for the client and server.
//!
//! An [`ExchangeContext`] bundles the exchange directory with the
//! collaborators every component needs: the vector codec, the model loader,
//! the in-process flag notifier and the logger. Client and server built from
//! the same context (or clones of it) share one notifier, so same-process
//! waits wake immediately.

use std::sync::Arc;

use crate::exchange::{
    DataFile, ExchangeDirectory, ExchangeError, FlagNotifier, FlagProtocol, TextVectorCodec,
    VectorCodec, VectorExchange,
};
use crate::log::{Logger, NoOpLogger};
use crate::mapping::{DataDefinition, DataMapper, DataSchema, MappingDefinition};
use crate::model::{JsonModelLoader, ModelLoader};

/// Everything a client or server needs to talk through one exchange directory.
///
/// ```
/// use approxlink::context::ExchangeContext;
/// use approxlink::exchange::{ExchangeDirectory, ExchangeFiles, Flag};
///
/// let temp = tempfile::TempDir::new().unwrap();
/// let dir = ExchangeDirectory::open(temp.path(), ExchangeFiles::default()).unwrap();
/// let ctx = ExchangeContext::builder(dir).build();
///
/// ctx.flags().set(Flag::Busy).unwrap();
/// assert!(ctx.flags().snapshot().busy);
/// ```
#[derive(Clone)]
pub struct ExchangeContext {
    directory: Arc<ExchangeDirectory>,
    codec: Arc<dyn VectorCodec>,
    models: Arc<dyn ModelLoader>,
    notifier: Arc<FlagNotifier>,
    logger: Arc<dyn Logger>,
}

impl ExchangeContext {
    /// Start building a context over `directory`.
    pub fn builder(directory: ExchangeDirectory) -> ExchangeContextBuilder {
        ExchangeContextBuilder::new(directory)
    }

    pub fn directory(&self) -> &ExchangeDirectory {
        &self.directory
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// Flag operations on this directory.
    pub fn flags(&self) -> FlagProtocol {
        FlagProtocol::new(
            Arc::clone(&self.directory),
            Arc::clone(&self.notifier),
            Arc::clone(&self.logger),
        )
    }

    /// Vector and model I/O on this directory.
    pub fn vectors(&self) -> VectorExchange {
        VectorExchange::new(
            Arc::clone(&self.directory),
            Arc::clone(&self.codec),
            Arc::clone(&self.models),
            Arc::clone(&self.logger),
        )
    }

    /// Load the mapping definition and data definition files and build a
    /// mapper from them.
    ///
    /// # Errors
    ///
    /// `Mapping` when either file is missing or unreadable, or when the
    /// mapping is inconsistent with the data definition.
    pub fn load_mapper(&self) -> Result<DataMapper, ExchangeError> {
        let mapping = MappingDefinition::load(&self.directory.path(DataFile::MappingDefinition))?;
        let schema = DataSchema::load(&self.directory.path(DataFile::DataDefinition))?;
        let data: Arc<dyn DataDefinition> = Arc::new(schema);
        Ok(DataMapper::new(Some(Arc::new(mapping)), Some(data))?)
    }
}

/// Builder for [`ExchangeContext`].
///
/// Defaults: [`TextVectorCodec`], [`JsonModelLoader`], [`NoOpLogger`] and a
/// fresh notifier.
pub struct ExchangeContextBuilder {
    directory: ExchangeDirectory,
    codec: Arc<dyn VectorCodec>,
    models: Arc<dyn ModelLoader>,
    notifier: Arc<FlagNotifier>,
    logger: Arc<dyn Logger>,
}

impl ExchangeContextBuilder {
    fn new(directory: ExchangeDirectory) -> Self {
        Self {
            directory,
            codec: Arc::new(TextVectorCodec),
            models: Arc::new(JsonModelLoader),
            notifier: Arc::new(FlagNotifier::new()),
            logger: Arc::new(NoOpLogger),
        }
    }

    pub fn codec(mut self, codec: Arc<dyn VectorCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn models(mut self, models: Arc<dyn ModelLoader>) -> Self {
        self.models = models;
        self
    }

    /// Share a notifier with another context over the same directory.
    pub fn notifier(mut self, notifier: Arc<FlagNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn build(self) -> ExchangeContext {
        ExchangeContext {
            directory: Arc::new(self.directory),
            codec: self.codec,
            models: self.models,
            notifier: self.notifier,
            logger: self.logger,
        }
    }
}
