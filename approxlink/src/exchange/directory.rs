//! Exchange directory and canonical file paths.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::ExchangeError;
use super::flags::Flag;

/// Default file name of the trained model artifact.
pub const DEFAULT_MODEL_FILE: &str = "neural_network";
/// Default file name of the input/output schema.
pub const DEFAULT_DATA_DEFINITION_FILE: &str = "neural_data_definition";
/// Default file name of the reduced/original mapping schema.
pub const DEFAULT_MAPPING_DEFINITION_FILE: &str = "mapping_definition";
/// Default file name of the input vector.
pub const DEFAULT_INPUT_FILE: &str = "neural_input";
/// Default file name of the output vector.
pub const DEFAULT_OUTPUT_FILE: &str = "neural_output";
/// Default file name of the busy flag.
pub const DEFAULT_BUSY_FLAG: &str = "msg_neural_busy";
/// Default file name of the input-ready flag.
pub const DEFAULT_INPUT_READY_FLAG: &str = "msg_neural_input_ready";
/// Default file name of the output-ready flag.
pub const DEFAULT_OUTPUT_READY_FLAG: &str = "msg_neural_output_ready";
/// Default file name of the reduced input vector.
pub const DEFAULT_FUNCTION_INPUT_FILE: &str = "function_input";
/// Default file name of the reduced output vector.
pub const DEFAULT_FUNCTION_OUTPUT_FILE: &str = "function_output";

const WRITE_PROBE: &str = ".approxlink-write-probe";

/// Data files living in the exchange directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFile {
    Model,
    DataDefinition,
    MappingDefinition,
    Input,
    Output,
    FunctionInput,
    FunctionOutput,
}

/// File names used inside the exchange directory.
///
/// Every name can be changed independently; both parties must agree on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeFiles {
    pub model: String,
    pub data_definition: String,
    pub mapping_definition: String,
    pub input: String,
    pub output: String,
    pub busy_flag: String,
    pub input_ready_flag: String,
    pub output_ready_flag: String,
    pub function_input: String,
    pub function_output: String,
}

impl ExchangeFiles {
    /// File name for a data file.
    pub fn data_file(&self, file: DataFile) -> &str {
        match file {
            DataFile::Model => &self.model,
            DataFile::DataDefinition => &self.data_definition,
            DataFile::MappingDefinition => &self.mapping_definition,
            DataFile::Input => &self.input,
            DataFile::Output => &self.output,
            DataFile::FunctionInput => &self.function_input,
            DataFile::FunctionOutput => &self.function_output,
        }
    }

    /// File name for a flag.
    pub fn flag_file(&self, flag: Flag) -> &str {
        match flag {
            Flag::Busy => &self.busy_flag,
            Flag::InputReady => &self.input_ready_flag,
            Flag::OutputReady => &self.output_ready_flag,
        }
    }
}

impl Default for ExchangeFiles {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL_FILE.to_string(),
            data_definition: DEFAULT_DATA_DEFINITION_FILE.to_string(),
            mapping_definition: DEFAULT_MAPPING_DEFINITION_FILE.to_string(),
            input: DEFAULT_INPUT_FILE.to_string(),
            output: DEFAULT_OUTPUT_FILE.to_string(),
            busy_flag: DEFAULT_BUSY_FLAG.to_string(),
            input_ready_flag: DEFAULT_INPUT_READY_FLAG.to_string(),
            output_ready_flag: DEFAULT_OUTPUT_READY_FLAG.to_string(),
            function_input: DEFAULT_FUNCTION_INPUT_FILE.to_string(),
            function_output: DEFAULT_FUNCTION_OUTPUT_FILE.to_string(),
        }
    }
}

/// The shared directory through which client and server communicate.
///
/// Holds an absolute root path that exists and was writable when opened.
/// All exchange paths are joins under it.
///
/// ```
/// use approxlink::exchange::{DataFile, ExchangeDirectory, ExchangeFiles, Flag};
///
/// let temp = tempfile::TempDir::new().unwrap();
/// let dir = ExchangeDirectory::open(temp.path(), ExchangeFiles::default()).unwrap();
///
/// assert_eq!(dir.path(DataFile::Input), dir.root().join("neural_input"));
/// assert_eq!(dir.flag_path(Flag::Busy), dir.root().join("msg_neural_busy"));
/// ```
#[derive(Debug, Clone)]
pub struct ExchangeDirectory {
    root: PathBuf,
    files: ExchangeFiles,
}

impl ExchangeDirectory {
    /// Open the exchange directory, creating it if needed.
    ///
    /// Relative roots are resolved against the current working directory.
    ///
    /// # Errors
    ///
    /// `Io` if the directory cannot be created, `NotWritable` if a probe file
    /// cannot be written into it.
    pub fn open(root: impl AsRef<Path>, files: ExchangeFiles) -> Result<Self, ExchangeError> {
        let root = absolute(root.as_ref())?;
        fs::create_dir_all(&root).map_err(|e| ExchangeError::io(&root, e))?;
        check_writable(&root)?;
        Ok(Self { root, files })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configured file names.
    pub fn files(&self) -> &ExchangeFiles {
        &self.files
    }

    /// Canonical path of a data file.
    pub fn path(&self, file: DataFile) -> PathBuf {
        self.root.join(self.files.data_file(file))
    }

    /// Canonical path of a flag's marker file.
    pub fn flag_path(&self, flag: Flag) -> PathBuf {
        self.root.join(self.files.flag_file(flag))
    }
}

fn absolute(path: &Path) -> Result<PathBuf, ExchangeError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| ExchangeError::io(path, e))?;
    Ok(cwd.join(path))
}

fn check_writable(root: &Path) -> Result<(), ExchangeError> {
    let probe = root.join(WRITE_PROBE);
    fs::write(&probe, b"").map_err(|source| ExchangeError::NotWritable {
        path: root.to_path_buf(),
        source,
    })?;
    fs::remove_file(&probe).map_err(|e| ExchangeError::io(&probe, e))
}
