//! The model's own schema of its input and output vectors.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::element::MappingDirection;
use super::error::MappingError;
use crate::exchange::replace_file;

/// Name and default value of one position of an original vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataElement {
    pub name: String,
    #[serde(rename = "default", default)]
    pub default_value: f64,
}

impl DataElement {
    pub fn new(name: impl Into<String>, default_value: f64) -> Self {
        Self {
            name: name.into(),
            default_value,
        }
    }
}

/// Schema reader for the model's original vectors.
pub trait DataDefinition: Send + Sync {
    /// Length of the original input vector.
    fn input_len(&self) -> usize;

    /// Length of the original output vector.
    fn output_len(&self) -> usize;

    /// Input element at `index`, if in range.
    fn input_element(&self, index: usize) -> Option<DataElement>;

    /// Output element at `index`, if in range.
    fn output_element(&self, index: usize) -> Option<DataElement>;

    /// Element lookup by direction.
    fn element(&self, direction: MappingDirection, index: usize) -> Option<DataElement> {
        match direction {
            MappingDirection::Input => self.input_element(index),
            MappingDirection::Output => self.output_element(index),
        }
    }

    /// Vector length by direction.
    fn len(&self, direction: MappingDirection) -> usize {
        match direction {
            MappingDirection::Input => self.input_len(),
            MappingDirection::Output => self.output_len(),
        }
    }
}

/// Data definition stored as JSON next to the model artifact.
///
/// ```json
/// {
///   "inputs":  [{"name": "span", "default": 10.0}],
///   "outputs": [{"name": "lift", "default": 0.0}]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSchema {
    #[serde(default)]
    inputs: Vec<DataElement>,
    #[serde(default)]
    outputs: Vec<DataElement>,
}

impl DataSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an input position.
    pub fn with_input(mut self, name: impl Into<String>, default_value: f64) -> Self {
        self.inputs.push(DataElement::new(name, default_value));
        self
    }

    /// Append an output position.
    pub fn with_output(mut self, name: impl Into<String>, default_value: f64) -> Self {
        self.outputs.push(DataElement::new(name, default_value));
        self
    }

    pub fn inputs(&self) -> &[DataElement] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[DataElement] {
        &self.outputs
    }

    /// Load a schema from a JSON file.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let text = fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| MappingError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Write the schema as JSON, replacing the file whole.
    pub fn save(&self, path: &Path) -> Result<(), MappingError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| MappingError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        replace_file(path, json.as_bytes()).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl DataDefinition for DataSchema {
    fn input_len(&self) -> usize {
        self.inputs.len()
    }

    fn output_len(&self) -> usize {
        self.outputs.len()
    }

    fn input_element(&self, index: usize) -> Option<DataElement> {
        self.inputs.get(index).cloned()
    }

    fn output_element(&self, index: usize) -> Option<DataElement> {
        self.outputs.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lookup_by_direction() {
        let schema = DataSchema::new()
            .with_input("span", 10.0)
            .with_output("lift", 0.5);

        assert_eq!(schema.len(MappingDirection::Input), 1);
        assert_eq!(
            schema.element(MappingDirection::Output, 0),
            Some(DataElement::new("lift", 0.5))
        );
        assert_eq!(schema.element(MappingDirection::Input, 1), None);
    }

    #[test]
    fn test_parse_defaults_missing_value_to_zero() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("neural_data_definition");
        fs::write(&path, r#"{"inputs": [{"name": "a"}, {"name": "b", "default": 2.5}]}"#)
            .unwrap();

        let schema = DataSchema::load(&path).unwrap();

        assert_eq!(schema.input_len(), 2);
        assert_eq!(schema.output_len(), 0);
        assert_eq!(schema.inputs()[0].default_value, 0.0);
        assert_eq!(schema.inputs()[1].default_value, 2.5);
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("neural_data_definition");
        let schema = DataSchema::new()
            .with_input("x", 1.0)
            .with_output("y", -1.0);

        schema.save(&path).unwrap();

        assert_eq!(DataSchema::load(&path).unwrap(), schema);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = DataSchema::load(&temp.path().join("missing"));
        assert!(matches!(result, Err(MappingError::Io { .. })));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("neural_data_definition");
        fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(
            DataSchema::load(&path),
            Err(MappingError::Parse { .. })
        ));
    }
}
