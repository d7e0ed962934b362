//! JSON persistence for mapping definitions.
//!
//! Indices are stored as signed integers with `-1` meaning unspecified, so
//! files written by other tools round-trip without loss.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::definition::{MappingChecks, MappingDefinition};
use super::element::{Direction, MappingElement};
use super::error::MappingError;
use crate::exchange::replace_file;

const UNSPECIFIED: i64 = -1;

fn enabled() -> bool {
    true
}

fn unspecified() -> i64 {
    UNSPECIFIED
}

#[derive(Debug, Serialize, Deserialize)]
struct MappingFile {
    #[serde(default = "enabled")]
    check_input_uniqueness: bool,
    #[serde(default = "enabled")]
    check_output_uniqueness: bool,
    #[serde(default = "enabled")]
    check_input_name_consistency: bool,
    #[serde(default = "enabled")]
    check_output_name_consistency: bool,
    #[serde(default)]
    inputs: Vec<ElementRecord>,
    #[serde(default)]
    outputs: Vec<ElementRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ElementRecord {
    #[serde(default = "unspecified")]
    original_index: i64,
    #[serde(default = "unspecified")]
    mapped_index: i64,
    name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    description: String,
}

impl ElementRecord {
    fn from_element<D: Direction>(element: &MappingElement<D>) -> Self {
        Self {
            original_index: element.raw_original_index(),
            mapped_index: element.raw_mapped_index(),
            name: element.name().to_string(),
            title: element.title().to_string(),
            description: element.description().to_string(),
        }
    }

    fn into_element<D: Direction>(self) -> MappingElement<D> {
        MappingElement::new(self.name)
            .with_original_index(self.original_index)
            .with_mapped_index(self.mapped_index)
            .with_title(self.title)
            .with_description(self.description)
    }
}

impl From<MappingFile> for MappingDefinition {
    fn from(file: MappingFile) -> Self {
        let checks = MappingChecks {
            input_uniqueness: file.check_input_uniqueness,
            output_uniqueness: file.check_output_uniqueness,
            input_name_consistency: file.check_input_name_consistency,
            output_name_consistency: file.check_output_name_consistency,
        };
        MappingDefinition::new(
            file.inputs.into_iter().map(ElementRecord::into_element).collect(),
            file.outputs.into_iter().map(ElementRecord::into_element).collect(),
            checks,
        )
    }
}

impl From<&MappingDefinition> for MappingFile {
    fn from(definition: &MappingDefinition) -> Self {
        let checks = definition.checks();
        Self {
            check_input_uniqueness: checks.input_uniqueness,
            check_output_uniqueness: checks.output_uniqueness,
            check_input_name_consistency: checks.input_name_consistency,
            check_output_name_consistency: checks.output_name_consistency,
            inputs: definition.inputs().iter().map(ElementRecord::from_element).collect(),
            outputs: definition.outputs().iter().map(ElementRecord::from_element).collect(),
        }
    }
}

impl MappingDefinition {
    /// Parse a definition from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<MappingFile>(json).map(MappingDefinition::from)
    }

    /// Render the definition as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&MappingFile::from(self))
    }

    /// Load a definition from a JSON file.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let text = fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|e| MappingError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Write the definition as JSON, replacing the file whole.
    pub fn save(&self, path: &Path) -> Result<(), MappingError> {
        let json = self.to_json().map_err(|e| MappingError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        replace_file(path, json.as_bytes()).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
