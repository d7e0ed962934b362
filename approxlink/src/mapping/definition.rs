//! Mapping definitions and their consistency checks.

use super::data_definition::DataDefinition;
use super::element::{
    Direction, Input, InputMappingElement, MappingElement, Output, OutputMappingElement,
};
use super::error::{MappingError, Violation};

/// Switches for the four independent consistency checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingChecks {
    pub input_uniqueness: bool,
    pub output_uniqueness: bool,
    pub input_name_consistency: bool,
    pub output_name_consistency: bool,
}

impl MappingChecks {
    /// Every check enabled.
    pub fn all() -> Self {
        Self {
            input_uniqueness: true,
            output_uniqueness: true,
            input_name_consistency: true,
            output_name_consistency: true,
        }
    }

    /// Every check disabled.
    pub fn none() -> Self {
        Self {
            input_uniqueness: false,
            output_uniqueness: false,
            input_name_consistency: false,
            output_name_consistency: false,
        }
    }
}

impl Default for MappingChecks {
    fn default() -> Self {
        Self::all()
    }
}

/// Ordered correspondence between reduced and original vectors.
///
/// Built once (from a file or a [`MappingDefinitionBuilder`]) and shared
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappingDefinition {
    inputs: Vec<InputMappingElement>,
    outputs: Vec<OutputMappingElement>,
    checks: MappingChecks,
}

impl MappingDefinition {
    pub fn new(
        inputs: Vec<InputMappingElement>,
        outputs: Vec<OutputMappingElement>,
        checks: MappingChecks,
    ) -> Self {
        Self {
            inputs,
            outputs,
            checks,
        }
    }

    pub fn builder() -> MappingDefinitionBuilder {
        MappingDefinitionBuilder::default()
    }

    pub fn inputs(&self) -> &[InputMappingElement] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputMappingElement] {
        &self.outputs
    }

    pub fn checks(&self) -> MappingChecks {
        self.checks
    }

    /// Same definition with different check switches.
    pub fn with_checks(mut self, checks: MappingChecks) -> Self {
        self.checks = checks;
        self
    }

    /// Length of the reduced input vector.
    pub fn mapped_input_count(&self) -> usize {
        self.inputs.iter().filter(|e| e.is_active()).count()
    }

    /// Length of the reduced output vector.
    pub fn mapped_output_count(&self) -> usize {
        self.outputs.iter().filter(|e| e.is_active()).count()
    }

    /// Uniqueness of the input list, if that check is enabled.
    pub fn is_input_consistent(&self) -> bool {
        !self.checks.input_uniqueness || check_uniqueness(&self.inputs).is_ok()
    }

    /// Uniqueness of the output list, if that check is enabled.
    pub fn is_output_consistent(&self) -> bool {
        !self.checks.output_uniqueness || check_uniqueness(&self.outputs).is_ok()
    }

    /// Input names against the data definition, if that check is enabled.
    pub fn is_input_consistent_with(&self, data: &dyn DataDefinition) -> bool {
        !self.checks.input_name_consistency || check_names(&self.inputs, data).is_ok()
    }

    /// Output names against the data definition, if that check is enabled.
    pub fn is_output_consistent_with(&self, data: &dyn DataDefinition) -> bool {
        !self.checks.output_name_consistency || check_names(&self.outputs, data).is_ok()
    }

    /// Run the enabled uniqueness checks and report the first violation.
    pub fn validate(&self) -> Result<(), MappingError> {
        if self.checks.input_uniqueness {
            check_uniqueness(&self.inputs).map_err(inconsistent::<Input>)?;
        }
        if self.checks.output_uniqueness {
            check_uniqueness(&self.outputs).map_err(inconsistent::<Output>)?;
        }
        Ok(())
    }

    /// Run every enabled check, names included, against `data`.
    pub fn validate_with(&self, data: &dyn DataDefinition) -> Result<(), MappingError> {
        self.validate()?;
        if self.checks.input_name_consistency {
            check_names(&self.inputs, data).map_err(inconsistent::<Input>)?;
        }
        if self.checks.output_name_consistency {
            check_names(&self.outputs, data).map_err(inconsistent::<Output>)?;
        }
        Ok(())
    }
}

pub(super) fn inconsistent<D: Direction>(violation: Violation) -> MappingError {
    MappingError::Inconsistent {
        direction: D::KIND,
        violation,
    }
}

/// Pairwise comparison of every element against every later one.
///
/// Unspecified indices never collide.
fn check_uniqueness<D: Direction>(elements: &[MappingElement<D>]) -> Result<(), Violation> {
    for (first, a) in elements.iter().enumerate() {
        for (offset, b) in elements[first + 1..].iter().enumerate() {
            let second = first + 1 + offset;
            if let (Some(x), Some(y)) = (a.original_index(), b.original_index()) {
                if x == y {
                    return Err(Violation::DuplicateOriginalIndex {
                        index: x,
                        first,
                        second,
                    });
                }
            }
            if let (Some(x), Some(y)) = (a.mapped_index(), b.mapped_index()) {
                if x == y {
                    return Err(Violation::DuplicateMappedIndex {
                        index: x,
                        first,
                        second,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Every element with an original index must carry the data definition's
/// name for that index.
fn check_names<D: Direction>(
    elements: &[MappingElement<D>],
    data: &dyn DataDefinition,
) -> Result<(), Violation> {
    for (element, mapping) in elements.iter().enumerate() {
        let Some(index) = mapping.original_index() else {
            continue;
        };
        let Some(expected) = data.element(D::KIND, index) else {
            return Err(Violation::IndexOutOfRange {
                element,
                index,
                len: data.len(D::KIND),
            });
        };
        if expected.name != mapping.name() {
            return Err(Violation::NameMismatch {
                element,
                index,
                expected: expected.name,
                found: mapping.name().to_string(),
            });
        }
    }
    Ok(())
}

/// Incremental construction of a [`MappingDefinition`].
///
/// `input` and `output` assign mapped indices in insertion order.
///
/// ```
/// use approxlink::mapping::{MappingChecks, MappingDefinition};
///
/// let mapping = MappingDefinition::builder()
///     .input(4, "chord")
///     .input(1, "span")
///     .output(0, "lift")
///     .checks(MappingChecks::none())
///     .build();
///
/// assert_eq!(mapping.inputs()[1].mapped_index(), Some(1));
/// assert_eq!(mapping.mapped_input_count(), 2);
/// assert!(!mapping.checks().input_uniqueness);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MappingDefinitionBuilder {
    inputs: Vec<InputMappingElement>,
    outputs: Vec<OutputMappingElement>,
    checks: MappingChecks,
}

impl MappingDefinitionBuilder {
    /// Map original input `original_index` to the next reduced slot.
    pub fn input(mut self, original_index: usize, name: impl Into<String>) -> Self {
        let slot = self.inputs.len();
        self.inputs
            .push(InputMappingElement::mapped(original_index, slot, name));
        self
    }

    /// Map original output `original_index` to the next reduced slot.
    pub fn output(mut self, original_index: usize, name: impl Into<String>) -> Self {
        let slot = self.outputs.len();
        self.outputs
            .push(OutputMappingElement::mapped(original_index, slot, name));
        self
    }

    /// Append a fully specified input element.
    pub fn input_element(mut self, element: InputMappingElement) -> Self {
        self.inputs.push(element);
        self
    }

    /// Append a fully specified output element.
    pub fn output_element(mut self, element: OutputMappingElement) -> Self {
        self.outputs.push(element);
        self
    }

    pub fn checks(mut self, checks: MappingChecks) -> Self {
        self.checks = checks;
        self
    }

    pub fn build(self) -> MappingDefinition {
        MappingDefinition::new(self.inputs, self.outputs, self.checks)
    }
}
