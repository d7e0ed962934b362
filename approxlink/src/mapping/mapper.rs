//! Vector translation between reduced and original space.

use std::fmt;
use std::sync::Arc;

use super::data_definition::DataDefinition;
use super::definition::{inconsistent, MappingDefinition};
use super::element::{Direction, Input, MappingElement, Output};
use super::error::{MappingError, Violation};

/// Applies a mapping, or copies vectors verbatim when none is configured.
#[derive(Debug, Clone)]
pub enum DataMapper {
    Identity,
    Simple(SimpleMapper),
}

impl DataMapper {
    pub fn identity() -> Self {
        DataMapper::Identity
    }

    /// Pick the variant from what is configured.
    ///
    /// No mapping gives `Identity`. A mapping without a data definition is an
    /// argument error, since defaults and lengths come from the latter.
    pub fn new(
        mapping: Option<Arc<MappingDefinition>>,
        data: Option<Arc<dyn DataDefinition>>,
    ) -> Result<Self, MappingError> {
        match (mapping, data) {
            (None, _) => Ok(DataMapper::Identity),
            (Some(_), None) => Err(MappingError::MissingDefinition("data definition")),
            (Some(mapping), Some(data)) => SimpleMapper::new(mapping, data).map(DataMapper::Simple),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, DataMapper::Identity)
    }

    /// Reduced input to original input.
    pub fn map_input(&self, reduced: &[f64]) -> Result<Vec<f64>, MappingError> {
        match self {
            DataMapper::Identity => Ok(reduced.to_vec()),
            DataMapper::Simple(mapper) => mapper.map_input(reduced),
        }
    }

    /// Original output to reduced output.
    pub fn map_output(&self, original: &[f64]) -> Result<Vec<f64>, MappingError> {
        match self {
            DataMapper::Identity => Ok(original.to_vec()),
            DataMapper::Simple(mapper) => mapper.map_output(original),
        }
    }
}

/// One active element resolved to concrete positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Route {
    original: usize,
    slot: usize,
}

/// Mapper backed by a [`MappingDefinition`] and the model's [`DataDefinition`].
///
/// The definition is checked once here; translation itself cannot fail on
/// consistency grounds afterwards, only on vector lengths.
#[derive(Clone)]
pub struct SimpleMapper {
    mapping: Arc<MappingDefinition>,
    data: Arc<dyn DataDefinition>,
    input_routes: Vec<Route>,
    output_routes: Vec<Route>,
}

impl fmt::Debug for SimpleMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleMapper")
            .field("mapping", &self.mapping)
            .field("input_routes", &self.input_routes)
            .field("output_routes", &self.output_routes)
            .finish_non_exhaustive()
    }
}

impl SimpleMapper {
    /// Validate `mapping` against `data` and resolve its routes.
    ///
    /// # Errors
    ///
    /// `Inconsistent` when an enabled check fails (including two elements
    /// resolving to one reduced slot), when an original index lies outside
    /// the data definition, or when a mapped index lies outside the reduced
    /// vector.
    pub fn new(
        mapping: Arc<MappingDefinition>,
        data: Arc<dyn DataDefinition>,
    ) -> Result<Self, MappingError> {
        mapping.validate_with(data.as_ref())?;
        let checks = mapping.checks();
        let input_routes = resolve(mapping.inputs(), data.input_len(), checks.input_uniqueness)
            .map_err(inconsistent::<Input>)?;
        let output_routes = resolve(
            mapping.outputs(),
            data.output_len(),
            checks.output_uniqueness,
        )
        .map_err(inconsistent::<Output>)?;
        Ok(Self {
            mapping,
            data,
            input_routes,
            output_routes,
        })
    }

    pub fn mapping(&self) -> &MappingDefinition {
        &self.mapping
    }

    /// Length of the reduced input vector.
    pub fn reduced_input_len(&self) -> usize {
        self.input_routes.len()
    }

    /// Length of the reduced output vector.
    pub fn reduced_output_len(&self) -> usize {
        self.output_routes.len()
    }

    /// Expand a reduced input, filling unmapped positions with defaults.
    pub fn map_input(&self, reduced: &[f64]) -> Result<Vec<f64>, MappingError> {
        if reduced.len() != self.input_routes.len() {
            return Err(MappingError::LengthMismatch {
                what: "reduced input",
                expected: self.input_routes.len(),
                actual: reduced.len(),
            });
        }
        let mut original: Vec<f64> = (0..self.data.input_len())
            .map(|i| self.data.input_element(i).map_or(0.0, |e| e.default_value))
            .collect();
        for route in &self.input_routes {
            original[route.original] = reduced[route.slot];
        }
        Ok(original)
    }

    /// Pick the mapped positions out of an original output.
    pub fn map_output(&self, original: &[f64]) -> Result<Vec<f64>, MappingError> {
        if original.len() != self.data.output_len() {
            return Err(MappingError::LengthMismatch {
                what: "original output",
                expected: self.data.output_len(),
                actual: original.len(),
            });
        }
        let mut reduced = vec![0.0; self.output_routes.len()];
        for route in &self.output_routes {
            reduced[route.slot] = original[route.original];
        }
        Ok(reduced)
    }
}

/// Resolve active elements to routes.
///
/// Explicit mapped indices claim their slots first. An element without one
/// takes the lowest slot nobody claimed, so the two kinds never collide.
/// With `unique` set, two elements resolving to one slot are rejected.
fn resolve<D: Direction>(
    elements: &[MappingElement<D>],
    original_len: usize,
    unique: bool,
) -> Result<Vec<Route>, Violation> {
    let active = elements.iter().filter(|e| e.is_active()).count();
    let mut claimed: Vec<Option<usize>> = vec![None; active];
    let mut routes = Vec::with_capacity(active);
    let mut pending = Vec::new();

    for (element, mapping) in elements.iter().enumerate() {
        let Some(original) = mapping.original_index() else {
            continue;
        };
        if original >= original_len {
            return Err(Violation::IndexOutOfRange {
                element,
                index: original,
                len: original_len,
            });
        }
        let Some(slot) = mapping.mapped_index() else {
            pending.push(original);
            continue;
        };
        if slot >= active {
            return Err(Violation::IndexOutOfRange {
                element,
                index: slot,
                len: active,
            });
        }
        match claimed[slot] {
            Some(first) if unique => {
                return Err(Violation::DuplicateMappedIndex {
                    index: slot,
                    first,
                    second: element,
                });
            }
            Some(_) => {}
            None => claimed[slot] = Some(element),
        }
        routes.push(Route { original, slot });
    }

    // At least as many free slots as pending elements
    let free = claimed
        .iter()
        .enumerate()
        .filter(|(_, owner)| owner.is_none())
        .map(|(slot, _)| slot);
    for (original, slot) in pending.into_iter().zip(free) {
        routes.push(Route { original, slot });
    }
    Ok(routes)
}
