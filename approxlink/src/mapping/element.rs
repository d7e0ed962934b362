//! Mapping elements, tagged by direction at the type level.
//!
//! Input and output elements have the same shape but must never be mixed
//! up. The direction is a zero-sized type parameter, so an
//! `InputMappingElement` cannot be pushed into an output list.

use std::fmt;
use std::marker::PhantomData;

/// Runtime name of a mapping direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingDirection {
    Input,
    Output,
}

impl fmt::Display for MappingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingDirection::Input => f.write_str("input"),
            MappingDirection::Output => f.write_str("output"),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Type-level direction tag. Implemented only by [`Input`] and [`Output`].
pub trait Direction:
    sealed::Sealed + Copy + fmt::Debug + PartialEq + Eq + Send + Sync + 'static
{
    const KIND: MappingDirection;
}

/// Tag for elements of the input list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Input;

/// Tag for elements of the output list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Output;

impl sealed::Sealed for Input {}
impl sealed::Sealed for Output {}

impl Direction for Input {
    const KIND: MappingDirection = MappingDirection::Input;
}

impl Direction for Output {
    const KIND: MappingDirection = MappingDirection::Output;
}

pub type InputMappingElement = MappingElement<Input>;
pub type OutputMappingElement = MappingElement<Output>;

/// Correspondence of one scalar between the original and reduced vectors.
///
/// An index is either specified or not; there is no separate flag that could
/// disagree with it. Setting a negative raw index makes it unspecified.
///
/// ```
/// use approxlink::mapping::InputMappingElement;
///
/// let mut element = InputMappingElement::new("span").with_original_index(3);
/// assert_eq!(element.original_index(), Some(3));
///
/// element.set_original_index(-1);
/// assert!(!element.is_original_index_specified());
/// assert_eq!(element.raw_original_index(), -1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingElement<D: Direction> {
    original_index: Option<usize>,
    mapped_index: Option<usize>,
    name: String,
    title: String,
    description: String,
    _direction: PhantomData<D>,
}

impl<D: Direction> MappingElement<D> {
    /// Element with both indices unspecified.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            original_index: None,
            mapped_index: None,
            name: name.into(),
            title: String::new(),
            description: String::new(),
            _direction: PhantomData,
        }
    }

    /// Element mapping `original` to reduced slot `mapped`.
    pub fn mapped(original: usize, mapped: usize, name: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.original_index = Some(original);
        element.mapped_index = Some(mapped);
        element
    }

    pub fn direction(&self) -> MappingDirection {
        D::KIND
    }

    pub fn with_original_index(mut self, index: i64) -> Self {
        self.set_original_index(index);
        self
    }

    pub fn with_mapped_index(mut self, index: i64) -> Self {
        self.set_mapped_index(index);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the original index; negative values mean unspecified.
    pub fn set_original_index(&mut self, index: i64) {
        self.original_index = usize::try_from(index).ok();
    }

    /// Set the mapped index; negative values mean unspecified.
    pub fn set_mapped_index(&mut self, index: i64) {
        self.mapped_index = usize::try_from(index).ok();
    }

    pub fn original_index(&self) -> Option<usize> {
        self.original_index
    }

    pub fn mapped_index(&self) -> Option<usize> {
        self.mapped_index
    }

    /// Original index with `-1` for unspecified.
    pub fn raw_original_index(&self) -> i64 {
        raw(self.original_index)
    }

    /// Mapped index with `-1` for unspecified.
    pub fn raw_mapped_index(&self) -> i64 {
        raw(self.mapped_index)
    }

    pub fn is_original_index_specified(&self) -> bool {
        self.original_index.is_some()
    }

    pub fn is_mapped_index_specified(&self) -> bool {
        self.mapped_index.is_some()
    }

    /// An element takes part in translation only once its original position is known.
    pub fn is_active(&self) -> bool {
        self.original_index.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

fn raw(index: Option<usize>) -> i64 {
    index
        .and_then(|i| i64::try_from(i).ok())
        .unwrap_or(-1)
}
