//! Translation between the optimizer's reduced vectors and the model's
//! original vectors.
//!
//! A [`MappingDefinition`] lists, per direction, which original positions
//! the optimizer sees and in which reduced slot. A [`DataMapper`] applies it:
//! positions the optimizer does not control are filled from the model's
//! [`DataDefinition`] defaults.
//!
//! ```
//! use approxlink::mapping::{DataMapper, DataSchema, MappingDefinition};
//! use std::sync::Arc;
//!
//! let schema = DataSchema::new()
//!     .with_input("span", 10.0)
//!     .with_input("chord", 2.0)
//!     .with_input("sweep", 0.0)
//!     .with_output("lift", 0.0)
//!     .with_output("drag", 0.0);
//!
//! let mapping = MappingDefinition::builder()
//!     .input(0, "span")
//!     .input(2, "sweep")
//!     .output(1, "drag")
//!     .build();
//!
//! let mapper = DataMapper::new(Some(Arc::new(mapping)), Some(Arc::new(schema))).unwrap();
//!
//! assert_eq!(mapper.map_input(&[12.0, 0.3]).unwrap(), vec![12.0, 2.0, 0.3]);
//! assert_eq!(mapper.map_output(&[0.8, 0.05]).unwrap(), vec![0.05]);
//! ```

mod data_definition;
mod definition;
mod element;
mod error;
mod file;
mod mapper;

pub use data_definition::{DataDefinition, DataElement, DataSchema};
pub use definition::{MappingChecks, MappingDefinition, MappingDefinitionBuilder};
pub use element::{
    Direction, Input, InputMappingElement, MappingDirection, MappingElement, Output,
    OutputMappingElement,
};
pub use error::{MappingError, Violation};
pub use mapper::{DataMapper, SimpleMapper};
