//! File-based exchange primitives shared by client and server.
//!
//! The exchange directory is the only state the two parties share. Data
//! files are replaced whole, and three zero-length marker files
//! (busy, input-ready, output-ready) carry the request state.
//!
//! # Layout
//!
//! ```text
//! <exchange dir>/
//!   neural_network            trained model artifact
//!   neural_data_definition    input/output schema
//!   mapping_definition        reduced/original mapping
//!   neural_input              input vector
//!   neural_output             output vector
//!   function_input            reduced input (mapping variant)
//!   function_output           reduced output (mapping variant)
//!   msg_neural_busy           flag
//!   msg_neural_input_ready    flag
//!   msg_neural_output_ready   flag
//! ```

mod codec;
mod directory;
mod error;
mod flags;
mod vectors;
mod wait;

pub use codec::{replace_file, TextVectorCodec, VectorCodec};
pub use directory::{DataFile, ExchangeDirectory, ExchangeFiles};
pub use error::ExchangeError;
pub use flags::{Flag, FlagNotifier, FlagProtocol, FlagSnapshot};
pub use vectors::VectorExchange;
pub use wait::WaitPolicy;
