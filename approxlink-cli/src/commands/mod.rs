//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`evaluate`] - Reduced-space evaluation through the mapping files
//! - [`flags`] - Flag inspection and recovery
//! - [`mapping`] - Mapping consistency check
//! - [`request`] - Single request from the command line
//! - [`serve`] - Serve loop and single-shot serving

pub mod common;
pub mod config;
pub mod evaluate;
pub mod flags;
pub mod mapping;
pub mod request;
pub mod serve;
