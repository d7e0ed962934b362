//! approxlink - file-based request/response exchange for trained approximators
//!
//! A client and a server share nothing but a directory. The client writes
//! an input vector and raises a marker-file flag; the server notices,
//! runs the model and answers the same way. Either side may live in another
//! process, or another language, as long as it follows the flag protocol.
//!
//! # In-process use
//!
//! ```
//! use approxlink::client::ApproximationClient;
//! use approxlink::context::ExchangeContext;
//! use approxlink::exchange::{ExchangeDirectory, ExchangeFiles, WaitPolicy};
//! use approxlink::model::{IdentityModel, SharedModelLoader};
//! use approxlink::server::ApproximationServer;
//! use std::sync::Arc;
//!
//! let temp = tempfile::TempDir::new().unwrap();
//! let dir = ExchangeDirectory::open(temp.path(), ExchangeFiles::default()).unwrap();
//! let ctx = ExchangeContext::builder(dir)
//!     .models(Arc::new(SharedModelLoader::new(Arc::new(IdentityModel))))
//!     .build();
//!
//! let server = Arc::new(ApproximationServer::new(&ctx));
//! let client = ApproximationClient::new(&ctx, server, WaitPolicy::new());
//!
//! assert_eq!(client.request(&[1.0, 2.0]).unwrap(), vec![1.0, 2.0]);
//! client.release().unwrap();
//! ```
//!
//! # Modules
//!
//! - [`exchange`]: directory layout, flags, vector I/O
//! - [`client`] / [`server`]: the two halves of the protocol
//! - [`mapping`]: reduced/original vector translation
//! - [`function`]: reduced-space evaluation on top of the client
//! - [`config`], [`log`], [`logging`]: host plumbing

pub mod client;
pub mod config;
pub mod context;
pub mod exchange;
pub mod function;
pub mod log;
pub mod logging;
pub mod mapping;
pub mod model;
pub mod server;

/// Version of the approxlink library and CLI.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
