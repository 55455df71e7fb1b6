//! Common types shared across the ts2rs pipeline.
//!
//! This crate is the base layer of the workspace: configuration, error
//! types, and name-case utilities used by both the resolver and the
//! emitter. Nothing here depends on the surface-language front-end or on
//! the IR, which keeps the dependency graph a straight line:
//!
//! ```text
//! common -> host -> resolver -> emitter -> facade
//! ```

pub mod case;
pub mod error;
pub mod options;

pub use error::{ConvertError, HostError};
pub use options::{ConvertOptions, TypeMapping};
