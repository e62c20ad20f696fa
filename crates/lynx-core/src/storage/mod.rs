//! Storage layer
//!
//! Handles the on-disk database file and the errors raised by the store.
//!
//! ## Layout
//!
//! - **persistence**: section grammar, whole-file read, atomic write
//! - **error**: `LynxError` and its four kinds

pub mod error;
pub mod persistence;

pub use error::{ErrorKind, LynxError, LynxResult};
pub use persistence::{create_database_file, Contents, DEFAULT_NAME, FORMAT_VERSION};
