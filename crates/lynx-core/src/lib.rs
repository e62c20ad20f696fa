//! Lynx Core Library
//!
//! This crate provides the core functionality for Lynx, a flat-file store
//! for URL bookmarks ("entries") and ordered lists of them ("playlists").
//!
//! # Architecture
//!
//! - **Single text file**: the whole database lives in one sectioned,
//!   `^`/`+` delimited file that is read and written in full
//! - **In-memory store**: all queries and mutations run on the loaded data
//!   and are persisted with an explicit save
//!
//! # Quick Start
//!
//! ```text
//! create_database_file("library.lynx", "My Links")?;
//! let mut store = Store::load("library.lynx")?;
//!
//! // Add an entry
//! let id = store.find_free_id();
//! store.create_entry(id, "https://example.com", "Example", vec![], vec!["web".into()])?;
//!
//! // Query entries
//! let web = store.find_by_tag("web");
//!
//! store.quick_save()?;
//! ```
//!
//! # Modules
//!
//! - `store`: Collection owner and integrity rules (main entry point)
//! - `models`: Entry and Playlist records
//! - `codec`: One-line encoding of a single record
//! - `storage`: File persistence and errors
//! - `config`: Application configuration

pub mod codec;
pub mod config;
pub mod models;
pub mod storage;
pub mod store;

pub use codec::RecordError;
pub use config::Config;
pub use models::{Entry, EntryId, Playlist};
pub use storage::{create_database_file, ErrorKind, LynxError, LynxResult, FORMAT_VERSION};
pub use store::Store;
