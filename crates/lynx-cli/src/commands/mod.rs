//! Command handlers, one module per command group

use anyhow::{bail, Result};

use lynx_core::codec::separators;

pub mod catalog;
pub mod config;
pub mod entry;
pub mod playlist;
pub mod status;

/// Reject a playlist or database name the file format cannot store
pub fn check_name(label: &str, name: &str) -> Result<()> {
    if name.starts_with(separators::MARKER) {
        bail!("{} must not start with '{}': {}", label, separators::MARKER, name);
    }
    if name.contains(separators::FIELD) {
        bail!("{} must not contain '{}': {}", label, separators::FIELD, name);
    }
    Ok(())
}
