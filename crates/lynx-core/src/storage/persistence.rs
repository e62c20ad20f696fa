//! Database file persistence
//!
//! Reads and writes the sectioned text file that holds a whole database.
//! Uses atomic writes (write to temp file, then rename) so a failed save
//! leaves the previous file in place.
//!
//! ```text
//! @META
//! <format-version>
//! <database-name>
//! @MAIN
//! <one encoded entry per line>
//! @PLAYLISTS
//! <one encoded playlist per line>
//! @FINAL
//! ```
//!
//! Every line starting with `@` is a marker. A database name or playlist
//! name starting with `@` is written as is and then read back as an unknown
//! section, so the name falls back to the default and the playlist is lost.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::codec::{self, separators::MARKER};
use crate::models::{Entry, Playlist};
use crate::storage::error::{LynxError, LynxResult};

/// Format version written to every saved file
pub const FORMAT_VERSION: &str = "1.0.0";

/// Version reported when a file has no META header
pub const UNKNOWN_VERSION: &str = "0.0.0";

/// Name reported when a file has no database name
pub const DEFAULT_NAME: &str = "Blank";

mod markers {
    pub const META: &str = "META";
    pub const MAIN: &str = "MAIN";
    pub const PLAYLISTS: &str = "PLAYLISTS";
    pub const FINAL: &str = "FINAL";
}

/// Parsing mode selected by the most recent marker line
#[derive(Debug, Clone, PartialEq, Eq)]
enum Section {
    Start,
    Meta,
    Main,
    Playlists,
    Final,
    Unknown(String),
}

impl Section {
    fn from_marker(name: &str) -> Self {
        match name {
            markers::META => Section::Meta,
            markers::MAIN => Section::Main,
            markers::PLAYLISTS => Section::Playlists,
            markers::FINAL => Section::Final,
            other => Section::Unknown(other.to_string()),
        }
    }
}

/// Everything a database file holds
#[derive(Debug, Clone, PartialEq)]
pub struct Contents {
    pub file_version: String,
    pub name: String,
    pub entries: Vec<Entry>,
    pub playlists: Vec<Playlist>,
}

impl Default for Contents {
    fn default() -> Self {
        Self {
            file_version: UNKNOWN_VERSION.to_string(),
            name: DEFAULT_NAME.to_string(),
            entries: Vec::new(),
            playlists: Vec::new(),
        }
    }
}

/// Parse the text of a database file
pub fn parse(text: &str) -> LynxResult<Contents> {
    let mut contents = Contents::default();
    let mut section = Section::Start;
    let mut position = 0usize;
    let mut seen_ids = HashSet::new();

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;

        if let Some(name) = line.strip_prefix(MARKER) {
            section = Section::from_marker(name);
            position = 0;
            if let Section::Unknown(ref name) = section {
                warn!("Ignoring unknown section '{}' at line {}", name, line_number);
            }
            continue;
        }

        match section {
            Section::Meta => match position {
                0 => contents.file_version = line.to_string(),
                1 => contents.name = line.to_string(),
                _ => {}
            },
            Section::Main if !line.is_empty() => {
                let entry = codec::decode_entry(line)
                    .map_err(|source| LynxError::MalformedRecord { line_number, source })?;
                if !seen_ids.insert(entry.id) {
                    warn!("Duplicate entry id {} at line {}", entry.id, line_number);
                }
                contents.entries.push(entry);
            }
            Section::Playlists if !line.is_empty() => {
                let playlist = codec::decode_playlist(line)
                    .map_err(|source| LynxError::MalformedRecord { line_number, source })?;
                contents.playlists.push(playlist);
            }
            _ => {}
        }
        position += 1;
    }

    Ok(contents)
}

/// Render a database as file text, stamped with [`FORMAT_VERSION`]
pub fn render(name: &str, entries: &[Entry], playlists: &[Playlist]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + playlists.len() + 6);
    lines.push(marker(markers::META));
    lines.push(FORMAT_VERSION.to_string());
    lines.push(name.to_string());
    lines.push(marker(markers::MAIN));
    lines.extend(entries.iter().map(codec::encode_entry));
    lines.push(marker(markers::PLAYLISTS));
    lines.extend(playlists.iter().map(codec::encode_playlist));
    lines.push(marker(markers::FINAL));
    lines.join("\n")
}

fn marker(name: &str) -> String {
    format!("{}{}", MARKER, name)
}

/// Read and parse the database file at `path`
pub fn read_database(path: &Path) -> LynxResult<Contents> {
    let text =
        fs::read_to_string(path).map_err(|e| LynxError::read(e, path.to_path_buf()))?;
    parse(&text)
}

/// Replace the file at `path` with `text`
pub fn write_database(path: &Path, text: &str) -> LynxResult<()> {
    atomic_write(path, text.as_bytes())
}

/// Write a fresh, empty database file
///
/// Usable without a live `Store`; the result loads as a store with no
/// entries and no playlists.
pub fn create_database_file(path: impl AsRef<Path>, name: &str) -> LynxResult<()> {
    write_database(path.as_ref(), &render(name, &[], &[]))
}

/// Sibling of `path` with `.tmp` appended to the full file name
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> LynxResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LynxError::write(e, parent.to_path_buf()))?;
    }

    let temp_path = temp_path(path);

    let mut file =
        File::create(&temp_path).map_err(|e| LynxError::write(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| LynxError::write(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| LynxError::write(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| LynxError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
