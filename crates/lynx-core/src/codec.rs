//! Record codec
//!
//! Maps a single `Entry` or `Playlist` to and from one line of text.
//!
//! ```text
//! entry:    <id>^<url>^<name>^<author>+<author>^<tag>+<tag>
//! playlist: <name>^<id>+<id>
//! ```
//!
//! Field values are written verbatim. A value containing `^` or `+` will not
//! survive a round trip; nothing here detects that. A playlist line whose
//! name starts with `@` encodes fine but is read back by the file parser as
//! a section marker, so such names are lost on reload.

use thiserror::Error;

use crate::models::{Entry, EntryId, Playlist};

/// Separators reserved by the line format
pub mod separators {
    /// Between the fields of one record
    pub const FIELD: char = '^';
    /// Between the items of a multi-valued field
    pub const LIST: char = '+';
    /// Starts a section marker line in the database file
    pub const MARKER: char = '@';
}

const ENTRY_FIELDS: usize = 5;
const PLAYLIST_FIELDS: usize = 2;

/// Errors raised while decoding a record line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("{kind} record has {found} fields, expected {expected}")]
    FieldCount {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid entry id: '{0}'")]
    InvalidId(String),
}

/// Encode an entry as a single line
pub fn encode_entry(entry: &Entry) -> String {
    let id = entry.id.to_string();
    let authors = join_list(&entry.authors);
    let tags = join_list(&entry.tags);
    [
        id.as_str(),
        entry.url.as_str(),
        entry.name.as_str(),
        authors.as_str(),
        tags.as_str(),
    ]
    .join(&separators::FIELD.to_string())
}

/// Decode a line produced by [`encode_entry`]
pub fn decode_entry(line: &str) -> Result<Entry, RecordError> {
    let fields = split_fields(line, "Entry", ENTRY_FIELDS)?;
    Ok(Entry {
        id: parse_id(fields[0])?,
        url: fields[1].to_string(),
        name: fields[2].to_string(),
        authors: split_list(fields[3]),
        tags: split_list(fields[4]),
    })
}

/// Encode a playlist as a single line
pub fn encode_playlist(playlist: &Playlist) -> String {
    let ids: Vec<String> = playlist.entry_ids.iter().map(|id| id.to_string()).collect();
    format!(
        "{}{}{}",
        playlist.name,
        separators::FIELD,
        join_list(&ids)
    )
}

/// Decode a line produced by [`encode_playlist`]
pub fn decode_playlist(line: &str) -> Result<Playlist, RecordError> {
    let fields = split_fields(line, "Playlist", PLAYLIST_FIELDS)?;
    let entry_ids = split_list(fields[1])
        .iter()
        .map(|raw| parse_id(raw))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Playlist::with_ids(fields[0], entry_ids))
}

fn split_fields<'a>(
    line: &'a str,
    kind: &'static str,
    expected: usize,
) -> Result<Vec<&'a str>, RecordError> {
    let fields: Vec<&str> = line.split(separators::FIELD).collect();
    if fields.len() != expected {
        return Err(RecordError::FieldCount {
            kind,
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn join_list(values: &[String]) -> String {
    values.join(&separators::LIST.to_string())
}

/// An empty field means an empty list, not a list holding `""`
fn split_list(field: &str) -> Vec<String> {
    if field.is_empty() {
        return Vec::new();
    }
    field.split(separators::LIST).map(str::to_string).collect()
}

fn parse_id(raw: &str) -> Result<EntryId, RecordError> {
    raw.parse()
        .map_err(|_| RecordError::InvalidId(raw.to_string()))
}
