//! Data models for Lynx
//!
//! Defines the two record types held by a database file: `Entry` and
//! `Playlist`. A playlist refers to entries by id only; the `Store` owns
//! both collections and keeps those references consistent.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Numeric primary key of an entry
pub type EntryId = u64;

/// A saved URL with metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    /// Unique identifier within a store
    pub id: EntryId,
    /// The URL
    pub url: String,
    /// Display label
    pub name: String,
    /// Author(s) of the linked content
    pub authors: Vec<String>,
    /// Tags for organization
    pub tags: Vec<String>,
}

impl Entry {
    /// Create an entry with every field supplied
    pub fn new(
        id: EntryId,
        url: impl Into<String>,
        name: impl Into<String>,
        authors: Vec<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id,
            url: url.into(),
            name: name.into(),
            authors,
            tags,
        }
    }

    /// Check whether the given author is credited on this entry
    pub fn has_author(&self, author: &str) -> bool {
        self.authors.iter().any(|a| a == author)
    }

    /// Check whether the entry carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// An ordered list of entry ids
///
/// Duplicates are allowed and order is significant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Playlist {
    /// Display name (not necessarily unique)
    pub name: String,
    /// Referenced entry ids, in playback order
    pub entry_ids: Vec<EntryId>,
}

impl Playlist {
    /// Create an empty playlist
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry_ids: Vec::new(),
        }
    }

    /// Create a playlist with the given references (for loading from storage)
    pub fn with_ids(name: impl Into<String>, entry_ids: Vec<EntryId>) -> Self {
        Self {
            name: name.into(),
            entry_ids,
        }
    }

    /// Check whether the playlist references `id` at least once
    pub fn contains(&self, id: EntryId) -> bool {
        self.entry_ids.contains(&id)
    }

    pub(crate) fn push(&mut self, id: EntryId) {
        self.entry_ids.push(id);
    }

    /// Remove the first occurrence of `id`, returning whether one was found
    pub(crate) fn remove_first(&mut self, id: EntryId) -> bool {
        match self.entry_ids.iter().position(|&e| e == id) {
            Some(pos) => {
                self.entry_ids.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drop every occurrence of `id`
    pub(crate) fn remove_all(&mut self, id: EntryId) {
        self.entry_ids.retain(|&e| e != id);
    }

    /// Rewrite every occurrence of `old` to `new`, keeping positions
    pub(crate) fn replace_all(&mut self, old: EntryId, new: EntryId) {
        for e in self.entry_ids.iter_mut().filter(|e| **e == old) {
            *e = new;
        }
    }

    /// Rewrite every reference found in `mapping`; others are kept
    pub(crate) fn remap(&mut self, mapping: &HashMap<EntryId, EntryId>) {
        for e in &mut self.entry_ids {
            if let Some(&new) = mapping.get(e) {
                *e = new;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_entry_new() {
        let entry = Entry::new(
            3,
            "https://example.com",
            "Example",
            strings(&["alice"]),
            strings(&["web", "rust"]),
        );
        assert_eq!(entry.id, 3);
        assert_eq!(entry.url, "https://example.com");
        assert_eq!(entry.name, "Example");
        assert_eq!(entry.authors, vec!["alice"]);
        assert_eq!(entry.tags, vec!["web", "rust"]);
    }

    #[test]
    fn test_entry_membership() {
        let entry = Entry::new(1, "u", "n", strings(&["alice"]), strings(&["x"]));
        assert!(entry.has_author("alice"));
        assert!(!entry.has_author("bob"));
        assert!(entry.has_tag("x"));
        assert!(!entry.has_tag("alice"));
    }

    #[test]
    fn test_playlist_new_is_empty() {
        let playlist = Playlist::new("Reading");
        assert_eq!(playlist.name, "Reading");
        assert!(playlist.entry_ids.is_empty());
    }

    #[test]
    fn test_playlist_remove_first_keeps_later_duplicates() {
        let mut playlist = Playlist::with_ids("p", vec![1, 2, 1, 3]);
        assert!(playlist.remove_first(1));
        assert_eq!(playlist.entry_ids, vec![2, 1, 3]);
        assert!(!playlist.remove_first(9));
    }

    #[test]
    fn test_playlist_remove_all() {
        let mut playlist = Playlist::with_ids("p", vec![1, 2, 1, 3]);
        playlist.remove_all(1);
        assert_eq!(playlist.entry_ids, vec![2, 3]);
        assert!(!playlist.contains(1));
    }

    #[test]
    fn test_playlist_replace_all_keeps_positions() {
        let mut playlist = Playlist::with_ids("p", vec![4, 2, 4]);
        playlist.replace_all(4, 7);
        assert_eq!(playlist.entry_ids, vec![7, 2, 7]);
    }

    #[test]
    fn test_playlist_remap_in_one_pass() {
        let mut playlist = Playlist::with_ids("p", vec![2, 1, 9, 2]);
        // Swapping ids must not chain 1 -> 2 -> 1
        let mapping = HashMap::from([(1, 2), (2, 1)]);
        playlist.remap(&mapping);
        assert_eq!(playlist.entry_ids, vec![1, 2, 9, 1]);
    }

    #[test]
    fn test_entry_serialization() {
        let entry = Entry::new(1, "https://a", "A", strings(&["alice"]), Vec::new());
        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, deserialized);
    }
}
