//! Unified storage interface
//!
//! The `Store` owns every entry and playlist of one database file and is
//! the only sanctioned way to change them. Playlists point at entries by
//! id, so any operation that removes or renumbers an entry rewrites the
//! playlists first.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::load("library.lynx")?;
//!
//! let id = store.find_free_id();
//! store.create_entry(id, "https://example.com", "Example", vec![], vec![])?;
//!
//! let reading = store.create_playlist("Reading");
//! store.add_to_playlist(reading, id)?;
//!
//! store.quick_save()?;
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::config::Config;
use crate::models::{Entry, EntryId, Playlist};
use crate::storage::persistence::{self, Contents, FORMAT_VERSION};
use crate::storage::{LynxError, LynxResult};

/// In-memory view of one database file
#[derive(Debug, Clone)]
pub struct Store {
    /// File this store was loaded from; target of `quick_save`
    path: PathBuf,
    /// Format version read from the file header
    file_version: String,
    /// Database display name
    name: String,
    entries: Vec<Entry>,
    playlists: Vec<Playlist>,
    /// Emit a trace line for every operation
    verbose: bool,
}

impl Store {
    /// Create an empty store bound to `path` without touching disk
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file_version: FORMAT_VERSION.to_string(),
            name: name.into(),
            entries: Vec::new(),
            playlists: Vec::new(),
            verbose: false,
        }
    }

    /// Write a fresh database file at `path` and return the empty store
    pub fn create(path: impl Into<PathBuf>, name: impl Into<String>) -> LynxResult<Self> {
        let store = Self::new(path, name);
        persistence::create_database_file(&store.path, &store.name)?;
        Ok(store)
    }

    /// Load the database file at `path`
    pub fn load(path: impl AsRef<Path>) -> LynxResult<Self> {
        Self::load_with_verbose(path, false)
    }

    /// Load the database named by the configuration
    pub fn open_with_config(config: &Config) -> LynxResult<Self> {
        Self::load_with_verbose(config.database_path(), config.verbose)
    }

    /// Load the database file at `path`, optionally tracing every operation
    pub fn load_with_verbose(path: impl AsRef<Path>, verbose: bool) -> LynxResult<Self> {
        let path = path.as_ref();
        if verbose {
            info!(at = %Local::now(), "Lynx file load starting: {}", path.display());
        }

        let Contents {
            file_version,
            name,
            entries,
            playlists,
        } = persistence::read_database(path)?;

        if verbose {
            info!(
                at = %Local::now(),
                "Lynx file load completed: {} entries, {} playlists",
                entries.len(),
                playlists.len()
            );
        }

        Ok(Self {
            path: path.to_path_buf(),
            file_version,
            name,
            entries,
            playlists,
            verbose,
        })
    }

    // ==================== Metadata ====================

    /// Path the store was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format version read from the file header
    pub fn file_version(&self) -> &str {
        &self.file_version
    }

    /// Database display name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// All entries in collection order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// All playlists in collection order
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn playlist_count(&self) -> usize {
        self.playlists.len()
    }

    // ==================== Entry Queries ====================

    /// Get an entry by id
    pub fn find_by_id(&self, id: EntryId) -> LynxResult<&Entry> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.id == id)
            .ok_or(LynxError::EntryNotFound(id))?;
        self.trace(format_args!("Accessing ID {}", id));
        Ok(entry)
    }

    /// Get every entry credited to `author`
    pub fn find_by_author(&self, author: &str) -> Vec<&Entry> {
        let found: Vec<&Entry> = self.entries.iter().filter(|e| e.has_author(author)).collect();
        self.trace(format_args!(
            "{} results found for author - {}",
            found.len(),
            author
        ));
        found
    }

    /// Get every entry carrying `tag`
    pub fn find_by_tag(&self, tag: &str) -> Vec<&Entry> {
        let found: Vec<&Entry> = self.entries.iter().filter(|e| e.has_tag(tag)).collect();
        self.trace(format_args!("{} results found for tag - {}", found.len(), tag));
        found
    }

    /// Check whether any entry holds `id`
    pub fn id_in_use(&self, id: EntryId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Next id above every id in use (1 for an empty store)
    pub fn find_free_id(&self) -> EntryId {
        let free = self
            .entries
            .iter()
            .map(|e| e.id)
            .max()
            .map_or(1, |max| max.saturating_add(1));
        self.trace(format_args!("Found unused ID {}", free));
        free
    }

    /// Unique authors across all entries, in first-seen order
    pub fn compile_authors(&self) -> Vec<String> {
        let authors = unique_in_order(self.entries.iter().flat_map(|e| &e.authors));
        self.trace(format_args!("{} unique authors found", authors.len()));
        authors
    }

    /// Unique tags across all entries, in first-seen order
    pub fn compile_tags(&self) -> Vec<String> {
        let tags = unique_in_order(self.entries.iter().flat_map(|e| &e.tags));
        self.trace(format_args!("{} unique tags found", tags.len()));
        tags
    }

    // ==================== Entry Mutation ====================

    /// Add a new entry under a caller-chosen id
    pub fn create_entry(
        &mut self,
        id: EntryId,
        url: impl Into<String>,
        name: impl Into<String>,
        authors: Vec<String>,
        tags: Vec<String>,
    ) -> LynxResult<()> {
        if self.id_in_use(id) {
            return Err(LynxError::DuplicateId(id));
        }
        let entry = Entry::new(id, url, name, authors, tags);
        self.trace(format_args!("Created entry {} - {}", entry.id, entry.url));
        self.entries.push(entry);
        Ok(())
    }

    /// Overwrite every field of the entry except its id
    pub fn edit_entry(
        &mut self,
        id: EntryId,
        url: impl Into<String>,
        name: impl Into<String>,
        authors: Vec<String>,
        tags: Vec<String>,
    ) -> LynxResult<()> {
        let index = self.entry_index(id)?;
        let entry = &mut self.entries[index];
        entry.url = url.into();
        entry.name = name.into();
        entry.authors = authors;
        entry.tags = tags;
        self.trace(format_args!("Entry ID {} has been altered", id));
        Ok(())
    }

    /// Delete an entry and every playlist reference to it
    pub fn delete_entry(&mut self, id: EntryId) -> LynxResult<Entry> {
        let index = self.entry_index(id)?;
        for playlist in self.playlists.iter_mut().filter(|p| p.contains(id)) {
            playlist.remove_all(id);
        }
        let removed = self.entries.remove(index);
        self.trace(format_args!("Entry ID {} has been deleted", id));
        Ok(removed)
    }

    /// Move an entry to a new id, rewriting playlist references in place
    pub fn reassign_id(&mut self, old: EntryId, new: EntryId) -> LynxResult<()> {
        if self.id_in_use(new) {
            return Err(LynxError::DuplicateId(new));
        }
        let index = self.entry_index(old)?;
        self.renumber(index, new);
        Ok(())
    }

    /// Renumber entries to `1..=N` in collection order
    ///
    /// Every playlist reference is rewritten through one old-to-new id map,
    /// so no intermediate id range is needed. When a file holds duplicate
    /// ids, references follow the first entry with that id, as `find_by_id`
    /// does. References to ids no entry holds are left as they are.
    pub fn normalize_ids_ascending(&mut self) {
        self.trace(format_args!("Normalizing IDs - ascending order from ID 1"));
        let mut mapping: HashMap<EntryId, EntryId> = HashMap::with_capacity(self.entries.len());
        for (entry, new) in self.entries.iter_mut().zip(1..) {
            mapping.entry(entry.id).or_insert(new);
            entry.id = new;
        }

        for playlist in &mut self.playlists {
            playlist.remap(&mapping);
        }
        self.trace(format_args!(
            "Completed normalization - {} entries renumbered",
            mapping.len()
        ));
    }

    // ==================== Playlist Operations ====================

    /// Get a playlist by position
    pub fn playlist(&self, index: usize) -> LynxResult<&Playlist> {
        self.playlists
            .get(index)
            .ok_or_else(|| LynxError::PlaylistNotFound(format!("#{}", index)))
    }

    /// Position of the first playlist called `name`
    pub fn find_playlist(&self, name: &str) -> LynxResult<usize> {
        self.playlists
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| LynxError::PlaylistNotFound(name.to_string()))
    }

    /// Append an empty playlist, returning its position
    pub fn create_playlist(&mut self, name: impl Into<String>) -> usize {
        let playlist = Playlist::new(name);
        self.trace(format_args!("Created playlist - {}", playlist.name));
        self.playlists.push(playlist);
        self.playlists.len() - 1
    }

    /// Remove a playlist; entries are never touched
    pub fn delete_playlist(&mut self, index: usize) -> LynxResult<Playlist> {
        self.playlist(index)?;
        let removed = self.playlists.remove(index);
        self.trace(format_args!("Playlist {} has been deleted", removed.name));
        Ok(removed)
    }

    /// Append a reference to an existing entry
    pub fn add_to_playlist(&mut self, index: usize, id: EntryId) -> LynxResult<()> {
        self.playlist(index)?;
        self.entry_index(id)?;
        self.playlists[index].push(id);
        self.trace(format_args!(
            "Added ID {} to playlist - {}",
            id, self.playlists[index].name
        ));
        Ok(())
    }

    /// Remove the first reference to `id`
    pub fn remove_from_playlist(&mut self, index: usize, id: EntryId) -> LynxResult<()> {
        self.playlist(index)?;
        let playlist = &mut self.playlists[index];
        if !playlist.remove_first(id) {
            return Err(LynxError::ReferenceNotFound {
                playlist: playlist.name.clone(),
                id,
            });
        }
        self.trace(format_args!(
            "Removed ID {} from playlist - {}",
            id, self.playlists[index].name
        ));
        Ok(())
    }

    /// Entries referenced by a playlist, in playlist order
    ///
    /// Fails with `EntryNotFound` on the first dangling reference.
    pub fn resolve_playlist(&self, playlist: &Playlist) -> LynxResult<Vec<&Entry>> {
        let entries = playlist
            .entry_ids
            .iter()
            .map(|&id| self.find_by_id(id))
            .collect::<LynxResult<Vec<_>>>()?;
        self.trace(format_args!(
            "{} entries in playlist - {}",
            entries.len(),
            playlist.name
        ));
        Ok(entries)
    }

    /// Playlists that reference `id` at least once
    pub fn referencing_playlists(&self, id: EntryId) -> Vec<&Playlist> {
        let refs: Vec<&Playlist> = self.playlists.iter().filter(|p| p.contains(id)).collect();
        self.trace(format_args!(
            "ID {} is referenced by {} playlists",
            id,
            refs.len()
        ));
        refs
    }

    // ==================== Persistence ====================

    /// Write the database to `path`, replacing any existing file
    pub fn save_as(&self, path: impl AsRef<Path>) -> LynxResult<()> {
        let path = path.as_ref();
        if self.verbose {
            info!(at = %Local::now(), "Compiling entries");
        }

        let text = persistence::render(&self.name, &self.entries, &self.playlists);

        if self.verbose {
            info!(at = %Local::now(), "Ready to save, compilation finished");
        }

        persistence::write_database(path, &text)?;
        self.trace(format_args!("Saved to {}", path.display()));
        Ok(())
    }

    /// Write the database back to the file it was loaded from
    pub fn quick_save(&self) -> LynxResult<()> {
        self.save_as(&self.path)
    }

    // ==================== Internal ====================

    fn entry_index(&self, id: EntryId) -> LynxResult<usize> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(LynxError::EntryNotFound(id))
    }

    /// Give the entry at `index` a new id, rewriting references first
    fn renumber(&mut self, index: usize, new: EntryId) {
        let old = self.entries[index].id;
        for playlist in self.playlists.iter_mut().filter(|p| p.contains(old)) {
            playlist.replace_all(old, new);
        }
        self.entries[index].id = new;
        self.trace(format_args!(
            "Entry ID {} has been reassigned to ID {}",
            old, new
        ));
    }

    fn trace(&self, message: fmt::Arguments<'_>) {
        if self.verbose {
            info!("Lynx: {}", message);
        }
    }
}

fn unique_in_order<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen: HashSet<&String> = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .cloned()
        .collect()
}
