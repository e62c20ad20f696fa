//! Playlist command handlers
//!
//! Playlists are addressed by name (first match) or by position as `#N`.

use anyhow::{Context, Result};

use lynx_core::{EntryId, Store};

use super::check_name;
use crate::output::Output;
use crate::prompt::confirm;

/// Create an empty playlist
pub fn create(store: &mut Store, name: String, output: &Output) -> Result<()> {
    check_name("Playlist name", &name)?;
    let index = store.create_playlist(name.clone());
    output.success(&format!("Created playlist #{}: {}", index, name));
    Ok(())
}

/// List all playlists
pub fn list(store: &Store, output: &Output) -> Result<()> {
    output.print_playlists(store.playlists());
    Ok(())
}

/// Show a playlist's entries in order
pub fn show(store: &Store, playlist: String, output: &Output) -> Result<()> {
    let index = parse_playlist(&playlist, store)?;
    let playlist = store.playlist(index)?;
    let entries = store
        .resolve_playlist(playlist)
        .with_context(|| format!("Playlist '{}' has a dangling reference", playlist.name))?;

    output.print_playlist(playlist, &entries);
    Ok(())
}

/// Append entries to a playlist
pub fn add(store: &mut Store, playlist: String, ids: Vec<EntryId>, output: &Output) -> Result<()> {
    let index = parse_playlist(&playlist, store)?;
    // Check every id first so a bad one leaves the playlist untouched
    for &id in &ids {
        store.find_by_id(id)?;
    }
    for &id in &ids {
        store.add_to_playlist(index, id)?;
    }

    output.success(&format!(
        "Added {} entr{} to '{}'",
        ids.len(),
        if ids.len() == 1 { "y" } else { "ies" },
        store.playlist(index)?.name
    ));
    Ok(())
}

/// Remove one reference from a playlist
pub fn remove(store: &mut Store, playlist: String, id: EntryId, output: &Output) -> Result<()> {
    let index = parse_playlist(&playlist, store)?;
    store
        .remove_from_playlist(index, id)
        .context("Failed to remove entry from playlist")?;

    output.success(&format!("Removed {} from '{}'", id, store.playlist(index)?.name));
    Ok(())
}

/// Delete a playlist (entries are kept)
///
/// Returns false when the user cancelled.
pub fn delete(store: &mut Store, playlist: String, yes: bool, output: &Output) -> Result<bool> {
    let index = parse_playlist(&playlist, store)?;

    if output.should_prompt() && !yes {
        let target = store.playlist(index)?;
        println!(
            "Delete playlist: {} ({} references)",
            target.name,
            target.entry_ids.len()
        );
        if !confirm("Are you sure?")? {
            output.message("Cancelled.");
            return Ok(false);
        }
    }

    let removed = store
        .delete_playlist(index)
        .context("Failed to delete playlist")?;

    output.success(&format!("Deleted playlist: {}", removed.name));
    Ok(true)
}

/// Resolve a playlist argument (`#N` position or name)
fn parse_playlist(arg: &str, store: &Store) -> Result<usize> {
    if let Some(index) = arg.strip_prefix('#').and_then(|n| n.parse::<usize>().ok()) {
        store.playlist(index)?;
        return Ok(index);
    }
    Ok(store.find_playlist(arg)?)
}
