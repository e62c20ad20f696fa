//! Entry command handlers

use anyhow::{bail, Context, Result};

use lynx_core::codec::separators;
use lynx_core::{EntryId, Store};

use crate::output::Output;
use crate::prompt::confirm;

/// New field values for `entry edit`; `None`/empty keeps the current value
pub struct EntryEdit {
    pub url: Option<String>,
    pub name: Option<String>,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub clear_authors: bool,
    pub clear_tags: bool,
}

/// Create a new entry
pub fn add(
    store: &mut Store,
    url: String,
    name: Option<String>,
    authors: Vec<String>,
    tags: Vec<String>,
    id: Option<EntryId>,
    output: &Output,
) -> Result<()> {
    let name = name.unwrap_or_else(|| url.clone());
    check_fields(&url, &name, &authors, &tags)?;

    let id = id.unwrap_or_else(|| store.find_free_id());
    store
        .create_entry(id, url, name, authors, tags)
        .context("Failed to create entry")?;

    output.success(&format!("Created entry: {}", id));
    output.print_entry(store.find_by_id(id)?);

    Ok(())
}

/// List entries, optionally filtered by author or tag
pub fn list(
    store: &Store,
    author: Option<String>,
    tag: Option<String>,
    output: &Output,
) -> Result<()> {
    let entries = match (author, tag) {
        (Some(ref a), _) => store.find_by_author(a),
        (None, Some(ref t)) => store.find_by_tag(t),
        (None, None) => store.entries().iter().collect(),
    };

    output.print_entries(&entries);
    Ok(())
}

/// Show a single entry and the playlists that use it
pub fn show(store: &Store, id: EntryId, output: &Output) -> Result<()> {
    let entry = store.find_by_id(id)?;
    output.print_entry(entry);

    if output.should_prompt() {
        let refs = store.referencing_playlists(id);
        if !refs.is_empty() {
            let names: Vec<&str> = refs.iter().map(|p| p.name.as_str()).collect();
            println!("In:      {}", names.join(", "));
        }
    }
    Ok(())
}

/// Overwrite an entry's fields, keeping whatever was not supplied
pub fn edit(store: &mut Store, id: EntryId, edit: EntryEdit, output: &Output) -> Result<()> {
    let current = store.find_by_id(id)?.clone();

    let url = edit.url.unwrap_or(current.url);
    let name = edit.name.unwrap_or(current.name);
    let authors = pick_list(edit.authors, edit.clear_authors, current.authors);
    let tags = pick_list(edit.tags, edit.clear_tags, current.tags);
    check_fields(&url, &name, &authors, &tags)?;

    store
        .edit_entry(id, url, name, authors, tags)
        .context("Failed to update entry")?;

    output.success("Entry updated");
    output.print_entry(store.find_by_id(id)?);

    Ok(())
}

/// Delete an entry and its playlist references
///
/// Returns false when the user cancelled.
pub fn delete(store: &mut Store, id: EntryId, yes: bool, output: &Output) -> Result<bool> {
    let entry = store.find_by_id(id)?;

    if output.should_prompt() && !yes {
        println!("Delete entry: {} - {}", entry.id, entry.name);
        let refs = store.referencing_playlists(id);
        if !refs.is_empty() {
            let names: Vec<&str> = refs.iter().map(|p| p.name.as_str()).collect();
            println!("It will be removed from: {}", names.join(", "));
        }
        if !confirm("Are you sure?")? {
            output.message("Cancelled.");
            return Ok(false);
        }
    }

    store.delete_entry(id).context("Failed to delete entry")?;

    output.success(&format!("Deleted entry: {}", id));

    Ok(true)
}

/// Move an entry to a new id
pub fn reassign(store: &mut Store, old: EntryId, new: EntryId, output: &Output) -> Result<()> {
    store
        .reassign_id(old, new)
        .with_context(|| format!("Failed to reassign entry {} to {}", old, new))?;

    output.success(&format!("Entry {} is now {}", old, new));
    Ok(())
}

/// Renumber all entries to 1..=N
pub fn normalize(store: &mut Store, output: &Output) -> Result<()> {
    store.normalize_ids_ascending();
    output.success(&format!("Renumbered {} entries", store.entry_count()));
    Ok(())
}

fn pick_list(new: Vec<String>, clear: bool, current: Vec<String>) -> Vec<String> {
    if clear {
        Vec::new()
    } else if new.is_empty() {
        current
    } else {
        new
    }
}

/// Reject values the file format cannot store
fn check_fields(url: &str, name: &str, authors: &[String], tags: &[String]) -> Result<()> {
    for (label, value) in [("URL", url), ("name", name)] {
        if value.contains(separators::FIELD) {
            bail!("{} must not contain '{}': {}", label, separators::FIELD, value);
        }
    }
    for value in authors.iter().chain(tags) {
        if value.is_empty() {
            bail!("Authors and tags must not be empty");
        }
        if value.contains(separators::FIELD) || value.contains(separators::LIST) {
            bail!(
                "Authors and tags must not contain '{}' or '{}': {}",
                separators::FIELD,
                separators::LIST,
                value
            );
        }
    }
    Ok(())
}
