//! Status command handler

use anyhow::Result;

use lynx_core::{Store, FORMAT_VERSION};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let dangling: usize = store
        .playlists()
        .iter()
        .flat_map(|p| &p.entry_ids)
        .filter(|&&id| !store.id_in_use(id))
        .count();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "name": store.name(),
                    "path": store.path(),
                    "file_version": store.file_version(),
                    "format_version": FORMAT_VERSION,
                    "counts": {
                        "entries": store.entry_count(),
                        "playlists": store.playlist_count(),
                        "dangling_references": dangling
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.path().display());
        }
        OutputFormat::Human => {
            println!("Lynx Status");
            println!("===========");
            println!();
            println!("Database:");
            println!("  Name:    {}", store.name());
            println!("  File:    {}", store.path().display());
            println!("  Version: {}", store.file_version());
            if store.file_version() != FORMAT_VERSION {
                println!("           (will be saved as {})", FORMAT_VERSION);
            }
            println!();
            println!("Contents:");
            println!("  Entries:   {}", store.entry_count());
            println!("  Playlists: {}", store.playlist_count());
            if dangling > 0 {
                println!("  Dangling references: {}", dangling);
            }
        }
    }

    Ok(())
}
