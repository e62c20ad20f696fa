//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use lynx_core::{Entry, Playlist};
use serde::Serialize;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single entry
    pub fn print_entry(&self, entry: &Entry) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", entry.id);
                println!("Name:    {}", entry.name);
                println!("URL:     {}", entry.url);
                if !entry.authors.is_empty() {
                    println!("Authors: {}", entry.authors.join(", "));
                }
                if !entry.tags.is_empty() {
                    println!("Tags:    {}", entry.tags.join(", "));
                }
            }
            OutputFormat::Json => print_json(entry),
            OutputFormat::Quiet => {
                println!("{}", entry.id);
            }
        }
    }

    /// Print a list of entries
    pub fn print_entries(&self, entries: &[&Entry]) {
        match self.format {
            OutputFormat::Human => {
                if entries.is_empty() {
                    println!("No entries found.");
                    return;
                }
                for entry in entries {
                    println!(
                        "{:>5} | {} | {}",
                        entry.id,
                        truncate(&entry.name, 35),
                        truncate(&entry.url, 45)
                    );
                }
                println!("\n{} entr{}", entries.len(), plural_y(entries.len()));
            }
            OutputFormat::Json => print_json(&entries),
            OutputFormat::Quiet => {
                for entry in entries {
                    println!("{}", entry.id);
                }
            }
        }
    }

    /// Print a playlist together with its resolved entries
    pub fn print_playlist(&self, playlist: &Playlist, entries: &[&Entry]) {
        match self.format {
            OutputFormat::Human => {
                println!("Playlist: {}", playlist.name);
                println!();
                self.print_entries(entries);
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "name": playlist.name,
                    "entry_ids": playlist.entry_ids,
                    "entries": entries,
                });
                print_json(&json);
            }
            OutputFormat::Quiet => {
                for id in &playlist.entry_ids {
                    println!("{}", id);
                }
            }
        }
    }

    /// Print every playlist with its position and size
    pub fn print_playlists(&self, playlists: &[Playlist]) {
        match self.format {
            OutputFormat::Human => {
                if playlists.is_empty() {
                    println!("No playlists found.");
                    return;
                }
                for (index, playlist) in playlists.iter().enumerate() {
                    println!(
                        "{:>3} | {} ({})",
                        index,
                        playlist.name,
                        playlist.entry_ids.len()
                    );
                }
                println!("\n{} playlist(s)", playlists.len());
            }
            OutputFormat::Json => print_json(&playlists),
            OutputFormat::Quiet => {
                for playlist in playlists {
                    println!("{}", playlist.name);
                }
            }
        }
    }

    /// Print a list of names (authors or tags)
    pub fn print_names(&self, label: &str, names: &[String]) {
        match self.format {
            OutputFormat::Human => {
                if names.is_empty() {
                    println!("No {}s found.", label);
                    return;
                }
                for name in names {
                    println!("{}", name);
                }
                println!("\n{} {}(s)", names.len(), label);
            }
            OutputFormat::Json => print_json(&names),
            OutputFormat::Quiet => {
                for name in names {
                    println!("{}", name);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn plural_y(count: usize) -> &'static str {
    if count == 1 {
        "y"
    } else {
        "ies"
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
