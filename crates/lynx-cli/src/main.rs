//! Lynx CLI
//!
//! Command-line interface for Lynx - flat-file bookmarks and playlists.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lynx_core::{create_database_file, Config, EntryId, LynxError, Store};

mod commands;
mod output;
mod prompt;

use commands::entry::EntryEdit;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "lynx")]
#[command(about = "Lynx - flat-file bookmarks and playlists")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Database file (overrides configuration)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Config file (overrides LYNX_CONFIG and the default location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Trace every store operation to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new, empty database file
    Init {
        /// Database display name (defaults to the configured name)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Manage entries
    Entry {
        #[command(subcommand)]
        command: EntryCommands,
    },
    /// Manage playlists
    Playlist {
        #[command(subcommand)]
        command: PlaylistCommands,
    },
    /// List all authors
    Authors,
    /// List all tags
    Tags,
    /// Renumber entries to 1..N in their current order
    Normalize,
    /// Show database status
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum EntryCommands {
    /// Create a new entry
    #[command(alias = "create")]
    Add {
        /// URL to save
        url: String,
        /// Display name (defaults to the URL)
        #[arg(short, long)]
        name: Option<String>,
        /// Authors to credit
        #[arg(short, long)]
        author: Vec<String>,
        /// Tags to add
        #[arg(short, long)]
        tag: Vec<String>,
        /// Explicit id (defaults to the next free id)
        #[arg(long)]
        id: Option<EntryId>,
    },
    /// List entries
    #[command(alias = "ls")]
    List {
        /// Filter by author
        #[arg(short, long, conflicts_with = "tag")]
        author: Option<String>,
        /// Filter by tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Show entry details
    Show {
        /// Entry ID
        id: EntryId,
    },
    /// Edit an entry
    Edit(EditArgs),
    /// Delete an entry
    #[command(alias = "rm")]
    Delete {
        /// Entry ID
        id: EntryId,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Move an entry to a different id
    Reassign {
        /// Current ID
        old: EntryId,
        /// New ID
        new: EntryId,
    },
}

#[derive(Args)]
struct EditArgs {
    /// Entry ID
    id: EntryId,
    /// New URL
    #[arg(long)]
    url: Option<String>,
    /// New display name
    #[arg(short, long)]
    name: Option<String>,
    /// Replace authors
    #[arg(short, long)]
    author: Vec<String>,
    /// Replace tags
    #[arg(short, long)]
    tag: Vec<String>,
    /// Remove all authors
    #[arg(long, conflicts_with = "author")]
    clear_authors: bool,
    /// Remove all tags
    #[arg(long, conflicts_with = "tag")]
    clear_tags: bool,
}

#[derive(Subcommand)]
enum PlaylistCommands {
    /// Create an empty playlist
    Create {
        /// Playlist name
        name: String,
    },
    /// List playlists
    #[command(alias = "ls")]
    List,
    /// Show the entries of a playlist
    Show {
        /// Playlist name or #position
        playlist: String,
    },
    /// Append entries to a playlist
    Add {
        /// Playlist name or #position
        playlist: String,
        /// Entry IDs, in order
        #[arg(required = true)]
        ids: Vec<EntryId>,
    },
    /// Remove an entry from a playlist (first occurrence)
    Remove {
        /// Playlist name or #position
        playlist: String,
        /// Entry ID
        id: EntryId,
    },
    /// Delete a playlist (entries are kept)
    #[command(alias = "rm")]
    Delete {
        /// Playlist name or #position
        playlist: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, database, verbose, default_name)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {:?}", err);
        if let Some(hint) = recovery_hint(&err) {
            eprintln!();
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}

/// Suggestion from the first store error in the chain, if it has one
fn recovery_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<LynxError>())
        .and_then(LynxError::recovery_suggestion)
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work without a database
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config =
        Config::load_with_cli_override(cli.config.as_ref()).context("Failed to load configuration")?;
    let verbose = cli.verbose || config.verbose;
    init_logging(verbose);

    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path());

    if let Commands::Init { name } = &cli.command {
        let name = name.clone().unwrap_or_else(|| config.default_name.clone());
        return handle_init_command(&db_path, &name, &output);
    }

    if !db_path.exists() {
        bail!(
            "No database at {}. Run `lynx init` first.",
            db_path.display()
        );
    }

    let mut store = Store::load_with_verbose(&db_path, verbose)
        .with_context(|| format!("Failed to load database {}", db_path.display()))?;

    // Commands that change the store are saved back afterwards
    let is_write = matches!(
        &cli.command,
        Commands::Normalize
            | Commands::Entry {
                command: EntryCommands::Add { .. }
                    | EntryCommands::Edit(_)
                    | EntryCommands::Delete { .. }
                    | EntryCommands::Reassign { .. }
            }
            | Commands::Playlist {
                command: PlaylistCommands::Create { .. }
                    | PlaylistCommands::Add { .. }
                    | PlaylistCommands::Remove { .. }
                    | PlaylistCommands::Delete { .. }
            }
    );

    let changed = match cli.command {
        Commands::Init { .. } => unreachable!(),   // Handled above
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Entry { command } => handle_entry_command(command, &mut store, &output)?,
        Commands::Playlist { command } => handle_playlist_command(command, &mut store, &output)?,
        Commands::Authors => commands::catalog::authors(&store, &output).map(|_| false)?,
        Commands::Tags => commands::catalog::tags(&store, &output).map(|_| false)?,
        Commands::Normalize => commands::entry::normalize(&mut store, &output).map(|_| true)?,
        Commands::Status => commands::status::show(&store, &output).map(|_| false)?,
    };

    if is_write && changed {
        store
            .quick_save()
            .with_context(|| format!("Failed to save database {}", db_path.display()))?;
    }

    Ok(())
}

/// Run an entry command, returning whether the store changed
fn handle_entry_command(
    command: EntryCommands,
    store: &mut Store,
    output: &Output,
) -> Result<bool> {
    match command {
        EntryCommands::Add {
            url,
            name,
            author,
            tag,
            id,
        } => commands::entry::add(store, url, name, author, tag, id, output).map(|_| true),
        EntryCommands::List { author, tag } => {
            commands::entry::list(store, author, tag, output).map(|_| false)
        }
        EntryCommands::Show { id } => commands::entry::show(store, id, output).map(|_| false),
        EntryCommands::Edit(args) => {
            let edit = EntryEdit {
                url: args.url,
                name: args.name,
                authors: args.author,
                tags: args.tag,
                clear_authors: args.clear_authors,
                clear_tags: args.clear_tags,
            };
            commands::entry::edit(store, args.id, edit, output).map(|_| true)
        }
        EntryCommands::Delete { id, yes } => commands::entry::delete(store, id, yes, output),
        EntryCommands::Reassign { old, new } => {
            commands::entry::reassign(store, old, new, output).map(|_| true)
        }
    }
}

/// Run a playlist command, returning whether the store changed
fn handle_playlist_command(
    command: PlaylistCommands,
    store: &mut Store,
    output: &Output,
) -> Result<bool> {
    match command {
        PlaylistCommands::Create { name } => {
            commands::playlist::create(store, name, output).map(|_| true)
        }
        PlaylistCommands::List => commands::playlist::list(store, output).map(|_| false),
        PlaylistCommands::Show { playlist } => {
            commands::playlist::show(store, playlist, output).map(|_| false)
        }
        PlaylistCommands::Add { playlist, ids } => {
            commands::playlist::add(store, playlist, ids, output).map(|_| true)
        }
        PlaylistCommands::Remove { playlist, id } => {
            commands::playlist::remove(store, playlist, id, output).map(|_| true)
        }
        PlaylistCommands::Delete { playlist, yes } => {
            commands::playlist::delete(store, playlist, yes, output)
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

fn handle_init_command(path: &Path, name: &str, output: &Output) -> Result<()> {
    commands::check_name("Database name", name)?;

    if path.exists() {
        if output.is_json() {
            println!(
                "{}",
                serde_json::json!({ "path": path, "created": false })
            );
        } else if !output.is_quiet() {
            println!("Already initialized: {}", path.display());
            println!();
            println!("To start fresh, remove that file or pass a different --db.");
        }
        return Ok(());
    }

    create_database_file(path, name)
        .with_context(|| format!("Failed to create database {}", path.display()))?;
    info!("Created database {} at {}", name, path.display());

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({ "path": path, "name": name, "created": true })
        );
    } else if output.is_quiet() {
        println!("{}", path.display());
    } else {
        output.success(&format!("Initialized database '{}' at {}", name, path.display()));
    }

    Ok(())
}

/// Initialize stderr logging
///
/// LYNX_LOG takes an EnvFilter directive; otherwise verbose mode shows
/// store traces and the default shows warnings only.
fn init_logging(verbose: bool) {
    let env_filter = match std::env::var("LYNX_LOG") {
        Ok(directive) => EnvFilter::new(directive),
        Err(_) if verbose => EnvFilter::new("lynx_core=info,lynx=info"),
        Err(_) => EnvFilter::new("warn"),
    };

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
