//! `trailfinder` - CLI for the local trail catalog
//!
//! This binary opens the trail database, loads the catalog and favorites, runs
//! one command, and waits for pending writes before exiting.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, warn};

use trailfinder::catalog::default_trails;
use trailfinder::cli::render::{self, NO_PROFILE_MESSAGE};
use trailfinder::cli::{
    Cli, Command, ConfigCommand, ListCommand, NotesAction, NotesCommand, OutputFormat,
    ProfileCommand, StatusCommand,
};
use trailfinder::storage::NOTES_KEY_PREFIX;
use trailfinder::{
    init_logging, project, Config, SqliteStore, Trail, TrailNotes, TrailRepository,
};

/// Everything a catalog command needs.
#[derive(Debug)]
struct Session {
    config: Config,
    store: Arc<SqliteStore>,
    repo: TrailRepository,
    notes: TrailNotes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let mut config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;
    if let Some(path) = cli.database {
        config.storage.database_path = Some(path);
    }

    if let Command::Config(cmd) = cli.command {
        return handle_config(&config, cmd);
    }

    let db_path = config.database_path();
    let store = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("failed to open trail database at {}", db_path.display()))?,
    );
    debug!(path = %db_path.display(), "Opened trail database");

    let repo = TrailRepository::load(store.clone()).await;
    let notes = TrailNotes::new(store.clone());
    let mut session = Session {
        config,
        store,
        repo,
        notes,
    };

    let outcome = run(&mut session, cli.command).await;

    // Queued writes must land even if the command failed.
    if let Err(e) = session.repo.close().await {
        warn!(error = %e, "Failed to finish pending writes");
    }
    outcome
}

async fn run(session: &mut Session, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List(cmd) => handle_list(session, &cmd),
        Command::Show { id } => handle_show(session, &id).await,
        Command::Profile(cmd) => handle_profile(session, &cmd),
        Command::Favorite { id } => handle_favorite(session, &id),
        Command::Favorites { format } => handle_favorites(session, format),
        Command::Notes(cmd) => handle_notes(session, cmd).await,
        Command::Import { file } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let trails: Vec<Trail> = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a valid trail list", file.display()))?;
            let imported = trails.len();
            session.repo.replace_trails(trails);
            if imported == 0 {
                println!("Import was empty; restored the built-in catalog.");
            } else {
                println!("Imported {imported} trails.");
            }
            Ok(())
        }
        Command::ResetCatalog => {
            session.repo.replace_trails(default_trails());
            println!(
                "Restored the built-in catalog ({} trails).",
                session.repo.trails().len()
            );
            Ok(())
        }
        Command::Status(cmd) => handle_status(session, &cmd),
        Command::Config(cmd) => handle_config(&session.config, cmd),
    }
}

fn handle_list(session: &Session, cmd: &ListCommand) -> anyhow::Result<()> {
    let repo = &session.repo;
    let params = cmd.filter_params(session.config.widest_filter());

    let mut visible = repo.filter(&params);
    let pinned = if cmd.favorites {
        visible.retain(|t| repo.is_favorite(&t.id));
        Vec::new()
    } else {
        repo.pinned(&visible)
    };

    let out = render::render_list(
        &visible,
        &pinned,
        repo.favorites(),
        cmd.format,
        cmd.profiles,
    )?;
    print!("{out}");
    Ok(())
}

async fn handle_show(session: &Session, id: &str) -> anyhow::Result<()> {
    let trail = session.repo.require(id)?;
    let note = session.notes.load(id).await;
    let path = project(trail.profile(), session.config.viewport());

    print!(
        "{}",
        render::render_detail(trail, session.repo.is_favorite(id), &note, path.as_ref())
    );
    Ok(())
}

fn handle_profile(session: &Session, cmd: &ProfileCommand) -> anyhow::Result<()> {
    let trail = session.repo.require(&cmd.id)?;
    let viewport = cmd.viewport(session.config.viewport());

    match project(trail.profile(), viewport) {
        Some(path) => println!("{}", render::render_profile(&path, cmd.area, cmd.json)?),
        None => println!("{NO_PROFILE_MESSAGE}"),
    }
    Ok(())
}

fn handle_favorite(session: &mut Session, id: &str) -> anyhow::Result<()> {
    let name = session.repo.require(id)?.name.clone();
    if session.repo.toggle_favorite(id) {
        println!("Added {name} to favorites.");
    } else {
        println!("Removed {name} from favorites.");
    }
    Ok(())
}

fn handle_favorites(session: &Session, format: OutputFormat) -> anyhow::Result<()> {
    let repo = &session.repo;
    let all: Vec<&Trail> = repo.trails().iter().collect();
    let pinned = repo.pinned(&all);

    if pinned.is_empty() && format != OutputFormat::Json {
        println!("No favorites yet. Add one with `trailfinder favorite <id>`.");
        return Ok(());
    }

    let out = render::render_list(&pinned, &[], repo.favorites(), format, false)?;
    print!("{out}");
    Ok(())
}

async fn handle_notes(session: &Session, cmd: NotesCommand) -> anyhow::Result<()> {
    let trail = session.repo.require(&cmd.id)?;

    match cmd.action.unwrap_or(NotesAction::Show) {
        NotesAction::Show => {
            let note = session.notes.load(&cmd.id).await;
            if note.is_empty() {
                println!("No notes for {}.", trail.name);
            } else {
                println!("{note}");
            }
        }
        NotesAction::Set { text } => match session.notes.save(&cmd.id, &text.join(" ")).await {
            Ok(saved) if saved.is_empty() => println!("Cleared notes for {}.", trail.name),
            Ok(_) => println!("Saved notes for {}.", trail.name),
            Err(e) => {
                warn!(trail = %cmd.id, error = %e, "Failed to save notes");
                println!("Notes for {} could not be saved.", trail.name);
            }
        },
        NotesAction::Clear => match session.notes.clear(&cmd.id).await {
            Ok(()) => println!("Cleared notes for {}.", trail.name),
            Err(e) => {
                warn!(trail = %cmd.id, error = %e, "Failed to clear notes");
                println!("Notes for {} could not be cleared.", trail.name);
            }
        },
    }
    Ok(())
}

fn handle_status(session: &Session, cmd: &StatusCommand) -> anyhow::Result<()> {
    let stats = session.store.stats()?;
    let notes = session.store.keys_with_prefix(NOTES_KEY_PREFIX)?.len();
    let db_path = session.store.path();

    if cmd.json {
        let status = serde_json::json!({
            "database_path": db_path,
            "store": stats,
            "trails": session.repo.trails().len(),
            "favorites": session.repo.favorites().len(),
            "notes": notes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("trailfinder status");
        println!("------------------");
        println!("Database:      {}", db_path.display());
        println!("Size:          {} bytes", stats.db_size_bytes);
        println!("Entries:       {}", stats.entries);
        match stats.last_write {
            Some(at) => println!("Last write:    {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
            None => println!("Last write:    never"),
        }
        println!("Trails:        {}", session.repo.trails().len());
        println!("Favorites:     {}", session.repo.favorites().len());
        println!("Notes:         {notes}");
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Filter]");
                println!("  Max gain (m):       {}", config.filter.gain_max_m);
                println!("  Max altitude (m):   {}", config.filter.altitude_max_m);
                println!(
                    "  Missing altitude:   {}",
                    serde_json::to_value(config.filter.missing_altitude)?
                        .as_str()
                        .unwrap_or("reject")
                );
                println!();
                println!("[Chart]");
                println!("  Width:              {}", config.chart.width);
                println!("  Height:             {}", config.chart.height);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
