//! Command-line interface for trailfinder.
//!
//! This module provides the CLI structure and output rendering for the
//! `trailfinder` binary.

mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DifficultyArg, ListCommand, NotesAction, NotesCommand, OutputFormat,
    ProfileCommand, StatusCommand,
};

use crate::logging::Verbosity;

/// trailfinder - Browse and plan hikes from a local trail catalog
///
/// Filter trails by text, difficulty, elevation gain and altitude, keep
/// favorites and notes, and draw elevation profiles.
#[derive(Debug, Parser)]
#[command(name = "trailfinder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the trail database (overrides configuration)
    #[arg(long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List trails matching the given filters
    List(ListCommand),

    /// Show one trail in detail
    Show {
        /// Trail id
        id: String,
    },

    /// Print a trail's elevation profile as path data
    Profile(ProfileCommand),

    /// Add a trail to favorites, or remove it if already there
    Favorite {
        /// Trail id
        id: String,
    },

    /// List favorite trails
    Favorites {
        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// Read or edit the notes for a trail
    Notes(NotesCommand),

    /// Replace the catalog with trails from a JSON file
    Import {
        /// JSON file holding an array of trails
        file: PathBuf,
    },

    /// Restore the built-in catalog
    ResetCatalog,

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
