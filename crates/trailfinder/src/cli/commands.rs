//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::elevation::Viewport;
use crate::filter::{DifficultyFilter, FilterParams};
use crate::trail::Difficulty;

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Match against name, location or description (case-insensitive)
    #[arg(short = 's', long)]
    pub query: Option<String>,

    /// Only show trails of this difficulty
    #[arg(short, long, value_enum, default_value = "all")]
    pub difficulty: DifficultyArg,

    /// Minimum elevation gain in metres
    #[arg(long, value_name = "M")]
    pub min_gain: Option<f64>,

    /// Maximum elevation gain in metres
    #[arg(long, value_name = "M")]
    pub max_gain: Option<f64>,

    /// Lowest altitude the trail must reach up to, in metres
    #[arg(long, value_name = "M")]
    pub min_alt: Option<f64>,

    /// Highest altitude the trail may start from, in metres
    #[arg(long, value_name = "M")]
    pub max_alt: Option<f64>,

    /// Only show favorites
    #[arg(long)]
    pub favorites: bool,

    /// Print each trail's thumbnail elevation path under its row
    #[arg(short, long)]
    pub profiles: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl ListCommand {
    /// Apply these flags on top of `base`, which holds the widest bounds.
    #[must_use]
    pub fn filter_params(&self, base: FilterParams) -> FilterParams {
        let mut params = base;
        if let Some(query) = &self.query {
            params.query.clone_from(query);
        }
        params.difficulty = self.difficulty.into();
        if let Some(min) = self.min_gain {
            params.gain.min = min;
        }
        if let Some(max) = self.max_gain {
            params.gain.max = max;
        }
        if let Some(min) = self.min_alt {
            params.altitude.min = min;
        }
        if let Some(max) = self.max_alt {
            params.altitude.max = max;
        }
        params
    }
}

/// Profile command arguments.
#[derive(Debug, Args)]
pub struct ProfileCommand {
    /// Trail id
    pub id: String,

    /// Chart width (defaults to the configured width)
    #[arg(long)]
    pub width: Option<f64>,

    /// Chart height (defaults to the configured height)
    #[arg(long)]
    pub height: Option<f64>,

    /// Use the compact list-row chart size
    #[arg(long, conflicts_with_all = ["width", "height"])]
    pub thumbnail: bool,

    /// Output the closed area path instead of the line
    #[arg(short, long)]
    pub area: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl ProfileCommand {
    /// The viewport to project into, given the configured default.
    #[must_use]
    pub fn viewport(&self, configured: Viewport) -> Viewport {
        if self.thumbnail {
            return Viewport::THUMBNAIL;
        }
        Viewport::new(
            self.width.unwrap_or(configured.width),
            self.height.unwrap_or(configured.height),
        )
    }
}

/// Notes command arguments.
#[derive(Debug, Args)]
pub struct NotesCommand {
    /// Trail id
    pub id: String,

    /// What to do with the note (defaults to showing it)
    #[command(subcommand)]
    pub action: Option<NotesAction>,
}

/// Actions on a trail's note.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum NotesAction {
    /// Print the note
    Show,

    /// Replace the note
    Set {
        /// Note text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Erase the note
    Clear,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Difficulty selector on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DifficultyArg {
    /// Every difficulty
    #[default]
    All,
    /// Easy trails
    Easy,
    /// Moderate trails
    Moderate,
    /// Hard trails
    Hard,
}

impl From<DifficultyArg> for DifficultyFilter {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::All => Self::All,
            DifficultyArg::Easy => Self::Only(Difficulty::Easy),
            DifficultyArg::Moderate => Self::Only(Difficulty::Moderate),
            DifficultyArg::Hard => Self::Only(Difficulty::Hard),
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
