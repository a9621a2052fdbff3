//! `trailfinder` - A local hiking trail catalog
//!
//! This library provides the trail model and built-in catalog, the filter
//! engine, elevation profile projection, and the repository that keeps the
//! catalog, favorites and notes in a local key-value store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod elevation;
pub mod error;
pub mod filter;
pub mod logging;
pub mod notes;
pub mod persist;
pub mod repository;
pub mod session;
pub mod storage;
pub mod trail;

pub use config::Config;
pub use elevation::{project, ElevationPath, Viewport};
pub use error::{Error, Result};
pub use filter::{filter_trails, FilterParams, TrailFilter};
pub use logging::init_logging;
pub use notes::TrailNotes;
pub use repository::TrailRepository;
pub use session::ViewGuard;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StoreStats, TypedStore};
pub use trail::{Difficulty, ElevationPoint, Trail};
