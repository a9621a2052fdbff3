//! End-to-end sessions against an on-disk store.

use std::path::PathBuf;
use std::sync::Arc;

use trailfinder::catalog::default_trails;
use trailfinder::filter::DifficultyFilter;
use trailfinder::storage::{FAVORITES_KEY, TRAILS_KEY};
use trailfinder::{
    project, Difficulty, FilterParams, SqliteStore, TrailNotes, TrailRepository, TypedStore,
    ViewGuard, Viewport,
};

struct TempDb(PathBuf);

impl TempDb {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "trailfinder_it_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        Self(dir.join("nested").join("trails.db"))
    }

    fn open(&self) -> Arc<SqliteStore> {
        Arc::new(SqliteStore::open(&self.0).unwrap())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        if let Some(dir) = self.0.parent().and_then(|p| p.parent()) {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

#[tokio::test]
async fn first_run_seeds_defaults_and_state_survives_restart() {
    let db = TempDb::new("restart");

    {
        let store = db.open();
        let mut repo = TrailRepository::load(store.clone()).await;
        assert_eq!(repo.trails(), default_trails().as_slice());

        assert!(repo.toggle_favorite("glacier-veil-pass"));
        assert!(repo.toggle_favorite("ember-falls-path"));
        assert!(!repo.toggle_favorite("glacier-veil-pass"));

        let notes = TrailNotes::new(store.clone());
        notes
            .save("ember-falls-path", "  Go early, parking fills by nine. ")
            .await
            .unwrap();

        repo.close().await.unwrap();

        let stored: Vec<String> = store.get_or(FAVORITES_KEY, Vec::new()).await.unwrap();
        assert_eq!(stored, vec!["ember-falls-path"]);
    }

    let store = db.open();
    let repo = TrailRepository::load(store.clone()).await;
    assert_eq!(repo.trails().len(), 6);
    assert!(repo.is_favorite("ember-falls-path"));
    assert!(!repo.is_favorite("glacier-veil-pass"));

    let notes = TrailNotes::new(store.clone());
    assert_eq!(
        notes.load("ember-falls-path").await,
        "Go early, parking fills by nine."
    );
    assert_eq!(notes.load("sage-creek-loop").await, "");

    let stats = store.stats().unwrap();
    assert_eq!(stats.entries, 3);
    assert!(stats.last_write.is_some());

    repo.close().await.unwrap();
}

#[tokio::test]
async fn filter_pin_and_chart_from_stored_catalog() {
    let db = TempDb::new("browse");
    let store = db.open();
    let mut repo = TrailRepository::load(store).await;

    repo.toggle_favorite("obsidian-ridge-traverse");
    repo.toggle_favorite("silverpine-lakeside");

    let hard = FilterParams {
        difficulty: DifficultyFilter::Only(Difficulty::Hard),
        ..FilterParams::default()
    };
    let visible = repo.filter(&hard);
    let ids: Vec<&str> = visible.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["obsidian-ridge-traverse", "glacier-veil-pass"]);

    let pinned = repo.pinned(&visible);
    assert_eq!(pinned.len(), 1);
    assert_eq!(pinned[0].id, "obsidian-ridge-traverse");

    let everything = repo.filter(&FilterParams::default());
    assert_eq!(everything.len(), 6);

    let trail = repo.require("glacier-veil-pass").unwrap();
    let path = project(trail.profile(), Viewport::THUMBNAIL).unwrap();
    assert_eq!(path.points.len(), trail.profile().len());
    assert!(path.line().starts_with("M0.00,"));
    assert!(path.area().ends_with(" L100,24 L0,24 Z"));

    repo.close().await.unwrap();
}

#[tokio::test]
async fn imported_catalog_replaces_defaults() {
    let db = TempDb::new("import");
    let store = db.open();

    let mut imported = default_trails();
    imported.retain(|t| t.difficulty == Difficulty::Easy);
    imported[0].elevation_profile = None;

    let mut repo = TrailRepository::load(store.clone()).await;
    repo.replace_trails(imported.clone());
    repo.close().await.unwrap();

    let stored: Vec<trailfinder::Trail> = store.get_or(TRAILS_KEY, Vec::new()).await.unwrap();
    assert_eq!(stored, imported);

    let repo = TrailRepository::load(store).await;
    assert_eq!(repo.trails().len(), 2);
    assert!(project(repo.trails()[0].profile(), Viewport::DETAIL).is_none());
    repo.close().await.unwrap();
}

#[tokio::test]
async fn closed_view_discards_late_load() {
    let db = TempDb::new("guard");
    let store = db.open();

    let guard = ViewGuard::new();
    guard.close();
    assert!(TrailRepository::load_guarded(store.clone(), &guard)
        .await
        .is_none());
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(store.stats().unwrap().entries, 0);

    let notes = TrailNotes::new(store);
    assert!(notes.load_guarded("mt-aurora-ridge", &guard).await.is_none());
}
