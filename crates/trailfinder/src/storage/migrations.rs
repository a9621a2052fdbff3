//! Database migration system for trailfinder.
//!
//! The schema version lives in the `metadata` table. Fresh databases are
//! created at the latest layout by `SCHEMA_STATEMENTS` and only get their
//! version stamped; older files are walked forward one step at a time inside
//! a single transaction.

use rusqlite::{Connection, OptionalExtension, Transaction};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// The current schema version.
pub const CURRENT_VERSION: i32 = 2;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

type Migration = fn(&Transaction<'_>) -> Result<()>;

/// Migrations indexed by the version they produce.
const MIGRATIONS: &[(i32, Migration)] = &[(1, migrate_v1), (2, migrate_v2)];

/// Initialize the database schema.
///
/// Creates all tables and indexes if they don't exist, then runs any
/// pending migrations to bring the schema up to the current version.
///
/// # Errors
///
/// Returns an error if schema creation or migration fails.
pub fn initialize_schema(conn: &mut Connection) -> Result<()> {
    let existing = has_table(conn, "kv")?;
    let version = if existing || has_table(conn, "metadata")? {
        get_schema_version(conn)?
    } else {
        0
    };

    if !existing {
        // Nothing to migrate: lay down the current schema directly.
        for statement in SCHEMA_STATEMENTS {
            conn.execute(statement, [])?;
        }
        set_schema_version(conn, CURRENT_VERSION)?;
        debug!(version = CURRENT_VERSION, "Created fresh schema");
        return Ok(());
    }

    if version > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {version} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }

    if version < CURRENT_VERSION {
        run_migrations(conn, version)?;
    }
    Ok(())
}

fn has_table(conn: &Connection, name: &str) -> Result<bool> {
    let found: Option<i32> = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set.
fn get_schema_version(conn: &Connection) -> Result<i32> {
    conn.execute(super::schema::CREATE_METADATA_TABLE, [])?;
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
    }
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

/// Run every migration above `from_version`, all or nothing.
fn run_migrations(conn: &mut Connection, from_version: i32) -> Result<()> {
    let tx = conn.transaction()?;
    for (version, migrate) in MIGRATIONS {
        if *version > from_version {
            debug!(version, "Applying migration");
            migrate(&tx)?;
            set_schema_version(&tx, *version)?;
        }
    }
    tx.commit()?;

    info!(from = from_version, to = CURRENT_VERSION, "Database schema migrated");
    Ok(())
}

/// Version 1: bare key/value pairs.
fn migrate_v1(tx: &Transaction<'_>) -> Result<()> {
    tx.execute(
        "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
        [],
    )?;
    Ok(())
}

/// Version 2: content hash and write stamp per key.
fn migrate_v2(tx: &Transaction<'_>) -> Result<()> {
    let columns: Vec<String> = tx
        .prepare("SELECT name FROM pragma_table_info('kv')")?
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<_, _>>()?;

    if !columns.iter().any(|c| c == "value_hash") {
        tx.execute(
            "ALTER TABLE kv ADD COLUMN value_hash TEXT NOT NULL DEFAULT ''",
            [],
        )?;
    }
    if !columns.iter().any(|c| c == "updated_at") {
        tx.execute(
            "ALTER TABLE kv ADD COLUMN updated_at TEXT NOT NULL DEFAULT ''",
            [],
        )?;
    }
    tx.execute(super::schema::CREATE_UPDATED_INDEX, [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        Connection::open_in_memory().expect("failed to create in-memory database")
    }

    fn table_count(conn: &Connection, name: &str) -> i32 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [name],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_initialize_schema_creates_tables() {
        let mut conn = create_test_db();
        initialize_schema(&mut conn).expect("failed to initialize schema");

        assert_eq!(table_count(&conn, "kv"), 1);
        assert_eq!(table_count(&conn, "metadata"), 1);
    }

    #[test]
    fn test_initialize_schema_sets_version() {
        let mut conn = create_test_db();
        initialize_schema(&mut conn).expect("failed to initialize schema");

        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_initialize_schema_idempotent() {
        let mut conn = create_test_db();
        initialize_schema(&mut conn).expect("first init failed");
        initialize_schema(&mut conn).expect("second init failed");

        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_upgrade_from_v1() {
        let mut conn = create_test_db();
        conn.execute_batch(
            r"
            CREATE TABLE kv (key TEXT PRIMARY KEY, value TEXT NOT NULL);
            CREATE TABLE metadata (key TEXT PRIMARY KEY, value TEXT NOT NULL);
            INSERT INTO metadata (key, value) VALUES ('schema_version', '1');
            INSERT INTO kv (key, value) VALUES ('trails', '[]');
            ",
        )
        .unwrap();

        initialize_schema(&mut conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
        let (value, hash): (String, String) = conn
            .query_row(
                "SELECT value, value_hash FROM kv WHERE key = 'trails'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(value, "[]");
        assert_eq!(hash, "");
    }

    #[test]
    fn test_unversioned_kv_table_is_migrated() {
        let mut conn = create_test_db();
        conn.execute(
            "CREATE TABLE kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .unwrap();

        initialize_schema(&mut conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_newer_version_rejected() {
        let mut conn = create_test_db();
        initialize_schema(&mut conn).unwrap();
        set_schema_version(&conn, CURRENT_VERSION + 1).unwrap();

        let err = initialize_schema(&mut conn).unwrap_err();
        assert!(err.to_string().contains("newer than supported"));
    }

    #[test]
    fn test_get_schema_version_fresh_db() {
        let conn = create_test_db();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_invalid_stored_version() {
        let mut conn = create_test_db();
        initialize_schema(&mut conn).unwrap();
        conn.execute(
            "UPDATE metadata SET value = 'two' WHERE key = ?1",
            [VERSION_KEY],
        )
        .unwrap();

        let err = get_schema_version(&conn).unwrap_err();
        assert!(err.to_string().contains("invalid schema version"));
    }

    #[test]
    fn test_migrations_cover_every_version() {
        let versions: Vec<i32> = MIGRATIONS.iter().map(|(v, _)| *v).collect();
        let expected: Vec<i32> = (1..=CURRENT_VERSION).collect();
        assert_eq!(versions, expected);
    }

    #[test]
    fn test_updated_index_created() {
        let mut conn = create_test_db();
        initialize_schema(&mut conn).expect("failed to initialize schema");

        let indexes: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='index' AND tbl_name='kv'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(indexes.iter().any(|n| n.contains("updated")));
    }
}
