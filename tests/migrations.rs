//! Schema tests for the cetane migration registry.
//!
//! Applies the registry through rusqlite and checks the resulting tables
//! and natural-key indexes against what the repositories rely on.

use std::collections::{BTreeMap, BTreeSet};

use rusqlite::{Connection, Result as SqliteResult};

/// Run cetane migrations (generates SQL for SQLite backend)
fn run_cetane_migrations(conn: &Connection) -> SqliteResult<()> {
    use cetane::backend::Sqlite;

    let registry = edgarsync::migrations::registry();
    let backend = Sqlite;

    let ordered_names = registry
        .resolve_order()
        .expect("Failed to resolve migration order");

    for name in ordered_names {
        let migration = registry
            .get(name)
            .expect("Migration not found after resolve");
        for stmt in migration.forward_sql(&backend) {
            if stmt.trim().is_empty() {
                continue;
            }
            conn.execute_batch(&stmt)?;
        }
    }

    Ok(())
}

fn table_columns(conn: &Connection) -> SqliteResult<BTreeMap<String, Vec<String>>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names: Vec<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<SqliteResult<Vec<_>>>()?;

    let mut tables = BTreeMap::new();
    for name in names {
        let mut pragma = conn.prepare(&format!("PRAGMA table_info(\"{}\")", name))?;
        let columns = pragma
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<SqliteResult<Vec<_>>>()?;
        tables.insert(name, columns);
    }
    Ok(tables)
}

/// (table, columns) of every UNIQUE index.
fn unique_indexes(conn: &Connection) -> SqliteResult<BTreeSet<(String, Vec<String>)>> {
    let mut stmt = conn.prepare(
        "SELECT name, tbl_name, sql FROM sqlite_master WHERE type='index' AND sql IS NOT NULL",
    )?;
    let rows: Vec<(String, String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<SqliteResult<Vec<_>>>()?;

    let mut indexes = BTreeSet::new();
    for (name, table, sql) in rows {
        if !sql.to_uppercase().contains("UNIQUE") {
            continue;
        }
        let mut pragma = conn.prepare(&format!("PRAGMA index_info(\"{}\")", name))?;
        let columns = pragma
            .query_map([], |row| row.get::<_, String>(2))?
            .collect::<SqliteResult<Vec<_>>>()?;
        indexes.insert((table, columns));
    }
    Ok(indexes)
}

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_registry_creates_every_table() {
    let conn = Connection::open_in_memory().expect("Failed to open DB");
    run_cetane_migrations(&conn).expect("Failed to run cetane migrations");

    let tables = table_columns(&conn).expect("Failed to extract tables");
    let names: BTreeSet<&str> = tables.keys().map(String::as_str).collect();

    let expected: BTreeSet<&str> = [
        "worklist",
        "downloads",
        "skipped_files",
        "events",
        "filing_files",
        "filing_zip_files",
        "ciks",
        "tickers",
        "fsds_sub",
        "fsds_tag",
        "fsds_num",
        "fsds_pre",
        "mfd_sub",
        "mfd_tag",
        "mfd_lab",
        "mfd_cal",
        "mfd_num",
        "mfd_txt",
    ]
    .into_iter()
    .collect();
    assert_eq!(names, expected);

    assert_eq!(
        tables["worklist"],
        cols(&["year", "month", "will_download", "updated_at"])
    );
    assert_eq!(
        tables["downloads"],
        cols(&["url", "etag", "size", "updated_at"])
    );
    assert!(tables["filing_files"].contains(&"xbrl_body".to_string()));
    assert!(tables["filing_files"].contains(&"xbrl_path".to_string()));
    assert!(tables["fsds_tag"].contains(&"abstract".to_string()));
    assert!(tables["mfd_lab"].contains(&"std".to_string()));
    assert_eq!(
        tables["tickers"],
        cols(&["id", "cik", "ticker", "title", "exchange", "created_at", "updated_at"])
    );
}

#[test]
fn test_natural_key_indexes() {
    let conn = Connection::open_in_memory().expect("Failed to open DB");
    run_cetane_migrations(&conn).expect("Failed to run cetane migrations");

    let indexes = unique_indexes(&conn).expect("Failed to extract indexes");

    assert!(indexes.contains(&(
        "filing_files".to_string(),
        cols(&[
            "xbrl_sequence",
            "xbrl_file",
            "xbrl_type",
            "xbrl_size",
            "xbrl_description",
            "xbrl_inline",
            "xbrl_url",
        ])
    )));
    assert!(indexes.contains(&(
        "filing_zip_files".to_string(),
        cols(&["cik_number", "accession_number", "xbrl_file", "xbrl_size"])
    )));
    assert!(indexes.contains(&("fsds_tag".to_string(), cols(&["tag", "version"]))));
    assert!(indexes.contains(&(
        "tickers".to_string(),
        cols(&["cik", "ticker", "title"])
    )));
    assert!(indexes.contains(&(
        "fsds_sub".to_string(),
        cols(&["adsh", "cik", "name", "sic"])
    )));
}

#[tokio::test]
async fn test_migrate_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("edgar.db");
    let db = edgarsync::repository::DbContext::from_url(db_path.to_str().unwrap()).unwrap();

    db.migrate().await.unwrap();
    db.migrate().await.unwrap();

    let conn = Connection::open(&db_path).unwrap();
    let applied: i64 = conn
        .query_row("SELECT COUNT(*) FROM __cetane_migrations", [], |row| row.get(0))
        .unwrap();
    assert_eq!(applied, 4);
}
