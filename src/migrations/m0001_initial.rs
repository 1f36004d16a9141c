use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0001_initial_schema")
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE worklist (
    year INTEGER NOT NULL,
    month INTEGER NOT NULL,
    will_download BOOLEAN NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (year, month)
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS worklist (
    year INTEGER NOT NULL,
    month INTEGER NOT NULL,
    will_download BOOLEAN NOT NULL DEFAULT FALSE,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (year, month)
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE downloads (
    url TEXT PRIMARY KEY NOT NULL,
    etag TEXT NOT NULL DEFAULT '',
    size INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS downloads (
    url TEXT PRIMARY KEY NOT NULL,
    etag TEXT NOT NULL DEFAULT '',
    size BIGINT NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE skipped_files (
    url TEXT PRIMARY KEY NOT NULL,
    created_at TEXT NOT NULL
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS skipped_files (
    url TEXT PRIMARY KEY NOT NULL,
    created_at TEXT NOT NULL
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ev TEXT NOT NULL,
    created_at TEXT NOT NULL
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS events (
    id SERIAL PRIMARY KEY,
    ev TEXT NOT NULL,
    created_at TEXT NOT NULL
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE INDEX idx_events_created_at ON events(created_at)",
                )
                .for_backend(
                    "postgres",
                    "CREATE INDEX IF NOT EXISTS idx_events_created_at ON events(created_at)",
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE filing_files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL DEFAULT '',
    link TEXT NOT NULL DEFAULT '',
    guid TEXT NOT NULL DEFAULT '',
    enclosure_url TEXT NOT NULL DEFAULT '',
    enclosure_length INTEGER NOT NULL DEFAULT 0,
    enclosure_type TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    pub_date TEXT NOT NULL DEFAULT '',
    company_name TEXT NOT NULL DEFAULT '',
    form_type TEXT NOT NULL DEFAULT '',
    filing_date TEXT NOT NULL DEFAULT '',
    cik_number INTEGER NOT NULL DEFAULT 0,
    accession_number TEXT NOT NULL DEFAULT '',
    file_number TEXT NOT NULL DEFAULT '',
    acceptance_datetime TEXT NOT NULL DEFAULT '',
    period TEXT NOT NULL DEFAULT '',
    assistant_director TEXT NOT NULL DEFAULT '',
    assigned_sic INTEGER NOT NULL DEFAULT 0,
    fiscal_year_end INTEGER NOT NULL DEFAULT 0,
    xbrl_sequence INTEGER NOT NULL DEFAULT 0,
    xbrl_file TEXT NOT NULL DEFAULT '',
    xbrl_type TEXT NOT NULL DEFAULT '',
    xbrl_size INTEGER NOT NULL DEFAULT 0,
    xbrl_description TEXT NOT NULL DEFAULT '',
    xbrl_inline BOOLEAN NOT NULL DEFAULT 0,
    xbrl_url TEXT NOT NULL DEFAULT '',
    xbrl_body TEXT NOT NULL DEFAULT '',
    xbrl_path TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS filing_files (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL DEFAULT '',
    link TEXT NOT NULL DEFAULT '',
    guid TEXT NOT NULL DEFAULT '',
    enclosure_url TEXT NOT NULL DEFAULT '',
    enclosure_length BIGINT NOT NULL DEFAULT 0,
    enclosure_type TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    pub_date TEXT NOT NULL DEFAULT '',
    company_name TEXT NOT NULL DEFAULT '',
    form_type TEXT NOT NULL DEFAULT '',
    filing_date TEXT NOT NULL DEFAULT '',
    cik_number BIGINT NOT NULL DEFAULT 0,
    accession_number TEXT NOT NULL DEFAULT '',
    file_number TEXT NOT NULL DEFAULT '',
    acceptance_datetime TEXT NOT NULL DEFAULT '',
    period TEXT NOT NULL DEFAULT '',
    assistant_director TEXT NOT NULL DEFAULT '',
    assigned_sic INTEGER NOT NULL DEFAULT 0,
    fiscal_year_end INTEGER NOT NULL DEFAULT 0,
    xbrl_sequence INTEGER NOT NULL DEFAULT 0,
    xbrl_file TEXT NOT NULL DEFAULT '',
    xbrl_type TEXT NOT NULL DEFAULT '',
    xbrl_size BIGINT NOT NULL DEFAULT 0,
    xbrl_description TEXT NOT NULL DEFAULT '',
    xbrl_inline BOOLEAN NOT NULL DEFAULT FALSE,
    xbrl_url TEXT NOT NULL DEFAULT '',
    xbrl_body TEXT NOT NULL DEFAULT '',
    xbrl_path TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE UNIQUE INDEX idx_filing_files_natural_key ON filing_files(xbrl_sequence, xbrl_file, xbrl_type, xbrl_size, xbrl_description, xbrl_inline, xbrl_url)",
                )
                .for_backend(
                    "postgres",
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_filing_files_natural_key ON filing_files(xbrl_sequence, xbrl_file, xbrl_type, xbrl_size, xbrl_description, xbrl_inline, xbrl_url)",
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE INDEX idx_filing_files_url ON filing_files(xbrl_url)",
                )
                .for_backend(
                    "postgres",
                    "CREATE INDEX IF NOT EXISTS idx_filing_files_url ON filing_files(xbrl_url)",
                ),
        )
}
