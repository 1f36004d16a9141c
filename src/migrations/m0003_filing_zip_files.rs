use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0003_filing_zip_files")
        .depends_on(&["0001_initial_schema"])
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE filing_zip_files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    cik_number INTEGER NOT NULL DEFAULT 0,
    accession_number TEXT NOT NULL DEFAULT '',
    xbrl_file TEXT NOT NULL DEFAULT '',
    xbrl_size INTEGER NOT NULL DEFAULT 0,
    xbrl_body TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS filing_zip_files (
    id SERIAL PRIMARY KEY,
    cik_number BIGINT NOT NULL DEFAULT 0,
    accession_number TEXT NOT NULL DEFAULT '',
    xbrl_file TEXT NOT NULL DEFAULT '',
    xbrl_size BIGINT NOT NULL DEFAULT 0,
    xbrl_body TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE UNIQUE INDEX idx_filing_zip_files_natural_key ON filing_zip_files(cik_number, accession_number, xbrl_file, xbrl_size)",
                )
                .for_backend(
                    "postgres",
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_filing_zip_files_natural_key ON filing_zip_files(cik_number, accession_number, xbrl_file, xbrl_size)",
                ),
        )
}
