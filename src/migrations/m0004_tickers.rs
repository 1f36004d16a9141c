use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0004_tickers")
        .depends_on(&["0001_initial_schema"])
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE ciks (
    cik INTEGER PRIMARY KEY NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS ciks (
    cik BIGINT PRIMARY KEY NOT NULL,
    created_at TEXT NOT NULL DEFAULT to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"'),
    updated_at TEXT NOT NULL DEFAULT to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE tickers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    cik INTEGER NOT NULL DEFAULT 0,
    ticker TEXT NOT NULL DEFAULT '',
    title TEXT NOT NULL DEFAULT '',
    exchange TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS tickers (
    id SERIAL PRIMARY KEY,
    cik BIGINT NOT NULL DEFAULT 0,
    ticker TEXT NOT NULL DEFAULT '',
    title TEXT NOT NULL DEFAULT '',
    exchange TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"'),
    updated_at TEXT NOT NULL DEFAULT to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE UNIQUE INDEX idx_tickers_natural_key ON tickers(cik, ticker, title)",
                )
                .for_backend(
                    "postgres",
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_tickers_natural_key ON tickers(cik, ticker, title)",
                ),
        )
}
