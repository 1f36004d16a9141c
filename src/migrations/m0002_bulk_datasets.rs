use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0002_bulk_datasets")
        .depends_on(&["0001_initial_schema"])
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE fsds_sub (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    adsh TEXT NOT NULL DEFAULT '',
    cik INTEGER NOT NULL DEFAULT 0,
    name TEXT NOT NULL DEFAULT '',
    sic TEXT NOT NULL DEFAULT '',
    countryba TEXT NOT NULL DEFAULT '',
    stprba TEXT NOT NULL DEFAULT '',
    cityba TEXT NOT NULL DEFAULT '',
    zipba TEXT NOT NULL DEFAULT '',
    bas1 TEXT NOT NULL DEFAULT '',
    bas2 TEXT NOT NULL DEFAULT '',
    baph TEXT NOT NULL DEFAULT '',
    countryma TEXT NOT NULL DEFAULT '',
    stprma TEXT NOT NULL DEFAULT '',
    cityma TEXT NOT NULL DEFAULT '',
    zipma TEXT NOT NULL DEFAULT '',
    mas1 TEXT NOT NULL DEFAULT '',
    mas2 TEXT NOT NULL DEFAULT '',
    countryinc TEXT NOT NULL DEFAULT '',
    stprinc TEXT NOT NULL DEFAULT '',
    ein TEXT NOT NULL DEFAULT '',
    former TEXT NOT NULL DEFAULT '',
    changed TEXT NOT NULL DEFAULT '',
    afs TEXT NOT NULL DEFAULT '',
    wksi TEXT NOT NULL DEFAULT '',
    fye TEXT NOT NULL DEFAULT '',
    form TEXT NOT NULL DEFAULT '',
    period TEXT,
    fy TEXT NOT NULL DEFAULT '',
    fp TEXT NOT NULL DEFAULT '',
    filed TEXT,
    accepted TEXT NOT NULL DEFAULT '',
    prevrpt TEXT NOT NULL DEFAULT '',
    detail TEXT NOT NULL DEFAULT '',
    instance TEXT NOT NULL DEFAULT '',
    nciks TEXT NOT NULL DEFAULT '',
    aciks TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS fsds_sub (
    id SERIAL PRIMARY KEY,
    adsh TEXT NOT NULL DEFAULT '',
    cik BIGINT NOT NULL DEFAULT 0,
    name TEXT NOT NULL DEFAULT '',
    sic TEXT NOT NULL DEFAULT '',
    countryba TEXT NOT NULL DEFAULT '',
    stprba TEXT NOT NULL DEFAULT '',
    cityba TEXT NOT NULL DEFAULT '',
    zipba TEXT NOT NULL DEFAULT '',
    bas1 TEXT NOT NULL DEFAULT '',
    bas2 TEXT NOT NULL DEFAULT '',
    baph TEXT NOT NULL DEFAULT '',
    countryma TEXT NOT NULL DEFAULT '',
    stprma TEXT NOT NULL DEFAULT '',
    cityma TEXT NOT NULL DEFAULT '',
    zipma TEXT NOT NULL DEFAULT '',
    mas1 TEXT NOT NULL DEFAULT '',
    mas2 TEXT NOT NULL DEFAULT '',
    countryinc TEXT NOT NULL DEFAULT '',
    stprinc TEXT NOT NULL DEFAULT '',
    ein TEXT NOT NULL DEFAULT '',
    former TEXT NOT NULL DEFAULT '',
    changed TEXT NOT NULL DEFAULT '',
    afs TEXT NOT NULL DEFAULT '',
    wksi TEXT NOT NULL DEFAULT '',
    fye TEXT NOT NULL DEFAULT '',
    form TEXT NOT NULL DEFAULT '',
    period TEXT,
    fy TEXT NOT NULL DEFAULT '',
    fp TEXT NOT NULL DEFAULT '',
    filed TEXT,
    accepted TEXT NOT NULL DEFAULT '',
    prevrpt TEXT NOT NULL DEFAULT '',
    detail TEXT NOT NULL DEFAULT '',
    instance TEXT NOT NULL DEFAULT '',
    nciks TEXT NOT NULL DEFAULT '',
    aciks TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE UNIQUE INDEX idx_fsds_sub_natural_key ON fsds_sub(adsh, cik, name, sic)",
                )
                .for_backend(
                    "postgres",
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_fsds_sub_natural_key ON fsds_sub(adsh, cik, name, sic)",
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE fsds_tag (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tag TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL DEFAULT '',
    custom TEXT NOT NULL DEFAULT '',
    "abstract" TEXT NOT NULL DEFAULT '',
    datatype TEXT NOT NULL DEFAULT '',
    lord TEXT NOT NULL DEFAULT '',
    crdr TEXT NOT NULL DEFAULT '',
    tlabel TEXT NOT NULL DEFAULT '',
    doc TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS fsds_tag (
    id SERIAL PRIMARY KEY,
    tag TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL DEFAULT '',
    custom TEXT NOT NULL DEFAULT '',
    "abstract" TEXT NOT NULL DEFAULT '',
    datatype TEXT NOT NULL DEFAULT '',
    lord TEXT NOT NULL DEFAULT '',
    crdr TEXT NOT NULL DEFAULT '',
    tlabel TEXT NOT NULL DEFAULT '',
    doc TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE UNIQUE INDEX idx_fsds_tag_natural_key ON fsds_tag(tag, version)",
                )
                .for_backend(
                    "postgres",
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_fsds_tag_natural_key ON fsds_tag(tag, version)",
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE fsds_num (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    adsh TEXT NOT NULL DEFAULT '',
    tag TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL DEFAULT '',
    coreg TEXT NOT NULL DEFAULT '',
    ddate TEXT NOT NULL DEFAULT '',
    qtrs TEXT NOT NULL DEFAULT '',
    uom TEXT NOT NULL DEFAULT '',
    value TEXT NOT NULL DEFAULT '',
    footnote TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS fsds_num (
    id SERIAL PRIMARY KEY,
    adsh TEXT NOT NULL DEFAULT '',
    tag TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL DEFAULT '',
    coreg TEXT NOT NULL DEFAULT '',
    ddate TEXT NOT NULL DEFAULT '',
    qtrs TEXT NOT NULL DEFAULT '',
    uom TEXT NOT NULL DEFAULT '',
    value TEXT NOT NULL DEFAULT '',
    footnote TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE UNIQUE INDEX idx_fsds_num_natural_key ON fsds_num(adsh, tag, version, coreg, ddate, qtrs, uom)",
                )
                .for_backend(
                    "postgres",
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_fsds_num_natural_key ON fsds_num(adsh, tag, version, coreg, ddate, qtrs, uom)",
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE fsds_pre (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    adsh TEXT NOT NULL DEFAULT '',
    report TEXT NOT NULL DEFAULT '',
    line TEXT NOT NULL DEFAULT '',
    stmt TEXT NOT NULL DEFAULT '',
    inpth TEXT NOT NULL DEFAULT '',
    rfile TEXT NOT NULL DEFAULT '',
    tag TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL DEFAULT '',
    plabel TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS fsds_pre (
    id SERIAL PRIMARY KEY,
    adsh TEXT NOT NULL DEFAULT '',
    report TEXT NOT NULL DEFAULT '',
    line TEXT NOT NULL DEFAULT '',
    stmt TEXT NOT NULL DEFAULT '',
    inpth TEXT NOT NULL DEFAULT '',
    rfile TEXT NOT NULL DEFAULT '',
    tag TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL DEFAULT '',
    plabel TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE UNIQUE INDEX idx_fsds_pre_natural_key ON fsds_pre(adsh, report, line)",
                )
                .for_backend(
                    "postgres",
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_fsds_pre_natural_key ON fsds_pre(adsh, report, line)",
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE mfd_sub (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    adsh TEXT NOT NULL DEFAULT '',
    cik INTEGER NOT NULL DEFAULT 0,
    name TEXT NOT NULL DEFAULT '',
    countryba TEXT NOT NULL DEFAULT '',
    stprba TEXT NOT NULL DEFAULT '',
    cityba TEXT NOT NULL DEFAULT '',
    zipba TEXT NOT NULL DEFAULT '',
    bas1 TEXT NOT NULL DEFAULT '',
    bas2 TEXT NOT NULL DEFAULT '',
    baph TEXT NOT NULL DEFAULT '',
    countryma TEXT NOT NULL DEFAULT '',
    stprma TEXT NOT NULL DEFAULT '',
    cityma TEXT NOT NULL DEFAULT '',
    zipma TEXT NOT NULL DEFAULT '',
    mas1 TEXT NOT NULL DEFAULT '',
    mas2 TEXT NOT NULL DEFAULT '',
    countryinc TEXT NOT NULL DEFAULT '',
    stprinc TEXT NOT NULL DEFAULT '',
    ein TEXT NOT NULL DEFAULT '',
    former TEXT NOT NULL DEFAULT '',
    changed TEXT NOT NULL DEFAULT '',
    fye TEXT NOT NULL DEFAULT '',
    pdate TEXT NOT NULL DEFAULT '',
    effdate TEXT NOT NULL DEFAULT '',
    form TEXT NOT NULL DEFAULT '',
    filed TEXT NOT NULL DEFAULT '',
    accepted TEXT NOT NULL DEFAULT '',
    instance TEXT NOT NULL DEFAULT '',
    nciks TEXT NOT NULL DEFAULT '',
    aciks TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS mfd_sub (
    id SERIAL PRIMARY KEY,
    adsh TEXT NOT NULL DEFAULT '',
    cik BIGINT NOT NULL DEFAULT 0,
    name TEXT NOT NULL DEFAULT '',
    countryba TEXT NOT NULL DEFAULT '',
    stprba TEXT NOT NULL DEFAULT '',
    cityba TEXT NOT NULL DEFAULT '',
    zipba TEXT NOT NULL DEFAULT '',
    bas1 TEXT NOT NULL DEFAULT '',
    bas2 TEXT NOT NULL DEFAULT '',
    baph TEXT NOT NULL DEFAULT '',
    countryma TEXT NOT NULL DEFAULT '',
    stprma TEXT NOT NULL DEFAULT '',
    cityma TEXT NOT NULL DEFAULT '',
    zipma TEXT NOT NULL DEFAULT '',
    mas1 TEXT NOT NULL DEFAULT '',
    mas2 TEXT NOT NULL DEFAULT '',
    countryinc TEXT NOT NULL DEFAULT '',
    stprinc TEXT NOT NULL DEFAULT '',
    ein TEXT NOT NULL DEFAULT '',
    former TEXT NOT NULL DEFAULT '',
    changed TEXT NOT NULL DEFAULT '',
    fye TEXT NOT NULL DEFAULT '',
    pdate TEXT NOT NULL DEFAULT '',
    effdate TEXT NOT NULL DEFAULT '',
    form TEXT NOT NULL DEFAULT '',
    filed TEXT NOT NULL DEFAULT '',
    accepted TEXT NOT NULL DEFAULT '',
    instance TEXT NOT NULL DEFAULT '',
    nciks TEXT NOT NULL DEFAULT '',
    aciks TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE UNIQUE INDEX idx_mfd_sub_natural_key ON mfd_sub(adsh)",
                )
                .for_backend(
                    "postgres",
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_mfd_sub_natural_key ON mfd_sub(adsh)",
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE mfd_tag (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tag TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL DEFAULT '',
    custom TEXT NOT NULL DEFAULT '',
    "abstract" TEXT NOT NULL DEFAULT '',
    datatype TEXT NOT NULL DEFAULT '',
    lord TEXT NOT NULL DEFAULT '',
    tlabel TEXT NOT NULL DEFAULT '',
    doc TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS mfd_tag (
    id SERIAL PRIMARY KEY,
    tag TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL DEFAULT '',
    custom TEXT NOT NULL DEFAULT '',
    "abstract" TEXT NOT NULL DEFAULT '',
    datatype TEXT NOT NULL DEFAULT '',
    lord TEXT NOT NULL DEFAULT '',
    tlabel TEXT NOT NULL DEFAULT '',
    doc TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE UNIQUE INDEX idx_mfd_tag_natural_key ON mfd_tag(tag, version)",
                )
                .for_backend(
                    "postgres",
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_mfd_tag_natural_key ON mfd_tag(tag, version)",
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE mfd_lab (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    adsh TEXT NOT NULL DEFAULT '',
    tag TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL DEFAULT '',
    "std" TEXT NOT NULL DEFAULT '',
    terse TEXT NOT NULL DEFAULT '',
    verbose_val TEXT NOT NULL DEFAULT '',
    total TEXT NOT NULL DEFAULT '',
    negated TEXT NOT NULL DEFAULT '',
    negated_terse TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS mfd_lab (
    id SERIAL PRIMARY KEY,
    adsh TEXT NOT NULL DEFAULT '',
    tag TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL DEFAULT '',
    "std" TEXT NOT NULL DEFAULT '',
    terse TEXT NOT NULL DEFAULT '',
    verbose_val TEXT NOT NULL DEFAULT '',
    total TEXT NOT NULL DEFAULT '',
    negated TEXT NOT NULL DEFAULT '',
    negated_terse TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE UNIQUE INDEX idx_mfd_lab_natural_key ON mfd_lab(adsh, tag, version)",
                )
                .for_backend(
                    "postgres",
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_mfd_lab_natural_key ON mfd_lab(adsh, tag, version)",
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE mfd_cal (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    adsh TEXT NOT NULL DEFAULT '',
    grp TEXT NOT NULL DEFAULT '',
    arc TEXT NOT NULL DEFAULT '',
    negative TEXT NOT NULL DEFAULT '',
    ptag TEXT NOT NULL DEFAULT '',
    pversion TEXT NOT NULL DEFAULT '',
    ctag TEXT NOT NULL DEFAULT '',
    cversion TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS mfd_cal (
    id SERIAL PRIMARY KEY,
    adsh TEXT NOT NULL DEFAULT '',
    grp TEXT NOT NULL DEFAULT '',
    arc TEXT NOT NULL DEFAULT '',
    negative TEXT NOT NULL DEFAULT '',
    ptag TEXT NOT NULL DEFAULT '',
    pversion TEXT NOT NULL DEFAULT '',
    ctag TEXT NOT NULL DEFAULT '',
    cversion TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE UNIQUE INDEX idx_mfd_cal_natural_key ON mfd_cal(adsh, grp, arc)",
                )
                .for_backend(
                    "postgres",
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_mfd_cal_natural_key ON mfd_cal(adsh, grp, arc)",
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE mfd_num (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    adsh TEXT NOT NULL DEFAULT '',
    tag TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL DEFAULT '',
    ddate TEXT NOT NULL DEFAULT '',
    uom TEXT NOT NULL DEFAULT '',
    series TEXT NOT NULL DEFAULT '',
    class TEXT NOT NULL DEFAULT '',
    measure TEXT NOT NULL DEFAULT '',
    document TEXT NOT NULL DEFAULT '',
    otherdims TEXT NOT NULL DEFAULT '',
    iprx TEXT NOT NULL DEFAULT '',
    value TEXT NOT NULL DEFAULT '',
    footnote TEXT NOT NULL DEFAULT '',
    footlen TEXT NOT NULL DEFAULT '',
    dimn TEXT NOT NULL DEFAULT '',
    dcml TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS mfd_num (
    id SERIAL PRIMARY KEY,
    adsh TEXT NOT NULL DEFAULT '',
    tag TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL DEFAULT '',
    ddate TEXT NOT NULL DEFAULT '',
    uom TEXT NOT NULL DEFAULT '',
    series TEXT NOT NULL DEFAULT '',
    class TEXT NOT NULL DEFAULT '',
    measure TEXT NOT NULL DEFAULT '',
    document TEXT NOT NULL DEFAULT '',
    otherdims TEXT NOT NULL DEFAULT '',
    iprx TEXT NOT NULL DEFAULT '',
    value TEXT NOT NULL DEFAULT '',
    footnote TEXT NOT NULL DEFAULT '',
    footlen TEXT NOT NULL DEFAULT '',
    dimn TEXT NOT NULL DEFAULT '',
    dcml TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE UNIQUE INDEX idx_mfd_num_natural_key ON mfd_num(adsh, tag, version, ddate, uom, series, class, measure, document, otherdims, iprx)",
                )
                .for_backend(
                    "postgres",
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_mfd_num_natural_key ON mfd_num(adsh, tag, version, ddate, uom, series, class, measure, document, otherdims, iprx)",
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    r#"CREATE TABLE mfd_txt (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    adsh TEXT NOT NULL DEFAULT '',
    tag TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL DEFAULT '',
    ddate TEXT NOT NULL DEFAULT '',
    lang TEXT NOT NULL DEFAULT '',
    series TEXT NOT NULL DEFAULT '',
    class TEXT NOT NULL DEFAULT '',
    measure TEXT NOT NULL DEFAULT '',
    document TEXT NOT NULL DEFAULT '',
    otherdims TEXT NOT NULL DEFAULT '',
    iprx TEXT NOT NULL DEFAULT '',
    dcml TEXT NOT NULL DEFAULT '',
    escaped TEXT NOT NULL DEFAULT '',
    srclen TEXT NOT NULL DEFAULT '',
    txtlen TEXT NOT NULL DEFAULT '',
    footnote TEXT NOT NULL DEFAULT '',
    footlen TEXT NOT NULL DEFAULT '',
    context TEXT NOT NULL DEFAULT '',
    value TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
)"#,
                )
                .for_backend(
                    "postgres",
                    r#"CREATE TABLE IF NOT EXISTS mfd_txt (
    id SERIAL PRIMARY KEY,
    adsh TEXT NOT NULL DEFAULT '',
    tag TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL DEFAULT '',
    ddate TEXT NOT NULL DEFAULT '',
    lang TEXT NOT NULL DEFAULT '',
    series TEXT NOT NULL DEFAULT '',
    class TEXT NOT NULL DEFAULT '',
    measure TEXT NOT NULL DEFAULT '',
    document TEXT NOT NULL DEFAULT '',
    otherdims TEXT NOT NULL DEFAULT '',
    iprx TEXT NOT NULL DEFAULT '',
    dcml TEXT NOT NULL DEFAULT '',
    escaped TEXT NOT NULL DEFAULT '',
    srclen TEXT NOT NULL DEFAULT '',
    txtlen TEXT NOT NULL DEFAULT '',
    footnote TEXT NOT NULL DEFAULT '',
    footlen TEXT NOT NULL DEFAULT '',
    context TEXT NOT NULL DEFAULT '',
    value TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT to_char(now() AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
)"#,
                ),
        )
        .operation(
            RunSql::portable()
                .for_backend(
                    "sqlite",
                    "CREATE UNIQUE INDEX idx_mfd_txt_natural_key ON mfd_txt(adsh, tag, version, ddate, series, class, measure, document, otherdims, iprx)",
                )
                .for_backend(
                    "postgres",
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_mfd_txt_natural_key ON mfd_txt(adsh, tag, version, ddate, series, class, measure, document, otherdims, iprx)",
                ),
        )
}
