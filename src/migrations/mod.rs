mod m0001_initial;
mod m0002_bulk_datasets;
mod m0003_filing_zip_files;
mod m0004_tickers;

use cetane::prelude::MigrationRegistry;

pub fn registry() -> MigrationRegistry {
    let mut reg = MigrationRegistry::new();
    reg.register(m0001_initial::migration());
    reg.register(m0002_bulk_datasets::migration());
    reg.register(m0003_filing_zip_files::migration());
    reg.register(m0004_tickers::migration());
    reg
}
