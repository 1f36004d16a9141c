//! The two quarterly bulk products and their file-to-table dispatch.

use url::Url;

use super::tsv::{BulkLoader, TableLoader};
use crate::repository::bulk::{
    FsdsNum, FsdsPre, FsdsSub, FsdsTag, MfdCal, MfdLab, MfdNum, MfdSub, MfdTag, MfdTxt,
};

static FSDS_SUB: TableLoader<FsdsSub> = TableLoader::new();
static FSDS_TAG: TableLoader<FsdsTag> = TableLoader::new();
static FSDS_NUM: TableLoader<FsdsNum> = TableLoader::new();
static FSDS_PRE: TableLoader<FsdsPre> = TableLoader::new();
static FSDS_LOADERS: [&dyn BulkLoader; 4] = [&FSDS_SUB, &FSDS_TAG, &FSDS_NUM, &FSDS_PRE];

static MFD_SUB: TableLoader<MfdSub> = TableLoader::new();
static MFD_TAG: TableLoader<MfdTag> = TableLoader::new();
static MFD_LAB: TableLoader<MfdLab> = TableLoader::new();
static MFD_CAL: TableLoader<MfdCal> = TableLoader::new();
static MFD_NUM: TableLoader<MfdNum> = TableLoader::new();
static MFD_TXT: TableLoader<MfdTxt> = TableLoader::new();
static MFD_LOADERS: [&dyn BulkLoader; 6] =
    [&MFD_SUB, &MFD_TAG, &MFD_LAB, &MFD_CAL, &MFD_NUM, &MFD_TXT];

/// A quarterly bulk product published by the archive.
pub trait BulkDataset: Send + Sync {
    /// Short name: `fsds` or `mfd`.
    fn data_type(&self) -> &'static str;

    /// Cache-relative directory holding the product's ZIPs.
    fn data_dir_path(&self) -> &'static str;

    fn data_file_url(&self, base: &Url, year_quarter: &str) -> Result<Url, url::ParseError>;

    /// Every table the product loads into.
    fn loaders(&self) -> &'static [&'static dyn BulkLoader];

    /// Loader for a lowercased file name, `None` when the name is unknown.
    fn loader_for(&self, file_name: &str) -> Option<&'static dyn BulkLoader>;

    /// Earliest published (year, quarter), if the product has one.
    fn first_quarter(&self) -> Option<(i32, u32)> {
        None
    }
}

/// Financial Statement Data Sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fsds;

impl BulkDataset for Fsds {
    fn data_type(&self) -> &'static str {
        "fsds"
    }

    fn data_dir_path(&self) -> &'static str {
        "files/dera/data/financial-statement-data-sets/"
    }

    fn data_file_url(&self, base: &Url, year_quarter: &str) -> Result<Url, url::ParseError> {
        base.join(&format!("/{}{}.zip", self.data_dir_path(), year_quarter))
    }

    fn loaders(&self) -> &'static [&'static dyn BulkLoader] {
        &FSDS_LOADERS
    }

    fn loader_for(&self, file_name: &str) -> Option<&'static dyn BulkLoader> {
        match file_name {
            "sub.txt" => Some(&FSDS_SUB),
            "tag.txt" => Some(&FSDS_TAG),
            "num.txt" => Some(&FSDS_NUM),
            "pre.txt" => Some(&FSDS_PRE),
            _ => None,
        }
    }

    fn first_quarter(&self) -> Option<(i32, u32)> {
        Some((2009, 1))
    }
}

/// Mutual Fund Prospectus Risk/Return Summary data sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mfd;

impl BulkDataset for Mfd {
    fn data_type(&self) -> &'static str {
        "mfd"
    }

    fn data_dir_path(&self) -> &'static str {
        "files/dera/data/mutual-fund-prospectus-risk/return-summary-data-sets/"
    }

    fn data_file_url(&self, base: &Url, year_quarter: &str) -> Result<Url, url::ParseError> {
        base.join(&format!("/{}{}_rr1.zip", self.data_dir_path(), year_quarter))
    }

    fn loaders(&self) -> &'static [&'static dyn BulkLoader] {
        &MFD_LOADERS
    }

    fn loader_for(&self, file_name: &str) -> Option<&'static dyn BulkLoader> {
        let (stem, ext) = file_name.rsplit_once('.')?;
        if ext != "txt" && ext != "tsv" {
            return None;
        }
        match stem {
            "sub" => Some(&MFD_SUB),
            "tag" => Some(&MFD_TAG),
            "lab" => Some(&MFD_LAB),
            "cal" => Some(&MFD_CAL),
            "num" => Some(&MFD_NUM),
            "txt" => Some(&MFD_TXT),
            _ => None,
        }
    }
}

/// Look up a product by its short name.
pub fn dataset_for(data_type: &str) -> Option<Box<dyn BulkDataset>> {
    match data_type {
        "fsds" => Some(Box::new(Fsds)),
        "mfd" => Some(Box::new(Mfd)),
        _ => None,
    }
}
