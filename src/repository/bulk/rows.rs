//! Row types for the quarterly bulk datasets.
//!
//! Each struct is read straight from a tab-separated file (headers
//! lowercased) and inserted as-is. Columns missing from a file default to
//! empty strings.

use diesel::prelude::*;
use serde::{Deserialize, Deserializer};

use crate::schema;

/// Integers: empty means zero, anything else must parse.
fn int_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse().map_err(|_| {
        serde::de::Error::custom(format!("invalid integer {:?}", trimmed))
    })
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Insertable)]
#[diesel(table_name = schema::fsds_sub)]
#[serde(default)]
pub struct FsdsSub {
    pub adsh: String,
    #[serde(deserialize_with = "int_or_zero")]
    pub cik: i64,
    pub name: String,
    pub sic: String,
    pub countryba: String,
    pub stprba: String,
    pub cityba: String,
    pub zipba: String,
    pub bas1: String,
    pub bas2: String,
    pub baph: String,
    pub countryma: String,
    #[serde(alias = "strpma")]
    pub stprma: String,
    pub cityma: String,
    pub zipma: String,
    pub mas1: String,
    pub mas2: String,
    pub countryinc: String,
    pub stprinc: String,
    pub ein: String,
    pub former: String,
    pub changed: String,
    pub afs: String,
    pub wksi: String,
    pub fye: String,
    pub form: String,
    #[serde(deserialize_with = "empty_as_none")]
    pub period: Option<String>,
    pub fy: String,
    pub fp: String,
    #[serde(alias = "filled", deserialize_with = "empty_as_none")]
    pub filed: Option<String>,
    pub accepted: String,
    pub prevrpt: String,
    pub detail: String,
    pub instance: String,
    pub nciks: String,
    pub aciks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Insertable)]
#[diesel(table_name = schema::fsds_tag)]
#[serde(default)]
pub struct FsdsTag {
    pub tag: String,
    pub version: String,
    pub custom: String,
    #[serde(rename = "abstract")]
    pub is_abstract: String,
    pub datatype: String,
    pub lord: String,
    pub crdr: String,
    pub tlabel: String,
    pub doc: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Insertable)]
#[diesel(table_name = schema::fsds_num)]
#[serde(default)]
pub struct FsdsNum {
    pub adsh: String,
    pub tag: String,
    pub version: String,
    pub coreg: String,
    pub ddate: String,
    pub qtrs: String,
    pub uom: String,
    pub value: String,
    pub footnote: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Insertable)]
#[diesel(table_name = schema::fsds_pre)]
#[serde(default)]
pub struct FsdsPre {
    pub adsh: String,
    pub report: String,
    pub line: String,
    pub stmt: String,
    pub inpth: String,
    pub rfile: String,
    pub tag: String,
    pub version: String,
    pub plabel: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Insertable)]
#[diesel(table_name = schema::mfd_sub)]
#[serde(default)]
pub struct MfdSub {
    pub adsh: String,
    #[serde(deserialize_with = "int_or_zero")]
    pub cik: i64,
    pub name: String,
    pub countryba: String,
    pub stprba: String,
    pub cityba: String,
    pub zipba: String,
    pub bas1: String,
    pub bas2: String,
    pub baph: String,
    pub countryma: String,
    #[serde(alias = "strpma")]
    pub stprma: String,
    pub cityma: String,
    pub zipma: String,
    pub mas1: String,
    pub mas2: String,
    pub countryinc: String,
    pub stprinc: String,
    pub ein: String,
    pub former: String,
    pub changed: String,
    pub fye: String,
    pub pdate: String,
    pub effdate: String,
    pub form: String,
    pub filed: String,
    pub accepted: String,
    pub instance: String,
    pub nciks: String,
    pub aciks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Insertable)]
#[diesel(table_name = schema::mfd_tag)]
#[serde(default)]
pub struct MfdTag {
    pub tag: String,
    pub version: String,
    pub custom: String,
    #[serde(rename = "abstract")]
    pub is_abstract: String,
    pub datatype: String,
    pub lord: String,
    pub tlabel: String,
    pub doc: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Insertable)]
#[diesel(table_name = schema::mfd_lab)]
#[serde(default)]
pub struct MfdLab {
    pub adsh: String,
    pub tag: String,
    pub version: String,
    #[serde(rename = "std")]
    pub std_label: String,
    pub terse: String,
    #[serde(alias = "verbose")]
    pub verbose_val: String,
    pub total: String,
    pub negated: String,
    #[serde(rename = "negatedterse", alias = "negated_terse")]
    pub negated_terse: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Insertable)]
#[diesel(table_name = schema::mfd_cal)]
#[serde(default)]
pub struct MfdCal {
    pub adsh: String,
    pub grp: String,
    pub arc: String,
    pub negative: String,
    pub ptag: String,
    pub pversion: String,
    pub ctag: String,
    pub cversion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Insertable)]
#[diesel(table_name = schema::mfd_num)]
#[serde(default)]
pub struct MfdNum {
    pub adsh: String,
    pub tag: String,
    pub version: String,
    pub ddate: String,
    pub uom: String,
    pub series: String,
    pub class: String,
    pub measure: String,
    pub document: String,
    pub otherdims: String,
    pub iprx: String,
    pub value: String,
    pub footnote: String,
    pub footlen: String,
    pub dimn: String,
    pub dcml: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Insertable)]
#[diesel(table_name = schema::mfd_txt)]
#[serde(default)]
pub struct MfdTxt {
    pub adsh: String,
    pub tag: String,
    pub version: String,
    pub ddate: String,
    pub lang: String,
    pub series: String,
    pub class: String,
    pub measure: String,
    pub document: String,
    pub otherdims: String,
    pub iprx: String,
    pub dcml: String,
    pub escaped: String,
    pub srclen: String,
    pub txtlen: String,
    pub footnote: String,
    pub footlen: String,
    pub context: String,
    pub value: String,
}
