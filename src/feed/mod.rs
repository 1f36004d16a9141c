//! Monthly XBRL RSS index feeds (`xbrlrss-YYYY-MM.xml`).
//!
//! Each `<item>` is one filing: RSS fields, an enclosure pointing at the
//! filing's ZIP, and an `edgar:xbrlFiling` block listing its files. Element
//! and attribute names are accepted with or without the `edgar:` prefix.

use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::error::FeedError;

/// `encoding="..."` inside an XML declaration.
static ENCODING_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"encoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#).unwrap());

/// Cache-relative path of a month's index feed.
pub fn index_file_path(year: i32, month: u32) -> String {
    format!("Archives/edgar/monthly/xbrlrss-{}-{:02}.xml", year, month)
}

pub fn index_url(base: &Url, year: i32, month: u32) -> Result<Url, url::ParseError> {
    base.join(&format!("/{}", index_file_path(year, month)))
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<FeedEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub guid: String,
    pub enclosure: Option<Enclosure>,
    pub description: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    #[serde(rename = "xbrlFiling", alias = "edgar:xbrlFiling")]
    pub filing: XbrlFiling,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Enclosure {
    #[serde(rename = "@url")]
    pub url: String,
    #[serde(rename = "@length")]
    pub length: String,
    #[serde(rename = "@type")]
    pub enclosure_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct XbrlFiling {
    #[serde(rename = "companyName", alias = "edgar:companyName")]
    pub company_name: String,
    #[serde(rename = "formType", alias = "edgar:formType")]
    pub form_type: String,
    #[serde(rename = "filingDate", alias = "edgar:filingDate")]
    pub filing_date: String,
    #[serde(rename = "cikNumber", alias = "edgar:cikNumber")]
    pub cik_number: String,
    #[serde(rename = "accessionNumber", alias = "edgar:accessionNumber")]
    pub accession_number: String,
    #[serde(rename = "fileNumber", alias = "edgar:fileNumber")]
    pub file_number: String,
    #[serde(rename = "acceptanceDatetime", alias = "edgar:acceptanceDatetime")]
    pub acceptance_datetime: String,
    #[serde(alias = "edgar:period")]
    pub period: String,
    #[serde(rename = "assistantDirector", alias = "edgar:assistantDirector")]
    pub assistant_director: String,
    #[serde(rename = "assignedSic", alias = "edgar:assignedSic")]
    pub assigned_sic: String,
    #[serde(rename = "fiscalYearEnd", alias = "edgar:fiscalYearEnd")]
    pub fiscal_year_end: String,
    #[serde(rename = "xbrlFiles", alias = "edgar:xbrlFiles")]
    pub files: XbrlFiles,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct XbrlFiles {
    #[serde(rename = "xbrlFile", alias = "edgar:xbrlFile")]
    pub files: Vec<FileRef>,
}

/// One file of a filing, as listed in the feed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileRef {
    #[serde(rename = "@sequence", alias = "@edgar:sequence")]
    pub sequence: String,
    #[serde(rename = "@file", alias = "@edgar:file")]
    pub file: String,
    #[serde(rename = "@type", alias = "@edgar:type")]
    pub file_type: String,
    #[serde(rename = "@size", alias = "@edgar:size")]
    pub size: String,
    #[serde(rename = "@description", alias = "@edgar:description")]
    pub description: String,
    #[serde(rename = "@inlineXBRL", alias = "@edgar:inlineXBRL")]
    pub inline_xbrl: String,
    #[serde(rename = "@url", alias = "@edgar:url")]
    pub url: String,
}

/// Integer field where an empty string means zero.
fn number<T: std::str::FromStr + Default>(field: &'static str, value: &str) -> Result<T, FeedError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(T::default());
    }
    value.parse().map_err(|_| FeedError::Field {
        field,
        value: value.to_string(),
    })
}

impl FileRef {
    pub fn sequence_number(&self) -> Result<i32, FeedError> {
        number("sequence", &self.sequence)
    }

    pub fn size_bytes(&self) -> Result<i64, FeedError> {
        number("size", &self.size)
    }

    pub fn is_inline(&self) -> Result<bool, FeedError> {
        match self.inline_xbrl.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "0" => Ok(false),
            "true" | "1" => Ok(true),
            other => Err(FeedError::Field {
                field: "inlineXBRL",
                value: other.to_string(),
            }),
        }
    }
}

impl Enclosure {
    pub fn length_bytes(&self) -> Result<i64, FeedError> {
        number("enclosure length", &self.length)
    }
}

impl XbrlFiling {
    pub fn cik(&self) -> Result<i64, FeedError> {
        number("cikNumber", &self.cik_number)
    }

    pub fn sic(&self) -> Result<i32, FeedError> {
        number("assignedSic", &self.assigned_sic)
    }

    pub fn fiscal_year_end_number(&self) -> Result<i32, FeedError> {
        number("fiscalYearEnd", &self.fiscal_year_end)
    }
}

impl FeedEntry {
    pub fn files(&self) -> &[FileRef] {
        &self.filing.files.files
    }
}

/// Decode raw feed bytes to text, honoring a BOM first and then the XML
/// declaration's `encoding` attribute. Defaults to UTF-8.
pub fn decode(bytes: &[u8]) -> Result<Cow<'_, str>, FeedError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared_encoding(bytes)?, bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or(FeedError::Decode(encoding.name()))
}

fn declared_encoding(bytes: &[u8]) -> Result<&'static Encoding, FeedError> {
    let head = &bytes[..bytes.len().min(200)];
    let head = String::from_utf8_lossy(head);
    let Some(decl_end) = head.find("?>").filter(|_| head.trim_start().starts_with("<?xml")) else {
        return Ok(UTF_8);
    };

    match ENCODING_ATTR.captures(&head[..decl_end]) {
        Some(caps) => {
            let label = &caps[1];
            Encoding::for_label(label.as_bytes())
                .ok_or_else(|| FeedError::UnknownEncoding(label.to_string()))
        }
        None => Ok(UTF_8),
    }
}

/// Parse a feed document into its items.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<FeedEntry>, FeedError> {
    let text = decode(bytes)?;
    let rss: Rss = quick_xml::de::from_str(&text)?;
    Ok(rss.channel.items)
}

pub fn read_feed(path: &Path) -> Result<Vec<FeedEntry>, FeedError> {
    let bytes = std::fs::read(path).map_err(|source| FeedError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_feed(&bytes)
}

/// Number of files listed across the given feeds.
pub fn total_file_count(feeds: &[Vec<FeedEntry>]) -> usize {
    feeds
        .iter()
        .flat_map(|entries| entries.iter())
        .map(|e| e.files().len())
        .sum()
}

pub fn total_enclosure_count(feeds: &[Vec<FeedEntry>]) -> usize {
    feeds
        .iter()
        .flat_map(|entries| entries.iter())
        .filter(|e| e.enclosure.as_ref().is_some_and(|enc| !enc.url.is_empty()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>All XBRL Data Submitted to the SEC for 2021-06</title>
    <link>https://www.sec.gov/Archives/edgar/monthly/xbrlrss-2021-06.xml</link>
    <atom:link href="https://www.sec.gov/Archives/edgar/monthly/xbrlrss-2021-06.xml" rel="self" type="application/rss+xml" />
    <description>This is a list all of the filings containing XBRL for 2021-06</description>
    <language>en-us</language>
    <pubDate>Wed, 30 Jun 2021 22:13:42 EDT</pubDate>
    <item>
      <title>APPLE INC (0000320193) (Filer)</title>
      <link>https://www.sec.gov/Archives/edgar/data/320193/000032019321000065/0000320193-21-000065-index.htm</link>
      <guid>https://www.sec.gov/Archives/edgar/data/320193/000032019321000065/0000320193-21-000065-xbrl.zip</guid>
      <enclosure url="https://www.sec.gov/Archives/edgar/data/320193/000032019321000065/0000320193-21-000065-xbrl.zip" length="5398418" type="application/zip" />
      <description>10-Q</description>
      <pubDate>Wed, 28 Jul 2021 18:04:46 EDT</pubDate>
      <edgar:xbrlFiling xmlns:edgar="https://www.sec.gov/Archives/edgar">
        <edgar:companyName>APPLE INC</edgar:companyName>
        <edgar:formType>10-Q</edgar:formType>
        <edgar:filingDate>07/28/2021</edgar:filingDate>
        <edgar:cikNumber>0000320193</edgar:cikNumber>
        <edgar:accessionNumber>0000320193-21-000065</edgar:accessionNumber>
        <edgar:fileNumber>001-36743</edgar:fileNumber>
        <edgar:acceptanceDatetime>20210728180446</edgar:acceptanceDatetime>
        <edgar:period>20210626</edgar:period>
        <edgar:assistantDirector>Office of Manufacturing</edgar:assistantDirector>
        <edgar:assignedSic>3571</edgar:assignedSic>
        <edgar:fiscalYearEnd>0925</edgar:fiscalYearEnd>
        <edgar:xbrlFiles>
          <edgar:xbrlFile edgar:sequence="1" edgar:file="aapl-20210626.htm" edgar:type="10-Q" edgar:size="1297489" edgar:description="10-Q" edgar:inlineXBRL="true" edgar:url="https://www.sec.gov/Archives/edgar/data/320193/000032019321000065/aapl-20210626.htm" />
          <edgar:xbrlFile edgar:sequence="2" edgar:file="aapl-20210626_cal.xml" edgar:type="EX-101.CAL" edgar:size="" edgar:description="XBRL CALCULATION FILE" edgar:url="https://www.sec.gov/Archives/edgar/data/320193/000032019321000065/aapl-20210626_cal.xml" />
        </edgar:xbrlFiles>
      </edgar:xbrlFiling>
    </item>
    <item>
      <title>EXAMPLE TRUST (0000000042) (Filer)</title>
      <description>485BPOS</description>
      <edgar:xbrlFiling xmlns:edgar="https://www.sec.gov/Archives/edgar">
        <edgar:companyName>EXAMPLE TRUST</edgar:companyName>
        <edgar:cikNumber>42</edgar:cikNumber>
      </edgar:xbrlFiling>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_feed() {
        let entries = parse_feed(SAMPLE.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);

        let apple = &entries[0];
        assert_eq!(apple.description, "10-Q");
        assert_eq!(apple.filing.company_name, "APPLE INC");
        assert_eq!(apple.filing.cik().unwrap(), 320193);
        assert_eq!(apple.filing.sic().unwrap(), 3571);
        assert_eq!(apple.filing.fiscal_year_end_number().unwrap(), 925);
        assert_eq!(apple.enclosure.as_ref().unwrap().length_bytes().unwrap(), 5398418);

        let files = apple.files();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].file, "aapl-20210626.htm");
        assert_eq!(files[0].sequence_number().unwrap(), 1);
        assert!(files[0].is_inline().unwrap());
        assert_eq!(files[1].size_bytes().unwrap(), 0);
        assert!(!files[1].is_inline().unwrap());

        let trust = &entries[1];
        assert!(trust.enclosure.is_none());
        assert!(trust.files().is_empty());
    }

    #[test]
    fn test_counts() {
        let feeds = vec![parse_feed(SAMPLE.as_bytes()).unwrap()];
        assert_eq!(total_file_count(&feeds), 2);
        assert_eq!(total_enclosure_count(&feeds), 1);
    }

    #[test]
    fn test_latin1_feed() {
        let mut doc = br#"<?xml version="1.0" encoding="ISO-8859-1"?><rss><channel><item><edgar:xbrlFiling><edgar:companyName>NESTL"#.to_vec();
        doc.push(0xC9);
        doc.extend_from_slice(b" SA</edgar:companyName></edgar:xbrlFiling></item></channel></rss>");

        let entries = parse_feed(&doc).unwrap();
        assert_eq!(entries[0].filing.company_name, "NESTL\u{c9} SA");
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let doc = b"<?xml version=\"1.0\"?><rss><channel>\xff</channel></rss>";
        assert!(matches!(parse_feed(doc), Err(FeedError::Decode(_))));
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(matches!(
            parse_feed(b"<rss><channel><item></channel>"),
            Err(FeedError::Xml(_))
        ));
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let file = FileRef {
            size: "12kb".to_string(),
            ..Default::default()
        };
        assert!(matches!(file.size_bytes(), Err(FeedError::Field { field: "size", .. })));
    }

    #[test]
    fn test_index_url() {
        let base = Url::parse("https://www.sec.gov").unwrap();
        assert_eq!(
            index_url(&base, 2021, 6).unwrap().as_str(),
            "https://www.sec.gov/Archives/edgar/monthly/xbrlrss-2021-06.xml"
        );
    }
}
