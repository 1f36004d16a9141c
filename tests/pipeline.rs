//! End-to-end pipeline tests against a mock archive.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use tempfile::TempDir;
use tokio::sync::mpsc;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use edgarsync::error::{BulkError, FetchError};
use edgarsync::feed;
use edgarsync::repository::bulk::{MfdLab, MfdTag};
use edgarsync::repository::DbContext;
use edgarsync::services::bulk::{self, BulkDataset, BulkLoader, Fsds, TableLoader};
use edgarsync::services::unzip::unzip_all;
use edgarsync::services::{indexer, schedule, tickers, Downloader, PipelineContext, Shutdown};

const FEED_PATH: &str = "/Archives/edgar/monthly/xbrlrss-2021-06.xml";
const FILING_DIR: &str = "/Archives/edgar/data/320193/000032019321000065";
const HTM_BODY: &str = "<html><body><h1>Form 10-Q</h1><p>Apple Inc.</p></body></html>";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, 15).unwrap()
}

/// Sender whose receiver is already gone; sends are dropped.
fn sink<T>() -> mpsc::Sender<T> {
    let (tx, _) = mpsc::channel(1);
    tx
}

async fn setup(server: &MockServer) -> (TempDir, PipelineContext) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("edgar.db");
    let db = DbContext::from_url(db_path.to_str().unwrap()).unwrap();
    db.migrate().await.unwrap();

    let ctx = PipelineContext::new(
        db,
        dir.path().join("cache"),
        dir.path().join("unpacked"),
        Url::parse(&server.uri()).unwrap(),
    )
    .with_rate_limit(Duration::ZERO)
    .with_retry_limit(1);
    (dir, ctx)
}

fn sample_feed(base: &str, missing_size: usize) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <item>
      <title>APPLE INC (0000320193) (Filer)</title>
      <link>{base}{dir}/0000320193-21-000065-index.htm</link>
      <guid>{base}{dir}/0000320193-21-000065-xbrl.zip</guid>
      <enclosure url="{base}{dir}/0000320193-21-000065-xbrl.zip" length="2048" type="application/zip" />
      <description>10-Q</description>
      <pubDate>Wed, 28 Jul 2021 18:04:46 EDT</pubDate>
      <edgar:xbrlFiling xmlns:edgar="https://www.sec.gov/Archives/edgar">
        <edgar:companyName>APPLE INC</edgar:companyName>
        <edgar:formType>10-Q</edgar:formType>
        <edgar:filingDate>07/28/2021</edgar:filingDate>
        <edgar:cikNumber>0000320193</edgar:cikNumber>
        <edgar:accessionNumber>0000320193-21-000065</edgar:accessionNumber>
        <edgar:assignedSic>3571</edgar:assignedSic>
        <edgar:fiscalYearEnd>0925</edgar:fiscalYearEnd>
        <edgar:xbrlFiles>
          <edgar:xbrlFile edgar:sequence="1" edgar:file="aapl-20210626.htm" edgar:type="10-Q" edgar:size="{htm_size}" edgar:description="10-Q" edgar:inlineXBRL="true" edgar:url="{base}{dir}/aapl-20210626.htm" />
          <edgar:xbrlFile edgar:sequence="2" edgar:file="aapl-20210626_cal.xml" edgar:type="EX-101.CAL" edgar:size="{missing_size}" edgar:description="XBRL CALCULATION FILE" edgar:url="{base}{dir}/aapl-20210626_cal.xml" />
        </edgar:xbrlFiles>
      </edgar:xbrlFiling>
    </item>
  </channel>
</rss>"#,
        base = base,
        dir = FILING_DIR,
        htm_size = HTM_BODY.len(),
        missing_size = missing_size,
    )
}

/// Place the June 2021 feed in the cache as if `download index` had run.
fn seed_feed(ctx: &PipelineContext, server: &MockServer) {
    let url = feed::index_url(&ctx.base_url, 2021, 6).unwrap();
    let path = ctx.cache_path(url.as_str()).unwrap();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, sample_feed(&server.uri(), 734)).unwrap();
}

#[tokio::test]
async fn test_index_download_is_idempotent() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;
    schedule::toggle(&ctx.db, 2021, 6, true, today()).await.unwrap();

    Mock::given(method("HEAD"))
        .and(path(FEED_PATH))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"v1\""))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(FEED_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"v1\"")
                .set_body_string(sample_feed(&server.uri(), 734)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let downloader = Downloader::new(&ctx).unwrap();
    let first = downloader.download_index(sink()).await.unwrap();
    assert_eq!(first.downloaded, 1);

    let second = downloader.download_index(sink()).await.unwrap();
    assert_eq!(second.downloaded, 0);
    assert_eq!(second.cached, 1);

    let url = format!("{}{}", server.uri(), FEED_PATH);
    let record = ctx.db.downloads().get(&url).await.unwrap().unwrap();
    assert_eq!(record.etag, "\"v1\"");
    assert!(ctx.cache_path(&url).unwrap().is_file());
}

#[tokio::test]
async fn test_changed_etag_refetches() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;
    schedule::toggle(&ctx.db, 2021, 6, true, today()).await.unwrap();
    let downloader = Downloader::new(&ctx).unwrap();

    for etag in ["\"v1\"", "\"v2\""] {
        server.reset().await;
        Mock::given(method("HEAD"))
            .and(path(FEED_PATH))
            .respond_with(ResponseTemplate::new(200).insert_header("ETag", etag))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(FEED_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("ETag", etag)
                    .set_body_string(sample_feed(&server.uri(), 734)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = downloader.download_index(sink()).await.unwrap();
        assert_eq!(result.downloaded, 1);
        server.verify().await;
    }

    let url = format!("{}{}", server.uri(), FEED_PATH);
    let record = ctx.db.downloads().get(&url).await.unwrap().unwrap();
    assert_eq!(record.etag, "\"v2\"");
}

#[tokio::test]
async fn test_missing_etag_fails_the_step() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;
    schedule::toggle(&ctx.db, 2021, 6, true, today()).await.unwrap();

    Mock::given(method("HEAD"))
        .and(path(FEED_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let downloader = Downloader::new(&ctx).unwrap();
    assert!(downloader.download_index(sink()).await.is_err());
}

#[tokio::test]
async fn test_files_download_then_index_is_idempotent() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;
    schedule::toggle(&ctx.db, 2021, 6, true, today()).await.unwrap();
    seed_feed(&ctx, &server);

    Mock::given(method("GET"))
        .and(path(format!("{}/aapl-20210626.htm", FILING_DIR)))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"htm\"")
                .set_body_string(HTM_BODY),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/aapl-20210626_cal.xml", FILING_DIR)))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let downloader = Downloader::new(&ctx).unwrap();
    let first = downloader.download_files(sink()).await.unwrap();
    assert_eq!(first.downloaded, 1);
    assert_eq!(first.skipped, 1);

    let missing_url = format!("{}{}/aapl-20210626_cal.xml", server.uri(), FILING_DIR);
    assert!(ctx.db.skipped().contains(&missing_url).await.unwrap());

    let second = downloader.download_files(sink()).await.unwrap();
    assert_eq!(second.downloaded, 0);
    assert_eq!(second.cached, 1);
    assert_eq!(second.skipped, 1);

    let indexed = indexer::index_files(&ctx, sink()).await.unwrap();
    assert_eq!(indexed.indexed, 1);
    assert_eq!(indexed.skipped, 1);
    assert_eq!(ctx.db.filings().count().await.unwrap(), 1);

    indexer::index_files(&ctx, sink()).await.unwrap();
    assert_eq!(ctx.db.filings().count().await.unwrap(), 1);

    let htm_url = format!("{}{}/aapl-20210626.htm", server.uri(), FILING_DIR);
    let rows = ctx.db.filings().get_by_url(&htm_url).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].body, "Form 10-Q\nApple Inc.");
    assert_eq!(rows[0].cik_number, 320193);
    assert!(!rows[0].path.is_empty());

    // Indexed with a local path, so the next files run leaves it alone.
    let third = downloader.download_files(sink()).await.unwrap();
    assert_eq!(third.cached + third.downloaded, 0);
}

#[tokio::test]
async fn test_index_records_missing_local_file() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;
    schedule::toggle(&ctx.db, 2021, 6, true, today()).await.unwrap();
    seed_feed(&ctx, &server);

    let result = indexer::index_files(&ctx, sink()).await.unwrap();
    assert_eq!(result.missing, 2);
    assert_eq!(result.indexed, 0);

    let htm_url = format!("{}{}/aapl-20210626.htm", server.uri(), FILING_DIR);
    let rows = ctx.db.filings().get_by_url(&htm_url).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].body.is_empty());
    assert!(rows[0].path.is_empty());
}

#[tokio::test]
async fn test_index_without_feed_is_an_error() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;
    schedule::toggle(&ctx.db, 2021, 6, true, today()).await.unwrap();

    let err = indexer::index_files(&ctx, sink()).await.unwrap_err();
    assert!(err.to_string().contains("edgar download index"));
}

#[tokio::test]
async fn test_only_failures_is_unhealthy() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;
    schedule::toggle(&ctx.db, 2021, 6, true, today()).await.unwrap();
    seed_feed(&ctx, &server);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let downloader = Downloader::new(&ctx).unwrap();
    let result = downloader.download_files(sink()).await.unwrap();
    assert_eq!(result.skipped, 2);

    let stats = ctx.db.events().event_stats().await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].files_broken, 2);
    assert_eq!(stats[0].files_downloaded, 0);
    assert_eq!(stats[0].health(), 0);

    let counts = ctx.db.events().download_counts().await.unwrap();
    assert_eq!(counts.successful, 0);
    assert_eq!(counts.failed, 2);
}

#[tokio::test]
async fn test_triggered_shutdown_stops_before_any_request() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;
    let shutdown = Shutdown::new();
    let ctx = ctx.with_shutdown(shutdown.clone());
    schedule::toggle(&ctx.db, 2021, 0, true, today()).await.unwrap();

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"v1\""))
        .expect(0)
        .mount(&server)
        .await;

    shutdown.trigger();
    let downloader = Downloader::new(&ctx).unwrap();
    let result = downloader.download_index(sink()).await.unwrap();
    assert_eq!(result, Default::default());
}

#[tokio::test]
async fn test_enclosure_zip_index_and_unzip() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;
    schedule::toggle(&ctx.db, 2021, 6, true, today()).await.unwrap();
    seed_feed(&ctx, &server);

    let zip_url = format!(
        "{}{}/0000320193-21-000065-xbrl.zip",
        server.uri(),
        FILING_DIR
    );
    write_zip(
        &ctx.cache_path(&zip_url).unwrap(),
        &[
            ("aapl-20210626.htm", HTM_BODY),
            ("aapl-20210626_cal.xml", "<xbrl/>"),
            ("Financial_Report.xlsx", "PK"),
        ],
    );

    let first = indexer::index_zip_contents(&ctx, sink()).await.unwrap();
    assert_eq!(first.zip_entries, 3);
    let second = indexer::index_zip_contents(&ctx, sink()).await.unwrap();
    assert_eq!(second.zip_entries, 0);
    assert_eq!(ctx.db.filings().count_zip_files().await.unwrap(), 3);

    let unzipped = unzip_all(&ctx).await.unwrap();
    assert_eq!(unzipped.archives, 1);
    assert_eq!(unzipped.written, 3);
    let htm_url = format!("{}{}/aapl-20210626.htm", server.uri(), FILING_DIR);
    assert!(ctx.unpacked_path(&htm_url).unwrap().is_file());

    // Nothing in the cache, so both files resolve from the unpacked mirror.
    let indexed = indexer::index_files(&ctx, sink()).await.unwrap();
    assert_eq!(indexed.indexed, 2);
    assert_eq!(indexed.missing, 0);
}

#[tokio::test]
async fn test_missing_enclosure_zip_is_an_error() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;
    schedule::toggle(&ctx.db, 2021, 6, true, today()).await.unwrap();
    seed_feed(&ctx, &server);

    let err = indexer::index_zip_contents(&ctx, sink()).await.unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (name, contents) in entries {
        zip.start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

#[tokio::test]
async fn test_bulk_quarter_is_immutable() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;

    // num.txt comes first so the loader has to order tag.txt ahead of it.
    let zip_path = ctx
        .cache_dir
        .join("files/dera/data/financial-statement-data-sets/2021q1.zip");
    write_zip(
        &zip_path,
        &[
            (
                "num.txt",
                "adsh\ttag\tversion\tddate\tqtrs\tuom\tvalue\n\
                 0000320193-21-000010\tRevenues\tus-gaap/2020\t20201231\t1\tUSD\t111439000000\n\
                 0000320193-21-000010\tUnknownTag\tus-gaap/2020\t20201231\t1\tUSD\t1\n",
            ),
            (
                "sub.txt",
                "adsh\tcik\tname\tsic\tform\tperiod\tfy\tfp\tfiled\n\
                 0000320193-21-000010\t320193\tAPPLE INC\t3571\t10-Q\t20201231\t2021\tQ1\t20210128\n",
            ),
            (
                "tag.txt",
                "tag\tversion\tcustom\tabstract\tdatatype\ttlabel\n\
                 Revenues\tus-gaap/2020\t0\t0\tmonetary\tRevenues\n",
            ),
            (
                "pre.txt",
                "adsh\treport\tline\tstmt\ttag\tversion\tplabel\n\
                 0000320193-21-000010\t4\t2\tIS\tRevenues\tus-gaap/2020\tTotal net sales\n",
            ),
            ("readme.htm", "<html></html>"),
        ],
    );

    let first = bulk::index_dataset(&ctx, &Fsds).await.unwrap();
    assert_eq!(first.archives, 1);
    assert_eq!(first.rows, 4);
    let counts = bulk::table_counts(&ctx.db.bulk(), &Fsds).await.unwrap();

    let second = bulk::index_dataset(&ctx, &Fsds).await.unwrap();
    assert_eq!(second.archives, 1);
    assert_eq!(second.rows, 0);
    assert_eq!(bulk::table_counts(&ctx.db.bulk(), &Fsds).await.unwrap(), counts);

    let lookup = |name: &str| {
        counts
            .iter()
            .find(|(table, _)| *table == name)
            .map(|(_, n)| *n)
    };
    assert_eq!(lookup("fsds_sub"), Some(1));
    assert_eq!(lookup("fsds_tag"), Some(1));
    assert_eq!(lookup("fsds_num"), Some(1));
    assert_eq!(lookup("fsds_pre"), Some(1));
}

#[tokio::test]
async fn test_bulk_unknown_entry_fails() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;

    let zip_path = ctx
        .cache_dir
        .join("files/dera/data/financial-statement-data-sets/2021q2.zip");
    write_zip(&zip_path, &[("cal.txt", "adsh\n")]);

    let err = bulk::index_dataset(&ctx, &Fsds).await.unwrap_err();
    assert!(err.to_string().contains("could_not_identify_file_type_func"));
}

#[tokio::test]
async fn test_bulk_download_only_fetches_complete_quarters() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;

    // Q1 2024 is complete; Q3 2024 is still running; 2008 predates the product.
    for (year, month) in [(2024, 2), (2024, 7), (2008, 6)] {
        ctx.db
            .worklist()
            .set_months(year, &[month], true)
            .await
            .unwrap();
    }

    let body = vec![b'z'; 64];
    let data_path = "/files/dera/data/financial-statement-data-sets/2024q1.zip";
    Mock::given(method("HEAD"))
        .and(path(data_path))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Length", "64"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(data_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(1)
        .mount(&server)
        .await;

    let downloader = Downloader::new(&ctx).unwrap();
    let first = bulk::download_dataset(&ctx, &downloader, &Fsds, today(), sink())
        .await
        .unwrap();
    assert_eq!(first.downloaded, 1);

    let second = bulk::download_dataset(&ctx, &downloader, &Fsds, today(), sink())
        .await
        .unwrap();
    assert_eq!(second.cached, 1);
    assert_eq!(second.downloaded, 0);

    let requests = server.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .all(|r| r.url.path() == data_path));
}

#[tokio::test]
async fn test_bulk_download_without_size_is_a_fetch_error() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;
    let ctx = ctx.with_retry_limit(2);
    ctx.db.worklist().set_months(2024, &[2], true).await.unwrap();

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let downloader = Downloader::new(&ctx).unwrap();
    let err = bulk::download_dataset(&ctx, &downloader, &Fsds, today(), sink())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BulkError::Fetch(FetchError::MissingContentLength { attempts: 2, .. })
    ));
}

#[tokio::test]
async fn test_truncated_cache_file_is_refetched() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;
    schedule::toggle(&ctx.db, 2021, 6, true, today()).await.unwrap();

    Mock::given(method("HEAD"))
        .and(path(FEED_PATH))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"v1\""))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(FEED_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"v1\"")
                .set_body_string(sample_feed(&server.uri(), 734)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let downloader = Downloader::new(&ctx).unwrap();
    assert_eq!(downloader.download_index(sink()).await.unwrap().downloaded, 1);

    let url = format!("{}{}", server.uri(), FEED_PATH);
    let cached = ctx.cache_path(&url).unwrap();
    std::fs::write(&cached, "<rss><chan").unwrap();

    let second = downloader.download_index(sink()).await.unwrap();
    assert_eq!(second.downloaded, 1);
    assert_eq!(second.cached, 0);
    assert_eq!(
        std::fs::read_to_string(&cached).unwrap(),
        sample_feed(&server.uri(), 734)
    );
    assert_eq!(feed::read_feed(&cached).unwrap().len(), 1);
}

#[tokio::test]
async fn test_etag_head_retries_until_present() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;
    let ctx = ctx.with_retry_limit(3);

    Mock::given(method("HEAD"))
        .and(path(FEED_PATH))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path(FEED_PATH))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"v9\""))
        .expect(1)
        .mount(&server)
        .await;

    let downloader = Downloader::new(&ctx).unwrap();
    let url = format!("{}{}", server.uri(), FEED_PATH);
    assert_eq!(downloader.head_etag(&url).await.unwrap(), "\"v9\"");
}

#[tokio::test]
async fn test_get_retries_server_errors() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;
    let ctx = ctx.with_retry_limit(3);
    schedule::toggle(&ctx.db, 2021, 6, true, today()).await.unwrap();

    Mock::given(method("HEAD"))
        .and(path(FEED_PATH))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"v1\""))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(FEED_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(FEED_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"v1\"")
                .set_body_string(sample_feed(&server.uri(), 734)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let downloader = Downloader::new(&ctx).unwrap();
    let result = downloader.download_index(sink()).await.unwrap();
    assert_eq!(result.downloaded, 1);

    let url = format!("{}{}", server.uri(), FEED_PATH);
    let record = ctx.db.downloads().get(&url).await.unwrap().unwrap();
    assert_eq!(record.etag, "\"v1\"");
}

#[tokio::test]
async fn test_exhausted_get_retries_fail_the_step() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;
    let ctx = ctx.with_retry_limit(2);
    schedule::toggle(&ctx.db, 2021, 6, true, today()).await.unwrap();

    Mock::given(method("HEAD"))
        .and(path(FEED_PATH))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"v1\""))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(FEED_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let downloader = Downloader::new(&ctx).unwrap();
    let err = downloader.download_index(sink()).await.unwrap_err();
    assert!(err.to_string().contains("503"));

    let url = format!("{}{}", server.uri(), FEED_PATH);
    assert!(ctx.db.downloads().get(&url).await.unwrap().is_none());
    assert!(!ctx.cache_path(&url).unwrap().exists());
}

/// A product the driver knows nothing about, assembled from existing rows.
struct LabelSet;

static LABEL_TAGS: TableLoader<MfdTag> = TableLoader::new();
static LABELS: TableLoader<MfdLab> = TableLoader::new();
static LABEL_LOADERS: [&dyn BulkLoader; 2] = [&LABEL_TAGS, &LABELS];

impl BulkDataset for LabelSet {
    fn data_type(&self) -> &'static str {
        "labels"
    }

    fn data_dir_path(&self) -> &'static str {
        "files/labels/"
    }

    fn data_file_url(&self, base: &Url, year_quarter: &str) -> Result<Url, url::ParseError> {
        base.join(&format!("/files/labels/{}.zip", year_quarter))
    }

    fn loaders(&self) -> &'static [&'static dyn BulkLoader] {
        &LABEL_LOADERS
    }

    fn loader_for(&self, file_name: &str) -> Option<&'static dyn BulkLoader> {
        match file_name {
            "tags.tsv" => Some(&LABEL_TAGS),
            "labels.tsv" => Some(&LABELS),
            _ => None,
        }
    }
}

#[tokio::test]
async fn test_new_bulk_product_loads_through_driver() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;

    write_zip(
        &ctx.cache_dir.join("files/labels/2021q1.zip"),
        &[
            (
                "labels.tsv",
                "adsh\ttag\tversion\tstd\tterse\n\
                 0000320193-21-000010\tRevenues\tus-gaap/2020\tRevenues\tRev\n",
            ),
            (
                "tags.tsv",
                "tag\tversion\tcustom\tabstract\tdatatype\ttlabel\n\
                 Revenues\tus-gaap/2020\t0\t0\tmonetary\tRevenues\n",
            ),
        ],
    );

    let result = bulk::index_dataset(&ctx, &LabelSet).await.unwrap();
    assert_eq!(result.archives, 1);
    assert_eq!(result.rows, 2);
    assert_eq!(
        bulk::table_counts(&ctx.db.bulk(), &LabelSet).await.unwrap(),
        vec![("mfd_tag", 1), ("mfd_lab", 1)]
    );
}


const TICKERS_JSON: &str = r#"{
    "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
    "1": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"}
}"#;

const EXCHANGE_JSON: &str = r#"{
    "fields": ["cik", "name", "ticker", "exchange"],
    "data": [
        [320193, "Apple Inc.", "AAPL", "Nasdaq"],
        [1067983, "BERKSHIRE HATHAWAY INC", "BRK-B", null]
    ]
}"#;

async fn mount_ticker_file(server: &MockServer, file: &str, body: &str) {
    Mock::given(method("HEAD"))
        .and(path(file))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"t1\""))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(file))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", "\"t1\"")
                .set_body_string(body),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_ticker_files_download_then_load() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;
    mount_ticker_file(&server, "/files/company_tickers.json", TICKERS_JSON).await;
    mount_ticker_file(&server, "/files/company_tickers_exchange.json", EXCHANGE_JSON).await;

    let downloader = Downloader::new(&ctx).unwrap();
    let first = downloader.download_tickers(sink()).await.unwrap();
    assert_eq!(first.downloaded, 2);
    let second = downloader.download_tickers(sink()).await.unwrap();
    assert_eq!(second.cached, 2);

    let result = tickers::update_all(&ctx).await.unwrap();
    assert_eq!(result.ciks, 3);
    // Two new listings from the first file, then Apple's exchange and Berkshire.
    assert_eq!(result.listings, 4);

    let listings = ctx.db.tickers().all().await.unwrap();
    assert_eq!(listings.len(), 3);
    assert_eq!(listings[0].ticker, "AAPL");
    assert_eq!(listings[0].exchange, "Nasdaq");
    assert_eq!(listings[1].ticker, "MSFT");
    assert_eq!(listings[1].exchange, "");
    assert_eq!(listings[2].ticker, "BRK-B");
    assert_eq!(ctx.db.tickers().count_ciks().await.unwrap(), 3);

    let stats = ctx.db.events().event_stats().await.unwrap();
    assert_eq!(stats[0].files_indexed, 2);

    let again = tickers::update_all(&ctx).await.unwrap();
    assert_eq!(again, tickers::TickerResult::default());
}

#[tokio::test]
async fn test_tickers_without_download_is_an_error() {
    let server = MockServer::start().await;
    let (_dir, ctx) = setup(&server).await;

    let err = tickers::update_all(&ctx).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("company_tickers.json"));
    assert!(message.contains("edgar download index"));
    assert_eq!(ctx.db.tickers().count_ciks().await.unwrap(), 0);
}
