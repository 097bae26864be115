//! End-to-end pipeline tests over a temporary database, with all network
//! stages replaced by stored fixture HTML.

use std::sync::Arc;

use teseacquire::config::Settings;
use teseacquire::models::{DetailTarget, RecordFilter, RecordStage, UNKNOWN};
use teseacquire::progress::ProgressSender;
use teseacquire::repository::CrawlStore;
use teseacquire::services::Crawler;

const SEARCH_URL: &str = "https://bdtd.ibict.br/vufind/Search/Results?lookfor=jurimetria";

const LISTING_HTML: &str = r#"
    <ul class="pagination">
        <li><a href="?lookfor=jurimetria&amp;page=2">2</a></li>
    </ul>
    <div class="result">
        <div class="resultItemLine1">
            <a class="title getFull" href="/vufind/Record/UDF_1">Jurimetria nas cortes superiores</a>
        </div>
        <div class="resultItemLine2">
            por <a href="/vufind/Author/Home?author=Silva">Silva, Ana</a>
        </div>
    </div>
    <div class="result">
        <div class="resultItemLine1">
            <a class="title getFull" href="/vufind/Record/UNB_9">Estatística aplicada a decisões</a>
        </div>
        <a class="fulltext" href="https://repositorio.unb.br/handle/10482/9">Acesso</a>
    </div>
"#;

const BUSCADOR_DETAIL: &str = r#"
    <table class="table">
        <tr><th>Instituição de defesa:</th><td>Centro Universitário do Distrito Federal</td></tr>
        <tr><th>Sigla da instituição:</th><td>UDF</td></tr>
        <tr><th>Programa de Pós-Graduação:</th><td>Direito (UDF)</td></tr>
        <tr><th>Link de acesso:</th><td><a href="https://bdtd.udf.edu.br/handle/123/456">Acesso</a></td></tr>
    </table>
"#;

const REPOSITORY_DETAIL: &str = r#"
    <meta name="citation_pdf_url" content="https://bdtd.udf.edu.br/bitstreams/ab-12/download">
    <ol class="breadcrumb">
        <li class="breadcrumb-item">Início</li>
        <li class="breadcrumb-item">Programa de Pós-Graduação em Direito</li>
        <li class="breadcrumb-item">Jurimetria nas cortes superiores</li>
    </ol>
"#;

fn crawler() -> (tempfile::TempDir, Crawler) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(CrawlStore::new(&dir.path().join("state.db")).expect("store"));
    let crawler =
        Crawler::new(store, Settings::default(), ProgressSender::disabled()).expect("crawler");
    (dir, crawler)
}

fn seed_search_page(crawler: &Crawler) -> i64 {
    crawler
        .store()
        .upsert_search_page("bdtd", "jurimetria", "2020", 1, LISTING_HTML, SEARCH_URL)
        .expect("page stored")
}

#[test]
fn listing_extraction_walks_records_through_the_lifecycle() {
    let (_dir, crawler) = crawler();
    let page_id = seed_search_page(&crawler);

    let inserted = crawler.extract_listings(page_id).expect("listings");
    assert_eq!(inserted, 2);
    // Re-extraction is a no-op, not a duplication.
    assert_eq!(crawler.extract_listings(page_id).expect("again"), 0);

    let records = crawler.store().list_records(&RecordFilter::default()).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.stage() == RecordStage::Discovered));

    // The UnB card exposed a repository link in the listing itself, and its
    // host was registered enabled.
    let unb = records
        .iter()
        .find(|r| r.buscador_link.ends_with("UNB_9"))
        .unwrap();
    assert_eq!(
        unb.repository_link.as_deref(),
        Some("https://repositorio.unb.br/handle/10482/9")
    );
    assert!(crawler.store().domain_enabled("repositorio.unb.br").unwrap());
}

#[test]
fn buscador_parse_then_repository_parse_refines_metadata() {
    let (_dir, crawler) = crawler();
    let page_id = seed_search_page(&crawler);
    crawler.extract_listings(page_id).unwrap();
    let id = *crawler.store().record_ids().unwrap().last().unwrap();

    // Stage 1: buscador detail parsed with the aggregator's strategy.
    crawler
        .store()
        .set_detail_html(id, DetailTarget::Buscador, BUSCADOR_DETAIL)
        .unwrap();
    let first = crawler.parse_metadata(id).unwrap();
    assert_eq!(first.acronym, "UDF");
    assert_eq!(first.institution, "Centro Universitário do Distrito Federal");
    assert_eq!(first.program, "Direito");

    // The buscador's access link was promoted to the repository link.
    let record = crawler.store().get_record(id).unwrap().unwrap();
    assert_eq!(
        record.repository_link.as_deref(),
        Some("https://bdtd.udf.edu.br/handle/123/456")
    );
    assert_eq!(record.stage(), RecordStage::Parsed);

    // Stage 2: with repository HTML stored, parsing prefers it and the
    // UDF strategy resolves the real bitstream URL.
    crawler
        .store()
        .set_detail_html(id, DetailTarget::Repository, REPOSITORY_DETAIL)
        .unwrap();
    let second = crawler.parse_metadata(id).unwrap();
    assert_eq!(second.pdf_link, "https://bdtd.udf.edu.br/bitstreams/ab-12/download");
    assert_eq!(second.program, "Direito");
}

#[test]
fn parse_batch_skips_failures_and_disabled_hosts() {
    let (_dir, crawler) = crawler();
    let page_id = seed_search_page(&crawler);
    crawler.extract_listings(page_id).unwrap();
    let ids = crawler.store().record_ids().unwrap();
    let parsed_id = *ids.last().unwrap();

    crawler
        .store()
        .set_detail_html(parsed_id, DetailTarget::Buscador, BUSCADOR_DETAIL)
        .unwrap();
    crawler
        .store()
        .set_domain_enabled("repositorio.unb.br", false)
        .unwrap();

    // One record parses, the disabled host is skipped silently, and the
    // unknown id counts as a failure without aborting the batch.
    let mut all: Vec<i64> = ids.clone();
    all.push(9999);
    let (processed, failed) = crawler.parse_metadata_batch(&all);
    assert_eq!(processed, 1);
    assert_eq!(failed, 1);

    let record = crawler.store().get_record(parsed_id).unwrap().unwrap();
    assert_ne!(record.acronym, UNKNOWN);
}

#[test]
fn cleared_pages_keep_history_but_refuse_extraction() {
    let (_dir, crawler) = crawler();
    let page_id = seed_search_page(&crawler);

    assert!(crawler.store().clear_page_html(page_id).unwrap());
    assert_eq!(crawler.store().list_history().unwrap().len(), 1);
    assert!(crawler.extract_listings(page_id).is_err());
}
