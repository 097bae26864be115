//! Orchestrator driving the record lifecycle end to end.
//!
//! Every batch iterates its id list strictly sequentially: per-host
//! politeness and the store's single-writer discipline both depend on it.
//! A per-item failure is logged and skipped, never propagated to abort
//! sibling work.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{CrawlError, Result};
use crate::models::{DetailTarget, UNKNOWN};
use crate::parsers::{ParserRegistry, ThesisMetadata};
use crate::progress::ProgressSender;
use crate::repository::CrawlStore;
use crate::scrapers::{pagination, Fetcher};

use super::listing;

pub struct Crawler {
    store: Arc<CrawlStore>,
    fetcher: Fetcher,
    registry: ParserRegistry,
    settings: Settings,
    progress: ProgressSender,
}

impl Crawler {
    pub fn new(store: Arc<CrawlStore>, settings: Settings, progress: ProgressSender) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(&settings)?,
            store,
            registry: ParserRegistry::new(),
            settings,
            progress,
        })
    }

    fn delay(&self) -> Duration {
        Duration::from_millis(self.settings.request_delay_ms)
    }

    /// Begin a new crawl: fetch page 1 of the query and persist it.
    pub async fn search(&self, term: &str, year: &str) -> Result<i64> {
        let term = term.trim();
        if term.is_empty() {
            return Err(CrawlError::InvalidInput("search term is empty".into()));
        }

        let url = self.settings.search_url(term, year, 1);
        let progress = self.progress.clone();
        let cb = move |msg: &str| progress.status(msg);
        let html = self
            .fetcher
            .fetch(&url, Some(&cb))
            .await
            .ok_or_else(|| CrawlError::FetchFailed {
                url: url.clone(),
                reason: "both fetch paths failed".into(),
            })?;

        let page_id = self.store.upsert_search_page(
            &self.settings.engine,
            term,
            year.trim(),
            1,
            &html,
            &url,
        )?;
        self.store
            .log_event(&format!("Search stored: '{term}' ({year}) page 1, id {page_id}"));
        self.progress.status(format!("Page 1 stored (id {page_id})"));
        Ok(page_id)
    }

    /// Discover and fetch pages 2..max of a stored page's result set.
    pub async fn expand_pagination(&self, page_id: i64) -> Result<usize> {
        let page = self
            .store
            .get_search_page(page_id)?
            .ok_or(CrawlError::PageNotFound(page_id))?;

        let mut links = pagination::discover(&page.html, &page.source_url);
        if links.is_empty() {
            // Structural discovery came up empty; fall back to the
            // permissive whole-document scan before giving up.
            if let Some(max) = pagination::max_page_in_text(&page.html) {
                links = (2..=max)
                    .map(|number| pagination::PageLink {
                        number,
                        url: self.settings.search_url(&page.term, &page.year, number),
                    })
                    .collect();
            }
        }
        if links.is_empty() {
            return Err(CrawlError::NoPaginationFound);
        }

        self.progress
            .status(format!("Pagination: {} more page(s) to fetch", links.len()));
        let mut stored = 0;
        for link in links {
            tokio::time::sleep(self.delay()).await;
            let progress = self.progress.clone();
            let cb = move |msg: &str| progress.status(msg);
            match self.fetcher.fetch(&link.url, Some(&cb)).await {
                Some(html) => {
                    self.store.upsert_search_page(
                        &page.engine,
                        &page.term,
                        &page.year,
                        link.number,
                        &html,
                        &link.url,
                    )?;
                    stored += 1;
                }
                None => {
                    warn!("page {} of '{}' failed to fetch", link.number, page.term);
                    self.progress
                        .item_failed(page_id, format!("page {} fetch failed", link.number));
                }
            }
        }
        self.store.log_event(&format!(
            "Pagination expanded for page {page_id}: {stored} page(s) stored"
        ));
        Ok(stored)
    }

    pub async fn expand_pagination_batch(&self, page_ids: &[i64]) -> (usize, usize) {
        let mut processed = 0;
        let mut failed = 0;
        for &id in page_ids {
            match self.expand_pagination(id).await {
                Ok(_) => processed += 1,
                // Single-page result sets have no pagination widget; that
                // is a finished page, not a failure.
                Err(CrawlError::NoPaginationFound) => {
                    processed += 1;
                    self.progress
                        .status(format!("Page {id}: single-page result set"));
                }
                Err(e) => {
                    failed += 1;
                    self.store.log_event(&format!("Pagination failed for page {id}: {e}"));
                    self.progress.item_failed(id, e.to_string());
                }
            }
        }
        self.progress.completed("expand_pagination", processed, failed);
        (processed, failed)
    }

    /// Extract one record per result card of a stored search page.
    pub fn extract_listings(&self, page_id: i64) -> Result<usize> {
        let page = self
            .store
            .get_search_page(page_id)?
            .ok_or(CrawlError::PageNotFound(page_id))?;
        if !page.has_content() {
            return Err(CrawlError::NoResultsFound(page_id));
        }

        let records =
            listing::extract_cards(&page.html, &page.source_url, page.id, &page.term, &page.year);
        if records.is_empty() {
            return Err(CrawlError::NoResultsFound(page_id));
        }

        // Register repository hosts on first sighting, enabled by default.
        for record in &records {
            if let Some(link) = &record.repository_link {
                if let Some(host) = url::Url::parse(link)
                    .ok()
                    .and_then(|u| u.host_str().map(str::to_lowercase))
                {
                    self.store.observe_domain(&host)?;
                }
            }
        }

        let inserted = self.store.insert_records(&records)?;
        self.store.log_event(&format!(
            "Listings extracted from page {page_id}: {inserted} new record(s)"
        ));
        self.progress
            .status(format!("Page {page_id}: {inserted} new record(s)"));
        Ok(inserted)
    }

    pub fn extract_listings_batch(&self, page_ids: &[i64]) -> (usize, usize) {
        let mut processed = 0;
        let mut failed = 0;
        for &id in page_ids {
            match self.extract_listings(id) {
                Ok(_) => processed += 1,
                Err(e) => {
                    failed += 1;
                    self.store.log_event(&format!("Listing extraction failed for page {id}: {e}"));
                    self.progress.item_failed(id, e.to_string());
                }
            }
        }
        self.progress.completed("extract_listings", processed, failed);
        (processed, failed)
    }

    /// Fetch one of a record's detail pages and store the HTML.
    ///
    /// Idempotent: a no-op when content is already stored, unless `force`.
    pub async fn fetch_detail(
        &self,
        record_id: i64,
        target: DetailTarget,
        force: bool,
    ) -> Result<bool> {
        let record = self
            .store
            .get_record(record_id)?
            .ok_or(CrawlError::RecordNotFound(record_id))?;

        if record.has_html(target) && !force {
            info!("record {record_id}: {} HTML already stored, skipping", target.as_str());
            self.progress
                .status(format!("Record {record_id}: {} already stored", target.as_str()));
            return Ok(false);
        }

        let url = match target {
            DetailTarget::Buscador => record.buscador_link.clone(),
            DetailTarget::Repository => record.repository_link.clone().ok_or_else(|| {
                CrawlError::InvalidInput(format!("record {record_id} has no repository link"))
            })?,
        };
        if url.trim().is_empty() {
            return Err(CrawlError::InvalidInput(format!(
                "record {record_id} has an empty {} link",
                target.as_str()
            )));
        }

        let progress = self.progress.clone();
        let cb = move |msg: &str| progress.status(msg);
        let html = self
            .fetcher
            .fetch(&url, Some(&cb))
            .await
            .ok_or(CrawlError::FetchFailed {
                url: url.clone(),
                reason: "both fetch paths failed".into(),
            })?;

        self.store.set_detail_html(record_id, target, &html)?;
        if target == DetailTarget::Repository {
            if let Some(host) = record.repository_host() {
                self.store.observe_domain(&host)?;
            }
        }
        self.store.log_event(&format!(
            "Detail stored for record {record_id} ({})",
            target.as_str()
        ));
        Ok(true)
    }

    /// Sequential batch detail fetch, gated by the domain filter for
    /// repository targets.
    pub async fn fetch_detail_batch(
        &self,
        record_ids: &[i64],
        target: DetailTarget,
        force: bool,
    ) -> (usize, usize) {
        let mut processed = 0;
        let mut failed = 0;
        for &id in record_ids {
            if target == DetailTarget::Repository {
                match self.repository_gate(id) {
                    Ok(true) => {}
                    Ok(false) => {
                        self.progress
                            .status(format!("Record {id}: host disabled, skipping"));
                        continue;
                    }
                    Err(e) => {
                        failed += 1;
                        self.progress.item_failed(id, e.to_string());
                        continue;
                    }
                }
            }
            tokio::time::sleep(self.delay()).await;
            match self.fetch_detail(id, target, force).await {
                Ok(_) => processed += 1,
                Err(e) => {
                    failed += 1;
                    self.store
                        .log_event(&format!("Detail fetch failed for record {id}: {e}"));
                    self.progress.item_failed(id, e.to_string());
                }
            }
        }
        self.progress.completed("fetch_detail", processed, failed);
        (processed, failed)
    }

    /// Whether the record's repository host is currently enabled.
    fn repository_gate(&self, record_id: i64) -> Result<bool> {
        let record = self
            .store
            .get_record(record_id)?
            .ok_or(CrawlError::RecordNotFound(record_id))?;
        match record.repository_host() {
            Some(host) => self.store.domain_enabled(&host),
            None => Ok(true),
        }
    }

    /// Run metadata extraction over a record's best stored source.
    ///
    /// Repository HTML/link is preferred over buscador when both exist:
    /// repository content is the richer, authoritative source.
    pub fn parse_metadata(&self, record_id: i64) -> Result<ThesisMetadata> {
        let record = self
            .store
            .get_record(record_id)?
            .ok_or(CrawlError::RecordNotFound(record_id))?;

        let repository_source = record
            .repository_html
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .map(|html| (html, record.repository_link.clone().unwrap_or_default()));
        let (html, url) = match repository_source {
            Some(source) => source,
            None => match record.buscador_html.as_deref().filter(|h| !h.trim().is_empty()) {
                Some(html) => (html, record.buscador_link.clone()),
                None => return Err(CrawlError::NothingToParse(record_id)),
            },
        };

        let parser = self.registry.get(&url, Some(html));
        info!("record {record_id}: dispatching to '{}' strategy", parser.name());
        let progress = self.progress.clone();
        let cb = move |msg: &str| progress.status(msg);
        let data = parser.extract(html, &url, Some(&cb));

        self.store.update_metadata(
            record_id,
            &data.acronym,
            &data.institution,
            &data.program,
            &data.pdf_link,
        )?;

        // Parsing buscador pages surfaces the repository link ("Link de
        // acesso"); promote it so the repository fetch can follow.
        if record.repository_link.is_none()
            && parser.name() == "bdtd"
            && data.pdf_link != UNKNOWN
        {
            self.store.set_repository_link(record_id, &data.pdf_link)?;
            if let Some(host) = url::Url::parse(&data.pdf_link)
                .ok()
                .and_then(|u| u.host_str().map(str::to_lowercase))
            {
                self.store.observe_domain(&host)?;
            }
        }

        let missing = data.unresolved();
        if missing > 0 {
            self.store.log_event(&format!(
                "Partial extraction for record {record_id}: {missing} field(s) unresolved"
            ));
        } else {
            self.store
                .log_event(&format!("Record {record_id} parsed ({})", parser.name()));
        }
        Ok(data)
    }

    /// Sequential batch metadata extraction, gated by the domain filter.
    pub fn parse_metadata_batch(&self, record_ids: &[i64]) -> (usize, usize) {
        let mut processed = 0;
        let mut failed = 0;
        for &id in record_ids {
            match self.repository_gate(id) {
                Ok(true) => {}
                Ok(false) => {
                    self.progress
                        .status(format!("Record {id}: host disabled, skipping"));
                    continue;
                }
                Err(e) => {
                    failed += 1;
                    self.progress.item_failed(id, e.to_string());
                    continue;
                }
            }
            match self.parse_metadata(id) {
                Ok(_) => processed += 1,
                Err(e) => {
                    failed += 1;
                    self.store
                        .log_event(&format!("Metadata extraction failed for record {id}: {e}"));
                    self.progress.item_failed(id, e.to_string());
                }
            }
        }
        self.progress.completed("parse_metadata", processed, failed);
        (processed, failed)
    }

    pub fn store(&self) -> &CrawlStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewRecord;
    use crate::progress::ProgressSender;

    fn test_crawler() -> (tempfile::TempDir, Crawler) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Arc::new(CrawlStore::new(&dir.path().join("state.db")).expect("store"));
        let crawler = Crawler::new(store, Settings::default(), ProgressSender::disabled())
            .expect("crawler");
        (dir, crawler)
    }

    fn seed_record(crawler: &Crawler) -> i64 {
        let page = crawler
            .store()
            .upsert_search_page("bdtd", "jurimetria", "2020", 1, "<html/>", "u")
            .unwrap();
        crawler
            .store()
            .insert_records(&[NewRecord {
                title: "Jurimetria".into(),
                author: "Silva, Ana".into(),
                buscador_link: "https://bdtd.ibict.br/vufind/Record/UDF_1".into(),
                repository_link: None,
                parent_page_id: page,
                term: "jurimetria".into(),
                year: "2020".into(),
            }])
            .unwrap();
        crawler.store().record_ids().unwrap()[0]
    }

    const UDF_REPO_HTML: &str = r#"
        <meta name="citation_pdf_url" content="/bitstreams/ab12/download">
        <ol class="breadcrumb">
            <li class="breadcrumb-item">Início</li>
            <li class="breadcrumb-item">Programa de Pós-Graduação em Direito</li>
            <li class="breadcrumb-item">Jurimetria nas cortes superiores</li>
        </ol>
    "#;

    const BUSCADOR_HTML: &str = r#"
        <table>
            <tr><th>Instituição de defesa:</th><td>Centro Universitário do Distrito Federal</td></tr>
            <tr><th>Sigla da instituição:</th><td>UDF</td></tr>
            <tr><th>Programa de Pós-Graduação:</th><td>Direito (UDF)</td></tr>
            <tr><th>Link de acesso:</th><td><a href="https://bdtd.udf.edu.br/handle/123">Acesso</a></td></tr>
        </table>
    "#;

    #[test]
    fn repository_source_is_preferred_over_buscador() {
        let (_dir, crawler) = test_crawler();
        let id = seed_record(&crawler);
        crawler
            .store()
            .set_detail_html(id, DetailTarget::Buscador, BUSCADOR_HTML)
            .unwrap();
        crawler
            .store()
            .set_repository_link(id, "https://bdtd.udf.edu.br/handle/123")
            .unwrap();
        crawler
            .store()
            .set_detail_html(id, DetailTarget::Repository, UDF_REPO_HTML)
            .unwrap();

        let data = crawler.parse_metadata(id).unwrap();
        // The UDF strategy (repository) resolves a bitstream download URL;
        // the buscador strategy would have produced the handle link.
        assert_eq!(data.acronym, "UDF");
        assert_eq!(data.institution, "Centro Universitário do Distrito Federal");
        assert_eq!(data.program, "Direito");
        assert_eq!(data.pdf_link, "https://bdtd.udf.edu.br/bitstreams/ab12/download");
    }

    #[test]
    fn buscador_parse_promotes_repository_link() {
        let (_dir, crawler) = test_crawler();
        let id = seed_record(&crawler);
        crawler
            .store()
            .set_detail_html(id, DetailTarget::Buscador, BUSCADOR_HTML)
            .unwrap();

        crawler.parse_metadata(id).unwrap();
        let record = crawler.store().get_record(id).unwrap().unwrap();
        assert_eq!(
            record.repository_link.as_deref(),
            Some("https://bdtd.udf.edu.br/handle/123")
        );
        // The host was observed and defaults to enabled.
        assert!(crawler.store().domain_enabled("bdtd.udf.edu.br").unwrap());
    }

    #[test]
    fn parse_batch_is_idempotent() {
        let (_dir, crawler) = test_crawler();
        let id = seed_record(&crawler);
        crawler
            .store()
            .set_detail_html(id, DetailTarget::Buscador, BUSCADOR_HTML)
            .unwrap();

        let (processed, failed) = crawler.parse_metadata_batch(&[id]);
        assert_eq!((processed, failed), (1, 0));
        let first = crawler.store().get_record(id).unwrap().unwrap();

        let (processed, failed) = crawler.parse_metadata_batch(&[id]);
        assert_eq!((processed, failed), (1, 0));
        let second = crawler.store().get_record(id).unwrap().unwrap();

        assert_eq!(first.acronym, second.acronym);
        assert_eq!(first.institution, second.institution);
        assert_eq!(first.program, second.program);
        assert_eq!(first.pdf_link, second.pdf_link);
    }

    #[test]
    fn disabled_host_is_skipped_by_the_batch_gate() {
        let (_dir, crawler) = test_crawler();
        let id = seed_record(&crawler);
        crawler
            .store()
            .set_detail_html(id, DetailTarget::Buscador, BUSCADOR_HTML)
            .unwrap();
        crawler
            .store()
            .set_repository_link(id, "https://bdtd.udf.edu.br/handle/123")
            .unwrap();
        crawler
            .store()
            .set_domain_enabled("bdtd.udf.edu.br", false)
            .unwrap();

        let (processed, failed) = crawler.parse_metadata_batch(&[id]);
        assert_eq!((processed, failed), (0, 0));
        let record = crawler.store().get_record(id).unwrap().unwrap();
        assert_eq!(record.acronym, UNKNOWN);
    }

    #[test]
    fn batch_continues_past_missing_records() {
        let (_dir, crawler) = test_crawler();
        let id = seed_record(&crawler);
        crawler
            .store()
            .set_detail_html(id, DetailTarget::Buscador, BUSCADOR_HTML)
            .unwrap();

        let (processed, failed) = crawler.parse_metadata_batch(&[9999, id]);
        assert_eq!((processed, failed), (1, 1));
    }

    #[tokio::test]
    async fn single_page_result_set_is_not_a_batch_failure() {
        let (_dir, crawler) = test_crawler();
        // A stored result page with no pagination widget at all.
        let page_id = crawler
            .store()
            .upsert_search_page(
                "bdtd",
                "jurimetria",
                "2020",
                1,
                "<html><body><div class=\"result\">only hit</div></body></html>",
                "https://bdtd.ibict.br/vufind/Search/Results?lookfor=jurimetria",
            )
            .unwrap();

        // The single-call form still reports the condition to its caller.
        assert!(matches!(
            crawler.expand_pagination(page_id).await,
            Err(CrawlError::NoPaginationFound)
        ));

        // The batch treats it as a completed page, not a failure.
        let (processed, failed) = crawler.expand_pagination_batch(&[page_id]).await;
        assert_eq!((processed, failed), (1, 0));
    }

    #[test]
    fn unfetched_record_cannot_be_parsed() {
        let (_dir, crawler) = test_crawler();
        let id = seed_record(&crawler);
        assert!(matches!(
            crawler.parse_metadata(id),
            Err(CrawlError::NothingToParse(_))
        ));
    }
}
