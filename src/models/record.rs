//! Extracted record model and its derived lifecycle.

use serde::{Deserialize, Serialize};

/// Sentinel for a structured field not yet (or never) successfully resolved.
pub const UNKNOWN: &str = "unknown";

/// Which detail page a fetch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailTarget {
    /// The aggregator's own detail page for the record.
    Buscador,
    /// The institution's repository page hosting the canonical record.
    Repository,
}

impl DetailTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buscador => "buscador",
            Self::Repository => "repository",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "buscador" => Some(Self::Buscador),
            "repository" => Some(Self::Repository),
            _ => None,
        }
    }
}

/// Lifecycle stage of a record, derived from field presence rather than
/// stored explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStage {
    /// Listed from a search page, no detail HTML yet.
    Discovered,
    /// Buscador detail HTML stored.
    BuscadorFetched,
    /// Repository detail HTML stored.
    RepositoryFetched,
    /// Metadata extraction has resolved at least one field.
    Parsed,
}

/// One result-listing card, progressively enriched as detail pages are
/// fetched and parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Database row ID.
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Absolute link to the buscador detail page.
    pub buscador_link: String,
    /// Stored buscador detail HTML, populated idempotently.
    pub buscador_html: Option<String>,
    /// Direct link to the institutional repository, when the listing had one.
    pub repository_link: Option<String>,
    /// Stored repository detail HTML, populated idempotently.
    pub repository_html: Option<String>,
    /// Institution acronym, `"unknown"` until a parser succeeds.
    pub acronym: String,
    /// Full institution name, `"unknown"` until a parser succeeds.
    pub institution: String,
    /// Graduate program name, `"unknown"` until a parser succeeds.
    pub program: String,
    /// Absolute PDF URL, `"unknown"` until a parser succeeds.
    pub pdf_link: String,
    /// Search page this record was listed on.
    pub parent_page_id: i64,
    /// Originating search term, carried so records survive page deletion.
    pub term: String,
    /// Originating year filter.
    pub year: String,
}

impl ExtractedRecord {
    /// Derive the lifecycle stage from which fields are populated.
    pub fn stage(&self) -> RecordStage {
        let resolved = [&self.acronym, &self.institution, &self.program, &self.pdf_link]
            .iter()
            .any(|f| f.as_str() != UNKNOWN);
        if resolved {
            return RecordStage::Parsed;
        }
        if self.repository_html.as_deref().is_some_and(|h| !h.is_empty()) {
            return RecordStage::RepositoryFetched;
        }
        if self.buscador_html.as_deref().is_some_and(|h| !h.is_empty()) {
            return RecordStage::BuscadorFetched;
        }
        RecordStage::Discovered
    }

    /// True when the given target's HTML is already stored.
    pub fn has_html(&self, target: DetailTarget) -> bool {
        let html = match target {
            DetailTarget::Buscador => &self.buscador_html,
            DetailTarget::Repository => &self.repository_html,
        };
        html.as_deref().is_some_and(|h| !h.trim().is_empty())
    }

    /// Host of the repository link, lowercased, if one is known.
    pub fn repository_host(&self) -> Option<String> {
        let link = self.repository_link.as_deref()?;
        url::Url::parse(link)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
    }
}

/// A freshly listed record, before it has a row ID.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub title: String,
    pub author: String,
    pub buscador_link: String,
    pub repository_link: Option<String>,
    pub parent_page_id: i64,
    pub term: String,
    pub year: String,
}

/// Field-presence filter for listing records.
///
/// `None` means indifferent; `Some(true)` requires the field to be present
/// and resolved, `Some(false)` requires it absent or still the sentinel.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFilter {
    pub has_buscador_html: Option<bool>,
    pub has_repository_html: Option<bool>,
    pub has_acronym: Option<bool>,
    pub has_institution: Option<bool>,
    pub has_program: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_record() -> ExtractedRecord {
        ExtractedRecord {
            id: 1,
            title: "Jurimetria aplicada".into(),
            author: "Silva, Ana".into(),
            buscador_link: "https://bdtd.ibict.br/vufind/Record/UDF_1".into(),
            buscador_html: None,
            repository_link: None,
            repository_html: None,
            acronym: UNKNOWN.into(),
            institution: UNKNOWN.into(),
            program: UNKNOWN.into(),
            pdf_link: UNKNOWN.into(),
            parent_page_id: 7,
            term: "jurimetria".into(),
            year: "2020".into(),
        }
    }

    #[test]
    fn stage_follows_field_presence() {
        let mut rec = bare_record();
        assert_eq!(rec.stage(), RecordStage::Discovered);

        rec.buscador_html = Some("<html></html>".into());
        assert_eq!(rec.stage(), RecordStage::BuscadorFetched);

        rec.repository_html = Some("<html></html>".into());
        assert_eq!(rec.stage(), RecordStage::RepositoryFetched);

        rec.program = "Direito".into();
        assert_eq!(rec.stage(), RecordStage::Parsed);
    }

    #[test]
    fn empty_html_does_not_count_as_fetched() {
        let mut rec = bare_record();
        rec.buscador_html = Some("   ".into());
        assert!(!rec.has_html(DetailTarget::Buscador));
        assert_eq!(rec.stage(), RecordStage::Discovered);
    }

    #[test]
    fn repository_host_is_lowercased() {
        let mut rec = bare_record();
        rec.repository_link = Some("https://BDTD.UDF.edu.br/handle/123".into());
        assert_eq!(rec.repository_host().as_deref(), Some("bdtd.udf.edu.br"));
    }
}
