//! Shared DSpace extraction base.
//!
//! Most institutional repositories are DSpace variants (JSPUI, XMLUI, and
//! the Angular front-end of DSpace 7+). The base carries the institution's
//! identity and the common lookup steps; specialized strategies compose over
//! it and override exactly one step, delegating back when their heuristic
//! yields nothing.

use scraper::{Html, Selector};

use super::helpers;
use super::{MetadataParser, ThesisMetadata};
use crate::progress::ProgressFn;

/// Generic crumb labels never accepted as a program name.
const CRUMB_STOPLIST: &[&str] = &[
    "Início",
    "Home",
    "Página inicial",
    "Teses e dissertações",
    "Teses e Dissertações",
    "Repositório Institucional",
];

/// Default DSpace strategy for a single institution.
pub struct DspaceParser {
    acronym: &'static str,
    institution: &'static str,
}

impl DspaceParser {
    pub fn new(acronym: &'static str, institution: &'static str) -> Self {
        Self {
            acronym,
            institution,
        }
    }

    pub fn acronym(&self) -> &'static str {
        self.acronym
    }

    pub fn institution(&self) -> &'static str {
        self.institution
    }

    /// Program lookup: collection links, then breadcrumbs, then metadata
    /// table, then publisher meta tags.
    pub fn find_program(&self, document: &Html) -> Option<String> {
        // Collection links of DSpace 7+ item pages.
        if let Ok(selector) = Selector::parse("div.collections a") {
            for a in document.select(&selector) {
                let text = helpers::element_text(a);
                if text.contains("Programa") || text.contains("Pós-Graduação") {
                    return Some(text);
                }
            }
        }

        let mut stoplist: Vec<&str> = CRUMB_STOPLIST.to_vec();
        stoplist.push(self.institution);
        stoplist.push(self.acronym);
        if let Some(crumb) = helpers::breadcrumb_program(document, &stoplist) {
            return Some(crumb);
        }

        if let Some(value) =
            helpers::label_value(document, "Programa de Pós-Graduação|Departamento|Curso")
        {
            return Some(value);
        }

        helpers::meta_contents(document, &["DC.publisher", "citation_publisher"])
            .into_iter()
            .find(|content| content.contains("Programa") || content.contains("Pós-Graduação"))
    }

    /// PDF lookup: citation meta tag, then bitstream/document links.
    pub fn find_pdf(&self, document: &Html, url: &str) -> Option<String> {
        if let Some(content) = helpers::meta_content(document, &["citation_pdf_url"]) {
            return Some(helpers::absolutize(url, &content));
        }
        helpers::find_document_link(document, url)
    }

    /// Boilerplate stripping applied to whatever the program lookup found.
    pub fn clean_program(&self, raw: &str) -> String {
        helpers::clean_program_name(raw)
    }

    /// Assemble the total result; individual misses degrade to the
    /// sentinel, never abort.
    pub fn compose(&self, program: Option<String>, pdf: Option<String>) -> ThesisMetadata {
        let mut data = ThesisMetadata {
            acronym: self.acronym.to_string(),
            institution: self.institution.to_string(),
            ..ThesisMetadata::default()
        };
        if let Some(raw) = program {
            let cleaned = self.clean_program(&raw);
            if !cleaned.is_empty() {
                data.program = cleaned;
            }
        }
        if let Some(link) = pdf {
            data.pdf_link = link;
        }
        data
    }
}

impl MetadataParser for DspaceParser {
    fn name(&self) -> &'static str {
        "dspace"
    }

    fn extract(&self, html: &str, url: &str, progress: Option<&ProgressFn>) -> ThesisMetadata {
        if let Some(cb) = progress {
            cb(&format!("{}: reading DSpace item page...", self.acronym));
        }
        let document = Html::parse_document(html);
        let program = self.find_program(&document);
        let pdf = self.find_pdf(&document, url);
        self.compose(program, pdf)
    }
}
