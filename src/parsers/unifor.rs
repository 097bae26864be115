//! UNIFOR (Universidade de Fortaleza) strategy.
//!
//! Sophia-flavored JSPUI: the program is listed as an authorship link whose
//! `title` carries the full "Universidade de Fortaleza. Programa de
//! Pós-Graduação em …" string, and the file often sits in an external-links
//! block rather than the citation meta tags.

use regex::Regex;
use scraper::{Html, Selector};

use super::dspace::DspaceParser;
use super::helpers;
use super::{MetadataParser, ThesisMetadata};
use crate::progress::ProgressFn;

pub struct UniforParser {
    base: DspaceParser,
}

impl UniforParser {
    pub fn new() -> Self {
        Self {
            base: DspaceParser::new("UNIFOR", "Universidade de Fortaleza"),
        }
    }

    fn find_program(&self, document: &Html) -> Option<String> {
        let re = Regex::new(r"(?i)Programa de Pós-Graduação").expect("static regex");

        // Authorship link titles first, then link texts.
        if let Ok(selector) = Selector::parse("a[title]") {
            for a in document.select(&selector) {
                if let Some(title) = a.value().attr("title") {
                    if re.is_match(title) {
                        return Some(title.to_string());
                    }
                }
            }
        }
        if let Ok(selector) = Selector::parse("a") {
            for a in document.select(&selector) {
                let text = helpers::element_text(a);
                if re.is_match(&text) {
                    return Some(text);
                }
            }
        }

        self.base.find_program(document)
    }

    fn clean_program(&self, raw: &str) -> String {
        // Titles arrive glued to the institution:
        // "Universidade de Fortaleza. Programa de Pós-Graduação em Direito".
        let prefix = Regex::new(r"(?i)^Universidade de Fortaleza[.\s-]*").expect("static regex");
        self.base.clean_program(&prefix.replace(raw, ""))
    }

    fn find_pdf(&self, document: &Html, url: &str) -> Option<String> {
        // Sophia puts the resource in an external-links block.
        if let Ok(selector) = Selector::parse(".sites a[href]") {
            if let Some(href) = document
                .select(&selector)
                .next()
                .and_then(|a| a.value().attr("href"))
            {
                return Some(helpers::absolutize(url, href));
            }
        }
        self.base.find_pdf(document, url)
    }
}

impl Default for UniforParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataParser for UniforParser {
    fn name(&self) -> &'static str {
        "unifor"
    }

    fn extract(&self, html: &str, url: &str, progress: Option<&ProgressFn>) -> ThesisMetadata {
        if let Some(cb) = progress {
            cb("UNIFOR: reading item page...");
        }
        let document = Html::parse_document(html);
        let mut data = self.base.compose(None, self.find_pdf(&document, url));
        if let Some(raw) = self.find_program(&document) {
            let cleaned = self.clean_program(&raw);
            if !cleaned.is_empty() {
                data.program = cleaned;
            }
        }
        data
    }
}
