//! UNICAMP strategy (Sophia library front-end).
//!
//! Sophia is not DSpace: the program hides inside authorship divs and files
//! sit behind `pdf-file` or `/Busca/Download` links. Item pages are often
//! reached through a handle redirector, so relative file URLs are forced
//! onto the repository's canonical domain.

use regex::Regex;
use scraper::{Html, Selector};

use super::helpers;
use super::{MetadataParser, ThesisMetadata};
use crate::progress::ProgressFn;

const CANONICAL_BASE: &str = "https://repositorio.unicamp.br";

pub struct UnicampParser;

impl UnicampParser {
    fn find_program(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse("div.autoria-sem-funcao").ok()?;
        let re = Regex::new(r"(?i)Programa de Pós-Graduação\s*(?:em|no|na)?\s+(.*)")
            .expect("static regex");

        for div in document.select(&selector) {
            let text = helpers::element_text(div);
            if !text.contains("Programa de Pós-Graduação") {
                continue;
            }
            if let Some(caps) = re.captures(&text) {
                let program = caps[1].trim().trim_end_matches('.').trim();
                if !program.is_empty() {
                    return Some(program.to_string());
                }
            }
            // Authorship entries read "Instituição. Programa ...": keep
            // whatever follows the last period.
            if let Some(tail) = text.rsplit('.').find(|part| !part.trim().is_empty()) {
                return Some(tail.trim().to_string());
            }
            return Some(text);
        }
        None
    }

    fn find_pdf(&self, document: &Html, url: &str) -> Option<String> {
        // Sophia-specific file class first.
        if let Ok(selector) = Selector::parse("a.pdf-file[href]") {
            if let Some(href) = document
                .select(&selector)
                .next()
                .and_then(|a| a.value().attr("href"))
            {
                return Some(fix_sophia_url(url, href));
            }
        }

        if let Ok(selector) = Selector::parse("a[href]") {
            if let Some(href) = document
                .select(&selector)
                .filter_map(|a| a.value().attr("href"))
                .find(|href| href.contains("/Busca/Download"))
            {
                return Some(fix_sophia_url(url, href));
            }
        }
        None
    }
}

/// Resolve a Sophia file link. When the page was reached through the
/// handle redirector, relative paths are forced onto the canonical domain.
fn fix_sophia_url(current_url: &str, href: &str) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }
    if current_url.contains("repositorio.unicamp.br") {
        return helpers::absolutize(current_url, href);
    }
    if href.starts_with('/') {
        format!("{CANONICAL_BASE}{href}")
    } else {
        format!("{CANONICAL_BASE}/{href}")
    }
}

impl MetadataParser for UnicampParser {
    fn name(&self) -> &'static str {
        "unicamp"
    }

    fn extract(&self, html: &str, url: &str, progress: Option<&ProgressFn>) -> ThesisMetadata {
        if let Some(cb) = progress {
            cb("UNICAMP: reading Sophia page...");
        }
        let document = Html::parse_document(html);
        let mut data = ThesisMetadata {
            acronym: "UNICAMP".to_string(),
            institution: "Universidade Estadual de Campinas".to_string(),
            ..ThesisMetadata::default()
        };
        if let Some(program) = self.find_program(&document) {
            data.program = program;
        }
        if let Some(pdf) = self.find_pdf(&document, url) {
            data.pdf_link = pdf;
        }
        data
    }
}
