//! UnB (Universidade de Brasília) strategy.
//!
//! The UnB repository fills `DC.publisher` with the program name, so the
//! program step prioritizes publisher meta tags and explicit program links
//! before delegating to the base lookups.

use regex::Regex;
use scraper::{Html, Selector};

use super::dspace::DspaceParser;
use super::helpers;
use super::{MetadataParser, ThesisMetadata};
use crate::progress::ProgressFn;

pub struct UnbParser {
    base: DspaceParser,
}

impl UnbParser {
    pub fn new() -> Self {
        Self {
            base: DspaceParser::new("UNB", "Universidade de Brasília"),
        }
    }

    fn find_program(&self, document: &Html) -> Option<String> {
        // Publisher metas often carry the full program name; skip entries
        // that are just the university itself.
        let candidate = helpers::meta_contents(document, &["DC.publisher", "citation_publisher"])
            .into_iter()
            .find(|content| {
                (content.contains("Programa") || content.contains("Pós-Graduação"))
                    && content.len() > 10
            });
        if candidate.is_some() {
            return candidate;
        }

        if let Ok(selector) = Selector::parse("a") {
            let re = Regex::new(r"(?i)Programa de Pós-Graduação").expect("static regex");
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
        // The program sometimes arrives glued to the institution:
        // "Universidade de Brasília, Programa de Pós-Graduação em História".
        let prefix = Regex::new(r"(?i)^Universidade de Brasília[.,-]?\s*").expect("static regex");
        self.base.clean_program(&prefix.replace(raw, ""))
    }
}

impl Default for UnbParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataParser for UnbParser {
    fn name(&self) -> &'static str {
        "unb"
    }

    fn extract(&self, html: &str, url: &str, progress: Option<&ProgressFn>) -> ThesisMetadata {
        if let Some(cb) = progress {
            cb("UnB: reading item page...");
        }
        let document = Html::parse_document(html);
        let mut data = self.base.compose(None, self.base.find_pdf(&document, url));
        if let Some(raw) = self.find_program(&document) {
            let cleaned = self.clean_program(&raw);
            if !cleaned.is_empty() {
                data.program = cleaned;
            }
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publisher_meta_with_institution_prefix_is_normalized() {
        let html = r#"
            <meta name="DC.publisher" content="Universidade de Brasília, Programa de Pós-Graduação em História">
            <meta name="citation_pdf_url" content="https://repositorio.unb.br/bitstream/1/tese.pdf">
        "#;
        let data = UnbParser::new().extract(html, "https://repositorio.unb.br/handle/1", None);
        assert_eq!(data.program, "História");
        assert_eq!(data.acronym, "UNB");
        assert_eq!(data.pdf_link, "https://repositorio.unb.br/bitstream/1/tese.pdf");
    }

    #[test]
    fn plain_university_publisher_is_rejected() {
        let html = r#"
            <meta name="DC.publisher" content="Universidade de Brasília">
            <ol class="breadcrumb">
                <li>Início</li>
                <li>Programa de Pós-Graduação em Economia</li>
                <li>Item</li>
            </ol>
        "#;
        let data = UnbParser::new().extract(html, "https://repositorio.unb.br/handle/2", None);
        assert_eq!(data.program, "Economia");
    }
}
