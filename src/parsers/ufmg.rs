//! UFMG (Universidade Federal de Minas Gerais) strategy.
//!
//! DSpace 8 Angular front-end: the course sits in `simple-view-element`
//! blocks and downloads use `/bitstreams/{uuid}/download` links.

use scraper::{Html, Selector};

use super::dspace::DspaceParser;
use super::helpers;
use super::{MetadataParser, ThesisMetadata};
use crate::progress::ProgressFn;

pub struct UfmgParser {
    base: DspaceParser,
}

impl UfmgParser {
    pub fn new() -> Self {
        Self {
            base: DspaceParser::new("UFMG", "Universidade Federal de Minas Gerais"),
        }
    }

    fn find_program(&self, document: &Html) -> Option<String> {
        // <h2 class="simple-view-element-header">Curso</h2>
        // <div class="simple-view-element-body">Valor</div>
        if let Ok(selector) = Selector::parse("h2.simple-view-element-header") {
            for header in document.select(&selector) {
                if helpers::element_text(header).contains("Curso") {
                    if let Some(body) = helpers::next_sibling_element(header) {
                        let value = helpers::element_text(body);
                        if !value.is_empty() {
                            return Some(value);
                        }
                    }
                }
            }
        }
        self.base.find_program(document)
    }

    fn find_pdf(&self, document: &Html, url: &str) -> Option<String> {
        if let Ok(selector) = Selector::parse("a[href]") {
            for a in document.select(&selector) {
                if let Some(href) = a.value().attr("href") {
                    if href.contains("/bitstreams/") && href.contains("/download") {
                        return Some(helpers::absolutize(url, href));
                    }
                }
            }
        }
        self.base.find_pdf(document, url)
    }
}

impl Default for UfmgParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataParser for UfmgParser {
    fn name(&self) -> &'static str {
        "ufmg"
    }

    fn extract(&self, html: &str, url: &str, progress: Option<&ProgressFn>) -> ThesisMetadata {
        if let Some(cb) = progress {
            cb("UFMG: reading item page...");
        }
        let document = Html::parse_document(html);
        let program = self.find_program(&document);
        let pdf = self.find_pdf(&document, url);
        self.base.compose(program, pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_view_blocks_resolve_course_and_download() {
        let html = r#"
            <h2 class="simple-view-element-header">Curso</h2>
            <div class="simple-view-element-body">Doutorado em Direito</div>
            <a href="/bitstreams/9f3a/download">Baixar arquivo</a>
        "#;
        let data = UfmgParser::new().extract(html, "https://repositorio.ufmg.br/item/1", None);
        assert_eq!(data.program, "Direito");
        assert_eq!(data.pdf_link, "https://repositorio.ufmg.br/bitstreams/9f3a/download");
        assert_eq!(data.acronym, "UFMG");
    }
}
