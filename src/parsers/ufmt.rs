//! UFMT (Universidade Federal de Mato Grosso) strategy.
//!
//! Custom front-end that labels the program with a `program` CSS class.

use scraper::{Html, Selector};

use super::dspace::DspaceParser;
use super::helpers;
use super::{MetadataParser, ThesisMetadata};
use crate::progress::ProgressFn;

pub struct UfmtParser {
    base: DspaceParser,
}

impl UfmtParser {
    pub fn new() -> Self {
        Self {
            base: DspaceParser::new("UFMT", "Universidade Federal de Mato Grosso"),
        }
    }

    fn find_program(&self, document: &Html) -> Option<String> {
        if let Ok(selector) = Selector::parse("a.program") {
            if let Some(a) = document.select(&selector).next() {
                let text = helpers::element_text(a);
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
        // The class occasionally disappears across front-end updates;
        // publisher metas are the next best signal here.
        helpers::meta_content(document, &["citation_publisher"])
            .or_else(|| self.base.find_program(document))
    }
}

impl Default for UfmtParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataParser for UfmtParser {
    fn name(&self) -> &'static str {
        "ufmt"
    }

    fn extract(&self, html: &str, url: &str, progress: Option<&ProgressFn>) -> ThesisMetadata {
        if let Some(cb) = progress {
            cb("UFMT: reading item page...");
        }
        let document = Html::parse_document(html);
        let program = self.find_program(&document);
        let pdf = self.base.find_pdf(&document, url);
        self.base.compose(program, pdf)
    }
}
