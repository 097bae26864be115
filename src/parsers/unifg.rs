//! UNIFG strategy (Rede Ânima shared repository).
//!
//! The Ânima network serves several institutions from one physical DSpace 9
//! host; this tenant is selected by content sniffing in the registry. The
//! program step accepts collection links and breadcrumb entries that look
//! like graduate programs, skipping the tenant's own collection labels.

use scraper::{Html, Selector};

use super::dspace::DspaceParser;
use super::helpers;
use super::{MetadataParser, ThesisMetadata};
use crate::progress::ProgressFn;

/// Token in the rendered page identifying this tenant.
pub const SNIFF_TOKEN: &str = "UNIFG";

pub struct UnifgParser {
    base: DspaceParser,
}

impl UnifgParser {
    pub fn new() -> Self {
        Self {
            base: DspaceParser::new("UNIFG", "Centro Universitário FG"),
        }
    }

    fn find_program(&self, document: &Html) -> Option<String> {
        if let Ok(selector) = Selector::parse("div.collections a") {
            for a in document.select(&selector) {
                let text = helpers::element_text(a);
                if text.contains("Programa") || text.contains("Pós-Graduação") {
                    return Some(text);
                }
            }
        }

        if let Ok(selector) = Selector::parse("ol.breadcrumb li") {
            let mut found = None;
            for crumb in document.select(&selector) {
                let text = helpers::element_text(crumb);
                if matches!(text.as_str(), "Início" | "Teses e dissertações" | "UNIFG (BA)") {
                    continue;
                }
                if text.contains("Programa de Pós-Graduação")
                    || text.contains("Mestrado")
                    || text.contains("Doutorado")
                {
                    found = Some(text);
                }
            }
            if found.is_some() {
                return found;
            }
        }

        self.base.find_program(document)
    }
}

impl Default for UnifgParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataParser for UnifgParser {
    fn name(&self) -> &'static str {
        "unifg"
    }

    fn extract(&self, html: &str, url: &str, progress: Option<&ProgressFn>) -> ThesisMetadata {
        if let Some(cb) = progress {
            cb("UNIFG: reading DSpace 9 item page...");
        }
        let document = Html::parse_document(html);
        let program = self.find_program(&document);
        let pdf = self.base.find_pdf(&document, url);
        self.base.compose(program, pdf)
    }
}
