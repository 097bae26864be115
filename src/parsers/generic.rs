//! Default strategy for unregistered repositories.

use scraper::Html;

use super::helpers;
use super::{MetadataParser, ThesisMetadata};
use crate::progress::ProgressFn;

/// Low-confidence fallbacks only: standard citation metadata and generic
/// breadcrumb positions. Institution identity stays unresolved because an
/// unregistered host gives us nothing to pin it on.
pub struct GenericParser;

const CRUMB_STOPLIST: &[&str] = &["Início", "Home", "Página inicial", "Repositório Institucional"];

impl MetadataParser for GenericParser {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn extract(&self, html: &str, url: &str, progress: Option<&ProgressFn>) -> ThesisMetadata {
        if let Some(cb) = progress {
            cb("generic: applying low-confidence fallbacks...");
        }
        let document = Html::parse_document(html);
        let mut data = ThesisMetadata::default();

        let program = helpers::meta_contents(&document, &["DC.publisher", "citation_publisher"])
            .into_iter()
            .find(|content| content.contains("Programa") || content.contains("Pós-Graduação"))
            .or_else(|| helpers::breadcrumb_program(&document, CRUMB_STOPLIST));
        if let Some(raw) = program {
            let cleaned = helpers::clean_program_name(&raw);
            if !cleaned.is_empty() {
                data.program = cleaned;
            }
        }

        if let Some(content) = helpers::meta_content(&document, &["citation_pdf_url"]) {
            data.pdf_link = helpers::absolutize(url, &content);
        } else if let Some(link) = helpers::find_document_link(&document, url) {
            data.pdf_link = link;
        }

        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN;

    #[test]
    fn citation_tags_resolve_program_and_pdf() {
        let html = r#"
            <meta name="citation_publisher" content="Programa de Pós-Graduação em Sociologia">
            <meta name="citation_pdf_url" content="/bitstream/1/tese.pdf">
        "#;
        let data = GenericParser.extract(html, "https://repositorio.qualquer.br/handle/1", None);
        assert_eq!(data.program, "Sociologia");
        assert_eq!(data.pdf_link, "https://repositorio.qualquer.br/bitstream/1/tese.pdf");
        assert_eq!(data.acronym, UNKNOWN);
        assert_eq!(data.institution, UNKNOWN);
    }

    #[test]
    fn all_four_fields_are_always_present() {
        let data = GenericParser.extract("", "", None);
        for field in [&data.acronym, &data.institution, &data.program, &data.pdf_link] {
            assert_eq!(field, UNKNOWN);
        }
    }
}
