//! UDF (Centro Universitário do Distrito Federal) strategy.
//!
//! DSpace 7 front-end. Overrides the program step to take the breadcrumb's
//! second-to-last crumb directly; everything else delegates to the base.

use scraper::Html;

use super::dspace::DspaceParser;
use super::helpers;
use super::{MetadataParser, ThesisMetadata};
use crate::progress::ProgressFn;

pub struct UdfParser {
    base: DspaceParser,
}

impl UdfParser {
    pub fn new() -> Self {
        Self {
            base: DspaceParser::new("UDF", "Centro Universitário do Distrito Federal"),
        }
    }

    fn find_program(&self, document: &Html) -> Option<String> {
        helpers::breadcrumb_program(document, &["Início", "Teses e Dissertações"])
            .or_else(|| self.base.find_program(document))
    }
}

impl Default for UdfParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataParser for UdfParser {
    fn name(&self) -> &'static str {
        "udf"
    }

    fn extract(&self, html: &str, url: &str, progress: Option<&ProgressFn>) -> ThesisMetadata {
        if let Some(cb) = progress {
            cb("UDF: reading item page...");
        }
        let document = Html::parse_document(html);
        let program = self.find_program(&document);
        let pdf = self.base.find_pdf(&document, url);
        self.base.compose(program, pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breadcrumb_and_meta_tag_resolve_the_record() {
        let html = r#"
            <meta name="citation_pdf_url" content="/bitstreams/ab12/download">
            <ol class="breadcrumb">
                <li class="breadcrumb-item">Início</li>
                <li class="breadcrumb-item">Programa de Pós-Graduação em Direito</li>
                <li class="breadcrumb-item">Jurimetria nas cortes superiores</li>
            </ol>
        "#;
        let data = UdfParser::new().extract(html, "https://bdtd.udf.edu.br/handle/123", None);
        assert_eq!(data.acronym, "UDF");
        assert_eq!(data.institution, "Centro Universitário do Distrito Federal");
        assert_eq!(data.program, "Direito");
        assert_eq!(data.pdf_link, "https://bdtd.udf.edu.br/bitstreams/ab12/download");
    }
}
