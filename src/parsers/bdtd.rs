//! Strategy for the BDTD buscador's own detail pages (VuFind).
//!
//! Unlike repository strategies, institution identity comes from the page
//! itself: VuFind renders a metadata table with labeled rows.

use regex::Regex;
use scraper::Html;

use super::helpers;
use super::{MetadataParser, ThesisMetadata};
use crate::progress::ProgressFn;

pub struct BdtdParser;

impl MetadataParser for BdtdParser {
    fn name(&self) -> &'static str {
        "bdtd"
    }

    fn extract(&self, html: &str, url: &str, progress: Option<&ProgressFn>) -> ThesisMetadata {
        if let Some(cb) = progress {
            cb("BDTD: reading buscador metadata table...");
        }
        let document = Html::parse_document(html);
        let mut data = ThesisMetadata::default();

        if let Some(value) = helpers::label_value(&document, "Instituição de defesa") {
            data.institution = value;
        }
        if let Some(value) = helpers::label_value(&document, "Sigla da instituição") {
            data.acronym = value;
        }
        if let Some(raw) =
            helpers::label_value(&document, "Programa de Pós-Graduação|Departamento")
        {
            // Rows come suffixed with the acronym: "Direito (UDF)".
            let suffix = Regex::new(r"\s*\([A-Z][^)]*\)\s*$").expect("static regex");
            let cleaned = suffix.replace(&raw, "").trim().to_string();
            if !cleaned.is_empty() {
                data.program = cleaned;
            }
        }
        // The access link points at the institutional repository page, the
        // richest target for a follow-up fetch.
        if let Some(href) = helpers::label_link(&document, "Link de acesso") {
            data.pdf_link = helpers::absolutize(url, &href);
        }

        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN;

    const FIXTURE: &str = r#"
        <table class="table">
            <tr><th>Instituição de defesa:</th><td>Centro Universitário do Distrito Federal</td></tr>
            <tr><th>Sigla da instituição:</th><td>UDF</td></tr>
            <tr><th>Programa de Pós-Graduação:</th><td>Direito (UDF)</td></tr>
            <tr><th>Link de acesso:</th><td><a href="https://bdtd.udf.edu.br/handle/123">Acesso</a></td></tr>
        </table>
    "#;

    #[test]
    fn vufind_table_resolves_all_fields() {
        let data = BdtdParser.extract(FIXTURE, "https://bdtd.ibict.br/vufind/Record/UDF_1", None);
        assert_eq!(data.institution, "Centro Universitário do Distrito Federal");
        assert_eq!(data.acronym, "UDF");
        assert_eq!(data.program, "Direito");
        assert_eq!(data.pdf_link, "https://bdtd.udf.edu.br/handle/123");
    }

    #[test]
    fn missing_rows_keep_the_sentinel() {
        let data = BdtdParser.extract(
            "<table><tr><th>Autor:</th><td>Silva, Ana</td></tr></table>",
            "https://bdtd.ibict.br/vufind/Record/X",
            None,
        );
        assert_eq!(data.institution, UNKNOWN);
        assert_eq!(data.acronym, UNKNOWN);
        assert_eq!(data.program, UNKNOWN);
        assert_eq!(data.pdf_link, UNKNOWN);
    }
}
