//! PUC-Rio strategy (Maxwell repository).
//!
//! Maxwell is not DSpace at all: the program hides inside collection
//! divs and files sit behind a `<select>` of options. Links are often
//! relative or issued via the handle redirector, so PDF URLs are forced
//! onto the repository's canonical domain.

use regex::Regex;
use scraper::{Html, Selector};

use super::helpers;
use super::{MetadataParser, ThesisMetadata};
use crate::progress::ProgressFn;

const CANONICAL_BASE: &str = "https://www.maxwell.vrac.puc-rio.br/";

pub struct PucRioParser;

impl PucRioParser {
    fn find_program(&self, document: &Html) -> Option<String> {
        let re = Regex::new(r"(?i)Programa de Pós-Graduação(?:\s+(?:em|no|na))?\s*([^-<]+)")
            .expect("static regex");

        if let Ok(selector) = Selector::parse("div.colecao_tematicas") {
            for div in document.select(&selector) {
                let text = helpers::element_text(div);
                if let Some(caps) = re.captures(&text) {
                    let program = caps[1].replace("PUC-Rio", "");
                    let program = program.trim();
                    if !program.is_empty() {
                        return Some(program.to_string());
                    }
                }
            }
        }

        if let Ok(selector) = Selector::parse("span") {
            for span in document.select(&selector) {
                let text = helpers::element_text(span);
                if let Some(caps) = re.captures(&text) {
                    return Some(caps[1].trim().to_string());
                }
            }
        }
        None
    }

    fn find_pdf(&self, document: &Html, url: &str) -> Option<String> {
        // File select specific to Maxwell: option values are bare
        // filenames, joined with the record's sequence number.
        if let Ok(selector) = Selector::parse("select#file option") {
            for option in document.select(&selector) {
                let value = option.value().attr("value").unwrap_or("");
                if value.to_lowercase().ends_with(".pdf") {
                    if let Some(nr_seq) = Regex::new(r"nrSeq=(\d+)")
                        .expect("static regex")
                        .captures(url)
                        .map(|caps| caps[1].to_string())
                    {
                        return Some(format!("{CANONICAL_BASE}{nr_seq}/{value}"));
                    }
                }
            }
        }

        if let Ok(selector) = Selector::parse("a[href]") {
            for a in document.select(&selector) {
                let href = a.value().attr("href").unwrap_or("");
                if href.to_lowercase().ends_with(".pdf") {
                    // Forced onto the canonical domain; the page may have
                    // been reached through a redirector.
                    return Some(helpers::absolutize(CANONICAL_BASE, href));
                }
            }
        }
        None
    }
}

impl MetadataParser for PucRioParser {
    fn name(&self) -> &'static str {
        "pucrio"
    }

    fn extract(&self, html: &str, url: &str, progress: Option<&ProgressFn>) -> ThesisMetadata {
        if let Some(cb) = progress {
            cb("PUC-Rio: reading Maxwell page...");
        }
        let document = Html::parse_document(html);
        let mut data = ThesisMetadata {
            acronym: "PUC-Rio".to_string(),
            institution: "Pontifícia Universidade Católica do Rio de Janeiro".to_string(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maxwell_select_builds_canonical_pdf_url() {
        let html = r#"
            <div class="colecao_tematicas">Programa de Pós-Graduação em Direito - PUC-Rio</div>
            <select id="file"><option value="64244.PDF">NA ÍNTEGRA - PDF</option></select>
        "#;
        let data = PucRioParser.extract(
            html,
            "https://www.maxwell.vrac.puc-rio.br/colecao.php?strSecao=resultado&nrSeq=64244",
            None,
        );
        assert_eq!(data.program, "Direito");
        assert_eq!(data.pdf_link, "https://www.maxwell.vrac.puc-rio.br/64244/64244.PDF");
        assert_eq!(data.acronym, "PUC-Rio");
    }

    #[test]
    fn relative_pdf_links_are_forced_to_canonical_domain() {
        let html = r#"<a href="/12345/tese.pdf">NA ÍNTEGRA</a>"#;
        let data = PucRioParser.extract(html, "https://hdl.handle.net/10.1234/xyz", None);
        assert_eq!(data.pdf_link, "https://www.maxwell.vrac.puc-rio.br/12345/tese.pdf");
    }
}
