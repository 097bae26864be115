//! Per-institution extraction strategies and their dispatch registry.
//!
//! Every strategy implements the same total contract: all four structured
//! fields come back on every call, degraded to `"unknown"` on failure,
//! never an error. The registry selects a strategy from the record's URL,
//! with content sniffing for shared multi-tenant hosts.

mod bdtd;
mod dspace;
mod generic;
pub mod helpers;
mod pucrio;
mod udf;
mod ufmg;
mod ufmt;
mod unb;
mod unicamp;
mod unifg;
mod unifor;

pub use bdtd::BdtdParser;
pub use dspace::DspaceParser;
pub use generic::GenericParser;
pub use pucrio::PucRioParser;
pub use udf::UdfParser;
pub use ufmg::UfmgParser;
pub use ufmt::UfmtParser;
pub use unb::UnbParser;
pub use unicamp::UnicampParser;
pub use unifg::UnifgParser;
pub use unifor::UniforParser;

use crate::models::UNKNOWN;
use crate::progress::ProgressFn;

/// Structured fields extracted from a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThesisMetadata {
    pub acronym: String,
    pub institution: String,
    pub program: String,
    pub pdf_link: String,
}

impl Default for ThesisMetadata {
    fn default() -> Self {
        Self {
            acronym: UNKNOWN.to_string(),
            institution: UNKNOWN.to_string(),
            program: UNKNOWN.to_string(),
            pdf_link: UNKNOWN.to_string(),
        }
    }
}

impl ThesisMetadata {
    /// Count of fields still at the sentinel.
    pub fn unresolved(&self) -> usize {
        [&self.acronym, &self.institution, &self.program, &self.pdf_link]
            .iter()
            .filter(|f| f.as_str() == UNKNOWN)
            .count()
    }
}

/// Capability contract every strategy implements.
pub trait MetadataParser: Send + Sync {
    fn name(&self) -> &'static str;

    /// Turn a detail page into structured fields. Total: internal failures
    /// degrade individual fields, never abort the call.
    fn extract(&self, html: &str, url: &str, progress: Option<&ProgressFn>) -> ThesisMetadata;
}

/// Hosts serving several institutions from one physical repository.
/// These need content sniffing before the domain table applies.
const SHARED_HOSTS: &[&str] = &["animaeducacao.com.br", "deposita.ibict.br"];

/// Domain-dispatched strategy registry.
///
/// Registration order matters: more specific keys precede the bare
/// institutional domains that would otherwise shadow them.
pub struct ParserRegistry {
    table: Vec<(&'static str, Box<dyn MetadataParser>)>,
    tenants: Vec<(&'static str, Box<dyn MetadataParser>)>,
    generic: GenericParser,
}

impl ParserRegistry {
    pub fn new() -> Self {
        let table: Vec<(&'static str, Box<dyn MetadataParser>)> = vec![
            ("bdtd.ibict.br", Box::new(BdtdParser)),
            ("animaeducacao.com.br", Box::new(UnifgParser::new())),
            ("bdtd.udf.edu.br", Box::new(UdfParser::new())),
            ("udf.edu.br", Box::new(UdfParser::new())),
            ("repositorio.unb.br", Box::new(UnbParser::new())),
            ("unb.br", Box::new(UnbParser::new())),
            ("repositorio.ufmg.br", Box::new(UfmgParser::new())),
            ("ufmg.br", Box::new(UfmgParser::new())),
            ("ri.ufmt.br", Box::new(UfmtParser::new())),
            ("ufmt.br", Box::new(UfmtParser::new())),
            ("repositorio.unicamp.br", Box::new(UnicampParser)),
            ("unicamp.br", Box::new(UnicampParser)),
            ("uol.unifor.br", Box::new(UniforParser::new())),
            ("repositorio.unifor.br", Box::new(UniforParser::new())),
            ("unifor.br", Box::new(UniforParser::new())),
            ("maxwell.vrac.puc-rio.br", Box::new(PucRioParser)),
            ("puc-rio.br", Box::new(PucRioParser)),
        ];
        let tenants: Vec<(&'static str, Box<dyn MetadataParser>)> =
            vec![(unifg::SNIFF_TOKEN, Box::new(UnifgParser::new()))];
        Self {
            table,
            tenants,
            generic: GenericParser,
        }
    }

    /// Select a strategy for a detail page.
    ///
    /// Pure function of its inputs: (1) empty URL falls to generic, (2)
    /// shared hosts are disambiguated by institution tokens in the HTML,
    /// (3) first case-insensitive substring match in the table wins, (4)
    /// generic catches the rest.
    pub fn get(&self, url: &str, html: Option<&str>) -> &dyn MetadataParser {
        if url.trim().is_empty() {
            return &self.generic;
        }
        let url_lower = url.to_lowercase();

        if SHARED_HOSTS.iter().any(|host| url_lower.contains(host)) {
            if let Some(html) = html {
                for (token, parser) in &self.tenants {
                    if html.contains(token) {
                        return parser.as_ref();
                    }
                }
            }
            // No token matched: fall through to the domain table.
        }

        for (key, parser) in &self.table {
            if url_lower.contains(key) {
                return parser.as_ref();
            }
        }
        &self.generic
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_is_deterministic() {
        let registry = ParserRegistry::new();
        let url = "https://repositorio.unb.br/handle/10482/1";
        for _ in 0..3 {
            assert_eq!(registry.get(url, None).name(), "unb");
        }
    }

    #[test]
    fn unmatched_domains_fall_to_generic() {
        let registry = ParserRegistry::new();
        assert_eq!(
            registry.get("https://repositorio.desconhecida.br/handle/1", None).name(),
            "generic"
        );
        assert_eq!(registry.get("", Some("<html/>")).name(), "generic");
    }

    #[test]
    fn specific_keys_match_before_bare_domains() {
        let registry = ParserRegistry::new();
        assert_eq!(
            registry.get("https://bdtd.udf.edu.br/handle/1", None).name(),
            "udf"
        );
        assert_eq!(
            registry.get("https://www.maxwell.vrac.puc-rio.br/colecao.php?nrSeq=1", None).name(),
            "pucrio"
        );
        assert_eq!(
            registry.get("https://repositorio.unicamp.br/acervo/detalhe/987", None).name(),
            "unicamp"
        );
        assert_eq!(
            registry.get("https://uol.unifor.br/oul/item/1", None).name(),
            "unifor"
        );
    }

    #[test]
    fn shared_host_is_sniffed_by_tenant_token() {
        let registry = ParserRegistry::new();
        let url = "https://repositorio.animaeducacao.com.br/handle/ANIMA/1";
        let html = r#"<ol class="breadcrumb"><li>UNIFG (BA)</li></ol>"#;
        assert_eq!(registry.get(url, Some(html)).name(), "unifg");
        // Unrecognized tenant falls through to the table entry.
        assert_eq!(registry.get(url, Some("<html>outra coisa</html>")).name(), "unifg");
        assert_eq!(registry.get(url, None).name(), "unifg");
    }

    #[test]
    fn buscador_pages_use_the_bdtd_strategy() {
        let registry = ParserRegistry::new();
        assert_eq!(
            registry.get("https://bdtd.ibict.br/vufind/Record/UDF_1", None).name(),
            "bdtd"
        );
    }
}
