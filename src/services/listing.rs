//! Listing extraction: one record per result card on a search page.

use scraper::{ElementRef, Html, Selector};

use crate::models::NewRecord;
use crate::parsers::helpers::{absolutize, element_text};

/// Extract the result cards of a VuFind search page.
///
/// Each card yields title, author, the buscador detail link (resolved to
/// absolute when root-relative), and an optional direct repository link
/// when the listing exposes one.
pub fn extract_cards(
    html: &str,
    base_url: &str,
    parent_page_id: i64,
    term: &str,
    year: &str,
) -> Vec<NewRecord> {
    let document = Html::parse_document(html);
    let card_selector = match Selector::parse("div.result") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&card_selector)
        .filter_map(|card| {
            let (title, link) = title_and_link(card, base_url)?;
            Some(NewRecord {
                title,
                author: author_of(card),
                buscador_link: link,
                repository_link: repository_link_of(card, base_url),
                parent_page_id,
                term: term.to_string(),
                year: year.to_string(),
            })
        })
        .collect()
}

fn title_and_link(card: ElementRef<'_>, base_url: &str) -> Option<(String, String)> {
    let selector = Selector::parse("a.title").ok()?;
    let a = card.select(&selector).next()?;
    let href = a.value().attr("href")?;
    let title = element_text(a);
    if title.is_empty() {
        return None;
    }
    Some((title, absolutize(base_url, href)))
}

fn author_of(card: ElementRef<'_>) -> String {
    for selector_str in ["div.resultItemLine2 a", "a[href*=\"Author\"]"] {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(a) = card.select(&selector).next() {
                let text = element_text(a);
                if !text.is_empty() {
                    return text;
                }
            }
        }
    }
    String::new()
}

/// A link leaving the buscador entirely is taken as the repository link.
/// VuFind's `a.fulltext` anchor wins over any other external link in the card.
fn repository_link_of(card: ElementRef<'_>, base_url: &str) -> Option<String> {
    let base_host = url::Url::parse(base_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))?;
    for selector_str in ["a.fulltext[href]", "a[href]"] {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for a in card.select(&selector) {
            let Some(href) = a.value().attr("href") else {
                continue;
            };
            if !href.starts_with("http") {
                continue;
            }
            if let Ok(target) = url::Url::parse(href) {
                if let Some(host) = target.host_str() {
                    if host != base_host {
                        return Some(href.to_string());
                    }
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://bdtd.ibict.br/vufind/Search/Results?lookfor=jurimetria";

    const FIXTURE: &str = r#"
        <div class="result">
            <div class="resultItemLine1">
                <a class="title getFull" href="/vufind/Record/UDF_1">Jurimetria e o Supremo</a>
            </div>
            <div class="resultItemLine2">
                por <a href="/vufind/Author/Home?author=Silva">Silva, Ana</a>
            </div>
            <a class="fulltext" href="https://bdtd.udf.edu.br/handle/123">Acesso em linha</a>
        </div>
        <div class="result">
            <div class="resultItemLine1">
                <a class="title getFull" href="/vufind/Record/UNB_9">Decisões e estatística</a>
            </div>
        </div>
    "#;

    #[test]
    fn one_record_per_card_with_absolute_links() {
        let records = extract_cards(FIXTURE, BASE, 42, "jurimetria", "2020");
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.title, "Jurimetria e o Supremo");
        assert_eq!(first.author, "Silva, Ana");
        assert_eq!(first.buscador_link, "https://bdtd.ibict.br/vufind/Record/UDF_1");
        assert_eq!(
            first.repository_link.as_deref(),
            Some("https://bdtd.udf.edu.br/handle/123")
        );
        assert_eq!(first.parent_page_id, 42);
        assert_eq!(first.term, "jurimetria");

        let second = &records[1];
        assert_eq!(second.author, "");
        assert!(second.repository_link.is_none());
    }

    #[test]
    fn fulltext_anchor_beats_earlier_external_links() {
        // An altmetrics badge link precedes the fulltext anchor in document
        // order; the fulltext anchor must still win.
        let html = r#"
            <div class="result">
                <a href="https://www.altmetric.com/details/123">Altmetric</a>
                <div class="resultItemLine1">
                    <a class="title" href="/vufind/Record/UFMG_3">Sentenças em números</a>
                </div>
                <a class="fulltext" href="https://repositorio.ufmg.br/handle/1843/55">Texto completo</a>
            </div>
        "#;
        let records = extract_cards(html, BASE, 7, "jurimetria", "");
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].repository_link.as_deref(),
            Some("https://repositorio.ufmg.br/handle/1843/55")
        );
    }

    #[test]
    fn pages_without_cards_yield_nothing() {
        assert!(extract_cards("<html><body>Nenhum resultado</body></html>", BASE, 1, "x", "y").is_empty());
    }
}
