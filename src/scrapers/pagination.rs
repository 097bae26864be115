//! Pagination discovery over raw search pages.

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// A discovered follow-up page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: u32,
    pub url: String,
}

fn page_param_re() -> Regex {
    Regex::new(r"[?&]page=(\d+)").expect("static regex")
}

/// Discover pages 2..max from the pagination widget.
///
/// Collects every link inside the navigation widget, reads the numeric
/// `page` query parameter from each, and uses the highest-numbered link as a
/// template: each target page is produced by substituting its number into
/// the template and resolving against `base_url`. Returns an empty list when
/// no widget or no numeric parameter is present (single-page assumption).
pub fn discover(html: &str, base_url: &str) -> Vec<PageLink> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("ul.pagination a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };
    let re = page_param_re();

    let mut max_page = 0u32;
    let mut template: Option<String> = None;
    for element in document.select(&selector) {
        let href = match element.value().attr("href") {
            Some(h) => h,
            None => continue,
        };
        if let Some(caps) = re.captures(href) {
            if let Ok(number) = caps[1].parse::<u32>() {
                if number > max_page {
                    max_page = number;
                    template = Some(href.to_string());
                }
            }
        }
    }

    let template = match template {
        Some(t) if max_page >= 2 => t,
        _ => return Vec::new(),
    };

    let substitute = Regex::new(r"page=\d+").expect("static regex");
    let base = Url::parse(base_url).ok();

    (2..=max_page)
        .filter_map(|number| {
            let href = substitute
                .replace(&template, format!("page={number}"))
                .into_owned();
            let absolute = match &base {
                Some(base) => base.join(&href).ok()?.to_string(),
                None => href,
            };
            Some(PageLink {
                number,
                url: absolute,
            })
        })
        .collect()
}

/// Last-resort strategy: scan the whole document text for page parameters
/// and take the maximum. Intentionally more permissive than widget-based
/// discovery; used directly against raw HTML when structural discovery is
/// bypassed.
pub fn max_page_in_text(html: &str) -> Option<u32> {
    // Looser than the widget pattern on purpose: raw HTML carries the
    // parameter behind entity-encoded separators (`&amp;page=3`).
    let re = Regex::new(r"page=(\d+)").expect("static regex");
    re.captures_iter(html)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://bdtd.ibict.br/vufind/Search/Results?lookfor=jurimetria&page=1";

    fn widget(pages: &[u32]) -> String {
        let links: String = pages
            .iter()
            .map(|n| {
                format!(
                    "<li><a href=\"/vufind/Search/Results?lookfor=jurimetria&amp;page={n}\">{n}</a></li>"
                )
            })
            .collect();
        format!("<html><body><ul class=\"pagination\">{links}</ul></body></html>")
    }

    #[test]
    fn discovers_pages_two_through_max() {
        let html = widget(&[1, 2, 3, 4]);
        let pages = discover(&html, BASE);

        assert_eq!(pages.len(), 3);
        for (i, expected) in [2u32, 3, 4].iter().enumerate() {
            assert_eq!(pages[i].number, *expected);
            assert!(
                pages[i].url.contains(&format!("page={expected}")),
                "url {} should carry page={expected}",
                pages[i].url
            );
            assert!(pages[i].url.starts_with("https://bdtd.ibict.br/"));
        }
    }

    #[test]
    fn no_widget_means_single_page() {
        let html = "<html><body><div class=\"result\">only one page</div></body></html>";
        assert!(discover(html, BASE).is_empty());
    }

    #[test]
    fn widget_without_page_parameters_is_ignored() {
        let html = r#"<ul class="pagination"><li><a href="/vufind/Search/Results?lookfor=x">next</a></li></ul>"#;
        assert!(discover(html, BASE).is_empty());
    }

    #[test]
    fn permissive_scan_takes_document_maximum() {
        let html = widget(&[1, 2, 3, 4]);
        assert_eq!(max_page_in_text(&html), Some(4));
        assert_eq!(max_page_in_text("<html>no links</html>"), None);
    }
}
