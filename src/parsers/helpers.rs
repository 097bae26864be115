//! Recurring extraction sub-patterns shared across strategies.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Collapse whitespace in an element's text.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The next sibling that is itself an element.
pub fn next_sibling_element<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Label/value lookup: find a `<th>` whose text matches the pattern and
/// read the adjacent `<td>`.
pub fn label_value(document: &Html, label_pattern: &str) -> Option<String> {
    let selector = Selector::parse("th").ok()?;
    let re = Regex::new(&format!("(?i){label_pattern}")).ok()?;
    for th in document.select(&selector) {
        if re.is_match(&element_text(th)) {
            if let Some(td) = next_sibling_element(th) {
                let value = element_text(td);
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
    }
    None
}

/// First matching `<a>` following a `<th>` whose text matches the pattern.
pub fn label_link(document: &Html, label_pattern: &str) -> Option<String> {
    let selector = Selector::parse("th").ok()?;
    let re = Regex::new(&format!("(?i){label_pattern}")).ok()?;
    for th in document.select(&selector) {
        if re.is_match(&element_text(th)) {
            let td = next_sibling_element(th)?;
            let a = Selector::parse("a[href]").ok()?;
            if let Some(link) = td.select(&a).next() {
                return link.value().attr("href").map(str::to_string);
            }
        }
    }
    None
}

/// Content of the first meta tag whose `name` is in `names`.
pub fn meta_content(document: &Html, names: &[&str]) -> Option<String> {
    let selector = Selector::parse("meta[name]").ok()?;
    for meta in document.select(&selector) {
        let name = meta.value().attr("name")?;
        if names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            let content = meta.value().attr("content")?.trim();
            if !content.is_empty() {
                return Some(content.to_string());
            }
        }
    }
    None
}

/// All meta contents matching any of `names`, for callers that filter.
pub fn meta_contents(document: &Html, names: &[&str]) -> Vec<String> {
    let selector = match Selector::parse("meta[name]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };
    document
        .select(&selector)
        .filter_map(|meta| {
            let name = meta.value().attr("name")?;
            if names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                meta.value().attr("content").map(|c| c.trim().to_string())
            } else {
                None
            }
        })
        .filter(|c| !c.is_empty())
        .collect()
}

/// Breadcrumb positional extraction: the second-to-last crumb, skipping a
/// stoplist of generic labels.
pub fn breadcrumb_program(document: &Html, stoplist: &[&str]) -> Option<String> {
    for selector_str in ["li.breadcrumb-item", "ol.breadcrumb li", "ul.breadcrumb li"] {
        let selector = match Selector::parse(selector_str) {
            Ok(s) => s,
            Err(_) => continue,
        };
        let crumbs: Vec<String> = document
            .select(&selector)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .filter(|text| !stoplist.iter().any(|stop| text.eq_ignore_ascii_case(stop)))
            .collect();
        if crumbs.len() >= 2 {
            return Some(crumbs[crumbs.len() - 2].clone());
        }
    }
    None
}

/// Resolve `href` against `base`, returning `href` unchanged when it is
/// already absolute or the base itself fails to parse.
pub fn absolutize(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    match Url::parse(base).and_then(|b| b.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}

/// Document-link scan: a link ending in a document suffix or whose visible
/// text carries an access phrase, resolved to an absolute URL.
pub fn find_document_link(document: &Html, base_url: &str) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;
    let mut by_text: Option<String> = None;
    for a in document.select(&selector) {
        let href = a.value().attr("href")?.trim();
        if href.is_empty() {
            continue;
        }
        let lower = href.to_lowercase();
        if lower.ends_with(".pdf") || (lower.contains("/bitstreams/") && lower.contains("/download"))
        {
            return Some(absolutize(base_url, href));
        }
        if by_text.is_none() {
            let text = element_text(a).to_lowercase();
            if text.contains("acesso ao documento") || text.contains("download do arquivo") {
                by_text = Some(absolutize(base_url, href));
            }
        }
    }
    by_text
}

/// Boilerplate stripping: normalize a raw label down to the program name.
///
/// Removes "Programa de Pós-Graduação em", "Mestrado/Doutorado
/// (Profissional|Acadêmico) em" prefixes and a trailing "(SIGLA)".
pub fn clean_program_name(raw: &str) -> String {
    let prefix = Regex::new(
        r"(?i)^(?:Programa de Pós-Graduação|Mestrado|Doutorado)(?:\s+(?:Profissional|Acadêmico))?(?:\s+(?:em|no|na))?\s*",
    )
    .expect("static regex");
    let suffix = Regex::new(r"\s*\([A-Z]{2,}[^)]*\)\s*$").expect("static regex");

    let cleaned = prefix.replace(raw.trim(), "");
    suffix.replace(&cleaned, "").trim().to_string()
}
