//! HTML parsing for fetched pages
//!
//! Extracts three things from a document:
//! - the title (`<title>`, falling back to the first `<h1>`)
//! - outbound links (from `<a href>` and `<link rel="canonical">`)
//! - the main text, preferring configured content containers
//!
//! # Link Extraction Rules
//!
//! **Include:**
//! - `<a href="...">` anywhere in the document
//! - `<link rel="canonical" href="...">`
//!
//! **Exclude:**
//! - `<a href="..." download>`
//! - `javascript:`, `mailto:`, `tel:` and `data:` links
//! - fragment-only links
//! - anything that is not HTTP(S) after resolution
//!
//! Links are resolved against the page URL, normalized and de-duplicated.

use crate::config::FetcherConfig;
use crate::text::collapse_whitespace;
use crate::url::resolve_and_normalize;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Content containers must yield more text than this to be used
const MIN_CONTENT_CHARS: usize = 100;

/// Paragraphs at or below this length are ignored in the paragraph fallback
const MIN_PARAGRAPH_CHARS: usize = 20;

/// Pages with less body text than this are checked for error wording
const ERROR_PAGE_MAX_CHARS: usize = 100;

const ERROR_PHRASES: &[&str] = &[
    "404",
    "not found",
    "access denied",
    "forbidden",
    "error",
    "unavailable",
    "sorry",
];

/// Elements whose text is never page content, whatever the configuration
const ALWAYS_HIDDEN: &[&str] = &["script", "style", "noscript", "template"];

/// Compiled content and exclusion selectors
#[derive(Debug, Clone)]
pub struct ContentSelectors {
    content: Vec<Selector>,
    exclude: Vec<Selector>,
}

impl ContentSelectors {
    /// Compiles the selectors of a fetcher configuration
    pub fn from_config(config: &FetcherConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            content: compile(&config.content_selectors)?,
            exclude: compile(&config.exclude_selectors)?,
        })
    }

    fn is_excluded(&self, element: &ElementRef) -> bool {
        ALWAYS_HIDDEN.contains(&element.value().name())
            || self.exclude.iter().any(|selector| selector.matches(element))
    }
}

fn compile(selectors: &[String]) -> Result<Vec<Selector>, ConfigError> {
    selectors
        .iter()
        .map(|s| {
            Selector::parse(s)
                .map_err(|e| ConfigError::Validation(format!("invalid selector '{}': {:?}", s, e)))
        })
        .collect()
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPage {
    pub title: String,
    pub text: String,
    pub links: Vec<Url>,
    /// True when the body is short and reads like an error message
    pub looks_like_error: bool,
}

/// Parses an HTML document fetched from `base_url`
pub fn parse_page(html: &str, base_url: &Url, selectors: &ContentSelectors) -> ParsedPage {
    let document = Html::parse_document(html);
    let body_text = body_text(&document, selectors);

    ParsedPage {
        title: extract_title(&document),
        text: extract_main_text(&document, selectors, &body_text),
        links: extract_links(&document, base_url),
        looks_like_error: looks_like_error(&body_text),
    }
}

fn extract_title(document: &Html) -> String {
    for tag in ["title", "h1"] {
        let Ok(selector) = Selector::parse(tag) else {
            continue;
        };
        let title = document
            .select(&selector)
            .next()
            .map(|element| collapse_whitespace(&element.text().collect::<String>()))
            .unwrap_or_default();
        if !title.is_empty() {
            return title;
        }
    }
    String::new()
}

fn extract_main_text(document: &Html, selectors: &ContentSelectors, body_text: &str) -> String {
    for selector in &selectors.content {
        if let Some(element) = document.select(selector).next() {
            let text = visible_text(element, selectors);
            if text.len() > MIN_CONTENT_CHARS {
                return text;
            }
        }
    }

    if let Ok(p) = Selector::parse("p") {
        let paragraphs: Vec<String> = document
            .select(&p)
            .map(|element| visible_text(element, selectors))
            .filter(|text| text.len() > MIN_PARAGRAPH_CHARS)
            .collect();
        if !paragraphs.is_empty() {
            return paragraphs.join(" ");
        }
    }

    body_text.to_string()
}

fn body_text(document: &Html, selectors: &ContentSelectors) -> String {
    Selector::parse("body")
        .ok()
        .and_then(|body| document.select(&body).next())
        .map(|element| visible_text(element, selectors))
        .unwrap_or_default()
}

/// Text under `root`, skipping any text inside an excluded element
fn visible_text(root: ElementRef, selectors: &ContentSelectors) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| selectors.is_excluded(&ancestor));
        if !hidden {
            parts.push(text);
        }
    }
    collapse_whitespace(&parts.join(" "))
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let mut push = |href: &str| {
        if let Some(url) = resolve_link(href, base_url) {
            if seen.insert(url.as_str().to_string()) {
                links.push(url);
            }
        }
    };

    if let Ok(anchors) = Selector::parse("a[href]") {
        for element in document.select(&anchors) {
            if element.value().attr("download").is_some() {
                continue;
            }
            if let Some(href) = element.value().attr("href") {
                push(href);
            }
        }
    }

    if let Ok(canonical) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical) {
            if let Some(href) = element.value().attr("href") {
                push(href);
            }
        }
    }

    links
}

fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    resolve_and_normalize(base_url, href).ok()
}

fn looks_like_error(body_text: &str) -> bool {
    if body_text.len() >= ERROR_PAGE_MAX_CHARS {
        return false;
    }
    let lower = body_text.to_lowercase();
    ERROR_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn selectors() -> ContentSelectors {
        ContentSelectors::from_config(&FetcherConfig::default()).unwrap()
    }

    fn parse(html: &str) -> ParsedPage {
        parse_page(html, &base_url(), &selectors())
    }

    fn long_sentence(topic: &str) -> String {
        format!(
            "This paragraph talks about {} at length so that it clears every minimum length \
             threshold used by the extractor.",
            topic
        )
    }

    #[test]
    fn test_title() {
        let page = parse("<html><head><title>  Test \n Page </title></head><body></body></html>");
        assert_eq!(page.title, "Test Page");
    }

    #[test]
    fn test_title_falls_back_to_h1() {
        let page = parse("<html><body><h1>Heading</h1></body></html>");
        assert_eq!(page.title, "Heading");
        assert_eq!(parse("<html><body></body></html>").title, "");
    }

    #[test]
    fn test_main_container_preferred() {
        let html = format!(
            "<html><body><nav>Home About Contact</nav><main><p>{}</p></main>\
             <footer>Copyright</footer></body></html>",
            long_sentence("admissions")
        );
        let page = parse(&html);
        assert!(page.text.contains("admissions"));
        assert!(!page.text.contains("Home About"));
        assert!(!page.text.contains("Copyright"));
    }

    #[test]
    fn test_excluded_subtree_inside_main() {
        let html = format!(
            "<html><body><main><div class=\"sidebar\">Sidebar links</div><p>{}</p>\
             <script>var x = 1;</script></main></body></html>",
            long_sentence("tuition")
        );
        let page = parse(&html);
        assert!(page.text.contains("tuition"));
        assert!(!page.text.contains("Sidebar"));
        assert!(!page.text.contains("var x"));
    }

    #[test]
    fn test_paragraph_fallback() {
        let html = "<html><body><div><p>Short.</p><p>Paragraph long enough to be kept.</p>\
                    </div></body></html>";
        let page = parse(html);
        assert_eq!(page.text, "Paragraph long enough to be kept.");
    }

    #[test]
    fn test_body_fallback() {
        let page = parse("<html><body><div>Just a div</div><nav>menu</nav></body></html>");
        assert_eq!(page.text, "Just a div");
    }

    #[test]
    fn test_links_resolved_and_deduplicated() {
        let html = r#"<html><head><link rel="canonical" href="https://example.com/page" /></head>
            <body>
                <a href="/other">One</a>
                <a href="other/">Relative</a>
                <a href="https://EXAMPLE.com/other#frag">Dup</a>
                <a href="https://elsewhere.org/x">External</a>
            </body></html>"#;
        let page = parse(html);
        let links: Vec<&str> = page.links.iter().map(Url::as_str).collect();
        assert_eq!(
            links,
            vec![
                "https://example.com/other",
                "https://elsewhere.org/x",
                "https://example.com/page"
            ]
        );
    }

    #[test]
    fn test_skipped_links() {
        let html = r##"<html><body>
            <a href="javascript:void(0)">js</a>
            <a href="MAILTO:a@example.com">mail</a>
            <a href="tel:+1234">tel</a>
            <a href="data:text/html,hi">data</a>
            <a href="#section">frag</a>
            <a href="/file.pdf" download>dl</a>
            <a href="ftp://example.com/f">ftp</a>
            <a href="/kept">kept</a>
        </body></html>"##;
        let page = parse(html);
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].as_str(), "https://example.com/kept");
    }

    #[test]
    fn test_error_page_detection() {
        assert!(parse("<html><body><h1>404 Not Found</h1></body></html>").looks_like_error);
        assert!(!parse("<html><body><p>Welcome</p></body></html>").looks_like_error);

        let long = format!("<html><body><p>{}</p><p>error</p></body></html>", long_sentence("x"));
        assert!(!parse(&long).looks_like_error);
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let config = FetcherConfig {
            content_selectors: vec!["main[".to_string()],
            ..FetcherConfig::default()
        };
        assert!(ContentSelectors::from_config(&config).is_err());
    }
}
