//! Parsed-page abstraction consumed by the scanner and name extractor.
//!
//! [`PageDocument`] hides the HTML parser behind plain owned values so the
//! detection code never sees parser-specific element types.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));
static H1_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("valid selector"));
static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").expect("valid selector"));
static IFRAME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("iframe").expect("valid selector"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid selector"));
static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("valid selector"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Iframe,
    Anchor,
    Script,
}

/// Attributes and text content of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageElement {
    attrs: Vec<(String, String)>,
    text: String,
}

impl PageElement {
    #[must_use]
    pub fn new(attrs: &[(&str, &str)], text: &str) -> Self {
        Self {
            attrs: attrs
                .iter()
                .map(|(k, v)| ((*k).to_ascii_lowercase(), (*v).to_string()))
                .collect(),
            text: text.to_string(),
        }
    }

    /// Attribute value by (case-insensitive) name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    fn from_element(element: ElementRef<'_>) -> Self {
        Self {
            attrs: element
                .value()
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            text: element.text().collect(),
        }
    }
}

/// Read access to a parsed page. Every list is in document order.
pub trait PageDocument {
    /// Text of the first `<title>` element.
    fn title(&self) -> Option<String>;

    /// Text of every `<h1>` element.
    fn headings(&self) -> Vec<String>;

    /// `content` of the first `<meta>` whose `key_attr` equals `key_value`
    /// (case-insensitive), e.g. `("name", "description")`.
    fn meta_content(&self, key_attr: &str, key_value: &str) -> Option<String>;

    fn elements(&self, kind: ElementKind) -> Vec<PageElement>;
}

/// [`PageDocument`] backed by the `scraper` HTML5 parser.
pub struct HtmlPage {
    html: Html,
}

impl HtmlPage {
    /// Parse raw markup. Malformed markup never fails; the parser recovers
    /// the way browsers do.
    #[must_use]
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }
}

impl PageDocument for HtmlPage {
    fn title(&self) -> Option<String> {
        self.html
            .select(&TITLE_SELECTOR)
            .next()
            .map(|el| el.text().collect())
    }

    fn headings(&self) -> Vec<String> {
        self.html
            .select(&H1_SELECTOR)
            .map(|el| el.text().collect())
            .collect()
    }

    fn meta_content(&self, key_attr: &str, key_value: &str) -> Option<String> {
        self.html.select(&META_SELECTOR).find_map(|el| {
            let key = el.value().attr(key_attr)?;
            if key.trim().eq_ignore_ascii_case(key_value) {
                el.value().attr("content").map(str::to_string)
            } else {
                None
            }
        })
    }

    fn elements(&self, kind: ElementKind) -> Vec<PageElement> {
        let selector: &Selector = match kind {
            ElementKind::Iframe => &IFRAME_SELECTOR,
            ElementKind::Anchor => &ANCHOR_SELECTOR,
            ElementKind::Script => &SCRIPT_SELECTOR,
        };
        self.html
            .select(selector)
            .map(PageElement::from_element)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_title_headings_and_meta() {
        let page = HtmlPage::parse(
            r#"<html><head>
                <title> Praxis Dr. Meier </title>
                <meta name="Description" content="Ihre Zahnarztpraxis in Berlin">
                <meta http-equiv="refresh" content="0; url=/neu">
            </head><body><h1>Willkommen</h1><h1>Team</h1></body></html>"#,
        );
        assert_eq!(page.title().as_deref(), Some(" Praxis Dr. Meier "));
        assert_eq!(page.headings(), vec!["Willkommen", "Team"]);
        assert_eq!(
            page.meta_content("name", "description").as_deref(),
            Some("Ihre Zahnarztpraxis in Berlin")
        );
        assert_eq!(
            page.meta_content("http-equiv", "refresh").as_deref(),
            Some("0; url=/neu")
        );
        assert_eq!(page.meta_content("name", "keywords"), None);
    }

    #[test]
    fn elements_keep_document_order_and_attributes() {
        let page = HtmlPage::parse(
            r#"<body>
                <iframe data-src="/lazy"></iframe>
                <a href="/one">Erster <b>Link</b></a>
                <iframe src="https://a.example/"></iframe>
                <script>var x = 1;</script>
            </body>"#,
        );
        let iframes = page.elements(ElementKind::Iframe);
        assert_eq!(iframes.len(), 2);
        assert_eq!(iframes[0].attr("data-src"), Some("/lazy"));
        assert_eq!(iframes[1].attr("SRC"), Some("https://a.example/"));

        let anchors = page.elements(ElementKind::Anchor);
        assert_eq!(anchors[0].text(), "Erster Link");

        let scripts = page.elements(ElementKind::Script);
        assert_eq!(scripts[0].text(), "var x = 1;");
        assert_eq!(scripts[0].attr("src"), None);
    }

    #[test]
    fn empty_markup_has_nothing() {
        let page = HtmlPage::parse("");
        assert_eq!(page.title(), None);
        assert!(page.headings().is_empty());
        assert!(page.elements(ElementKind::Script).is_empty());
    }
}
