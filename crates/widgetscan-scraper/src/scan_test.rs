use super::*;
use crate::document::HtmlPage;

const BASE: &str = "https://www.zahnarzt-meier.de/";

fn scan_html(html: &str) -> PageScan {
    let registry = VendorRegistry::builtin();
    let page = HtmlPage::parse(html);
    EvidenceScanner::new(&registry).scan(&page, BASE)
}

fn sources(scan: &PageScan) -> Vec<EvidenceSource> {
    scan.evidence.iter().map(|e| e.source_type).collect()
}

// -----------------------------------------------------------------------
// iframes
// -----------------------------------------------------------------------

#[test]
fn iframe_src_detects_doctolib() {
    let scan = scan_html(r#"<iframe src="https://www.doctolib.de/booking/xyz"></iframe>"#);
    assert_eq!(scan.widget_keys, vec!["doctolib"]);
    assert_eq!(scan.evidence.len(), 1);
    assert_eq!(scan.evidence[0].source_type, EvidenceSource::Iframe);
    assert_eq!(scan.evidence[0].value, "https://www.doctolib.de/booking/xyz");
    assert_eq!(scan.evidence[0].text, None);
}

#[test]
fn iframe_contributes_one_item_per_matching_attribute() {
    let scan = scan_html(
        r#"<iframe src="https://www.doctolib.de/a" data-src="about:blank"
                   data-url="https://www.doctolib.de/b"></iframe>"#,
    );
    assert_eq!(scan.widget_keys, vec!["doctolib"]);
    let values: Vec<&str> = scan.evidence.iter().map(|e| e.value.as_str()).collect();
    assert_eq!(values, vec!["https://www.doctolib.de/a", "https://www.doctolib.de/b"]);
}

#[test]
fn lazy_iframe_is_resolved_against_base() {
    let scan = scan_html(r#"<iframe data-src="//embed.tawk.to/123/default"></iframe>"#);
    assert_eq!(scan.evidence[0].value, "https://embed.tawk.to/123/default");
    assert_eq!(scan.widget_keys, vec!["tawk"]);
}

// -----------------------------------------------------------------------
// links
// -----------------------------------------------------------------------

#[test]
fn link_url_match_carries_text() {
    let scan = scan_html(
        r#"<a href="https://www.jameda.de/berlin/dr-meier/">  Bewerten Sie
             uns </a>"#,
    );
    assert_eq!(scan.evidence.len(), 1);
    let item = &scan.evidence[0];
    assert_eq!(item.source_type, EvidenceSource::Link);
    assert_eq!(item.vendor_key, "jameda");
    assert_eq!(item.text.as_deref(), Some("Bewerten Sie uns"));
}

#[test]
fn link_falls_back_to_visible_text() {
    let scan = scan_html(r#"<a href="/termin">Online-Termin bei <b>Doctolib</b></a>"#);
    assert_eq!(scan.evidence.len(), 1);
    let item = &scan.evidence[0];
    assert_eq!(item.vendor_key, "doctolib");
    assert_eq!(item.value, "https://www.zahnarzt-meier.de/termin");
    assert_eq!(item.text.as_deref(), Some("Online-Termin bei Doctolib"));
}

#[test]
fn link_checks_href_then_data_href() {
    let scan = scan_html(
        r#"<a href="/kontakt" data-href="https://calendly.com/praxis-meier">Kontakt</a>"#,
    );
    assert_eq!(scan.evidence.len(), 1);
    assert_eq!(scan.evidence[0].vendor_key, "calendly");
    assert_eq!(scan.evidence[0].value, "https://calendly.com/praxis-meier");
}

#[test]
fn anchor_without_href_is_skipped() {
    let scan = scan_html(r#"<a name="doctolib">Doctolib</a>"#);
    assert!(scan.evidence.is_empty());
}

// -----------------------------------------------------------------------
// scripts
// -----------------------------------------------------------------------

#[test]
fn script_src_is_matched() {
    let scan = scan_html(r#"<script async src="//static.hotjar.com/c/hotjar-1.js"></script>"#);
    assert_eq!(scan.evidence.len(), 1);
    assert_eq!(scan.evidence[0].source_type, EvidenceSource::Script);
    assert_eq!(scan.evidence[0].value, "https://static.hotjar.com/c/hotjar-1.js");
}

#[test]
fn script_with_src_ignores_inline_text() {
    let scan = scan_html(r#"<script src="/app.js">Doctolib.init();</script>"#);
    assert!(scan.evidence.is_empty());
}

#[test]
fn inline_bare_hint_yields_one_item() {
    let scan = scan_html("<script>Doctolib.init({ id: 42 });</script>");
    assert_eq!(scan.evidence.len(), 1);
    let item = &scan.evidence[0];
    assert_eq!(item.source_type, EvidenceSource::InlineScript);
    assert_eq!(item.vendor_key, "doctolib");
    assert_eq!(item.value, "Doctolib");
}

#[test]
fn inline_bare_vendor_name_yields_one_item() {
    for (body, value) in [
        ("Doctolib", "Doctolib"),
        (r#"var provider = "Doctolib";"#, "Doctolib"),
        ("loadProvider('doctolib', 42);", "doctolib"),
    ] {
        let scan = scan_html(&format!("<script>{body}</script>"));
        assert_eq!(scan.evidence.len(), 1, "body: {body}");
        let item = &scan.evidence[0];
        assert_eq!(item.source_type, EvidenceSource::InlineScript);
        assert_eq!(item.vendor_key, "doctolib");
        assert_eq!(item.value, value);
    }
}

#[test]
fn bare_vendor_names_are_reported_once_per_vendor() {
    let scan = scan_html(
        "<script>var a = 'doctolib'; var b = 'Doctolib'; var host = 'embed.tawk.to';</script>",
    );
    let found: Vec<(&str, &str)> = scan
        .evidence
        .iter()
        .map(|e| (e.vendor_key.as_str(), e.value.as_str()))
        .collect();
    assert_eq!(found, vec![("doctolib", "doctolib"), ("tawk", "embed.tawk.to")]);
}

#[test]
fn bare_names_are_not_added_when_a_hint_matched() {
    let scan = scan_html("<script>Doctolib.init({ praxis: 'doctolib' });</script>");
    assert_eq!(scan.evidence.len(), 1);
    assert_eq!(scan.evidence[0].value, "Doctolib");
}

#[test]
fn inline_hint_without_group_uses_script_preview() {
    let body = r#"var bookingWidget = "doctolib";"#;
    let scan = scan_html(&format!("<script>{body}</script>"));
    // "booking" and "Widget" are two spans of the same hint pattern.
    assert_eq!(scan.evidence.len(), 2);
    assert!(scan.evidence.iter().all(|e| e.value == body));
    assert_eq!(scan.widget_keys, vec!["doctolib"]);
}

#[test]
fn inline_preview_is_truncated_and_full_text_is_matched() {
    let body = format!("// {}\nopenChat('doctolib');", "x".repeat(100));
    let scan = scan_html(&format!("<script>{body}</script>"));
    assert_eq!(scan.evidence.len(), 1);
    let item = &scan.evidence[0];
    assert_eq!(item.vendor_key, "doctolib");
    assert_eq!(item.value.chars().count(), 80);
    assert!(body.starts_with(&item.value));
}

#[test]
fn inline_quoted_url_is_the_candidate() {
    let scan = scan_html(
        r#"<script>(function(){var s=document.createElement('script');
            s.src='https://embed.tawk.to/5f1234/default';})();</script>"#,
    );
    assert_eq!(scan.evidence.len(), 1);
    assert_eq!(scan.evidence[0].vendor_key, "tawk");
    assert_eq!(scan.evidence[0].value, "https://embed.tawk.to/5f1234/default");
}

#[test]
fn analytics_queue_calls_are_not_deduplicated() {
    let scan = scan_html(
        "<script>window.dataLayer = window.dataLayer || [];
         function gtag(){dataLayer.push(arguments);}
         gtag('js', new Date());
         gtag('config', 'G-ABC123');</script>",
    );
    assert_eq!(scan.evidence.len(), 3);
    assert!(scan
        .evidence
        .iter()
        .all(|e| e.vendor_key == "google_analytics" && e.value == "gtag"));
    assert_eq!(scan.widget_keys, vec!["google_analytics"]);
}

#[test]
fn empty_inline_script_is_skipped() {
    let scan = scan_html("<script>   </script>");
    assert!(scan.evidence.is_empty());
}

// -----------------------------------------------------------------------
// meta refresh
// -----------------------------------------------------------------------

#[test]
fn meta_refresh_target_is_matched() {
    let scan = scan_html(
        r#"<head><meta http-equiv="Refresh" content="0; URL='https://www.jameda.de/praxis'"></head>"#,
    );
    assert_eq!(scan.evidence.len(), 1);
    assert_eq!(scan.evidence[0].source_type, EvidenceSource::MetaRefresh);
    assert_eq!(scan.evidence[0].value, "https://www.jameda.de/praxis");
}

#[test]
fn meta_refresh_target_parsing() {
    assert_eq!(
        meta_refresh_target("5;url=/neu").as_deref(),
        Some("/neu")
    );
    assert_eq!(
        meta_refresh_target(r#"0; URL="https://a.example/x"; foo"#).as_deref(),
        Some("https://a.example/x")
    );
    assert_eq!(meta_refresh_target("30"), None);
    assert_eq!(meta_refresh_target("0; url="), None);
}

// -----------------------------------------------------------------------
// ordering and invariants
// -----------------------------------------------------------------------

#[test]
fn evidence_follows_location_order_not_document_order() {
    let scan = scan_html(
        r#"<html><head>
            <script>gtag('js', new Date());</script>
            <script src="https://static.hotjar.com/c/hotjar-1.js"></script>
            <meta http-equiv="refresh" content="10; url=https://www.doctolib.de/praxis">
        </head><body>
            <a href="https://tawk.to/chat/abc">Chat</a>
            <iframe src="https://www.jameda.de/widget"></iframe>
        </body></html>"#,
    );
    assert_eq!(
        sources(&scan),
        vec![
            EvidenceSource::MetaRefresh,
            EvidenceSource::Iframe,
            EvidenceSource::Link,
            EvidenceSource::InlineScript,
            EvidenceSource::Script,
        ]
    );
    assert_eq!(
        scan.widget_keys,
        vec!["doctolib", "jameda", "tawk", "google_analytics", "hotjar"]
    );
}

#[test]
fn widget_keys_are_distinct_and_backed_by_evidence() {
    let scan = scan_html(
        r#"<iframe src="https://www.doctolib.de/a"></iframe>
           <a href="https://www.doctolib.de/b">Termin</a>
           <script src="https://www.doctolib.de/c.js"></script>"#,
    );
    assert_eq!(scan.widget_keys, vec!["doctolib"]);
    assert_eq!(scan.evidence.len(), 3);
    for key in &scan.widget_keys {
        assert!(scan.evidence.iter().any(|e| &e.vendor_key == key));
    }
}

#[test]
fn page_without_vendors_is_empty() {
    let scan = scan_html(
        r#"<title>Praxis</title><a href="/impressum">Impressum</a>
           <script src="/js/app.js"></script>"#,
    );
    assert_eq!(scan, PageScan::default());
}

#[test]
fn scanning_is_deterministic() {
    let html = r#"<iframe src="https://www.doctolib.de/a"></iframe>
                  <script>Doctolib.init(); var chat = 1;</script>"#;
    assert_eq!(scan_html(html), scan_html(html));
}

#[test]
fn unresolvable_reference_is_matched_raw() {
    let registry = VendorRegistry::builtin();
    let page = HtmlPage::parse(r#"<a href="doctolib-termin">Termin</a>"#);
    let scan = EvidenceScanner::new(&registry).scan(&page, "");
    assert_eq!(scan.evidence.len(), 1);
    assert_eq!(scan.evidence[0].value, "doctolib-termin");
}

// -----------------------------------------------------------------------
// helpers
// -----------------------------------------------------------------------

#[test]
fn resolve_url_variants() {
    assert_eq!(
        resolve_url("https://praxis.example/team/", "../termin"),
        "https://praxis.example/termin"
    );
    assert_eq!(
        resolve_url("not a base", "https://www.doctolib.de/x"),
        "https://www.doctolib.de/x"
    );
    assert_eq!(resolve_url("", "/relative"), "/relative");
}

#[test]
fn normalize_whitespace_collapses_runs() {
    assert_eq!(normalize_whitespace("  a \n\t b  "), "a b");
    assert_eq!(normalize_whitespace("   "), "");
}

// -----------------------------------------------------------------------
// parser independence
// -----------------------------------------------------------------------

struct StubPage {
    scripts: Vec<PageElement>,
}

impl PageDocument for StubPage {
    fn title(&self) -> Option<String> {
        None
    }

    fn headings(&self) -> Vec<String> {
        Vec::new()
    }

    fn meta_content(&self, _key_attr: &str, _key_value: &str) -> Option<String> {
        None
    }

    fn elements(&self, kind: ElementKind) -> Vec<PageElement> {
        match kind {
            ElementKind::Script => self.scripts.clone(),
            ElementKind::Iframe | ElementKind::Anchor => Vec::new(),
        }
    }
}

#[test]
fn scanner_accepts_any_page_document() {
    let registry = VendorRegistry::builtin();
    let page = StubPage {
        scripts: vec![
            PageElement::new(&[("SRC", "https://js.stripe.com/v3/")], ""),
            PageElement::new(&[("src", "  ")], "fbq('init', '123');"),
        ],
    };
    let scan = EvidenceScanner::new(&registry).scan(&page, BASE);
    assert_eq!(scan.widget_keys, vec!["stripe", "meta_pixel"]);
    assert_eq!(sources(&scan), vec![EvidenceSource::Script, EvidenceSource::InlineScript]);
}
