use pulldown_cmark::{html, Parser};

/// Renders raw page text (CommonMark) to an HTML fragment.
///
/// This is the first stage of the display pipeline; link resolution
/// runs over the result, so `[[...]]` references must survive this
/// stage verbatim. CommonMark treats an unresolvable bracket run as
/// literal text and the HTML writer does not escape brackets, which
/// is exactly what the second stage needs.
pub fn render(text: &str) -> String {
    let parser = Parser::new(text);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

#[test]
fn test_renders_paragraphs_and_emphasis() {
    let out = render("some *emphasized* text");
    assert_eq!(out, "<p>some <em>emphasized</em> text</p>\n");
}

#[test]
fn test_wiki_references_pass_through_verbatim() {
    let out = render("see [[Home]] and [[New Page|Click Here]]");
    assert!(out.contains("[[Home]]"));
    assert!(out.contains("[[New Page|Click Here]]"));
}
