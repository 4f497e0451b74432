use std::collections::BTreeSet;

use regex_lite::{Captures, Regex};

/// Rewrites inline `[[Target]]` / `[[Target|Label]]` references in an
/// already-rendered HTML body. A reference whose target is a known
/// page becomes a link to it; otherwise the label is shown as plain
/// text with a small `?` link to the page's edit form.
///
/// Targets may contain word characters, digits, spaces and hyphens;
/// spaces are mapped to underscores to form the page name. Anything
/// that does not parse as a reference (an unterminated `[[`, a `]`
/// inside the token) is left alone.
pub fn resolve(html: &str, known: &BTreeSet<String>) -> String {
    let re = Regex::new(r"\[\[([\w0-9 -]+)\|?([^\]]*)\]\]").unwrap();
    re.replace_all(html, |caps: &Captures| {
        let target = caps[1].trim();
        let label = match caps[2].trim() {
            "" => target,
            custom => custom,
        };
        let name = target.replace(' ', "_");
        if known.contains(&name) {
            format!(r#"<a href="/{name}">{label}</a>"#)
        } else {
            format!(r#"<span>{label}<a href="/e/{name}">?</a></span>"#)
        }
    })
    .into_owned()
}

#[cfg(test)]
fn names(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_known_target_becomes_link() {
    let out = resolve("<p>see [[About]]</p>", &names(&["Home", "About"]));
    assert_eq!(out, r#"<p>see <a href="/About">About</a></p>"#);
}

#[test]
fn test_unknown_target_gets_placeholder() {
    let out = resolve("go [[New Page|Click Here]]", &names(&["Home"]));
    assert_eq!(
        out,
        r#"go <span>Click Here<a href="/e/New_Page">?</a></span>"#
    );
}

#[test]
fn test_spaced_target_maps_to_underscored_name() {
    let out = resolve("[[My Page]]", &names(&["My_Page"]));
    assert_eq!(out, r#"<a href="/My_Page">My Page</a>"#);
}

#[test]
fn test_custom_label_on_known_target() {
    let out = resolve("[[Home|back home]]", &names(&["Home"]));
    assert_eq!(out, r#"<a href="/Home">back home</a>"#);
}

#[test]
fn test_whitespace_is_trimmed() {
    let out = resolve("[[ Home | start ]]", &names(&["Home"]));
    assert_eq!(out, r#"<a href="/Home">start</a>"#);
}

#[test]
fn test_malformed_references_stay_literal() {
    let known = names(&["Home"]);
    assert_eq!(resolve("[[unterminated", &known), "[[unterminated");
    assert_eq!(resolve("stray ]] brackets", &known), "stray ]] brackets");
    assert_eq!(resolve("[[bro]ken]]", &known), "[[bro]ken]]");
}

#[test]
fn test_references_resolve_left_to_right() {
    let out = resolve("[[Home]] and [[About]]", &names(&["Home"]));
    assert_eq!(
        out,
        r#"<a href="/Home">Home</a> and <span>About<a href="/e/About">?</a></span>"#
    );
}
