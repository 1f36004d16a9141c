//! Filing body extraction.

use std::path::Path;

use scraper::Html;

/// File types whose contents are stored as the filing body.
pub fn is_indexable(name: &str) -> bool {
    matches!(extension(name).as_deref(), Some("htm" | "html" | "xml"))
}

pub fn is_html(name: &str) -> bool {
    matches!(extension(name).as_deref(), Some("htm" | "html"))
}

fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Visible text of an HTML document, one whitespace-collapsed run per
/// text node, joined by newlines. Script and style contents are dropped.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lines = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let in_script = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| matches!(e.name(), "script" | "style"))
        });
        if in_script {
            continue;
        }
        let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines.join("\n")
}

/// Body to store for a file: text for HTML, raw contents for XML, and
/// nothing for other types.
pub fn extract_body(name: &str, contents: &[u8]) -> String {
    if !is_indexable(name) {
        return String::new();
    }
    let raw = String::from_utf8_lossy(contents);
    if is_html(name) {
        html_to_text(&raw)
    } else {
        raw.into_owned()
    }
}
