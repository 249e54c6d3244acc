//! Markdown rendering and HTML canonicalization.
//!
//! Both are total: the Markdown parser accepts any input and the HTML
//! parser recovers from malformed markup the way browsers do, so these
//! preprocessors only fail at the file-read stage.

use pulldown_cmark::{html, Parser};
use scraper::Html;

/// Render Markdown source to an HTML string.
pub fn render_markdown(source: &str) -> String {
    let mut rendered = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut rendered, Parser::new(source));
    rendered
}

/// Parse HTML and re-serialize it in canonical form.
///
/// Unclosed tags are closed and stray markup is re-homed; the result is
/// always a full `<html><head>...<body>...` document.
pub fn canonicalize_html(source: &str) -> String {
    let document = Html::parse_document(source);
    if !document.errors.is_empty() {
        tracing::debug!(
            "HTML parser recovered from {} error(s) in input",
            document.errors.len()
        );
    }
    document.root_element().html()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_markdown_heading_and_paragraph() {
        let rendered = render_markdown("# Hello\n\nSome *emphasis* here.");
        assert_eq!(
            rendered,
            "<h1>Hello</h1>\n<p>Some <em>emphasis</em> here.</p>\n"
        );
    }

    #[test]
    fn test_render_markdown_empty_input() {
        assert_eq!(render_markdown(""), "");
    }

    #[test]
    fn test_render_markdown_code_block() {
        let rendered = render_markdown("```\nlet x = 1;\n```");
        assert!(rendered.contains("<pre><code>"));
        assert!(rendered.contains("let x = 1;"));
    }

    #[test]
    fn test_canonicalize_html_closes_unclosed_tags() {
        let canonical = canonicalize_html("<p>first<p>second");
        assert!(canonical.contains("<p>first</p>"));
        assert!(canonical.contains("<p>second</p>"));
    }

    #[test]
    fn test_canonicalize_html_produces_full_document() {
        let canonical = canonicalize_html("<div>hi</div>");
        assert!(canonical.starts_with("<html>"));
        assert!(canonical.contains("<body><div>hi</div></body>"));
    }
}
