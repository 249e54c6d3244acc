//! Source-code syntax highlighting.
//!
//! Produces HTML markup with line numbers. The language comes from an
//! explicit hint (usually the file extension) when given, otherwise it is
//! guessed from the first line of the source.

use crate::{Error, Result};
use std::fmt::Write as _;
use std::sync::OnceLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

const THEME: &str = "base16-ocean.dark";

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> &'static Theme {
    static THEMES: OnceLock<ThemeSet> = OnceLock::new();
    &THEMES.get_or_init(ThemeSet::load_defaults).themes[THEME]
}

/// Highlight source code into HTML with line numbers.
pub fn highlight(source: &str, language_hint: Option<&str>) -> Result<String> {
    let syntaxes = syntax_set();
    let syntax = match language_hint {
        Some(hint) => syntaxes.find_syntax_by_token(hint).ok_or_else(|| {
            Error::MediaProcessing(format!("no syntax definition for language '{hint}'"))
        })?,
        None => syntaxes.find_syntax_by_first_line(source).ok_or_else(|| {
            Error::MediaProcessing("could not determine the source language".to_string())
        })?,
    };

    let mut highlighter = HighlightLines::new(syntax, theme());
    let mut output = String::from("<pre class=\"highlight\">\n");
    for (index, line) in LinesWithEndings::from(source).enumerate() {
        let regions = highlighter
            .highlight_line(line, syntaxes)
            .map_err(|e| Error::MediaProcessing(format!("highlighting failed: {e}")))?;
        let rendered = styled_line_to_highlighted_html(&regions, IncludeBackground::No)
            .map_err(|e| Error::MediaProcessing(format!("highlighting failed: {e}")))?;
        let _ = write!(output, "<span class=\"lineno\">{:>4}</span> ", index + 1);
        output.push_str(&rendered);
    }
    output.push_str("</pre>\n");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_with_extension_hint() {
        let output = highlight("fn main() {}\n", Some("rs")).unwrap();
        assert!(output.starts_with("<pre class=\"highlight\">"));
        assert!(output.contains("<span class=\"lineno\">   1</span>"));
        assert!(output.contains("main"));
    }

    #[test]
    fn test_line_numbers_cover_every_line() {
        let output = highlight("let a = 1;\nlet b = 2;\nlet c = 3;\n", Some("rs")).unwrap();
        for number in 1..=3 {
            assert!(output.contains(&format!("<span class=\"lineno\">   {number}</span>")));
        }
    }

    #[test]
    fn test_unknown_hint_is_rejected() {
        let err = highlight("hello", Some("not-a-language")).unwrap_err();
        assert!(matches!(err, Error::MediaProcessing(_)));
    }

    #[test]
    fn test_guess_from_shebang_line() {
        let output = highlight("#!/usr/bin/env python\nprint('hi')\n", None).unwrap();
        assert!(output.contains("print"));
    }

    #[test]
    fn test_undeterminable_language_is_rejected() {
        let err = highlight("no recognizable syntax here", None).unwrap_err();
        assert!(matches!(err, Error::MediaProcessing(_)));
    }
}
