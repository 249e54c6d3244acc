//! Content classification and file preprocessing
//!
//! Maps submitted files to a [`ContentCategory`] and converts them into a
//! canonical [`ProcessedContent`] ready for the payload builder: re-encoded
//! image bytes, extracted PDF text, rendered Markdown/HTML, or highlighted
//! source code.

pub mod code;
pub mod image;
pub mod markup;
#[cfg(feature = "pdf")]
pub mod pdf;

use crate::gemini::types::InlineData;
use crate::{Error, Result};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Classification of a submitted payload. Determines preprocessing and
/// the wire shape of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCategory {
    Text,
    Image,
    Pdf,
    Html,
    Markdown,
    Code,
}

impl ContentCategory {
    pub const ALL: [ContentCategory; 6] = [
        ContentCategory::Text,
        ContentCategory::Image,
        ContentCategory::Pdf,
        ContentCategory::Html,
        ContentCategory::Markdown,
        ContentCategory::Code,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ContentCategory::Text => "text",
            ContentCategory::Image => "image",
            ContentCategory::Pdf => "pdf",
            ContentCategory::Html => "html",
            ContentCategory::Markdown => "markdown",
            ContentCategory::Code => "code",
        }
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContentCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ContentCategory::Text),
            "image" => Ok(ContentCategory::Image),
            "pdf" => Ok(ContentCategory::Pdf),
            "html" => Ok(ContentCategory::Html),
            "markdown" => Ok(ContentCategory::Markdown),
            "code" => Ok(ContentCategory::Code),
            other => Err(Error::InvalidCategory(other.to_string())),
        }
    }
}

/// Resolve the category for a file: an explicit override wins, otherwise
/// the guessed media type decides. Code is never inferred, only chosen
/// explicitly.
pub fn classify_path(path: &Path, override_category: Option<ContentCategory>) -> ContentCategory {
    if let Some(category) = override_category {
        return category;
    }

    match mime_guess::from_path(path).first() {
        Some(mime) if mime.type_() == mime_guess::mime::IMAGE => ContentCategory::Image,
        Some(mime) if mime == mime_guess::mime::APPLICATION_PDF => ContentCategory::Pdf,
        Some(mime) if mime == mime_guess::mime::TEXT_HTML => ContentCategory::Html,
        Some(mime) if mime.essence_str() == "text/markdown" => ContentCategory::Markdown,
        _ => ContentCategory::Text,
    }
}

/// Canonical form of a submitted payload, created fresh per request.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessedContent {
    Text(String),
    Image {
        caption: Option<String>,
        image: InlineData,
    },
}

/// PDF text extraction capability.
///
/// Injected at pipeline construction; when absent, PDF submissions fail
/// with [`Error::CapabilityUnavailable`] before any file or network I/O.
pub trait PdfTextExtractor: Send + Sync {
    /// Extract the text of every page in document order, joined by newlines.
    fn extract_text(&self, path: &Path) -> Result<String>;
}

/// Dispatches file preprocessing by content category.
pub struct MediaPipeline {
    pdf: Option<Box<dyn PdfTextExtractor>>,
}

impl Default for MediaPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaPipeline {
    /// Build a pipeline with the default capability set.
    pub fn new() -> Self {
        #[cfg(feature = "pdf")]
        let pdf: Option<Box<dyn PdfTextExtractor>> = Some(Box::new(pdf::PdfExtractor));
        #[cfg(not(feature = "pdf"))]
        let pdf: Option<Box<dyn PdfTextExtractor>> = None;

        Self { pdf }
    }

    pub fn without_pdf_support() -> Self {
        Self { pdf: None }
    }

    pub fn with_pdf_extractor(extractor: Box<dyn PdfTextExtractor>) -> Self {
        Self {
            pdf: Some(extractor),
        }
    }

    pub fn pdf_supported(&self) -> bool {
        self.pdf.is_some()
    }

    /// Convert a file into its canonical transmission form.
    pub fn process_file(&self, path: &Path, category: ContentCategory) -> Result<ProcessedContent> {
        match category {
            ContentCategory::Image => Ok(ProcessedContent::Image {
                caption: None,
                image: image::process_image(path)?,
            }),
            ContentCategory::Pdf => {
                let extractor = self
                    .pdf
                    .as_deref()
                    .ok_or(Error::CapabilityUnavailable("PDF"))?;
                Ok(ProcessedContent::Text(extractor.extract_text(path)?))
            }
            ContentCategory::Markdown => {
                let source = fs::read_to_string(path)?;
                Ok(ProcessedContent::Text(markup::render_markdown(&source)))
            }
            ContentCategory::Html => {
                let source = fs::read_to_string(path)?;
                Ok(ProcessedContent::Text(markup::canonicalize_html(&source)))
            }
            ContentCategory::Code => {
                let source = fs::read_to_string(path)?;
                let hint = path.extension().and_then(|ext| ext.to_str());
                Ok(ProcessedContent::Text(code::highlight(&source, hint)?))
            }
            ContentCategory::Text => Ok(ProcessedContent::Text(fs::read_to_string(path)?)),
        }
    }
}
