//! Default PDF text-extraction capability, compiled in behind the `pdf`
//! feature. Builds without it still run; PDF submissions then report the
//! capability as unavailable.

use super::PdfTextExtractor;
use crate::{Error, Result};
use std::path::Path;

pub struct PdfExtractor;

impl PdfTextExtractor for PdfExtractor {
    fn extract_text(&self, path: &Path) -> Result<String> {
        pdf_extract::extract_text(path)
            .map_err(|e| Error::MediaProcessing(format!("failed to extract PDF text: {e}")))
    }
}
