//! Interactive terminal chat client for the Google Gemini API
//!
//! Holds one mutable set of generation settings per session, preprocesses
//! submitted files (images, PDFs, Markdown, HTML, source code) into a
//! canonical form, and performs one `generateContent` request per turn.

pub mod app;
pub mod error;
pub mod gemini;
pub mod media;
pub mod settings;

pub use error::{Error, Result};
