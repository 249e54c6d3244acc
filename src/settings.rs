//! Session-wide generation settings
//!
//! One [`GenerationSettings`] instance lives for the whole chat session;
//! the config menu mutates it through [`SettingsUpdate`] so that the set
//! of configurable fields is closed at compile time.

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Gemini model selection for `generateContent` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeminiModel {
    #[default]
    Pro,
    ProVision,
}

impl GeminiModel {
    pub const ALL: [GeminiModel; 2] = [GeminiModel::Pro, GeminiModel::ProVision];

    /// Model ID as it appears in the request URL.
    pub fn wire_id(&self) -> &'static str {
        match self {
            GeminiModel::Pro => "gemini-pro",
            GeminiModel::ProVision => "gemini-pro-vision",
        }
    }
}

impl fmt::Display for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_id())
    }
}

impl FromStr for GeminiModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "gemini-pro" => Ok(GeminiModel::Pro),
            "gemini-pro-vision" => Ok(GeminiModel::ProVision),
            other => Err(Error::InvalidModel(other.to_string())),
        }
    }
}

/// Clamp a temperature to the valid [0, 1] range. NaN maps to 0.
pub fn clamp_temperature(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Sampling parameters sent with every request.
///
/// `None` means "omit from the wire payload", never zero. The temperature
/// field is private so every write path goes through the clamp.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: GeminiModel,
    temperature: f32,
    pub top_k: Option<u32>,
    pub top_p: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: GeminiModel::Pro,
            temperature: 0.7,
            top_k: None,
            top_p: None,
            max_output_tokens: None,
            stop_sequences: Vec::new(),
        }
    }
}

impl GenerationSettings {
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn set_temperature(&mut self, v: f32) {
        self.temperature = clamp_temperature(v);
    }

    /// Apply one settings change.
    ///
    /// Zero (or non-positive, for top-p) values on optional fields mean
    /// "disable" and store as `None`, matching the interactive menu where
    /// entering 0 turns a knob off.
    pub fn apply(&mut self, update: SettingsUpdate) {
        match update {
            SettingsUpdate::Model(model) => self.model = model,
            SettingsUpdate::Temperature(v) => self.set_temperature(v),
            SettingsUpdate::TopK(v) => self.top_k = v.filter(|k| *k > 0),
            SettingsUpdate::TopP(v) => self.top_p = v.filter(|p| *p > 0.0),
            SettingsUpdate::MaxOutputTokens(v) => self.max_output_tokens = v.filter(|t| *t > 0),
            SettingsUpdate::StopSequences(seqs) => self.stop_sequences = seqs,
        }
    }
}

/// One variant per configurable field.
///
/// An unknown field name is unrepresentable here, unlike a stringly-typed
/// `set(field, value)` update.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsUpdate {
    Model(GeminiModel),
    Temperature(f32),
    TopK(Option<u32>),
    TopP(Option<f32>),
    MaxOutputTokens(Option<u32>),
    StopSequences(Vec<String>),
}
