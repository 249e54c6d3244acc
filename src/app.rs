//! Interactive chat loop
//!
//! Pure glue between the terminal, the media pipeline, and the Gemini
//! service. Every failure is rendered as a message and the loop resumes;
//! only `sair` or end of input terminates it.

use crate::gemini::{GeminiClient, GenerateService};
use crate::media::{classify_path, ContentCategory, MediaPipeline, ProcessedContent};
use crate::settings::{GeminiModel, GenerationSettings, SettingsUpdate};
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

/// Process-level configuration read once at startup.
///
/// A missing API key is not a startup error; it surfaces per-request as
/// `MissingCredential` so the user still gets an interactive session.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
        }
    }
}

const WELCOME: &str = "\
Welcome to the Gemini chat!
Available commands:
- 'config': change generation settings
- 'arquivo': send a file (image, PDF, code, ...)
- 'sair': end the chat";

/// Drives one interactive session over a generate service and the media
/// pipeline.
pub struct ChatApp {
    gemini: Box<dyn GenerateService>,
    media: MediaPipeline,
}

impl ChatApp {
    /// Construct from environment configuration.
    pub fn new() -> Self {
        let config = Config::from_env();
        if config.gemini_api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; requests will fail until it is provided");
        }

        Self::with_services(
            Box::new(GeminiClient::new(config.gemini_api_key)),
            MediaPipeline::new(),
        )
    }

    /// Build an app from concrete service dependencies.
    ///
    /// This is primarily useful for integration tests that need to inject
    /// mocks.
    pub fn with_services(gemini: Box<dyn GenerateService>, media: MediaPipeline) -> Self {
        Self { gemini, media }
    }

    pub fn settings(&self) -> &GenerationSettings {
        self.gemini.settings()
    }

    pub fn apply_update(&mut self, update: SettingsUpdate) {
        self.gemini.update_settings(update);
    }

    /// Run the chat loop until `sair` or end of input.
    pub async fn run<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> std::io::Result<()> {
        writeln!(output, "{WELCOME}")?;

        loop {
            write!(output, "\nYou: ")?;
            output.flush()?;

            let Some(line) = read_line(input)? else {
                writeln!(output)?;
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match line.to_ascii_lowercase().as_str() {
                "sair" => {
                    writeln!(output, "Ending chat.")?;
                    break;
                }
                "config" => self.configure(input, output)?,
                "arquivo" => self.submit_file(input, output).await?,
                _ => {
                    self.send(ProcessedContent::Text(line.to_string()), output)
                        .await?
                }
            }
        }

        Ok(())
    }

    async fn send<W: Write>(
        &self,
        content: ProcessedContent,
        output: &mut W,
    ) -> std::io::Result<()> {
        match self.gemini.generate(&content).await {
            Ok(reply) => writeln!(output, "\nGemini: {reply}"),
            Err(e) => writeln!(output, "\nError: {e}"),
        }
    }

    fn configure<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> std::io::Result<()> {
        let settings = self.settings();
        writeln!(output, "\nCurrent settings:")?;
        writeln!(output, "Model: {}", settings.model)?;
        writeln!(output, "Temperature: {}", settings.temperature())?;
        writeln!(output, "Top K: {}", display_optional(settings.top_k))?;
        writeln!(output, "Top P: {}", display_optional(settings.top_p))?;
        writeln!(
            output,
            "Max output tokens: {}",
            display_optional(settings.max_output_tokens)
        )?;
        writeln!(
            output,
            "Stop sequences: {}",
            if settings.stop_sequences.is_empty() {
                "(none)".to_string()
            } else {
                settings.stop_sequences.join(", ")
            }
        )?;

        writeln!(output, "\nWhat do you want to change?")?;
        writeln!(output, "1. Model (gemini-pro, gemini-pro-vision)")?;
        writeln!(output, "2. Temperature (0.0 to 1.0)")?;
        writeln!(output, "3. Top K")?;
        writeln!(output, "4. Top P")?;
        writeln!(output, "5. Max output tokens")?;
        writeln!(output, "6. Stop sequences")?;
        writeln!(output, "7. Back to chat")?;
        write!(output, "\nChoose an option (1-7): ")?;
        output.flush()?;

        let Some(option) = read_line(input)? else {
            return Ok(());
        };
        let option = option.trim();
        if option.is_empty() || option == "7" {
            return Ok(());
        }

        let prompt = match option {
            "1" => "Model name: ",
            "2" => "Temperature (0.0 to 1.0): ",
            "3" => "Top K (0 to disable): ",
            "4" => "Top P (0 to disable): ",
            "5" => "Max output tokens (0 to disable): ",
            "6" => "Stop sequences, comma separated (empty to clear): ",
            other => {
                writeln!(output, "Unknown option: {other}")?;
                return Ok(());
            }
        };

        write!(output, "{prompt}")?;
        output.flush()?;
        let Some(value) = read_line(input)? else {
            return Ok(());
        };

        match parse_update(option, value.trim()) {
            Ok(update) => {
                self.apply_update(update);
                writeln!(output, "Settings updated.")?;
            }
            Err(message) => writeln!(output, "Error: {message}")?,
        }

        Ok(())
    }

    async fn submit_file<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> std::io::Result<()> {
        write!(output, "File path: ")?;
        output.flush()?;
        let Some(path_line) = read_line(input)? else {
            return Ok(());
        };
        let path_line = path_line.trim();
        if path_line.is_empty() {
            return Ok(());
        }

        let path = Path::new(path_line);
        if !path.exists() {
            writeln!(output, "File not found: {path_line}")?;
            return Ok(());
        }

        writeln!(output, "\nAvailable content types:")?;
        for category in ContentCategory::ALL {
            writeln!(output, "- {category}")?;
        }
        write!(output, "Content type (empty to auto-detect): ")?;
        output.flush()?;
        let Some(category_line) = read_line(input)? else {
            return Ok(());
        };
        let category_line = category_line.trim();

        let override_category = if category_line.is_empty() {
            None
        } else {
            match category_line.parse::<ContentCategory>() {
                Ok(category) => Some(category),
                Err(e) => {
                    writeln!(output, "\nError: {e}")?;
                    return Ok(());
                }
            }
        };

        let category = classify_path(path, override_category);
        let content = match self.media.process_file(path, category) {
            Ok(content) => content,
            Err(e) => {
                writeln!(output, "\nError: {e}")?;
                return Ok(());
            }
        };

        let content = match content {
            ProcessedContent::Image { image, .. } => {
                write!(output, "Describe or ask something about the image: ")?;
                output.flush()?;
                let Some(caption_line) = read_line(input)? else {
                    return Ok(());
                };
                let caption = caption_line.trim();
                ProcessedContent::Image {
                    caption: (!caption.is_empty()).then(|| caption.to_string()),
                    image,
                }
            }
            text => text,
        };

        self.send(content, output).await
    }
}

impl Default for ChatApp {
    fn default() -> Self {
        Self::new()
    }
}

fn read_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        Ok(None)
    } else {
        Ok(Some(line))
    }
}

fn display_optional<T: fmt::Display>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "off".to_string(),
    }
}

/// Split the menu's stop-sequence input on commas, trimming whitespace and
/// dropping empty items. A sequence containing a literal comma cannot be
/// entered here; set it through [`SettingsUpdate::StopSequences`] instead.
fn parse_stop_sequences(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Turn a menu option and its raw value into a settings update.
///
/// Returns a human-readable message on bad input, in the same shape clap
/// value parsers use.
fn parse_update(option: &str, value: &str) -> Result<SettingsUpdate, String> {
    match option {
        "1" => value
            .parse::<GeminiModel>()
            .map(SettingsUpdate::Model)
            .map_err(|e| e.to_string()),
        "2" => value
            .parse::<f32>()
            .map(SettingsUpdate::Temperature)
            .map_err(|_| format!("Invalid temperature '{value}'. Expected a number")),
        "3" => value
            .parse::<u32>()
            .map(|v| SettingsUpdate::TopK(Some(v)))
            .map_err(|_| format!("Invalid top K '{value}'. Expected a whole number")),
        "4" => value
            .parse::<f32>()
            .map(|v| SettingsUpdate::TopP(Some(v)))
            .map_err(|_| format!("Invalid top P '{value}'. Expected a number")),
        "5" => value
            .parse::<u32>()
            .map(|v| SettingsUpdate::MaxOutputTokens(Some(v)))
            .map_err(|_| format!("Invalid token limit '{value}'. Expected a whole number")),
        "6" => Ok(SettingsUpdate::StopSequences(parse_stop_sequences(value))),
        other => Err(format!("Unknown option: {other}")),
    }
}
