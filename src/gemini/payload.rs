//! Request payload construction.
//!
//! Combines the session settings with processed content into the outbound
//! `generateContent` body, and picks the effective model for the request.

use super::types::{Content, GenerateContentRequest, GenerationConfig, Part};
use crate::media::ProcessedContent;
use crate::settings::{GeminiModel, GenerationSettings};

/// Caption used when an image is submitted without one.
pub const DEFAULT_IMAGE_CAPTION: &str = "Describe this image";

/// A request body plus the model it must be sent to.
#[derive(Debug, Clone)]
pub struct BuiltRequest {
    pub model: GeminiModel,
    pub request: GenerateContentRequest,
}

/// Build the wire request for one turn.
///
/// Image content forces the vision model for this request only; the
/// session settings are left untouched. Absent optional settings are
/// omitted from `generationConfig` entirely.
pub fn build_request(content: &ProcessedContent, settings: &GenerationSettings) -> BuiltRequest {
    let generation_config = GenerationConfig {
        temperature: settings.temperature(),
        top_k: settings.top_k,
        top_p: settings.top_p,
        max_output_tokens: settings.max_output_tokens,
        stop_sequences: settings.stop_sequences.clone(),
    };

    let (model, parts) = match content {
        ProcessedContent::Text(text) => {
            (settings.model, vec![Part::Text { text: text.clone() }])
        }
        ProcessedContent::Image { caption, image } => {
            let caption = caption
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_IMAGE_CAPTION);
            (
                GeminiModel::ProVision,
                vec![
                    Part::Text {
                        text: caption.to_string(),
                    },
                    Part::InlineData {
                        inline_data: image.clone(),
                    },
                ],
            )
        }
    };

    BuiltRequest {
        model,
        request: GenerateContentRequest {
            contents: vec![Content { role: None, parts }],
            generation_config,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::types::InlineData;
    use crate::settings::SettingsUpdate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_image() -> InlineData {
        InlineData {
            mime_type: "image/jpeg".to_string(),
            data: "aGVsbG8=".to_string(),
        }
    }

    fn generation_config_keys(built: &BuiltRequest) -> Vec<String> {
        let value = serde_json::to_value(&built.request).unwrap();
        value["generationConfig"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect()
    }

    #[test]
    fn test_bare_settings_send_temperature_only() {
        // temperature 0.9, everything else absent: the generation config
        // must be exactly {temperature}.
        let mut settings = GenerationSettings::default();
        settings.apply(SettingsUpdate::Temperature(0.9));

        let built = build_request(&ProcessedContent::Text("hello".to_string()), &settings);
        assert_eq!(generation_config_keys(&built), vec!["temperature"]);

        let value = serde_json::to_value(&built.request).unwrap();
        let sent = value["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((sent - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_absent_optionals_are_omitted_and_set_ones_included() {
        let mut settings = GenerationSettings::default();
        settings.apply(SettingsUpdate::Temperature(0.5));
        settings.apply(SettingsUpdate::TopK(Some(5)));
        settings.apply(SettingsUpdate::StopSequences(vec!["STOP".to_string()]));

        let built = build_request(&ProcessedContent::Text("hi".to_string()), &settings);
        let value = serde_json::to_value(&built.request).unwrap();
        assert_eq!(
            value["generationConfig"],
            json!({
                "temperature": 0.5,
                "topK": 5,
                "stopSequences": ["STOP"]
            })
        );
    }

    #[test]
    fn test_text_request_shape() {
        let settings = GenerationSettings::default();
        let built = build_request(&ProcessedContent::Text("hello".to_string()), &settings);

        assert_eq!(built.model, GeminiModel::Pro);
        let value = serde_json::to_value(&built.request).unwrap();
        assert_eq!(
            value["contents"],
            json!([{ "parts": [{ "text": "hello" }] }])
        );
    }

    #[test]
    fn test_image_forces_vision_model_without_mutating_settings() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.model, GeminiModel::Pro);

        let content = ProcessedContent::Image {
            caption: Some("What is this?".to_string()),
            image: sample_image(),
        };
        let built = build_request(&content, &settings);

        assert_eq!(built.model, GeminiModel::ProVision);
        assert_eq!(settings.model, GeminiModel::Pro);
    }

    #[test]
    fn test_image_parts_are_caption_then_inline_data() {
        let settings = GenerationSettings::default();
        let content = ProcessedContent::Image {
            caption: Some("What is this?".to_string()),
            image: sample_image(),
        };
        let built = build_request(&content, &settings);

        let value = serde_json::to_value(&built.request).unwrap();
        assert_eq!(
            value["contents"][0]["parts"],
            json!([
                { "text": "What is this?" },
                { "inline_data": { "mime_type": "image/jpeg", "data": "aGVsbG8=" } }
            ])
        );
    }

    #[test]
    fn test_missing_caption_gets_default() {
        let settings = GenerationSettings::default();
        for caption in [None, Some("".to_string()), Some("   ".to_string())] {
            let content = ProcessedContent::Image {
                caption,
                image: sample_image(),
            };
            let built = build_request(&content, &settings);
            let value = serde_json::to_value(&built.request).unwrap();
            assert_eq!(
                value["contents"][0]["parts"][0]["text"],
                json!(DEFAULT_IMAGE_CAPTION)
            );
        }
    }

    #[test]
    fn test_generation_config_key_order_is_deterministic() {
        let mut settings = GenerationSettings::default();
        settings.apply(SettingsUpdate::TopK(Some(2)));
        settings.apply(SettingsUpdate::TopP(Some(0.5)));
        settings.apply(SettingsUpdate::MaxOutputTokens(Some(10)));
        settings.apply(SettingsUpdate::StopSequences(vec!["x".to_string()]));

        let built = build_request(&ProcessedContent::Text("hi".to_string()), &settings);
        let body = serde_json::to_string(&built.request).unwrap();
        let position = |key: &str| {
            body.find(&format!("\"{key}\""))
                .unwrap_or_else(|| panic!("{key} missing from {body}"))
        };
        assert!(position("temperature") < position("topK"));
        assert!(position("topK") < position("topP"));
        assert!(position("topP") < position("maxOutputTokens"));
        assert!(position("maxOutputTokens") < position("stopSequences"));
    }
}
