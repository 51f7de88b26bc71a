//! Gemini `generateContent` client for finger-count classification.

use base64::Engine;
use serde::{Deserialize, Serialize};

use super::{ApiKeyStore, ClassifierSetupError, ClassifyError, GestureClassifier};
use crate::config::ClassifierSettings;
use crate::frame::Frame;
use crate::gesture::Gesture;
use crate::http_client;

/// Instruction sent alongside every image.
pub const PROMPT: &str = "Analyze the hand gesture in this image. Respond with one of these exact strings based on the number of fingers clearly extended: 'ONE_FINGER', 'TWO_FINGERS', 'THREE_FINGERS', 'FOUR_FINGERS', 'FIVE_FINGERS'. If no fingers or a fist is shown, or the gesture is ambiguous, respond with 'UNKNOWN'. Do not add any explanation or decoration.";

const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 2],
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<CandidateWire>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateWire {
    #[serde(default)]
    content: Option<ContentWire>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentWire {
    #[serde(default)]
    parts: Vec<PartWire>,
}

#[derive(Debug, Default, Deserialize)]
struct PartWire {
    #[serde(default)]
    text: Option<String>,
}

/// Blocking client for a single configured model.
#[derive(Clone)]
pub struct GeminiClassifier {
    url: String,
    api_key: String,
    max_response_bytes: usize,
}

impl std::fmt::Debug for GeminiClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClassifier")
            .field("url", &self.url)
            .field("max_response_bytes", &self.max_response_bytes)
            .finish_non_exhaustive()
    }
}

impl GeminiClassifier {
    pub fn new(settings: &ClassifierSettings, api_key: impl Into<String>) -> Self {
        let endpoint = settings.endpoint.trim_end_matches('/');
        Self {
            url: format!("{endpoint}/v1beta/models/{}:generateContent", settings.model),
            api_key: api_key.into(),
            max_response_bytes: settings.max_response_bytes,
        }
    }

    /// Build a client using the key found by [`ApiKeyStore::resolve`].
    pub fn from_settings(settings: &ClassifierSettings) -> Result<Self, ClassifierSetupError> {
        let store = ApiKeyStore::new()?;
        let api_key = store
            .resolve(&settings.api_key_env)?
            .ok_or_else(|| ClassifierSetupError::MissingApiKey {
                env_var: settings.api_key_env.clone(),
            })?;
        Ok(Self::new(settings, api_key))
    }

    fn request_body(frame: &Frame) -> Result<String, ClassifyError> {
        let request = GenerateContentRequest {
            contents: [Content {
                parts: [
                    Part::Text { text: PROMPT },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: &frame.mime_type,
                            data: base64::engine::general_purpose::STANDARD.encode(&frame.bytes),
                        },
                    },
                ],
            }],
        };
        serde_json::to_string(&request).map_err(|err| ClassifyError::Unknown(err.to_string()))
    }
}

impl GestureClassifier for GeminiClassifier {
    fn classify(&self, frame: &Frame) -> Result<Gesture, ClassifyError> {
        let body = Self::request_body(frame)?;
        let req = http_client::agent()
            .post(&self.url)
            .set("Accept", "application/json")
            .set("Content-Type", "application/json")
            .set(API_KEY_HEADER, self.api_key.trim());

        let response = match req.send_string(&body) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = http_client::read_body_limited(response, MAX_ERROR_BODY_BYTES)
                    .unwrap_or_else(|err| err);
                let err = map_status_error(code, body);
                tracing::warn!("Gesture classification failed: {err}");
                return Err(err);
            }
            Err(ureq::Error::Transport(err)) => {
                tracing::warn!("Gesture classification transport failure: {err}");
                return Err(ClassifyError::Transport(err.to_string()));
            }
        };

        let body = http_client::read_body_limited(response, self.max_response_bytes)
            .map_err(ClassifyError::Unknown)?;
        let text = parse_response_text(&body)?;
        Ok(Gesture::from_response(&text))
    }
}

fn map_status_error(code: u16, body: String) -> ClassifyError {
    if code == 429 || body.contains("RESOURCE_EXHAUSTED") {
        return ClassifyError::QuotaExhausted(body);
    }
    if (500..=599).contains(&code) || body.contains("Rpc failed") {
        return ClassifyError::ServerError(format!("HTTP {code}: {body}"));
    }
    ClassifyError::Unknown(format!("HTTP {code}: {body}"))
}

/// Concatenated text parts of the first candidate; empty when there are none.
fn parse_response_text(body: &str) -> Result<String, ClassifyError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(ClassifyError::Unknown("Empty response body".to_string()));
    }
    let parsed: GenerateContentResponse = serde_json::from_str(trimmed)
        .map_err(|err| ClassifyError::Unknown(format!("{err}: {trimmed}")))?;
    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();
    Ok(text)
}
