//! HTTP client for the Generative Language API.
//!
//! Generation goes through the Imagen `:predict` method, edits through the
//! Gemini `:generateContent` method with image and text response modalities.
use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{
    EditRequest, GenerateModel, GenerateRequest, GeneratedImage, ImageService, ServiceError,
};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GENERATE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_GENERATE_PRO_MODEL: &str = "imagen-4.0-ultra-generate-001";
pub const DEFAULT_EDIT_MODEL: &str = "gemini-2.5-flash-image-preview";

const OUTPUT_MIME_TYPE: &str = "image/png";

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub generate_model: String,
    pub generate_pro_model: String,
    pub edit_model: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            generate_model: DEFAULT_GENERATE_MODEL.to_string(),
            generate_pro_model: DEFAULT_GENERATE_PRO_MODEL.to_string(),
            edit_model: DEFAULT_EDIT_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl ApiConfig {
    pub fn model_for(&self, tier: GenerateModel) -> &str {
        match tier {
            GenerateModel::Standard => &self.generate_model,
            GenerateModel::Pro => &self.generate_pro_model,
        }
    }

    pub fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.api_base.trim_end_matches('/'),
            model,
            method
        )
    }
}

// ---------------------------------------------------------------------------
// Imagen :predict
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct PredictRequest<'a> {
    instances: Vec<PromptInstance<'a>>,
    parameters: PredictParameters<'a>,
}

#[derive(Debug, Serialize)]
struct PromptInstance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters<'a> {
    sample_count: u32,
    aspect_ratio: &'a str,
    output_options: OutputOptions<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputOptions<'a> {
    mime_type: &'a str,
}

impl<'a> From<&'a GenerateRequest> for PredictRequest<'a> {
    fn from(request: &'a GenerateRequest) -> Self {
        Self {
            instances: vec![PromptInstance {
                prompt: &request.prompt,
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: request.aspect_ratio.as_str(),
                output_options: OutputOptions {
                    mime_type: OUTPUT_MIME_TYPE,
                },
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default)]
    pub bytes_base64_encoded: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// First prediction that carries image bytes.
pub fn first_prediction_image(response: &PredictResponse) -> Result<GeneratedImage, ServiceError> {
    let prediction = response
        .predictions
        .iter()
        .find(|p| p.bytes_base64_encoded.as_deref().is_some_and(|d| !d.is_empty()))
        .ok_or(ServiceError::NoImages)?;
    let data = prediction.bytes_base64_encoded.as_deref().unwrap_or_default();
    let mime = prediction.mime_type.as_deref().unwrap_or(OUTPUT_MIME_TYPE);
    GeneratedImage::from_base64(data, mime)
}

// ---------------------------------------------------------------------------
// Gemini :generateContent
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataRef<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataRef<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: [&'static str; 2],
}

impl<'a> From<&'a EditRequest> for GenerateContentRequest<'a> {
    /// Parts are ordered: source images, then the mask, then the prompt text.
    fn from(request: &'a EditRequest) -> Self {
        let mut parts: Vec<RequestPart<'a>> = request
            .images
            .iter()
            .chain(request.mask.iter())
            .map(|payload| RequestPart::Inline {
                inline_data: InlineDataRef {
                    mime_type: &payload.mime_type,
                    data: &payload.base64,
                },
            })
            .collect();
        parts.push(RequestPart::Text {
            text: &request.prompt,
        });

        Self {
            contents: vec![RequestContent { parts }],
            generation_config: GenerationConfig {
                response_modalities: ["IMAGE", "TEXT"],
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default, rename = "inlineData", alias = "inline_data")]
    pub inline_data: Option<InlineData>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InlineData {
    #[serde(default, rename = "mimeType", alias = "mime_type")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub data: String,
}

/// First part of the first candidate that contains image bytes.
pub fn first_inline_image(
    response: &GenerateContentResponse,
) -> Result<GeneratedImage, ServiceError> {
    let inline = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .and_then(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.inline_data.as_ref())
                .find(|inline| !inline.data.is_empty())
        })
        .ok_or(ServiceError::NoImageData)?;
    let mime = inline.mime_type.as_deref().unwrap_or(OUTPUT_MIME_TYPE);
    GeneratedImage::from_base64(&inline.data, mime)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Blocking client; calls run on the orchestrator's worker thread.
#[derive(Debug)]
pub struct GeminiClient {
    http: Client,
    config: ApiConfig,
}

impl GeminiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn post_json<B, R>(&self, model: &str, method: &str, body: &B) -> Result<R, ServiceError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ServiceError::MissingApiKey)?;
        let endpoint = self.config.endpoint(model, method);
        log::info!("POST {endpoint}");

        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()?;
        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            log::warn!("{model}:{method} rejected with {status}");
            return Err(ServiceError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

impl ImageService for GeminiClient {
    fn generate(&self, request: &GenerateRequest) -> Result<GeneratedImage, ServiceError> {
        let model = self.config.model_for(request.model);
        let response: PredictResponse =
            self.post_json(model, "predict", &PredictRequest::from(request))?;
        first_prediction_image(&response)
    }

    fn edit(&self, request: &EditRequest) -> Result<GeneratedImage, ServiceError> {
        let response: GenerateContentResponse = self.post_json(
            &self.config.edit_model,
            "generateContent",
            &GenerateContentRequest::from(request),
        )?;
        first_inline_image(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AspectRatio, ImagePayload};
    use serde_json::json;

    #[test]
    fn predict_body_asks_for_one_png() {
        let request =
            GenerateRequest::new("a lighthouse", GenerateModel::Standard, AspectRatio::Landscape)
                .unwrap();
        let body = serde_json::to_value(PredictRequest::from(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "instances": [{ "prompt": "a lighthouse" }],
                "parameters": {
                    "sampleCount": 1,
                    "aspectRatio": "16:9",
                    "outputOptions": { "mimeType": "image/png" }
                }
            })
        );
    }

    #[test]
    fn edit_body_orders_images_mask_then_prompt() {
        let request = EditRequest::new(
            "add a hat",
            vec![
                ImagePayload::new("image/jpeg", "AAAA"),
                ImagePayload::new("image/webp", "BBBB"),
            ],
            Some(ImagePayload::new("image/png", "MMMM")),
        )
        .unwrap();
        let body = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{
                    "parts": [
                        { "inlineData": { "mimeType": "image/jpeg", "data": "AAAA" } },
                        { "inlineData": { "mimeType": "image/webp", "data": "BBBB" } },
                        { "inlineData": { "mimeType": "image/png", "data": "MMMM" } },
                        { "text": "add a hat" }
                    ]
                }],
                "generationConfig": { "responseModalities": ["IMAGE", "TEXT"] }
            })
        );
    }

    #[test]
    fn picks_first_image_bearing_part() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is your edit" },
                        { "inlineData": { "mimeType": "image/png", "data": "aGVsbG8=" } },
                        { "inlineData": { "mimeType": "image/png", "data": "d29ybGQ=" } }
                    ]
                }
            }]
        }))
        .unwrap();
        let image = first_inline_image(&response).unwrap();
        assert_eq!(image.bytes, b"hello");
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn text_only_edit_response_is_no_image_data() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "I can't do that" }] } }]
        }))
        .unwrap();
        assert!(matches!(
            first_inline_image(&response),
            Err(ServiceError::NoImageData)
        ));
        assert!(matches!(
            first_inline_image(&GenerateContentResponse::default()),
            Err(ServiceError::NoImageData)
        ));
    }

    #[test]
    fn empty_predictions_are_no_images() {
        let response: PredictResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            first_prediction_image(&response),
            Err(ServiceError::NoImages)
        ));

        let response: PredictResponse = serde_json::from_value(json!({
            "predictions": [{ "bytesBase64Encoded": "aGVsbG8=", "mimeType": "image/png" }]
        }))
        .unwrap();
        assert_eq!(first_prediction_image(&response).unwrap().bytes, b"hello");
    }

    #[test]
    fn missing_key_fails_before_sending() {
        let client = GeminiClient::new(ApiConfig::default()).unwrap();
        let request =
            GenerateRequest::new("x", GenerateModel::Standard, AspectRatio::Square).unwrap();
        assert!(matches!(
            client.generate(&request),
            Err(ServiceError::MissingApiKey)
        ));
    }

    #[test]
    fn endpoint_joins_base_model_and_method() {
        let config = ApiConfig {
            api_base: "http://localhost:9000/v1beta/".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(
            config.endpoint(config.model_for(GenerateModel::Pro), "predict"),
            "http://localhost:9000/v1beta/models/imagen-4.0-ultra-generate-001:predict"
        );
    }
}
