//! Google Gemini implementation of [`AiCollaborator`].
//!
//! Text, structured, grounded and image requests go through
//! `models/{model}:generateContent`. Video generation starts a long-running
//! `predictLongRunning` operation, polls it at a fixed interval until done,
//! then downloads the clip.
//!
//! The API key comes from `ai.api_key` in the config or the
//! `GEMINI_API_KEY` environment variable.

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, instrument, warn};

use super::{
    AiCollaborator, AiReply, AiRequest, AiTool, GroundingSource, InlineImage, SourceKind,
    VideoClip, VideoRequest,
};
use crate::error::AiError;
use crate::storage::AiConfig;

/// Environment variable for the Gemini API key
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

/// Part of content. Unknown part kinds are kept opaque.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thought: Option<bool>,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<ChunkRef>,
    maps: Option<ChunkRef>,
}

#[derive(Debug, Deserialize)]
struct ChunkRef {
    #[serde(default)]
    uri: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Operation {
    name: String,
    #[serde(default)]
    done: bool,
    error: Option<ApiErrorBody>,
    response: Option<Value>,
}

// ============================================================================
// Client
// ============================================================================

pub struct GeminiClient {
    api_key: String,
    base_url: String,
    client: Client,
    video_poll_interval: Duration,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(api_key, &AiConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: &AiConfig) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            client: Client::new(),
            video_poll_interval: Duration::from_secs(config.video_poll_secs),
        }
    }

    /// Build from config, falling back to `GEMINI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `AiError::MissingApiKey` if neither is set.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| env::var(GEMINI_API_KEY_ENV).ok().filter(|k| !k.is_empty()))
            .ok_or(AiError::MissingApiKey {
                env: GEMINI_API_KEY_ENV,
            })?;
        Ok(Self::with_config(key, config))
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.video_poll_interval = interval;
        self
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{path}?key={}", self.base_url, self.api_key)
    }

    fn build_request(request: &AiRequest) -> GenerateContentRequest {
        let mut parts = Vec::new();
        if let Some(image) = &request.image {
            parts.push(Part::InlineData {
                inline_data: Blob {
                    mime_type: image.mime_type.clone(),
                    data: image.data.clone(),
                },
            });
        }
        parts.push(Part::Text {
            text: request.prompt.clone(),
            thought: None,
        });

        let mut generation = serde_json::Map::new();
        if let Some(shape) = &request.shape {
            generation.insert("responseMimeType".into(), json!("application/json"));
            generation.insert("responseSchema".into(), shape.to_schema());
        }
        if let Some(output) = &request.image_output {
            generation.insert(
                "imageConfig".into(),
                json!({ "aspectRatio": output.aspect_ratio, "imageSize": output.size.as_str() }),
            );
        }
        if let Some(budget) = request.thinking_budget {
            generation.insert("thinkingConfig".into(), json!({ "thinkingBudget": budget }));
        }

        let tools = request
            .tools
            .iter()
            .map(|tool| match tool {
                AiTool::GoogleSearch => json!({ "googleSearch": {} }),
                AiTool::GoogleMaps => json!({ "googleMaps": {} }),
            })
            .collect();

        let tool_config = request.location.map(|loc| {
            json!({
                "retrievalConfig": {
                    "latLng": { "latitude": loc.latitude, "longitude": loc.longitude }
                }
            })
        });

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts,
            }],
            generation_config: (!generation.is_empty()).then(|| Value::Object(generation)),
            tools,
            tool_config,
        }
    }

    fn into_reply(response: GenerateContentResponse) -> Result<AiReply, AiError> {
        let candidate = response
            .candidates
            .and_then(|c| c.into_iter().next())
            .ok_or(AiError::EmptyResponse)?;

        let mut reply = AiReply::default();
        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            match part {
                Part::Text { text, thought } if thought != Some(true) => reply.text.push_str(&text),
                Part::InlineData { inline_data } => reply.images.push(InlineImage {
                    mime_type: inline_data.mime_type,
                    data: inline_data.data,
                }),
                _ => {}
            }
        }

        let chunks = candidate
            .grounding_metadata
            .map(|g| g.grounding_chunks)
            .unwrap_or_default();
        for chunk in chunks {
            if let Some(web) = chunk.web {
                reply.sources.push(GroundingSource {
                    kind: SourceKind::Web,
                    title: web.title,
                    uri: web.uri,
                });
            } else if let Some(place) = chunk.maps {
                reply.sources.push(GroundingSource {
                    kind: SourceKind::Maps,
                    title: place.title,
                    uri: place.uri,
                });
            }
        }
        Ok(reply)
    }

    /// Map an unsuccessful status to an error, exposing the API's message.
    fn map_api_error(status: u16, body: &str) -> AiError {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| body.to_owned(), |e| e.message);

        match status {
            429 => AiError::QuotaExceeded(Self::extract_quota_message(&message)),
            _ => AiError::Api { status, message },
        }
    }

    fn extract_quota_message(message: &str) -> String {
        // "... Please retry in 6.406453963s."
        if let Some(pos) = message.find("Please retry in ") {
            let after = &message[pos + "Please retry in ".len()..];
            if let Some(end) = after.find('s') {
                if let Ok(seconds) = after[..end].parse::<f64>() {
                    return format!(
                        "AI service quota exceeded. Please try again in {} seconds.",
                        seconds.ceil() as u64
                    );
                }
            }
        }
        "AI service quota exceeded. Please wait a moment and try again.".to_owned()
    }

    async fn send_json(&self, request: reqwest::RequestBuilder) -> Result<String, AiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn poll_operation(&self, mut operation: Operation) -> Result<Value, AiError> {
        while !operation.done {
            tokio::time::sleep(self.video_poll_interval).await;
            debug!(operation = %operation.name, "polling video operation");
            let body = self
                .send_json(self.client.get(self.build_url(&operation.name)))
                .await?;
            operation = serde_json::from_str(&body)
                .map_err(|e| AiError::Operation(format!("unreadable operation status: {e}")))?;
        }
        if let Some(err) = operation.error {
            return Err(AiError::Operation(err.message));
        }
        operation
            .response
            .ok_or_else(|| AiError::Operation("operation finished without a response".into()))
    }

    fn video_uri(response: &Value) -> Option<&str> {
        response
            .pointer("/generateVideoResponse/generatedSamples/0/video/uri")
            .or_else(|| response.pointer("/generatedVideos/0/video/uri"))
            .and_then(Value::as_str)
    }

    fn download_url(&self, uri: &str) -> Result<url::Url, AiError> {
        let mut url = url::Url::parse(uri)
            .map_err(|e| AiError::Operation(format!("invalid video URI '{uri}': {e}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl AiCollaborator for GeminiClient {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn request(&self, request: &AiRequest) -> Result<AiReply, AiError> {
        let url = self.build_url(&format!("models/{}:generateContent", request.model));
        let body = Self::build_request(request);

        debug!("Sending request to Gemini API");
        let text = self.send_json(self.client.post(&url).json(&body)).await?;

        let response: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, "Failed to parse Gemini response");
            AiError::Api {
                status: 200,
                message: format!("unreadable response: {e}"),
            }
        })?;
        if let Some(err) = response.error {
            return Err(AiError::Api {
                status: 200,
                message: err.message,
            });
        }
        Self::into_reply(response)
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn generate_video(&self, request: &VideoRequest) -> Result<VideoClip, AiError> {
        let mut instance = json!({ "prompt": request.prompt });
        if let Some(frame) = &request.start_frame {
            instance["image"] = json!({
                "bytesBase64Encoded": frame.data,
                "mimeType": frame.mime_type,
            });
        }
        let body = json!({
            "instances": [instance],
            "parameters": {
                "aspectRatio": request.aspect.as_str(),
                "resolution": request.resolution,
                "sampleCount": 1,
            }
        });

        let url = self.build_url(&format!("models/{}:predictLongRunning", request.model));
        let text = self.send_json(self.client.post(&url).json(&body)).await?;
        let operation: Operation = serde_json::from_str(&text)
            .map_err(|e| AiError::Operation(format!("unreadable operation: {e}")))?;

        let response = self.poll_operation(operation).await?;
        let uri = Self::video_uri(&response)
            .ok_or_else(|| AiError::Operation("no video in operation response".into()))?;

        let download = self.client.get(self.download_url(uri)?).send().await?;
        let status = download.status();
        if !status.is_success() {
            return Err(AiError::Api {
                status: status.as_u16(),
                message: "video download failed".into(),
            });
        }
        let mime_type = download
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("video/mp4")
            .to_owned();
        let bytes = download.bytes().await?.to_vec();
        debug!(bytes = bytes.len(), "video downloaded");
        Ok(VideoClip { mime_type, bytes })
    }
}

impl Debug for GeminiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{FieldType, ImageOutput, ImageSize, ResponseShape};
    use crate::location::Coordinates;

    #[test]
    fn structured_request_declares_schema() {
        let req = AiRequest::new("m", "plan")
            .with_shape(ResponseShape::list_of(&[("meal", FieldType::String)]));
        let body = serde_json::to_value(GeminiClient::build_request(&req)).unwrap();
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "plan");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn grounded_request_carries_tools_and_location() {
        let req = AiRequest::new("m", "gyms")
            .with_tool(AiTool::GoogleMaps)
            .with_location(Coordinates::new(1.5, 2.5));
        let body = serde_json::to_value(GeminiClient::build_request(&req)).unwrap();
        assert_eq!(body["tools"][0], json!({ "googleMaps": {} }));
        assert_eq!(body["toolConfig"]["retrievalConfig"]["latLng"]["latitude"], 1.5);
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn image_request_puts_image_before_prompt() {
        let req = AiRequest::new("m", "make it blue")
            .with_image(InlineImage {
                mime_type: "image/png".into(),
                data: "AAAA".into(),
            })
            .with_image_output(ImageOutput {
                aspect_ratio: "1:1".into(),
                size: ImageSize::TwoK,
            });
        let body = serde_json::to_value(GeminiClient::build_request(&req)).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(body["contents"][0]["parts"][1]["text"], "make it blue");
        assert_eq!(body["generationConfig"]["imageConfig"]["imageSize"], "2K");
    }

    #[test]
    fn reply_collects_text_images_and_sources() {
        let raw = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "Hello " },
                    { "inlineData": { "mimeType": "image/png", "data": "QQ==" } },
                    { "functionCall": { "name": "x", "args": {} } },
                    { "text": "world" }
                ]},
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "uri": "https://a", "title": "A" } },
                    { "maps": { "uri": "https://m", "title": "Gym" } }
                ]}
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let reply = GeminiClient::into_reply(response).unwrap();
        assert_eq!(reply.text, "Hello world");
        assert_eq!(reply.images.len(), 1);
        assert_eq!(reply.sources.len(), 2);
        assert_eq!(reply.web_sources().len(), 1);
        assert_eq!(reply.sources[1].kind, SourceKind::Maps);
    }

    #[test]
    fn no_candidates_is_empty_response() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            GeminiClient::into_reply(response),
            Err(AiError::EmptyResponse)
        ));
    }

    #[test]
    fn quota_errors_get_friendly_message() {
        let body = r#"{"error":{"message":"Quota exceeded. Please retry in 6.4s."}}"#;
        match GeminiClient::map_api_error(429, body) {
            AiError::QuotaExceeded(msg) => assert!(msg.contains("7 seconds")),
            other => panic!("unexpected {other:?}"),
        }
        match GeminiClient::map_api_error(403, "forbidden") {
            AiError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "forbidden");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn download_url_appends_key() {
        let client = GeminiClient::new("k1");
        let url = client
            .download_url("https://files.example/v1/f:download?alt=media")
            .unwrap();
        assert_eq!(url.as_str(), "https://files.example/v1/f:download?alt=media&key=k1");
    }

    #[test]
    fn debug_redacts_key() {
        let client = GeminiClient::new("super-secret");
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
