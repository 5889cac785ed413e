//! Generative AI collaborator.
//!
//! Every "smart" feature of the dashboard is a prompt sent to a remote
//! model. The core depends only on [`AiCollaborator`]; [`GeminiClient`] is
//! the HTTP implementation and tests substitute scripted fakes.
//!
//! Failures are returned as [`AiError`] and never retried here. Views turn
//! them into an error message via [`crate::view::RemoteView`].

mod features;
mod gemini;
mod shape;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AiError;
use crate::location::Coordinates;

pub use features::{
    analyze_symptom, aqi_advice, diet_plan, edit_image, generate_image, generate_video,
    health_news, mental_exercises, nearby_facilities, weather_activities, AqiStatus,
    FacilityResult, MealRecommendation, MentalExercise, MentalGoal, NewsItem,
    WeatherActivitySuggestion, FALLBACK_NEWS_SOURCE, FALLBACK_NEWS_URL,
};
pub use gemini::{GeminiClient, GEMINI_API_KEY_ENV};
pub use shape::{parse_list, FieldType, ResponseShape, ShapeField};

/// Server-side tools the model may use while answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiTool {
    GoogleSearch,
    GoogleMaps,
}

/// Base64 image passed to or returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64 payload without the `data:` prefix.
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::OneK => "1K",
            ImageSize::TwoK => "2K",
            ImageSize::FourK => "4K",
        }
    }
}

impl std::str::FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "1K" => Ok(ImageSize::OneK),
            "2K" => Ok(ImageSize::TwoK),
            "4K" => Ok(ImageSize::FourK),
            other => Err(format!("unknown image size '{other}' (expected 1K, 2K or 4K)")),
        }
    }
}

/// Requested image output for image-generation models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOutput {
    pub aspect_ratio: String,
    pub size: ImageSize,
}

/// One prompt to the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiRequest {
    pub model: String,
    pub prompt: String,
    /// Declared shape for structured (JSON) answers.
    pub shape: Option<ResponseShape>,
    pub tools: Vec<AiTool>,
    /// Location hint for map grounding.
    pub location: Option<Coordinates>,
    /// Image sent ahead of the prompt text.
    pub image: Option<InlineImage>,
    pub image_output: Option<ImageOutput>,
    pub thinking_budget: Option<u32>,
}

impl AiRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            shape: None,
            tools: Vec::new(),
            location: None,
            image: None,
            image_output: None,
            thinking_budget: None,
        }
    }

    pub fn with_shape(mut self, shape: ResponseShape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_tool(mut self, tool: AiTool) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_location(mut self, location: Coordinates) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_image_output(mut self, output: ImageOutput) -> Self {
        self.image_output = Some(output);
        self
    }

    pub fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Web,
    Maps,
}

/// A citation the model grounded its answer on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub kind: SourceKind,
    pub title: String,
    pub uri: String,
}

/// What came back from one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiReply {
    /// Concatenated text parts.
    pub text: String,
    pub images: Vec<InlineImage>,
    pub sources: Vec<GroundingSource>,
}

impl AiReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn web_sources(&self) -> Vec<GroundingSource> {
        self.sources
            .iter()
            .filter(|s| s.kind == SourceKind::Web)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoAspect {
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

impl VideoAspect {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoAspect::Landscape => "16:9",
            VideoAspect::Portrait => "9:16",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoRequest {
    pub model: String,
    pub prompt: String,
    pub aspect: VideoAspect,
    pub resolution: String,
    pub start_frame: Option<InlineImage>,
}

/// Downloaded video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoClip {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// The remote generative model, as seen by the dashboard.
#[async_trait]
pub trait AiCollaborator: Send + Sync {
    /// Send one prompt and return the model's answer.
    async fn request(&self, request: &AiRequest) -> Result<AiReply, AiError>;

    /// Generate a short video clip. Not every collaborator can.
    async fn generate_video(&self, _request: &VideoRequest) -> Result<VideoClip, AiError> {
        Err(AiError::Operation("video generation not supported".into()))
    }
}
