//! Typed dashboard features on top of [`AiCollaborator`].
//!
//! Each function builds the prompt for one view, sends it, and turns the
//! answer into that view's result type. Structured answers that do not
//! match their declared shape come back as empty lists; transport and API
//! failures are returned as errors for the view to display.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::shape::{parse_list, FieldType, ResponseShape};
use super::{
    AiCollaborator, AiRequest, AiTool, GroundingSource, ImageOutput, ImageSize, VideoAspect,
    VideoClip, VideoRequest,
};
use crate::activity::ActivityLog;
use crate::error::AiError;
use crate::location::Coordinates;
use crate::media::DataUrl;
use crate::storage::AiConfig;

pub const FALLBACK_NEWS_URL: &str = "https://health.google.com";
pub const FALLBACK_NEWS_SOURCE: &str = "Global Health News";
const NEWS_TIMESTAMP: &str = "Live Now";
const NEWS_ITEMS: usize = 5;
const NEWS_MIN_LINE_CHARS: usize = 20;
const NEWS_TITLE_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecommendation {
    pub meal: String,
    pub calories: f64,
    pub protein: String,
    pub carbs: String,
    pub fats: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub source: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityResult {
    pub text: String,
    pub places: Vec<GroundingSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AqiStatus {
    /// The model answers in prose; no numeric index is extracted.
    pub index: u32,
    pub category: String,
    pub recommendation: String,
    pub sources: Vec<GroundingSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherActivitySuggestion {
    pub recommendation: String,
    pub sources: Vec<GroundingSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MentalGoal {
    Focus,
    Stress,
    Concentration,
}

impl MentalGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            MentalGoal::Focus => "Focus",
            MentalGoal::Stress => "Stress",
            MentalGoal::Concentration => "Concentration",
        }
    }
}

impl std::str::FromStr for MentalGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "focus" => Ok(MentalGoal::Focus),
            "stress" => Ok(MentalGoal::Stress),
            "concentration" => Ok(MentalGoal::Concentration),
            other => Err(format!("unknown goal '{other}' (focus, stress, concentration)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentalExercise {
    pub title: String,
    pub description: String,
    pub steps: Vec<String>,
    pub benefit: String,
    pub category: String,
}

fn meal_shape() -> ResponseShape {
    ResponseShape::list_of(&[
        ("meal", FieldType::String),
        ("calories", FieldType::Number),
        ("protein", FieldType::String),
        ("carbs", FieldType::String),
        ("fats", FieldType::String),
        ("reason", FieldType::String),
    ])
}

fn exercise_shape() -> ResponseShape {
    ResponseShape::list_of(&[
        ("title", FieldType::String),
        ("description", FieldType::String),
        ("steps", FieldType::StringList),
        ("benefit", FieldType::String),
        ("category", FieldType::String),
    ])
}

/// Breakfast, lunch and dinner suggestions for today's activities.
pub async fn diet_plan<C: AiCollaborator + ?Sized>(
    ai: &C,
    config: &AiConfig,
    activities: &ActivityLog,
) -> Result<Vec<MealRecommendation>, AiError> {
    let summary = activities.summary();
    let summary = if summary.is_empty() {
        "Sedentary/Minimal activity".to_string()
    } else {
        summary
    };
    let prompt = format!(
        "Based on today's activities: {summary}. Suggest a high-nutrition meal plan (Breakfast, Lunch, Dinner)."
    );
    let reply = ai
        .request(&AiRequest::new(&config.text_model, prompt).with_shape(meal_shape()))
        .await?;
    Ok(parse_list(&reply.text))
}

/// Up to five search-grounded headlines.
pub async fn health_news<C: AiCollaborator + ?Sized>(
    ai: &C,
    config: &AiConfig,
) -> Result<Vec<NewsItem>, AiError> {
    let prompt = "Fetch the latest 5 global health, fitness, and medical breakthroughs from the last 24 hours. Provide titles, summaries, and source names.";
    let reply = ai
        .request(&AiRequest::new(&config.text_model, prompt).with_tool(AiTool::GoogleSearch))
        .await?;

    let sources = reply.web_sources();
    let items = reply
        .text
        .lines()
        .filter(|line| line.chars().count() > NEWS_MIN_LINE_CHARS)
        .take(NEWS_ITEMS)
        .enumerate()
        .map(|(i, line)| {
            let source = sources.get(i);
            NewsItem {
                title: format!("{}...", line.chars().take(NEWS_TITLE_CHARS).collect::<String>()),
                summary: line.to_string(),
                url: source.map_or_else(|| FALLBACK_NEWS_URL.to_string(), |s| s.uri.clone()),
                source: source.map_or_else(|| FALLBACK_NEWS_SOURCE.to_string(), |s| s.title.clone()),
                timestamp: NEWS_TIMESTAMP.to_string(),
            }
        })
        .collect();
    Ok(items)
}

/// Map-grounded search for gyms, clinics, pools... near `location`.
pub async fn nearby_facilities<C: AiCollaborator + ?Sized>(
    ai: &C,
    config: &AiConfig,
    query: &str,
    location: Coordinates,
) -> Result<FacilityResult, AiError> {
    let request = AiRequest::new(&config.maps_model, format!("Find {query} near my current location."))
        .with_tool(AiTool::GoogleMaps)
        .with_location(location);
    let reply = ai.request(&request).await?;
    Ok(FacilityResult {
        text: reply.text,
        places: reply.sources,
    })
}

/// Square image from a text prompt; `None` if the model returned no image.
pub async fn generate_image<C: AiCollaborator + ?Sized>(
    ai: &C,
    config: &AiConfig,
    prompt: &str,
    size: ImageSize,
) -> Result<Option<DataUrl>, AiError> {
    let request = AiRequest::new(&config.image_model, prompt).with_image_output(ImageOutput {
        aspect_ratio: "1:1".into(),
        size,
    });
    let reply = ai.request(&request).await?;
    Ok(reply.images.into_iter().next().map(DataUrl::from))
}

/// Edit `source` according to `prompt`; `None` if no image came back.
pub async fn edit_image<C: AiCollaborator + ?Sized>(
    ai: &C,
    config: &AiConfig,
    prompt: &str,
    source: &DataUrl,
) -> Result<Option<DataUrl>, AiError> {
    let request = AiRequest::new(&config.image_edit_model, prompt).with_image(source.to_inline_image());
    let reply = ai.request(&request).await?;
    Ok(reply.images.into_iter().next().map(DataUrl::from))
}

/// 720p clip, optionally animated from a start frame.
pub async fn generate_video<C: AiCollaborator + ?Sized>(
    ai: &C,
    config: &AiConfig,
    prompt: &str,
    aspect: VideoAspect,
    start_frame: Option<&DataUrl>,
) -> Result<VideoClip, AiError> {
    let request = VideoRequest {
        model: config.video_model.clone(),
        prompt: prompt.to_string(),
        aspect,
        resolution: "720p".into(),
        start_frame: start_frame.map(DataUrl::to_inline_image),
    };
    ai.generate_video(&request).await
}

/// Search-grounded air quality advice for `location`.
pub async fn aqi_advice<C: AiCollaborator + ?Sized>(
    ai: &C,
    config: &AiConfig,
    location: &str,
) -> Result<AqiStatus, AiError> {
    let prompt = format!("What is the current AQI in {location}? Give survival advice.");
    let reply = ai
        .request(&AiRequest::new(&config.text_model, prompt).with_tool(AiTool::GoogleSearch))
        .await?;
    Ok(AqiStatus {
        index: 0,
        category: "Verified Info".into(),
        sources: reply.web_sources(),
        recommendation: reply.text,
    })
}

pub async fn weather_activities<C: AiCollaborator + ?Sized>(
    ai: &C,
    config: &AiConfig,
    location: &str,
) -> Result<WeatherActivitySuggestion, AiError> {
    let prompt = format!("Current weather in {location} and activities?");
    let reply = ai
        .request(&AiRequest::new(&config.text_model, prompt).with_tool(AiTool::GoogleSearch))
        .await?;
    Ok(WeatherActivitySuggestion {
        sources: reply.web_sources(),
        recommendation: reply.text,
    })
}

pub async fn mental_exercises<C: AiCollaborator + ?Sized>(
    ai: &C,
    config: &AiConfig,
    goal: MentalGoal,
) -> Result<Vec<MentalExercise>, AiError> {
    let prompt = format!("Exercises for {}", goal.as_str());
    let reply = ai
        .request(&AiRequest::new(&config.text_model, prompt).with_shape(exercise_shape()))
        .await?;
    let exercises: Vec<MentalExercise> = parse_list(&reply.text);
    debug!(count = exercises.len(), goal = goal.as_str(), "mental exercises received");
    Ok(exercises)
}

/// Free-text analysis from the reasoning model.
pub async fn analyze_symptom<C: AiCollaborator + ?Sized>(
    ai: &C,
    config: &AiConfig,
    symptom: &str,
    activity_level: &str,
) -> Result<String, AiError> {
    let prompt = format!("Symptom: {symptom}. Activity: {activity_level}.");
    let request = AiRequest::new(&config.reasoning_model, prompt)
        .with_thinking_budget(config.thinking_budget);
    Ok(ai.request(&request).await?.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::NewActivity;
    use crate::ai::{AiReply, InlineImage, SourceKind};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a fixed answer and records what it was asked.
    struct Scripted {
        reply: AiReply,
        seen: Mutex<Vec<AiRequest>>,
    }

    impl Scripted {
        fn new(reply: AiReply) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn last(&self) -> AiRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl AiCollaborator for Scripted {
        async fn request(&self, request: &AiRequest) -> Result<AiReply, AiError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    fn web(title: &str, uri: &str) -> GroundingSource {
        GroundingSource {
            kind: SourceKind::Web,
            title: title.into(),
            uri: uri.into(),
        }
    }

    #[tokio::test]
    async fn diet_plan_prompt_and_parse() {
        let ai = Scripted::new(AiReply::text(
            r#"[{"meal":"Oats","calories":420,"protein":"15g","carbs":"60g","fats":"9g","reason":"fuel"}]"#,
        ));
        let mut log = ActivityLog::new();
        log.log(NewActivity::default(), chrono::Utc::now());

        let meals = diet_plan(&ai, &AiConfig::default(), &log).await.unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].calories, 420.0);

        let req = ai.last();
        assert!(req.prompt.contains("Running for 30 mins"));
        assert!(req.shape.is_some());
    }

    #[tokio::test]
    async fn diet_plan_without_activity_says_sedentary() {
        let ai = Scripted::new(AiReply::text("not json"));
        let meals = diet_plan(&ai, &AiConfig::default(), &ActivityLog::new()).await.unwrap();
        assert!(meals.is_empty());
        assert!(ai.last().prompt.contains("Sedentary/Minimal activity"));
    }

    #[tokio::test]
    async fn news_pairs_lines_with_sources() {
        let text = "Short\nA new study links daily walking with longer life\nResearchers report progress on a universal flu vaccine candidate\n";
        let ai = Scripted::new(AiReply {
            text: text.into(),
            images: vec![],
            sources: vec![web("Health Daily", "https://hd.example/1")],
        });
        let items = health_news(&ai, &AiConfig::default()).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source, "Health Daily");
        assert_eq!(items[0].url, "https://hd.example/1");
        assert_eq!(items[1].source, FALLBACK_NEWS_SOURCE);
        assert_eq!(items[1].url, FALLBACK_NEWS_URL);
        assert!(items[0].title.ends_with("..."));
        assert_eq!(items[0].timestamp, "Live Now");
        assert_eq!(ai.last().tools, vec![AiTool::GoogleSearch]);
    }

    #[tokio::test]
    async fn news_keeps_at_most_five_lines() {
        let line = "x".repeat(100);
        let text = vec![line; 8].join("\n");
        let ai = Scripted::new(AiReply::text(text));
        let items = health_news(&ai, &AiConfig::default()).await.unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].title.chars().count(), 83);
    }

    #[tokio::test]
    async fn aqi_uses_location_and_web_sources() {
        let ai = Scripted::new(AiReply {
            text: "AQI is 42, good.".into(),
            images: vec![],
            sources: vec![
                web("AirNow", "https://airnow.example"),
                GroundingSource {
                    kind: SourceKind::Maps,
                    title: "Park".into(),
                    uri: "https://maps.example".into(),
                },
            ],
        });
        let status = aqi_advice(&ai, &AiConfig::default(), "Oslo").await.unwrap();
        assert_eq!(status.category, "Verified Info");
        assert_eq!(status.index, 0);
        assert_eq!(status.sources.len(), 1);
        assert!(ai.last().prompt.contains("AQI in Oslo"));
    }

    #[tokio::test]
    async fn facilities_send_coordinates() {
        let ai = Scripted::new(AiReply::text("Three gyms nearby."));
        let result = nearby_facilities(&ai, &AiConfig::default(), "gyms", Coordinates::new(1.0, 2.0))
            .await
            .unwrap();
        assert_eq!(result.text, "Three gyms nearby.");
        let req = ai.last();
        assert_eq!(req.model, "gemini-2.5-flash");
        assert_eq!(req.location, Some(Coordinates::new(1.0, 2.0)));
        assert_eq!(req.prompt, "Find gyms near my current location.");
    }

    #[tokio::test]
    async fn image_generation_returns_first_image() {
        let ai = Scripted::new(AiReply {
            text: String::new(),
            images: vec![InlineImage {
                mime_type: "image/png".into(),
                data: "QUJD".into(),
            }],
            sources: vec![],
        });
        let url = generate_image(&ai, &AiConfig::default(), "a bowl of fruit", ImageSize::FourK)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(url.to_string(), "data:image/png;base64,QUJD");
        assert_eq!(ai.last().image_output.unwrap().size, ImageSize::FourK);

        let none = Scripted::new(AiReply::text("I can't draw that"));
        assert!(generate_image(&none, &AiConfig::default(), "x", ImageSize::OneK)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn edit_sends_source_payload_only() {
        let ai = Scripted::new(AiReply::default());
        let source = DataUrl::parse("data:image/jpeg;base64,/9j/").unwrap();
        edit_image(&ai, &AiConfig::default(), "add a hat", &source).await.unwrap();
        let image = ai.last().image.unwrap();
        assert_eq!(image.data, "/9j/");
        assert_eq!(image.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn video_unsupported_by_default() {
        let ai = Scripted::new(AiReply::default());
        let err = generate_video(&ai, &AiConfig::default(), "waves", VideoAspect::Portrait, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Operation(_)));
    }

    #[tokio::test]
    async fn mental_exercises_parse_or_empty() {
        let ai = Scripted::new(AiReply::text(
            r#"[{"title":"Box","description":"d","steps":["a","b"],"benefit":"calm","category":"Stress"}]"#,
        ));
        let list = mental_exercises(&ai, &AiConfig::default(), MentalGoal::Stress).await.unwrap();
        assert_eq!(list[0].steps, vec!["a", "b"]);
        assert_eq!(ai.last().prompt, "Exercises for Stress");

        let bad = Scripted::new(AiReply::text("{}"));
        assert!(mental_exercises(&bad, &AiConfig::default(), MentalGoal::Focus)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn symptom_uses_reasoning_model_with_budget() {
        let ai = Scripted::new(AiReply::text("Likely a mild strain."));
        let text = analyze_symptom(&ai, &AiConfig::default(), "sore calf", "high").await.unwrap();
        assert_eq!(text, "Likely a mild strain.");
        let req = ai.last();
        assert_eq!(req.model, "gemini-3-pro-preview");
        assert_eq!(req.thinking_budget, Some(4000));
        assert_eq!(req.prompt, "Symptom: sore calf. Activity: high.");
    }

    #[test]
    fn goal_parsing() {
        assert_eq!("STRESS".parse::<MentalGoal>(), Ok(MentalGoal::Stress));
        assert!("sleep".parse::<MentalGoal>().is_err());
    }
}
