use jiff::Zoned;
use serde::Deserialize;
use strum_macros::Display;

/// Sentiment label assigned by the inference service.
///
/// The wire labels are `POS`, `NEG` and `NEU`. Anything the service sends
/// that we do not recognize lands on [`Sentiment::Neutral`] so downstream
/// query derivation stays total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl<'de> serde::Deserialize<'de> for Sentiment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(match label.as_str() {
            "POS" => Sentiment::Positive,
            "NEG" => Sentiment::Negative,
            // NEU and any unrecognized label
            _ => Sentiment::Neutral,
        })
    }
}

/// One inference response. Replaces any prior result wholesale.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalysisResult {
    pub sentiment: Sentiment,
    pub confidence: f64,
    #[serde(default)]
    pub recommended_songs: Vec<String>,
    #[serde(default)]
    pub chatbot_reply: Option<String>,
    /// Stamped client-side when the response is parsed; not wire data.
    #[serde(skip, default = "Zoned::now")]
    pub received_at: Zoned,
}

/// A news article as shown in the articles list.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub source_name: String,
    pub url: String,
}

/// Raw news-search response. The `articles` field may be absent entirely.
#[derive(Debug, Deserialize, Clone)]
pub struct NewsResponse {
    #[serde(default)]
    pub articles: Vec<NewsArticle>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewsArticle {
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub source: NewsSource,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NewsSource {
    pub name: Option<String>,
}
