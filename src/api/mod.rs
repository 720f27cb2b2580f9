use crate::config::NetworkConfig;
use crate::internal::models::{AnalysisResult, Article, NewsResponse, Sentiment};
use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::json;

/// Fixed page size requested from the article-search endpoint; the article
/// list is also truncated to this length client-side.
pub const NEWS_PAGE_SIZE: usize = 5;

/// Derive the article-search query for a sentiment label.
///
/// Pure and total over the enum; unrecognized wire labels already decode to
/// [`Sentiment::Neutral`] before they reach this function.
pub fn news_query(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "positive attitude towards life",
        Sentiment::Negative => "mental health support",
        Sentiment::Neutral => "mental health awareness",
    }
}

/// HTTP service for the inference and article-search endpoints.
///
/// Both calls are async and return `anyhow::Result` with contextualized
/// errors so transport failures stay distinguishable from parse failures in
/// the logs. Neither call retries or carries an explicit timeout; a request
/// runs to completion even if its result has gone stale.
#[derive(Clone)]
pub struct ApiService {
    client: Client,
    network: NetworkConfig,
}

impl ApiService {
    pub fn new(network: NetworkConfig) -> Self {
        Self {
            client: Client::new(),
            network,
        }
    }

    fn analyze_url(&self) -> String {
        format!(
            "{}/analyze/",
            self.network.analyze_base_url.trim_end_matches('/')
        )
    }

    /// Submit text to the inference service and parse the result.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        let url = self.analyze_url();
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "text": text }))
            .send()
            .await
            .with_context(|| format!("failed to send POST request to {}", url))?;

        resp.json::<AnalysisResult>()
            .await
            .with_context(|| format!("failed to parse analysis response from {}", url))
    }

    /// Fetch articles for a sentiment label.
    ///
    /// A response without an `articles` field yields an empty list rather
    /// than an error; anything longer than [`NEWS_PAGE_SIZE`] is truncated
    /// with the upstream ranking order preserved.
    pub async fn fetch_news(&self, sentiment: Sentiment) -> Result<Vec<Article>> {
        let query = news_query(sentiment);
        let page_size = NEWS_PAGE_SIZE.to_string();
        let url = &self.network.news_base_url;

        let resp = self
            .client
            .get(url)
            .query(&[
                ("q", query),
                ("apiKey", self.network.news_api_key.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("failed to send GET request to {}", url))?;

        let news = resp
            .json::<NewsResponse>()
            .await
            .with_context(|| format!("failed to parse news response from {}", url))?;

        let mut articles: Vec<Article> = news
            .articles
            .into_iter()
            .map(|raw| Article {
                title: raw.title.unwrap_or_default(),
                source_name: raw.source.name.unwrap_or_default(),
                url: raw.url.unwrap_or_default(),
            })
            .collect();
        articles.truncate(NEWS_PAGE_SIZE);
        Ok(articles)
    }
}
