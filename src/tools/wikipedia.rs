//! wikipedia tool - encyclopedia lookup via the MediaWiki API

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;

use super::{Tool, check_status, truncate_chars};
use crate::config::WikipediaConfig;
use crate::error::{AskrError, Result};

const NO_RESULT: &str = "No good Wikipedia Search Result was found";

/// Query Wikipedia for general knowledge
pub struct WikipediaTool {
    client: Client,
    config: WikipediaConfig,
}

impl WikipediaTool {
    pub fn new(client: Client, config: WikipediaConfig) -> Self {
        Self { client, config }
    }

    fn api_url(&self) -> String {
        format!("https://{}.wikipedia.org/w/api.php", self.config.lang)
    }

    async fn get_json(&self, params: &[(&str, &str)]) -> Result<Value> {
        let response = self
            .client
            .get(self.api_url())
            .query(params)
            .send()
            .await
            .map_err(|e| AskrError::Remote(format!("Wikipedia request failed: {}", e)))?;

        check_status("Wikipedia", response)
            .await?
            .json()
            .await
            .map_err(|e| AskrError::Remote(format!("Failed to parse Wikipedia response: {}", e)))
    }

    async fn search(&self, query: &str) -> Result<Vec<String>> {
        let limit = self.config.top_k_results.to_string();
        let body = self
            .get_json(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("format", "json"),
            ])
            .await?;
        Ok(parse_search_titles(&body))
    }

    async fn summary(&self, title: &str) -> Result<Option<String>> {
        let body = self
            .get_json(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
            ])
            .await?;
        Ok(parse_extract(&body))
    }
}

#[async_trait]
impl Tool for WikipediaTool {
    fn name(&self) -> &'static str {
        "wikipedia"
    }

    fn description(&self) -> &'static str {
        "Query Wikipedia for general knowledge"
    }

    fn limits(&self) -> String {
        format!(
            "top {} results, {} chars max",
            self.config.top_k_results, self.config.doc_content_chars_max
        )
    }

    async fn invoke(&self, query: &str) -> Result<String> {
        debug!("wikipedia: searching for {:?}", query);
        let titles = self.search(query).await?;

        let mut pages = Vec::new();
        for title in titles.iter().take(self.config.top_k_results) {
            // Pages without an intro are skipped, not treated as failures
            if let Some(extract) = self.summary(title).await? {
                pages.push((title.clone(), extract));
            }
        }

        debug!("wikipedia: {} pages", pages.len());
        Ok(format_pages(&pages, self.config.doc_content_chars_max))
    }
}

/// Titles from a `list=search` response
pub fn parse_search_titles(body: &Value) -> Vec<String> {
    body["query"]["search"]
        .as_array()
        .map(|hits| {
            hits.iter()
                .filter_map(|h| h["title"].as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// First non-empty extract from a `prop=extracts` response
pub fn parse_extract(body: &Value) -> Option<String> {
    body["query"]["pages"]
        .as_object()?
        .values()
        .filter_map(|page| page["extract"].as_str())
        .map(str::trim)
        .find(|extract| !extract.is_empty())
        .map(str::to_string)
}

pub fn format_pages(pages: &[(String, String)], max_chars: usize) -> String {
    if pages.is_empty() {
        return NO_RESULT.to_string();
    }

    let docs: Vec<String> = pages
        .iter()
        .map(|(title, summary)| format!("Page: {}\nSummary: {}", title, summary))
        .collect();

    truncate_chars(&docs.join("\n\n"), max_chars)
}
