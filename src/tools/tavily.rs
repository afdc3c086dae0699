//! tavily tool - web search via the Tavily API

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::{Tool, check_status, truncate_chars};
use crate::config::TavilyConfig;
use crate::error::{AskrError, Result};

const TAVILY_API_URL: &str = "https://api.tavily.com/search";

/// Environment variable holding the API key
pub const TAVILY_API_KEY_ENV: &str = "TAVILY_API_KEY";

/// Search the web for current information
pub struct TavilyTool {
    client: Client,
    api_key: String,
    config: TavilyConfig,
}

/// A single search hit as handed back to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub url: String,
    pub content: String,
}

impl TavilyTool {
    pub fn new(client: Client, api_key: impl Into<String>, config: TavilyConfig) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            config,
        }
    }
}

#[async_trait]
impl Tool for TavilyTool {
    fn name(&self) -> &'static str {
        "tavily_search_results_json"
    }

    fn description(&self) -> &'static str {
        "A search engine optimized for comprehensive, accurate, and trusted results. \
         Useful for when you need to answer questions about current events. \
         Input should be a search query."
    }

    fn limits(&self) -> String {
        format!(
            "top {} results, {} chars max",
            self.config.max_results, self.config.content_chars_max
        )
    }

    async fn invoke(&self, query: &str) -> Result<String> {
        debug!("tavily: searching for {:?}", query);

        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": self.config.max_results,
            "search_depth": "basic"
        });

        let response = self
            .client
            .post(TAVILY_API_URL)
            .json(&body)
            .send()
            .await
            .map_err(|e| AskrError::Remote(format!("Search request failed: {}", e)))?;

        let result: Value = check_status("Tavily", response)
            .await?
            .json()
            .await
            .map_err(|e| AskrError::Remote(format!("Failed to parse response: {}", e)))?;

        let hits = parse_hits(&result, self.config.max_results)?;
        debug!("tavily: {} hits", hits.len());
        format_hits(&hits, self.config.content_chars_max)
    }
}

pub fn parse_hits(result: &Value, max_results: usize) -> Result<Vec<SearchHit>> {
    let Some(results) = result["results"].as_array() else {
        return Err(AskrError::Remote("Invalid Tavily response: missing results".to_string()));
    };

    Ok(results
        .iter()
        .take(max_results)
        .map(|r| SearchHit {
            url: r["url"].as_str().unwrap_or("").to_string(),
            content: r["content"].as_str().unwrap_or("").to_string(),
        })
        .collect())
}

/// Serialize hits as a JSON array string, capped at `max_chars`
pub fn format_hits(hits: &[SearchHit], max_chars: usize) -> Result<String> {
    let json = serde_json::to_string(hits)?;
    Ok(truncate_chars(&json, max_chars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "query": "rust 2024 edition",
            "results": [
                { "title": "Announcing Rust 1.85", "url": "https://blog.rust-lang.org/", "content": "The 2024 edition is stable.", "score": 0.9 },
                { "title": "Edition guide", "url": "https://doc.rust-lang.org/edition-guide/", "content": "Editions are opt-in.", "score": 0.8 },
                { "title": "Reddit", "url": "https://reddit.com/r/rust", "content": "Discussion", "score": 0.5 }
            ]
        })
    }

    #[test]
    fn test_tool_metadata() {
        let tool = TavilyTool::new(Client::new(), "key", TavilyConfig::default());
        assert_eq!(tool.name(), "tavily_search_results_json");
        assert_eq!(tool.limits(), "top 5 results, 4000 chars max");
        assert_eq!(tool.input_schema()["properties"]["query"]["type"], "string");
    }

    #[test]
    fn test_parse_hits() {
        let hits = parse_hits(&sample(), 5).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].url, "https://blog.rust-lang.org/");
        assert_eq!(hits[0].content, "The 2024 edition is stable.");
    }

    #[test]
    fn test_parse_hits_respects_max() {
        let hits = parse_hits(&sample(), 2).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_parse_hits_missing_results() {
        let result = parse_hits(&json!({ "detail": "Unauthorized" }), 5);
        assert!(matches!(result, Err(AskrError::Remote(_))));
    }

    #[test]
    fn test_format_hits_json() {
        let hits = parse_hits(&sample(), 1).unwrap();
        let out = format_hits(&hits, 4000).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["url"], "https://blog.rust-lang.org/");
        assert!(parsed[0].get("title").is_none());
    }

    #[test]
    fn test_format_hits_empty() {
        assert_eq!(format_hits(&[], 4000).unwrap(), "[]");
    }

    #[test]
    fn test_format_hits_capped() {
        let hits = parse_hits(&sample(), 5).unwrap();
        assert_eq!(format_hits(&hits, 20).unwrap().chars().count(), 20);
    }
}
