//! arxiv tool - academic paper lookup via the arXiv export API

use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use super::{Tool, check_status, truncate_chars};
use crate::config::ArxivConfig;
use crate::error::{AskrError, Result};

const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// arXiv rejects very long search strings
const MAX_QUERY_CHARS: usize = 300;

const NO_RESULT: &str = "No good Arxiv Result was found";

/// Query arXiv for academic papers
pub struct ArxivTool {
    client: Client,
    config: ArxivConfig,
}

impl ArxivTool {
    pub fn new(client: Client, config: ArxivConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Tool for ArxivTool {
    fn name(&self) -> &'static str {
        "arxiv"
    }

    fn description(&self) -> &'static str {
        "Query Arxiv for academic papers"
    }

    fn limits(&self) -> String {
        format!(
            "top {} results, {} chars max",
            self.config.top_k_results, self.config.doc_content_chars_max
        )
    }

    async fn invoke(&self, query: &str) -> Result<String> {
        let query = truncate_chars(query, MAX_QUERY_CHARS);
        debug!("arxiv: searching for {:?}", query);

        let response = self
            .client
            .get(ARXIV_API_URL)
            .query(&[
                ("search_query", format!("all:{}", query)),
                ("start", "0".to_string()),
                ("max_results", self.config.top_k_results.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AskrError::Remote(format!("arXiv request failed: {}", e)))?;

        let feed = check_status("arXiv", response)
            .await?
            .text()
            .await
            .map_err(|e| AskrError::Remote(format!("Failed to read arXiv response: {}", e)))?;

        let entries = parse_feed(&feed, self.config.top_k_results);
        debug!("arxiv: {} entries", entries.len());
        Ok(format_entries(&entries, self.config.doc_content_chars_max))
    }
}

/// One paper from the Atom feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArxivEntry {
    pub published: String,
    pub title: String,
    pub authors: Vec<String>,
    pub summary: String,
}

/// Scan an Atom feed for `<entry>` blocks
pub fn parse_feed(feed: &str, limit: usize) -> Vec<ArxivEntry> {
    let mut entries = Vec::new();
    let mut rest = feed;

    while entries.len() < limit {
        let Some(start) = rest.find("<entry>") else {
            break;
        };
        let after = &rest[start + "<entry>".len()..];
        let Some(end) = after.find("</entry>") else {
            break;
        };
        let block = &after[..end];
        rest = &after[end + "</entry>".len()..];

        // arXiv reports query errors as an entry titled "Error"
        let title = tag_text(block, "title").map(|t| normalize(&t)).unwrap_or_default();
        if title.is_empty() || title == "Error" {
            continue;
        }

        let published = tag_text(block, "published")
            .map(|p| p.chars().take(10).collect())
            .unwrap_or_default();
        let summary = tag_text(block, "summary").map(|s| normalize(&s)).unwrap_or_default();
        let authors = all_tag_text(block, "name").iter().map(|n| normalize(n)).collect();

        entries.push(ArxivEntry {
            published,
            title,
            authors,
            summary,
        });
    }

    entries
}

/// Render entries the way they are handed back to the model
pub fn format_entries(entries: &[ArxivEntry], max_chars: usize) -> String {
    if entries.is_empty() {
        return NO_RESULT.to_string();
    }

    let docs: Vec<String> = entries
        .iter()
        .map(|e| {
            format!(
                "Published: {}\nTitle: {}\nAuthors: {}\nSummary: {}",
                e.published,
                e.title,
                e.authors.join(", "),
                e.summary
            )
        })
        .collect();

    truncate_chars(&docs.join("\n\n"), max_chars)
}

/// Text of the first `<tag ...>...</tag>` in `block`
fn tag_text(block: &str, tag: &str) -> Option<String> {
    all_tag_text(block, tag).into_iter().next()
}

fn all_tag_text(block: &str, tag: &str) -> Vec<String> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let mut found = Vec::new();
    let mut rest = block;

    while let Some(start) = rest.find(&open) {
        let after_name = &rest[start + open.len()..];
        // Skip tags that merely share a prefix (e.g. <titles>)
        if !after_name.starts_with('>') && !after_name.starts_with(' ') {
            rest = after_name;
            continue;
        }
        let Some(gt) = after_name.find('>') else {
            break;
        };
        let body = &after_name[gt + 1..];
        let Some(end) = body.find(&close) else {
            break;
        };
        found.push(decode_entities(&body[..end]));
        rest = &body[end + close.len()..];
    }

    found
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Longest entity body we try to decode, e.g. `#x10FFFF`
const MAX_ENTITY_LEN: usize = 8;

/// Decode XML entities in one pass, so `&amp;lt;` stays `&lt;`
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after
            .find(';')
            .filter(|&end| end <= MAX_ENTITY_LEN)
            .and_then(|end| decode_entity(&after[..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "amp" => Some('&'),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse::<u32>().ok()?,
            };
            char::from_u32(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:transformers</title>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All
      You Need</title>
    <summary>  The dominant sequence transduction models are based on complex
recurrent or convolutional neural networks &amp; attention.</summary>
    <author>
      <name>Ashish Vaswani</name>
    </author>
    <author>
      <name>Noam Shazeer</name>
    </author>
  </entry>
  <entry>
    <published>2018-10-11T00:50:01Z</published>
    <title>BERT: Pre-training of Deep Bidirectional Transformers</title>
    <summary>We introduce BERT.</summary>
    <author><name>Jacob Devlin</name></author>
  </entry>
</feed>
"#;

    fn tool() -> ArxivTool {
        ArxivTool::new(Client::new(), ArxivConfig::default())
    }

    #[test]
    fn test_tool_metadata() {
        let tool = tool();
        assert_eq!(tool.name(), "arxiv");
        assert_eq!(tool.definition().name, "arxiv");
        assert_eq!(tool.input_schema()["required"][0], "query");
        assert_eq!(tool.limits(), "top 2 results, 600 chars max");
    }

    #[test]
    fn test_parse_feed_entries() {
        let entries = parse_feed(SAMPLE_FEED, 5);
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.published, "2017-06-12");
        assert_eq!(first.title, "Attention Is All You Need");
        assert_eq!(first.authors, vec!["Ashish Vaswani", "Noam Shazeer"]);
        assert!(first.summary.starts_with("The dominant sequence"));
        assert!(first.summary.contains("networks & attention"));
    }

    #[test]
    fn test_parse_feed_respects_limit() {
        let entries = parse_feed(SAMPLE_FEED, 1);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Attention Is All You Need");
    }

    #[test]
    fn test_parse_feed_skips_error_entry() {
        let feed = "<feed><entry><title>Error</title><summary>incorrect id format</summary></entry></feed>";
        assert!(parse_feed(feed, 2).is_empty());
    }

    #[test]
    fn test_parse_feed_empty() {
        assert!(parse_feed("<feed><title>nothing</title></feed>", 2).is_empty());
    }

    #[test]
    fn test_format_entries() {
        let entries = parse_feed(SAMPLE_FEED, 1);
        let out = format_entries(&entries, 10_000);
        assert!(out.starts_with("Published: 2017-06-12\nTitle: Attention Is All You Need\n"));
        assert!(out.contains("Authors: Ashish Vaswani, Noam Shazeer"));
    }

    #[test]
    fn test_format_entries_truncated() {
        let entries = parse_feed(SAMPLE_FEED, 2);
        let out = format_entries(&entries, 40);
        assert_eq!(out.chars().count(), 40);
    }

    #[test]
    fn test_format_entries_none() {
        assert_eq!(format_entries(&[], 600), NO_RESULT);
    }

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(decode_entities("a &lt;b&gt; &quot;c&quot; &apos;d&apos; &amp; e"), "a <b> \"c\" 'd' & e");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode_entities("Schr&#246;dinger&#39;s cat"), "Schrödinger's cat");
        assert_eq!(decode_entities("2017&#x2013;2018"), "2017–2018");
        assert_eq!(decode_entities("&#X41;"), "A");
    }

    #[test]
    fn test_decode_leaves_unknown_text() {
        assert_eq!(decode_entities("AT&T; R&D"), "AT&T; R&D");
        assert_eq!(decode_entities("&bogus; &#xZZ; &#1114112;"), "&bogus; &#xZZ; &#1114112;");
        assert_eq!(decode_entities("trailing &"), "trailing &");
    }

    #[test]
    fn test_parse_feed_numeric_entity_in_title() {
        let feed = "<feed><entry><title>Don&#39;t Stop &#x2013; Pretraining</title><summary>s</summary></entry></feed>";
        assert_eq!(parse_feed(feed, 1)[0].title, "Don't Stop – Pretraining");
    }

    #[test]
    fn test_tag_text_ignores_prefix_match() {
        let block = "<titles>no</titles><title>yes</title>";
        assert_eq!(tag_text(block, "title"), Some("yes".to_string()));
    }
}
