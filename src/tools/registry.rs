//! Tool registry - fixed name -> tool mapping built once at startup

use std::collections::HashMap;
use std::time::Duration;

use super::{ArxivTool, TavilyTool, Tool, WikipediaTool, http_client};
use crate::config::{Secrets, ToolsConfig};
use crate::error::{AskrError, Result};
use crate::llm::ToolDefinition;

/// Registered tools, looked up by the name the model emits
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create the registry with the three research tools
    pub fn standard(config: &ToolsConfig, secrets: &Secrets) -> Result<Self> {
        let client = http_client(Duration::from_millis(config.timeout_ms))?;

        Ok(Self::new()
            .with_tool(Box::new(ArxivTool::new(client.clone(), config.arxiv.clone())))
            .with_tool(Box::new(WikipediaTool::new(client.clone(), config.wikipedia.clone())))
            .with_tool(Box::new(TavilyTool::new(
                client,
                secrets.tavily_api_key.clone(),
                config.tavily.clone(),
            ))))
    }

    /// Create an empty registry (for custom tool sets)
    pub fn new() -> Self {
        Self { tools: HashMap::new() }
    }

    /// Register a tool under its own name
    pub fn with_tool(mut self, tool: Box<dyn Tool>) -> Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Result<&dyn Tool> {
        self.tools
            .get(name)
            .map(|t| t.as_ref())
            .ok_or_else(|| AskrError::UnknownTool(name.to_string()))
    }

    /// Tool definitions for the model, sorted by name so requests are stable
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, sorted
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Tools in name order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tool_names()
            .into_iter()
            .filter_map(|name| self.tools.get(name).map(|t| t.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
