//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md

use crate::core::model::{Kind, ResultItem, ResultSet};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
        }
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut entries = Vec::new();
        let mut paths = Vec::new();
        let mut reports = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Entry => entries.push(item),
                Kind::Path => paths.push(item),
                Kind::Report => reports.push(item),
                Kind::Error => errors.push(item),
            }
        }

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}\n", error.code, error.message));
                }
            }
            output.push('\n');
        }

        if !entries.is_empty() {
            output.push_str("## Entries\n\n");
            for item in entries {
                self.render_entry_md(&mut output, item);
            }
        }

        if !paths.is_empty() {
            output.push_str("## Paths\n\n");
            for item in paths {
                output.push_str(&format!(
                    "- `{}` → `{}`\n",
                    item.key.as_deref().unwrap_or_default(),
                    item.path.as_deref().unwrap_or_default()
                ));
            }
            output.push('\n');
        }

        if !reports.is_empty() {
            output.push_str("## Reports\n\n");
            for item in reports {
                if let Some(status) = &item.status {
                    output.push_str(&format!("### {}\n\n", status));
                }
                if let Some(serde_json::Value::Object(fields)) = &item.data {
                    for (name, value) in fields {
                        output.push_str(&format!("- {}: {}\n", name, value));
                    }
                }
                output.push('\n');
            }
        }

        output
    }

    fn render_entry_md(&self, output: &mut String, item: &ResultItem) {
        if let Some(key) = &item.key {
            output.push_str(&format!("### `{}`", key));
            if let Some(status) = &item.status {
                output.push_str(&format!(" ({})", status));
            }
            output.push_str("\n\n");
        }

        if let Some(path) = &item.path {
            output.push_str(&format!("- path: `{}`\n", path));
        }
        if let Some(size) = item.meta.size {
            output.push_str(&format!("- size: {} bytes\n", size));
        }
        if let Some(created_at) = &item.meta.created_at {
            output.push_str(&format!("- created: {}\n", created_at));
        }
        match &item.meta.expires_at {
            Some(expires_at) => output.push_str(&format!("- expires: {}\n", expires_at)),
            None if item.meta.ttl_secs == Some(0) => output.push_str("- expires: never\n"),
            None => {}
        }
        if item.meta.expired {
            output.push_str("\n> ⚠️ Entry has expired\n");
        }

        output.push('\n');
    }
}
