use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default identity-graph listing of the caller's transitive group memberships.
pub const DEFAULT_GRAPH_GROUPS_ENDPOINT: &str =
    "https://graph.microsoft.com/v1.0/me/transitiveMemberOf?$select=id";

/// Process-wide settings, read once and handed to the components that need them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Search index column holding the groups allowed to see a document.
    #[serde(default)]
    pub permitted_groups_column: String,

    /// Raise the default log filter to `debug`.
    #[serde(default)]
    pub debug: bool,

    /// Identity-graph endpoint for the first page of group memberships.
    #[serde(default = "default_graph_endpoint")]
    pub graph_groups_endpoint: String,

    /// Stop following `@odata.nextLink` after this many pages. `None` follows every page.
    #[serde(default)]
    pub graph_max_pages: Option<usize>,

    /// Prompt flow input field carrying the user's question.
    #[serde(default = "default_request_field")]
    pub promptflow_request_field: String,

    /// Prompt flow output field carrying the answer.
    #[serde(default = "default_response_field")]
    pub promptflow_response_field: String,

    /// Prompt flow output field carrying citations.
    #[serde(default = "default_citations_field")]
    pub promptflow_citations_field: String,
}

fn default_graph_endpoint() -> String {
    DEFAULT_GRAPH_GROUPS_ENDPOINT.to_string()
}

fn default_request_field() -> String {
    "query".to_string()
}

fn default_response_field() -> String {
    "reply".to_string()
}

fn default_citations_field() -> String {
    "documents".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            permitted_groups_column: String::new(),
            debug: false,
            graph_groups_endpoint: default_graph_endpoint(),
            graph_max_pages: None,
            promptflow_request_field: default_request_field(),
            promptflow_response_field: default_response_field(),
            promptflow_citations_field: default_citations_field(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// Environment:
    /// - AZURE_SEARCH_PERMITTED_GROUPS_COLUMN  -> permitted groups column
    /// - DEBUG = true                          -> debug logging (case-insensitive)
    /// - GRAPH_GROUPS_ENDPOINT                 -> first-page graph URL
    /// - GRAPH_MAX_PAGES                       -> page ceiling (usize)
    /// - PROMPTFLOW_REQUEST_FIELD_NAME / PROMPTFLOW_RESPONSE_FIELD_NAME /
    ///   PROMPTFLOW_CITATIONS_FIELD_NAME       -> prompt flow field names
    pub fn from_env() -> Self {
        let mut s = Settings::default();

        if let Ok(col) = std::env::var("AZURE_SEARCH_PERMITTED_GROUPS_COLUMN") {
            s.permitted_groups_column = col;
        }

        s.debug = std::env::var("DEBUG")
            .map(|v| debug_flag(&v))
            .unwrap_or(false);

        if let Ok(url) = std::env::var("GRAPH_GROUPS_ENDPOINT") {
            let u = url.trim();
            if !u.is_empty() {
                s.graph_groups_endpoint = u.to_string();
            }
        }

        if let Ok(n) = std::env::var("GRAPH_MAX_PAGES") {
            match n.trim().parse::<usize>() {
                Ok(n) if n > 0 => s.graph_max_pages = Some(n),
                _ => tracing::warn!("Ignoring invalid GRAPH_MAX_PAGES value: {}", n),
            }
        }

        for (key, slot) in [
            ("PROMPTFLOW_REQUEST_FIELD_NAME", &mut s.promptflow_request_field),
            ("PROMPTFLOW_RESPONSE_FIELD_NAME", &mut s.promptflow_response_field),
            ("PROMPTFLOW_CITATIONS_FIELD_NAME", &mut s.promptflow_citations_field),
        ] {
            if let Ok(v) = std::env::var(key) {
                let v = v.trim();
                if !v.is_empty() {
                    *slot = v.to_string();
                }
            }
        }

        s
    }

    /// Load settings from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read settings file: {}", path.as_ref().display())
        })?;

        let settings: Settings =
            serde_json::from_str(&content).with_context(|| "Failed to parse settings JSON")?;

        Ok(settings)
    }

    /// Log filter used when RUST_LOG is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

/// DEBUG only accepts "true", compared without trimming; 1/yes/on do not count.
fn debug_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}
