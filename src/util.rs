use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Settings;

/// Load the environment file, read [`Settings`] and initialize structured tracing.
///
/// - Supports explicit env file paths via ENV_FILE or DOTENV_PATH
/// - Falls back to default .env discovery
/// - RUST_LOG wins; otherwise the filter is `debug` when DEBUG=true, else `info`
///
/// Returns the settings so callers read the environment only once.
pub fn init_tracing() -> Settings {
    let mut env_source: String = "none".into();
    for key in ["ENV_FILE", "DOTENV_PATH"] {
        if let Ok(p) = std::env::var(key) {
            let p = p.trim();
            if !p.is_empty()
                && std::path::Path::new(p).is_file()
                && dotenvy::from_filename(p).is_ok()
            {
                env_source = format!("{p} ({key})");
                break;
            }
        }
    }

    if env_source == "none" {
        if let Ok(path) = dotenvy::dotenv() {
            env_source = path.display().to_string();
        }
    }

    let settings = Settings::from_env();

    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| settings.default_log_filter().to_string());
    let subscriber = fmt().with_env_filter(EnvFilter::new(filter)).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    tracing::info!("Environment loaded from: {}", env_source);
    tracing::debug!(?settings, "settings resolved");

    settings
}

/// Truthy env flag: 1, true, yes, on (case-insensitive).
pub fn env_truthy(key: &str) -> bool {
    std::env::var(key)
        .map(|v| {
            let v = v.trim().to_ascii_lowercase();
            v == "1" || v == "true" || v == "yes" || v == "on"
        })
        .unwrap_or(false)
}

/// Build an HTTP client honoring proxy and timeout environment variables.
///
/// Environment:
/// - CHAT2ENVELOPE_NO_PROXY = 1|true|yes|on  -> disable all proxies
/// - CHAT2ENVELOPE_PROXY_URL = <url>         -> proxy for all schemes
/// - CHAT2ENVELOPE_HTTP_TIMEOUT_SECONDS      -> overall request timeout (u64)
///
/// Without a timeout the transport default applies.
pub fn build_http_client_from_env() -> reqwest::Client {
    let mut builder = reqwest::Client::builder();

    if let Ok(secs) = std::env::var("CHAT2ENVELOPE_HTTP_TIMEOUT_SECONDS") {
        if let Ok(n) = secs.trim().parse::<u64>() {
            builder = builder.timeout(std::time::Duration::from_secs(n));
        }
    }

    if env_truthy("CHAT2ENVELOPE_NO_PROXY") {
        builder = builder.no_proxy();
    } else if let Ok(url) = std::env::var("CHAT2ENVELOPE_PROXY_URL") {
        let u = url.trim();
        if !u.is_empty() {
            match reqwest::Proxy::all(u) {
                Ok(p) => builder = builder.proxy(p),
                Err(e) => tracing::warn!("Ignoring invalid CHAT2ENVELOPE_PROXY_URL: {}", e),
            }
        }
    }

    builder = builder.user_agent(format!("chat2envelope/{}", env!("CARGO_PKG_VERSION")));

    builder.build().unwrap_or_else(|e| {
        tracing::warn!("Falling back to default HTTP client: {}", e);
        reqwest::Client::new()
    })
}

/// Split a search column setting on `|` when present, otherwise on `,`.
///
/// Pieces are returned as written; no trimming happens.
pub fn parse_multi_columns(columns: &str) -> Vec<String> {
    let sep = if columns.contains('|') { '|' } else { ',' };
    columns.split(sep).map(str::to_string).collect()
}

/// Split comma-separated values into a list after dropping every space.
pub fn comma_separated_string_to_list(s: &str) -> Vec<String> {
    s.trim()
        .replace(' ', "")
        .split(',')
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_columns_prefer_pipe() {
        assert_eq!(parse_multi_columns("title|content"), vec!["title", "content"]);
        assert_eq!(parse_multi_columns("a,b|c"), vec!["a,b", "c"]);
        assert_eq!(parse_multi_columns("a, b"), vec!["a", " b"]);
        assert_eq!(parse_multi_columns("single"), vec!["single"]);
    }

    #[test]
    fn comma_list_drops_spaces() {
        assert_eq!(
            comma_separated_string_to_list("  gpt-4o, gpt 35 ,ada "),
            vec!["gpt-4o", "gpt35", "ada"]
        );
        assert_eq!(comma_separated_string_to_list(""), vec![""]);
    }

    #[test]
    fn init_tracing_reads_env_file_and_settings() {
        let path = std::env::temp_dir().join(format!("chat2envelope-{}.env", std::process::id()));
        std::fs::write(
            &path,
            "AZURE_SEARCH_PERMITTED_GROUPS_COLUMN=allowed_groups\nGRAPH_MAX_PAGES=3\n",
        )
        .unwrap();
        std::env::set_var("ENV_FILE", &path);

        let settings = init_tracing();

        assert_eq!(settings.permitted_groups_column, "allowed_groups");
        assert_eq!(settings.graph_max_pages, Some(3));
        std::env::remove_var("ENV_FILE");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn http_client_builds_with_timeout_and_no_proxy() {
        std::env::set_var("CHAT2ENVELOPE_HTTP_TIMEOUT_SECONDS", "5");
        std::env::set_var("CHAT2ENVELOPE_NO_PROXY", "on");
        let client = build_http_client_from_env();
        // A request can be built against the client without touching the network.
        assert!(client.get("http://127.0.0.1:9/").build().is_ok());
        std::env::remove_var("CHAT2ENVELOPE_HTTP_TIMEOUT_SECONDS");
        std::env::remove_var("CHAT2ENVELOPE_NO_PROXY");
    }

    #[test]
    fn env_truthy_accepts_common_spellings() {
        std::env::set_var("CHAT2ENVELOPE_TEST_FLAG", " Yes ");
        assert!(env_truthy("CHAT2ENVELOPE_TEST_FLAG"));
        std::env::set_var("CHAT2ENVELOPE_TEST_FLAG", "0");
        assert!(!env_truthy("CHAT2ENVELOPE_TEST_FLAG"));
        std::env::remove_var("CHAT2ENVELOPE_TEST_FLAG");
        assert!(!env_truthy("CHAT2ENVELOPE_TEST_FLAG"));
    }
}
