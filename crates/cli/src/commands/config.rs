use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use cryptoprice_core::config::{AppConfig, LoadOptions, LEGACY_APPLICATION_ID_ENV};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let fields = [
        (
            "skill.application_id",
            redact_application_id(config.skill.application_id.expose_secret()),
            source(
                "skill.application_id",
                &["CRYPTOPRICE_SKILL_APPLICATION_ID", LEGACY_APPLICATION_ID_ENV],
            ),
        ),
        (
            "price_api.base_url",
            config.price_api.base_url.clone(),
            source("price_api.base_url", &["CRYPTOPRICE_PRICE_API_BASE_URL"]),
        ),
        (
            "price_api.api_version",
            config.price_api.api_version.clone(),
            source("price_api.api_version", &["CRYPTOPRICE_PRICE_API_VERSION"]),
        ),
        (
            "price_api.timeout_ms",
            config.price_api.timeout_ms.to_string(),
            source("price_api.timeout_ms", &["CRYPTOPRICE_PRICE_API_TIMEOUT_MS"]),
        ),
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            source("server.bind_address", &["CRYPTOPRICE_SERVER_BIND_ADDRESS"]),
        ),
        (
            "server.port",
            config.server.port.to_string(),
            source("server.port", &["CRYPTOPRICE_SERVER_PORT"]),
        ),
        (
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            source("server.graceful_shutdown_secs", &["CRYPTOPRICE_SERVER_GRACEFUL_SHUTDOWN_SECS"]),
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            source("logging.level", &["CRYPTOPRICE_LOGGING_LEVEL", "CRYPTOPRICE_LOG_LEVEL"]),
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            source("logging.format", &["CRYPTOPRICE_LOGGING_FORMAT", "CRYPTOPRICE_LOG_FORMAT"]),
        ),
    ];

    let mut lines =
        vec!["effective config (source precedence: override > env > file > default):".to_string()];
    lines.extend(fields.iter().map(|(key, value, source)| render_line(key, value, source)));
    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    ["cryptoprice.toml", "config/cryptoprice.toml"]
        .into_iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: &str) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps the platform prefix (`amzn1.ask.skill`) so operators can tell which
/// kind of id is configured without revealing it.
fn redact_application_id(application_id: &str) -> String {
    let trimmed = application_id.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    match trimmed.rsplit_once('.') {
        Some((prefix, _)) => format!("{prefix}.***"),
        None => "<redacted>".to_string(),
    }
}
