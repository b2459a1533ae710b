//! Process-wide base URL for the insights API.

use std::sync::OnceLock;

/// Production endpoint used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://mixo-fe-backend-task.vercel.app";

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "CAMPAIGN_API_BASE_URL";

static BASE_URL: OnceLock<String> = OnceLock::new();

/// Returns the base URL, resolving it from the environment on first use.
///
/// The value is read once per process and never changes afterward, even if
/// the environment variable is modified later.
pub fn base_url() -> &'static str {
    BASE_URL.get_or_init(|| {
        let configured = std::env::var(BASE_URL_ENV).ok();
        resolve_base_url(configured.as_deref())
    })
}

/// Normalizes an optional configured value, falling back to the default.
pub fn resolve_base_url(configured: Option<&str>) -> String {
    match configured.map(str::trim) {
        Some(value) if !value.is_empty() => value.trim_end_matches('/').to_owned(),
        _ => DEFAULT_BASE_URL.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::{base_url, resolve_base_url, DEFAULT_BASE_URL};

    #[test]
    fn missing_or_blank_value_uses_default() {
        assert_eq!(resolve_base_url(None), DEFAULT_BASE_URL);
        assert_eq!(resolve_base_url(Some("   ")), DEFAULT_BASE_URL);
    }

    #[test]
    fn configured_value_is_trimmed() {
        assert_eq!(
            resolve_base_url(Some(" http://localhost:4000/ ")),
            "http://localhost:4000"
        );
    }

    #[test]
    fn base_url_is_stable_across_calls() {
        let first = base_url();
        let second = base_url();
        assert!(std::ptr::eq(first, second));
    }
}
