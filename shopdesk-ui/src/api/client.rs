//! Backend Connection
//!
//! The table-store URL and anonymous key are baked in at build time
//! (`SHOPDESK_BACKEND_URL`, `SHOPDESK_ANON_KEY`); the URL can be
//! overridden per browser from the settings page.

use shopdesk::{Gateway, GatewayConfig, GatewayResult};

/// Default backend URL
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:54321";

const BACKEND_URL_KEY: &str = "shopdesk_backend_url";

fn build_url() -> &'static str {
    option_env!("SHOPDESK_BACKEND_URL").unwrap_or(DEFAULT_BACKEND_URL)
}

fn anon_key() -> &'static str {
    option_env!("SHOPDESK_ANON_KEY").unwrap_or("")
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Get the backend URL from local storage or use the build-time default
pub fn get_backend_url() -> String {
    let url = local_storage()
        .and_then(|storage| storage.get_item(BACKEND_URL_KEY).ok().flatten())
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| build_url().to_string());
    url.trim_end_matches('/').to_string()
}

/// Set the backend URL in local storage; an empty URL clears the override
pub fn set_backend_url(url: &str) {
    let Some(storage) = local_storage() else {
        return;
    };
    let result = if url.trim().is_empty() {
        storage.remove_item(BACKEND_URL_KEY)
    } else {
        storage.set_item(BACKEND_URL_KEY, url.trim())
    };
    if result.is_err() {
        tracing::warn!("Failed to store backend URL");
    }
}

/// Anonymous gateway for the configured backend
pub fn connect() -> GatewayResult<Gateway> {
    Gateway::new(GatewayConfig {
        base_url: get_backend_url(),
        anon_key: anon_key().to_string(),
        ..GatewayConfig::default()
    })
}
