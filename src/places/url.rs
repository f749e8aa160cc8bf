//! Request URL construction.
//!
//! URLs are assembled by plain concatenation. Nothing is percent-encoded, so a category
//! containing `&`, `#` or spaces ends up in the query string as-is.

use std::env;

use crate::error::{EnrichmentError, EnrichmentResult};

use super::config::PlacesConfig;

/// Build a nearby-search URL with `config.api_key`, or the key read from `config.key_env_var`.
pub fn build_url(config: &PlacesConfig, lat: f64, lon: f64, category: &str) -> EnrichmentResult<String> {
    let key = match &config.api_key {
        Some(key) => key.clone(),
        None => env::var(&config.key_env_var).map_err(|_| EnrichmentError::MissingApiKey {
            var: config.key_env_var.clone(),
        })?,
    };
    Ok(build_url_with_key(config, lat, lon, category, &key))
}

/// Build a nearby-search URL with an explicit API key.
pub fn build_url_with_key(config: &PlacesConfig, lat: f64, lon: f64, category: &str, key: &str) -> String {
    let mut url = config.endpoint();
    url.push_str(&format!("&key={key}"));
    url.push_str(&format!("&location={lat:?},{lon:?}"));
    url.push_str(&format!("&radius={}", config.radius));
    url.push_str(&format!("&keyword={category}"));
    url
}

/// Replace the value of the `key` parameter so URLs can be logged.
pub fn redact_key(url: &str) -> String {
    let Some(start) = url.find("key=") else {
        return url.to_string();
    };
    let value_start = start + "key=".len();
    let value_end = url[value_start..]
        .find('&')
        .map(|i| value_start + i)
        .unwrap_or(url.len());
    format!("{}***{}", &url[..value_start], &url[value_end..])
}
