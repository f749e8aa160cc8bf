use std::fmt;
use std::time::Duration;

/// Base address of the Google Maps web services.
pub const GOOGLE_MAPS_API: &str = "https://maps.googleapis.com/maps/";
/// Places API path segment.
pub const API: &str = "api/place/";
/// Nearby search endpoint segment.
pub const SEARCH_COMPONENT: &str = "nearbysearch/";
/// Output format segment. Ends with `?` so parameters can be appended with `&`.
pub const OUTPUT_TYPE: &str = "json?";
/// Search radius in metres.
pub const RADIUS: u32 = 1000;
/// Environment variable holding the API key.
pub const KEY_ENV_VAR: &str = "KEY";

/// Immutable configuration for building and sending places requests.
#[derive(Clone, PartialEq, Eq)]
pub struct PlacesConfig {
    pub api_base: String,
    pub api: String,
    pub search_component: String,
    pub output_type: String,
    /// Search radius in metres.
    pub radius: u32,
    /// Name of the environment variable read for the API key.
    pub key_env_var: String,
    /// Explicit API key; when set, `key_env_var` is not consulted.
    pub api_key: Option<String>,
    /// Per-request timeout. `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_base: GOOGLE_MAPS_API.to_string(),
            api: API.to_string(),
            search_component: SEARCH_COMPONENT.to_string(),
            output_type: OUTPUT_TYPE.to_string(),
            radius: RADIUS,
            key_env_var: KEY_ENV_VAR.to_string(),
            api_key: None,
            timeout: None,
        }
    }
}

impl fmt::Debug for PlacesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacesConfig")
            .field("endpoint", &self.endpoint())
            .field("radius", &self.radius)
            .field("key_env_var", &self.key_env_var)
            .field("api_key_set", &self.api_key.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PlacesConfig {
    /// Endpoint prefix every request URL starts with.
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}{}{}",
            self.api_base, self.api, self.search_component, self.output_type
        )
    }
}
