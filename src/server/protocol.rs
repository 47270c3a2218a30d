//! JSON bodies exchanged with the browser.
//!
//! Request fields are optional at the type level: a missing field, an empty
//! string, and a body that is not JSON at all are all answered with 400.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Query value that marks a visit redirected from `/home`.
pub const SOURCE_HOME: &str = "home";

/// Body of `POST /update-ip`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIpRequest {
    #[serde(default)]
    pub ip: Option<String>,
}

/// Body of `POST /log-click`: a row the browser formatted itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogClickRequest {
    #[serde(default)]
    pub csv_data: Option<String>,
}

/// Response of `GET /get-count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: usize,
}

/// `?source=...` on the landing page and on `/update-ip`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceQuery {
    #[serde(default)]
    pub source: Option<String>,
}

impl SourceQuery {
    pub fn is_home(&self) -> bool {
        self.source.as_deref() == Some(SOURCE_HOME)
    }
}

/// Parse a request body, treating anything unparsable as an empty request.
pub fn parse_lenient<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}

/// `Some(value)` only for a present, non-empty string.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
