//! Streem Energy API client.
//!
//! Source of forecast series: <https://app.streem.eu/doc>. Authentication
//! is an email/password exchange for a token that is sent verbatim in the
//! `Authorization` header (no `Bearer` prefix). Forecast payloads are
//! returned as raw JSON values so the validator sees exactly what came
//! off the wire.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const BASE_URL: &str = "https://api.streem.eu";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Forecast flavor accepted by the forecast endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastType {
    Generation,
    DispatchProgram,
}

impl ForecastType {
    fn as_str(self) -> &'static str {
        match self {
            ForecastType::Generation => "Generation",
            ForecastType::DispatchProgram => "Dispatch_Program",
        }
    }
}

/// Sampling resolutions the API understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    FiveMinutes,
    TenMinutes,
    QuarterHour,
    HalfHour,
    Hour,
    Day,
    Month,
}

impl Resolution {
    fn as_str(self) -> &'static str {
        match self {
            Resolution::FiveMinutes => "5m",
            Resolution::TenMinutes => "10m",
            Resolution::QuarterHour => "15m",
            Resolution::HalfHour => "30m",
            Resolution::Hour => "1h",
            Resolution::Day => "1d",
            Resolution::Month => "1M",
        }
    }
}

/// One production site as listed by `/v2/installations`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Installation {
    pub name: String,
    pub client_id: String,
    pub energy: String,
    #[serde(default)]
    pub external_ref: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Error)]
pub enum StreemError {
    /// The service answered with a non-200 status; body kept verbatim.
    #[error("Streem API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("network error talking to Streem: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected Streem response shape: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    auth_token: String,
}

/// Authenticated Streem client.
pub struct StreemClient {
    client: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl StreemClient {
    /// Authenticate and return a ready client.
    pub fn connect(email: &str, password: &str) -> Result<Self, StreemError> {
        Self::connect_to(BASE_URL, email, password)
    }

    /// Same as [`connect`](Self::connect) against an explicit base URL.
    /// Tests point this at a local server.
    pub fn connect_to(base_url: &str, email: &str, password: &str) -> Result<Self, StreemError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .build()?;

        let response = client
            .get(format!("{base_url}/authenticate"))
            .query(&[("email", email), ("password", password)])
            .header("accept", "application/json")
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(StreemError::Api {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        let auth: AuthResponse = response
            .json()
            .map_err(|e| StreemError::Decode(format!("authenticate: {e}")))?;
        debug!("authenticated against {base_url}");

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            token: auth.auth_token,
        })
    }

    fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, StreemError> {
        let response = self
            .client
            .get(format!("{}{endpoint}", self.base_url))
            .query(params)
            .header("accept", "application/json")
            .header("Authorization", &self.token)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(StreemError::Api {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        response
            .json()
            .map_err(|e| StreemError::Decode(format!("{endpoint}: {e}")))
    }

    /// List all installations visible to this account.
    pub fn installations(&self) -> Result<Vec<Installation>, StreemError> {
        let body = self.get("/v2/installations", &[])?;
        serde_json::from_value(body).map_err(|e| StreemError::Decode(format!("installations: {e}")))
    }

    /// Details for one installation by name or client id.
    pub fn installation(&self, name: &str) -> Result<Installation, StreemError> {
        let body = self.get(&format!("/v2/installations/{name}"), &[])?;
        serde_json::from_value(body)
            .map_err(|e| StreemError::Decode(format!("installation {name}: {e}")))
    }

    /// Fetch a forecast series for one installation.
    ///
    /// The result is the untouched JSON array of `{date, data}` items;
    /// run it through validation before trusting its shape.
    pub fn forecast(
        &self,
        name: &str,
        forecast_type: ForecastType,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        resolution: Resolution,
    ) -> Result<Vec<Value>, StreemError> {
        let params = [
            ("type", forecast_type.as_str().to_string()),
            ("start_date", start.to_rfc3339()),
            ("end_date", end.to_rfc3339()),
            ("resolution", resolution.as_str().to_string()),
        ];
        let body = self.get(&format!("/v2/installations/{name}/forecast"), &params)?;
        match body {
            Value::Array(items) => Ok(items),
            other => Err(StreemError::Decode(format!(
                "forecast {name}: expected an array, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_values_for_enums() {
        assert_eq!(ForecastType::Generation.as_str(), "Generation");
        assert_eq!(ForecastType::DispatchProgram.as_str(), "Dispatch_Program");
        assert_eq!(Resolution::QuarterHour.as_str(), "15m");
        assert_eq!(Resolution::Hour.as_str(), "1h");
        assert_eq!(Resolution::Month.as_str(), "1M");
    }

    #[test]
    fn installation_deserializes_with_optional_fields() {
        let full: Installation = serde_json::from_value(json!({
            "name": "sunflow-01",
            "client_id": "SUN-01",
            "energy": "solar",
            "external_ref": "ref-1",
            "latitude": 43.6,
            "longitude": 1.44,
        }))
        .unwrap();
        assert_eq!(full.name, "sunflow-01");
        assert_eq!(full.latitude, Some(43.6));

        let sparse: Installation = serde_json::from_value(json!({
            "name": "sunflow-02",
            "client_id": "SUN-02",
            "energy": "solar",
        }))
        .unwrap();
        assert!(sparse.external_ref.is_none());
        assert!(sparse.longitude.is_none());
    }

    #[test]
    fn auth_response_extracts_token() {
        let auth: AuthResponse =
            serde_json::from_value(json!({"auth_token": "tok-123", "expires": 3600})).unwrap();
        assert_eq!(auth.auth_token, "tok-123");
    }
}
