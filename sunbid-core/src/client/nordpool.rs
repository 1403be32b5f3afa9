//! Nordpool Auction API client.
//!
//! Naming, which the ids in this crate follow:
//! - Product: a traded product, e.g. `CWE_H_DA_1` (exists in several areas)
//! - Area code: a country, e.g. `FR`
//! - Auction: one trading day for a product, e.g. `CWE_H_DA_1-20250519`
//! - Contract: one delivery interval of an auction, e.g. `CWE_H_DA_1-20250520-01`
//!
//! Auth is the OAuth2 password flow against the STS token endpoint
//! (<https://developers.nordpoolgroup.com/reference/auth-introduction>);
//! every other call carries the bearer token. Error bodies follow
//! RFC 7807 and are surfaced as [`ProblemDetails`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::domain::CurveOrder;

const TIMEOUT: Duration = Duration::from_secs(10);
const API_VERSION: &str = "1";

const SCOPE_AUCTION_API: &str = "auction_api";
const CLIENT_AUCTION_API: &str = "client_auction_api";
// base64("client_auction_api:client_auction_api"); the public client
// credential from the Nordpool developer docs, fixed for all users.
const CLIENT_AUTHORISATION: &str = "Y2xpZW50X2F1Y3Rpb25fYXBpOmNsaWVudF9hdWN0aW9uX2FwaQ==";

/// Which Nordpool deployment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Test,
    Prod,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Test => "https://auctions-api.test.nordpoolgroup.com",
            Environment::Prod => "https://auctions-api.nordpoolgroup.com",
        }
    }

    pub fn token_url(self) -> &'static str {
        match self {
            Environment::Test => "https://sts.test.nordpoolgroup.com/connect/token",
            Environment::Prod => "https://sts.nordpoolgroup.com/connect/token",
        }
    }
}

/// RFC 7807 problem document returned on API errors.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (status {}): {}",
            self.title.as_deref().unwrap_or("unknown problem"),
            self.status.unwrap_or(0),
            self.detail.as_deref().unwrap_or("no detail")
        )
    }
}

/// Acknowledgement body for a submitted curve order.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurveOrderReceipt {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub auction_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Error)]
pub enum NordpoolError {
    #[error("authentication against {url} failed with status {status}")]
    Auth { url: String, status: u16 },

    /// The API rejected the request with a structured problem body.
    #[error("Nordpool API error: {0}")]
    Problem(ProblemDetails),

    #[error("network error talking to Nordpool: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected Nordpool response shape: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Authenticated Nordpool Auction API client.
pub struct AuctionClient {
    client: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl AuctionClient {
    /// Authenticate and return a ready client.
    pub fn connect(
        username: &str,
        password: &str,
        env: Environment,
    ) -> Result<Self, NordpoolError> {
        Self::connect_to(env.base_url(), env.token_url(), username, password)
    }

    /// Same as [`connect`](Self::connect) against explicit URLs. Tests
    /// point this at a local server.
    pub fn connect_to(
        base_url: &str,
        token_url: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, NordpoolError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .build()?;

        let form = [
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("scope", SCOPE_AUCTION_API),
            ("client_id", CLIENT_AUCTION_API),
            ("client_secret", CLIENT_AUCTION_API),
        ];
        let response = client
            .post(token_url)
            .header("Authorization", format!("Basic {CLIENT_AUTHORISATION}"))
            .form(&form)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(NordpoolError::Auth {
                url: token_url.to_string(),
                status: status.as_u16(),
            });
        }
        let token: TokenResponse = response
            .json()
            .map_err(|e| NordpoolError::Decode(format!("token endpoint: {e}")))?;
        debug!("authenticated against {token_url}");

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            token: token.access_token,
        })
    }

    /// Triage a response: success bodies parse as JSON, everything else
    /// becomes a `ProblemDetails` (synthesized when the body is not one).
    fn triage(&self, response: reqwest::blocking::Response) -> Result<Value, NordpoolError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .map_err(|e| NordpoolError::Decode(format!("success body: {e}")));
        }
        let body = response.text().unwrap_or_default();
        let problem = serde_json::from_str::<ProblemDetails>(&body).unwrap_or(ProblemDetails {
            title: Some("non-problem error body".to_string()),
            status: Some(status.as_u16()),
            detail: Some(body),
        });
        Err(NordpoolError::Problem(problem))
    }

    fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, NordpoolError> {
        let response = self
            .client
            .get(format!("{}{endpoint}", self.base_url))
            .query(params)
            .bearer_auth(&self.token)
            .send()?;
        self.triage(response)
    }

    /// Auctions closing for bidding within the given ISO-8601 window.
    pub fn auctions(
        &self,
        close_bidding_from: Option<&str>,
        close_bidding_to: Option<&str>,
    ) -> Result<Value, NordpoolError> {
        let mut params = Vec::new();
        if let Some(from) = close_bidding_from {
            params.push(("closeBiddingFrom", from));
        }
        if let Some(to) = close_bidding_to {
            params.push(("closeBiddingTo", to));
        }
        self.get(&format!("/api/v{API_VERSION}/auctions"), &params)
    }

    /// Detail for one auction.
    pub fn auction(&self, auction_id: &str) -> Result<Value, NordpoolError> {
        self.get(&format!("/api/v{API_VERSION}/auctions/{auction_id}"), &[])
    }

    /// Orders already placed on an auction, optionally filtered.
    pub fn orders(
        &self,
        auction_id: &str,
        portfolios: &[&str],
        area_codes: &[&str],
    ) -> Result<Value, NordpoolError> {
        let mut params = Vec::new();
        for p in portfolios {
            params.push(("portfolios", *p));
        }
        for a in area_codes {
            params.push(("areaCodes", *a));
        }
        self.get(
            &format!("/api/v{API_VERSION}/auctions/{auction_id}/orders"),
            &params,
        )
    }

    /// Clearing prices for an auction. Only available for auctions up to
    /// seven days in the past.
    pub fn prices(&self, auction_id: &str) -> Result<Value, NordpoolError> {
        self.get(
            &format!("/api/v{API_VERSION}/auctions/{auction_id}/prices"),
            &[],
        )
    }

    /// Fetch one curve order by its order id.
    pub fn curve_order(&self, order_id: &str) -> Result<Value, NordpoolError> {
        self.get(&format!("/api/v{API_VERSION}/curveorders/{order_id}"), &[])
    }

    /// Submit a new curve order.
    pub fn submit_curve_order(
        &self,
        order: &CurveOrder,
    ) -> Result<CurveOrderReceipt, NordpoolError> {
        let response = self
            .client
            .post(format!("{}/api/v{API_VERSION}/curveorders", self.base_url))
            .bearer_auth(&self.token)
            .json(order)
            .send()?;
        let body = self.triage(response)?;
        serde_json::from_value(body)
            .map_err(|e| NordpoolError::Decode(format!("curve order receipt: {e}")))
    }
}
