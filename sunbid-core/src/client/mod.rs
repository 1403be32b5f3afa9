//! HTTP clients for the two external services.
//!
//! Both clients are thin: blocking reqwest, one authentication per
//! construction, typed DTOs for the bodies we consume and raw JSON where
//! the payload feeds straight into validation. No retry policy and no
//! token refresh; callers rebuild a client when a token expires.

pub mod nordpool;
pub mod streem;

pub use nordpool::{AuctionClient, Environment, NordpoolError, ProblemDetails};
pub use streem::{ForecastType, Installation, Resolution, StreemClient, StreemError};
