//! Sunbid Core — calendar, domain types, validation, transformation, API clients.
//!
//! This crate contains the day-ahead bidding machinery:
//! - Delivery-day calendar in civil time (DST-aware day boundaries)
//! - Domain types (volume samples, curve orders, delivery areas)
//! - Volume-series validation (row-walk and columnar strategies)
//! - Volume-to-curve-order transformation with lot rounding
//! - Thin HTTP clients for the forecast and auction services

pub mod calendar;
pub mod client;
pub mod domain;
pub mod transform;
pub mod validate;
