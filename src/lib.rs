//! Intraday gainers and losers over a configured ticker list, served as JSON.

pub mod config;
pub mod error;
pub mod provider;
pub mod ranking;
pub mod routes;
pub mod state;
pub mod stocks;
