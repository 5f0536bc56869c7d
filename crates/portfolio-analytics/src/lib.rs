//! Decision-support analytics for property-management portfolios.

pub mod analytics;
pub mod config;
pub mod error;
pub mod telemetry;
