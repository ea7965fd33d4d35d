//! Knowledge-management risk analytics: personnel filtering, risk
//! aggregation and monthly KPI health tracking.

pub mod chart;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod kpi;
pub mod logging;
pub mod models;
pub mod report;
pub mod risk;
pub mod session;
pub mod store;
pub mod workshop;

pub use error::{Error, Result};
