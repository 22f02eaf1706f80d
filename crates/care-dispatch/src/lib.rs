//! Support request dispatch: request list filtering, manual dispatch
//! controls, overview and reporting views.

pub mod analytics;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod notify;
pub mod overview;
pub mod requests;
pub mod sample;
pub mod telemetry;

pub use error::AppError;
