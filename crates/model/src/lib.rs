//! Tidecast forecasting model crate.
//!
//! This crate provides the default forecasting model used by the Tidecast
//! server. It has no knowledge of entities, storage, or HTTP: it takes an
//! ordered daily series and returns point predictions with an uncertainty
//! interval.
//!
//! # Model
//!
//! ```text
//! y(t) = intercept + slope * t + weekly[weekday(t)] + noise
//! ```
//!
//! - `t` is the number of days since the first observation, so gaps in the
//!   history are handled naturally.
//! - The weekly component is only estimated once the history spans two full
//!   weeks; shorter histories are fitted with the trend alone.
//! - Intervals use the residual standard deviation at 80% width and widen for
//!   future steps.
//!
//! # Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use tidecast_model::{Observation, TrendSeasonalModel};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let history: Vec<Observation> = (0..30)
//!     .map(|i| Observation::new(start + chrono::Duration::days(i), 100.0 + i as f64))
//!     .collect();
//!
//! let fitted = TrendSeasonalModel::default().fit(&history).unwrap();
//! let predictions = fitted.predict(7).unwrap();
//! assert_eq!(predictions.len(), 37);
//! ```

pub mod errors;
pub mod models;
pub mod trend_seasonal;

pub use errors::ModelError;
pub use models::{Observation, Prediction};
pub use trend_seasonal::{FittedTrendSeasonal, TrendSeasonalModel};
