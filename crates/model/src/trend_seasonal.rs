//! Additive linear trend + day-of-week seasonality model.

use chrono::{Datelike, Days, NaiveDate};
use log::debug;

use crate::errors::ModelError;
use crate::models::{Observation, Prediction};

/// Minimum number of observations needed to estimate a trend.
pub const MIN_OBSERVATIONS: usize = 2;

/// History span (in days) required before weekly offsets are estimated.
const WEEKLY_MIN_SPAN_DAYS: i64 = 14;

/// z-score of an 80% two-sided interval.
const DEFAULT_INTERVAL_Z: f64 = 1.2816;

/// Unfitted model configuration.
#[derive(Debug, Clone, Copy)]
pub struct TrendSeasonalModel {
    weekly: bool,
    interval_z: f64,
}

impl Default for TrendSeasonalModel {
    fn default() -> Self {
        Self {
            weekly: true,
            interval_z: DEFAULT_INTERVAL_Z,
        }
    }
}

impl TrendSeasonalModel {
    /// Disables the weekly component.
    pub fn without_weekly(mut self) -> Self {
        self.weekly = false;
        self
    }

    /// Sets the z-score used for the uncertainty interval.
    pub fn with_interval_z(mut self, z: f64) -> Self {
        self.interval_z = z;
        self
    }

    /// Fits the model to a strictly ascending daily history.
    pub fn fit(&self, history: &[Observation]) -> Result<FittedTrendSeasonal, ModelError> {
        if history.len() < MIN_OBSERVATIONS {
            return Err(ModelError::InsufficientData {
                required: MIN_OBSERVATIONS,
                actual: history.len(),
            });
        }
        for (index, obs) in history.iter().enumerate() {
            if !obs.y.is_finite() {
                return Err(ModelError::NonFiniteValue { index });
            }
        }
        for pair in history.windows(2) {
            if pair[1].ds <= pair[0].ds {
                return Err(ModelError::UnorderedInput { ds: pair[1].ds });
            }
        }

        let origin = history[0].ds;
        let ts: Vec<f64> = history
            .iter()
            .map(|o| (o.ds - origin).num_days() as f64)
            .collect();
        let n = history.len() as f64;

        let sum_t: f64 = ts.iter().sum();
        let sum_y: f64 = history.iter().map(|o| o.y).sum();
        let sum_t2: f64 = ts.iter().map(|t| t * t).sum();
        let sum_ty: f64 = ts.iter().zip(history).map(|(t, o)| t * o.y).sum();

        // Distinct ascending dates guarantee a positive denominator.
        let denominator = n * sum_t2 - sum_t * sum_t;
        let slope = (n * sum_ty - sum_t * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_t) / n;

        let residuals: Vec<f64> = ts
            .iter()
            .zip(history)
            .map(|(t, o)| o.y - (intercept + slope * t))
            .collect();

        let span = (history[history.len() - 1].ds - origin).num_days();
        let weekly = if self.weekly && span >= WEEKLY_MIN_SPAN_DAYS {
            Some(weekday_offsets(history, &residuals))
        } else {
            None
        };

        let sse: f64 = history
            .iter()
            .zip(&residuals)
            .map(|(o, r)| {
                let seasonal = weekly.map_or(0.0, |w| w[weekday_index(o.ds)]);
                (r - seasonal).powi(2)
            })
            .sum();
        let dof = (history.len() as f64 - 2.0).max(1.0);
        let sigma = (sse / dof).sqrt();

        debug!(
            "Fitted trend model on {} observations: slope={:.4}, sigma={:.4}, weekly={}",
            history.len(),
            slope,
            sigma,
            weekly.is_some()
        );

        Ok(FittedTrendSeasonal {
            origin,
            history_dates: history.iter().map(|o| o.ds).collect(),
            intercept,
            slope,
            weekly,
            sigma,
            interval_z: self.interval_z,
        })
    }
}

/// A fitted model, ready to predict.
#[derive(Debug, Clone)]
pub struct FittedTrendSeasonal {
    origin: NaiveDate,
    history_dates: Vec<NaiveDate>,
    intercept: f64,
    slope: f64,
    weekly: Option<[f64; 7]>,
    sigma: f64,
    interval_z: f64,
}

impl FittedTrendSeasonal {
    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn residual_std(&self) -> f64 {
        self.sigma
    }

    pub fn has_weekly_component(&self) -> bool {
        self.weekly.is_some()
    }

    /// Predicts every fitted history date followed by `horizon` future days.
    pub fn predict(&self, horizon: usize) -> Result<Vec<Prediction>, ModelError> {
        let last = *self
            .history_dates
            .last()
            .ok_or(ModelError::InsufficientData {
                required: MIN_OBSERVATIONS,
                actual: 0,
            })?;
        let n = self.history_dates.len() as f64;

        let mut out = Vec::with_capacity(self.history_dates.len() + horizon);
        for ds in &self.history_dates {
            out.push(self.predict_at(*ds, 1.0));
        }
        for step in 1..=horizon {
            let ds = last
                .checked_add_days(Days::new(step as u64))
                .ok_or(ModelError::DateOutOfRange)?;
            let widen = (1.0 + step as f64 / n).sqrt();
            out.push(self.predict_at(ds, widen));
        }
        Ok(out)
    }

    fn predict_at(&self, ds: NaiveDate, widen: f64) -> Prediction {
        let t = (ds - self.origin).num_days() as f64;
        let seasonal = self.weekly.map_or(0.0, |w| w[weekday_index(ds)]);
        let yhat = self.intercept + self.slope * t + seasonal;
        let half_width = self.interval_z * self.sigma * widen;
        Prediction {
            ds,
            yhat,
            yhat_lower: yhat - half_width,
            yhat_upper: yhat + half_width,
        }
    }
}

fn weekday_index(ds: NaiveDate) -> usize {
    ds.weekday().num_days_from_monday() as usize
}

/// Mean residual per weekday, centred so the present weekdays average zero.
fn weekday_offsets(history: &[Observation], residuals: &[f64]) -> [f64; 7] {
    let mut sums = [0.0_f64; 7];
    let mut counts = [0_usize; 7];
    for (obs, r) in history.iter().zip(residuals) {
        let idx = weekday_index(obs.ds);
        sums[idx] += r;
        counts[idx] += 1;
    }

    let mut offsets = [0.0_f64; 7];
    let mut present = 0usize;
    let mut total = 0.0;
    for idx in 0..7 {
        if counts[idx] > 0 {
            offsets[idx] = sums[idx] / counts[idx] as f64;
            total += offsets[idx];
            present += 1;
        }
    }
    if present > 0 {
        let mean = total / present as f64;
        for idx in 0..7 {
            if counts[idx] > 0 {
                offsets[idx] -= mean;
            }
        }
    }
    offsets
}
