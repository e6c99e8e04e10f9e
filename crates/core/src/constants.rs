/// Maximum number of daily points kept per entity.
pub const DEFAULT_WINDOW_DAYS: usize = 365;

/// Minimum series length before the forecasting model is (re)trained.
pub const DEFAULT_MIN_POINTS: usize = 20;

/// Number of future days predicted on each retrain.
pub const DEFAULT_FORECAST_HORIZON: usize = 30;

/// File suffix of a persisted series (`{entity}_data.csv`).
pub const SERIES_FILE_SUFFIX: &str = "_data";

/// File suffix of a persisted forecast (`{entity}_forecast.csv`).
pub const FORECAST_FILE_SUFFIX: &str = "_forecast";
