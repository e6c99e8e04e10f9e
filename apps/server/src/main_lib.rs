use std::sync::Arc;

use crate::config::Config;
use tidecast_core::{
    entities::EntityRegistry,
    forecast::{Forecaster, TrendSeasonalForecaster},
    sources::{PocketBaseRecordStore, RecordStore},
    update::{UpdateOrchestrator, UpdateOrchestratorTrait},
};
use tidecast_storage_csv::{CsvForecastRepository, CsvSeriesRepository, DataDir};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub orchestrator: Arc<dyn UpdateOrchestratorTrait + Send + Sync>,
}

pub fn init_tracing() {
    let fmt_layer = fmt::layer().json().with_current_span(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Builds the state with the default model and, when configured, PocketBase.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let record_store: Option<Arc<dyn RecordStore>> = match &config.pocketbase_url {
        Some(url) => {
            tracing::info!("Remote record store: {}", url);
            Some(Arc::new(PocketBaseRecordStore::new(url)?))
        }
        None => {
            tracing::warn!("POCKETBASE_URL not set; monthly pulls are disabled");
            None
        }
    };
    build_state_with(
        config,
        Arc::new(TrendSeasonalForecaster::default()),
        record_store,
    )
    .await
}

/// Builds the state around an explicit forecaster and record store.
pub async fn build_state_with(
    config: &Config,
    forecaster: Arc<dyn Forecaster>,
    record_store: Option<Arc<dyn RecordStore>>,
) -> anyhow::Result<Arc<AppState>> {
    let registry = match &config.entities_file {
        Some(path) => EntityRegistry::load(path)?,
        None => EntityRegistry::builtin(),
    };
    let names: Vec<String> = registry.names().iter().map(|n| n.to_string()).collect();
    tracing::info!("Configured entities: {}", names.join(", "));

    let data_dir = Arc::new(DataDir::open(&config.data_dir)?);
    tracing::info!("Data directory in use: {}", data_dir.root().display());

    let orchestrator = UpdateOrchestrator::new(
        Arc::new(registry),
        Arc::new(CsvSeriesRepository::new(data_dir.clone())),
        Arc::new(CsvForecastRepository::new(data_dir.clone())),
        forecaster,
        record_store,
        config.pipeline,
    );

    Ok(Arc::new(AppState {
        orchestrator: Arc::new(orchestrator),
    }))
}
