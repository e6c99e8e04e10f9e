use tidecast_server::{api::app_router, build_state, config::Config, init_tracing, scheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();
    let state = build_state(&config).await?;

    let bootstrap = state.clone();
    tokio::spawn(async move {
        let trained = bootstrap.orchestrator.retrain_missing().await;
        tracing::info!("Bootstrap retrained {} entities", trained.len());
    });
    if config.monthly_pull {
        scheduler::start_monthly_pull_scheduler(state.clone());
    }

    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
