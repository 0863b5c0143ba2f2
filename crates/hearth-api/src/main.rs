use hearth_core::Config;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Database, storage, job queue, routes
    let (state, router) = hearth_api::setup::initialize_app(config.clone()).await?;

    hearth_api::setup::server::start_server(&config, router).await?;

    state.job_queue.shutdown().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
