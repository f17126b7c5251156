use flock_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment + config
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. Logging (work_dir must exist before the file appender can)
    config.ensure_work_dir_structure()?;
    setup_environment(&config);

    tracing::info!("Flock check-in station starting...");

    // 3. State (database, queue, services, startup fixes)
    let state = ServerState::initialize(&config).await?;

    // 4. Serve (spawns the offline sync worker alongside)
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {e}");
        return Err(e.into());
    }

    Ok(())
}
