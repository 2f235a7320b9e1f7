use gateway::config::GatewayConfig;
use tracing_subscriber::EnvFilter;

fn main() {
    let (config, problem) = GatewayConfig::load();

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(problem) = problem {
        tracing::warn!("[Gateway] Config problem, using defaults: {problem}");
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("[Gateway] Failed to start async runtime: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = runtime.block_on(gateway::web::serve(config)) {
        tracing::error!("[Gateway] {e}");
        std::process::exit(1);
    }
}
