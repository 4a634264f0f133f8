use anyhow::Result;
use tracing::info;

use text_analysis::{routes, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    text_analysis::init_tracing("text_analysis=debug,tower_http=debug");

    let (config, loaded_path) = Config::discover()?;
    match &loaded_path {
        Some(path) => info!("Loaded configuration from: {}", path),
        None => info!("No config file found, using defaults"),
    }

    let system_config = config.system_config.clone();
    if !std::path::Path::new(&system_config.static_dir).is_dir() {
        info!(
            "Static directory {} does not exist, only the API will be served",
            system_config.static_dir
        );
    }

    let app_state = AppState::new(config);
    let app = routes::build_app(app_state);

    let listener =
        tokio::net::TcpListener::bind((system_config.host.as_str(), system_config.port)).await?;
    let addr = listener.local_addr()?;
    info!("Starting server on {}", addr);
    info!("Access the application at: http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
