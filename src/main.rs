use actix_web::{web, App, HttpServer};
use log::{error, info};
use std::sync::Arc;

use uptimer_api::{controllers, AppState, Config, JsonFileStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting uptimer-api v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    info!(
        "Registry: {}, probe timeout: {}s, max concurrent probes: {}",
        config.services_path.display(),
        config.probe_timeout.as_secs(),
        config.max_concurrent_probes
    );

    let store = Arc::new(JsonFileStore::new(config.services_path.clone()));
    let state = match AppState::new(store, &config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            std::process::exit(1);
        }
    };

    info!("Server is live at http://{}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(controllers::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
