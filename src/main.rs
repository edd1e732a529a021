use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use score_pow::api::{self, AppState};
use score_pow::config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();
    let host = config.host.clone();
    let port = config.port;

    let state = web::Data::new(AppState::new(config));
    info!(
        "Starting score node at http://{host}:{port} ({} workers, strength {})",
        state.coordinator.threads(),
        state.config.score_strength
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
