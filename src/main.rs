use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;
use std::sync::Arc;

use todo_app::config::Config;
use todo_app::routes;
use todo_app::state::AppState;
use todo_app::store::PgStore;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let store = PgStore::connect(&config.database_url, config.database_max_connections)
        .await
        .map_err(|e| {
            log::error!("Failed to prepare database: {}", e);
            io::Error::new(io::ErrorKind::Other, e)
        })?;

    let state = web::Data::new(AppState::from_config(Arc::new(store), &config));
    if !state.enforce_task_ownership {
        log::warn!("Task ownership checks are disabled; any user can read and modify any task");
    }

    log::info!("Starting server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config(state.clone()))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
