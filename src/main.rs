use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use taskflow::{config::Config, db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let pool = db::connect(&config).await.map_err(|e| {
        log::error!("Failed to open database {}: {}", config.database_url, e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    log::info!("Starting TaskFlow server at {}", config.server_url());

    let bind_addr = (config.server_host.clone(), config.server_port);
    let pool = web::Data::new(pool);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(config.clone())
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind(bind_addr)?
    .run()
    .await
}
