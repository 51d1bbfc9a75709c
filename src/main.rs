use std::io;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use taskdesk::auth::{PasswordHasher, TokenService};
use taskdesk::{db, routes, Config};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let pool = db::connect(&config.database_url).await.map_err(|e| {
        log::error!("failed to open database: {}", e);
        io::Error::new(io::ErrorKind::Other, e)
    })?;

    let pool = web::Data::new(pool);
    let tokens = web::Data::new(TokenService::from_config(&config));
    let hasher = web::Data::new(PasswordHasher::new(config.bcrypt_cost));

    log::info!("starting TaskDesk server at {}", config.server_url());

    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(tokens.clone())
            .app_data(hasher.clone())
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
