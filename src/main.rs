use std::io;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use planora_api::config::AppConfig;
use planora_api::db;
use planora_api::routes;
use planora_api::services::emergency_service::EmergencyServiceFinder;
use planora_api::services::http::build_client;
use planora_api::services::trip_planner_service::TripPlannerService;

#[actix_web::main]
async fn main() -> io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    log::info!("Application starting...");

    let config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let http_client =
        build_client(&config).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let client = db::mongo::create_mongo_client(&config.mongodb_uri)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    if let Err(e) = db::mongo::ensure_indexes(&client).await {
        log::warn!("Failed to create user indexes: {}", e);
    }

    let planner = web::Data::new(TripPlannerService::new(&config, http_client.clone()));
    let finder = web::Data::new(EmergencyServiceFinder::new(&config, http_client));
    let mongo = web::Data::new(client);
    let bind_addr = (config.host.clone(), config.port);
    let config = web::Data::new(config);

    log::info!("Starting HTTP server on {}:{}", bind_addr.0, bind_addr.1);

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
            .app_data(config.clone())
            .app_data(mongo.clone())
            .app_data(planner.clone())
            .app_data(finder.clone())
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
