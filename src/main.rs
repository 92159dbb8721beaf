use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;

use taskvault::config::Config;
use taskvault::error;
use taskvault::repository::{mongo, MongoTaskRepository, MongoUserRepository};
use taskvault::routes;
use taskvault::services::{AuthService, TaskService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("configuration error: {}", err);
            std::process::exit(1);
        }
    };

    let database = match mongo::connect(&config.mongo).await {
        Ok(database) => database,
        Err(err) => {
            log::error!("failed to connect to MongoDB: {}", err);
            std::process::exit(1);
        }
    };
    if let Err(err) = mongo::ensure_indexes(&database).await {
        log::error!("failed to create indexes: {}", err);
        std::process::exit(1);
    }

    let users = Arc::new(MongoUserRepository::new(&database));
    let tasks = Arc::new(MongoTaskRepository::new(&database));
    let auth_service = web::Data::new(AuthService::new(users, config.clone()));
    let task_service = web::Data::new(TaskService::new(tasks));
    let app_config = web::Data::new(config.clone());

    let port = config.server.port;
    log::info!("starting server on 0.0.0.0:{} ({})", port, config.server.mode);

    HttpServer::new(move || {
        App::new()
            .app_data(auth_service.clone())
            .app_data(task_service.clone())
            .app_data(app_config.clone())
            .app_data(error::json_config())
            .app_data(error::query_config())
            .app_data(error::path_config())
            .wrap(Logger::default())
            .wrap(routes::security_headers())
            .wrap(routes::cors(&config))
            .configure(routes::configure(&config))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
