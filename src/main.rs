// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, shared state, and start HTTP server

use actix_web::{middleware::Logger, App, HttpServer};
use dotenv::dotenv;
use estate_portal::config::Config;
use estate_portal::services::start_cleanup_task;
use estate_portal::AppState;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            format!("{},actix_web=info", config.log_level)
        } else {
            "info,actix_web=info".to_string()
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting estate-portal gateway...");
    log::info!("Environment: {}", config.environment);
    log::info!("Backend: {}", config.api_base_url);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Build shared state (backend client, session keys, auth throttle)
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let state = match AppState::from_config(config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to initialize application state: {}", e);
            std::process::exit(1);
        }
    };

    // Drop idle rate-limit entries every 5 minutes
    start_cleanup_task(state.throttle.clone().into_inner(), 300);
    log::info!("Started auth throttle cleanup task (interval: 5 minutes)");

    // 5. Start HTTP server
    HttpServer::new(move || {
        App::new()
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // State and routes
            .configure(|cfg| state.register(cfg))
    })
    .bind(&server_addr)?
    .run()
    .await
}
