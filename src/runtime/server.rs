//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::warn;

use crate::api::{self, AdminToken};
use crate::config::AppConfig;
use crate::services::Registry;

/// Run the HTTP server until it is stopped (Ctrl+C / SIGTERM)
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: AppConfig, registry: Registry) -> Result<()> {
    let registry = web::Data::new(registry);
    let admin_token = web::Data::new(AdminToken::new(config.api.admin_token.clone()));
    let admin_prefix = config.api.admin_prefix.clone();

    if admin_token.is_disabled() {
        warn!("Admin token is empty, admin API and /new are disabled");
    }

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .app_data(registry.clone())
            .app_data(admin_token.clone())
            .app_data(web::PayloadConfig::new(64 * 1024))
            .configure(|cfg| api::configure(cfg, &admin_prefix))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(cpu_count)
    .bind(&bind_address)?
    .run()
    .await?;

    warn!("Server stopped");
    Ok(())
}
