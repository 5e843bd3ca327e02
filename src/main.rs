//! Gatherly engine process
//!
//! Main application entry point: loads configuration, prepares the
//! database, wires the services, and runs the lifecycle scheduler until
//! interrupted.

use std::sync::Arc;
use tracing::info;

use gatherly::{
    config::Settings,
    database::{connection, DatabaseService},
    scheduler,
    services::{LogMailer, Mailer, ServiceFactory},
    utils::logging,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", gatherly::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        ..connection::DatabaseConfig::default()
    };
    let pool = connection::create_pool(&db_config).await?;

    // Run database migrations
    connection::run_migrations(&pool).await?;

    // Initialize services
    let db = DatabaseService::new(pool);
    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);
    let services = ServiceFactory::new(db.clone(), settings.clone(), mailer);

    // Start the lifecycle scheduler
    let mut job_scheduler = scheduler::start(
        db,
        services.notification_service.clone(),
        &settings.scheduler,
    )
    .await?;

    info!("Gatherly engine is ready");

    tokio::signal::ctrl_c().await?;

    info!("Shutting down...");
    job_scheduler
        .shutdown()
        .await
        .map_err(|e| gatherly::GatherlyError::Scheduler(e.to_string()))?;

    info!("Gatherly engine has been shut down.");

    Ok(())
}
