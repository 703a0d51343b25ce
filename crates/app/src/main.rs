use std::path::Path;

use engine::AlertThresholds;
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "repas={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let server = settings.server;
    tracing::info!("Opening database {:?}...", server.database);
    let db = parse_database(&server.database).await?;

    let thresholds = AlertThresholds::from(&settings.alerts);
    tracing::info!(
        "alerts below {} servings per guest, crowd from {} guests",
        thresholds.min_servings_per_guest,
        thresholds.crowd_size
    );
    let engine = engine::Engine::builder()
        .database(db)
        .thresholds(thresholds)
        .build()
        .await?;

    let origin: server::CorsOrigin = server.cors_origin.parse()?;
    let addr = format!("{}:{}", server.bind, server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(engine, origin, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => {
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            format!("sqlite:{}?mode=rwc", path)
        }
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
