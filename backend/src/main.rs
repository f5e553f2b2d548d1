//! Backend entry-point: configuration, migrations, and server startup.

use std::env;
use std::net::SocketAddr;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

use mealplanner_backend::outbound::persistence::{DbPool, PoolConfig};
use mealplanner_backend::server::{ServerConfig, create_server};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Resolve the token signing secret: `JWT_SECRET` directly, `JWT_SECRET_FILE`
/// for mounted secrets, or a throwaway value in development builds. The
/// throwaway secret invalidates all tokens on restart.
fn jwt_secret() -> std::io::Result<Vec<u8>> {
    if let Ok(secret) = env::var("JWT_SECRET") {
        if !secret.is_empty() {
            return Ok(secret.into_bytes());
        }
    }
    if let Ok(path) = env::var("JWT_SECRET_FILE") {
        return std::fs::read(&path).map_err(|e| {
            std::io::Error::other(format!("failed to read JWT secret at {path}: {e}"))
        });
    }
    let allow_dev = env::var("JWT_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
    if cfg!(debug_assertions) || allow_dev {
        warn!("using throwaway JWT secret (dev only); tokens reset on restart");
        Ok(format!("{}{}", Uuid::new_v4(), Uuid::new_v4()).into_bytes())
    } else {
        Err(std::io::Error::other(
            "JWT_SECRET or JWT_SECRET_FILE must be set",
        ))
    }
}

fn bind_addr() -> std::io::Result<SocketAddr> {
    let raw = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    raw.parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR {raw}: {e}")))
}

/// Apply pending migrations on a blocking thread; the async pool is built
/// only after the schema is current.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url)
            .map_err(|e| std::io::Error::other(format!("database connection failed: {e}")))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
        Ok::<_, std::io::Error>(())
    })
    .await
    .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;
    let secret = jwt_secret()?;
    let addr = bind_addr()?;

    run_migrations(database_url.clone()).await?;

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let config = ServerConfig::new(addr, secret, pool);
    info!(addr = %config.bind_addr(), "starting meal planner backend");
    create_server(config)?.await
}
