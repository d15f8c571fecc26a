use anyhow::anyhow;
use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .unwrap_or(3001),

            database_url: match env::var("DATABASE_URL") {
                Ok(url) => url,
                Err(_) => compose_database_url()?,
            },

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
        })
    }
}

/// Falls back to the discrete `DB_*` variables when `DATABASE_URL` is unset.
fn compose_database_url() -> anyhow::Result<String> {
    let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());
    let user =
        env::var("DB_USER").map_err(|_| anyhow!("set DATABASE_URL or DB_USER in the environment"))?;
    let password = env::var("DB_PASS").unwrap_or_default();
    let name =
        env::var("DB_NAME").map_err(|_| anyhow!("set DATABASE_URL or DB_NAME in the environment"))?;

    Ok(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
}
