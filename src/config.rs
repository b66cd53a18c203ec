use anyhow::Context;
use serde::Deserialize;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a board game expert and can pick the right game for any request. \
Answer briefly and to the point, without diagrams or lists.";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub site_url: Option<String>,
    pub site_title: Option<String>,
    pub system_prompt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub chat: ChatConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => postgres_dsn_from_parts()?,
        };

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: env_or("JWT_ISSUER", "boardbox"),
            audience: env_or("JWT_AUDIENCE", "boardbox-users"),
            ttl_minutes: parse_env("JWT_TTL_MINUTES", 60 * 24)?,
        };

        let chat = ChatConfig {
            api_key: env_or("CHAT_API_KEY", ""),
            base_url: env_or("CHAT_BASE_URL", "https://openrouter.ai/api/v1"),
            model: env_or("CHAT_MODEL", "meta-llama/llama-4-scout:free"),
            site_url: std::env::var("CHAT_SITE_URL").ok(),
            site_title: std::env::var("CHAT_SITE_TITLE").ok(),
            system_prompt: env_or("CHAT_SYSTEM_PROMPT", DEFAULT_SYSTEM_PROMPT),
        };

        Ok(Self {
            database_url,
            max_connections: parse_env("PG_MAX_CONNS", 10)?,
            host: env_or("APP_HOST", "0.0.0.0"),
            port: parse_env("APP_PORT", 8080)?,
            jwt,
            chat,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn postgres_dsn_from_parts() -> anyhow::Result<String> {
    let port: u16 = parse_env("PG_PORT", 5432)?;
    Ok(format!(
        "postgres://{}:{}@{}:{}/{}?sslmode={}",
        env_or("PG_USER", "user"),
        env_or("PG_PASSWORD", "password"),
        env_or("PG_HOST", "localhost"),
        port,
        env_or("PG_DBNAME", "boardbox"),
        env_or("PG_SSLMODE", "disable"),
    ))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("invalid {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}
