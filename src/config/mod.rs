pub mod tracing;

use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Postgres,
    Memory,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppCfg {
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: usize,
    #[serde(default)]
    pub store: StoreKind,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_owned()
}

fn default_token_ttl_minutes() -> i64 {
    30
}

fn default_pool_max_size() -> usize {
    10
}

fn default_run_migrations() -> bool {
    true
}

impl AppCfg {
    /// `appsettings.json` overridden by `APP_*` environment variables.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Json::file("appsettings.json"))
            .merge(Env::prefixed("APP_"))
    }

    pub fn load() -> anyhow::Result<Self> {
        let cfg: Self = Self::figment().extract()?;
        if cfg.store == StoreKind::Postgres && cfg.database_url.is_empty() {
            anyhow::bail!("database_url is required when store = \"postgres\"");
        }
        Ok(cfg)
    }
}
