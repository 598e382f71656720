use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use std::fmt::Display;
use std::str::FromStr;

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_file_size: usize,
    pub profile_cache_capacity: u64,
    pub scene_point_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_file_size: default_max_file_size(),
            profile_cache_capacity: 256,
            scene_point_limit: 20,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        let defaults = Config::default();
        Ok(Config {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port)?,
            max_file_size: env_or("MAX_FILE_SIZE", defaults.max_file_size)?,
            profile_cache_capacity: env_or("PROFILE_CACHE_CAPACITY", defaults.profile_cache_capacity)?,
            scene_point_limit: env_or("SCENE_POINT_LIMIT", defaults.scene_point_limit)?,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Failed to load {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
