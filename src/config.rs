use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "./xgb_marketing_model.json";
const DEFAULT_WINDOW_WIDTH: f32 = 520.0;
const DEFAULT_WINDOW_HEIGHT: f32 = 640.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub model_path: PathBuf,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let model_path = lookup("MODEL_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.model_path);

        let window_width = parse_dimension(&lookup, "WINDOW_WIDTH", defaults.window_width)?;
        let window_height = parse_dimension(&lookup, "WINDOW_HEIGHT", defaults.window_height)?;

        Ok(Config { model_path, window_width, window_height })
    }
}

fn parse_dimension<F>(lookup: &F, key: &str, default: f32) -> Result<f32>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value = raw
        .trim()
        .parse::<f32>()
        .with_context(|| format!("Invalid {}: {}", key, raw))?;
    if !value.is_finite() || value < 200.0 {
        anyhow::bail!("Invalid {}: {} (must be at least 200)", key, raw);
    }
    Ok(value)
}
