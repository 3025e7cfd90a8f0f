// src/config/provider.rs
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Chat model to use. Defaults to gpt-3.5-turbo.
    #[serde(default = "default_model")]
    pub model: String,
    /// "ENV" means: read from OPENAI_API_KEY.
    pub api_key: String,
}

impl ProviderConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let cfg: ProviderConfig = serde_json::from_str(&data)?;
        cfg.resolve()
    }

    /// Build purely from the environment (no config file on disk).
    pub fn from_env() -> anyhow::Result<Self> {
        ProviderConfig {
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| default_model()),
            api_key: "ENV".to_string(),
        }
        .resolve()
    }

    fn resolve(mut self) -> anyhow::Result<Self> {
        // Resolve api key if "ENV"
        if self.api_key.trim().eq_ignore_ascii_case("env") {
            self.api_key = env::var("OPENAI_API_KEY")
                .map_err(|_| anyhow::anyhow!("Missing OPENAI_API_KEY env var"))?;
        }
        if self.model.trim().is_empty() {
            self.model = default_model();
        }
        Ok(self)
    }
}
