mod env;
mod types;


pub use types::*;

use std::path::Path;

use anyhow::{Context, bail};

use crate::vault::{Secret, VaultProvider};

/// Vault keys for the model API key, most specific first.
pub const LLM_API_KEY_VARS: [&str; 2] = ["NEUROMENTOR_LLM_API_KEY", "GOOGLE_API_KEY"];
/// Vault keys for the Serper search API key, most specific first.
pub const SERPER_API_KEY_VARS: [&str; 2] = ["NEUROMENTOR_SERPER_API_KEY", "SERPER_API_KEY"];

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or if
    /// the resulting values fail [`Config::validate`].
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.rag.chunk_size == 0 {
            bail!("rag.chunk_size must be greater than zero");
        }
        if self.rag.top_k == 0 {
            bail!("rag.top_k must be greater than zero");
        }
        if self.search.max_results == 0 {
            bail!("search.max_results must be greater than zero");
        }
        if self.search.timeout_seconds == 0 {
            bail!("search.timeout_seconds must be greater than zero");
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            bail!(
                "llm.temperature must be within [0, 2], got {}",
                self.llm.temperature
            );
        }
        Ok(())
    }

    /// Resolve API keys through the vault.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault backend fails.
    pub async fn resolve_secrets(&mut self, vault: &dyn VaultProvider) -> anyhow::Result<()> {
        if let Some(val) = first_secret(vault, &LLM_API_KEY_VARS).await? {
            self.secrets.llm_api_key = Some(Secret::new(val));
        }
        if let Some(val) = first_secret(vault, &SERPER_API_KEY_VARS).await? {
            self.secrets.serper_api_key = Some(Secret::new(val));
        }
        Ok(())
    }
}

async fn first_secret(vault: &dyn VaultProvider, keys: &[&str]) -> anyhow::Result<Option<String>> {
    for key in keys {
        if let Some(val) = vault.get_secret(key).await?
            && !val.trim().is_empty()
        {
            return Ok(Some(val));
        }
    }
    Ok(None)
}
