//! Backend factory for creating backend instances from configuration.

use anyhow::{anyhow, Context, Result};
use std::time::Duration;

use super::{memory::MemoryBackend, microsoft_todo::MicrosoftTodoBackend, Backend};
use crate::config::RemoteConfig;

/// Create a backend instance from the `[remote]` configuration section.
///
/// # Arguments
/// * `config` - Remote configuration naming the backend type and its settings
/// * `access_token` - Bearer token for backends that need one
///
/// # Errors
/// Returns error if:
/// - Backend type is unknown
/// - A required token or list id is missing
/// - The HTTP client cannot be built
pub fn create_backend(config: &RemoteConfig, access_token: Option<String>) -> Result<Box<dyn Backend>> {
    match config.backend_type.as_str() {
        "microsoft_todo" => {
            let token = access_token
                .ok_or_else(|| anyhow!("Missing access token for the Microsoft To Do backend"))?;
            if config.list_id.is_empty() {
                anyhow::bail!("Missing 'list_id' for the Microsoft To Do backend");
            }
            let backend = MicrosoftTodoBackend::new(
                &config.base_url,
                config.list_id.clone(),
                token,
                Duration::from_secs(config.request_timeout_secs),
            )
            .context("Failed to build Microsoft To Do client")?;
            Ok(Box::new(backend))
        }
        "memory" => Ok(Box::new(MemoryBackend::new())),
        other => Err(anyhow!("Unknown backend type: {}", other)),
    }
}

/// Read the access token from the environment variable named in the config.
pub fn access_token_from_env(config: &RemoteConfig) -> Option<String> {
    std::env::var(&config.api_token_env)
        .ok()
        .filter(|token| !token.trim().is_empty())
}
