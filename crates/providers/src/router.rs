//! Provider router: builds the configured planner.
//!
//! Resolves a provider name to its well-known base URL (unless `api_url`
//! overrides it) and checks that hosted providers have an API key.

use std::sync::Arc;
use std::time::Duration;

use agentdev_config::AppConfig;
use agentdev_core::error::PlannerError;
use agentdev_core::planner::Planner;

use crate::openai_compat::OpenAiCompatProvider;

/// Build the planner described by `config.planner`.
///
/// A provider of the form `custom:https://host/v1` points at an arbitrary
/// OpenAI-compatible endpoint.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Planner>, PlannerError> {
    let planner = &config.planner;

    let (name, default_url) = match planner.provider.strip_prefix("custom:") {
        Some(url) => ("custom".to_string(), Some(url.to_string())),
        None => (planner.provider.clone(), default_base_url(&planner.provider)),
    };

    let base_url = planner
        .api_url
        .clone()
        .or(default_url)
        .ok_or_else(|| {
            PlannerError::NotConfigured(format!(
                "unknown provider '{name}', set planner.api_url"
            ))
        })?;

    let api_key = match &planner.api_key {
        Some(key) => key.clone(),
        None if is_local(&name) || name == "custom" => String::new(),
        None => {
            return Err(PlannerError::NotConfigured(format!(
                "provider '{name}' needs an API key (planner.api_key or AGENTDEV_API_KEY)"
            )));
        }
    };

    tracing::info!(provider = %name, model = %planner.model, url = %base_url, "Planner configured");

    Ok(Arc::new(
        OpenAiCompatProvider::new(name, base_url, api_key, planner.model.clone())
            .with_temperature(planner.temperature)
            .with_max_tokens(planner.max_tokens)
            .with_timeout(Duration::from_secs(planner.timeout_secs)),
    ))
}

/// Providers that run on the local machine and need no key.
fn is_local(provider_name: &str) -> bool {
    matches!(provider_name, "ollama" | "vllm" | "llamacpp" | "llama.cpp" | "lmstudio")
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> Option<String> {
    let url = match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1",
        "openai" => "https://api.openai.com/v1",
        "ollama" => "http://localhost:11434/v1",
        "deepseek" => "https://api.deepseek.com/v1",
        "groq" => "https://api.groq.com/openai/v1",
        "together" => "https://api.together.xyz/v1",
        "fireworks" => "https://api.fireworks.ai/inference/v1",
        "vllm" => "http://localhost:8000/v1",
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1",
        "lmstudio" => "http://localhost:1234/v1",
        _ => return None,
    };
    Some(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_ollama() {
        let planner = build_from_config(&AppConfig::default()).unwrap();
        assert_eq!(planner.name(), "ollama");
    }

    #[test]
    fn hosted_provider_without_key_is_not_configured() {
        let mut config = AppConfig::default();
        config.planner.provider = "openrouter".into();
        let err = build_from_config(&config).err().unwrap();
        assert!(matches!(err, PlannerError::NotConfigured(msg) if msg.contains("API key")));
    }

    #[test]
    fn hosted_provider_with_key() {
        let mut config = AppConfig::default();
        config.planner.provider = "openai".into();
        config.planner.api_key = Some("sk-test".into());
        assert_eq!(build_from_config(&config).unwrap().name(), "openai");
    }

    #[test]
    fn custom_endpoint() {
        let mut config = AppConfig::default();
        config.planner.provider = "custom:http://10.0.0.5:9000/v1".into();
        assert_eq!(build_from_config(&config).unwrap().name(), "custom");
    }

    #[test]
    fn unknown_provider_needs_url() {
        let mut config = AppConfig::default();
        config.planner.provider = "mystery".into();
        config.planner.api_key = Some("k".into());
        assert!(build_from_config(&config).is_err());

        config.planner.api_url = Some("https://mystery.example/v1".into());
        assert_eq!(build_from_config(&config).unwrap().name(), "mystery");
    }

    #[test]
    fn well_known_urls() {
        assert_eq!(
            default_base_url("ollama").as_deref(),
            Some("http://localhost:11434/v1")
        );
        assert!(default_base_url("openrouter").unwrap().contains("openrouter.ai"));
        assert!(default_base_url("nope").is_none());
    }
}
