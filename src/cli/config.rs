//! Configuration CLI command handlers

use url::Url;

use crate::cli::commands::{ConfigCommand, ConfigKey};
use crate::cli::parse_language;
use crate::core::config::{Config, GeminiModel, Language, Provider, Style};
use crate::core::credentials::{CredentialKind, CredentialStore};
use crate::error::{Result, ScribeError};

/// Handle configuration commands
pub fn handle_config(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Set { key, value } => handle_set(key, &value),
        ConfigCommand::Get { key } => handle_get(key),
        ConfigCommand::Remove { key } => handle_remove(key),
    }
}

fn handle_set(key: ConfigKey, value: &str) -> Result<()> {
    if let Some(kind) = credential_kind(key) {
        CredentialStore::store(kind, value.trim())?;
        println!("{} has been stored securely.", key_label(key));
        return Ok(());
    }

    let mut config = Config::load()?;
    apply_value(&mut config, key, value)?;
    config.save()?;
    println!("{} set to: {}", key_label(key), describe(&config, key));
    Ok(())
}

fn handle_get(key: ConfigKey) -> Result<()> {
    if let Some(kind) = credential_kind(key) {
        match CredentialStore::get(kind)? {
            Some(secret) => println!(
                "{}: {}",
                key_label(key),
                CredentialStore::mask_token(&secret)
            ),
            None => println!("{}: Not configured", key_label(key)),
        }
        return Ok(());
    }

    let config = Config::load()?;
    println!("{}: {}", key_label(key), describe(&config, key));
    Ok(())
}

fn handle_remove(key: ConfigKey) -> Result<()> {
    if let Some(kind) = credential_kind(key) {
        CredentialStore::delete(kind)?;
        println!("{} has been removed.", key_label(key));
        return Ok(());
    }

    let mut config = Config::load()?;
    reset_value(&mut config, key);
    config.save()?;
    println!("{} reset to: {}", key_label(key), describe(&config, key));
    Ok(())
}

fn credential_kind(key: ConfigKey) -> Option<CredentialKind> {
    match key {
        ConfigKey::GeminiKey => Some(CredentialKind::GeminiKey),
        ConfigKey::OpenAiKey => Some(CredentialKind::OpenAiKey),
        _ => None,
    }
}

fn key_label(key: ConfigKey) -> &'static str {
    match key {
        ConfigKey::GeminiKey => "Gemini API key",
        ConfigKey::OpenAiKey => "OpenAI API key",
        ConfigKey::Provider => "Provider",
        ConfigKey::Model => "Model",
        ConfigKey::Language => "Language",
        ConfigKey::Style => "Style",
        ConfigKey::OpenAiBaseUrl => "OpenAI base URL",
    }
}

/// Validate `value` and write it into `config`
fn apply_value(config: &mut Config, key: ConfigKey, value: &str) -> Result<()> {
    let value = value.trim();
    match key {
        ConfigKey::Provider => {
            config.provider = Provider::parse(value).ok_or_else(|| {
                invalid(value, Provider::all().iter().map(|p| p.key()))
            })?;
        }
        ConfigKey::Model => match config.provider {
            Provider::Gemini => {
                config.gemini_model = GeminiModel::parse(value).ok_or_else(|| {
                    invalid(value, GeminiModel::all().iter().map(|m| m.api_name()))
                })?;
            }
            Provider::OpenAi => {
                if value.is_empty() {
                    return Err(ScribeError::InvalidInput("Model name is empty".to_string()));
                }
                config.openai_model = value.to_string();
            }
        },
        ConfigKey::Language => config.language = parse_language(value)?,
        ConfigKey::Style => {
            config.style = Style::parse(value)
                .ok_or_else(|| invalid(value, Style::all().iter().map(|s| s.key())))?;
        }
        ConfigKey::OpenAiBaseUrl => {
            let url = Url::parse(value)
                .map_err(|e| ScribeError::InvalidInput(format!("Invalid URL '{}': {}", value, e)))?;
            config.openai_base_url = Some(url.as_str().trim_end_matches('/').to_string());
        }
        ConfigKey::GeminiKey | ConfigKey::OpenAiKey => {}
    }
    Ok(())
}

fn reset_value(config: &mut Config, key: ConfigKey) {
    let defaults = Config::default();
    match key {
        ConfigKey::Provider => config.provider = defaults.provider,
        ConfigKey::Model => match config.provider {
            Provider::Gemini => config.gemini_model = defaults.gemini_model,
            Provider::OpenAi => config.openai_model = defaults.openai_model,
        },
        ConfigKey::Language => config.language = defaults.language,
        ConfigKey::Style => config.style = defaults.style,
        ConfigKey::OpenAiBaseUrl => config.openai_base_url = None,
        ConfigKey::GeminiKey | ConfigKey::OpenAiKey => {}
    }
}

fn describe(config: &Config, key: ConfigKey) -> String {
    match key {
        ConfigKey::Provider => config.provider.display_name().to_string(),
        ConfigKey::Model => match config.provider {
            Provider::Gemini => format!(
                "{} ({})",
                config.gemini_model.display_name(),
                config.gemini_model.api_name()
            ),
            Provider::OpenAi => config.openai_model.clone(),
        },
        ConfigKey::Language => describe_language(config.language),
        ConfigKey::Style => config.style.key().to_string(),
        ConfigKey::OpenAiBaseUrl => config
            .openai_base_url
            .clone()
            .unwrap_or_else(|| "(default) https://api.openai.com/v1".to_string()),
        ConfigKey::GeminiKey | ConfigKey::OpenAiKey => String::new(),
    }
}

fn describe_language(language: Language) -> String {
    format!("{} ({})", language.english_name(), language.code())
}

fn invalid<'a>(value: &str, allowed: impl Iterator<Item = &'a str>) -> ScribeError {
    ScribeError::InvalidInput(format!(
        "Invalid value '{}'. Available: {}",
        value,
        allowed.collect::<Vec<_>>().join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_follows_active_provider() {
        let mut config = Config::default();
        apply_value(&mut config, ConfigKey::Model, "gemini-2.5-pro").unwrap();
        assert_eq!(config.gemini_model, GeminiModel::Gemini25Pro);

        apply_value(&mut config, ConfigKey::Provider, "openai").unwrap();
        apply_value(&mut config, ConfigKey::Model, "gpt-4.1").unwrap();
        assert_eq!(config.openai_model, "gpt-4.1");
        assert_eq!(config.gemini_model, GeminiModel::Gemini25Pro);
    }

    #[test]
    fn test_invalid_values_list_alternatives() {
        let mut config = Config::default();
        let err = apply_value(&mut config, ConfigKey::Style, "verbose").unwrap_err();
        assert!(err.to_string().contains("simple, normal, detailed"));

        assert!(apply_value(&mut config, ConfigKey::Provider, "claude").is_err());
        assert!(apply_value(&mut config, ConfigKey::OpenAiBaseUrl, "not a url").is_err());
    }

    #[test]
    fn test_base_url_is_normalized() {
        let mut config = Config::default();
        apply_value(&mut config, ConfigKey::OpenAiBaseUrl, "http://localhost:8080/v1/").unwrap();
        assert_eq!(
            config.openai_base_url.as_deref(),
            Some("http://localhost:8080/v1")
        );
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut config = Config::default();
        apply_value(&mut config, ConfigKey::Language, "ko").unwrap();
        apply_value(&mut config, ConfigKey::OpenAiBaseUrl, "http://localhost:1/v1").unwrap();

        reset_value(&mut config, ConfigKey::Language);
        reset_value(&mut config, ConfigKey::OpenAiBaseUrl);

        assert_eq!(config.language, Language::English);
        assert_eq!(config.openai_base_url, None);
    }
}
