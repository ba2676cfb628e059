//! Application configuration management
//!
//! Handles loading and saving application settings including:
//! - Completion provider and model selection
//! - Output language and message style

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::ai::StyleBudget;
use crate::error::{Result, ScribeError};

/// Completion providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    /// Google Gemini (default)
    #[default]
    Gemini,
    /// OpenAI or any OpenAI-compatible endpoint
    #[serde(rename = "openai")]
    OpenAi,
}

impl Provider {
    /// Configuration value for this provider
    pub fn key(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::OpenAi => "OpenAI",
        }
    }

    /// Parse from a configuration value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "gemini" => Some(Provider::Gemini),
            "openai" => Some(Provider::OpenAi),
            _ => None,
        }
    }

    /// Get all providers
    pub fn all() -> &'static [Provider] {
        &[Provider::Gemini, Provider::OpenAi]
    }
}

/// Available Gemini models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GeminiModel {
    /// Gemini 2.0 Flash
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,
    /// Gemini 2.5 Flash (default)
    #[default]
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,
    /// Gemini 2.5 Pro
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,
}

impl GeminiModel {
    /// Get the API model identifier
    pub fn api_name(&self) -> &'static str {
        match self {
            GeminiModel::Gemini20Flash => "gemini-2.0-flash",
            GeminiModel::Gemini25Flash => "gemini-2.5-flash",
            GeminiModel::Gemini25Pro => "gemini-2.5-pro",
        }
    }

    /// Get a human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            GeminiModel::Gemini20Flash => "Gemini 2.0 Flash",
            GeminiModel::Gemini25Flash => "Gemini 2.5 Flash",
            GeminiModel::Gemini25Pro => "Gemini 2.5 Pro",
        }
    }

    /// Parse from the API model identifier
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|m| m.api_name() == s)
    }

    /// Get all available models
    pub fn all() -> &'static [GeminiModel] {
        &[
            GeminiModel::Gemini20Flash,
            GeminiModel::Gemini25Flash,
            GeminiModel::Gemini25Pro,
        ]
    }
}

impl std::fmt::Display for GeminiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.api_name())
    }
}

/// Natural language the generated text is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh-CN")]
    ChineseSimplified,
    #[serde(rename = "zh-TW")]
    ChineseTraditional,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "pt-BR")]
    PortugueseBrazil,
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "vi")]
    Vietnamese,
}

impl Language {
    /// Language code used in configuration
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::ChineseSimplified => "zh-CN",
            Language::ChineseTraditional => "zh-TW",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::German => "de",
            Language::French => "fr",
            Language::Spanish => "es",
            Language::PortugueseBrazil => "pt-BR",
            Language::Russian => "ru",
            Language::Italian => "it",
            Language::Vietnamese => "vi",
        }
    }

    /// English name of the language, as given to the model
    pub fn english_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::ChineseSimplified => "Simplified Chinese",
            Language::ChineseTraditional => "Traditional Chinese",
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
            Language::German => "German",
            Language::French => "French",
            Language::Spanish => "Spanish",
            Language::PortugueseBrazil => "Brazilian Portuguese",
            Language::Russian => "Russian",
            Language::Italian => "Italian",
            Language::Vietnamese => "Vietnamese",
        }
    }

    /// Parse a language code (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|l| l.code().eq_ignore_ascii_case(s))
    }

    /// Get all supported languages
    pub fn all() -> &'static [Language] {
        &[
            Language::English,
            Language::ChineseSimplified,
            Language::ChineseTraditional,
            Language::Japanese,
            Language::Korean,
            Language::German,
            Language::French,
            Language::Spanish,
            Language::PortugueseBrazil,
            Language::Russian,
            Language::Italian,
            Language::Vietnamese,
        ]
    }
}

/// Verbosity of generated messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    /// Subject line only
    Simple,
    /// Subject line and a short bullet list
    #[default]
    Normal,
    /// Subject line and a full explanation
    Detailed,
}

impl Style {
    pub fn key(&self) -> &'static str {
        match self {
            Style::Simple => "simple",
            Style::Normal => "normal",
            Style::Detailed => "detailed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Some(Style::Simple),
            "normal" => Some(Style::Normal),
            "detailed" => Some(Style::Detailed),
            _ => None,
        }
    }

    pub fn all() -> &'static [Style] {
        &[Style::Simple, Style::Normal, Style::Detailed]
    }

    /// Output budget handed to the completion provider
    pub fn budget(&self) -> StyleBudget {
        match self {
            Style::Simple => StyleBudget {
                max_output_tokens: 1024,
                temperature: 0.3,
            },
            Style::Normal => StyleBudget {
                max_output_tokens: 2048,
                temperature: 0.5,
            },
            Style::Detailed => StyleBudget {
                max_output_tokens: 4096,
                temperature: 0.7,
            },
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Completion provider used for generation
    #[serde(default)]
    pub provider: Provider,

    /// Selected Gemini model
    #[serde(default)]
    pub gemini_model: GeminiModel,

    /// Model name sent to the OpenAI-compatible endpoint
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_base_url: Option<String>,

    /// Language of generated text
    #[serde(default)]
    pub language: Language,

    /// Verbosity of generated text
    #[serde(default)]
    pub style: Style,
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            gemini_model: GeminiModel::default(),
            openai_model: default_openai_model(),
            openai_base_url: None,
            language: Language::default(),
            style: Style::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, or create default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "scribe-rs", "scribe-rs")
            .ok_or_else(|| ScribeError::Config("Could not determine config directory".into()))?;

        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Model name for the active provider
    pub fn model_name(&self) -> &str {
        match self.provider {
            Provider::Gemini => self.gemini_model.api_name(),
            Provider::OpenAi => &self.openai_model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_model_parse() {
        assert_eq!(
            GeminiModel::parse("gemini-2.0-flash"),
            Some(GeminiModel::Gemini20Flash)
        );
        assert_eq!(
            GeminiModel::parse("gemini-2.5-pro"),
            Some(GeminiModel::Gemini25Pro)
        );
        assert_eq!(GeminiModel::parse("invalid"), None);
    }

    #[test]
    fn test_language_parse_is_case_insensitive() {
        assert_eq!(Language::parse("zh-cn"), Some(Language::ChineseSimplified));
        assert_eq!(Language::parse("pt-BR"), Some(Language::PortugueseBrazil));
        assert_eq!(Language::parse("klingon"), None);
    }

    #[test]
    fn test_style_budgets_grow_with_verbosity() {
        let simple = Style::Simple.budget().max_output_tokens;
        let normal = Style::Normal.budget().max_output_tokens;
        let detailed = Style::Detailed.budget().max_output_tokens;
        assert!(simple < normal && normal < detailed);
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let config: Config = toml::from_str("language = \"ja\"\nstyle = \"detailed\"\n").unwrap();
        assert_eq!(config.language, Language::Japanese);
        assert_eq!(config.style, Style::Detailed);
        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.gemini_model, GeminiModel::Gemini25Flash);
        assert_eq!(config.openai_model, "gpt-4o-mini");
    }

    #[test]
    fn test_provider_round_trips_through_toml() {
        let config = Config {
            provider: Provider::OpenAi,
            openai_model: "gpt-4o".to_string(),
            ..Config::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("provider = \"openai\""));
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.provider, Provider::OpenAi);
        assert_eq!(back.model_name(), "gpt-4o");
    }
}
