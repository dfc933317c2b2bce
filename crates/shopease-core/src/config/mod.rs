//! Configuration module for shopease.
//!
//! Loads typed configuration from `./shopease.json` or `~/.shopease/config.json`.
//! All fields use `serde` for zero-boilerplate deserialization, and the
//! environment variables the storefront deploys with are folded in once at
//! load time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default return-policy reply.
pub const RETURN_POLICY: &str = "Return Policy:
• Returns allowed within 14 days from delivery
• Product must be unused and in original packaging
• Refunds take 5–7 business days after inspection
• Contact support@shopease.com for return authorization";

/// Default shipping reply.
pub const SHIPPING_INFO: &str = "Shipping Information:
• Standard shipping: 3-5 business days
• Express shipping: 1-2 business days (additional fee)
• Free shipping on orders over Rs. 10,000
• Tracking information sent via email";

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub llm: LlmConfig,
    pub data: DataConfig,
    pub gateway: GatewayConfig,
    pub support: SupportConfig,
}

impl Config {
    /// Load configuration.
    ///
    /// Priority:
    /// 1. local `shopease.json` in current directory
    /// 2. `~/.shopease/config.json`
    ///
    /// Environment overrides are applied on top of whichever was found.
    pub fn load() -> anyhow::Result<Self> {
        let paths = [PathBuf::from("shopease.json"), Self::default_path()];

        let mut config = Config::default();
        for path in paths {
            if path.exists() {
                tracing::debug!("Loading config from: {}", path.display());
                config = Self::load_from(&path)?;
                break;
            }
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Override fields from environment variables.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("OPENAI_API_KEY") {
            tracing::info!("Using OpenAI API key from environment variable");
            self.providers.openai.get_or_insert_with(Default::default).api_key = key;
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.providers.openai.get_or_insert_with(Default::default).model = Some(model);
        }
        if let Some(key) = get("GROQ_API_KEY") {
            tracing::info!("Using Groq API key from environment variable");
            self.providers.groq.get_or_insert_with(Default::default).api_key = key;
        }
        if let Some(model) = get("GROQ_MODEL") {
            self.providers.groq.get_or_insert_with(Default::default).model = Some(model);
        }
        if let Some(url) = get("OLLAMA_BASE_URL") {
            self.providers.ollama.get_or_insert_with(Default::default).base_url = Some(url);
        }
        if let Some(model) = get("OLLAMA_MODEL") {
            self.providers.ollama.get_or_insert_with(Default::default).model = Some(model);
        }
        if let Some(port) = get("PORT") {
            match port.trim().parse::<u16>() {
                Ok(p) => self.gateway.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid PORT"),
            }
        }
        if let Some(dir) = get("SHOPEASE_DATA_DIR") {
            self.data.dir = dir;
        }
    }

    /// Get the default config file path (`~/.shopease/config.json`).
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Get the default config directory path.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".shopease")
    }

    /// Get the resolved data directory.
    pub fn data_path(&self) -> PathBuf {
        let raw = &self.data.dir;
        if raw.starts_with("~/") || raw.starts_with("~\\") {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(&raw[2..])
        } else {
            PathBuf::from(raw)
        }
    }

    /// Write the default config template to disk.
    pub fn write_default_template() -> anyhow::Result<PathBuf> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = serde_json::json!({
            "providers": {
                "openai": {
                    "apiKey": "sk-YOUR_KEY_HERE",
                    "model": "gpt-4o-mini"
                }
            },
            "data": {
                "dir": "data"
            },
            "gateway": {
                "host": "0.0.0.0",
                "port": 5000
            }
        });

        std::fs::write(&path, serde_json::to_string_pretty(&template)?)?;
        Ok(path)
    }

    /// Validate configuration and return actionable error messages.
    ///
    /// Checks that:
    /// - The gateway port is not zero
    /// - The data directory is set
    /// - Configured provider keys are not template placeholders
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.gateway.port == 0 {
            errors.push("gateway.port must be a non-zero TCP port.".into());
        }

        if self.data.dir.trim().is_empty() {
            errors.push("data.dir is empty. Point it at the directory holding orders.json.".into());
        }

        for (name, entry) in [
            ("openai", &self.providers.openai),
            ("groq", &self.providers.groq),
        ] {
            if let Some(e) = entry {
                if is_placeholder(&e.api_key) {
                    errors.push(format!(
                        "providers.{name}.apiKey is still the template placeholder. \
                         Replace it or remove the section."
                    ));
                }
            }
        }

        if self.llm.max_tokens == 0 {
            errors.push("llm.maxTokens must be greater than zero.".into());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn is_placeholder(key: &str) -> bool {
    key.contains("YOUR_")
}

// ── Provider Configuration ──────────────────────────────────────────

/// A hosted, key-authenticated provider (OpenAI, Groq).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderEntry {
    pub api_key: String,
    pub api_base: Option<String>,
    pub model: Option<String>,
}

/// A local Ollama server. Either field being set enables it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OllamaEntry {
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub openai: Option<ProviderEntry>,
    pub groq: Option<ProviderEntry>,
    pub ollama: Option<OllamaEntry>,
}

/// The LLM backend chosen once at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderChoice {
    OpenAi {
        api_key: String,
        api_base: Option<String>,
        model: String,
    },
    Groq {
        api_key: String,
        api_base: Option<String>,
        model: String,
    },
    Ollama {
        base_url: String,
        model: String,
    },
    Offline,
}

impl ProviderChoice {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAi { .. } => "openai",
            Self::Groq { .. } => "groq",
            Self::Ollama { .. } => "ollama",
            Self::Offline => "offline",
        }
    }
}

impl ProvidersConfig {
    /// Pick the provider to use.
    ///
    /// Priority: OpenAI key, Groq key, Ollama base URL or model, offline.
    pub fn select(&self) -> ProviderChoice {
        let usable = |e: &&ProviderEntry| !e.api_key.is_empty() && !is_placeholder(&e.api_key);

        if let Some(e) = self.openai.as_ref().filter(usable) {
            return ProviderChoice::OpenAi {
                api_key: e.api_key.clone(),
                api_base: e.api_base.clone(),
                model: e.model.clone().unwrap_or_else(|| "gpt-4o-mini".into()),
            };
        }
        if let Some(e) = self.groq.as_ref().filter(usable) {
            return ProviderChoice::Groq {
                api_key: e.api_key.clone(),
                api_base: e.api_base.clone(),
                model: e.model.clone().unwrap_or_else(|| "llama-3.1-8b-instant".into()),
            };
        }
        if let Some(o) = &self.ollama {
            if o.base_url.is_some() || o.model.is_some() {
                return ProviderChoice::Ollama {
                    base_url: o
                        .base_url
                        .clone()
                        .unwrap_or_else(|| "http://localhost:11434".into()),
                    model: o.model.clone().unwrap_or_else(|| "llama3".into()),
                };
            }
        }
        ProviderChoice::Offline
    }
}

// ── LLM Sampling ────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LlmConfig {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            max_tokens: 500,
        }
    }
}

// ── Data Configuration ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { dir: "data".into() }
    }
}

// ── Gateway Configuration ───────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
        }
    }
}

// ── Support Texts ───────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupportConfig {
    pub return_policy: String,
    pub shipping_info: String,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            return_policy: RETURN_POLICY.into(),
            shipping_info: SHIPPING_INFO.into(),
        }
    }
}
