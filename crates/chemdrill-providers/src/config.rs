//! Configuration and backend factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use chemdrill_core::adaptive::{AdaptivePolicy, DEFAULT_MIN_GRADE};
use chemdrill_core::model::Mode;
use chemdrill_core::traits::{AttemptSink, NoopSink, QuestionProvider};

use crate::offline::OfflineProvider;
use crate::openai::OpenAiQuestionProvider;
use crate::remote::RemoteQuizService;

/// Where questions come from.
///
/// Note: Custom Debug impl masks secrets to prevent accidental exposure in logs.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
    Remote {
        base_url: String,
        #[serde(default)]
        token: Option<String>,
    },
    #[default]
    Offline,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                model,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
            ProviderConfig::Remote { base_url, token } => f
                .debug_struct("Remote")
                .field("base_url", base_url)
                .field("token", &token.as_ref().map(|_| "***"))
                .finish(),
            ProviderConfig::Offline => f.write_str("Offline"),
        }
    }
}

/// Top-level chemdrill configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChemdrillConfig {
    /// Mode a new session starts in.
    #[serde(default)]
    pub default_mode: Mode,
    /// Difficulty a new session starts (and resets) at.
    #[serde(default = "default_start_difficulty")]
    pub start_difficulty: u32,
    /// Per-request timeout for network providers.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub adaptive: AdaptivePolicy,
}

fn default_start_difficulty() -> u32 {
    DEFAULT_MIN_GRADE
}
fn default_timeout() -> u64 {
    30
}

impl Default for ChemdrillConfig {
    fn default() -> Self {
        Self {
            default_mode: Mode::default(),
            start_difficulty: default_start_difficulty(),
            request_timeout_secs: default_timeout(),
            provider: ProviderConfig::default(),
            adaptive: AdaptivePolicy::default(),
        }
    }
}

impl ChemdrillConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check the adaptive bounds and that the start difficulty lies inside them.
    pub fn validate(&self) -> Result<()> {
        self.adaptive.validate()?;
        anyhow::ensure!(
            (self.adaptive.min_grade..=self.adaptive.max_grade).contains(&self.start_difficulty),
            "start_difficulty {} is outside [{}, {}]",
            self.start_difficulty,
            self.adaptive.min_grade,
            self.adaptive.max_grade
        );
        anyhow::ensure!(
            self.request_timeout_secs > 0,
            "request_timeout_secs must be positive"
        );
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            model,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_deref().map(resolve_env_vars),
            model: model.as_deref().map(resolve_env_vars),
        },
        ProviderConfig::Remote { base_url, token } => ProviderConfig::Remote {
            base_url: resolve_env_vars(base_url),
            token: token.as_deref().map(resolve_env_vars),
        },
        ProviderConfig::Offline => ProviderConfig::Offline,
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `chemdrill.toml` in the current directory
/// 2. `~/.config/chemdrill/config.toml`
///
/// `CHEMDRILL_OPENAI_KEY` overrides the OpenAI key, and selects the OpenAI
/// provider when none is configured.
pub fn load_config() -> Result<ChemdrillConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ChemdrillConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("chemdrill.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<ChemdrillConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => ChemdrillConfig::default(),
    };

    if let Ok(key) = std::env::var("CHEMDRILL_OPENAI_KEY") {
        apply_openai_key(&mut config, key);
    }

    config.provider = resolve_provider_config(&config.provider);
    config.validate()?;
    Ok(config)
}

fn apply_openai_key(config: &mut ChemdrillConfig, key: String) {
    match config.provider {
        ProviderConfig::OpenAI {
            ref mut api_key, ..
        } => *api_key = key,
        ProviderConfig::Offline => {
            config.provider = ProviderConfig::OpenAI {
                api_key: key,
                base_url: None,
                model: None,
            }
        }
        ProviderConfig::Remote { .. } => {}
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("chemdrill"))
}

/// The question provider and attempt sink a session talks to.
pub struct Backend {
    pub provider: Arc<dyn QuestionProvider>,
    pub sink: Arc<dyn AttemptSink>,
}

/// Create the provider and sink described by `config`.
///
/// A remote service acts as both; the other providers have nowhere to send
/// attempts and get a no-op sink.
pub fn create_backend(config: &ProviderConfig, timeout: Duration) -> Result<Backend> {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            model,
        } => {
            anyhow::ensure!(!api_key.is_empty(), "openai provider requires an api_key");
            Ok(Backend {
                provider: Arc::new(OpenAiQuestionProvider::new(
                    api_key,
                    base_url.clone(),
                    model.clone(),
                    timeout,
                )?),
                sink: Arc::new(NoopSink),
            })
        }
        ProviderConfig::Remote { base_url, token } => {
            let service = Arc::new(RemoteQuizService::new(base_url, token.clone(), timeout)?);
            Ok(Backend {
                provider: service.clone(),
                sink: service,
            })
        }
        ProviderConfig::Offline => Ok(Backend {
            provider: Arc::new(OfflineProvider),
            sink: Arc::new(NoopSink),
        }),
    }
}
