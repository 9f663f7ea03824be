use crate::core::embedding::SociabilityScale;
use crate::core::scoring::{DEFAULT_COMPATIBILITY_THRESHOLD, DEFAULT_SMOOTHING_K};
use crate::models::{CompatibilityConfig, TraitWeights};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub tables: TableSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub sentiment: SentimentSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub feed: FeedSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_dogs_table")]
    pub dogs: String,
    #[serde(default = "default_reviews_table")]
    pub reviews: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            dogs: default_dogs_table(),
            reviews: default_reviews_table(),
        }
    }
}

fn default_dogs_table() -> String { "dogs".to_string() }
fn default_reviews_table() -> String { "reviews".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

/// Sentiment strategy selection
///
/// `mode` is "lexical" or "remote"; remote mode needs an endpoint and falls
/// back to lexical per request on any failure.
#[derive(Debug, Clone, Deserialize)]
pub struct SentimentSettings {
    #[serde(default = "default_sentiment_mode")]
    pub mode: String,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for SentimentSettings {
    fn default() -> Self {
        Self {
            mode: default_sentiment_mode(),
            endpoint: None,
            timeout_secs: None,
        }
    }
}

fn default_sentiment_mode() -> String { "lexical".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_smoothing_k")]
    pub smoothing_k: f64,
    /// 5 for the stored 1-5 ordinals, 10 for the doubled historical scale
    #[serde(default = "default_sociability_scale")]
    pub sociability_scale: u8,
    #[serde(default)]
    pub weights: WeightsConfig,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            smoothing_k: default_smoothing_k(),
            sociability_scale: default_sociability_scale(),
            weights: WeightsConfig::default(),
        }
    }
}

impl ScoringSettings {
    pub fn compatibility_config(&self) -> CompatibilityConfig {
        CompatibilityConfig {
            threshold: self.threshold,
            smoothing_k: self.smoothing_k,
        }
    }

    pub fn trait_weights(&self) -> TraitWeights {
        TraitWeights {
            age: self.weights.age,
            weight: self.weights.weight,
            sex: self.weights.sex,
            neutered: self.weights.neutered,
            sociability: self.weights.sociability,
            temperament: self.weights.temperament,
        }
    }

    pub fn scale(&self) -> SociabilityScale {
        match self.sociability_scale {
            10 => SociabilityScale::TenPoint,
            _ => SociabilityScale::FivePoint,
        }
    }
}

fn default_threshold() -> f64 { DEFAULT_COMPATIBILITY_THRESHOLD }
fn default_smoothing_k() -> f64 { DEFAULT_SMOOTHING_K }
fn default_sociability_scale() -> u8 { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_age_weight")]
    pub age: f64,
    #[serde(default = "default_weight_weight")]
    pub weight: f64,
    #[serde(default = "default_sex_weight")]
    pub sex: f64,
    #[serde(default = "default_neutered_weight")]
    pub neutered: f64,
    #[serde(default = "default_sociability_weight")]
    pub sociability: f64,
    #[serde(default = "default_temperament_weight")]
    pub temperament: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            age: default_age_weight(),
            weight: default_weight_weight(),
            sex: default_sex_weight(),
            neutered: default_neutered_weight(),
            sociability: default_sociability_weight(),
            temperament: default_temperament_weight(),
        }
    }
}

fn default_age_weight() -> f64 { 1.0 }
fn default_weight_weight() -> f64 { 0.8 }
fn default_sex_weight() -> f64 { 0.6 }
fn default_neutered_weight() -> f64 { 0.7 }
fn default_sociability_weight() -> f64 { 1.2 }
fn default_temperament_weight() -> f64 { 1.1 }

#[derive(Debug, Clone, Deserialize)]
pub struct FeedSettings {
    #[serde(default = "default_feed_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            default_limit: default_feed_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_feed_limit() -> u16 { 20 }
fn default_max_limit() -> u16 { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Loaded in order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with PAWPAL_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PAWPAL_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PAWPAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PAWPAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the well-known environment overrides
///
/// Deployment platforms set SUPABASE_URL / SUPABASE_SERVICE_KEY and
/// SENTIMENT_ENDPOINT directly; these win over anything in the files.
/// Credentials only ever enter through here, never through source.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let supabase_url = env::var("SUPABASE_URL")
        .or_else(|_| env::var("PAWPAL_SUPABASE__URL"))
        .ok();
    let supabase_key = env::var("SUPABASE_SERVICE_KEY")
        .or_else(|_| env::var("PAWPAL_SUPABASE__API_KEY"))
        .ok();
    let sentiment_endpoint = env::var("SENTIMENT_ENDPOINT")
        .or_else(|_| env::var("PAWPAL_SENTIMENT__ENDPOINT"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = supabase_url {
        builder = builder.set_override("supabase.url", url)?;
    }
    if let Some(key) = supabase_key {
        builder = builder.set_override("supabase.api_key", key)?;
    }
    if let Some(endpoint) = sentiment_endpoint {
        builder = builder.set_override("sentiment.endpoint", endpoint)?;
    }

    builder.build()
}
