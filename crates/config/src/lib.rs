//! Configuration loading and validation for fugubot.
//!
//! Loads `fugubot.toml` from the working directory (or the path in
//! `FUGUBOT_CONFIG`) with environment variable overrides for secrets.
//! The topic filter's keyword tables live here as plain data with built-in
//! defaults, so operators can extend or localize them without touching
//! code.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use fugubot_core::Category;

/// The root configuration structure.
///
/// Maps directly to `fugubot.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// OpenRouter API key. Usually supplied via environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier sent upstream
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Base URL of the OpenAI-compatible completion API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// `HTTP-Referer` attribution header sent to OpenRouter
    #[serde(default = "default_referer")]
    pub referer: String,

    /// `X-Title` attribution header sent to OpenRouter
    #[serde(default = "default_app_title")]
    pub app_title: String,

    /// HTTP listener configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Knowledge corpus sources
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Topic filter keyword tables
    #[serde(default)]
    pub filter: FilterConfig,
}

fn default_model() -> String {
    "deepseek/deepseek-chat".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_referer() -> String {
    "https://fugu-protocol.com".into()
}
fn default_app_title() -> String {
    "Fugu Prediction Chatbot".into()
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .field("gateway", &self.gateway)
            .field("knowledge", &self.knowledge)
            .field("filter", &self.filter)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8090
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Where reference documents are read from at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default = "default_knowledge_files")]
    pub files: Vec<KnowledgeFileConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeFileConfig {
    /// Path to the source text file, relative to the working directory.
    pub path: PathBuf,

    /// Title rendered above the document excerpt in the prompt.
    pub title: String,

    #[serde(default = "default_knowledge_category")]
    pub category: String,
}

fn default_knowledge_category() -> String {
    "guide".into()
}

fn default_knowledge_files() -> Vec<KnowledgeFileConfig> {
    vec![KnowledgeFileConfig {
        path: PathBuf::from("HUONG_DAN_SU_DUNG_APP.txt"),
        title: "Hướng Dẫn Sử Dụng Fugu App".into(),
        category: default_knowledge_category(),
    }]
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            files: default_knowledge_files(),
        }
    }
}

/// Keyword tables driving the topic filter.
///
/// All matching is case-insensitive substring matching against the
/// lowercased question, except `greetings`, which anchor at the start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Minimum question length in characters after trimming.
    #[serde(default = "default_min_question_len")]
    pub min_question_len: usize,

    /// Questions mentioning any of these are in scope.
    #[serde(default = "default_valid_topics")]
    pub valid_topics: Vec<String>,

    /// Ordered banned-topic groups; the first matching group wins.
    #[serde(default = "default_banned_topics")]
    pub banned_topics: Vec<BannedTopic>,

    /// Greeting words accepted as an opener.
    #[serde(default = "default_greetings")]
    pub greetings: Vec<String>,

    /// Ordered category rules; the first matching rule assigns the category.
    #[serde(default = "default_category_rules")]
    pub category_rules: Vec<CategoryRule>,
}

/// One banned-topic group.
///
/// A question matching any `keywords` entry is rejected unless it also
/// matches one of the group's `exceptions` (e.g. "weather" is banned, but
/// "weather prediction market" is what the product is for).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannedTopic {
    pub topic: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub exceptions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: Vec<String>,
}

fn default_min_question_len() -> usize {
    3
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_valid_topics() -> Vec<String> {
    strings(&[
        // Blockchain & wallet
        "blockchain",
        "sui",
        "wallet",
        "ví",
        "crypto",
        "usdc",
        "token",
        "transaction",
        "giao dịch",
        "on-chain",
        "smart contract",
        // Prediction market
        "dự đoán",
        "prediction",
        "cược",
        "bet",
        "market",
        "thị trường",
        "event",
        "sự kiện",
        "outcome",
        "kết quả",
        "odds",
        "tỷ lệ",
        // Funds & trading
        "nạp tiền",
        "deposit",
        "withdraw",
        "rút tiền",
        "balance",
        "số dư",
        "buy",
        "mua",
        "sell",
        "bán",
        "share",
        "cổ phần",
        "reward",
        "thưởng",
        "transak",
        "banxa",
        "payment",
        "thanh toán",
        // Markets & analysis
        "price",
        "giá",
        "bitcoin",
        "btc",
        "eth",
        "gold",
        "vàng",
        "silver",
        "bạc",
        "news",
        "tin tức",
        "analysis",
        "phân tích",
        "chart",
        "biểu đồ",
        "volume",
        "khối lượng",
        "statistics",
        "thống kê",
        // Help & platform
        "hướng dẫn",
        "tutorial",
        "how to",
        "làm sao",
        "cách",
        "guide",
        "help",
        "giúp",
        "support",
        "hỗ trợ",
        "account",
        "tài khoản",
        "api",
        "integration",
        "pyth",
        "oracle",
        "deepbook",
        "zklogin",
    ])
}

fn default_banned_topics() -> Vec<BannedTopic> {
    vec![
        BannedTopic {
            topic: "weather".into(),
            keywords: strings(&["weather", "thời tiết", "rain", "mưa", "nắng", "sunny"]),
            exceptions: strings(&["dự đoán", "prediction", "bet", "thị trường", "market"]),
        },
        BannedTopic {
            topic: "cooking".into(),
            keywords: strings(&["nấu ăn", "cooking", "recipe", "công thức", "món ăn", "food"]),
            exceptions: vec![],
        },
        BannedTopic {
            topic: "entertainment".into(),
            keywords: strings(&["phim", "movie", "nhạc", "music", "game"]),
            exceptions: strings(&["dự đoán", "prediction", "bet", "cược"]),
        },
        BannedTopic {
            topic: "personal".into(),
            keywords: strings(&[
                "bạn tên gì",
                "what is your name",
                "bao nhiêu tuổi",
                "how old",
            ]),
            exceptions: vec![],
        },
        BannedTopic {
            topic: "spam".into(),
            keywords: strings(&["spam", "advertisement", "quảng cáo", "mua hàng"]),
            exceptions: vec![],
        },
    ]
}

fn default_greetings() -> Vec<String> {
    strings(&["hi", "hello", "xin chào", "chào", "hey", "hola"])
}

fn default_category_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule {
            category: Category::Payment,
            keywords: strings(&["nạp", "deposit", "withdraw", "rút", "payment", "thanh toán"]),
        },
        CategoryRule {
            category: Category::Prediction,
            keywords: strings(&["dự đoán", "prediction", "cược", "bet", "event"]),
        },
        CategoryRule {
            category: Category::Blockchain,
            keywords: strings(&["blockchain", "sui", "wallet", "ví", "crypto"]),
        },
        CategoryRule {
            category: Category::Tutorial,
            keywords: strings(&["hướng dẫn", "tutorial", "how to", "cách", "guide"]),
        },
        CategoryRule {
            category: Category::Market,
            keywords: strings(&["price", "giá", "bitcoin", "market", "thị trường"]),
        },
    ]
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_question_len: default_min_question_len(),
            valid_topics: default_valid_topics(),
            banned_topics: default_banned_topics(),
            greetings: default_greetings(),
            category_rules: default_category_rules(),
        }
    }
}

impl AppConfig {
    /// The config file location: `FUGUBOT_CONFIG` when set, otherwise
    /// `./fugubot.toml`.
    pub fn config_path() -> PathBuf {
        std::env::var("FUGUBOT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("fugubot.toml"))
    }

    /// Load configuration from `FUGUBOT_CONFIG` or `./fugubot.toml`.
    ///
    /// Environment overrides applied after the file:
    /// - `FUGUBOT_API_KEY`, then `OPENROUTER_API_KEY`
    /// - `FUGUBOT_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("FUGUBOT_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("FUGUBOT_MODEL") {
            config.model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.filter.min_question_len == 0 {
            return Err(ConfigError::ValidationError(
                "filter.min_question_len must be at least 1".into(),
            ));
        }

        if !self.base_url.starts_with("http") {
            return Err(ConfigError::ValidationError(format!(
                "base_url does not look like a URL: {}",
                self.base_url
            )));
        }

        for group in &self.filter.banned_topics {
            if group.keywords.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "banned topic group '{}' has no keywords",
                    group.topic
                )));
            }
        }

        for rule in &self.filter.category_rules {
            if rule.keywords.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "category rule '{}' has no keywords",
                    rule.category
                )));
            }
        }

        Ok(())
    }

    /// Check if an upstream API key is available.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            base_url: default_base_url(),
            referer: default_referer(),
            app_title: default_app_title(),
            gateway: GatewayConfig::default(),
            knowledge: KnowledgeConfig::default(),
            filter: FilterConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, "deepseek/deepseek-chat");
        assert_eq!(config.gateway.port, 8090);
        assert_eq!(config.knowledge.files.len(), 1);
        assert!(!config.has_api_key());
    }

    #[test]
    fn default_filter_tables_are_populated() {
        let filter = FilterConfig::default();
        assert_eq!(filter.min_question_len, 3);
        assert!(filter.valid_topics.iter().any(|t| t == "prediction"));
        assert_eq!(filter.banned_topics.len(), 5);
        assert_eq!(filter.banned_topics[0].topic, "weather");
        assert!(!filter.banned_topics[0].exceptions.is_empty());
        assert_eq!(filter.category_rules.len(), 5);
        assert_eq!(filter.category_rules[0].category, Category::Payment);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.filter.valid_topics, config.filter.valid_topics);
        assert_eq!(parsed.knowledge.files[0].title, config.knowledge.files[0].title);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_banned_group_rejected() {
        let mut config = AppConfig::default();
        config.filter.banned_topics.push(BannedTopic {
            topic: "empty".into(),
            keywords: vec![],
            exceptions: vec![],
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/fugubot.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().model, "deepseek/deepseek-chat");
    }

    #[test]
    fn partial_file_overrides_merge_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
model = "openai/gpt-4o-mini"

[gateway]
port = 9000

[[filter.banned_topics]]
topic = "politics"
keywords = ["election", "bầu cử"]
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(config.gateway.port, 9000);
        // An explicit table replaces the default one entirely.
        assert_eq!(config.filter.banned_topics.len(), 1);
        assert_eq!(config.filter.banned_topics[0].topic, "politics");
        // Untouched sections keep their defaults.
        assert_eq!(config.temperature, 0.7);
        assert!(config.filter.valid_topics.iter().any(|t| t == "sui"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("deepseek/deepseek-chat"));
        assert!(toml_str.contains("openrouter.ai"));
        assert!(toml_str.contains("HUONG_DAN_SU_DUNG_APP.txt"));
    }
}
