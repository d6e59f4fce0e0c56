//! Configuration for replybot.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (credentials, REDDIT_USER_AGENT, GEMINI_MODEL)
//! 2. Config file (.replybot/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - REPLYBOT_CONFIG, if set, names the file directly
//! - Otherwise searches the current directory and parents for .replybot/config.yaml
//! - Finally falls back to ~/.replybot/config.yaml
//!
//! Credentials are only ever read from the environment.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::schedule::{PostingWindow, Schedule};
use crate::domain::resolve_tone;
use crate::error::ConfigError;

pub const DEFAULT_USER_AGENT: &str = "AutoCommenter/1.0";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8000";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub version: Option<String>,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub reddit: RedditConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleConfig {
    pub channels: Option<Vec<String>>,
    /// Tone labels; unknown labels resolve to `auto`
    pub tones: Option<Vec<String>>,
    /// `[start, end)` in local hours
    pub posting_hours: Option<[u32; 2]>,
    pub channel_attempts: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitsConfig {
    pub post_limit: Option<usize>,
    pub reply_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedditConfig {
    pub user_agent: Option<String>,
    pub auth_url: Option<String>,
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeminiConfig {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f64>,
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    pub address: Option<String>,
    pub cors_origin: Option<String>,
}

/// Resolved Reddit settings
#[derive(Debug, Clone)]
pub struct RedditSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Bot login; both must be present for write capability
    pub username: Option<String>,
    pub password: Option<String>,
    pub user_agent: String,
    pub auth_url: String,
    pub api_url: String,
}

impl Default for RedditSettings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            username: None,
            password: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            auth_url: "https://www.reddit.com".to_string(),
            api_url: "https://oauth.reddit.com".to_string(),
        }
    }
}

impl RedditSettings {
    pub fn can_write(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

/// Resolved Gemini settings
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            temperature: 0.7,
            max_output_tokens: 1000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub address: String,
    pub cors_origin: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: DEFAULT_SERVER_ADDRESS.to_string(),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

/// Fully resolved configuration
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub reddit: RedditSettings,
    pub gemini: GeminiSettings,
    pub schedule: Schedule,
    pub server: ServerSettings,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the process environment and the discovered config file
    pub fn load() -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok();

        let file = match find_config_file(&env) {
            Some(path) => {
                let config = load_config_file(&path)?;
                Some((path, config))
            }
            None => None,
        };

        Self::resolve(file, env)
    }

    /// Merge a parsed config file with environment lookups
    pub fn resolve<F>(file: Option<(PathBuf, ConfigFile)>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty variables count as unset
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let (config_file, config) = match file {
            Some((path, config)) => (Some(path), config),
            None => (None, ConfigFile::default()),
        };

        let reddit_defaults = RedditSettings::default();
        let reddit = RedditSettings {
            client_id: env("REDDIT_CLIENT_ID"),
            client_secret: env("REDDIT_CLIENT_SECRET"),
            username: env("REDDIT_USERNAME"),
            password: env("REDDIT_PASSWORD"),
            user_agent: env("REDDIT_USER_AGENT")
                .or(config.reddit.user_agent)
                .unwrap_or(reddit_defaults.user_agent),
            auth_url: config.reddit.auth_url.unwrap_or(reddit_defaults.auth_url),
            api_url: config.reddit.api_url.unwrap_or(reddit_defaults.api_url),
        };

        let gemini_defaults = GeminiSettings::default();
        let gemini = GeminiSettings {
            api_key: env("GEMINI_API_KEY"),
            model: env("GEMINI_MODEL")
                .or(config.gemini.model)
                .unwrap_or(gemini_defaults.model),
            base_url: config.gemini.base_url.unwrap_or(gemini_defaults.base_url),
            temperature: config
                .gemini
                .temperature
                .unwrap_or(gemini_defaults.temperature),
            max_output_tokens: config
                .gemini
                .max_output_tokens
                .unwrap_or(gemini_defaults.max_output_tokens),
        };

        let defaults = Schedule::default();
        let window = match config.schedule.posting_hours {
            Some([start, end]) => PostingWindow::new(start, end)?,
            None => defaults.window,
        };
        let schedule = Schedule {
            channels: config.schedule.channels.unwrap_or(defaults.channels),
            tones: config
                .schedule
                .tones
                .map(|labels| labels.iter().map(|l| resolve_tone(l)).collect())
                .unwrap_or(defaults.tones),
            window,
            channel_attempts: config
                .schedule
                .channel_attempts
                .unwrap_or(defaults.channel_attempts),
            post_limit: config.limits.post_limit.unwrap_or(defaults.post_limit),
            reply_limit: config.limits.reply_limit.unwrap_or(defaults.reply_limit),
        };
        schedule.validate()?;

        let server_defaults = ServerSettings::default();
        let server = ServerSettings {
            address: config.server.address.unwrap_or(server_defaults.address),
            cors_origin: config
                .server
                .cors_origin
                .unwrap_or(server_defaults.cors_origin),
        };

        Ok(Settings {
            reddit,
            gemini,
            schedule,
            server,
            config_file,
        })
    }
}

/// Find config file: explicit path, then current directory and parents, then home
fn find_config_file<F>(env: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(explicit) = env("REPLYBOT_CONFIG") {
        return Some(PathBuf::from(explicit));
    }

    let cwd = std::env::current_dir().ok()?;
    if let Some(found) = search_upwards(&cwd) {
        return Some(found);
    }

    let home_config = dirs::home_dir()?.join(".replybot").join("config.yaml");
    home_config.exists().then_some(home_config)
}

/// Walk from `start` towards the filesystem root looking for .replybot/config.yaml
fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".replybot").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Show a secret as set/unset without revealing it
pub fn redact(value: &Option<String>) -> &'static str {
    match value {
        Some(_) => "(set)",
        None => "(not set)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tone;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::resolve(None, env_from(&[])).unwrap();

        assert!(settings.config_file.is_none());
        assert_eq!(settings.reddit.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(settings.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(settings.schedule.window, PostingWindow::default());
        assert_eq!(settings.server.address, DEFAULT_SERVER_ADDRESS);
        assert!(settings.reddit.client_id.is_none());
    }

    #[test]
    fn test_write_capability_needs_both_login_fields() {
        let settings = Settings::resolve(
            None,
            env_from(&[("REDDIT_USERNAME", "bot"), ("REDDIT_PASSWORD", "")]),
        )
        .unwrap();
        assert!(!settings.reddit.can_write());

        let settings = Settings::resolve(
            None,
            env_from(&[("REDDIT_USERNAME", "bot"), ("REDDIT_PASSWORD", "pw")]),
        )
        .unwrap();
        assert!(settings.reddit.can_write());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".replybot");
        std::fs::create_dir_all(&dir).unwrap();

        let config_path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
schedule:
  channels: [rust, programming]
  tones: [funny, sarcastic]
  posting_hours: [8, 20]
limits:
  reply_limit: 10
gemini:
  model: gemini-1.5-pro
"#
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version.as_deref(), Some("1.0"));

        let settings = Settings::resolve(
            Some((config_path.clone(), config)),
            env_from(&[("GEMINI_MODEL", "gemini-2.5-flash")]),
        )
        .unwrap();

        assert_eq!(settings.config_file, Some(config_path));
        assert_eq!(settings.schedule.channels, vec!["rust", "programming"]);
        assert_eq!(settings.schedule.tones, vec![Tone::Funny, Tone::Auto]);
        assert_eq!(settings.schedule.window, PostingWindow::new(8, 20).unwrap());
        assert_eq!(settings.schedule.reply_limit, 10);
        assert_eq!(settings.schedule.post_limit, 3);
        // Environment wins over the file
        assert_eq!(settings.gemini.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_invalid_posting_hours() {
        let config = ConfigFile {
            schedule: ScheduleConfig {
                posting_hours: Some([20, 8]),
                ..Default::default()
            },
            ..Default::default()
        };

        let result = Settings::resolve(Some((PathBuf::from("x.yaml"), config)), env_from(&[]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_search_upwards_finds_parent_config() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".replybot");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.yaml"), "version: \"1.0\"\n").unwrap();

        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(search_upwards(&nested), Some(dir.join("config.yaml")));
    }

    #[test]
    fn test_parse_error_names_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.yaml");
        std::fs::write(&path, "schedule: [not, a, map").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }
}
