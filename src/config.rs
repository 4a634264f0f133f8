use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub services_config: ServicesConfig,
    #[serde(default)]
    pub client_config: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served at `/` (the form markup and its assets)
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "web".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// RapidAPI key. The translation slot reports unavailable without it.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_translation_url")]
    pub base_url: String,
    #[serde(default = "default_translation_host")]
    pub api_host: String,
    #[serde(default = "default_translation_timeout")]
    pub timeout_secs: u64,
}

fn default_translation_url() -> String {
    "https://microsoft-translator-text.p.rapidapi.com".to_string()
}

fn default_translation_host() -> String {
    "microsoft-translator-text.p.rapidapi.com".to_string()
}

fn default_translation_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Gemini API key. The chat slot reports unavailable without it.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_chat_url")]
    pub base_url: String,
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_chat_timeout")]
    pub timeout_secs: u64,
}

fn default_chat_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_chat_model() -> String {
    "gemini-pro".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.8
}

fn default_top_k() -> u32 {
    40
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_chat_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the analysis server; `/analyze` is appended
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// No timeout when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_source_lang() -> String {
    "en".to_string()
}

fn default_target_lang() -> String {
    "hi".to_string()
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_translation_url(),
            api_host: default_translation_host(),
            timeout_secs: default_translation_timeout(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_chat_url(),
            model: default_chat_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_chat_timeout(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: None,
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
        }
    }
}

/// Replace `${VAR_NAME}` with the variable's value. Unset variables are left as is.
pub fn substitute_env(content: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"\$\{(\w+)\}").expect("static env pattern"));
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Keys that are blank or still an unexpanded `${VAR}` count as missing
fn usable_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && !k.starts_with("${"))
}

impl Config {
    /// Load from a JSON (`.json`) or YAML (anything else) file
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Configuration file not found: {}", path))?;
        let mut config = Self::parse(path, &content, |name| std::env::var(name).ok())?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    fn parse(path: &str, content: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let content = substitute_env(content, lookup);
        let mut config: Config = if path.to_lowercase().ends_with(".json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        let services = &mut config.services_config;
        services.translation.api_key = usable_key(services.translation.api_key.take());
        services.chat.api_key = usable_key(services.chat.api_key.take());
        Ok(config)
    }

    /// Find a config file: `CONFIG_PATH`, then `conf.yaml`, then `conf.json`.
    /// Falls back to defaults plus env overrides when none exists.
    pub fn discover() -> Result<(Self, Option<String>)> {
        if let Ok(path) = std::env::var("CONFIG_PATH") {
            return Ok((Self::load(&path)?, Some(path)));
        }
        Self::discover_in(Path::new("."))
    }

    /// Look for `conf.yaml` then `conf.json` in `dir`. A file that exists
    /// but fails to load is an error rather than a silent fallback.
    pub fn discover_in(dir: &Path) -> Result<(Self, Option<String>)> {
        for name in ["conf.yaml", "conf.json"] {
            let path = dir.join(name);
            if !path.exists() {
                continue;
            }
            let path = path.to_string_lossy().into_owned();
            let config = Self::load(&path)
                .with_context(|| format!("Failed to load config from {}", path))?;
            return Ok((config, Some(path)));
        }

        debug!("No config file in {}", dir.display());
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok((config, None))
    }

    /// Apply `HOST`, `PORT`, `RAPID_API_KEY`, `GOOGLE_GEMINI_API_KEY` and
    /// `MODEL_TEMPERATURE`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("HOST") {
            self.system_config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.system_config.port = port,
                Err(_) => warn!("Ignoring invalid PORT value: {}", port),
            }
        }
        if let Some(key) = usable_key(lookup("RAPID_API_KEY")) {
            self.services_config.translation.api_key = Some(key);
        }
        if let Some(key) = usable_key(lookup("GOOGLE_GEMINI_API_KEY")) {
            self.services_config.chat.api_key = Some(key);
        }
        if let Some(temperature) = lookup("MODEL_TEMPERATURE") {
            match temperature.parse() {
                Ok(t) => self.services_config.chat.temperature = t,
                Err(_) => warn!("Ignoring invalid MODEL_TEMPERATURE value: {}", temperature),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_upstream_service() {
        let config = Config::default();
        assert_eq!(config.system_config.host, "127.0.0.1");
        assert_eq!(config.system_config.port, 8080);
        assert_eq!(config.services_config.chat.model, "gemini-pro");
        assert_eq!(config.services_config.chat.top_k, 40);
        assert_eq!(config.services_config.translation.timeout_secs, 30);
        assert_eq!(config.services_config.chat.timeout_secs, 30);
        assert!(config.client_config.timeout_secs.is_none());
    }

    #[test]
    fn substitutes_known_variables_only() {
        let out = substitute_env("a: ${FOO}, b: ${BAR}", env(&[("FOO", "1")]));
        assert_eq!(out, "a: 1, b: ${BAR}");
    }

    #[test]
    fn yaml_with_env_placeholders() {
        let yaml = r#"
system_config:
  port: 9000
services_config:
  translation:
    api_key: ${RAPID_API_KEY}
  chat:
    api_key: ${GEMINI_KEY}
"#;
        let config = Config::parse("conf.yaml", yaml, env(&[("RAPID_API_KEY", "rk")])).unwrap();
        assert_eq!(config.system_config.port, 9000);
        assert_eq!(config.system_config.host, "127.0.0.1");
        assert_eq!(config.services_config.translation.api_key.as_deref(), Some("rk"));
        assert_eq!(config.services_config.chat.api_key, None);
    }

    #[test]
    fn json_by_extension() {
        let json = r#"{"client_config": {"endpoint": "http://example:1", "timeout_secs": 5}}"#;
        let config = Config::parse("conf.json", json, env(&[])).unwrap();
        assert_eq!(config.client_config.endpoint, "http://example:1");
        assert_eq!(config.client_config.timeout_secs, Some(5));
        assert_eq!(config.client_config.target_lang, "hi");
    }

    #[test]
    fn overrides_take_precedence() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("PORT", "3000"),
            ("MODEL_TEMPERATURE", "0.2"),
            ("GOOGLE_GEMINI_API_KEY", "gk"),
        ]));
        assert_eq!(config.system_config.port, 3000);
        assert_eq!(config.services_config.chat.temperature, 0.2);
        assert_eq!(config.services_config.chat.api_key.as_deref(), Some("gk"));
    }

    #[test]
    fn invalid_port_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("PORT", "eighty")]));
        assert_eq!(config.system_config.port, 8080);
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "system_config:\n  static_dir: public").unwrap();
        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.system_config.static_dir, "public");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::load("/definitely/not/here.yaml").is_err());
    }

    #[test]
    fn broken_config_file_is_not_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("conf.yaml"), "system_config: [not, a, map").unwrap();
        fs::write(dir.path().join("conf.json"), "{}").unwrap();

        let err = Config::discover_in(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("conf.yaml"), "got {:#}", err);
    }

    #[test]
    fn discover_prefers_yaml_then_json_then_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (_, path) = Config::discover_in(dir.path()).unwrap();
        assert_eq!(path, None);

        fs::write(
            dir.path().join("conf.json"),
            r#"{"system_config": {"static_dir": "from-json"}}"#,
        )
        .unwrap();
        let (config, path) = Config::discover_in(dir.path()).unwrap();
        assert_eq!(config.system_config.static_dir, "from-json");
        assert!(path.unwrap().ends_with("conf.json"));

        fs::write(dir.path().join("conf.yaml"), "system_config:\n  static_dir: from-yaml\n").unwrap();
        let (config, _) = Config::discover_in(dir.path()).unwrap();
        assert_eq!(config.system_config.static_dir, "from-yaml");
    }
}
