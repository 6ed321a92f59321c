use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub gallery: GalleryConfig,

    #[serde(default)]
    pub status: StatusConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend; the gallery lives under `{base_url}/gallery`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout handed to the HTTP agent.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Cookie jar holding the login token (Netscape cookies.txt or name=value lines)
    #[serde(default = "default_cookie_file")]
    pub cookie_file: PathBuf,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Environment variable checked before the cookie jar
    #[serde(default = "default_token_env_var")]
    pub env_var: String,
}

fn default_cookie_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from(".local/share"))
        .join("gallery-panel")
        .join("cookies.txt")
}

fn default_cookie_name() -> String {
    "login-token".to_string()
}

fn default_token_env_var() -> String {
    "GALLERY_PANEL_TOKEN".to_string()
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            cookie_file: default_cookie_file(),
            cookie_name: default_cookie_name(),
            env_var: default_token_env_var(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    #[serde(default = "default_min_name_length")]
    pub min_name_length: usize,

    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,

    /// Upper bound for the comma-joined tag text
    #[serde(default = "default_max_tags_length")]
    pub max_tags_length: usize,

    /// Extensions a picture file reference must end with
    #[serde(default = "default_file_extensions")]
    pub file_extensions: Vec<String>,

    /// How long success/error notices stay visible
    #[serde(default = "default_notice_duration_ms")]
    pub notice_duration_ms: u64,
}

fn default_min_name_length() -> usize {
    3
}

fn default_max_name_length() -> usize {
    25
}

fn default_max_tags_length() -> usize {
    128
}

fn default_file_extensions() -> Vec<String> {
    vec![
        "jpg".to_string(),
        "jpeg".to_string(),
        "png".to_string(),
        "gif".to_string(),
    ]
}

fn default_notice_duration_ms() -> u64 {
    3 * 1000
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            min_name_length: default_min_name_length(),
            max_name_length: default_max_name_length(),
            max_tags_length: default_max_tags_length(),
            file_extensions: default_file_extensions(),
            notice_duration_ms: default_notice_duration_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default = "default_status_enabled")]
    pub enabled: bool,

    #[serde(default = "default_status_endpoint")]
    pub endpoint: String,

    /// Game server address passed as the `ip` query parameter
    #[serde(default = "default_status_host")]
    pub host: String,
}

fn default_status_enabled() -> bool {
    true
}

fn default_status_endpoint() -> String {
    "https://mcapi.us/server/status".to_string()
}

fn default_status_host() -> String {
    "broz.wtf".to_string()
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            enabled: default_status_enabled(),
            endpoint: default_status_endpoint(),
            host: default_status_host(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            credentials: CredentialsConfig::default(),
            gallery: GalleryConfig::default(),
            status: StatusConfig::default(),
        }
    }
}

impl Config {
    /// Load from `GALLERY_PANEL_CONFIG` or the default location, writing
    /// a default file when none exists yet.
    pub fn load() -> Result<Self> {
        let config_path = match std::env::var_os("GALLERY_PANEL_CONFIG") {
            Some(path) => PathBuf::from(path),
            None => Self::config_path(),
        };
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Gallery resource root, e.g. `http://host/gallery`.
    pub fn gallery_url(&self) -> String {
        format!("{}/gallery", self.api.base_url.trim_end_matches('/'))
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gallery-panel")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "https://example.org/api/"

            [gallery]
            max_name_length = 40
            "#,
        )
        .unwrap();

        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.gallery.max_name_length, 40);
        assert_eq!(config.gallery.min_name_length, 3);
        assert_eq!(config.credentials.cookie_name, "login-token");
        assert_eq!(config.gallery_url(), "https://example.org/api/gallery");
    }

    #[test]
    fn test_missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.gallery.notice_duration_ms, 3000);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.api.base_url, config.api.base_url);
        assert_eq!(reloaded.gallery.file_extensions, config.gallery.file_extensions);
    }
}
