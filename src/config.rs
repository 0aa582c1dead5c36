//! TOML configuration.
//!
//! Every section is optional; a missing file or section falls back to the
//! defaults below, which point at the public archive.org record the viewer
//! was built around.
//!
//! ```toml
//! [provider]
//! base_url = "https://archive.org"
//! # timeout_secs = 30
//!
//! [record]
//! identifier = "principleofrelat00eins"
//!
//! [view]
//! page_size = 10
//!
//! [logging]
//! level = "warn"
//! ```

use anyhow::{bail, Context, Result};
use archive_viewer_core::view::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub record: RecordConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout. Unset means the load may wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "https://archive.org".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecordConfig {
    #[serde(default = "default_identifier")]
    pub identifier: String,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            identifier: default_identifier(),
        }
    }
}

fn default_identifier() -> String {
    "principleofrelat00eins".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Check invariants and normalize `provider.base_url`.
    pub fn validate(mut self) -> Result<Self> {
        self.record.identifier = self.record.identifier.trim().to_string();
        if self.record.identifier.is_empty() {
            bail!("record.identifier must not be empty");
        }

        if self.view.page_size == 0 {
            bail!("view.page_size must be > 0");
        }

        let base = self.provider.base_url.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            bail!(
                "provider.base_url must start with http:// or https://, got '{}'",
                self.provider.base_url
            );
        }
        self.provider.base_url = base.to_string();

        if self.provider.timeout_secs == Some(0) {
            bail!("provider.timeout_secs must be > 0 when set");
        }

        Ok(self)
    }
}

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_PATH: &str = "./config/arcv.toml";

/// Load `explicit` if given, else [`DEFAULT_CONFIG_PATH`] if present, else
/// built-in defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => load_config(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                load_config(default)
            } else {
                Config::default().validate()
            }
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_uses_defaults() {
        let file = write_config("");
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.provider.base_url, "https://archive.org");
        assert_eq!(cfg.provider.timeout_secs, None);
        assert_eq!(cfg.record.identifier, "principleofrelat00eins");
        assert_eq!(cfg.view.page_size, 10);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn full_file_overrides_defaults() {
        let file = write_config(
            r#"
[provider]
base_url = "http://127.0.0.1:9000/"
timeout_secs = 5

[record]
identifier = "  some-record  "

[view]
page_size = 25

[logging]
level = "debug"
"#,
        );
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.provider.base_url, "http://127.0.0.1:9000");
        assert_eq!(cfg.provider.timeout_secs, Some(5));
        assert_eq!(cfg.record.identifier, "some-record");
        assert_eq!(cfg.view.page_size, 25);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn rejects_zero_page_size() {
        let file = write_config("[view]\npage_size = 0\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn rejects_blank_identifier() {
        let file = write_config("[record]\nidentifier = \"   \"\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("identifier"));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let file = write_config("[provider]\nbase_url = \"ftp://archive.org\"\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let file = write_config("[provider]\ntimeout_secs = 0\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn missing_file_names_path() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn explicit_path_must_exist() {
        assert!(resolve_config(Some(Path::new("/definitely/not/here.toml"))).is_err());
        let file = write_config("[view]\npage_size = 3\n");
        assert_eq!(resolve_config(Some(file.path())).unwrap().view.page_size, 3);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let file = write_config("[view\npage_size = ");
        assert!(load_config(file.path()).is_err());
    }
}
