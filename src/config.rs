// ABOUTME: Configuration structures and parsing for key-source discovery settings
// ABOUTME: Lets operators point the aggregator at non-default key locations for testing or odd hosts

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    pub keys: KeysConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct KeysConfig {
    pub pub_keys_glob: String,
    pub authorized_keys_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keys: KeysConfig {
                pub_keys_glob: "~/.ssh/*.pub".to_string(),
                authorized_keys_path: "~/.ssh/authorized_keys".to_string(),
            },
        }
    }
}

impl Config {
    pub fn default_config_content() -> &'static str {
        r#"# labkeys configuration

[keys]
# Glob pattern matching the public key files to collect
pub_keys_glob = "~/.ssh/*.pub"

# Existing authorized_keys file appended after the glob matches
# (skipped silently if it does not exist)
authorized_keys_path = "~/.ssh/authorized_keys"
"#
    }

    pub fn load_from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::load_from_str(&content)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?;
        Ok(config_dir.join("labkeys").join("config.toml"))
    }

    pub fn expand_paths(&mut self) -> Result<()> {
        self.keys.pub_keys_glob = expand_tilde(&self.keys.pub_keys_glob)?;
        self.keys.authorized_keys_path = expand_tilde(&self.keys.authorized_keys_path)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.keys.pub_keys_glob.is_empty() {
            anyhow::bail!("Public key glob pattern cannot be empty");
        }

        if self.keys.authorized_keys_path.is_empty() {
            anyhow::bail!("authorized_keys path cannot be empty");
        }

        Ok(())
    }

    pub fn save_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write default config to: {}", path.display()))?;

        Ok(())
    }
}

fn expand_tilde(path: &str) -> Result<String> {
    if path.starts_with("~/") {
        let home = dirs::home_dir()
            .context("Failed to determine home directory")?;
        Ok(home.join(&path[2..]).to_string_lossy().into_owned())
    } else {
        Ok(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config_str = r#"
[keys]
pub_keys_glob = "~/.ssh/*.pub"
authorized_keys_path = "~/.ssh/authorized_keys"
"#;

        let config = Config::load_from_str(config_str).unwrap();

        assert_eq!(config.keys.pub_keys_glob, "~/.ssh/*.pub");
        assert_eq!(config.keys.authorized_keys_path, "~/.ssh/authorized_keys");
    }

    #[test]
    fn test_parse_custom_locations() {
        let config_str = r#"
[keys]
pub_keys_glob = "/etc/lab/keys/*.pub"
authorized_keys_path = "/etc/lab/authorized_keys"
"#;

        let config = Config::load_from_str(config_str).unwrap();

        assert_eq!(config.keys.pub_keys_glob, "/etc/lab/keys/*.pub");
        assert_eq!(config.keys.authorized_keys_path, "/etc/lab/authorized_keys");
    }

    #[test]
    fn test_parse_invalid_config_missing_section() {
        let result = Config::load_from_str("");
        assert!(result.is_err());
        // Our context message should be present
        assert!(result.unwrap_err().to_string().contains("Failed to parse configuration"));
    }

    #[test]
    fn test_parse_invalid_config_wrong_type() {
        let config_str = r#"
[keys]
pub_keys_glob = ["~/.ssh/*.pub"]  # Should be a string
authorized_keys_path = "~/.ssh/authorized_keys"
"#;

        let result = Config::load_from_str(config_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        let home_str = home.to_string_lossy();

        assert_eq!(expand_tilde("~/test").unwrap(), format!("{}/test", home_str));
        assert_eq!(expand_tilde("/absolute/path").unwrap(), "/absolute/path");
        assert_eq!(expand_tilde("relative/path").unwrap(), "relative/path");
    }

    #[test]
    fn test_config_expand_paths() {
        let mut config = Config::default();
        config.expand_paths().unwrap();

        let home = dirs::home_dir().unwrap();
        assert_eq!(
            config.keys.pub_keys_glob,
            home.join(".ssh/*.pub").to_string_lossy()
        );
        assert_eq!(
            config.keys.authorized_keys_path,
            home.join(".ssh/authorized_keys").to_string_lossy()
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path().unwrap();
        assert!(path.to_string_lossy().contains("labkeys"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_validate_empty_glob() {
        let mut config = Config::default();
        config.keys.pub_keys_glob = "".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("glob pattern cannot be empty"));
    }

    #[test]
    fn test_validate_empty_authorized_keys_path() {
        let mut config = Config::default();
        config.keys.authorized_keys_path = "".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("authorized_keys path cannot be empty"));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_content_can_be_parsed() {
        let content = Config::default_config_content();
        let config = Config::load_from_str(content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config, Config::default());
    }
}
