use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::{ConnectionArgs, OutputFormat};

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("physdom"))
}

/// Resolve the config file path, honouring an explicit override
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => {
            let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
            Ok(PathBuf::from(expanded))
        }
        None => Ok(config_dir()?.join("config.toml")),
    }
}

// ============================================================================
// Config File
// ============================================================================

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub login_domain: Option<String>,
    pub validate_certs: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub output: Option<OutputFormat>,
}

impl FileConfig {
    /// Load from `path`; a missing file is an empty config
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config file at {}", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }
}

// ============================================================================
// Resolved Settings
// ============================================================================

/// Settings after merging flags, environment, config file and defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub login_domain: String,
    pub validate_certs: bool,
    pub timeout: Duration,
    pub output: OutputFormat,
}

impl Settings {
    /// Merge command-line (and environment) values over the config file
    pub fn resolve(args: &ConnectionArgs, file: FileConfig) -> Self {
        Self {
            host: args.host.clone().or(file.host),
            username: args.username.clone().or(file.username),
            password: args.password.clone().or(file.password),
            login_domain: args
                .login_domain
                .clone()
                .or(file.login_domain)
                .unwrap_or_else(|| ndo::types::DEFAULT_LOGIN_DOMAIN.to_string()),
            validate_certs: !args.insecure && file.validate_certs.unwrap_or(true),
            timeout: Duration::from_secs(
                args.timeout
                    .or(file.timeout_secs)
                    .unwrap_or(ndo::types::DEFAULT_TIMEOUT_SECS),
            ),
            output: args.output.or(file.output).unwrap_or_default(),
        }
    }

    /// Build connection settings, prompting for a missing password when possible
    pub fn connection(&self) -> Result<ndo::Connection> {
        let Some(host) = self.host.as_deref() else {
            bail!("No host configured (use --host, NDO_HOST or `host` in config.toml)");
        };
        let Some(username) = self.username.as_deref() else {
            bail!("No username configured (use --username, NDO_USERNAME or `username` in config.toml)");
        };
        let password = match &self.password {
            Some(password) => password.clone(),
            None => prompt_password(username, host)?,
        };

        Ok(ndo::Connection::new(host, username, password)
            .login_domain(self.login_domain.clone())
            .validate_certs(self.validate_certs)
            .timeout(self.timeout))
    }
}

fn prompt_password(username: &str, host: &str) -> Result<String> {
    use std::io::IsTerminal;

    if !std::io::stdin().is_terminal() {
        bail!("No password configured (use --password or NDO_PASSWORD)");
    }
    dialoguer::Password::new()
        .with_prompt(format!("Password for {}@{}", username, host))
        .interact()
        .context("Could not read password")
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
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert!(config.host.is_none());
    }

    #[test]
    fn test_load_file() {
        let file = write_config(
            r#"
host = "nd.example.com"
username = "admin"
validate_certs = false
timeout_secs = 5
output = "json"
"#,
        );
        let config = FileConfig::load(file.path()).unwrap();
        assert_eq!(config.host.as_deref(), Some("nd.example.com"));
        assert_eq!(config.validate_certs, Some(false));
        assert_eq!(config.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let file = write_config("hots = \"typo\"\n");
        assert!(FileConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let args = ConnectionArgs {
            host: Some("flag-host".to_string()),
            timeout: Some(60),
            ..Default::default()
        };
        let file = FileConfig {
            host: Some("file-host".to_string()),
            username: Some("file-user".to_string()),
            timeout_secs: Some(5),
            ..Default::default()
        };

        let settings = Settings::resolve(&args, file);
        assert_eq!(settings.host.as_deref(), Some("flag-host"));
        assert_eq!(settings.username.as_deref(), Some("file-user"));
        assert_eq!(settings.timeout, Duration::from_secs(60));
        assert_eq!(settings.login_domain, "DefaultAuth");
        assert!(settings.validate_certs);
        assert_eq!(settings.output, OutputFormat::Text);
    }

    #[test]
    fn test_insecure_flag_wins() {
        let args = ConnectionArgs {
            insecure: true,
            ..Default::default()
        };
        let file = FileConfig {
            validate_certs: Some(true),
            ..Default::default()
        };
        assert!(!Settings::resolve(&args, file).validate_certs);
    }

    #[test]
    fn test_connection_requires_host() {
        let settings = Settings::resolve(&ConnectionArgs::default(), FileConfig::default());
        let err = settings.connection().unwrap_err();
        assert!(err.to_string().contains("No host configured"));
    }

    #[test]
    fn test_connection_from_settings() {
        let file = FileConfig {
            host: Some("nd.local".to_string()),
            username: Some("admin".to_string()),
            password: Some("pw".to_string()),
            login_domain: Some("local".to_string()),
            ..Default::default()
        };
        let conn = Settings::resolve(&ConnectionArgs::default(), file)
            .connection()
            .unwrap();
        assert_eq!(conn.host, "nd.local");
        assert_eq!(conn.login_domain, "local");
        assert!(conn.validate_certs);
    }

    #[test]
    fn test_config_path_override() {
        let path = config_path(Some(Path::new("/etc/physdom.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/etc/physdom.toml"));
    }
}
