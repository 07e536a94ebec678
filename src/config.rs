use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::TagPattern;
use crate::error::{BumpError, Result};

/// File name looked up in the working directory and the user config directory.
pub const CONFIG_FILE_NAME: &str = "upstream-bump.toml";

/// Represents the complete configuration for upstream-bump.
///
/// Every section has defaults that track the Brave desktop changelog, so an
/// empty (or missing) file is a valid configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub tag: TagConfig,

    #[serde(default)]
    pub forge: ForgeConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

fn default_changelog_url() -> String {
    "https://raw.githubusercontent.com/brave/brave-browser/master/CHANGELOG_DESKTOP.md".to_string()
}

fn default_release_url_prefix() -> String {
    "https://github.com/brave/brave-browser/releases/tag/".to_string()
}

fn default_product_name() -> String {
    "Brave".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Where upstream releases are announced and how to recognise them.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UpstreamConfig {
    #[serde(default = "default_changelog_url")]
    pub changelog_url: String,

    /// URL prefix of the release tag link in each changelog heading
    #[serde(default = "default_release_url_prefix")]
    pub release_url_prefix: String,

    #[serde(default = "default_product_name")]
    pub product_name: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        UpstreamConfig {
            changelog_url: default_changelog_url(),
            release_url_prefix: default_release_url_prefix(),
            product_name: default_product_name(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_properties_path() -> String {
    "build.properties".to_string()
}

fn default_changelog_path() -> String {
    "CHANGELOG.md".to_string()
}

fn default_version_key() -> String {
    "app.version".to_string()
}

fn default_release_key() -> String {
    "app.release".to_string()
}

fn default_changelog_header() -> String {
    "# Changelog".to_string()
}

/// Local files tracking the downstream version.
///
/// Paths are relative to the working directory.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_properties_path")]
    pub properties: String,

    #[serde(default = "default_changelog_path")]
    pub changelog: String,

    #[serde(default = "default_version_key")]
    pub version_key: String,

    #[serde(default = "default_release_key")]
    pub release_key: String,

    #[serde(default = "default_changelog_header")]
    pub changelog_header: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            properties: default_properties_path(),
            changelog: default_changelog_path(),
            version_key: default_version_key(),
            release_key: default_release_key(),
            changelog_header: default_changelog_header(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_author_name() -> String {
    "GitHub Actions Bot".to_string()
}

fn default_author_email() -> String {
    "actions@github.com".to_string()
}

fn default_commit_message() -> String {
    "Update {product} to {version}".to_string()
}

fn default_git_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

/// Commit identity and push settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_author_name")]
    pub author_name: String,

    #[serde(default = "default_author_email")]
    pub author_email: String,

    /// Supports `{product}` and `{version}` placeholders
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Environment variable holding the default push credential
    #[serde(default = "default_git_token_env")]
    pub token_env: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            author_name: default_author_name(),
            author_email: default_author_email(),
            commit_message: default_commit_message(),
            token_env: default_git_token_env(),
        }
    }
}

impl GitConfig {
    /// Render the commit message for a product/version pair
    pub fn render_commit_message(&self, product: &str, version: &str) -> String {
        self.commit_message
            .replace("{product}", product)
            .replace("{version}", version)
    }
}

fn default_tag_pattern() -> String {
    "v{version}-{release}".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagConfig {
    #[serde(default = "default_tag_pattern")]
    pub pattern: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        TagConfig {
            pattern: default_tag_pattern(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_forge_token_env() -> String {
    "REPO_ACCESS_TOKEN".to_string()
}

/// Forge API used to create tags with the elevated token.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ForgeConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Environment variable holding the elevated token
    #[serde(default = "default_forge_token_env")]
    pub token_env: String,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        ForgeConfig {
            api_url: default_api_url(),
            token_env: default_forge_token_env(),
        }
    }
}

impl ForgeConfig {
    /// API base URL, letting `GITHUB_API_URL` override the configured value
    pub fn resolved_api_url(&self) -> String {
        match std::env::var("GITHUB_API_URL") {
            Ok(url) if !url.trim().is_empty() => url.trim_end_matches('/').to_string(),
            _ => self.api_url.trim_end_matches('/').to_string(),
        }
    }
}

fn default_output_env() -> String {
    "GITHUB_OUTPUT".to_string()
}

/// CI output sink settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Environment variable naming the file that receives `key=value` lines
    #[serde(default = "default_output_env")]
    pub env_var: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            env_var: default_output_env(),
        }
    }
}

impl Config {
    /// Rejects settings the workflow cannot run with.
    pub fn validate(&self) -> Result<()> {
        TagPattern::new(self.tag.pattern.clone())
            .map_err(|e| BumpError::config(format!("tag.pattern: {}", e)))?;

        if self.upstream.timeout_secs == 0 {
            return Err(BumpError::config("upstream.timeout_secs must be positive"));
        }

        let keys = [
            ("files.version_key", &self.files.version_key),
            ("files.release_key", &self.files.release_key),
            ("files.changelog_header", &self.files.changelog_header),
        ];
        for (name, value) in keys {
            if value.trim().is_empty() {
                return Err(BumpError::config(format!("{} must not be empty", name)));
            }
        }

        if self.files.version_key == self.files.release_key {
            return Err(BumpError::config(
                "files.version_key and files.release_key must differ",
            ));
        }

        Ok(())
    }

    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(self.tag.pattern.clone())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `upstream-bump.toml` in the repository working directory
/// 3. `upstream-bump.toml` in user config directory
/// 4. Default configuration if no file found
///
/// The result is validated before it is returned.
pub fn load_config(config_path: Option<&str>, workdir: &Path) -> Result<Config> {
    let local = workdir.join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if local.exists() {
        fs::read_to_string(&local)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config = parse_config(&config_str)?;
    Ok(config)
}

/// Parses and validates configuration text.
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(text).map_err(|e| BumpError::config(format!("invalid TOML: {}", e)))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_track_brave() {
        let config = Config::default();
        assert!(config.upstream.changelog_url.ends_with("CHANGELOG_DESKTOP.md"));
        assert_eq!(config.upstream.product_name, "Brave");
        assert_eq!(config.files.version_key, "app.version");
        assert_eq!(config.files.release_key, "app.release");
        assert_eq!(config.tag.pattern, "v{version}-{release}");
        assert_eq!(config.forge.token_env, "REPO_ACCESS_TOKEN");
        assert_eq!(config.output.env_var, "GITHUB_OUTPUT");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config(
            r#"
[files]
properties = "gradle.properties"
"#,
        )
        .unwrap();
        assert_eq!(config.files.properties, "gradle.properties");
        assert_eq!(config.files.changelog, "CHANGELOG.md");
        assert_eq!(config.git.remote, "origin");
    }

    #[test]
    fn test_rejects_pattern_without_version() {
        let err = parse_config("[tag]\npattern = \"release-{release}\"\n").unwrap_err();
        assert!(err.to_string().contains("tag.pattern"));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(parse_config("[upstream]\ntimeout_secs = 0\n").is_err());
    }

    #[test]
    fn test_rejects_same_keys() {
        let text = "[files]\nversion_key = \"v\"\nrelease_key = \"v\"\n";
        assert!(parse_config(text).is_err());
    }

    #[test]
    fn test_rejects_invalid_toml() {
        let err = parse_config("[files\n").unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn test_load_prefers_workdir_file() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[files]\nproperties = \"version.properties\"\n",
        )
        .unwrap();

        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config.files.properties, "version.properties");
    }

    #[test]
    fn test_explicit_path_beats_workdir_file() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[git]\nremote = \"local\"\n").unwrap();
        let explicit = dir.path().join("other.toml");
        fs::write(&explicit, "[git]\nremote = \"upstream\"\n").unwrap();

        let config = load_config(explicit.to_str(), dir.path()).unwrap();
        assert_eq!(config.git.remote, "upstream");
    }

    #[test]
    fn test_commit_message_render() {
        let git = GitConfig::default();
        assert_eq!(
            git.render_commit_message("Brave", "1.76.81"),
            "Update Brave to 1.76.81"
        );
    }
}
