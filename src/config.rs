use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::domain::{
    BranchMatcher, BranchRule, BranchTable, ReleaseClassifier, SecondaryTagPolicy, TagTemplate,
};
use crate::error::{PublishError, Result};

/// Represents the complete configuration for dist-publish.
///
/// Contains the manifest location, environment variable names, the branch table,
/// dist-tag naming, and the registry command.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_manifest")]
    pub manifest: String,

    #[serde(default)]
    pub env: EnvConfig,

    #[serde(default = "default_branch_rules")]
    pub branches: Vec<BranchRuleConfig>,

    #[serde(default)]
    pub explicit_tag: ExplicitTagConfig,

    #[serde(default)]
    pub secondary_tag: SecondaryTagConfig,

    #[serde(default)]
    pub registry: RegistryConfig,
}

fn default_manifest() -> String {
    "package.json".to_string()
}

/// Returns the default branch variables, checked in order.
fn default_branch_vars() -> Vec<String> {
    vec!["BRANCH_NAME".to_string(), "TRAVIS_BRANCH".to_string()]
}

/// Returns the default explicit release tag variables, checked in order.
fn default_tag_vars() -> Vec<String> {
    vec!["TRAVIS_TAG".to_string()]
}

/// Environment variables that override version-control answers.
///
/// The first variable with a non-empty value wins.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EnvConfig {
    #[serde(default = "default_branch_vars")]
    pub branch: Vec<String>,

    #[serde(default = "default_tag_vars")]
    pub tag: Vec<String>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        EnvConfig {
            branch: default_branch_vars(),
            tag: default_tag_vars(),
        }
    }
}

/// One row of the branch table as written in the configuration file.
///
/// ```toml
/// [[branches]]
/// kind = "prefix"
/// prefix = "dev-"
/// tag = "{branch}"
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BranchRuleConfig {
    Exact { name: String, tag: String },
    Prefix { prefix: String, tag: String },
    Pattern { pattern: String, tag: String },
    Any { tag: String },
}

impl BranchRuleConfig {
    /// Compile into a domain rule, validating the pattern and tag template.
    pub fn to_rule(&self) -> Result<BranchRule> {
        let (matcher, tag) = match self {
            BranchRuleConfig::Exact { name, tag } => (BranchMatcher::Exact(name.clone()), tag),
            BranchRuleConfig::Prefix { prefix, tag } => {
                (BranchMatcher::Prefix(prefix.clone()), tag)
            }
            BranchRuleConfig::Pattern { pattern, tag } => {
                let re = Regex::new(pattern).map_err(|e| {
                    PublishError::config(format!("Invalid branch pattern '{}': {}", pattern, e))
                })?;
                (BranchMatcher::Pattern(re), tag)
            }
            BranchRuleConfig::Any { tag } => (BranchMatcher::Any, tag),
        };

        TagTemplate::new(tag.clone()).validate()?;
        Ok(BranchRule::new(matcher, tag.clone()))
    }
}

/// Returns the default branch table: master, develop, dev-*, everything else.
fn default_branch_rules() -> Vec<BranchRuleConfig> {
    vec![
        BranchRuleConfig::Exact {
            name: "master".to_string(),
            tag: "latest".to_string(),
        },
        BranchRuleConfig::Exact {
            name: "develop".to_string(),
            tag: "next".to_string(),
        },
        BranchRuleConfig::Prefix {
            prefix: "dev-".to_string(),
            tag: "{branch}".to_string(),
        },
        BranchRuleConfig::Any {
            tag: "{branch}-branch{version}".to_string(),
        },
    ]
}

fn default_marker_prefix() -> String {
    "tag-".to_string()
}

/// Dist-tag naming for explicit release tags that are not versions.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExplicitTagConfig {
    #[serde(default = "default_marker_prefix")]
    pub marker_prefix: String,
}

impl Default for ExplicitTagConfig {
    fn default() -> Self {
        ExplicitTagConfig {
            marker_prefix: default_marker_prefix(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_tagged_prefix() -> String {
    "latest-".to_string()
}

fn default_untagged_prefix() -> String {
    "stable-".to_string()
}

/// The advisory marker tag added after a successful publish.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SecondaryTagConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_tagged_prefix")]
    pub tagged_prefix: String,

    #[serde(default = "default_untagged_prefix")]
    pub untagged_prefix: String,
}

impl Default for SecondaryTagConfig {
    fn default() -> Self {
        SecondaryTagConfig {
            enabled: true,
            tagged_prefix: default_tagged_prefix(),
            untagged_prefix: default_untagged_prefix(),
        }
    }
}

fn default_registry_command() -> String {
    "npm".to_string()
}

/// The registry command line tool.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_command")]
    pub command: String,

    #[serde(default)]
    pub publish_args: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            command: default_registry_command(),
            publish_args: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            manifest: default_manifest(),
            env: EnvConfig::default(),
            branches: default_branch_rules(),
            explicit_tag: ExplicitTagConfig::default(),
            secondary_tag: SecondaryTagConfig::default(),
            registry: RegistryConfig::default(),
        }
    }
}

impl Config {
    /// Build the release classifier this configuration describes.
    ///
    /// Fails on invalid branch patterns or tag templates and on marker prefixes
    /// that cannot form a legal dist-tag.
    pub fn classifier(&self) -> Result<ReleaseClassifier> {
        let rules = self
            .branches
            .iter()
            .map(BranchRuleConfig::to_rule)
            .collect::<Result<Vec<_>>>()?;

        TagTemplate::new(format!("{}{{branch}}", self.explicit_tag.marker_prefix)).validate()?;

        let secondary = if self.secondary_tag.enabled {
            let policy = SecondaryTagPolicy {
                tagged_prefix: self.secondary_tag.tagged_prefix.clone(),
                untagged_prefix: self.secondary_tag.untagged_prefix.clone(),
            };
            for tagged in [true, false] {
                policy
                    .marker_for(&semver::Version::new(0, 0, 0), tagged)
                    .map_err(|e| {
                        PublishError::config(format!("Secondary tag prefix is unusable: {}", e))
                    })?;
            }
            Some(policy)
        } else {
            None
        };

        Ok(ReleaseClassifier::new(BranchTable::new(rules))
            .with_marker_prefix(self.explicit_tag.marker_prefix.clone())
            .with_secondary_tag(secondary))
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `distpublish.toml` in current directory
/// 3. `.distpublish.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        read_config_file(Path::new(path))?
    } else if Path::new("./distpublish.toml").exists() {
        read_config_file(Path::new("./distpublish.toml"))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".distpublish.toml");
        if config_path.exists() {
            read_config_file(&config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parses configuration from TOML text.
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| PublishError::config(e.to_string()))
}

fn read_config_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| PublishError::config(format!("Cannot read {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_classifier() {
        assert!(Config::default().classifier().is_ok());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = parse_config(
            r#"
[secondary_tag]
enabled = false

[registry]
publish_args = ["--access", "public"]
"#,
        )
        .unwrap();
        assert!(!config.secondary_tag.enabled);
        assert_eq!(config.secondary_tag.tagged_prefix, "latest-");
        assert_eq!(config.registry.command, "npm");
        assert_eq!(config.registry.publish_args, vec!["--access", "public"]);
        assert_eq!(config.env.branch, vec!["BRANCH_NAME", "TRAVIS_BRANCH"]);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let config = parse_config(
            r#"
[[branches]]
kind = "pattern"
pattern = "release/("
tag = "rc"
"#,
        )
        .unwrap();
        let err = config.classifier().unwrap_err();
        assert!(err.to_string().contains("Invalid branch pattern"));
    }

    #[test]
    fn test_version_template_rejected() {
        let config = parse_config(
            r#"
[[branches]]
kind = "any"
tag = "{version}"
"#,
        )
        .unwrap();
        assert!(config.classifier().is_err());
    }

    #[test]
    fn test_empty_secondary_prefix_rejected() {
        let mut config = Config::default();
        config.secondary_tag.untagged_prefix = String::new();
        assert!(config.classifier().is_err());

        config.secondary_tag.enabled = false;
        assert!(config.classifier().is_ok());
    }

    #[test]
    fn test_unknown_rule_kind_rejected() {
        let result = parse_config(
            r#"
[[branches]]
kind = "glob"
tag = "x"
"#,
        );
        assert!(matches!(result, Err(PublishError::Config(_))));
    }
}
