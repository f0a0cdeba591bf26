use crate::config::SettingsLayer;
use crate::utils::error::{RecomposeError, Result};
use crate::utils::format::OutputFormat;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional configuration file. Every key may be overridden from the command line.
///
/// ```toml
/// [stack]
/// namespace = "shop"
///
/// [docker]
/// host = "${DOCKER_HOST}"
/// api_version = "1.41"
/// timeout_seconds = 30
/// tls_verify = true
/// cert_path = "/etc/docker/certs"
///
/// [output]
/// path = "docker-compose.yml"
/// format = "yaml"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub stack: Option<StackConfig>,
    pub docker: Option<DockerSection>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StackConfig {
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DockerSection {
    pub host: Option<String>,
    pub api_version: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub tls_verify: Option<bool>,
    pub cert_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub format: Option<OutputFormat>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| RecomposeError::ConfigError {
            message: format!(
                "Cannot read config file {}: {}",
                path.as_ref().display(),
                e
            ),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RecomposeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RecomposeError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl From<TomlConfig> for SettingsLayer {
    fn from(config: TomlConfig) -> Self {
        let stack = config.stack.unwrap_or_default();
        let docker = config.docker.unwrap_or_default();
        let output = config.output.unwrap_or_default();

        SettingsLayer {
            namespace: stack.namespace,
            output_path: output.path,
            format: output.format,
            docker_host: docker.host,
            api_version: docker.api_version,
            timeout_seconds: docker.timeout_seconds,
            tls_verify: docker.tls_verify,
            cert_path: docker.cert_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[stack]
namespace = "shop"

[docker]
host = "tcp://manager:2375"
api_version = "1.41"
timeout_seconds = 10

[output]
path = "shop.yml"
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let layer = SettingsLayer::from(config);

        assert_eq!(layer.namespace.as_deref(), Some("shop"));
        assert_eq!(layer.docker_host.as_deref(), Some("tcp://manager:2375"));
        assert_eq!(layer.api_version.as_deref(), Some("1.41"));
        assert_eq!(layer.timeout_seconds, Some(10));
        assert_eq!(layer.output_path.as_deref(), Some("shop.yml"));
        assert_eq!(layer.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_sections_are_optional() {
        let config = TomlConfig::from_toml_str("[stack]\nnamespace = \"shop\"\n").unwrap();
        let layer = SettingsLayer::from(config);

        assert_eq!(layer.namespace.as_deref(), Some("shop"));
        assert!(layer.docker_host.is_none());
        assert!(layer.format.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RECOMPOSE_TEST_MANAGER", "tcp://swarm-manager:2375");

        let toml_content = r#"
[docker]
host = "${RECOMPOSE_TEST_MANAGER}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.docker.unwrap().host.as_deref(),
            Some("tcp://swarm-manager:2375")
        );

        std::env::remove_var("RECOMPOSE_TEST_MANAGER");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = TomlConfig::from_toml_str("[stack]\nname = \"shop\"\n").unwrap_err();
        assert!(matches!(err, RecomposeError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_tls_section_and_yml_alias() {
        let toml_content = r#"
[docker]
host = "tcp://manager:2376"
tls_verify = true
cert_path = "/etc/docker/certs"

[output]
format = "yml"
"#;

        let layer = SettingsLayer::from(TomlConfig::from_toml_str(toml_content).unwrap());

        assert_eq!(layer.tls_verify, Some(true));
        assert_eq!(layer.cert_path.as_deref(), Some("/etc/docker/certs"));
        assert_eq!(layer.format, Some(OutputFormat::Yaml));
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        assert!(TomlConfig::from_toml_str("[output]\nformat = \"xml\"\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[stack]\nnamespace = \"file-stack\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.stack.unwrap().namespace.as_deref(), Some("file-stack"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = TomlConfig::from_file("/nonexistent/swarm-recompose.toml").unwrap_err();
        assert!(matches!(err, RecomposeError::ConfigError { .. }));
    }
}
