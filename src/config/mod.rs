pub mod toml_config;

use crate::adapters::docker::{DockerConfig, DEFAULT_TIMEOUT_SECONDS};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::format::OutputFormat;
use crate::utils::validation::{
    validate_api_version, validate_docker_host, validate_non_empty_string, validate_path,
    validate_positive_number, validate_required_field, Validate,
};

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "swarm-recompose", version)]
#[command(about = "Rebuild a compose file from a running Docker Swarm stack")]
pub struct CliConfig {
    /// Stack namespace to reconstruct
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,

    /// Output file, the document goes to stdout when omitted
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Docker daemon address, e.g. unix:///var/run/docker.sock or tcp://manager:2375
    #[arg(short = 'H', long, env = "DOCKER_HOST")]
    pub docker_host: Option<String>,

    #[arg(long, env = "DOCKER_API_VERSION")]
    pub api_version: Option<String>,

    /// Use TLS and verify the daemon certificate
    #[arg(
        long = "tlsverify",
        env = "DOCKER_TLS_VERIFY",
        num_args = 0..=1,
        default_missing_value = "1",
        value_name = "BOOL"
    )]
    pub tls_verify: Option<String>,

    /// Directory with ca.pem, cert.pem and key.pem
    #[arg(long, env = "DOCKER_CERT_PATH")]
    pub cert_path: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn layer(&self) -> SettingsLayer {
        SettingsLayer {
            namespace: self.namespace.clone(),
            output_path: self.output.clone(),
            format: self.format,
            docker_host: self.docker_host.clone(),
            api_version: self.api_version.clone(),
            timeout_seconds: self.timeout,
            tls_verify: self.tls_verify.as_deref().map(is_enabled),
            cert_path: self.cert_path.clone().filter(|p| !p.is_empty()),
        }
    }

    /// Flags first, then the config file, then built-in defaults.
    pub fn load_settings(&self) -> Result<Settings> {
        let file_layer = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                SettingsLayer::from(toml_config::TomlConfig::from_file(path)?)
            }
            None => SettingsLayer::default(),
        };

        Ok(Settings::from_layer(self.layer().or(file_layer)))
    }
}

/// `DOCKER_TLS_VERIFY` is on for any value except empty, `0` and `false`.
#[cfg(feature = "cli")]
fn is_enabled(value: &str) -> bool {
    !matches!(value.trim(), "" | "0" | "false")
}

/// Partially specified settings from one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsLayer {
    pub namespace: Option<String>,
    pub output_path: Option<String>,
    pub format: Option<OutputFormat>,
    pub docker_host: Option<String>,
    pub api_version: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub tls_verify: Option<bool>,
    pub cert_path: Option<String>,
}

impl SettingsLayer {
    /// Fills the gaps in `self` from `fallback`.
    pub fn or(self, fallback: SettingsLayer) -> SettingsLayer {
        SettingsLayer {
            namespace: self.namespace.or(fallback.namespace),
            output_path: self.output_path.or(fallback.output_path),
            format: self.format.or(fallback.format),
            docker_host: self.docker_host.or(fallback.docker_host),
            api_version: self.api_version.or(fallback.api_version),
            timeout_seconds: self.timeout_seconds.or(fallback.timeout_seconds),
            tls_verify: self.tls_verify.or(fallback.tls_verify),
            cert_path: self.cert_path.or(fallback.cert_path),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub namespace: Option<String>,
    pub output_path: Option<String>,
    pub format: OutputFormat,
    pub docker: DockerConfig,
}

impl Settings {
    pub fn from_layer(layer: SettingsLayer) -> Self {
        Settings {
            namespace: layer.namespace,
            output_path: layer.output_path,
            format: layer.format.unwrap_or_default(),
            docker: DockerConfig {
                host: layer.docker_host.filter(|h| !h.is_empty()),
                api_version: layer.api_version.filter(|v| !v.is_empty()),
                timeout_seconds: layer.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
                tls_verify: layer.tls_verify.unwrap_or(false),
                cert_path: layer.cert_path,
            },
        }
    }
}

impl ConfigProvider for Settings {
    fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    fn output_format(&self) -> OutputFormat {
        self.format
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        let namespace = validate_required_field("namespace", &self.namespace)?;
        validate_non_empty_string("namespace", namespace)?;

        if let Some(host) = &self.docker.host {
            validate_docker_host("docker.host", host)?;
        }
        if let Some(version) = &self.docker.api_version {
            validate_api_version("docker.api_version", version)?;
        }
        validate_positive_number("docker.timeout_seconds", self.docker.timeout_seconds, 1)?;

        if let Some(path) = &self.output_path {
            validate_path("output", path)?;
        }

        Ok(())
    }
}
