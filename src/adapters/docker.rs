use crate::domain::model::{MountSpec, NetworkRecord, PortMapping, SchedulingMode, ServiceRecord};
use crate::domain::ports::ClusterSource;
use crate::utils::error::{RecomposeError, Result};
use async_trait::async_trait;
use bollard::errors::Error as BollardError;
use bollard::models::{Network, Service, ServiceSpec, TaskSpecContainerSpec};
use bollard::network::ListNetworksOptions;
use bollard::service::ListServicesOptions;
use bollard::{ClientVersion, Docker, API_DEFAULT_VERSION};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Label `docker stack deploy` puts on every service of a stack.
pub const STACK_NAMESPACE_LABEL: &str = "com.docker.stack.namespace";

#[cfg(unix)]
pub const LOCAL_DOCKER_HOST: &str = "unix:///var/run/docker.sock";
#[cfg(windows)]
pub const LOCAL_DOCKER_HOST: &str = "npipe:////./pipe/docker_engine";

/// How to reach the daemon. Anything left unset falls back to what the
/// docker CLI would do with the same environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerConfig {
    pub host: Option<String>,
    pub api_version: Option<String>,
    pub timeout_seconds: u64,
    pub tls_verify: bool,
    pub cert_path: Option<String>,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            host: None,
            api_version: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            tls_verify: false,
            cert_path: None,
        }
    }
}

impl DockerConfig {
    /// Parses `1.41` / `v1.41` into a bollard client version.
    pub fn client_version(&self) -> Result<Option<ClientVersion>> {
        let Some(raw) = self.api_version.as_deref() else {
            return Ok(None);
        };

        let invalid = || RecomposeError::InvalidConfigValueError {
            field: "docker.api_version".to_string(),
            value: raw.to_string(),
            reason: "Expected MAJOR.MINOR, e.g. 1.41".to_string(),
        };
        let (major, minor) = raw.trim_start_matches('v').split_once('.').ok_or_else(invalid)?;

        Ok(Some(ClientVersion {
            major_version: major.parse().map_err(|_| invalid())?,
            minor_version: minor.parse().map_err(|_| invalid())?,
        }))
    }

    /// Directory holding `ca.pem`, `cert.pem` and `key.pem`.
    fn cert_dir(&self) -> PathBuf {
        match &self.cert_path {
            Some(path) => PathBuf::from(path),
            None => std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_default()
                .join(".docker"),
        }
    }
}

/// Opens a client for the configured daemon.
///
/// Without an explicit host this is `Docker::connect_with_defaults`, which
/// reads `DOCKER_HOST` and otherwise uses the local socket. When no API
/// version is pinned, the version is negotiated with the daemon.
pub async fn connect(config: &DockerConfig) -> Result<Docker> {
    let version = config.client_version()?;
    let pinned = version.as_ref().unwrap_or(API_DEFAULT_VERSION);

    let docker = match config.host.as_deref() {
        None if version.is_none() => Docker::connect_with_defaults()?
            .with_timeout(Duration::from_secs(config.timeout_seconds)),
        None => connect_to_host(LOCAL_DOCKER_HOST, config, pinned)?,
        Some(host) => connect_to_host(host, config, pinned)?,
    };

    if version.is_some() {
        return Ok(docker);
    }

    let docker = docker.negotiate_version().await?;
    tracing::debug!("Negotiated Docker API version {:?}", docker.client_version());
    Ok(docker)
}

fn connect_to_host(host: &str, config: &DockerConfig, version: &ClientVersion) -> Result<Docker> {
    let timeout = config.timeout_seconds;
    tracing::debug!("Connecting to Docker daemon at {}", host);

    let scheme = host.split_once("://").map(|(scheme, _)| scheme).unwrap_or_default();
    let docker = match scheme {
        "unix" | "npipe" => Docker::connect_with_socket(host, timeout, version)?,
        "https" => connect_with_tls(host, config, version)?,
        "tcp" | "http" if config.tls_verify => connect_with_tls(host, config, version)?,
        "tcp" | "http" => Docker::connect_with_http(host, timeout, version)?,
        other => {
            return Err(RecomposeError::InvalidConfigValueError {
                field: "docker.host".to_string(),
                value: host.to_string(),
                reason: format!("Unsupported URL scheme: {}", other),
            })
        }
    };
    Ok(docker)
}

fn connect_with_tls(host: &str, config: &DockerConfig, version: &ClientVersion) -> Result<Docker> {
    let dir = config.cert_dir();
    tracing::debug!("Using TLS client certificates from {}", dir.display());

    Ok(Docker::connect_with_ssl(
        host,
        &dir.join("key.pem"),
        &dir.join("cert.pem"),
        &dir.join("ca.pem"),
        config.timeout_seconds,
        version,
    )?)
}

fn daemon_error(endpoint: &str, err: BollardError) -> RecomposeError {
    match err {
        BollardError::DockerResponseServerError {
            status_code,
            message,
        } => RecomposeError::DockerApiError {
            status: status_code,
            endpoint: endpoint.to_string(),
            message,
        },
        other => RecomposeError::DockerError(other),
    }
}

#[async_trait]
impl ClusterSource for Docker {
    async fn list_services(&self) -> Result<Vec<ServiceRecord>> {
        let services = self
            .list_services(None::<ListServicesOptions<String>>)
            .await
            .map_err(|e| daemon_error("/services", e))?;
        tracing::debug!("Docker reported {} services", services.len());
        Ok(services.into_iter().map(ServiceRecord::from).collect())
    }

    async fn list_networks(&self) -> Result<Vec<NetworkRecord>> {
        let networks = self
            .list_networks(None::<ListNetworksOptions<String>>)
            .await
            .map_err(|e| daemon_error("/networks", e))?;
        Ok(networks.into_iter().map(NetworkRecord::from).collect())
    }
}

fn container_spec(spec: &ServiceSpec) -> Option<&TaskSpecContainerSpec> {
    spec.task_template.as_ref()?.container_spec.as_ref()
}

/// The container labels carry the namespace on every daemon version; the
/// service labels are a fallback.
fn stack_label(spec: &ServiceSpec) -> Option<String> {
    container_spec(spec)
        .and_then(|c| c.labels.as_ref())
        .and_then(|labels| labels.get(STACK_NAMESPACE_LABEL))
        .or_else(|| {
            spec.labels
                .as_ref()
                .and_then(|labels| labels.get(STACK_NAMESPACE_LABEL))
        })
        .cloned()
}

/// `Spec.Networks` is deprecated but still filled in by older daemons.
fn network_ids(spec: &ServiceSpec) -> Vec<String> {
    spec.task_template
        .as_ref()
        .and_then(|t| t.networks.as_ref())
        .filter(|n| !n.is_empty())
        .or(spec.networks.as_ref())
        .map(|attachments| {
            attachments
                .iter()
                .filter_map(|a| a.target.clone())
                .collect()
        })
        .unwrap_or_default()
}

fn scheduling_mode(spec: &ServiceSpec) -> SchedulingMode {
    match spec.mode.as_ref().and_then(|m| m.replicated.as_ref()) {
        Some(replicated) => SchedulingMode::Replicated {
            replicas: replicated
                .replicas
                .and_then(|n| u64::try_from(n).ok())
                .unwrap_or(0),
        },
        None => SchedulingMode::Global,
    }
}

fn ports(spec: &ServiceSpec) -> Vec<PortMapping> {
    let port = |value: Option<_>| value.and_then(|p| u32::try_from(p).ok()).unwrap_or(0);

    spec.endpoint_spec
        .as_ref()
        .and_then(|e| e.ports.as_ref())
        .map(|ports| {
            ports
                .iter()
                .map(|p| PortMapping {
                    published: port(p.published_port),
                    target: port(p.target_port),
                })
                .collect()
        })
        .unwrap_or_default()
}

impl From<Service> for ServiceRecord {
    fn from(service: Service) -> Self {
        let spec = service.spec.unwrap_or_default();
        let container = container_spec(&spec).cloned().unwrap_or_default();

        ServiceRecord {
            name: spec.name.clone().unwrap_or_default(),
            image: container.image.unwrap_or_default(),
            stack_label: stack_label(&spec),
            mode: scheduling_mode(&spec),
            mounts: container
                .mounts
                .unwrap_or_default()
                .into_iter()
                .map(|m| MountSpec {
                    source: m.source.unwrap_or_default(),
                    target: m.target.unwrap_or_default(),
                })
                .collect(),
            network_ids: network_ids(&spec),
            ports: ports(&spec),
            args: container.args.unwrap_or_default(),
        }
    }
}

impl From<Network> for NetworkRecord {
    fn from(network: Network) -> Self {
        NetworkRecord {
            id: network.id.unwrap_or_default(),
            name: network.name.unwrap_or_default(),
        }
    }
}
