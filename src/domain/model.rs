use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const COMPOSE_FILE_VERSION: &str = "3.2";

/// One running service as reported by the cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceRecord {
    pub name: String,
    pub image: String,
    pub stack_label: Option<String>,
    pub mode: SchedulingMode,
    pub mounts: Vec<MountSpec>,
    pub network_ids: Vec<String>,
    pub ports: Vec<PortMapping>,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchedulingMode {
    Replicated {
        replicas: u64,
    },
    #[default]
    Global,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountSpec {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortMapping {
    pub published: u32,
    pub target: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkRecord {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployMode {
    Replicated,
    #[default]
    Global,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployPolicy {
    pub mode: DeployMode,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub replicas: Option<u64>,
}

fn is_unset(replicas: &Option<u64>) -> bool {
    matches!(replicas, None | Some(0))
}

impl DeployPolicy {
    pub fn global() -> Self {
        Self {
            mode: DeployMode::Global,
            replicas: None,
        }
    }

    pub fn replicated(replicas: u64) -> Self {
        Self {
            mode: DeployMode::Replicated,
            replicas: Some(replicas),
        }
    }
}

impl From<SchedulingMode> for DeployPolicy {
    fn from(mode: SchedulingMode) -> Self {
        match mode {
            SchedulingMode::Replicated { replicas } => DeployPolicy::replicated(replicas),
            SchedulingMode::Global => DeployPolicy::global(),
        }
    }
}

/// Compose-file entry for one service. Empty fields are left out when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedService {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(default)]
    pub deploy: DeployPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub version: String,
    // Sorted keys keep repeated runs byte-identical.
    #[serde(default)]
    pub services: BTreeMap<String, ResolvedService>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self {
            version: COMPOSE_FILE_VERSION.to_string(),
            services: BTreeMap::new(),
        }
    }
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self::new()
    }
}
