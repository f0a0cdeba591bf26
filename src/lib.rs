pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::Settings;

pub use crate::adapters::{
    docker::{connect as connect_docker, DockerConfig},
    memory::InMemoryCluster,
    storage::LocalStorage,
};
pub use crate::core::{
    engine::RecomposeEngine, pipeline::StackPipeline, resolver::NetworkResolver,
    translator::{build_config_document, ServiceTranslator},
};
pub use crate::domain::model::{ConfigDocument, ResolvedService};
pub use crate::domain::ports::LoadOutcome;
pub use crate::utils::error::{RecomposeError, Result};
pub use crate::utils::format::OutputFormat;
