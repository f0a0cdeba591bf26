use crate::domain::model::{ConfigDocument, NetworkRecord, ServiceRecord};
use crate::utils::error::Result;
use crate::utils::format::OutputFormat;
use async_trait::async_trait;

/// Read-only view of the cluster inventory.
#[async_trait]
pub trait ClusterSource: Send + Sync {
    async fn list_services(&self) -> Result<Vec<ServiceRecord>>;
    async fn list_networks(&self) -> Result<Vec<NetworkRecord>>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn namespace(&self) -> &str;
    fn output_path(&self) -> Option<&str>;
    fn output_format(&self) -> OutputFormat;
}

/// Where the rendered document ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Written { path: String },
    Rendered { document: String },
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ServiceRecord>>;
    async fn transform(&self, services: Vec<ServiceRecord>) -> Result<ConfigDocument>;
    async fn load(&self, document: ConfigDocument) -> Result<LoadOutcome>;
}
