use crate::domain::model::{NetworkRecord, ServiceRecord};
use crate::domain::ports::ClusterSource;
use crate::utils::error::{RecomposeError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A fixed cluster snapshot held in memory.
#[derive(Debug, Default)]
pub struct InMemoryCluster {
    services: Vec<ServiceRecord>,
    networks: Vec<NetworkRecord>,
    services_failure: Option<String>,
    networks_failure: Option<String>,
    network_list_calls: AtomicUsize,
}

impl InMemoryCluster {
    pub fn new(services: Vec<ServiceRecord>, networks: Vec<NetworkRecord>) -> Self {
        Self {
            services,
            networks,
            ..Default::default()
        }
    }

    /// Makes every service listing fail with `message`.
    pub fn failing_services(mut self, message: impl Into<String>) -> Self {
        self.services_failure = Some(message.into());
        self
    }

    /// Makes every network listing fail with `message`.
    pub fn failing_networks(mut self, message: impl Into<String>) -> Self {
        self.networks_failure = Some(message.into());
        self
    }

    pub fn network_list_calls(&self) -> usize {
        self.network_list_calls.load(Ordering::SeqCst)
    }
}

fn unavailable(endpoint: &str, message: &str) -> RecomposeError {
    RecomposeError::DockerApiError {
        status: 503,
        endpoint: endpoint.to_string(),
        message: message.to_string(),
    }
}

#[async_trait]
impl ClusterSource for InMemoryCluster {
    async fn list_services(&self) -> Result<Vec<ServiceRecord>> {
        match &self.services_failure {
            Some(message) => Err(unavailable("/services", message)),
            None => Ok(self.services.clone()),
        }
    }

    async fn list_networks(&self) -> Result<Vec<NetworkRecord>> {
        self.network_list_calls.fetch_add(1, Ordering::SeqCst);
        match &self.networks_failure {
            Some(message) => Err(unavailable("/networks", message)),
            None => Ok(self.networks.clone()),
        }
    }
}
