use crate::core::naming::{has_stack_prefix, stack_prefix, strip_stack_prefix};
use crate::core::resolver::NetworkResolver;
use crate::core::ClusterSource;
use crate::domain::model::{
    ConfigDocument, DeployPolicy, MountSpec, PortMapping, ResolvedService, ServiceRecord,
};
use crate::utils::error::{RecomposeError, Result};

/// Counters collected while translating one stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationSummary {
    pub matched: usize,
    pub skipped: usize,
    pub networks_kept: usize,
    pub networks_dropped: usize,
}

/// Turns the live services of one stack into a compose document.
pub struct ServiceTranslator<'a, C: ClusterSource + ?Sized> {
    stack: &'a str,
    resolver: NetworkResolver<'a, C>,
    summary: TranslationSummary,
}

impl<'a, C: ClusterSource + ?Sized> ServiceTranslator<'a, C> {
    pub fn new(stack: &'a str, source: &'a C) -> Result<Self> {
        if stack.is_empty() {
            return Err(RecomposeError::MissingConfigError {
                field: "namespace".to_string(),
            });
        }

        Ok(Self {
            stack,
            resolver: NetworkResolver::new(source),
            summary: TranslationSummary::default(),
        })
    }

    pub fn summary(&self) -> TranslationSummary {
        self.summary
    }

    pub fn resolver(&self) -> &NetworkResolver<'a, C> {
        &self.resolver
    }

    pub async fn build_config_document(
        &mut self,
        services: &[ServiceRecord],
    ) -> Result<ConfigDocument> {
        let mut document = ConfigDocument::new();

        for service in services {
            if !self.belongs_to_stack(service) {
                self.summary.skipped += 1;
                continue;
            }

            let key = strip_stack_prefix(&service.name, self.stack).to_string();
            tracing::debug!("Translating service {} as {}", service.name, key);

            let resolved = self.translate_service(service).await?;
            if document.services.insert(key.clone(), resolved).is_some() {
                tracing::warn!("Service key {} produced twice, keeping the last one", key);
            }
            self.summary.matched += 1;
        }

        tracing::info!(
            "Stack {}: {} services matched, {} skipped, {} networks kept, {} dropped",
            self.stack,
            self.summary.matched,
            self.summary.skipped,
            self.summary.networks_kept,
            self.summary.networks_dropped
        );

        Ok(document)
    }

    fn belongs_to_stack(&self, service: &ServiceRecord) -> bool {
        service.stack_label.as_deref() == Some(self.stack)
    }

    async fn translate_service(&mut self, service: &ServiceRecord) -> Result<ResolvedService> {
        let command = if service.args.is_empty() {
            None
        } else {
            Some(service.args.join(" "))
        };

        Ok(ResolvedService {
            image: service.image.clone(),
            command,
            ports: service.ports.iter().map(format_port).collect(),
            networks: self.resolve_networks(&service.network_ids).await?,
            volumes: service
                .mounts
                .iter()
                .map(|mount| format_volume(mount, self.stack))
                .collect(),
            deploy: DeployPolicy::from(service.mode),
        })
    }

    async fn resolve_networks(&mut self, network_ids: &[String]) -> Result<Vec<String>> {
        let mut networks = Vec::with_capacity(network_ids.len());

        for id in network_ids {
            match self.resolver.resolve_network_name(id).await? {
                Some(name) if has_stack_prefix(&name, self.stack) => {
                    networks.push(strip_stack_prefix(&name, self.stack).to_string());
                    self.summary.networks_kept += 1;
                }
                Some(name) => {
                    tracing::debug!(
                        "Dropping network {} without prefix {}",
                        name,
                        stack_prefix(self.stack)
                    );
                    self.summary.networks_dropped += 1;
                }
                None => {
                    tracing::debug!("Dropping unresolved network {}", id);
                    self.summary.networks_dropped += 1;
                }
            }
        }

        Ok(networks)
    }
}

pub fn format_port(port: &PortMapping) -> String {
    format!("{}:{}", port.published, port.target)
}

pub fn format_volume(mount: &MountSpec, stack: &str) -> String {
    format!("{}:{}", strip_stack_prefix(&mount.source, stack), mount.target)
}

/// Builds the compose document for `stack` from a full service listing.
pub async fn build_config_document<C: ClusterSource + ?Sized>(
    stack: &str,
    services: &[ServiceRecord],
    source: &C,
) -> Result<ConfigDocument> {
    ServiceTranslator::new(stack, source)?
        .build_config_document(services)
        .await
}
