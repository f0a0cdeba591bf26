use crate::core::translator::ServiceTranslator;
use crate::core::{
    ClusterSource, ConfigDocument, ConfigProvider, LoadOutcome, Pipeline, ServiceRecord, Storage,
};
use crate::utils::error::Result;

/// Reads a stack out of the cluster and renders it as a compose document.
pub struct StackPipeline<C: ClusterSource, S: Storage, P: ConfigProvider> {
    source: C,
    storage: S,
    config: P,
}

impl<C: ClusterSource, S: Storage, P: ConfigProvider> StackPipeline<C, S, P> {
    pub fn new(source: C, storage: S, config: P) -> Self {
        Self {
            source,
            storage,
            config,
        }
    }

    pub fn source(&self) -> &C {
        &self.source
    }
}

#[async_trait::async_trait]
impl<C: ClusterSource, S: Storage, P: ConfigProvider> Pipeline for StackPipeline<C, S, P> {
    async fn extract(&self) -> Result<Vec<ServiceRecord>> {
        let services = self.source.list_services().await?;
        tracing::debug!("Cluster reported {} services", services.len());
        Ok(services)
    }

    async fn transform(&self, services: Vec<ServiceRecord>) -> Result<ConfigDocument> {
        // A fresh translator per run keeps the network cache scoped to it.
        let mut translator = ServiceTranslator::new(self.config.namespace(), &self.source)?;
        let document = translator.build_config_document(&services).await?;

        tracing::debug!(
            "Resolved networks with {} list calls, {} names cached",
            translator.resolver().lookups(),
            translator.resolver().cache().len()
        );
        Ok(document)
    }

    async fn load(&self, document: ConfigDocument) -> Result<LoadOutcome> {
        let format = self.config.output_format();
        let rendered = format.render(&document)?;
        tracing::debug!("Rendered {} bytes of {}", rendered.len(), format);

        match self.config.output_path() {
            Some(path) => {
                let path = self.storage.write_file(path, rendered.as_bytes()).await?;
                Ok(LoadOutcome::Written { path })
            }
            None => Ok(LoadOutcome::Rendered { document: rendered }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCluster;
    use crate::adapters::storage::LocalStorage;
    use crate::domain::model::{NetworkRecord, SchedulingMode};
    use crate::utils::format::OutputFormat;
    use tempfile::TempDir;

    struct TestConfig {
        namespace: String,
        output_path: Option<String>,
        format: OutputFormat,
    }

    impl ConfigProvider for TestConfig {
        fn namespace(&self) -> &str {
            &self.namespace
        }

        fn output_path(&self) -> Option<&str> {
            self.output_path.as_deref()
        }

        fn output_format(&self) -> OutputFormat {
            self.format
        }
    }

    fn cluster() -> InMemoryCluster {
        InMemoryCluster::new(
            vec![ServiceRecord {
                name: "shop_web".to_string(),
                image: "nginx:latest".to_string(),
                stack_label: Some("shop".to_string()),
                mode: SchedulingMode::Replicated { replicas: 2 },
                network_ids: vec!["n1".to_string()],
                ..Default::default()
            }],
            vec![NetworkRecord {
                id: "n1".to_string(),
                name: "shop_default".to_string(),
            }],
        )
    }

    #[tokio::test]
    async fn test_pipeline_renders_to_stdout_without_output_path() {
        let temp_dir = TempDir::new().unwrap();
        let config = TestConfig {
            namespace: "shop".to_string(),
            output_path: None,
            format: OutputFormat::Yaml,
        };
        let pipeline = StackPipeline::new(cluster(), LocalStorage::new(temp_dir.path()), config);

        let services = pipeline.extract().await.unwrap();
        let document = pipeline.transform(services).await.unwrap();
        let outcome = pipeline.load(document).await.unwrap();

        match outcome {
            LoadOutcome::Rendered { document } => {
                assert!(document.contains("web:"));
                assert!(document.contains("- default"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_pipeline_writes_output_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = TestConfig {
            namespace: "shop".to_string(),
            output_path: Some("docker-compose.json".to_string()),
            format: OutputFormat::Json,
        };
        let pipeline = StackPipeline::new(cluster(), LocalStorage::new(temp_dir.path()), config);

        let services = pipeline.extract().await.unwrap();
        let document = pipeline.transform(services).await.unwrap();
        let outcome = pipeline.load(document).await.unwrap();

        let expected = temp_dir.path().join("docker-compose.json");
        assert_eq!(
            outcome,
            LoadOutcome::Written {
                path: expected.display().to_string()
            }
        );
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(expected).unwrap()).unwrap();
        assert_eq!(written["services"]["web"]["networks"][0], "default");
    }

    #[tokio::test]
    async fn test_each_transform_starts_with_empty_cache() {
        let config = TestConfig {
            namespace: "shop".to_string(),
            output_path: None,
            format: OutputFormat::Yaml,
        };
        let pipeline = StackPipeline::new(cluster(), LocalStorage::current_dir(), config);

        let services = pipeline.extract().await.unwrap();
        pipeline.transform(services.clone()).await.unwrap();
        pipeline.transform(services).await.unwrap();

        assert_eq!(pipeline.source().network_list_calls(), 2);
    }
}
