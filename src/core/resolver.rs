use crate::core::ClusterSource;
use crate::utils::error::Result;
use std::collections::{HashMap, HashSet};

/// Network id to name mappings learned during one run.
#[derive(Debug, Default)]
pub struct NetworkNameCache {
    names: HashMap<String, String>,
}

impl NetworkNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Records a mapping. An id that is already cached keeps its first name.
    pub fn insert(&mut self, id: &str, name: &str) -> &str {
        self.names
            .entry(id.to_string())
            .or_insert_with(|| name.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Resolves network ids to names through a cluster source.
///
/// The source only offers a bulk listing, so a miss fetches every network and
/// scans for the id. Hits are answered from the cache without touching the
/// source. Ids missing from a listing are remembered for the rest of the run
/// and answered with `None` without another fetch.
pub struct NetworkResolver<'a, C: ClusterSource + ?Sized> {
    source: &'a C,
    cache: NetworkNameCache,
    missing: HashSet<String>,
    lookups: usize,
}

impl<'a, C: ClusterSource + ?Sized> NetworkResolver<'a, C> {
    pub fn new(source: &'a C) -> Self {
        Self {
            source,
            cache: NetworkNameCache::new(),
            missing: HashSet::new(),
            lookups: 0,
        }
    }

    /// Returns `None` for empty or unknown ids. Source failures are propagated.
    pub async fn resolve_network_name(&mut self, id: &str) -> Result<Option<String>> {
        if id.is_empty() {
            return Ok(None);
        }

        if let Some(name) = self.cache.get(id) {
            tracing::trace!("Network {} resolved from cache as {}", id, name);
            return Ok(Some(name.to_string()));
        }

        if self.missing.contains(id) {
            return Ok(None);
        }

        self.lookups += 1;
        let networks = self.source.list_networks().await?;
        tracing::debug!("Fetched {} networks to resolve {}", networks.len(), id);

        match networks.iter().find(|network| network.id == id) {
            Some(network) => Ok(Some(self.cache.insert(id, &network.name).to_string())),
            None => {
                tracing::debug!("Network {} not found in cluster", id);
                self.missing.insert(id.to_string());
                Ok(None)
            }
        }
    }

    /// Number of times the source's network list was fetched.
    pub fn lookups(&self) -> usize {
        self.lookups
    }

    pub fn cache(&self) -> &NetworkNameCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCluster;
    use crate::domain::model::NetworkRecord;

    fn cluster() -> InMemoryCluster {
        InMemoryCluster::new(
            vec![],
            vec![
                NetworkRecord {
                    id: "n1".to_string(),
                    name: "shop_default".to_string(),
                },
                NetworkRecord {
                    id: "n2".to_string(),
                    name: "ingress".to_string(),
                },
            ],
        )
    }

    #[test]
    fn test_cache_never_overwrites() {
        let mut cache = NetworkNameCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.insert("n1", "shop_default"), "shop_default");
        assert_eq!(cache.insert("n1", "renamed"), "shop_default");
        assert_eq!(cache.get("n1"), Some("shop_default"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_known_network() {
        let cluster = cluster();
        let mut resolver = NetworkResolver::new(&cluster);

        let name = resolver.resolve_network_name("n1").await.unwrap();
        assert_eq!(name.as_deref(), Some("shop_default"));
        assert_eq!(resolver.cache().get("n1"), Some("shop_default"));
    }

    #[tokio::test]
    async fn test_repeated_lookup_hits_cache() {
        let cluster = cluster();
        let mut resolver = NetworkResolver::new(&cluster);

        for _ in 0..3 {
            resolver.resolve_network_name("n1").await.unwrap();
        }
        resolver.resolve_network_name("n2").await.unwrap();
        resolver.resolve_network_name("n2").await.unwrap();

        assert_eq!(cluster.network_list_calls(), 2);
        assert_eq!(resolver.lookups(), 2);
    }

    #[tokio::test]
    async fn test_unknown_network_is_absent() {
        let cluster = cluster();
        let mut resolver = NetworkResolver::new(&cluster);

        assert_eq!(resolver.resolve_network_name("missing").await.unwrap(), None);
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_network_is_fetched_once() {
        let cluster = cluster();
        let mut resolver = NetworkResolver::new(&cluster);

        for _ in 0..5 {
            assert_eq!(resolver.resolve_network_name("gone").await.unwrap(), None);
        }

        assert_eq!(cluster.network_list_calls(), 1);
        assert_eq!(resolver.lookups(), 1);
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn test_empty_id_skips_source() {
        let cluster = cluster();
        let mut resolver = NetworkResolver::new(&cluster);

        assert_eq!(resolver.resolve_network_name("").await.unwrap(), None);
        assert_eq!(cluster.network_list_calls(), 0);
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let cluster = cluster().failing_networks("daemon unreachable");
        let mut resolver = NetworkResolver::new(&cluster);

        assert!(resolver.resolve_network_name("n1").await.is_err());
    }
}
