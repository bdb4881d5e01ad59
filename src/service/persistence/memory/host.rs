use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::MemoryPersistence;
use crate::{
    models::{Host, NewHost},
    persistence::{HostPersistence, Persistence},
    settings::EnvironmentMatch,
};

#[derive(Debug, Default)]
pub struct HostMemoryPersistence {
    hosts: MemoryPersistence<Host, NewHost>,
}

#[async_trait]
impl Persistence<Host, NewHost> for HostMemoryPersistence {
    async fn create(&self, new_host: &NewHost, timestamp: DateTime<Utc>) -> anyhow::Result<Host> {
        self.hosts.create(new_host, timestamp).await
    }

    async fn update(
        &self,
        id: i64,
        new_host: &NewHost,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Option<Host>> {
        self.hosts.update(id, new_host, timestamp).await
    }

    async fn delete(&self, id: i64) -> anyhow::Result<u64> {
        self.hosts.delete(id).await
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Host>> {
        self.hosts.get_by_id(id).await
    }

    async fn list(&self) -> anyhow::Result<Vec<Host>> {
        self.hosts.list().await
    }
}

#[async_trait]
impl HostPersistence for HostMemoryPersistence {
    async fn list_by_environment(
        &self,
        environment: &str,
        matching: EnvironmentMatch,
    ) -> anyhow::Result<Vec<Host>> {
        let locked_hosts = self.hosts.get_table_locked()?;

        let hosts_for_environment = locked_hosts
            .models
            .values()
            .filter(|host| matching.matches(&host.environment, environment))
            .cloned()
            .collect();

        Ok(hosts_for_environment)
    }
}
