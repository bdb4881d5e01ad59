use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

use super::generic::MemoryTable;
use crate::{
    models::{Module, NewRemote, Remote, RemoteCount},
    persistence::{Persistence, RemotePersistence},
};

#[derive(Debug, Default)]
struct RemoteTables {
    remotes: MemoryTable<Remote>,
    next_module_id: i64,
}

impl RemoteTables {
    fn build_modules(
        &mut self,
        remote_id: i64,
        names: &[String],
        timestamp: DateTime<Utc>,
    ) -> Vec<Module> {
        names
            .iter()
            .map(|name| {
                self.next_module_id += 1;

                Module {
                    id: self.next_module_id,
                    remote_id,
                    name: name.clone(),
                    created_date: timestamp,
                    updated_date: timestamp,
                }
            })
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct RemoteMemoryPersistence {
    tables: Arc<Mutex<RemoteTables>>,
}

impl RemoteMemoryPersistence {
    fn get_tables_locked(&self) -> anyhow::Result<MutexGuard<RemoteTables>> {
        match self.tables.lock() {
            Ok(locked_tables) => Ok(locked_tables),
            Err(_) => Err(anyhow::anyhow!("failed to acquire lock")),
        }
    }
}

fn apply(
    remote: &mut Remote,
    new_remote: &NewRemote,
    modules: Vec<Module>,
    timestamp: DateTime<Utc>,
) {
    remote.name = new_remote.name.clone();
    remote.storage_type = new_remote.storage_type.clone();
    remote.configuration = new_remote.configuration.clone();
    remote.scope = new_remote.scope.clone();
    remote.url = new_remote.url.clone();
    remote.active_version = new_remote.active_version.clone();
    remote.repository = new_remote.repository.clone();
    remote.contact_name = new_remote.contact_name.clone();
    remote.contact_email = new_remote.contact_email.clone();
    remote.documentation_url = new_remote.documentation_url.clone();
    remote.parent_remote_id = new_remote.parent_remote_id;
    remote.modules = modules;
    remote.updated_date = timestamp;
}

#[async_trait]
impl Persistence<Remote, NewRemote> for RemoteMemoryPersistence {
    async fn create(
        &self,
        new_remote: &NewRemote,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Remote> {
        let mut locked_tables = self.get_tables_locked()?;

        let id = locked_tables.remotes.allocate_id();
        let modules = locked_tables.build_modules(id, &new_remote.modules, timestamp);

        let mut remote = Remote {
            id,
            name: String::new(),
            storage_type: String::new(),
            configuration: String::new(),
            scope: String::new(),
            url: String::new(),
            active_version: None,
            repository: String::new(),
            contact_name: String::new(),
            contact_email: String::new(),
            documentation_url: String::new(),
            parent_remote_id: None,
            modules: Vec::new(),
            created_date: timestamp,
            updated_date: timestamp,
        };
        apply(&mut remote, new_remote, modules, timestamp);

        locked_tables.remotes.models.insert(id, remote.clone());

        Ok(remote)
    }

    async fn update(
        &self,
        id: i64,
        new_remote: &NewRemote,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Option<Remote>> {
        let mut locked_tables = self.get_tables_locked()?;

        if !locked_tables.remotes.models.contains_key(&id) {
            return Ok(None);
        }

        let modules = locked_tables.build_modules(id, &new_remote.modules, timestamp);

        let remote = match locked_tables.remotes.models.get_mut(&id) {
            Some(remote) => remote,
            None => return Ok(None),
        };
        apply(remote, new_remote, modules, timestamp);

        Ok(Some(remote.clone()))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<u64> {
        let mut locked_tables = self.get_tables_locked()?;

        if locked_tables.remotes.models.remove(&id).is_none() {
            return Ok(0);
        }

        for remote in locked_tables.remotes.models.values_mut() {
            if remote.parent_remote_id == Some(id) {
                remote.parent_remote_id = None;
            }
        }

        Ok(1)
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Remote>> {
        let locked_tables = self.get_tables_locked()?;

        Ok(locked_tables.remotes.models.get(&id).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<Remote>> {
        let locked_tables = self.get_tables_locked()?;

        Ok(locked_tables.remotes.models.values().cloned().collect())
    }
}

#[async_trait]
impl RemotePersistence for RemoteMemoryPersistence {
    async fn module_counts(&self) -> anyhow::Result<Vec<RemoteCount>> {
        let locked_tables = self.get_tables_locked()?;

        let counts = locked_tables
            .remotes
            .models
            .values()
            .map(|remote| RemoteCount {
                remote_id: remote.id,
                count: remote.modules.len() as i64,
            })
            .collect();

        Ok(counts)
    }

    async fn sub_remote_counts(&self) -> anyhow::Result<Vec<RemoteCount>> {
        let locked_tables = self.get_tables_locked()?;
        let remotes = &locked_tables.remotes.models;

        let counts = remotes
            .keys()
            .map(|remote_id| RemoteCount {
                remote_id: *remote_id,
                count: remotes
                    .values()
                    .filter(|remote| remote.parent_remote_id == Some(*remote_id))
                    .count() as i64,
            })
            .collect();

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use fedhub_core::test::get_remote_fixture;

    use super::*;

    #[tokio::test]
    async fn test_create_update_replaces_modules() {
        let remote_persistence = RemoteMemoryPersistence::default();

        let created_remote = remote_persistence
            .create(&get_remote_fixture(None).into(), Utc::now())
            .await
            .unwrap();

        assert_eq!(created_remote.modules.len(), 2);
        assert!(created_remote
            .modules
            .iter()
            .all(|module| module.remote_id == created_remote.id));

        let mut new_remote: NewRemote = get_remote_fixture(None).into();
        new_remote.modules = vec!["./Summary".to_owned()];
        new_remote.active_version = None;

        let updated_remote = remote_persistence
            .update(created_remote.id, &new_remote, Utc::now())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated_remote.modules.len(), 1);
        assert_eq!(updated_remote.modules[0].name, "./Summary");
        assert_eq!(updated_remote.active_version, None);
        assert_eq!(updated_remote.created_date, created_remote.created_date);
    }

    #[tokio::test]
    async fn test_counts_and_sub_remote_orphaning() {
        let remote_persistence = RemoteMemoryPersistence::default();

        let parent = remote_persistence
            .create(&get_remote_fixture(Some("parent")).into(), Utc::now())
            .await
            .unwrap();

        let mut child: NewRemote = get_remote_fixture(Some("child")).into();
        child.parent_remote_id = Some(parent.id);
        child.modules = Vec::new();
        let child = remote_persistence.create(&child, Utc::now()).await.unwrap();

        let module_counts = remote_persistence.module_counts().await.unwrap();
        assert_eq!(
            module_counts,
            vec![
                RemoteCount { remote_id: parent.id, count: 2 },
                RemoteCount { remote_id: child.id, count: 0 },
            ]
        );

        let sub_remote_counts = remote_persistence.sub_remote_counts().await.unwrap();
        assert_eq!(sub_remote_counts[0], RemoteCount { remote_id: parent.id, count: 1 });

        remote_persistence.delete(parent.id).await.unwrap();

        let orphan = remote_persistence.get_by_id(child.id).await.unwrap().unwrap();
        assert_eq!(orphan.parent_remote_id, None);
    }
}
