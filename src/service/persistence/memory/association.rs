use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

use super::generic::MemoryTable;
use crate::persistence::{AssociationPersistence, LinkModel};

/// Join table kept in memory. Uniqueness of (owner, member) is checked under
/// the same lock as the insert.
#[derive(Debug)]
pub struct AssociationMemoryPersistence<Link: LinkModel> {
    links: Arc<Mutex<MemoryTable<Link>>>,
}

impl<Link: LinkModel> Default for AssociationMemoryPersistence<Link> {
    fn default() -> Self {
        Self {
            links: Arc::new(Mutex::new(MemoryTable::default())),
        }
    }
}

impl<Link: LinkModel> AssociationMemoryPersistence<Link> {
    fn get_links_locked(&self) -> anyhow::Result<MutexGuard<MemoryTable<Link>>> {
        match self.links.lock() {
            Ok(locked_links) => Ok(locked_links),
            Err(_) => Err(anyhow::anyhow!("failed to acquire lock")),
        }
    }

    fn remove_where<F>(&self, predicate: F) -> anyhow::Result<u64>
    where
        F: Fn(&Link) -> bool,
    {
        let mut locked_links = self.get_links_locked()?;

        let starting_len = locked_links.models.len();
        locked_links.models.retain(|_, link| !predicate(link));

        Ok((starting_len - locked_links.models.len()) as u64)
    }
}

#[async_trait]
impl<Link> AssociationPersistence<Link> for AssociationMemoryPersistence<Link>
where
    Link: LinkModel + 'static,
{
    async fn attach(
        &self,
        owner_id: i64,
        member_id: i64,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Option<Link>> {
        let mut locked_links = self.get_links_locked()?;

        let exists = locked_links
            .models
            .values()
            .any(|link| link.owner_id() == owner_id && link.member_id() == member_id);

        if exists {
            return Ok(None);
        }

        let id = locked_links.allocate_id();
        let link = Link::new(id, owner_id, member_id, timestamp);

        locked_links.models.insert(id, link.clone());

        Ok(Some(link))
    }

    async fn detach(&self, owner_id: i64, member_id: i64) -> anyhow::Result<u64> {
        self.remove_where(|link| link.owner_id() == owner_id && link.member_id() == member_id)
    }

    async fn get(&self, owner_id: i64, member_id: i64) -> anyhow::Result<Option<Link>> {
        let locked_links = self.get_links_locked()?;

        let link = locked_links
            .models
            .values()
            .find(|link| link.owner_id() == owner_id && link.member_id() == member_id)
            .cloned();

        Ok(link)
    }

    async fn list_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Link>> {
        let locked_links = self.get_links_locked()?;

        let links = locked_links
            .models
            .values()
            .filter(|link| link.owner_id() == owner_id)
            .cloned()
            .collect();

        Ok(links)
    }

    async fn delete_by_owner(&self, owner_id: i64) -> anyhow::Result<u64> {
        self.remove_where(|link| link.owner_id() == owner_id)
    }

    async fn delete_by_member(&self, member_id: i64) -> anyhow::Result<u64> {
        self.remove_where(|link| link.member_id() == member_id)
    }
}
