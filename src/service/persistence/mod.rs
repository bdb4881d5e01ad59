use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Host, NewHost, NewRemote, Remote, RemoteCount};
use crate::settings::EnvironmentMatch;

pub mod memory;
pub mod relational;

/// Storage capability set injected into the services.
///
/// `update` is a full replace and yields `None` when the id does not exist.
/// `delete` reports the number of rows removed.
#[async_trait]
pub trait Persistence<Model, NewModel>: Send + Sync {
    async fn create(&self, new_model: &NewModel, timestamp: DateTime<Utc>)
        -> anyhow::Result<Model>;
    async fn update(
        &self,
        id: i64,
        new_model: &NewModel,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Option<Model>>;
    async fn delete(&self, id: i64) -> anyhow::Result<u64>;
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Model>>;
    async fn list(&self) -> anyhow::Result<Vec<Model>>;
}

pub trait PersistableModel<NewModel>: Clone + Send + Sync {
    fn new(id: i64, new_model: &NewModel, timestamp: DateTime<Utc>) -> Self;
    fn replace(&mut self, new_model: &NewModel, timestamp: DateTime<Utc>);
}

#[async_trait]
pub trait HostPersistence: Persistence<Host, NewHost> {
    async fn list_by_environment(
        &self,
        environment: &str,
        matching: EnvironmentMatch,
    ) -> anyhow::Result<Vec<Host>>;
}

/// Deleting a remote also removes its modules and detaches its sub-remotes
/// (their parent becomes `None`).
#[async_trait]
pub trait RemotePersistence: Persistence<Remote, NewRemote> {
    async fn module_counts(&self) -> anyhow::Result<Vec<RemoteCount>>;
    async fn sub_remote_counts(&self) -> anyhow::Result<Vec<RemoteCount>>;
}

/// A row of a many-to-many join table. The owner is the side the association
/// is listed from (the host for host/remote, the remote for remote/tag).
pub trait LinkModel: Clone + Send + Sync {
    const TABLE: &'static str;
    const OWNER_COLUMN: &'static str;
    const MEMBER_COLUMN: &'static str;

    fn new(id: i64, owner_id: i64, member_id: i64, timestamp: DateTime<Utc>) -> Self;
    fn owner_id(&self) -> i64;
    fn member_id(&self) -> i64;
}

#[async_trait]
pub trait AssociationPersistence<Link: LinkModel>: Send + Sync {
    /// Inserts the (owner, member) row. Returns `None` when the pair is
    /// already present, including when a concurrent insert won the race.
    async fn attach(
        &self,
        owner_id: i64,
        member_id: i64,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Option<Link>>;
    async fn detach(&self, owner_id: i64, member_id: i64) -> anyhow::Result<u64>;
    async fn get(&self, owner_id: i64, member_id: i64) -> anyhow::Result<Option<Link>>;
    async fn list_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Link>>;
    async fn delete_by_owner(&self, owner_id: i64) -> anyhow::Result<u64>;
    async fn delete_by_member(&self, member_id: i64) -> anyhow::Result<u64>;
}
