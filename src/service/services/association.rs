use chrono::Utc;
use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{AttachedRemote, Host, HostRemote, NewTag, Tag, TagRemote};
use crate::persistence::{
    AssociationPersistence, HostPersistence, LinkModel, Persistence, RemotePersistence,
};
use crate::settings::{AttachPolicy, EnvironmentMatch};

/// Outcome of an attach.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Attachment<Link> {
    Created(Link),
    /// The pair was already associated; nothing was written.
    AlreadyAttached(Link),
}

impl<Link> Attachment<Link> {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// The only write path for host/remote and remote/tag join rows.
pub struct AssociationService {
    pub hosts: Arc<dyn HostPersistence>,
    pub remotes: Arc<dyn RemotePersistence>,
    pub tags: Arc<dyn Persistence<Tag, NewTag>>,
    pub host_remotes: Arc<dyn AssociationPersistence<HostRemote>>,
    pub tags_remotes: Arc<dyn AssociationPersistence<TagRemote>>,
    pub attach_policy: AttachPolicy,
    pub environment_match: EnvironmentMatch,
}

impl AssociationService {
    async fn require_host(&self, host_id: i64) -> ServiceResult<Host> {
        self.hosts
            .get_by_id(host_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("host", host_id))
    }

    async fn require_remote_exists(&self, remote_id: i64) -> ServiceResult<()> {
        match self.remotes.get_by_id(remote_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("remote", remote_id)),
        }
    }

    async fn require_tag_exists(&self, tag_id: i64) -> ServiceResult<()> {
        match self.tags.get_by_id(tag_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("tag", tag_id)),
        }
    }

    /// Drops a freshly written link when `ends` reports that one side was
    /// deleted while the link was being inserted.
    async fn release_if_orphaned<Link: LinkModel>(
        &self,
        links: &dyn AssociationPersistence<Link>,
        owner_id: i64,
        member_id: i64,
        ends: ServiceResult<()>,
    ) -> ServiceResult<()> {
        if let Err(err) = ends {
            links.detach(owner_id, member_id).await?;
            tracing::warn!(owner_id, member_id, "dropped link to an entity deleted during attach");

            return Err(err);
        }

        Ok(())
    }

    async fn attach_link<Link: LinkModel>(
        &self,
        links: &dyn AssociationPersistence<Link>,
        owner_id: i64,
        member_id: i64,
        description: String,
    ) -> ServiceResult<Attachment<Link>> {
        // a `None` also covers a concurrent attach that won the unique constraint
        if let Some(link) = links.attach(owner_id, member_id, Utc::now()).await? {
            return Ok(Attachment::Created(link));
        }

        match self.attach_policy {
            AttachPolicy::Strict => Err(ServiceError::Conflict(format!(
                "{description} is already attached"
            ))),
            AttachPolicy::Idempotent => {
                let existing = links
                    .get(owner_id, member_id)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("{description} was detached during attach"))?;

                Ok(Attachment::AlreadyAttached(existing))
            }
        }
    }

    #[tracing::instrument(name = "service::association::attach_remote_to_host", skip(self))]
    pub async fn attach_remote_to_host(
        &self,
        host_id: i64,
        remote_id: i64,
    ) -> ServiceResult<Attachment<HostRemote>> {
        self.require_host(host_id).await?;
        self.require_remote_exists(remote_id).await?;

        let attachment = self
            .attach_link(
                &*self.host_remotes,
                host_id,
                remote_id,
                format!("remote {remote_id} on host {host_id}"),
            )
            .await?;

        if attachment.is_created() {
            let ends = match self.require_host(host_id).await {
                Ok(_) => self.require_remote_exists(remote_id).await,
                Err(err) => Err(err),
            };
            self.release_if_orphaned(&*self.host_remotes, host_id, remote_id, ends)
                .await?;

            tracing::info!(host_id, remote_id, "remote attached to host");
        }

        Ok(attachment)
    }

    /// Succeeds whether or not the pair was attached; returns whether a row
    /// was removed.
    #[tracing::instrument(name = "service::association::detach_remote_from_host", skip(self))]
    pub async fn detach_remote_from_host(
        &self,
        host_id: i64,
        remote_id: i64,
    ) -> ServiceResult<bool> {
        let removed = self.host_remotes.detach(host_id, remote_id).await?;

        Ok(removed > 0)
    }

    #[tracing::instrument(name = "service::association::list_remotes_for_host", skip(self))]
    pub async fn list_remotes_for_host(&self, host_id: i64) -> ServiceResult<Vec<AttachedRemote>> {
        self.require_host(host_id).await?;

        let links = self.host_remotes.list_by_owner(host_id).await?;
        let mut attached = Vec::with_capacity(links.len());

        for link in links {
            match self.remotes.get_by_id(link.remote_id).await? {
                Some(remote) => attached.push(AttachedRemote { link, remote }),
                None => tracing::warn!(
                    host_id,
                    remote_id = link.remote_id,
                    "skipping association to missing remote"
                ),
            }
        }

        Ok(attached)
    }

    #[tracing::instrument(name = "service::association::list_hosts_by_environment", skip(self))]
    pub async fn list_hosts_by_environment(&self, environment: &str) -> ServiceResult<Vec<Host>> {
        let hosts = self
            .hosts
            .list_by_environment(environment, self.environment_match)
            .await?;

        Ok(hosts)
    }

    #[tracing::instrument(name = "service::association::attach_tag_to_remote", skip(self))]
    pub async fn attach_tag_to_remote(
        &self,
        remote_id: i64,
        tag_id: i64,
    ) -> ServiceResult<Attachment<TagRemote>> {
        self.require_remote_exists(remote_id).await?;
        self.require_tag_exists(tag_id).await?;

        let attachment = self
            .attach_link(
                &*self.tags_remotes,
                remote_id,
                tag_id,
                format!("tag {tag_id} on remote {remote_id}"),
            )
            .await?;

        if attachment.is_created() {
            let ends = match self.require_remote_exists(remote_id).await {
                Ok(()) => self.require_tag_exists(tag_id).await,
                Err(err) => Err(err),
            };
            self.release_if_orphaned(&*self.tags_remotes, remote_id, tag_id, ends)
                .await?;
        }

        Ok(attachment)
    }

    #[tracing::instrument(name = "service::association::detach_tag_from_remote", skip(self))]
    pub async fn detach_tag_from_remote(&self, remote_id: i64, tag_id: i64) -> ServiceResult<bool> {
        let removed = self.tags_remotes.detach(remote_id, tag_id).await?;

        Ok(removed > 0)
    }

    #[tracing::instrument(name = "service::association::list_tags_for_remote", skip(self))]
    pub async fn list_tags_for_remote(&self, remote_id: i64) -> ServiceResult<Vec<Tag>> {
        self.require_remote_exists(remote_id).await?;

        let links = self.tags_remotes.list_by_owner(remote_id).await?;
        let mut tags = Vec::with_capacity(links.len());

        for link in links {
            if let Some(tag) = self.tags.get_by_id(link.tag_id).await? {
                tags.push(tag);
            }
        }

        Ok(tags)
    }

    pub async fn detach_all_from_host(&self, host_id: i64) -> ServiceResult<u64> {
        Ok(self.host_remotes.delete_by_owner(host_id).await?)
    }

    pub async fn detach_all_from_remote(&self, remote_id: i64) -> ServiceResult<u64> {
        let from_hosts = self.host_remotes.delete_by_member(remote_id).await?;
        let from_tags = self.tags_remotes.delete_by_owner(remote_id).await?;

        Ok(from_hosts + from_tags)
    }

    pub async fn detach_all_from_tag(&self, tag_id: i64) -> ServiceResult<u64> {
        Ok(self.tags_remotes.delete_by_member(tag_id).await?)
    }
}
