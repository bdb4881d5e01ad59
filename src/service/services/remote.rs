use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

use super::{require_text, AssociationService};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{NewRemote, Remote, RemoteCount};
use crate::persistence::RemotePersistence;

pub struct RemoteService {
    pub persistence: Arc<dyn RemotePersistence>,
    pub associations: Arc<AssociationService>,
}

impl RemoteService {
    /// Checks fields and the parent link. `remote_id` is `None` on create.
    async fn validate(&self, remote_id: Option<i64>, new_remote: &NewRemote) -> ServiceResult<()> {
        require_text("remote name", &new_remote.name)?;

        for module in &new_remote.modules {
            require_text("module name", module)?;
        }

        let mut parent_id = match new_remote.parent_remote_id {
            Some(parent_id) => parent_id,
            None => return Ok(()),
        };

        if Some(parent_id) == remote_id {
            return Err(ServiceError::validation("a remote cannot be its own parent"));
        }

        // walk up the chain so an update can't close a cycle
        let mut visited = HashSet::new();
        while visited.insert(parent_id) {
            let parent = self
                .persistence
                .get_by_id(parent_id)
                .await?
                .ok_or_else(|| {
                    ServiceError::validation(format!("parent remote {parent_id} does not exist"))
                })?;

            match parent.parent_remote_id {
                Some(next) if Some(next) == remote_id => {
                    return Err(ServiceError::validation(
                        "parent remote would create a cycle",
                    ))
                }
                Some(next) => parent_id = next,
                None => return Ok(()),
            }
        }

        Err(ServiceError::validation("parent remote chain contains a cycle"))
    }

    #[tracing::instrument(name = "service::remote::create", skip_all)]
    pub async fn create(&self, new_remote: &NewRemote) -> ServiceResult<Remote> {
        self.validate(None, new_remote).await?;

        let remote = self.persistence.create(new_remote, Utc::now()).await?;

        tracing::info!(remote_id = remote.id, "remote created");

        Ok(remote)
    }

    #[tracing::instrument(name = "service::remote::update", skip(self, new_remote))]
    pub async fn update(&self, remote_id: i64, new_remote: &NewRemote) -> ServiceResult<Remote> {
        self.get_by_id(remote_id).await?;
        self.validate(Some(remote_id), new_remote).await?;

        self.persistence
            .update(remote_id, new_remote, Utc::now())
            .await?
            .ok_or_else(|| ServiceError::not_found("remote", remote_id))
    }

    #[tracing::instrument(name = "service::remote::get_by_id", skip(self))]
    pub async fn get_by_id(&self, remote_id: i64) -> ServiceResult<Remote> {
        self.persistence
            .get_by_id(remote_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("remote", remote_id))
    }

    #[tracing::instrument(name = "service::remote::list", skip_all)]
    pub async fn list(&self) -> ServiceResult<Vec<Remote>> {
        Ok(self.persistence.list().await?)
    }

    /// Removes the remote, its host and tag associations, and its modules.
    /// Sub-remotes are kept and lose their parent.
    #[tracing::instrument(name = "service::remote::delete", skip(self))]
    pub async fn delete(&self, remote_id: i64) -> ServiceResult<()> {
        let deleted_count = self.persistence.delete(remote_id).await?;
        if deleted_count == 0 {
            return Err(ServiceError::not_found("remote", remote_id));
        }

        self.associations.detach_all_from_remote(remote_id).await?;

        tracing::info!(remote_id, "remote deleted");

        Ok(())
    }

    #[tracing::instrument(name = "service::remote::module_counts", skip_all)]
    pub async fn module_counts(&self) -> ServiceResult<Vec<RemoteCount>> {
        Ok(self.persistence.module_counts().await?)
    }

    #[tracing::instrument(name = "service::remote::sub_remote_counts", skip_all)]
    pub async fn sub_remote_counts(&self) -> ServiceResult<Vec<RemoteCount>> {
        Ok(self.persistence.sub_remote_counts().await?)
    }
}

#[cfg(test)]
mod tests {
    use fedhub_core::test::{get_host_fixture, get_remote_fixture, get_tag_fixture};

    use super::*;
    use crate::services::AppServices;
    use crate::settings::Settings;

    fn child_of(name: &str, parent_id: i64) -> NewRemote {
        let mut new_remote: NewRemote = get_remote_fixture(Some(name)).into();
        new_remote.parent_remote_id = Some(parent_id);
        new_remote.modules.clear();
        new_remote
    }

    #[tokio::test]
    async fn test_create_update_replaces_modules() {
        let services = AppServices::memory(&Settings::default());

        let mut new_remote: NewRemote = get_remote_fixture(Some("r1")).into();
        let created = services.remotes.create(&new_remote).await.unwrap();
        assert_eq!(created.modules.len(), 2);

        new_remote.modules = vec!["./Header".to_owned()];
        new_remote.active_version = None;
        let updated = services.remotes.update(created.id, &new_remote).await.unwrap();

        assert_eq!(updated.active_version, None);
        let names: Vec<&str> = updated.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["./Header"]);
    }

    #[tokio::test]
    async fn test_parent_validation() {
        let services = AppServices::memory(&Settings::default());

        let missing_parent = services.remotes.create(&child_of("orphan", 99)).await;
        assert!(matches!(missing_parent, Err(ServiceError::Validation(_))));

        let parent = services
            .remotes
            .create(&get_remote_fixture(Some("parent")).into())
            .await
            .unwrap();
        let child = services
            .remotes
            .create(&child_of("child", parent.id))
            .await
            .unwrap();
        assert_eq!(child.parent_remote_id, Some(parent.id));

        let own_parent = services
            .remotes
            .update(parent.id, &child_of("parent", parent.id))
            .await;
        assert!(matches!(own_parent, Err(ServiceError::Validation(_))));

        let cycle = services
            .remotes
            .update(parent.id, &child_of("parent", child.id))
            .await;
        assert!(matches!(cycle, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_counts() {
        let services = AppServices::memory(&Settings::default());

        let parent = services
            .remotes
            .create(&get_remote_fixture(Some("parent")).into())
            .await
            .unwrap();
        let child = services
            .remotes
            .create(&child_of("child", parent.id))
            .await
            .unwrap();

        let module_counts = services.remotes.module_counts().await.unwrap();
        assert_eq!(
            module_counts,
            vec![
                RemoteCount {
                    remote_id: parent.id,
                    count: 2
                },
                RemoteCount {
                    remote_id: child.id,
                    count: 0
                },
            ]
        );

        let sub_remote_counts = services.remotes.sub_remote_counts().await.unwrap();
        assert_eq!(
            sub_remote_counts,
            vec![
                RemoteCount {
                    remote_id: parent.id,
                    count: 1
                },
                RemoteCount {
                    remote_id: child.id,
                    count: 0
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let services = AppServices::memory(&Settings::default());

        let host = services
            .hosts
            .create(&get_host_fixture(Some("h1")).into())
            .await
            .unwrap();
        let parent = services
            .remotes
            .create(&get_remote_fixture(Some("parent")).into())
            .await
            .unwrap();
        let child = services
            .remotes
            .create(&child_of("child", parent.id))
            .await
            .unwrap();
        let tag = services
            .tags
            .create(&get_tag_fixture(None).into())
            .await
            .unwrap();

        services
            .associations
            .attach_remote_to_host(host.id, parent.id)
            .await
            .unwrap();
        services
            .associations
            .attach_tag_to_remote(parent.id, tag.id)
            .await
            .unwrap();

        services.remotes.delete(parent.id).await.unwrap();

        let attached = services
            .associations
            .list_remotes_for_host(host.id)
            .await
            .unwrap();
        assert!(attached.is_empty());

        let tag_links = services
            .associations
            .tags_remotes
            .list_by_owner(parent.id)
            .await
            .unwrap();
        assert!(tag_links.is_empty());

        let child = services.remotes.get_by_id(child.id).await.unwrap();
        assert_eq!(child.parent_remote_id, None);

        let deleted_again = services.remotes.delete(parent.id).await;
        assert!(matches!(deleted_again, Err(ServiceError::NotFound { .. })));
    }
}
