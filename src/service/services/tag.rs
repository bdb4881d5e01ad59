use chrono::Utc;
use std::sync::Arc;

use super::{require_text, AssociationService};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{NewTag, Tag};
use crate::persistence::Persistence;

pub struct TagService {
    pub persistence: Arc<dyn Persistence<Tag, NewTag>>,
    pub associations: Arc<AssociationService>,
}

impl TagService {
    #[tracing::instrument(name = "service::tag::create", skip_all)]
    pub async fn create(&self, new_tag: &NewTag) -> ServiceResult<Tag> {
        require_text("tag text", &new_tag.text)?;

        Ok(self.persistence.create(new_tag, Utc::now()).await?)
    }

    #[tracing::instrument(name = "service::tag::update", skip(self, new_tag))]
    pub async fn update(&self, tag_id: i64, new_tag: &NewTag) -> ServiceResult<Tag> {
        require_text("tag text", &new_tag.text)?;

        self.persistence
            .update(tag_id, new_tag, Utc::now())
            .await?
            .ok_or_else(|| ServiceError::not_found("tag", tag_id))
    }

    #[tracing::instrument(name = "service::tag::get_by_id", skip(self))]
    pub async fn get_by_id(&self, tag_id: i64) -> ServiceResult<Tag> {
        self.persistence
            .get_by_id(tag_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("tag", tag_id))
    }

    #[tracing::instrument(name = "service::tag::list", skip_all)]
    pub async fn list(&self) -> ServiceResult<Vec<Tag>> {
        Ok(self.persistence.list().await?)
    }

    #[tracing::instrument(name = "service::tag::delete", skip(self))]
    pub async fn delete(&self, tag_id: i64) -> ServiceResult<()> {
        if self.persistence.delete(tag_id).await? == 0 {
            return Err(ServiceError::not_found("tag", tag_id));
        }

        self.associations.detach_all_from_tag(tag_id).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fedhub_core::test::{get_remote_fixture, get_tag_fixture};

    use super::*;
    use crate::services::AppServices;
    use crate::settings::Settings;

    #[tokio::test]
    async fn test_create_update_delete() {
        let services = AppServices::memory(&Settings::default());

        let created = services
            .tags
            .create(&get_tag_fixture(Some("checkout")).into())
            .await
            .unwrap();

        let updated = services
            .tags
            .update(created.id, &get_tag_fixture(Some("payments")).into())
            .await
            .unwrap();
        assert_eq!(updated.text, "payments");

        let listed = services.tags.list().await.unwrap();
        assert_eq!(listed, vec![updated]);

        services.tags.delete(created.id).await.unwrap();
        assert!(services.tags.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected() {
        let services = AppServices::memory(&Settings::default());

        let result = services.tags.create(&get_tag_fixture(Some("")).into()).await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_detaches_from_remotes() {
        let services = AppServices::memory(&Settings::default());

        let remote = services
            .remotes
            .create(&get_remote_fixture(None).into())
            .await
            .unwrap();
        let tag = services
            .tags
            .create(&get_tag_fixture(None).into())
            .await
            .unwrap();

        services
            .associations
            .attach_tag_to_remote(remote.id, tag.id)
            .await
            .unwrap();

        services.tags.delete(tag.id).await.unwrap();

        let tags = services
            .associations
            .list_tags_for_remote(remote.id)
            .await
            .unwrap();
        assert!(tags.is_empty());
    }
}
