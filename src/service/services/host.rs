use chrono::Utc;
use std::sync::Arc;

use super::{require_text, AssociationService};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Host, NewHost};
use crate::persistence::HostPersistence;

pub struct HostService {
    pub persistence: Arc<dyn HostPersistence>,
    pub associations: Arc<AssociationService>,
}

impl HostService {
    fn validate(new_host: &NewHost) -> ServiceResult<()> {
        require_text("host name", &new_host.name)?;

        for tag in &new_host.tags {
            require_text("host tag key", &tag.key)?;
        }

        Ok(())
    }

    #[tracing::instrument(name = "service::host::create", skip_all)]
    pub async fn create(&self, new_host: &NewHost) -> ServiceResult<Host> {
        Self::validate(new_host)?;

        let host = self.persistence.create(new_host, Utc::now()).await?;

        tracing::info!(host_id = host.id, "host created");

        Ok(host)
    }

    #[tracing::instrument(name = "service::host::update", skip(self, new_host))]
    pub async fn update(&self, host_id: i64, new_host: &NewHost) -> ServiceResult<Host> {
        Self::validate(new_host)?;

        self.persistence
            .update(host_id, new_host, Utc::now())
            .await?
            .ok_or_else(|| ServiceError::not_found("host", host_id))
    }

    #[tracing::instrument(name = "service::host::get_by_id", skip(self))]
    pub async fn get_by_id(&self, host_id: i64) -> ServiceResult<Host> {
        self.persistence
            .get_by_id(host_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("host", host_id))
    }

    #[tracing::instrument(name = "service::host::list", skip_all)]
    pub async fn list(&self) -> ServiceResult<Vec<Host>> {
        Ok(self.persistence.list().await?)
    }

    /// Removes the host, then every remote link it still owns. An attach
    /// racing this sees the host gone and drops its own row.
    #[tracing::instrument(name = "service::host::delete", skip(self))]
    pub async fn delete(&self, host_id: i64) -> ServiceResult<()> {
        let deleted_count = self.persistence.delete(host_id).await?;
        if deleted_count == 0 {
            return Err(ServiceError::not_found("host", host_id));
        }

        self.associations.detach_all_from_host(host_id).await?;

        tracing::info!(host_id, "host deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fedhub_core::test::{get_host_fixture, get_remote_fixture};

    use super::*;
    use crate::services::AppServices;
    use crate::settings::Settings;

    #[tokio::test]
    async fn test_create_get_update_delete() {
        let services = AppServices::memory(&Settings::default());
        let host_service = &services.hosts;

        let new_host: NewHost = get_host_fixture(Some("h1")).into();
        let created = host_service.create(&new_host).await.unwrap();
        assert_eq!(created.name, "h1");
        assert_eq!(created.created_date, created.updated_date);

        let fetched = host_service.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);

        let mut replacement = new_host.clone();
        replacement.environment = "staging".to_owned();
        replacement.tags.clear();
        let updated = host_service.update(created.id, &replacement).await.unwrap();
        assert_eq!(updated.environment, "staging");
        assert!(updated.tags.is_empty());
        assert_eq!(updated.created_date, created.created_date);
        assert!(updated.updated_date >= created.updated_date);

        host_service.delete(created.id).await.unwrap();

        let fetched = host_service.get_by_id(created.id).await;
        assert!(matches!(fetched, Err(ServiceError::NotFound { .. })));

        let deleted_again = host_service.delete(created.id).await;
        assert!(matches!(deleted_again, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let services = AppServices::memory(&Settings::default());

        let mut new_host: NewHost = get_host_fixture(None).into();
        new_host.name = "   ".to_owned();

        let result = services.hosts.create(&new_host).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));

        assert!(services.hosts.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_host() {
        let services = AppServices::memory(&Settings::default());

        let result = services
            .hosts
            .update(7, &get_host_fixture(None).into())
            .await;

        assert!(matches!(result, Err(ServiceError::NotFound { id: 7, .. })));
    }

    #[tokio::test]
    async fn test_delete_removes_associations() {
        let services = AppServices::memory(&Settings::default());

        let host = services
            .hosts
            .create(&get_host_fixture(Some("h1")).into())
            .await
            .unwrap();
        let remote = services
            .remotes
            .create(&get_remote_fixture(Some("r1")).into())
            .await
            .unwrap();

        services
            .associations
            .attach_remote_to_host(host.id, remote.id)
            .await
            .unwrap();

        services.hosts.delete(host.id).await.unwrap();

        let remaining = services.associations.host_remotes.list_by_owner(host.id).await.unwrap();
        assert!(remaining.is_empty());

        let listed = services.associations.list_remotes_for_host(host.id).await;
        assert!(matches!(listed, Err(ServiceError::NotFound { .. })));

        // the remote itself survives
        assert!(services.remotes.get_by_id(remote.id).await.is_ok());
    }
}
