use super::{FedhubClient, HOSTS};
use crate::api::{ClientResult, QueryKey};
use crate::{AssignRemoteRequest, AttachRemoteRequest, HostMessage, HostRemoteMessage, HostRequest};

impl FedhubClient {
    #[tracing::instrument(name = "client::host::list", skip_all)]
    pub async fn hosts(&self) -> ClientResult<Vec<HostMessage>> {
        self.query(QueryKey::resource(HOSTS), "api/hosts").await
    }

    #[tracing::instrument(name = "client::host::get", skip(self))]
    pub async fn host(&self, id: i64) -> ClientResult<HostMessage> {
        self.query(QueryKey::resource(HOSTS).id(id), &format!("api/hosts/{id}"))
            .await
    }

    #[tracing::instrument(name = "client::host::remotes", skip(self))]
    pub async fn host_remotes(&self, id: i64) -> ClientResult<Vec<HostRemoteMessage>> {
        self.query(
            QueryKey::resource(HOSTS).id(id).name("remotes"),
            &format!("api/hosts/{id}/remotes"),
        )
        .await
    }

    #[tracing::instrument(name = "client::host::by_environment", skip(self))]
    pub async fn hosts_by_environment(&self, environment: &str) -> ClientResult<Vec<HostMessage>> {
        let encoded = urlencoding::encode(environment);

        self.query(
            QueryKey::resource(HOSTS).name("environment").name(environment),
            &format!("api/hosts/environment/{encoded}"),
        )
        .await
    }

    #[tracing::instrument(name = "client::host::create", skip_all)]
    pub async fn create_host(&self, host: &HostRequest) -> ClientResult<HostMessage> {
        let url = self.url("api/hosts")?;
        let response = self.mutate(self.http.post(url).json(host), &[HOSTS]).await?;

        Self::decode(response).await
    }

    #[tracing::instrument(name = "client::host::update", skip(self, host))]
    pub async fn update_host(&self, id: i64, host: &HostRequest) -> ClientResult<()> {
        let url = self.url(&format!("api/hosts/{id}"))?;
        self.mutate(self.http.put(url).json(host), &[HOSTS]).await?;

        Ok(())
    }

    #[tracing::instrument(name = "client::host::delete", skip(self))]
    pub async fn delete_host(&self, id: i64) -> ClientResult<()> {
        let url = self.url(&format!("api/hosts/{id}"))?;
        self.mutate(self.http.delete(url), &[HOSTS]).await?;

        Ok(())
    }

    #[tracing::instrument(name = "client::host::attach", skip(self))]
    pub async fn attach_remote(&self, host_id: i64, remote_id: i64) -> ClientResult<()> {
        let url = self.url(&format!("api/hosts/{host_id}/attach"))?;
        let body = AttachRemoteRequest { remote_id };
        self.mutate(self.http.post(url).json(&body), &[HOSTS]).await?;

        Ok(())
    }

    #[tracing::instrument(name = "client::host::assign", skip(self))]
    pub async fn assign_remote(&self, host_id: i64, remote_id: i64) -> ClientResult<()> {
        let url = self.url("api/hosts/assign")?;
        let body = AssignRemoteRequest { host_id, remote_id };
        self.mutate(self.http.post(url).json(&body), &[HOSTS]).await?;

        Ok(())
    }

    #[tracing::instrument(name = "client::host::detach", skip(self))]
    pub async fn detach_remote(&self, host_id: i64, remote_id: i64) -> ClientResult<()> {
        let url = self.url(&format!("api/hosts/{host_id}/detach"))?;
        let body = AttachRemoteRequest { remote_id };
        self.mutate(self.http.post(url).json(&body), &[HOSTS]).await?;

        Ok(())
    }
}
