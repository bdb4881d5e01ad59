use super::{FedhubClient, HOSTS, REMOTES};
use crate::api::{ClientResult, QueryKey};
use crate::{AttachTagRequest, RemoteCountMessage, RemoteMessage, RemoteRequest, TagMessage};

impl FedhubClient {
    #[tracing::instrument(name = "client::remote::list", skip_all)]
    pub async fn remotes(&self) -> ClientResult<Vec<RemoteMessage>> {
        self.query(QueryKey::resource(REMOTES), "api/remotes").await
    }

    #[tracing::instrument(name = "client::remote::get", skip(self))]
    pub async fn remote(&self, id: i64) -> ClientResult<RemoteMessage> {
        self.query(
            QueryKey::resource(REMOTES).id(id),
            &format!("api/remotes/{id}"),
        )
        .await
    }

    #[tracing::instrument(name = "client::remote::module_counts", skip_all)]
    pub async fn remote_module_counts(&self) -> ClientResult<Vec<RemoteCountMessage>> {
        self.query(
            QueryKey::resource(REMOTES).name("module-counts"),
            "api/remotes/module-counts",
        )
        .await
    }

    #[tracing::instrument(name = "client::remote::sub_remote_counts", skip_all)]
    pub async fn remote_sub_remote_counts(&self) -> ClientResult<Vec<RemoteCountMessage>> {
        self.query(
            QueryKey::resource(REMOTES).name("sub-remote-counts"),
            "api/remotes/sub-remote-counts",
        )
        .await
    }

    #[tracing::instrument(name = "client::remote::tags", skip(self))]
    pub async fn remote_tags(&self, id: i64) -> ClientResult<Vec<TagMessage>> {
        self.query(
            QueryKey::resource(REMOTES).id(id).name("tags"),
            &format!("api/remotes/{id}/tags"),
        )
        .await
    }

    #[tracing::instrument(name = "client::remote::create", skip_all)]
    pub async fn create_remote(&self, remote: &RemoteRequest) -> ClientResult<RemoteMessage> {
        let url = self.url("api/remotes")?;
        let response = self
            .mutate(self.http.post(url).json(remote), &[REMOTES])
            .await?;

        Self::decode(response).await
    }

    /// Hosts embed the remotes attached to them, so host queries are
    /// invalidated along with the remote ones.
    #[tracing::instrument(name = "client::remote::update", skip(self, remote))]
    pub async fn update_remote(&self, id: i64, remote: &RemoteRequest) -> ClientResult<()> {
        let url = self.url(&format!("api/remotes/{id}"))?;
        self.mutate(self.http.put(url).json(remote), &[REMOTES, HOSTS])
            .await?;

        Ok(())
    }

    #[tracing::instrument(name = "client::remote::delete", skip(self))]
    pub async fn delete_remote(&self, id: i64) -> ClientResult<()> {
        let url = self.url(&format!("api/remotes/{id}"))?;
        self.mutate(self.http.delete(url), &[REMOTES, HOSTS]).await?;

        Ok(())
    }

    #[tracing::instrument(name = "client::remote::attach_tag", skip(self))]
    pub async fn attach_tag(&self, remote_id: i64, tag_id: i64) -> ClientResult<()> {
        let url = self.url(&format!("api/remotes/{remote_id}/tags/attach"))?;
        let body = AttachTagRequest { tag_id };
        self.mutate(self.http.post(url).json(&body), &[REMOTES])
            .await?;

        Ok(())
    }

    #[tracing::instrument(name = "client::remote::detach_tag", skip(self))]
    pub async fn detach_tag(&self, remote_id: i64, tag_id: i64) -> ClientResult<()> {
        let url = self.url(&format!("api/remotes/{remote_id}/tags/detach"))?;
        let body = AttachTagRequest { tag_id };
        self.mutate(self.http.post(url).json(&body), &[REMOTES])
            .await?;

        Ok(())
    }
}
