use super::{FedhubClient, REMOTES, TAGS};
use crate::api::{ClientResult, QueryKey};
use crate::{TagMessage, TagRequest};

impl FedhubClient {
    #[tracing::instrument(name = "client::tag::list", skip_all)]
    pub async fn tags(&self) -> ClientResult<Vec<TagMessage>> {
        self.query(QueryKey::resource(TAGS), "api/tags").await
    }

    #[tracing::instrument(name = "client::tag::get", skip(self))]
    pub async fn tag(&self, id: i64) -> ClientResult<TagMessage> {
        self.query(QueryKey::resource(TAGS).id(id), &format!("api/tags/{id}"))
            .await
    }

    #[tracing::instrument(name = "client::tag::create", skip_all)]
    pub async fn create_tag(&self, tag: &TagRequest) -> ClientResult<TagMessage> {
        let url = self.url("api/tags")?;
        let response = self.mutate(self.http.post(url).json(tag), &[TAGS]).await?;

        Self::decode(response).await
    }

    // remote tag lists embed tag text
    #[tracing::instrument(name = "client::tag::update", skip(self, tag))]
    pub async fn update_tag(&self, id: i64, tag: &TagRequest) -> ClientResult<()> {
        let url = self.url(&format!("api/tags/{id}"))?;
        self.mutate(self.http.put(url).json(tag), &[TAGS, REMOTES])
            .await?;

        Ok(())
    }

    #[tracing::instrument(name = "client::tag::delete", skip(self))]
    pub async fn delete_tag(&self, id: i64) -> ClientResult<()> {
        let url = self.url(&format!("api/tags/{id}"))?;
        self.mutate(self.http.delete(url), &[TAGS, REMOTES]).await?;

        Ok(())
    }
}
