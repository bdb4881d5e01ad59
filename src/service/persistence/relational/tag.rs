use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::models::{NewTag, Tag};
use crate::persistence::Persistence;

#[derive(Debug)]
pub struct TagRelationalPersistence {
    pub db: Arc<PgPool>,
}

#[async_trait]
impl Persistence<Tag, NewTag> for TagRelationalPersistence {
    #[tracing::instrument(name = "relational::tag::create", skip_all)]
    async fn create(&self, new_tag: &NewTag, timestamp: DateTime<Utc>) -> anyhow::Result<Tag> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags
               (text, created_date, updated_date)
            VALUES
               ($1, $2, $2)
            RETURNING *
            "#,
        )
        .bind(&new_tag.text)
        .bind(timestamp)
        .fetch_one(&*self.db)
        .await?;

        Ok(tag)
    }

    #[tracing::instrument(name = "relational::tag::update", skip_all)]
    async fn update(
        &self,
        id: i64,
        new_tag: &NewTag,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags SET
               text = $1,
               updated_date = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(&new_tag.text)
        .bind(timestamp)
        .bind(id)
        .fetch_optional(&*self.db)
        .await?;

        Ok(tag)
    }

    #[tracing::instrument(name = "relational::tag::delete", skip_all)]
    async fn delete(&self, id: i64) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&*self.db)
            .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(name = "relational::tag::get_by_id", skip_all)]
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&*self.db)
            .await?;

        Ok(tag)
    }

    #[tracing::instrument(name = "relational::tag::list", skip_all)]
    async fn list(&self) -> anyhow::Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>("SELECT * FROM tags ORDER BY id")
            .fetch_all(&*self.db)
            .await?;

        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use fedhub_core::test::get_tag_fixture;

    use super::*;
    use crate::persistence::relational::tests::connect;

    #[tokio::test]
    async fn test_create_update_delete() {
        let Some(db) = connect().await else {
            return;
        };

        let tag_persistence = TagRelationalPersistence { db };
        let new_tag: NewTag = get_tag_fixture(Some("relational-tag")).into();

        let created = tag_persistence.create(&new_tag, Utc::now()).await.unwrap();
        assert_eq!(created.text, "relational-tag");

        let renamed = NewTag {
            text: "relational-tag-renamed".to_owned(),
        };
        let updated = tag_persistence
            .update(created.id, &renamed, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.text, "relational-tag-renamed");
        assert_eq!(updated.created_date, created.created_date);

        let deleted = tag_persistence.delete(created.id).await.unwrap();
        assert_eq!(deleted, 1);

        let fetched = tag_persistence.get_by_id(created.id).await.unwrap();
        assert!(fetched.is_none());

        let missing = tag_persistence
            .update(created.id, &renamed, Utc::now())
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
