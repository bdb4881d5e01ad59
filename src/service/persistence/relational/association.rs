use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, FromRow, PgPool};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::persistence::{AssociationPersistence, LinkModel};

/// Join table persistence shared by every [`LinkModel`]. Table and column
/// names come from the link's constants, never from caller input.
#[derive(Debug)]
pub struct AssociationRelationalPersistence<Link> {
    pub db: Arc<PgPool>,
    _link: PhantomData<fn() -> Link>,
}

impl<Link> AssociationRelationalPersistence<Link> {
    pub fn new(db: Arc<PgPool>) -> Self {
        Self {
            db,
            _link: PhantomData,
        }
    }
}

#[async_trait]
impl<Link> AssociationPersistence<Link> for AssociationRelationalPersistence<Link>
where
    Link: LinkModel + for<'r> FromRow<'r, PgRow> + Unpin + 'static,
{
    #[tracing::instrument(name = "relational::association::attach", skip(self, timestamp))]
    async fn attach(
        &self,
        owner_id: i64,
        member_id: i64,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Option<Link>> {
        let query = format!(
            r#"
            INSERT INTO {table}
               ({owner}, {member}, created_date, updated_date)
            VALUES
               ($1, $2, $3, $3)
            ON CONFLICT ({owner}, {member}) DO NOTHING
            RETURNING *
            "#,
            table = Link::TABLE,
            owner = Link::OWNER_COLUMN,
            member = Link::MEMBER_COLUMN,
        );

        let link = sqlx::query_as::<_, Link>(&query)
            .bind(owner_id)
            .bind(member_id)
            .bind(timestamp)
            .fetch_optional(&*self.db)
            .await?;

        Ok(link)
    }

    #[tracing::instrument(name = "relational::association::detach", skip(self))]
    async fn detach(&self, owner_id: i64, member_id: i64) -> anyhow::Result<u64> {
        let query = format!(
            "DELETE FROM {} WHERE {} = $1 AND {} = $2",
            Link::TABLE,
            Link::OWNER_COLUMN,
            Link::MEMBER_COLUMN
        );

        let result = sqlx::query(&query)
            .bind(owner_id)
            .bind(member_id)
            .execute(&*self.db)
            .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(name = "relational::association::get", skip(self))]
    async fn get(&self, owner_id: i64, member_id: i64) -> anyhow::Result<Option<Link>> {
        let query = format!(
            "SELECT * FROM {} WHERE {} = $1 AND {} = $2",
            Link::TABLE,
            Link::OWNER_COLUMN,
            Link::MEMBER_COLUMN
        );

        let link = sqlx::query_as::<_, Link>(&query)
            .bind(owner_id)
            .bind(member_id)
            .fetch_optional(&*self.db)
            .await?;

        Ok(link)
    }

    #[tracing::instrument(name = "relational::association::list_by_owner", skip(self))]
    async fn list_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Link>> {
        let query = format!(
            "SELECT * FROM {} WHERE {} = $1 ORDER BY id",
            Link::TABLE,
            Link::OWNER_COLUMN
        );

        let links = sqlx::query_as::<_, Link>(&query)
            .bind(owner_id)
            .fetch_all(&*self.db)
            .await?;

        Ok(links)
    }

    #[tracing::instrument(name = "relational::association::delete_by_owner", skip(self))]
    async fn delete_by_owner(&self, owner_id: i64) -> anyhow::Result<u64> {
        let query = format!("DELETE FROM {} WHERE {} = $1", Link::TABLE, Link::OWNER_COLUMN);

        let result = sqlx::query(&query)
            .bind(owner_id)
            .execute(&*self.db)
            .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(name = "relational::association::delete_by_member", skip(self))]
    async fn delete_by_member(&self, member_id: i64) -> anyhow::Result<u64> {
        let query = format!("DELETE FROM {} WHERE {} = $1", Link::TABLE, Link::MEMBER_COLUMN);

        let result = sqlx::query(&query)
            .bind(member_id)
            .execute(&*self.db)
            .await?;

        Ok(result.rows_affected())
    }
}
