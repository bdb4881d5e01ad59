use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fedhub_core::HostTag;
use sqlx::{types::Json, PgPool};
use std::sync::Arc;

use crate::models::{Host, NewHost};
use crate::persistence::{HostPersistence, Persistence};
use crate::settings::EnvironmentMatch;

#[derive(Debug, sqlx::FromRow)]
struct HostRow {
    id: i64,
    name: String,
    description: String,
    url: String,
    key: String,
    environment: String,
    repository: String,
    contact_name: String,
    contact_email: String,
    documentation_url: String,
    tags: Json<Vec<HostTag>>,
    created_date: DateTime<Utc>,
    updated_date: DateTime<Utc>,
}

impl From<HostRow> for Host {
    fn from(row: HostRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            url: row.url,
            key: row.key,
            environment: row.environment,
            repository: row.repository,
            contact_name: row.contact_name,
            contact_email: row.contact_email,
            documentation_url: row.documentation_url,
            tags: row.tags.0,
            created_date: row.created_date,
            updated_date: row.updated_date,
        }
    }
}

#[derive(Debug)]
pub struct HostRelationalPersistence {
    pub db: Arc<PgPool>,
}

#[async_trait]
impl Persistence<Host, NewHost> for HostRelationalPersistence {
    #[tracing::instrument(name = "relational::host::create", skip_all)]
    async fn create(&self, new_host: &NewHost, timestamp: DateTime<Utc>) -> anyhow::Result<Host> {
        let row = sqlx::query_as::<_, HostRow>(
            r#"
            INSERT INTO hosts
               (name, description, url, "key", environment, repository,
                contact_name, contact_email, documentation_url, tags,
                created_date, updated_date)
            VALUES
               ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(&new_host.name)
        .bind(&new_host.description)
        .bind(&new_host.url)
        .bind(&new_host.key)
        .bind(&new_host.environment)
        .bind(&new_host.repository)
        .bind(&new_host.contact_name)
        .bind(&new_host.contact_email)
        .bind(&new_host.documentation_url)
        .bind(Json(&new_host.tags))
        .bind(timestamp)
        .fetch_one(&*self.db)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(name = "relational::host::update", skip_all)]
    async fn update(
        &self,
        id: i64,
        new_host: &NewHost,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Option<Host>> {
        let row = sqlx::query_as::<_, HostRow>(
            r#"
            UPDATE hosts SET
               name = $1,
               description = $2,
               url = $3,
               "key" = $4,
               environment = $5,
               repository = $6,
               contact_name = $7,
               contact_email = $8,
               documentation_url = $9,
               tags = $10,
               updated_date = $11
            WHERE id = $12
            RETURNING *
            "#,
        )
        .bind(&new_host.name)
        .bind(&new_host.description)
        .bind(&new_host.url)
        .bind(&new_host.key)
        .bind(&new_host.environment)
        .bind(&new_host.repository)
        .bind(&new_host.contact_name)
        .bind(&new_host.contact_email)
        .bind(&new_host.documentation_url)
        .bind(Json(&new_host.tags))
        .bind(timestamp)
        .bind(id)
        .fetch_optional(&*self.db)
        .await?;

        Ok(row.map(Host::from))
    }

    #[tracing::instrument(name = "relational::host::delete", skip_all)]
    async fn delete(&self, id: i64) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM hosts WHERE id = $1")
            .bind(id)
            .execute(&*self.db)
            .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(name = "relational::host::get_by_id", skip_all)]
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Host>> {
        let row = sqlx::query_as::<_, HostRow>("SELECT * FROM hosts WHERE id = $1")
            .bind(id)
            .fetch_optional(&*self.db)
            .await?;

        Ok(row.map(Host::from))
    }

    #[tracing::instrument(name = "relational::host::list", skip_all)]
    async fn list(&self) -> anyhow::Result<Vec<Host>> {
        let rows = sqlx::query_as::<_, HostRow>("SELECT * FROM hosts ORDER BY id")
            .fetch_all(&*self.db)
            .await?;

        Ok(rows.into_iter().map(Host::from).collect())
    }
}

#[async_trait]
impl HostPersistence for HostRelationalPersistence {
    #[tracing::instrument(name = "relational::host::list_by_environment", skip(self))]
    async fn list_by_environment(
        &self,
        environment: &str,
        matching: EnvironmentMatch,
    ) -> anyhow::Result<Vec<Host>> {
        let query = match matching {
            EnvironmentMatch::Exact => "SELECT * FROM hosts WHERE environment = $1 ORDER BY id",
            EnvironmentMatch::IgnoreCase => {
                "SELECT * FROM hosts WHERE lower(environment) = lower($1) ORDER BY id"
            }
        };

        let rows = sqlx::query_as::<_, HostRow>(query)
            .bind(environment)
            .fetch_all(&*self.db)
            .await?;

        Ok(rows.into_iter().map(Host::from).collect())
    }
}
