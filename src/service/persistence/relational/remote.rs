use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{Module, NewRemote, Remote, RemoteCount};
use crate::persistence::{Persistence, RemotePersistence};

#[derive(Debug, sqlx::FromRow)]
struct RemoteRow {
    id: i64,
    name: String,
    storage_type: String,
    configuration: String,
    scope: String,
    url: String,
    active_version: Option<String>,
    repository: String,
    contact_name: String,
    contact_email: String,
    documentation_url: String,
    parent_remote_id: Option<i64>,
    created_date: DateTime<Utc>,
    updated_date: DateTime<Utc>,
}

impl RemoteRow {
    fn into_remote(self, modules: Vec<Module>) -> Remote {
        Remote {
            id: self.id,
            name: self.name,
            storage_type: self.storage_type,
            configuration: self.configuration,
            scope: self.scope,
            url: self.url,
            active_version: self.active_version,
            repository: self.repository,
            contact_name: self.contact_name,
            contact_email: self.contact_email,
            documentation_url: self.documentation_url,
            parent_remote_id: self.parent_remote_id,
            modules,
            created_date: self.created_date,
            updated_date: self.updated_date,
        }
    }
}

#[derive(Debug)]
pub struct RemoteRelationalPersistence {
    pub db: Arc<PgPool>,
}

impl RemoteRelationalPersistence {
    async fn insert_modules(
        transaction: &mut Transaction<'_, Postgres>,
        remote_id: i64,
        names: &[String],
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Module>> {
        let mut modules = Vec::with_capacity(names.len());

        for name in names {
            let module = sqlx::query_as::<_, Module>(
                r#"
                INSERT INTO modules
                   (remote_id, name, created_date, updated_date)
                VALUES
                   ($1, $2, $3, $3)
                RETURNING *
                "#,
            )
            .bind(remote_id)
            .bind(name)
            .bind(timestamp)
            .fetch_one(&mut *transaction)
            .await?;

            modules.push(module);
        }

        Ok(modules)
    }

    async fn with_modules(&self, rows: Vec<RemoteRow>) -> anyhow::Result<Vec<Remote>> {
        let remote_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

        let modules = sqlx::query_as::<_, Module>(
            "SELECT * FROM modules WHERE remote_id = ANY($1) ORDER BY id",
        )
        .bind(&remote_ids)
        .fetch_all(&*self.db)
        .await?;

        let mut modules_by_remote: HashMap<i64, Vec<Module>> = HashMap::new();
        for module in modules {
            modules_by_remote
                .entry(module.remote_id)
                .or_default()
                .push(module);
        }

        let remotes = rows
            .into_iter()
            .map(|row| {
                let modules = modules_by_remote.remove(&row.id).unwrap_or_default();
                row.into_remote(modules)
            })
            .collect();

        Ok(remotes)
    }
}

#[async_trait]
impl Persistence<Remote, NewRemote> for RemoteRelationalPersistence {
    #[tracing::instrument(name = "relational::remote::create", skip_all)]
    async fn create(
        &self,
        new_remote: &NewRemote,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Remote> {
        let mut transaction = self.db.begin().await?;

        let row = sqlx::query_as::<_, RemoteRow>(
            r#"
            INSERT INTO remotes
               (name, storage_type, configuration, scope, url, active_version,
                repository, contact_name, contact_email, documentation_url,
                parent_remote_id, created_date, updated_date)
            VALUES
               ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            RETURNING *
            "#,
        )
        .bind(&new_remote.name)
        .bind(&new_remote.storage_type)
        .bind(&new_remote.configuration)
        .bind(&new_remote.scope)
        .bind(&new_remote.url)
        .bind(&new_remote.active_version)
        .bind(&new_remote.repository)
        .bind(&new_remote.contact_name)
        .bind(&new_remote.contact_email)
        .bind(&new_remote.documentation_url)
        .bind(new_remote.parent_remote_id)
        .bind(timestamp)
        .fetch_one(&mut transaction)
        .await?;

        let modules =
            Self::insert_modules(&mut transaction, row.id, &new_remote.modules, timestamp).await?;

        transaction.commit().await?;

        Ok(row.into_remote(modules))
    }

    #[tracing::instrument(name = "relational::remote::update", skip_all)]
    async fn update(
        &self,
        id: i64,
        new_remote: &NewRemote,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Option<Remote>> {
        let mut transaction = self.db.begin().await?;

        let row = sqlx::query_as::<_, RemoteRow>(
            r#"
            UPDATE remotes SET
               name = $1,
               storage_type = $2,
               configuration = $3,
               scope = $4,
               url = $5,
               active_version = $6,
               repository = $7,
               contact_name = $8,
               contact_email = $9,
               documentation_url = $10,
               parent_remote_id = $11,
               updated_date = $12
            WHERE id = $13
            RETURNING *
            "#,
        )
        .bind(&new_remote.name)
        .bind(&new_remote.storage_type)
        .bind(&new_remote.configuration)
        .bind(&new_remote.scope)
        .bind(&new_remote.url)
        .bind(&new_remote.active_version)
        .bind(&new_remote.repository)
        .bind(&new_remote.contact_name)
        .bind(&new_remote.contact_email)
        .bind(&new_remote.documentation_url)
        .bind(new_remote.parent_remote_id)
        .bind(timestamp)
        .bind(id)
        .fetch_optional(&mut transaction)
        .await?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        // modules are replaced wholesale
        sqlx::query("DELETE FROM modules WHERE remote_id = $1")
            .bind(id)
            .execute(&mut transaction)
            .await?;

        let modules =
            Self::insert_modules(&mut transaction, id, &new_remote.modules, timestamp).await?;

        transaction.commit().await?;

        Ok(Some(row.into_remote(modules)))
    }

    #[tracing::instrument(name = "relational::remote::delete", skip_all)]
    async fn delete(&self, id: i64) -> anyhow::Result<u64> {
        // modules cascade and sub-remotes have their parent cleared by the schema
        let result = sqlx::query("DELETE FROM remotes WHERE id = $1")
            .bind(id)
            .execute(&*self.db)
            .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(name = "relational::remote::get_by_id", skip_all)]
    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Remote>> {
        let row = sqlx::query_as::<_, RemoteRow>("SELECT * FROM remotes WHERE id = $1")
            .bind(id)
            .fetch_optional(&*self.db)
            .await?;

        match row {
            Some(row) => Ok(self.with_modules(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    #[tracing::instrument(name = "relational::remote::list", skip_all)]
    async fn list(&self) -> anyhow::Result<Vec<Remote>> {
        let rows = sqlx::query_as::<_, RemoteRow>("SELECT * FROM remotes ORDER BY id")
            .fetch_all(&*self.db)
            .await?;

        self.with_modules(rows).await
    }
}

#[async_trait]
impl RemotePersistence for RemoteRelationalPersistence {
    #[tracing::instrument(name = "relational::remote::module_counts", skip_all)]
    async fn module_counts(&self) -> anyhow::Result<Vec<RemoteCount>> {
        let counts = sqlx::query_as::<_, RemoteCount>(
            r#"
            SELECT r.id AS remote_id, COUNT(m.id) AS count
            FROM remotes r
            LEFT JOIN modules m ON m.remote_id = r.id
            GROUP BY r.id
            ORDER BY r.id
            "#,
        )
        .fetch_all(&*self.db)
        .await?;

        Ok(counts)
    }

    #[tracing::instrument(name = "relational::remote::sub_remote_counts", skip_all)]
    async fn sub_remote_counts(&self) -> anyhow::Result<Vec<RemoteCount>> {
        let counts = sqlx::query_as::<_, RemoteCount>(
            r#"
            SELECT r.id AS remote_id, COUNT(c.id) AS count
            FROM remotes r
            LEFT JOIN remotes c ON c.parent_remote_id = r.id
            GROUP BY r.id
            ORDER BY r.id
            "#,
        )
        .fetch_all(&*self.db)
        .await?;

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use fedhub_core::test::get_remote_fixture;

    use super::*;
    use crate::persistence::relational::tests::connect;

    #[tokio::test]
    async fn test_update_replaces_modules() {
        let Some(db) = connect().await else {
            return;
        };

        let remote_persistence = RemoteRelationalPersistence { db };
        let mut new_remote: NewRemote = get_remote_fixture(Some("relational-remote")).into();

        let created = remote_persistence
            .create(&new_remote, Utc::now())
            .await
            .unwrap();
        assert_eq!(created.modules.len(), 2);

        new_remote.modules = vec!["./Checkout".to_owned()];
        let updated = remote_persistence
            .update(created.id, &new_remote, Utc::now())
            .await
            .unwrap()
            .unwrap();

        let names: Vec<&str> = updated.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["./Checkout"]);

        let fetched = remote_persistence
            .get_by_id(created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.modules, updated.modules);

        let deleted = remote_persistence.delete(created.id).await.unwrap();
        assert_eq!(deleted, 1);
    }

    #[tokio::test]
    async fn test_counts_include_every_remote() {
        let Some(db) = connect().await else {
            return;
        };

        let remote_persistence = RemoteRelationalPersistence { db };

        let parent = remote_persistence
            .create(&get_remote_fixture(Some("relational-parent")).into(), Utc::now())
            .await
            .unwrap();

        let mut child: NewRemote = get_remote_fixture(Some("relational-child")).into();
        child.parent_remote_id = Some(parent.id);
        child.modules.clear();
        let child = remote_persistence.create(&child, Utc::now()).await.unwrap();

        let module_counts = remote_persistence.module_counts().await.unwrap();
        let count_for = |counts: &[RemoteCount], id: i64| {
            counts.iter().find(|count| count.remote_id == id).map(|count| count.count)
        };
        assert_eq!(count_for(&module_counts, parent.id), Some(2));
        assert_eq!(count_for(&module_counts, child.id), Some(0));

        let sub_remote_counts = remote_persistence.sub_remote_counts().await.unwrap();
        assert_eq!(count_for(&sub_remote_counts, parent.id), Some(1));
        assert_eq!(count_for(&sub_remote_counts, child.id), Some(0));

        remote_persistence.delete(parent.id).await.unwrap();

        let orphan = remote_persistence.get_by_id(child.id).await.unwrap().unwrap();
        assert_eq!(orphan.parent_remote_id, None);

        remote_persistence.delete(child.id).await.unwrap();
    }
}
