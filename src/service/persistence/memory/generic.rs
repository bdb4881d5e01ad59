use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{
    collections::BTreeMap,
    marker::PhantomData,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::persistence::{PersistableModel, Persistence};

#[derive(Debug)]
pub(crate) struct MemoryTable<Model> {
    pub(crate) models: BTreeMap<i64, Model>,
    next_id: i64,
}

impl<Model> MemoryTable<Model> {
    pub(crate) fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl<Model> Default for MemoryTable<Model> {
    fn default() -> Self {
        Self {
            models: BTreeMap::new(),
            next_id: 0,
        }
    }
}

#[derive(Debug)]
pub struct MemoryPersistence<Model, NewModel>
where
    Model: PersistableModel<NewModel>,
{
    table: Arc<Mutex<MemoryTable<Model>>>,

    _phantom: PhantomData<fn(&NewModel)>,
}

#[async_trait]
impl<Model, NewModel> Persistence<Model, NewModel> for MemoryPersistence<Model, NewModel>
where
    Model: PersistableModel<NewModel> + 'static,
    NewModel: Send + Sync + 'static,
{
    async fn create(
        &self,
        new_model: &NewModel,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Model> {
        let mut locked_table = self.get_table_locked()?;

        let id = locked_table.allocate_id();
        let model = Model::new(id, new_model, timestamp);

        locked_table.models.insert(id, model.clone());

        Ok(model)
    }

    async fn update(
        &self,
        id: i64,
        new_model: &NewModel,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Option<Model>> {
        let mut locked_table = self.get_table_locked()?;

        match locked_table.models.get_mut(&id) {
            Some(model) => {
                model.replace(new_model, timestamp);
                Ok(Some(model.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> anyhow::Result<u64> {
        let mut locked_table = self.get_table_locked()?;

        match locked_table.models.remove(&id) {
            Some(_) => Ok(1),
            None => Ok(0),
        }
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Model>> {
        let locked_table = self.get_table_locked()?;

        Ok(locked_table.models.get(&id).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<Model>> {
        let locked_table = self.get_table_locked()?;

        let models = locked_table.models.values().cloned().collect();

        Ok(models)
    }
}

impl<Model, NewModel> Default for MemoryPersistence<Model, NewModel>
where
    Model: PersistableModel<NewModel>,
{
    fn default() -> Self {
        Self {
            table: Arc::new(Mutex::new(MemoryTable::default())),

            _phantom: PhantomData,
        }
    }
}

impl<Model, NewModel> MemoryPersistence<Model, NewModel>
where
    Model: PersistableModel<NewModel>,
{
    pub(crate) fn get_table_locked(&self) -> anyhow::Result<MutexGuard<MemoryTable<Model>>> {
        match self.table.lock() {
            Ok(locked_table) => Ok(locked_table),
            Err(_) => Err(anyhow::anyhow!("failed to acquire lock")),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use fedhub_core::test::get_tag_fixture;

    use super::*;

    use crate::models::{NewTag, Tag};

    #[tokio::test]
    async fn test_create_get_delete() {
        let tag_persistence = MemoryPersistence::<Tag, NewTag>::default();
        let new_tag: NewTag = get_tag_fixture(None).into();

        let created_tag = tag_persistence.create(&new_tag, Utc::now()).await.unwrap();
        assert_eq!(created_tag.id, 1);
        assert_eq!(created_tag.created_date, created_tag.updated_date);

        let fetched_tag = tag_persistence
            .get_by_id(created_tag.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched_tag, created_tag);

        let deleted_tags = tag_persistence.delete(created_tag.id).await.unwrap();
        assert_eq!(deleted_tags, 1);

        let deleted_tags = tag_persistence.delete(created_tag.id).await.unwrap();
        assert_eq!(deleted_tags, 0);
    }

    #[tokio::test]
    async fn test_update_replaces_and_keeps_created_date() {
        let tag_persistence = MemoryPersistence::<Tag, NewTag>::default();
        let created_at = Utc::now();

        let created_tag = tag_persistence
            .create(&get_tag_fixture(Some("checkout")).into(), created_at)
            .await
            .unwrap();

        let updated_at = created_at + chrono::Duration::seconds(5);
        let updated_tag = tag_persistence
            .update(created_tag.id, &get_tag_fixture(Some("payments")).into(), updated_at)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated_tag.text, "payments");
        assert_eq!(updated_tag.created_date, created_at);
        assert_eq!(updated_tag.updated_date, updated_at);

        let missing = tag_persistence
            .update(42, &get_tag_fixture(None).into(), updated_at)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let tag_persistence = MemoryPersistence::<Tag, NewTag>::default();
        let new_tag: NewTag = get_tag_fixture(None).into();

        let first = tag_persistence.create(&new_tag, Utc::now()).await.unwrap();
        tag_persistence.delete(first.id).await.unwrap();
        let second = tag_persistence.create(&new_tag, Utc::now()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(tag_persistence.list().await.unwrap().len(), 1);
    }
}
