use sqlx::PgPool;
use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{HostRemote, NewTag, Tag, TagRemote};
use crate::persistence::memory::{
    AssociationMemoryPersistence, HostMemoryPersistence, MemoryPersistence,
    RemoteMemoryPersistence,
};
use crate::persistence::relational::{
    AssociationRelationalPersistence, HostRelationalPersistence, RemoteRelationalPersistence,
    TagRelationalPersistence,
};
use crate::persistence::{AssociationPersistence, HostPersistence, Persistence, RemotePersistence};
use crate::settings::Settings;

mod association;
mod host;
mod remote;
mod tag;

pub use association::{AssociationService, Attachment};
pub use host::HostService;
pub use remote::RemoteService;
pub use tag::TagService;

/// The set of services handed to the API, wired against one backend.
#[derive(Clone)]
pub struct AppServices {
    pub hosts: Arc<HostService>,
    pub remotes: Arc<RemoteService>,
    pub tags: Arc<TagService>,
    pub associations: Arc<AssociationService>,
}

impl AppServices {
    pub fn memory(settings: &Settings) -> Self {
        Self::assemble(
            Arc::new(HostMemoryPersistence::default()),
            Arc::new(RemoteMemoryPersistence::default()),
            Arc::new(MemoryPersistence::<Tag, NewTag>::default()),
            Arc::new(AssociationMemoryPersistence::<HostRemote>::default()),
            Arc::new(AssociationMemoryPersistence::<TagRemote>::default()),
            settings,
        )
    }

    pub fn relational(db: Arc<PgPool>, settings: &Settings) -> Self {
        Self::assemble(
            Arc::new(HostRelationalPersistence { db: Arc::clone(&db) }),
            Arc::new(RemoteRelationalPersistence { db: Arc::clone(&db) }),
            Arc::new(TagRelationalPersistence { db: Arc::clone(&db) }),
            Arc::new(AssociationRelationalPersistence::<HostRemote>::new(Arc::clone(&db))),
            Arc::new(AssociationRelationalPersistence::<TagRemote>::new(db)),
            settings,
        )
    }

    fn assemble(
        host_persistence: Arc<dyn HostPersistence>,
        remote_persistence: Arc<dyn RemotePersistence>,
        tag_persistence: Arc<dyn Persistence<Tag, NewTag>>,
        host_remotes: Arc<dyn AssociationPersistence<HostRemote>>,
        tags_remotes: Arc<dyn AssociationPersistence<TagRemote>>,
        settings: &Settings,
    ) -> Self {
        let associations = Arc::new(AssociationService {
            hosts: Arc::clone(&host_persistence),
            remotes: Arc::clone(&remote_persistence),
            tags: Arc::clone(&tag_persistence),
            host_remotes,
            tags_remotes,
            attach_policy: settings.attach_policy,
            environment_match: settings.environment_match,
        });

        Self {
            hosts: Arc::new(HostService {
                persistence: host_persistence,
                associations: Arc::clone(&associations),
            }),
            remotes: Arc::new(RemoteService {
                persistence: remote_persistence,
                associations: Arc::clone(&associations),
            }),
            tags: Arc::new(TagService {
                persistence: tag_persistence,
                associations: Arc::clone(&associations),
            }),
            associations,
        }
    }
}

fn require_text(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(format!("{field} must not be empty")));
    }

    Ok(())
}
