use chrono::{DateTime, Utc};
use fedhub_core::{ModuleMessage, RemoteCountMessage, RemoteMessage, RemoteRequest};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Remote {
    pub id: i64,
    pub name: String,
    pub storage_type: String,
    pub configuration: String,
    pub scope: String,
    pub url: String,
    pub active_version: Option<String>,
    pub repository: String,
    pub contact_name: String,
    pub contact_email: String,
    pub documentation_url: String,
    pub parent_remote_id: Option<i64>,
    pub modules: Vec<Module>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

/// A module exposed by a remote. Modules are owned by their remote and are
/// replaced wholesale whenever the remote is updated.
#[derive(Clone, Debug, Eq, PartialEq, sqlx::FromRow)]
pub struct Module {
    pub id: i64,
    pub remote_id: i64,
    pub name: String,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NewRemote {
    pub name: String,
    pub storage_type: String,
    pub configuration: String,
    pub scope: String,
    pub url: String,
    pub active_version: Option<String>,
    pub repository: String,
    pub contact_name: String,
    pub contact_email: String,
    pub documentation_url: String,
    pub parent_remote_id: Option<i64>,
    pub modules: Vec<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, sqlx::FromRow)]
pub struct RemoteCount {
    pub remote_id: i64,
    pub count: i64,
}

impl From<Module> for ModuleMessage {
    fn from(module: Module) -> Self {
        Self {
            id: module.id,
            name: module.name,
            created_date: module.created_date,
            updated_date: module.updated_date,
        }
    }
}

impl From<Remote> for RemoteMessage {
    fn from(remote: Remote) -> Self {
        Self {
            id: remote.id,
            name: remote.name,
            storage_type: remote.storage_type,
            configuration: remote.configuration,
            scope: remote.scope,
            url: remote.url,
            active_version: remote.active_version,
            repository: remote.repository,
            contact_name: remote.contact_name,
            contact_email: remote.contact_email,
            documentation_url: remote.documentation_url,
            parent_remote_id: remote.parent_remote_id,
            modules: remote.modules.into_iter().map(ModuleMessage::from).collect(),
            created_date: remote.created_date,
            updated_date: remote.updated_date,
        }
    }
}

impl From<RemoteRequest> for NewRemote {
    fn from(request: RemoteRequest) -> Self {
        Self {
            name: request.name,
            storage_type: request.storage_type,
            configuration: request.configuration,
            scope: request.scope,
            url: request.url,
            active_version: request.active_version,
            repository: request.repository,
            contact_name: request.contact_name,
            contact_email: request.contact_email,
            documentation_url: request.documentation_url,
            parent_remote_id: request.parent_remote_id,
            modules: request
                .modules
                .into_iter()
                .map(|module| module.name)
                .collect(),
        }
    }
}

impl From<RemoteCount> for RemoteCountMessage {
    fn from(count: RemoteCount) -> Self {
        Self {
            remote_id: count.remote_id,
            count: count.count,
        }
    }
}
