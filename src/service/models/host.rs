use chrono::{DateTime, Utc};
use fedhub_core::{HostMessage, HostRequest, HostTag};

use crate::persistence::PersistableModel;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Host {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub url: String,
    pub key: String,
    pub environment: String,
    pub repository: String,
    pub contact_name: String,
    pub contact_email: String,
    pub documentation_url: String,
    pub tags: Vec<HostTag>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

/// Writable fields of a host; used for both creation and full replace.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NewHost {
    pub name: String,
    pub description: String,
    pub url: String,
    pub key: String,
    pub environment: String,
    pub repository: String,
    pub contact_name: String,
    pub contact_email: String,
    pub documentation_url: String,
    pub tags: Vec<HostTag>,
}

impl PersistableModel<NewHost> for Host {
    fn new(id: i64, new_host: &NewHost, timestamp: DateTime<Utc>) -> Self {
        let mut host = Self {
            id,
            name: String::new(),
            description: String::new(),
            url: String::new(),
            key: String::new(),
            environment: String::new(),
            repository: String::new(),
            contact_name: String::new(),
            contact_email: String::new(),
            documentation_url: String::new(),
            tags: Vec::new(),
            created_date: timestamp,
            updated_date: timestamp,
        };

        host.replace(new_host, timestamp);

        host
    }

    fn replace(&mut self, new_host: &NewHost, timestamp: DateTime<Utc>) {
        self.name = new_host.name.clone();
        self.description = new_host.description.clone();
        self.url = new_host.url.clone();
        self.key = new_host.key.clone();
        self.environment = new_host.environment.clone();
        self.repository = new_host.repository.clone();
        self.contact_name = new_host.contact_name.clone();
        self.contact_email = new_host.contact_email.clone();
        self.documentation_url = new_host.documentation_url.clone();
        self.tags = new_host.tags.clone();
        self.updated_date = timestamp;
    }
}

impl From<Host> for HostMessage {
    fn from(host: Host) -> Self {
        Self {
            id: host.id,
            name: host.name,
            description: host.description,
            url: host.url,
            key: host.key,
            environment: host.environment,
            repository: host.repository,
            contact_name: host.contact_name,
            contact_email: host.contact_email,
            documentation_url: host.documentation_url,
            tags: host.tags,
            created_date: host.created_date,
            updated_date: host.updated_date,
        }
    }
}

impl From<HostRequest> for NewHost {
    fn from(request: HostRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            url: request.url,
            key: request.key,
            environment: request.environment,
            repository: request.repository,
            contact_name: request.contact_name,
            contact_email: request.contact_email,
            documentation_url: request.documentation_url,
            tags: request.tags,
        }
    }
}
