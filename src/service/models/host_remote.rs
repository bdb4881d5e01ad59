use chrono::{DateTime, Utc};
use fedhub_core::HostRemoteMessage;

use crate::models::Remote;
use crate::persistence::LinkModel;

/// Join row recording that a remote is available at a host.
#[derive(Clone, Debug, Eq, PartialEq, sqlx::FromRow)]
pub struct HostRemote {
    pub id: i64,
    pub host_id: i64,
    pub remote_id: i64,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl LinkModel for HostRemote {
    const TABLE: &'static str = "host_remotes";
    const OWNER_COLUMN: &'static str = "host_id";
    const MEMBER_COLUMN: &'static str = "remote_id";

    fn new(id: i64, host_id: i64, remote_id: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            host_id,
            remote_id,
            created_date: timestamp,
            updated_date: timestamp,
        }
    }

    fn owner_id(&self) -> i64 {
        self.host_id
    }

    fn member_id(&self) -> i64 {
        self.remote_id
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttachedRemote {
    pub link: HostRemote,
    pub remote: Remote,
}

impl From<AttachedRemote> for HostRemoteMessage {
    fn from(attached: AttachedRemote) -> Self {
        Self {
            host_id: attached.link.host_id,
            remote_id: attached.link.remote_id,
            remote: attached.remote.into(),
            created_date: attached.link.created_date,
            updated_date: attached.link.updated_date,
        }
    }
}
