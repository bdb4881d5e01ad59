use chrono::{DateTime, Utc};

use crate::persistence::LinkModel;

#[derive(Clone, Debug, Eq, PartialEq, sqlx::FromRow)]
pub struct TagRemote {
    pub id: i64,
    pub remote_id: i64,
    pub tag_id: i64,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl LinkModel for TagRemote {
    const TABLE: &'static str = "tags_remotes";
    const OWNER_COLUMN: &'static str = "remote_id";
    const MEMBER_COLUMN: &'static str = "tag_id";

    fn new(id: i64, remote_id: i64, tag_id: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            remote_id,
            tag_id,
            created_date: timestamp,
            updated_date: timestamp,
        }
    }

    fn owner_id(&self) -> i64 {
        self.remote_id
    }

    fn member_id(&self) -> i64 {
        self.tag_id
    }
}
