use chrono::{DateTime, Utc};
use fedhub_core::{TagMessage, TagRequest};

use crate::persistence::PersistableModel;

#[derive(Clone, Debug, Eq, PartialEq, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub text: String,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NewTag {
    pub text: String,
}

impl PersistableModel<NewTag> for Tag {
    fn new(id: i64, new_tag: &NewTag, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            text: new_tag.text.clone(),
            created_date: timestamp,
            updated_date: timestamp,
        }
    }

    fn replace(&mut self, new_tag: &NewTag, timestamp: DateTime<Utc>) {
        self.text = new_tag.text.clone();
        self.updated_date = timestamp;
    }
}

impl From<Tag> for TagMessage {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            text: tag.text,
            created_date: tag.created_date,
            updated_date: tag.updated_date,
        }
    }
}

impl From<TagRequest> for NewTag {
    fn from(request: TagRequest) -> Self {
        Self { text: request.text }
    }
}
