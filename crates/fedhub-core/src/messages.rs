use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// host messages

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct HostTag {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostRequest {
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

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostMessage {
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

/// Body of `POST /api/hosts/{id}/attach` and `POST /api/hosts/{id}/detach`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachRemoteRequest {
    pub remote_id: i64,
}

/// Body of `POST /api/hosts/assign`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRemoteRequest {
    pub host_id: i64,
    pub remote_id: i64,
}

/// A remote as seen through its attachment to a host.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostRemoteMessage {
    pub host_id: i64,
    pub remote_id: i64,
    pub remote: RemoteMessage,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

// remote messages

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRequest {
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleMessage {
    pub id: i64,
    pub name: String,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoteRequest {
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
    pub modules: Vec<ModuleRequest>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteMessage {
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
    pub modules: Vec<ModuleMessage>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

/// Per-remote count returned by the module and sub-remote count endpoints.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCountMessage {
    pub remote_id: i64,
    pub count: i64,
}

// tag messages

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TagRequest {
    pub text: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagMessage {
    pub id: i64,
    pub text: String,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachTagRequest {
    pub tag_id: i64,
}

// error messages

/// Uniform error body returned by every failing endpoint.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandledResponseModel {
    pub message: String,
    pub code: String,
}
