use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use fedhub_core::{AttachTagRequest, RemoteCountMessage, RemoteMessage, RemoteRequest, TagMessage};

use super::extract::{require_positive, EntityId, ValidJson};
use super::ApiResult;
use crate::models::NewRemote;
use crate::services::AppServices;

pub async fn list(State(services): State<AppServices>) -> ApiResult<Json<Vec<RemoteMessage>>> {
    let remotes = services.remotes.list().await?;

    Ok(Json(remotes.into_iter().map(RemoteMessage::from).collect()))
}

pub async fn get_by_id(
    State(services): State<AppServices>,
    EntityId(remote_id): EntityId,
) -> ApiResult<Json<RemoteMessage>> {
    let remote = services.remotes.get_by_id(remote_id).await?;

    Ok(Json(remote.into()))
}

pub async fn create(
    State(services): State<AppServices>,
    ValidJson(request): ValidJson<RemoteRequest>,
) -> ApiResult<impl IntoResponse> {
    let new_remote: NewRemote = request.into();
    let remote = services.remotes.create(&new_remote).await?;

    let location = format!("/api/remotes/{}", remote.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(RemoteMessage::from(remote)),
    ))
}

pub async fn update(
    State(services): State<AppServices>,
    EntityId(remote_id): EntityId,
    ValidJson(request): ValidJson<RemoteRequest>,
) -> ApiResult<StatusCode> {
    services.remotes.update(remote_id, &request.into()).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(services): State<AppServices>,
    EntityId(remote_id): EntityId,
) -> ApiResult<StatusCode> {
    services.remotes.delete(remote_id).await?;

    Ok(StatusCode::OK)
}

pub async fn module_counts(
    State(services): State<AppServices>,
) -> ApiResult<Json<Vec<RemoteCountMessage>>> {
    let counts = services.remotes.module_counts().await?;

    Ok(Json(counts.into_iter().map(RemoteCountMessage::from).collect()))
}

pub async fn sub_remote_counts(
    State(services): State<AppServices>,
) -> ApiResult<Json<Vec<RemoteCountMessage>>> {
    let counts = services.remotes.sub_remote_counts().await?;

    Ok(Json(counts.into_iter().map(RemoteCountMessage::from).collect()))
}

pub async fn list_tags(
    State(services): State<AppServices>,
    EntityId(remote_id): EntityId,
) -> ApiResult<Json<Vec<TagMessage>>> {
    let tags = services.associations.list_tags_for_remote(remote_id).await?;

    Ok(Json(tags.into_iter().map(TagMessage::from).collect()))
}

pub async fn attach_tag(
    State(services): State<AppServices>,
    EntityId(remote_id): EntityId,
    ValidJson(request): ValidJson<AttachTagRequest>,
) -> ApiResult<StatusCode> {
    let tag_id = require_positive("tagId", request.tag_id)?;

    services
        .associations
        .attach_tag_to_remote(remote_id, tag_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn detach_tag(
    State(services): State<AppServices>,
    EntityId(remote_id): EntityId,
    ValidJson(request): ValidJson<AttachTagRequest>,
) -> ApiResult<StatusCode> {
    let tag_id = require_positive("tagId", request.tag_id)?;

    services
        .associations
        .detach_tag_from_remote(remote_id, tag_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
