use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use fedhub_core::{TagMessage, TagRequest};

use super::extract::{EntityId, ValidJson};
use super::ApiResult;
use crate::models::NewTag;
use crate::services::AppServices;

pub async fn list(State(services): State<AppServices>) -> ApiResult<Json<Vec<TagMessage>>> {
    let tags = services.tags.list().await?;

    Ok(Json(tags.into_iter().map(TagMessage::from).collect()))
}

pub async fn get_by_id(
    State(services): State<AppServices>,
    EntityId(tag_id): EntityId,
) -> ApiResult<Json<TagMessage>> {
    Ok(Json(services.tags.get_by_id(tag_id).await?.into()))
}

pub async fn create(
    State(services): State<AppServices>,
    ValidJson(request): ValidJson<TagRequest>,
) -> ApiResult<impl IntoResponse> {
    let new_tag: NewTag = request.into();
    let tag = services.tags.create(&new_tag).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/tags/{}", tag.id))],
        Json(TagMessage::from(tag)),
    ))
}

pub async fn update(
    State(services): State<AppServices>,
    EntityId(tag_id): EntityId,
    ValidJson(request): ValidJson<TagRequest>,
) -> ApiResult<StatusCode> {
    services.tags.update(tag_id, &request.into()).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(services): State<AppServices>,
    EntityId(tag_id): EntityId,
) -> ApiResult<StatusCode> {
    services.tags.delete(tag_id).await?;

    Ok(StatusCode::OK)
}
