use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use fedhub_core::{
    AssignRemoteRequest, AttachRemoteRequest, HostMessage, HostRemoteMessage, HostRequest,
};

use super::extract::{require_positive, EntityId, ValidJson};
use super::{ApiError, ApiResult};
use crate::models::NewHost;
use crate::services::AppServices;

pub async fn list(State(services): State<AppServices>) -> ApiResult<Json<Vec<HostMessage>>> {
    let hosts = services.hosts.list().await?;

    Ok(Json(hosts.into_iter().map(HostMessage::from).collect()))
}

pub async fn get_by_id(
    State(services): State<AppServices>,
    EntityId(host_id): EntityId,
) -> ApiResult<Json<HostMessage>> {
    let host = services.hosts.get_by_id(host_id).await?;

    Ok(Json(host.into()))
}

pub async fn create(
    State(services): State<AppServices>,
    ValidJson(request): ValidJson<HostRequest>,
) -> ApiResult<impl IntoResponse> {
    let new_host: NewHost = request.into();
    let host = services.hosts.create(&new_host).await?;

    let location = format!("/api/hosts/{}", host.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(HostMessage::from(host)),
    ))
}

pub async fn update(
    State(services): State<AppServices>,
    EntityId(host_id): EntityId,
    ValidJson(request): ValidJson<HostRequest>,
) -> ApiResult<StatusCode> {
    services.hosts.update(host_id, &request.into()).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(services): State<AppServices>,
    EntityId(host_id): EntityId,
) -> ApiResult<StatusCode> {
    services.hosts.delete(host_id).await?;

    Ok(StatusCode::OK)
}

pub async fn list_remotes(
    State(services): State<AppServices>,
    EntityId(host_id): EntityId,
) -> ApiResult<Json<Vec<HostRemoteMessage>>> {
    let attached = services.associations.list_remotes_for_host(host_id).await?;

    Ok(Json(
        attached.into_iter().map(HostRemoteMessage::from).collect(),
    ))
}

pub async fn list_by_environment(
    State(services): State<AppServices>,
    Path(environment): Path<String>,
) -> ApiResult<Json<Vec<HostMessage>>> {
    let hosts = services
        .associations
        .list_hosts_by_environment(&environment)
        .await?;

    Ok(Json(hosts.into_iter().map(HostMessage::from).collect()))
}

pub async fn attach(
    State(services): State<AppServices>,
    EntityId(host_id): EntityId,
    ValidJson(request): ValidJson<AttachRemoteRequest>,
) -> ApiResult<StatusCode> {
    let remote_id = require_positive("remoteId", request.remote_id)?;

    services
        .associations
        .attach_remote_to_host(host_id, remote_id)
        .await
        .map_err(ApiError::missing_as_bad_request)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn assign(
    State(services): State<AppServices>,
    ValidJson(request): ValidJson<AssignRemoteRequest>,
) -> ApiResult<StatusCode> {
    let host_id = require_positive("hostId", request.host_id)?;
    let remote_id = require_positive("remoteId", request.remote_id)?;

    services
        .associations
        .attach_remote_to_host(host_id, remote_id)
        .await
        .map_err(ApiError::missing_as_bad_request)?;

    Ok(StatusCode::OK)
}

pub async fn detach(
    State(services): State<AppServices>,
    EntityId(host_id): EntityId,
    ValidJson(request): ValidJson<AttachRemoteRequest>,
) -> ApiResult<StatusCode> {
    let remote_id = require_positive("remoteId", request.remote_id)?;

    services
        .associations
        .detach_remote_from_host(host_id, remote_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use fedhub_core::test::{get_host_fixture, get_remote_fixture};
    use fedhub_core::{HandledResponseModel, RemoteMessage};
    use hyper::Method;
    use serde_json::json;

    use super::*;
    use crate::api::tests::{read_body, read_json, send, send_json, test_router};
    use crate::api::router;
    use crate::settings::{AttachPolicy, Settings};

    #[tokio::test]
    async fn test_attach_list_delete_scenario() {
        let router = test_router();

        let mut host_request = get_host_fixture(Some("h1"));
        host_request.environment = "prod".to_owned();

        let response = send_json(&router, Method::POST, "/api/hosts", &host_request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response.headers()[header::LOCATION].to_str().unwrap().to_owned();
        let host: HostMessage = read_json(response).await;
        assert_eq!(location, format!("/api/hosts/{}", host.id));

        let response = send_json(
            &router,
            Method::POST,
            "/api/remotes",
            &get_remote_fixture(Some("r1")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let remote: RemoteMessage = read_json(response).await;

        let attach_uri = format!("/api/hosts/{}/attach", host.id);
        let response = send_json(
            &router,
            Method::POST,
            &attach_uri,
            &json!({ "remoteId": remote.id }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let remotes_uri = format!("/api/hosts/{}/remotes", host.id);
        let response = send(&router, Method::GET, &remotes_uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        let attached: serde_json::Value = read_json(response).await;
        assert_eq!(attached.as_array().unwrap().len(), 1);
        assert_eq!(attached[0]["remoteId"], remote.id);

        let host_uri = format!("/api/hosts/{}", host.id);
        let response = send(&router, Method::DELETE, &host_uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(read_body(response).await.is_empty());

        let response = send(&router, Method::GET, &remotes_uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: HandledResponseModel = read_json(response).await;
        assert_eq!(error.code, "not_found");
    }

    #[tokio::test]
    async fn test_assign_and_detach() {
        let router = test_router();

        let host: HostMessage = read_json(
            send_json(&router, Method::POST, "/api/hosts", &get_host_fixture(None)).await,
        )
        .await;
        let remote: RemoteMessage = read_json(
            send_json(&router, Method::POST, "/api/remotes", &get_remote_fixture(None)).await,
        )
        .await;

        let assignment = json!({ "hostId": host.id, "remoteId": remote.id });
        for _ in 0..2 {
            let response = send_json(&router, Method::POST, "/api/hosts/assign", &assignment).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let remotes_uri = format!("/api/hosts/{}/remotes", host.id);
        let attached: Vec<HostRemoteMessage> =
            read_json(send(&router, Method::GET, &remotes_uri).await).await;
        assert_eq!(attached.len(), 1);

        let detach_uri = format!("/api/hosts/{}/detach", host.id);
        let body = json!({ "remoteId": remote.id });
        for _ in 0..2 {
            let response = send_json(&router, Method::POST, &detach_uri, &body).await;
            assert_eq!(response.status(), StatusCode::NO_CONTENT);
        }

        let attached: Vec<HostRemoteMessage> =
            read_json(send(&router, Method::GET, &remotes_uri).await).await;
        assert!(attached.is_empty());
    }

    #[tokio::test]
    async fn test_strict_attach_conflict() {
        let settings = Settings {
            attach_policy: AttachPolicy::Strict,
            ..Settings::default()
        };
        let router = router(AppServices::memory(&settings));

        let host: HostMessage = read_json(
            send_json(&router, Method::POST, "/api/hosts", &get_host_fixture(None)).await,
        )
        .await;
        let remote: RemoteMessage = read_json(
            send_json(&router, Method::POST, "/api/remotes", &get_remote_fixture(None)).await,
        )
        .await;

        let attach_uri = format!("/api/hosts/{}/attach", host.id);
        let body = json!({ "remoteId": remote.id });

        let first = send_json(&router, Method::POST, &attach_uri, &body).await;
        assert_eq!(first.status(), StatusCode::NO_CONTENT);

        let second = send_json(&router, Method::POST, &attach_uri, &body).await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        let error: HandledResponseModel = read_json(second).await;
        assert_eq!(error.code, "conflict");
    }

    #[tokio::test]
    async fn test_attach_unknown_ids_is_bad_request() {
        let router = test_router();

        let host: HostMessage = read_json(
            send_json(&router, Method::POST, "/api/hosts", &get_host_fixture(None)).await,
        )
        .await;
        let remote: RemoteMessage = read_json(
            send_json(&router, Method::POST, "/api/remotes", &get_remote_fixture(None)).await,
        )
        .await;

        let attach_uri = format!("/api/hosts/{}/attach", host.id);
        let response =
            send_json(&router, Method::POST, &attach_uri, &json!({ "remoteId": 999 })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: HandledResponseModel = read_json(response).await;
        assert_eq!(error.code, "bad_request");
        assert_eq!(error.message, "remote 999 not found");

        let response = send_json(
            &router,
            Method::POST,
            "/api/hosts/998/attach",
            &json!({ "remoteId": remote.id }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        for assignment in [
            json!({ "hostId": 998, "remoteId": 999 }),
            json!({ "hostId": host.id, "remoteId": 999 }),
            json!({ "hostId": 998, "remoteId": remote.id }),
        ] {
            let response = send_json(&router, Method::POST, "/api/hosts/assign", &assignment).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        // listing an unknown host's remotes stays a 404
        let response = send(&router, Method::GET, "/api/hosts/998/remotes").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_requests() {
        let router = test_router();

        let response = send(&router, Method::GET, "/api/hosts/abc").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: HandledResponseModel = read_json(response).await;
        assert_eq!(error.code, "bad_request");

        let response = send(&router, Method::GET, "/api/hosts/0").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&router, Method::GET, "/api/hosts/12").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send_json(
            &router,
            Method::POST,
            "/api/hosts/1/attach",
            &json!({ "remote": 1 }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response =
            send_json(&router, Method::POST, "/api/hosts", &json!({ "name": " " })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: HandledResponseModel = read_json(response).await;
        assert_eq!(error.code, "validation_error");

        let response =
            send_json(&router, Method::PUT, "/api/hosts/5", &get_host_fixture(None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_and_list_by_environment() {
        let router = test_router();

        let host: HostMessage = read_json(
            send_json(&router, Method::POST, "/api/hosts", &get_host_fixture(None)).await,
        )
        .await;

        let mut replacement = get_host_fixture(None);
        replacement.environment = "staging".to_owned();
        let host_uri = format!("/api/hosts/{}", host.id);
        let response = send_json(&router, Method::PUT, &host_uri, &replacement).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let staging: Vec<HostMessage> =
            read_json(send(&router, Method::GET, "/api/hosts/environment/staging").await).await;
        assert_eq!(staging.len(), 1);
        assert_eq!(staging[0].id, host.id);

        let response = send(&router, Method::GET, "/api/hosts/environment/prod").await;
        assert_eq!(response.status(), StatusCode::OK);
        let prod: Vec<HostMessage> = read_json(response).await;
        assert!(prod.is_empty());
    }
}
