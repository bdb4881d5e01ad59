use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::request::Parts;
use axum::http::Request;
use axum::Json;
use serde::de::DeserializeOwned;

use super::ApiError;

/// JSON body whose rejection renders as an [`ApiError`] instead of axum's
/// plain text response.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for ValidJson<T>
where
    T: DeserializeOwned,
    Json<T>: FromRequest<S, B, Rejection = JsonRejection>,
    S: Send + Sync,
    B: Send + 'static,
{
    type Rejection = ApiError;

    async fn from_request(request: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// The `:id` segment of a route, which must be a positive integer.
pub struct EntityId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        parse_id("id", &raw).map(Self)
    }
}

pub fn parse_id(field: &str, raw: &str) -> Result<i64, ApiError> {
    match raw.trim().parse::<i64>() {
        Ok(id) => require_positive(field, id),
        Err(_) => Err(ApiError::BadRequest(format!(
            "{field} must be a positive integer, got {raw:?}"
        ))),
    }
}

pub fn require_positive(field: &str, id: i64) -> Result<i64, ApiError> {
    if id <= 0 {
        return Err(ApiError::BadRequest(format!(
            "{field} must be a positive integer, got {id}"
        )));
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("id", "42").unwrap(), 42);
        assert!(parse_id("id", "0").is_err());
        assert!(parse_id("id", "-3").is_err());
        assert!(parse_id("id", "abc").is_err());
        assert!(parse_id("id", "").is_err());
    }
}
