use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::WebError;

/// Rejects requests whose `Authorization: Bearer <key>` is not a configured key
pub async fn require_auth(
    State(api_keys): State<ApiKeys>,
    request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    match token {
        Some(token) if api_keys.is_valid(token) => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!("Invalid API key attempt on {}", request.uri().path());
            Err(WebError::Unauthorized)
        }
        None => Err(WebError::Unauthorized),
    }
}

#[derive(Clone)]
pub struct ApiKeys {
    keys: Arc<HashSet<String>>,
}

impl ApiKeys {
    pub fn from_comma_separated(keys_str: &str) -> Self {
        let keys = keys_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            keys: Arc::new(keys),
        }
    }

    pub fn is_valid(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, middleware, routing::post};
    use tower::ServiceExt;

    fn app(keys: &str) -> Router {
        Router::new()
            .route("/", post(|| async { StatusCode::CREATED }))
            .route_layer(middleware::from_fn_with_state(
                ApiKeys::from_comma_separated(keys),
                require_auth,
            ))
    }

    async fn call(keys: &str, authorization: Option<&str>) -> StatusCode {
        let mut request = axum::http::Request::builder().method("POST").uri("/");
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }

        app(keys)
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[test]
    fn test_keys_are_trimmed_and_blank_entries_dropped() {
        let keys = ApiKeys::from_comma_separated(" coach-key , ,athlete-key,");
        assert!(keys.is_valid("coach-key"));
        assert!(keys.is_valid("athlete-key"));
        assert!(!keys.is_valid(""));
        assert!(ApiKeys::from_comma_separated(" , ").is_empty());
    }

    #[tokio::test]
    async fn test_valid_bearer_key_passes() {
        assert_eq!(
            call("a,b", Some("Bearer b")).await,
            StatusCode::CREATED
        );
    }

    #[tokio::test]
    async fn test_missing_or_wrong_key_is_unauthorized() {
        assert_eq!(call("a", None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(call("a", Some("Bearer z")).await, StatusCode::UNAUTHORIZED);
        assert_eq!(call("a", Some("Basic a")).await, StatusCode::UNAUTHORIZED);
        assert_eq!(call("", Some("Bearer ")).await, StatusCode::UNAUTHORIZED);
    }
}
