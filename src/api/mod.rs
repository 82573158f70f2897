// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::policy,
    models::{
        LoginRequest, Section, SectionPayload, SignupRequest, Specification,
        SpecificationPayload, UserResponse,
    },
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod specifications;

pub fn router(state: AppState) -> Router {
    // The auth resource honors a single configured origin; the original
    // clients are served from one known frontend. The specification
    // resource stays open to any origin.
    let auth_cors = match &state.auth_cors_origin {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(value) => CorsLayer::new()
                .allow_origin(value)
                .allow_methods([Method::POST, Method::OPTIONS])
                .allow_headers(Any),
            Err(_) => {
                tracing::warn!(origin = %origin, "unparseable auth CORS origin, allowing any");
                CorsLayer::permissive()
            }
        },
        None => CorsLayer::permissive(),
    };

    let auth_routes = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .layer(auth_cors);

    let specification_routes = Router::new()
        .route(
            "/api/specifications",
            get(specifications::list_specifications).post(specifications::create_specification),
        )
        .route(
            "/api/specifications/{id}",
            get(specifications::get_specification)
                .put(specifications::update_specification)
                .delete(specifications::delete_specification),
        )
        .layer(CorsLayer::permissive());

    let health_routes = Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    Router::new()
        .merge(auth_routes)
        .merge(specification_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            policy::require_bearer,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup,
        auth::login,
        specifications::list_specifications,
        specifications::get_specification,
        specifications::create_specification,
        specifications::update_specification,
        specifications::delete_specification,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            SignupRequest,
            LoginRequest,
            UserResponse,
            Specification,
            Section,
            SpecificationPayload,
            SectionPayload,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Auth", description = "Signup and login"),
        (name = "Specifications", description = "Project specification management"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::auth::InsecureVerifier;
    use crate::storage::Database;

    fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.redb")).unwrap();
        (AppState::new(db, Arc::new(InsecureVerifier)), dir)
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (state, _dir) = test_state();
        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn specifications_require_a_bearer_token() {
        let (state, _dir) = test_state();
        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/specifications")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn signup_is_reachable_without_a_token() {
        let (state, _dir) = test_state();
        let response = router(state)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/auth/signup")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"email":"a@b.com","password":"secret1","confirmPassword":"secret1"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_is_public() {
        let (state, _dir) = test_state();
        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
