//! Plain axum routes served next to the Dioxus application.
//!
//! `POST /api/auth/login` takes `{"email", "password"}` as JSON. On success it
//! binds the session and answers `200 {"user": ...}`; on failure it answers
//! `400 {"error": "..."}` with the backend's message. A body that does not
//! parse as a login request is a `400` as well.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use backend::Service;
use serde::{Deserialize, Serialize};
use store::UserInfo;
use tower_sessions::Session;

pub const LOGIN_ROUTE: &str = "/api/auth/login";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    user: UserInfo,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: impl ToString) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

/// Routes that need a session layer applied by the caller.
pub fn auth_routes(service: &'static Service) -> Router {
    Router::new()
        .route(LOGIN_ROUTE, post(login))
        .with_state(service)
}

async fn login(
    State(service): State<&'static Service>,
    session: Session,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!("JSON login rejected: {rejection}");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };
    let user = match service.login(&request.email, &request.password).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("JSON login refused: {e}");
            return error_response(StatusCode::BAD_REQUEST, e);
        }
    };

    if let Err(e) = crate::auth::sign_in(&session, &user.id).await {
        tracing::error!("Failed to set session: {e}");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, e);
    }

    (StatusCode::OK, Json(LoginResponse { user })).into_response()
}
