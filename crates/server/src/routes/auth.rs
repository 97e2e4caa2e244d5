use axum::{extract::{Request, State}, http::{header, StatusCode}, middleware::Next, response::Response, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use service::auth::domain::{LoginInput, RegisterInput};
use service::identity::domain::PublicUser;

use crate::{errors::JsonApiError, observability, state::ServerState};

const AUTH_COOKIE: &str = "auth_token";

#[derive(Serialize, Deserialize)]
pub struct LoginOutput { pub user: PublicUser, pub token: String }

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered", body = crate::openapi::PublicUserDoc), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(State(state): State<ServerState>, Json(input): Json<RegisterInput>) -> Result<(StatusCode, Json<PublicUser>), JsonApiError> {
    let res = state.auth.register(input).await;
    observability::record("register", &res);
    Ok((StatusCode::CREATED, Json(res?.into())))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(State(state): State<ServerState>, jar: CookieJar, Json(input): Json<LoginInput>) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let res = state.auth.login(input).await;
    observability::record("login", &res);
    let session = res?;
    let Some(token) = session.token else {
        return Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", Some("token generation failed".into())));
    };
    let mut cookie = Cookie::new(AUTH_COOKIE, token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    Ok((jar.add(cookie), Json(LoginOutput { user: session.user, token })))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), StatusCode::NO_CONTENT)
}

/// Bearer token from `Authorization`, falling back to the `auth_token` cookie.
fn extract_token(req: &Request) -> Result<Option<String>, StatusCode> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(Some(t.trim().to_string())),
            _ => {
                tracing::warn!(path = %req.uri().path(), "invalid Authorization format (expect Bearer)");
                Err(StatusCode::UNAUTHORIZED)
            }
        };
    }
    let jar = CookieJar::from_headers(req.headers());
    Ok(jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|t| !t.is_empty()))
}

/// Guards the user routes. Missing token is 400, invalid or expired is 401.
/// Verified claims are inserted as a request extension.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(token) = extract_token(&req)? else {
        tracing::warn!(path = %req.uri().path(), "missing Authorization header and auth_token cookie");
        return Err(StatusCode::BAD_REQUEST);
    };

    match state.auth.verify_token(&token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(path = %req.uri().path(), err = %e, "token validation failed");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
