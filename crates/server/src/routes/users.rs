use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use service::identity::domain::{PublicUser, UserFile, UserPatch};

use crate::{errors::JsonApiError, observability, state::ServerState};

#[derive(Debug, Deserialize, Serialize)]
pub struct ChangePasswordInput { pub password: String }

#[utoipa::path(get, path = "/users", tag = "users", responses((status = 200, description = "All users", body = [crate::openapi::PublicUserDoc])))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<PublicUser>>, JsonApiError> {
    let res = state.registry.list_all().await;
    observability::record("list_all", &res);
    let users = res?;
    info!(count = users.len(), "list users");
    Ok(Json(users.iter().map(PublicUser::from).collect()))
}

#[utoipa::path(
    get, path = "/users/{email}", tag = "users",
    params(("email" = String, Path, description = "User email")),
    responses((status = 200, description = "OK", body = crate::openapi::PublicUserDoc), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(email): Path<String>) -> Result<Json<PublicUser>, JsonApiError> {
    let res = state.registry.get(&email).await;
    observability::record("get", &res);
    Ok(Json(res?.into()))
}

#[utoipa::path(
    patch, path = "/users/{email}", tag = "users",
    params(("email" = String, Path, description = "User email")),
    request_body = crate::openapi::UserPatchDoc,
    responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found"), (status = 409, description = "Conflict"))
)]
pub async fn update(State(state): State<ServerState>, Path(email): Path<String>, Json(patch): Json<UserPatch>) -> Result<Json<PublicUser>, JsonApiError> {
    let res = state.auth.update_profile(&email, patch).await;
    observability::record("update", &res);
    Ok(Json(res?.into()))
}

#[utoipa::path(
    put, path = "/users/{email}/password", tag = "users",
    params(("email" = String, Path, description = "User email")),
    request_body = crate::openapi::ChangePasswordDoc,
    responses((status = 200, description = "Password changed"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found"))
)]
pub async fn change_password(State(state): State<ServerState>, Path(email): Path<String>, Json(input): Json<ChangePasswordInput>) -> Result<Json<PublicUser>, JsonApiError> {
    let res = state.auth.change_password(&email, &input.password).await;
    observability::record("change_password", &res);
    Ok(Json(res?.into()))
}

#[utoipa::path(
    post, path = "/users/{email}/confirm-email", tag = "users",
    params(("email" = String, Path, description = "User email")),
    responses((status = 200, description = "Email confirmed"), (status = 404, description = "Not Found"))
)]
pub async fn confirm_email(State(state): State<ServerState>, Path(email): Path<String>) -> Result<Json<PublicUser>, JsonApiError> {
    let res = state.registry.confirm_email(&email).await;
    observability::record("confirm_email", &res);
    Ok(Json(res?.into()))
}

#[utoipa::path(
    post, path = "/users/{email}/confirm-phone", tag = "users",
    params(("email" = String, Path, description = "User email")),
    responses((status = 200, description = "Phone confirmed"), (status = 404, description = "Not Found"))
)]
pub async fn confirm_phone(State(state): State<ServerState>, Path(email): Path<String>) -> Result<Json<PublicUser>, JsonApiError> {
    let res = state.registry.confirm_phone(&email).await;
    observability::record("confirm_phone", &res);
    Ok(Json(res?.into()))
}

#[utoipa::path(
    delete, path = "/users/{email}", tag = "users",
    params(("email" = String, Path, description = "User email")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, Path(email): Path<String>) -> Result<StatusCode, JsonApiError> {
    let res = state.registry.delete(&email).await;
    observability::record("delete", &res);
    res?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/files/private/{user_id}", tag = "files",
    params(("user_id" = Uuid, Path, description = "Owner id")),
    responses((status = 200, description = "Files owned by the user"), (status = 404, description = "Not Found"))
)]
pub async fn private_files(State(state): State<ServerState>, Path(user_id): Path<Uuid>) -> Result<Json<Vec<UserFile>>, JsonApiError> {
    let res = state.registry.list_private_files(user_id).await;
    observability::record("list_private_files", &res);
    Ok(Json(res?))
}
