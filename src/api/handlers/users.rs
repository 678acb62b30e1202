//! User registry request handlers.
//!
//! Records are append-only: registration and lookups, no update or delete.

use crate::api::doc::USER_TAG;
use crate::api::dto::{ErrorResponse, PagedResponse, PaginationParams, UserInput, UserResponse};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::numeric_id::parse_id;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Creates user-related routes.
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users, register_user))
        .routes(routes!(get_user))
        .routes(routes!(get_user_by_national_id))
}

/// GET /api/users - List users by page, ordered by id
#[utoipa::path(
    get,
    path = "/",
    tag = USER_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of users", body = PagedResponse<UserResponse>),
        (status = 400, description = "Invalid pagination parameters", body = ErrorResponse)
    )
)]
async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<PagedResponse<UserResponse>>> {
    let (users, total) = state
        .services
        .users
        .list_users_paginated(params.offset(), params.limit())
        .await?;

    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(PagedResponse::new(data, &params, total.max(0) as u64)))
}

/// POST /api/users - Register a user
///
/// The creation date is today's date; any `id` in the body is ignored.
#[utoipa::path(
    post,
    path = "/",
    tag = USER_TAG,
    request_body = UserInput,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Malformed body or missing nationalId", body = ErrorResponse),
        (status = 409, description = "nationalId already registered", body = ErrorResponse)
    )
)]
async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<UserInput>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.services.users.register(input).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /api/users/{id} - Get user by ID
///
/// The id is an integer of any size, so the segment is parsed here rather
/// than by the path extractor.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = USER_TAG,
    params(
        ("id" = String, Path, description = "User ID, an integer of any size", example = "1")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let id = parse_id(&id).map_err(|message| AppError::BadRequest { message })?;
    let user = state.services.users.get_user(&id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// GET /api/users/national-id/{national_id} - Get user by national id
#[utoipa::path(
    get,
    path = "/national-id/{national_id}",
    tag = USER_TAG,
    params(
        ("national_id" = i64, Path, description = "National identity number (cedula)")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn get_user_by_national_id(
    State(state): State<AppState>,
    Path(national_id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users.get_by_national_id(national_id).await?;
    Ok(Json(UserResponse::from(user)))
}
