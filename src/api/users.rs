// User directory endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::routes::AppState,
    domain::{CreateUser, UpdateUser, User, UserListResponse, UserResponse},
    errors::{AppError, Result},
};

/// Query parameters for the list endpoint.
///
/// Parsed as signed so out-of-range values (page=-1) reach the handler
/// and come back as 422 validation errors rather than a query rejection.
#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
    /// Case-insensitive substring filter on email
    pub email: Option<String>,
    /// Case-insensitive substring filter on first or last name
    pub name: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    6
}

/// Response for the avatar endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct AvatarResponse {
    pub avatar_url: String,
}

/// GET /api/users/:id
#[tracing::instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> Result<impl IntoResponse> {
    let user = state.users.get(user_id)?;

    Ok(Json(UserResponse {
        data: user,
        support: state.support.as_ref().clone(),
    }))
}

/// GET /api/users - paginated, filterable listing
#[tracing::instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> Result<impl IntoResponse> {
    if params.page < 1 {
        return Err(AppError::Validation("Page must be at least 1".to_string()));
    }
    if params.per_page < 1 || params.per_page > 20 {
        return Err(AppError::Validation(
            "per_page must be between 1 and 20".to_string(),
        ));
    }

    let page = params.page as u64;
    let per_page = params.per_page as u64;

    let mut users = state.users.list();

    if let Some(email) = &params.email {
        let needle = email.to_lowercase();
        users.retain(|u| u.email.to_lowercase().contains(&needle));
    }

    if let Some(name) = &params.name {
        let needle = name.to_lowercase();
        users.retain(|u| {
            u.first_name.to_lowercase().contains(&needle)
                || u.last_name.to_lowercase().contains(&needle)
        });
    }

    let total = users.len() as u64;
    let total_pages = total.div_ceil(per_page);

    if page > total_pages && total > 0 {
        return Err(AppError::Validation(format!(
            "Page {} does not exist. Total pages: {}",
            page, total_pages
        )));
    }

    // An empty directory skips the guard above; saturating offset math
    // keeps an arbitrarily large page a plain empty result, never a panic
    let start = usize::try_from(page.saturating_sub(1).saturating_mul(per_page))
        .unwrap_or(usize::MAX);
    let data: Vec<User> = users
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    Ok(Json(UserListResponse {
        page,
        per_page,
        total,
        total_pages,
        data,
        support: state.support.as_ref().clone(),
    }))
}

/// POST /api/users
#[tracing::instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let user = state.users.create(payload)?;
    tracing::info!(user_id = %user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            data: user,
            support: state.support.as_ref().clone(),
        }),
    ))
}

/// PUT /api/users/:id - partial update
#[tracing::instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
    Json(payload): Json<UpdateUser>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let user = state.users.update(user_id, payload)?;
    tracing::info!(user_id = %user_id, "User updated");

    Ok(Json(UserResponse {
        data: user,
        support: state.support.as_ref().clone(),
    }))
}

/// DELETE /api/users/:id
#[tracing::instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> Result<impl IntoResponse> {
    state.users.delete(user_id)?;
    tracing::info!(user_id = %user_id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/:id/avatar
#[tracing::instrument(skip(state))]
pub async fn get_user_avatar(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
) -> Result<impl IntoResponse> {
    let user = state.users.get(user_id)?;

    Ok(Json(AvatarResponse {
        avatar_url: user.avatar,
    }))
}
