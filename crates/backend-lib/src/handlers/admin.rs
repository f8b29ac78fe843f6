// ============================
// crates/backend-lib/src/handlers/admin.rs
// ============================
//! Admin-only endpoints.
use axum::{extract::State, Json};
use embrace_common::{ApiResponse, UserView};

use crate::auth::AdminUser;
use crate::error::AppError;
use crate::AppState;

/// `GET /api/admin/users`: every account, active or not.
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<ApiResponse<Vec<UserView>>>, AppError> {
    tracing::debug!(admin = %admin.account_id, "admin user listing");
    let users = state
        .store
        .list_accounts()
        .await?
        .iter()
        .map(|account| account.view())
        .collect();
    Ok(Json(ApiResponse::ok(users)))
}
