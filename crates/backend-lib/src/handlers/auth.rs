// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Auth endpoint handlers: thin translation between HTTP and
//! [`AccountService`](crate::accounts::AccountService).
use axum::{extract::State, http::StatusCode, Json};
use embrace_common::{
    ApiResponse, AuthData, ChangePasswordRequest, DeleteAccountRequest, LoginRequest,
    ProfileView, RegisterRequest, SessionStatus, UpdateProfileRequest,
};

use crate::auth::{CurrentUser, MaybeUser};
use crate::error::AppError;
use crate::AppState;

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthData>>), AppError> {
    let data = state.accounts.register(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            "User registered successfully",
            data,
        )),
    ))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthData>>, AppError> {
    let data = state.accounts.login(req).await?;
    Ok(Json(ApiResponse::ok_with_message("Login successful", data)))
}

/// `POST /api/auth/logout`: deactivates the caller's current session only.
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.accounts.logout(&user.session_id).await?;
    Ok(Json(ApiResponse::message("Logout successful")))
}

/// `GET /api/auth/profile`
pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<ProfileView>>, AppError> {
    let profile = state.accounts.profile(&user.account_id).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// `PUT /api/auth/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.accounts.update_profile(&user.account_id, req).await?;
    Ok(Json(ApiResponse::message("Profile updated successfully")))
}

/// `PUT /api/auth/change-password`
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.accounts.change_password(&user.account_id, req).await?;
    Ok(Json(ApiResponse::message(
        "Password changed successfully. Please login again.",
    )))
}

/// `DELETE /api/auth/account`
pub async fn delete_account(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<DeleteAccountRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state
        .accounts
        .delete_account(&user.account_id, &req.password)
        .await?;
    Ok(Json(ApiResponse::message("Account deleted successfully")))
}

/// `GET /api/auth/session`: guest-or-signed-in check; never rejects.
pub async fn session_status(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Json<ApiResponse<SessionStatus>>, AppError> {
    let status = match user {
        Some(user) => {
            let view = state
                .store
                .get_account(&user.account_id)
                .await?
                .map(|account| account.view());
            SessionStatus {
                authenticated: view.is_some(),
                user: view,
            }
        }
        None => SessionStatus {
            authenticated: false,
            user: None,
        },
    };
    Ok(Json(ApiResponse::ok(status)))
}

/// `POST /api/auth/google`: federated sign-in is an intentional stub.
pub async fn google_sign_in() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(serde_json::json!({
            "success": false,
            "message": "Google sign-in is not implemented yet. Please use email and password.",
        })),
    )
}
