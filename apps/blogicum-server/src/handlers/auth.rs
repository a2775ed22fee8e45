//! Registration, login, password changes and the current user.

use actix_web::{HttpResponse, web};

use blogicum_core::forms::{LoginForm, RegistrationForm};
use blogicum_core::services::Session;
use blogicum_shared::ApiResponse;
use blogicum_shared::dto::{
    AuthResponse, LoginRequest, PasswordChangeRequest, RegisterUserRequest,
};

use super::{mapping, see_other};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn auth_response(session: Session) -> AuthResponse {
    AuthResponse {
        access_token: session.access_token,
        token_type: "Bearer".to_string(),
        expires_in: session.expires_in.max(0) as u64,
        user: mapping::user(session.user),
    }
}

/// POST /api/auth/registration
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state
        .accounts
        .register(RegistrationForm {
            username: req.username,
            password1: req.password1,
            password2: req.password2,
        })
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(auth_response(session))))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state
        .accounts
        .login(LoginForm {
            username: req.username,
            password: req.password,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(auth_response(session))))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.blog.current_user(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::user(user))))
}

/// POST /api/auth/password_change
///
/// Issued tokens stay valid; only the stored hash changes.
pub async fn password_change(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PasswordChangeRequest>,
) -> AppResult<HttpResponse> {
    let user = state
        .accounts
        .change_password(
            identity.user_id,
            mapping::password_change_form(body.into_inner()),
        )
        .await?;

    Ok(see_other("/api/auth/me".to_string(), mapping::user(user)))
}
