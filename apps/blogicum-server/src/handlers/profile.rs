//! Profile pages.

use actix_web::{HttpResponse, web};

use blogicum_shared::ApiResponse;
use blogicum_shared::dto::{ListQuery, ProfileRequest, ProfileResponse};

use super::{mapping, profile_url, see_other};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/profile/{username}
pub async fn profile(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let (user, posts) = state
        .blog
        .profile(&path, viewer.user_id(), query.page.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProfileResponse {
        profile: mapping::user(user),
        posts: mapping::page(posts, mapping::post),
    })))
}

/// GET /api/edit_profile
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let user = state.blog.current_user(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::user(user))))
}

/// POST /api/edit_profile
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ProfileRequest>,
) -> AppResult<HttpResponse> {
    let user = state
        .blog
        .edit_profile(identity.user_id, mapping::profile_form(body.into_inner()))
        .await?;

    Ok(see_other(profile_url(&user.username), mapping::user(user)))
}

/// GET /api/user_posts - the caller's own profile.
pub async fn user_posts(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let user = state.blog.current_user(identity.user_id).await?;
    Ok(see_other(profile_url(&user.username), mapping::user(user)))
}
