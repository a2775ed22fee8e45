//! Comment creation and author actions.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_shared::ApiResponse;
use blogicum_shared::dto::{CommentRequest, ConfirmRequest};

use super::{mapping, post_url, see_other};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppResult, redirect_non_author};
use crate::state::AppState;

/// POST /api/posts/{post_id}/comment
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let comment = state
        .blog
        .add_comment(post_id, identity.user_id, mapping::comment_form(body.into_inner()))
        .await?;

    Ok(see_other(
        post_url(post_id),
        mapping::comment_view(comment),
    ))
}

/// GET /api/posts/{post_id}/edit_comment/{comment_id}
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state
        .blog
        .comment_for_edit(post_id, comment_id, identity.user_id)
        .await
        .map_err(redirect_non_author(post_url(post_id)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::comment_view(comment))))
}

/// POST /api/posts/{post_id}/edit_comment/{comment_id}
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state
        .blog
        .edit_comment(
            post_id,
            comment_id,
            identity.user_id,
            mapping::comment_form(body.into_inner()),
        )
        .await
        .map_err(redirect_non_author(post_url(post_id)))?;

    Ok(see_other(
        post_url(post_id),
        mapping::comment_view(comment),
    ))
}

/// GET /api/posts/{post_id}/delete_comment/{comment_id}
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state
        .blog
        .comment_for_delete(post_id, comment_id, identity.user_id)
        .await
        .map_err(redirect_non_author(post_url(post_id)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        mapping::comment_view(comment),
        "Send {\"confirm\": true} to delete this comment",
    )))
}

/// POST /api/posts/{post_id}/delete_comment/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: Option<web::Json<ConfirmRequest>>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let confirm = mapping::confirm_form(body.map(web::Json::into_inner));
    state
        .blog
        .delete_comment(post_id, comment_id, identity.user_id, confirm)
        .await
        .map_err(redirect_non_author(post_url(post_id)))?;

    Ok(see_other(
        post_url(post_id),
        serde_json::json!({ "id": comment_id }),
    ))
}
