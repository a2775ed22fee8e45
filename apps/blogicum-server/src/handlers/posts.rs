//! Post listings, detail and author actions.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_shared::ApiResponse;
use blogicum_shared::dto::{
    CategoryPostsResponse, ConfirmRequest, ListQuery, PostDetailResponse, PostRequest,
};

use super::{mapping, post_url, profile_url, see_other};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppResult, redirect_non_author};
use crate::state::AppState;

/// GET /api/ and /api/posts
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let page = state.blog.index(query.page.as_deref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::page(page, mapping::post))))
}

/// GET /api/category/{slug}
pub async fn category(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let (category, page) = state
        .blog
        .category_posts(&path, query.page.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CategoryPostsResponse {
        category: mapping::category(category),
        posts: mapping::page(page, mapping::post),
    })))
}

/// GET /api/posts/{post_id}
pub async fn detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let detail = state.blog.post_detail(*path, viewer.user_id()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostDetailResponse {
        post: mapping::post(detail.post),
        comments: detail
            .comments
            .into_iter()
            .map(mapping::comment_view)
            .collect(),
    })))
}

/// POST /api/create and /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .blog
        .create_post(identity.user_id, mapping::post_form(body.into_inner()))
        .await?;
    let view = state.blog.post_for_edit(post.id, identity.user_id).await?;

    Ok(see_other(
        profile_url(&view.author.username),
        mapping::post(view),
    ))
}

/// GET /api/posts/{post_id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let view = state
        .blog
        .post_for_edit(post_id, identity.user_id)
        .await
        .map_err(redirect_non_author(post_url(post_id)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::post(view))))
}

/// POST /api/posts/{post_id}/edit
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    state
        .blog
        .edit_post(post_id, identity.user_id, mapping::post_form(body.into_inner()))
        .await
        .map_err(redirect_non_author(post_url(post_id)))?;
    let view = state.blog.post_for_edit(post_id, identity.user_id).await?;

    Ok(see_other(post_url(post_id), mapping::post(view)))
}

/// GET /api/posts/{post_id}/delete
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let view = state
        .blog
        .post_for_delete(post_id, identity.user_id)
        .await
        .map_err(redirect_non_author(post_url(post_id)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        mapping::post(view),
        "Send {\"confirm\": true} to delete this post",
    )))
}

/// POST /api/posts/{post_id}/delete
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: Option<web::Json<ConfirmRequest>>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let confirm = mapping::confirm_form(body.map(web::Json::into_inner));
    state
        .blog
        .delete_post(post_id, identity.user_id, confirm)
        .await
        .map_err(redirect_non_author(post_url(post_id)))?;
    let user = state.blog.current_user(identity.user_id).await?;

    Ok(see_other(
        profile_url(&user.username),
        serde_json::json!({ "id": post_id }),
    ))
}
