//! Staff management of categories, locations and posts.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_shared::ApiResponse;
use blogicum_shared::dto::{
    AdminPostQuery, CategoryRequest, ListQuery, LocationRequest, PostRequest,
};

use super::mapping;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/admin/categories?search=&is_published=
pub async fn list_categories(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let filter = mapping::taxonomy_filter(query.into_inner());
    let categories = state
        .taxonomy
        .list_categories(identity.user_id, &filter)
        .await?;

    let body: Vec<_> = categories.into_iter().map(mapping::category).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// POST /api/admin/categories
pub async fn create_category(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .taxonomy
        .create_category(identity.user_id, mapping::category_form(body.into_inner()))
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(mapping::category(category))))
}

/// PUT /api/admin/categories/{id}
pub async fn update_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .taxonomy
        .update_category(
            identity.user_id,
            path.into_inner(),
            mapping::category_form(body.into_inner()),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::category(category))))
}

/// GET /api/admin/locations?search=&is_published=
pub async fn list_locations(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let filter = mapping::taxonomy_filter(query.into_inner());
    let locations = state
        .taxonomy
        .list_locations(identity.user_id, &filter)
        .await?;

    let body: Vec<_> = locations.into_iter().map(mapping::location).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// POST /api/admin/locations
pub async fn create_location(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<LocationRequest>,
) -> AppResult<HttpResponse> {
    let location = state
        .taxonomy
        .create_location(identity.user_id, mapping::location_form(body.into_inner()))
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(mapping::location(location))))
}

/// PUT /api/admin/locations/{id}
pub async fn update_location(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<LocationRequest>,
) -> AppResult<HttpResponse> {
    let location = state
        .taxonomy
        .update_location(
            identity.user_id,
            path.into_inner(),
            mapping::location_form(body.into_inner()),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::location(location))))
}

/// GET /api/admin/posts?search=&is_published=&category=&location=&author=&page=
pub async fn list_posts(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<AdminPostQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let page = query.page.clone();
    let posts = state
        .moderation
        .list_posts(identity.user_id, &mapping::post_filter(query), page.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::page(posts, mapping::post))))
}

/// PUT /api/admin/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let view = state
        .moderation
        .update_post(
            identity.user_id,
            path.into_inner(),
            mapping::post_form(body.into_inner()),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::post(view))))
}

/// DELETE /api/admin/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .moderation
        .delete_post(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
