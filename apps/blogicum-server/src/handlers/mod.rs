//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod comments;
mod health;
mod mapping;
mod posts;
mod profile;


use actix_web::http::header;
use actix_web::{HttpResponse, web};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use uuid::Uuid;

use blogicum_shared::ApiResponse;

pub(crate) fn post_url(post_id: Uuid) -> String {
    format!("/api/posts/{post_id}")
}

/// Username characters that may stay literal in a path segment.
const USERNAME_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'@')
    .remove(b'.')
    .remove(b'+')
    .remove(b'-')
    .remove(b'_');

pub(crate) fn profile_url(username: &str) -> String {
    format!(
        "/api/profile/{}",
        utf8_percent_encode(username, USERNAME_SEGMENT)
    )
}

/// `303 See Other` to `location`, carrying `data` for clients that do not
/// follow redirects.
pub(crate) fn see_other<T: Serialize>(location: String, data: T) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.as_str()))
        .json(ApiResponse::ok(data).with_redirect(location))
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/registration", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me))
                    .route("/password_change", web::post().to(auth::password_change)),
            )
            // Posts
            .route("", web::get().to(posts::index))
            .route("/", web::get().to(posts::index))
            .service(
                web::resource("/posts")
                    .route(web::get().to(posts::index))
                    .route(web::post().to(posts::create)),
            )
            .route("/create", web::post().to(posts::create))
            .route("/posts/{post_id}", web::get().to(posts::detail))
            .service(
                web::resource("/posts/{post_id}/edit")
                    .route(web::get().to(posts::edit_form))
                    .route(web::post().to(posts::edit)),
            )
            .service(
                web::resource("/posts/{post_id}/delete")
                    .route(web::get().to(posts::delete_form))
                    .route(web::post().to(posts::delete)),
            )
            .route("/category/{slug}", web::get().to(posts::category))
            // Comments
            .route(
                "/posts/{post_id}/comment",
                web::post().to(comments::add_comment),
            )
            .service(
                web::resource("/posts/{post_id}/edit_comment/{comment_id}")
                    .route(web::get().to(comments::edit_form))
                    .route(web::post().to(comments::edit)),
            )
            .service(
                web::resource("/posts/{post_id}/delete_comment/{comment_id}")
                    .route(web::get().to(comments::delete_form))
                    .route(web::post().to(comments::delete)),
            )
            // Profiles
            .route("/profile/{username}", web::get().to(profile::profile))
            .service(
                web::resource("/edit_profile")
                    .route(web::get().to(profile::edit_form))
                    .route(web::post().to(profile::edit)),
            )
            .route("/user_posts", web::get().to(profile::user_posts))
            // Staff
            .service(
                web::scope("/admin")
                    .service(
                        web::resource("/categories")
                            .route(web::get().to(admin::list_categories))
                            .route(web::post().to(admin::create_category)),
                    )
                    .route("/categories/{id}", web::put().to(admin::update_category))
                    .service(
                        web::resource("/locations")
                            .route(web::get().to(admin::list_locations))
                            .route(web::post().to(admin::create_location)),
                    )
                    .route("/locations/{id}", web::put().to(admin::update_location))
                    .route("/posts", web::get().to(admin::list_posts))
                    .service(
                        web::resource("/posts/{id}")
                            .route(web::put().to(admin::update_post))
                            .route(web::delete().to(admin::delete_post)),
                    ),
            ),
    );
}
