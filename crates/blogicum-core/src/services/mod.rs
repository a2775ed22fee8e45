//! Use cases of the blog, written against the repository ports.

mod account;
mod blog;
mod moderation;
mod taxonomy;

use std::sync::Arc;

use uuid::Uuid;

pub use account::{AccountService, Session};
pub use blog::{BlogService, PostDetail};
pub use moderation::ModerationService;
pub use taxonomy::TaxonomyService;

use crate::error::DomainError;
use crate::forms::PostForm;
use crate::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};

const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// The full set of repositories a backend provides.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

/// Staff status is read from storage on every call.
async fn ensure_staff(users: &dyn UserRepository, actor: Uuid) -> Result<(), DomainError> {
    match users.find_by_id(actor).await? {
        Some(user) if user.is_staff => Ok(()),
        Some(_) => Err(DomainError::Forbidden),
        None => Err(DomainError::Unauthorized),
    }
}

/// Field checks plus the category and location references.
async fn validate_post_form(repos: &Repositories, form: &PostForm) -> Result<(), DomainError> {
    let mut errors = form.check();

    if let Some(category_id) = form.category_id
        && repos.categories.find_by_id(category_id).await?.is_none()
    {
        errors.add("category", INVALID_CHOICE);
    }
    if let Some(location_id) = form.location_id
        && repos.locations.find_by_id(location_id).await?.is_none()
    {
        errors.add("location", INVALID_CHOICE);
    }

    errors.into_result()
}
