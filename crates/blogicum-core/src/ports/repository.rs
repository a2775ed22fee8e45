use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, CommentView, Location, Post, PostView, User};
use crate::error::RepoError;
use crate::filters::{PostFilter, TaxonomyFilter};
use crate::pagination::{Page, PageRequest};
use crate::visibility::PostQuery;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// All categories, newest first. The search matches title or description.
    async fn search_categories(&self, filter: &TaxonomyFilter)
    -> Result<Vec<Category>, RepoError>;
}

#[async_trait]
pub trait LocationRepository: BaseRepository<Location, Uuid> {
    /// All locations, newest first. The search matches the name.
    async fn search_locations(&self, filter: &TaxonomyFilter)
    -> Result<Vec<Location>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Load a post with its author, category, location and comment count.
    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, RepoError>;

    /// One page of posts matching `query`, newest `pub_date` first.
    async fn list_views(
        &self,
        query: PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError>;

    /// Staff listing: every post passing `filter`, newest `pub_date` first.
    async fn search_views(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments of a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError>;
}
