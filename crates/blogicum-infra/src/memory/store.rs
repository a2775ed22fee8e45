//! In-memory implementation of every repository port.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blogicum_core::domain::{
    Author, Category, Comment, CommentView, Location, Post, PostView, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::filters::{PostFilter, TaxonomyFilter};
use blogicum_core::pagination::{Page, PageRequest};
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};
use blogicum_core::services::Repositories;
use blogicum_core::visibility::PostQuery;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    locations: HashMap<Uuid, Location>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

impl Tables {
    fn author(&self, id: Uuid) -> Author {
        self.users
            .get(&id)
            .map(User::author)
            .unwrap_or_else(|| Author {
                id,
                username: String::new(),
            })
    }

    fn category_of(&self, post: &Post) -> Option<&Category> {
        post.category_id.and_then(|id| self.categories.get(&id))
    }

    fn post_view(&self, post: &Post) -> PostView {
        PostView {
            author: self.author(post.author_id),
            category: self.category_of(post).cloned(),
            location: post.location_id.and_then(|id| self.locations.get(&id).cloned()),
            comment_count: self
                .comments
                .values()
                .filter(|c| c.post_id == post.id)
                .count() as u64,
            post: post.clone(),
        }
    }

    fn missing_reference(what: &str) -> RepoError {
        RepoError::Constraint(format!("referenced {what} does not exist"))
    }
}

/// In-memory storage with the same uniqueness, reference and cascade rules
/// as the relational schema.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share one store behind every repository port.
    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            users: self.clone(),
            categories: self.clone(),
            locations: self.clone(),
            posts: self.clone(),
            comments: self.clone(),
        }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .users
            .values()
            .any(|u| u.username == user.username && u.id != user.id);
        if taken {
            return Err(RepoError::Constraint("username already exists".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or(RepoError::NotFound)?;

        let posts: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        tables.posts.retain(|_, p| p.author_id != id);
        tables
            .comments
            .retain(|_, c| c.author_id != id && !posts.contains(&c.post_id));
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn save(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .categories
            .values()
            .any(|c| c.slug == category.slug && c.id != category.id);
        if taken {
            return Err(RepoError::Constraint("slug already exists".to_string()));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.categories.remove(&id).ok_or(RepoError::NotFound)?;
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn search_categories(
        &self,
        filter: &TaxonomyFilter,
    ) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| filter.admits(c.is_published, &[c.title.as_str(), c.description.as_str()]))
            .cloned()
            .collect();
        categories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(categories)
    }
}

#[async_trait]
impl BaseRepository<Location, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError> {
        Ok(self.tables.read().await.locations.get(&id).cloned())
    }

    async fn save(&self, location: Location) -> Result<Location, RepoError> {
        let mut tables = self.tables.write().await;
        tables.locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.locations.remove(&id).ok_or(RepoError::NotFound)?;
        for post in tables.posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LocationRepository for InMemoryStore {
    async fn search_locations(
        &self,
        filter: &TaxonomyFilter,
    ) -> Result<Vec<Location>, RepoError> {
        let tables = self.tables.read().await;
        let mut locations: Vec<Location> = tables
            .locations
            .values()
            .filter(|l| filter.admits(l.is_published, &[l.name.as_str()]))
            .cloned()
            .collect();
        locations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(locations)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.author_id) {
            return Err(Tables::missing_reference("author"));
        }
        if post
            .category_id
            .is_some_and(|id| !tables.categories.contains_key(&id))
        {
            return Err(Tables::missing_reference("category"));
        }
        if post
            .location_id
            .is_some_and(|id| !tables.locations.contains_key(&id))
        {
            return Err(Tables::missing_reference("location"));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).ok_or(RepoError::NotFound)?;
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).map(|post| tables.post_view(post)))
    }

    async fn list_views(
        &self,
        query: PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<&Post> = tables
            .posts
            .values()
            .filter(|post| query.matches(post, tables.category_of(post)))
            .collect();
        posts.sort_by(|a, b| {
            b.pub_date
                .cmp(&a.pub_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let views = posts.into_iter().map(|post| tables.post_view(post)).collect();
        Ok(Page::from_vec(views, page))
    }

    async fn search_views(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError> {
        let tables = self.tables.read().await;
        let mut views: Vec<PostView> = tables
            .posts
            .values()
            .map(|post| tables.post_view(post))
            .filter(|view| filter.matches(view))
            .collect();
        views.sort_by(|a, b| {
            b.post
                .pub_date
                .cmp(&a.post.pub_date)
                .then_with(|| b.post.created_at.cmp(&a.post.created_at))
        });

        Ok(Page::from_vec(views, page))
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(Tables::missing_reference("post"));
        }
        if !tables.users.contains_key(&comment.author_id) {
            return Err(Tables::missing_reference("author"));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.comments.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by_key(|c| c.created_at);

        Ok(comments
            .into_iter()
            .map(|c| CommentView {
                author: tables.author(c.author_id),
                comment: c.clone(),
            })
            .collect())
    }
}
