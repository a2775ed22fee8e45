//! Post visibility rules.
//!
//! A post is public when it is published, filed under a published category
//! and its publication date has passed. Its author sees it regardless.
//! Repositories translate [`PostQuery`] into their own predicates and must
//! agree with [`PostQuery::matches`].

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Post};

/// Whether anonymous readers and other users may see the post at `now`.
pub fn is_publicly_visible(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.is_published && category.is_some_and(|c| c.is_published) && post.pub_date <= now
}

/// Whether `viewer` may open the post at `now`.
pub fn can_view(
    post: &Post,
    category: Option<&Category>,
    viewer: Option<Uuid>,
    now: DateTime<Utc>,
) -> bool {
    viewer.is_some_and(|id| post.is_authored_by(id)) || is_publicly_visible(post, category, now)
}

/// Which posts a listing may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScope {
    /// Only publicly visible posts as of `now`.
    Published { now: DateTime<Utc> },
    /// Everything, including drafts and scheduled posts.
    All,
}

impl PostScope {
    pub fn published_now() -> Self {
        Self::Published { now: Utc::now() }
    }
}

/// A post listing: optional author/category restriction plus a scope.
/// Results are always ordered by `pub_date`, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostQuery {
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub scope: PostScope,
}

impl PostQuery {
    pub fn published() -> Self {
        Self {
            author_id: None,
            category_id: None,
            scope: PostScope::published_now(),
        }
    }

    pub fn by_author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_scope(mut self, scope: PostScope) -> Self {
        self.scope = scope;
        self
    }

    /// Evaluate the query against a single post and its resolved category.
    pub fn matches(&self, post: &Post, category: Option<&Category>) -> bool {
        if self.author_id.is_some_and(|id| post.author_id != id) {
            return false;
        }
        if self
            .category_id
            .is_some_and(|id| post.category_id != Some(id))
        {
            return false;
        }
        match self.scope {
            PostScope::Published { now } => is_publicly_visible(post, category, now),
            PostScope::All => true,
        }
    }
}
