//! Posts, comments and profiles.

use chrono::Utc;
use uuid::Uuid;

use super::{Repositories, validate_post_form};
use crate::domain::{Category, Comment, CommentView, Post, PostView, User};
use crate::error::{DomainError, RepoError, ValidationErrors};
use crate::forms::{CommentForm, ConfirmForm, PostForm, ProfileForm};
use crate::pagination::{Page, PageRequest};
use crate::visibility::{PostQuery, PostScope, can_view};

const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// A post page: the post and its comments.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: PostView,
    pub comments: Vec<CommentView>,
}

pub struct BlogService {
    repos: Repositories,
    per_page: u64,
}

impl BlogService {
    pub fn new(repos: Repositories, per_page: u64) -> Self {
        Self {
            repos,
            per_page: per_page.max(1),
        }
    }

    pub fn page_request(&self, raw: Option<&str>) -> PageRequest {
        PageRequest::parse(raw, self.per_page)
    }

    /// Home page: every publicly visible post.
    #[tracing::instrument(skip(self))]
    pub async fn index(&self, page: Option<&str>) -> Result<Page<PostView>, DomainError> {
        let posts = self
            .repos
            .posts
            .list_views(PostQuery::published(), self.page_request(page))
            .await?;
        Ok(posts)
    }

    /// Publicly visible posts of a published category.
    #[tracing::instrument(skip(self))]
    pub async fn category_posts(
        &self,
        slug: &str,
        page: Option<&str>,
    ) -> Result<(Category, Page<PostView>), DomainError> {
        let category = self
            .repos
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_published)
            .ok_or_else(|| DomainError::not_found("Category", slug))?;

        let posts = self
            .repos
            .posts
            .list_views(
                PostQuery::published().in_category(category.id),
                self.page_request(page),
            )
            .await?;

        Ok((category, posts))
    }

    /// A user's posts. Owners also see their drafts and scheduled posts.
    #[tracing::instrument(skip(self))]
    pub async fn profile(
        &self,
        username: &str,
        viewer: Option<Uuid>,
        page: Option<&str>,
    ) -> Result<(User, Page<PostView>), DomainError> {
        let user = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", username))?;

        let scope = if viewer == Some(user.id) {
            PostScope::All
        } else {
            PostScope::published_now()
        };
        let query = PostQuery::published().by_author(user.id).with_scope(scope);
        let posts = self
            .repos
            .posts
            .list_views(query, self.page_request(page))
            .await?;

        Ok((user, posts))
    }

    /// A single post with its comments. Hidden posts look missing to
    /// everyone except their author.
    #[tracing::instrument(skip(self))]
    pub async fn post_detail(
        &self,
        post_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<PostDetail, DomainError> {
        let post = self.viewable_post(post_id, viewer).await?;
        let comments = self.repos.comments.list_for_post(post_id).await?;
        Ok(PostDetail { post, comments })
    }

    #[tracing::instrument(skip(self, form), fields(title = %form.title))]
    pub async fn create_post(&self, author_id: Uuid, form: PostForm) -> Result<Post, DomainError> {
        validate_post_form(&self.repos, &form).await?;
        let post = self.repos.posts.save(form.into_post(author_id)).await?;
        tracing::info!(post_id = %post.id, "Post created");
        Ok(post)
    }

    /// The post as its author is about to edit it.
    pub async fn post_for_edit(&self, post_id: Uuid, caller: Uuid) -> Result<PostView, DomainError> {
        self.owned_post(post_id, caller).await?;
        self.repos
            .posts
            .find_view(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    #[tracing::instrument(skip(self, form))]
    pub async fn edit_post(
        &self,
        post_id: Uuid,
        caller: Uuid,
        form: PostForm,
    ) -> Result<Post, DomainError> {
        let mut post = self.owned_post(post_id, caller).await?;
        validate_post_form(&self.repos, &form).await?;
        form.apply(&mut post);
        Ok(self.repos.posts.save(post).await?)
    }

    /// Deletion confirmation step.
    pub async fn post_for_delete(
        &self,
        post_id: Uuid,
        caller: Uuid,
    ) -> Result<PostView, DomainError> {
        self.post_for_edit(post_id, caller).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_post(
        &self,
        post_id: Uuid,
        caller: Uuid,
        confirm: ConfirmForm,
    ) -> Result<(), DomainError> {
        self.owned_post(post_id, caller).await?;
        confirm.check().into_result()?;
        self.repos.posts.delete(post_id).await?;
        tracing::info!(%post_id, "Post deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self, form))]
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        caller: Uuid,
        form: CommentForm,
    ) -> Result<CommentView, DomainError> {
        self.viewable_post(post_id, Some(caller)).await?;
        form.check().into_result()?;
        let comment = Comment::new(post_id, caller, form.text);
        let comment = self.repos.comments.save(comment).await?;
        self.comment_view(comment).await
    }

    pub async fn comment_for_edit(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        caller: Uuid,
    ) -> Result<CommentView, DomainError> {
        let comment = self.owned_comment(post_id, comment_id, caller).await?;
        self.comment_view(comment).await
    }

    /// Deletion confirmation step for a comment.
    pub async fn comment_for_delete(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        caller: Uuid,
    ) -> Result<CommentView, DomainError> {
        let comment = self.owned_comment(post_id, comment_id, caller).await?;
        self.comment_view(comment).await
    }

    #[tracing::instrument(skip(self, form))]
    pub async fn edit_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        caller: Uuid,
        form: CommentForm,
    ) -> Result<CommentView, DomainError> {
        let mut comment = self.owned_comment(post_id, comment_id, caller).await?;
        form.check().into_result()?;
        comment.text = form.text;
        let comment = self.repos.comments.save(comment).await?;
        self.comment_view(comment).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        caller: Uuid,
        confirm: ConfirmForm,
    ) -> Result<(), DomainError> {
        self.owned_comment(post_id, comment_id, caller).await?;
        confirm.check().into_result()?;
        self.repos.comments.delete(comment_id).await?;
        Ok(())
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.repos
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Unauthorized)
    }

    #[tracing::instrument(skip(self, form))]
    pub async fn edit_profile(&self, caller: Uuid, form: ProfileForm) -> Result<User, DomainError> {
        let mut user = self.current_user(caller).await?;

        let mut errors = form.check();
        if !errors.has("username") {
            let taken = self
                .repos
                .users
                .find_by_username(form.username.trim())
                .await?
                .is_some_and(|other| other.id != user.id);
            if taken {
                errors.add("username", USERNAME_TAKEN);
            }
        }
        errors.into_result()?;

        form.apply(&mut user);
        match self.repos.users.save(user).await {
            Ok(user) => Ok(user),
            Err(RepoError::Constraint(_)) => {
                let mut errors = ValidationErrors::new();
                errors.add("username", USERNAME_TAKEN);
                Err(DomainError::Validation(errors))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn viewable_post(
        &self,
        post_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<PostView, DomainError> {
        self.repos
            .posts
            .find_view(post_id)
            .await?
            .filter(|view| can_view(&view.post, view.category.as_ref(), viewer, Utc::now()))
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    async fn owned_post(&self, post_id: Uuid, caller: Uuid) -> Result<Post, DomainError> {
        let post = self
            .repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        if !post.is_authored_by(caller) {
            return Err(DomainError::NotAuthor("post"));
        }
        Ok(post)
    }

    async fn owned_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        caller: Uuid,
    ) -> Result<Comment, DomainError> {
        if self.repos.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("Post", post_id));
        }
        let comment = self
            .repos
            .comments
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.post_id == post_id)
            .ok_or_else(|| DomainError::not_found("Comment", comment_id))?;

        if !comment.is_authored_by(caller) {
            return Err(DomainError::NotAuthor("comment"));
        }
        Ok(comment)
    }

    /// Attach the author as currently stored, not as named in a token.
    async fn comment_view(&self, comment: Comment) -> Result<CommentView, DomainError> {
        let author = self
            .repos
            .users
            .find_by_id(comment.author_id)
            .await?
            .ok_or(DomainError::Unauthorized)?
            .author();
        Ok(CommentView { comment, author })
    }
}
