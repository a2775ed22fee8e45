//! Staff moderation of posts: every post regardless of visibility.

use uuid::Uuid;

use super::{Repositories, ensure_staff, validate_post_form};
use crate::domain::PostView;
use crate::error::DomainError;
use crate::filters::PostFilter;
use crate::forms::PostForm;
use crate::pagination::{Page, PageRequest};

/// Rows per page of the staff post listing.
pub const MODERATION_PER_PAGE: u64 = 100;

pub struct ModerationService {
    repos: Repositories,
}

impl ModerationService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_posts(
        &self,
        actor: Uuid,
        filter: &PostFilter,
        page: Option<&str>,
    ) -> Result<Page<PostView>, DomainError> {
        ensure_staff(self.repos.users.as_ref(), actor).await?;
        let page = PageRequest::parse(page, MODERATION_PER_PAGE);
        Ok(self.repos.posts.search_views(filter, page).await?)
    }

    /// Rewrite any post. The author stays unchanged.
    #[tracing::instrument(skip(self, form))]
    pub async fn update_post(
        &self,
        actor: Uuid,
        post_id: Uuid,
        form: PostForm,
    ) -> Result<PostView, DomainError> {
        ensure_staff(self.repos.users.as_ref(), actor).await?;
        let mut post = self
            .repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;
        validate_post_form(&self.repos, &form).await?;

        form.apply(&mut post);
        self.repos.posts.save(post).await?;
        tracing::info!(%post_id, %actor, "Post moderated");
        self.view(post_id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_post(&self, actor: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        ensure_staff(self.repos.users.as_ref(), actor).await?;
        if self.repos.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("Post", post_id));
        }
        self.repos.posts.delete(post_id).await?;
        tracing::info!(%post_id, %actor, "Post removed by staff");
        Ok(())
    }

    async fn view(&self, post_id: Uuid) -> Result<PostView, DomainError> {
        self.repos
            .posts
            .find_view(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }
}
