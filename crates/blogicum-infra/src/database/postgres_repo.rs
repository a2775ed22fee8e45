//! PostgreSQL repository implementations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::{Condition, Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use blogicum_core::domain::{Author, Category, CommentView, Location, PostView, User};
use blogicum_core::error::RepoError;
use blogicum_core::filters::{PostFilter, TaxonomyFilter};
use blogicum_core::pagination::{Page, PageRequest};
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use blogicum_core::services::Repositories;
use blogicum_core::visibility::{PostQuery, PostScope};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// Build every repository on one connection pool.
pub fn repositories(db: DbConn) -> Repositories {
    let db = Arc::new(db);
    Repositories {
        users: Arc::new(PostgresUserRepository::new(db.clone())),
        categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
        locations: Arc::new(PostgresLocationRepository::new(db.clone())),
        posts: Arc::new(PostgresPostRepository::new(db.clone())),
        comments: Arc::new(PostgresCommentRepository::new(db)),
    }
}

/// `LOWER(table.column) LIKE '%needle%'`. Qualified so joined tables with
/// the same column names stay unambiguous.
fn ilike<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((column.entity_name(), column))))
        .like(format!("%{}%", needle.to_lowercase()))
}

fn published_filter<E: EntityTrait, C: ColumnTrait>(
    select: Select<E>,
    column: C,
    filter: &TaxonomyFilter,
) -> Select<E> {
    match filter.is_published {
        Some(flag) => select.filter(column.eq(flag)),
        None => select,
    }
}

fn dedup(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.conn())
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(self.conn())
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn search_categories(
        &self,
        filter: &TaxonomyFilter,
    ) -> Result<Vec<Category>, RepoError> {
        let mut select = published_filter(
            CategoryEntity::find().order_by_desc(category::Column::CreatedAt),
            category::Column::IsPublished,
            filter,
        );
        if let Some(q) = filter.term() {
            select = select.filter(
                Condition::any()
                    .add(ilike(category::Column::Title, q))
                    .add(ilike(category::Column::Description, q)),
            );
        }

        let result = select.all(self.conn()).await.map_err(query_error)?;
        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn search_locations(
        &self,
        filter: &TaxonomyFilter,
    ) -> Result<Vec<Location>, RepoError> {
        let mut select = published_filter(
            LocationEntity::find().order_by_desc(location::Column::CreatedAt),
            location::Column::IsPublished,
            filter,
        );
        if let Some(q) = filter.term() {
            select = select.filter(ilike(location::Column::Name, q));
        }

        let result = select.all(self.conn()).await.map_err(query_error)?;
        Ok(result.into_iter().map(Into::into).collect())
    }
}

impl PostgresPostRepository {
    async fn fetch_page(
        &self,
        select: Select<PostEntity>,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError> {
        let select = select
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::CreatedAt);

        let total = select.clone().count(self.conn()).await.map_err(query_error)?;
        let number = page.resolve(total);
        let models = select
            .paginate(self.conn(), page.per_page)
            .fetch_page(number - 1)
            .await
            .map_err(query_error)?;

        let views = self.load_views(models).await?;
        Ok(Page::new(views, number, page.per_page, total))
    }

    /// Resolve authors, categories, locations and comment counts for a batch
    /// of posts with one query per relation.
    async fn load_views(&self, models: Vec<post::Model>) -> Result<Vec<PostView>, RepoError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let author_ids = dedup(models.iter().map(|m| m.author_id).collect());
        let category_ids = dedup(models.iter().filter_map(|m| m.category_id).collect());
        let location_ids = dedup(models.iter().filter_map(|m| m.location_id).collect());

        let authors: HashMap<Uuid, Author> = UserEntity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(self.conn())
            .await
            .map_err(query_error)?
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    Author {
                        id: u.id,
                        username: u.username,
                    },
                )
            })
            .collect();

        let categories: HashMap<Uuid, Category> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            CategoryEntity::find()
                .filter(category::Column::Id.is_in(category_ids))
                .all(self.conn())
                .await
                .map_err(query_error)?
                .into_iter()
                .map(|c| (c.id, c.into()))
                .collect()
        };

        let locations: HashMap<Uuid, Location> = if location_ids.is_empty() {
            HashMap::new()
        } else {
            LocationEntity::find()
                .filter(location::Column::Id.is_in(location_ids))
                .all(self.conn())
                .await
                .map_err(query_error)?
                .into_iter()
                .map(|l| (l.id, l.into()))
                .collect()
        };

        let counts: HashMap<Uuid, i64> = CommentEntity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(Expr::col(comment::Column::Id).count(), "comment_count")
            .filter(comment::Column::PostId.is_in(post_ids))
            .group_by(comment::Column::PostId)
            .into_tuple::<(Uuid, i64)>()
            .all(self.conn())
            .await
            .map_err(query_error)?
            .into_iter()
            .collect();

        Ok(models
            .into_iter()
            .map(|m| PostView {
                author: authors.get(&m.author_id).cloned().unwrap_or(Author {
                    id: m.author_id,
                    username: String::new(),
                }),
                category: m.category_id.and_then(|id| categories.get(&id).cloned()),
                location: m.location_id.and_then(|id| locations.get(&id).cloned()),
                comment_count: counts.get(&m.id).copied().unwrap_or(0).max(0) as u64,
                post: m.into(),
            })
            .collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(query_error)?
        else {
            return Ok(None);
        };

        Ok(self.load_views(vec![model]).await?.pop())
    }

    async fn list_views(
        &self,
        query: PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError> {
        let mut select = PostEntity::find();
        if let Some(author_id) = query.author_id {
            select = select.filter(post::Column::AuthorId.eq(author_id));
        }
        if let Some(category_id) = query.category_id {
            select = select.filter(post::Column::CategoryId.eq(category_id));
        }
        if let PostScope::Published { now } = query.scope {
            select = select
                .inner_join(CategoryEntity)
                .filter(post::Column::IsPublished.eq(true))
                .filter(category::Column::IsPublished.eq(true))
                .filter(post::Column::PubDate.lte(now));
        }
        self.fetch_page(select, page).await
    }

    async fn search_views(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError> {
        let mut select = PostEntity::find();
        if let Some(flag) = filter.is_published {
            select = select.filter(post::Column::IsPublished.eq(flag));
        }
        if let Some(author_id) = filter.author_id {
            select = select.filter(post::Column::AuthorId.eq(author_id));
        }
        if let Some(category_id) = filter.category_id {
            select = select.filter(post::Column::CategoryId.eq(category_id));
        }
        if let Some(location_id) = filter.location_id {
            select = select.filter(post::Column::LocationId.eq(location_id));
        }
        if let Some(q) = filter.term() {
            select = select
                .join(JoinType::InnerJoin, post::Relation::Author.def())
                .join(JoinType::LeftJoin, post::Relation::Category.def())
                .join(JoinType::LeftJoin, post::Relation::Location.def())
                .filter(
                    Condition::any()
                        .add(ilike(post::Column::Title, q))
                        .add(ilike(post::Column::Text, q))
                        .add(ilike(user::Column::Username, q))
                        .add(ilike(category::Column::Title, q))
                        .add(ilike(location::Column::Name, q)),
                );
        }

        self.fetch_page(select, page).await
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .find_also_related(UserEntity)
            .all(self.conn())
            .await
            .map_err(query_error)?;

        Ok(rows
            .into_iter()
            .map(|(comment, author)| CommentView {
                author: author.map(|u| User::from(u).author()).unwrap_or(Author {
                    id: comment.author_id,
                    username: String::new(),
                }),
                comment: comment.into(),
            })
            .collect())
    }
}
