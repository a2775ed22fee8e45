use chrono::Utc;
use sea_orm::{
    ConnAcquireErr, DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr,
};
use uuid::Uuid;

use blogicum_core::domain::{Category, Post, User};
use blogicum_core::error::RepoError;
use blogicum_core::filters::TaxonomyFilter;
use blogicum_core::ports::{BaseRepository, CategoryRepository, CommentRepository, UserRepository};

use super::entity::{category, comment, post, user};
use super::postgres_base::query_error;
use super::postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository, repositories,
};

fn user_model(username: &str) -> user::Model {
    let now = Utc::now();
    user::Model {
        id: Uuid::new_v4(),
        username: username.to_owned(),
        email: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        password_hash: "$argon2id$stub".to_owned(),
        is_staff: false,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn post_model(author_id: Uuid) -> post::Model {
    let now = Utc::now();
    post::Model {
        id: Uuid::new_v4(),
        title: "Test Post".to_owned(),
        text: "Content".to_owned(),
        pub_date: now.into(),
        author_id,
        location_id: None,
        category_id: None,
        image: None,
        is_published: true,
        created_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let model = post_model(Uuid::new_v4());
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
}

#[tokio::test]
async fn test_find_user_by_username() {
    let model = user_model("leo");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model.clone()]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let user: User = repo.find_by_username("leo").await.unwrap().unwrap();

    assert_eq!(user.id, model.id);
    assert_eq!(user.username, "leo");
}

#[tokio::test]
async fn test_save_user_upserts_and_returns_row() {
    let model = user_model("mia");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model.clone()]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let saved: User = repo.save(User::from(model.clone())).await.unwrap();

    assert_eq!(saved.id, model.id);
    assert_eq!(saved.username, "mia");
}

#[tokio::test]
async fn test_find_category_by_slug() {
    let now = Utc::now();
    let model = category::Model {
        id: Uuid::new_v4(),
        title: "Travel".to_owned(),
        description: "Trips".to_owned(),
        slug: "travel".to_owned(),
        is_published: false,
        created_at: now.into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);
    let category: Category = repo.find_by_slug("travel").await.unwrap().unwrap();

    assert_eq!(category.slug, "travel");
    assert!(!category.is_published);
}

#[tokio::test]
async fn test_delete_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_list_comments_with_authors() {
    let author = user_model("ann");
    let post = post_model(author.id);
    let first = comment::Model {
        id: Uuid::new_v4(),
        post_id: post.id,
        author_id: author.id,
        text: "Nice".to_owned(),
        created_at: Utc::now().into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![(first.clone(), author.clone())]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let comments = repo.list_for_post(post.id).await.unwrap();

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].comment.id, first.id);
    assert_eq!(comments[0].author.username, "ann");
}

#[tokio::test]
async fn test_repositories_share_one_connection() {
    let model = user_model("leo");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model.clone()]])
        .append_query_results([Vec::<category::Model>::new()])
        .into_connection();

    let repos = repositories(db);
    let user = repos.users.find_by_username("leo").await.unwrap().unwrap();
    assert_eq!(user.id, model.id);

    let category = repos.categories.find_by_slug("missing").await.unwrap();
    assert!(category.is_none());
}

#[tokio::test]
async fn test_search_categories_returns_matches() {
    let now = Utc::now();
    let model = category::Model {
        id: Uuid::new_v4(),
        title: "Travel".to_owned(),
        description: "Trips".to_owned(),
        slug: "travel".to_owned(),
        is_published: true,
        created_at: now.into(),
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);
    let filter = TaxonomyFilter {
        search: Some("trav".into()),
        is_published: Some(true),
    };
    let found = repo.search_categories(&filter).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].slug, "travel");
}

#[test]
fn test_connection_failures_map_to_connection_errors() {
    let refused = query_error(DbErr::Conn(RuntimeErr::Internal("refused".into())));
    assert!(matches!(refused, RepoError::Connection(_)));

    let exhausted = query_error(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout));
    assert!(matches!(exhausted, RepoError::Connection(_)));

    let other = query_error(DbErr::RecordNotFound("post".into()));
    assert!(matches!(other, RepoError::Query(_)));
}
