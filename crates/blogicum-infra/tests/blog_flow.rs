//! Acceptance tests for the blog use cases on top of the in-memory store.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use blogicum_core::DomainError;
use blogicum_core::domain::{Category, Location, User};
use blogicum_core::forms::{CommentForm, ConfirmForm, PostForm, ProfileForm};
use blogicum_core::ports::BaseRepository;
use blogicum_core::services::{BlogService, Repositories};
use blogicum_infra::InMemoryStore;

struct World {
    store: Arc<InMemoryStore>,
    blog: BlogService,
    repos: Repositories,
    category: Category,
    location: Location,
}

impl World {
    async fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let repos = store.repositories();
        let category = repos
            .categories
            .save(Category::new(
                "Travel".into(),
                "Trips".into(),
                "travel".into(),
            ))
            .await
            .unwrap();
        let location = repos
            .locations
            .save(Location::new("Kazan".into()))
            .await
            .unwrap();

        Self {
            blog: BlogService::new(repos.clone(), 10),
            store,
            repos,
            category,
            location,
        }
    }

    async fn user(&self, username: &str) -> User {
        self.repos
            .users
            .save(User::new(username.into(), "hash".into()))
            .await
            .unwrap()
    }

    fn form(&self, title: &str) -> PostForm {
        PostForm {
            title: title.into(),
            text: "Body".into(),
            pub_date: Some(Utc::now() - TimeDelta::minutes(1)),
            category_id: Some(self.category.id),
            location_id: Some(self.location.id),
            image: None,
            is_published: true,
        }
    }
}

fn titles(page: &blogicum_core::Page<blogicum_core::domain::PostView>) -> Vec<String> {
    page.items.iter().map(|v| v.post.title.clone()).collect()
}

#[tokio::test]
async fn index_hides_unpublished_future_and_hidden_category_posts() {
    let world = World::new().await;
    let author = world.user("author").await;

    world
        .blog
        .create_post(author.id, world.form("visible"))
        .await
        .unwrap();
    world
        .blog
        .create_post(
            author.id,
            PostForm {
                is_published: false,
                ..world.form("draft")
            },
        )
        .await
        .unwrap();
    world
        .blog
        .create_post(
            author.id,
            PostForm {
                pub_date: Some(Utc::now() + TimeDelta::days(1)),
                ..world.form("scheduled")
            },
        )
        .await
        .unwrap();

    let hidden = world
        .repos
        .categories
        .save(Category {
            is_published: false,
            ..Category::new("Hidden".into(), "Secret".into(), "hidden".into())
        })
        .await
        .unwrap();
    world
        .blog
        .create_post(
            author.id,
            PostForm {
                category_id: Some(hidden.id),
                ..world.form("in hidden category")
            },
        )
        .await
        .unwrap();

    let page = world.blog.index(None).await.unwrap();
    assert_eq!(titles(&page), vec!["visible".to_string()]);
    assert_eq!(page.total_items, 1);
}

#[tokio::test]
async fn index_is_paginated_newest_first() {
    let world = World::new().await;
    let author = world.user("author").await;

    for i in 0..12 {
        world
            .blog
            .create_post(
                author.id,
                PostForm {
                    pub_date: Some(Utc::now() - TimeDelta::hours(12 - i)),
                    ..world.form(&format!("post {i}"))
                },
            )
            .await
            .unwrap();
    }

    let first = world.blog.index(Some("1")).await.unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.items[0].post.title, "post 11");
    assert!(first.has_next());

    let second = world.blog.index(Some("2")).await.unwrap();
    assert_eq!(titles(&second), vec!["post 1".to_string(), "post 0".to_string()]);

    let beyond = world.blog.index(Some("40")).await.unwrap();
    assert_eq!(beyond.number, 2);
}

#[tokio::test]
async fn author_sees_own_hidden_posts_others_do_not() {
    let world = World::new().await;
    let author = world.user("author").await;
    let reader = world.user("reader").await;

    let draft = world
        .blog
        .create_post(
            author.id,
            PostForm {
                is_published: false,
                ..world.form("draft")
            },
        )
        .await
        .unwrap();

    let detail = world
        .blog
        .post_detail(draft.id, Some(author.id))
        .await
        .unwrap();
    assert_eq!(detail.post.post.id, draft.id);

    for viewer in [Some(reader.id), None] {
        let result = world.blog.post_detail(draft.id, viewer).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    let (_, own) = world.blog.profile("author", Some(author.id), None).await.unwrap();
    assert_eq!(titles(&own), vec!["draft".to_string()]);

    let (_, public) = world.blog.profile("author", Some(reader.id), None).await.unwrap();
    assert!(public.items.is_empty());
}

#[tokio::test]
async fn category_page_requires_published_category() {
    let world = World::new().await;
    let author = world.user("author").await;
    world
        .blog
        .create_post(author.id, world.form("trip"))
        .await
        .unwrap();

    let (category, page) = world.blog.category_posts("travel", None).await.unwrap();
    assert_eq!(category.id, world.category.id);
    assert_eq!(titles(&page), vec!["trip".to_string()]);

    let mut hidden = world.category.clone();
    hidden.is_published = false;
    world.repos.categories.save(hidden).await.unwrap();

    assert!(matches!(
        world.blog.category_posts("travel", None).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        world.blog.category_posts("nope", None).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn only_author_may_edit_or_delete_post() {
    let world = World::new().await;
    let author = world.user("author").await;
    let intruder = world.user("intruder").await;
    let post = world
        .blog
        .create_post(author.id, world.form("original"))
        .await
        .unwrap();

    let result = world
        .blog
        .edit_post(post.id, intruder.id, world.form("hacked"))
        .await;
    assert!(matches!(result, Err(DomainError::NotAuthor("post"))));

    let result = world
        .blog
        .delete_post(post.id, intruder.id, ConfirmForm { confirm: true })
        .await;
    assert!(matches!(result, Err(DomainError::NotAuthor("post"))));

    let edited = world
        .blog
        .edit_post(
            post.id,
            author.id,
            PostForm {
                is_published: false,
                ..world.form("edited")
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.title, "edited");
    assert_eq!(edited.author_id, author.id);

    let result = world
        .blog
        .delete_post(post.id, author.id, ConfirmForm { confirm: false })
        .await;
    assert!(matches!(result, Err(DomainError::Validation(e)) if e.has("confirm")));

    world
        .blog
        .delete_post(post.id, author.id, ConfirmForm { confirm: true })
        .await
        .unwrap();
    assert!(matches!(
        world.blog.post_detail(post.id, Some(author.id)).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn post_form_rejects_unknown_references() {
    let world = World::new().await;
    let author = world.user("author").await;

    let result = world
        .blog
        .create_post(
            author.id,
            PostForm {
                category_id: Some(Uuid::new_v4()),
                location_id: Some(Uuid::new_v4()),
                ..world.form("broken")
            },
        )
        .await;

    match result {
        Err(DomainError::Validation(errors)) => {
            assert!(errors.has("category"));
            assert!(errors.has("location"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn comments_lifecycle() {
    let world = World::new().await;
    let author = world.user("author").await;
    let commenter = world.user("commenter").await;
    let post = world
        .blog
        .create_post(author.id, world.form("post"))
        .await
        .unwrap();

    let comment = world
        .blog
        .add_comment(
            post.id,
            commenter.id,
            CommentForm {
                text: "First!".into(),
            },
        )
        .await
        .unwrap()
        .comment;

    let detail = world.blog.post_detail(post.id, None).await.unwrap();
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].author.username, "commenter");
    assert_eq!(detail.post.comment_count, 1);

    let result = world
        .blog
        .edit_comment(
            post.id,
            comment.id,
            author.id,
            CommentForm {
                text: "Not yours".into(),
            },
        )
        .await;
    assert!(matches!(result, Err(DomainError::NotAuthor("comment"))));

    let other_post = world
        .blog
        .create_post(author.id, world.form("other"))
        .await
        .unwrap();
    let result = world
        .blog
        .comment_for_edit(other_post.id, comment.id, commenter.id)
        .await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));

    let edited = world
        .blog
        .edit_comment(
            post.id,
            comment.id,
            commenter.id,
            CommentForm {
                text: "Edited".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.comment.text, "Edited");
    assert_eq!(edited.author.username, "commenter");

    world
        .blog
        .delete_comment(post.id, comment.id, commenter.id, ConfirmForm { confirm: true })
        .await
        .unwrap();
    let detail = world.blog.post_detail(post.id, None).await.unwrap();
    assert!(detail.comments.is_empty());
}

#[tokio::test]
async fn cannot_comment_on_hidden_post() {
    let world = World::new().await;
    let author = world.user("author").await;
    let reader = world.user("reader").await;
    let draft = world
        .blog
        .create_post(
            author.id,
            PostForm {
                is_published: false,
                ..world.form("draft")
            },
        )
        .await
        .unwrap();

    let form = CommentForm {
        text: "hello".into(),
    };
    assert!(matches!(
        world.blog.add_comment(draft.id, reader.id, form.clone()).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(world.blog.add_comment(draft.id, author.id, form).await.is_ok());
}

#[tokio::test]
async fn profile_edit_keeps_usernames_unique() {
    let world = World::new().await;
    let ann = world.user("ann").await;
    world.user("bob").await;

    let result = world
        .blog
        .edit_profile(
            ann.id,
            ProfileForm {
                username: "bob".into(),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(DomainError::Validation(e)) if e.has("username")));

    let updated = world
        .blog
        .edit_profile(
            ann.id,
            ProfileForm {
                username: "ann".into(),
                email: "ann@example.com".into(),
                first_name: "Ann".into(),
                last_name: "Lee".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.first_name, "Ann");

    let stored = BaseRepository::<User, Uuid>::find_by_id(world.store.as_ref(), ann.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.email, "ann@example.com");
}

#[tokio::test]
async fn comment_author_follows_profile_rename() {
    let world = World::new().await;
    let author = world.user("leo").await;
    let post = world
        .blog
        .create_post(author.id, world.form("post"))
        .await
        .unwrap();

    world
        .blog
        .edit_profile(
            author.id,
            ProfileForm {
                username: "leonard".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let view = world
        .blog
        .add_comment(
            post.id,
            author.id,
            CommentForm {
                text: "Renamed".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(view.author.username, "leonard");

    let pending = world
        .blog
        .comment_for_delete(post.id, view.comment.id, author.id)
        .await
        .unwrap();
    assert_eq!(pending.author.username, "leonard");
}
