//! Registration, login, password changes and staff-only management.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};

use blogicum_core::DomainError;
use blogicum_core::filters::{PostFilter, TaxonomyFilter};
use blogicum_core::forms::{
    CategoryForm, LocationForm, LoginForm, PasswordChangeForm, PostForm, RegistrationForm,
};
use blogicum_core::ports::TokenService;
use blogicum_core::services::{
    AccountService, BlogService, ModerationService, Repositories, TaxonomyService,
};
use blogicum_infra::{Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenService};

struct Setup {
    repos: Repositories,
    tokens: Arc<JwtTokenService>,
    accounts: AccountService,
    taxonomy: TaxonomyService,
    moderation: ModerationService,
    blog: BlogService,
}

fn setup() -> Setup {
    let store = Arc::new(InMemoryStore::new());
    let repos = store.repositories();
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "integration-test-secret".to_string(),
        ..JwtConfig::default()
    }));

    Setup {
        accounts: AccountService::new(
            repos.users.clone(),
            Arc::new(Argon2PasswordService::default()),
            tokens.clone(),
        ),
        taxonomy: TaxonomyService::new(
            repos.users.clone(),
            repos.categories.clone(),
            repos.locations.clone(),
        ),
        moderation: ModerationService::new(repos.clone()),
        blog: BlogService::new(repos.clone(), 10),
        repos,
        tokens,
    }
}

fn registration(username: &str, password: &str) -> RegistrationForm {
    RegistrationForm {
        username: username.to_string(),
        password1: password.to_string(),
        password2: password.to_string(),
    }
}

fn category(slug: &str) -> CategoryForm {
    CategoryForm {
        title: "Travel".to_string(),
        description: "Trips and journeys".to_string(),
        slug: slug.to_string(),
        is_published: true,
    }
}

#[tokio::test]
async fn register_then_login_issues_valid_tokens() {
    let s = setup();

    let session = s
        .accounts
        .register(registration("leo", "correct-horse"))
        .await
        .unwrap();
    assert_eq!(session.user.username, "leo");
    assert_ne!(session.user.password_hash, "correct-horse");

    let claims = s.tokens.validate_token(&session.access_token).unwrap();
    assert_eq!(claims.user_id, session.user.id);
    assert_eq!(claims.username, "leo");

    let login = s
        .accounts
        .login(LoginForm {
            username: "leo".to_string(),
            password: "correct-horse".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(login.user.id, session.user.id);
    assert_eq!(login.expires_in, 24 * 3600);
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_user() {
    let s = setup();
    s.accounts
        .register(registration("leo", "correct-horse"))
        .await
        .unwrap();

    for (username, password) in [("leo", "wrong-horse"), ("nobody", "correct-horse")] {
        let result = s
            .accounts
            .login(LoginForm {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await;
        assert!(matches!(result, Err(DomainError::Unauthorized)));
    }
}

#[tokio::test]
async fn duplicate_username_is_a_field_error() {
    let s = setup();
    s.accounts
        .register(registration("leo", "correct-horse"))
        .await
        .unwrap();

    let result = s
        .accounts
        .register(registration("leo", "another-pass"))
        .await;
    assert!(matches!(result, Err(DomainError::Validation(e)) if e.has("username")));
}

#[tokio::test]
async fn taxonomy_requires_staff() {
    let s = setup();
    let session = s
        .accounts
        .register(registration("leo", "correct-horse"))
        .await
        .unwrap();

    let result = s
        .taxonomy
        .create_category(session.user.id, category("travel"))
        .await;
    assert!(matches!(result, Err(DomainError::Forbidden)));

    let staff = s
        .accounts
        .ensure_staff_account("leo", "ignored-password")
        .await
        .unwrap();
    assert!(staff.is_staff);
    assert_eq!(staff.id, session.user.id);

    let created = s
        .taxonomy
        .create_category(staff.id, category("travel"))
        .await
        .unwrap();
    assert_eq!(created.slug, "travel");
    assert!(s.repos.categories.find_by_slug("travel").await.unwrap().is_some());
}

#[tokio::test]
async fn staff_bootstrap_creates_missing_account() {
    let s = setup();

    let admin = s
        .accounts
        .ensure_staff_account("admin", "bootstrap-pass")
        .await
        .unwrap();
    assert!(admin.is_staff);

    let session = s
        .accounts
        .login(LoginForm {
            username: "admin".to_string(),
            password: "bootstrap-pass".to_string(),
        })
        .await
        .unwrap();
    assert!(session.user.is_staff);
}

#[tokio::test]
async fn category_slugs_stay_unique() {
    let s = setup();
    let admin = s
        .accounts
        .ensure_staff_account("admin", "bootstrap-pass")
        .await
        .unwrap();

    let first = s
        .taxonomy
        .create_category(admin.id, category("travel"))
        .await
        .unwrap();
    let other = s
        .taxonomy
        .create_category(admin.id, category("food"))
        .await
        .unwrap();

    let result = s
        .taxonomy
        .create_category(admin.id, category("travel"))
        .await;
    assert!(matches!(result, Err(DomainError::Validation(e)) if e.has("slug")));

    let result = s
        .taxonomy
        .update_category(admin.id, other.id, category("travel"))
        .await;
    assert!(matches!(result, Err(DomainError::Validation(e)) if e.has("slug")));

    let renamed = s
        .taxonomy
        .update_category(
            admin.id,
            first.id,
            CategoryForm {
                title: "Journeys".to_string(),
                ..category("travel")
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.title, "Journeys");
}

#[tokio::test]
async fn locations_are_searchable_by_name() {
    let s = setup();
    let admin = s
        .accounts
        .ensure_staff_account("admin", "bootstrap-pass")
        .await
        .unwrap();

    for name in ["Kazan", "Moscow", "Kaliningrad"] {
        s.taxonomy
            .create_location(
                admin.id,
                LocationForm {
                    name: name.to_string(),
                    is_published: true,
                },
            )
            .await
            .unwrap();
    }

    let found = s
        .taxonomy
        .list_locations(admin.id, &TaxonomyFilter::search("ka"))
        .await
        .unwrap();
    let mut names: Vec<_> = found.into_iter().map(|l| l.name).collect();
    names.sort();
    assert_eq!(names, vec!["Kaliningrad".to_string(), "Kazan".to_string()]);
}

#[tokio::test]
async fn locations_filter_by_published_flag() {
    let s = setup();
    let admin = s
        .accounts
        .ensure_staff_account("admin", "bootstrap-pass")
        .await
        .unwrap();

    for (name, is_published) in [("Kazan", true), ("Atlantis", false)] {
        s.taxonomy
            .create_location(
                admin.id,
                LocationForm {
                    name: name.to_string(),
                    is_published,
                },
            )
            .await
            .unwrap();
    }

    let hidden = TaxonomyFilter {
        is_published: Some(false),
        ..Default::default()
    };
    let found = s.taxonomy.list_locations(admin.id, &hidden).await.unwrap();
    let names: Vec<_> = found.into_iter().map(|l| l.name).collect();
    assert_eq!(names, vec!["Atlantis".to_string()]);
}

#[tokio::test]
async fn password_change_requires_old_password() {
    let s = setup();
    let session = s
        .accounts
        .register(registration("leo", "correct-horse"))
        .await
        .unwrap();

    let result = s
        .accounts
        .change_password(
            session.user.id,
            PasswordChangeForm {
                old_password: "wrong-horse".to_string(),
                new_password1: "battery-staple".to_string(),
                new_password2: "battery-staple".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(DomainError::Validation(e)) if e.has("old_password")));

    s.accounts
        .change_password(
            session.user.id,
            PasswordChangeForm {
                old_password: "correct-horse".to_string(),
                new_password1: "battery-staple".to_string(),
                new_password2: "battery-staple".to_string(),
            },
        )
        .await
        .unwrap();

    let login = |password: &str| LoginForm {
        username: "leo".to_string(),
        password: password.to_string(),
    };
    assert!(matches!(
        s.accounts.login(login("correct-horse")).await,
        Err(DomainError::Unauthorized)
    ));
    let relogin = s.accounts.login(login("battery-staple")).await.unwrap();
    assert_eq!(relogin.user.id, session.user.id);
}

fn post(title: &str, is_published: bool) -> PostForm {
    PostForm {
        title: title.to_string(),
        text: "Body".to_string(),
        pub_date: Some(Utc::now() - TimeDelta::minutes(1)),
        category_id: None,
        location_id: None,
        image: None,
        is_published,
    }
}

#[tokio::test]
async fn staff_moderate_every_post() {
    let s = setup();
    let admin = s
        .accounts
        .ensure_staff_account("admin", "bootstrap-pass")
        .await
        .unwrap();
    let writer = s
        .accounts
        .register(registration("marina", "correct-horse"))
        .await
        .unwrap()
        .user;

    let draft = s
        .blog
        .create_post(writer.id, post("Draft notes", false))
        .await
        .unwrap();
    s.blog
        .create_post(admin.id, post("Announcement", true))
        .await
        .unwrap();

    let result = s
        .moderation
        .list_posts(writer.id, &PostFilter::default(), None)
        .await;
    assert!(matches!(result, Err(DomainError::Forbidden)));

    let all = s
        .moderation
        .list_posts(admin.id, &PostFilter::default(), None)
        .await
        .unwrap();
    assert_eq!(all.total_items, 2);

    let by_username = PostFilter {
        search: Some("MARINA".to_string()),
        ..Default::default()
    };
    let found = s
        .moderation
        .list_posts(admin.id, &by_username, None)
        .await
        .unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].post.id, draft.id);

    let published = PostFilter {
        is_published: Some(true),
        author_id: Some(writer.id),
        ..Default::default()
    };
    let none = s
        .moderation
        .list_posts(admin.id, &published, None)
        .await
        .unwrap();
    assert!(none.items.is_empty());

    let updated = s
        .moderation
        .update_post(admin.id, draft.id, post("Reviewed notes", true))
        .await
        .unwrap();
    assert_eq!(updated.post.title, "Reviewed notes");
    assert_eq!(updated.author.id, writer.id);

    s.moderation.delete_post(admin.id, draft.id).await.unwrap();
    let result = s.moderation.delete_post(admin.id, draft.id).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}
