//! Domain to wire conversions.

use blogicum_core::Page;
use blogicum_core::filters::{PostFilter, TaxonomyFilter};
use blogicum_core::domain::{Author, Category, CommentView, Location, PostView, User};
use blogicum_core::forms::{
    CategoryForm, CommentForm, ConfirmForm, LocationForm, PasswordChangeForm, PostForm,
    ProfileForm,
};
use blogicum_shared::dto::{
    AdminPostQuery, AuthorResponse, CategoryRequest, CategoryResponse, CommentRequest,
    CommentResponse, ConfirmRequest, ListQuery, LocationRequest, LocationResponse, PageResponse,
    PasswordChangeRequest, PostRequest, PostResponse, ProfileRequest, UserResponse,
};

pub fn author(author: Author) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username,
    }
}

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        is_staff: user.is_staff,
        date_joined: user.created_at,
    }
}

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title,
        description: category.description,
        slug: category.slug,
        is_published: category.is_published,
        created_at: category.created_at,
    }
}

pub fn location(location: Location) -> LocationResponse {
    LocationResponse {
        id: location.id,
        name: location.name,
        is_published: location.is_published,
        created_at: location.created_at,
    }
}

pub fn post(view: PostView) -> PostResponse {
    let PostView {
        post,
        author: post_author,
        category: post_category,
        location: post_location,
        comment_count,
    } = view;

    PostResponse {
        id: post.id,
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        author: author(post_author),
        category: post_category.map(category),
        location: post_location.map(location),
        image: post.image,
        is_published: post.is_published,
        created_at: post.created_at,
        comment_count,
    }
}

pub fn comment_view(view: CommentView) -> CommentResponse {
    let CommentView { comment, author: comment_author } = view;

    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        author: author(comment_author),
        text: comment.text,
        created_at: comment.created_at,
    }
}

pub fn page<T, U>(page: Page<T>, f: impl FnMut(T) -> U) -> PageResponse<U> {
    let has_next = page.has_next();
    let has_previous = page.has_previous();
    let page = page.map(f);

    PageResponse {
        items: page.items,
        number: page.number,
        num_pages: page.num_pages,
        per_page: page.per_page,
        total_items: page.total_items,
        has_next,
        has_previous,
    }
}

pub fn post_form(req: PostRequest) -> PostForm {
    PostForm {
        title: req.title,
        text: req.text,
        pub_date: req.pub_date,
        category_id: req.category,
        location_id: req.location,
        image: req.image,
        is_published: req.is_published,
    }
}

pub fn comment_form(req: CommentRequest) -> CommentForm {
    CommentForm { text: req.text }
}

/// A missing or unreadable body counts as "not confirmed".
pub fn confirm_form(req: Option<ConfirmRequest>) -> ConfirmForm {
    ConfirmForm {
        confirm: req.unwrap_or_default().confirm,
    }
}

pub fn profile_form(req: ProfileRequest) -> ProfileForm {
    ProfileForm {
        username: req.username,
        email: req.email,
        first_name: req.first_name,
        last_name: req.last_name,
    }
}

pub fn password_change_form(req: PasswordChangeRequest) -> PasswordChangeForm {
    PasswordChangeForm {
        old_password: req.old_password,
        new_password1: req.new_password1,
        new_password2: req.new_password2,
    }
}

pub fn taxonomy_filter(query: ListQuery) -> TaxonomyFilter {
    TaxonomyFilter {
        search: query.search,
        is_published: query.is_published,
    }
}

pub fn post_filter(query: AdminPostQuery) -> PostFilter {
    PostFilter {
        search: query.search,
        is_published: query.is_published,
        author_id: query.author,
        category_id: query.category,
        location_id: query.location,
    }
}

pub fn category_form(req: CategoryRequest) -> CategoryForm {
    CategoryForm {
        title: req.title,
        description: req.description,
        slug: req.slug,
        is_published: req.is_published,
    }
}

pub fn location_form(req: LocationRequest) -> LocationForm {
    LocationForm {
        name: req.name,
        is_published: req.is_published,
    }
}
