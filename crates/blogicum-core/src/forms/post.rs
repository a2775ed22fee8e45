use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{MAX_FIELD_LENGTH, max_length, require};
use crate::domain::Post;
use crate::error::ValidationErrors;

/// Post creation/edit form. The author always comes from the session.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub title: String,
    pub text: String,
    pub pub_date: Option<DateTime<Utc>>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub image: Option<String>,
    pub is_published: bool,
}

impl PostForm {
    pub fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if require(&mut errors, "title", &self.title) {
            max_length(&mut errors, "title", &self.title, MAX_FIELD_LENGTH);
        }
        require(&mut errors, "text", &self.text);
        if self.pub_date.is_none() {
            errors.add("pub_date", super::REQUIRED);
        }
        if self.category_id.is_none() {
            errors.add("category", super::REQUIRED);
        }
        if let Some(image) = &self.image {
            max_length(&mut errors, "image", image, MAX_FIELD_LENGTH);
        }

        errors
    }

    /// Copy the form fields onto `post`. Call only after validation passed.
    pub fn apply(self, post: &mut Post) {
        post.title = self.title.trim().to_string();
        post.text = self.text;
        if let Some(pub_date) = self.pub_date {
            post.pub_date = pub_date;
        }
        post.category_id = self.category_id;
        post.location_id = self.location_id;
        post.image = self.image.filter(|s| !s.trim().is_empty());
        post.is_published = self.is_published;
    }

    /// Build a new post for `author_id`. Call only after validation passed.
    pub fn into_post(self, author_id: Uuid) -> Post {
        let mut post = Post::new(
            author_id,
            String::new(),
            String::new(),
            self.pub_date.unwrap_or_else(Utc::now),
        );
        self.apply(&mut post);
        post
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PostForm {
        PostForm {
            title: "Summer in Kazan".into(),
            text: "Long story".into(),
            pub_date: Some(Utc::now()),
            category_id: Some(Uuid::new_v4()),
            location_id: None,
            image: None,
            is_published: true,
        }
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        assert!(valid().check().is_empty());
    }

    #[test]
    fn test_missing_fields_are_reported_together() {
        let errors = PostForm::default().check();
        assert!(errors.has("title"));
        assert!(errors.has("text"));
        assert!(errors.has("pub_date"));
        assert!(errors.has("category"));
        assert!(!errors.has("location"));
    }

    #[test]
    fn test_into_post_keeps_fields() {
        let form = PostForm {
            image: Some("  ".into()),
            is_published: false,
            ..valid()
        };
        let author = Uuid::new_v4();
        let category = form.category_id;
        let post = form.into_post(author);

        assert_eq!(post.author_id, author);
        assert_eq!(post.category_id, category);
        assert_eq!(post.image, None);
        assert!(!post.is_published);
    }
}
