use super::{MAX_FIELD_LENGTH, MAX_SLUG_LENGTH, is_valid_slug, max_length, require};
use crate::domain::{Category, Location};
use crate::error::ValidationErrors;

#[derive(Debug, Clone, Default)]
pub struct CategoryForm {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
}

impl CategoryForm {
    pub fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if require(&mut errors, "title", &self.title) {
            max_length(&mut errors, "title", &self.title, MAX_FIELD_LENGTH);
        }
        require(&mut errors, "description", &self.description);
        if require(&mut errors, "slug", &self.slug) {
            if !is_valid_slug(self.slug.trim()) {
                errors.add(
                    "slug",
                    "Enter a valid slug consisting of Latin letters, numbers, underscores or hyphens.",
                );
            }
            max_length(&mut errors, "slug", self.slug.trim(), MAX_SLUG_LENGTH);
        }
        errors
    }

    pub fn apply(self, category: &mut Category) {
        category.title = self.title.trim().to_string();
        category.description = self.description;
        category.slug = self.slug.trim().to_string();
        category.is_published = self.is_published;
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocationForm {
    pub name: String,
    pub is_published: bool,
}

impl LocationForm {
    pub fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if require(&mut errors, "name", &self.name) {
            max_length(&mut errors, "name", &self.name, MAX_FIELD_LENGTH);
        }
        errors
    }

    pub fn apply(self, location: &mut Location) {
        location.name = self.name.trim().to_string();
        location.is_published = self.is_published;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_slug_rules() {
        let mut form = CategoryForm {
            title: "Travel".into(),
            description: "Trips and places".into(),
            slug: "travel notes".into(),
            is_published: true,
        };
        assert!(form.check().has("slug"));

        form.slug = "travel-notes".into();
        assert!(form.check().is_empty());
    }

    #[test]
    fn test_location_requires_name() {
        assert!(LocationForm::default().check().has("name"));
    }
}
