//! Staff management of categories and locations.

use std::sync::Arc;

use uuid::Uuid;

use super::ensure_staff;
use crate::domain::{Category, Location};
use crate::error::DomainError;
use crate::filters::TaxonomyFilter;
use crate::forms::{CategoryForm, LocationForm};
use crate::ports::{CategoryRepository, LocationRepository, UserRepository};

pub struct TaxonomyService {
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    locations: Arc<dyn LocationRepository>,
}

impl TaxonomyService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
        locations: Arc<dyn LocationRepository>,
    ) -> Self {
        Self {
            users,
            categories,
            locations,
        }
    }

    pub async fn list_categories(
        &self,
        actor: Uuid,
        filter: &TaxonomyFilter,
    ) -> Result<Vec<Category>, DomainError> {
        self.ensure_staff(actor).await?;
        Ok(self.categories.search_categories(filter).await?)
    }

    #[tracing::instrument(skip(self, form), fields(slug = %form.slug))]
    pub async fn create_category(
        &self,
        actor: Uuid,
        form: CategoryForm,
    ) -> Result<Category, DomainError> {
        self.ensure_staff(actor).await?;
        self.validate_category(&form, None).await?;

        let mut category = Category::new(String::new(), String::new(), String::new());
        form.apply(&mut category);
        Ok(self.categories.save(category).await?)
    }

    #[tracing::instrument(skip(self, form))]
    pub async fn update_category(
        &self,
        actor: Uuid,
        id: Uuid,
        form: CategoryForm,
    ) -> Result<Category, DomainError> {
        self.ensure_staff(actor).await?;
        let mut category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))?;
        self.validate_category(&form, Some(id)).await?;

        form.apply(&mut category);
        Ok(self.categories.save(category).await?)
    }

    pub async fn list_locations(
        &self,
        actor: Uuid,
        filter: &TaxonomyFilter,
    ) -> Result<Vec<Location>, DomainError> {
        self.ensure_staff(actor).await?;
        Ok(self.locations.search_locations(filter).await?)
    }

    #[tracing::instrument(skip(self, form))]
    pub async fn create_location(
        &self,
        actor: Uuid,
        form: LocationForm,
    ) -> Result<Location, DomainError> {
        self.ensure_staff(actor).await?;
        form.check().into_result()?;

        let mut location = Location::new(String::new());
        form.apply(&mut location);
        Ok(self.locations.save(location).await?)
    }

    #[tracing::instrument(skip(self, form))]
    pub async fn update_location(
        &self,
        actor: Uuid,
        id: Uuid,
        form: LocationForm,
    ) -> Result<Location, DomainError> {
        self.ensure_staff(actor).await?;
        let mut location = self
            .locations
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Location", id))?;
        form.check().into_result()?;

        form.apply(&mut location);
        Ok(self.locations.save(location).await?)
    }

    async fn ensure_staff(&self, actor: Uuid) -> Result<(), DomainError> {
        ensure_staff(self.users.as_ref(), actor).await
    }

    async fn validate_category(
        &self,
        form: &CategoryForm,
        current: Option<Uuid>,
    ) -> Result<(), DomainError> {
        let mut errors = form.check();
        if !errors.has("slug") {
            let taken = self
                .categories
                .find_by_slug(form.slug.trim())
                .await?
                .is_some_and(|other| Some(other.id) != current);
            if taken {
                errors.add("slug", "Category with this slug already exists.");
            }
        }
        errors.into_result()
    }
}
