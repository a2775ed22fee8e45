//! # Blogicum Core
//!
//! The domain layer of the blog.
//! Entities, visibility rules, pagination, form validation and the use cases
//! built on top of the repository ports. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod filters;
pub mod forms;
pub mod pagination;
pub mod ports;
pub mod services;
pub mod visibility;

pub use error::{DomainError, RepoError, ValidationErrors};
pub use pagination::{Page, PageRequest};
