//! Staff listing filters.
//!
//! Staff listings ignore visibility: they show every record and narrow it
//! down by a free-text search plus exact-match filters. Repositories must
//! agree with the `matches`/`admits` predicates defined here.

use uuid::Uuid;

use crate::domain::PostView;

/// Case-insensitive substring match.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn term(search: &Option<String>) -> Option<&str> {
    search.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Filter for the category and location listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonomyFilter {
    pub search: Option<String>,
    pub is_published: Option<bool>,
}

impl TaxonomyFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            is_published: None,
        }
    }

    /// The trimmed search term, if one was given.
    pub fn term(&self) -> Option<&str> {
        term(&self.search)
    }

    /// Whether a record with the given flag and searchable fields passes.
    pub fn admits(&self, is_published: bool, fields: &[&str]) -> bool {
        if self.is_published.is_some_and(|flag| flag != is_published) {
            return false;
        }
        self.term()
            .is_none_or(|q| fields.iter().any(|field| contains_ci(field, q)))
    }
}

/// Filter for the staff post listing. The search covers the title, text,
/// author username, category title and location name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub search: Option<String>,
    pub is_published: Option<bool>,
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
}

impl PostFilter {
    pub fn term(&self) -> Option<&str> {
        term(&self.search)
    }

    pub fn matches(&self, view: &PostView) -> bool {
        let post = &view.post;
        if self.is_published.is_some_and(|flag| flag != post.is_published)
            || self.author_id.is_some_and(|id| id != post.author_id)
            || self.category_id.is_some_and(|id| Some(id) != post.category_id)
            || self.location_id.is_some_and(|id| Some(id) != post.location_id)
        {
            return false;
        }

        let Some(q) = self.term() else {
            return true;
        };
        contains_ci(&post.title, q)
            || contains_ci(&post.text, q)
            || contains_ci(&view.author.username, q)
            || view.category.as_ref().is_some_and(|c| contains_ci(&c.title, q))
            || view.location.as_ref().is_some_and(|l| contains_ci(&l.name, q))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{Author, Category, Location, Post};

    fn view() -> PostView {
        let author = Author {
            id: Uuid::new_v4(),
            username: "Marina".into(),
        };
        let category = Category::new("Travel".into(), "Trips".into(), "travel".into());
        let location = Location::new("Kazan".into());
        let mut post = Post::new(author.id, "Summer".into(), "Hot days".into(), Utc::now());
        post.category_id = Some(category.id);
        post.location_id = Some(location.id);

        PostView {
            post,
            author,
            category: Some(category),
            location: Some(location),
            comment_count: 0,
        }
    }

    #[test]
    fn test_search_spans_related_names() {
        let view = view();
        for q in ["summer", "HOT", "marina", "trav", "kaz"] {
            let filter = PostFilter {
                search: Some(q.into()),
                ..Default::default()
            };
            assert!(filter.matches(&view), "{q}");
        }

        let miss = PostFilter {
            search: Some("winter".into()),
            ..Default::default()
        };
        assert!(!miss.matches(&view));
    }

    #[test]
    fn test_exact_filters() {
        let view = view();
        let drafts = PostFilter {
            is_published: Some(false),
            ..Default::default()
        };
        assert!(!drafts.matches(&view));

        let by_author = PostFilter {
            author_id: Some(view.author.id),
            location_id: view.post.location_id,
            ..Default::default()
        };
        assert!(by_author.matches(&view));

        let elsewhere = PostFilter {
            category_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(!elsewhere.matches(&view));
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let filter = TaxonomyFilter::search("   ");
        assert_eq!(filter.term(), None);
        assert!(filter.admits(true, &["anything"]));

        let hidden_only = TaxonomyFilter {
            is_published: Some(false),
            ..Default::default()
        };
        assert!(!hidden_only.admits(true, &["Travel"]));
        assert!(hidden_only.admits(false, &["Travel"]));
    }
}
