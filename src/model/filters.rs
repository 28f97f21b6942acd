//! Query filters supplied per catalog request

use super::template::Difficulty;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordering applied to filtered templates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Value")]
pub enum SortBy {
    #[default]
    Popular,
    Rating,
    Trending,
    Recent,
    Name,
}

impl SortBy {
    /// Parse a sort key, falling back to `Popular` for anything unknown
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "rating" => SortBy::Rating,
            "trending" => SortBy::Trending,
            "recent" => SortBy::Recent,
            "name" => SortBy::Name,
            _ => SortBy::Popular,
        }
    }
}

/// Any non-string key (null, a number, ...) falls back to `Popular` too
impl From<Value> for SortBy {
    fn from(value: Value) -> Self {
        value.as_str().map(SortBy::parse).unwrap_or_default()
    }
}

/// Filter set for `CatalogEngine::get_filtered_templates`. Unset fields never
/// exclude anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateFilters {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub search_term: String,
    pub sort_by: SortBy,
    pub show_only_favorites: bool,
    pub show_only_verified: bool,
    pub difficulty: Option<Difficulty>,
    pub profession: Option<String>,
}

impl TemplateFilters {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn only_favorites(mut self) -> Self {
        self.show_only_favorites = true;
        self
    }

    pub fn only_verified(mut self) -> Self {
        self.show_only_verified = true;
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn profession(mut self, profession: impl Into<String>) -> Self {
        self.profession = Some(profession.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_sort_falls_back_to_popular() {
        let filters: TemplateFilters =
            serde_json::from_value(json!({"sortBy": "cheapest"})).unwrap();
        assert_eq!(filters.sort_by, SortBy::Popular);
        assert_eq!(SortBy::parse(" Trending "), SortBy::Trending);

        for key in [json!(null), json!(3), json!(["rating"])] {
            let filters: TemplateFilters =
                serde_json::from_value(json!({ "sortBy": key, "searchTerm": "viga" })).unwrap();
            assert_eq!(filters.sort_by, SortBy::Popular);
            assert_eq!(filters.search_term, "viga");
        }

        let filters: TemplateFilters =
            serde_json::from_value(json!({"sortBy": "Rating"})).unwrap();
        assert_eq!(filters.sort_by, SortBy::Rating);
    }

    #[test]
    fn test_empty_object_is_default_filter() {
        let filters: TemplateFilters = serde_json::from_value(json!({})).unwrap();
        assert_eq!(filters, TemplateFilters::default());
    }

    #[test]
    fn test_sort_serializes_lowercase() {
        assert_eq!(serde_json::to_value(SortBy::Recent).unwrap(), json!("recent"));
    }
}
