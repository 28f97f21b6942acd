//! Catalog filtering, sorting and facet counting
//!
//! Everything here is a pure function of its inputs.

use crate::model::{
    CalculationTemplate, CategoryDefinition, SortBy, TemplateCategory, TemplateFilters,
    TemplateSubcategory,
};
use std::cmp::Ordering;

// ─────────────────────────────────────────────────────────────────────────────
// Filtering
// ─────────────────────────────────────────────────────────────────────────────

/// Apply every set filter field, in pipeline order. The result is always a
/// subsequence of `templates`.
pub fn filter_templates<'a>(
    templates: &'a [CalculationTemplate],
    filters: &TemplateFilters,
) -> Vec<&'a CalculationTemplate> {
    let mut result: Vec<&CalculationTemplate> = templates.iter().collect();

    if filters.show_only_verified {
        result.retain(|t| t.verified);
    }

    if let Some(category) = &filters.category {
        result.retain(|t| &t.category == category);
    }

    // Applied literally, without inferring a category
    if let Some(subcategory) = &filters.subcategory {
        result.retain(|t| t.subcategory.as_ref() == Some(subcategory));
    }

    if filters.show_only_favorites {
        result.retain(|t| t.is_favorite);
    }

    if let Some(difficulty) = filters.difficulty {
        result.retain(|t| t.difficulty == difficulty);
    }

    if let Some(profession) = &filters.profession {
        result.retain(|t| t.profession.iter().any(|p| p == profession));
    }

    let term = filters.search_term.trim().to_lowercase();
    if !term.is_empty() {
        result.retain(|t| t.matches_search(&term));
    }

    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Sorting
// ─────────────────────────────────────────────────────────────────────────────

/// Stable sort by the requested key
pub fn sort_templates(templates: &mut [&CalculationTemplate], sort_by: SortBy) {
    templates.sort_by(|a, b| compare_by(sort_by, a, b));
}

/// Ordering of two templates under `sort_by`. `Equal` means the sort keeps
/// their input order.
pub fn compare_by(sort_by: SortBy, a: &CalculationTemplate, b: &CalculationTemplate) -> Ordering {
    match sort_by {
        SortBy::Popular => b.usage_count.cmp(&a.usage_count),
        SortBy::Rating => b.rating.total_cmp(&a.rating),
        SortBy::Trending => b
            .trending
            .cmp(&a.trending)
            .then_with(|| b.usage_count.cmp(&a.usage_count)),
        SortBy::Recent => b.last_updated.cmp(&a.last_updated),
        SortBy::Name => compare_names(&a.name, &b.name),
    }
}

/// Spanish-aware name ordering: case and accents are ignored first, `ñ`
/// sorts between `n` and `o`, then the raw strings break ties.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        match c {
            'á' | 'à' | 'ä' | 'â' => key.push('a'),
            'é' | 'è' | 'ë' | 'ê' => key.push('e'),
            'í' | 'ì' | 'ï' | 'î' => key.push('i'),
            'ó' | 'ò' | 'ö' | 'ô' => key.push('o'),
            'ú' | 'ù' | 'ü' | 'û' => key.push('u'),
            // after every "n?" pair, before "o"
            'ñ' => key.push_str("n\u{7f}"),
            other => key.push(other),
        }
    }
    key
}

// ─────────────────────────────────────────────────────────────────────────────
// Facets
// ─────────────────────────────────────────────────────────────────────────────

/// Category facets over verified templates only. Search, difficulty,
/// profession and favorites never affect the counts.
///
/// Configured categories come first in their configured order; categories
/// found only in the data follow in first-seen order.
pub fn compute_facets(
    templates: &[CalculationTemplate],
    known: &[CategoryDefinition],
) -> Vec<TemplateCategory> {
    let mut facets: Vec<TemplateCategory> = known
        .iter()
        .map(|def| TemplateCategory {
            id: def.id.clone(),
            name: def.name.clone(),
            count: 0,
            subcategories: def
                .subcategories
                .iter()
                .map(|sub| TemplateSubcategory {
                    id: sub.id.clone(),
                    name: sub.name.clone(),
                    count: 0,
                })
                .collect(),
        })
        .collect();

    for template in templates.iter().filter(|t| t.verified) {
        let idx = match facets.iter().position(|f| f.id == template.category) {
            Some(idx) => idx,
            None => {
                facets.push(TemplateCategory {
                    id: template.category.clone(),
                    name: template.category.clone(),
                    count: 0,
                    subcategories: Vec::new(),
                });
                facets.len() - 1
            }
        };

        let facet = &mut facets[idx];
        facet.count += 1;

        if let Some(sub_id) = &template.subcategory {
            match facet.subcategories.iter_mut().find(|s| &s.id == sub_id) {
                Some(sub) => sub.count += 1,
                None => facet.subcategories.push(TemplateSubcategory {
                    id: sub_id.clone(),
                    name: sub_id.clone(),
                    count: 1,
                }),
            }
        }
    }

    facets
}

/// Sorted unique tags across `templates`
pub fn all_tags(templates: &[CalculationTemplate]) -> Vec<String> {
    sorted_unique(templates.iter().flat_map(|t| t.tags.iter()))
}

/// Sorted unique profession tags across `templates`
pub fn all_professions(templates: &[CalculationTemplate]) -> Vec<String> {
    sorted_unique(templates.iter().flat_map(|t| t.profession.iter()))
}

fn sorted_unique<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut result: Vec<String> = values.cloned().collect();
    result.sort_by(|a, b| compare_names(a, b));
    result.dedup();
    result
}
