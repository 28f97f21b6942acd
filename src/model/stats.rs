//! Aggregate statistics over a template list

use super::template::CalculationTemplate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStats {
    pub total: usize,
    pub verified_count: usize,
    pub avg_rating: f64,
    pub total_usage: u64,
    pub trending_count: usize,
    pub popular_count: usize,
}

impl TemplateStats {
    /// Compute stats for `templates`. An empty list has `avg_rating` 0.
    pub fn from_templates<'a, I>(templates: I) -> Self
    where
        I: IntoIterator<Item = &'a CalculationTemplate>,
    {
        let mut stats = TemplateStats::default();
        let mut rating_sum = 0.0;

        for template in templates {
            stats.total += 1;
            rating_sum += template.rating;
            stats.total_usage += template.usage_count;
            if template.verified {
                stats.verified_count += 1;
            }
            if template.trending {
                stats.trending_count += 1;
            }
            if template.popular {
                stats.popular_count += 1;
            }
        }

        if stats.total > 0 {
            stats.avg_rating = rating_sum / stats.total as f64;
        }
        stats
    }
}
