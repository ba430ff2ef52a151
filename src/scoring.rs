use serde::Serialize;
use thiserror::Error;

use crate::models::SupervisionItem;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("score {0} is outside the valid range 1-5")]
    InvalidScore(i32),
}

/// Five-tier qualitative grade, ordered weakest to strongest so that
/// derived `Ord` matches rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Category {
    #[serde(rename = "Dha'if")]
    Dhaif,
    Maqbul,
    Jayyid,
    #[serde(rename = "Jayyid Jiddan")]
    JayyidJiddan,
    Mumtaz,
}

impl Category {
    pub fn from_percentage(percentage: i32) -> Category {
        match percentage {
            p if p >= 90 => Category::Mumtaz,
            p if p >= 80 => Category::JayyidJiddan,
            p if p >= 70 => Category::Jayyid,
            p if p >= 60 => Category::Maqbul,
            _ => Category::Dhaif,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Mumtaz => "Mumtaz",
            Category::JayyidJiddan => "Jayyid Jiddan",
            Category::Jayyid => "Jayyid",
            Category::Maqbul => "Maqbul",
            Category::Dhaif => "Dha'if",
        }
    }

    /// Display hue used by presentation layers.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Mumtaz => "green",
            Category::JayyidJiddan => "teal",
            Category::Jayyid => "blue",
            Category::Maqbul => "amber",
            Category::Dhaif => "red",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Category::Mumtaz => "Sangat direkomendasikan untuk kenaikan jenjang",
            Category::JayyidJiddan => "Direkomendasikan untuk kenaikan jenjang",
            Category::Jayyid => "Dipertimbangkan naik jenjang setelah pembinaan lanjutan",
            Category::Maqbul => "Perlu pembinaan sebelum kenaikan jenjang",
            Category::Dhaif => "Perlu pembinaan intensif",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub total_score: i32,
    pub max_score: i32,
    pub percentage: i32,
    pub category: Category,
}

/// Aggregates a set of scored items. Only answered indicators count toward
/// the denominator, so a partial supervision is not penalized for indicators
/// the supervisor skipped. The empty set is valid and yields 0% / Dha'if.
pub fn aggregate(items: &[SupervisionItem]) -> Result<Aggregate, ScoreError> {
    let mut total = 0i32;
    for item in items {
        if !(1..=5).contains(&item.score) {
            return Err(ScoreError::InvalidScore(item.score));
        }
        total += item.score;
    }

    let max = 5 * items.len() as i32;
    let percentage = percentage_of(total, max);

    Ok(Aggregate {
        total_score: total,
        max_score: max,
        percentage,
        category: Category::from_percentage(percentage),
    })
}

/// Round-half-up percentage in exact integer arithmetic.
pub fn percentage_of(total: i32, max: i32) -> i32 {
    if max == 0 {
        return 0;
    }
    (200 * total + max) / (2 * max)
}

pub fn score_label(score: i32) -> Result<&'static str, ScoreError> {
    match score {
        5 => Ok("Sangat Baik"),
        4 => Ok("Baik"),
        3 => Ok("Cukup"),
        2 => Ok("Kurang"),
        1 => Ok("Sangat Kurang"),
        other => Err(ScoreError::InvalidScore(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(score: i32) -> SupervisionItem {
        SupervisionItem {
            category_number: 1,
            indicator_number: 1,
            score,
            note: None,
        }
    }

    #[test]
    fn worked_example_matches() {
        let items: Vec<_> = [5, 4, 5, 3].into_iter().map(item).collect();
        let agg = aggregate(&items).unwrap();
        assert_eq!(agg.total_score, 17);
        assert_eq!(agg.max_score, 20);
        assert_eq!(agg.percentage, 85);
        assert_eq!(agg.category, Category::JayyidJiddan);
    }

    #[test]
    fn empty_set_is_valid() {
        let agg = aggregate(&[]).unwrap();
        assert_eq!(agg.total_score, 0);
        assert_eq!(agg.max_score, 0);
        assert_eq!(agg.percentage, 0);
        assert_eq!(agg.category, Category::Dhaif);
    }

    #[test]
    fn single_item_hits_maqbul_floor() {
        let agg = aggregate(&[item(3)]).unwrap();
        assert_eq!(agg.total_score, 3);
        assert_eq!(agg.max_score, 5);
        assert_eq!(agg.percentage, 60);
        assert_eq!(agg.category, Category::Maqbul);
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        assert_eq!(aggregate(&[item(0)]), Err(ScoreError::InvalidScore(0)));
        assert_eq!(aggregate(&[item(6)]), Err(ScoreError::InvalidScore(6)));
    }

    #[test]
    fn category_thresholds_are_inclusive_lower_bounds() {
        assert_eq!(Category::from_percentage(90), Category::Mumtaz);
        assert_eq!(Category::from_percentage(89), Category::JayyidJiddan);
        assert_eq!(Category::from_percentage(80), Category::JayyidJiddan);
        assert_eq!(Category::from_percentage(79), Category::Jayyid);
        assert_eq!(Category::from_percentage(70), Category::Jayyid);
        assert_eq!(Category::from_percentage(69), Category::Maqbul);
        assert_eq!(Category::from_percentage(60), Category::Maqbul);
        assert_eq!(Category::from_percentage(59), Category::Dhaif);
    }

    #[test]
    fn category_is_monotonic_in_percentage() {
        let mut previous = Category::from_percentage(0);
        for p in 1..=100 {
            let current = Category::from_percentage(p);
            assert!(current >= previous, "rank dropped at {p}");
            previous = current;
        }
    }

    #[test]
    fn half_up_rounding_at_exact_boundary() {
        // 25/40 = 62.5% rounds up, not to even
        assert_eq!(percentage_of(25, 40), 63);
        assert_eq!(percentage_of(5, 40), 13); // 12.5
        assert_eq!(percentage_of(12, 40), 30);
    }

    #[test]
    fn percentage_stays_in_range_and_zero_only_when_empty() {
        for scores in [vec![1], vec![1, 1, 1, 1], vec![5; 12], vec![2, 5, 3]] {
            let items: Vec<_> = scores.into_iter().map(item).collect();
            let agg = aggregate(&items).unwrap();
            assert!(agg.percentage >= 1 && agg.percentage <= 100);
            assert!(agg.total_score > 0);
        }
    }

    #[test]
    fn recompute_is_idempotent() {
        let items: Vec<_> = [4, 4, 2, 5, 1].into_iter().map(item).collect();
        assert_eq!(aggregate(&items).unwrap(), aggregate(&items).unwrap());
    }

    #[test]
    fn score_labels_cover_the_scale() {
        assert_eq!(score_label(5).unwrap(), "Sangat Baik");
        assert_eq!(score_label(3).unwrap(), "Cukup");
        assert_eq!(score_label(1).unwrap(), "Sangat Kurang");
        assert_eq!(score_label(0), Err(ScoreError::InvalidScore(0)));
    }

    #[test]
    fn every_category_has_display_metadata() {
        for category in [
            Category::Mumtaz,
            Category::JayyidJiddan,
            Category::Jayyid,
            Category::Maqbul,
            Category::Dhaif,
        ] {
            assert!(!category.color().is_empty());
            assert!(!category.recommendation().is_empty());
        }
    }
}
