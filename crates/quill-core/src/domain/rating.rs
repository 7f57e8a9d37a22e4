use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::ValidationErrors;

/// The closed set of scores a rating may carry.
pub const RATING_VALUES: RangeInclusive<i32> = 1..=5;

/// Rating entity - one user's score for one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub value: i32,
    pub created_at: DateTime<Utc>,
}

/// A rating that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRating {
    pub post_id: i64,
    pub user_id: i64,
    pub value: i32,
    pub created_at: DateTime<Utc>,
}

impl NewRating {
    pub fn new(post_id: i64, user_id: i64, value: i32) -> Self {
        Self {
            post_id,
            user_id,
            value,
            created_at: Utc::now(),
        }
    }
}

/// Check a raw rating value, recording failures into `errors`.
///
/// A missing value fails both the presence and the inclusion rule.
pub fn check_value(value: Option<i64>, errors: &mut ValidationErrors) -> Option<i32> {
    let Some(value) = value else {
        errors.add("value", "can't be blank");
        errors.add("value", "is not included in the list");
        return None;
    };

    match i32::try_from(value) {
        Ok(value) if RATING_VALUES.contains(&value) => Some(value),
        _ => {
            errors.add("value", "is not included in the list");
            None
        }
    }
}

/// Count and sum of a post's rating values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingTotals {
    pub count: i64,
    pub sum: i64,
}

impl RatingTotals {
    /// Mean value rounded to two decimals, half away from zero.
    ///
    /// Computed on integers so that exact halves (e.g. 17/8 = 2.125) round up
    /// regardless of floating point representation. `None` when unrated.
    pub fn average(&self) -> Option<f64> {
        if self.count <= 0 {
            return None;
        }
        let (sum, count) = (i128::from(self.sum), i128::from(self.count));
        let doubled = sum * 200;
        let hundredths = if doubled >= 0 {
            (doubled + count) / (2 * count)
        } else {
            (doubled - count) / (2 * count)
        };
        Some(hundredths as f64 / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(values: &[i64]) -> RatingTotals {
        RatingTotals {
            count: values.len() as i64,
            sum: values.iter().sum(),
        }
    }

    #[test]
    fn test_average_of_single_rating() {
        assert_eq!(totals(&[4]).average(), Some(4.0));
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        assert_eq!(totals(&[2, 4]).average(), Some(3.0));
        assert_eq!(totals(&[1, 2, 2]).average(), Some(1.67));
        assert_eq!(totals(&[5, 5, 4]).average(), Some(4.67));
        assert_eq!(totals(&[1, 1, 2]).average(), Some(1.33));
    }

    #[test]
    fn test_average_rounds_exact_halves_up() {
        // 17 / 8 = 2.125
        assert_eq!(totals(&[1, 2, 2, 2, 2, 2, 2, 4]).average(), Some(2.13));
    }

    #[test]
    fn test_average_of_nothing() {
        assert_eq!(RatingTotals::default().average(), None);
    }

    #[test]
    fn test_check_value_accepts_allowed_set() {
        for value in 1..=5 {
            let mut errors = ValidationErrors::new();
            assert_eq!(check_value(Some(value), &mut errors), Some(value as i32));
            assert!(errors.is_empty());
        }
    }

    #[test]
    fn test_check_value_rejects_out_of_range() {
        for value in [0, 6, -1, i64::MAX] {
            let mut errors = ValidationErrors::new();
            assert_eq!(check_value(Some(value), &mut errors), None);
            assert_eq!(errors.messages(), ["Value is not included in the list"]);
        }
    }

    #[test]
    fn test_check_value_missing() {
        let mut errors = ValidationErrors::new();
        assert_eq!(check_value(None, &mut errors), None);
        assert_eq!(
            errors.messages(),
            ["Value can't be blank", "Value is not included in the list"]
        );
    }
}
