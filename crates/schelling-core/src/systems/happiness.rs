//! Happiness Rule
//!
//! An agent is happy when enough of its neighbors share its group.

use serde::{Deserialize, Serialize};

use super::census::Census;

/// Which inequality compares the same-group count to the threshold share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// `same >= threshold * total`
    #[default]
    AtLeast,
    /// `same > threshold * total`, except that an agent with no neighbors
    /// is still happy.
    Strict,
}

/// `same >= threshold * (same + different)`.
///
/// An agent with no neighbors at all is happy (`0 >= 0`).
pub fn is_happy(same: u32, different: u32, threshold: f64) -> bool {
    let total = (same + different) as f64;
    same as f64 >= threshold * total
}

/// The configured rule: a threshold in `[0, 1]` and a comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HappinessRule {
    pub threshold: f64,
    pub comparison: Comparison,
}

impl HappinessRule {
    pub fn new(threshold: f64, comparison: Comparison) -> Self {
        Self {
            threshold,
            comparison,
        }
    }

    pub fn is_happy(&self, census: Census) -> bool {
        match self.comparison {
            Comparison::AtLeast => is_happy(census.same, census.different, self.threshold),
            Comparison::Strict => {
                if census.total() == 0 {
                    return true;
                }
                census.same as f64 > self.threshold * census.total() as f64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn census(same: u32, different: u32) -> Census {
        Census { same, different }
    }

    #[test]
    fn test_at_least_boundary() {
        assert!(is_happy(1, 3, 0.25));
        assert!(!is_happy(0, 4, 0.25));
        assert!(is_happy(2, 2, 0.5));
        assert!(!is_happy(1, 2, 0.5));
    }

    #[test]
    fn test_no_neighbors_is_happy() {
        assert!(is_happy(0, 0, 1.0));
        assert!(HappinessRule::new(1.0, Comparison::AtLeast).is_happy(census(0, 0)));
        assert!(HappinessRule::new(1.0, Comparison::Strict).is_happy(census(0, 0)));
    }

    #[test]
    fn test_threshold_zero_always_happy_with_at_least() {
        let rule = HappinessRule::new(0.0, Comparison::AtLeast);
        for different in 0..9 {
            assert!(rule.is_happy(census(0, different)));
        }
    }

    #[test]
    fn test_threshold_one_requires_homogeneous_neighbors() {
        let rule = HappinessRule::new(1.0, Comparison::AtLeast);
        assert!(rule.is_happy(census(5, 0)));
        assert!(!rule.is_happy(census(7, 1)));
    }

    #[test]
    fn test_strict_excludes_equality() {
        let rule = HappinessRule::new(0.5, Comparison::Strict);
        assert!(!rule.is_happy(census(2, 2)));
        assert!(rule.is_happy(census(3, 2)));

        let zero = HappinessRule::new(0.0, Comparison::Strict);
        assert!(!zero.is_happy(census(0, 3)));
        assert!(zero.is_happy(census(1, 3)));
    }
}
