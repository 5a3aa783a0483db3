// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Subset-match pruning of matrix points.
///
/// Exclusion rules are evaluated against canonical subtags, never the raw
/// point, so rules written in canonical vocabulary also catch points that
/// reach the same canonical state through sentinel or alias substitution.
use crate::axis::{SubtagPattern, Subtags};

/// Returns `true` when any rule is a subset of `subtags`.
///
/// Every key/value pair of a matching rule is present with an equal value
/// in the canonical subtag map. An empty rule list excludes nothing; an
/// empty rule excludes everything.
///
/// # Examples
///
/// ```
/// use tagmatrix::{is_excluded, SubtagPattern, Subtags};
///
/// let subtags = Subtags {
///     sdk:      "8.2.0".to_owned(),
///     python:   "3.9".to_owned(),
///     platform: "slim-bookworm".to_owned(),
/// };
/// let rules = vec![SubtagPattern {
///     python: Some("3.9".to_owned()),
///     platform: Some("slim-bookworm".to_owned()),
///     ..SubtagPattern::default()
/// }];
/// assert!(is_excluded(&subtags, &rules));
/// ```
pub fn is_excluded(subtags: &Subtags, rules: &[SubtagPattern]) -> bool {
    rules.iter().any(|rule| rule.matches(subtags))
}

#[cfg(test)]
mod tests {
    use super::is_excluded;
    use crate::axis::{SubtagPattern, Subtags};

    fn subtags(python: &str, platform: &str) -> Subtags {
        Subtags {
            sdk:      "8.2.0".to_owned(),
            python:   python.to_owned(),
            platform: platform.to_owned()
        }
    }

    #[test]
    fn no_rules_exclude_nothing() {
        assert!(!is_excluded(&subtags("3.10", "bookworm"), &[]));
    }

    #[test]
    fn rule_must_match_every_constrained_axis() {
        let rules = vec![SubtagPattern {
            python: Some("3.9".to_owned()),
            platform: Some("slim-bookworm".to_owned()),
            ..SubtagPattern::default()
        }];

        assert!(is_excluded(&subtags("3.9", "slim-bookworm"), &rules));
        assert!(!is_excluded(&subtags("3.9", "bookworm"), &rules));
        assert!(!is_excluded(&subtags("3.10", "slim-bookworm"), &rules));
    }

    #[test]
    fn any_matching_rule_suffices() {
        let rules = vec![
            SubtagPattern {
                python: Some("3.8".to_owned()),
                ..SubtagPattern::default()
            },
            SubtagPattern {
                platform: Some("slim-bookworm".to_owned()),
                ..SubtagPattern::default()
            },
        ];

        assert!(is_excluded(&subtags("3.10", "slim-bookworm"), &rules));
    }

    #[test]
    fn empty_rule_excludes_everything() {
        let rules = vec![SubtagPattern::default()];
        assert!(is_excluded(&subtags("3.10", "bookworm"), &rules));
    }
}
