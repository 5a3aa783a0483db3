// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Ordered template selection for canonical targets.
///
/// Rules keep their configuration document order because selection is
/// first-match-wins: more specific templates are declared earlier and an
/// overlapping predicate declared later must not shadow them.
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

use crate::{
    axis::{SubtagPattern, Subtags},
    error::Error,
};

/// One template path and the predicates that select it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRule {
    /// Path of the template to render.
    pub path:       String,
    /// Predicate list; any subset match selects the path.
    pub predicates: Vec<SubtagPattern>
}

/// Insertion-ordered template rules.
///
/// Deserialized from the configuration's `template` mapping with the
/// document order preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateRules {
    rules: Vec<TemplateRule>
}

impl TemplateRules {
    /// Builds rules from an explicit ordered list.
    pub fn new(rules: Vec<TemplateRule>) -> Self {
        Self {
            rules
        }
    }

    /// Number of template paths.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when no rules are configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &TemplateRule> {
        self.rules.iter()
    }

    /// Selects the template for `subtags`, `None` when no rule matches.
    ///
    /// Rules are evaluated in declaration order and within one rule the
    /// predicates in declaration order; the first subset match wins. An
    /// empty predicate matches every target, so a catch-all declared first
    /// shadows everything after it.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagmatrix::{SubtagPattern, Subtags, TemplateRule, TemplateRules};
    ///
    /// let rules = TemplateRules::new(vec![
    ///     TemplateRule {
    ///         path:       "slim.Dockerfile".to_owned(),
    ///         predicates: vec![SubtagPattern {
    ///             platform: Some("slim-bookworm".to_owned()),
    ///             ..SubtagPattern::default()
    ///         }]
    ///     },
    ///     TemplateRule {
    ///         path:       "default.Dockerfile".to_owned(),
    ///         predicates: vec![SubtagPattern::default()]
    ///     },
    /// ]);
    ///
    /// let slim = Subtags {
    ///     sdk:      "8.2.0".to_owned(),
    ///     python:   "3.10".to_owned(),
    ///     platform: "slim-bookworm".to_owned(),
    /// };
    /// assert_eq!(rules.select(&slim), Some("slim.Dockerfile"));
    /// ```
    pub fn select(&self, subtags: &Subtags) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.predicates.iter().any(|predicate| predicate.matches(subtags)))
            .map(|rule| rule.path.as_str())
    }

    /// Selects the template for a canonical target, treating a miss as an
    /// error.
    ///
    /// Generation cannot silently skip a target without producing an
    /// incomplete target set, so a miss is fatal there.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTemplateMatch`](Error::NoTemplateMatch) naming
    /// the canonical tag when no rule matches.
    pub fn select_required(&self, canonical: &str, subtags: &Subtags) -> Result<&str, Error> {
        self.select(subtags).ok_or_else(|| Error::NoTemplateMatch {
            tag: canonical.to_owned()
        })
    }
}

impl Serialize for TemplateRules {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut map = serializer.serialize_map(Some(self.rules.len()))?;
        for rule in &self.rules {
            map.serialize_entry(&rule.path, &rule.predicates)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TemplateRules {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>
    {
        struct RulesVisitor;

        impl<'de> Visitor<'de> for RulesVisitor {
            type Value = TemplateRules;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("a map of template path to predicate list")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>
            {
                let mut rules = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((path, predicates)) =
                    access.next_entry::<String, Vec<SubtagPattern>>()?
                {
                    rules.push(TemplateRule {
                        path,
                        predicates
                    });
                }
                Ok(TemplateRules {
                    rules
                })
            }
        }

        deserializer.deserialize_map(RulesVisitor)
    }
}
