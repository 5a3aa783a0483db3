//! Axis vocabulary shared by every stage of the tag pipeline.
//!
//! A build target is addressed along three fixed axes: the SDK version under
//! build, the Python runtime it ships, and the base platform variant. Axis
//! order is significant and defines the join order of composite tags.

use serde::{Deserialize, Serialize};

/// One dimension of the build matrix.
///
/// The variant order matches the join order of composite tags and must not
/// be rearranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,)]
#[serde(rename_all = "snake_case")]
pub enum Axis
{
    /// SDK version under build, e.g. `8.2.0`.
    Sdk,
    /// Python runtime version, e.g. `3.10`. Composed into tags with a
    /// `python` prefix.
    Python,
    /// Base platform variant, e.g. `bookworm` or `slim-bookworm`.
    Platform,
}

impl Axis
{
    /// All axes in join order.
    pub const ALL: [Self; 3] = [Self::Sdk, Self::Python, Self::Platform];

    /// Returns the configuration key for this axis.
    pub fn as_str(self,) -> &'static str
    {
        match self {
            Self::Sdk => "sdk",
            Self::Python => "python",
            Self::Platform => "platform",
        }
    }

    /// Formats a subtag value the way it appears inside a composite tag.
    ///
    /// Python versions are stored bare (`3.10`) and gain their `python`
    /// prefix only here; the other axes compose verbatim.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagmatrix::Axis;
    ///
    /// assert_eq!(Axis::Python.format_value("3.10",), "python3.10");
    /// assert_eq!(Axis::Platform.format_value("bookworm",), "bookworm");
    /// ```
    pub fn format_value(self, value: &str,) -> String
    {
        match self {
            Self::Python => format!("python{value}"),
            Self::Sdk | Self::Platform => value.to_owned(),
        }
    }
}

impl std::fmt::Display for Axis
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_,>,) -> std::fmt::Result
    {
        f.write_str(self.as_str(),)
    }
}

/// One point of the build matrix, one value per axis.
///
/// `None` is the sentinel meaning "unset": the axis is dropped from the raw
/// tag and replaced by its configured default during canonicalization.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct MatrixPoint
{
    /// SDK axis value, sentinel when `None`.
    pub sdk:      Option<String,>,
    /// Python axis value, sentinel when `None`.
    pub python:   Option<String,>,
    /// Platform axis value, sentinel when `None`.
    pub platform: Option<String,>,
}

impl MatrixPoint
{
    /// Returns the point's value for `axis`, `None` for the sentinel.
    pub fn get(&self, axis: Axis,) -> Option<&str,>
    {
        match axis {
            Axis::Sdk => self.sdk.as_deref(),
            Axis::Python => self.python.as_deref(),
            Axis::Platform => self.platform.as_deref(),
        }
    }
}

/// Fully resolved subtag map with one concrete value per axis.
///
/// Instances only exist after default and alias substitution, so no field
/// can hold the sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct Subtags
{
    /// Canonical SDK version.
    pub sdk:      String,
    /// Canonical Python version, stored without the `python` prefix.
    pub python:   String,
    /// Canonical platform variant.
    pub platform: String,
}

impl Subtags
{
    /// Returns the canonical value for `axis`.
    pub fn get(&self, axis: Axis,) -> &str
    {
        match axis {
            Axis::Sdk => &self.sdk,
            Axis::Python => &self.python,
            Axis::Platform => &self.platform,
        }
    }
}

/// Partial subtag map used for exclusion rules, template predicates, and
/// contracted default overrides.
///
/// Unknown axis names are rejected during deserialization so malformed rule
/// shapes surface as configuration errors instead of silently matching
/// nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(deny_unknown_fields)]
pub struct SubtagPattern
{
    /// Required SDK value, if constrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdk:      Option<String,>,
    /// Required Python value, if constrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python:   Option<String,>,
    /// Required platform value, if constrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String,>,
}

impl SubtagPattern
{
    /// Returns the constrained value for `axis`, `None` when the axis is
    /// unconstrained.
    pub fn get(&self, axis: Axis,) -> Option<&str,>
    {
        match axis {
            Axis::Sdk => self.sdk.as_deref(),
            Axis::Python => self.python.as_deref(),
            Axis::Platform => self.platform.as_deref(),
        }
    }

    /// Returns `true` when the pattern constrains no axis at all.
    ///
    /// An empty pattern is a valid template predicate that matches every
    /// target.
    pub fn is_empty(&self,) -> bool
    {
        Axis::ALL.iter().all(|axis| self.get(*axis,).is_none(),)
    }

    /// Returns `true` when every constrained axis matches `subtags` exactly.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagmatrix::{Subtags, SubtagPattern};
    ///
    /// let subtags = Subtags {
    ///     sdk:      "8.2.0".to_owned(),
    ///     python:   "3.10".to_owned(),
    ///     platform: "slim-bookworm".to_owned(),
    /// };
    /// let rule = SubtagPattern {
    ///     platform: Some("slim-bookworm".to_owned(),),
    ///     ..SubtagPattern::default()
    /// };
    /// assert!(rule.matches(&subtags,));
    /// ```
    pub fn matches(&self, subtags: &Subtags,) -> bool
    {
        Axis::ALL
            .iter()
            .all(|axis| self.get(*axis,).is_none_or(|value| value == subtags.get(*axis,),),)
    }
}

#[cfg(test)]
mod tests
{
    use super::{Axis, MatrixPoint, SubtagPattern, Subtags};

    fn subtags() -> Subtags
    {
        Subtags {
            sdk:      "8.2.0".to_owned(),
            python:   "3.10".to_owned(),
            platform: "bookworm".to_owned(),
        }
    }

    #[test]
    fn axis_order_is_sdk_python_platform()
    {
        assert_eq!(Axis::ALL, [Axis::Sdk, Axis::Python, Axis::Platform]);
    }

    #[test]
    fn python_values_gain_prefix_when_formatted()
    {
        assert_eq!(Axis::Python.format_value("3.9",), "python3.9");
        assert_eq!(Axis::Sdk.format_value("8.2.0",), "8.2.0");
        assert_eq!(Axis::Platform.format_value("slim",), "slim");
    }

    #[test]
    fn matrix_point_reports_sentinel_as_none()
    {
        let point = MatrixPoint {
            sdk: Some("8.2".to_owned(),),
            ..MatrixPoint::default()
        };

        assert_eq!(point.get(Axis::Sdk,), Some("8.2"));
        assert_eq!(point.get(Axis::Python,), None);
        assert_eq!(point.get(Axis::Platform,), None);
    }

    #[test]
    fn empty_pattern_matches_everything()
    {
        let pattern = SubtagPattern::default();
        assert!(pattern.is_empty());
        assert!(pattern.matches(&subtags(),));
    }

    #[test]
    fn pattern_matches_only_on_exact_values()
    {
        let pattern = SubtagPattern {
            python: Some("3.10".to_owned(),),
            platform: Some("bookworm".to_owned(),),
            ..SubtagPattern::default()
        };
        assert!(pattern.matches(&subtags(),));

        let pattern = SubtagPattern {
            python: Some("3.9".to_owned(),),
            ..SubtagPattern::default()
        };
        assert!(!pattern.matches(&subtags(),));
    }

    #[test]
    fn pattern_rejects_unknown_axis_names()
    {
        let result = serde_yaml::from_str::<SubtagPattern,>("arch: arm64",);
        assert!(result.is_err());
    }

    #[test]
    fn pattern_deserializes_partial_maps()
    {
        let pattern: SubtagPattern =
            serde_yaml::from_str("platform: slim",).expect("expected pattern to deserialize",);
        assert_eq!(pattern.platform.as_deref(), Some("slim"));
        assert_eq!(pattern.sdk, None);
        assert_eq!(pattern.python, None);
    }

    #[test]
    fn subtags_lookup_follows_axis()
    {
        let subtags = subtags();
        assert_eq!(subtags.get(Axis::Sdk,), "8.2.0");
        assert_eq!(subtags.get(Axis::Python,), "3.10");
        assert_eq!(subtags.get(Axis::Platform,), "bookworm");
    }
}
