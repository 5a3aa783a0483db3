//! Configuration document types describing the build matrix.
//!
//! The types in this module mirror the structure of the YAML (or JSON)
//! documents consumed by the CLI. Documents arrive fully expanded: any
//! placeholder substitution against the SDK version under build happens in
//! the workflow that produces the document, never here. Helper methods
//! derive the total default map and canonical alias lookups that the
//! resolver relies on.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    axis::{Axis, SubtagPattern},
    error::{self, Error},
    template::TemplateRules,
};

/// Tag used when every axis of a matrix point is unset.
const DEFAULT_TAG: &str = "latest";

fn default_tag() -> String
{
    DEFAULT_TAG.to_owned()
}

/// Root configuration document describing one build matrix.
///
/// # Examples
///
/// ```
/// use tagmatrix::MatrixConfig;
///
/// let yaml = r#"
/// matrix:
///   sdk: ["8.2.0", "8.2", "8"]
///   python: ["3.10"]
///   platform: ["bookworm"]
/// defaults:
///   sdk: "8.2.0"
///   python: "3.10"
///   platform: "bookworm"
/// "#;
/// let config: MatrixConfig = tagmatrix::parse_config(yaml,).expect("valid configuration",);
/// assert_eq!(config.matrix.get(tagmatrix::Axis::Sdk).len(), 3);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize,)]
pub struct MatrixConfig
{
    /// Concrete value lists per axis. The unset sentinel is always a member
    /// of every axis and is never listed.
    pub matrix: AxisValues,

    /// Default value substituted for the sentinel during canonicalization.
    pub defaults: DefaultsMap,

    /// Per-axis alias tables mapping equivalent values to their canonical
    /// form.
    #[serde(default)]
    pub aliases: AliasTable,

    /// Partial subtag maps pruning invalid combinations from the matrix.
    #[serde(default)]
    pub exclude: Vec<SubtagPattern,>,

    /// Secondary matrix specification for cross-target shared tags.
    #[serde(default)]
    pub shared: SharedConfig,

    /// Ordered template rules; the first matching rule wins.
    #[serde(default)]
    pub template: TemplateRules,

    /// Tag emitted for the all-sentinel matrix point.
    #[serde(default = "default_tag")]
    pub default_tag: String,

    /// Upstream `owner/name` repository queried for the latest release.
    #[serde(default)]
    pub upstream_repo: Option<String,>,
}

/// Concrete value lists for each axis of a matrix.
///
/// An omitted axis has no concrete values, which narrows that axis to the
/// sentinel alone. Contracted shared matrices use this to drop an axis from
/// raw tag composition entirely.
#[derive(Debug, Clone, Default, Deserialize, Serialize,)]
#[serde(deny_unknown_fields)]
pub struct AxisValues
{
    /// SDK versions under build, usually the rounded prefixes of the
    /// primary version.
    #[serde(default)]
    pub sdk:      Vec<String,>,
    /// Python runtime versions, stored without the `python` prefix.
    #[serde(default)]
    pub python:   Vec<String,>,
    /// Base platform variants.
    #[serde(default)]
    pub platform: Vec<String,>,
}

impl AxisValues
{
    /// Returns the configured value list for `axis`.
    pub fn get(&self, axis: Axis,) -> &[String]
    {
        match axis {
            Axis::Sdk => &self.sdk,
            Axis::Python => &self.python,
            Axis::Platform => &self.platform,
        }
    }
}

/// Partial default map as written in the configuration document.
///
/// Completeness is only enforced when the map is resolved through
/// [`complete`](Self::complete); contracted shared passes merge overrides
/// over this map first.
#[derive(Debug, Clone, Default, Deserialize, Serialize,)]
#[serde(deny_unknown_fields)]
pub struct DefaultsMap
{
    /// Default SDK version.
    #[serde(default)]
    pub sdk:      Option<String,>,
    /// Default Python version.
    #[serde(default)]
    pub python:   Option<String,>,
    /// Default platform variant.
    #[serde(default)]
    pub platform: Option<String,>,
}

impl DefaultsMap
{
    /// Returns the default for `axis`, if configured.
    pub fn get(&self, axis: Axis,) -> Option<&str,>
    {
        match axis {
            Axis::Sdk => self.sdk.as_deref(),
            Axis::Python => self.python.as_deref(),
            Axis::Platform => self.platform.as_deref(),
        }
    }

    /// Returns a copy of this map with `overrides` entries taking
    /// precedence.
    ///
    /// Each contracted shared pass is defined by exactly one such merge.
    pub fn merged(&self, overrides: &SubtagPattern,) -> Self
    {
        Self {
            sdk:      overrides.sdk.clone().or_else(|| self.sdk.clone(),),
            python:   overrides.python.clone().or_else(|| self.python.clone(),),
            platform: overrides.platform.clone().or_else(|| self.platform.clone(),),
        }
    }

    /// Resolves the partial map into a total one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDefault`](Error::MissingDefault) naming the
    /// first axis without a default. Canonicalization substitutes defaults
    /// for sentinels, so resolution cannot proceed without full coverage.
    pub fn complete(&self,) -> Result<Defaults, Error,>
    {
        let resolve = |axis: Axis| {
            self.get(axis,).map(str::to_owned,).ok_or(Error::MissingDefault {
                axis,
            },)
        };

        Ok(Defaults {
            sdk:      resolve(Axis::Sdk,)?,
            python:   resolve(Axis::Python,)?,
            platform: resolve(Axis::Platform,)?,
        },)
    }
}

/// Total default map covering every axis.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct Defaults
{
    /// Default SDK version.
    pub sdk:      String,
    /// Default Python version.
    pub python:   String,
    /// Default platform variant.
    pub platform: String,
}

impl Defaults
{
    /// Returns the default value for `axis`.
    pub fn get(&self, axis: Axis,) -> &str
    {
        match axis {
            Axis::Sdk => &self.sdk,
            Axis::Python => &self.python,
            Axis::Platform => &self.platform,
        }
    }
}

/// Per-axis alias tables mapping equivalent subtag values to their
/// canonical form.
#[derive(Debug, Clone, Default, Deserialize, Serialize,)]
#[serde(deny_unknown_fields)]
pub struct AliasTable
{
    /// SDK aliases, typically rounded version prefixes pointing at the full
    /// version.
    #[serde(default)]
    pub sdk:      std::collections::BTreeMap<String, String,>,
    /// Python aliases.
    #[serde(default)]
    pub python:   std::collections::BTreeMap<String, String,>,
    /// Platform aliases, e.g. `slim` pointing at `slim-bookworm`.
    #[serde(default)]
    pub platform: std::collections::BTreeMap<String, String,>,
}

impl AliasTable
{
    /// Resolves `value` through the alias table for `axis`.
    ///
    /// Values without an alias entry are already canonical and pass through
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagmatrix::{AliasTable, Axis};
    ///
    /// let mut aliases = AliasTable::default();
    /// aliases.platform.insert("slim".to_owned(), "slim-bookworm".to_owned(),);
    /// assert_eq!(aliases.canonicalize(Axis::Platform, "slim",), "slim-bookworm");
    /// assert_eq!(aliases.canonicalize(Axis::Platform, "bookworm",), "bookworm");
    /// ```
    pub fn canonicalize<'a,>(&'a self, axis: Axis, value: &'a str,) -> &'a str
    {
        let table = match axis {
            Axis::Sdk => &self.sdk,
            Axis::Python => &self.python,
            Axis::Platform => &self.platform,
        };
        table.get(value,).map_or(value, String::as_str,)
    }
}

/// Secondary matrix specification producing cross-target shared tags.
#[derive(Debug, Clone, Default, Deserialize, Serialize,)]
#[serde(deny_unknown_fields)]
pub struct SharedConfig
{
    /// Value lists for the secondary matrix. Falls back to the primary
    /// matrix when omitted.
    #[serde(default)]
    pub matrix: Option<AxisValues,>,

    /// One partial default override per contracted pass.
    #[serde(default)]
    pub contracted: Vec<SubtagPattern,>,
}

/// Loads a matrix configuration from the provided file path.
///
/// YAML being a superset of JSON, both document flavors are accepted.
///
/// # Errors
///
/// Returns an [`Error`] when the file cannot be read, the document cannot
/// be deserialized, or the configuration violates invariants.
pub fn load_config(path: &Path,) -> Result<MatrixConfig, Error,>
{
    debug!("Reading matrix configuration from {}", path.display());
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    parse_config(&contents,)
}

/// Parses a matrix configuration from the provided document string.
///
/// This function is suitable for unit tests and higher-level callers that
/// already obtained the configuration contents.
///
/// # Errors
///
/// Propagates [`Error::Parse`](Error::Parse) when the document cannot be
/// decoded and [`Error::Validation`](Error::Validation) when value lists or
/// alias entries are malformed.
pub fn parse_config(contents: &str,) -> Result<MatrixConfig, Error,>
{
    let config: MatrixConfig = serde_yaml::from_str(contents,)?;
    validate_config(&config,)?;
    Ok(config,)
}

fn validate_config(config: &MatrixConfig,) -> Result<(), Error,>
{
    for axis in Axis::ALL {
        for value in config.matrix.get(axis,) {
            validate_subtag_value(value, axis, "matrix",)?;
        }
        if let Some(default,) = config.defaults.get(axis,) {
            validate_subtag_value(default, axis, "defaults",)?;
        }
    }

    validate_aliases(&config.aliases,)?;

    if let Some(shared_matrix,) = config.shared.matrix.as_ref() {
        for axis in Axis::ALL {
            for value in shared_matrix.get(axis,) {
                validate_subtag_value(value, axis, "shared.matrix",)?;
            }
        }
    }

    if config.default_tag.trim().is_empty() {
        return Err(Error::validation("default_tag cannot be empty",),);
    }

    if let Some(repo,) = config.upstream_repo.as_deref()
        && repo.split('/',).filter(|part| !part.is_empty(),).count() != 2
    {
        return Err(Error::validation(format!(
            "upstream_repo '{repo}' must use the owner/name form"
        ),),);
    }

    Ok((),)
}

fn validate_aliases(aliases: &AliasTable,) -> Result<(), Error,>
{
    for axis in Axis::ALL {
        let table = match axis {
            Axis::Sdk => &aliases.sdk,
            Axis::Python => &aliases.python,
            Axis::Platform => &aliases.platform,
        };
        for (alias, canonical,) in table {
            validate_subtag_value(alias, axis, "aliases",)?;
            validate_subtag_value(canonical, axis, "aliases",)?;
        }
    }
    Ok((),)
}

/// Validates one subtag value from the configuration document.
///
/// # Errors
///
/// Returns [`Error::Validation`](Error::Validation) when the value is empty
/// or contains whitespace.
fn validate_subtag_value(value: &str, axis: Axis, section: &str,) -> Result<(), Error,>
{
    if value.is_empty() {
        return Err(Error::validation(format!("{section}.{axis} contains an empty value"),),);
    }
    if value.chars().any(char::is_whitespace,) {
        return Err(Error::validation(format!(
            "{section}.{axis} value '{value}' cannot contain whitespace"
        ),),);
    }
    Ok((),)
}
