//! Resolution of one matrix point into its raw and canonical tags.
//!
//! The raw tag composes exactly the values the point sets, dropping
//! sentinel axes; the canonical tag composes every axis after default and
//! alias substitution. Resolution is deterministic: identical inputs always
//! yield identical output, with no external state consulted.

use crate::{
    axis::{Axis, MatrixPoint, Subtags},
    config::{AliasTable, Defaults},
};

/// Separator joining formatted subtag values into a composite tag.
const TAG_SEPARATOR: &str = "-";

/// Resolution result for exactly one matrix point.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct TagInfo
{
    /// Tag as directly composed from the point, sentinel axes dropped.
    pub tag:           String,
    /// Fully resolved tag composing every axis.
    pub canonical_tag: String,
    /// Canonical subtag map behind the canonical tag.
    pub subtags:       Subtags,
}

/// Resolves a matrix point against the configured defaults and aliases.
///
/// Sentinel axes are dropped from the raw tag; when every axis is sentinel
/// the raw tag degenerates to `default_tag`. Canonicalization substitutes
/// the axis default for each sentinel and resolves the result through the
/// alias table, so the canonical tag always composes all axes.
///
/// # Examples
///
/// ```
/// use tagmatrix::{resolve, AliasTable, Defaults, MatrixPoint};
///
/// let defaults = Defaults {
///     sdk:      "8.2.0".to_owned(),
///     python:   "3.10".to_owned(),
///     platform: "bookworm".to_owned(),
/// };
/// let info = resolve(&MatrixPoint::default(), &defaults, &AliasTable::default(), "latest",);
/// assert_eq!(info.tag, "latest");
/// assert_eq!(info.canonical_tag, "8.2.0-python3.10-bookworm");
/// ```
pub fn resolve(
    point: &MatrixPoint,
    defaults: &Defaults,
    aliases: &AliasTable,
    default_tag: &str,
) -> TagInfo
{
    let mut raw_parts = Vec::with_capacity(Axis::ALL.len(),);
    for axis in Axis::ALL {
        if let Some(value,) = point.get(axis,) {
            raw_parts.push(axis.format_value(value,),);
        }
    }
    let tag = if raw_parts.is_empty() {
        default_tag.to_owned()
    } else {
        raw_parts.join(TAG_SEPARATOR,)
    };

    let subtags = canonical_subtags(point, defaults, aliases,);
    let canonical_tag = compose_canonical(&subtags,);

    TagInfo {
        tag,
        canonical_tag,
        subtags,
    }
}

/// Composes the canonical tag for a fully resolved subtag map.
///
/// Defaults guarantee no sentinel survives canonicalization, so the result
/// always joins all axes and never degenerates to the default tag.
pub fn compose_canonical(subtags: &Subtags,) -> String
{
    Axis::ALL
        .iter()
        .map(|axis| axis.format_value(subtags.get(*axis,),),)
        .collect::<Vec<_,>>()
        .join(TAG_SEPARATOR,)
}

fn canonical_subtags(point: &MatrixPoint, defaults: &Defaults, aliases: &AliasTable,) -> Subtags
{
    let resolve_axis = |axis: Axis| {
        let value = point.get(axis,).unwrap_or_else(|| defaults.get(axis,),);
        aliases.canonicalize(axis, value,).to_owned()
    };

    Subtags {
        sdk:      resolve_axis(Axis::Sdk,),
        python:   resolve_axis(Axis::Python,),
        platform: resolve_axis(Axis::Platform,),
    }
}
