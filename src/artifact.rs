// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Deterministic artifact directories for canonical targets.
///
/// Every canonical target owns one directory composed from its truncated
/// SDK version, its Python runtime segment, and its platform variant, in
/// that fixed order. Aliases resolve to the same directory as their
/// canonical tag.
use std::path::PathBuf;

use crate::{aggregate::TagSet, axis::Axis, error::Error, version::Version};

/// Resolves the artifact directory for `tag`.
///
/// The tag is resolved through the upstream map first, so canonical tags
/// and aliases land in the same directory. The SDK version is truncated to
/// `version_scale + 1` leading components; scale 0 keeps the major version
/// only.
///
/// # Errors
///
/// Returns [`Error::UnknownTag`](Error::UnknownTag) when the tag is absent
/// from both the canonical and the upstream map, and
/// [`Error::Validation`](Error::Validation) when the SDK subtag is not a
/// dotted numeric version.
///
/// # Example
///
/// ```no_run
/// use tagmatrix::resolve_path;
/// # use tagmatrix::TagSet;
///
/// # fn example(tags: &TagSet) -> Result<(), tagmatrix::Error> {
/// let path = resolve_path("8.2-slim", tags, 1,)?;
/// assert_eq!(path.to_str(), Some("8.2/python3.10/slim-bookworm"));
/// # Ok(())
/// # }
/// ```
pub fn resolve_path(tag: &str, tags: &TagSet, version_scale: usize,) -> Result<PathBuf, Error,>
{
    let canonical = tags.resolve_canonical(tag,)?;
    let subtags = tags.canonical_subtags(canonical,).ok_or_else(|| Error::unknown_tag(tag,),)?;

    let version = Version::parse(&subtags.sdk,)?;

    let mut path = PathBuf::from(version.truncate(version_scale,),);
    path.push(Axis::Python.format_value(&subtags.python,),);
    path.push(&subtags.platform,);
    Ok(path,)
}
