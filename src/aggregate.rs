//! Aggregation of resolved matrix points into the canonical tag set.
//!
//! The aggregator walks the expanded matrix once, resolves every point,
//! drops excluded ones, and accumulates three maps: canonical tag to alias
//! bag, canonical tag to canonical subtags, and raw tag to canonical tag.
//! Ordered containers keep the result independent of iteration order, so
//! aggregating the same inputs twice yields identical structures.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{
    axis::{SubtagPattern, Subtags},
    config::{AliasTable, DefaultsMap},
    error::Error,
    exclude::is_excluded,
    matrix::AxisSets,
    resolver::resolve,
};

/// Metadata describing one tag of the build matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct TagMetadata
{
    /// Canonical tag the queried tag resolves to.
    pub canonical_tag: String,
    /// Sorted alias tags resolving to the canonical tag, the canonical tag
    /// itself excluded.
    pub alias_tags:    Vec<String,>,
    /// Canonical subtag map behind the tag.
    pub subtags:       Subtags,
}

/// Canonical tags of one build matrix together with their alias bags.
///
/// Every map is rebuilt from scratch per aggregation; nothing is mutated
/// across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct TagSet
{
    bags:     BTreeMap<String, BTreeSet<String,>,>,
    subtags:  BTreeMap<String, Subtags,>,
    upstream: BTreeMap<String, String,>,
}

impl TagSet
{
    /// Iterates all canonical tags in lexicographic order.
    pub fn canonical_tags(&self,) -> impl Iterator<Item = &str,>
    {
        self.bags.keys().map(String::as_str,)
    }

    /// Number of canonical tags.
    pub fn len(&self,) -> usize
    {
        self.bags.len()
    }

    /// Returns `true` when aggregation produced no targets.
    pub fn is_empty(&self,) -> bool
    {
        self.bags.is_empty()
    }

    /// Raw-to-canonical resolution map.
    pub fn upstream(&self,) -> &BTreeMap<String, String,>
    {
        &self.upstream
    }

    /// Canonical tag to alias bag map. Every bag contains its own canonical
    /// tag.
    pub fn bags(&self,) -> &BTreeMap<String, BTreeSet<String,>,>
    {
        &self.bags
    }

    /// Returns the canonical subtags behind `canonical`, if it is a
    /// canonical tag of this set.
    pub fn canonical_subtags(&self, canonical: &str,) -> Option<&Subtags,>
    {
        self.subtags.get(canonical,)
    }

    /// Returns the sorted alias tags of `canonical`, itself excluded.
    pub fn aliases_of(&self, canonical: &str,) -> Option<Vec<String,>,>
    {
        self.bags.get(canonical,).map(|bag| {
            bag.iter().filter(|tag| tag.as_str() != canonical,).cloned().collect()
        },)
    }

    /// Resolves `tag` to its canonical tag.
    ///
    /// A canonical tag resolves to itself; an alias resolves through the
    /// upstream map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTag`](Error::UnknownTag) when the tag is
    /// absent from both maps.
    pub fn resolve_canonical<'set,>(&'set self, tag: &'set str,) -> Result<&'set str, Error,>
    {
        if self.bags.contains_key(tag,) {
            return Ok(tag,);
        }
        self.upstream.get(tag,).map(String::as_str,).ok_or_else(|| Error::unknown_tag(tag,),)
    }

    /// Looks up metadata for `tag`, canonical or alias.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTag`](Error::UnknownTag) when the tag is not
    /// produced by the matrix.
    pub fn metadata(&self, tag: &str,) -> Result<TagMetadata, Error,>
    {
        let canonical = self.resolve_canonical(tag,)?;
        let subtags =
            self.subtags.get(canonical,).cloned().ok_or_else(|| Error::unknown_tag(tag,),)?;
        let alias_tags = self.aliases_of(canonical,).unwrap_or_default();

        Ok(TagMetadata {
            canonical_tag: canonical.to_owned(),
            alias_tags,
            subtags,
        },)
    }

    /// Returns every tag of the matrix, canonical and alias alike, sorted.
    pub fn all_tags(&self,) -> BTreeSet<String,>
    {
        let mut tags: BTreeSet<String,> = self.bags.keys().cloned().collect();
        for bag in self.bags.values() {
            tags.extend(bag.iter().cloned(),);
        }
        tags
    }
}

/// Aggregates the expanded matrix into a [`TagSet`].
///
/// Excluded points contribute nothing; a canonical tag only appears when at
/// least one of its points survives exclusion. Canonical identity is a
/// deterministic function of canonical subtags, so all points sharing a
/// canonical tag share exclusion status; the aggregator asserts this
/// instead of re-deriving it.
///
/// # Errors
///
/// Returns [`Error::MissingDefault`](Error::MissingDefault) when the
/// default map does not cover every axis and
/// [`Error::EmptyAxis`](Error::EmptyAxis) when an axis has no members.
pub fn aggregate(
    sets: &AxisSets,
    defaults: &DefaultsMap,
    aliases: &AliasTable,
    exclude: &[SubtagPattern],
    default_tag: &str,
) -> Result<TagSet, Error,>
{
    let defaults = defaults.complete()?;
    let mut set = TagSet::default();

    for point in sets.expand()? {
        let info = resolve(&point, &defaults, aliases, default_tag,);
        if is_excluded(&info.subtags, exclude,) {
            continue;
        }

        let bag = set.bags.entry(info.canonical_tag.clone(),).or_default();
        // Reflexivity: a canonical tag always belongs to its own bag, even
        // when the matrix never enumerates its fully concrete point.
        bag.insert(info.canonical_tag.clone(),);
        bag.insert(info.tag.clone(),);

        if let Some(existing,) = set.subtags.get(&info.canonical_tag,) {
            debug_assert_eq!(
                existing, &info.subtags,
                "canonical tag must determine canonical subtags"
            );
        } else {
            set.subtags.insert(info.canonical_tag.clone(), info.subtags.clone(),);
        }

        if let Some(previous,) =
            set.upstream.insert(info.tag.clone(), info.canonical_tag.clone(),)
        {
            debug_assert_eq!(
                previous, info.canonical_tag,
                "a raw tag must resolve to exactly one canonical tag"
            );
        }
        set.upstream.insert(info.canonical_tag.clone(), info.canonical_tag,);
    }

    Ok(set,)
}
