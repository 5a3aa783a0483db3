//! Cross-target shared tag groups computed from a contracted matrix.
//!
//! Each contracted pass fixes one axis to a representative value by merging
//! an override over the base defaults, then re-aggregates the secondary
//! matrix. Raw tags that omit the contracted axis resolve to a different
//! canonical target in every pass; collecting those targets per raw tag
//! yields the umbrella identifiers that label a whole release line.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::{
    aggregate::aggregate,
    axis::SubtagPattern,
    config::{AliasTable, DefaultsMap},
    error::Error,
    matrix::AxisSets,
};

/// Shared raw tag to the canonical targets it spans.
pub type SharedTagGroups = BTreeMap<String, BTreeSet<String,>,>;

/// Computes shared tag groups across all contracted passes.
///
/// Self-mappings are discarded in every pass: a canonical tag is never
/// shared with itself, and a raw tag whose resolution never differs from
/// its canonical form produces no entry at all. Exclusion rules apply
/// inside every pass, so an excluded combination cannot surface as a
/// shared target either.
///
/// # Errors
///
/// Propagates [`Error::MissingDefault`](Error::MissingDefault) when a
/// merged default map still misses an axis and
/// [`Error::EmptyAxis`](Error::EmptyAxis) from secondary matrix expansion.
pub fn shared_groups(
    contracted: &[SubtagPattern],
    base_defaults: &DefaultsMap,
    sets: &AxisSets,
    aliases: &AliasTable,
    exclude: &[SubtagPattern],
    default_tag: &str,
) -> Result<SharedTagGroups, Error,>
{
    let mut groups = SharedTagGroups::new();

    for overrides in contracted {
        let defaults = base_defaults.merged(overrides,);
        let pass = aggregate(sets, &defaults, aliases, exclude, default_tag,)?;
        debug!("Contracted pass resolved {} canonical targets", pass.len());

        for (raw, canonical,) in pass.upstream() {
            if raw == canonical {
                continue;
            }
            groups.entry(raw.clone(),).or_default().insert(canonical.clone(),);
        }
    }

    Ok(groups,)
}

#[cfg(test)]
mod tests
{
    use super::shared_groups;
    use crate::{
        axis::SubtagPattern,
        config::{AliasTable, AxisValues, DefaultsMap},
        matrix::AxisSets,
    };

    fn axis_sets() -> AxisSets
    {
        AxisSets::from_values(&AxisValues {
            sdk:      vec!["8.2.0".to_owned()],
            python:   vec!["3.9".to_owned(), "3.10".to_owned()],
            platform: vec!["bookworm".to_owned()],
        },)
    }

    fn defaults() -> DefaultsMap
    {
        DefaultsMap {
            sdk:      Some("8.2.0".to_owned(),),
            python:   Some("3.10".to_owned(),),
            platform: Some("bookworm".to_owned(),),
        }
    }

    fn contract_python() -> Vec<SubtagPattern,>
    {
        vec![
            SubtagPattern {
                python: Some("3.9".to_owned(),),
                ..SubtagPattern::default()
            },
            SubtagPattern {
                python: Some("3.10".to_owned(),),
                ..SubtagPattern::default()
            },
        ]
    }

    #[test]
    fn contracted_passes_span_the_contracted_axis()
    {
        let groups = shared_groups(
            &contract_python(),
            &defaults(),
            &axis_sets(),
            &AliasTable::default(),
            &[],
            "latest",
        )
        .expect("expected shared groups",);

        // The python-less raw tag resolves to a different canonical target
        // in each pass and spans both of them.
        let group = groups.get("8.2.0-bookworm",).expect("expected shared tag",);
        assert!(group.contains("8.2.0-python3.9-bookworm"));
        assert!(group.contains("8.2.0-python3.10-bookworm"));
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn groups_never_contain_their_own_raw_tag()
    {
        let groups = shared_groups(
            &contract_python(),
            &defaults(),
            &axis_sets(),
            &AliasTable::default(),
            &[],
            "latest",
        )
        .expect("expected shared groups",);

        for (raw, canonicals,) in &groups {
            assert!(!canonicals.contains(raw), "{raw} maps to itself");
            assert!(!canonicals.is_empty(), "{raw} has an empty group");
        }
    }

    #[test]
    fn no_contracted_passes_produce_no_groups()
    {
        let groups = shared_groups(
            &[],
            &defaults(),
            &axis_sets(),
            &AliasTable::default(),
            &[],
            "latest",
        )
        .expect("expected shared groups",);
        assert!(groups.is_empty());
    }

    #[test]
    fn exclusions_apply_inside_contracted_passes()
    {
        let exclude = vec![SubtagPattern {
            python: Some("3.9".to_owned(),),
            ..SubtagPattern::default()
        }];

        let groups = shared_groups(
            &contract_python(),
            &defaults(),
            &axis_sets(),
            &AliasTable::default(),
            &exclude,
            "latest",
        )
        .expect("expected shared groups",);

        for canonicals in groups.values() {
            assert!(canonicals.iter().all(|tag| !tag.contains("python3.9",)));
        }
    }

    #[test]
    fn latest_spans_every_contracted_default_stack()
    {
        let groups = shared_groups(
            &contract_python(),
            &defaults(),
            &axis_sets(),
            &AliasTable::default(),
            &[],
            "latest",
        )
        .expect("expected shared groups",);

        let group = groups.get("latest",).expect("expected latest to be shared",);
        assert_eq!(group.len(), 2);
    }
}
