//! Cartesian expansion of axis value sets into matrix points.
//!
//! Expansion is a pure function of the axis sets: iteration order is fixed
//! with the platform axis varying fastest, so repeated runs enumerate points
//! in the same order. The sentinel leads every axis, which places the
//! all-sentinel point first.

use crate::{
    axis::{Axis, MatrixPoint},
    config::AxisValues,
    error::Error,
};

/// Per-axis value sets ready for expansion, sentinel included.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct AxisSets
{
    sdk:      Vec<Option<String,>,>,
    python:   Vec<Option<String,>,>,
    platform: Vec<Option<String,>,>,
}

impl AxisSets
{
    /// Builds axis sets from configured value lists.
    ///
    /// The sentinel is injected as the leading member of every axis and
    /// duplicate values are dropped, preserving first-occurrence order.
    pub fn from_values(values: &AxisValues,) -> Self
    {
        Self {
            sdk:      with_sentinel(values.get(Axis::Sdk,),),
            python:   with_sentinel(values.get(Axis::Python,),),
            platform: with_sentinel(values.get(Axis::Platform,),),
        }
    }

    /// Builds axis sets from explicit per-axis members.
    ///
    /// Callers are responsible for sentinel membership;
    /// [`expand`](Self::expand) rejects empty sets.
    pub fn new(
        sdk: Vec<Option<String,>,>,
        python: Vec<Option<String,>,>,
        platform: Vec<Option<String,>,>,
    ) -> Self
    {
        Self {
            sdk,
            python,
            platform,
        }
    }

    fn get(&self, axis: Axis,) -> &[Option<String,>]
    {
        match axis {
            Axis::Sdk => &self.sdk,
            Axis::Python => &self.python,
            Axis::Platform => &self.platform,
        }
    }

    /// Number of points the expansion will yield.
    pub fn point_count(&self,) -> usize
    {
        Axis::ALL.iter().map(|axis| self.get(*axis,).len(),).product()
    }

    /// Expands the axis sets into the lazy sequence of all matrix points.
    ///
    /// One value per axis, platform varying fastest, then python, then sdk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyAxis`](Error::EmptyAxis) naming the first axis
    /// whose value set is empty; an empty axis would silently collapse the
    /// whole product.
    pub fn expand(&self,) -> Result<PointIter<'_,>, Error,>
    {
        for axis in Axis::ALL {
            if self.get(axis,).is_empty() {
                return Err(Error::EmptyAxis {
                    axis,
                },);
            }
        }

        Ok(PointIter {
            sets:  self,
            index: 0,
            len:   self.point_count(),
        },)
    }
}

/// Iterator over all points of an expanded matrix.
///
/// Indexes into the product rather than materializing it, keeping expansion
/// lazy regardless of matrix breadth.
#[derive(Debug, Clone,)]
pub struct PointIter<'sets,>
{
    sets:  &'sets AxisSets,
    index: usize,
    len:   usize,
}

impl Iterator for PointIter<'_,>
{
    type Item = MatrixPoint;

    fn next(&mut self,) -> Option<Self::Item,>
    {
        if self.index >= self.len {
            return None;
        }

        let platform_len = self.sets.platform.len();
        let python_len = self.sets.python.len();

        let platform_index = self.index % platform_len;
        let python_index = (self.index / platform_len) % python_len;
        let sdk_index = self.index / (platform_len * python_len);
        self.index += 1;

        Some(MatrixPoint {
            sdk:      self.sets.sdk[sdk_index].clone(),
            python:   self.sets.python[python_index].clone(),
            platform: self.sets.platform[platform_index].clone(),
        },)
    }

    fn size_hint(&self,) -> (usize, Option<usize,>,)
    {
        let remaining = self.len - self.index;
        (remaining, Some(remaining,),)
    }
}

impl ExactSizeIterator for PointIter<'_,> {}

fn with_sentinel(values: &[String],) -> Vec<Option<String,>,>
{
    let mut members = Vec::with_capacity(values.len() + 1,);
    members.push(None,);
    for value in values {
        let member = Some(value.clone(),);
        if !members.contains(&member,) {
            members.push(member,);
        }
    }
    members
}

#[cfg(test)]
mod tests
{
    use super::AxisSets;
    use crate::{
        axis::{Axis, MatrixPoint},
        config::AxisValues,
        error::Error,
    };

    fn values() -> AxisValues
    {
        AxisValues {
            sdk:      vec!["8.2.0".to_owned(), "8.2".to_owned()],
            python:   vec!["3.9".to_owned(), "3.10".to_owned()],
            platform: vec!["bookworm".to_owned()],
        }
    }

    #[test]
    fn sentinel_leads_every_axis()
    {
        let sets = AxisSets::from_values(&values(),);
        let first = sets.expand().expect("expected expansion",).next().expect("expected a point",);
        assert_eq!(first, MatrixPoint::default());
    }

    #[test]
    fn point_count_is_the_full_product()
    {
        let sets = AxisSets::from_values(&values(),);
        // (2 + sentinel) * (2 + sentinel) * (1 + sentinel)
        assert_eq!(sets.point_count(), 18);
        assert_eq!(sets.expand().expect("expected expansion",).count(), 18);
    }

    #[test]
    fn platform_varies_fastest()
    {
        let sets = AxisSets::new(
            vec![None, Some("8.2.0".to_owned(),)],
            vec![None],
            vec![None, Some("bookworm".to_owned(),)],
        );

        let points: Vec<_,> = sets.expand().expect("expected expansion",).collect();
        assert_eq!(points[0].platform, None);
        assert_eq!(points[1].platform.as_deref(), Some("bookworm"));
        assert_eq!(points[0].sdk, points[1].sdk);
        assert_eq!(points[2].sdk.as_deref(), Some("8.2.0"));
    }

    #[test]
    fn expansion_order_is_stable()
    {
        let sets = AxisSets::from_values(&values(),);
        let first: Vec<_,> = sets.expand().expect("expected expansion",).collect();
        let second: Vec<_,> = sets.expand().expect("expected expansion",).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_axis_is_rejected()
    {
        let sets = AxisSets::new(vec![None], Vec::new(), vec![None],);
        let error = sets.expand().expect_err("expected empty axis error",);
        match error {
            Error::EmptyAxis {
                axis,
            } => assert_eq!(axis, Axis::Python),
            other => panic!("expected empty axis error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_values_collapse()
    {
        let values = AxisValues {
            sdk:      vec!["8".to_owned(), "8".to_owned()],
            python:   Vec::new(),
            platform: Vec::new(),
        };
        let sets = AxisSets::from_values(&values,);
        assert_eq!(sets.point_count(), 2);
    }

    #[test]
    fn omitted_axis_narrows_to_sentinel_alone()
    {
        let values = AxisValues {
            sdk:      vec!["8.2.0".to_owned()],
            python:   Vec::new(),
            platform: vec!["bookworm".to_owned()],
        };
        let sets = AxisSets::from_values(&values,);

        let points: Vec<_,> = sets.expand().expect("expected expansion",).collect();
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|point| point.python.is_none(),));
    }

    #[test]
    fn size_hint_tracks_remaining_points()
    {
        let sets = AxisSets::from_values(&values(),);
        let mut iter = sets.expand().expect("expected expansion",);
        assert_eq!(iter.size_hint(), (18, Some(18)));
        iter.next();
        assert_eq!(iter.size_hint(), (17, Some(17)));
    }
}
