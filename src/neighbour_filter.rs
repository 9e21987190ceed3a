//! Neighbour-window filter.
//!
//! Every record except the first (and, optionally, the last) is kept or
//! dropped by a decision over its point and the points of its neighbours in
//! the *source* track. Decisions never look at the output being built, so a
//! single pass cannot cascade: of two consecutive offenders each is judged
//! against the other. [`until_stable`] repeats a pass to a fixed point when
//! cascading is wanted.

use tracing::debug;

use crate::error::{GeoError, Result};
use crate::locate::Locate;
use crate::point::Point;

/// Filter `track`, returning the retained records unchanged and in order.
///
/// `decide(previous, current, next)` keeps the current record when it returns
/// true; `next` is `None` for the last record. Index 0 is always kept, as is
/// the last index when `keep_last_point` is set. Fails if `locator` cannot
/// resolve a record's point.
pub fn filter<R, L, D>(track: &[R], keep_last_point: bool, locator: &L, decide: D) -> Result<Vec<R>>
where
    R: Clone,
    L: Locate<R> + ?Sized,
    D: FnMut(&Point, &Point, Option<&Point>) -> bool,
{
    let kept = retained_indices(track, keep_last_point, locator, decide)?;
    Ok(kept.into_iter().map(|i| track[i].clone()).collect())
}

/// [`filter`] for callers holding an optional track: absent stays absent.
pub fn filter_optional<R, L, D>(
    track: Option<&[R]>,
    keep_last_point: bool,
    locator: &L,
    decide: D,
) -> Result<Option<Vec<R>>>
where
    R: Clone,
    L: Locate<R> + ?Sized,
    D: FnMut(&Point, &Point, Option<&Point>) -> bool,
{
    track
        .map(|t| filter(t, keep_last_point, locator, decide))
        .transpose()
}

/// Indices of the records [`filter`] would keep.
pub fn retained_indices<R, L, D>(
    track: &[R],
    keep_last_point: bool,
    locator: &L,
    mut decide: D,
) -> Result<Vec<usize>>
where
    L: Locate<R> + ?Sized,
    D: FnMut(&Point, &Point, Option<&Point>) -> bool,
{
    if track.is_empty() {
        return Ok(Vec::new());
    }

    let points = resolve(track, locator)?;
    let last = points.len() - 1;

    let kept: Vec<usize> = (0..points.len())
        .filter(|&i| {
            if i == 0 {
                return true;
            }
            if keep_last_point && i == last {
                return true;
            }
            decide(&points[i - 1], &points[i], points.get(i + 1))
        })
        .collect();

    debug!(
        total = points.len(),
        retained = kept.len(),
        keep_last_point,
        "neighbour filter pass"
    );
    Ok(kept)
}

/// Apply `pass` repeatedly until it stops removing records.
///
/// `pass` must only ever remove records; a pass that returns as many records
/// as it was given is taken as the fixed point.
pub fn until_stable<R, F>(track: &[R], mut pass: F) -> Result<Vec<R>>
where
    R: Clone,
    F: FnMut(&[R]) -> Result<Vec<R>>,
{
    let mut current = pass(track)?;
    let mut passes = 1;
    loop {
        let next = pass(&current)?;
        passes += 1;
        if next.len() == current.len() {
            break;
        }
        current = next;
    }
    debug!(
        passes,
        total = track.len(),
        retained = current.len(),
        "filter reached fixed point"
    );
    Ok(current)
}

/// Rejects negative, NaN and infinite thresholds.
pub(crate) fn check_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(GeoError::InvalidThreshold(threshold))
    }
}

fn resolve<R, L>(track: &[R], locator: &L) -> Result<Vec<Point>>
where
    L: Locate<R> + ?Sized,
{
    track
        .iter()
        .enumerate()
        .map(|(index, record)| {
            locator.locate(record).ok_or_else(|| {
                if index == 0 {
                    GeoError::PathNotFound {
                        path: locator.describe(),
                    }
                } else {
                    GeoError::UnresolvedRecord {
                        index,
                        path: locator.describe(),
                    }
                }
            })
        })
        .collect()
}
