//! Outlier point removal.
//!
//! Two policies over the neighbour-window filter:
//!
//! * [`outlier_point_removal`] drops an isolated spike: a record far from its
//!   successor while its predecessor and successor are close to each other.
//!   Two consecutive spikes shield each other and both survive.
//! * [`outlier_point_removal_cascading`] drops every record whose successor is
//!   farther than the threshold, ignoring the predecessor. One pass only
//!   peels the edges of a run of outliers; [`outlier_point_removal_multiple`]
//!   repeats it until nothing more is removed.
//!
//! Neither rule can drop the last record: with no successor both distances
//! count as zero. `keep_last_point` therefore changes nothing for these
//! policies; it is accepted so all policies share one option shape.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceFunction;
use crate::error::Result;
use crate::locate::Locate;
use crate::neighbour_filter::{check_threshold, filter, until_stable};
use crate::point::Point;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutlierOptions {
    /// Metres.
    pub threshold: f64,
    pub distance_function: DistanceFunction,
    pub keep_last_point: bool,
}

impl Default for OutlierOptions {
    fn default() -> Self {
        OutlierOptions {
            threshold: 50.0,
            distance_function: DistanceFunction::Haversine,
            keep_last_point: false,
        }
    }
}

impl OutlierOptions {
    /// Select the metric by name (`"haversine"` or `"vincenty"`).
    pub fn with_distance_function(mut self, name: &str) -> Result<Self> {
        self.distance_function = name.parse()?;
        Ok(self)
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_keep_last_point(mut self, keep_last_point: bool) -> Self {
        self.keep_last_point = keep_last_point;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_threshold(self.threshold)
    }
}

/// Remove isolated spikes.
pub fn outlier_point_removal<R, L>(track: &[R], options: &OutlierOptions, locator: &L) -> Result<Vec<R>>
where
    R: Clone,
    L: Locate<R> + ?Sized,
{
    options.validate()?;
    let metric = options.distance_function;
    let threshold = options.threshold;
    filter(
        track,
        options.keep_last_point,
        locator,
        |prev: &Point, curr: &Point, next: Option<&Point>| {
            let (curr_to_next, prev_to_next) = match next {
                Some(next) => (metric.distance(curr, next), metric.distance(prev, next)),
                None => (0.0, 0.0),
            };
            !(curr_to_next > threshold && prev_to_next <= threshold)
        },
    )
}

/// One pass removing every record farther than the threshold from its successor.
pub fn outlier_point_removal_cascading<R, L>(
    track: &[R],
    options: &OutlierOptions,
    locator: &L,
) -> Result<Vec<R>>
where
    R: Clone,
    L: Locate<R> + ?Sized,
{
    options.validate()?;
    cascading_pass(track, options, locator)
}

/// [`outlier_point_removal_cascading`] repeated until the track stops shrinking.
pub fn outlier_point_removal_multiple<R, L>(
    track: &[R],
    options: &OutlierOptions,
    locator: &L,
) -> Result<Vec<R>>
where
    R: Clone,
    L: Locate<R> + ?Sized,
{
    options.validate()?;
    until_stable(track, |t: &[R]| cascading_pass(t, options, locator))
}

fn cascading_pass<R, L>(track: &[R], options: &OutlierOptions, locator: &L) -> Result<Vec<R>>
where
    R: Clone,
    L: Locate<R> + ?Sized,
{
    let metric = options.distance_function;
    let threshold = options.threshold;
    filter(
        track,
        options.keep_last_point,
        locator,
        |_prev: &Point, curr: &Point, next: Option<&Point>| {
            let curr_to_next = next.map_or(0.0, |next| metric.distance(curr, next));
            curr_to_next <= threshold
        },
    )
}
