//! Polyline route that enemies follow from the spawn point to the exit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Continuous location expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point from horizontal and vertical world coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate in world units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate in world units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Point) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Moves towards `target` by at most `max_distance` without overshooting it.
    #[must_use]
    pub fn step_toward(self, target: Point, max_distance: f32) -> Point {
        let distance = self.distance(target);
        if distance <= max_distance || distance <= f32::EPSILON {
            return target;
        }

        let scale = max_distance / distance;
        Point::new(
            self.x + (target.x - self.x) * scale,
            self.y + (target.y - self.y) * scale,
        )
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Location along the path expressed as a segment index and the distance
/// already covered within that segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PathPosition {
    segment: usize,
    offset: f32,
}

impl PathPosition {
    /// Position at the first waypoint of any path.
    pub const START: Self = Self {
        segment: 0,
        offset: 0.0,
    };

    /// Creates a position on the provided segment.
    #[must_use]
    pub const fn new(segment: usize, offset: f32) -> Self {
        Self { segment, offset }
    }

    /// Index of the segment currently traversed.
    #[must_use]
    pub const fn segment(&self) -> usize {
        self.segment
    }

    /// Distance travelled within the current segment.
    #[must_use]
    pub const fn offset(&self) -> f32 {
        self.offset
    }
}

/// Outcome of advancing a [`PathPosition`] along a [`Path`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathAdvance {
    /// Position reached after the advance.
    pub position: PathPosition,
    /// Distance actually covered, which is shorter than requested when the
    /// path ran out.
    pub travelled: f32,
    /// Indicates that the final waypoint was reached or passed.
    pub finished: bool,
}

/// Reasons a path cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// A path needs at least a start and an end waypoint.
    #[error("a path needs at least two waypoints (received {count})")]
    TooFewWaypoints {
        /// Number of waypoints supplied.
        count: usize,
    },
    /// One of the waypoints contained a NaN or infinite coordinate.
    #[error("waypoint {index} has a non-finite coordinate")]
    NonFinite {
        /// Index of the offending waypoint.
        index: usize,
    },
}

/// Immutable sequence of waypoints traversed as consecutive line segments.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    waypoints: Vec<Point>,
    segment_lengths: Vec<f32>,
    length: f32,
}

impl Path {
    /// Builds a path from ordered waypoints.
    pub fn new(waypoints: Vec<Point>) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }

        if let Some(index) = waypoints.iter().position(|point| !point.is_finite()) {
            return Err(PathError::NonFinite { index });
        }

        let segment_lengths: Vec<f32> = waypoints
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .collect();
        let length = segment_lengths.iter().sum();

        Ok(Self {
            waypoints,
            segment_lengths,
            length,
        })
    }

    /// Ordered waypoints composing the path.
    #[must_use]
    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    /// Number of line segments between consecutive waypoints.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segment_lengths.len()
    }

    /// Total length of the path in world units.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.length
    }

    /// First waypoint, where enemies enter the field.
    #[must_use]
    pub fn start(&self) -> Point {
        self.waypoints[0]
    }

    /// Final waypoint; passing it counts as a leak.
    #[must_use]
    pub fn end(&self) -> Point {
        self.waypoints[self.waypoints.len() - 1]
    }

    /// Advances `position` by `distance`, carrying any overflow into the
    /// following segments.
    ///
    /// Landing exactly on a waypoint snaps to it and moves on to the next
    /// segment, so landing on the final waypoint reports `finished`.
    #[must_use]
    pub fn advance(&self, position: PathPosition, distance: f32) -> PathAdvance {
        let mut segment = position.segment;
        let mut offset = position.offset.max(0.0);
        let mut remaining = distance.max(0.0);
        let mut travelled = 0.0;

        while let Some(&length) = self.segment_lengths.get(segment) {
            let available = (length - offset).max(0.0);
            if remaining < available {
                offset += remaining;
                travelled += remaining;
                return PathAdvance {
                    position: PathPosition::new(segment, offset),
                    travelled,
                    finished: false,
                };
            }

            remaining -= available;
            travelled += available;
            segment += 1;
            offset = 0.0;
        }

        PathAdvance {
            position: PathPosition::new(self.segment_lengths.len(), 0.0),
            travelled,
            finished: true,
        }
    }

    /// Resolves a path position into world coordinates.
    #[must_use]
    pub fn point_at(&self, position: PathPosition) -> Point {
        let Some(&length) = self.segment_lengths.get(position.segment) else {
            return self.end();
        };

        let from = self.waypoints[position.segment];
        let to = self.waypoints[position.segment + 1];
        if length <= f32::EPSILON {
            return from;
        }

        let t = (position.offset / length).clamp(0.0, 1.0);
        Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
    }

    /// Shortest distance between `point` and any segment of the path.
    #[must_use]
    pub fn distance_to(&self, point: Point) -> f32 {
        self.waypoints
            .windows(2)
            .map(|pair| distance_to_segment(point, pair[0], pair[1]))
            .fold(f32::INFINITY, f32::min)
    }

    /// Reports whether `point` lies closer than `buffer` to the path.
    #[must_use]
    pub fn is_on_path(&self, point: Point, buffer: f32) -> bool {
        self.distance_to(point) < buffer
    }
}

/// Distance from `point` to the segment `from`-`to`, projecting onto the
/// segment with the projection parameter clamped to `[0, 1]`.
fn distance_to_segment(point: Point, from: Point, to: Point) -> f32 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let length_squared = dx * dx + dy * dy;
    if length_squared <= f32::EPSILON {
        return point.distance(from);
    }

    let t = (((point.x - from.x) * dx + (point.y - from.y) * dy) / length_squared).clamp(0.0, 1.0);
    point.distance(Point::new(from.x + t * dx, from.y + t * dy))
}
