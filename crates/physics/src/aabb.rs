//! An axis-aligned bounding box.
use crate::errors::*;
use crate::*;

/// An axis-aligned bounding box is specified by 2 points `p1` and `p2`, such
/// that `p1.x <= p2.x && p1.y <= p2.y`.
///
/// Unlike shapes, boxes may be flat: an axis-aligned edge has a box of zero
/// width or height.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Aabb {
    p1: V2,
    p2: V2,
}

impl Aabb {
    pub fn from_points(p1: V2, p2: V2) -> Result<Aabb, AabbError> {
        // Written this way around so that NaN also fails.
        if !(p1.x <= p2.x && p1.y <= p2.y) {
            return Err(AabbError::AabbInvalidDims);
        }

        Ok(Aabb { p1, p2 })
    }

    /// The smallest box containing all of the given points, or `None` if there are no points.
    pub fn enclosing(points: impl IntoIterator<Item = V2>) -> Option<Aabb> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (p1, p2) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Aabb { p1, p2 })
    }

    pub fn get_p1(&self) -> &V2 {
        &self.p1
    }

    pub fn get_p2(&self) -> &V2 {
        &self.p2
    }

    pub fn get_width(&self) -> f64 {
        self.p2.x - self.p1.x
    }

    pub fn get_height(&self) -> f64 {
        self.p2.y - self.p1.y
    }

    pub fn get_half_width(&self) -> f64 {
        self.get_width() / 2.0
    }

    pub fn get_half_height(&self) -> f64 {
        self.get_height() / 2.0
    }

    pub fn get_center(&self) -> V2 {
        V2 {
            x: self.p1.x + self.get_half_width(),
            y: self.p1.y + self.get_half_height(),
        }
    }

    /// The perimeter of the box.  This is the 2d analogue of surface area for the tree's insertion heuristic.
    pub fn get_perimeter(&self) -> f64 {
        2.0 * (self.get_width() + self.get_height())
    }

    /// The smallest box containing both boxes.
    #[must_use = "This returns a new box"]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            p1: self.p1.min(other.p1),
            p2: self.p2.max(other.p2),
        }
    }

    /// Does this box fully contain `other`? Touching boundaries count as contained.
    pub fn contains(&self, other: &Aabb) -> bool {
        self.p1.x <= other.p1.x
            && self.p1.y <= other.p1.y
            && other.p2.x <= self.p2.x
            && other.p2.y <= self.p2.y
    }

    /// Grow the box by `margin` on every side.
    #[must_use = "This returns a new box"]
    pub fn dilate(&self, margin: f64) -> Aabb {
        let m = V2::new(margin, margin);
        Aabb {
            p1: self.p1 - m,
            p2: self.p2 + m,
        }
    }

    /// get the squared distance to a specific point.
    pub fn distance_to_point_squared(&self, point: &V2) -> f64 {
        // The closest point on a box to a point is the clamped value of the point itself.
        let x = point.x.clamp(self.p1.x, self.p2.x);
        let y = point.y.clamp(self.p1.y, self.p2.y);
        (point.x - x).powi(2) + (point.y - y).powi(2)
    }

    pub fn distance_to_point(&self, point: &V2) -> f64 {
        self.distance_to_point_squared(point).sqrt()
    }
}
