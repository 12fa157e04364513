use crate::*;

/// Rays shorter than this, relative to the size of their coordinates, are considered to be a single point and never
/// hit anything.
///
/// Coordinates near 1 measure it in world units.  Further from the origin it grows with the coordinates, since the
/// spacing between representable points does.
const DEGENERATE_RAY_RELATIVE_LENGTH: f64 = 1e-12;

/// A line segment cast through the world, from `origin` to `target`.
///
/// Positions along a ray are expressed as fractions: 0 is the origin and 1 is the target.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Ray {
    pub(crate) origin: V2,
    pub(crate) target: V2,
}

impl Ray {
    /// Build a ray from a source point and a destination point.
    pub fn from_points(origin: V2, target: V2) -> Ray {
        Ray { origin, target }
    }

    pub fn from_angle(origin: V2, length: f64, theta: f64) -> Ray {
        let target = V2::new(
            origin.x + length * theta.cos(),
            origin.y + length * theta.sin(),
        );
        Ray::from_points(origin, target)
    }

    pub fn get_origin(&self) -> &V2 {
        &self.origin
    }

    pub fn get_target(&self) -> &V2 {
        &self.target
    }

    /// The unnormalized direction, `target - origin`.
    pub fn get_direction(&self) -> V2 {
        self.target - self.origin
    }

    pub fn get_length(&self) -> f64 {
        self.origin.distance(&self.target)
    }

    /// A ray whose endpoints coincide, up to rounding at the scale of its coordinates.  These can't hit anything.
    pub fn is_degenerate(&self) -> bool {
        let scale = [self.origin.x, self.origin.y, self.target.x, self.target.y]
            .into_iter()
            .fold(1.0f64, |acc, c| acc.max(c.abs()));
        let threshold = DEGENERATE_RAY_RELATIVE_LENGTH * scale;
        self.get_direction().length_squared() < threshold * threshold
    }

    /// Evaluate the ray at a given fraction.
    pub fn evaluate(&self, fraction: f64) -> V2 {
        self.origin.lerp(&self.target, fraction)
    }
}

#[cfg(test)]
mod tests {
    use approx::*;

    use super::*;

    #[test]
    fn from_angle_tests() {
        let test = Ray::from_angle(V2::new(0.0, 0.0), 2.0, std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(test.get_target().x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(test.get_target().y, 2.0);
        assert_relative_eq!(test.get_length(), 2.0);
    }

    #[test]
    fn test_evaluate() {
        let r = Ray::from_points(V2::new(-5.0, 0.0), V2::new(5.0, 10.0));
        assert_eq!(r.evaluate(0.0), V2::new(-5.0, 0.0));
        assert_eq!(r.evaluate(1.0), V2::new(5.0, 10.0));
        assert_eq!(r.evaluate(0.4), V2::new(-1.0, 4.0));
    }

    #[test]
    fn test_degenerate() {
        let p = V2::new(3.0, 4.0);
        assert!(Ray::from_points(p, p).is_degenerate());
        assert!(!Ray::from_points(p, V2::new(3.0, 4.001)).is_degenerate());

        // Near the origin, tiny rays still count.
        let origin = V2::new(0.0, 0.0);
        assert!(!Ray::from_points(origin, V2::new(1e-9, 0.0)).is_degenerate());
        assert!(Ray::from_points(origin, V2::new(1e-13, 0.0)).is_degenerate());

        // Far away, the threshold grows with the coordinates.
        let far = V2::new(1e6, -1e6);
        assert!(Ray::from_points(far, V2::new(1e6 + 1e-7, -1e6)).is_degenerate());
        assert!(!Ray::from_points(far, V2::new(1e6 + 1e-3, -1e6)).is_degenerate());
    }
}
