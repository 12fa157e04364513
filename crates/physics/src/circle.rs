//! A simple circle.
use crate::errors::*;
use crate::*;

#[derive(Clone, Debug, PartialEq)]
pub struct Circle {
    /// Center, in body space.
    center: V2,
    radius: f64,
}

impl Circle {
    pub fn new(center: V2, radius: f64) -> Result<Circle, ShapeError> {
        if !center.is_finite() {
            return Err(ShapeError::NonFinite);
        }

        if !(radius > 0.0 && radius.is_finite()) {
            return Err(ShapeError::InvalidRadius(radius));
        }

        Ok(Circle { center, radius })
    }

    pub fn get_center(&self) -> &V2 {
        &self.center
    }

    pub fn get_radius(&self) -> f64 {
        self.radius
    }

    pub fn get_bounding_box(&self, transform: &Transform) -> Aabb {
        let center = transform.apply(&self.center);
        let r = V2::new(self.radius, self.radius);
        Aabb::from_points(center - r, center + r).expect("This internal logic should never fail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::*;

    #[test]
    fn test_aabb() -> crate::Result<()> {
        let c = Circle::new(V2::new(1.0, 1.0), 2.0)?;
        let b = c.get_bounding_box(&Transform::IDENTITY);
        assert_relative_eq!(b.get_p1().x, -1.0);
        assert_relative_eq!(b.get_p1().y, -1.0);
        assert_relative_eq!(b.get_p2().x, 3.0);
        assert_relative_eq!(b.get_p2().y, 3.0);

        let moved = c.get_bounding_box(&Transform::from_position(V2::new(10.0, 0.0)));
        assert_relative_eq!(moved.get_center().x, 11.0);
        assert_relative_eq!(moved.get_center().y, 1.0);
        Ok(())
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            Circle::new(V2::new(0.0, 0.0), 0.0),
            Err(ShapeError::InvalidRadius(_))
        ));
        assert!(Circle::new(V2::new(0.0, 0.0), -1.0).is_err());
        assert!(Circle::new(V2::new(0.0, 0.0), f64::NAN).is_err());
        assert!(matches!(
            Circle::new(V2::new(f64::INFINITY, 0.0), 1.0),
            Err(ShapeError::NonFinite)
        ));
    }
}
