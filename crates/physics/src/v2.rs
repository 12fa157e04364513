//! A 2-dimensional vector/point.
use num::Num;

#[derive(Debug, Copy, Clone, Default, PartialEq, PartialOrd, Hash)]
pub struct V2<T = f64> {
    pub x: T,
    pub y: T,
}

impl<T: Num> V2<T> {
    pub const fn new(x: T, y: T) -> Self {
        V2 { x, y }
    }
}

impl<T> V2<T>
where
    T: Num + Copy,
    f64: From<T>,
{
    pub fn length_squared(&self) -> f64 {
        let x: f64 = self.x.into();
        let y: f64 = self.y.into();
        x * x + y * y
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Scale to unit length.
    ///
    /// The zero vector has no direction and comes back as NaN; callers which can produce one check first.
    #[must_use = "This function doesn't modify the vector in place"]
    pub fn normalize(self) -> V2<f64> {
        let l = self.length();
        V2 {
            x: f64::from(self.x) / l,
            y: f64::from(self.y) / l,
        }
    }

    pub fn dot(&self, other: &V2<T>) -> f64 {
        let sx: f64 = self.x.into();
        let sy: f64 = self.y.into();
        let ox: f64 = other.x.into();
        let oy: f64 = other.y.into();

        sx * ox + sy * oy
    }

    /// The z component of the 3d cross product, e.g. the signed area of the parallelogram spanned by both vectors.
    ///
    /// Positive when `other` is counterclockwise of `self`.
    pub fn cross(&self, other: &V2<T>) -> f64 {
        let sx: f64 = self.x.into();
        let sy: f64 = self.y.into();
        let ox: f64 = other.x.into();
        let oy: f64 = other.y.into();

        sx * oy - sy * ox
    }

    pub fn distance_squared(&self, other: &V2<T>) -> f64 {
        let x1: f64 = self.x.into();
        let y1: f64 = self.y.into();
        let x2: f64 = other.x.into();
        let y2: f64 = other.y.into();
        (x2 - x1).powi(2) + (y2 - y1).powi(2)
    }

    pub fn distance(&self, other: &V2<T>) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

impl V2<f64> {
    /// Rotate 90 degrees clockwise.  For the edge of a counterclockwise polygon this points out of the polygon.
    #[must_use = "This function doesn't modify the vector in place"]
    pub fn right_perp(self) -> V2 {
        V2::new(self.y, -self.x)
    }

    /// Componentwise minimum.
    #[must_use = "This function doesn't modify the vector in place"]
    pub fn min(self, other: V2) -> V2 {
        V2::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Componentwise maximum.
    #[must_use = "This function doesn't modify the vector in place"]
    pub fn max(self, other: V2) -> V2 {
        V2::new(self.x.max(other.x), self.y.max(other.y))
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Interpolate toward `other`; `t = 0` is `self` and `t = 1` is `other`.
    pub fn lerp(&self, other: &V2, t: f64) -> V2 {
        V2::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

impl<T: Num> std::ops::Add for V2<T> {
    type Output = V2<T>;

    fn add(self, rhs: V2<T>) -> V2<T> {
        V2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<T: Copy> std::ops::Mul<f64> for V2<T>
where
    f64: From<T>,
{
    type Output = V2<f64>;

    fn mul(self, rhs: f64) -> Self::Output {
        V2 {
            x: f64::from(self.x) * rhs,
            y: f64::from(self.y) * rhs,
        }
    }
}

impl<T: std::ops::Neg> std::ops::Neg for V2<T> {
    type Output = V2<<T as std::ops::Neg>::Output>;

    fn neg(self) -> Self::Output {
        V2 {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl<T: Num> std::ops::Sub for V2<T> {
    type Output = V2<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        V2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::*;

    #[test]
    fn test_cross_orientation() {
        let x = V2::new(1.0, 0.0);
        let y = V2::new(0.0, 1.0);
        assert_relative_eq!(x.cross(&y), 1.0);
        assert_relative_eq!(y.cross(&x), -1.0);
        assert_relative_eq!(x.cross(&x), 0.0);
    }

    #[test]
    fn test_perps() {
        let v = V2::new(3.0, 4.0);
        assert_eq!(v.right_perp(), V2::new(4.0, -3.0));
        assert_relative_eq!(v.dot(&v.right_perp()), 0.0);
        assert_relative_eq!(v.normalize().length(), 1.0);
    }

    #[test]
    fn test_lerp() {
        let a = V2::new(-5.0, 2.0);
        let b = V2::new(5.0, 4.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), V2::new(0.0, 3.0));
    }
}
