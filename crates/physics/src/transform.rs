//! Rigid transforms: where a body is and which way it faces.
use crate::*;

/// A rotation, stored as the sine and cosine of its angle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rot {
    sin: f64,
    cos: f64,
}

impl Rot {
    pub const IDENTITY: Rot = Rot { sin: 0.0, cos: 1.0 };

    pub fn from_angle(angle: f64) -> Rot {
        let (sin, cos) = angle.sin_cos();
        Rot { sin, cos }
    }

    pub fn get_angle(&self) -> f64 {
        self.sin.atan2(self.cos)
    }

    pub fn rotate(&self, v: &V2) -> V2 {
        V2::new(
            self.cos * v.x - self.sin * v.y,
            self.sin * v.x + self.cos * v.y,
        )
    }

    pub fn inverse_rotate(&self, v: &V2) -> V2 {
        V2::new(
            self.cos * v.x + self.sin * v.y,
            -self.sin * v.x + self.cos * v.y,
        )
    }
}

impl Default for Rot {
    fn default() -> Rot {
        Rot::IDENTITY
    }
}

/// A body-to-world transform: rotate about the body origin, then translate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    position: V2,
    rotation: Rot,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: V2 { x: 0.0, y: 0.0 },
        rotation: Rot::IDENTITY,
    };

    pub fn new(position: V2, angle: f64) -> Transform {
        Transform {
            position,
            rotation: Rot::from_angle(angle),
        }
    }

    pub fn from_position(position: V2) -> Transform {
        Transform {
            position,
            rotation: Rot::IDENTITY,
        }
    }

    pub fn get_position(&self) -> V2 {
        self.position
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.sin.is_finite() && self.rotation.cos.is_finite()
    }

    pub fn get_rotation(&self) -> Rot {
        self.rotation
    }

    pub fn get_angle(&self) -> f64 {
        self.rotation.get_angle()
    }

    /// Map a point from body space to world space.
    pub fn apply(&self, point: &V2) -> V2 {
        self.rotation.rotate(point) + self.position
    }

    /// Map a point from world space to body space.
    pub fn apply_inverse(&self, point: &V2) -> V2 {
        self.rotation.inverse_rotate(&(*point - self.position))
    }

    /// Map a direction from body space to world space.  Unlike [Self::apply], this ignores translation.
    pub fn rotate(&self, v: &V2) -> V2 {
        self.rotation.rotate(v)
    }

    pub fn inverse_rotate(&self, v: &V2) -> V2 {
        self.rotation.inverse_rotate(v)
    }
}

impl Default for Transform {
    fn default() -> Transform {
        Transform::IDENTITY
    }
}
