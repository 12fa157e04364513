//! Bodies and the fixtures attached to them.
use smallvec::SmallVec;

use crate::dynamic_tree::ProxyId;
use crate::*;

/// Identifies a body in a [World].
#[derive(Copy, Clone, Debug, derive_more::Display, Ord, Eq, PartialOrd, PartialEq, Hash)]
#[display(fmt = "body#{}", _0)]
pub struct BodyId(pub(crate) usize);

/// Identifies a fixture in a [World].
#[derive(Copy, Clone, Debug, derive_more::Display, Ord, Eq, PartialOrd, PartialEq, Hash)]
#[display(fmt = "fixture#{}", _0)]
pub struct FixtureId(pub(crate) usize);

/// Everything needed to attach a shape to a body.
///
/// ```ignore
/// let def = FixtureDef::new(Circle::new(V2::new(0.0, 0.0), 1.0)?)
///     .with_filter(Filter { category_bits: 0x0002, ..Default::default() })
///     .sensor(true);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FixtureDef {
    pub shape: Shape,
    pub filter: Filter,
    pub is_sensor: bool,
}

impl FixtureDef {
    pub fn new(shape: impl Into<Shape>) -> FixtureDef {
        FixtureDef {
            shape: shape.into(),
            filter: Default::default(),
            is_sensor: false,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> FixtureDef {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn sensor(mut self, is_sensor: bool) -> FixtureDef {
        self.is_sensor = is_sensor;
        self
    }
}

/// A shape attached to a body.
///
/// Fixtures are owned by the world.  Ray casts hand out shared references to them, which is all a callback gets to
/// see.
#[derive(Debug)]
pub struct Fixture {
    pub(crate) id: FixtureId,
    pub(crate) body: BodyId,
    pub(crate) shape: Shape,
    pub(crate) filter: Filter,
    pub(crate) is_sensor: bool,
    pub(crate) proxy: ProxyId,
}

impl Fixture {
    pub fn get_id(&self) -> FixtureId {
        self.id
    }

    pub fn get_body(&self) -> BodyId {
        self.body
    }

    pub fn get_shape(&self) -> &Shape {
        &self.shape
    }

    pub fn get_filter(&self) -> &Filter {
        &self.filter
    }

    pub fn is_sensor(&self) -> bool {
        self.is_sensor
    }
}

#[derive(Debug)]
pub(crate) struct Body {
    pub(crate) transform: Transform,
    pub(crate) fixtures: SmallVec<[FixtureId; 4]>,
}

impl Body {
    pub(crate) fn new(transform: Transform) -> Body {
        Body {
            transform,
            fixtures: SmallVec::new(),
        }
    }
}
